use std::ops::Range;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::generator::WordSource;
use crate::session::input::{self, WordOutcome};
use crate::session::settings::{Settings, TestType};
use crate::session::stats::DerivedStats;

/// Words kept visible behind the current one.
pub const WINDOW_BEHIND: usize = 10;
/// Words shown from the current one onward.
pub const WINDOW_AHEAD: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    TimeUp,
    WordQuota,
    SequenceExhausted,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EndReason::TimeUp => "time up",
            EndReason::WordQuota => "word quota reached",
            EndReason::SequenceExhausted => "out of words",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Ended(EndReason),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub current_word_index: usize,
    pub current_input: String,
    pub phase: Phase,
    pub time_left: u32,
    pub words_completed: usize,
    pub error_count: usize,
    pub total_chars_typed: usize,
    pub correct_chars_typed: usize,
    pub started_at: Option<Instant>,
    /// Wall-clock time between start and end, captured when the session ends.
    pub frozen_elapsed: Option<Duration>,
    pub word_outcomes: Vec<WordOutcome>,
}

impl SessionState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            current_word_index: 0,
            current_input: String::new(),
            phase: Phase::Idle,
            time_left: settings.duration_secs,
            words_completed: 0,
            error_count: 0,
            total_chars_typed: 0,
            correct_chars_typed: 0,
            started_at: None,
            frozen_elapsed: None,
            word_outcomes: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }
}

/// Display status of one word in the sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordStatus {
    Done(WordOutcome),
    Current { on_track: bool },
    Upcoming,
}

/// One typing attempt: settings, the generated words and the running tally.
pub struct SessionEngine<S: WordSource> {
    settings: Settings,
    words: Vec<String>,
    state: SessionState,
    source: S,
}

impl<S: WordSource> SessionEngine<S> {
    pub fn new(settings: Settings, mut source: S) -> Result<Self> {
        settings.validate()?;
        let words = source.generate(settings.mode, settings.sequence_len())?;
        warn_unusual(&settings);
        Ok(Self {
            state: SessionState::new(&settings),
            settings,
            words,
            source,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn is_ended(&self) -> bool {
        self.state.is_ended()
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words
            .get(self.state.current_word_index)
            .map(String::as_str)
    }

    /// Replaces the settings and starts over. Refused while a session is running.
    pub fn configure(&mut self, settings: Settings) -> Result<()> {
        if self.is_active() {
            warn!("configure refused: session is active");
            return Err(SessionError::SessionActive);
        }
        settings.validate()?;
        let words = self
            .source
            .generate(settings.mode, settings.sequence_len())?;
        warn_unusual(&settings);

        self.settings = settings;
        self.words = words;
        self.state = SessionState::new(&self.settings);
        info!(
            mode = %self.settings.mode,
            test_type = %self.settings.test_type,
            duration = self.settings.duration_secs,
            word_count = self.settings.word_count,
            "session configured"
        );
        Ok(())
    }

    /// Abandons whatever is in progress and deals a fresh word sequence.
    ///
    /// The state is reset even when generation fails; the previous words are
    /// then reused and the error is returned.
    pub fn reset(&mut self) -> Result<()> {
        let previous = self.state.phase;
        self.state = SessionState::new(&self.settings);
        match self
            .source
            .generate(self.settings.mode, self.settings.sequence_len())
        {
            Ok(words) => {
                self.words = words;
                debug!(?previous, "session reset");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "session reset kept the previous words");
                Err(err)
            }
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.state.phase != Phase::Idle {
            return;
        }
        self.state.phase = Phase::Active;
        self.state.started_at = Some(now);
        info!(mode = %self.settings.mode, test_type = %self.settings.test_type, "session started");
    }

    pub fn submit_input(&mut self, text: &str) {
        self.submit_input_at(text, Instant::now());
    }

    /// Feeds the full content of the input field.
    pub fn submit_input_at(&mut self, text: &str, now: Instant) {
        if self.is_ended() {
            return;
        }
        if !self.is_active() && !text.is_empty() {
            self.start_at(now);
        }

        self.state.current_input = text.to_string();

        let Some(typed) = input::submitted_word(text) else {
            return;
        };
        let Some(target) = self.words.get(self.state.current_word_index) else {
            self.end_at(EndReason::SequenceExhausted, now);
            return;
        };

        let score = input::score_word(typed, target);
        self.state.total_chars_typed += score.typed_chars;
        self.state.correct_chars_typed += score.correct_chars;
        if score.exact {
            self.state.words_completed += 1;
            self.state.word_outcomes.push(WordOutcome::Correct);
        } else {
            self.state.error_count += 1;
            self.state.word_outcomes.push(WordOutcome::Incorrect);
        }

        self.state.current_input.clear();
        self.state.current_word_index += 1;

        if self.settings.test_type == TestType::Words
            && self.state.words_completed >= self.settings.word_count as usize
        {
            self.end_at(EndReason::WordQuota, now);
        } else if self.state.current_word_index >= self.words.len() {
            self.end_at(EndReason::SequenceExhausted, now);
        }
    }

    /// Advances the countdown by one second. Only timed, running sessions count down.
    pub fn tick(&mut self) {
        if !self.is_active() || self.settings.test_type != TestType::Time {
            return;
        }
        self.state.time_left = self.state.time_left.saturating_sub(1);
        if self.state.time_left == 0 {
            self.end_at(EndReason::TimeUp, Instant::now());
        }
    }

    /// Ends a running session. Has no effect unless the session is active.
    pub fn end_at(&mut self, reason: EndReason, now: Instant) {
        if !self.is_active() {
            return;
        }
        self.state.phase = Phase::Ended(reason);
        self.state.frozen_elapsed = self
            .state
            .started_at
            .map(|start| now.saturating_duration_since(start));

        let stats = self.stats_at(now);
        info!(
            reason = reason.as_str(),
            wpm = stats.wpm,
            accuracy = stats.accuracy,
            errors = self.state.error_count,
            words = self.state.words_completed,
            "session ended"
        );
    }

    /// Time that counts toward wpm. `None` until the clock starts.
    pub fn elapsed_at(&self, now: Instant) -> Option<Duration> {
        match self.state.phase {
            Phase::Idle => None,
            Phase::Active => self
                .state
                .started_at
                .map(|start| now.saturating_duration_since(start)),
            Phase::Ended(_) => match self.settings.test_type {
                TestType::Time => Some(Duration::from_secs(u64::from(
                    self.settings.duration_secs.saturating_sub(self.state.time_left),
                ))),
                TestType::Words => self.state.frozen_elapsed,
            },
        }
    }

    pub fn stats(&self) -> DerivedStats {
        self.stats_at(Instant::now())
    }

    pub fn stats_at(&self, now: Instant) -> DerivedStats {
        DerivedStats::compute(
            self.state.correct_chars_typed,
            self.state.total_chars_typed,
            self.elapsed_at(now),
        )
    }

    /// Fraction of the test done, 0.0..=1.0.
    pub fn progress(&self) -> f64 {
        let ratio = match self.settings.test_type {
            TestType::Time => {
                let spent = self.settings.duration_secs.saturating_sub(self.state.time_left);
                f64::from(spent) / f64::from(self.settings.duration_secs)
            }
            TestType::Words => {
                self.state.words_completed as f64 / f64::from(self.settings.word_count)
            }
        };
        ratio.clamp(0.0, 1.0)
    }

    /// Whether the pending input is still a prefix of the current word.
    pub fn input_on_track(&self) -> bool {
        let typed = self.state.current_input.trim();
        typed.is_empty() || self.current_word().is_some_and(|word| word.starts_with(typed))
    }

    /// Indices of the words worth drawing around the current one.
    pub fn visible_window(&self) -> Range<usize> {
        let idx = self.state.current_word_index;
        let start = idx.saturating_sub(WINDOW_BEHIND).min(self.words.len());
        let end = idx.saturating_add(WINDOW_AHEAD).min(self.words.len());
        start..end
    }

    pub fn word_status(&self, index: usize) -> WordStatus {
        let current = self.state.current_word_index;
        if index < current {
            let outcome = self
                .state
                .word_outcomes
                .get(index)
                .copied()
                .unwrap_or(WordOutcome::Correct);
            WordStatus::Done(outcome)
        } else if index == current {
            WordStatus::Current {
                on_track: self.input_on_track(),
            }
        } else {
            WordStatus::Upcoming
        }
    }
}

fn warn_unusual(settings: &Settings) {
    for note in settings.unusual_values() {
        warn!("{note}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::ScriptedWordSource;
    use crate::session::settings::Mode;

    fn words_settings(word_count: u32) -> Settings {
        Settings {
            mode: Mode::Normal,
            test_type: TestType::Words,
            duration_secs: 30,
            word_count,
        }
    }

    fn time_settings(duration_secs: u32) -> Settings {
        Settings {
            mode: Mode::Normal,
            test_type: TestType::Time,
            duration_secs,
            word_count: 50,
        }
    }

    fn engine(settings: Settings, words: &[&str]) -> SessionEngine<ScriptedWordSource> {
        SessionEngine::new(settings, ScriptedWordSource::cycling(words.iter().copied())).unwrap()
    }

    fn assert_invariants<S: WordSource>(e: &SessionEngine<S>) {
        let s = e.state();
        assert!(s.total_chars_typed >= s.correct_chars_typed);
        assert!(s.words_completed <= s.current_word_index);
        let stats = e.stats();
        assert!(stats.accuracy <= 100);
    }

    #[test]
    fn new_engine_is_idle() {
        let e = engine(words_settings(2), &["cat", "dog"]);
        assert_eq!(e.phase(), Phase::Idle);
        assert_eq!(e.words(), ["cat", "dog"]);
        assert_eq!(e.current_word(), Some("cat"));
        assert_eq!(e.stats(), DerivedStats { wpm: 0, accuracy: 100 });
    }

    #[test]
    fn timed_sequence_is_two_hundred_words() {
        let e = engine(time_settings(30), &["a", "b", "c"]);
        assert_eq!(e.words().len(), 200);
        assert_eq!(e.state().time_left, 30);
    }

    #[test]
    fn invalid_settings_rejected_at_construction() {
        let result = SessionEngine::new(
            Settings {
                duration_secs: 0,
                ..Settings::default()
            },
            ScriptedWordSource::cycling(["a"]),
        );
        assert!(matches!(result, Err(SessionError::InvalidSettings(_))));
    }

    #[test]
    fn first_keystroke_starts_session() {
        let mut e = engine(words_settings(2), &["cat", "dog"]);
        let t0 = Instant::now();
        e.submit_input_at("c", t0);
        assert_eq!(e.phase(), Phase::Active);
        assert_eq!(e.state().started_at, Some(t0));
        assert_eq!(e.state().current_input, "c");
        assert_eq!(e.state().current_word_index, 0);
    }

    #[test]
    fn empty_input_does_not_start_session() {
        let mut e = engine(words_settings(2), &["cat", "dog"]);
        e.submit_input("");
        assert_eq!(e.phase(), Phase::Idle);
        assert!(e.state().started_at.is_none());
    }

    #[test]
    fn partial_input_changes_nothing_but_current_input() {
        let mut e = engine(words_settings(2), &["cat", "dog"]);
        e.submit_input("ca");
        let s = e.state();
        assert_eq!(s.current_input, "ca");
        assert_eq!(s.total_chars_typed, 0);
        assert_eq!(s.correct_chars_typed, 0);
        assert_eq!(s.words_completed, 0);
        assert_eq!(s.error_count, 0);
    }

    #[test]
    fn exact_word_completes() {
        let mut e = engine(words_settings(5), &["cat", "dog"]);
        e.submit_input("cat ");
        let s = e.state();
        assert_eq!(s.words_completed, 1);
        assert_eq!(s.error_count, 0);
        assert_eq!(s.current_word_index, 1);
        assert_eq!(s.current_input, "");
        assert_eq!(s.word_outcomes, vec![WordOutcome::Correct]);
        assert_invariants(&e);
    }

    #[test]
    fn wrong_word_scores_partial_credit() {
        let mut e = engine(words_settings(5), &["test"]);
        e.submit_input("tent ");
        let s = e.state();
        assert_eq!(s.total_chars_typed, 4);
        assert_eq!(s.correct_chars_typed, 3);
        assert_eq!(s.error_count, 1);
        assert_eq!(s.words_completed, 0);
        assert_eq!(s.current_word_index, 1);
        assert_eq!(s.word_outcomes, vec![WordOutcome::Incorrect]);
        assert_eq!(e.stats().accuracy, 75);
        assert_invariants(&e);
    }

    #[test]
    fn lone_space_is_not_a_submission() {
        let mut e = engine(words_settings(5), &["cat"]);
        e.submit_input(" ");
        assert_eq!(e.phase(), Phase::Active);
        assert_eq!(e.state().current_word_index, 0);
        assert_eq!(e.state().current_input, " ");
    }

    #[test]
    fn words_mode_ends_on_quota() {
        let mut e = engine(words_settings(2), &["cat", "dog"]);
        let t0 = Instant::now();
        e.submit_input_at("cat ", t0);
        assert_eq!(e.state().words_completed, 1);
        assert_eq!(e.state().error_count, 0);
        e.submit_input_at("dog ", t0 + Duration::from_secs(6));

        let s = e.state();
        assert_eq!(s.words_completed, 2);
        assert_eq!(s.phase, Phase::Ended(EndReason::WordQuota));
        assert_eq!(s.total_chars_typed, 6);
        assert_eq!(s.correct_chars_typed, 6);
        assert_eq!(s.frozen_elapsed, Some(Duration::from_secs(6)));

        let stats = e.stats();
        assert_eq!(stats.accuracy, 100);
        assert_eq!(stats.wpm, 12);
    }

    #[test]
    fn ended_words_session_freezes_elapsed() {
        let mut e = engine(words_settings(1), &["cat"]);
        let t0 = Instant::now();
        e.submit_input_at("cat ", t0 + Duration::from_secs(3));
        // reading much later must not dilute wpm
        let later = t0 + Duration::from_secs(600);
        assert_eq!(e.elapsed_at(later), Some(Duration::ZERO));
        assert_eq!(e.stats_at(later).wpm, 36);
    }

    #[test]
    fn errors_exhaust_words_mode_sequence() {
        let mut e = engine(words_settings(2), &["cat", "dog"]);
        e.submit_input("cot ");
        e.submit_input("dog ");
        let s = e.state();
        assert_eq!(s.words_completed, 1);
        assert_eq!(s.error_count, 1);
        assert_eq!(s.phase, Phase::Ended(EndReason::SequenceExhausted));
        assert_invariants(&e);
    }

    #[test]
    fn short_sequence_ends_timed_session() {
        let mut e = SessionEngine::new(
            time_settings(60),
            ScriptedWordSource::exact(["one", "two"]),
        )
        .unwrap();
        e.submit_input("one ");
        e.submit_input("two ");
        assert_eq!(e.phase(), Phase::Ended(EndReason::SequenceExhausted));
        assert_eq!(e.state().current_word_index, 2);
        assert_eq!(e.current_word(), None);
    }

    #[test]
    fn input_after_end_is_ignored() {
        let mut e = engine(words_settings(1), &["cat"]);
        e.submit_input("cat ");
        let before = e.state().clone();
        e.submit_input("dog ");
        e.submit_input("x");
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn countdown_ends_after_duration() {
        let mut e = engine(time_settings(15), &["cat"]);
        e.start();
        for _ in 0..14 {
            e.tick();
        }
        assert_eq!(e.state().time_left, 1);
        assert!(e.is_active());
        e.tick();
        assert_eq!(e.state().time_left, 0);
        assert_eq!(e.phase(), Phase::Ended(EndReason::TimeUp));

        let before = e.state().clone();
        for _ in 0..5 {
            e.tick();
        }
        assert_eq!(e.state(), &before);
    }

    #[test]
    fn tick_while_idle_is_noop() {
        let mut e = engine(time_settings(15), &["cat"]);
        e.tick();
        assert_eq!(e.state().time_left, 15);
        assert_eq!(e.phase(), Phase::Idle);
    }

    #[test]
    fn tick_in_words_mode_is_noop() {
        let mut e = engine(words_settings(5), &["cat"]);
        e.start();
        e.tick();
        assert_eq!(e.state().time_left, 30);
        assert!(e.is_active());
    }

    #[test]
    fn timed_wpm_uses_elapsed_ticks_once_ended() {
        let mut e = engine(time_settings(15), &["hello"]);
        let t0 = Instant::now();
        e.start_at(t0);
        for _ in 0..3 {
            e.submit_input_at("hello ", t0);
        }
        for _ in 0..15 {
            e.tick();
        }
        // 15 correct chars = 3 words over 15s = 12 wpm
        assert_eq!(e.elapsed_at(t0), Some(Duration::from_secs(15)));
        assert_eq!(e.stats_at(t0 + Duration::from_secs(900)).wpm, 12);
    }

    #[test]
    fn active_wpm_uses_wall_clock() {
        let mut e = engine(words_settings(50), &["hello"]);
        let t0 = Instant::now();
        e.submit_input_at("hello ", t0);
        e.submit_input_at("hello ", t0);
        // 10 chars = 2 words over 30s = 4 wpm
        assert_eq!(e.stats_at(t0 + Duration::from_secs(30)).wpm, 4);
        // at the very start the one second floor applies
        assert_eq!(e.stats_at(t0).wpm, 120);
    }

    #[test]
    fn ending_twice_is_idempotent() {
        let mut e = engine(words_settings(5), &["cat"]);
        let t0 = Instant::now();
        e.start_at(t0);
        e.end_at(EndReason::WordQuota, t0 + Duration::from_secs(2));
        let once = e.state().clone();
        e.end_at(EndReason::TimeUp, t0 + Duration::from_secs(9));
        assert_eq!(e.state(), &once);
    }

    #[test]
    fn ending_idle_session_is_noop() {
        let mut e = engine(words_settings(5), &["cat"]);
        e.end_at(EndReason::TimeUp, Instant::now());
        assert_eq!(e.phase(), Phase::Idle);
    }

    #[test]
    fn reset_from_any_state_zeroes_counters() {
        let mut e = engine(words_settings(3), &["cat", "dog"]);
        e.submit_input("cot ");
        e.submit_input("dog ");
        e.submit_input("ca");
        e.reset().unwrap();
        let s = e.state();
        assert_eq!(s.current_word_index, 0);
        assert_eq!(s.words_completed, 0);
        assert_eq!(s.error_count, 0);
        assert_eq!(s.total_chars_typed, 0);
        assert_eq!(s.correct_chars_typed, 0);
        assert_eq!(s.current_input, "");
        assert!(!s.is_active());
        assert!(s.started_at.is_none());

        e.submit_input("cat ");
        e.submit_input("dog ");
        e.submit_input("cat ");
        assert!(e.is_ended());
        e.reset().unwrap();
        assert_eq!(e.phase(), Phase::Idle);
        assert_eq!(e.state().words_completed, 0);
    }

    #[test]
    fn reset_restores_countdown() {
        let mut e = engine(time_settings(30), &["cat"]);
        e.start();
        e.tick();
        e.tick();
        e.reset().unwrap();
        assert_eq!(e.state().time_left, 30);
    }

    #[test]
    fn configure_rejected_while_active() {
        let mut e = engine(words_settings(5), &["cat"]);
        e.submit_input("c");
        let err = e.configure(time_settings(60)).unwrap_err();
        assert_eq!(err, SessionError::SessionActive);
        assert_eq!(e.settings(), &words_settings(5));
        assert!(e.is_active());
    }

    #[test]
    fn configure_rejects_invalid_settings_and_keeps_previous() {
        let mut e = engine(words_settings(5), &["cat"]);
        let err = e.configure(words_settings(0)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidSettings(_)));
        assert_eq!(e.settings(), &words_settings(5));
    }

    #[test]
    fn configure_after_end_starts_fresh() {
        let mut e = engine(words_settings(1), &["cat"]);
        e.submit_input("cat ");
        assert!(e.is_ended());
        e.configure(time_settings(15)).unwrap();
        assert_eq!(e.phase(), Phase::Idle);
        assert_eq!(e.state().time_left, 15);
        assert_eq!(e.words().len(), 200);
    }

    #[test]
    fn progress_tracks_test_type() {
        let mut e = engine(words_settings(4), &["cat"]);
        e.submit_input("cat ");
        assert!((e.progress() - 0.25).abs() < f64::EPSILON);

        let mut e = engine(time_settings(10), &["cat"]);
        e.start();
        e.tick();
        e.tick();
        assert!((e.progress() - 0.2).abs() < f64::EPSILON);
    }

    #[test]
    fn input_on_track_checks_prefix() {
        let mut e = engine(words_settings(5), &["cat"]);
        assert!(e.input_on_track());
        e.submit_input("ca");
        assert!(e.input_on_track());
        e.submit_input("co");
        assert!(!e.input_on_track());
    }

    #[test]
    fn visible_window_keeps_ten_behind_thirty_ahead() {
        let mut e = engine(time_settings(60), &["a"]);
        assert_eq!(e.visible_window(), 0..30);
        for _ in 0..15 {
            e.submit_input("a ");
        }
        assert_eq!(e.visible_window(), 5..45);
    }

    #[test]
    fn word_status_reflects_outcomes() {
        let mut e = engine(words_settings(5), &["cat", "dog", "fox"]);
        e.submit_input("cat ");
        e.submit_input("dig ");
        e.submit_input("fx");
        assert_eq!(e.word_status(0), WordStatus::Done(WordOutcome::Correct));
        assert_eq!(e.word_status(1), WordStatus::Done(WordOutcome::Incorrect));
        assert_eq!(e.word_status(2), WordStatus::Current { on_track: false });
        assert_eq!(e.word_status(3), WordStatus::Upcoming);
    }

    #[test]
    fn index_never_decreases() {
        let mut e = engine(words_settings(50), &["cat", "dog"]);
        let inputs = ["c", "ca", "cat ", "d", "", "x ", "  ", "dog ", "do"];
        let mut last = 0;
        for text in inputs {
            e.submit_input(text);
            assert!(e.state().current_word_index >= last);
            last = e.state().current_word_index;
            assert_invariants(&e);
        }
    }
}
