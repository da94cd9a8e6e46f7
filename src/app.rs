use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::event::Countdown;
use crate::generator::{RandomWordSource, WordBank, WordSource};
use crate::session::engine::SessionEngine;
use crate::session::result::SessionSummary;
use crate::session::settings::{
    DURATION_CHOICES, MAX_SUGGESTED_WORDS, MIN_SUGGESTED_WORDS, Settings, TestType,
};
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Test,
    Results,
    Settings,
}

pub const SETTINGS_FIELDS: usize = 5;
const WORD_COUNT_STEP: u32 = 10;

pub struct App<S: WordSource = RandomWordSource> {
    pub screen: AppScreen,
    pub engine: SessionEngine<S>,
    pub config: Config,
    pub theme: Theme,
    pub should_quit: bool,
    pub settings_selected: usize,
    /// Settings being edited on the settings screen.
    pub draft: Settings,
    pub draft_theme: String,
    pub status: Option<String>,
    pub last_summary: Option<SessionSummary>,
    config_path: Option<PathBuf>,
    countdown: Option<Countdown>,
}

impl App<RandomWordSource> {
    /// Builds the app on the bundled word lists and persists settings to the user config.
    pub fn with_word_bank(config: Config, settings: Settings) -> Result<Self> {
        let source = RandomWordSource::new(WordBank::load()?);
        let mut app = Self::new(config, settings, source)?;
        app.config_path = Some(Config::config_path());
        Ok(app)
    }
}

impl<S: WordSource> App<S> {
    pub fn new(config: Config, settings: Settings, source: S) -> Result<Self> {
        let engine = SessionEngine::new(settings, source)?;
        let theme = Theme::load(&config.theme).unwrap_or_else(|| {
            warn!(theme = %config.theme, "unknown theme, using default");
            Theme::default()
        });

        Ok(Self {
            screen: AppScreen::Test,
            engine,
            draft: settings,
            draft_theme: config.theme.clone(),
            config,
            theme,
            should_quit: false,
            settings_selected: 0,
            status: None,
            last_summary: None,
            config_path: None,
            countdown: None,
        })
    }

    pub fn countdown_armed(&self) -> bool {
        self.countdown.is_some()
    }

    pub fn type_char(&mut self, ch: char) {
        if self.screen != AppScreen::Test || self.engine.is_ended() {
            return;
        }
        let mut text = self.engine.state().current_input.clone();
        text.push(ch);
        self.engine.submit_input(&text);
        self.sync_session();
    }

    pub fn backspace(&mut self) {
        if self.screen != AppScreen::Test || self.engine.is_ended() {
            return;
        }
        let mut text = self.engine.state().current_input.clone();
        if text.pop().is_none() {
            return;
        }
        self.engine.submit_input(&text);
        self.sync_session();
    }

    /// Feeds elapsed whole seconds into a running timed session.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(countdown) = self.countdown.as_mut() {
            for _ in 0..countdown.poll(now) {
                self.engine.tick();
            }
        }
        self.sync_session();
    }

    /// Throws away the current attempt and deals new words.
    pub fn restart(&mut self) {
        self.countdown = None;
        self.last_summary = None;
        self.status = match self.engine.reset() {
            Ok(()) => None,
            Err(err) => Some(format!("Could not deal new words: {err}")),
        };
        self.screen = AppScreen::Test;
    }

    pub fn open_settings(&mut self) {
        if self.engine.is_active() {
            self.status = Some("Settings are locked while a test is running".to_string());
            return;
        }
        self.draft = *self.engine.settings();
        self.draft_theme = self.config.theme.clone();
        self.settings_selected = 0;
        self.status = None;
        self.screen = AppScreen::Settings;
    }

    pub fn cancel_settings(&mut self) {
        self.status = None;
        self.screen = if self.engine.is_ended() && self.last_summary.is_some() {
            AppScreen::Results
        } else {
            AppScreen::Test
        };
    }

    pub fn settings_move(&mut self, down: bool) {
        self.settings_selected = if down {
            (self.settings_selected + 1) % SETTINGS_FIELDS
        } else {
            (self.settings_selected + SETTINGS_FIELDS - 1) % SETTINGS_FIELDS
        };
    }

    pub fn settings_cycle(&mut self, forward: bool) {
        match self.settings_selected {
            0 => {
                self.draft.mode = if forward {
                    self.draft.mode.next()
                } else {
                    self.draft.mode.prev()
                };
            }
            1 => self.draft.test_type = self.draft.test_type.toggle(),
            2 => self.draft.duration_secs = cycle_duration(self.draft.duration_secs, forward),
            3 => self.draft.word_count = step_word_count(self.draft.word_count, forward),
            4 => {
                let themes = Theme::available_themes();
                if themes.is_empty() {
                    return;
                }
                let idx = themes
                    .iter()
                    .position(|t| *t == self.draft_theme)
                    .unwrap_or(0);
                let next = if forward {
                    (idx + 1) % themes.len()
                } else {
                    (idx + themes.len() - 1) % themes.len()
                };
                self.draft_theme = themes[next].clone();
            }
            _ => {}
        }
    }

    /// Commits the draft. On failure the settings screen stays open with the error.
    pub fn apply_settings(&mut self) {
        if let Err(err) = self.engine.configure(self.draft) {
            warn!(%err, "settings rejected");
            self.status = Some(err.to_string());
            return;
        }
        self.countdown = None;
        self.last_summary = None;
        self.status = None;
        self.config.store_settings(&self.draft);

        if self.draft_theme != self.config.theme {
            match Theme::load(&self.draft_theme) {
                Some(theme) => {
                    self.theme = theme;
                    self.config.theme = self.draft_theme.clone();
                }
                None => warn!(theme = %self.draft_theme, "theme failed to load"),
            }
        }

        self.save_config();
        self.screen = AppScreen::Test;
    }

    fn save_config(&mut self) {
        let Some(path) = self.config_path.as_ref() else {
            return;
        };
        if let Err(err) = self.config.save_to(path) {
            warn!(%err, path = %path.display(), "failed to save config");
            self.status = Some(format!("Could not save settings: {err}"));
        }
    }

    /// Keeps the countdown and screen in step with the engine phase.
    fn sync_session(&mut self) {
        if self.engine.is_active() {
            if self.engine.settings().test_type == TestType::Time && self.countdown.is_none() {
                let started = self.engine.state().started_at.unwrap_or_else(Instant::now);
                self.countdown = Some(Countdown::start(started));
            }
        } else {
            self.countdown = None;
        }

        if self.engine.is_ended() && self.screen == AppScreen::Test {
            let summary = SessionSummary::from_engine(&self.engine, Instant::now());
            info!(
                wpm = summary.wpm,
                accuracy = summary.accuracy,
                level = summary.level().as_str(),
                "showing results"
            );
            self.last_summary = Some(summary);
            self.screen = AppScreen::Results;
        }
    }
}

fn cycle_duration(current: u32, forward: bool) -> u32 {
    let len = DURATION_CHOICES.len();
    let idx = match DURATION_CHOICES.iter().position(|&d| d == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        // off-list values snap to the nearest choice in the travel direction
        None if forward => DURATION_CHOICES
            .iter()
            .position(|&d| d > current)
            .unwrap_or(0),
        None => DURATION_CHOICES
            .iter()
            .rposition(|&d| d < current)
            .unwrap_or(len - 1),
    };
    DURATION_CHOICES[idx]
}

fn step_word_count(current: u32, forward: bool) -> u32 {
    let next = if forward {
        current.saturating_add(WORD_COUNT_STEP)
    } else {
        current.saturating_sub(WORD_COUNT_STEP)
    };
    next.clamp(MIN_SUGGESTED_WORDS, MAX_SUGGESTED_WORDS)
}
