use std::time::Instant;

use crate::generator::WordSource;
use crate::session::engine::{EndReason, Phase, SessionEngine};
use crate::session::settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PerformanceLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl PerformanceLevel {
    pub fn from_wpm(wpm: u32) -> Self {
        match wpm {
            80.. => PerformanceLevel::Expert,
            60..=79 => PerformanceLevel::Advanced,
            40..=59 => PerformanceLevel::Intermediate,
            _ => PerformanceLevel::Beginner,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceLevel::Beginner => "Beginner",
            PerformanceLevel::Intermediate => "Intermediate",
            PerformanceLevel::Advanced => "Advanced",
            PerformanceLevel::Expert => "Expert",
        }
    }
}

/// Everything the results screen shows for a finished session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSummary {
    pub wpm: u32,
    pub accuracy: u8,
    pub errors: usize,
    pub total_chars: usize,
    pub correct_chars: usize,
    pub words_completed: usize,
    pub elapsed_secs: f64,
    pub end_reason: Option<EndReason>,
    pub settings: Settings,
}

impl SessionSummary {
    pub fn from_engine<S: WordSource>(engine: &SessionEngine<S>, now: Instant) -> Self {
        let state = engine.state();
        let stats = engine.stats_at(now);
        let end_reason = match state.phase {
            Phase::Ended(reason) => Some(reason),
            _ => None,
        };

        Self {
            wpm: stats.wpm,
            accuracy: stats.accuracy,
            errors: state.error_count,
            total_chars: state.total_chars_typed,
            correct_chars: state.correct_chars_typed,
            words_completed: state.words_completed,
            elapsed_secs: engine
                .elapsed_at(now)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
            end_reason,
            settings: *engine.settings(),
        }
    }

    pub fn level(&self) -> PerformanceLevel {
        PerformanceLevel::from_wpm(self.wpm)
    }

    pub fn speed_remark(&self) -> &'static str {
        if self.wpm >= 40 {
            "Great speed!"
        } else {
            "Keep practicing!"
        }
    }

    pub fn accuracy_remark(&self) -> &'static str {
        match self.accuracy {
            95.. => "Excellent!",
            90..=94 => "Very good!",
            _ => "Room for improvement",
        }
    }

    pub fn errors_remark(&self) -> &'static str {
        match self.errors {
            0 => "Perfect!",
            1..=3 => "Not bad!",
            _ => "Focus on accuracy",
        }
    }

    pub fn tips(&self) -> Vec<&'static str> {
        let mut tips = Vec::new();
        if self.accuracy < 90 {
            tips.push("Focus on accuracy first - speed will follow naturally");
        }
        if self.wpm < 40 {
            tips.push("Practice regularly, even 10-15 minutes daily makes a difference");
        }
        if self.errors > 5 {
            tips.push("Slow down and focus on correct finger positioning");
        }
        tips.push("Keep your wrists straight and fingers curved");
        tips.push("Don't look at the keyboard - trust muscle memory");
        tips
    }

    pub fn share_text(&self) -> String {
        format!(
            "I just typed {} WPM with {}% accuracy on NeoType!",
            self.wpm, self.accuracy
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::generator::ScriptedWordSource;
    use crate::session::settings::{Mode, TestType};

    fn summary(wpm: u32, accuracy: u8, errors: usize) -> SessionSummary {
        SessionSummary {
            wpm,
            accuracy,
            errors,
            total_chars: 0,
            correct_chars: 0,
            words_completed: 0,
            elapsed_secs: 0.0,
            end_reason: None,
            settings: Settings::default(),
        }
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(PerformanceLevel::from_wpm(0), PerformanceLevel::Beginner);
        assert_eq!(PerformanceLevel::from_wpm(39), PerformanceLevel::Beginner);
        assert_eq!(PerformanceLevel::from_wpm(40), PerformanceLevel::Intermediate);
        assert_eq!(PerformanceLevel::from_wpm(60), PerformanceLevel::Advanced);
        assert_eq!(PerformanceLevel::from_wpm(79), PerformanceLevel::Advanced);
        assert_eq!(PerformanceLevel::from_wpm(80), PerformanceLevel::Expert);
    }

    #[test]
    fn remarks_follow_thresholds() {
        let s = summary(45, 96, 0);
        assert_eq!(s.speed_remark(), "Great speed!");
        assert_eq!(s.accuracy_remark(), "Excellent!");
        assert_eq!(s.errors_remark(), "Perfect!");

        let s = summary(20, 91, 3);
        assert_eq!(s.speed_remark(), "Keep practicing!");
        assert_eq!(s.accuracy_remark(), "Very good!");
        assert_eq!(s.errors_remark(), "Not bad!");

        let s = summary(20, 70, 4);
        assert_eq!(s.accuracy_remark(), "Room for improvement");
        assert_eq!(s.errors_remark(), "Focus on accuracy");
    }

    #[test]
    fn tips_grow_with_problems() {
        assert_eq!(summary(90, 99, 0).tips().len(), 2);
        assert_eq!(summary(10, 50, 9).tips().len(), 5);
    }

    #[test]
    fn share_text_mentions_both_numbers() {
        assert_eq!(
            summary(72, 98, 1).share_text(),
            "I just typed 72 WPM with 98% accuracy on NeoType!"
        );
    }

    #[test]
    fn from_engine_captures_finished_session() {
        let settings = Settings {
            mode: Mode::LeftHand,
            test_type: TestType::Words,
            duration_secs: 30,
            word_count: 2,
        };
        let mut engine =
            SessionEngine::new(settings, ScriptedWordSource::cycling(["test", "best"])).unwrap();
        let t0 = Instant::now();
        engine.submit_input_at("tent ", t0);
        engine.submit_input_at("best ", t0 + Duration::from_secs(12));

        let summary = SessionSummary::from_engine(&engine, t0 + Duration::from_secs(60));
        assert_eq!(summary.end_reason, Some(EndReason::SequenceExhausted));
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_chars, 8);
        assert_eq!(summary.correct_chars, 7);
        assert_eq!(summary.words_completed, 1);
        assert_eq!(summary.accuracy, 88);
        assert!((summary.elapsed_secs - 12.0).abs() < 1e-9);
        assert_eq!(summary.settings, settings);
    }
}
