use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;

/// Words pre-generated for a timed test.
pub const TIMED_SEQUENCE_LEN: usize = 200;

/// Durations offered by the settings panel.
pub const DURATION_CHOICES: [u32; 5] = [15, 30, 60, 120, 300];

pub const MIN_SUGGESTED_WORDS: u32 = 10;
pub const MAX_SUGGESTED_WORDS: u32 = 500;

/// Which vocabulary backs word generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    LeftHand,
    RightHand,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Normal, Mode::LeftHand, Mode::RightHand];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::LeftHand => "left-hand",
            Mode::RightHand => "right-hand",
        }
    }

    /// Human label, e.g. "left hand".
    pub fn label(self) -> String {
        self.as_str().replace('-', " ")
    }

    pub fn next(self) -> Self {
        match self {
            Mode::Normal => Mode::LeftHand,
            Mode::LeftHand => Mode::RightHand,
            Mode::RightHand => Mode::Normal,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Mode::Normal => Mode::RightHand,
            Mode::LeftHand => Mode::Normal,
            Mode::RightHand => Mode::LeftHand,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Mode::Normal),
            "left-hand" | "left_hand" | "lefthand" => Ok(Mode::LeftHand),
            "right-hand" | "right_hand" | "righthand" => Ok(Mode::RightHand),
            _ => Err(SettingsError::InvalidMode(s.to_string())),
        }
    }
}

/// What ends a session: a countdown or a word quota.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TestType {
    #[default]
    Time,
    Words,
}

impl TestType {
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Time => "time",
            TestType::Words => "words",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TestType::Time => TestType::Words,
            TestType::Words => TestType::Time,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TestType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(TestType::Time),
            "words" => Ok(TestType::Words),
            _ => Err(SettingsError::InvalidTestType(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub test_type: TestType,
    pub duration_secs: u32,
    pub word_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            test_type: TestType::Time,
            duration_secs: 30,
            word_count: 50,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.duration_secs == 0 {
            return Err(SettingsError::ZeroDuration);
        }
        if self.word_count == 0 {
            return Err(SettingsError::ZeroWordCount);
        }
        Ok(())
    }

    /// Number of words generated for one session.
    pub fn sequence_len(&self) -> usize {
        match self.test_type {
            TestType::Time => TIMED_SEQUENCE_LEN,
            TestType::Words => self.word_count as usize,
        }
    }

    /// Describes how the settings stray from the ranges the settings panel offers.
    pub fn unusual_values(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.test_type == TestType::Time && !DURATION_CHOICES.contains(&self.duration_secs) {
            notes.push(format!(
                "duration {}s is not one of {DURATION_CHOICES:?}",
                self.duration_secs
            ));
        }
        if self.test_type == TestType::Words
            && !(MIN_SUGGESTED_WORDS..=MAX_SUGGESTED_WORDS).contains(&self.word_count)
        {
            notes.push(format!(
                "word count {} is outside {MIN_SUGGESTED_WORDS}..={MAX_SUGGESTED_WORDS}",
                self.word_count
            ));
        }
        notes
    }

    /// "30s" or "50 words", whichever limit applies.
    pub fn limit_label(&self) -> String {
        match self.test_type {
            TestType::Time => format!("{}s", self.duration_secs),
            TestType::Words => format!("{} words", self.word_count),
        }
    }
}
