pub mod dictionary;
pub mod random;

pub use dictionary::WordBank;
pub use random::RandomWordSource;

use crate::error::{Result, SessionError};
use crate::session::settings::Mode;

/// Produces the target words for a session.
pub trait WordSource {
    fn generate(&mut self, mode: Mode, count: usize) -> Result<Vec<String>>;
}

/// Replays a fixed script instead of drawing at random.
#[derive(Clone, Debug)]
pub struct ScriptedWordSource {
    script: Vec<String>,
    cycle: bool,
}

impl ScriptedWordSource {
    /// Repeats the script until `count` words have been produced.
    pub fn cycling<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: words.into_iter().map(Into::into).collect(),
            cycle: true,
        }
    }

    /// Returns the script as-is, whatever count was requested.
    pub fn exact<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: words.into_iter().map(Into::into).collect(),
            cycle: false,
        }
    }
}

impl WordSource for ScriptedWordSource {
    fn generate(&mut self, mode: Mode, count: usize) -> Result<Vec<String>> {
        if self.script.is_empty() {
            return Err(SessionError::EmptyWordList { mode });
        }
        if !self.cycle {
            return Ok(self.script.clone());
        }
        Ok(self.script.iter().cycle().take(count).cloned().collect())
    }
}
