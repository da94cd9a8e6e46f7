use std::collections::HashMap;

use rust_embed::Embed;
use tracing::warn;

use crate::error::{Result, SessionError};
use crate::session::settings::Mode;

#[derive(Embed)]
#[folder = "assets/words/"]
struct WordAssets;

/// The static vocabulary for every mode. Each list is guaranteed non-empty.
#[derive(Clone, Debug)]
pub struct WordBank {
    lists: HashMap<Mode, Vec<String>>,
}

impl WordBank {
    /// Loads the bundled word lists.
    pub fn load() -> Result<Self> {
        let lists = Mode::ALL
            .iter()
            .map(|&mode| (mode, Self::bundled_list(mode)))
            .collect::<Vec<_>>();
        Self::from_lists(lists)
    }

    /// Builds a bank from explicit lists; every mode must be present and non-empty.
    pub fn from_lists<I>(lists: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Mode, Vec<String>)>,
    {
        let lists: HashMap<Mode, Vec<String>> = lists
            .into_iter()
            .map(|(mode, words)| {
                let words = words
                    .into_iter()
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect();
                (mode, words)
            })
            .collect();

        for mode in Mode::ALL {
            if lists.get(&mode).is_none_or(|words| words.is_empty()) {
                return Err(SessionError::EmptyWordList { mode });
            }
        }

        Ok(Self { lists })
    }

    pub fn words(&self, mode: Mode) -> &[String] {
        self.lists.get(&mode).map(Vec::as_slice).unwrap_or_default()
    }

    fn bundled_list(mode: Mode) -> Vec<String> {
        let filename = format!("{}.json", mode.as_str());
        match WordAssets::get(&filename) {
            Some(file) => parse_list(mode, file.data.as_ref()),
            None => {
                warn!(%mode, file = %filename, "bundled word list is missing");
                Vec::new()
            }
        }
    }
}

/// Decodes a JSON array of words. A malformed list is logged and treated as empty.
fn parse_list(mode: Mode, bytes: &[u8]) -> Vec<String> {
    match serde_json::from_slice::<Vec<String>>(bytes) {
        Ok(words) => words,
        Err(err) => {
            warn!(%mode, %err, "bundled word list is not a JSON array of strings");
            Vec::new()
        }
    }
}
