use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, SessionError};
use crate::generator::WordSource;
use crate::generator::dictionary::WordBank;
use crate::session::settings::Mode;

/// Draws words uniformly at random, with replacement, from a [`WordBank`].
pub struct RandomWordSource {
    bank: WordBank,
    rng: SmallRng,
}

impl RandomWordSource {
    pub fn new(bank: WordBank) -> Self {
        Self {
            bank,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(bank: WordBank, seed: u64) -> Self {
        Self {
            bank,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn bank(&self) -> &WordBank {
        &self.bank
    }
}

impl WordSource for RandomWordSource {
    fn generate(&mut self, mode: Mode, count: usize) -> Result<Vec<String>> {
        let list = self.bank.words(mode);
        if list.is_empty() {
            return Err(SessionError::EmptyWordList { mode });
        }

        Ok((0..count)
            .map(|_| list[self.rng.gen_range(0..list.len())].clone())
            .collect())
    }
}
