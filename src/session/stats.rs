use std::time::Duration;

/// Characters per word when converting to words-per-minute.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Elapsed time never counts as less than one second.
const MIN_ELAPSED_MINUTES: f64 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DerivedStats {
    pub wpm: u32,
    /// Percentage, 0..=100.
    pub accuracy: u8,
}

impl DerivedStats {
    pub fn compute(correct_chars: usize, total_chars: usize, elapsed: Option<Duration>) -> Self {
        Self {
            wpm: wpm(correct_chars, elapsed),
            accuracy: accuracy(correct_chars, total_chars),
        }
    }
}

pub fn accuracy(correct_chars: usize, total_chars: usize) -> u8 {
    if total_chars == 0 {
        return 100;
    }
    let pct = (correct_chars as f64 / total_chars as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// `None` means the clock never started.
pub fn wpm(correct_chars: usize, elapsed: Option<Duration>) -> u32 {
    let Some(elapsed) = elapsed else {
        return 0;
    };
    let minutes = (elapsed.as_secs_f64() / 60.0).max(MIN_ELAPSED_MINUTES);
    ((correct_chars as f64 / CHARS_PER_WORD) / minutes).round() as u32
}
