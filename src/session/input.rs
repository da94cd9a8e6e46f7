/// How a submitted word compares with its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WordScore {
    pub typed_chars: usize,
    pub correct_chars: usize,
    pub exact: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordOutcome {
    Correct,
    Incorrect,
}

/// Returns the word being submitted when `text` ends with a space and
/// has something other than whitespace in it.
pub fn submitted_word(text: &str) -> Option<&str> {
    if !text.ends_with(' ') {
        return None;
    }
    let typed = text.trim();
    (!typed.is_empty()).then_some(typed)
}

/// Exact matches earn every character. Otherwise only positions inside the
/// shorter of the two words that hold the same character count.
pub fn score_word(typed: &str, target: &str) -> WordScore {
    let typed_chars = typed.chars().count();

    if typed == target {
        return WordScore {
            typed_chars,
            correct_chars: typed_chars,
            exact: true,
        };
    }

    let correct_chars = typed
        .chars()
        .zip(target.chars())
        .filter(|(t, e)| t == e)
        .count();

    WordScore {
        typed_chars,
        correct_chars,
        exact: false,
    }
}
