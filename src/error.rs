use crate::TsionError;
use std::fmt::{Display, Formatter};

impl TsionError {
    pub fn new(pointer: usize, message: String) -> Self {
        Self { pointer, message }
    }
}

impl Display for TsionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DecodeError: {}", self.message)
    }
}

impl std::error::Error for TsionError {}

/// Truncates a token body for an error message, to at most 12 characters,
/// appending an ellipsis when anything was cut.
pub fn elide(token: &str) -> String {
    let mut chars = token.chars();
    let head: String = chars.by_ref().take(12).collect();

    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaves_short_tokens_untouched() {
        assert_eq!(elide("abc"), "abc");
    }

    #[test]
    fn truncates_long_tokens_with_ellipsis() {
        assert_eq!(elide("abcdefghijklmnop"), "abcdefghijkl...");
    }
}
