//! Reserved-character tables shared by the encoder and decoder.
//!
//! Frozen at first use and never mutated again, the same role
//! `lexeme::Pattern`'s compiled `Regex` plays for a single lexeme, scaled up
//! to a single process-wide table since `Symbols` is the one truly global
//! configuration surface the codec has.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Opens a typed token: `:` constant, `$` back-reference, `&` string,
/// `#` number, `%` bigint.
pub const SIGILS: [char; 5] = [':', '$', '&', '#', '%'];

/// Opens or closes a composite: arrays and objects.
pub const DELIMITERS: [char; 4] = ['[', ']', '{', '}'];

pub static ESCAPING_SET: Lazy<HashSet<char>> = Lazy::new(|| {
    let mut set: HashSet<char> = SIGILS.iter().chain(DELIMITERS.iter()).copied().collect();
    set.extend(['\\', '\u{0}', '\t', '\n', '\r']);
    set
});

static RESERVED: Lazy<HashSet<char>> = Lazy::new(|| {
    SIGILS.iter().chain(DELIMITERS.iter()).copied().collect()
});

/// Whether `c` must be backslash-escaped inside a string literal body.
pub fn needs_escape(c: char) -> bool {
    ESCAPING_SET.contains(&c)
}

/// Whether `c` ends a leaf token: any reserved character, NUL, or one of
/// the delimiter/sigil characters already covered by [`RESERVED`].
pub fn is_token_terminator(c: char) -> bool {
    c == '\u{0}' || RESERVED.contains(&c)
}
