//! Format tokens: the vocabulary of editable pattern characters.
//!
//! A [FormatCharacter] binds a token to a validator and an optional
//! transform. The default vocabulary can be extended, overridden or
//! reduced per mask with [merge_format_characters].

use rustc_hash::FxHashMap;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// Escape character for pattern sources.
pub const ESCAPE_CHAR: char = '\\';

/// Default placeholder shown at empty editable positions.
pub const DEFAULT_PLACEHOLDER_CHAR: char = '_';

/// Validator and optional transform for one format token.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FormatCharacter {
    pub validate: fn(char) -> bool,
    pub transform: Option<fn(char) -> char>,
}

impl FormatCharacter {
    /// Token that accepts what the validator accepts, stored as typed.
    pub fn new(validate: fn(char) -> bool) -> FormatCharacter {
        FormatCharacter {
            validate,
            transform: None,
        }
    }

    /// Token with a transform applied to every accepted character.
    pub fn with_transform(validate: fn(char) -> bool, transform: fn(char) -> char) -> FormatCharacter {
        FormatCharacter {
            validate,
            transform: Some(transform),
        }
    }

    pub(crate) fn validate(&self, c: char) -> bool {
        (self.validate)(c)
    }

    pub(crate) fn transform(&self, c: char) -> char {
        match self.transform {
            Some(transform) => transform(c),
            None => c,
        }
    }
}

impl Debug for FormatCharacter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.transform.is_some() {
            write!(f, "FormatCharacter(validate+transform)")
        } else {
            write!(f, "FormatCharacter(validate)")
        }
    }
}

/// Token vocabulary usable in patterns.
pub type FormatCharacters = FxHashMap<char, FormatCharacter>;

fn validate_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn validate_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn validate_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn transform_uppercase(c: char) -> char {
    c.to_ascii_uppercase()
}

/// The built-in vocabulary.
///
/// * `0`, `1`: digit
/// * `a`: letter
/// * `A`: letter, stored uppercase
/// * `*`: letter or digit
/// * `#`: letter or digit, stored uppercase
pub fn default_format_characters() -> FormatCharacters {
    let mut map = FormatCharacters::default();
    map.insert('0', FormatCharacter::new(validate_digit));
    map.insert('1', FormatCharacter::new(validate_digit));
    map.insert('a', FormatCharacter::new(validate_letter));
    map.insert(
        'A',
        FormatCharacter::with_transform(validate_letter, transform_uppercase),
    );
    map.insert('*', FormatCharacter::new(validate_alphanumeric));
    map.insert(
        '#',
        FormatCharacter::with_transform(validate_alphanumeric, transform_uppercase),
    );
    map
}

/// Merge caller overrides into the default vocabulary.
///
/// A `Some` value adds or replaces the token, a `None` value removes it
/// and turns the character into a plain separator.
pub fn merge_format_characters(
    overrides: FxHashMap<char, Option<FormatCharacter>>,
) -> FormatCharacters {
    let mut merged = default_format_characters();
    for (token, fmt) in overrides {
        match fmt {
            Some(fmt) => {
                merged.insert(token, fmt);
            }
            None => {
                merged.remove(&token);
            }
        }
    }
    merged
}
