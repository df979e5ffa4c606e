#![doc = include_str!("../readme.md")]

use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};

pub mod format;

mod mask;
mod pattern;

pub use format::{
    DEFAULT_PLACEHOLDER_CHAR, ESCAPE_CHAR, FormatCharacter, FormatCharacters,
    default_format_characters, merge_format_characters,
};
pub use mask::{InputMask, MaskOptions, PatternOptions};
pub use pattern::Pattern;

/// Errors raised when compiling a pattern or constructing a mask.
///
/// Edit operations never raise; they report "nothing changed" as `false`.
#[derive(Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The pattern source contains no editable position.
    NoEditablePosition(String),
    /// The pattern source ends with an unescaped escape character.
    DanglingEscape(String),
    /// The placeholder must be zero or one characters.
    InvalidPlaceholder(String),
}

impl Debug for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MaskError::NoEditablePosition(s) => write!(f, "NoEditablePosition({:?})", s),
            MaskError::DanglingEscape(s) => write!(f, "DanglingEscape({:?})", s),
            MaskError::InvalidPlaceholder(s) => write!(f, "InvalidPlaceholder({:?})", s),
        }
    }
}

impl Display for MaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl Error for MaskError {}

/// Selection as start/end offsets into the mask buffer.
///
/// `start == end` is a collapsed cursor. Offsets count pattern positions,
/// `0 <= start <= end <= pattern.len()`.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// New selection.
    pub const fn new(start: usize, end: usize) -> Selection {
        Selection { start, end }
    }

    /// Collapsed cursor at the given position.
    pub const fn at(pos: usize) -> Selection {
        Selection {
            start: pos,
            end: pos,
        }
    }

    /// Cursor without a selected range.
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

impl Debug for Selection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

impl From<(usize, usize)> for Selection {
    fn from(value: (usize, usize)) -> Self {
        Selection {
            start: value.0,
            end: value.1,
        }
    }
}
