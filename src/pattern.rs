//! Pattern compiler.
//!
//! Compiles a pattern source into a sequence of editable and literal
//! positions, and formats raw character runs against it.

use crate::MaskError;
use crate::format::{ESCAPE_CHAR, FormatCharacter, FormatCharacters};
use std::cmp::min;
use std::fmt;
use std::fmt::{Debug, Formatter};

/// One resolved position of a compiled pattern.
#[derive(Clone, Copy, PartialEq, Eq)]
enum PatternChar {
    /// Bound to a format token. Holds the token character itself.
    Editable { token: char, fmt: FormatCharacter },
    /// Fixed character, not editable.
    Literal(char),
}

impl Debug for PatternChar {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PatternChar::Editable { token, .. } => write!(f, "{}", token),
            PatternChar::Literal(c) => write!(f, "{:?}", c),
        }
    }
}

/// Compiled input pattern.
///
/// Immutable once compiled; the owning mask replaces it wholesale on a
/// pattern change. Each editable position carries its resolved
/// [FormatCharacter], so validation is a direct lookup per keystroke.
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    positions: Vec<PatternChar>,
    first_edit: usize,
    last_edit: usize,
    placeholder_char: char,
    revealing_mask: bool,
}

impl Debug for Pattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pattern {:?} edit {}-{}{}",
            self.source,
            self.first_edit,
            self.last_edit,
            if self.revealing_mask { " revealing" } else { "" }
        )
    }
}

impl Pattern {
    /// Compile a pattern source.
    ///
    /// A single left-to-right scan. The escape character takes the next
    /// source character verbatim as a literal, characters found in the
    /// vocabulary become editable positions, everything else is a literal.
    pub fn compile(
        source: &str,
        format_characters: &FormatCharacters,
        placeholder_char: char,
        revealing_mask: bool,
    ) -> Result<Pattern, MaskError> {
        let mut positions = Vec::new();
        let mut first_edit = None;
        let mut last_edit = 0;

        let mut chars = source.chars();
        while let Some(c) = chars.next() {
            if c == ESCAPE_CHAR {
                let Some(lit) = chars.next() else {
                    return Err(MaskError::DanglingEscape(source.into()));
                };
                positions.push(PatternChar::Literal(lit));
            } else if let Some(fmt) = format_characters.get(&c) {
                if first_edit.is_none() {
                    first_edit = Some(positions.len());
                }
                last_edit = positions.len();
                positions.push(PatternChar::Editable { token: c, fmt: *fmt });
            } else {
                positions.push(PatternChar::Literal(c));
            }
        }

        let Some(first_edit) = first_edit else {
            return Err(MaskError::NoEditablePosition(source.into()));
        };

        Ok(Pattern {
            source: source.into(),
            positions,
            first_edit,
            last_edit,
            placeholder_char,
            revealing_mask,
        })
    }

    /// The pattern source string, escapes included.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Pattern length after escape processing. Doubles as the maximum
    /// content length of the masked field.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Placeholder for empty editable positions.
    pub fn placeholder_char(&self) -> char {
        self.placeholder_char
    }

    /// Does this mask always show the full literal skeleton?
    pub fn is_revealing_mask(&self) -> bool {
        self.revealing_mask
    }

    /// Index of the first editable position.
    pub fn first_editable_index(&self) -> usize {
        self.first_edit
    }

    /// Index of the last editable position.
    pub fn last_editable_index(&self) -> usize {
        self.last_edit
    }

    /// Is the position editable?
    pub fn is_editable_index(&self, index: usize) -> bool {
        matches!(self.positions.get(index), Some(PatternChar::Editable { .. }))
    }

    /// Resolved pattern character at the position. For editable positions
    /// this is the format token, for literals the literal itself.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.positions.get(index).map(|p| match p {
            PatternChar::Editable { token, .. } => *token,
            PatternChar::Literal(c) => *c,
        })
    }

    /// Would the character be accepted at the position?
    /// Always false for literal positions.
    pub fn is_valid_at(&self, c: char, index: usize) -> bool {
        match self.positions.get(index) {
            Some(PatternChar::Editable { fmt, .. }) => fmt.validate(c),
            _ => false,
        }
    }

    /// Transformed form of the character at the position.
    pub fn transform_at(&self, c: char, index: usize) -> char {
        match self.positions.get(index) {
            Some(PatternChar::Editable { fmt, .. }) => fmt.transform(c),
            _ => c,
        }
    }

    /// Format a run of desired characters into a full-length buffer.
    ///
    /// Candidates are consumed left to right. A candidate equal to a
    /// literal is absorbed silently, so separators embedded in raw text
    /// don't consume an editable slot. On the first missing or rejected
    /// candidate a non-revealing mask stops consuming entirely and
    /// placeholder-fills the rest; a revealing mask skips that one
    /// candidate and keeps filling, so the literal skeleton stays intact.
    pub fn format_value(&self, value: &[char]) -> Vec<char> {
        let mut buf = Vec::with_capacity(self.positions.len());
        let mut vi = 0;
        let mut filling = true;

        for pos in &self.positions {
            match pos {
                PatternChar::Editable { fmt, .. } => {
                    if filling && vi < value.len() && fmt.validate(value[vi]) {
                        buf.push(fmt.transform(value[vi]));
                        vi += 1;
                    } else if self.revealing_mask {
                        buf.push(self.placeholder_char);
                        if vi < value.len() {
                            vi += 1;
                        }
                    } else {
                        buf.push(self.placeholder_char);
                        filling = false;
                    }
                }
                PatternChar::Literal(c) => {
                    buf.push(*c);
                    if filling && vi < value.len() && value[vi] == *c {
                        vi += 1;
                    }
                }
            }
        }

        buf
    }

    /// First editable index strictly before the position, or 0.
    pub fn find_editable_index_before(&self, index: usize) -> usize {
        (0..min(index, self.len()))
            .rev()
            .find(|&i| self.is_editable_index(i))
            .unwrap_or(0)
    }
}
