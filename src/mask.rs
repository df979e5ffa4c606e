//! Mask editing engine.
//!
//! Owns the edit buffer, the selection and the undo history for one
//! masked field, and applies input, backspace and paste against the
//! compiled pattern. Purely in-memory, single-threaded, no rendering.

use crate::format::{DEFAULT_PLACEHOLDER_CHAR, FormatCharacter, FormatCharacters};
use crate::pattern::Pattern;
use crate::{MaskError, Selection, merge_format_characters};
#[allow(unused_imports)]
use log::debug;
use rustc_hash::FxHashMap;
use std::cmp::{max, min};

/// Coalescing-relevant edit operations.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EditOp {
    Input,
    Backspace,
}

impl std::fmt::Debug for EditOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditOp::Input => write!(f, "input"),
            EditOp::Backspace => write!(f, "backspace"),
        }
    }
}

/// One undo step. Owned snapshot, pushes deep-copy the state so later
/// in-place edits can't corrupt stored entries.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    value: String,
    selection: Selection,
    last_op: Option<EditOp>,
    /// Bridge entry capturing the live state when undoing starts,
    /// so redo can return exactly there. Dropped again when redo
    /// reaches the head.
    start_undo: bool,
}

/// Options for [InputMask::new].
#[derive(Debug, Clone, Default)]
pub struct MaskOptions {
    /// Initial raw value.
    pub value: String,
    /// Overrides for the default vocabulary. `None` removes a token.
    pub format_characters: FxHashMap<char, Option<FormatCharacter>>,
    /// Placeholder for empty editable positions, zero or one characters.
    /// Empty keeps the default `_`.
    pub placeholder_char: String,
    /// Always show the full literal skeleton.
    pub revealing_mask: bool,
    /// Initial selection.
    pub selection: Selection,
}

/// Options for [InputMask::set_pattern].
#[derive(Debug, Clone, Default)]
pub struct PatternOptions {
    /// Raw value to reformat against the new pattern.
    pub value: String,
    /// Selection to adopt.
    pub selection: Selection,
    /// Always show the full literal skeleton.
    pub revealing_mask: bool,
}

/// Editing engine for one masked field.
///
/// The caller feeds discrete edit operations and reads back value and
/// selection. All edit operations return whether any state changed;
/// rejected input is an expected outcome, not an error.
#[derive(Debug, Clone)]
pub struct InputMask {
    pattern: Pattern,
    // kept for pattern changes
    format_characters: FormatCharacters,
    placeholder_char: char,

    // one slot per pattern position. may be shorter than the pattern
    // after a non-revealing backspace truncated it.
    value: Vec<char>,
    selection: Selection,
    empty_value: String,

    history: Vec<HistoryEntry>,
    history_idx: Option<usize>,
    last_op: Option<EditOp>,
    last_selection: Option<Selection>,
}

impl InputMask {
    /// New mask for the pattern.
    ///
    /// Fails if the pattern has no editable position or a dangling
    /// escape, or if the placeholder option is more than one character.
    pub fn new(pattern: &str, options: MaskOptions) -> Result<InputMask, MaskError> {
        let mut it = options.placeholder_char.chars();
        let placeholder_char = match (it.next(), it.next()) {
            (None, _) => DEFAULT_PLACEHOLDER_CHAR,
            (Some(c), None) => c,
            _ => return Err(MaskError::InvalidPlaceholder(options.placeholder_char)),
        };

        let format_characters = merge_format_characters(options.format_characters);
        let pattern = Pattern::compile(
            pattern,
            &format_characters,
            placeholder_char,
            options.revealing_mask,
        )?;

        let mut mask = InputMask {
            pattern,
            format_characters,
            placeholder_char,
            value: Vec::new(),
            selection: Selection::default(),
            empty_value: String::new(),
            history: Vec::new(),
            history_idx: None,
            last_op: None,
            last_selection: None,
        };
        mask.set_value(&options.value);
        mask.empty_value = mask.pattern.format_value(&[]).iter().collect();
        mask.selection = options.selection;
        mask.reset_history();

        Ok(mask)
    }

    /// Replace the pattern.
    ///
    /// Recompiles, reformats the given raw value, recomputes the empty
    /// template and resets the history. Undo steps are pattern-scoped,
    /// they don't survive a pattern change. On error the mask is left
    /// unchanged.
    pub fn set_pattern(&mut self, source: &str, options: PatternOptions) -> Result<(), MaskError> {
        let pattern = Pattern::compile(
            source,
            &self.format_characters,
            self.placeholder_char,
            options.revealing_mask,
        )?;
        self.pattern = pattern;
        self.set_value(&options.value);
        self.empty_value = self.pattern.format_value(&[]).iter().collect();
        self.selection = options.selection;
        self.reset_history();
        Ok(())
    }

    /// Replace the value wholesale.
    ///
    /// Low-level primitive: touches neither selection nor history.
    pub fn set_value(&mut self, value: &str) {
        let chars: Vec<char> = value.chars().collect();
        self.value = self.pattern.format_value(&chars);
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Current selection.
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Placeholder for empty editable positions.
    pub fn placeholder_char(&self) -> char {
        self.placeholder_char
    }

    /// The fully-placeholder rendering of the pattern. Useful as a
    /// display hint, and as the "no user input yet" reference.
    pub fn empty_value(&self) -> &str {
        &self.empty_value
    }

    /// Is the value still the empty template?
    pub fn is_empty(&self) -> bool {
        self.value() == self.empty_value
    }

    /// The displayed (masked) value.
    ///
    /// A revealing mask re-derives the buffer from the raw content at
    /// read time, so it always reflects the full skeleton.
    pub fn value(&self) -> String {
        if self.pattern.is_revealing_mask() {
            self.pattern.format_value(&self.raw_chars()).iter().collect()
        } else {
            self.value.iter().collect()
        }
    }

    /// The raw (unmasked) value: the characters at editable positions.
    pub fn raw_value(&self) -> String {
        self.raw_chars().iter().collect()
    }

    fn raw_chars(&self) -> Vec<char> {
        self.value
            .iter()
            .enumerate()
            .filter(|(i, _)| self.pattern.is_editable_index(*i))
            .map(|(_, c)| *c)
            .collect()
    }

    // Like value(), but refreshes the buffer of a revealing mask in
    // place first.
    fn refresh_value(&mut self) -> String {
        if self.pattern.is_revealing_mask() {
            let raw = self.raw_chars();
            self.value = self.pattern.format_value(&raw);
        }
        self.value.iter().collect()
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.history_idx = None;
        self.last_op = None;
        self.last_selection = Some(self.selection);
    }

    // Record one undo step, coalescing consecutive same-kind edits at
    // contiguous cursor positions into a single step. Any fresh edit
    // while mid-undo drops the redo tail.
    fn push_history(&mut self, op: EditOp, selection_before: Selection, value_before: String) {
        if let Some(idx) = self.history_idx {
            self.history.truncate(idx);
            self.history_idx = None;
        }

        let coalesce = self.last_op == Some(op)
            && selection_before.is_collapsed()
            && self
                .last_selection
                .map(|last| last.start == selection_before.start)
                .unwrap_or(true);
        if !coalesce {
            self.history.push(HistoryEntry {
                value: value_before,
                selection: selection_before,
                last_op: self.last_op,
                start_undo: false,
            });
        }

        self.last_op = Some(op);
        self.last_selection = Some(self.selection);
    }

    /// Apply a single character of input at the current selection.
    ///
    /// Validates against the editable position under the cursor, blanks
    /// out the rest of a range selection, collapses the cursor behind
    /// the typed character and skips it forward over literals.
    ///
    /// Returns true if value or selection changed.
    pub fn input(&mut self, c: char) -> bool {
        // nothing left to type into
        if self.selection.is_collapsed() && self.selection.start == self.pattern.len() {
            return false;
        }

        let selection_before = self.selection;
        let value_before = self.refresh_value();

        // a cursor before the first editable position types into it
        let input_index = max(self.selection.start, self.pattern.first_editable_index());

        if self.pattern.is_editable_index(input_index) {
            if !self.pattern.is_valid_at(c, input_index) {
                return false;
            }
            let c = self.pattern.transform_at(c, input_index);
            if input_index >= self.value.len() {
                // truncated buffer, extend up to the write position.
                // format_value below repairs any literal slots.
                self.value.resize(input_index + 1, self.placeholder_char);
            }
            self.value[input_index] = c;
        } else {
            // a collapsed cursor may legally rest on a literal boundary,
            // the keystroke moves past it without writing.
            debug!("input index {} is not editable", input_index);
        }

        // typing over a range selection blanks out the remainder
        let mut end = self.selection.end.saturating_sub(1);
        while end > input_index {
            if self.pattern.is_editable_index(end) && end < self.value.len() {
                self.value[end] = self.placeholder_char;
            }
            end -= 1;
        }

        self.selection = Selection::at(input_index + 1);

        self.value = self.pattern.format_value(&self.value);

        // skip over subsequent static characters
        while self.selection.start < self.pattern.len()
            && !self.pattern.is_editable_index(self.selection.start)
        {
            self.selection.start += 1;
            self.selection.end += 1;
        }

        self.push_history(EditOp::Input, selection_before, value_before);
        true
    }

    /// Delete at the current cursor position or selection.
    ///
    /// A collapsed cursor (or one sitting on a literal) first moves back
    /// to the nearest editable position. A revealing mask blanks the
    /// span in place, a non-revealing mask truncates the buffer.
    ///
    /// Returns true if value or selection changed.
    pub fn backspace(&mut self) -> bool {
        if self.selection.start == 0 && self.selection.end == 0 {
            return false;
        }

        let selection_before = self.selection;
        let value_before = self.refresh_value();

        if self.selection.is_collapsed() || !self.pattern.is_editable_index(self.selection.start) {
            self.selection.start = self
                .pattern
                .find_editable_index_before(self.selection.start);
        }
        if self.pattern.is_revealing_mask() {
            let end = min(self.selection.end, self.value.len());
            for i in self.selection.start..end {
                self.value[i] = self.placeholder_char;
            }
        } else {
            self.value.truncate(self.selection.start);
        }
        self.selection.end = self.selection.start;

        self.push_history(EditOp::Backspace, selection_before, value_before);
        true
    }

    /// Paste a string at the current cursor position or over the
    /// current selection.
    ///
    /// Applies the text character by character like typed input, with
    /// whole-operation rollback: one genuinely invalid character leaves
    /// the mask byte-for-byte untouched. Literals of the pattern may
    /// appear verbatim in the pasted text and are absorbed.
    pub fn paste(&mut self, text: &str) -> bool {
        // input() is replayed per character, so keep a full snapshot
        // to roll back to.
        let saved_value = self.value.clone();
        let saved_selection = self.selection;
        let saved_history = self.history.clone();
        let saved_history_idx = self.history_idx;
        let saved_last_op = self.last_op;
        let saved_last_selection = self.last_selection;

        let chars: Vec<char> = text.chars().collect();
        let mut offset = 0;

        // a cursor inside the leading literals requires those literals
        // verbatim as a prefix of the pasted text
        let first = self.pattern.first_editable_index();
        if self.selection.start < first {
            let lead = first - self.selection.start;
            for i in 0..lead {
                if chars.get(i).copied() != self.pattern.char_at(self.selection.start + i) {
                    return false;
                }
            }
            offset = lead;
            self.selection = Selection::at(first);
        }

        for &c in chars.iter().skip(offset) {
            if self.selection.start > self.pattern.last_editable_index() {
                break;
            }
            if !self.input(c) {
                // separators already stepped over by input() may appear
                // in the pasted text, verify and absorb them
                if self.selection.start > 0 {
                    let idx = self.selection.start - 1;
                    if !self.pattern.is_editable_index(idx)
                        && self.pattern.char_at(idx) == Some(c)
                    {
                        continue;
                    }
                }

                debug!("paste rejected at {:?}", c);
                self.value = saved_value;
                self.selection = saved_selection;
                self.history = saved_history;
                self.history_idx = saved_history_idx;
                self.last_op = saved_last_op;
                self.last_selection = saved_last_selection;
                return false;
            }
        }

        true
    }

    /// Step back one undo entry.
    ///
    /// The first undo after fresh edits records the live state as a
    /// bridge entry, so a later redo returns exactly there.
    pub fn undo(&mut self) -> bool {
        if self.history.is_empty() || self.history_idx == Some(0) {
            return false;
        }

        let item = match self.history_idx {
            None => {
                let idx = self.history.len() - 1;
                self.history_idx = Some(idx);

                let value = self.refresh_value();
                let top = self.history[idx].clone();
                if top.value != value || top.selection != self.selection {
                    self.history.push(HistoryEntry {
                        value,
                        selection: self.selection,
                        last_op: self.last_op,
                        start_undo: true,
                    });
                }
                top
            }
            Some(idx) => {
                self.history_idx = Some(idx - 1);
                self.history[idx - 1].clone()
            }
        };

        self.value = item.value.chars().collect();
        self.selection = item.selection;
        self.last_op = item.last_op;
        true
    }

    /// Step forward one undo entry. Only possible while mid-undo.
    pub fn redo(&mut self) -> bool {
        let Some(idx) = self.history_idx else {
            return false;
        };
        let idx = idx + 1;
        if idx >= self.history.len() {
            return false;
        }
        self.history_idx = Some(idx);

        let item = self.history[idx].clone();
        if idx == self.history.len() - 1 {
            // reached the head, back to live editing
            self.history_idx = None;
            if item.start_undo {
                self.history.pop();
            }
        }

        self.value = item.value.chars().collect();
        self.selection = item.selection;
        self.last_op = item.last_op;
        true
    }

    /// Adopt an externally-reported selection.
    ///
    /// A collapsed cursor is clamped to the first editable position and
    /// snapped back to the boundary of already-entered content, so a
    /// click into the field doesn't land in a placeholder gap. Range
    /// selections pass through unchanged.
    ///
    /// Returns true if the cursor was (possibly) adjusted, false for a
    /// range selection.
    pub fn set_selection(&mut self, selection: Selection) -> bool {
        self.selection = selection;

        if self.selection.is_collapsed() {
            let first = self.pattern.first_editable_index();
            if self.selection.start < first {
                self.selection = Selection::at(first);
                return true;
            }

            let mut index = self.selection.start;
            while index >= first {
                if index == first
                    || (self.pattern.is_editable_index(index - 1)
                        && self.value.get(index - 1) != Some(&self.placeholder_char))
                {
                    self.selection = Selection::at(index);
                    break;
                }
                index -= 1;
            }
            return true;
        }
        false
    }
}
