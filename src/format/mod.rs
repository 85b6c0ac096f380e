//! Masked Field Formatting - Raw input to display slots.
//!
//! Turns a digit-limited raw string into a fixed-length sequence of
//! display slots: typed characters chunked by separator positions, the
//! remainder padded with a placeholder or the empty character. The slot
//! sequence is what both visual surfaces render from.
//!
//! # Example
//!
//! ```ignore
//! use cardflip::format::FieldSpec;
//!
//! let spec = FieldSpec::card_number();
//! let slots = spec.format("41111");
//! // 4 1 1 1 _ 1 x x x _ x x x x _ x x x x   (19 slots, _ = separator)
//! ```

pub mod date;

use crate::types::{DisplaySlot, SlotFlags};

/// Mask character shown for typed input in secure mode.
const MASK_CHAR: char = '•';

/// Fallback separator when the configured one is unusable.
const DEFAULT_SEPARATOR: char = ' ';

/// Fallback empty character when the configured one is unusable.
const DEFAULT_EMPTY_CHAR: char = 'x';

// =============================================================================
// Field Spec
// =============================================================================

/// Formatting configuration for one field.
///
/// Built once at widget construction; not runtime-mutable contract.
/// A `limit` of 0 means unlimited input with no fixed slot grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Maximum unformatted length (0 = unlimited).
    pub limit: usize,
    /// Chunk sizes for separator insertion, e.g. `[4, 4, 4, 4]`.
    pub chunk_lengths: Vec<usize>,
    /// Chunk separator. Must resolve to a single non-digit character;
    /// anything else falls back to `' '`.
    pub separator: String,
    /// Padding for empty slots. Must resolve to a single non-digit
    /// character; anything else falls back to `'x'`.
    pub empty_char: String,
    /// Placeholder string shown instead of empty-character padding.
    pub placeholder: Option<String>,
    /// Mask typed characters with a bullet.
    pub secure: bool,
    /// Run date validation on this field at end of editing.
    pub validates_date: bool,
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self {
            limit: 0,
            chunk_lengths: Vec::new(),
            separator: DEFAULT_SEPARATOR.to_string(),
            empty_char: DEFAULT_EMPTY_CHAR.to_string(),
            placeholder: None,
            secure: false,
            validates_date: false,
        }
    }
}

impl FieldSpec {
    /// Card number: 16 digits in four chunks.
    pub fn card_number() -> Self {
        Self {
            limit: 16,
            chunk_lengths: vec![4, 4, 4, 4],
            ..Self::default()
        }
    }

    /// Cardholder name: unlimited free text.
    pub fn cardholder_name() -> Self {
        Self::default()
    }

    /// Validity date: MM/YY with blur-time validation.
    pub fn validity_date() -> Self {
        Self {
            limit: 4,
            chunk_lengths: vec![2, 2],
            separator: "/".to_string(),
            placeholder: Some("MM/YY".to_string()),
            validates_date: true,
            ..Self::default()
        }
    }

    /// CVV: 3 digits.
    pub fn cvv() -> Self {
        Self {
            limit: 3,
            ..Self::default()
        }
    }

    // =========================================================================
    // Configuration Safety
    // =========================================================================

    /// Separator that is guaranteed usable: one char, not a digit.
    pub fn safe_separator(&self) -> char {
        single_non_digit(&self.separator).unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Empty character that is guaranteed usable: one char, not a digit.
    pub fn safe_empty_char(&self) -> char {
        single_non_digit(&self.empty_char).unwrap_or(DEFAULT_EMPTY_CHAR)
    }

    /// Chunk lengths with trailing chunks dropped until they fit the limit.
    fn sanitized_chunks(&self) -> Vec<usize> {
        let mut chunks = self.chunk_lengths.clone();
        while chunks.iter().sum::<usize>() > self.limit {
            chunks.pop();
        }
        chunks
    }

    /// Cumulative separator insertion points. Each chunk boundary is
    /// offset by the separators inserted before it: `[4, 4, 4, 4]`
    /// becomes `[4, 9, 14, 19]`.
    fn insertion_points(&self) -> Vec<usize> {
        let chunks = self.sanitized_chunks();
        let mut points = Vec::with_capacity(chunks.len());
        let mut sum = 0;
        for (i, len) in chunks.iter().enumerate() {
            sum += len;
            points.push(sum + i);
        }
        points
    }

    /// Number of display slots: room for the limit plus inserted
    /// separators. Zero for unlimited fields (slots follow the text).
    pub fn slot_count(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.limit + self.sanitized_chunks().len().max(1) - 1
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Edit-time filter: a candidate replacement is accepted only when
    /// its unformatted length fits the limit.
    pub fn accepts(&self, candidate: &str) -> bool {
        self.limit == 0 || self.unformat(candidate).chars().count() <= self.limit
    }

    /// Strip separators, leaving the raw value.
    pub fn unformat(&self, text: &str) -> String {
        let sep = self.safe_separator();
        text.chars().filter(|&ch| ch != sep).collect()
    }

    /// The separator-expanded display text for a raw value.
    pub fn formatted_text(&self, raw: &str) -> String {
        self.expand(raw).into_iter().collect()
    }

    /// Working copy of the raw value with separators inserted at every
    /// insertion point that falls inside the current text.
    fn expand(&self, raw: &str) -> Vec<char> {
        let sep = self.safe_separator();
        let mut work: Vec<char> = raw.chars().collect();
        if self.limit > 0 {
            work.truncate(self.limit);
        }
        for &point in &self.insertion_points() {
            if point < work.len() {
                work.insert(point, sep);
            }
        }
        work
    }

    // =========================================================================
    // Slot Rendering
    // =========================================================================

    /// Render the raw value into the fixed slot sequence.
    ///
    /// Slots inside the (separator-expanded) text are filled, masked in
    /// secure mode. Slots beyond it show the placeholder when one is
    /// configured, otherwise the separator at insertion points and the
    /// empty character everywhere else.
    pub fn format(&self, raw: &str) -> Vec<DisplaySlot> {
        let sep = self.safe_separator();
        let empty = self.safe_empty_char();
        let points = self.insertion_points();
        let work = self.expand(raw);

        if self.limit == 0 {
            // Unlimited fields have no grid to pad; show the text, or the
            // placeholder when there is nothing yet.
            if work.is_empty() {
                if let Some(ph) = &self.placeholder {
                    return ph
                        .chars()
                        .map(|ch| DisplaySlot::empty(ch, SlotFlags::PLACEHOLDER))
                        .collect();
                }
                return Vec::new();
            }
            return work
                .iter()
                .map(|&ch| {
                    if self.secure {
                        DisplaySlot::filled(MASK_CHAR, true)
                    } else {
                        DisplaySlot::filled(ch, false)
                    }
                })
                .collect();
        }

        let placeholder: Option<Vec<char>> = self.placeholder.as_ref().map(|p| p.chars().collect());
        let mut slots = Vec::with_capacity(self.slot_count());
        for i in 0..self.slot_count() {
            if i < work.len() {
                let mut slot = if self.secure {
                    DisplaySlot::filled(MASK_CHAR, true)
                } else {
                    DisplaySlot::filled(work[i], false)
                };
                if !self.secure && points.contains(&i) {
                    slot.flags |= SlotFlags::SEPARATOR;
                }
                slots.push(slot);
            } else if let Some(ph) = &placeholder {
                let ch = ph.get(i).copied().unwrap_or(' ');
                slots.push(DisplaySlot::empty(ch, SlotFlags::PLACEHOLDER));
            } else if points.contains(&i) {
                slots.push(DisplaySlot::empty(sep, SlotFlags::SEPARATOR));
            } else {
                slots.push(DisplaySlot::empty(empty, SlotFlags::PLACEHOLDER));
            }
        }
        slots
    }
}

/// The single non-digit character of `value`, if that is what it is.
fn single_non_digit(value: &str) -> Option<char> {
    let mut chars = value.chars();
    let ch = chars.next()?;
    if chars.next().is_some() || ch.is_ascii_digit() {
        return None;
    }
    Some(ch)
}

// =============================================================================
// Tests
// =============================================================================
