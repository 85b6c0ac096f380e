//! Core types for cardflip.
//!
//! These types define the foundation that everything builds on.
//! They flow between the formatting core, the focus flow and the two
//! visual surfaces (card view + form view) hosting the widget.

// =============================================================================
// Field Type
// =============================================================================

/// The editable fields of the card, plus `None` for "editing finished".
///
/// The declaration order is the tab order: `next()`/`previous()` on the
/// focus flow walk it, and it also defines which face of the card hosts
/// each field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum FieldType {
    #[default]
    CardNumber = 0,
    CardholderName = 1,
    ValidityDate = 2,
    Cvv = 3,
    /// No field selected (editing finished).
    None = 4,
}

/// Editable fields in tab order. `FieldType::None` is deliberately absent:
/// it is a terminal state, not a tab stop.
pub const FIELD_ORDER: [FieldType; 4] = [
    FieldType::CardNumber,
    FieldType::CardholderName,
    FieldType::ValidityDate,
    FieldType::Cvv,
];

impl FieldType {
    /// Position in the tab order (`None` has no position).
    pub fn order_index(self) -> Option<usize> {
        FIELD_ORDER.iter().position(|&f| f == self)
    }

    /// The card face hosting this field (`None` lives on neither).
    pub fn face(self) -> Option<CardFace> {
        match self {
            FieldType::CardNumber | FieldType::CardholderName | FieldType::ValidityDate => {
                Some(CardFace::Front)
            }
            FieldType::Cvv => Some(CardFace::Back),
            FieldType::None => None,
        }
    }

    /// Whether the field takes digits only (decimal keyboard on touch
    /// hosts, digit filter in the key adapter).
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            FieldType::CardNumber | FieldType::ValidityDate | FieldType::Cvv
        )
    }
}

// =============================================================================
// Card Face
// =============================================================================

/// One of the two sides of the card visual.
///
/// Front hosts number, cardholder name and validity date; back hosts the
/// CVV. Transitions that change the showing face trigger a flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardFace {
    #[default]
    Front,
    Back,
}

impl CardFace {
    /// The other side.
    pub fn opposite(self) -> CardFace {
        match self {
            CardFace::Front => CardFace::Back,
            CardFace::Back => CardFace::Front,
        }
    }
}

// =============================================================================
// Slot Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Per-slot presentation flags as a bitfield.
    ///
    /// Combine with bitwise OR: `SlotFlags::FILLED | SlotFlags::MASKED`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SlotFlags: u8 {
        const NONE = 0;
        /// Slot shows a typed character (full emphasis).
        const FILLED = 1 << 0;
        /// Slot shows the chunk separator.
        const SEPARATOR = 1 << 1;
        /// Slot shows placeholder/empty-character padding.
        const PLACEHOLDER = 1 << 2;
        /// Typed character replaced by a bullet (secure mode).
        const MASKED = 1 << 3;
    }
}

// =============================================================================
// Display Slot - The atomic unit of field display
// =============================================================================

/// A single fixed-position display cell of a formatted field.
///
/// This is what the view layer deals with. Nothing more complex: a
/// character plus flags telling the view how to style it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySlot {
    /// The character to show.
    pub ch: char,
    /// Presentation flags (filled, separator, placeholder, masked).
    pub flags: SlotFlags,
}

impl DisplaySlot {
    /// A filled slot showing a typed (or masked) character.
    pub fn filled(ch: char, masked: bool) -> Self {
        let flags = if masked {
            SlotFlags::FILLED | SlotFlags::MASKED
        } else {
            SlotFlags::FILLED
        };
        Self { ch, flags }
    }

    /// An empty slot showing separator or placeholder padding.
    pub fn empty(ch: char, flags: SlotFlags) -> Self {
        Self { ch, flags }
    }

    /// Whether the slot shows typed input.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.flags.contains(SlotFlags::FILLED)
    }

    /// Presentation hint: empty slots render at reduced emphasis.
    #[inline]
    pub fn is_dim(&self) -> bool {
        !self.is_filled()
    }
}

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by subscriptions.
///
/// Call this to unsubscribe and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order() {
        assert_eq!(FieldType::CardNumber.order_index(), Some(0));
        assert_eq!(FieldType::CardholderName.order_index(), Some(1));
        assert_eq!(FieldType::ValidityDate.order_index(), Some(2));
        assert_eq!(FieldType::Cvv.order_index(), Some(3));
        assert_eq!(FieldType::None.order_index(), None);
    }

    #[test]
    fn test_field_faces() {
        assert_eq!(FieldType::CardNumber.face(), Some(CardFace::Front));
        assert_eq!(FieldType::CardholderName.face(), Some(CardFace::Front));
        assert_eq!(FieldType::ValidityDate.face(), Some(CardFace::Front));
        assert_eq!(FieldType::Cvv.face(), Some(CardFace::Back));
        assert_eq!(FieldType::None.face(), None);
    }

    #[test]
    fn test_numeric_fields() {
        assert!(FieldType::CardNumber.is_numeric());
        assert!(FieldType::ValidityDate.is_numeric());
        assert!(FieldType::Cvv.is_numeric());
        assert!(!FieldType::CardholderName.is_numeric());
        assert!(!FieldType::None.is_numeric());
    }

    #[test]
    fn test_face_opposite() {
        assert_eq!(CardFace::Front.opposite(), CardFace::Back);
        assert_eq!(CardFace::Back.opposite(), CardFace::Front);
    }

    #[test]
    fn test_slot_emphasis() {
        let filled = DisplaySlot::filled('4', false);
        assert!(filled.is_filled());
        assert!(!filled.is_dim());
        assert!(!filled.flags.contains(SlotFlags::MASKED));

        let masked = DisplaySlot::filled('4', true);
        assert!(masked.is_filled());
        assert_eq!(masked.ch, '4');
        assert!(masked.flags.contains(SlotFlags::MASKED));

        let padding = DisplaySlot::empty('x', SlotFlags::PLACEHOLDER);
        assert!(!padding.is_filled());
        assert!(padding.is_dim());
    }
}
