//! Focus Flow - Field selection state machine
//!
//! Manages which field is being edited and what the card visual should do
//! about it:
//! - `current` signal (currently selected field)
//! - Linear navigation (next/previous, boundary-safe, no wraparound)
//! - Flip decisions when the selection crosses card faces
//! - Selection-indicator placement (deferred while a flip is in flight)
//! - Focus callbacks for the hosting surfaces
//!
//! The logical state is authoritative: it updates synchronously on every
//! transition. Animations are fire-and-forget; the view reports back with
//! [`FocusFlow::flip_finished`] and the controller reconciles whatever
//! happened to the logical state in the meantime.
//!
//! # Example
//!
//! ```ignore
//! use cardflip::state::focus::{FocusFlow, FocusHooks};
//! use cardflip::types::FieldType;
//!
//! let flow = FocusFlow::new();
//! let cleanup = flow.subscribe(FocusHooks {
//!     on_flip: Some(Rc::new(|from, to| println!("flip {from:?} -> {to:?}"))),
//!     ..Default::default()
//! });
//!
//! flow.select(FieldType::Cvv); // prints "flip Front -> Back"
//! flow.flip_finished();        // indicator catches up
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::types::{CardFace, Cleanup, FieldType, FIELD_ORDER};

// =============================================================================
// FOCUS HOOKS
// =============================================================================

/// Callbacks fired on focus-flow transitions.
///
/// All optional; each surface registers only what it renders. Registration
/// returns a cleanup function, and both surfaces can subscribe at once.
#[derive(Default)]
pub struct FocusHooks {
    /// The selected field changed (fires for `FieldType::None` too).
    pub on_focus_changed: Option<Rc<dyn Fn(FieldType)>>,
    /// The field's input surface should take keyboard focus. Suppressed
    /// for edit-originated selections to avoid focus stealing.
    pub on_request_focus: Option<Rc<dyn Fn(FieldType)>>,
    /// Editing finished; any keyboard focus should be released.
    pub on_release_focus: Option<Rc<dyn Fn()>>,
    /// The card visual should play a flip from one face to the other.
    pub on_flip: Option<Rc<dyn Fn(CardFace, CardFace)>>,
    /// The selection indicator should move to the field's frame
    /// (`FieldType::None` hides it). The bool is the animation hint.
    pub on_move_indicator: Option<Rc<dyn Fn(FieldType, bool)>>,
}

// =============================================================================
// FOCUS FLOW
// =============================================================================

/// Finite-state machine over the card's fields.
///
/// Owned by the widget; both visual surfaces hold non-owning references
/// and must never disagree about the current field - this signal is the
/// single source of truth.
pub struct FocusFlow {
    /// Currently selected field.
    current: Signal<FieldType>,
    /// Face the card visual is showing right now (trails the logical
    /// state while a flip animation is in flight).
    showing: Cell<CardFace>,
    /// A flip event was emitted and not yet reported finished.
    flip_pending: Cell<bool>,
    hooks: Rc<RefCell<Vec<Option<FocusHooks>>>>,
}

impl Default for FocusFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusFlow {
    /// New flow with the card number selected and the front face showing.
    pub fn new() -> Self {
        Self {
            current: signal(FieldType::CardNumber),
            showing: Cell::new(CardFace::Front),
            flip_pending: Cell::new(false),
            hooks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The currently selected field.
    pub fn current(&self) -> FieldType {
        self.current.get()
    }

    /// The face the card visual is showing (trails logical state during
    /// a flip).
    pub fn showing_face(&self) -> CardFace {
        self.showing.get()
    }

    /// Whether a flip animation is in flight.
    pub fn is_flip_pending(&self) -> bool {
        self.flip_pending.get()
    }

    /// Register transition callbacks. Returns a cleanup function that
    /// unregisters them.
    pub fn subscribe(&self, hooks: FocusHooks) -> Cleanup {
        let registry = Rc::clone(&self.hooks);
        let id = {
            let mut registry = registry.borrow_mut();
            registry.push(Some(hooks));
            registry.len() - 1
        };
        Box::new(move || {
            if let Some(slot) = registry.borrow_mut().get_mut(id) {
                *slot = None;
            }
        })
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Select a field programmatically (tap on its visual, toolbar
    /// navigation). Requests keyboard focus on the field's surface.
    /// No-op when the field is already current.
    pub fn select(&self, field: FieldType) {
        if field == FieldType::None {
            self.finish();
            return;
        }
        self.apply_selection(field, true);
    }

    /// A field's input surface gained focus on its own (the user tapped
    /// straight into it). Same transition as [`select`](Self::select) but
    /// without the focus request - the surface already has it, and
    /// stealing it back would fight the user.
    pub fn focus_gained(&self, field: FieldType) {
        if field == FieldType::None {
            return;
        }
        self.apply_selection(field, false);
    }

    /// Move to the next field in tab order. Silent no-op at the end of
    /// the order and when editing is finished.
    pub fn next(&self) {
        let Some(index) = self.current.get().order_index() else {
            return;
        };
        if index + 1 < FIELD_ORDER.len() {
            self.select(FIELD_ORDER[index + 1]);
        }
    }

    /// Move to the previous field in tab order. Silent no-op at the
    /// start of the order and when editing is finished.
    pub fn previous(&self) {
        let Some(index) = self.current.get().order_index() else {
            return;
        };
        if index > 0 {
            self.select(FIELD_ORDER[index - 1]);
        }
    }

    /// Finish editing: selection goes to `None`, keyboard focus is
    /// released, the indicator hides. Calling this twice produces one
    /// observable transition.
    pub fn finish(&self) {
        if self.current.get() == FieldType::None {
            return;
        }
        self.current.set(FieldType::None);
        self.emit_focus_changed(FieldType::None);
        for hook in self.collect(|h| h.on_release_focus.clone()) {
            hook();
        }
        self.emit_move_indicator(FieldType::None, false);
    }

    /// The view finished playing a flip animation.
    ///
    /// Toggles the showing face and reconciles: if the logical selection
    /// moved to the other face again while the animation ran, a catch-up
    /// flip is emitted; otherwise the indicator is placed without
    /// animation, exactly where the logical state says.
    pub fn flip_finished(&self) {
        if !self.flip_pending.get() {
            return;
        }
        self.showing.set(self.showing.get().opposite());
        self.flip_pending.set(false);

        let current = self.current.get();
        match current.face() {
            Some(face) if face != self.showing.get() => {
                self.flip_pending.set(true);
                self.emit_flip(self.showing.get(), face);
            }
            _ => self.emit_move_indicator(current, false),
        }
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    /// Set the selection and fire the matching visual updates.
    fn apply_selection(&self, field: FieldType, request_focus: bool) {
        if field == self.current.get() {
            return;
        }
        self.current.set(field);
        self.emit_focus_changed(field);
        if request_focus {
            for hook in self.collect(|h| h.on_request_focus.clone()) {
                hook(field);
            }
        }

        let Some(target_face) = field.face() else {
            return;
        };
        if target_face != self.showing.get() {
            // At most one flip in flight; flip_finished reconciles the rest.
            if !self.flip_pending.get() {
                self.flip_pending.set(true);
                self.emit_flip(self.showing.get(), target_face);
            }
        } else if !self.flip_pending.get() {
            self.emit_move_indicator(field, true);
        }
    }

    /// Clone the live handlers of one kind out of the registry, so
    /// callbacks run without holding the borrow.
    fn collect<T>(&self, pick: impl Fn(&FocusHooks) -> Option<T>) -> Vec<T> {
        self.hooks.borrow().iter().flatten().filter_map(pick).collect()
    }

    fn emit_focus_changed(&self, field: FieldType) {
        for hook in self.collect(|h| h.on_focus_changed.clone()) {
            hook(field);
        }
    }

    fn emit_flip(&self, from: CardFace, to: CardFace) {
        for hook in self.collect(|h| h.on_flip.clone()) {
            hook(from, to);
        }
    }

    fn emit_move_indicator(&self, field: FieldType, animated: bool) {
        for hook in self.collect(|h| h.on_move_indicator.clone()) {
            hook(field, animated);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
