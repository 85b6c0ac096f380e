//! Card Widget - Coordinator for model, focus flow and formatting.
//!
//! The widget is what a host embeds: it owns the canonical model, the
//! focus-flow state machine, the provider registry and one formatting
//! spec per field. The two visual surfaces (card view and form view)
//! hold a shared reference, push input events in, and render from
//! `render_slots`/`current_focus`/the change subscriptions - neither
//! surface owns any field state itself.
//!
//! # Example
//!
//! ```ignore
//! use cardflip::widget::{CardWidget, WidgetProps};
//! use cardflip::types::FieldType;
//!
//! let widget = CardWidget::new(WidgetProps::default());
//!
//! widget.on_edit(FieldType::CardNumber, "4111");
//! assert_eq!(widget.credit_card_data().provider.unwrap().name(), "visa");
//!
//! for slot in widget.render_slots(FieldType::CardNumber) {
//!     // draw slot.ch at the slot's position, dimmed if slot.is_dim()
//! }
//! ```

use crate::format::{date, FieldSpec};
use crate::provider::{ProviderId, ProviderRegistry, ProviderRule};
use crate::state::{
    ChangeCallback, CreditCardData, CreditCardModel, FieldLimits, FocusFlow, FocusHooks,
};
use crate::types::{CardFace, Cleanup, DisplaySlot, FieldType};

// =============================================================================
// Widget Props
// =============================================================================

/// Construction-time configuration: one formatting spec per field plus
/// custom provider rules. Not runtime-mutable contract.
pub struct WidgetProps {
    pub card_number: FieldSpec,
    pub cardholder_name: FieldSpec,
    pub validity_date: FieldSpec,
    pub cvv_number: FieldSpec,
    /// Custom provider rules appended after the built-in defaults.
    pub providers: Vec<ProviderRule>,
}

impl Default for WidgetProps {
    fn default() -> Self {
        Self {
            card_number: FieldSpec::card_number(),
            cardholder_name: FieldSpec::cardholder_name(),
            validity_date: FieldSpec::validity_date(),
            cvv_number: FieldSpec::cvv(),
            providers: Vec::new(),
        }
    }
}

// =============================================================================
// Card Widget
// =============================================================================

/// The credit-card input core behind both visual surfaces.
pub struct CardWidget {
    model: CreditCardModel,
    focus: FocusFlow,
    card_number: FieldSpec,
    cardholder_name: FieldSpec,
    validity_date: FieldSpec,
    cvv_number: FieldSpec,
}

impl Default for CardWidget {
    fn default() -> Self {
        Self::new(WidgetProps::default())
    }
}

impl CardWidget {
    pub fn new(props: WidgetProps) -> Self {
        let limits = FieldLimits {
            card_number: props.card_number.limit,
            cardholder_name: props.cardholder_name.limit,
            validity_date: props.validity_date.limit,
            cvv_number: props.cvv_number.limit,
        };
        let mut registry = ProviderRegistry::new();
        registry.add_providers(props.providers);
        let model =
            CreditCardModel::new(registry, limits, props.validity_date.safe_separator());
        Self {
            model,
            focus: FocusFlow::new(),
            card_number: props.card_number,
            cardholder_name: props.cardholder_name,
            validity_date: props.validity_date,
            cvv_number: props.cvv_number,
        }
    }

    /// Formatting spec of an editable field.
    pub fn field_spec(&self, field: FieldType) -> Option<&FieldSpec> {
        match field {
            FieldType::CardNumber => Some(&self.card_number),
            FieldType::CardholderName => Some(&self.cardholder_name),
            FieldType::ValidityDate => Some(&self.validity_date),
            FieldType::Cvv => Some(&self.cvv_number),
            FieldType::None => None,
        }
    }

    // =========================================================================
    // Inbound: Editing
    // =========================================================================

    /// A surface proposes new text for a field.
    ///
    /// The candidate runs through the typed-time date rule, then the
    /// length filter: an over-limit edit is rejected and the previous
    /// value stands - no error signal. Returns the accepted display
    /// text (separator-joined for the date field).
    pub fn on_edit(&self, field: FieldType, candidate: &str) -> String {
        let Some(spec) = self.field_spec(field) else {
            return String::new();
        };
        let candidate = if field == FieldType::ValidityDate {
            date::auto_separator(&self.display_text(field), candidate, spec.safe_separator())
        } else {
            candidate.to_string()
        };
        if !spec.accepts(&candidate) {
            return self.display_text(field);
        }
        self.model.set(field, &spec.unformat(&candidate));
        self.display_text(field)
    }

    /// A field lost focus. Runs the blur-time date validation: an
    /// incomplete or unparsable date clears the field entirely, and the
    /// clear is fanned out to subscribers like any other change.
    pub fn on_edit_end(&self, field: FieldType) {
        let Some(spec) = self.field_spec(field) else {
            return;
        };
        if spec.validates_date && !date::is_valid_on_blur(&self.model.value(field)) {
            self.model.set(field, "");
        }
    }

    // =========================================================================
    // Inbound: Selection
    // =========================================================================

    /// The user tapped a field's visual. Selects it and requests
    /// keyboard focus on its input surface.
    pub fn on_tap(&self, field: FieldType) {
        let before = self.focus.current();
        self.focus.select(field);
        self.blur_if_left(before);
    }

    /// A field's input surface gained focus on its own. Selects it
    /// without requesting focus back (no focus stealing).
    pub fn on_focus_gained(&self, field: FieldType) {
        let before = self.focus.current();
        self.focus.focus_gained(field);
        self.blur_if_left(before);
    }

    /// Advance to the next field in tab order (boundary no-op).
    pub fn next(&self) {
        let before = self.focus.current();
        self.focus.next();
        self.blur_if_left(before);
    }

    /// Return to the previous field in tab order (boundary no-op).
    pub fn previous(&self) {
        let before = self.focus.current();
        self.focus.previous();
        self.blur_if_left(before);
    }

    /// Finish editing: focus released, indicator hidden.
    pub fn finish(&self) {
        let before = self.focus.current();
        self.focus.finish();
        self.blur_if_left(before);
    }

    /// A tap landed outside every field - same as finishing.
    pub fn on_tap_outside(&self) {
        self.finish();
    }

    /// The view finished playing a flip animation.
    pub fn flip_finished(&self) {
        self.focus.flip_finished();
    }

    /// Blur-validate the field that was just left, if any.
    fn blur_if_left(&self, before: FieldType) {
        if before != self.focus.current() {
            self.on_edit_end(before);
        }
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    /// Fixed slot sequence for a field's card-side display.
    pub fn render_slots(&self, field: FieldType) -> Vec<DisplaySlot> {
        match self.field_spec(field) {
            Some(spec) => spec.format(&self.model.value(field)),
            None => Vec::new(),
        }
    }

    /// Unformatted value of a field.
    pub fn value(&self, field: FieldType) -> String {
        self.model.value(field)
    }

    /// Display text of a field for a plain (non-slotted) input surface:
    /// the raw value, separator-joined for the date field.
    pub fn display_text(&self, field: FieldType) -> String {
        match field {
            FieldType::ValidityDate => {
                date::joined(&self.model.value(field), self.validity_date.safe_separator())
            }
            FieldType::None => String::new(),
            _ => self.model.value(field),
        }
    }

    /// The currently selected field.
    pub fn current_focus(&self) -> FieldType {
        self.focus.current()
    }

    /// The face the card visual is showing.
    pub fn showing_face(&self) -> CardFace {
        self.focus.showing_face()
    }

    /// Snapshot of all entered data. Synchronous, never fails.
    pub fn credit_card_data(&self) -> CreditCardData {
        self.model.snapshot()
    }

    /// The recognized provider for the current card number.
    pub fn provider(&self) -> Option<ProviderId> {
        self.model.provider()
    }

    /// Icon identifier for the recognized provider.
    pub fn provider_icon(&self) -> Option<String> {
        self.model.provider_icon()
    }

    /// Icon identifier for any network the registry knows.
    pub fn icon_for(&self, id: &ProviderId) -> Option<String> {
        self.model.icon_for(id)
    }

    /// Append custom provider rules (idempotent for duplicates).
    pub fn add_providers(&self, rules: impl IntoIterator<Item = ProviderRule>) -> usize {
        self.model.add_providers(rules)
    }

    /// Subscribe a surface to model changes.
    pub fn subscribe_model(&self, callback: ChangeCallback) -> Cleanup {
        self.model.subscribe(callback)
    }

    /// Subscribe a surface to focus/flip/indicator transitions.
    pub fn subscribe_focus(&self, hooks: FocusHooks) -> Cleanup {
        self.focus.subscribe(hooks)
    }
}

// =============================================================================
// Tests
// =============================================================================
