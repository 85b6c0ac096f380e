//! Credit Card Model - Canonical field values and change fan-out
//!
//! The single source of truth for everything the user typed. Both visual
//! surfaces render from this model and push edits into it; neither owns
//! field state of its own. Change notifications fan out to all
//! subscribers so the surfaces stay mirror-consistent, and the provider
//! is re-recognized synchronously whenever the card number changes.
//!
//! Values are stored unformatted: the validity date is raw digits
//! (`"1124"`); the snapshot presents it separator-joined (`"11/24"`).

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use crate::format::date;
use crate::provider::{ProviderId, ProviderRegistry, ProviderRule};
use crate::types::{Cleanup, FieldType};

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Value snapshot of all four fields plus the recognized provider.
///
/// Produced on demand; not the live editing buffer. Always best-effort:
/// empty fields stay empty, an unrecognized number is `provider: None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreditCardData {
    pub card_number: String,
    pub cardholder_name: String,
    /// Separator-joined once more than two digits are present ("11/24").
    pub validity_date: String,
    pub cvv_number: String,
    pub provider: Option<ProviderId>,
}

// =============================================================================
// CHANGE NOTIFICATIONS
// =============================================================================

/// A field's canonical value changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelChange {
    pub field: FieldType,
    /// The accepted, normalized value.
    pub value: String,
}

/// Model change callback (Rc for shared ownership in closures).
pub type ChangeCallback = Rc<dyn Fn(&ModelChange)>;

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Per-field unformatted length limits (0 = unlimited).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLimits {
    pub card_number: usize,
    pub cardholder_name: usize,
    pub validity_date: usize,
    pub cvv_number: usize,
}

impl Default for FieldLimits {
    fn default() -> Self {
        Self {
            card_number: 16,
            cardholder_name: 0,
            validity_date: 4,
            cvv_number: 3,
        }
    }
}

impl FieldLimits {
    fn for_field(&self, field: FieldType) -> usize {
        match field {
            FieldType::CardNumber => self.card_number,
            FieldType::CardholderName => self.cardholder_name,
            FieldType::ValidityDate => self.validity_date,
            FieldType::Cvv => self.cvv_number,
            FieldType::None => 0,
        }
    }
}

// =============================================================================
// CREDIT CARD MODEL
// =============================================================================

/// Canonical field buffers with subscriber fan-out.
pub struct CreditCardModel {
    card_number: Signal<String>,
    cardholder_name: Signal<String>,
    validity_date: Signal<String>,
    cvv_number: Signal<String>,
    provider: Signal<Option<ProviderId>>,
    registry: RefCell<ProviderRegistry>,
    limits: FieldLimits,
    date_separator: char,
    subscribers: Rc<RefCell<Vec<Option<ChangeCallback>>>>,
}

impl Default for CreditCardModel {
    fn default() -> Self {
        Self::new(ProviderRegistry::new(), FieldLimits::default(), '/')
    }
}

impl CreditCardModel {
    /// New empty model recognizing providers through `registry`.
    pub fn new(registry: ProviderRegistry, limits: FieldLimits, date_separator: char) -> Self {
        Self {
            card_number: signal(String::new()),
            cardholder_name: signal(String::new()),
            validity_date: signal(String::new()),
            cvv_number: signal(String::new()),
            provider: signal(None),
            registry: RefCell::new(registry),
            limits,
            date_separator,
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    // =========================================================================
    // VALUES
    // =========================================================================

    /// Current unformatted value of a field (empty for `None`).
    pub fn value(&self, field: FieldType) -> String {
        match field {
            FieldType::CardNumber => self.card_number.get(),
            FieldType::CardholderName => self.cardholder_name.get(),
            FieldType::ValidityDate => self.validity_date.get(),
            FieldType::Cvv => self.cvv_number.get(),
            FieldType::None => String::new(),
        }
    }

    /// Set a field's value and notify subscribers.
    ///
    /// The value is normalized first: the validity date may arrive
    /// separator-joined and is stored as raw digits; every field is
    /// clamped to its limit. Setting a field to its current value does
    /// not notify. Returns the accepted value.
    pub fn set(&self, field: FieldType, value: &str) -> String {
        if field == FieldType::None {
            return String::new();
        }
        let accepted = self.normalize(field, value);
        if accepted == self.value(field) {
            return accepted;
        }

        match field {
            FieldType::CardNumber => {
                self.card_number.set(accepted.clone());
                self.recognize_provider();
            }
            FieldType::CardholderName => {
                self.cardholder_name.set(accepted.clone());
            }
            FieldType::ValidityDate => {
                self.validity_date.set(accepted.clone());
            }
            FieldType::Cvv => {
                self.cvv_number.set(accepted.clone());
            }
            FieldType::None => unreachable!(),
        }

        let change = ModelChange {
            field,
            value: accepted.clone(),
        };
        let callbacks: Vec<ChangeCallback> =
            self.subscribers.borrow().iter().flatten().cloned().collect();
        for callback in callbacks {
            callback(&change);
        }
        accepted
    }

    /// The recognized provider for the current card number.
    pub fn provider(&self) -> Option<ProviderId> {
        self.provider.get()
    }

    /// Icon identifier for the recognized provider.
    pub fn provider_icon(&self) -> Option<String> {
        let provider = self.provider.get()?;
        self.icon_for(&provider)
    }

    /// Icon identifier for any network the registry knows.
    pub fn icon_for(&self, id: &ProviderId) -> Option<String> {
        self.registry.borrow().icon(id).map(|icon| icon.to_string())
    }

    /// Append custom provider rules and re-recognize the current number,
    /// so a late-registered rule takes effect without an edit.
    pub fn add_providers(&self, rules: impl IntoIterator<Item = ProviderRule>) -> usize {
        let added = self.registry.borrow_mut().add_providers(rules);
        if added > 0 {
            self.recognize_provider();
        }
        added
    }

    /// Immutable snapshot of everything. Never fails; empty fields stay
    /// empty.
    pub fn snapshot(&self) -> CreditCardData {
        CreditCardData {
            card_number: self.card_number.get(),
            cardholder_name: self.cardholder_name.get(),
            validity_date: date::joined(&self.validity_date.get(), self.date_separator),
            cvv_number: self.cvv_number.get(),
            provider: self.provider.get(),
        }
    }

    /// Subscribe to field changes. Returns a cleanup function.
    pub fn subscribe(&self, callback: ChangeCallback) -> Cleanup {
        let subscribers = Rc::clone(&self.subscribers);
        let id = {
            let mut subscribers = subscribers.borrow_mut();
            subscribers.push(Some(callback));
            subscribers.len() - 1
        };
        Box::new(move || {
            if let Some(slot) = subscribers.borrow_mut().get_mut(id) {
                *slot = None;
            }
        })
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn normalize(&self, field: FieldType, value: &str) -> String {
        let mut normalized: String = if field == FieldType::ValidityDate {
            value.chars().filter(|&ch| ch != self.date_separator).collect()
        } else {
            value.to_string()
        };
        let limit = self.limits.for_field(field);
        if limit > 0 {
            normalized = normalized.chars().take(limit).collect();
        }
        normalized
    }

    fn recognize_provider(&self) {
        let recognized = self
            .registry
            .borrow()
            .recognize(&self.card_number.get())
            .map(|rule| rule.id.clone());
        if recognized != self.provider.get() {
            self.provider.set(recognized);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_empty_snapshot() {
        let model = CreditCardModel::default();
        assert_eq!(model.snapshot(), CreditCardData::default());
    }

    #[test]
    fn test_set_and_snapshot() {
        let model = CreditCardModel::default();

        model.set(FieldType::CardNumber, "4111222233334444");
        model.set(FieldType::CardholderName, "JOHN DOE");
        model.set(FieldType::ValidityDate, "1124");
        model.set(FieldType::Cvv, "123");

        let data = model.snapshot();
        assert_eq!(data.card_number, "4111222233334444");
        assert_eq!(data.cardholder_name, "JOHN DOE");
        assert_eq!(data.validity_date, "11/24");
        assert_eq!(data.cvv_number, "123");
        assert_eq!(data.provider, Some(ProviderId::Visa));
    }

    #[test]
    fn test_provider_recognized_synchronously() {
        let model = CreditCardModel::default();

        // Same synchronous call updates the provider.
        model.set(FieldType::CardNumber, "4");
        assert_eq!(model.provider(), Some(ProviderId::Visa));
        assert_eq!(model.provider_icon(), Some("visa".to_string()));

        model.set(FieldType::CardNumber, "34");
        assert_eq!(model.provider(), Some(ProviderId::AmericanExpress));

        model.set(FieldType::CardNumber, "");
        assert_eq!(model.provider(), None);
        assert_eq!(model.provider_icon(), None);
    }

    #[test]
    fn test_date_accepts_both_forms() {
        let model = CreditCardModel::default();

        model.set(FieldType::ValidityDate, "11/24");
        assert_eq!(model.value(FieldType::ValidityDate), "1124");
        assert_eq!(model.snapshot().validity_date, "11/24");

        model.set(FieldType::ValidityDate, "0525");
        assert_eq!(model.value(FieldType::ValidityDate), "0525");
        assert_eq!(model.snapshot().validity_date, "05/25");
    }

    #[test]
    fn test_short_date_stays_unjoined() {
        let model = CreditCardModel::default();
        model.set(FieldType::ValidityDate, "11");
        assert_eq!(model.snapshot().validity_date, "11");
    }

    #[test]
    fn test_values_clamped_to_limits() {
        let model = CreditCardModel::default();

        assert_eq!(model.set(FieldType::Cvv, "12345"), "123");
        assert_eq!(model.set(FieldType::ValidityDate, "112456"), "1124");
        assert_eq!(
            model
                .set(FieldType::CardNumber, "41112222333344445555")
                .chars()
                .count(),
            16
        );

        // Cardholder name is unlimited.
        let long = "A VERY LONG CARDHOLDER NAME INDEED";
        assert_eq!(model.set(FieldType::CardholderName, long), long);
    }

    #[test]
    fn test_change_notifications() {
        let model = CreditCardModel::default();
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_clone = Rc::clone(&changes);
        let _cleanup = model.subscribe(Rc::new(move |change: &ModelChange| {
            changes_clone.borrow_mut().push(change.clone());
        }));

        model.set(FieldType::Cvv, "12");
        model.set(FieldType::Cvv, "12"); // unchanged - no notification
        model.set(FieldType::Cvv, "123");

        let changes = changes.borrow();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0], ModelChange { field: FieldType::Cvv, value: "12".to_string() });
        assert_eq!(changes[1], ModelChange { field: FieldType::Cvv, value: "123".to_string() });
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let model = CreditCardModel::default();
        let count = Rc::new(Cell::new(0));
        let count_clone = Rc::clone(&count);
        let cleanup = model.subscribe(Rc::new(move |_| count_clone.set(count_clone.get() + 1)));

        model.set(FieldType::Cvv, "1");
        cleanup();
        model.set(FieldType::Cvv, "12");

        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_set_none_field_is_noop() {
        let model = CreditCardModel::default();
        assert_eq!(model.set(FieldType::None, "whatever"), "");
        assert_eq!(model.snapshot(), CreditCardData::default());
    }

    #[test]
    fn test_late_provider_rule_applies() {
        let model = CreditCardModel::default();
        model.set(FieldType::CardNumber, "9000");
        assert_eq!(model.provider(), None);

        let rule = ProviderRule::new(
            ProviderId::Custom("maestro".to_string()),
            "9",
            "maestro",
        )
        .unwrap();
        assert_eq!(model.add_providers([rule]), 1);
        assert_eq!(model.provider(), Some(ProviderId::Custom("maestro".to_string())));
    }
}
