//! Provider Recognition - Card network from a number prefix.
//!
//! Matching is prefix-pattern based: every rule compiles to `^pattern\d*`
//! and rules are tested in order, defaults first, then custom rules in the
//! order they were added. First match wins. A partial prefix that could
//! still become several networks (a lone `"3"`) matches nothing until more
//! digits disambiguate it.
//!
//! The registry is an explicit value owned by the widget - recognition is
//! deterministic and testable in isolation, with no process-wide state.

use regex::Regex;

// =============================================================================
// Provider Identity
// =============================================================================

/// A recognized card network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Visa,
    Mastercard,
    Discover,
    AmericanExpress,
    DinersClub,
    Jcb,
    /// Host-registered network, identified by rule name.
    Custom(String),
}

impl ProviderId {
    /// Stable name for the network (also the dedup key for rules).
    pub fn name(&self) -> &str {
        match self {
            ProviderId::Visa => "visa",
            ProviderId::Mastercard => "mastercard",
            ProviderId::Discover => "discover",
            ProviderId::AmericanExpress => "american_express",
            ProviderId::DinersClub => "diners_club",
            ProviderId::Jcb => "jcb",
            ProviderId::Custom(name) => name,
        }
    }
}

// =============================================================================
// Provider Rule
// =============================================================================

/// A prefix-pattern rule mapping card numbers to a network and icon id.
#[derive(Debug, Clone)]
pub struct ProviderRule {
    /// Network this rule recognizes.
    pub id: ProviderId,
    /// Raw prefix pattern, e.g. `"3[47]"`.
    pub pattern: String,
    /// Icon identifier handed to the asset-loading host.
    pub icon: String,
    matcher: Regex,
}

impl ProviderRule {
    /// Build a rule from a prefix pattern.
    ///
    /// Returns `None` when the pattern does not compile - a misconfigured
    /// custom rule is dropped, never an error.
    pub fn new(id: ProviderId, pattern: &str, icon: &str) -> Option<Self> {
        let matcher = Regex::new(&format!(r"^(?:{pattern})\d*")).ok()?;
        Some(Self {
            id,
            pattern: pattern.to_string(),
            icon: icon.to_string(),
            matcher,
        })
    }

    fn matches(&self, digits: &str) -> bool {
        self.matcher.is_match(digits)
    }
}

// =============================================================================
// Provider Registry
// =============================================================================

/// Ordered rule set: built-in networks first, then custom rules
/// in registration order. Append-only for the lifetime of the widget.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    rules: Vec<ProviderRule>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    /// Registry with the built-in default networks.
    pub fn new() -> Self {
        let defaults = [
            (ProviderId::Visa, "4", "visa"),
            (ProviderId::Mastercard, "5", "mastercard"),
            (ProviderId::Discover, "6", "discover"),
            (ProviderId::AmericanExpress, "3[47]", "american_express"),
            (ProviderId::DinersClub, "3[068]", "diners_club"),
            (ProviderId::Jcb, "35", "jcb"),
        ];
        let rules = defaults
            .into_iter()
            .map(|(id, pattern, icon)| {
                ProviderRule::new(id, pattern, icon).expect("static provider pattern")
            })
            .collect();
        Self { rules }
    }

    /// Registry with no rules at all (recognition always fails).
    pub fn bare() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append custom rules. Duplicates by `(name, pattern)` are skipped,
    /// so repeated registration is idempotent. Returns how many rules
    /// were actually added.
    pub fn add_providers(&mut self, rules: impl IntoIterator<Item = ProviderRule>) -> usize {
        let mut added = 0;
        for rule in rules {
            let duplicate = self
                .rules
                .iter()
                .any(|r| r.id.name() == rule.id.name() && r.pattern == rule.pattern);
            if !duplicate {
                self.rules.push(rule);
                added += 1;
            }
        }
        added
    }

    /// Recognize the network for a (possibly partial) card number.
    ///
    /// Empty input and unmatched prefixes return `None`.
    pub fn recognize(&self, digits: &str) -> Option<&ProviderRule> {
        if digits.is_empty() {
            return None;
        }
        self.rules.iter().find(|rule| rule.matches(digits))
    }

    /// Icon identifier for a network, if any rule knows it.
    pub fn icon(&self, id: &ProviderId) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.id == *id)
            .map(|rule| rule.icon.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recognize_id(registry: &ProviderRegistry, digits: &str) -> Option<ProviderId> {
        registry.recognize(digits).map(|rule| rule.id.clone())
    }

    #[test]
    fn test_single_digit_networks() {
        let registry = ProviderRegistry::new();

        assert_eq!(recognize_id(&registry, "4"), Some(ProviderId::Visa));
        assert_eq!(recognize_id(&registry, "4111111111111111"), Some(ProviderId::Visa));
        assert_eq!(recognize_id(&registry, "5"), Some(ProviderId::Mastercard));
        assert_eq!(recognize_id(&registry, "5500"), Some(ProviderId::Mastercard));
        assert_eq!(recognize_id(&registry, "6"), Some(ProviderId::Discover));
        assert_eq!(recognize_id(&registry, "6011"), Some(ProviderId::Discover));
    }

    #[test]
    fn test_two_digit_networks() {
        let registry = ProviderRegistry::new();

        assert_eq!(recognize_id(&registry, "34"), Some(ProviderId::AmericanExpress));
        assert_eq!(recognize_id(&registry, "37"), Some(ProviderId::AmericanExpress));
        assert_eq!(recognize_id(&registry, "30"), Some(ProviderId::DinersClub));
        assert_eq!(recognize_id(&registry, "36"), Some(ProviderId::DinersClub));
        assert_eq!(recognize_id(&registry, "38"), Some(ProviderId::DinersClub));
        assert_eq!(recognize_id(&registry, "35"), Some(ProviderId::Jcb));
    }

    #[test]
    fn test_ambiguous_prefix_stays_unrecognized() {
        let registry = ProviderRegistry::new();

        // "3" alone could become Amex, Diners or JCB - no match until
        // the next digit disambiguates.
        assert_eq!(recognize_id(&registry, "3"), None);
        assert_eq!(recognize_id(&registry, "34"), Some(ProviderId::AmericanExpress));
    }

    #[test]
    fn test_unmatched_prefixes() {
        let registry = ProviderRegistry::new();

        assert_eq!(recognize_id(&registry, ""), None);
        assert_eq!(recognize_id(&registry, "9"), None);
        assert_eq!(recognize_id(&registry, "39"), None);
        assert_eq!(recognize_id(&registry, "1234"), None);
    }

    #[test]
    fn test_custom_rule_appended_after_defaults() {
        let mut registry = ProviderRegistry::new();

        let rule = ProviderRule::new(
            ProviderId::Custom("unionpay".to_string()),
            "62",
            "unionpay",
        )
        .unwrap();
        assert_eq!(registry.add_providers([rule]), 1);

        // Defaults win: "62" already matches Discover's "6".
        assert_eq!(recognize_id(&registry, "62"), Some(ProviderId::Discover));

        // A prefix no default covers reaches the custom rule.
        let rule = ProviderRule::new(
            ProviderId::Custom("maestro".to_string()),
            "9",
            "maestro",
        )
        .unwrap();
        registry.add_providers([rule]);
        assert_eq!(
            recognize_id(&registry, "90"),
            Some(ProviderId::Custom("maestro".to_string()))
        );
    }

    #[test]
    fn test_duplicate_rules_skipped() {
        let mut registry = ProviderRegistry::new();

        let rule = || {
            ProviderRule::new(ProviderId::Custom("mir".to_string()), "220[0-4]", "mir").unwrap()
        };
        assert_eq!(registry.add_providers([rule()]), 1);
        assert_eq!(registry.add_providers([rule()]), 0);

        // Same name with a different pattern is a distinct rule.
        let variant =
            ProviderRule::new(ProviderId::Custom("mir".to_string()), "2200", "mir").unwrap();
        assert_eq!(registry.add_providers([variant]), 1);
    }

    #[test]
    fn test_invalid_pattern_dropped() {
        assert!(ProviderRule::new(ProviderId::Custom("broken".to_string()), "4[", "x").is_none());
    }

    #[test]
    fn test_icon_lookup() {
        let registry = ProviderRegistry::new();

        assert_eq!(registry.icon(&ProviderId::Visa), Some("visa"));
        assert_eq!(registry.icon(&ProviderId::AmericanExpress), Some("american_express"));
        assert_eq!(registry.icon(&ProviderId::Custom("nope".to_string())), None);
    }

    #[test]
    fn test_bare_registry() {
        let registry = ProviderRegistry::bare();
        assert_eq!(recognize_id(&registry, "4"), None);
    }
}
