//! Eligibility — which automations the user may snooze.
//!
//! Two reserved label names steer visibility:
//! - the **include** marker: as soon as one automation carries it, only
//!   automations carrying it are eligible (whitelist), and the exclude
//!   marker is ignored;
//! - the **exclude** marker: otherwise, automations carrying it are hidden
//!   (blacklist).
//!
//! Marker names are matched case-insensitively against the *resolved*
//! label name. While the label registry is empty but labels exist, names
//! cannot be resolved and a strict policy hides everything.

use crate::automation::AutomationRecord;
use crate::registry::LabelRegistry;

/// Reserved label name that whitelists automations.
pub const INCLUDE_MARKER: &str = "autosnooze_include";

/// Reserved label name that blacklists automations.
pub const EXCLUDE_MARKER: &str = "autosnooze_exclude";

/// Marker configuration for [`filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityPolicy {
    include_marker: String,
    exclude_marker: String,
    /// Hide everything while labels cannot be resolved.
    pub strict_on_missing_registry: bool,
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new(INCLUDE_MARKER, EXCLUDE_MARKER, true)
    }
}

impl EligibilityPolicy {
    /// Build a policy; marker names are stored lower-cased.
    #[must_use]
    pub fn new(
        include_marker: impl AsRef<str>,
        exclude_marker: impl AsRef<str>,
        strict_on_missing_registry: bool,
    ) -> Self {
        Self {
            include_marker: include_marker.as_ref().trim().to_lowercase(),
            exclude_marker: exclude_marker.as_ref().trim().to_lowercase(),
            strict_on_missing_registry,
        }
    }

    #[must_use]
    pub fn include_marker(&self) -> &str {
        &self.include_marker
    }

    #[must_use]
    pub fn exclude_marker(&self) -> &str {
        &self.exclude_marker
    }

    /// Whether `name` is one of the two reserved marker names.
    #[must_use]
    pub fn is_marker(&self, name: &str) -> bool {
        let folded = name.to_lowercase();
        folded == self.include_marker || folded == self.exclude_marker
    }

    /// Whether the fail-safe gate applies: labels exist but none can be resolved.
    #[must_use]
    pub fn hides_all(&self, automations: &[AutomationRecord], labels: &LabelRegistry) -> bool {
        self.strict_on_missing_registry
            && labels.is_empty()
            && automations.iter().any(AutomationRecord::has_labels)
    }

    /// Eligible automations matching `search`, in input order.
    #[must_use]
    pub fn filter<'a>(
        &self,
        automations: &'a [AutomationRecord],
        search: &str,
        labels: &LabelRegistry,
    ) -> Vec<&'a AutomationRecord> {
        if self.hides_all(automations, labels) {
            return Vec::new();
        }

        let whitelist_active = automations
            .iter()
            .any(|automation| has_marker(automation, labels, &self.include_marker));

        let needle = search.to_lowercase();

        automations
            .iter()
            .filter(|automation| {
                if whitelist_active {
                    has_marker(automation, labels, &self.include_marker)
                } else {
                    !has_marker(automation, labels, &self.exclude_marker)
                }
            })
            .filter(|automation| needle.is_empty() || matches_search(automation, &needle))
            .collect()
    }
}

/// Eligible automations under the default marker names.
///
/// See [`EligibilityPolicy::filter`] for the evaluation order.
#[must_use]
pub fn filter<'a>(
    automations: &'a [AutomationRecord],
    search: &str,
    labels: &LabelRegistry,
    strict_on_missing_registry: bool,
) -> Vec<&'a AutomationRecord> {
    EligibilityPolicy::new(INCLUDE_MARKER, EXCLUDE_MARKER, strict_on_missing_registry).filter(
        automations,
        search,
        labels,
    )
}

/// Whether any label of `automation` resolves to `marker`, ignoring case.
#[must_use]
pub fn has_marker(automation: &AutomationRecord, labels: &LabelRegistry, marker: &str) -> bool {
    let marker = marker.trim().to_lowercase();
    automation
        .label_ids
        .iter()
        .filter_map(|id| labels.resolve(id))
        .any(|name| name.to_lowercase() == marker)
}

fn matches_search(automation: &AutomationRecord, needle: &str) -> bool {
    automation.display_name().to_lowercase().contains(needle)
        || automation.id.as_str().to_lowercase().contains(needle)
}
