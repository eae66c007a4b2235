//! Eligibility service — what the user may see and snooze in a snapshot.

use autosnooze_domain::automation::{AutomationRecord, AutomationSnapshot};
use autosnooze_domain::eligibility::EligibilityPolicy;
use autosnooze_domain::error::{AutoSnoozeError, NotFoundError, ValidationError};
use autosnooze_domain::grouping::{self, Facet, FacetCounts, Group};
use autosnooze_domain::id::AutomationId;
use autosnooze_domain::selection::Selection;

/// Applies an [`EligibilityPolicy`] to host snapshots.
///
/// Holds no cache: every call recomputes from the snapshot it is given.
#[derive(Debug, Clone, Default)]
pub struct EligibilityService {
    policy: EligibilityPolicy,
}

impl EligibilityService {
    /// Create a new service enforcing `policy`.
    #[must_use]
    pub fn new(policy: EligibilityPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &EligibilityPolicy {
        &self.policy
    }

    /// Eligible automations matching `search`.
    #[must_use]
    pub fn eligible<'a>(
        &self,
        snapshot: &'a AutomationSnapshot,
        search: &str,
    ) -> Vec<&'a AutomationRecord> {
        if self
            .policy
            .hides_all(&snapshot.automations, &snapshot.labels)
        {
            tracing::warn!(
                total = snapshot.automations.len(),
                "label registry not loaded, hiding all automations"
            );
        }
        let eligible = self
            .policy
            .filter(&snapshot.automations, search, &snapshot.labels);
        tracing::debug!(
            total = snapshot.automations.len(),
            eligible = eligible.len(),
            "computed eligible automations"
        );
        eligible
    }

    /// Eligible automations matching `search`, grouped along `facet`.
    #[must_use]
    pub fn grouped<'a>(
        &self,
        snapshot: &'a AutomationSnapshot,
        search: &str,
        facet: Facet,
    ) -> Vec<Group<'a>> {
        let eligible = self.eligible(snapshot, search);
        self.group(snapshot, &eligible, facet)
    }

    /// Group an already computed `eligible` list along `facet`.
    #[must_use]
    pub fn group<'a>(
        &self,
        snapshot: &AutomationSnapshot,
        eligible: &[&'a AutomationRecord],
        facet: Facet,
    ) -> Vec<Group<'a>> {
        let members = eligible.iter().copied();
        let default_label = facet.default_label();
        match facet {
            Facet::Area => grouping::group_by_area(members, &snapshot.areas, default_label),
            Facet::Category => {
                grouping::group_by_category(members, &snapshot.categories, default_label)
            }
            Facet::Label => {
                grouping::group_by_label(members, &snapshot.labels, &self.policy, default_label)
            }
        }
    }

    /// Distinct areas, categories and labels among the eligible automations.
    #[must_use]
    pub fn facet_counts(&self, snapshot: &AutomationSnapshot, search: &str) -> FacetCounts {
        let eligible = self.eligible(snapshot, search);
        self.count_facets(snapshot, &eligible)
    }

    /// Facet counts over an already computed `eligible` list.
    #[must_use]
    pub fn count_facets(
        &self,
        snapshot: &AutomationSnapshot,
        eligible: &[&AutomationRecord],
    ) -> FacetCounts {
        FacetCounts::compute(
            eligible,
            &snapshot.areas,
            &snapshot.categories,
            &snapshot.labels,
            &self.policy,
        )
    }

    /// Check that every requested id is currently eligible.
    ///
    /// Returns the ids deduplicated, in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`AutoSnoozeError::Validation`] when `ids` is empty, or
    /// [`AutoSnoozeError::NotFound`] naming the first (sorted) id that is
    /// unknown or not eligible.
    #[tracing::instrument(skip(self, snapshot))]
    pub fn resolve_targets(
        &self,
        snapshot: &AutomationSnapshot,
        ids: &[AutomationId],
    ) -> Result<Vec<AutomationId>, AutoSnoozeError> {
        let mut selection: Selection = ids.iter().cloned().collect();
        if selection.is_empty() {
            return Err(ValidationError::EmptySelection.into());
        }
        let dropped = selection.retain_eligible(self.eligible(snapshot, ""));
        if let Some(id) = dropped.first() {
            tracing::warn!(
                automation_id = %id,
                rejected = dropped.len(),
                "rejected automation outside eligible set"
            );
            return Err(NotFoundError {
                entity: "Eligible automation",
                id: id.to_string(),
            }
            .into());
        }
        Ok(selection.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> AutomationSnapshot {
        let automations = vec![
            AutomationRecord::builder()
                .id("automation.porch")
                .name("Porch light")
                .area("outside")
                .label("l_outdoor")
                .build()
                .unwrap(),
            AutomationRecord::builder()
                .id("automation.alarm")
                .name("Burglar alarm")
                .label("l_exclude")
                .build()
                .unwrap(),
            AutomationRecord::builder()
                .id("automation.heater")
                .name("Morning heater")
                .area("kitchen")
                .category("c_climate")
                .build()
                .unwrap(),
        ];
        AutomationSnapshot {
            automations,
            labels: [("l_outdoor", "Outdoor"), ("l_exclude", "autosnooze_exclude")]
                .into_iter()
                .collect(),
            areas: [("outside", "Outside"), ("kitchen", "Kitchen")]
                .into_iter()
                .collect(),
            categories: [("c_climate", "Climate")].into_iter().collect(),
        }
    }

    fn ids(records: &[&AutomationRecord]) -> Vec<String> {
        records.iter().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn should_exclude_blacklisted_automations() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        assert_eq!(
            ids(&service.eligible(&snapshot, "")),
            vec!["automation.porch", "automation.heater"]
        );
    }

    #[test]
    fn should_hide_all_when_labels_not_loaded() {
        let mut snapshot = snapshot();
        snapshot.labels = autosnooze_domain::registry::LabelRegistry::new();
        let service = EligibilityService::default();
        assert!(service.eligible(&snapshot, "").is_empty());
    }

    #[test]
    fn should_group_eligible_by_area_with_unassigned_last() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let groups = service.grouped(&snapshot, "", Facet::Area);
        let keys: Vec<&str> = groups.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Kitchen", "Outside"]);
    }

    #[test]
    fn should_group_eligible_by_label() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let groups = service.grouped(&snapshot, "", Facet::Label);
        let keys: Vec<&str> = groups.iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["Outdoor", "Unlabeled"]);
    }

    #[test]
    fn should_narrow_groups_by_search() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let groups = service.grouped(&snapshot, "morning", Facet::Category);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "Climate");
    }

    #[test]
    fn should_count_facets_of_eligible_automations() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let counts = service.facet_counts(&snapshot, "");
        assert_eq!(
            counts,
            FacetCounts {
                areas: 2,
                categories: 1,
                labels: 1,
            }
        );
    }

    #[test]
    fn should_reuse_eligible_list_for_groups_and_counts() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let eligible = service.eligible(&snapshot, "");

        let groups = service.group(&snapshot, &eligible, Facet::Area);
        let counts = service.count_facets(&snapshot, &eligible);

        assert_eq!(groups, service.grouped(&snapshot, "", Facet::Area));
        assert_eq!(counts, service.facet_counts(&snapshot, ""));
        assert_eq!(counts.areas, groups.len());
    }

    #[test]
    fn should_resolve_targets_sorted_and_pruned_to_eligible() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let porch = AutomationId::new("automation.porch");
        let heater = AutomationId::new("automation.heater");
        let targets = service
            .resolve_targets(&snapshot, &[porch.clone(), heater.clone(), porch.clone()])
            .unwrap();
        assert_eq!(targets, vec![heater, porch]);

        let result = service.resolve_targets(
            &snapshot,
            &[
                AutomationId::new("automation.porch"),
                AutomationId::new("automation.alarm"),
            ],
        );
        match result {
            Err(AutoSnoozeError::NotFound(err)) => assert_eq!(err.id, "automation.alarm"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn should_resolve_eligible_targets_without_duplicates() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let porch = AutomationId::new("automation.porch");
        let targets = service
            .resolve_targets(&snapshot, &[porch.clone(), porch.clone()])
            .unwrap();
        assert_eq!(targets, vec![porch]);
    }

    #[test]
    fn should_reject_target_outside_eligible_set() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let result = service.resolve_targets(&snapshot, &[AutomationId::new("automation.alarm")]);
        assert!(matches!(result, Err(AutoSnoozeError::NotFound(_))));
    }

    #[test]
    fn should_reject_empty_target_list() {
        let snapshot = snapshot();
        let service = EligibilityService::default();
        let result = service.resolve_targets(&snapshot, &[]);
        assert!(matches!(
            result,
            Err(AutoSnoozeError::Validation(ValidationError::EmptySelection))
        ));
    }
}
