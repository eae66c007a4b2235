//! Grouping — area / category / label facets over automations.
//!
//! Grouping fans out: an automation with two labels shows up under both.
//! Automations without any key land in a caller-named default group that
//! always sorts last.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use crate::automation::AutomationRecord;
use crate::eligibility::EligibilityPolicy;
use crate::registry::{AreaRegistry, CategoryRegistry, LabelRegistry};

/// One facet bucket: its key and the automations under it.
pub type Group<'a> = (String, Vec<&'a AutomationRecord>);

/// Dimension automations can be grouped along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Area,
    Category,
    Label,
}

impl Facet {
    /// Name of the group holding automations without a value for this facet.
    #[must_use]
    pub fn default_label(self) -> &'static str {
        match self {
            Self::Area => "Unassigned",
            Self::Category => "Uncategorized",
            Self::Label => "Unlabeled",
        }
    }
}

/// Group automations by the keys `key_fn` yields for each of them.
///
/// Groups are sorted alphabetically (case-insensitive, raw key as
/// tie-break) with the `default_label` group last. Members keep input
/// order and appear at most once per group.
pub fn group_by<'a, I, F, K>(automations: I, key_fn: F, default_label: &str) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a AutomationRecord>,
    F: Fn(&'a AutomationRecord) -> K,
    K: IntoIterator<Item = String>,
{
    let mut groups: HashMap<String, Vec<&'a AutomationRecord>> = HashMap::new();
    let mut ungrouped: Vec<&'a AutomationRecord> = Vec::new();

    for automation in automations {
        let mut seen = HashSet::new();
        for key in key_fn(automation) {
            if seen.insert(key.clone()) {
                groups.entry(key).or_default().push(automation);
            }
        }
        if seen.is_empty() {
            ungrouped.push(automation);
        }
    }

    if !ungrouped.is_empty() {
        groups
            .entry(default_label.to_string())
            .or_default()
            .extend(ungrouped);
    }

    let mut sorted: Vec<Group<'a>> = groups.into_iter().collect();
    sorted.sort_by(|(a, _), (b, _)| {
        let a_default = a == default_label;
        let b_default = b == default_label;
        a_default
            .cmp(&b_default)
            .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
            .then_with(|| a.cmp(b))
    });
    sorted
}

/// Number of distinct values `value_fn` yields across `automations`.
///
/// Automations yielding nothing do not count.
pub fn count_unique<'a, I, F, V, T>(automations: I, value_fn: F) -> usize
where
    I: IntoIterator<Item = &'a AutomationRecord>,
    F: Fn(&'a AutomationRecord) -> V,
    V: IntoIterator<Item = T>,
    T: Eq + Hash,
{
    automations
        .into_iter()
        .flat_map(value_fn)
        .collect::<HashSet<_>>()
        .len()
}

/// Group by area name; unknown or missing areas fall into `default_label`.
pub fn group_by_area<'a, I>(
    automations: I,
    areas: &AreaRegistry,
    default_label: &str,
) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a AutomationRecord>,
{
    group_by(
        automations,
        |automation| {
            automation
                .area_id
                .as_ref()
                .and_then(|id| areas.resolve(id))
                .map(str::to_string)
        },
        default_label,
    )
}

/// Group by category name; unknown or missing categories fall into `default_label`.
pub fn group_by_category<'a, I>(
    automations: I,
    categories: &CategoryRegistry,
    default_label: &str,
) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a AutomationRecord>,
{
    group_by(
        automations,
        |automation| {
            automation
                .category_id
                .as_ref()
                .and_then(|id| categories.resolve(id))
                .map(str::to_string)
        },
        default_label,
    )
}

/// Group by label name, skipping unresolved ids and the reserved markers.
pub fn group_by_label<'a, I>(
    automations: I,
    labels: &LabelRegistry,
    policy: &EligibilityPolicy,
    default_label: &str,
) -> Vec<Group<'a>>
where
    I: IntoIterator<Item = &'a AutomationRecord>,
{
    group_by(
        automations,
        |automation| visible_label_names(automation, labels, policy),
        default_label,
    )
}

fn visible_label_names(
    automation: &AutomationRecord,
    labels: &LabelRegistry,
    policy: &EligibilityPolicy,
) -> Vec<String> {
    automation
        .label_ids
        .iter()
        .filter_map(|id| labels.resolve(id))
        .filter(|name| !policy.is_marker(name))
        .map(str::to_string)
        .collect()
}

/// How many distinct areas, categories and labels a set of automations spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FacetCounts {
    pub areas: usize,
    pub categories: usize,
    pub labels: usize,
}

impl FacetCounts {
    /// Count distinct area, category and (non-marker) label names.
    ///
    /// Only ids the registries resolve count, so each figure matches the
    /// number of named groups the matching `group_by_*` call yields.
    #[must_use]
    pub fn compute(
        automations: &[&AutomationRecord],
        areas: &AreaRegistry,
        categories: &CategoryRegistry,
        labels: &LabelRegistry,
        policy: &EligibilityPolicy,
    ) -> Self {
        Self {
            areas: count_unique(automations.iter().copied(), |a| {
                a.area_id.as_ref().and_then(|id| areas.resolve(id))
            }),
            categories: count_unique(automations.iter().copied(), |a| {
                a.category_id.as_ref().and_then(|id| categories.resolve(id))
            }),
            labels: count_unique(automations.iter().copied(), |a| {
                visible_label_names(a, labels, policy)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, area: Option<&str>, labels: &[&str]) -> AutomationRecord {
        let mut builder = AutomationRecord::builder().id(id);
        if let Some(area) = area {
            builder = builder.area(area);
        }
        for label in labels {
            builder = builder.label(*label);
        }
        builder.build().unwrap()
    }

    fn keys(groups: &[Group<'_>]) -> Vec<String> {
        groups.iter().map(|(key, _)| key.clone()).collect()
    }

    #[test]
    fn should_sort_groups_alphabetically_with_default_last() {
        let automations = vec![
            record("automation.a", Some("zz"), &[]),
            record("automation.b", None, &[]),
            record("automation.c", Some("aa"), &[]),
        ];
        let groups = group_by(
            &automations,
            |a| a.area_id.as_ref().map(ToString::to_string),
            "Unassigned",
        );
        assert_eq!(keys(&groups), vec!["aa", "zz", "Unassigned"]);
    }

    #[test]
    fn should_keep_default_last_even_when_alphabetically_first() {
        let automations = vec![
            record("automation.a", Some("kitchen"), &[]),
            record("automation.b", None, &[]),
        ];
        let groups = group_by(
            &automations,
            |a| a.area_id.as_ref().map(ToString::to_string),
            "(none)",
        );
        assert_eq!(keys(&groups), vec!["kitchen", "(none)"]);
    }

    #[test]
    fn should_fan_out_automations_with_multiple_keys() {
        let automations = vec![
            record("automation.a", None, &["x", "y"]),
            record("automation.b", None, &["y"]),
        ];
        let groups = group_by(
            &automations,
            |a| a.label_ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Unlabeled",
        );
        assert_eq!(keys(&groups), vec!["x", "y"]);
        assert_eq!(groups[0].1.len(), 1);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].id.as_str(), "automation.a");
    }

    #[test]
    fn should_not_duplicate_member_when_key_repeats() {
        let automations = vec![record("automation.a", None, &["x", "x"])];
        let groups = group_by(
            &automations,
            |a| a.label_ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "Unlabeled",
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].1.len(), 1);
    }

    #[test]
    fn should_sort_case_insensitively() {
        let automations = vec![
            record("automation.a", Some("bedroom"), &[]),
            record("automation.b", Some("Attic"), &[]),
        ];
        let groups = group_by(
            &automations,
            |a| a.area_id.as_ref().map(ToString::to_string),
            "Unassigned",
        );
        assert_eq!(keys(&groups), vec!["Attic", "bedroom"]);
    }

    #[test]
    fn should_return_no_groups_for_no_automations() {
        let automations: Vec<AutomationRecord> = Vec::new();
        let groups = group_by(&automations, |_| None::<String>, "Unassigned");
        assert!(groups.is_empty());
    }

    #[test]
    fn should_count_distinct_values_ignoring_missing() {
        let automations = vec![
            record("automation.a", Some("kitchen"), &[]),
            record("automation.b", Some("kitchen"), &[]),
            record("automation.c", Some("garage"), &[]),
            record("automation.d", None, &[]),
        ];
        assert_eq!(count_unique(&automations, |a| a.area_id.as_ref()), 2);
    }

    #[test]
    fn should_count_fanned_out_values_once() {
        let automations = vec![
            record("automation.a", None, &["x", "y"]),
            record("automation.b", None, &["y", "z"]),
        ];
        assert_eq!(count_unique(&automations, |a| a.label_ids.iter()), 3);
    }

    #[test]
    fn should_group_by_resolved_area_name() {
        let areas: AreaRegistry = [("kitchen", "Kitchen"), ("garage", "Garage")]
            .into_iter()
            .collect();
        let automations = vec![
            record("automation.a", Some("kitchen"), &[]),
            record("automation.b", Some("unknown"), &[]),
            record("automation.c", Some("garage"), &[]),
        ];
        let groups = group_by_area(&automations, &areas, "Unassigned");
        assert_eq!(keys(&groups), vec!["Garage", "Kitchen", "Unassigned"]);
    }

    #[test]
    fn should_group_by_category_name() {
        let categories: CategoryRegistry = [("c1", "Lighting")].into_iter().collect();
        let automations = vec![
            AutomationRecord::builder()
                .id("automation.a")
                .category("c1")
                .build()
                .unwrap(),
            record("automation.b", None, &[]),
        ];
        let groups = group_by_category(&automations, &categories, "Uncategorized");
        assert_eq!(keys(&groups), vec!["Lighting", "Uncategorized"]);
    }

    #[test]
    fn should_skip_marker_labels_when_grouping_by_label() {
        let labels: LabelRegistry = [("l1", "Outdoor"), ("l2", "autosnooze_include")]
            .into_iter()
            .collect();
        let automations = vec![
            record("automation.a", None, &["l1", "l2"]),
            record("automation.b", None, &["l2"]),
        ];
        let groups =
            group_by_label(&automations, &labels, &EligibilityPolicy::default(), "Unlabeled");
        assert_eq!(keys(&groups), vec!["Outdoor", "Unlabeled"]);
        assert_eq!(groups[1].1[0].id.as_str(), "automation.b");
    }

    #[test]
    fn should_name_default_groups_per_facet() {
        assert_eq!(Facet::Area.default_label(), "Unassigned");
        assert_eq!(Facet::Category.default_label(), "Uncategorized");
        assert_eq!(Facet::Label.default_label(), "Unlabeled");
    }

    #[test]
    fn should_compute_facet_counts() {
        let areas: AreaRegistry = [("kitchen", "Kitchen"), ("garage", "Garage")]
            .into_iter()
            .collect();
        let labels: LabelRegistry = [("l1", "Outdoor"), ("l2", "autosnooze_exclude")]
            .into_iter()
            .collect();
        let automations = vec![
            record("automation.a", Some("kitchen"), &["l1"]),
            record("automation.b", Some("garage"), &["l1", "l2"]),
            record("automation.c", None, &[]),
        ];
        let refs: Vec<&AutomationRecord> = automations.iter().collect();
        let counts = FacetCounts::compute(
            &refs,
            &areas,
            &CategoryRegistry::new(),
            &labels,
            &EligibilityPolicy::default(),
        );
        assert_eq!(
            counts,
            FacetCounts {
                areas: 2,
                categories: 0,
                labels: 1,
            }
        );
    }

    #[test]
    fn should_count_facets_like_named_groups() {
        let areas: AreaRegistry = [("kitchen", "Kitchen"), ("cuisine", "Kitchen")]
            .into_iter()
            .collect();
        let automations = vec![
            record("automation.a", Some("kitchen"), &[]),
            record("automation.b", Some("cuisine"), &[]),
            record("automation.c", Some("unknown"), &[]),
        ];
        let refs: Vec<&AutomationRecord> = automations.iter().collect();
        let counts = FacetCounts::compute(
            &refs,
            &areas,
            &CategoryRegistry::new(),
            &LabelRegistry::new(),
            &EligibilityPolicy::default(),
        );
        let groups = group_by_area(refs.iter().copied(), &areas, "Unassigned");

        assert_eq!(counts.areas, 1);
        assert_eq!(keys(&groups), vec!["Kitchen", "Unassigned"]);
    }
}
