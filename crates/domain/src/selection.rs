//! Selection — the automations the user has ticked for snoozing.

use std::collections::BTreeSet;

use crate::automation::AutomationRecord;
use crate::id::AutomationId;

/// Ordered set of selected automation ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<AutomationId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `id` if unselected, unselect it otherwise. Returns the new state.
    pub fn toggle(&mut self, id: &AutomationId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Select every automation in `visible`, or clear the selection when
    /// all of them are already selected.
    pub fn toggle_all<'a>(&mut self, visible: impl IntoIterator<Item = &'a AutomationRecord>) {
        let visible: Vec<&AutomationId> = visible.into_iter().map(|a| &a.id).collect();
        if !visible.is_empty() && visible.iter().all(|id| self.ids.contains(*id)) {
            self.ids.clear();
        } else {
            self.ids.extend(visible.into_iter().cloned());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer among the `eligible` automations.
    ///
    /// Returns the dropped ids in sorted order.
    pub fn retain_eligible<'a>(
        &mut self,
        eligible: impl IntoIterator<Item = &'a AutomationRecord>,
    ) -> Vec<AutomationId> {
        let eligible: BTreeSet<&AutomationId> = eligible.into_iter().map(|a| &a.id).collect();
        let (kept, dropped): (BTreeSet<_>, BTreeSet<_>) = std::mem::take(&mut self.ids)
            .into_iter()
            .partition(|id| eligible.contains(id));
        self.ids = kept;
        dropped.into_iter().collect()
    }

    #[must_use]
    pub fn contains(&self, id: &AutomationId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Selected ids in sorted order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<AutomationId> {
        self.ids.iter().cloned().collect()
    }
}

impl FromIterator<AutomationId> for Selection {
    fn from_iter<T: IntoIterator<Item = AutomationId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
