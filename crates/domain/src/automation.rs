//! Automation — a host rule as seen by the snooze UI.
//!
//! The host owns the automation itself (triggers, conditions, actions).
//! Snoozing only needs enough to display, search, group and filter it.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::id::{AreaId, AutomationId, CategoryId, LabelId};
use crate::registry::{AreaRegistry, CategoryRegistry, LabelRegistry};

/// Snapshot of one automation supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationRecord {
    pub id: AutomationId,
    /// Friendly name; may be empty when the host has none.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area_id: Option<AreaId>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub label_ids: Vec<LabelId>,
}

impl AutomationRecord {
    /// Create a builder for constructing an [`AutomationRecord`].
    #[must_use]
    pub fn builder() -> AutomationRecordBuilder {
        AutomationRecordBuilder::default()
    }

    /// Name shown to the user, derived from the id when no name is set.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.id.slug()
        } else {
            &self.name
        }
    }

    #[must_use]
    pub fn has_labels(&self) -> bool {
        !self.label_ids.is_empty()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyId`] when `id` is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(())
    }
}

/// Everything the host supplies for one filter computation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AutomationSnapshot {
    pub automations: Vec<AutomationRecord>,
    pub labels: LabelRegistry,
    pub areas: AreaRegistry,
    pub categories: CategoryRegistry,
}

impl AutomationSnapshot {
    /// Look up an automation by id.
    #[must_use]
    pub fn get(&self, id: &AutomationId) -> Option<&AutomationRecord> {
        self.automations.iter().find(|automation| &automation.id == id)
    }
}

/// Step-by-step builder for [`AutomationRecord`].
#[derive(Debug, Default)]
pub struct AutomationRecordBuilder {
    id: Option<AutomationId>,
    name: Option<String>,
    area_id: Option<AreaId>,
    category_id: Option<CategoryId>,
    label_ids: Vec<LabelId>,
}

impl AutomationRecordBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<AutomationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn area(mut self, area_id: impl Into<AreaId>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    #[must_use]
    pub fn label(mut self, label_id: impl Into<LabelId>) -> Self {
        self.label_ids.push(label_id.into());
        self
    }

    /// Consume the builder, validate, and return an [`AutomationRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyId`] if `id` is missing or blank.
    pub fn build(self) -> Result<AutomationRecord, ValidationError> {
        let record = AutomationRecord {
            id: self.id.ok_or(ValidationError::EmptyId)?,
            name: self.name.unwrap_or_default(),
            area_id: self.area_id,
            category_id: self.category_id,
            label_ids: self.label_ids,
        };
        record.validate()?;
        Ok(record)
    }
}
