//! Typed identifier newtypes backed by host-provided strings.
//!
//! The host registry hands out opaque string ids (`automation.morning_lights`,
//! `living_room`, `01J9...`). Wrapping them keeps an area id from being
//! passed where a label id is expected.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a host-provided identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyId);
                }
                Ok(Self(trimmed.to_string()))
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

define_id!(
    /// Unique identifier for an [`AutomationRecord`](crate::automation::AutomationRecord),
    /// namespaced by the host (`automation.<slug>`).
    AutomationId
);

define_id!(
    /// Identifier of an area (room, floor, zone) in the host's area registry.
    AreaId
);

define_id!(
    /// Identifier of a category in the host's category registry.
    CategoryId
);

define_id!(
    /// Identifier of a label in the host's label registry.
    LabelId
);

/// Domain prefix used by the host for automation ids.
pub const AUTOMATION_DOMAIN_PREFIX: &str = "automation.";

impl AutomationId {
    /// The id without its `automation.` domain prefix.
    #[must_use]
    pub fn slug(&self) -> &str {
        self.0
            .strip_prefix(AUTOMATION_DOMAIN_PREFIX)
            .unwrap_or(&self.0)
    }
}
