//! # autosnooze-domain
//!
//! Pure domain model for snoozing home-automation rules.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, clocks
//! - Parse, normalize and format snooze **Durations**
//! - Render remaining time for a running snooze (**countdown** text)
//! - Describe **Automations** as seen by the snooze UI (name, area, category, labels)
//! - Resolve label, area and category ids through **Registries**
//! - Decide which automations are **eligible** for snoozing
//! - Group automations into area / category / label **facets**
//! - Track the user's **Selection** and the **Snooze commands** sent to the host
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app` or IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod automation;
pub mod countdown;
pub mod duration;
pub mod eligibility;
pub mod grouping;
pub mod registry;
pub mod selection;
pub mod snooze;
