//! # autosnooze-app
//!
//! Application layer — use-cases, timers and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SnoozeSink` — delivers pause/wake commands to the host
//!   - `LastDurationStore` — remembers the last duration the user picked
//! - Define **driving/inbound** use-cases:
//!   - `EligibilityService` — what may be listed, grouped and targeted
//!   - `SnoozeService` — validate, dispatch and remember snoozes
//!   - `CountdownHandle` — second-aligned ticking for countdown displays
//! - Provide **in-process adapters** that don't need IO (broadcast sink,
//!   in-memory duration store)
//!
//! ## Dependency rule
//! Depends on `autosnooze-domain` only (plus `tokio` for timers and locks).
//! Never imports the binary crate. Adapters depend on *this* crate, not the reverse.

pub mod countdown;
pub mod memory;
pub mod ports;
pub mod services;
