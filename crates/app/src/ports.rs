//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod duration_store;
pub mod snooze_sink;

pub use duration_store::LastDurationStore;
pub use snooze_sink::SnoozeSink;
