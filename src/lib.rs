//! Patch-to-patch weapon stat comparison.
//!
//! [`compare::compare`] turns two [`snapshot::Snapshot`]s into ordered
//! [`compare::ChangeRecord`]s, and [`compare::summarize`] rolls those up into
//! counts, per-metric net deltas and mixed-weapon detection. The `output`
//! renderers and [`session::Session`] sit on top of that core.

pub mod compare;
pub mod config;
pub mod metrics;
pub mod output;
pub mod session;
pub mod settings;
pub mod snapshot;
