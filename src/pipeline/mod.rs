//! Pipeline entry points for watcher operations.
//!
//! - `ChangeDetector`: fetch → fingerprint → compare → record, per resource
//! - `run_once`: one full pass over all tracked resources, ending in at
//!   most one aggregate notification

pub mod detect;
pub mod run;

pub use detect::ChangeDetector;
pub use run::{NotifyOutcome, RunSummary, run_once};
