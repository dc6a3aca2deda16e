//! Pipeline entry points.
//!
//! - `run_once`: load state, run one cycle, publish and save on change
//! - `Syncer::run_cycle`: convert every eligible, changed note

pub mod fingerprint;
pub mod sync;

pub use fingerprint::{Change, Fingerprint};
pub use sync::{CycleReport, Syncer, run_once};
