//! Data models for the tract-access pipeline
//!
//! Inputs (`ClinicianLocation`, `TractGeometry`, `TractAttributes`) are
//! loaded once per run and immutable during processing; derived outputs
//! (`TractRecord`, `TractTable`) are recomputed in full on every run.

pub mod clinician;
pub mod indicator;
pub mod tract;
pub mod types;

pub use clinician::ClinicianLocation;
pub use indicator::Indicator;
pub use tract::{TractAttributes, TractGeometry, TractRecord, TractTable};
pub use types::{GroupKey, VulnerabilityLabel};
