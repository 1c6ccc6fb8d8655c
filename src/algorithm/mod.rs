//! Tabular algorithms over the merged tract table
//!
//! The aggregate merger, the vulnerability clustering engine, and the
//! aggregate statistics module.

pub mod cluster;
pub mod merge;
pub mod statistics;

pub use cluster::{ComponentSummary, VulnerabilityClusterer, VulnerabilityModel};
pub use merge::{MergeReport, merge_aggregates};
pub use statistics::{aggregate_by_group, national_average, percentile_thresholds};
