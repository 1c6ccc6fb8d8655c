//! A Rust library for computing census-tract clinician accessibility and
//! classifying tracts into medical-desert vulnerability clusters.
//!
//! The pipeline is a linear one-shot batch transform: tract polygons and
//! clinician points are reprojected into an equal-area planar CRS, each
//! tract is joined against the clinician points within its 25 km buffer,
//! the per-tract counts are merged onto the full attribute table, a
//! two-component Gaussian mixture labels tracts low/high vulnerability,
//! and a statistics module serves grouped means for display.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod geometry;
pub mod join;
pub mod models;
pub mod pipeline;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use models::{
    ClinicianLocation, GroupKey, Indicator, TractAttributes, TractGeometry, TractRecord,
    TractTable, VulnerabilityLabel,
};

// Geometry engine
pub use geometry::{AlbersEqualArea, AlbersParams, BufferedTract, BufferedTracts, Crs};

// Join engine
pub use join::{ClinicianIndex, JoinOutcome, count_clinicians_per_tract};

// Tabular algorithms
pub use algorithm::{
    ComponentSummary, MergeReport, VulnerabilityClusterer, VulnerabilityModel, aggregate_by_group,
    merge_aggregates, national_average, percentile_thresholds,
};

// Pipeline entry point
pub use pipeline::{PipelineOutcome, RunReport, TractDataSource, run};
