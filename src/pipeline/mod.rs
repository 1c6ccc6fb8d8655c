//! One-shot pipeline orchestration
//!
//! A linear batch transform: load inputs, project and buffer, join, merge,
//! fit the vulnerability model, label. The data source is a trait seam so
//! the core stays agnostic to how inputs are stored; outputs are whole
//! tables the caller replaces wholesale.

use std::time::{Duration, Instant};

use log::info;

use crate::algorithm::cluster::VulnerabilityClusterer;
use crate::algorithm::merge::{MergeReport, merge_aggregates};
use crate::algorithm::VulnerabilityModel;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::geometry::AlbersEqualArea;
use crate::join::{ClinicianIndex, count_clinicians_per_tract};
use crate::models::{ClinicianLocation, TractAttributes, TractGeometry, TractTable};

/// Upstream data source seam
///
/// Implementations wrap whatever store holds the post-geocoding clinician
/// locations, tract geometries, and attribute rows. All three are read once
/// per run and treated as immutable.
pub trait TractDataSource {
    /// Geocoded, deduplicated clinician practice locations
    fn clinician_locations(&self) -> Result<Vec<ClinicianLocation>>;
    /// Tract polygons in a geographic CRS
    fn tract_geometries(&self) -> Result<Vec<TractGeometry>>;
    /// Socio-economic attribute rows for every tract in the country
    fn tract_attributes(&self) -> Result<Vec<TractAttributes>>;
}

/// Counters and timing for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Tracts that survived projection and buffering
    pub tracts_buffered: usize,
    /// Tract geometries skipped as invalid
    pub tracts_skipped: usize,
    /// Clinician locations skipped for invalid coordinates
    pub points_skipped: usize,
    /// Merge drop counters
    pub merge: MergeReport,
    /// Tracts that received a cluster label
    pub labeled: usize,
    /// Tracts left "Undefined" for missing features
    pub undefined: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

/// Everything a run produces, replacing any prior version wholesale
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The merged, labeled tract table
    pub table: TractTable,
    /// The fitted vulnerability model (component means exposed for display)
    pub model: VulnerabilityModel,
    /// Skip/drop counters and timing
    pub report: RunReport,
}

/// Run the full pipeline against a data source.
///
/// Per-record geometry problems are skipped and counted; CRS and
/// model-state problems abort the run.
pub fn run(source: &dyn TractDataSource, config: &PipelineConfig) -> Result<PipelineOutcome> {
    let started = Instant::now();
    info!("starting pipeline run");
    info!("{config}");

    let locations = source.clinician_locations()?;
    let geometries = source.tract_geometries()?;
    let attributes = source.tract_attributes()?;
    info!(
        "loaded {} clinician locations, {} tract geometries, {} attribute rows",
        locations.len(),
        geometries.len(),
        attributes.len()
    );

    let projection = AlbersEqualArea::new(config.projection.clone());
    let buffered = projection.buffer_tracts(&geometries, config.buffer_radius_m)?;
    let clinicians = projection.project_clinicians(&locations);

    let index = ClinicianIndex::build(&clinicians);
    let join = count_clinicians_per_tract(&buffered, &index)?;

    let geometry_valid = buffered.tract_ids();
    let (mut table, merge_report) = merge_aggregates(&attributes, &join.counts, &geometry_valid);

    let mut clusterer = VulnerabilityClusterer::new(config.cluster_features.clone(), config.seed);
    let model = clusterer.fit(&table)?.clone();
    let labels = clusterer.label(&table)?;
    table.apply_cluster_labels(&labels)?;

    let labeled = labels.iter().filter(|l| l.is_some()).count();
    let report = RunReport {
        tracts_buffered: buffered.tracts.len(),
        tracts_skipped: buffered.skipped,
        points_skipped: clinicians.skipped,
        merge: merge_report,
        labeled,
        undefined: labels.len() - labeled,
        elapsed: started.elapsed(),
    };
    info!(
        "pipeline complete: {} tracts merged, {} labeled, {} undefined, in {:?}",
        table.len(),
        report.labeled,
        report.undefined,
        report.elapsed
    );

    Ok(PipelineOutcome {
        table,
        model,
        report,
    })
}
