//! Point-in-buffer spatial join engine
//!
//! Builds an R-tree over projected clinician points and, for every buffered
//! tract, sums the clinician counts of all points strictly inside the
//! buffered polygon. A single point may count toward many tracts when
//! buffers overlap: clinicians are accessible to every tract whose buffer
//! reaches them.
//!
//! Tracts are independent read-only units of work, so the join runs
//! data-parallel over tracts against a shared immutable index.

use geo::Point;
use indicatif::ParallelProgressIterator;
use itertools::Itertools;
use log::info;
use rayon::prelude::*;
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use rustc_hash::FxHashMap;

use crate::error::{PipelineError, Result};
use crate::geometry::{BufferedTract, BufferedTracts, Crs, ProjectedClinicians};
use crate::utils::create_progress_bar;

/// R-tree index over projected clinician points
///
/// Each indexed entry carries the clinician count of its location, so the
/// join never needs to look back at the source records.
#[derive(Debug)]
pub struct ClinicianIndex {
    crs: Crs,
    tree: RTree<GeomWithData<[f64; 2], u64>>,
}

impl ClinicianIndex {
    /// Bulk-load the index from projected clinician points.
    #[must_use]
    pub fn build(points: &ProjectedClinicians) -> Self {
        let entries: Vec<GeomWithData<[f64; 2], u64>> = points
            .points
            .iter()
            .map(|p| GeomWithData::new([p.position.x(), p.position.y()], u64::from(p.count)))
            .collect();
        Self {
            crs: points.crs,
            tree: RTree::bulk_load(entries),
        }
    }

    /// CRS the indexed coordinates are expressed in
    #[must_use]
    pub const fn crs(&self) -> Crs {
        self.crs
    }

    /// Number of indexed point locations
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index holds no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Sum clinician counts over all points strictly inside the tract's
    /// buffered polygon.
    ///
    /// The envelope query over-selects (bbox plus radius); every candidate
    /// goes through the exact strict-distance predicate.
    #[must_use]
    pub fn count_within(&self, tract: &BufferedTract) -> u64 {
        let (min, max) = tract.search_envelope();
        self.tree
            .locate_in_envelope(&AABB::from_corners(min, max))
            .filter(|entry| {
                let geom = entry.geom();
                tract.contains(Point::new(geom[0], geom[1]))
            })
            .map(|entry| entry.data)
            .sum()
    }
}

/// Result of the point-in-buffer join
///
/// The mapping is sparse: tracts with zero contained points are absent and
/// get zero-filled by the merger.
#[derive(Debug, Clone, Default)]
pub struct JoinOutcome {
    /// tract_id -> summed clinician count, zero-match tracts absent
    pub counts: FxHashMap<String, u64>,
    /// Number of tracts joined (including zero-match tracts)
    pub tracts_joined: usize,
}

impl JoinOutcome {
    /// The mapping ordered descending by count. A processing convenience
    /// for reporting, not a correctness requirement.
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        self.counts
            .iter()
            .map(|(id, &n)| (id.as_str(), n))
            .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)))
            .collect()
    }
}

/// Join every buffered tract against the clinician index.
///
/// # Errors
/// Fails with `CrsMismatch` before touching any coordinate when the tracts
/// and the index disagree on CRS, or when either side is not planar. A
/// silent mismatched-CRS join would produce wrong results, not merely
/// imprecise ones.
pub fn count_clinicians_per_tract(
    tracts: &BufferedTracts,
    index: &ClinicianIndex,
) -> Result<JoinOutcome> {
    if tracts.crs != index.crs() {
        return Err(PipelineError::CrsMismatch {
            expected: index.crs(),
            found: tracts.crs,
        });
    }
    if !tracts.crs.is_planar() {
        return Err(PipelineError::CrsMismatch {
            expected: Crs::ConusAlbers,
            found: tracts.crs,
        });
    }

    let pb = create_progress_bar(tracts.tracts.len() as u64, "joining clinician points");
    let per_tract: Vec<(String, u64)> = tracts
        .tracts
        .par_iter()
        .progress_with(pb)
        .map(|tract| (tract.tract_id().to_string(), index.count_within(tract)))
        .collect();

    let tracts_joined = per_tract.len();
    let counts: FxHashMap<String, u64> = per_tract
        .into_iter()
        .filter(|&(_, n)| n > 0)
        .collect();

    info!(
        "joined {} tracts against {} point locations; {} tracts with at least one clinician",
        tracts_joined,
        index.len(),
        counts.len()
    );

    Ok(JoinOutcome {
        counts,
        tracts_joined,
    })
}
