//! Census tract models
//!
//! Tracts appear in three forms over a pipeline run: raw geometry
//! (`TractGeometry`), the socio-economic attribute row (`TractAttributes`),
//! and the merged, clinician-annotated record (`TractRecord`) collected into
//! a `TractTable`. The 11-digit GEOID `tract_id` is the join key across all
//! of them.

use geo::MultiPolygon;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::geometry::Crs;
use crate::models::types::VulnerabilityLabel;

/// Raw tract geometry as delivered by the upstream geometry source
#[derive(Debug, Clone)]
pub struct TractGeometry {
    /// 11-digit GEOID
    pub tract_id: String,
    /// Tract polygon or multipolygon (single polygons arrive as a
    /// one-element multipolygon)
    pub geometry: MultiPolygon<f64>,
    /// Reference system the coordinates are expressed in
    pub crs: Crs,
}

/// Socio-economic attribute row for one tract
///
/// Every estimate is optional: `None` means "no estimate", which is distinct
/// from a measured zero and is excluded from means and from clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractAttributes {
    /// 11-digit GEOID
    pub tract_id: String,
    /// Two-letter state abbreviation
    pub state: String,
    /// Median household income (USD)
    pub median_household_income: Option<f64>,
    /// Median home price (USD)
    pub median_home_price: Option<f64>,
    /// Income-disparity index, bounded 0-1
    pub income_disparity: Option<f64>,
    /// Unemployment rate, percent 0-100
    pub unemployment_rate: Option<f64>,
    /// Percent of residents without health insurance
    pub pct_uninsured: Option<f64>,
    /// Percent of residents with a disability
    pub pct_disabled: Option<f64>,
    /// Percent of households without a vehicle
    pub pct_no_vehicle: Option<f64>,
    /// Percent of residents identifying as non-white
    pub pct_non_white: Option<f64>,
    /// Percent of households spending over 30% of income on rent
    pub pct_rent_burdened: Option<f64>,
    /// Percent of single-parent households
    pub pct_single_parent: Option<f64>,
}

/// Merged tract record: attributes plus derived accessibility and cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractRecord {
    /// Socio-economic attributes for the tract
    pub attributes: TractAttributes,
    /// Total clinicians within the buffer radius of the tract. Zero means
    /// "measured zero": the tract had valid geometry and no matches.
    pub total_clinicians: u64,
    /// Vulnerability cluster label; `None` means "Undefined" (the tract was
    /// missing at least one clustering feature)
    pub cluster: Option<VulnerabilityLabel>,
}

impl TractRecord {
    /// GEOID of the underlying tract
    #[must_use]
    pub fn tract_id(&self) -> &str {
        &self.attributes.tract_id
    }

    /// State abbreviation of the underlying tract
    #[must_use]
    pub fn state(&self) -> &str {
        &self.attributes.state
    }
}

/// The full merged tract table, keyed by GEOID
///
/// Rows keep their input order so repeated runs over the same inputs produce
/// identical output. Serializes as its rows; rebuild with `from_rows`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TractTable {
    rows: Vec<TractRecord>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl TractTable {
    /// Build a table from merged records, indexing by GEOID.
    #[must_use]
    pub fn from_rows(rows: Vec<TractRecord>) -> Self {
        let index = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (r.tract_id().to_string(), i))
            .collect();
        Self { rows, index }
    }

    /// All records in input order
    #[must_use]
    pub fn rows(&self) -> &[TractRecord] {
        &self.rows
    }

    /// Number of tracts in the table
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no tracts
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a record by GEOID.
    #[must_use]
    pub fn get(&self, tract_id: &str) -> Option<&TractRecord> {
        self.index.get(tract_id).map(|&i| &self.rows[i])
    }

    /// Look up a record by GEOID, failing with `MissingJoinKey` when absent.
    pub fn require(&self, tract_id: &str) -> Result<&TractRecord> {
        self.get(tract_id)
            .ok_or_else(|| PipelineError::MissingJoinKey(tract_id.to_string()))
    }

    /// Apply cluster labels produced by the clustering engine.
    ///
    /// `labels` must be aligned with `rows()`.
    pub fn apply_cluster_labels(&mut self, labels: &[Option<VulnerabilityLabel>]) -> Result<()> {
        if labels.len() != self.rows.len() {
            return Err(PipelineError::InvalidInput(format!(
                "label vector length {} does not match table length {}",
                labels.len(),
                self.rows.len()
            )));
        }
        for (row, label) in self.rows.iter_mut().zip(labels) {
            row.cluster = *label;
        }
        Ok(())
    }
}
