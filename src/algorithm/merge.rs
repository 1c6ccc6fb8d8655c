//! Tract aggregate merger
//!
//! Left-joins the full tract attribute table against the sparse join-engine
//! mapping. The contract distinguishes three cases per attribute row:
//! present in the mapping -> its summed count; absent but geometry-valid ->
//! measured zero; geometry invalid or missing -> excluded from the merged
//! output entirely (never zero-filled, so phantom tracts cannot leak into
//! clustering or per-state averages).

use log::warn;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::{TractAttributes, TractRecord, TractTable};

/// Drop counters reported by the merger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Attribute rows excluded because no valid geometry exists for the tract
    pub dropped_no_geometry: usize,
    /// Aggregate keys with no matching attribute row
    pub unmatched_aggregates: usize,
}

/// Merge the attribute table with the join mapping.
///
/// `geometry_valid` is the set of GEOIDs that survived projection; only
/// those tracts may be zero-filled. Rows are emitted in input attribute
/// order, so re-running on the same inputs yields identical output.
#[must_use]
pub fn merge_aggregates(
    attributes: &[TractAttributes],
    counts: &FxHashMap<String, u64>,
    geometry_valid: &FxHashSet<String>,
) -> (TractTable, MergeReport) {
    let mut rows = Vec::with_capacity(attributes.len());
    let mut report = MergeReport::default();

    for attrs in attributes {
        let total_clinicians = match counts.get(&attrs.tract_id) {
            Some(&n) => n,
            None if geometry_valid.contains(&attrs.tract_id) => 0,
            None => {
                report.dropped_no_geometry += 1;
                continue;
            }
        };
        rows.push(TractRecord {
            attributes: attrs.clone(),
            total_clinicians,
            cluster: None,
        });
    }

    let attribute_ids: FxHashSet<&str> = attributes.iter().map(|a| a.tract_id.as_str()).collect();
    report.unmatched_aggregates = counts
        .keys()
        .filter(|id| !attribute_ids.contains(id.as_str()))
        .count();

    if report.dropped_no_geometry > 0 {
        warn!(
            "dropped {} attribute rows with no valid tract geometry",
            report.dropped_no_geometry
        );
    }
    if report.unmatched_aggregates > 0 {
        warn!(
            "{} aggregate keys had no matching attribute row",
            report.unmatched_aggregates
        );
    }

    (TractTable::from_rows(rows), report)
}
