//! Aggregate statistics over the merged tract table
//!
//! Grouped and national means for any numeric indicator, with missing
//! values excluded from both numerator and denominator. An empty group is
//! an error, never a silently propagated NaN.

use std::collections::BTreeMap;

use crate::error::{PipelineError, Result};
use crate::models::{GroupKey, Indicator, TractTable};

/// Arithmetic mean of `indicator` within each group of the table.
///
/// Missing indicator values are excluded from both the sum and the divisor.
/// For `GroupKey::Cluster`, tracts with an undefined label are excluded from
/// the grouping altogether.
///
/// # Errors
/// `EmptyGroup` when a group exists but has no non-missing values.
pub fn aggregate_by_group(
    table: &TractTable,
    key: GroupKey,
    indicator: Indicator,
) -> Result<BTreeMap<String, f64>> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();

    for row in table.rows() {
        let group = match key {
            GroupKey::State => Some(row.state().to_string()),
            GroupKey::Cluster => row.cluster.map(|label| label.to_string()),
        };
        let Some(group) = group else { continue };

        let entry = sums.entry(group).or_insert((0.0, 0));
        if let Some(value) = indicator.value(row) {
            entry.0 += value;
            entry.1 += 1;
        }
    }

    let mut means = BTreeMap::new();
    for (group, (sum, count)) in sums {
        if count == 0 {
            return Err(PipelineError::EmptyGroup(group));
        }
        means.insert(group, sum / count as f64);
    }
    Ok(means)
}

/// National (overall) mean of `indicator`, missing values excluded.
///
/// # Errors
/// `EmptyGroup` when no tract carries a value for the indicator.
pub fn national_average(table: &TractTable, indicator: Indicator) -> Result<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for row in table.rows() {
        if let Some(value) = indicator.value(row) {
            sum += value;
            count += 1;
        }
    }
    if count == 0 {
        return Err(PipelineError::EmptyGroup("national".to_string()));
    }
    Ok(sum / count as f64)
}

/// Display thresholds for choropleth-style binning of an indicator.
///
/// Returns `[0, 1, q(b_1), .., q(b_k), max]` over the non-missing values,
/// with quantiles interpolated linearly between order statistics. The
/// breakpoints come from the pipeline configuration (defaults to quartiles).
///
/// # Errors
/// `InvalidInput` when a breakpoint is outside (0, 1) or the sequence is
/// not strictly increasing; `EmptyGroup` when the indicator has no values.
pub fn percentile_thresholds(
    table: &TractTable,
    indicator: Indicator,
    breakpoints: &[f64],
) -> Result<Vec<f64>> {
    for window in breakpoints.windows(2) {
        if window[1] <= window[0] {
            return Err(PipelineError::InvalidInput(
                "display breakpoints must be strictly increasing".to_string(),
            ));
        }
    }
    if breakpoints.iter().any(|&b| !(0.0..1.0).contains(&b) || b == 0.0) {
        return Err(PipelineError::InvalidInput(
            "display breakpoints must lie strictly between 0 and 1".to_string(),
        ));
    }

    let mut values: Vec<f64> = table
        .rows()
        .iter()
        .filter_map(|row| indicator.value(row))
        .collect();
    if values.is_empty() {
        return Err(PipelineError::EmptyGroup(indicator.name().to_string()));
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut thresholds = vec![0.0, 1.0];
    for &b in breakpoints {
        thresholds.push(quantile(&values, b));
    }
    thresholds.push(*values.last().unwrap_or(&0.0));
    Ok(thresholds)
}

/// Linear-interpolation quantile over sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        sorted[lower]
    } else {
        let fraction = position - lower as f64;
        sorted[lower] + fraction * (sorted[upper] - sorted[lower])
    }
}
