//! Feature extraction and standardization for clustering
//!
//! Rows with any missing required feature are kept as `None` so labeling can
//! mark them "Undefined" instead of imputing a guess.

use crate::error::{PipelineError, Result};
use crate::models::{Indicator, TractTable};

/// Per-tract feature vectors aligned with the table rows
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    /// Indicators, in column order
    pub features: Vec<Indicator>,
    /// One entry per table row; `None` when any required feature is missing
    pub rows: Vec<Option<Vec<f64>>>,
}

impl FeatureMatrix {
    /// The complete (no missing feature) rows, used for fitting.
    #[must_use]
    pub fn complete_rows(&self) -> Vec<Vec<f64>> {
        self.rows.iter().flatten().cloned().collect()
    }
}

/// Extract the configured feature subset from the merged table.
///
/// # Errors
/// `InvalidInput` when the feature list is empty.
pub fn extract_features(table: &TractTable, features: &[Indicator]) -> Result<FeatureMatrix> {
    if features.is_empty() {
        return Err(PipelineError::InvalidInput(
            "clustering feature list is empty".to_string(),
        ));
    }

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            features
                .iter()
                .map(|f| f.value(row))
                .collect::<Option<Vec<f64>>>()
        })
        .collect();

    Ok(FeatureMatrix {
        features: features.to_vec(),
        rows,
    })
}

/// Z-score standardizer fitted on the complete rows
///
/// Constant features (zero variance) transform to zero rather than dividing
/// by zero.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Standardizer {
    /// Per-feature means
    pub means: Vec<f64>,
    /// Per-feature population standard deviations
    pub stds: Vec<f64>,
}

const STD_FLOOR: f64 = 1e-12;

impl Standardizer {
    /// Fit means and standard deviations over the given rows.
    ///
    /// # Errors
    /// `InvalidInput` when no rows are available.
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Err(PipelineError::InvalidInput(
                "cannot standardize an empty feature matrix".to_string(),
            ));
        };
        let dims = first.len();
        let n = rows.len() as f64;

        let mut means = vec![0.0; dims];
        for row in rows {
            for (m, v) in means.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in &mut means {
            *m /= n;
        }

        let mut stds = vec![0.0; dims];
        for row in rows {
            for ((s, v), m) in stds.iter_mut().zip(row).zip(&means) {
                *s += (v - m).powi(2);
            }
        }
        for s in &mut stds {
            *s = (*s / n).sqrt();
        }

        Ok(Self { means, stds })
    }

    /// Transform a raw feature row into z-scores.
    #[must_use]
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.means)
            .zip(&self.stds)
            .map(|((v, m), s)| {
                if *s < STD_FLOOR {
                    0.0
                } else {
                    (v - m) / s
                }
            })
            .collect()
    }

    /// Map a standardized row back to original feature units.
    #[must_use]
    pub fn inverse(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(&self.means)
            .zip(&self.stds)
            .map(|((z, m), s)| if *s < STD_FLOOR { *m } else { z * s + m })
            .collect()
    }
}
