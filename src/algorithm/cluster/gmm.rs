//! Diagonal-covariance Gaussian mixture model fitted by EM
//!
//! Component indices carry no semantics: independent fits can converge with
//! components in either order. Callers must map indices to labels by
//! comparing component means, never by raw index (see the parent module).

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Variance floor to keep components from collapsing onto single points
const VARIANCE_FLOOR: f64 = 1e-6;

/// A fitted Gaussian mixture with diagonal covariances
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaussianMixture {
    /// Mixing weights, one per component, summing to one
    pub weights: Vec<f64>,
    /// Component means, `components x dims`
    pub means: Vec<Vec<f64>>,
    /// Component per-dimension variances, `components x dims`
    pub variances: Vec<Vec<f64>>,
}

impl GaussianMixture {
    /// Fit a mixture to the data by expectation-maximization.
    ///
    /// Means are seeded from randomly sampled distinct data rows (seeded
    /// generator, so a fixed seed reproduces the fit), variances from the
    /// global per-dimension variance, weights uniform. Iterates until the
    /// mean log-likelihood improves by less than `tolerance` or
    /// `max_iterations` is reached.
    ///
    /// # Errors
    /// `InvalidInput` when there are fewer rows than components, zero
    /// components, or ragged row dimensions.
    pub fn fit(
        data: &[Vec<f64>],
        components: usize,
        seed: u64,
        max_iterations: usize,
        tolerance: f64,
    ) -> Result<Self> {
        if components == 0 {
            return Err(PipelineError::InvalidInput(
                "mixture must have at least one component".to_string(),
            ));
        }
        if data.len() < components {
            return Err(PipelineError::InvalidInput(format!(
                "{} rows is too few to fit {} components",
                data.len(),
                components
            )));
        }
        let dims = data[0].len();
        if dims == 0 || data.iter().any(|row| row.len() != dims) {
            return Err(PipelineError::InvalidInput(
                "feature rows must be non-empty and uniform in dimension".to_string(),
            ));
        }

        let mut model = Self::initialize(data, components, dims, seed);
        let n = data.len() as f64;
        let mut previous_ll = f64::NEG_INFINITY;

        for iteration in 0..max_iterations {
            // E-step: responsibilities via log-sum-exp for stability.
            let mut responsibilities = vec![vec![0.0; components]; data.len()];
            let mut total_ll = 0.0;
            for (row, resp) in data.iter().zip(&mut responsibilities) {
                let log_joint: Vec<f64> = (0..components)
                    .map(|k| model.weights[k].ln() + model.log_density(k, row))
                    .collect();
                let max = log_joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let log_norm = max
                    + log_joint
                        .iter()
                        .map(|&l| (l - max).exp())
                        .sum::<f64>()
                        .ln();
                total_ll += log_norm;
                for (r, &l) in resp.iter_mut().zip(&log_joint) {
                    *r = (l - log_norm).exp();
                }
            }

            // M-step: weighted means, variances, and mixing weights.
            for k in 0..components {
                let nk: f64 = responsibilities.iter().map(|r| r[k]).sum();
                let nk = nk.max(f64::EPSILON);

                for d in 0..dims {
                    let mean = data
                        .iter()
                        .zip(&responsibilities)
                        .map(|(row, r)| r[k] * row[d])
                        .sum::<f64>()
                        / nk;
                    let variance = data
                        .iter()
                        .zip(&responsibilities)
                        .map(|(row, r)| r[k] * (row[d] - mean).powi(2))
                        .sum::<f64>()
                        / nk;
                    model.means[k][d] = mean;
                    model.variances[k][d] = variance.max(VARIANCE_FLOOR);
                }
                model.weights[k] = nk / n;
            }

            let mean_ll = total_ll / n;
            if (mean_ll - previous_ll).abs() < tolerance {
                debug!("EM converged after {} iterations (ll {mean_ll:.6})", iteration + 1);
                break;
            }
            previous_ll = mean_ll;
        }

        Ok(model)
    }

    /// Number of components
    #[must_use]
    pub fn components(&self) -> usize {
        self.weights.len()
    }

    /// Posterior component probabilities for one standardized row.
    #[must_use]
    pub fn responsibilities(&self, row: &[f64]) -> Vec<f64> {
        let log_joint: Vec<f64> = (0..self.components())
            .map(|k| self.weights[k].ln() + self.log_density(k, row))
            .collect();
        let max = log_joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let norm: f64 = log_joint.iter().map(|&l| (l - max).exp()).sum();
        log_joint.iter().map(|&l| (l - max).exp() / norm).collect()
    }

    /// Hard assignment: index of the most responsible component.
    #[must_use]
    pub fn predict(&self, row: &[f64]) -> usize {
        self.responsibilities(row)
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map_or(0, |(k, _)| k)
    }

    /// The same mixture with component order reversed. Semantically
    /// identical; exercised by tests to pin down that labeling does not
    /// depend on component order.
    #[must_use]
    pub fn swapped(&self) -> Self {
        let mut swapped = self.clone();
        swapped.weights.reverse();
        swapped.means.reverse();
        swapped.variances.reverse();
        swapped
    }

    /// Log density of one diagonal Gaussian component at `row`.
    fn log_density(&self, component: usize, row: &[f64]) -> f64 {
        let mean = &self.means[component];
        let variance = &self.variances[component];
        row.iter()
            .zip(mean)
            .zip(variance)
            .map(|((x, m), v)| {
                -0.5 * ((2.0 * std::f64::consts::PI * v).ln() + (x - m).powi(2) / v)
            })
            .sum()
    }

    fn initialize(data: &[Vec<f64>], components: usize, dims: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let chosen = sample(&mut rng, data.len(), components);
        let means: Vec<Vec<f64>> = chosen.iter().map(|i| data[i].clone()).collect();

        // Global per-dimension variance as the starting spread.
        let n = data.len() as f64;
        let mut global_mean = vec![0.0; dims];
        for row in data {
            for (m, v) in global_mean.iter_mut().zip(row) {
                *m += v / n;
            }
        }
        let mut global_variance = vec![0.0; dims];
        for row in data {
            for ((s, v), m) in global_variance.iter_mut().zip(row).zip(&global_mean) {
                *s += (v - m).powi(2) / n;
            }
        }
        for v in &mut global_variance {
            *v = v.max(VARIANCE_FLOOR);
        }

        Self {
            weights: vec![1.0 / components as f64; components],
            means,
            variances: vec![global_variance; components],
        }
    }
}
