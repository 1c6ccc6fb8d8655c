//! Vulnerability clustering engine
//!
//! Fits a two-component Gaussian mixture over standardized socio-economic
//! and accessibility features and assigns each tract a semantic label.
//! Because mixture component order is not stable across fits, labels are
//! resolved by an ordering criterion over component means: the component
//! with the higher mean standardized clinician accessibility is
//! `LowVulnerability` (ties broken by the lower mean percent uninsured).
//! Fitting and labeling are distinct operations; labeling without a fitted
//! model is an error.

pub mod features;
pub mod gmm;

use log::info;
use serde::Serialize;

pub use features::{FeatureMatrix, Standardizer, extract_features};
pub use gmm::GaussianMixture;

use crate::error::{PipelineError, Result};
use crate::models::{Indicator, TractTable, VulnerabilityLabel};

const GMM_COMPONENTS: usize = 2;
const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-6;

/// Fitted per-component statistics, in original feature units
///
/// The display artifact for cluster-vs-cluster comparison; serializable so
/// downstream persistence can store it alongside the labeled table.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    /// Semantic label resolved for this component
    pub label: VulnerabilityLabel,
    /// Mixing weight (share of tracts attributed to the component)
    pub weight: f64,
    /// Mean of each feature, unstandardized
    pub means: Vec<(Indicator, f64)>,
}

/// A fitted vulnerability model: scaler, mixture, and resolved label order
#[derive(Debug, Clone)]
pub struct VulnerabilityModel {
    features: Vec<Indicator>,
    scaler: Standardizer,
    mixture: GaussianMixture,
    low_component: usize,
}

impl VulnerabilityModel {
    /// Build a model from a fitted mixture, resolving which component is
    /// `LowVulnerability` by the ordering criterion.
    ///
    /// # Errors
    /// `InvalidInput` when the mixture is not two-component or the feature
    /// set lacks `TotalClinicians` (the criterion needs an accessibility
    /// axis to order components).
    pub fn from_mixture(
        features: Vec<Indicator>,
        scaler: Standardizer,
        mixture: GaussianMixture,
    ) -> Result<Self> {
        if mixture.components() != GMM_COMPONENTS {
            return Err(PipelineError::InvalidInput(format!(
                "vulnerability model requires {GMM_COMPONENTS} components, mixture has {}",
                mixture.components()
            )));
        }
        let access_axis = features
            .iter()
            .position(|f| *f == Indicator::TotalClinicians)
            .ok_or_else(|| {
                PipelineError::InvalidInput(
                    "clustering features must include total_clinicians".to_string(),
                )
            })?;

        let low_component = Self::resolve_low_component(&mixture, &features, access_axis);
        Ok(Self {
            features,
            scaler,
            mixture,
            low_component,
        })
    }

    /// Ordering criterion: higher mean accessibility wins "low
    /// vulnerability"; on a tie, lower mean percent uninsured.
    fn resolve_low_component(
        mixture: &GaussianMixture,
        features: &[Indicator],
        access_axis: usize,
    ) -> usize {
        let a = mixture.means[0][access_axis];
        let b = mixture.means[1][access_axis];
        if a > b {
            return 0;
        }
        if b > a {
            return 1;
        }
        if let Some(uninsured_axis) = features.iter().position(|f| *f == Indicator::PctUninsured) {
            if mixture.means[0][uninsured_axis] <= mixture.means[1][uninsured_axis] {
                return 0;
            }
            return 1;
        }
        0
    }

    /// Indicators the model was fitted over, in column order
    #[must_use]
    pub fn features(&self) -> &[Indicator] {
        &self.features
    }

    /// Semantic label for a raw component index
    #[must_use]
    pub fn label_for_component(&self, component: usize) -> VulnerabilityLabel {
        if component == self.low_component {
            VulnerabilityLabel::LowVulnerability
        } else {
            VulnerabilityLabel::HighVulnerability
        }
    }

    /// Fitted component means in original units, low-vulnerability first.
    #[must_use]
    pub fn component_summaries(&self) -> [ComponentSummary; GMM_COMPONENTS] {
        let summarize = |component: usize| {
            let means = self.scaler.inverse(&self.mixture.means[component]);
            ComponentSummary {
                label: self.label_for_component(component),
                weight: self.mixture.weights[component],
                means: self.features.iter().copied().zip(means).collect(),
            }
        };
        [
            summarize(self.low_component),
            summarize(1 - self.low_component),
        ]
    }

    /// Label one raw feature row; `None` (missing features) stays `None`.
    #[must_use]
    pub fn assign(&self, row: Option<&Vec<f64>>) -> Option<VulnerabilityLabel> {
        let row = row?;
        let standardized = self.scaler.transform(row);
        Some(self.label_for_component(self.mixture.predict(&standardized)))
    }

    /// Label every tract in the table, aligned with its rows.
    pub fn label_table(&self, table: &TractTable) -> Result<Vec<Option<VulnerabilityLabel>>> {
        let matrix = extract_features(table, &self.features)?;
        Ok(matrix.rows.iter().map(|row| self.assign(row.as_ref())).collect())
    }
}

/// The clustering engine: holds configuration and, after `fit`, the model
///
/// Re-fitting replaces the model wholesale; labeling with no model yet is
/// `ModelNotFitted`.
#[derive(Debug)]
pub struct VulnerabilityClusterer {
    features: Vec<Indicator>,
    seed: u64,
    model: Option<VulnerabilityModel>,
}

impl VulnerabilityClusterer {
    /// Create an unfitted engine over the given feature subset.
    #[must_use]
    pub fn new(features: Vec<Indicator>, seed: u64) -> Self {
        Self {
            features,
            seed,
            model: None,
        }
    }

    /// Fit the mixture on the complete rows of the merged table.
    ///
    /// Tracts with missing features are excluded from fitting (and later
    /// labeled `None`).
    pub fn fit(&mut self, table: &TractTable) -> Result<&VulnerabilityModel> {
        let matrix = extract_features(table, &self.features)?;
        let complete = matrix.complete_rows();
        info!(
            "fitting vulnerability model on {} of {} tracts ({} features)",
            complete.len(),
            table.len(),
            self.features.len()
        );

        let scaler = Standardizer::fit(&complete)?;
        let standardized: Vec<Vec<f64>> = complete.iter().map(|r| scaler.transform(r)).collect();
        let mixture = GaussianMixture::fit(
            &standardized,
            GMM_COMPONENTS,
            self.seed,
            MAX_ITERATIONS,
            TOLERANCE,
        )?;

        let model = VulnerabilityModel::from_mixture(self.features.clone(), scaler, mixture)?;
        Ok(self.model.insert(model))
    }

    /// Label every tract with the fitted model.
    ///
    /// # Errors
    /// `ModelNotFitted` when `fit` has not run.
    pub fn label(&self, table: &TractTable) -> Result<Vec<Option<VulnerabilityLabel>>> {
        let model = self.model.as_ref().ok_or(PipelineError::ModelNotFitted)?;
        model.label_table(table)
    }

    /// The fitted model, if any
    #[must_use]
    pub fn model(&self) -> Option<&VulnerabilityModel> {
        self.model.as_ref()
    }
}
