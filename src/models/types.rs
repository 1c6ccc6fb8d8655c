//! Shared label and grouping types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic vulnerability cluster label
///
/// Raw mixture-component indices are never exposed: component order is not
/// stable across fits, so the clustering engine maps components to these
/// labels by comparing component means (see `algorithm::cluster`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnerabilityLabel {
    /// Higher clinician accessibility, lower deprivation profile
    LowVulnerability,
    /// Lower clinician accessibility, higher deprivation profile
    HighVulnerability,
}

impl fmt::Display for VulnerabilityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowVulnerability => write!(f, "Low Vulnerability"),
            Self::HighVulnerability => write!(f, "High Vulnerability"),
        }
    }
}

/// Grouping key for the aggregate statistics module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Group tracts by state abbreviation
    State,
    /// Group tracts by vulnerability cluster label; tracts with an undefined
    /// label are excluded from the grouping
    Cluster,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::State => write!(f, "state"),
            Self::Cluster => write!(f, "cluster"),
        }
    }
}
