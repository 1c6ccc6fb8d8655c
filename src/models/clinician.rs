//! Clinician practice location model
//!
//! A `ClinicianLocation` is one geocoded practice address, already grouped
//! upstream so that `clinician_count` carries the number of individual
//! practitioners registered at that address for one organization.

use serde::{Deserialize, Serialize};

/// A geocoded clinician practice location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicianLocation {
    /// Upstream address identifier for the practice location
    pub address_id: String,
    /// Organization identifier, when the practice is organizational
    pub organization_id: Option<String>,
    /// Individual clinician identifier, when the practice is individual
    pub clinician_id: Option<String>,
    /// Organization or clinician display name
    pub name: String,
    /// Geocoded latitude in degrees (geographic CRS)
    pub latitude: f64,
    /// Geocoded longitude in degrees (geographic CRS)
    pub longitude: f64,
    /// Number of practitioners sharing this (address, organization) group
    pub clinician_count: u32,
}

impl ClinicianLocation {
    /// Check the source-row invariant: exactly one of `organization_id` and
    /// `clinician_id` is populated.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.organization_id.is_some() != self.clinician_id.is_some()
    }

    /// Whether the geocoded coordinates are usable for projection.
    ///
    /// Out-of-range or non-finite coordinates are a per-record condition; the
    /// projection stage skips such records and counts the skips.
    #[must_use]
    pub fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}
