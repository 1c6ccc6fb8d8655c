//! Numeric tract indicators
//!
//! `Indicator` is the shared seam between the statistics module and the
//! clustering engine: both address tract fields through it rather than
//! hardcoding field access.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::tract::TractRecord;

/// A numeric per-tract indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// Median household income (USD)
    MedianHouseholdIncome,
    /// Median home price (USD)
    MedianHomePrice,
    /// Income-disparity index, 0-1
    IncomeDisparity,
    /// Unemployment rate, percent
    UnemploymentRate,
    /// Percent uninsured
    PctUninsured,
    /// Percent disabled
    PctDisabled,
    /// Percent of households with no vehicle
    PctNoVehicle,
    /// Percent non-white
    PctNonWhite,
    /// Percent rent-burdened households
    PctRentBurdened,
    /// Percent single-parent households
    PctSingleParent,
    /// Clinicians within the buffer radius (derived by the join engine)
    TotalClinicians,
}

impl Indicator {
    /// Every indicator, socio-economic fields first, accessibility last.
    #[must_use]
    pub const fn all() -> [Self; 11] {
        [
            Self::MedianHouseholdIncome,
            Self::MedianHomePrice,
            Self::IncomeDisparity,
            Self::UnemploymentRate,
            Self::PctUninsured,
            Self::PctDisabled,
            Self::PctNoVehicle,
            Self::PctNonWhite,
            Self::PctRentBurdened,
            Self::PctSingleParent,
            Self::TotalClinicians,
        ]
    }

    /// Read this indicator's value from a merged tract record.
    ///
    /// `None` means "no estimate" and is excluded from means and from
    /// clustering. `TotalClinicians` is always present on a merged record
    /// (zero-match tracts are zero-filled by the merger).
    #[must_use]
    pub fn value(&self, record: &TractRecord) -> Option<f64> {
        let attrs = &record.attributes;
        match self {
            Self::MedianHouseholdIncome => attrs.median_household_income,
            Self::MedianHomePrice => attrs.median_home_price,
            Self::IncomeDisparity => attrs.income_disparity,
            Self::UnemploymentRate => attrs.unemployment_rate,
            Self::PctUninsured => attrs.pct_uninsured,
            Self::PctDisabled => attrs.pct_disabled,
            Self::PctNoVehicle => attrs.pct_no_vehicle,
            Self::PctNonWhite => attrs.pct_non_white,
            Self::PctRentBurdened => attrs.pct_rent_burdened,
            Self::PctSingleParent => attrs.pct_single_parent,
            Self::TotalClinicians => Some(record.total_clinicians as f64),
        }
    }

    /// Stable snake_case name, used in logs and serialized artifacts.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MedianHouseholdIncome => "median_household_income",
            Self::MedianHomePrice => "median_home_price",
            Self::IncomeDisparity => "income_disparity",
            Self::UnemploymentRate => "unemployment_rate",
            Self::PctUninsured => "pct_uninsured",
            Self::PctDisabled => "pct_disabled",
            Self::PctNoVehicle => "pct_no_vehicle",
            Self::PctNonWhite => "pct_non_white",
            Self::PctRentBurdened => "pct_rent_burdened",
            Self::PctSingleParent => "pct_single_parent",
            Self::TotalClinicians => "total_clinicians",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
