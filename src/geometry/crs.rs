//! Coordinate reference system tags
//!
//! Every geometry in the pipeline carries a `Crs` tag. Distance-based
//! operations (buffering, containment) are only valid between geometries in
//! the same planar CRS; the join engine checks tags before touching
//! coordinates and fails fast on a mismatch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reference system a geometry's coordinates are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crs {
    /// WGS 84 geographic coordinates (EPSG:4326), degrees
    Wgs84,
    /// NAD 83 geographic coordinates (EPSG:4269), degrees; how census tract
    /// geometries are usually delivered
    Nad83,
    /// CONUS Albers equal-area conic, meters; the planar CRS all
    /// distance-based operations run in
    ConusAlbers,
}

impl Crs {
    /// Whether coordinates are latitude/longitude degrees
    #[must_use]
    pub const fn is_geographic(&self) -> bool {
        matches!(self, Self::Wgs84 | Self::Nad83)
    }

    /// Whether coordinates are planar meters
    #[must_use]
    pub const fn is_planar(&self) -> bool {
        matches!(self, Self::ConusAlbers)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wgs84 => write!(f, "EPSG:4326 (WGS 84)"),
            Self::Nad83 => write!(f, "EPSG:4269 (NAD 83)"),
            Self::ConusAlbers => write!(f, "CONUS Albers equal-area"),
        }
    }
}
