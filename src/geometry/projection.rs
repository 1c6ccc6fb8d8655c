//! Equal-area planar projection
//!
//! Buffering by a metric radius and point-in-polygon tests are only valid in
//! a planar, distance-preserving reference. This module implements a
//! spherical Albers equal-area conic projection with CONUS parameters and
//! reprojects both tract polygons and clinician points into it before any
//! distance-based operation runs.

use geo::{Coord, MapCoords, Point};
use log::warn;

use crate::error::{PipelineError, Result};
use crate::geometry::buffer::{BufferedTract, BufferedTracts};
use crate::geometry::crs::Crs;
use crate::models::{ClinicianLocation, TractGeometry};

/// Mean authalic Earth radius in meters
const AUTHALIC_RADIUS_M: f64 = 6_371_007.2;

/// Parameters of an Albers equal-area conic projection
#[derive(Debug, Clone, PartialEq)]
pub struct AlbersParams {
    /// Latitude of origin, degrees
    pub reference_lat_deg: f64,
    /// Central meridian, degrees
    pub central_meridian_deg: f64,
    /// First standard parallel, degrees
    pub std_parallel_1_deg: f64,
    /// Second standard parallel, degrees
    pub std_parallel_2_deg: f64,
}

impl Default for AlbersParams {
    /// CONUS Albers parameters (origin 23°N 96°W, standard parallels at
    /// 29.5°N and 45.5°N), accurate for distance work across the
    /// contiguous United States.
    fn default() -> Self {
        Self {
            reference_lat_deg: 23.0,
            central_meridian_deg: -96.0,
            std_parallel_1_deg: 29.5,
            std_parallel_2_deg: 45.5,
        }
    }
}

/// A projected clinician point in the planar CRS
#[derive(Debug, Clone, Copy)]
pub struct ClinicianPoint {
    /// Planar position, meters
    pub position: Point<f64>,
    /// Practitioners at this location
    pub count: u32,
}

/// Clinician points reprojected into one planar CRS
#[derive(Debug, Clone)]
pub struct ProjectedClinicians {
    /// CRS every point is expressed in
    pub crs: Crs,
    /// The projected points
    pub points: Vec<ClinicianPoint>,
    /// Source records skipped for invalid coordinates
    pub skipped: usize,
}

/// Spherical Albers equal-area conic projection, precomputed constants
#[derive(Debug, Clone)]
pub struct AlbersEqualArea {
    params: AlbersParams,
    n: f64,
    c: f64,
    rho0: f64,
    lambda0: f64,
}

impl AlbersEqualArea {
    /// Precompute the projection constants for the given parameters.
    #[must_use]
    pub fn new(params: AlbersParams) -> Self {
        let phi0 = params.reference_lat_deg.to_radians();
        let phi1 = params.std_parallel_1_deg.to_radians();
        let phi2 = params.std_parallel_2_deg.to_radians();
        let lambda0 = params.central_meridian_deg.to_radians();

        let n = (phi1.sin() + phi2.sin()) / 2.0;
        let c = phi1.cos().powi(2) + 2.0 * n * phi1.sin();
        let rho0 = AUTHALIC_RADIUS_M * (c - 2.0 * n * phi0.sin()).sqrt() / n;

        Self {
            params,
            n,
            c,
            rho0,
            lambda0,
        }
    }

    /// Parameters this projection was built from
    #[must_use]
    pub fn params(&self) -> &AlbersParams {
        &self.params
    }

    /// The planar CRS produced by this projection
    #[must_use]
    pub const fn planar_crs(&self) -> Crs {
        Crs::ConusAlbers
    }

    /// Forward-project a geographic coordinate (degrees) to planar meters.
    #[must_use]
    pub fn forward(&self, coord: Coord<f64>) -> Coord<f64> {
        let phi = coord.y.to_radians();
        let lambda = coord.x.to_radians();

        let rho = AUTHALIC_RADIUS_M * (self.c - 2.0 * self.n * phi.sin()).sqrt() / self.n;
        let theta = self.n * (lambda - self.lambda0);

        Coord {
            x: rho * theta.sin(),
            y: self.rho0 - rho * theta.cos(),
        }
    }

    /// Reproject tract polygons and attach the buffer radius.
    ///
    /// Tracts with empty or non-finite geometry are skipped with a warning
    /// and counted; they contribute zero matches downstream. A tract already
    /// carrying a planar CRS is fatal: it cannot be forward-projected again
    /// without producing wrong coordinates.
    pub fn buffer_tracts(
        &self,
        tracts: &[TractGeometry],
        radius_m: f64,
    ) -> Result<BufferedTracts> {
        let mut buffered = Vec::with_capacity(tracts.len());
        let mut skipped = 0usize;

        for tract in tracts {
            if !tract.crs.is_geographic() {
                return Err(PipelineError::CrsMismatch {
                    expected: Crs::Nad83,
                    found: tract.crs,
                });
            }
            if let Err(reason) = validate_geographic_multipolygon(&tract.geometry) {
                warn!("skipping tract {}: {reason}", tract.tract_id);
                skipped += 1;
                continue;
            }

            let planar = tract.geometry.map_coords(|c| self.forward(c));
            match BufferedTract::new(tract.tract_id.clone(), planar, radius_m) {
                Ok(b) => buffered.push(b),
                Err(e) => {
                    warn!("skipping tract {}: {e}", tract.tract_id);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!("{skipped} tract geometries skipped as invalid");
        }

        Ok(BufferedTracts {
            crs: self.planar_crs(),
            tracts: buffered,
            skipped,
        })
    }

    /// Reproject clinician locations into the planar CRS.
    ///
    /// Records with missing or out-of-range coordinates are skipped with a
    /// warning and counted; the run continues.
    #[must_use]
    pub fn project_clinicians(&self, locations: &[ClinicianLocation]) -> ProjectedClinicians {
        let mut points = Vec::with_capacity(locations.len());
        let mut skipped = 0usize;

        for location in locations {
            if !location.has_valid_coordinates() {
                warn!(
                    "skipping clinician location {} ({}): invalid coordinates ({}, {})",
                    location.address_id, location.name, location.latitude, location.longitude
                );
                skipped += 1;
                continue;
            }
            let planar = self.forward(Coord {
                x: location.longitude,
                y: location.latitude,
            });
            points.push(ClinicianPoint {
                position: Point::from(planar),
                count: location.clinician_count,
            });
        }

        if skipped > 0 {
            warn!("{skipped} clinician locations skipped for invalid coordinates");
        }

        ProjectedClinicians {
            crs: self.planar_crs(),
            points,
            skipped,
        }
    }
}

/// Check that a geographic multipolygon is non-empty with in-range,
/// finite coordinates.
fn validate_geographic_multipolygon(
    geometry: &geo::MultiPolygon<f64>,
) -> std::result::Result<(), String> {
    if geometry.0.is_empty() {
        return Err("empty geometry".to_string());
    }
    for polygon in &geometry.0 {
        if polygon.exterior().0.is_empty() {
            return Err("polygon with empty exterior ring".to_string());
        }
        for coord in polygon.exterior().0.iter().chain(
            polygon
                .interiors()
                .iter()
                .flat_map(|ring| ring.0.iter()),
        ) {
            if !coord.x.is_finite() || !coord.y.is_finite() {
                return Err("non-finite coordinate".to_string());
            }
            if !(-180.0..=180.0).contains(&coord.x) || !(-90.0..=90.0).contains(&coord.y) {
                return Err(format!("coordinate out of range: ({}, {})", coord.x, coord.y));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Great-circle distance on the authalic sphere, meters.
    fn haversine_m(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
        let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
        let dphi = phi2 - phi1;
        let dlambda = (lon2 - lon1).to_radians();
        let a = (dphi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
        2.0 * AUTHALIC_RADIUS_M * a.sqrt().asin()
    }

    #[test]
    fn planar_distance_tracks_great_circle_distance() {
        let projection = AlbersEqualArea::new(AlbersParams::default());

        // Atlanta to Athens, GA: roughly 96 km.
        let a = projection.forward(Coord { x: -84.39, y: 33.75 });
        let b = projection.forward(Coord { x: -83.38, y: 33.96 });
        let planar = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        let geodesic = haversine_m(33.75, -84.39, 33.96, -83.38);

        let relative_error = (planar - geodesic).abs() / geodesic;
        assert!(
            relative_error < 0.01,
            "planar {planar} m vs geodesic {geodesic} m"
        );
    }

    #[test]
    fn central_meridian_projects_to_zero_x() {
        let projection = AlbersEqualArea::new(AlbersParams::default());
        let on_meridian = projection.forward(Coord { x: -96.0, y: 40.0 });
        assert!(on_meridian.x.abs() < 1e-6);
    }
}
