//! Buffered tract predicate
//!
//! "Within 25 km of a tract" is a strict containment test against the tract
//! polygon expanded by the buffer radius. The buffer is kept implicit: a
//! point lies strictly inside the buffered polygon exactly when its planar
//! distance to the source polygon is below the radius (distance is zero for
//! points inside the polygon itself). This keeps the open-boundary
//! convention (a point at exactly the radius is excluded) without
//! materialising buffer rings.

use geo::{BoundingRect, Distance, Euclidean, MultiPolygon, Point, Rect};

use crate::error::{PipelineError, Result};
use crate::geometry::crs::Crs;

/// One tract polygon in the planar CRS with its buffer radius
#[derive(Debug, Clone)]
pub struct BufferedTract {
    tract_id: String,
    geometry: MultiPolygon<f64>,
    radius_m: f64,
    bbox: Rect<f64>,
}

impl BufferedTract {
    /// Wrap a planar tract geometry with a buffer radius.
    ///
    /// Fails with `InvalidGeometry` when the geometry has no bounding
    /// rectangle (empty or degenerate).
    pub fn new(tract_id: String, geometry: MultiPolygon<f64>, radius_m: f64) -> Result<Self> {
        let bbox = geometry
            .bounding_rect()
            .ok_or_else(|| PipelineError::InvalidGeometry {
                tract_id: tract_id.clone(),
                reason: "no bounding rectangle".to_string(),
            })?;
        Ok(Self {
            tract_id,
            geometry,
            radius_m,
            bbox,
        })
    }

    /// GEOID of the tract
    #[must_use]
    pub fn tract_id(&self) -> &str {
        &self.tract_id
    }

    /// Buffer radius, meters
    #[must_use]
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Strict containment: is the point inside the buffered polygon?
    ///
    /// Open-boundary semantics: a point exactly on the buffer boundary
    /// (distance equal to the radius) is excluded. A point on the source
    /// tract boundary has distance zero and is included.
    #[must_use]
    pub fn contains(&self, point: Point<f64>) -> bool {
        Euclidean.distance(&point, &self.geometry) < self.radius_m
    }

    /// Search envelope for an index query: the tract bounding box expanded
    /// by the radius. A superset of the buffer; candidates still go through
    /// `contains`.
    #[must_use]
    pub fn search_envelope(&self) -> ([f64; 2], [f64; 2]) {
        (
            [self.bbox.min().x - self.radius_m, self.bbox.min().y - self.radius_m],
            [self.bbox.max().x + self.radius_m, self.bbox.max().y + self.radius_m],
        )
    }
}

/// Buffered tracts in one planar CRS, plus the count of skipped inputs
#[derive(Debug, Clone)]
pub struct BufferedTracts {
    /// CRS every tract geometry is expressed in
    pub crs: Crs,
    /// Successfully projected and buffered tracts
    pub tracts: Vec<BufferedTract>,
    /// Source tracts skipped for invalid geometry
    pub skipped: usize,
}

impl BufferedTracts {
    /// GEOIDs of every tract that survived projection. This is the set of
    /// "geometry-valid" tracts the merger zero-fills when absent from the
    /// join mapping.
    #[must_use]
    pub fn tract_ids(&self) -> rustc_hash::FxHashSet<String> {
        self.tracts
            .iter()
            .map(|t| t.tract_id().to_string())
            .collect()
    }
}
