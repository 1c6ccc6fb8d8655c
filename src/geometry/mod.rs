//! Projection and buffering engine
//!
//! Reprojects tract polygons and clinician points into a shared equal-area
//! planar CRS and expresses the fixed-radius buffer as a strict distance
//! predicate over the planar geometry.

pub mod buffer;
pub mod crs;
pub mod projection;

pub use buffer::{BufferedTract, BufferedTracts};
pub use crs::Crs;
pub use projection::{AlbersEqualArea, AlbersParams, ClinicianPoint, ProjectedClinicians};
