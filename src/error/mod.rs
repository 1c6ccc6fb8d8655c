//! Error handling for the tract-access pipeline.

use crate::geometry::Crs;

/// Specialized error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A geometry is empty or otherwise unusable.
    ///
    /// Raised per record; callers of the projection/join stages recover by
    /// skipping the record and counting the skip.
    #[error("invalid geometry for tract {tract_id}: {reason}")]
    InvalidGeometry {
        /// GEOID of the offending tract
        tract_id: String,
        /// What made the geometry unusable
        reason: String,
    },

    /// Two inputs meet at a join boundary with different reference systems.
    ///
    /// Always fatal: a join across mismatched CRSs produces wrong results,
    /// not merely imprecise ones.
    #[error("CRS mismatch: expected {expected}, found {found}")]
    CrsMismatch {
        /// CRS the operation requires
        expected: Crs,
        /// CRS actually carried by the input
        found: Crs,
    },

    /// A `tract_id` was required but not present in the table.
    #[error("tract {0} not present in table")]
    MissingJoinKey(String),

    /// A grouped mean was requested for a group with no non-missing values.
    #[error("no non-missing values in group {0}")]
    EmptyGroup(String),

    /// Labeling was requested before a clustering model was fitted.
    #[error("no fitted clustering model; call fit before labeling")]
    ModelNotFitted,

    /// Input data failed validation before processing.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
