//! Error types for validity checker construction.
//!
//! Queries never fail: a point or segment that cannot be confirmed safe is reported
//! as invalid. Errors only arise when a checker or validator is assembled from an
//! unusable configuration.

/// Result type for validity checker construction.
pub type ValidityResult<T> = Result<T, ValidityError>;

/// Errors raised while building a validity checker or motion validator.
///
/// # Example
///
/// ```
/// use route_validity::{RobotModel, ValidityError};
///
/// let error = RobotModel::try_new(-0.3).unwrap_err();
/// assert!(matches!(error, ValidityError::InvalidRobotRadius(_)));
/// assert!(error.to_string().contains("robot radius"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ValidityError {
    /// The robot radius must be positive and finite.
    #[error("robot radius must be positive and finite, got {0}")]
    InvalidRobotRadius(f64),

    /// The map voxel size must be positive and finite.
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f64),

    /// The ray-march step must be positive and finite.
    #[error("ray-march step must be positive and finite, got {0}")]
    InvalidMarchStep(f64),

    /// The minimum clearance threshold must be non-negative and finite.
    #[error("minimum clearance must be non-negative and finite, got {0}")]
    InvalidClearanceThreshold(f64),

    /// The discrete validator needs a field that can be queried per voxel.
    #[error("{field} field has no per-voxel query; use the continuous validator")]
    MissingVoxelPath {
        /// Kind of the configured field.
        field: &'static str,
    },

    /// The continuous validator needs a scalar distance field.
    #[error("{field} field has no scalar distance; use the discrete validator")]
    MissingScalarDistance {
        /// Kind of the configured field.
        field: &'static str,
    },

    /// A field without a grid resolution needs an explicit ray-march step.
    #[error("{field} field has no voxel size; configure a ray-march step")]
    MissingMarchStep {
        /// Kind of the configured field.
        field: &'static str,
    },
}
