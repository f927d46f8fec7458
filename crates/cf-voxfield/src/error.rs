//! Error types for layer construction.

/// Result type for voxel field operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors that can occur when building a voxel layer.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FieldError {
    /// The voxel size must be positive and finite.
    #[error("voxel size must be positive and finite, got {0}")]
    InvalidVoxelSize(f64),

    /// Blocks must hold at least one voxel per side.
    #[error("voxels per side must be non-zero, got {0}")]
    InvalidVoxelsPerSide(u32),
}
