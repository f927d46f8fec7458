//! Voxel payloads stored in a [`Layer`](crate::Layer).

/// Fusion weights below this value mark a TSDF voxel as not yet observed.
pub const TSDF_WEIGHT_EPSILON: f32 = 1e-4;

/// A truncated signed distance voxel.
///
/// `distance` is the (truncated) signed distance to the nearest surface, negative
/// behind the surface. `weight` is the accumulated fusion confidence; a voxel with
/// `weight < TSDF_WEIGHT_EPSILON` has never been observed, regardless of whether its
/// block is allocated.
///
/// # Example
///
/// ```
/// use cf_voxfield::TsdfVoxel;
///
/// assert!(!TsdfVoxel::default().is_observed());
/// assert!(TsdfVoxel::new(0.3, 1.0).is_observed());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TsdfVoxel {
    /// Signed distance to the nearest surface.
    pub distance: f32,
    /// Fusion weight.
    pub weight: f32,
}

impl TsdfVoxel {
    /// Creates a TSDF voxel.
    #[must_use]
    pub const fn new(distance: f32, weight: f32) -> Self {
        Self { distance, weight }
    }

    /// Whether the mapping pipeline has fused at least one observation into this voxel.
    #[must_use]
    pub fn is_observed(&self) -> bool {
        self.weight >= TSDF_WEIGHT_EPSILON
    }
}

/// A Euclidean signed distance voxel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EsdfVoxel {
    /// Signed distance to the nearest obstacle surface.
    pub distance: f32,
}

impl EsdfVoxel {
    /// Creates an ESDF voxel.
    #[must_use]
    pub const fn new(distance: f32) -> Self {
        Self { distance }
    }
}
