//! Voxel regions around a point.

use nalgebra::Point3;

use crate::index::{GlobalIndex, grid_index_from_point};

/// The voxels whose centers lie within a radius of a center voxel's center.
///
/// Membership is decided on integer offsets in voxel space: an offset `(dx, dy, dz)`
/// from the center voxel belongs to the region when
/// `dx² + dy² + dz² <= radius_in_voxels²`. Iteration order is deterministic
/// (z, then y, then x fastest).
///
/// # Example
///
/// ```
/// use cf_voxfield::{GlobalIndex, SphereRegion};
///
/// let region = SphereRegion::around(GlobalIndex::new(0, 0, 0), 1.0);
/// // The center voxel and its six face neighbors
/// assert_eq!(region.iter().count(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereRegion {
    center: GlobalIndex,
    radius_in_voxels: f64,
    extent: i64,
}

impl SphereRegion {
    /// Creates the region around a voxel. Negative radii are treated as zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn around(center: GlobalIndex, radius_in_voxels: f64) -> Self {
        let radius_in_voxels = if radius_in_voxels.is_finite() {
            radius_in_voxels.max(0.0)
        } else {
            0.0
        };
        Self {
            center,
            radius_in_voxels,
            // Finite and non-negative, so the floor fits any realistic robot
            extent: radius_in_voxels.floor() as i64,
        }
    }

    /// Creates the region around a world-space point for a layer with the given
    /// voxel size.
    #[must_use]
    pub fn around_point(point: &Point3<f64>, radius: f64, voxel_size: f64) -> Self {
        let inv_voxel_size = 1.0 / voxel_size;
        Self::around(
            grid_index_from_point(point, inv_voxel_size),
            radius * inv_voxel_size,
        )
    }

    /// The center voxel.
    #[must_use]
    pub const fn center(&self) -> GlobalIndex {
        self.center
    }

    /// Radius in voxel units.
    #[must_use]
    pub const fn radius_in_voxels(&self) -> f64 {
        self.radius_in_voxels
    }

    /// Whether a voxel belongs to the region.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn contains(&self, index: GlobalIndex) -> bool {
        let offset = index - self.center;
        let squared = (offset.x as f64).mul_add(
            offset.x as f64,
            (offset.y as f64).mul_add(offset.y as f64, (offset.z * offset.z) as f64),
        );
        squared <= self.radius_in_voxels * self.radius_in_voxels
    }

    /// Iterates over every voxel of the region.
    pub fn iter(&self) -> impl Iterator<Item = GlobalIndex> + '_ {
        let extent = self.extent;
        (-extent..=extent)
            .flat_map(move |dz| {
                (-extent..=extent)
                    .flat_map(move |dy| (-extent..=extent).map(move |dx| (dx, dy, dz)))
            })
            .map(|(dx, dy, dz)| self.center.offset(dx, dy, dz))
            .filter(|index| self.contains(*index))
    }
}
