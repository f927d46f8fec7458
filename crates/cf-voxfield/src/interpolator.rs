//! Distance lookup over an ESDF layer.
//!
//! Trilinear interpolation blends the eight voxels whose centers surround the query
//! point. Any of those voxels living in an unallocated block makes the lookup fail;
//! callers decide how to treat the unknown region.

use nalgebra::{Point3, Vector3};

use crate::index::{GlobalIndex, grid_index_from_scaled, lerp};
use crate::layer::Layer;
use crate::voxel::EsdfVoxel;

/// Read-only distance sampler bound to one ESDF layer.
///
/// # Example
///
/// ```
/// use cf_voxfield::{BlockIndex, EsdfVoxel, Interpolator, Layer};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::with_voxels_per_side(1.0, 4);
/// for (index, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
///     voxel.distance = index.x as f32;
/// }
///
/// let interpolator = Interpolator::new(&layer);
/// // Halfway between the centers of voxels x = 1 and x = 2
/// let distance = interpolator.distance(&Point3::new(2.0, 1.5, 1.5)).unwrap();
/// assert!((distance - 1.5).abs() < 1e-6);
///
/// // Outside the allocated block
/// assert!(interpolator.distance(&Point3::new(-3.0, 1.5, 1.5)).is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Interpolator<'a> {
    layer: &'a Layer<EsdfVoxel>,
}

impl<'a> Interpolator<'a> {
    /// Binds an interpolator to a layer.
    #[must_use]
    pub const fn new(layer: &'a Layer<EsdfVoxel>) -> Self {
        Self { layer }
    }

    /// The layer this interpolator reads.
    #[must_use]
    pub const fn layer(&self) -> &'a Layer<EsdfVoxel> {
        self.layer
    }

    /// Trilinear distance estimate at `point`.
    ///
    /// Returns `None` when any of the eight surrounding voxels is not allocated.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> Option<f64> {
        let inv = self.layer.inv_voxel_size();
        // Shift by half a voxel so that integer coordinates land on voxel centers
        let scaled = point.coords * inv - Vector3::repeat(0.5);
        let lower = grid_index_from_scaled(&Point3::from(scaled));
        let weight = (scaled - lower.to_grid_point().coords).map(|w| w.clamp(0.0, 1.0));

        let mut corners = [0.0f64; 8];
        for (slot, corner) in corners.iter_mut().enumerate() {
            let dx = i64::from(slot & 1 != 0);
            let dy = i64::from(slot & 2 != 0);
            let dz = i64::from(slot & 4 != 0);
            *corner = self.voxel_distance(lower.offset(dx, dy, dz))?;
        }

        let x00 = lerp(corners[0], corners[1], weight.x);
        let x10 = lerp(corners[2], corners[3], weight.x);
        let x01 = lerp(corners[4], corners[5], weight.x);
        let x11 = lerp(corners[6], corners[7], weight.x);
        let y0 = lerp(x00, x10, weight.y);
        let y1 = lerp(x01, x11, weight.y);
        Some(lerp(y0, y1, weight.z))
    }

    /// Distance stored in the voxel containing `point`, without blending.
    #[must_use]
    pub fn nearest_distance(&self, point: &Point3<f64>) -> Option<f64> {
        self.voxel_distance(self.layer.global_index_from_point(point))
    }

    /// Dispatches to [`Interpolator::distance`] or [`Interpolator::nearest_distance`].
    #[must_use]
    pub fn distance_with(&self, point: &Point3<f64>, interpolate: bool) -> Option<f64> {
        if interpolate {
            self.distance(point)
        } else {
            self.nearest_distance(point)
        }
    }

    /// Distance stored at a global voxel index.
    #[must_use]
    pub fn voxel_distance(&self, index: GlobalIndex) -> Option<f64> {
        self.layer
            .voxel_by_global_index(index)
            .map(|voxel| f64::from(voxel.distance))
    }
}
