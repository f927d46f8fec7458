//! Distance lookups in an ESDF layer.

use cf_voxfield::{EsdfVoxel, GlobalIndex, Interpolator, Layer};
use nalgebra::Point3;

use crate::error::ValidityResult;
use crate::query::{FieldQuery, FieldStatus};
use crate::robot::RobotModel;

use super::check_voxel_size;

/// Collision checks against a Euclidean signed distance layer.
///
/// One distance read per query: the robot collides when its radius reaches the
/// distance at its center. Lookups that touch unallocated blocks fail closed.
///
/// # Example
///
/// ```
/// use cf_voxfield::{BlockIndex, EsdfVoxel, Layer};
/// use nalgebra::Point3;
/// use route_validity::{EsdfField, FieldStatus, RobotModel};
///
/// let mut layer: Layer<EsdfVoxel> = Layer::with_voxels_per_side(0.5, 8);
/// for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
///     voxel.distance = 1.0;
/// }
///
/// let field = EsdfField::new(&layer, RobotModel::try_new(0.5).unwrap()).unwrap();
/// assert_eq!(field.query(&Point3::new(2.0, 2.0, 2.0)).status, FieldStatus::Known);
/// assert_eq!(field.query(&Point3::new(-1.0, 2.0, 2.0)).status, FieldStatus::Blocked);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct EsdfField<'a> {
    interpolator: Interpolator<'a>,
    robot: RobotModel,
    interpolate: bool,
}

impl<'a> EsdfField<'a> {
    /// Creates an interpolating lookup over `layer` for `robot`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidityError::InvalidVoxelSize`] if the layer's voxel size
    /// is not finite.
    pub fn new(layer: &'a Layer<EsdfVoxel>, robot: RobotModel) -> ValidityResult<Self> {
        check_voxel_size(layer.voxel_size())?;
        Ok(Self {
            interpolator: Interpolator::new(layer),
            robot,
            interpolate: true,
        })
    }

    /// Switches between trilinear interpolation and nearest-voxel reads.
    #[must_use]
    pub const fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Whether distances are interpolated.
    #[must_use]
    pub const fn interpolates(&self) -> bool {
        self.interpolate
    }

    /// The layer being read.
    #[must_use]
    pub const fn layer(&self) -> &'a Layer<EsdfVoxel> {
        self.interpolator.layer()
    }

    /// The robot being checked.
    #[must_use]
    pub const fn robot(&self) -> RobotModel {
        self.robot
    }

    /// Distance to the nearest surface at `point`, if the layer covers it.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> Option<f64> {
        self.interpolator.distance_with(point, self.interpolate)
    }

    /// Classifies `point`.
    #[must_use]
    pub fn query(&self, point: &Point3<f64>) -> FieldQuery {
        self.classify(self.distance(point))
    }

    /// Classifies the center of voxel `index` from its stored distance.
    #[must_use]
    pub fn query_at_voxel(&self, index: GlobalIndex) -> FieldQuery {
        self.classify(self.interpolator.voxel_distance(index))
    }

    fn classify(&self, distance: Option<f64>) -> FieldQuery {
        match distance {
            None => FieldQuery::blocked(),
            Some(d) if self.robot.collides_at(d) => FieldQuery::new(FieldStatus::Blocked, Some(d)),
            Some(d) => FieldQuery::new(FieldStatus::Known, Some(d)),
        }
    }
}
