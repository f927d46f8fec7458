//! Voxel-by-voxel segment checks.

use cf_voxfield::{GlobalIndex, cast_ray};
use nalgebra::Point3;
use tracing::{debug, trace};

use crate::error::{ValidityError, ValidityResult};
use crate::field::DistanceField;
use crate::query::MotionCheck;

use super::MotionValidator;

/// Checks a segment by querying every voxel it passes through.
///
/// Endpoints are mapped into grid coordinates and the traversed voxels are visited
/// from start to goal. The first colliding voxel at position `k` of `n` ends the
/// check with `fraction = k / n`. The last valid point is the point at that fraction
/// along the segment, so it never lies behind `start` or off the segment; when the
/// very first voxel collides it is `start` itself.
///
/// # Example
///
/// ```
/// use cf_voxfield::{BlockIndex, EsdfVoxel, GlobalIndex, Layer};
/// use nalgebra::Point3;
/// use route_validity::{
///     DiscreteRayValidator, DistanceField, EsdfField, MotionValidator, RobotModel,
/// };
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.2);
/// for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
///     voxel.distance = 1.0;
/// }
/// layer.set_voxel(GlobalIndex::new(5, 0, 0), EsdfVoxel::new(-0.1));
///
/// let robot = RobotModel::try_new(0.3).unwrap();
/// let field = DistanceField::from(EsdfField::new(&layer, robot).unwrap());
/// let validator = DiscreteRayValidator::new(&field).unwrap();
///
/// let check = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
/// assert!(!check.valid);
/// assert!((check.fraction - 5.0 / 11.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DiscreteRayValidator<'a> {
    field: &'a DistanceField<'a>,
    voxel_size: f64,
}

impl<'a> DiscreteRayValidator<'a> {
    /// Creates a validator over a field with a voxel grid.
    ///
    /// # Errors
    ///
    /// Returns [`ValidityError::MissingVoxelPath`] for fields without per-voxel
    /// queries.
    pub fn new(field: &'a DistanceField<'a>) -> ValidityResult<Self> {
        let voxel_size = match field {
            DistanceField::Tsdf(_) | DistanceField::Esdf(_) => field.voxel_size(),
            DistanceField::Opaque(_) => None,
        };
        let voxel_size = voxel_size.ok_or(ValidityError::MissingVoxelPath {
            field: field.kind(),
        })?;
        debug!(field = field.kind(), voxel_size, "discrete ray validator ready");
        Ok(Self { field, voxel_size })
    }

    /// Edge length of the traversed voxels.
    #[must_use]
    pub const fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    fn collides_at(&self, index: GlobalIndex) -> bool {
        self.field
            .query_at_voxel(index)
            .is_none_or(|query| query.is_collision())
    }
}

impl MotionValidator for DiscreteRayValidator<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn check_motion_detailed(&self, start: &Point3<f64>, goal: &Point3<f64>) -> MotionCheck {
        let inv_voxel_size = 1.0 / self.voxel_size;
        let traversal = cast_ray(
            &Point3::from(start.coords * inv_voxel_size),
            &Point3::from(goal.coords * inv_voxel_size),
        );
        let total = traversal.len();

        for (k, index) in traversal.enumerate() {
            if self.collides_at(index) {
                let fraction = k as f64 / total as f64;
                let last_valid = start + (goal - start) * fraction;
                trace!(
                    x = index.x,
                    y = index.y,
                    z = index.z,
                    position = k,
                    total,
                    fraction,
                    "segment blocked at voxel"
                );
                return MotionCheck::blocked(last_valid, fraction);
            }
        }

        MotionCheck::clear()
    }
}
