//! Ray-marching segment checks over scalar distance fields.

use nalgebra::Point3;
use tracing::{debug, trace};

use crate::config::ValidityConfig;
use crate::error::{ValidityError, ValidityResult};
use crate::field::DistanceField;
use crate::query::MotionCheck;
use crate::robot::RobotModel;

use super::MotionValidator;

/// Checks a segment by marching along it with clearance-limited steps.
///
/// At each position the remaining clearance `distance - radius` bounds how far the
/// robot can safely move, so the cursor advances by `min(step, clearance)`. The
/// march stops with a collision when the clearance drops below the configured
/// minimum or the field has no distance. The goal itself is always checked, so a
/// segment ending inside an obstacle is rejected even when the march overshoots it.
///
/// Every accepted sample advances the cursor by at least `min(step, min_clearance)`,
/// which bounds the number of samples by `length / min(step, min_clearance)`. A
/// segment tangent to an obstacle is therefore rejected near the tangent point
/// instead of being approached forever.
///
/// When `start` itself collides the result has fraction `0` and reports `start` as
/// its last valid point.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use route_validity::{
///     DistanceField, MotionValidator, OpaqueDistance, RayMarchValidator, RobotModel,
///     ValidityConfig,
/// };
///
/// // Wall at x = 3
/// let field = DistanceField::from(OpaqueDistance::new(
///     |p: &Point3<f64>| 3.0 - p.x,
///     RobotModel::try_new(0.5).unwrap(),
/// ));
/// let config = ValidityConfig::default().with_march_step(0.25);
/// let validator = RayMarchValidator::new(&field, &config).unwrap();
///
/// assert!(validator.check_motion(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0)));
/// let check = validator.check_motion_detailed(&Point3::origin(), &Point3::new(4.0, 0.0, 0.0));
/// assert!(!check.valid);
/// assert!(check.last_valid.unwrap().x < 2.5);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RayMarchValidator<'a> {
    field: &'a DistanceField<'a>,
    robot: RobotModel,
    step: f64,
    min_clearance: f64,
}

impl<'a> RayMarchValidator<'a> {
    /// Creates a validator over a field with scalar distances.
    ///
    /// # Errors
    ///
    /// - [`ValidityError::MissingScalarDistance`] for TSDF fields
    /// - [`ValidityError::MissingMarchStep`] when the field has no voxel size and the
    ///   configuration sets no step
    /// - Any error from [`ValidityConfig::validate`]
    pub fn new(field: &'a DistanceField<'a>, config: &ValidityConfig) -> ValidityResult<Self> {
        config.validate()?;
        if !field.has_scalar_distance() {
            return Err(ValidityError::MissingScalarDistance {
                field: field.kind(),
            });
        }
        let step = config.resolve_march_step(field.voxel_size(), field.kind())?;
        debug!(
            field = field.kind(),
            step,
            min_clearance = config.min_clearance(),
            "ray-march validator ready"
        );
        Ok(Self {
            field,
            robot: field.robot(),
            step,
            min_clearance: config.min_clearance(),
        })
    }

    /// Nominal distance between samples.
    #[must_use]
    pub const fn step(&self) -> f64 {
        self.step
    }

    /// Clearance below which the march reports a collision.
    #[must_use]
    pub const fn min_clearance(&self) -> f64 {
        self.min_clearance
    }

    /// Clearance at `point`, or `None` when the robot cannot stand there.
    fn safe_clearance(&self, point: &Point3<f64>) -> Option<f64> {
        let clearance = self.field.distance(point)? - self.robot.radius();
        (clearance > 0.0 && clearance >= self.min_clearance).then_some(clearance)
    }

    fn goal_is_free(&self, goal: &Point3<f64>) -> bool {
        self.field
            .distance(goal)
            .is_some_and(|d| !self.robot.collides_at(d))
    }

    fn blocked(start: &Point3<f64>, last_safe: Point3<f64>, length: f64) -> MotionCheck {
        let fraction = if length > 0.0 {
            (last_safe - start).norm() / length
        } else {
            0.0
        };
        trace!(
            x = last_safe.x,
            y = last_safe.y,
            z = last_safe.z,
            fraction,
            "segment blocked during ray-march"
        );
        MotionCheck::blocked(last_safe, fraction)
    }
}

impl MotionValidator for RayMarchValidator<'_> {
    fn check_motion_detailed(&self, start: &Point3<f64>, goal: &Point3<f64>) -> MotionCheck {
        let delta = goal - start;
        let length = delta.norm();
        let mut last_safe = *start;

        if !length.is_finite() {
            return Self::blocked(start, last_safe, 0.0);
        }

        if length > 0.0 {
            let direction = delta / length;
            let mut t = 0.0;
            while t < length {
                let cursor = start + direction * t;
                let Some(clearance) = self.safe_clearance(&cursor) else {
                    return Self::blocked(start, last_safe, length);
                };
                last_safe = cursor;
                t += self.step.min(clearance);
            }
        }

        if self.goal_is_free(goal) {
            MotionCheck::clear()
        } else {
            Self::blocked(start, last_safe, length)
        }
    }
}
