//! Caller-supplied distance functions.

use nalgebra::Point3;

use crate::query::{FieldQuery, FieldStatus};
use crate::robot::RobotModel;

/// Boxed distance callback.
pub type DistanceFn<'a> = Box<dyn Fn(&Point3<f64>) -> f64 + Send + Sync + 'a>;

/// Collision checks against an arbitrary distance function.
///
/// Useful when the map is assembled from several sub-maps whose lookup the caller
/// owns. The function returns the distance to the nearest surface; a NaN result
/// counts as a collision. There is no voxel grid behind it, so segment checks need
/// the ray-march validator with an explicit step.
///
/// # Example
///
/// ```
/// use nalgebra::Point3;
/// use route_validity::{OpaqueDistance, RobotModel};
///
/// // A single spherical obstacle of radius 1 at the origin
/// let field = OpaqueDistance::new(
///     |p: &Point3<f64>| p.coords.norm() - 1.0,
///     RobotModel::try_new(0.5).unwrap(),
/// );
/// assert!(field.query(&Point3::new(1.2, 0.0, 0.0)).is_collision());
/// assert!(!field.query(&Point3::new(2.0, 0.0, 0.0)).is_collision());
/// ```
pub struct OpaqueDistance<'a> {
    distance: DistanceFn<'a>,
    robot: RobotModel,
}

impl<'a> OpaqueDistance<'a> {
    /// Wraps a distance function for `robot`.
    #[must_use]
    pub fn new<F>(distance: F, robot: RobotModel) -> Self
    where
        F: Fn(&Point3<f64>) -> f64 + Send + Sync + 'a,
    {
        Self {
            distance: Box::new(distance),
            robot,
        }
    }

    /// The robot being checked.
    #[must_use]
    pub const fn robot(&self) -> RobotModel {
        self.robot
    }

    /// Raw distance reported by the callback.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> f64 {
        (self.distance)(point)
    }

    /// Classifies `point`.
    #[must_use]
    pub fn query(&self, point: &Point3<f64>) -> FieldQuery {
        let d = self.distance(point);
        if d.is_nan() {
            return FieldQuery::blocked();
        }
        let status = if self.robot.collides_at(d) {
            FieldStatus::Blocked
        } else {
            FieldStatus::Known
        };
        FieldQuery::new(status, Some(d))
    }
}

impl std::fmt::Debug for OpaqueDistance<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpaqueDistance")
            .field("robot", &self.robot)
            .finish_non_exhaustive()
    }
}
