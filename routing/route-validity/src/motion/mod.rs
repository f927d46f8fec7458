//! Segment validity.
//!
//! Two strategies check whether the robot can move along a straight segment:
//!
//! - [`DiscreteRayValidator`] - Queries every voxel the segment passes through
//! - [`RayMarchValidator`] - Marches along the segment with clearance-limited steps
//!
//! Both report the same [`MotionCheck`] through the [`MotionValidator`] trait.

mod continuous;
mod discrete;

pub use continuous::RayMarchValidator;
pub use discrete::DiscreteRayValidator;

use nalgebra::Point3;

use crate::query::MotionCheck;

/// Decides whether the robot can travel a straight segment.
pub trait MotionValidator {
    /// Checks the segment from `start` to `goal`, reporting where it got blocked.
    fn check_motion_detailed(&self, start: &Point3<f64>, goal: &Point3<f64>) -> MotionCheck;

    /// Whether the whole segment from `start` to `goal` is collision-free.
    fn check_motion(&self, start: &Point3<f64>, goal: &Point3<f64>) -> bool {
        self.check_motion_detailed(start, goal).valid
    }
}

/// The validator matching a field's capabilities.
///
/// Returned by [`crate::ValidityChecker::motion_validator`].
#[derive(Debug, Clone, Copy)]
pub enum SegmentValidator<'a> {
    /// Voxel traversal, for TSDF and ESDF fields.
    Discrete(DiscreteRayValidator<'a>),
    /// Ray-march, for opaque distance functions.
    Continuous(RayMarchValidator<'a>),
}

impl MotionValidator for SegmentValidator<'_> {
    fn check_motion_detailed(&self, start: &Point3<f64>, goal: &Point3<f64>) -> MotionCheck {
        match self {
            Self::Discrete(validator) => validator.check_motion_detailed(start, goal),
            Self::Continuous(validator) => validator.check_motion_detailed(start, goal),
        }
    }
}

impl<'a> From<DiscreteRayValidator<'a>> for SegmentValidator<'a> {
    fn from(validator: DiscreteRayValidator<'a>) -> Self {
        Self::Discrete(validator)
    }
}

impl<'a> From<RayMarchValidator<'a>> for SegmentValidator<'a> {
    fn from(validator: RayMarchValidator<'a>) -> Self {
        Self::Continuous(validator)
    }
}
