//! Query results.

use nalgebra::Point3;

/// How a distance field classified the space around a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldStatus {
    /// Every relevant voxel was observed and clear of the robot.
    Known,
    /// Some relevant space is unobserved and the policy tolerates it.
    UnknownFree,
    /// Some relevant space is unobserved and the policy treats it as an obstacle.
    UnknownOccupied,
    /// An obstacle is within the robot radius, or the field failed closed.
    Blocked,
}

impl FieldStatus {
    /// Whether this status rules the robot out.
    #[must_use]
    pub const fn is_collision(self) -> bool {
        matches!(self, Self::Blocked | Self::UnknownOccupied)
    }
}

/// Result of one point query against a distance field.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldQuery {
    /// Classification of the queried space.
    pub status: FieldStatus,
    /// Distance to the nearest surface, when the field knows one.
    pub distance: Option<f64>,
}

impl FieldQuery {
    /// Creates a query result.
    #[must_use]
    pub const fn new(status: FieldStatus, distance: Option<f64>) -> Self {
        Self { status, distance }
    }

    /// A blocked result with no usable distance.
    #[must_use]
    pub const fn blocked() -> Self {
        Self::new(FieldStatus::Blocked, None)
    }

    /// Whether the robot collides at the queried location.
    #[must_use]
    pub const fn is_collision(&self) -> bool {
        self.status.is_collision()
    }
}

/// Outcome of a segment check.
///
/// When `valid` is false, `last_valid` always holds the last point known to be
/// safe and `fraction` is the portion of the segment traversed before the
/// collision. A valid segment has `fraction == 1.0` and no `last_valid`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionCheck {
    /// Whether the whole segment is collision-free.
    pub valid: bool,
    /// Last safe point on a blocked segment.
    ///
    /// With `fraction == 0.0` this is `start`, which may itself be in collision;
    /// the segment then has no safe point at all.
    pub last_valid: Option<Point3<f64>>,
    /// Traversed fraction in `[0, 1]`.
    pub fraction: f64,
}

impl MotionCheck {
    /// A collision-free segment.
    #[must_use]
    pub const fn clear() -> Self {
        Self {
            valid: true,
            last_valid: None,
            fraction: 1.0,
        }
    }

    /// A blocked segment. `fraction` is clamped to `[0, 1]`.
    #[must_use]
    pub fn blocked(last_valid: Point3<f64>, fraction: f64) -> Self {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        Self {
            valid: false,
            last_valid: Some(last_valid),
            fraction,
        }
    }
}
