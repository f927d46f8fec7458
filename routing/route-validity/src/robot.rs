//! Robot geometry.

use crate::error::{ValidityError, ValidityResult};

/// A robot approximated by a single enclosing sphere.
///
/// Orientation does not matter; a configuration is just the sphere center.
///
/// # Example
///
/// ```
/// use route_validity::RobotModel;
///
/// let robot = RobotModel::try_new(0.3).unwrap();
/// assert_eq!(robot.radius(), 0.3);
/// assert!(RobotModel::try_new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct RobotModel {
    radius: f64,
}

impl RobotModel {
    /// Creates a robot model.
    ///
    /// # Errors
    ///
    /// Returns [`ValidityError::InvalidRobotRadius`] unless `radius` is positive and
    /// finite.
    pub fn try_new(radius: f64) -> ValidityResult<Self> {
        if radius <= 0.0 || !radius.is_finite() {
            return Err(ValidityError::InvalidRobotRadius(radius));
        }
        Ok(Self { radius })
    }

    /// Radius of the enclosing sphere.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether a surface at `distance` from the center penetrates the sphere.
    ///
    /// Touching counts as a collision. NaN distances are treated as collisions.
    #[must_use]
    pub fn collides_at(&self, distance: f64) -> bool {
        distance.is_nan() || self.radius >= distance
    }
}

impl TryFrom<f64> for RobotModel {
    type Error = ValidityError;

    fn try_from(radius: f64) -> ValidityResult<Self> {
        Self::try_new(radius)
    }
}

impl From<RobotModel> for f64 {
    fn from(robot: RobotModel) -> Self {
        robot.radius
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                RobotModel::try_new(radius),
                Err(ValidityError::InvalidRobotRadius(_))
            ));
        }
    }

    #[test]
    fn test_collides_at() {
        let robot = RobotModel::try_new(0.5).unwrap();
        assert!(robot.collides_at(0.4));
        assert!(robot.collides_at(0.5));
        assert!(!robot.collides_at(0.51));
        assert!(!robot.collides_at(f64::INFINITY));
        assert!(robot.collides_at(f64::NAN));
    }

    #[test]
    fn test_try_from_radius() {
        assert_eq!(RobotModel::try_from(0.25).unwrap().radius(), 0.25);
        assert!(RobotModel::try_from(-0.25).is_err());
        assert_eq!(f64::from(RobotModel::try_new(0.25).unwrap()), 0.25);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_radius() {
        use serde::Deserialize;
        use serde::de::IntoDeserializer;
        use serde::de::value::{Error, F64Deserializer};

        let valid: F64Deserializer<Error> = 0.3_f64.into_deserializer();
        assert_eq!(RobotModel::deserialize(valid).unwrap().radius(), 0.3);
        for radius in [0.0, -1.0] {
            let invalid: F64Deserializer<Error> = radius.into_deserializer();
            assert!(RobotModel::deserialize(invalid).is_err());
        }
    }
}
