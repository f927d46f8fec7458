//! Point validity oracle.

use cf_voxfield::{EsdfVoxel, GlobalIndex, Layer, TsdfVoxel};
use nalgebra::Point3;
use tracing::debug;

use crate::bounds::{StateBounds, Unbounded};
use crate::config::ValidityConfig;
use crate::error::ValidityResult;
use crate::field::{DistanceField, EsdfField, OpaqueDistance, TsdfSweep};
use crate::motion::{DiscreteRayValidator, RayMarchValidator, SegmentValidator};
use crate::query::FieldQuery;
use crate::robot::RobotModel;

/// Answers "can the robot stand here?" for a planner.
///
/// A point is valid when it lies inside the state bounds and the distance field
/// reports no collision for the robot sphere centered on it. The checker also hands
/// out motion validators borrowing the same field.
///
/// The [`tsdf`](Self::tsdf) and [`esdf`](Self::esdf) constructors build the field
/// from the configuration's unknown-space policy and interpolation switch. A field
/// passed to [`new`](Self::new) keeps its own settings.
///
/// # Example
///
/// ```
/// use cf_voxfield::{BlockIndex, EsdfVoxel, Layer};
/// use nalgebra::Point3;
/// use route_validity::{Aabb, MotionValidator, RobotModel, ValidityChecker, ValidityConfig};
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.25);
/// for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
///     voxel.distance = 1.0;
/// }
///
/// let bounds = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(3.5, 3.5, 3.5));
/// let checker = ValidityChecker::esdf(
///     &layer,
///     RobotModel::try_new(0.5).unwrap(),
///     bounds,
///     ValidityConfig::default(),
/// )
/// .unwrap();
///
/// assert!(checker.is_valid(&Point3::new(1.0, 1.0, 1.0)));
/// assert!(!checker.is_valid(&Point3::new(0.0, 1.0, 1.0)));
///
/// let validator = checker.motion_validator().unwrap();
/// assert!(validator.check_motion(&Point3::new(1.0, 1.0, 1.0), &Point3::new(3.0, 2.0, 1.0)));
/// ```
#[derive(Debug)]
pub struct ValidityChecker<'a, B = Unbounded> {
    field: DistanceField<'a>,
    bounds: B,
    config: ValidityConfig,
}

impl<'a, B: StateBounds> ValidityChecker<'a, B> {
    /// Creates a checker over an already built field.
    ///
    /// The field keeps the unknown-space policy and interpolation switch it was
    /// built with; the stored configuration is updated to report them.
    ///
    /// # Errors
    ///
    /// Returns any error from [`ValidityConfig::validate`].
    pub fn new(
        field: DistanceField<'a>,
        bounds: B,
        config: ValidityConfig,
    ) -> ValidityResult<Self> {
        config.validate()?;
        let config = match &field {
            DistanceField::Tsdf(sweep) => {
                config.with_treat_unknown_as_occupied(sweep.treat_unknown_as_occupied())
            }
            DistanceField::Esdf(esdf) => config.with_interpolation(esdf.interpolates()),
            DistanceField::Opaque(_) => config,
        };
        debug!(
            field = field.kind(),
            radius = field.robot().radius(),
            voxel_size = ?field.voxel_size(),
            treat_unknown_as_occupied = config.treat_unknown_as_occupied(),
            "validity checker ready"
        );
        Ok(Self {
            field,
            bounds,
            config,
        })
    }

    /// Creates a checker sweeping the robot sphere over a TSDF layer, using the
    /// configuration's unknown-space policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer geometry or the configuration is unusable.
    pub fn tsdf(
        layer: &'a Layer<TsdfVoxel>,
        robot: RobotModel,
        bounds: B,
        config: ValidityConfig,
    ) -> ValidityResult<Self> {
        let sweep = TsdfSweep::new(layer, robot)?
            .with_treat_unknown_as_occupied(config.treat_unknown_as_occupied());
        Self::new(sweep.into(), bounds, config)
    }

    /// Creates a checker reading distances from an ESDF layer, interpolating when
    /// the configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the layer geometry or the configuration is unusable.
    pub fn esdf(
        layer: &'a Layer<EsdfVoxel>,
        robot: RobotModel,
        bounds: B,
        config: ValidityConfig,
    ) -> ValidityResult<Self> {
        let esdf = EsdfField::new(layer, robot)?.with_interpolation(config.interpolate());
        Self::new(esdf.into(), bounds, config)
    }

    /// Creates a checker calling a distance function.
    ///
    /// # Errors
    ///
    /// Returns any error from [`ValidityConfig::validate`].
    pub fn opaque<F>(
        distance: F,
        robot: RobotModel,
        bounds: B,
        config: ValidityConfig,
    ) -> ValidityResult<Self>
    where
        F: Fn(&Point3<f64>) -> f64 + Send + Sync + 'a,
    {
        Self::new(OpaqueDistance::new(distance, robot).into(), bounds, config)
    }

    /// Whether the robot can stand at `point`.
    #[must_use]
    pub fn is_valid(&self, point: &Point3<f64>) -> bool {
        self.bounds.contains(point) && !self.check_collision(point)
    }

    /// Whether the robot centered at `point` collides, ignoring the bounds.
    #[must_use]
    pub fn check_collision(&self, point: &Point3<f64>) -> bool {
        self.field.query(point).is_collision()
    }

    /// Whether the robot centered at voxel `index` collides.
    ///
    /// Returns `None` for fields without a voxel grid.
    #[must_use]
    pub fn check_collision_at_voxel(&self, index: GlobalIndex) -> Option<bool> {
        self.field
            .query_at_voxel(index)
            .map(|query| query.is_collision())
    }

    /// Full field classification at `point`.
    #[must_use]
    pub fn query(&self, point: &Point3<f64>) -> FieldQuery {
        self.field.query(point)
    }

    /// Distance the robot centered at `point` can still move before touching a
    /// surface, negative when it already penetrates one.
    ///
    /// Returns `None` when the field has no scalar distance at `point`.
    #[must_use]
    pub fn clearance(&self, point: &Point3<f64>) -> Option<f64> {
        self.field
            .distance(point)
            .map(|d| d - self.robot().radius())
    }

    /// Changes the unknown-space policy. Only TSDF fields are affected.
    pub fn set_treat_unknown_as_occupied(&mut self, occupied: bool) {
        self.config = self.config.with_treat_unknown_as_occupied(occupied);
        if let DistanceField::Tsdf(sweep) = &mut self.field {
            sweep.set_treat_unknown_as_occupied(occupied);
        }
    }

    /// Validator suited to the field: voxel traversal for TSDF and ESDF layers,
    /// ray-march for distance functions.
    ///
    /// # Errors
    ///
    /// Returns an error if the field cannot support its natural validator, such as
    /// a distance function without a configured ray-march step.
    pub fn motion_validator(&self) -> ValidityResult<SegmentValidator<'_>> {
        match &self.field {
            DistanceField::Tsdf(_) | DistanceField::Esdf(_) => {
                self.discrete_validator().map(SegmentValidator::from)
            }
            DistanceField::Opaque(_) => self.continuous_validator().map(SegmentValidator::from),
        }
    }

    /// Voxel traversal validator over this checker's field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidityError::MissingVoxelPath`] for distance functions.
    pub fn discrete_validator(&self) -> ValidityResult<DiscreteRayValidator<'_>> {
        DiscreteRayValidator::new(&self.field)
    }

    /// Ray-march validator over this checker's field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidityError::MissingScalarDistance`] for TSDF layers or
    /// [`crate::ValidityError::MissingMarchStep`] for distance functions without a
    /// configured step.
    pub fn continuous_validator(&self) -> ValidityResult<RayMarchValidator<'_>> {
        RayMarchValidator::new(&self.field, &self.config)
    }
}

impl<'a, B> ValidityChecker<'a, B> {
    /// The robot being checked.
    #[must_use]
    pub const fn robot(&self) -> RobotModel {
        self.field.robot()
    }

    /// The underlying distance field.
    #[must_use]
    pub const fn field(&self) -> &DistanceField<'a> {
        &self.field
    }

    /// The state bounds.
    #[must_use]
    pub const fn bounds(&self) -> &B {
        &self.bounds
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidityConfig {
        &self.config
    }

    /// Edge length of the map voxels, if there is a grid.
    #[must_use]
    pub const fn voxel_size(&self) -> Option<f64> {
        self.field.voxel_size()
    }
}
