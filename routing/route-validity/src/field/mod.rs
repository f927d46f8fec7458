//! Distance-field adapters.
//!
//! Three kinds of map can answer collision queries for a spherical robot:
//!
//! - [`TsdfSweep`] - Sweeps the robot sphere over a truncated signed distance layer
//! - [`EsdfField`] - Reads (optionally interpolated) Euclidean distances
//! - [`OpaqueDistance`] - Calls a caller-supplied distance function
//!
//! [`DistanceField`] is the closed set of these, matched explicitly by the checker
//! and validators.

mod esdf;
mod opaque;
mod tsdf;

pub use esdf::EsdfField;
pub use opaque::{DistanceFn, OpaqueDistance};
pub use tsdf::TsdfSweep;

use cf_voxfield::GlobalIndex;
use nalgebra::Point3;

use crate::error::{ValidityError, ValidityResult};
use crate::query::FieldQuery;
use crate::robot::RobotModel;

pub(crate) fn check_voxel_size(voxel_size: f64) -> ValidityResult<()> {
    if voxel_size <= 0.0 || !voxel_size.is_finite() {
        return Err(ValidityError::InvalidVoxelSize(voxel_size));
    }
    Ok(())
}

/// A map able to classify robot positions.
#[derive(Debug)]
pub enum DistanceField<'a> {
    /// Sphere sweep over a TSDF layer.
    Tsdf(TsdfSweep<'a>),
    /// Distance lookups in an ESDF layer.
    Esdf(EsdfField<'a>),
    /// Caller-supplied distance function.
    Opaque(OpaqueDistance<'a>),
}

impl DistanceField<'_> {
    /// Short name of the field kind, used in errors and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Tsdf(_) => "tsdf",
            Self::Esdf(_) => "esdf",
            Self::Opaque(_) => "opaque",
        }
    }

    /// The robot this field classifies positions for.
    #[must_use]
    pub const fn robot(&self) -> RobotModel {
        match self {
            Self::Tsdf(field) => field.robot(),
            Self::Esdf(field) => field.robot(),
            Self::Opaque(field) => field.robot(),
        }
    }

    /// Classifies the robot centered at `point`.
    #[must_use]
    pub fn query(&self, point: &Point3<f64>) -> FieldQuery {
        match self {
            Self::Tsdf(field) => field.query(point),
            Self::Esdf(field) => field.query(point),
            Self::Opaque(field) => field.query(point),
        }
    }

    /// Classifies the robot centered at voxel `index`.
    ///
    /// Returns `None` for fields without a voxel grid.
    #[must_use]
    pub fn query_at_voxel(&self, index: GlobalIndex) -> Option<FieldQuery> {
        match self {
            Self::Tsdf(field) => Some(field.query_at_voxel(index)),
            Self::Esdf(field) => Some(field.query_at_voxel(index)),
            Self::Opaque(_) => None,
        }
    }

    /// Scalar distance to the nearest surface at `point`.
    ///
    /// TSDF layers only hold distances near surfaces and report `None`, as do ESDF
    /// lookups outside the mapped volume.
    #[must_use]
    pub fn distance(&self, point: &Point3<f64>) -> Option<f64> {
        match self {
            Self::Tsdf(_) => None,
            Self::Esdf(field) => field.distance(point),
            Self::Opaque(field) => Some(field.distance(point)),
        }
    }

    /// Whether [`DistanceField::distance`] can ever return a value.
    #[must_use]
    pub const fn has_scalar_distance(&self) -> bool {
        !matches!(self, Self::Tsdf(_))
    }

    /// Edge length of the underlying voxels, if there is a grid.
    #[must_use]
    pub const fn voxel_size(&self) -> Option<f64> {
        match self {
            Self::Tsdf(field) => Some(field.layer().voxel_size()),
            Self::Esdf(field) => Some(field.layer().voxel_size()),
            Self::Opaque(_) => None,
        }
    }
}

impl<'a> From<TsdfSweep<'a>> for DistanceField<'a> {
    fn from(field: TsdfSweep<'a>) -> Self {
        Self::Tsdf(field)
    }
}

impl<'a> From<EsdfField<'a>> for DistanceField<'a> {
    fn from(field: EsdfField<'a>) -> Self {
        Self::Esdf(field)
    }
}

impl<'a> From<OpaqueDistance<'a>> for DistanceField<'a> {
    fn from(field: OpaqueDistance<'a>) -> Self {
        Self::Opaque(field)
    }
}
