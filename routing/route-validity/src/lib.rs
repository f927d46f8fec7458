//! Point and motion validity for spherical robots in voxel distance fields.
//!
//! Sampling-based planners ask two questions over and over:
//!
//! - Can the robot stand at this point? ([`ValidityChecker::is_valid`])
//! - Can it move along this segment, and if not, how far does it get?
//!   ([`MotionValidator::check_motion_detailed`])
//!
//! Both are answered against a read-only map snapshot through a
//! [`DistanceField`]:
//!
//! - [`TsdfSweep`] - Sweeps the robot sphere over a TSDF layer, with a configurable
//!   policy for unobserved space
//! - [`EsdfField`] - Reads interpolated ESDF distances, failing closed outside the map
//! - [`OpaqueDistance`] - Calls a distance function supplied by the caller
//!
//! Segments are checked either voxel by voxel ([`DiscreteRayValidator`]) or by
//! ray-marching with clearance-limited steps ([`RayMarchValidator`]).
//!
//! # Layer 0 Crate
//!
//! This crate has **zero Bevy dependencies** and performs no I/O.
//!
//! # Concurrency
//!
//! Queries take `&self` and never mutate the map. Checkers and validators are
//! `Send + Sync` whenever the borrowed layer is, so any number of threads may query
//! the same snapshot. The borrow on the layer keeps the mapping side from writing
//! to it during a planning episode.
//!
//! # Example
//!
//! ```
//! use cf_voxfield::{BlockIndex, EsdfVoxel, GlobalIndex, Layer};
//! use nalgebra::Point3;
//! use route_validity::{MotionValidator, RobotModel, Unbounded, ValidityChecker, ValidityConfig};
//!
//! let mut layer: Layer<EsdfVoxel> = Layer::new(0.2);
//! for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
//!     voxel.distance = 1.0;
//! }
//! layer.set_voxel(GlobalIndex::new(5, 0, 0), EsdfVoxel::new(-0.1));
//!
//! let checker = ValidityChecker::esdf(
//!     &layer,
//!     RobotModel::try_new(0.3).unwrap(),
//!     Unbounded,
//!     ValidityConfig::default(),
//! )
//! .unwrap();
//!
//! let validator = checker.motion_validator().unwrap();
//! let check = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
//! assert!(!check.valid);
//! let last_valid = check.last_valid.unwrap();
//! assert!(last_valid.x >= 0.8 && last_valid.x < 1.0);
//! assert!(check.fraction > 0.4 && check.fraction <= 0.5);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod checker;
mod config;
mod error;
mod field;
mod motion;
mod query;
mod robot;

pub use bounds::{Aabb, FnBounds, StateBounds, Unbounded};
pub use checker::ValidityChecker;
pub use config::{DEFAULT_MIN_CLEARANCE, ValidityConfig};
pub use error::{ValidityError, ValidityResult};
pub use field::{DistanceField, DistanceFn, EsdfField, OpaqueDistance, TsdfSweep};
pub use motion::{
    DiscreteRayValidator, MotionValidator, RayMarchValidator, SegmentValidator,
};
pub use query::{FieldQuery, FieldStatus, MotionCheck};
pub use robot::RobotModel;

// Re-export the map crate for convenience
pub use cf_voxfield;
