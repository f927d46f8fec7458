//! Sparse voxel distance fields for CortenForge.
//!
//! This crate holds the map-side data structures read by collision and motion
//! validity queries:
//!
//! - [`Layer`] and [`Block`] - Sparse, block-allocated voxel storage
//! - [`TsdfVoxel`] and [`EsdfVoxel`] - Truncated and Euclidean signed distance payloads
//! - [`GlobalIndex`], [`BlockIndex`], [`VoxelIndex`] - Voxel addressing
//! - [`cast_ray`] - Ordered voxel enumeration along a segment
//! - [`SphereRegion`] - Voxels within a radius of a point
//! - [`Interpolator`] - Trilinear distance lookup over an ESDF layer
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**.
//!
//! # Coordinate Systems
//!
//! World coordinates are continuous `f64` values. Voxel `i` along an axis spans
//! `[i · voxel_size, (i + 1) · voxel_size)` and its center sits at
//! `(i + 0.5) · voxel_size`. Blocks group `voxels_per_side³` voxels and exist only
//! once something has been written into them.
//!
//! # Example
//!
//! ```
//! use cf_voxfield::{GlobalIndex, Layer, SphereRegion, TsdfVoxel};
//! use nalgebra::Point3;
//!
//! let mut layer: Layer<TsdfVoxel> = Layer::new(0.1);
//! layer.set_voxel(GlobalIndex::new(2, 0, 0), TsdfVoxel::new(-0.05, 1.0));
//!
//! // Look for observed surface voxels within 0.15 of a point
//! let region = SphereRegion::around_point(&Point3::new(0.15, 0.05, 0.05), 0.15, layer.voxel_size());
//! let hit = region
//!     .iter()
//!     .filter_map(|index| layer.voxel_by_global_index(index))
//!     .any(|voxel| voxel.is_observed() && voxel.distance <= 0.0);
//! assert!(hit);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod index;
mod interpolator;
mod layer;
mod region;
mod traversal;
mod voxel;

pub use error::{FieldError, FieldResult};
pub use index::{
    BlockIndex, COORDINATE_EPSILON, GlobalIndex, VoxelIndex, center_point_from_index,
    grid_index_from_point, grid_index_from_scaled, lerp,
};
pub use interpolator::Interpolator;
pub use layer::{Block, DEFAULT_VOXELS_PER_SIDE, Layer};
pub use region::SphereRegion;
pub use traversal::{SegmentTraversal, cast_ray};
pub use voxel::{EsdfVoxel, TSDF_WEIGHT_EPSILON, TsdfVoxel};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
