//! Index types and world/grid coordinate conversion.
//!
//! Three index spaces are used by a block-allocated layer:
//!
//! - [`GlobalIndex`] addresses any voxel in world space, whether or not its block exists.
//! - [`BlockIndex`] addresses a block of `voxels_per_side³` voxels.
//! - [`VoxelIndex`] addresses a voxel inside one block.
//!
//! A global index resolves to a `(BlockIndex, VoxelIndex)` pair by floor division,
//! so negative coordinates map to the block "below" the origin.

use nalgebra::{Point3, Vector3};

/// Slack added in grid units before flooring a continuous coordinate.
///
/// Points that land within floating-point noise of a voxel boundary are assigned
/// to the upper voxel, which keeps `world_to_grid` consistent for values such as
/// `0.6 / 0.2` that do not divide exactly.
pub const COORDINATE_EPSILON: f64 = 1e-6;

/// An unbounded integer coordinate addressing a single voxel in world space.
///
/// # Example
///
/// ```
/// use cf_voxfield::{BlockIndex, GlobalIndex, VoxelIndex};
///
/// let index = GlobalIndex::new(17, -1, 3);
/// let (block, voxel) = index.split(16);
/// assert_eq!(block, BlockIndex::new(1, -1, 0));
/// assert_eq!(voxel, VoxelIndex::new(1, 15, 3));
/// assert_eq!(GlobalIndex::from_parts(block, voxel, 16), index);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalIndex {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
    /// Z coordinate.
    pub z: i64,
}

impl GlobalIndex {
    /// Creates a new global voxel index.
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// The voxel at the world origin.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0, 0)
    }

    /// Returns the coordinate as an array.
    #[must_use]
    pub const fn as_array(self) -> [i64; 3] {
        [self.x, self.y, self.z]
    }

    /// Resolves this index to the containing block and the local voxel inside it.
    ///
    /// The block does not need to exist. `voxels_per_side` must be non-zero.
    #[must_use]
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn split(self, voxels_per_side: u32) -> (BlockIndex, VoxelIndex) {
        let side = i64::from(voxels_per_side.max(1));
        let block = BlockIndex::new(
            self.x.div_euclid(side),
            self.y.div_euclid(side),
            self.z.div_euclid(side),
        );
        // rem_euclid is in 0..side, which always fits in u32
        let voxel = VoxelIndex::new(
            self.x.rem_euclid(side) as u32,
            self.y.rem_euclid(side) as u32,
            self.z.rem_euclid(side) as u32,
        );
        (block, voxel)
    }

    /// Rebuilds a global index from a block and a local voxel index.
    #[must_use]
    pub fn from_parts(block: BlockIndex, voxel: VoxelIndex, voxels_per_side: u32) -> Self {
        let first = block.first_voxel(voxels_per_side);
        Self::new(
            first.x.wrapping_add(i64::from(voxel.x)),
            first.y.wrapping_add(i64::from(voxel.y)),
            first.z.wrapping_add(i64::from(voxel.z)),
        )
    }

    /// Returns this index offset by the given amounts.
    #[must_use]
    pub const fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self::new(
            self.x.wrapping_add(dx),
            self.y.wrapping_add(dy),
            self.z.wrapping_add(dz),
        )
    }

    /// Manhattan distance to another index.
    ///
    /// For a face-connected voxel walk this is the number of steps between the two.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u64 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
            .saturating_add(self.z.abs_diff(other.z))
    }

    /// Converts the index to floating-point grid coordinates (voxel units).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_grid_point(self) -> Point3<f64> {
        Point3::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl From<[i64; 3]> for GlobalIndex {
    fn from([x, y, z]: [i64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<(i64, i64, i64)> for GlobalIndex {
    fn from((x, y, z): (i64, i64, i64)) -> Self {
        Self::new(x, y, z)
    }
}

impl std::ops::Add for GlobalIndex {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.offset(other.x, other.y, other.z)
    }
}

impl std::ops::Sub for GlobalIndex {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(other.x),
            self.y.wrapping_sub(other.y),
            self.z.wrapping_sub(other.z),
        )
    }
}

/// Integer coordinate of a block in the sparse layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockIndex {
    /// X coordinate.
    pub x: i64,
    /// Y coordinate.
    pub y: i64,
    /// Z coordinate.
    pub z: i64,
}

impl BlockIndex {
    /// Creates a new block index.
    #[must_use]
    pub const fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    /// Global index of the voxel at local `(0, 0, 0)` of this block.
    #[must_use]
    pub fn first_voxel(self, voxels_per_side: u32) -> GlobalIndex {
        let side = i64::from(voxels_per_side);
        GlobalIndex::new(
            self.x.wrapping_mul(side),
            self.y.wrapping_mul(side),
            self.z.wrapping_mul(side),
        )
    }
}

/// Local coordinate of a voxel inside its block.
///
/// Valid components lie in `0..voxels_per_side`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoxelIndex {
    /// X coordinate.
    pub x: u32,
    /// Y coordinate.
    pub y: u32,
    /// Z coordinate.
    pub z: u32,
}

impl VoxelIndex {
    /// Creates a new local voxel index.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Whether every component is inside a block of the given side length.
    #[must_use]
    pub const fn is_within(self, voxels_per_side: u32) -> bool {
        self.x < voxels_per_side && self.y < voxels_per_side && self.z < voxels_per_side
    }

    /// Linear offset into a block's dense storage (x varies fastest).
    #[must_use]
    pub fn linear(self, voxels_per_side: u32) -> usize {
        let side = voxels_per_side as usize;
        (self.z as usize * side + self.y as usize) * side + self.x as usize
    }

    /// Inverse of [`VoxelIndex::linear`].
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_linear(linear: usize, voxels_per_side: u32) -> Self {
        let side = voxels_per_side.max(1) as usize;
        // Each component is reduced modulo `side`, which came from a u32
        Self::new(
            (linear % side) as u32,
            ((linear / side) % side) as u32,
            (linear / (side * side)) as u32,
        )
    }
}

/// Converts a point already expressed in voxel units to the voxel containing it.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn grid_index_from_scaled(scaled: &Point3<f64>) -> GlobalIndex {
    GlobalIndex::new(
        (scaled.x + COORDINATE_EPSILON).floor() as i64,
        (scaled.y + COORDINATE_EPSILON).floor() as i64,
        (scaled.z + COORDINATE_EPSILON).floor() as i64,
    )
}

/// Converts a world-space point to the voxel containing it.
///
/// # Example
///
/// ```
/// use cf_voxfield::{GlobalIndex, grid_index_from_point};
/// use nalgebra::Point3;
///
/// let index = grid_index_from_point(&Point3::new(0.15, -0.05, 0.6), 1.0 / 0.2);
/// assert_eq!(index, GlobalIndex::new(0, -1, 3));
/// ```
#[must_use]
pub fn grid_index_from_point(point: &Point3<f64>, inv_voxel_size: f64) -> GlobalIndex {
    grid_index_from_scaled(&Point3::from(point.coords * inv_voxel_size))
}

/// World-space center of the voxel at `index`.
#[must_use]
pub fn center_point_from_index(index: GlobalIndex, voxel_size: f64) -> Point3<f64> {
    (index.to_grid_point() + Vector3::repeat(0.5)) * voxel_size
}

/// Linear interpolation between `a` and `b`.
///
/// `t = 0` yields `a`, `t = 1` yields `b`.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    t.mul_add(b - a, a)
}
