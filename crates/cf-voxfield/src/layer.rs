//! Sparse block-allocated voxel layer.

use hashbrown::HashMap;
use nalgebra::Point3;

use crate::error::{FieldError, FieldResult};
use crate::index::{
    BlockIndex, GlobalIndex, VoxelIndex, center_point_from_index, grid_index_from_point,
};

/// Voxels per block side used by [`Layer::new`].
pub const DEFAULT_VOXELS_PER_SIDE: u32 = 16;

/// A dense cube of `voxels_per_side³` voxels.
///
/// Blocks are the unit of allocation in a [`Layer`]. All voxels of a freshly
/// allocated block hold `V::default()`.
#[derive(Debug, Clone)]
pub struct Block<V> {
    index: BlockIndex,
    voxels_per_side: u32,
    voxels: Vec<V>,
}

impl<V: Default + Clone> Block<V> {
    /// Creates a block with every voxel set to `V::default()`.
    #[must_use]
    pub fn new(index: BlockIndex, voxels_per_side: u32) -> Self {
        let side = voxels_per_side as usize;
        Self {
            index,
            voxels_per_side,
            voxels: vec![V::default(); side * side * side],
        }
    }
}

impl<V> Block<V> {
    /// The block's coordinate in the layer.
    #[must_use]
    pub const fn index(&self) -> BlockIndex {
        self.index
    }

    /// Number of voxels along each side.
    #[must_use]
    pub const fn voxels_per_side(&self) -> u32 {
        self.voxels_per_side
    }

    /// World-space position of the block's minimum corner.
    #[must_use]
    pub fn origin(&self, voxel_size: f64) -> Point3<f64> {
        self.index.first_voxel(self.voxels_per_side).to_grid_point() * voxel_size
    }

    /// Total number of voxels stored.
    #[must_use]
    pub fn num_voxels(&self) -> usize {
        self.voxels.len()
    }

    /// Whether `voxel` addresses storage inside this block.
    #[must_use]
    pub const fn is_valid_voxel_index(&self, voxel: VoxelIndex) -> bool {
        voxel.is_within(self.voxels_per_side)
    }

    /// Returns the voxel at a local index.
    #[must_use]
    pub fn voxel(&self, voxel: VoxelIndex) -> Option<&V> {
        if !self.is_valid_voxel_index(voxel) {
            return None;
        }
        self.voxels.get(voxel.linear(self.voxels_per_side))
    }

    /// Returns a mutable reference to the voxel at a local index.
    pub fn voxel_mut(&mut self, voxel: VoxelIndex) -> Option<&mut V> {
        if !self.is_valid_voxel_index(voxel) {
            return None;
        }
        let linear = voxel.linear(self.voxels_per_side);
        self.voxels.get_mut(linear)
    }

    /// Iterates over `(GlobalIndex, &V)` for every voxel of the block.
    pub fn iter(&self) -> impl Iterator<Item = (GlobalIndex, &V)> {
        let side = self.voxels_per_side;
        let index = self.index;
        self.voxels.iter().enumerate().map(move |(linear, voxel)| {
            let local = VoxelIndex::from_linear(linear, side);
            (GlobalIndex::from_parts(index, local, side), voxel)
        })
    }

    /// Mutable counterpart of [`Block::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GlobalIndex, &mut V)> {
        let side = self.voxels_per_side;
        let index = self.index;
        self.voxels.iter_mut().enumerate().map(move |(linear, voxel)| {
            let local = VoxelIndex::from_linear(linear, side);
            (GlobalIndex::from_parts(index, local, side), voxel)
        })
    }
}

/// A sparse voxel map made of lazily allocated blocks.
///
/// The layer bridges world space (continuous `f64` meters) and voxel space
/// ([`GlobalIndex`]). A voxel exists only when its block has been allocated; reads
/// never allocate.
///
/// Planning queries borrow a layer immutably for the duration of an episode, so the
/// borrow checker rules out concurrent mutation by the mapping side.
///
/// # Example
///
/// ```
/// use cf_voxfield::{EsdfVoxel, GlobalIndex, Layer};
/// use nalgebra::Point3;
///
/// let mut layer: Layer<EsdfVoxel> = Layer::new(0.2);
/// layer.set_voxel(GlobalIndex::new(5, 0, 0), EsdfVoxel::new(-0.1));
///
/// assert_eq!(layer.block_count(), 1);
/// let voxel = layer.voxel_at_point(&Point3::new(1.05, 0.0, 0.0));
/// assert_eq!(voxel, Some(&EsdfVoxel::new(-0.1)));
/// assert!(layer.voxel_by_global_index(GlobalIndex::new(-1, 0, 0)).is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Layer<V> {
    voxel_size: f64,
    inv_voxel_size: f64,
    voxels_per_side: u32,
    blocks: HashMap<BlockIndex, Block<V>>,
}

impl<V> Layer<V> {
    /// Creates an empty layer with [`DEFAULT_VOXELS_PER_SIDE`] voxels per block side.
    ///
    /// Non-positive voxel sizes are clamped to `f64::EPSILON`; use [`Layer::try_new`]
    /// to reject them instead.
    #[must_use]
    pub fn new(voxel_size: f64) -> Self {
        Self::with_voxels_per_side(voxel_size, DEFAULT_VOXELS_PER_SIDE)
    }

    /// Creates an empty layer with a custom block side length.
    #[must_use]
    pub fn with_voxels_per_side(voxel_size: f64, voxels_per_side: u32) -> Self {
        let voxel_size = voxel_size.abs().max(f64::EPSILON);
        Self {
            voxel_size,
            inv_voxel_size: 1.0 / voxel_size,
            voxels_per_side: voxels_per_side.max(1),
            blocks: HashMap::new(),
        }
    }

    /// Creates an empty layer, validating its geometry.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidVoxelSize`] if `voxel_size` is not positive and
    /// finite, or [`FieldError::InvalidVoxelsPerSide`] if `voxels_per_side` is zero.
    pub fn try_new(voxel_size: f64, voxels_per_side: u32) -> FieldResult<Self> {
        if voxel_size <= 0.0 || !voxel_size.is_finite() {
            return Err(FieldError::InvalidVoxelSize(voxel_size));
        }
        if voxels_per_side == 0 {
            return Err(FieldError::InvalidVoxelsPerSide(voxels_per_side));
        }
        Ok(Self::with_voxels_per_side(voxel_size, voxels_per_side))
    }

    /// Edge length of one voxel in world units.
    #[must_use]
    pub const fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    /// Reciprocal of the voxel size.
    #[must_use]
    pub const fn inv_voxel_size(&self) -> f64 {
        self.inv_voxel_size
    }

    /// Number of voxels along each block side.
    #[must_use]
    pub const fn voxels_per_side(&self) -> u32 {
        self.voxels_per_side
    }

    /// Edge length of one block in world units.
    #[must_use]
    pub fn block_size(&self) -> f64 {
        self.voxel_size * f64::from(self.voxels_per_side)
    }

    /// Number of allocated blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if no block is allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether the block at `index` is allocated.
    #[must_use]
    pub fn has_block(&self, index: BlockIndex) -> bool {
        self.blocks.contains_key(&index)
    }

    /// Returns the block at `index`, if allocated.
    #[must_use]
    pub fn block(&self, index: BlockIndex) -> Option<&Block<V>> {
        self.blocks.get(&index)
    }

    /// Returns a mutable reference to the block at `index`, if allocated.
    pub fn block_mut(&mut self, index: BlockIndex) -> Option<&mut Block<V>> {
        self.blocks.get_mut(&index)
    }

    /// Iterates over all allocated blocks in unspecified order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block<V>> {
        self.blocks.values()
    }

    /// Removes a block, returning it if it was allocated.
    pub fn remove_block(&mut self, index: BlockIndex) -> Option<Block<V>> {
        self.blocks.remove(&index)
    }

    /// Drops every block.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }

    /// Global index of the voxel containing a world-space point.
    #[must_use]
    pub fn global_index_from_point(&self, point: &Point3<f64>) -> GlobalIndex {
        grid_index_from_point(point, self.inv_voxel_size)
    }

    /// Index of the block containing a world-space point.
    #[must_use]
    pub fn block_index_from_point(&self, point: &Point3<f64>) -> BlockIndex {
        self.global_index_from_point(point)
            .split(self.voxels_per_side)
            .0
    }

    /// World-space center of a voxel.
    #[must_use]
    pub fn voxel_center(&self, index: GlobalIndex) -> Point3<f64> {
        center_point_from_index(index, self.voxel_size)
    }

    /// Returns the voxel at a global index, or `None` if its block is not allocated.
    #[must_use]
    pub fn voxel_by_global_index(&self, index: GlobalIndex) -> Option<&V> {
        let (block, voxel) = index.split(self.voxels_per_side);
        self.blocks.get(&block)?.voxel(voxel)
    }

    /// Returns the voxel containing a world-space point, if its block is allocated.
    #[must_use]
    pub fn voxel_at_point(&self, point: &Point3<f64>) -> Option<&V> {
        self.voxel_by_global_index(self.global_index_from_point(point))
    }
}

impl<V: Default + Clone> Layer<V> {
    /// Returns the block at `index`, allocating it if needed.
    pub fn allocate_block(&mut self, index: BlockIndex) -> &mut Block<V> {
        let side = self.voxels_per_side;
        self.blocks
            .entry(index)
            .or_insert_with(|| Block::new(index, side))
    }

    /// Returns a mutable reference to a voxel, allocating its block if needed.
    pub fn voxel_by_global_index_mut(&mut self, index: GlobalIndex) -> &mut V {
        let (block, voxel) = index.split(self.voxels_per_side);
        let block = self.allocate_block(block);
        let linear = voxel.linear(block.voxels_per_side);
        // split() keeps the local index inside the block
        &mut block.voxels[linear]
    }

    /// Writes a voxel, allocating its block if needed, and returns the previous value.
    pub fn set_voxel(&mut self, index: GlobalIndex, value: V) -> V {
        std::mem::replace(self.voxel_by_global_index_mut(index), value)
    }
}
