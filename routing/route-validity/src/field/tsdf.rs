//! Sphere sweep over a TSDF layer.

use cf_voxfield::{GlobalIndex, Layer, SphereRegion, TsdfVoxel};
use nalgebra::Point3;

use crate::error::ValidityResult;
use crate::query::{FieldQuery, FieldStatus};
use crate::robot::RobotModel;

use super::check_voxel_size;

/// Collision checks that visit every voxel inside the robot sphere.
///
/// A TSDF only knows distances close to surfaces, so a point is judged by the
/// voxels around it rather than by a single distance value. An observed voxel with
/// a non-positive distance inside the sphere is an obstacle. Unobserved voxels and
/// unallocated blocks follow the unknown-space policy: free by default, occupied
/// when [`TsdfSweep::set_treat_unknown_as_occupied`] is enabled.
///
/// # Example
///
/// ```
/// use cf_voxfield::{GlobalIndex, Layer, TsdfVoxel};
/// use nalgebra::Point3;
/// use route_validity::{FieldStatus, RobotModel, TsdfSweep};
///
/// let mut layer: Layer<TsdfVoxel> = Layer::new(0.1);
/// layer.set_voxel(GlobalIndex::new(3, 0, 0), TsdfVoxel::new(-0.02, 1.0));
///
/// let sweep = TsdfSweep::new(&layer, RobotModel::try_new(0.25).unwrap()).unwrap();
/// assert_eq!(sweep.query(&Point3::new(0.15, 0.05, 0.05)).status, FieldStatus::Blocked);
/// assert_eq!(sweep.query(&Point3::new(5.0, 5.0, 5.0)).status, FieldStatus::UnknownFree);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TsdfSweep<'a> {
    layer: &'a Layer<TsdfVoxel>,
    robot: RobotModel,
    treat_unknown_as_occupied: bool,
}

impl<'a> TsdfSweep<'a> {
    /// Creates a sweep over `layer` for `robot`, treating unknown space as free.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidityError::InvalidVoxelSize`] if the layer's voxel size
    /// is not finite.
    pub fn new(layer: &'a Layer<TsdfVoxel>, robot: RobotModel) -> ValidityResult<Self> {
        check_voxel_size(layer.voxel_size())?;
        Ok(Self {
            layer,
            robot,
            treat_unknown_as_occupied: false,
        })
    }

    /// Sets the unknown-space policy, builder style.
    #[must_use]
    pub const fn with_treat_unknown_as_occupied(mut self, occupied: bool) -> Self {
        self.treat_unknown_as_occupied = occupied;
        self
    }

    /// Whether unknown space counts as an obstacle.
    #[must_use]
    pub const fn treat_unknown_as_occupied(&self) -> bool {
        self.treat_unknown_as_occupied
    }

    /// Changes the unknown-space policy.
    pub fn set_treat_unknown_as_occupied(&mut self, occupied: bool) {
        self.treat_unknown_as_occupied = occupied;
    }

    /// The swept layer.
    #[must_use]
    pub const fn layer(&self) -> &'a Layer<TsdfVoxel> {
        self.layer
    }

    /// The robot whose sphere is swept.
    #[must_use]
    pub const fn robot(&self) -> RobotModel {
        self.robot
    }

    /// Sweeps the sphere centered at `point`.
    #[must_use]
    pub fn query(&self, point: &Point3<f64>) -> FieldQuery {
        self.sweep(SphereRegion::around_point(
            point,
            self.robot.radius(),
            self.layer.voxel_size(),
        ))
    }

    /// Sweeps the sphere centered at the center of voxel `index`.
    #[must_use]
    pub fn query_at_voxel(&self, index: GlobalIndex) -> FieldQuery {
        self.sweep(SphereRegion::around(
            index,
            self.robot.radius() * self.layer.inv_voxel_size(),
        ))
    }

    fn sweep(&self, region: SphereRegion) -> FieldQuery {
        let mut status = FieldStatus::Known;
        let mut closest: Option<f64> = None;

        for index in region.iter() {
            let observed = self
                .layer
                .voxel_by_global_index(index)
                .filter(|voxel| voxel.is_observed());

            let Some(voxel) = observed else {
                if self.treat_unknown_as_occupied {
                    return FieldQuery::new(FieldStatus::UnknownOccupied, closest);
                }
                status = FieldStatus::UnknownFree;
                continue;
            };

            let distance = f64::from(voxel.distance);
            closest = Some(closest.map_or(distance, |c| c.min(distance)));
            if distance <= 0.0 {
                return FieldQuery::new(FieldStatus::Blocked, closest);
            }
        }

        FieldQuery::new(status, closest)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use cf_voxfield::BlockIndex;

    /// Voxel 0.1, one fully observed free block at the origin.
    fn observed_layer() -> Layer<TsdfVoxel> {
        let mut layer: Layer<TsdfVoxel> = Layer::with_voxels_per_side(0.1, 8);
        for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
            *voxel = TsdfVoxel::new(0.3, 1.0);
        }
        layer
    }

    fn robot(radius: f64) -> RobotModel {
        RobotModel::try_new(radius).unwrap()
    }

    #[test]
    fn test_observed_free_is_known() {
        let layer = observed_layer();
        let sweep = TsdfSweep::new(&layer, robot(0.2)).unwrap();
        let query = sweep.query(&Point3::new(0.4, 0.4, 0.4));
        assert_eq!(query.status, FieldStatus::Known);
        assert_eq!(query.distance, Some(f64::from(0.3f32)));
    }

    #[test]
    fn test_surface_voxel_blocks() {
        let mut layer = observed_layer();
        layer.set_voxel(GlobalIndex::new(5, 4, 4), TsdfVoxel::new(0.0, 1.0));
        let sweep = TsdfSweep::new(&layer, robot(0.15)).unwrap();
        let query = sweep.query(&Point3::new(0.45, 0.45, 0.45));
        assert_eq!(query.status, FieldStatus::Blocked);
        assert_eq!(query.distance, Some(0.0));

        // Blocked under both policies
        let occupied = sweep.with_treat_unknown_as_occupied(true);
        assert!(occupied.query(&Point3::new(0.45, 0.45, 0.45)).is_collision());
    }

    #[test]
    fn test_unobserved_voxel_follows_policy() {
        let mut layer = observed_layer();
        layer.set_voxel(GlobalIndex::new(4, 4, 4), TsdfVoxel::new(-1.0, 0.0));
        let mut sweep = TsdfSweep::new(&layer, robot(0.15)).unwrap();
        let p = Point3::new(0.45, 0.45, 0.45);

        assert_eq!(sweep.query(&p).status, FieldStatus::UnknownFree);
        sweep.set_treat_unknown_as_occupied(true);
        assert!(sweep.treat_unknown_as_occupied());
        assert_eq!(sweep.query(&p).status, FieldStatus::UnknownOccupied);
    }

    #[test]
    fn test_unmapped_space() {
        let layer: Layer<TsdfVoxel> = Layer::new(0.1);
        let sweep = TsdfSweep::new(&layer, robot(0.3)).unwrap();
        let p = Point3::new(-4.0, 2.0, 7.0);
        let free = sweep.query(&p);
        assert_eq!(free.status, FieldStatus::UnknownFree);
        assert!(free.distance.is_none());
        assert!(!free.is_collision());
        assert!(sweep.with_treat_unknown_as_occupied(true).query(&p).is_collision());
    }

    #[test]
    fn test_sphere_reaching_into_missing_block() {
        let layer = observed_layer();
        let sweep = TsdfSweep::new(&layer, robot(0.2)).unwrap();
        // Sphere around voxel (0, 4, 4) reaches x = -1 and x = -2, outside the block
        let p = Point3::new(0.05, 0.45, 0.45);
        assert_eq!(sweep.query(&p).status, FieldStatus::UnknownFree);
        assert_eq!(
            sweep.with_treat_unknown_as_occupied(true).query(&p).status,
            FieldStatus::UnknownOccupied
        );
    }

    #[test]
    fn test_voxel_fast_path_matches_center_query() {
        let mut layer = observed_layer();
        layer.set_voxel(GlobalIndex::new(2, 3, 3), TsdfVoxel::new(-0.05, 1.0));
        let sweep = TsdfSweep::new(&layer, robot(0.12)).unwrap();
        for x in 0..8 {
            let index = GlobalIndex::new(x, 3, 3);
            let center = layer.voxel_center(index);
            assert_eq!(sweep.query_at_voxel(index), sweep.query(&center));
        }
        assert!(sweep.query_at_voxel(GlobalIndex::new(3, 3, 3)).is_collision());
        assert!(!sweep.query_at_voxel(GlobalIndex::new(4, 3, 3)).is_collision());
    }
}
