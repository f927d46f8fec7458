//! Property-based tests for voxel addressing and segment traversal.
//!
//! Run with: cargo test -p cf-voxfield -- proptest

use cf_voxfield::{GlobalIndex, SphereRegion, cast_ray, grid_index_from_scaled};
use nalgebra::Point3;
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// A point in voxel units within a bounded range.
fn arb_scaled_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-40.0..40.0f64).prop_map(Point3::from)
}

fn arb_global_index() -> impl Strategy<Value = GlobalIndex> {
    prop::array::uniform3(-1000i64..1000).prop_map(GlobalIndex::from)
}

// =============================================================================
// Traversal invariants
// =============================================================================

proptest! {
    #[test]
    fn proptest_traversal_endpoints(start in arb_scaled_point(), end in arb_scaled_point()) {
        let voxels: Vec<_> = cast_ray(&start, &end).collect();
        prop_assert_eq!(voxels.first().copied(), Some(grid_index_from_scaled(&start)));
        prop_assert_eq!(voxels.last().copied(), Some(grid_index_from_scaled(&end)));
    }

    #[test]
    fn proptest_traversal_unit_steps(start in arb_scaled_point(), end in arb_scaled_point()) {
        let voxels: Vec<_> = cast_ray(&start, &end).collect();
        for pair in voxels.windows(2) {
            prop_assert_eq!(pair[0].manhattan_distance(pair[1]), 1);
        }
    }

    #[test]
    fn proptest_traversal_count(start in arb_scaled_point(), end in arb_scaled_point()) {
        let traversal = cast_ray(&start, &end);
        let expected = grid_index_from_scaled(&start)
            .manhattan_distance(grid_index_from_scaled(&end)) + 1;
        prop_assert_eq!(traversal.len() as u64, expected);
        prop_assert_eq!(traversal.count() as u64, expected);
    }

    #[test]
    fn proptest_traversal_no_duplicates(start in arb_scaled_point(), end in arb_scaled_point()) {
        let voxels: Vec<_> = cast_ray(&start, &end).collect();
        let unique: std::collections::HashSet<_> = voxels.iter().collect();
        prop_assert_eq!(unique.len(), voxels.len());
    }

    #[test]
    fn proptest_traversal_is_deterministic(start in arb_scaled_point(), end in arb_scaled_point()) {
        let a: Vec<_> = cast_ray(&start, &end).collect();
        let b: Vec<_> = cast_ray(&start, &end).collect();
        prop_assert_eq!(a, b);
    }

    // =========================================================================
    // Addressing invariants
    // =========================================================================

    #[test]
    fn proptest_split_rebuild(index in arb_global_index(), side in 1u32..33) {
        let (block, voxel) = index.split(side);
        prop_assert!(voxel.is_within(side));
        prop_assert_eq!(GlobalIndex::from_parts(block, voxel, side), index);
    }

    #[test]
    fn proptest_sphere_region_symmetric(center in arb_global_index(), radius in 0.0..4.0f64) {
        let region = SphereRegion::around(center, radius);
        for index in region.iter() {
            let mirrored = center - (index - center);
            prop_assert!(region.contains(mirrored));
        }
    }
}
