//! End-to-end validity scenarios over small hand-built maps.

#![allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]

use cf_voxfield::{BlockIndex, EsdfVoxel, GlobalIndex, Layer, TsdfVoxel};
use nalgebra::Point3;
use route_validity::{
    Aabb, DiscreteRayValidator, FieldStatus, FnBounds, MotionValidator, RayMarchValidator,
    RobotModel, SegmentValidator, Unbounded, ValidityChecker, ValidityConfig,
};

// =============================================================================
// Map builders
// =============================================================================

/// ESDF layer with every voxel of the given blocks set to `distance`.
fn esdf_blocks(voxel_size: f64, blocks: &[BlockIndex], distance: f32) -> Layer<EsdfVoxel> {
    let mut layer: Layer<EsdfVoxel> = Layer::new(voxel_size);
    for &block in blocks {
        for (_, voxel) in layer.allocate_block(block).iter_mut() {
            voxel.distance = distance;
        }
    }
    layer
}

/// TSDF layer whose origin block is observed and free.
fn observed_tsdf(voxel_size: f64) -> Layer<TsdfVoxel> {
    let mut layer: Layer<TsdfVoxel> = Layer::new(voxel_size);
    for (_, voxel) in layer.allocate_block(BlockIndex::new(0, 0, 0)).iter_mut() {
        *voxel = TsdfVoxel::new(voxel_size as f32 * 3.0, 1.0);
    }
    layer
}

fn robot(radius: f64) -> RobotModel {
    RobotModel::try_new(radius).unwrap()
}

// =============================================================================
// Segment scenarios
// =============================================================================

#[test]
fn test_single_obstacle_voxel_blocks_segment() {
    let mut layer = esdf_blocks(0.2, &[BlockIndex::new(0, 0, 0)], 1.0);
    layer.set_voxel(GlobalIndex::new(5, 0, 0), EsdfVoxel::new(-0.1));
    let checker =
        ValidityChecker::esdf(&layer, robot(0.3), Unbounded, ValidityConfig::default()).unwrap();

    let check = checker
        .motion_validator()
        .unwrap()
        .check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));

    assert!(!check.valid);
    let last_valid = check.last_valid.unwrap();
    assert!((0.8..1.0).contains(&last_valid.x), "last valid x = {}", last_valid.x);
    assert!(check.fraction > 0.4 && check.fraction <= 0.5);
    assert_eq!(check.fraction, 5.0 / 11.0);
}

#[test]
fn test_constant_field_everything_valid() {
    let blocks: Vec<_> = (0..2)
        .flat_map(|x| (0..2).flat_map(move |y| (0..2).map(move |z| BlockIndex::new(x, y, z))))
        .collect();
    let layer = esdf_blocks(0.25, &blocks, 1.0);
    // Two blocks of four meters, keep a voxel of margin for interpolation
    let bounds = Aabb::new(Point3::new(0.5, 0.5, 0.5), Point3::new(7.5, 7.5, 7.5));
    let checker =
        ValidityChecker::esdf(&layer, robot(0.5), bounds, ValidityConfig::default()).unwrap();
    let discrete = checker.discrete_validator().unwrap();
    let continuous = checker.continuous_validator().unwrap();

    let points = [
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(7.5, 7.5, 7.5),
        Point3::new(3.9, 4.1, 2.2),
        Point3::new(6.0, 1.0, 5.5),
        Point3::new(1.3, 7.0, 0.9),
    ];
    for p in &points {
        assert!(checker.is_valid(p), "{p:?} should be valid");
    }
    for a in &points {
        for b in &points {
            for check in [
                discrete.check_motion_detailed(a, b),
                continuous.check_motion_detailed(a, b),
            ] {
                assert!(check.valid, "{a:?} -> {b:?}");
                assert_eq!(check.fraction, 1.0);
                assert!(check.last_valid.is_none());
            }
        }
    }
}

#[test]
fn test_fraction_matches_voxel_position() {
    let mut layer = esdf_blocks(0.1, &[BlockIndex::new(0, 0, 0)], 1.0);
    let start = Point3::new(0.05, 0.05, 0.05);
    let goal = Point3::new(1.55, 0.05, 0.05);
    // 16 voxels along the segment, obstacle at each position in turn
    for k in 0..16 {
        layer.set_voxel(GlobalIndex::new(k, 0, 0), EsdfVoxel::new(0.0));
        {
            let checker =
                ValidityChecker::esdf(&layer, robot(0.05), Unbounded, ValidityConfig::default())
                    .unwrap();
            let check = checker
                .discrete_validator()
                .unwrap()
                .check_motion_detailed(&start, &goal);
            assert!(!check.valid);
            assert_eq!(check.fraction, k as f64 / 16.0);
            let last_valid = check.last_valid.unwrap();
            assert!((last_valid.x - (0.05 + 1.5 * k as f64 / 16.0)).abs() < 1e-12);
        }
        layer.set_voxel(GlobalIndex::new(k, 0, 0), EsdfVoxel::new(1.0));
    }
}

#[test]
fn test_blocked_fraction_is_monotone_in_obstacle_position() {
    let field = |wall: f64| move |p: &Point3<f64>| wall - p.x;
    let config = ValidityConfig::default().with_march_step(0.05);
    let mut previous = -1.0;
    for wall in [1.0, 1.5, 2.0, 2.5, 3.0] {
        let checker = ValidityChecker::opaque(field(wall), robot(0.2), Unbounded, config).unwrap();
        let check = checker
            .motion_validator()
            .unwrap()
            .check_motion_detailed(&Point3::origin(), &Point3::new(4.0, 0.0, 0.0));
        assert!(!check.valid);
        assert!(check.fraction > previous);
        previous = check.fraction;
    }
}

#[test]
fn test_goal_inside_obstacle_is_rejected() {
    // Point obstacle sitting exactly on the goal; the interior is wide open
    let goal = Point3::new(1.0, 0.0, 0.0);
    let checker = ValidityChecker::opaque(
        move |p: &Point3<f64>| if p == &goal { 0.0 } else { 10.0 },
        robot(0.1),
        Unbounded,
        ValidityConfig::default().with_march_step(0.4),
    )
    .unwrap();
    let validator = checker.motion_validator().unwrap();
    assert!(matches!(validator, SegmentValidator::Continuous(_)));
    let check = validator.check_motion_detailed(&Point3::origin(), &goal);
    assert!(!check.valid);
    assert!(check.last_valid.unwrap().x < 1.0);
}

// =============================================================================
// Point scenarios
// =============================================================================

#[test]
fn test_out_of_bounds_is_invalid_regardless_of_map() {
    let layer = esdf_blocks(0.2, &[BlockIndex::new(0, 0, 0)], 5.0);
    let below_ceiling = FnBounds::new(|p: &Point3<f64>| p.z <= 1.0);
    let checker =
        ValidityChecker::esdf(&layer, robot(0.1), below_ceiling, ValidityConfig::default())
            .unwrap();
    assert!(checker.is_valid(&Point3::new(1.0, 1.0, 1.0)));
    assert!(!checker.is_valid(&Point3::new(1.0, 1.0, 1.5)));
    assert_eq!(checker.query(&Point3::new(1.0, 1.0, 1.5)).status, FieldStatus::Known);
}

#[test]
fn test_tsdf_unmapped_space_follows_policy() {
    let layer: Layer<TsdfVoxel> = Layer::new(0.1);
    let p = Point3::new(2.0, -3.0, 0.5);

    let free =
        ValidityChecker::tsdf(&layer, robot(0.3), Unbounded, ValidityConfig::default()).unwrap();
    assert!(free.is_valid(&p));

    let occupied = ValidityChecker::tsdf(
        &layer,
        robot(0.3),
        Unbounded,
        ValidityConfig::default().with_treat_unknown_as_occupied(true),
    )
    .unwrap();
    assert!(!occupied.is_valid(&p));
}

#[test]
fn test_tsdf_surface_invalid_under_both_policies() {
    let mut layer = observed_tsdf(0.1);
    layer.set_voxel(GlobalIndex::new(8, 8, 8), TsdfVoxel::new(-0.02, 2.0));
    let p = Point3::new(0.75, 0.85, 0.85);
    for occupied in [false, true] {
        let checker = ValidityChecker::tsdf(
            &layer,
            robot(0.25),
            Unbounded,
            ValidityConfig::default().with_treat_unknown_as_occupied(occupied),
        )
        .unwrap();
        assert!(!checker.is_valid(&p));
        assert_eq!(checker.query(&p).status, FieldStatus::Blocked);
    }
}

#[test]
fn test_tsdf_segment_through_observed_space() {
    let mut layer = observed_tsdf(0.1);
    let start = Point3::new(0.35, 0.75, 0.75);
    let goal = Point3::new(1.25, 0.75, 0.75);
    {
        let checker =
            ValidityChecker::tsdf(&layer, robot(0.15), Unbounded, ValidityConfig::default())
                .unwrap();
        assert!(checker.motion_validator().unwrap().check_motion(&start, &goal));
    }

    layer.set_voxel(GlobalIndex::new(9, 7, 7), TsdfVoxel::new(0.0, 1.0));
    let checker =
        ValidityChecker::tsdf(&layer, robot(0.15), Unbounded, ValidityConfig::default()).unwrap();
    let check = checker
        .motion_validator()
        .unwrap()
        .check_motion_detailed(&start, &goal);
    assert!(!check.valid);
    // The sphere around voxel 8 already reaches voxel 9, fifth of ten traversed
    assert_eq!(check.fraction, 0.5);
    let last_valid = check.last_valid.unwrap();
    assert!(last_valid.x <= 0.8 + 1e-9, "last valid x = {}", last_valid.x);
}

#[test]
fn test_esdf_validity_matches_distance() {
    let mut layer = esdf_blocks(0.5, &[BlockIndex::new(0, 0, 0)], 0.0);
    for (index, voxel) in layer
        .block_mut(BlockIndex::new(0, 0, 0))
        .unwrap()
        .iter_mut()
    {
        voxel.distance = 0.1 * index.x as f32;
    }
    let checker =
        ValidityChecker::esdf(&layer, robot(0.6), Unbounded, ValidityConfig::default()).unwrap();
    for i in 0..60 {
        let p = Point3::new(0.3 + 0.12 * f64::from(i), 2.0, 3.1);
        let distance = checker.field().distance(&p);
        let expected = distance.is_some_and(|d| 0.6 < d);
        assert_eq!(checker.is_valid(&p), expected, "x = {}", p.x);
    }
}

// =============================================================================
// Determinism and sharing
// =============================================================================

#[test]
fn test_repeated_queries_are_identical() {
    let mut layer = esdf_blocks(0.2, &[BlockIndex::new(0, 0, 0)], 1.0);
    layer.set_voxel(GlobalIndex::new(7, 3, 2), EsdfVoxel::new(0.05));
    let checker =
        ValidityChecker::esdf(&layer, robot(0.3), Unbounded, ValidityConfig::default()).unwrap();
    let discrete = checker.discrete_validator().unwrap();
    let continuous = checker.continuous_validator().unwrap();

    let start = Point3::new(0.3, 0.7, 0.5);
    let goal = Point3::new(2.9, 0.7, 0.5);
    let first = (
        discrete.check_motion_detailed(&start, &goal),
        continuous.check_motion_detailed(&start, &goal),
        checker.query(&goal),
    );
    for _ in 0..10 {
        let again = (
            discrete.check_motion_detailed(&start, &goal),
            continuous.check_motion_detailed(&start, &goal),
            checker.query(&goal),
        );
        assert_eq!(first.0.fraction.to_bits(), again.0.fraction.to_bits());
        assert_eq!(first.1.fraction.to_bits(), again.1.fraction.to_bits());
        assert_eq!(first, again);
    }
}

#[test]
fn test_concurrent_queries_share_one_snapshot() {
    let mut layer = esdf_blocks(0.2, &[BlockIndex::new(0, 0, 0)], 1.0);
    layer.set_voxel(GlobalIndex::new(5, 0, 0), EsdfVoxel::new(-0.1));
    let checker =
        ValidityChecker::esdf(&layer, robot(0.3), Unbounded, ValidityConfig::default()).unwrap();
    let validator = DiscreteRayValidator::new(checker.field()).unwrap();
    let expected = validator.check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..50 {
                    let check = validator
                        .check_motion_detailed(&Point3::origin(), &Point3::new(2.0, 0.0, 0.0));
                    assert_eq!(check, expected);
                    assert!(checker.is_valid(&Point3::new(2.0, 2.0, 2.0)));
                }
            });
        }
    });
}

#[test]
fn test_continuous_validator_over_opaque_field_needs_step() {
    let config = ValidityConfig::default();
    let checker =
        ValidityChecker::opaque(|_: &Point3<f64>| 1.0, robot(0.2), Unbounded, config).unwrap();
    assert!(checker.continuous_validator().is_err());

    let field = checker.field();
    let validator = RayMarchValidator::new(field, &config.with_march_step(0.2)).unwrap();
    assert!(validator.check_motion(&Point3::origin(), &Point3::new(3.0, 0.0, 0.0)));
}
