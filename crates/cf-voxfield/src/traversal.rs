//! Voxel enumeration along a line segment.
//!
//! Uses the Amanatides & Woo fast voxel traversal, bounded at both ends: the walk
//! starts in the voxel containing the segment start and stops in the voxel
//! containing the segment end.
//!
//! Guarantees:
//!
//! - the first voxel is the start voxel and the last voxel is the end voxel;
//! - consecutive voxels differ by one step along exactly one axis, so no voxel is
//!   skipped or repeated;
//! - the number of voxels is `manhattan(end - start) + 1`;
//! - when the segment crosses an edge or corner exactly, the tie is broken toward
//!   the lowest axis (x, then y, then z).
//!
//! # Example
//!
//! ```
//! use cf_voxfield::{GlobalIndex, cast_ray};
//! use nalgebra::Point3;
//!
//! // Endpoints are in voxel units (world / voxel_size)
//! let voxels: Vec<_> = cast_ray(&Point3::new(0.5, 0.5, 0.5), &Point3::new(2.5, 1.5, 0.5)).collect();
//! assert_eq!(voxels.first(), Some(&GlobalIndex::new(0, 0, 0)));
//! assert_eq!(voxels.last(), Some(&GlobalIndex::new(2, 1, 0)));
//! assert_eq!(voxels.len(), 4);
//! ```

use nalgebra::Point3;

use crate::index::{GlobalIndex, grid_index_from_scaled};

/// Iterator over the voxels crossed by a segment, in order from start to end.
///
/// Created by [`cast_ray`].
#[derive(Debug, Clone)]
pub struct SegmentTraversal {
    /// Voxel returned by the next call to `next`.
    current: GlobalIndex,
    /// Step direction per axis (-1, 0 or 1).
    step: [i64; 3],
    /// Parametric distance to the next boundary per axis.
    t_max: [f64; 3],
    /// Parametric distance between boundaries per axis.
    t_delta: [f64; 3],
    /// Steps still to take per axis before reaching the end voxel.
    remaining: [u64; 3],
    /// Set once the end voxel has been yielded.
    finished: bool,
}

/// Enumerates the voxels crossed by the segment from `start_scaled` to `end_scaled`.
///
/// Both endpoints are expressed in voxel units, i.e. world coordinates divided by the
/// voxel size.
#[must_use]
pub fn cast_ray(start_scaled: &Point3<f64>, end_scaled: &Point3<f64>) -> SegmentTraversal {
    SegmentTraversal::new(start_scaled, end_scaled)
}

impl SegmentTraversal {
    fn new(start_scaled: &Point3<f64>, end_scaled: &Point3<f64>) -> Self {
        let start_index = grid_index_from_scaled(start_scaled);
        let end_index = grid_index_from_scaled(end_scaled);
        let ray = end_scaled - start_scaled;

        let start = start_index.as_array();
        let end = end_index.as_array();

        let mut step = [0i64; 3];
        let mut t_max = [f64::INFINITY; 3];
        let mut t_delta = [f64::INFINITY; 3];
        let mut remaining = [0u64; 3];

        for axis in 0..3 {
            let diff = end[axis] - start[axis];
            if diff == 0 {
                continue;
            }
            remaining[axis] = diff.unsigned_abs();
            // Step toward the end voxel even if rounding flipped the ray component
            step[axis] = diff.signum();

            let direction = ray[axis];
            if direction.abs() <= f64::EPSILON {
                t_max[axis] = 0.0;
                t_delta[axis] = 0.0;
                continue;
            }

            #[allow(clippy::cast_precision_loss)]
            let boundary = if step[axis] > 0 {
                (start[axis] + 1) as f64
            } else {
                start[axis] as f64
            };
            t_max[axis] = ((boundary - start_scaled[axis]) / direction).max(0.0);
            t_delta[axis] = (1.0 / direction).abs();
        }

        Self {
            current: start_index,
            step,
            t_max,
            t_delta,
            remaining,
            finished: false,
        }
    }

    /// Total steps left before the end voxel.
    fn steps_left(&self) -> u64 {
        self.remaining
            .iter()
            .fold(0u64, |acc, &steps| acc.saturating_add(steps))
    }

    /// Axis with the nearest boundary among axes that still need to move.
    fn next_axis(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for axis in 0..3 {
            if self.remaining[axis] == 0 {
                continue;
            }
            match best {
                Some(current) if self.t_max[axis] >= self.t_max[current] => {}
                _ => best = Some(axis),
            }
        }
        best
    }
}

impl Iterator for SegmentTraversal {
    type Item = GlobalIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let voxel = self.current;
        match self.next_axis() {
            Some(axis) => {
                match axis {
                    0 => self.current.x = self.current.x.wrapping_add(self.step[0]),
                    1 => self.current.y = self.current.y.wrapping_add(self.step[1]),
                    _ => self.current.z = self.current.z.wrapping_add(self.step[2]),
                }
                self.remaining[axis] -= 1;
                self.t_max[axis] += self.t_delta[axis];
            }
            None => self.finished = true,
        }

        Some(voxel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let left = usize::try_from(self.steps_left().saturating_add(1)).unwrap_or(usize::MAX);
        (left, Some(left))
    }
}

impl ExactSizeIterator for SegmentTraversal {}

impl std::iter::FusedIterator for SegmentTraversal {}
