//! State-space bounds.
//!
//! The planner's sampling space is usually a box, but any predicate over points can
//! act as bounds. A point rejected by the bounds is invalid whatever the map says.
//!
//! # Example
//!
//! ```
//! use route_validity::{Aabb, FnBounds, StateBounds, Unbounded};
//! use nalgebra::Point3;
//!
//! let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 10.0, 3.0));
//! assert!(aabb.contains(&Point3::new(5.0, 5.0, 1.0)));
//! assert!(!aabb.contains(&Point3::new(5.0, 5.0, 4.0)));
//!
//! let above_ground = FnBounds::new(|p: &nalgebra::Point3<f64>| p.z >= 0.0);
//! assert!(!above_ground.contains(&Point3::new(0.0, 0.0, -1.0)));
//!
//! assert!(Unbounded.contains(&Point3::new(1e9, -1e9, 0.0)));
//! ```

use nalgebra::Point3;

/// A predicate deciding whether a point lies inside the state space.
pub trait StateBounds {
    /// Whether `point` lies inside the bounds.
    fn contains(&self, point: &Point3<f64>) -> bool;
}

impl<B: StateBounds + ?Sized> StateBounds for &B {
    fn contains(&self, point: &Point3<f64>) -> bool {
        (**self).contains(point)
    }
}

/// An axis-aligned box in world coordinates, inclusive on every face.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Creates a box from two opposite corners given in any order.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: Point3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Point3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Creates a box from a center and half-extents.
    #[must_use]
    pub fn from_center(center: Point3<f64>, half_extents: nalgebra::Vector3<f64>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Edge lengths of the box.
    #[must_use]
    pub fn size(&self) -> nalgebra::Vector3<f64> {
        self.max - self.min
    }
}

impl StateBounds for Aabb {
    fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Bounds accepting every point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unbounded;

impl StateBounds for Unbounded {
    fn contains(&self, _point: &Point3<f64>) -> bool {
        true
    }
}

/// Bounds defined by a caller-supplied predicate.
#[derive(Clone, Copy)]
pub struct FnBounds<F> {
    predicate: F,
}

impl<F> FnBounds<F>
where
    F: Fn(&Point3<f64>) -> bool,
{
    /// Wraps a predicate.
    pub const fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> StateBounds for FnBounds<F>
where
    F: Fn(&Point3<f64>) -> bool,
{
    fn contains(&self, point: &Point3<f64>) -> bool {
        (self.predicate)(point)
    }
}

impl<F> std::fmt::Debug for FnBounds<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnBounds").finish_non_exhaustive()
    }
}
