//! Configuration for validity checking.
//!
//! # Example
//!
//! ```
//! use route_validity::ValidityConfig;
//!
//! let config = ValidityConfig::default()
//!     .with_treat_unknown_as_occupied(true)
//!     .with_march_step(0.05);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{ValidityError, ValidityResult};

/// Default clearance below which the ray-march reports a collision instead of
/// taking an ever smaller step.
pub const DEFAULT_MIN_CLEARANCE: f64 = 1.0e-2;

/// Tuning knobs shared by the point oracle and the motion validators.
///
/// Defaults:
/// - Unknown TSDF space: free (optimistic global planning)
/// - ESDF lookups: trilinear interpolation
/// - Ray-march step: half the map voxel size
/// - Minimum clearance: [`DEFAULT_MIN_CLEARANCE`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ValidityConfig {
    /// Treat unobserved TSDF voxels and unallocated blocks as obstacles.
    treat_unknown_as_occupied: bool,
    /// Interpolate ESDF distances instead of reading the containing voxel.
    interpolate: bool,
    /// Nominal ray-march step; `None` uses half the voxel size.
    march_step: Option<f64>,
    /// Clearance under which the ray-march stops advancing.
    min_clearance: f64,
}

impl ValidityConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            treat_unknown_as_occupied: false,
            interpolate: true,
            march_step: None,
            min_clearance: DEFAULT_MIN_CLEARANCE,
        }
    }

    /// Sets the unknown-space policy for TSDF fields.
    #[must_use]
    pub const fn with_treat_unknown_as_occupied(mut self, occupied: bool) -> Self {
        self.treat_unknown_as_occupied = occupied;
        self
    }

    /// Enables or disables trilinear interpolation of ESDF distances.
    #[must_use]
    pub const fn with_interpolation(mut self, interpolate: bool) -> Self {
        self.interpolate = interpolate;
        self
    }

    /// Sets a fixed nominal step for the continuous ray-march.
    #[must_use]
    pub const fn with_march_step(mut self, step: f64) -> Self {
        self.march_step = Some(step);
        self
    }

    /// Reverts to a step derived from the map voxel size.
    #[must_use]
    pub const fn without_march_step(mut self) -> Self {
        self.march_step = None;
        self
    }

    /// Sets the minimum clearance threshold of the continuous ray-march.
    ///
    /// Must be strictly positive; [`Self::validate`] rejects zero.
    #[must_use]
    pub const fn with_min_clearance(mut self, clearance: f64) -> Self {
        self.min_clearance = clearance;
        self
    }

    /// Whether unknown TSDF space counts as occupied.
    #[must_use]
    pub const fn treat_unknown_as_occupied(&self) -> bool {
        self.treat_unknown_as_occupied
    }

    /// Whether ESDF distances are interpolated.
    #[must_use]
    pub const fn interpolate(&self) -> bool {
        self.interpolate
    }

    /// Configured ray-march step, if any.
    #[must_use]
    pub const fn march_step(&self) -> Option<f64> {
        self.march_step
    }

    /// Minimum clearance threshold.
    #[must_use]
    pub const fn min_clearance(&self) -> f64 {
        self.min_clearance
    }

    /// Nominal ray-march step for a field with the given voxel size.
    ///
    /// # Errors
    ///
    /// Returns [`ValidityError::MissingMarchStep`] when neither a step nor a voxel size
    /// is available.
    pub fn resolve_march_step(
        &self,
        voxel_size: Option<f64>,
        field: &'static str,
    ) -> ValidityResult<f64> {
        match (self.march_step, voxel_size) {
            (Some(step), _) => Ok(step),
            (None, Some(voxel_size)) => Ok(voxel_size * 0.5),
            (None, None) => Err(ValidityError::MissingMarchStep { field }),
        }
    }

    /// Checks that all numeric settings are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidityError::InvalidMarchStep`] or
    /// [`ValidityError::InvalidClearanceThreshold`] for out-of-range values.
    pub fn validate(&self) -> ValidityResult<()> {
        if let Some(step) = self.march_step {
            if step <= 0.0 || !step.is_finite() {
                return Err(ValidityError::InvalidMarchStep(step));
            }
        }
        if self.min_clearance <= 0.0 || !self.min_clearance.is_finite() {
            return Err(ValidityError::InvalidClearanceThreshold(self.min_clearance));
        }
        Ok(())
    }
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self::new()
    }
}
