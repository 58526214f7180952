//! Physical voxel calibration.
//!
//! Contours are stored in pixel coordinates and slices in index units. A
//! [`Calibration`] maps both onto physical space. Scaling is applied to
//! coordinates before any cross product is taken: under anisotropic voxels an
//! area does not scale by a single factor.

use serde::{Deserialize, Serialize};

use super::Point3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalibrationError {
    #[error("pixel {axis} must be a finite positive number, got {value}")]
    InvalidScale { axis: &'static str, value: f64 },
}

/// Per-axis scale factors plus the unit label they are expressed in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub pixel_width: f64,
    pub pixel_height: f64,
    pub pixel_depth: f64,
    pub unit: String,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            pixel_width: 1.0,
            pixel_height: 1.0,
            pixel_depth: 1.0,
            unit: "pixel".to_string(),
        }
    }
}

impl Calibration {
    /// Create a validated calibration.
    pub fn new(
        pixel_width: f64,
        pixel_height: f64,
        pixel_depth: f64,
        unit: impl Into<String>,
    ) -> Result<Self, CalibrationError> {
        let calibration = Self {
            pixel_width,
            pixel_height,
            pixel_depth,
            unit: unit.into(),
        };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Isotropic in-plane calibration with a separate slice spacing.
    pub fn with_depth(
        pixel_size: f64,
        pixel_depth: f64,
        unit: impl Into<String>,
    ) -> Result<Self, CalibrationError> {
        Self::new(pixel_size, pixel_size, pixel_depth, unit)
    }

    pub fn validate(&self) -> Result<(), CalibrationError> {
        for (axis, value) in [
            ("width", self.pixel_width),
            ("height", self.pixel_height),
            ("depth", self.pixel_depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalibrationError::InvalidScale { axis, value });
            }
        }
        Ok(())
    }

    /// True when every factor is 1, i.e. measurements come out in voxel units.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.pixel_width == 1.0 && self.pixel_height == 1.0 && self.pixel_depth == 1.0
    }

    /// Map a voxel-space point (x, y in pixels, z in slices) to physical space.
    #[must_use]
    pub fn apply(&self, p: Point3) -> Point3 {
        p.scaled(self.pixel_width, self.pixel_height, self.pixel_depth)
    }

    /// Physical area of one pixel.
    #[must_use]
    pub fn pixel_area(&self) -> f64 {
        self.pixel_width * self.pixel_height
    }

    /// Physical volume of one voxel.
    #[must_use]
    pub fn voxel_volume(&self) -> f64 {
        self.pixel_area() * self.pixel_depth
    }

    #[must_use]
    pub fn area_unit(&self) -> String {
        format!("{}^2", self.unit)
    }

    #[must_use]
    pub fn volume_unit(&self) -> String {
        format!("{}^3", self.unit)
    }
}
