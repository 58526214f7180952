//! Sparse stacks of slice contours.
//!
//! A [`PolylineSurface`] maps slice indices to user-drawn contours. Slices
//! with no stored contour that lie between two populated ones are never
//! stored; their outline is interpolated on demand.

mod area;
mod volume;

pub use area::{
    AreaDiagnostics, AreaOptions, SurfaceAreaError, surface_area, surface_area_with_options,
    surface_mesh, triangulate_pair, triangulate_surface,
};
pub use volume::{SlabArea, slab_areas, surface_volume};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geom::{CalibrationError, Contour, InterpolationError, interpolate_contour};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface `{title}` has no contours")]
    Empty { title: String },
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SurfaceRepr")]
pub struct PolylineSurface {
    title: String,
    /// Display-only; the measurement code never reads it.
    transparency: f64,
    contours: BTreeMap<i32, Contour>,
}

/// Snapshot as read back from the host. Goes through the same setters as
/// interactive edits, so empty slices are dropped and transparency clamped.
#[derive(Deserialize)]
struct SurfaceRepr {
    title: String,
    #[serde(default)]
    transparency: f64,
    #[serde(default)]
    contours: BTreeMap<i32, Contour>,
}

impl From<SurfaceRepr> for PolylineSurface {
    fn from(repr: SurfaceRepr) -> Self {
        let mut surface = Self::new(repr.title);
        surface.set_transparency(repr.transparency);
        for (slice, contour) in repr.contours {
            surface.add_contour(slice, contour);
        }
        surface
    }
}

impl Default for PolylineSurface {
    fn default() -> Self {
        Self::new("Surface")
    }
}

impl PolylineSurface {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            transparency: 0.0,
            contours: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn transparency(&self) -> f64 {
        self.transparency
    }

    /// Clamped to `0.0..=1.0`; NaN resets to opaque.
    pub fn set_transparency(&mut self, transparency: f64) {
        self.transparency = if transparency.is_nan() {
            0.0
        } else {
            transparency.clamp(0.0, 1.0)
        };
    }

    /// Store `contour` at `slice`, returning the contour it replaces.
    /// An empty contour clears the slice.
    pub fn add_contour(&mut self, slice: i32, contour: Contour) -> Option<Contour> {
        if contour.is_empty() {
            return self.contours.remove(&slice);
        }
        log::debug!(
            "surface `{}`: slice {slice} <- {:?} contour with {} points",
            self.title,
            contour.kind(),
            contour.len()
        );
        self.contours.insert(slice, contour)
    }

    pub fn remove_contour(&mut self, slice: i32) -> Option<Contour> {
        self.contours.remove(&slice)
    }

    pub fn clear(&mut self) {
        self.contours.clear();
    }

    /// The stored (user-drawn) contour at `slice`, if any.
    #[must_use]
    pub fn contour(&self, slice: i32) -> Option<&Contour> {
        self.contours.get(&slice)
    }

    #[must_use]
    pub fn contains_slice(&self, slice: i32) -> bool {
        self.contours.contains_key(&slice)
    }

    /// Number of populated slices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contours.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }

    /// Populated slice indices in ascending order.
    pub fn slices(&self) -> impl Iterator<Item = i32> + '_ {
        self.contours.keys().copied()
    }

    /// Populated slices with their contours, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &Contour)> + '_ {
        self.contours.iter().map(|(slice, contour)| (*slice, contour))
    }

    pub fn start_slice(&self) -> Result<i32, SurfaceError> {
        self.contours.keys().next().copied().ok_or_else(|| self.empty_error())
    }

    pub fn end_slice(&self) -> Result<i32, SurfaceError> {
        self.contours.keys().next_back().copied().ok_or_else(|| self.empty_error())
    }

    /// Contour at an integer slice. See [`contour_at_depth`](Self::contour_at_depth).
    pub fn interpolated_contour(&self, slice: i32) -> Result<Contour, SurfaceError> {
        self.contour_at_depth(f64::from(slice))
    }

    /// Contour at any depth (in slice units).
    ///
    /// A populated slice returns its stored contour unchanged. A depth between
    /// two populated slices is interpolated from the nearest one below and
    /// above. Outside the populated range, or on an empty surface, the result
    /// is [`Contour::EMPTY`].
    pub fn contour_at_depth(&self, z: f64) -> Result<Contour, SurfaceError> {
        if !z.is_finite() {
            return Err(InterpolationError::NonFiniteDepth.into());
        }
        let (Some((&first, _)), Some((&last, _))) =
            (self.contours.first_key_value(), self.contours.last_key_value())
        else {
            return Ok(Contour::EMPTY);
        };
        if z < f64::from(first) || z > f64::from(last) {
            return Ok(Contour::EMPTY);
        }

        // In range, so both neighbours exist and the casts cannot saturate.
        let below = self.contours.range(..=z.floor() as i32).next_back();
        let above = self.contours.range(z.ceil() as i32..).next();
        let (Some((&lo, lower)), Some((&hi, upper))) = (below, above) else {
            return Ok(Contour::EMPTY);
        };

        if lo == hi {
            return Ok(lower.clone());
        }
        Ok(interpolate_contour(
            lower,
            f64::from(lo),
            upper,
            f64::from(hi),
            z,
        )?)
    }

    /// Every slice in `start..=end` paired with its stored or interpolated contour.
    pub fn interpolated_stack(&self) -> Result<Vec<(i32, Contour)>, SurfaceError> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let start = self.start_slice()?;
        let end = self.end_slice()?;
        (start..=end)
            .map(|slice| Ok((slice, self.interpolated_contour(slice)?)))
            .collect()
    }

    fn empty_error(&self) -> SurfaceError {
        SurfaceError::Empty {
            title: self.title.clone(),
        }
    }
}
