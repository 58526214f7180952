//! Enclosed volume by slab summation.
//!
//! Every slice in the surface's z-extent contributes its (stored or
//! interpolated) enclosed contour area times the slice thickness. Apex, open
//! and empty slices enclose nothing.

use crate::geom::{Calibration, MeasureMetrics, TimingBucket};

use super::{PolylineSurface, SurfaceError};

/// Calibrated cross-section area of one slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlabArea {
    pub slice: i32,
    /// In `calibration.area_unit()`.
    pub area: f64,
    /// False when the contour was interpolated.
    pub stored: bool,
}

pub fn slab_areas(
    surface: &PolylineSurface,
    calibration: &Calibration,
) -> Result<Vec<SlabArea>, SurfaceError> {
    calibration.validate()?;
    let pixel_area = calibration.pixel_area();

    let mut metrics = MeasureMetrics::default();
    metrics.begin();
    let stack = metrics.time(TimingBucket::Interpolation, || surface.interpolated_stack())?;
    if let Some(report) = metrics.end() {
        log::debug!(
            "surface `{}`: interpolated {} slices in {} ns",
            surface.title(),
            stack.len(),
            report.interpolation_ns
        );
    }

    Ok(stack
        .into_iter()
        .map(|(slice, contour)| SlabArea {
            slice,
            area: contour.enclosed_area() * pixel_area,
            stored: surface.contains_slice(slice),
        })
        .collect())
}

/// Calibrated enclosed volume. An empty surface has volume 0.
pub fn surface_volume(
    surface: &PolylineSurface,
    calibration: &Calibration,
) -> Result<f64, SurfaceError> {
    let slabs = slab_areas(surface, calibration)?;
    let volume = slabs.iter().map(|slab| slab.area).sum::<f64>() * calibration.pixel_depth;
    log::debug!(
        "surface `{}`: volume {volume} {} over {} slices",
        surface.title(),
        calibration.volume_unit(),
        slabs.len()
    );
    Ok(volume)
}
