//! Measurement front-end: one result row per surface.
//!
//! Rows carry calibrated values together with their unit so a host can
//! display them without knowing the calibration that produced them.

use std::fmt::Write as _;

use serde::Serialize;

use crate::geom::{Calibration, CalibrationError, Tolerance};
use crate::surface::{
    AreaOptions, PolylineSurface, SurfaceAreaError, SurfaceError, surface_area_with_options,
    surface_volume,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("area of `{title}`: {source}")]
    Area {
        title: String,
        #[source]
        source: SurfaceAreaError,
    },
    #[error("volume of `{title}`: {source}")]
    Volume {
        title: String,
        #[source]
        source: SurfaceError,
    },
}

/// Which quantities to compute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOptions {
    pub area: bool,
    pub volume: bool,
    pub tolerance: Tolerance,
}

impl Default for MeasureOptions {
    fn default() -> Self {
        Self {
            area: true,
            volume: true,
            tolerance: Tolerance::default_geom(),
        }
    }
}

impl MeasureOptions {
    #[must_use]
    pub fn area_only() -> Self {
        Self {
            volume: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn volume_only() -> Self {
        Self {
            area: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceMeasurement {
    pub title: String,
    /// Length unit of the calibration; area is in unit^2, volume in unit^3.
    pub unit: String,
    /// `None` on an empty surface.
    pub start_slice: Option<i32>,
    pub end_slice: Option<i32>,
    pub contour_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
    pub triangle_count: usize,
}

pub fn measure_surface(
    surface: &PolylineSurface,
    calibration: &Calibration,
    options: &MeasureOptions,
) -> Result<SurfaceMeasurement, MeasureError> {
    calibration.validate()?;

    let mut measurement = SurfaceMeasurement {
        title: surface.title().to_string(),
        unit: calibration.unit.clone(),
        start_slice: surface.start_slice().ok(),
        end_slice: surface.end_slice().ok(),
        contour_count: surface.len(),
        area: None,
        volume: None,
        triangle_count: 0,
    };

    if options.area {
        let area_options = AreaOptions::default().with_tolerance(options.tolerance);
        let (area, diagnostics) = surface_area_with_options(surface, calibration, area_options)
            .map_err(|source| MeasureError::Area {
                title: measurement.title.clone(),
                source,
            })?;
        measurement.area = Some(area);
        measurement.triangle_count = diagnostics.triangle_count;
    }

    if options.volume {
        let volume =
            surface_volume(surface, calibration).map_err(|source| MeasureError::Volume {
                title: measurement.title.clone(),
                source,
            })?;
        measurement.volume = Some(volume);
    }

    Ok(measurement)
}

/// Results for a batch of surfaces, in measurement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MeasurementTable {
    rows: Vec<SurfaceMeasurement>,
}

impl MeasurementTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: SurfaceMeasurement) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn rows(&self) -> &[SurfaceMeasurement] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of the measured areas. Rows without an area are skipped.
    #[must_use]
    pub fn total_area(&self) -> f64 {
        self.rows.iter().filter_map(|row| row.area).sum()
    }

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.rows.iter().filter_map(|row| row.volume).sum()
    }

    /// Comma-separated rendering with a header line. Missing values are empty cells.
    #[must_use]
    pub fn to_csv(&self) -> String {
        let mut out =
            String::from("Title,Unit,Start Slice,End Slice,Contours,Area,Volume,Triangles\n");
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{},{},{},{},{},{},{},{}",
                csv_field(&row.title),
                csv_field(&row.unit),
                optional(row.start_slice),
                optional(row.end_slice),
                row.contour_count,
                optional(row.area),
                optional(row.volume),
                row.triangle_count
            );
        }
        out
    }
}

impl Extend<SurfaceMeasurement> for MeasurementTable {
    fn extend<I: IntoIterator<Item = SurfaceMeasurement>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}

/// Measure every surface with one calibration. Stops at the first failure.
pub fn measure_all<'a>(
    surfaces: impl IntoIterator<Item = &'a PolylineSurface>,
    calibration: &Calibration,
    options: &MeasureOptions,
) -> Result<MeasurementTable, MeasureError> {
    let mut table = MeasurementTable::new();
    for surface in surfaces {
        table.push(measure_surface(surface, calibration, options)?);
    }
    log::debug!(
        "measured {} surfaces: area {} {}, volume {} {}",
        table.len(),
        table.total_area(),
        calibration.area_unit(),
        table.total_volume(),
        calibration.volume_unit()
    );
    Ok(table)
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
