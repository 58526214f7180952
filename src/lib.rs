#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod measure;
pub mod surface;

use std::fmt;

use geom::{Calibration, CalibrationError, Contour, ContourError, Tolerance};
use measure::{MeasureError, MeasureOptions, SurfaceMeasurement, measure_surface};
use serde::Serialize;
use surface::{PolylineSurface, SurfaceAreaError, SurfaceError};
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("oppervlak is vergrendeld zolang een meting loopt")]
    Locked,
    #[error(transparent)]
    Contour(#[from] ContourError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    #[error(transparent)]
    Area(#[from] SurfaceAreaError),
    #[error(transparent)]
    Measure(#[from] MeasureError),
    #[error("ongeldige oppervlakdata: {0}")]
    Serialization(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MeshExport {
    positions: Vec<f64>,
    indices: Vec<u32>,
    open_edge_count: usize,
    degenerate_triangle_count: usize,
    warnings: Vec<String>,
}

/// Public entry point for consumers: one editable surface plus its calibration.
#[wasm_bindgen]
pub struct Engine {
    surface: PolylineSurface,
    calibration: Calibration,
    locked: bool,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    pub fn new(title: &str) -> Engine {
        Engine {
            surface: PolylineSurface::new(title),
            calibration: Calibration::default(),
            locked: false,
        }
    }

    #[wasm_bindgen]
    pub fn title(&self) -> String {
        self.surface.title().to_string()
    }

    #[wasm_bindgen]
    pub fn set_title(&mut self, title: &str) -> Result<(), JsValue> {
        self.ensure_unlocked().map_err(to_js_error)?;
        self.surface.set_title(title);
        Ok(())
    }

    /// Stel de kalibratie per as in (pixelbreedte, pixelhoogte, plakdikte en eenheid).
    #[wasm_bindgen]
    pub fn set_calibration(
        &mut self,
        pixel_width: f64,
        pixel_height: f64,
        pixel_depth: f64,
        unit: &str,
    ) -> Result<(), JsValue> {
        self.calibration =
            Calibration::new(pixel_width, pixel_height, pixel_depth, unit).map_err(to_js_error)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn unit(&self) -> String {
        self.calibration.unit.clone()
    }

    /// Voeg een contour toe op een plak. Een lege contour wist de plak.
    #[wasm_bindgen]
    pub fn add_contour(&mut self, slice: i32, xs: &[f64], ys: &[f64]) -> Result<(), JsValue> {
        let contour = Contour::from_coordinates(xs, ys).map_err(to_js_error)?;
        self.store(slice, contour).map_err(to_js_error)
    }

    /// Voeg een open polylijn toe (lijnselectie), ook bij drie of meer punten.
    #[wasm_bindgen]
    pub fn add_open_contour(&mut self, slice: i32, xs: &[f64], ys: &[f64]) -> Result<(), JsValue> {
        let contour = Contour::open(geom::zip_coordinates(xs, ys)).map_err(to_js_error)?;
        self.store(slice, contour).map_err(to_js_error)
    }

    /// Verwijder de contour op een plak. Geeft terug of er iets verwijderd is.
    #[wasm_bindgen]
    pub fn remove_contour(&mut self, slice: i32) -> Result<bool, JsValue> {
        self.ensure_unlocked().map_err(to_js_error)?;
        Ok(self.surface.remove_contour(slice).is_some())
    }

    #[wasm_bindgen]
    pub fn clear(&mut self) -> Result<(), JsValue> {
        self.ensure_unlocked().map_err(to_js_error)?;
        self.surface.clear();
        Ok(())
    }

    /// Blokkeer bewerkingen zolang de host een meting uitvoert.
    #[wasm_bindgen]
    pub fn lock_manipulation(&mut self) {
        self.locked = true;
    }

    #[wasm_bindgen]
    pub fn unlock_manipulation(&mut self) {
        self.locked = false;
    }

    #[wasm_bindgen]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[wasm_bindgen]
    pub fn contour_count(&self) -> usize {
        self.surface.len()
    }

    #[wasm_bindgen]
    pub fn start_slice(&self) -> Result<i32, JsValue> {
        self.surface.start_slice().map_err(to_js_error)
    }

    #[wasm_bindgen]
    pub fn end_slice(&self) -> Result<i32, JsValue> {
        self.surface.end_slice().map_err(to_js_error)
    }

    /// Gekalibreerde oppervlakte in eenheid^2.
    #[wasm_bindgen]
    pub fn surface_area(&self) -> Result<f64, JsValue> {
        surface::surface_area(&self.surface, &self.calibration).map_err(to_js_error)
    }

    /// Gekalibreerd volume in eenheid^3.
    #[wasm_bindgen]
    pub fn volume(&self) -> Result<f64, JsValue> {
        surface::surface_volume(&self.surface, &self.calibration).map_err(to_js_error)
    }

    /// Volledige meetregel als JS-object.
    #[wasm_bindgen]
    pub fn measure(&self) -> Result<JsValue, JsValue> {
        let row = self.measurement().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&row).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Contour op een plak als `[x0, y0, x1, y1, ...]`; leeg buiten het bereik.
    #[wasm_bindgen]
    pub fn get_interpolated_contour(&self, slice: i32) -> Result<Vec<f64>, JsValue> {
        let contour = self
            .surface
            .interpolated_contour(slice)
            .map_err(to_js_error)?;
        Ok(contour.points().iter().flat_map(|p| p.to_array()).collect())
    }

    /// Driehoeksnet van het oppervlak in gekalibreerde coördinaten.
    #[wasm_bindgen]
    pub fn get_mesh(&self) -> Result<JsValue, JsValue> {
        let (mesh, diagnostics) =
            surface::surface_mesh(&self.surface, &self.calibration, Tolerance::default_geom())
                .map_err(to_js_error)?;
        let export = MeshExport {
            positions: mesh.positions_flat().to_vec(),
            indices: mesh.indices,
            open_edge_count: diagnostics.open_edge_count,
            degenerate_triangle_count: diagnostics.degenerate_triangle_count,
            warnings: diagnostics.warnings,
        };
        serde_wasm_bindgen::to_value(&export).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn export_surface(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.surface)
            .map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Vervang het oppervlak door een eerder geëxporteerde momentopname.
    #[wasm_bindgen]
    pub fn import_surface(&mut self, value: JsValue) -> Result<(), JsValue> {
        self.ensure_unlocked().map_err(to_js_error)?;
        let surface: PolylineSurface = serde_wasm_bindgen::from_value(value)
            .map_err(|err| to_js_error(EngineError::Serialization(err.to_string())))?;
        self.surface = surface;
        Ok(())
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new("Surface")
    }
}

impl Engine {
    #[must_use]
    pub fn surface(&self) -> &PolylineSurface {
        &self.surface
    }

    #[must_use]
    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Measurement row for the current surface and calibration.
    pub fn measurement(&self) -> Result<SurfaceMeasurement, EngineError> {
        Ok(measure_surface(
            &self.surface,
            &self.calibration,
            &MeasureOptions::default(),
        )?)
    }

    /// Replace the surface wholesale. Rejected while locked.
    pub fn replace_surface(&mut self, surface: PolylineSurface) -> Result<(), EngineError> {
        self.ensure_unlocked()?;
        self.surface = surface;
        Ok(())
    }

    fn store(&mut self, slice: i32, contour: Contour) -> Result<(), EngineError> {
        self.ensure_unlocked()?;
        self.surface.add_contour(slice, contour);
        Ok(())
    }

    fn ensure_unlocked(&self) -> Result<(), EngineError> {
        if self.locked {
            log::warn!(
                "edit of surface `{}` rejected while locked",
                self.surface.title()
            );
            return Err(EngineError::Locked);
        }
        Ok(())
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
