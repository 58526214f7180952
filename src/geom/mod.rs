mod calibration;
mod contour;
mod core;
mod diagnostics;
mod interpolate;
mod mesh;
mod metrics;
mod triangle;

pub use calibration::{Calibration, CalibrationError};
pub use contour::{Contour, ContourError, ContourKind};
pub use core::{Point2, Point3, Tolerance, Vec3};
pub use diagnostics::MeshDiagnostics;
pub use interpolate::{
    InterpolationError, MatchedContours, check_depth_pair, interpolate_contour, match_contours,
};
pub use mesh::SurfaceMesh;
pub use metrics::{MeasureMetrics, TimingBucket, TimingReport};
pub use triangle::Triangle3;

pub(crate) use contour::zip_coordinates;
pub(crate) use mesh::finalize_mesh;

#[cfg(test)]
mod tests;
