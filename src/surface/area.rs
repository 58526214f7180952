//! Surface area of a polyline surface.
//!
//! Each pair of consecutive populated slices is matched to a common vertex
//! count and joined by a ribbon of triangles. Populated slices are always
//! visited in ascending order, so the result does not depend on the order in
//! which contours were added.
//!
//! For matched rings `A` (lower slice) and `B` (upper slice) of length `n`,
//! segment `k` spans the quad `A[k], A[k+1], B[k+1], B[k]`, with `k + 1`
//! wrapping to 0 when the ribbon is closed. The quad is split along the
//! shorter of its diagonals `A[k+1]-B[k]` and `A[k]-B[k+1]`; on equal length
//! the split with less area wins. Swapping the two slices swaps the
//! diagonals too, so a mirrored stack yields the same triangles. When one
//! side is an apex, only the triangle spanning the other side's segment is
//! kept, which turns the ribbon into a fan. Two apexes enclose nothing.

use crate::geom::{
    Calibration, CalibrationError, Contour, InterpolationError, MatchedContours, MeasureMetrics,
    MeshDiagnostics, Point2, Point3, SurfaceMesh, TimingBucket, TimingReport, Tolerance, Triangle3,
    check_depth_pair, finalize_mesh, match_contours,
};

use super::PolylineSurface;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceAreaError {
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[error("mesh needs {vertex_count} vertices, more than a u32 index can address")]
    MeshTooLarge { vertex_count: usize },
}

/// Options for [`surface_area_with_options`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaOptions {
    /// Degeneracy threshold for triangles, in uncalibrated slice units.
    pub tolerance: Tolerance,
    /// Leave zero-area triangles out of the sum and count them instead.
    pub skip_degenerate: bool,
}

impl Default for AreaOptions {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default_geom(),
            skip_degenerate: true,
        }
    }
}

impl AreaOptions {
    /// Sum every generated triangle, degenerate or not.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            skip_degenerate: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// What one area computation visited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaDiagnostics {
    pub slice_pair_count: usize,
    /// Triangles that contributed to the area.
    pub triangle_count: usize,
    pub skipped_degenerate_count: usize,
    /// Pairs where both slices were single points.
    pub apex_pair_count: usize,
    pub timing: Option<TimingReport>,
}

/// Calibrated surface area with default options.
pub fn surface_area(
    surface: &PolylineSurface,
    calibration: &Calibration,
) -> Result<f64, SurfaceAreaError> {
    surface_area_with_options(surface, calibration, AreaOptions::default()).map(|(area, _)| area)
}

pub fn surface_area_with_options(
    surface: &PolylineSurface,
    calibration: &Calibration,
    options: AreaOptions,
) -> Result<(f64, AreaDiagnostics), SurfaceAreaError> {
    calibration.validate()?;

    let mut diagnostics = AreaDiagnostics::default();
    if surface.len() < 2 {
        log::debug!(
            "surface `{}`: {} populated slice(s), area is 0",
            surface.title(),
            surface.len()
        );
        return Ok((0.0, diagnostics));
    }

    let mut metrics = MeasureMetrics::default();
    metrics.begin();

    let mut total = 0.0;
    for (lower, upper) in slice_pairs(surface) {
        let matched = metrics.time(TimingBucket::Matching, || match_contours(lower.1, upper.1))?;
        diagnostics.slice_pair_count += 1;
        if matched.first_is_apex && matched.second_is_apex {
            diagnostics.apex_pair_count += 1;
            continue;
        }

        let triangles = metrics.time(TimingBucket::Triangulation, || {
            ribbon_triangles(&matched, f64::from(lower.0), f64::from(upper.0))
        });

        total += metrics.time(TimingBucket::Area, || {
            let mut pair_area = 0.0;
            for triangle in &triangles {
                if options.skip_degenerate && triangle.is_degenerate(options.tolerance) {
                    diagnostics.skipped_degenerate_count += 1;
                    continue;
                }
                pair_area += triangle.calibrated_area(calibration);
                diagnostics.triangle_count += 1;
            }
            pair_area
        });
    }
    diagnostics.timing = metrics.end();

    log::debug!(
        "surface `{}`: area {total} {} from {} slice pairs, {} triangles ({} degenerate skipped)",
        surface.title(),
        calibration.area_unit(),
        diagnostics.slice_pair_count,
        diagnostics.triangle_count,
        diagnostics.skipped_degenerate_count
    );

    Ok((total, diagnostics))
}

/// Ribbon between two contours at depths `za` and `zb`, uncalibrated.
pub fn triangulate_pair(
    a: &Contour,
    za: f64,
    b: &Contour,
    zb: f64,
) -> Result<Vec<Triangle3>, SurfaceAreaError> {
    check_depth_pair(za, zb)?;
    let matched = match_contours(a, b)?;
    Ok(ribbon_triangles(&matched, za, zb))
}

/// Every ribbon of the surface with `z` equal to the slice index.
pub fn triangulate_surface(surface: &PolylineSurface) -> Result<Vec<Triangle3>, SurfaceAreaError> {
    let mut triangles = Vec::new();
    for (lower, upper) in slice_pairs(surface) {
        let matched = match_contours(lower.1, upper.1)?;
        triangles.extend(ribbon_triangles(
            &matched,
            f64::from(lower.0),
            f64::from(upper.0),
        ));
    }
    Ok(triangles)
}

/// Indexed mesh of the surface in calibrated coordinates.
///
/// Vertices are shared within a ribbon only; an apex ring contributes a
/// single vertex. Consecutive ribbons generally differ in vertex count, so
/// every interior slice shows up as open edges in the diagnostics.
pub fn surface_mesh(
    surface: &PolylineSurface,
    calibration: &Calibration,
    tol: Tolerance,
) -> Result<(SurfaceMesh, MeshDiagnostics), SurfaceAreaError> {
    calibration.validate()?;

    let mut metrics = MeasureMetrics::default();
    metrics.begin();

    let mut points: Vec<Point3> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for (lower, upper) in slice_pairs(surface) {
        let matched = metrics.time(TimingBucket::Matching, || match_contours(lower.1, upper.1))?;
        if matched.first_is_apex && matched.second_is_apex {
            continue;
        }

        let lower_base = points.len();
        push_ring(&mut points, &matched.first, matched.first_is_apex, lower.0, calibration);
        let upper_base = points.len();
        push_ring(&mut points, &matched.second, matched.second_is_apex, upper.0, calibration);

        let vertex_count = points.len();
        let index = |ring_base: usize, apex: bool, k: usize| -> Result<u32, SurfaceAreaError> {
            let offset = if apex { 0 } else { k };
            u32::try_from(ring_base + offset)
                .map_err(|_| SurfaceAreaError::MeshTooLarge { vertex_count })
        };

        let n = matched.len();
        for face in ribbon_faces(&matched, f64::from(lower.0), f64::from(upper.0)) {
            for corner in face {
                let vertex = if corner < n {
                    index(lower_base, matched.first_is_apex, corner)?
                } else {
                    index(upper_base, matched.second_is_apex, corner - n)?
                };
                indices.push(vertex);
            }
        }
    }

    let (mesh, mut diagnostics) =
        metrics.time(TimingBucket::Mesh, || finalize_mesh(points, indices, tol));
    diagnostics.timing = metrics.end();

    log::debug!("surface `{}` mesh: {}", surface.title(), diagnostics.summary());
    if !diagnostics.is_manifold() {
        log::warn!(
            "surface `{}` mesh has {} non-manifold edges",
            surface.title(),
            diagnostics.non_manifold_edge_count
        );
    }

    Ok((mesh, diagnostics))
}

/// Consecutive populated slices, ascending.
fn slice_pairs(
    surface: &PolylineSurface,
) -> impl Iterator<Item = ((i32, &Contour), (i32, &Contour))> + '_ {
    surface.iter().zip(surface.iter().skip(1))
}

/// Triangles of one ribbon as corner indices into `first ++ second`:
/// `k` names `first[k]`, `n + k` names `second[k]`.
fn ribbon_faces(matched: &MatchedContours, za: f64, zb: f64) -> Vec<[usize; 3]> {
    let n = matched.len();
    if n == 0 || (matched.first_is_apex && matched.second_is_apex) {
        return Vec::new();
    }

    let segments = matched.segment_count();
    let mut faces = Vec::with_capacity(segments * 2);
    for k in 0..segments {
        let next = (k + 1) % n;
        if matched.first_is_apex {
            faces.push([next, n + next, n + k]);
        } else if matched.second_is_apex {
            faces.push([k, next, n + k]);
        } else if split_rising(matched, k, next, za, zb) {
            faces.push([k, next, n + next]);
            faces.push([k, n + next, n + k]);
        } else {
            faces.push([k, next, n + k]);
            faces.push([next, n + next, n + k]);
        }
    }
    faces
}

/// Whether quad `k` is split along `A[k]-B[k+1]` instead of `A[k+1]-B[k]`.
fn split_rising(matched: &MatchedContours, k: usize, next: usize, za: f64, zb: f64) -> bool {
    let (a0, a1) = (matched.first[k], matched.first[next]);
    let (b0, b1) = (matched.second[k], matched.second[next]);

    // Both diagonals span the same depth step, so the planar length decides.
    let falling = a1.distance_squared_to(b0);
    let rising = a0.distance_squared_to(b1);
    if rising != falling {
        return rising < falling;
    }

    let (a0, a1) = (a0.at_depth(za), a1.at_depth(za));
    let (b0, b1) = (b0.at_depth(zb), b1.at_depth(zb));
    let falling_area = Triangle3::new(a0, a1, b0).area() + Triangle3::new(a1, b1, b0).area();
    let rising_area = Triangle3::new(a0, a1, b1).area() + Triangle3::new(a0, b1, b0).area();
    rising_area < falling_area
}

fn ribbon_triangles(matched: &MatchedContours, za: f64, zb: f64) -> Vec<Triangle3> {
    let n = matched.len();
    let corner = |i: usize| {
        if i < n {
            matched.first[i].at_depth(za)
        } else {
            matched.second[i - n].at_depth(zb)
        }
    };
    ribbon_faces(matched, za, zb)
        .into_iter()
        .map(|[a, b, c]| Triangle3::new(corner(a), corner(b), corner(c)))
        .collect()
}

fn push_ring(
    points: &mut Vec<Point3>,
    ring: &[Point2],
    apex: bool,
    slice: i32,
    calibration: &Calibration,
) {
    let z = f64::from(slice);
    let ring = if apex { &ring[..ring.len().min(1)] } else { ring };
    points.extend(ring.iter().map(|p| calibration.apply(p.at_depth(z))));
}
