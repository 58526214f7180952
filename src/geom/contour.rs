//! Slice contours.
//!
//! A contour is one cross-section of a surface. The only structural
//! distinction the reconstruction cares about is the point count, so the
//! representation is a closed set of variants:
//!
//! - `Empty`: no outline on this slice
//! - `Apex`: a single point where the surface pinches (cone tips, poles)
//! - `Open`: a polyline whose ends are not joined (line selections, 2-point segments)
//! - `Closed`: a polygon whose last vertex connects back to the first
//!
//! Constructors validate coordinates and drop duplicate vertices, so a stored
//! contour never carries non-finite values or zero-length steps.

use serde::{Deserialize, Serialize};

use super::{Point2, Tolerance};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContourError {
    #[error("contour contains non-finite coordinates at point {point_index}")]
    NonFinitePoint { point_index: usize },
    #[error("closed contour needs at least 3 distinct points, got {point_count}")]
    ClosedTooShort { point_count: usize },
}

/// Topology of a contour, independent of its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContourKind {
    Empty,
    Apex,
    Open,
    Closed,
}

/// A validated slice contour.
///
/// The shape is private: every contour, including a deserialized one, passes
/// through the checking constructors, so an open contour always has at least
/// two distinct points and a closed one at least three.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ContourRepr", into = "ContourRepr")]
pub struct Contour {
    shape: Shape,
}

#[derive(Debug, Clone, PartialEq, Default)]
enum Shape {
    #[default]
    Empty,
    Apex(Point2),
    Open(Vec<Point2>),
    Closed(Vec<Point2>),
}

/// Wire form: `{"kind": "closed", "points": [...]}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", content = "points", rename_all = "snake_case")]
enum ContourRepr {
    Empty,
    Apex(Point2),
    Open(Vec<Point2>),
    Closed(Vec<Point2>),
}

impl TryFrom<ContourRepr> for Contour {
    type Error = ContourError;

    fn try_from(repr: ContourRepr) -> Result<Self, Self::Error> {
        match repr {
            ContourRepr::Empty => Ok(Self::EMPTY),
            ContourRepr::Apex(point) => Self::apex(point),
            ContourRepr::Open(points) => Self::open(points),
            ContourRepr::Closed(points) => Self::closed(points),
        }
    }
}

impl From<Contour> for ContourRepr {
    fn from(contour: Contour) -> Self {
        match contour.shape {
            Shape::Empty => Self::Empty,
            Shape::Apex(point) => Self::Apex(point),
            Shape::Open(points) => Self::Open(points),
            Shape::Closed(points) => Self::Closed(points),
        }
    }
}

impl Contour {
    /// No outline on this slice.
    pub const EMPTY: Self = Self { shape: Shape::Empty };

    /// Build a contour choosing its kind from the cleaned point count:
    /// 0 points is empty, 1 an apex, 2 an open segment, 3 or more a polygon.
    pub fn from_points(points: Vec<Point2>) -> Result<Self, ContourError> {
        Self::from_points_with_tolerance(points, Tolerance::default_geom())
    }

    pub fn from_points_with_tolerance(
        points: Vec<Point2>,
        tol: Tolerance,
    ) -> Result<Self, ContourError> {
        let mut cleaned = clean_points(points, tol, true)?;
        let shape = match cleaned.len() {
            0 => Shape::Empty,
            1 => Shape::Apex(cleaned.remove(0)),
            2 => Shape::Open(cleaned),
            _ => Shape::Closed(cleaned),
        };
        Ok(Self { shape })
    }

    /// Build an explicitly closed polygon.
    pub fn closed(points: Vec<Point2>) -> Result<Self, ContourError> {
        let cleaned = clean_points(points, Tolerance::default_geom(), true)?;
        if cleaned.len() < 3 {
            return Err(ContourError::ClosedTooShort {
                point_count: cleaned.len(),
            });
        }
        Ok(Self {
            shape: Shape::Closed(cleaned),
        })
    }

    /// Build an explicitly open polyline. Fewer than two distinct points
    /// collapse to an apex or an empty contour.
    pub fn open(points: Vec<Point2>) -> Result<Self, ContourError> {
        let mut cleaned = clean_points(points, Tolerance::default_geom(), false)?;
        let shape = match cleaned.len() {
            0 => Shape::Empty,
            1 => Shape::Apex(cleaned.remove(0)),
            _ => Shape::Open(cleaned),
        };
        Ok(Self { shape })
    }

    pub fn apex(point: Point2) -> Result<Self, ContourError> {
        if !point.is_finite() {
            return Err(ContourError::NonFinitePoint { point_index: 0 });
        }
        Ok(Self {
            shape: Shape::Apex(point),
        })
    }

    /// Build from parallel coordinate arrays, the layout selection tools hand over.
    pub fn from_coordinates(xs: &[f64], ys: &[f64]) -> Result<Self, ContourError> {
        Self::from_points(zip_coordinates(xs, ys))
    }

    #[must_use]
    pub fn kind(&self) -> ContourKind {
        match self.shape {
            Shape::Empty => ContourKind::Empty,
            Shape::Apex(_) => ContourKind::Apex,
            Shape::Open(_) => ContourKind::Open,
            Shape::Closed(_) => ContourKind::Closed,
        }
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        match &self.shape {
            Shape::Empty => &[],
            Shape::Apex(p) => std::slice::from_ref(p),
            Shape::Open(points) | Shape::Closed(points) => points,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.shape, Shape::Empty)
    }

    #[must_use]
    pub fn is_apex(&self) -> bool {
        matches!(self.shape, Shape::Apex(_))
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.shape, Shape::Closed(_))
    }

    /// Length of the outline, including the closing edge of a polygon.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        match &self.shape {
            Shape::Open(points) => polyline_length(points, false),
            Shape::Closed(points) => polyline_length(points, true),
            Shape::Empty | Shape::Apex(_) => 0.0,
        }
    }

    /// Unsigned area enclosed by a closed contour (shoelace formula).
    /// Open, apex and empty contours enclose nothing.
    #[must_use]
    pub fn enclosed_area(&self) -> f64 {
        let Shape::Closed(points) = &self.shape else {
            return 0.0;
        };
        let n = points.len();
        let mut twice = 0.0;
        for i in 0..n {
            let p = points[i];
            let q = points[(i + 1) % n];
            twice += p.x * q.y - q.x * p.y;
        }
        0.5 * twice.abs()
    }

    /// Vertex average.
    #[must_use]
    pub fn centroid(&self) -> Option<Point2> {
        let points = self.points();
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy) = points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point2::new(sx / n, sy / n))
    }

    /// Resample to exactly `count` points at equal arc-length fractions.
    ///
    /// Closed contours are walked around their full perimeter (fractions
    /// `i / count`), open ones from end to end (`i / (count - 1)`). The first
    /// vertex is always kept as sample 0, and a contour that already has
    /// `count` points is returned unchanged. An apex repeats its point.
    #[must_use]
    pub fn resample(&self, count: usize) -> Vec<Point2> {
        match &self.shape {
            Shape::Empty => Vec::new(),
            Shape::Apex(p) => vec![*p; count],
            Shape::Open(points) => resample_polyline(points, count, false),
            Shape::Closed(points) => resample_polyline(points, count, true),
        }
    }

    /// Contour of `kind` over points derived from already validated contours
    /// (resampled or blended). An apex keeps the first point; an open or
    /// closed kind without enough points degrades like [`Contour::open`].
    pub(crate) fn derived(kind: ContourKind, mut points: Vec<Point2>) -> Self {
        let shape = match (kind, points.len()) {
            (ContourKind::Empty, _) | (_, 0) => Shape::Empty,
            (ContourKind::Apex, _) | (_, 1) => Shape::Apex(points.swap_remove(0)),
            (ContourKind::Open, _) | (ContourKind::Closed, 2) => Shape::Open(points),
            (ContourKind::Closed, _) => Shape::Closed(points),
        };
        Self { shape }
    }
}

pub(crate) fn zip_coordinates(xs: &[f64], ys: &[f64]) -> Vec<Point2> {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| Point2::new(x, y))
        .collect()
}

fn clean_points(
    points: Vec<Point2>,
    tol: Tolerance,
    drop_closing_duplicate: bool,
) -> Result<Vec<Point2>, ContourError> {
    if let Some(point_index) = points.iter().position(|p| !p.is_finite()) {
        return Err(ContourError::NonFinitePoint { point_index });
    }

    let mut cleaned: Vec<Point2> = Vec::with_capacity(points.len());
    for pt in points {
        match cleaned.last() {
            Some(last) if tol.approx_eq_point2(*last, pt) => {}
            _ => cleaned.push(pt),
        }
    }

    if drop_closing_duplicate && cleaned.len() > 2 {
        let first = cleaned[0];
        if cleaned.last().is_some_and(|last| tol.approx_eq_point2(*last, first)) {
            cleaned.pop();
        }
    }

    Ok(cleaned)
}

fn polyline_length(points: &[Point2], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let segment_count = if closed { points.len() } else { points.len() - 1 };
    (0..segment_count)
        .map(|i| points[i].distance_to(points[(i + 1) % points.len()]))
        .sum()
}

fn resample_polyline(points: &[Point2], target_count: usize, closed: bool) -> Vec<Point2> {
    if points.len() == target_count {
        return points.to_vec();
    }
    let Some(&first) = points.first() else {
        return Vec::new();
    };
    if target_count <= 1 || points.len() < 2 {
        return vec![first; target_count];
    }

    // Cumulative arc length at the start of every segment, plus the total.
    let segment_count = if closed { points.len() } else { points.len() - 1 };
    let mut lengths = Vec::with_capacity(segment_count + 1);
    lengths.push(0.0);
    let mut total_len = 0.0;
    for i in 0..segment_count {
        total_len += points[i].distance_to(points[(i + 1) % points.len()]);
        lengths.push(total_len);
    }

    if total_len <= 0.0 || !total_len.is_finite() {
        return vec![first; target_count];
    }

    let divisions = if closed { target_count } else { target_count - 1 };
    let mut result = Vec::with_capacity(target_count);
    for i in 0..target_count {
        let target_len = (i as f64) / (divisions as f64) * total_len;

        let seg_idx = find_segment_index(&lengths, target_len);
        let seg_start_len = lengths[seg_idx];
        let seg_span = lengths[seg_idx + 1] - seg_start_len;

        let local_t = if seg_span > 0.0 {
            ((target_len - seg_start_len) / seg_span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let p0 = points[seg_idx % points.len()];
        let p1 = points[(seg_idx + 1) % points.len()];
        result.push(p0.lerp(p1, local_t));
    }

    result
}

fn find_segment_index(lengths: &[f64], target: f64) -> usize {
    for i in 0..(lengths.len().saturating_sub(1)) {
        if target >= lengths[i] && target <= lengths[i + 1] {
            return i;
        }
    }
    lengths.len().saturating_sub(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(size: f64) -> Vec<Point2> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn kind_follows_point_count() {
        assert_eq!(Contour::from_points(vec![]).unwrap(), Contour::EMPTY);
        assert!(Contour::from_points(vec![Point2::new(1.0, 1.0)]).unwrap().is_apex());
        assert_eq!(
            Contour::from_points(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)])
                .unwrap()
                .kind(),
            ContourKind::Open
        );
        assert!(Contour::from_points(square(1.0)).unwrap().is_closed());
    }

    #[test]
    fn rejects_non_finite_coordinates() {
        let err = Contour::from_points(vec![Point2::new(0.0, 0.0), Point2::new(f64::NAN, 1.0)])
            .unwrap_err();
        assert_eq!(err, ContourError::NonFinitePoint { point_index: 1 });
    }

    #[test]
    fn drops_repeated_and_closing_vertices() {
        let mut points = square(2.0);
        points.insert(1, Point2::new(0.0, 0.0));
        points.push(Point2::new(0.0, 0.0));
        let contour = Contour::from_points(points).unwrap();
        assert_eq!(contour.points(), square(2.0).as_slice());
    }

    #[test]
    fn closed_requires_three_points() {
        let err = Contour::closed(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).unwrap_err();
        assert_eq!(err, ContourError::ClosedTooShort { point_count: 2 });
    }

    #[test]
    fn open_collapses_to_apex() {
        let contour = Contour::open(vec![Point2::new(3.0, 4.0), Point2::new(3.0, 4.0)]).unwrap();
        assert_eq!(contour, Contour::apex(Point2::new(3.0, 4.0)).unwrap());
    }

    #[test]
    fn perimeter_and_area_of_square() {
        let contour = Contour::closed(square(10.0)).unwrap();
        assert_eq!(contour.perimeter(), 40.0);
        assert_eq!(contour.enclosed_area(), 100.0);
        assert_eq!(contour.centroid(), Some(Point2::new(5.0, 5.0)));

        let open = Contour::open(square(10.0)).unwrap();
        assert_eq!(open.perimeter(), 30.0);
        assert_eq!(open.enclosed_area(), 0.0);
    }

    #[test]
    fn resample_same_count_is_identity() {
        let contour = Contour::closed(vec![
            Point2::new(0.3, 0.1),
            Point2::new(7.0, 0.4),
            Point2::new(5.5, 9.1),
            Point2::new(-1.2, 3.3),
            Point2::new(-0.7, 1.0),
        ])
        .unwrap();
        assert_eq!(contour.resample(5), contour.points().to_vec());
    }

    #[test]
    fn resample_closed_square_to_eight_points() {
        let contour = Contour::closed(square(4.0)).unwrap();
        let samples = contour.resample(8);
        assert_eq!(samples.len(), 8);
        assert_eq!(samples[0], Point2::new(0.0, 0.0));
        assert_eq!(samples[1], Point2::new(2.0, 0.0));
        assert_eq!(samples[2], Point2::new(4.0, 0.0));
        assert_eq!(samples[5], Point2::new(2.0, 4.0));
        assert_eq!(samples[7], Point2::new(0.0, 2.0));
    }

    #[test]
    fn resample_open_keeps_both_ends() {
        let contour = Contour::open(vec![Point2::new(0.0, 0.0), Point2::new(6.0, 0.0)]).unwrap();
        let samples = contour.resample(4);
        assert_eq!(
            samples,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(4.0, 0.0),
                Point2::new(6.0, 0.0),
            ]
        );
    }

    #[test]
    fn resample_apex_repeats_point() {
        let apex = Contour::apex(Point2::new(2.0, 3.0)).unwrap();
        assert_eq!(apex.resample(3), vec![Point2::new(2.0, 3.0); 3]);
        assert!(Contour::EMPTY.resample(3).is_empty());
    }

    #[test]
    fn deserialized_shapes_are_validated() {
        assert_eq!(
            Contour::try_from(ContourRepr::Closed(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)])),
            Err(ContourError::ClosedTooShort { point_count: 2 })
        );
        assert_eq!(
            Contour::try_from(ContourRepr::Apex(Point2::new(f64::NAN, 0.0))),
            Err(ContourError::NonFinitePoint { point_index: 0 })
        );
        assert_eq!(Contour::try_from(ContourRepr::Open(vec![])), Ok(Contour::EMPTY));

        let single = Contour::try_from(ContourRepr::Open(vec![Point2::new(1.0, 2.0); 3])).unwrap();
        assert_eq!(single.kind(), ContourKind::Apex);
    }

    #[test]
    fn wire_form_keeps_the_kind() {
        let square = Contour::from_coordinates(&[0.0, 1.0, 1.0, 0.0], &[0.0, 0.0, 1.0, 1.0]).unwrap();
        let repr = ContourRepr::from(square.clone());
        assert!(matches!(&repr, ContourRepr::Closed(points) if points.len() == 4));
        assert_eq!(Contour::try_from(repr), Ok(square));
    }
}
