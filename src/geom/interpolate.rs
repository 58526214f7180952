//! Correspondence matching and depth interpolation between two contours.
//!
//! Two contours drawn on different slices rarely have the same number of
//! vertices. Before blending, the sparser one is resampled along its own
//! arc length to the vertex count of the richer one, which keeps its first
//! vertex at index 0. Equal counts are matched index by index as drawn.

use super::contour::{Contour, ContourKind};
use super::Point2;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpolationError {
    #[error("bounding contours share the same depth {depth}")]
    CoincidentDepths { depth: f64 },
    #[error("query depth {depth} lies outside [{min}, {max}]")]
    DepthOutOfRange { depth: f64, min: f64, max: f64 },
    #[error("cannot interpolate against an empty contour")]
    EmptyContour,
    #[error("depth values must be finite")]
    NonFiniteDepth,
}

/// Two contours brought to a common vertex count with index correspondence.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedContours {
    pub first: Vec<Point2>,
    pub second: Vec<Point2>,
    /// Whether the ribbon between the two wraps from the last index to the first.
    pub wraps: bool,
    pub first_is_apex: bool,
    pub second_is_apex: bool,
}

impl MatchedContours {
    /// Shared vertex count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.first.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Number of edges along each side of the ribbon.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.len();
        if self.wraps { n } else { n.saturating_sub(1) }
    }
}

/// Resample the sparser contour so both share `max(len_a, len_b)` vertices.
pub fn match_contours(a: &Contour, b: &Contour) -> Result<MatchedContours, InterpolationError> {
    if a.points().is_empty() || b.points().is_empty() {
        return Err(InterpolationError::EmptyContour);
    }
    let count = a.len().max(b.len());

    // An apex takes the topology of the contour it meets.
    let wraps = matches!(
        (a.kind(), b.kind()),
        (ContourKind::Closed, ContourKind::Closed)
            | (ContourKind::Closed, ContourKind::Apex)
            | (ContourKind::Apex, ContourKind::Closed)
    );

    Ok(MatchedContours {
        first: a.resample(count),
        second: b.resample(count),
        wraps,
        first_is_apex: a.is_apex(),
        second_is_apex: b.is_apex(),
    })
}

/// Validate a pair of bounding depths.
pub fn check_depth_pair(za: f64, zb: f64) -> Result<(), InterpolationError> {
    if !za.is_finite() || !zb.is_finite() {
        return Err(InterpolationError::NonFiniteDepth);
    }
    if za == zb {
        return Err(InterpolationError::CoincidentDepths { depth: za });
    }
    Ok(())
}

/// Contour at depth `z` between `a` (at `za`) and `b` (at `zb`).
///
/// At `z == za` or `z == zb` the result is the respective contour after
/// matching, with no blending error. In between, every matched vertex pair
/// is blended linearly with weight `(z - za) / (zb - za)`.
pub fn interpolate_contour(
    a: &Contour,
    za: f64,
    b: &Contour,
    zb: f64,
    z: f64,
) -> Result<Contour, InterpolationError> {
    check_depth_pair(za, zb)?;
    if !z.is_finite() {
        return Err(InterpolationError::NonFiniteDepth);
    }
    let (min, max) = if za < zb { (za, zb) } else { (zb, za) };
    if z < min || z > max {
        return Err(InterpolationError::DepthOutOfRange { depth: z, min, max });
    }

    let matched = match_contours(a, b)?;
    if z == za {
        return Ok(Contour::derived(a.kind(), matched.first));
    }
    if z == zb {
        return Ok(Contour::derived(b.kind(), matched.second));
    }

    let t = (z - za) / (zb - za);
    let points: Vec<Point2> = matched
        .first
        .iter()
        .zip(&matched.second)
        .map(|(p, q)| p.blend(*q, t))
        .collect();

    let kind = if matched.first_is_apex && matched.second_is_apex {
        ContourKind::Apex
    } else if matched.wraps {
        ContourKind::Closed
    } else {
        ContourKind::Open
    };
    Ok(Contour::derived(kind, points))
}
