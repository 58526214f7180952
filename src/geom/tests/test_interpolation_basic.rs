use crate::geom::{Contour, ContourKind, InterpolationError, Point2, interpolate_contour, match_contours};

fn rect(x: f64, y: f64, w: f64, h: f64) -> Contour {
    Contour::closed(vec![
        Point2::new(x, y),
        Point2::new(x + w, y),
        Point2::new(x + w, y + h),
        Point2::new(x, y + h),
    ])
    .unwrap()
}

fn octagon(r: f64) -> Contour {
    Contour::closed(
        (0..8)
            .map(|i| {
                let t = (i as f64 / 8.0) * std::f64::consts::TAU;
                Point2::new(r * t.cos(), r * t.sin())
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn unequal_counts_use_the_richer_count() {
    let a = rect(-1.0, -1.0, 2.0, 2.0);
    let b = octagon(3.0);
    let mid = interpolate_contour(&a, 0.0, &b, 10.0, 5.0).unwrap();

    assert_eq!(mid.kind(), ContourKind::Closed);
    assert_eq!(mid.len(), 8);
}

#[test]
fn endpoint_of_sparser_side_is_its_resampled_form() {
    let a = rect(0.0, 0.0, 4.0, 4.0);
    let b = octagon(2.0);
    let at_a = interpolate_contour(&a, 2.0, &b, 6.0, 2.0).unwrap();

    assert_eq!(at_a.len(), 8);
    assert_eq!(at_a.kind(), ContourKind::Closed);
    assert_eq!(at_a.points()[0], a.points()[0]);
    assert_eq!(at_a.points(), a.resample(8).as_slice());
    assert!((at_a.perimeter() - a.perimeter()).abs() < 1e-9);
    assert!((at_a.enclosed_area() - a.enclosed_area()).abs() < 1e-9);
}

#[test]
fn quarter_depth_blend() {
    let a = rect(0.0, 0.0, 4.0, 4.0);
    let b = rect(4.0, 8.0, 4.0, 4.0);
    let q = interpolate_contour(&a, 0.0, &b, 4.0, 1.0).unwrap();
    assert_eq!(q.points()[0], Point2::new(1.0, 2.0));
    assert_eq!(q.points()[2], Point2::new(5.0, 6.0));
}

#[test]
fn open_and_closed_pair_does_not_wrap() {
    let open = Contour::open(vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)]).unwrap();
    let closed = rect(0.0, 0.0, 4.0, 4.0);
    let matched = match_contours(&open, &closed).unwrap();

    assert!(!matched.wraps);
    assert_eq!(matched.len(), 4);
    assert_eq!(matched.segment_count(), 3);

    let mid = interpolate_contour(&open, 0.0, &closed, 2.0, 1.0).unwrap();
    assert_eq!(mid.kind(), ContourKind::Open);
}

#[test]
fn non_finite_depth_is_rejected() {
    let a = rect(0.0, 0.0, 1.0, 1.0);
    assert_eq!(
        interpolate_contour(&a, 0.0, &a, f64::NAN, 0.0),
        Err(InterpolationError::NonFiniteDepth)
    );
    assert_eq!(
        interpolate_contour(&a, 0.0, &a, 1.0, f64::INFINITY),
        Err(InterpolationError::NonFiniteDepth)
    );
}

#[test]
fn open_endpoint_keeps_its_kind_and_first_point() {
    let open = Contour::open(vec![Point2::new(1.0, 1.0), Point2::new(7.0, 1.0)]).unwrap();
    let closed = octagon(3.0);
    let at_open = interpolate_contour(&open, 0.0, &closed, 4.0, 0.0).unwrap();

    assert_eq!(at_open.kind(), ContourKind::Open);
    assert_eq!(at_open.len(), 8);
    assert_eq!(at_open.points()[0], Point2::new(1.0, 1.0));
    assert_eq!(at_open.points()[7], Point2::new(7.0, 1.0));
}
