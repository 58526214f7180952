use crate::geom::{Contour, ContourKind, Point2, Tolerance};

fn circle(r: f64, n: usize) -> Vec<Point2> {
    (0..n)
        .map(|i| {
            let t = (i as f64 / n as f64) * std::f64::consts::TAU;
            Point2::new(r * t.cos(), r * t.sin())
        })
        .collect()
}

#[test]
fn resampled_circle_keeps_first_vertex_and_spacing() {
    let contour = Contour::closed(circle(5.0, 12)).unwrap();
    let samples = contour.resample(36);

    assert_eq!(samples.len(), 36);
    assert_eq!(samples[0], contour.points()[0]);

    // Every input vertex falls on a sample since 36 is a multiple of 12.
    for (i, p) in contour.points().iter().enumerate() {
        assert!(Tolerance::LOOSE.approx_eq_point2(samples[i * 3], *p));
    }

    let resampled = Contour::closed(samples).unwrap();
    assert!((resampled.perimeter() - contour.perimeter()).abs() < 1e-9);
}

#[test]
fn downsampling_walks_the_perimeter() {
    let contour = Contour::closed(vec![
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(2.0, 1.0),
        Point2::new(2.0, 2.0),
        Point2::new(1.0, 2.0),
        Point2::new(0.0, 2.0),
        Point2::new(0.0, 1.0),
    ])
    .unwrap();
    let samples = contour.resample(4);
    assert_eq!(
        samples,
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ]
    );
}

#[test]
fn coordinate_arrays_build_contours() {
    let contour = Contour::from_coordinates(&[0.0, 4.0, 4.0], &[0.0, 0.0, 3.0]).unwrap();
    assert_eq!(contour.kind(), ContourKind::Closed);
    assert_eq!(contour.len(), 3);
    assert_eq!(contour.perimeter(), 12.0);
    assert_eq!(contour.enclosed_area(), 6.0);
}

#[test]
fn clockwise_and_counter_clockwise_enclose_the_same_area() {
    let ccw = circle(3.0, 64);
    let mut cw = ccw.clone();
    cw.reverse();
    let a = Contour::closed(ccw).unwrap().enclosed_area();
    let b = Contour::closed(cw).unwrap().enclosed_area();
    assert!((a - b).abs() < 1e-9);
    assert!(a > 0.0);
}
