use polysurface_engine::Engine;
use polysurface_engine::geom::{Calibration, Contour, ContourKind, Point2, Triangle3};
use polysurface_engine::measure::{MeasureOptions, measure_all, measure_surface};
use polysurface_engine::surface::{
    AreaOptions, PolylineSurface, surface_area, surface_area_with_options, surface_volume,
    triangulate_surface,
};

fn closed(points: &[(f64, f64)]) -> Contour {
    Contour::closed(points.iter().map(|&p| Point2::from(p)).collect()).expect("closed contour")
}

fn square(offset: f64, size: f64) -> Contour {
    closed(&[
        (offset, offset),
        (offset + size, offset),
        (offset + size, offset + size),
        (offset, offset + size),
    ])
}

#[test]
fn engine_initializes() {
    let engine = Engine::new("Nucleus");
    assert_eq!(engine.title(), "Nucleus");
    assert_eq!(engine.contour_count(), 0);
    assert!(!engine.is_locked());
    assert_eq!(engine.surface_area().ok(), Some(0.0));
}

#[test]
fn engine_box_area_and_volume() {
    let mut engine = Engine::new("box");
    let xs = [0.0, 10.0, 10.0, 0.0];
    let ys = [0.0, 0.0, 10.0, 10.0];
    engine.add_contour(15, &xs, &ys).expect("upper slice");
    engine.add_contour(5, &xs, &ys).expect("lower slice");

    assert_eq!(engine.start_slice().ok(), Some(5));
    assert_eq!(engine.end_slice().ok(), Some(15));
    let area = engine.surface_area().expect("area");
    assert!((area - 400.0).abs() < 1e-9, "area was {area}");

    let row = engine.measurement().expect("measurement");
    assert_eq!(row.contour_count, 2);
    assert_eq!(row.unit, "pixel");
    assert!((row.volume.expect("volume") - 1100.0).abs() < 1e-9);
}

#[test]
fn triangle_with_anisotropic_calibration() {
    let triangle = Triangle3::new(
        [0.0, 0.0, 0.0].into(),
        [0.0, 0.0, 1.0].into(),
        [0.0, 1.0, 0.0].into(),
    );
    assert_eq!(triangle.area(), 0.5);

    let cal = Calibration::new(1.0, 1.0, 0.15, "mm").expect("calibration");
    assert!((triangle.calibrated_area(&cal) - 0.075).abs() < 1e-12);
}

#[test]
fn segment_and_apex_form_a_single_triangle() {
    let mut surface = PolylineSurface::new("wedge");
    surface.add_contour(
        5,
        Contour::from_points(vec![Point2::new(1.0, 2.0), Point2::new(6.0, 3.0)]).expect("segment"),
    );
    surface.add_contour(3, Contour::apex(Point2::new(8.0, 6.0)).expect("apex"));

    let triangles = triangulate_surface(&surface).expect("triangulate");
    assert_eq!(triangles.len(), 1);

    let area = surface_area(&surface, &Calibration::default()).expect("area");
    assert!((area - 8.26135540008545).abs() < 1e-9);
}

#[test]
fn adjacent_segments_form_a_unit_ribbon() {
    let mut surface = PolylineSurface::new("ribbon");
    let segment =
        Contour::from_points(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]).expect("segment");
    assert_eq!(segment.kind(), ContourKind::Open);
    surface.add_contour(1, segment.clone());
    surface.add_contour(2, segment);

    let area = surface_area(&surface, &Calibration::default()).expect("area");
    assert!((area - 1.0).abs() < 1e-12);
}

#[test]
fn reversed_slice_order_gives_the_same_area() {
    let lower = square(0.0, 8.0);
    let upper = square(2.0, 4.0);

    let mut forward = PolylineSurface::new("forward");
    forward.add_contour(2, lower.clone());
    forward.add_contour(6, upper.clone());

    let mut reversed = PolylineSurface::new("reversed");
    reversed.add_contour(2, upper);
    reversed.add_contour(6, lower);

    let cal = Calibration::new(0.3, 0.3, 1.2, "um").expect("calibration");
    let a = surface_area(&forward, &cal).expect("forward area");
    let b = surface_area(&reversed, &cal).expect("reversed area");
    assert!((a - b).abs() < 1e-4, "{a} vs {b}");
}

#[test]
fn twisted_contours_give_the_same_area_in_either_order() {
    let square = closed(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
    let diamond = closed(&[(5.0, -2.0), (12.0, 5.0), (5.0, 12.0), (-2.0, 5.0)]);

    let mut engine = Engine::new("twist");
    engine
        .add_contour(1, &[0.0, 10.0, 10.0, 0.0], &[0.0, 0.0, 10.0, 10.0])
        .expect("square");
    engine
        .add_contour(2, &[5.0, 12.0, 5.0, -2.0], &[-2.0, 5.0, 12.0, 5.0])
        .expect("diamond");
    let forward = engine.surface_area().expect("forward area");

    let mut mirrored = PolylineSurface::new("twist");
    mirrored.add_contour(1, diamond);
    mirrored.add_contour(2, square);
    let backward = surface_area(&mirrored, &Calibration::default()).expect("mirrored area");

    assert!((forward - backward).abs() < 1e-9, "{forward} vs {backward}");
}

#[test]
fn contours_with_different_densities_are_matched() {
    // A 4-gon and the same outline traced with 16 vertices bound a prism.
    let sparse = square(0.0, 4.0);
    let dense = Contour::closed(sparse.resample(16)).expect("dense contour");

    let mut surface = PolylineSurface::new("prism");
    surface.add_contour(0, sparse);
    surface.add_contour(3, dense);

    let (area, diagnostics) =
        surface_area_with_options(&surface, &Calibration::default(), AreaOptions::default())
            .expect("area");
    assert!((area - 16.0 * 3.0).abs() < 1e-9);
    assert_eq!(diagnostics.triangle_count, 32);

    let middle = surface.interpolated_contour(1).expect("interpolated");
    assert_eq!(middle.len(), 16);
    assert!((middle.enclosed_area() - 16.0).abs() < 1e-9);
}

#[test]
fn pyramid_volume_is_a_slab_sum() {
    let mut surface = PolylineSurface::new("pyramid");
    surface.add_contour(0, square(0.0, 6.0));
    surface.add_contour(6, Contour::apex(Point2::new(3.0, 3.0)).expect("apex"));

    let volume = surface_volume(&surface, &Calibration::default()).expect("volume");
    // Slab sum of 36 * ((6 - s) / 6)^2 for s in 0..=6.
    let expected: f64 = (0..=6).map(|s| 36.0 * ((6.0 - f64::from(s)) / 6.0).powi(2)).sum();
    assert!((volume - expected).abs() < 1e-9);
}

#[test]
fn measurement_table_over_several_surfaces() {
    let mut first = PolylineSurface::new("first");
    first.add_contour(0, square(0.0, 2.0));
    first.add_contour(1, square(0.0, 2.0));
    let second = PolylineSurface::new("second");

    let cal = Calibration::default();
    let table = measure_all([&first, &second], &cal, &MeasureOptions::default()).expect("table");
    assert_eq!(table.len(), 2);
    assert!((table.total_area() - 8.0).abs() < 1e-12);
    assert!((table.total_volume() - 8.0).abs() < 1e-12);
    assert_eq!(table.rows()[1].start_slice, None);

    let single = measure_surface(&first, &cal, &MeasureOptions::area_only()).expect("row");
    assert_eq!(single.area, table.rows()[0].area);
    assert!(single.volume.is_none());
    assert_eq!(table.to_csv().lines().count(), 3);
}
