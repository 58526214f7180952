use crate::geom::{Calibration, Point3, SurfaceMesh, Triangle3, finalize_mesh, Tolerance};

#[test]
fn calibrated_triangles_sum_like_the_mesh() {
    let cal = Calibration::new(0.5, 0.5, 2.0, "um").unwrap();
    let raw = [
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(4.0, 0.0, 1.0),
        Point3::new(4.0, 0.0, 2.0),
        Point3::new(0.0, 0.0, 2.0),
    ];
    let expected: f64 = [
        Triangle3::new(raw[0], raw[1], raw[3]),
        Triangle3::new(raw[1], raw[2], raw[3]),
    ]
    .iter()
    .map(|t| t.calibrated_area(&cal))
    .sum();

    let points = raw.iter().map(|p| cal.apply(*p)).collect();
    let (mesh, diag) = finalize_mesh(points, vec![0, 1, 3, 1, 2, 3], Tolerance::default_geom());

    mesh.validate().expect("mesh validate");
    assert_eq!(diag.triangle_count, 2);
    assert!((mesh.area() - expected).abs() < 1e-12);
    assert!((expected - 4.0).abs() < 1e-12);
    assert!(mesh.triangles().all(|t| t.normal().is_some()));
}

#[test]
fn empty_mesh_is_valid() {
    let mesh = SurfaceMesh::default();
    mesh.validate().expect("empty mesh validates");
    assert_eq!(mesh.area(), 0.0);
    assert_eq!(mesh.triangles().count(), 0);
}
