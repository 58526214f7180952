use super::{Calibration, Point3, Tolerance, Vec3};

/// One facet of a reconstructed surface, in voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle3 {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle3 {
    #[must_use]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    #[must_use]
    pub const fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Twice-area vector `(b - a) x (c - a)`.
    #[must_use]
    pub fn area_vector(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a)
    }

    /// Uncalibrated area.
    #[must_use]
    pub fn area(&self) -> f64 {
        0.5 * self.area_vector().length()
    }

    /// Area after scaling every vertex into physical space.
    #[must_use]
    pub fn calibrated_area(&self, calibration: &Calibration) -> f64 {
        self.calibrated(calibration).area()
    }

    #[must_use]
    pub fn calibrated(&self, calibration: &Calibration) -> Self {
        Self::new(
            calibration.apply(self.a),
            calibration.apply(self.b),
            calibration.apply(self.c),
        )
    }

    /// Unit normal following the a-b-c winding, `None` for degenerate facets.
    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        self.area_vector().normalized()
    }

    #[must_use]
    pub fn is_degenerate(&self, tol: Tolerance) -> bool {
        let area2 = self.area_vector().length_squared();
        !area2.is_finite() || area2 <= tol.eps_squared() * tol.eps_squared()
    }
}
