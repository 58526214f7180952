use std::collections::HashMap;

use super::diagnostics::MeshDiagnostics;
use super::{Point3, Tolerance, Triangle3};

/// Indexed triangle mesh of a reconstructed surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SurfaceMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if any vertex position contains NaN or Inf values.
    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    #[must_use]
    pub fn has_triangle_indices(&self) -> bool {
        self.indices.len() % 3 == 0
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.has_triangle_indices() {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        Ok(())
    }

    /// Position buffer as `[x0, y0, z0, x1, ...]`, the layout JS adapters expect.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    /// Iterate facets. Out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle3> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let a = self.positions.get(tri[0] as usize)?;
            let b = self.positions.get(tri[1] as usize)?;
            let c = self.positions.get(tri[2] as usize)?;
            Some(Triangle3::new(
                Point3::from_array(*a),
                Point3::from_array(*b),
                Point3::from_array(*c),
            ))
        })
    }

    /// Sum of facet areas in the units of `positions`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }
}

/// Drop degenerate facets and collect edge topology.
pub(crate) fn finalize_mesh(
    points: Vec<Point3>,
    indices: Vec<u32>,
    tol: Tolerance,
) -> (SurfaceMesh, MeshDiagnostics) {
    let (indices, degenerate_triangle_count) = cull_degenerate_triangles(&points, &indices, tol);
    let (open_edge_count, non_manifold_edge_count) = count_edge_topology(&indices);

    let mesh = SurfaceMesh {
        positions: points.into_iter().map(Point3::to_array).collect(),
        indices,
    };

    let mut diagnostics = MeshDiagnostics::new();
    diagnostics.vertex_count = mesh.vertex_count();
    diagnostics.triangle_count = mesh.triangle_count();
    diagnostics.degenerate_triangle_count = degenerate_triangle_count;
    diagnostics.open_edge_count = open_edge_count;
    diagnostics.non_manifold_edge_count = non_manifold_edge_count;
    if open_edge_count > 0 {
        diagnostics.add_warning("mesh has open edges");
    }
    if non_manifold_edge_count > 0 {
        diagnostics.add_warning("mesh has non-manifold edges");
    }

    (mesh, diagnostics)
}

fn cull_degenerate_triangles(points: &[Point3], indices: &[u32], tol: Tolerance) -> (Vec<u32>, usize) {
    let mut out = Vec::with_capacity(indices.len());
    let mut removed = 0usize;

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
        let (Some(&a), Some(&b), Some(&c)) = (
            points.get(i0 as usize),
            points.get(i1 as usize),
            points.get(i2 as usize),
        ) else {
            removed += 1;
            continue;
        };

        if i0 == i1 || i1 == i2 || i0 == i2 || Triangle3::new(a, b, c).is_degenerate(tol) {
            removed += 1;
            continue;
        }

        out.extend_from_slice(&[i0, i1, i2]);
    }

    (out, removed)
}

fn count_edge_topology(indices: &[u32]) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), u32> = HashMap::new();

    for tri in indices.chunks_exact(3) {
        for (ea, eb) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = if ea <= eb { (ea, eb) } else { (eb, ea) };
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let mut open_edge_count = 0usize;
    let mut non_manifold_edge_count = 0usize;
    for count in edge_counts.into_values() {
        if count == 1 {
            open_edge_count += 1;
        } else if count > 2 {
            non_manifold_edge_count += 1;
        }
    }

    (open_edge_count, non_manifold_edge_count)
}
