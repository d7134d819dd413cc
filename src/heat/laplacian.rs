use std::collections::HashMap;

use crate::config::AREA_DEGENERACY;
use crate::geom::Vec3;
use crate::mesh::Mesh;

/// Per-triangle geometry shared by assembly, the gradient field, and
/// divergence: the two cotangents are indexed the same way as the
/// triangle's vertex triple.
pub struct TriangleGeometry {
    pub area: f64,
    pub normal: Vec3,
    pub cot: [f64; 3],
}

/// Compute `(area, unit normal, cotangents)` for triangle `(pi, pj, pk)`.
/// Returns `None` for a degenerate or non-finite triangle (area at or
/// below [`AREA_DEGENERACY`]).
#[must_use]
pub fn triangle_geometry(pi: Vec3, pj: Vec3, pk: Vec3) -> Option<TriangleGeometry> {
    let e_ij = pj - pi;
    let e_ik = pk - pi;
    let cross = e_ij.cross(e_ik);
    let two_area = cross.length();
    let area = 0.5 * two_area;
    if !area.is_finite() || area <= AREA_DEGENERACY {
        return None;
    }

    let cot_i = e_ij.dot(e_ik) / two_area;
    let cot_j = (pi - pj).dot(pk - pj) / two_area;
    let cot_k = (pi - pk).dot(pj - pk) / two_area;

    Some(TriangleGeometry {
        area,
        normal: cross.mul_scalar(1.0 / two_area),
        cot: [cot_i, cot_j, cot_k],
    })
}

/// Mass-lumped, matrix-free cotangent Laplacian over a mesh: a per-vertex
/// lumped mass and a per-vertex map of neighbour weights, assembled by
/// summing half-cotangent contributions from every incident triangle.
pub struct CotangentLaplacian {
    pub mass: Vec<f64>,
    pub weights: Vec<HashMap<usize, f64>>,
}

impl CotangentLaplacian {
    #[must_use]
    pub fn assemble(mesh: &Mesh) -> Self {
        let n = mesh.vertex_count();
        let mut mass = vec![0.0; n];
        let mut weights: Vec<HashMap<usize, f64>> = vec![HashMap::new(); n];

        for &[i, j, k] in mesh.faces() {
            let (pi, pj, pk) = (mesh.vertices()[i], mesh.vertices()[j], mesh.vertices()[k]);
            let Some(geom) = triangle_geometry(pi, pj, pk) else {
                continue;
            };
            let contribution = geom.area / 3.0;
            mass[i] += contribution;
            mass[j] += contribution;
            mass[k] += contribution;

            let [cot_i, cot_j, cot_k] = geom.cot;
            *weights[i].entry(j).or_insert(0.0) += 0.5 * cot_k;
            *weights[j].entry(i).or_insert(0.0) += 0.5 * cot_k;
            *weights[j].entry(k).or_insert(0.0) += 0.5 * cot_i;
            *weights[k].entry(j).or_insert(0.0) += 0.5 * cot_i;
            *weights[k].entry(i).or_insert(0.0) += 0.5 * cot_j;
            *weights[i].entry(k).or_insert(0.0) += 0.5 * cot_j;
        }

        Self { mass, weights }
    }

    /// Apply the Laplacian: `(Lx)ᵢ = Σⱼ wᵢⱼ(xᵢ - xⱼ)`.
    #[must_use]
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .enumerate()
            .map(|(i, neighbors)| {
                neighbors
                    .iter()
                    .map(|(&j, &w)| w * (x[i] - x[j]))
                    .sum()
            })
            .collect()
    }

    /// Mean undirected edge length over all triangles (each triangle
    /// contributing its three edges), used to size the heat time step.
    #[must_use]
    pub fn mean_edge_length(mesh: &Mesh) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        for &[i, j, k] in mesh.faces() {
            let (pi, pj, pk) = (mesh.vertices()[i], mesh.vertices()[j], mesh.vertices()[k]);
            sum += (pj - pi).length() + (pk - pj).length() + (pi - pk).length();
            count += 3;
        }
        if count == 0 {
            0.0
        } else {
            sum / count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle_mesh() -> Mesh {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new(vertices, vec![[0, 1, 2]])
    }

    #[test]
    fn lumped_mass_sums_to_triangle_area() {
        let mesh = unit_triangle_mesh();
        let laplacian = CotangentLaplacian::assemble(&mesh);
        let total: f64 = laplacian.mass.iter().sum();
        assert!((total - 0.5).abs() < 1e-12);
    }

    #[test]
    fn laplacian_of_constant_field_is_zero() {
        let mesh = unit_triangle_mesh();
        let laplacian = CotangentLaplacian::assemble(&mesh);
        let x = vec![3.0; mesh.vertex_count()];
        let lx = laplacian.apply(&x);
        for v in lx {
            assert!(v.abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_triangle_is_skipped() {
        let vertices = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0)];
        let mesh = Mesh::new(vertices, vec![[0, 1, 2]]);
        let laplacian = CotangentLaplacian::assemble(&mesh);
        assert!(laplacian.mass.iter().all(|&m| m == 0.0));
    }
}
