use crate::error::{EngineError, EngineResult};
use crate::geom::{BBox, Vec3};

/// A triangle mesh: vertex array, face array, and the undirected edge graph
/// derived from the faces. Immutable once constructed; every solver builds
/// whatever auxiliary structure it needs on top of this shared view.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
    /// `adjacency[i]` holds `(neighbour, euclidean weight)` pairs for vertex
    /// `i`. An edge shared by two triangles is inserted twice, on purpose:
    /// Dijkstra treats duplicate entries as parallel edges of identical
    /// weight, which is harmless for shortest-path purposes.
    adjacency: Vec<Vec<(usize, f64)>>,
}

impl Mesh {
    /// Build a mesh from a vertex array and a face array of vertex-index
    /// triples, deriving the edge graph.
    #[must_use]
    pub fn new(vertices: Vec<Vec3>, faces: Vec<[usize; 3]>) -> Self {
        let mut adjacency = vec![Vec::new(); vertices.len()];
        for &[a, b, c] in &faces {
            Self::insert_edge(&mut adjacency, &vertices, a, b);
            Self::insert_edge(&mut adjacency, &vertices, b, c);
            Self::insert_edge(&mut adjacency, &vertices, c, a);
        }
        Self {
            vertices,
            faces,
            adjacency,
        }
    }

    fn insert_edge(adjacency: &mut [Vec<(usize, f64)>], vertices: &[Vec3], a: usize, b: usize) {
        if a == b {
            return;
        }
        let weight = (vertices[b] - vertices[a]).length();
        adjacency[a].push((b, weight));
        adjacency[b].push((a, weight));
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Total number of undirected edge entries in the graph (counting
    /// shared edges once per incident triangle, per the duplicate-entry
    /// convention above).
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    #[must_use]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    #[must_use]
    pub fn vertex(&self, index: usize) -> Option<Vec3> {
        self.vertices.get(index).copied()
    }

    #[must_use]
    pub fn neighbors(&self, index: usize) -> &[(usize, f64)] {
        self.adjacency.get(index).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        BBox::from_points(&self.vertices)
    }

    /// Validate that `index` names an existing vertex. An empty mesh (no
    /// vertices at all) is reported as `EmptyMesh` rather than `InvalidIndex`,
    /// since it is a distinct failure mode: no index, not even 0, is ever
    /// valid against it.
    pub fn check_index(&self, index: usize) -> EngineResult<()> {
        if self.vertices.is_empty() {
            return Err(EngineError::EmptyMesh);
        }
        if index < self.vertices.len() {
            Ok(())
        } else {
            Err(EngineError::InvalidIndex {
                index,
                vertex_count: self.vertices.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tetrahedron() -> Mesh {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
        Mesh::new(vertices, faces)
    }

    #[test]
    fn counts_match_input() {
        let mesh = tetrahedron();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 4);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mesh = tetrahedron();
        for (i, neighbors) in (0..mesh.vertex_count()).zip(
            (0..mesh.vertex_count()).map(|i| mesh.neighbors(i).to_vec()),
        ) {
            for (j, _) in neighbors {
                assert!(mesh.neighbors(j).iter().any(|&(k, _)| k == i));
            }
        }
    }

    #[test]
    fn degenerate_self_edge_is_dropped() {
        let vertices = vec![Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0)];
        let faces = vec![[0, 0, 1]];
        let mesh = Mesh::new(vertices, faces);
        assert!(mesh.neighbors(0).iter().all(|&(n, _)| n != 0));
    }

    #[test]
    fn check_index_rejects_out_of_range() {
        let mesh = tetrahedron();
        assert!(mesh.check_index(3).is_ok());
        assert!(mesh.check_index(4).is_err());
    }

    #[test]
    fn check_index_on_empty_mesh_is_empty_mesh_not_invalid_index() {
        let mesh = Mesh::new(Vec::new(), Vec::new());
        assert!(matches!(mesh.check_index(0), Err(EngineError::EmptyMesh)));
    }
}
