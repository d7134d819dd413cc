use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::config::UNREACHABLE_DISTANCE;
use crate::error::EngineResult;
use crate::mesh::Mesh;

/// Result of a single-pair shortest-path query over the mesh's edge graph.
#[derive(Debug, Clone, Serialize)]
pub struct DijkstraResult {
    pub reachable: bool,
    #[serde(rename = "totalDistance")]
    pub total_distance: Option<f64>,
    pub path: Vec<usize>,
    /// Indexed by vertex id. Unreachable vertices carry
    /// [`UNREACHABLE_DISTANCE`] rather than `null` (design note (b)).
    #[serde(rename = "allDistances")]
    pub all_distances: Vec<f64>,
}

/// Min-heap entry ordered by ascending tentative distance. `Ord` is
/// implemented by reversing the natural `f64` comparison (via
/// `partial_cmp`, which is total for the finite distances Dijkstra ever
/// produces) so that `BinaryHeap`, a max-heap, pops the smallest distance
/// first.
#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    distance: f64,
    vertex: usize,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .partial_cmp(&self.distance)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Classical Dijkstra with a binary-heap priority queue, over Euclidean
/// edge weights in the mesh's original (un-normalised) coordinate space.
/// Terminates early once `end` is popped from the queue.
pub fn shortest_path(mesh: &Mesh, start: usize, end: usize) -> EngineResult<DijkstraResult> {
    mesh.check_index(start)?;
    mesh.check_index(end)?;

    let n = mesh.vertex_count();
    let mut distances = vec![f64::INFINITY; n];
    let mut predecessors = vec![None; n];
    let mut visited = vec![false; n];
    let mut heap = BinaryHeap::new();

    distances[start] = 0.0;
    heap.push(HeapEntry {
        distance: 0.0,
        vertex: start,
    });

    while let Some(HeapEntry { distance, vertex }) = heap.pop() {
        if visited[vertex] {
            continue;
        }
        visited[vertex] = true;
        if vertex == end {
            break;
        }
        for &(neighbor, weight) in mesh.neighbors(vertex) {
            let candidate = distance + weight;
            if candidate < distances[neighbor] {
                distances[neighbor] = candidate;
                predecessors[neighbor] = Some(vertex);
                heap.push(HeapEntry {
                    distance: candidate,
                    vertex: neighbor,
                });
            }
        }
    }

    let reachable = start == end || predecessors[end].is_some();
    let path = if reachable {
        reconstruct_path(&predecessors, start, end)
    } else {
        Vec::new()
    };
    let total_distance = if reachable { Some(distances[end]) } else { None };
    let all_distances = distances
        .into_iter()
        .map(|d| if d.is_finite() { d } else { UNREACHABLE_DISTANCE })
        .collect();

    Ok(DijkstraResult {
        reachable,
        total_distance,
        path,
        all_distances,
    })
}

fn reconstruct_path(predecessors: &[Option<usize>], start: usize, end: usize) -> Vec<usize> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        match predecessors[current] {
            Some(prev) => {
                path.push(prev);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
