use std::path::Path;

use crate::dijkstra::{self, DijkstraResult};
use crate::error::{EngineError, EngineResult};
use crate::geodesic::{plane_curve, saddle_curve, sphere_curve, torus_curve};
use crate::heat;
use crate::mesh::Mesh;
use crate::normalize::Normalization;
use crate::result::AnalyticsResult;

/// What a request asked the engine to do, parsed from the CLI's optional
/// mode argument. Any value other than `"heat"` or `"analytics"` is treated
/// as the default, matching the dispatcher's `mode = ""` case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    Dijkstra,
    Analytics,
    Heat,
}

impl RequestMode {
    #[must_use]
    pub fn parse(mode: &str) -> Self {
        match mode {
            "heat" => Self::Heat,
            "analytics" => Self::Analytics,
            _ => Self::Dijkstra,
        }
    }
}

/// Recognised parametric surface families, chosen by case-insensitive
/// substring match on the model's file basename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SurfaceKind {
    Plane,
    Sphere,
    Torus,
    Saddle,
    Mesh,
    Unsupported,
}

fn classify_surface(basename: &str, mesh: &Mesh) -> SurfaceKind {
    let lower = basename.to_lowercase();
    if lower.contains("plane") {
        SurfaceKind::Plane
    } else if lower.contains("sphere") {
        SurfaceKind::Sphere
    } else if lower.contains("torus") || lower.contains("donut") {
        SurfaceKind::Torus
    } else if lower.contains("saddle") {
        SurfaceKind::Saddle
    } else if mesh.face_count() > 0 {
        SurfaceKind::Mesh
    } else {
        SurfaceKind::Unsupported
    }
}

/// The outcome of dispatching a request, distinguishing a well-formed
/// result whose solver reported an internal error (maps to exit code 2)
/// from a clean success (exit code 0). Argument/load failures are never
/// represented here: they propagate as `Err` before dispatch is reached.
pub enum Outcome {
    Dijkstra(DijkstraResult),
    Analytics(AnalyticsResult),
}

impl Outcome {
    #[must_use]
    pub fn has_error(&self) -> bool {
        match self {
            Self::Dijkstra(_) => false,
            Self::Analytics(result) => result.has_error(),
        }
    }
}

/// Run the solver selected by `mode` (and, for `"analytics"`, by the model
/// basename) against `mesh`. `start`/`end` must already have been validated
/// against the mesh's vertex count by the caller.
pub fn dispatch(
    mesh: &Mesh,
    input_file_name: &str,
    start: usize,
    end: usize,
    mode: RequestMode,
    model_path: &Path,
) -> EngineResult<Outcome> {
    match mode {
        RequestMode::Dijkstra => {
            let result = dijkstra::shortest_path(mesh, start, end)?;
            Ok(Outcome::Dijkstra(result))
        }
        RequestMode::Heat => Ok(Outcome::Analytics(run_heat(
            mesh,
            input_file_name,
            start,
            end,
        ))),
        RequestMode::Analytics => {
            let basename = model_path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Outcome::Analytics(run_analytics(
                mesh,
                input_file_name,
                start,
                end,
                &basename,
            )))
        }
    }
}

fn run_heat(mesh: &Mesh, input_file_name: &str, start: usize, end: usize) -> AnalyticsResult {
    match heat::solve(mesh, start, end) {
        Ok(curve) => AnalyticsResult::success(input_file_name, start, end, "mesh", vec![curve]),
        Err(err) => {
            AnalyticsResult::failure(input_file_name, start, end, "mesh", err.to_string())
        }
    }
}

fn run_analytics(
    mesh: &Mesh,
    input_file_name: &str,
    start: usize,
    end: usize,
    basename: &str,
) -> AnalyticsResult {
    let kind = classify_surface(basename, mesh);
    let p1 = mesh.vertices()[start];
    let p2 = mesh.vertices()[end];

    match kind {
        SurfaceKind::Plane => AnalyticsResult::success(
            input_file_name,
            start,
            end,
            "plane",
            vec![plane_curve(p1, p2)],
        ),
        SurfaceKind::Sphere => AnalyticsResult::success(
            input_file_name,
            start,
            end,
            "sphere",
            vec![sphere_curve(p1, p2)],
        ),
        SurfaceKind::Torus => {
            let norm = Normalization::from_vertices(mesh.vertices());
            let normalized = norm.apply_all(mesh.vertices());
            let curve = torus_curve(p1, p2, &normalized, &norm);
            AnalyticsResult::success(input_file_name, start, end, "torus", vec![curve])
        }
        SurfaceKind::Saddle => {
            let norm = Normalization::from_vertices(mesh.vertices());
            let normalized = norm.apply_all(mesh.vertices());
            let curve = saddle_curve(p1, p2, &normalized, &norm);
            AnalyticsResult::success(input_file_name, start, end, "saddle", vec![curve])
        }
        SurfaceKind::Mesh => run_heat(mesh, input_file_name, start, end),
        SurfaceKind::Unsupported => {
            let err = EngineError::Unsupported {
                surface_type: basename.to_string(),
                mode: "analytics".to_string(),
            };
            AnalyticsResult::failure(input_file_name, start, end, "unsupported", err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Vec3;

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
    fn mode_parsing_falls_back_to_dijkstra() {
        assert_eq!(RequestMode::parse(""), RequestMode::Dijkstra);
        assert_eq!(RequestMode::parse("bogus"), RequestMode::Dijkstra);
        assert_eq!(RequestMode::parse("heat"), RequestMode::Heat);
        assert_eq!(RequestMode::parse("analytics"), RequestMode::Analytics);
    }

    #[test]
    fn analytics_mode_classifies_plane_by_basename() {
        let mesh = tetrahedron();
        let outcome = dispatch(
            &mesh,
            "my_plane.obj",
            0,
            1,
            RequestMode::Analytics,
            Path::new("models/my_plane.obj"),
        )
        .unwrap();
        match outcome {
            Outcome::Analytics(result) => assert_eq!(result.surface_type, "plane"),
            Outcome::Dijkstra(_) => panic!("expected analytics outcome"),
        }
    }

    #[test]
    fn analytics_mode_falls_back_to_heat_for_unrecognised_mesh_names() {
        let mesh = tetrahedron();
        let outcome = dispatch(
            &mesh,
            "tetrahedron.obj",
            0,
            2,
            RequestMode::Analytics,
            Path::new("models/tetrahedron.obj"),
        )
        .unwrap();
        match outcome {
            Outcome::Analytics(result) => assert_eq!(result.surface_type, "mesh"),
            Outcome::Dijkstra(_) => panic!("expected analytics outcome"),
        }
    }

    #[test]
    fn unsupported_when_no_faces_and_no_recognised_name() {
        let vertices = vec![Vec3::ZERO, Vec3::X];
        let mesh = Mesh::new(vertices, vec![]);
        let outcome = dispatch(
            &mesh,
            "unknown.obj",
            0,
            1,
            RequestMode::Analytics,
            Path::new("models/unknown.obj"),
        )
        .unwrap();
        match outcome {
            Outcome::Analytics(result) => {
                assert_eq!(result.surface_type, "unsupported");
                assert!(result.has_error());
            }
            Outcome::Dijkstra(_) => panic!("expected analytics outcome"),
        }
    }
}
