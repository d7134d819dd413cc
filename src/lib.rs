//! Geodesic computation engine: given a triangle mesh and two vertex
//! identifiers, approximates the shortest path between them via one of
//! three families: edge-graph Dijkstra, analytic/ODE geodesics on
//! recognised parametric surfaces, or the Heat Method.

pub mod config;
pub mod dijkstra;
pub mod dispatch;
pub mod error;
pub mod geodesic;
pub mod geom;
pub mod heat;
pub mod mesh;
pub mod normalize;
pub mod result;

use std::path::Path;

use error::EngineResult;
use result::DijkstraFileResult;

/// Exit status the caller should use, distinguishing a clean result from
/// one whose solver reported an internal error via `AnalyticsResult::error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    SolverError,
}

/// Load `model_path`, validate `start`/`end`, dispatch to the solver named
/// by `mode`, and write the JSON result file. Index and I/O failures come
/// back as `Err` (the caller should exit 1); a well-formed result whose
/// solver reported an internal error comes back as `RunStatus::SolverError`
/// (the caller should exit 2).
pub fn run(start: usize, end: usize, model_path: &Path, mode: &str) -> EngineResult<RunStatus> {
    let mesh = mesh::obj::load(model_path)?;
    mesh.check_index(start)?;
    mesh.check_index(end)?;

    let input_file_name = model_path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let request_mode = dispatch::RequestMode::parse(mode);

    log::debug!(
        "dispatching {request_mode:?} on {input_file_name} ({} vertices, {} faces)",
        mesh.vertex_count(),
        mesh.face_count(),
    );

    let outcome = dispatch::dispatch(&mesh, &input_file_name, start, end, request_mode, model_path)?;
    let has_error = outcome.has_error();

    match outcome {
        dispatch::Outcome::Dijkstra(result) => {
            let file_result = DijkstraFileResult {
                input_file_name,
                result,
            };
            result::write_result("result.json", &file_result)?;
        }
        dispatch::Outcome::Analytics(result) => {
            let name = match request_mode {
                dispatch::RequestMode::Heat => "heat_result.json",
                _ => "analytics.json",
            };
            result::write_result(name, &result)?;
        }
    }

    Ok(if has_error {
        RunStatus::SolverError
    } else {
        RunStatus::Success
    })
}
