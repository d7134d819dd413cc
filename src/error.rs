use std::path::PathBuf;

/// Every failure mode the engine can produce.
///
/// `SolverDiverged` and `ShootingFailed` are never propagated to a caller as
/// a terminal error: they are logged and the solver that raised them falls
/// back to its documented degraded behaviour, so a result is always
/// produced. They remain variants here because the fallback paths construct
/// and log them before recovering.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("vertex index {index} out of range for mesh with {vertex_count} vertices")]
    InvalidIndex { index: usize, vertex_count: usize },

    #[error("mesh has no vertices")]
    EmptyMesh,

    #[error("mesh has no faces")]
    DegenerateTopology,

    #[error("conjugate gradient did not converge within {max_iterations} iterations")]
    SolverDiverged { max_iterations: usize },

    #[error("shooting method failed to converge after {iterations} iterations")]
    ShootingFailed { iterations: usize },

    #[error("no solver could be selected for surface {surface_type:?} with mode {mode:?}")]
    Unsupported {
        surface_type: String,
        mode: String,
    },

    #[error("heat source vertex {index} has zero lumped mass")]
    DegenerateSource { index: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
