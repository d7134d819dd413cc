use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::dijkstra::DijkstraResult;
use crate::error::{EngineError, EngineResult};
use crate::geom::Vec3;

/// A single approximated geodesic: its name, total length, and the ordered
/// sample points along it.
#[derive(Debug, Clone, Serialize)]
pub struct Curve {
    pub name: String,
    pub length: f64,
    pub points: Vec<Vec3>,
}

impl Curve {
    #[must_use]
    pub fn new(name: impl Into<String>, points: Vec<Vec3>) -> Self {
        let length = chord_length(&points);
        Self {
            name: name.into(),
            length,
            points,
        }
    }

    /// Build a curve with an already-known length (used when the length is
    /// computed in a different coordinate space than `points`, e.g. after
    /// undoing normalisation).
    #[must_use]
    pub fn with_length(name: impl Into<String>, points: Vec<Vec3>, length: f64) -> Self {
        Self {
            name: name.into(),
            length,
            points,
        }
    }
}

/// Sum of chord lengths between consecutive points.
#[must_use]
pub fn chord_length(points: &[Vec3]) -> f64 {
    points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
}

/// Result of an analytics or heat-method run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResult {
    #[serde(rename = "inputFileName")]
    pub input_file_name: String,
    #[serde(rename = "startId")]
    pub start_id: usize,
    #[serde(rename = "endId")]
    pub end_id: usize,
    #[serde(rename = "surfaceType")]
    pub surface_type: String,
    pub error: String,
    pub curves: Vec<Curve>,
}

impl AnalyticsResult {
    #[must_use]
    pub fn success(
        input_file_name: impl Into<String>,
        start_id: usize,
        end_id: usize,
        surface_type: impl Into<String>,
        curves: Vec<Curve>,
    ) -> Self {
        Self {
            input_file_name: input_file_name.into(),
            start_id,
            end_id,
            surface_type: surface_type.into(),
            error: String::new(),
            curves,
        }
    }

    #[must_use]
    pub fn failure(
        input_file_name: impl Into<String>,
        start_id: usize,
        end_id: usize,
        surface_type: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            input_file_name: input_file_name.into(),
            start_id,
            end_id,
            surface_type: surface_type.into(),
            error: error.into(),
            curves: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DijkstraFileResult {
    #[serde(rename = "inputFileName")]
    pub input_file_name: String,
    #[serde(flatten)]
    pub result: DijkstraResult,
}

/// Write a serialisable result as compact JSON to `./frontend/public/<name>`,
/// creating the directory if it does not already exist.
pub fn write_result<T: Serialize>(name: &str, value: &T) -> EngineResult<()> {
    let dir = Path::new("./frontend/public");
    fs::create_dir_all(dir).map_err(|source| EngineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(name);
    let json = serde_json::to_string(value).expect("result types always serialise");
    fs::write(&path, json).map_err(|source| EngineError::Io { path, source })
}
