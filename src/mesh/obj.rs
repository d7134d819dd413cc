use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::geom::Vec3;
use crate::mesh::model::Mesh;

/// Load a mesh from a Wavefront OBJ file.
///
/// Recognises only `v` and `f` directives; everything else (including
/// blank lines and `#` comments) is ignored. Polygons with more than three
/// vertices are fan-triangulated. See the loader's design notes for the
/// exact index-resolution and skip rules.
pub fn load(path: &Path) -> EngineResult<Mesh> {
    let text = fs::read_to_string(path).map_err(|source| EngineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse(&text))
}

/// Parse OBJ source text directly (split out from [`load`] so tests don't
/// need a filesystem round trip).
#[must_use]
pub fn parse(text: &str) -> Mesh {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();
    let mut skipped_vertex_lines = 0usize;
    let mut skipped_faces = 0usize;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };
        match directive {
            "v" => {
                let coords: Vec<f64> = tokens
                    .by_ref()
                    .take(3)
                    .filter_map(|t| t.parse::<f64>().ok())
                    .collect();
                if coords.len() < 3 {
                    skipped_vertex_lines += 1;
                    continue;
                }
                vertices.push(Vec3::new(coords[0], coords[1], coords[2]));
            }
            "f" => {
                let rest: Vec<&str> = tokens.collect();
                if rest.len() < 3 {
                    skipped_faces += 1;
                    continue;
                }
                match resolve_face_indices(&rest, vertices.len()) {
                    Some(indices) => {
                        for i in 1..indices.len() - 1 {
                            faces.push([indices[0], indices[i], indices[i + 1]]);
                        }
                    }
                    None => skipped_faces += 1,
                }
            }
            _ => {}
        }
    }

    if skipped_vertex_lines > 0 || skipped_faces > 0 {
        log::warn!(
            "obj parse: skipped {skipped_vertex_lines} malformed vertex line(s) and \
             {skipped_faces} invalid face(s)"
        );
    }

    Mesh::new(vertices, faces)
}

/// Resolve a face's vertex-index tokens against the vertex count seen *so
/// far*. A face referencing a vertex that has not yet been parsed is
/// treated as invalid and dropped (see design note (a)).
fn resolve_face_indices(tokens: &[&str], vertex_count: usize) -> Option<Vec<usize>> {
    let mut indices = Vec::with_capacity(tokens.len());
    for token in tokens {
        let head = token.split('/').next().unwrap_or("");
        let raw: i64 = head.parse().ok()?;
        if raw == 0 {
            return None;
        }
        let resolved = if raw > 0 {
            (raw - 1) as i64
        } else {
            vertex_count as i64 + raw
        };
        if resolved < 0 || resolved as usize >= vertex_count {
            return None;
        }
        indices.push(resolved as usize);
    }
    Some(indices)
}

/// Re-emit a mesh as OBJ text, using 1-based positive indices in vertex
/// order. Used only by the parsing round-trip test: for a mesh built from
/// triangle faces with no negative indices, reloading this text reproduces
/// an identical vertex and face array.
#[must_use]
pub fn write(mesh: &Mesh) -> String {
    let mut out = String::new();
    for v in mesh.vertices() {
        out.push_str(&format!("v {} {} {}\n", v.x, v.y, v.z));
    }
    for face in mesh.faces() {
        out.push_str(&format!(
            "f {} {} {}\n",
            face[0] + 1,
            face[1] + 1,
            face[2] + 1
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_vertices_and_triangulates_fan() {
        let text = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
f 1 2 3 4
";
        let mesh = parse(text);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces(), &[[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn ignores_comments_and_blank_lines() {
        let text = "# comment\n\nv 1 2 3\n";
        let mesh = parse(text);
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn skips_malformed_vertex_line() {
        let text = "v 1 2\nv 1 2 3\n";
        let mesh = parse(text);
        assert_eq!(mesh.vertex_count(), 1);
    }

    #[test]
    fn negative_indices_resolve_relative_to_current_count() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f -3 -2 -1
";
        let mesh = parse(text);
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn forward_reference_drops_face() {
        let text = "\
v 0 0 0
v 1 0 0
f 1 2 3
v 0 1 0
";
        let mesh = parse(text);
        assert_eq!(mesh.vertex_count(), 3);
        assert!(mesh.faces().is_empty());
    }

    #[test]
    fn slash_suffixed_tokens_use_only_the_leading_index() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
f 1/1/1 2//2 3/3
";
        let mesh = parse(text);
        assert_eq!(mesh.faces(), &[[0, 1, 2]]);
    }

    #[test]
    fn round_trip_preserves_triangle_mesh() {
        let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 2 3
f 1 2 4
";
        let original = parse(text);
        let re_emitted = write(&original);
        let reloaded = parse(&re_emitted);
        assert_eq!(original.vertices(), reloaded.vertices());
        assert_eq!(original.faces(), reloaded.faces());
    }
}
