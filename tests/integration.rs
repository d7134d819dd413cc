use std::path::Path;

use geodesic_engine::dispatch::{self, Outcome, RequestMode};
use geodesic_engine::mesh::obj;

const TETRAHEDRON_OBJ: &str = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 0 0 1
f 1 2 3
f 1 2 4
f 1 3 4
f 2 3 4
";

fn plane_obj() -> String {
    let mut text = String::new();
    for i in 0..4 {
        for j in 0..4 {
            text.push_str(&format!("v {} {} 0\n", i as f64, j as f64));
        }
    }
    for i in 0..3 {
        for j in 0..3 {
            let a = i * 4 + j + 1;
            let b = a + 1;
            let c = a + 4;
            let d = c + 1;
            text.push_str(&format!("f {a} {b} {d}\n"));
            text.push_str(&format!("f {a} {d} {c}\n"));
        }
    }
    text
}

fn sphere_obj() -> String {
    // A coarse UV sphere of unit radius, dense enough to let the analytic
    // solver be classified as "sphere" and for the torus/saddle tests below
    // to exercise a genuinely curved surface.
    let mut text = String::new();
    let rings = 8;
    let segments = 8;
    for i in 0..=rings {
        let phi = std::f64::consts::PI * i as f64 / rings as f64;
        for j in 0..segments {
            let theta = 2.0 * std::f64::consts::PI * j as f64 / segments as f64;
            let x = phi.sin() * theta.cos();
            let y = phi.sin() * theta.sin();
            let z = phi.cos();
            text.push_str(&format!("v {x} {y} {z}\n"));
        }
    }
    for i in 0..rings {
        for j in 0..segments {
            let jn = (j + 1) % segments;
            let a = i * segments + j + 1;
            let b = i * segments + jn + 1;
            let c = (i + 1) * segments + j + 1;
            let d = (i + 1) * segments + jn + 1;
            text.push_str(&format!("f {a} {b} {d}\n"));
            text.push_str(&format!("f {a} {d} {c}\n"));
        }
    }
    text
}

#[test]
fn dijkstra_on_unit_tetrahedron_finds_the_diagonal() {
    let mesh = obj::parse(TETRAHEDRON_OBJ);
    let outcome = dispatch::dispatch(
        &mesh,
        "tetrahedron.obj",
        0,
        3,
        RequestMode::Dijkstra,
        Path::new("tetrahedron.obj"),
    )
    .unwrap();

    match outcome {
        Outcome::Dijkstra(result) => {
            assert!(result.reachable);
            assert!((result.total_distance.unwrap() - 2.0_f64.sqrt()).abs() < 1e-9);
        }
        Outcome::Analytics(_) => panic!("expected a Dijkstra outcome"),
    }
}

#[test]
fn dijkstra_reports_unreachable_on_a_disconnected_mesh() {
    let text = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 10 10 10
v 11 10 10
v 10 11 10
f 1 2 3
f 4 5 6
";
    let mesh = obj::parse(text);
    let outcome = dispatch::dispatch(
        &mesh,
        "disconnected.obj",
        0,
        3,
        RequestMode::Dijkstra,
        Path::new("disconnected.obj"),
    )
    .unwrap();

    match outcome {
        Outcome::Dijkstra(result) => {
            assert!(!result.reachable);
            assert!(result.path.is_empty());
        }
        Outcome::Analytics(_) => panic!("expected a Dijkstra outcome"),
    }
}

#[test]
fn analytics_mode_on_a_plane_basename_returns_a_straight_line() {
    let text = plane_obj();
    let mesh = obj::parse(&text);
    let outcome = dispatch::dispatch(
        &mesh,
        "sample_plane.obj",
        0,
        15,
        RequestMode::Analytics,
        Path::new("models/sample_plane.obj"),
    )
    .unwrap();

    match outcome {
        Outcome::Analytics(result) => {
            assert_eq!(result.surface_type, "plane");
            assert!(!result.has_error());
            let curve = &result.curves[0];
            assert_eq!(curve.points[0], mesh.vertices()[0]);
            assert_eq!(*curve.points.last().unwrap(), mesh.vertices()[15]);
        }
        Outcome::Dijkstra(_) => panic!("expected an analytics outcome"),
    }
}

#[test]
fn analytics_mode_on_a_sphere_basename_returns_a_great_circle() {
    let text = sphere_obj();
    let mesh = obj::parse(&text);

    // Rings 2 and 5 (of 8) at the same longitude: distinct, non-antipodal
    // points so the great-circle arc between them has positive length.
    let start = 2 * 8;
    let end = 5 * 8;

    let outcome = dispatch::dispatch(
        &mesh,
        "sample_sphere.obj",
        start,
        end,
        RequestMode::Analytics,
        Path::new("models/sample_sphere.obj"),
    )
    .unwrap();

    match outcome {
        Outcome::Analytics(result) => {
            assert_eq!(result.surface_type, "sphere");
            assert!(!result.has_error());
            assert_eq!(result.curves.len(), 1);
            assert!(result.curves[0].length > 0.0);
        }
        Outcome::Dijkstra(_) => panic!("expected an analytics outcome"),
    }
}

#[test]
fn heat_mode_on_unit_tetrahedron_stays_close_to_the_shortest_path() {
    let mesh = obj::parse(TETRAHEDRON_OBJ);

    let dijkstra_outcome = dispatch::dispatch(
        &mesh,
        "tetrahedron.obj",
        0,
        2,
        RequestMode::Dijkstra,
        Path::new("tetrahedron.obj"),
    )
    .unwrap();
    let dijkstra_length = match dijkstra_outcome {
        Outcome::Dijkstra(result) => result.total_distance.unwrap(),
        Outcome::Analytics(_) => unreachable!(),
    };

    let heat_outcome = dispatch::dispatch(
        &mesh,
        "tetrahedron.obj",
        0,
        2,
        RequestMode::Heat,
        Path::new("tetrahedron.obj"),
    )
    .unwrap();

    match heat_outcome {
        Outcome::Analytics(result) => {
            assert!(!result.has_error());
            assert!(result.curves[0].length <= dijkstra_length * 1.10);
        }
        Outcome::Dijkstra(_) => panic!("expected an analytics outcome"),
    }
}

#[test]
fn unsupported_surface_reports_an_error_without_panicking() {
    let mesh = obj::parse("v 0 0 0\nv 1 0 0\n");
    let outcome = dispatch::dispatch(
        &mesh,
        "points_only.obj",
        0,
        1,
        RequestMode::Analytics,
        Path::new("models/points_only.obj"),
    )
    .unwrap();

    match outcome {
        Outcome::Analytics(result) => {
            assert!(result.has_error());
            assert_eq!(result.surface_type, "unsupported");
        }
        Outcome::Dijkstra(_) => panic!("expected an analytics outcome"),
    }
}
