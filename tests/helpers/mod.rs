// Copyright 2025 Lars Brubaker
// Shared test utilities for planar-dcel tests.

#![allow(dead_code)]

use planar_dcel::{Graph, Located, PlanarGraph, Point, Polyline};

/// Parse polylines: one point per line as `x y` or `x, y`. Blank lines
/// separate polylines; a line reading `closed` closes the current one.
pub fn parse_polylines(data: &str) -> Vec<Polyline> {
    let mut polylines = Vec::new();
    let mut current = Polyline::default();

    for line in data.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                polylines.push(std::mem::take(&mut current));
            }
            continue;
        }
        if trimmed == "closed" {
            current.closed = true;
            continue;
        }
        let coords: Vec<f64> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<f64>().ok())
            .collect();
        if coords.len() >= 2 {
            current.add_point(Point::new(coords[0], coords[1]));
        }
    }
    if !current.is_empty() {
        polylines.push(current);
    }
    polylines
}

/// Closed axis-aligned rectangle, counter-clockwise.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polyline {
    Polyline::from_coords(true, &[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

pub fn square(x: f64, y: f64, size: f64) -> Polyline {
    rect(x, y, x + size, y + size)
}

pub fn open(coords: &[(f64, f64)]) -> Polyline {
    Polyline::from_coords(false, coords)
}

/// Connected components, counting lonely vertices.
pub fn component_count<V, E, F>(graph: &Graph<V, E, F>) -> usize {
    let keys: Vec<_> = graph.vertices().collect();
    let index_of = |v| keys.iter().position(|&k| k == v).expect("live vertex");
    let mut parent: Vec<usize> = (0..keys.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for e in graph.edges() {
        let (a, b) = graph.edge_vertices(e);
        let ra = find(&mut parent, index_of(a));
        let rb = find(&mut parent, index_of(b));
        if ra != rb {
            parent[ra] = rb;
        }
    }
    (0..keys.len()).filter(|&i| find(&mut parent, i) == i).count()
}

/// Run the validator and the counting checks every planar graph satisfies.
pub fn verify_graph<V: Located, E, F>(graph: &Graph<V, E, F>, label: &str) {
    if let Err(violation) = graph.validate() {
        panic!("{}: invalid graph: {}", label, violation);
    }
    assert_eq!(
        graph.halfedge_count(),
        2 * graph.edge_count(),
        "{}: halfedges must pair up",
        label
    );
    let expected_faces =
        graph.edge_count() + component_count(graph) + 1 - graph.vertex_count();
    assert_eq!(
        graph.face_count(),
        expected_faces,
        "{}: Euler's formula (V={}, E={}, C={})",
        label,
        graph.vertex_count(),
        graph.edge_count(),
        component_count(graph)
    );
    for f in graph.faces() {
        for rep in graph.face_cycles(f) {
            let len = graph.cycle(rep).len();
            assert!(
                len <= graph.halfedge_count(),
                "{}: cycle of {} halfedges exceeds the halfedge count",
                label,
                len
            );
        }
    }
}

/// Number of faces that are not exterior.
pub fn bounded_face_count(graph: &PlanarGraph) -> usize {
    graph.faces().filter(|&f| !graph.is_face_exterior(f)).count()
}

/// Sum of outer-boundary areas of the bounded faces minus their holes.
pub fn total_face_area(graph: &PlanarGraph) -> f64 {
    let mut total = 0.0;
    for f in graph.faces() {
        let face = graph.face(f).expect("live face");
        if let Some(outer) = face.halfedge() {
            total += graph.cycle_signed_area(outer);
            for &hole in face.holes() {
                total += graph.cycle_signed_area(hole);
            }
        }
    }
    total
}

pub fn count_flagged(graph: &PlanarGraph, flag: impl Fn(&planar_dcel::VertexData) -> bool) -> usize {
    graph
        .vertices()
        .filter(|&v| graph.vertex(v).map_or(false, |vx| flag(&vx.data)))
        .count()
}
