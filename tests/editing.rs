// Copyright 2025 Lars Brubaker
// Incremental edits on embedded graphs: insertion, removal and splitting.

mod helpers;

use helpers::{open, rect, square, verify_graph};
use planar_dcel::{embed, Error, PlanarGraph, Point, RemoveParams, VertexData, VertexKey};

fn vertex_at(g: &PlanarGraph, x: f64, y: f64) -> VertexKey {
    g.nearest_vertex(Point::new(x, y), 1e-9)
        .unwrap_or_else(|| panic!("no vertex at ({}, {})", x, y))
}

#[test]
fn same_cycle_insertion_adds_one_face() {
    let mut g = embed(&[square(0.0, 0.0, 2.0)]);
    let faces = g.face_count();
    let vertices = g.vertex_count();

    let ins = g
        .insert_edge(vertex_at(&g, 0.0, 0.0), vertex_at(&g, 2.0, 2.0))
        .unwrap();
    verify_graph(&g, "diagonal");
    assert!(ins.new_face.is_some());
    assert_eq!(g.face_count(), faces + 1);
    assert_eq!(g.vertex_count(), vertices);
}

#[test]
fn different_cycle_insertion_joins_boundaries() {
    let mut g = embed(&[square(0.0, 0.0, 4.0), square(1.0, 1.0, 2.0)]);
    let faces = g.face_count();
    let cycles = g.boundary_cycle_count();

    let ins = g
        .insert_edge(vertex_at(&g, 0.0, 0.0), vertex_at(&g, 1.0, 1.0))
        .unwrap();
    verify_graph(&g, "bridge");
    assert!(ins.joined_cycles);
    assert_eq!(g.face_count(), faces);
    assert_eq!(g.boundary_cycle_count(), cycles - 1);
}

#[test]
fn insert_then_remove_restores_the_graph() {
    let mut g = embed(&[rect(0.0, 0.0, 4.0, 2.0), square(5.0, 0.0, 1.0)]);
    let faces = g.face_count();
    let cycles = g.boundary_cycle_count();
    let mut vertices: Vec<VertexKey> = g.vertices().collect();
    vertices.sort();

    let pairs = [((0.0, 0.0), (4.0, 2.0)), ((4.0, 0.0), (5.0, 0.0)), ((4.0, 2.0), (5.0, 1.0))];
    for ((ax, ay), (bx, by)) in pairs {
        let (a, b) = (vertex_at(&g, ax, ay), vertex_at(&g, bx, by));
        let ins = g.insert_edge(a, b).unwrap();
        verify_graph(&g, "after insert");
        g.remove_edge(ins.edge, RemoveParams::default()).unwrap();
        verify_graph(&g, "after remove");
        assert_eq!(g.face_count(), faces);
        assert_eq!(g.boundary_cycle_count(), cycles);
        let mut now: Vec<VertexKey> = g.vertices().collect();
        now.sort();
        assert_eq!(now, vertices);
    }
}

#[test]
fn removing_a_shared_wall_merges_rooms() {
    let mut g = embed(&[rect(0.0, 0.0, 2.0, 2.0), rect(2.0, 0.0, 4.0, 2.0)]);
    let left = g.locate_face(Point::new(1.0, 1.0));
    let right = g.locate_face(Point::new(3.0, 1.0));
    let older = if g.face(left).unwrap().id < g.face(right).unwrap().id {
        left
    } else {
        right
    };
    let wall = g
        .find_edge(vertex_at(&g, 2.0, 0.0), vertex_at(&g, 2.0, 2.0))
        .unwrap();

    let removal = g.remove_edge(wall, RemoveParams::default()).unwrap();
    verify_graph(&g, "merged rooms");
    let merge = removal.merged.expect("two rooms should merge");
    assert_eq!(merge.survivor, older);
    assert!(!g.contains_face(merge.removed));
    assert_eq!(g.face_count(), 2);
    assert_eq!(g.locate_face(Point::new(3.0, 1.0)), older);
}

#[test]
fn removing_every_edge_empties_the_graph() {
    let mut g = embed(&[
        square(0.0, 0.0, 2.0),
        square(1.0, 1.0, 2.0),
        open(&[(5.0, 0.0), (6.0, 1.0)]),
    ]);
    let params = RemoveParams {
        erase_lonely_vertices: true,
    };
    loop {
        let e = match g.edges().next() {
            Some(e) => e,
            None => break,
        };
        g.remove_edge(e, params).unwrap();
        verify_graph(&g, "teardown");
    }
    assert_eq!(g.vertex_count(), 0);
    assert_eq!(g.face_count(), 1);
    assert!(g.face(g.unbounded_face()).unwrap().holes().is_empty());
}

#[test]
fn removal_keeps_lonely_vertices_by_default() {
    let mut g = embed(&[open(&[(0.0, 0.0), (1.0, 0.0)])]);
    let e = g.edges().next().unwrap();
    let removal = g.remove_edge(e, RemoveParams::default()).unwrap();
    verify_graph(&g, "lonely");
    assert_eq!(removal.lonely_vertices.len(), 2);
    assert_eq!(g.vertex_count(), 2);
    assert!(g.vertices().all(|v| g.vertex(v).unwrap().is_lonely()));
}

#[test]
fn splitting_an_edge_keeps_faces() {
    let mut g = embed(&[square(0.0, 0.0, 2.0)]);
    let e = g
        .find_edge(vertex_at(&g, 0.0, 0.0), vertex_at(&g, 2.0, 0.0))
        .unwrap();
    let m = g.split_edge(e, VertexData::new(Point::new(1.0, 0.0))).unwrap();
    verify_graph(&g, "split");
    assert_eq!(g.face_count(), 2);
    assert_eq!(g.degree(m), 2);

    // The new vertex can anchor further edges.
    let ins = g.insert_edge(m, vertex_at(&g, 2.0, 2.0)).unwrap();
    verify_graph(&g, "split then link");
    assert!(ins.new_face.is_some());
}

#[test]
fn island_vertex_links_into_the_face_around_it() {
    let mut g = embed(&[square(0.0, 0.0, 4.0)]);
    let room = g.locate_face(Point::new(2.0, 2.0));
    let island = g.link_island_vertex(VertexData::new(Point::new(2.0, 2.0)));
    let ins = g.insert_edge(island, vertex_at(&g, 0.0, 0.0)).unwrap();
    verify_graph(&g, "island linked");
    assert_eq!(ins.face, room);
    assert!(g.vertex(island).unwrap().halfedge().is_some());
}

#[test]
fn stale_keys_are_reported() {
    let mut g = embed(&[open(&[(0.0, 0.0), (1.0, 0.0)])]);
    let e = g.edges().next().unwrap();
    let (a, b) = g.edge_vertices(e);
    g.remove_edge(e, RemoveParams { erase_lonely_vertices: true })
        .unwrap();
    assert_eq!(g.remove_edge(e, RemoveParams::default()), Err(Error::EdgeNotFound(e)));
    assert_eq!(g.insert_edge(a, b), Err(Error::VertexNotFound(a)));
    assert_eq!(
        g.split_edge(e, VertexData::new(Point::new(0.5, 0.0))),
        Err(Error::EdgeNotFound(e))
    );
}

#[test]
fn crossing_faces_are_rejected() {
    let mut g = embed(&[square(0.0, 0.0, 2.0), open(&[(3.0, 1.0), (4.0, 1.0)])]);
    let inside = g.link_island_vertex(VertexData::new(Point::new(1.0, 1.0)));
    let anchor = vertex_at(&g, 0.0, 0.0);
    g.insert_edge(inside, anchor).unwrap();
    let result = g.insert_edge(inside, vertex_at(&g, 3.0, 1.0));
    assert!(matches!(result, Err(Error::FaceMismatch(_, _))), "{:?}", result);
    verify_graph(&g, "rejected crossing");
}
