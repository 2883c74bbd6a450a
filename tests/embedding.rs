// Copyright 2025 Lars Brubaker
// Building planar graphs from raw polylines.

mod helpers;

use approx::assert_relative_eq;
use helpers::{count_flagged, open, rect, square, verify_graph};
use planar_dcel::{embed, embed_polyline, Embedder, PlanarGraph, Point, Polyline};

#[test]
fn no_polylines_give_only_the_unbounded_face() {
    let g = embed(&[]);
    verify_graph(&g, "empty");
    assert_eq!(g.face_count(), 1);
    assert_eq!(g.vertex_count(), 0);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn empty_polyline_adds_nothing() {
    let g = embed(&[Polyline::default(), Polyline::closed(Vec::new())]);
    verify_graph(&g, "empty polylines");
    assert_eq!(g.vertex_count(), 0);
    assert_eq!(g.face_count(), 1);
}

#[test]
fn single_point_becomes_a_singleton_vertex() {
    let g = embed(&[open(&[(3.0, 4.0)])]);
    verify_graph(&g, "single point");
    assert_eq!(g.vertex_count(), 1);
    assert_eq!(g.edge_count(), 0);
    assert_eq!(g.face_count(), 1);
    let v = g.vertices().next().unwrap();
    let data = &g.vertex(v).unwrap().data;
    assert!(data.is_singleton);
    assert!(!data.is_tail_point);
    assert_eq!(data.point, Point::new(3.0, 4.0));
}

#[test]
fn repeated_points_collapse_to_a_singleton() {
    let g = embed(&[open(&[(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)])]);
    verify_graph(&g, "repeated point");
    assert_eq!(g.vertex_count(), 1);
    assert_eq!(g.edge_count(), 0);
}

#[test]
fn open_polyline_has_two_tails() {
    let g = embed(&[open(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (2.0, 1.0)])]);
    verify_graph(&g, "open chain");
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.face_count(), 1);
    assert_eq!(count_flagged(&g, |d| d.is_tail_point), 2);
}

#[test]
fn closed_square_encloses_one_face() {
    let g = embed(&[square(0.0, 0.0, 2.0)]);
    verify_graph(&g, "square");
    assert_eq!(g.face_count(), 2);
    assert_eq!(helpers::bounded_face_count(&g), 1);
    assert_relative_eq!(helpers::total_face_area(&g), 4.0);
    assert_eq!(count_flagged(&g, |d| d.is_tail_point), 0);
}

#[test]
fn clockwise_square_encloses_the_same_face() {
    let g = embed(&[Polyline::from_coords(
        true,
        &[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)],
    )]);
    verify_graph(&g, "clockwise square");
    assert_eq!(g.face_count(), 2);
    assert_relative_eq!(helpers::total_face_area(&g), 4.0);
}

#[test]
fn two_disjoint_squares_give_three_faces() {
    let g = embed(&[square(0.0, 0.0, 1.0), square(3.0, 0.0, 1.0)]);
    verify_graph(&g, "disjoint squares");
    assert_eq!(g.face_count(), 3);
    let outside = g.face(g.unbounded_face()).unwrap();
    assert_eq!(outside.holes().len(), 2);
}

#[test]
fn two_overlapping_squares_give_four_faces() {
    let g = embed(&[square(0.0, 0.0, 2.0), square(1.0, 1.0, 2.0)]);
    verify_graph(&g, "overlapping squares");
    assert_eq!(g.face_count(), 4);
    assert_eq!(g.vertex_count(), 10);
    assert_eq!(g.edge_count(), 12);
    assert_eq!(count_flagged(&g, |d| d.is_intersection_point), 2);
    assert_relative_eq!(helpers::total_face_area(&g), 7.0);
}

#[test]
fn nested_squares_give_a_ring_and_a_core() {
    let g = embed(&[square(0.0, 0.0, 4.0), square(1.0, 1.0, 2.0)]);
    verify_graph(&g, "nested squares");
    assert_eq!(g.face_count(), 3);
    let ring = g.locate_face(Point::new(0.5, 0.5));
    let core = g.locate_face(Point::new(2.0, 2.0));
    assert_ne!(ring, core);
    assert_eq!(g.face(ring).unwrap().holes().len(), 1);
    assert!(g.face(core).unwrap().holes().is_empty());
}

#[test]
fn crossing_segments_meet_at_a_shared_vertex() {
    let g = embed(&[open(&[(0.0, 0.0), (2.0, 2.0)]), open(&[(0.0, 2.0), (2.0, 0.0)])]);
    verify_graph(&g, "cross");
    assert_eq!(g.vertex_count(), 5);
    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.face_count(), 1);
    let center = g.nearest_vertex(Point::new(1.0, 1.0), 1e-9).unwrap();
    assert_eq!(g.degree(center), 4);
    assert!(g.vertex(center).unwrap().data.is_intersection_point);
    assert_eq!(count_flagged(&g, |d| d.is_tail_point), 4);
}

#[test]
fn bowtie_splits_into_two_faces() {
    let g = embed(&[Polyline::from_coords(
        true,
        &[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)],
    )]);
    verify_graph(&g, "bowtie");
    assert_eq!(g.vertex_count(), 5);
    assert_eq!(g.edge_count(), 6);
    assert_eq!(g.face_count(), 3);
    assert_relative_eq!(helpers::total_face_area(&g), 2.0);
}

#[test]
fn t_junction_splits_the_crossed_segment() {
    let g = embed(&[open(&[(0.0, 0.0), (2.0, 0.0)]), open(&[(1.0, 0.0), (1.0, 1.0)])]);
    verify_graph(&g, "T junction");
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
    let joint = g.nearest_vertex(Point::new(1.0, 0.0), 1e-9).unwrap();
    assert_eq!(g.degree(joint), 3);
}

#[test]
fn duplicate_polylines_collapse() {
    let g = embed(&[square(0.0, 0.0, 1.0), square(0.0, 0.0, 1.0)]);
    verify_graph(&g, "duplicate squares");
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 4);
    assert_eq!(g.face_count(), 2);
}

#[test]
fn collinear_overlap_shares_edges() {
    let g = embed(&[open(&[(0.0, 0.0), (2.0, 0.0)]), open(&[(1.0, 0.0), (3.0, 0.0)])]);
    verify_graph(&g, "collinear overlap");
    assert_eq!(g.vertex_count(), 4);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.face_count(), 1);
}

#[test]
fn adjacent_rooms_share_a_wall() {
    let g = embed(&[rect(0.0, 0.0, 2.0, 2.0), rect(2.0, 0.0, 4.0, 2.0)]);
    verify_graph(&g, "adjacent rooms");
    assert_eq!(g.vertex_count(), 6);
    assert_eq!(g.edge_count(), 7);
    assert_eq!(g.face_count(), 3);
    assert_relative_eq!(helpers::total_face_area(&g), 8.0);
}

#[test]
fn point_on_a_segment_splits_it() {
    let g = embed(&[open(&[(0.0, 0.0), (2.0, 0.0)]), open(&[(1.0, 0.0)])]);
    verify_graph(&g, "point on segment");
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 2);
    assert_eq!(count_flagged(&g, |d| d.is_singleton), 0);
}

#[test]
fn star_polygon_from_data() {
    let data = "
        0 3
        2 -3
        -3 1
        3 1
        -2 -3
        closed
    ";
    let polylines = helpers::parse_polylines(data);
    assert_eq!(polylines.len(), 1);
    assert!(polylines[0].closed);
    let g = embed(&polylines);
    verify_graph(&g, "pentagram");
    // Five tips, five inner crossings.
    assert_eq!(g.vertex_count(), 10);
    assert_eq!(g.edge_count(), 15);
    assert_eq!(g.face_count(), 7);
    assert_eq!(count_flagged(&g, |d| d.is_intersection_point), 5);
}

#[test]
fn embedding_into_an_existing_graph_cuts_its_edges() {
    let mut g = embed(&[square(0.0, 0.0, 2.0)]);
    let summary = embed_polyline(&mut g, &open(&[(1.0, -1.0), (1.0, 3.0)]));
    verify_graph(&g, "square cut by a line");
    assert_eq!(summary.edges_inserted, 3);
    assert_eq!(g.vertex_count(), 8);
    assert_eq!(g.edge_count(), 9);
    assert_eq!(g.face_count(), 3);
    assert_relative_eq!(helpers::total_face_area(&g), 4.0);
}

#[test]
fn embedder_accumulates_polylines() {
    let mut embedder = Embedder::new();
    embedder.add_polyline(square(0.0, 0.0, 1.0));
    embedder.add_polylines(vec![square(2.0, 0.0, 1.0), open(&[(5.0, 5.0)])]);
    let g = embedder.embed();
    verify_graph(&g, "accumulated");
    assert_eq!(g.face_count(), 3);
    assert_eq!(g.vertex_count(), 9);

    let mut target = PlanarGraph::new();
    embedder.embed_into(&mut target);
    assert_eq!(target.face_count(), g.face_count());
    assert_eq!(target.edge_count(), g.edge_count());
}

#[test]
fn snapping_merges_nearby_endpoints() {
    let mut embedder = Embedder::new();
    embedder.set_tolerance(1e-3);
    embedder.add_polyline(open(&[(0.0, 0.0), (1.0, 0.0)]));
    embedder.add_polyline(open(&[(1.0005, 0.0), (1.0, 1.0)]));
    let g = embedder.embed();
    verify_graph(&g, "snapped chain");
    assert_eq!(g.vertex_count(), 3);
    assert_eq!(g.edge_count(), 2);
}
