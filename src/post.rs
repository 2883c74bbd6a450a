// Copyright 2025 Lars Brubaker
// License: MIT
//
// Post-processing: flat per-face and per-edge records read out of the graph,
// plus the spatial queries and edits an editor layers on top of them.

use log::debug;
use rustc_hash::FxHashSet;

use crate::embed::{self, EmbedSummary, HoleEmbedding};
use crate::error::Result;
use crate::geom::{point_in_polygon, Circle, Point, Polyline, Real};
use crate::linker::{EdgeRemoval, RemoveParams};
use crate::mesh::{EdgeKey, FaceKey, HalfedgeKey, PlanarGraph, VertexKey};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HalfedgeInfo {
    pub halfedge: HalfedgeKey,
    pub edge: EdgeKey,
    pub from: Point,
    pub to: Point,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FaceInfo {
    pub face: FaceKey,
    pub id: u32,
    /// Outer boundary loop; empty for the unbounded face.
    pub polygon: Vec<Point>,
    /// True when the outer boundary is missing or complemented.
    pub is_exterior: bool,
    pub holes: Vec<Vec<Point>>,
    /// Every halfedge on the face's boundary cycles, outer cycle first.
    pub boundary: Vec<HalfedgeInfo>,
}

impl FaceInfo {
    /// Whether `p` lies in the face's region: inside the outer loop (if
    /// any) and inside none of the holes.
    pub fn contains_point(&self, p: Point) -> bool {
        let in_outer = self.polygon.is_empty() || point_in_polygon(&self.polygon, p);
        in_outer && !self.holes.iter().any(|h| point_in_polygon(h, p))
    }

    /// True if the circle reaches the face's region or its boundary.
    pub fn intersects_circle(&self, circle: &Circle) -> bool {
        self.boundary
            .iter()
            .any(|h| circle.intersects_segment(h.from, h.to))
            || self.contains_point(circle.center)
    }

    /// Boundary halfedges touched by the circle.
    pub fn query_halfedges_in_circle(&self, circle: &Circle) -> Vec<HalfedgeKey> {
        self.boundary
            .iter()
            .filter(|h| circle.intersects_segment(h.from, h.to))
            .map(|h| h.halfedge)
            .collect()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeInfo {
    pub edge: EdgeKey,
    pub id: u32,
    pub from: Point,
    pub to: Point,
    /// Face on the left of `from -> to`.
    pub left: FaceKey,
    pub right: FaceKey,
}

/// One record per face, ordered by face id.
pub fn generate_face_infos(graph: &PlanarGraph) -> Vec<FaceInfo> {
    let mut infos: Vec<FaceInfo> = graph
        .faces()
        .filter_map(|f| {
            let face = graph.face(f)?;
            let boundary = graph
                .face_cycles(f)
                .into_iter()
                .flat_map(|rep| graph.cycle(rep))
                .map(|h| HalfedgeInfo {
                    halfedge: h,
                    edge: graph.edge_of(h),
                    from: graph.point(graph.origin(h)),
                    to: graph.point(graph.destination(h)),
                })
                .collect();
            Some(FaceInfo {
                face: f,
                id: face.id,
                polygon: face
                    .halfedge()
                    .map(|h| graph.cycle_points(h))
                    .unwrap_or_default(),
                is_exterior: graph.is_face_exterior(f),
                holes: face.holes().iter().map(|&h| graph.cycle_points(h)).collect(),
                boundary,
            })
        })
        .collect();
    infos.sort_by_key(|info| info.id);
    infos
}

/// One record per edge, ordered by edge id.
pub fn generate_edge_infos(graph: &PlanarGraph) -> Vec<EdgeInfo> {
    let mut infos: Vec<EdgeInfo> = graph
        .edges()
        .filter_map(|e| {
            let edge = graph.edge(e)?;
            let (h, t) = graph.edge_halfedges(e);
            Some(EdgeInfo {
                edge: e,
                id: edge.id,
                from: graph.point(graph.origin(h)),
                to: graph.point(graph.origin(t)),
                left: graph.face_of(h),
                right: graph.face_of(t),
            })
        })
        .collect();
    infos.sort_by_key(|info| info.id);
    infos
}

/// Owning edges of `halfedges`, first-seen order, without repeats. Stale
/// halfedges are ignored.
pub fn halfedges_to_edges(graph: &PlanarGraph, halfedges: &[HalfedgeKey]) -> Vec<EdgeKey> {
    let mut seen = FxHashSet::default();
    halfedges
        .iter()
        .filter_map(|&h| graph.halfedge(h).map(|he| he.edge()))
        .filter(|&e| seen.insert(e))
        .collect()
}

// ─────────────────────────── PostProcessor ────────────────────────────────────

/// Owns a graph and keeps its face records current across edits.
pub struct PostProcessor {
    graph: PlanarGraph,
    face_infos: Vec<FaceInfo>,
}

impl Default for PostProcessor {
    fn default() -> Self {
        Self::new(PlanarGraph::new())
    }
}

impl PostProcessor {
    pub fn new(graph: PlanarGraph) -> Self {
        let face_infos = generate_face_infos(&graph);
        PostProcessor { graph, face_infos }
    }

    /// Replace the graph, returning the old one.
    pub fn load_graph(&mut self, graph: PlanarGraph) -> PlanarGraph {
        let old = std::mem::replace(&mut self.graph, graph);
        self.refresh();
        old
    }

    pub fn graph(&self) -> &PlanarGraph {
        &self.graph
    }

    pub fn into_graph(self) -> PlanarGraph {
        self.graph
    }

    pub fn face_infos(&self) -> &[FaceInfo] {
        &self.face_infos
    }

    /// Rebuild the face records from the graph.
    pub fn generate_face_infos(&mut self) -> &[FaceInfo] {
        self.refresh();
        &self.face_infos
    }

    fn refresh(&mut self) {
        self.face_infos = generate_face_infos(&self.graph);
    }

    /// Faces whose region or boundary the circle reaches.
    pub fn query_faces_in_circle(&self, circle: &Circle) -> Vec<&FaceInfo> {
        self.face_infos
            .iter()
            .filter(|info| info.intersects_circle(circle))
            .collect()
    }

    /// Halfedges of any face touched by the circle.
    pub fn query_halfedges_in_circle(&self, circle: &Circle) -> Vec<HalfedgeKey> {
        self.face_infos
            .iter()
            .flat_map(|info| info.query_halfedges_in_circle(circle))
            .collect()
    }

    /// Closest vertex to `p` within `radius`.
    pub fn query_vertex_at_point(&self, p: Point, radius: Real) -> Option<VertexKey> {
        self.graph.nearest_vertex(p, radius)
    }

    /// Remove each edge in turn; edges already gone are skipped.
    pub fn erase_edges(&mut self, edges: &[EdgeKey], params: RemoveParams) -> Vec<EdgeRemoval> {
        let mut removals = Vec::with_capacity(edges.len());
        for &e in edges {
            if !self.graph.contains_edge(e) {
                continue;
            }
            if let Ok(removal) = self.graph.remove_edge(e, params) {
                removals.push(removal);
            }
        }
        debug!("erase_edges: removed {} of {} edges", removals.len(), edges.len());
        self.refresh();
        removals
    }

    pub fn embed_polyline(&mut self, polyline: &Polyline) -> EmbedSummary {
        let summary = embed::embed_polyline(&mut self.graph, polyline);
        self.refresh();
        summary
    }

    pub fn embed_hole(&mut self, polyline: &Polyline) -> Result<HoleEmbedding> {
        let hole = embed::embed_hole(&mut self.graph, polyline)?;
        self.refresh();
        Ok(hole)
    }
}
