// Copyright 2025 Lars Brubaker
// License: MIT
//
// Polyline embedder: turns arbitrary, possibly crossing polylines into a
// planar halfedge graph.
//
// Pipeline:
//   1. Collect segments: existing edges, lonely vertices, then the input
//      polylines in order.
//   2. Compute every pairwise intersection (see `intersect`).
//   3. Split existing edges at their split points.
//   4. Snap every point to a shared vertex through a grid index.
//   5. Link each sub-segment with `insert_edge`; zero-length and duplicate
//      pieces are skipped, numerically inconsistent ones logged and skipped.
//   6. Recompute the tail / intersection / singleton vertex flags.

pub mod snap;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::geom::{Point, Polyline, Real, DEFAULT_TOLERANCE};
use crate::intersect::{compute_splits, Segment, SplitPoint};
use crate::mesh::{EdgeKey, FaceKey, HalfedgeKey, PlanarGraph, VertexData, VertexKey};
use snap::VertexIndex;

/// Counts reported by one embedding pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbedSummary {
    pub segments: usize,
    pub split_points: usize,
    pub vertices_created: usize,
    pub edges_inserted: usize,
    pub skipped: usize,
}

/// A hole cut into an existing face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HoleEmbedding {
    /// The face the hole was cut into.
    pub face: FaceKey,
    /// Representative of the hole's complemented boundary cycle.
    pub hole: HalfedgeKey,
    /// The new face inside the hole.
    pub interior: FaceKey,
}

#[derive(Copy, Clone, Debug)]
enum Source {
    Edge(EdgeKey),
    Lonely,
    Input,
    Singleton,
}

// ─────────────────────────────── Embedder ─────────────────────────────────────

pub struct Embedder {
    polylines: Vec<Polyline>,
    tolerance: Real,
}

impl Default for Embedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder {
    pub fn new() -> Self {
        Embedder {
            polylines: Vec::new(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Absolute distance under which points merge into one vertex.
    pub fn set_tolerance(&mut self, tolerance: Real) {
        self.tolerance = tolerance.abs();
    }

    pub fn tolerance(&self) -> Real {
        self.tolerance
    }

    pub fn add_polyline(&mut self, polyline: Polyline) {
        self.polylines.push(polyline);
    }

    pub fn add_polylines<I: IntoIterator<Item = Polyline>>(&mut self, polylines: I) {
        self.polylines.extend(polylines);
    }

    /// Embed the polylines into a fresh graph.
    pub fn embed(&self) -> PlanarGraph {
        let mut graph = PlanarGraph::new();
        self.embed_into(&mut graph);
        graph
    }

    /// Cut a hole: a closed polyline that touches neither itself nor anything
    /// already in `graph`, with "touches" judged at this embedder's
    /// tolerance. Its boundary becomes a hole of the face around it and its
    /// inside a new face. Queued polylines are not used.
    pub fn embed_hole_into(
        &self,
        graph: &mut PlanarGraph,
        polyline: &Polyline,
    ) -> Result<HoleEmbedding> {
        cut_hole(graph, polyline, self.tolerance)
    }

    /// Embed the polylines into `graph`, cutting existing edges where the
    /// new geometry meets them.
    pub fn embed_into(&self, graph: &mut PlanarGraph) -> EmbedSummary {
        let tol = self.tolerance;
        let mut summary = EmbedSummary::default();

        // ── 1. Segments ──
        let mut segments = Vec::new();
        let mut sources = Vec::new();
        for e in graph.edges() {
            let (u, w) = graph.edge_vertices(e);
            segments.push(Segment::new(graph.point(u), graph.point(w)));
            sources.push(Source::Edge(e));
        }
        for v in graph.vertices() {
            if graph.vertex(v).map_or(false, |vx| vx.is_lonely()) {
                segments.push(Segment::point(graph.point(v)));
                sources.push(Source::Lonely);
            }
        }
        for polyline in &self.polylines {
            let points = clean_points(polyline, tol);
            match points.len() {
                0 => {}
                1 => {
                    segments.push(Segment::point(points[0]));
                    sources.push(Source::Singleton);
                }
                _ => {
                    let clean = Polyline::new(polyline.closed, points);
                    for (a, b) in clean.segments() {
                        segments.push(Segment::new(a, b));
                        sources.push(Source::Input);
                    }
                }
            }
        }
        summary.segments = segments.len();

        // ── 2. Intersections ──
        let splits = compute_splits(&segments, tol);
        summary.split_points = splits.iter().map(Vec::len).sum();

        let mut index = VertexIndex::from_graph(graph, tol);
        let mut crossings = Vec::new();
        let mut singletons = Vec::new();

        // ── 3. Cut existing edges ──
        for (source, cuts) in sources.iter().zip(&splits) {
            if let Source::Edge(e) = *source {
                let created = split_existing_edge(graph, &mut index, e, cuts, &mut crossings);
                summary.vertices_created += created;
            }
        }

        // ── 4/5. Snap and link new segments ──
        for ((source, seg), cuts) in sources.iter().zip(&segments).zip(&splits) {
            match source {
                Source::Edge(_) | Source::Lonely => {}
                Source::Singleton => {
                    let (v, created) = index.find_or_insert(graph, seg.a);
                    if created {
                        summary.vertices_created += 1;
                        singletons.push(v);
                    }
                }
                Source::Input => {
                    let mut chain = Vec::with_capacity(cuts.len() + 2);
                    for (p, crossing) in std::iter::once((seg.a, false))
                        .chain(cuts.iter().map(|c| (c.point, c.crossing)))
                        .chain(std::iter::once((seg.b, false)))
                    {
                        let (v, created) = index.find_or_insert(graph, p);
                        summary.vertices_created += usize::from(created);
                        if crossing {
                            crossings.push(v);
                        }
                        chain.push(v);
                    }
                    for w in chain.windows(2) {
                        if link_piece(graph, w[0], w[1]) {
                            summary.edges_inserted += 1;
                        } else {
                            summary.skipped += 1;
                        }
                    }
                }
            }
        }

        // ── 6. Flags ──
        for v in crossings {
            if let Some(vx) = graph.vertex_mut(v) {
                vx.data.is_intersection_point = true;
            }
        }
        for v in singletons {
            if let Some(vx) = graph.vertex_mut(v) {
                vx.data.is_singleton = true;
            }
        }
        update_degree_flags(graph);

        debug!(
            "embed: {} segments, {} split points, {} vertices created, {} edges inserted, {} skipped; {}",
            summary.segments,
            summary.split_points,
            summary.vertices_created,
            summary.edges_inserted,
            summary.skipped,
            graph
        );
        summary
    }
}

// ─────────────────────────── Free functions ───────────────────────────────────

/// Build a planar graph from `polylines` with the default tolerance.
pub fn embed(polylines: &[Polyline]) -> PlanarGraph {
    let mut embedder = Embedder::new();
    embedder.add_polylines(polylines.iter().cloned());
    embedder.embed()
}

/// Embed one more polyline into an existing graph.
pub fn embed_polyline(graph: &mut PlanarGraph, polyline: &Polyline) -> EmbedSummary {
    let mut embedder = Embedder::new();
    embedder.add_polyline(polyline.clone());
    embedder.embed_into(graph)
}

/// Cut a hole with the default tolerance. See [`Embedder::embed_hole_into`].
pub fn embed_hole(graph: &mut PlanarGraph, polyline: &Polyline) -> Result<HoleEmbedding> {
    Embedder::new().embed_hole_into(graph, polyline)
}

fn cut_hole(graph: &mut PlanarGraph, polyline: &Polyline, tol: Real) -> Result<HoleEmbedding> {
    let points = clean_points(polyline, tol);
    if !polyline.closed || points.len() < 3 {
        return Err(Error::DegenerateHole);
    }
    let ring = Polyline::closed(points);
    if ring.signed_area().abs() <= tol {
        return Err(Error::DegenerateHole);
    }

    // Nothing may touch: no snapping onto existing or repeated vertices and
    // no split points anywhere.
    let index = VertexIndex::from_graph(graph, tol);
    if ring.points.iter().any(|&p| index.find(graph, p).is_some()) {
        return Err(Error::HoleNotIsolated);
    }
    for (i, p) in ring.points.iter().enumerate() {
        if ring.points[i + 1..].iter().any(|q| q.distance(*p) <= tol) {
            return Err(Error::HoleNotIsolated);
        }
    }
    let mut segments: Vec<Segment> = graph
        .edges()
        .map(|e| {
            let (u, w) = graph.edge_vertices(e);
            Segment::new(graph.point(u), graph.point(w))
        })
        .collect();
    segments.extend(
        graph
            .vertices()
            .filter(|&v| graph.vertex(v).map_or(false, |vx| vx.is_lonely()))
            .map(|v| Segment::point(graph.point(v))),
    );
    segments.extend(ring.segments().map(|(a, b)| Segment::new(a, b)));
    if compute_splits(&segments, tol).iter().any(|s| !s.is_empty()) {
        return Err(Error::HoleNotIsolated);
    }

    let vs: Vec<VertexKey> = ring
        .points
        .iter()
        .map(|&p| graph.link_island_vertex(VertexData::new(p)))
        .collect();
    for i in 0..vs.len() {
        graph.insert_edge(vs[i], vs[(i + 1) % vs.len()])?;
    }
    update_degree_flags(graph);

    let hole = graph
        .find_complemented_cycle_at_vertex(vs[0])
        .ok_or(Error::DegenerateHole)?;
    let face = graph.face_of(hole);
    let interior = graph.face_of(graph.twin(hole));
    debug!(
        "embed_hole: {} vertices, cut into face {}",
        vs.len(),
        graph.face(face).map_or(0, |f| f.id)
    );
    Ok(HoleEmbedding {
        face,
        hole,
        interior,
    })
}

// ─────────────────────────── Internal helpers ─────────────────────────────────

/// Drop consecutive repeats (and a repeated closing point) within `tol`.
fn clean_points(polyline: &Polyline, tol: Real) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(polyline.len());
    for &p in &polyline.points {
        if !p.is_finite() {
            warn!("skipping non-finite point ({}, {})", p.x, p.y);
            continue;
        }
        if out.last().map_or(true, |q| q.distance(p) > tol) {
            out.push(p);
        }
    }
    if polyline.closed {
        while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= tol {
            out.pop();
        }
    }
    out
}

/// Cut an existing edge at its split points, nearest the origin first.
/// Returns the number of vertices created.
fn split_existing_edge(
    graph: &mut PlanarGraph,
    index: &mut VertexIndex,
    edge: EdgeKey,
    cuts: &[SplitPoint],
    crossings: &mut Vec<VertexKey>,
) -> usize {
    let mut created = 0;
    let mut rest = edge;
    for cut in cuts {
        let existing = index.find(graph, cut.point);
        let m = match existing {
            Some(v) if graph.vertex(v).map_or(false, |vx| vx.is_lonely()) => v,
            Some(_) => continue,
            None => {
                let v = graph.link_island_vertex(VertexData::new(cut.point));
                index.insert(cut.point, v);
                created += 1;
                v
            }
        };
        match graph.split_edge_at(rest, m) {
            Ok(next) => rest = next,
            Err(err) => {
                warn!("could not split edge at ({}, {}): {err}", cut.point.x, cut.point.y);
                break;
            }
        }
        if cut.crossing {
            crossings.push(m);
        }
    }
    created
}

/// Link one sub-segment. Returns false when it was skipped.
fn link_piece(graph: &mut PlanarGraph, a: VertexKey, b: VertexKey) -> bool {
    if a == b || graph.find_edge(a, b).is_some() {
        return false;
    }
    match graph.insert_edge(a, b) {
        Ok(_) => true,
        Err(err) => {
            warn!("skipping segment: {err}");
            false
        }
    }
}

/// Tails are exactly the degree-1 vertices; a singleton stops being one
/// once an edge reaches it.
fn update_degree_flags(graph: &mut PlanarGraph) {
    let degrees: Vec<(VertexKey, usize)> = graph.vertices().map(|v| (v, graph.degree(v))).collect();
    for (v, degree) in degrees {
        if let Some(vx) = graph.vertex_mut(v) {
            vx.data.is_tail_point = degree == 1;
            vx.data.is_singleton &= degree == 0;
        }
    }
}
