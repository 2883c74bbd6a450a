// Copyright 2025 Lars Brubaker
// License: MIT
//
// Halfedge graph: the element records and the arena that owns them.
//
// Design:
//   - Every element kind lives in its own arena; references between
//     elements are generational keys stamped with the owning graph, so a
//     destroyed element's key never resolves again and another graph's
//     keys never resolve at all.
//   - Halfedges are allocated in twin pairs together with their edge.
//   - A face has one outer boundary cycle (absent for the unbounded face,
//     which every graph owns from construction) and any number of hole
//     cycles, one representative halfedge per cycle.
//   - A vertex of degree 0 ("lonely") has no halfedge.
//   - Indexing a dead key panics: topology surgery that reaches a destroyed
//     element is a bug, not a recoverable condition.

mod arena;
mod data;
mod validate;

pub use arena::{EdgeKey, FaceKey, GraphId, HalfedgeKey, VertexKey};
pub use data::{EdgeData, FaceData, HalfedgeData, Mark, PlanarGraph, VertexData};

use std::fmt;

use arena::{Arena, GraphKey};

use crate::error::{Error, Result};
use crate::geom::{point_in_polygon, signed_area, Point, Real};

/// Vertex payloads expose the position used by every orientation test.
pub trait Located {
    fn point(&self) -> Point;
}

impl Located for Point {
    fn point(&self) -> Point {
        *self
    }
}

#[derive(Clone, Debug)]
pub struct Vertex<V> {
    pub(crate) halfedge: Option<HalfedgeKey>,
    pub id: u32,
    pub data: V,
}

impl<V> Vertex<V> {
    /// One outgoing halfedge, or `None` for a lonely vertex.
    pub fn halfedge(&self) -> Option<HalfedgeKey> {
        self.halfedge
    }

    pub fn is_lonely(&self) -> bool {
        self.halfedge.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct Halfedge {
    /// Next halfedge along the boundary cycle of `face`.
    pub(crate) next: HalfedgeKey,
    pub(crate) prev: HalfedgeKey,
    pub(crate) twin: HalfedgeKey,
    /// Origin vertex.
    pub(crate) vertex: VertexKey,
    pub(crate) edge: EdgeKey,
    /// Face on the left.
    pub(crate) face: FaceKey,
    pub id: u32,
    pub data: HalfedgeData,
}

impl Halfedge {
    pub fn next(&self) -> HalfedgeKey {
        self.next
    }

    pub fn prev(&self) -> HalfedgeKey {
        self.prev
    }

    pub fn twin(&self) -> HalfedgeKey {
        self.twin
    }

    pub fn vertex(&self) -> VertexKey {
        self.vertex
    }

    pub fn edge(&self) -> EdgeKey {
        self.edge
    }

    pub fn face(&self) -> FaceKey {
        self.face
    }
}

#[derive(Clone, Debug)]
pub struct Edge<E> {
    pub(crate) halfedge: HalfedgeKey,
    pub id: u32,
    pub data: E,
}

impl<E> Edge<E> {
    pub fn halfedge(&self) -> HalfedgeKey {
        self.halfedge
    }
}

#[derive(Clone, Debug)]
pub struct Face<F> {
    /// Representative of the outer boundary; `None` for the unbounded face.
    pub(crate) halfedge: Option<HalfedgeKey>,
    /// One representative per inner boundary cycle.
    pub(crate) holes: Vec<HalfedgeKey>,
    pub id: u32,
    pub data: F,
}

impl<F> Face<F> {
    pub fn halfedge(&self) -> Option<HalfedgeKey> {
        self.halfedge
    }

    pub fn holes(&self) -> &[HalfedgeKey] {
        &self.holes
    }

    pub fn is_unbounded(&self) -> bool {
        self.halfedge.is_none()
    }
}

/// The halfedge graph. Owns every vertex, halfedge, edge and face.
pub struct Graph<V, E = EdgeData, F = FaceData> {
    pub(crate) verts: Arena<VertexKey, Vertex<V>>,
    pub(crate) halfedges: Arena<HalfedgeKey, Halfedge>,
    pub(crate) edges: Arena<EdgeKey, Edge<E>>,
    pub(crate) faces: Arena<FaceKey, Face<F>>,
    unbounded: FaceKey,
    next_id: u32,
    id: GraphId,
}

impl<V, E, F: Default> Graph<V, E, F> {
    /// Create an empty graph: no vertices, no edges, one unbounded face.
    pub fn new() -> Self {
        let id = GraphId::fresh();
        let mut faces = Arena::new(id);
        let unbounded = faces.insert(Face {
            halfedge: None,
            holes: Vec::new(),
            id: 0,
            data: F::default(),
        });
        Graph {
            verts: Arena::new(id),
            halfedges: Arena::new(id),
            edges: Arena::new(id),
            faces,
            unbounded,
            next_id: 1,
            id,
        }
    }
}

impl<V, E, F: Default> Default for Graph<V, E, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E, F> Graph<V, E, F> {
    // ──────────────────────────── Element access ─────────────────────────────

    pub fn vertex(&self, v: VertexKey) -> Option<&Vertex<V>> {
        self.verts.get(v)
    }

    pub fn vertex_mut(&mut self, v: VertexKey) -> Option<&mut Vertex<V>> {
        self.verts.get_mut(v)
    }

    pub fn halfedge(&self, h: HalfedgeKey) -> Option<&Halfedge> {
        self.halfedges.get(h)
    }

    pub fn halfedge_mut(&mut self, h: HalfedgeKey) -> Option<&mut Halfedge> {
        self.halfedges.get_mut(h)
    }

    pub fn edge(&self, e: EdgeKey) -> Option<&Edge<E>> {
        self.edges.get(e)
    }

    pub fn edge_mut(&mut self, e: EdgeKey) -> Option<&mut Edge<E>> {
        self.edges.get_mut(e)
    }

    pub fn face(&self, f: FaceKey) -> Option<&Face<F>> {
        self.faces.get(f)
    }

    pub fn face_mut(&mut self, f: FaceKey) -> Option<&mut Face<F>> {
        self.faces.get_mut(f)
    }

    pub fn contains_vertex(&self, v: VertexKey) -> bool {
        self.verts.contains_key(v)
    }

    pub fn contains_edge(&self, e: EdgeKey) -> bool {
        self.edges.contains_key(e)
    }

    pub fn contains_face(&self, f: FaceKey) -> bool {
        self.faces.contains_key(f)
    }

    /// The face that extends to infinity.
    pub fn unbounded_face(&self) -> FaceKey {
        self.unbounded
    }

    /// Identity stamped on every key this graph issues.
    pub fn id(&self) -> GraphId {
        self.id
    }

    /// `v` must be a live vertex of this graph.
    pub(crate) fn check_vertex(&self, v: VertexKey) -> Result<()> {
        if v.graph() != self.id {
            return Err(Error::ForeignVertex(v));
        }
        if !self.verts.contains_key(v) {
            return Err(Error::VertexNotFound(v));
        }
        Ok(())
    }

    /// `e` must be a live edge of this graph.
    pub(crate) fn check_edge(&self, e: EdgeKey) -> Result<()> {
        if e.graph() != self.id {
            return Err(Error::ForeignEdge(e));
        }
        if !self.edges.contains_key(e) {
            return Err(Error::EdgeNotFound(e));
        }
        Ok(())
    }

    // ─────────────────────────────── Iteration ───────────────────────────────
    //
    // Each call yields a fresh pass over the live elements; order is
    // unspecified but stable while the graph is not mutated.

    pub fn vertices(&self) -> impl Iterator<Item = VertexKey> + '_ {
        self.verts.keys()
    }

    pub fn halfedges(&self) -> impl Iterator<Item = HalfedgeKey> + '_ {
        self.halfedges.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeKey> + '_ {
        self.edges.keys()
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceKey> + '_ {
        self.faces.keys()
    }

    pub fn vertex_count(&self) -> usize {
        self.verts.len()
    }

    pub fn halfedge_count(&self) -> usize {
        self.halfedges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Outer plus hole cycles over all faces.
    pub fn boundary_cycle_count(&self) -> usize {
        self.faces
            .values()
            .map(|f| f.holes.len() + usize::from(f.halfedge.is_some()))
            .sum()
    }

    // ──────────────── Navigation (panics on destroyed keys) ──────────────────

    #[inline]
    pub fn next(&self, h: HalfedgeKey) -> HalfedgeKey {
        self.halfedges[h].next
    }

    #[inline]
    pub fn prev(&self, h: HalfedgeKey) -> HalfedgeKey {
        self.halfedges[h].prev
    }

    #[inline]
    pub fn twin(&self, h: HalfedgeKey) -> HalfedgeKey {
        self.halfedges[h].twin
    }

    /// Origin vertex of `h`.
    #[inline]
    pub fn origin(&self, h: HalfedgeKey) -> VertexKey {
        self.halfedges[h].vertex
    }

    /// Destination vertex of `h` (origin of its twin).
    #[inline]
    pub fn destination(&self, h: HalfedgeKey) -> VertexKey {
        self.halfedges[self.halfedges[h].twin].vertex
    }

    #[inline]
    pub fn face_of(&self, h: HalfedgeKey) -> FaceKey {
        self.halfedges[h].face
    }

    #[inline]
    pub fn edge_of(&self, h: HalfedgeKey) -> EdgeKey {
        self.halfedges[h].edge
    }

    /// Both halfedges of `e`, representative first.
    pub fn edge_halfedges(&self, e: EdgeKey) -> (HalfedgeKey, HalfedgeKey) {
        let h = self.edges[e].halfedge;
        (h, self.halfedges[h].twin)
    }

    /// Both endpoint vertices of `e`.
    pub fn edge_vertices(&self, e: EdgeKey) -> (VertexKey, VertexKey) {
        let (h, t) = self.edge_halfedges(e);
        (self.origin(h), self.origin(t))
    }

    /// Outgoing halfedges of `v`, rotating clockwise (`twin.next`).
    pub fn outgoing(&self, v: VertexKey) -> Vec<HalfedgeKey> {
        let mut out = Vec::new();
        let start = match self.verts[v].halfedge {
            Some(h) => h,
            None => return out,
        };
        let limit = self.halfedges.len();
        let mut h = start;
        loop {
            out.push(h);
            assert!(
                out.len() <= limit,
                "rotation around vertex {} does not close",
                self.verts[v].id
            );
            h = self.next(self.twin(h));
            if h == start {
                break;
            }
        }
        out
    }

    /// Number of edges incident to `v`.
    pub fn degree(&self, v: VertexKey) -> usize {
        self.outgoing(v).len()
    }

    /// The edge joining `a` and `b`, if any.
    pub fn find_edge(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        self.outgoing(a)
            .into_iter()
            .find(|&h| self.destination(h) == b)
            .map(|h| self.edge_of(h))
    }

    /// Halfedges of the boundary cycle through `start`, in `next` order.
    pub fn cycle(&self, start: HalfedgeKey) -> Vec<HalfedgeKey> {
        let limit = self.halfedges.len();
        let mut out = Vec::new();
        let mut h = start;
        loop {
            out.push(h);
            assert!(
                out.len() <= limit,
                "boundary cycle through halfedge {} does not close",
                self.halfedges[start].id
            );
            h = self.halfedges[h].next;
            if h == start {
                break;
            }
        }
        out
    }

    /// True if `target` lies on the boundary cycle through `start`.
    pub fn cycle_contains(&self, start: HalfedgeKey, target: HalfedgeKey) -> bool {
        self.cycle(start).contains(&target)
    }

    /// Representatives of every boundary cycle of `f`, outer first.
    pub fn face_cycles(&self, f: FaceKey) -> Vec<HalfedgeKey> {
        let face = &self.faces[f];
        face.halfedge.iter().chain(face.holes.iter()).copied().collect()
    }

    /// Vertex ids around a cycle, e.g. `"3, 7, 4"`. Debug output only.
    pub fn describe_cycle(&self, start: HalfedgeKey) -> String {
        self.cycle(start)
            .into_iter()
            .map(|h| self.verts[self.origin(h)].id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ──────────────────────── Allocation helpers ─────────────────────────────

    fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn make_vertex(&mut self, data: V) -> VertexKey {
        let id = self.alloc_id();
        self.verts.insert(Vertex { halfedge: None, id, data })
    }

    pub(crate) fn make_face(&mut self, halfedge: Option<HalfedgeKey>) -> FaceKey
    where
        F: Default,
    {
        let id = self.alloc_id();
        self.faces.insert(Face {
            halfedge,
            holes: Vec::new(),
            id,
            data: F::default(),
        })
    }

    /// Allocate an edge with its two halfedges: `h` leaves `from`, its twin
    /// leaves `to`. Both sit on `face` and are linked only to each other;
    /// the caller splices them into the surrounding cycles.
    pub(crate) fn make_edge_pair(
        &mut self,
        from: VertexKey,
        to: VertexKey,
        face: FaceKey,
    ) -> (EdgeKey, HalfedgeKey, HalfedgeKey)
    where
        E: Default,
    {
        let edge_id = self.alloc_id();
        let h_id = self.alloc_id();
        let t_id = self.alloc_id();
        let null = HalfedgeKey::null_in(self.id);
        let e = self.edges.insert(Edge {
            halfedge: null,
            id: edge_id,
            data: E::default(),
        });
        let h = self.halfedges.insert(Halfedge {
            next: null,
            prev: null,
            twin: null,
            vertex: from,
            edge: e,
            face,
            id: h_id,
            data: HalfedgeData::default(),
        });
        let t = self.halfedges.insert(Halfedge {
            next: h,
            prev: h,
            twin: h,
            vertex: to,
            edge: e,
            face,
            id: t_id,
            data: HalfedgeData::default(),
        });
        let he = &mut self.halfedges[h];
        he.next = t;
        he.prev = t;
        he.twin = t;
        self.edges[e].halfedge = h;
        (e, h, t)
    }

    /// Remove an edge and both of its halfedges. The caller has already
    /// unlinked them from every cycle.
    pub(crate) fn kill_edge(&mut self, e: EdgeKey) {
        let (h, t) = self.edge_halfedges(e);
        self.halfedges.remove(h);
        self.halfedges.remove(t);
        self.edges.remove(e);
    }

    pub(crate) fn kill_face(&mut self, f: FaceKey) {
        debug_assert!(f != self.unbounded, "the unbounded face is never destroyed");
        self.faces.remove(f);
    }

    pub(crate) fn kill_vertex(&mut self, v: VertexKey) {
        self.verts.remove(v);
    }

    /// Point every halfedge of the cycle through `start` at `face`.
    pub(crate) fn relabel_cycle(&mut self, start: HalfedgeKey, face: FaceKey) {
        for h in self.cycle(start) {
            self.halfedges[h].face = face;
        }
    }

    /// Unregister every role `f` has on the cycle through `start`. Returns
    /// true if the cycle was the outer boundary.
    pub(crate) fn take_cycle_roles(&mut self, f: FaceKey, start: HalfedgeKey) -> bool {
        let members = self.cycle(start);
        let face = &mut self.faces[f];
        let was_outer = face.halfedge.map_or(false, |o| members.contains(&o));
        if was_outer {
            face.halfedge = None;
        }
        face.holes.retain(|r| !members.contains(r));
        was_outer
    }

    /// Role of the cycle through `h` on face `f`.
    pub(crate) fn cycle_role(&self, f: FaceKey, h: HalfedgeKey) -> CycleRole {
        let members = self.cycle(h);
        let face = &self.faces[f];
        if face.halfedge.map_or(false, |o| members.contains(&o)) {
            return CycleRole::Outer;
        }
        let registered = face.holes.iter().any(|r| members.contains(r));
        assert!(
            registered,
            "cycle through halfedge {} is not registered on face {}",
            self.halfedges[h].id, face.id
        );
        CycleRole::Hole
    }
}

/// How a boundary cycle is attached to its face.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CycleRole {
    Outer,
    Hole,
}

impl<V: Located, E, F> Graph<V, E, F> {
    // ─────────────────────────── Geometric queries ───────────────────────────

    #[inline]
    pub fn point(&self, v: VertexKey) -> Point {
        self.verts[v].data.point()
    }

    /// Origin points around the cycle through `start`.
    pub fn cycle_points(&self, start: HalfedgeKey) -> Vec<Point> {
        self.cycle(start)
            .into_iter()
            .map(|h| self.point(self.origin(h)))
            .collect()
    }

    pub fn cycle_signed_area(&self, start: HalfedgeKey) -> Real {
        signed_area(&self.cycle_points(start))
    }

    /// Orientation test: a cycle with negative signed area faces the
    /// unbounded side of its component.
    pub fn is_cycle_complemented(&self, start: HalfedgeKey) -> bool {
        self.cycle_signed_area(start) < 0.0
    }

    /// Rotate around `v` and return the first outgoing halfedge whose cycle
    /// is complemented.
    pub fn find_complemented_cycle_at_vertex(&self, v: VertexKey) -> Option<HalfedgeKey> {
        self.outgoing(v)
            .into_iter()
            .find(|&h| self.is_cycle_complemented(h))
    }

    /// Whether `f` is exterior: no outer boundary, or a complemented one.
    pub fn is_face_exterior(&self, f: FaceKey) -> bool {
        match self.faces[f].halfedge {
            None => true,
            Some(h) => self.is_cycle_complemented(h),
        }
    }

    pub fn point_in_cycle(&self, start: HalfedgeKey, p: Point) -> bool {
        point_in_polygon(&self.cycle_points(start), p)
    }

    /// The face whose region contains `p`: the smallest bounded face whose
    /// outer boundary encloses `p`, else the unbounded face.
    pub fn locate_face(&self, p: Point) -> FaceKey {
        let mut best: Option<(Real, FaceKey)> = None;
        for (f, face) in self.faces.iter() {
            let outer = match face.halfedge {
                Some(h) => h,
                None => continue,
            };
            let points = self.cycle_points(outer);
            if !point_in_polygon(&points, p) {
                continue;
            }
            let area = signed_area(&points).abs();
            if best.map_or(true, |(a, _)| area < a) {
                best = Some((area, f));
            }
        }
        best.map_or(self.unbounded, |(_, f)| f)
    }

    /// Closest vertex to `p` within `radius`.
    pub fn nearest_vertex(&self, p: Point, radius: Real) -> Option<VertexKey> {
        self.verts
            .iter()
            .map(|(k, v)| (v.data.point().distance(p), k))
            .filter(|&(d, _)| d <= radius)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, k)| k)
    }
}

impl<V, E, F> fmt::Display for Graph<V, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "graph: {} vertices, {} edges, {} halfedges, {} faces",
            self.vertex_count(),
            self.edge_count(),
            self.halfedge_count(),
            self.face_count()
        )
    }
}
