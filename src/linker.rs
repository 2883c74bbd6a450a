// Copyright 2025 Lars Brubaker
// License: MIT
//
// Topology linker: the edge-level surgery that keeps the graph a valid
// planar subdivision.
//
//   insert_edge   link a straight edge between two vertices, splitting a
//                 face or joining two boundary cycles
//   remove_edge   unlink an edge, merging faces or detaching a hole
//   split_edge    put a new vertex on an edge
//
// The planarity contract (a new edge crosses nothing) is the caller's; the
// embedder guarantees it by splitting segments at every intersection first.


use log::{trace, warn};

use crate::error::{Error, Result};
use crate::geom::{ccw_angle, point_in_polygon, segment_distance, Point, DEFAULT_TOLERANCE};
use crate::mesh::{CycleRole, EdgeKey, FaceKey, Graph, HalfedgeKey, Located, Mark, VertexKey};

/// What an edge insertion did to the graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EdgeInsertion {
    pub edge: EdgeKey,
    /// The halfedge running from the first vertex to the second.
    pub halfedge: HalfedgeKey,
    /// The face the edge was drawn in.
    pub face: FaceKey,
    /// Set when the edge closed a region off into a new face.
    pub new_face: Option<FaceKey>,
    /// Set when the edge joined two boundary cycles into one.
    pub joined_cycles: bool,
}

/// Options for [`Graph::remove_edge`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoveParams {
    /// Destroy endpoints left with no edges instead of keeping them lonely.
    pub erase_lonely_vertices: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceMerge {
    pub survivor: FaceKey,
    pub removed: FaceKey,
}

/// What an edge removal did to the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeRemoval {
    /// The face that now covers the removed edge.
    pub face: FaceKey,
    pub merged: Option<FaceMerge>,
    /// Representative of a boundary cycle split off as a new hole.
    pub detached_hole: Option<HalfedgeKey>,
    pub erased_vertices: Vec<VertexKey>,
    pub lonely_vertices: Vec<VertexKey>,
}

impl<V: Located, E: Default, F: Default + Mark> Graph<V, E, F> {
    // ──────────────────────────── Public linker ──────────────────────────────

    /// Add a vertex with no edges. Its face is found from its position the
    /// first time an edge reaches it.
    pub fn link_island_vertex(&mut self, data: V) -> VertexKey {
        let v = self.make_vertex(data);
        trace!("link_island_vertex {}", self.verts[v].id);
        v
    }

    /// Link a straight edge from `v1` to `v2`.
    ///
    /// The segment must not cross existing edges. Each endpoint with edges
    /// contributes the wedge the segment leaves through; both wedges must
    /// open onto the same face.
    pub fn insert_edge(&mut self, v1: VertexKey, v2: VertexKey) -> Result<EdgeInsertion> {
        self.check_vertex(v1)?;
        self.check_vertex(v2)?;
        let id1 = self.verts[v1].id;
        let id2 = self.verts[v2].id;
        if v1 == v2 {
            return Err(Error::SelfLoop(id1));
        }
        let p1 = self.point(v1);
        let p2 = self.point(v2);
        if p1 == p2 {
            return Err(Error::CoincidentVertices(id1, id2));
        }
        if self.find_edge(v1, v2).is_some() {
            return Err(Error::EdgeExists(id1, id2));
        }

        let a = self.wedge(v1, p2 - p1);
        let b = self.wedge(v2, p1 - p2);

        let face = match (a, b) {
            (Some(a), Some(b)) => {
                let (fa, fb) = (self.face_of(a), self.face_of(b));
                if fa != fb {
                    return Err(Error::FaceMismatch(self.faces[fa].id, self.faces[fb].id));
                }
                fa
            }
            (Some(a), None) => self.face_of(a),
            (None, Some(b)) => self.face_of(b),
            (None, None) => self.locate_face(p1.midpoint(p2)),
        };

        // Measure everything that depends on the old cycles before relinking.
        let same_cycle = match (a, b) {
            (Some(a), Some(b)) => self.cycle_contains(a, b),
            _ => false,
        };
        // A split cycle is registered afresh as two halves.
        let split_role = match a {
            Some(a) if same_cycle => Some(if self.take_cycle_roles(face, a) {
                CycleRole::Outer
            } else {
                CycleRole::Hole
            }),
            _ => None,
        };
        let (edge, n, t) = self.make_edge_pair(v1, v2, face);
        let a_prev = a.map(|a| self.prev(a));
        let b_prev = b.map(|b| self.prev(b));

        match (a, a_prev) {
            (Some(a), Some(p)) => {
                self.halfedges[p].next = n;
                self.halfedges[n].prev = p;
                self.halfedges[t].next = a;
                self.halfedges[a].prev = t;
            }
            _ => {
                self.halfedges[t].next = n;
                self.halfedges[n].prev = t;
                self.verts[v1].halfedge = Some(n);
            }
        }
        match (b, b_prev) {
            (Some(b), Some(p)) => {
                self.halfedges[p].next = t;
                self.halfedges[t].prev = p;
                self.halfedges[n].next = b;
                self.halfedges[b].prev = n;
            }
            _ => {
                self.halfedges[n].next = t;
                self.halfedges[t].prev = n;
                self.verts[v2].halfedge = Some(t);
            }
        }

        let mut new_face = None;
        let mut joined_cycles = false;
        match (a, b) {
            (None, None) => {
                self.faces[face].holes.push(n);
                trace!("insert_edge {id1} -> {id2}: new component in face {}", self.faces[face].id);
            }
            (Some(_), None) | (None, Some(_)) => {
                trace!("insert_edge {id1} -> {id2}: tail in face {}", self.faces[face].id);
            }
            (Some(_), Some(_)) if !same_cycle => {
                // Both old registrations now sit on one cycle; keep one.
                let was_outer = self.take_cycle_roles(face, n);
                self.register_cycle(face, n, was_outer);
                joined_cycles = true;
                trace!("insert_edge {id1} -> {id2}: joined two cycles of face {}", self.faces[face].id);
            }
            (Some(_), Some(_)) => {
                let role = split_role.unwrap_or(CycleRole::Hole);
                let g = self.split_face(face, n, t, role);
                new_face = Some(g);
                trace!(
                    "insert_edge {id1} -> {id2}: split face {} off face {}",
                    self.faces[g].id,
                    self.faces[face].id
                );
            }
        }

        Ok(EdgeInsertion {
            edge,
            halfedge: n,
            face,
            new_face,
            joined_cycles,
        })
    }

    /// Unlink `edge`. Faces on its two sides merge; a bridge splits its
    /// boundary cycle in two instead. Never increases the face count.
    ///
    /// When neither happens (a tail or an isolated segment goes) the face
    /// is marked.
    pub fn remove_edge(&mut self, edge: EdgeKey, params: RemoveParams) -> Result<EdgeRemoval> {
        self.check_edge(edge)?;
        let (h, t) = self.edge_halfedges(edge);
        let v1 = self.origin(h);
        let v2 = self.origin(t);
        let deg1 = self.degree(v1);
        let deg2 = self.degree(v2);
        let f1 = self.face_of(h);
        let f2 = self.face_of(t);
        let hn = self.next(h);
        let tn = self.next(t);

        let edge_id = self.edges[edge].id;
        let mut removal = EdgeRemoval {
            face: f1,
            merged: None,
            detached_hole: None,
            erased_vertices: Vec::new(),
            lonely_vertices: Vec::new(),
        };

        if f1 != f2 {
            assert!(
                deg1 > 1 && deg2 > 1,
                "edge {edge_id} separates two faces but has a dangling endpoint"
            );
            let r1 = self.cycle_role(f1, h);
            let r2 = self.cycle_role(f2, t);
            self.take_cycle_roles(f1, h);
            self.take_cycle_roles(f2, t);
            self.unlink(h, t, deg1, deg2);
            let (id1, id2) = (self.faces[f1].id, self.faces[f2].id);
            let merge = self.merge_faces(f1, f2, r1, r2, hn);
            trace!("remove_edge {edge_id}: merged faces {id1} and {id2}");
            removal.face = merge.survivor;
            removal.merged = Some(merge);
        } else {
            let face = f1;
            let was_outer = self.take_cycle_roles(face, h);
            self.unlink(h, t, deg1, deg2);
            match (deg1 > 1, deg2 > 1) {
                (true, true) => {
                    // A bridge: the cycle falls apart into hn's and tn's.
                    let (x, y) = (hn, tn);
                    let detached = if was_outer {
                        let (outer, hole) = if self.cycle_signed_area(x) >= self.cycle_signed_area(y) {
                            (x, y)
                        } else {
                            (y, x)
                        };
                        self.faces[face].halfedge = Some(outer);
                        self.faces[face].holes.push(hole);
                        hole
                    } else {
                        self.faces[face].holes.push(x);
                        self.faces[face].holes.push(y);
                        y
                    };
                    removal.detached_hole = Some(detached);
                    trace!(
                        "remove_edge {edge_id}: detached hole in face {}",
                        self.faces[face].id
                    );
                }
                (true, false) => {
                    self.register_cycle(face, tn, was_outer);
                    self.faces[face].data.set_marked(true);
                }
                (false, true) => {
                    self.register_cycle(face, hn, was_outer);
                    self.faces[face].data.set_marked(true);
                }
                (false, false) => {
                    self.faces[face].data.set_marked(true);
                    trace!(
                        "remove_edge {edge_id}: dropped isolated segment from face {}",
                        self.faces[face].id
                    );
                }
            }
        }

        for (v, deg) in [(v1, deg1), (v2, deg2)] {
            if deg > 1 {
                continue;
            }
            if params.erase_lonely_vertices {
                self.kill_vertex(v);
                removal.erased_vertices.push(v);
            } else {
                self.verts[v].halfedge = None;
                removal.lonely_vertices.push(v);
            }
        }

        self.kill_edge(edge);
        Ok(removal)
    }

    /// Put a new vertex carrying `data` on `edge`. The edge keeps its key
    /// for the half nearest its representative's origin; a new edge covers
    /// the other half. Faces are unchanged.
    ///
    /// The point must lie inside the edge: within tolerance of the segment
    /// (scaled by its length past unit size) and clear of both endpoints.
    /// Otherwise `PointOffEdge` is returned and nothing changes.
    pub fn split_edge(&mut self, edge: EdgeKey, data: V) -> Result<VertexKey> {
        self.check_edge(edge)?;
        let (u, w) = self.edge_vertices(edge);
        let (a, b, p) = (self.point(u), self.point(w), data.point());
        let tol = DEFAULT_TOLERANCE * a.distance(b).max(1.0);
        if segment_distance(a, b, p) > tol || p.distance(a) <= tol || p.distance(b) <= tol {
            return Err(Error::PointOffEdge(self.edges[edge].id));
        }
        let m = self.make_vertex(data);
        self.split_edge_at(edge, m)?;
        Ok(m)
    }

    /// Split `edge` at an existing lonely vertex `m`. Returns the new edge
    /// running from `m` to the far end.
    pub(crate) fn split_edge_at(&mut self, edge: EdgeKey, m: VertexKey) -> Result<EdgeKey> {
        self.check_edge(edge)?;
        self.check_vertex(m)?;
        assert!(
            self.verts[m].halfedge.is_none(),
            "edge {} can only be split at a lonely vertex",
            self.edges[edge].id
        );
        let (h, t) = self.edge_halfedges(edge);
        let w = self.origin(t);
        let hn = self.next(h);
        let tp = self.prev(t);
        let (fh, ft) = (self.face_of(h), self.face_of(t));

        let (e2, h2, t2) = self.make_edge_pair(m, w, fh);
        self.halfedges[t2].face = ft;

        // A dangling `w` turns h straight back into t; keep that turn on
        // the new pair.
        let hn = if hn == t { t2 } else { hn };
        let tp = if tp == h { h2 } else { tp };

        self.halfedges[h].next = h2;
        self.halfedges[h2].prev = h;
        self.halfedges[h2].next = hn;
        self.halfedges[hn].prev = h2;
        self.halfedges[tp].next = t2;
        self.halfedges[t2].prev = tp;
        self.halfedges[t2].next = t;
        self.halfedges[t].prev = t2;

        self.halfedges[t].vertex = m;
        self.verts[m].halfedge = Some(h2);
        if self.verts[w].halfedge == Some(t) {
            self.verts[w].halfedge = Some(t2);
        }

        trace!(
            "split_edge {}: vertex {}, new edge {}",
            self.edges[edge].id,
            self.verts[m].id,
            self.edges[e2].id
        );
        Ok(e2)
    }

    // ──────────────────────────── Internal helpers ───────────────────────────

    /// Direction of `h` from its origin.
    fn direction(&self, h: HalfedgeKey) -> Point {
        self.point(self.destination(h)) - self.point(self.origin(h))
    }

    /// The outgoing halfedge at `v` that bounds, clockwise, the wedge
    /// containing direction `dir`: the one reached first when rotating
    /// clockwise from `dir`. `None` for a lonely vertex.
    fn wedge(&self, v: VertexKey, dir: Point) -> Option<HalfedgeKey> {
        self.outgoing(v)
            .into_iter()
            .map(|h| (ccw_angle(self.direction(h), dir), h))
            .min_by(|x, y| x.0.total_cmp(&y.0))
            .map(|(_, h)| h)
    }

    /// The cycle through `n` and `t` was just cut in two by a new edge.
    /// Give one side to a new face and move enclosed holes across.
    fn split_face(
        &mut self,
        face: FaceKey,
        n: HalfedgeKey,
        t: HalfedgeKey,
        role: CycleRole,
    ) -> FaceKey {
        let (inner, rest) = match role {
            CycleRole::Outer => (n, t),
            CycleRole::Hole => {
                if self.cycle_signed_area(n) >= self.cycle_signed_area(t) {
                    (n, t)
                } else {
                    (t, n)
                }
            }
        };
        let g = self.make_face(Some(inner));
        self.relabel_cycle(inner, g);

        let polygon = self.cycle_points(inner);
        let holes = std::mem::take(&mut self.faces[face].holes);
        let (moved, kept): (Vec<_>, Vec<_>) = holes
            .into_iter()
            .partition(|&r| point_in_polygon(&polygon, self.point(self.origin(r))));
        for &r in &moved {
            self.relabel_cycle(r, g);
        }
        self.faces[g].holes = moved;
        self.faces[face].holes = kept;

        match role {
            CycleRole::Outer => self.faces[face].halfedge = Some(rest),
            CycleRole::Hole => self.faces[face].holes.push(rest),
        }
        g
    }

    /// Splice out the twin pair `h`/`t` of an edge, keeping both endpoint
    /// rotations closed. Lonely endpoints are left for the caller.
    fn unlink(&mut self, h: HalfedgeKey, t: HalfedgeKey, deg1: usize, deg2: usize) {
        let (hn, hp) = (self.next(h), self.prev(h));
        let (tn, tp) = (self.next(t), self.prev(t));
        let v1 = self.origin(h);
        let v2 = self.origin(t);
        if deg2 > 1 {
            self.halfedges[tp].next = hn;
            self.halfedges[hn].prev = tp;
            self.verts[v2].halfedge = Some(hn);
        }
        if deg1 > 1 {
            self.halfedges[hp].next = tn;
            self.halfedges[tn].prev = hp;
            self.verts[v1].halfedge = Some(tn);
        }
    }

    fn register_cycle(&mut self, face: FaceKey, rep: HalfedgeKey, as_outer: bool) {
        if as_outer {
            self.faces[face].halfedge = Some(rep);
        } else {
            self.faces[face].holes.push(rep);
        }
    }

    /// Fold the two faces of a removed edge into the one with the lower id.
    /// `merged` lies on the joined boundary cycle, whose registrations have
    /// already been taken off both faces.
    fn merge_faces(
        &mut self,
        f1: FaceKey,
        f2: FaceKey,
        r1: CycleRole,
        r2: CycleRole,
        merged: HalfedgeKey,
    ) -> FaceMerge {
        let (survivor, removed) = if self.faces[f1].id <= self.faces[f2].id {
            (f1, f2)
        } else {
            (f2, f1)
        };

        let outer = match (r1, r2) {
            (CycleRole::Outer, CycleRole::Outer) => Some(merged),
            (CycleRole::Outer, CycleRole::Hole) => self.faces[f2].halfedge,
            (CycleRole::Hole, CycleRole::Outer) => self.faces[f1].halfedge,
            (CycleRole::Hole, CycleRole::Hole) => {
                warn!(
                    "faces {} and {} meet along two hole boundaries",
                    self.faces[f1].id, self.faces[f2].id
                );
                self.faces[survivor].halfedge
            }
        };
        let merged_is_hole = !matches!((r1, r2), (CycleRole::Outer, CycleRole::Outer));

        let mut holes = std::mem::take(&mut self.faces[removed].holes);
        holes.append(&mut self.faces[survivor].holes);
        if merged_is_hole {
            holes.push(merged);
        }
        self.faces[survivor].halfedge = outer;
        self.faces[survivor].holes = holes;
        self.kill_face(removed);

        for rep in self.face_cycles(survivor) {
            self.relabel_cycle(rep, survivor);
        }
        FaceMerge { survivor, removed }
    }
}
