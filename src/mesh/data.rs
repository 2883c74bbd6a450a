// Copyright 2025 Lars Brubaker
// License: MIT
//
// Default payloads carried by the graph built from polylines.

use super::{Graph, HalfedgeKey, Located, VertexKey};
use crate::geom::Point;

/// Per-vertex attributes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct VertexData {
    pub point: Point,
    /// Scratch flag for traversals.
    pub marked: bool,
    /// End of a dangling chain (degree 1).
    pub is_tail_point: bool,
    /// Created where two input segments cross.
    pub is_intersection_point: bool,
    /// Input point with no segment attached.
    pub is_singleton: bool,
}

impl VertexData {
    pub fn new(point: Point) -> Self {
        VertexData {
            point,
            ..Default::default()
        }
    }

    /// A vertex worth highlighting: a tail or a crossing.
    pub fn is_extraordinary(&self) -> bool {
        self.is_tail_point || self.is_intersection_point
    }
}

impl Located for VertexData {
    fn point(&self) -> Point {
        self.point
    }
}

impl From<Point> for VertexData {
    fn from(point: Point) -> Self {
        VertexData::new(point)
    }
}

/// Per-halfedge attributes. Every graph carries these.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct HalfedgeData {
    pub marked: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeData {
    pub marked: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FaceData {
    pub marked: bool,
}

/// Payloads with a scratch flag the linker can raise.
///
/// Edge removal marks the face it leaves behind when no faces merged and no
/// hole split off, so callers can find the faces whose shape changed.
pub trait Mark {
    fn set_marked(&mut self, marked: bool);
}

impl Mark for () {
    fn set_marked(&mut self, _marked: bool) {}
}

macro_rules! impl_mark {
    ($($ty:ty),*) => {
        $(impl Mark for $ty {
            fn set_marked(&mut self, marked: bool) {
                self.marked = marked;
            }
        })*
    };
}

impl_mark!(VertexData, HalfedgeData, EdgeData, FaceData);

/// Graph built by the polyline embedder.
pub type PlanarGraph = Graph<VertexData, EdgeData, FaceData>;

impl Graph<VertexData, EdgeData, FaceData> {
    /// Reset the scratch flag on every vertex, halfedge, edge and face.
    pub fn clear_marks(&mut self) {
        for v in self.verts.values_mut() {
            v.data.marked = false;
        }
        for h in self.halfedges.values_mut() {
            h.data.marked = false;
        }
        for e in self.edges.values_mut() {
            e.data.marked = false;
        }
        for f in self.faces.values_mut() {
            f.data.marked = false;
        }
    }

    /// A halfedge is extraordinary when its origin is.
    pub fn is_halfedge_extraordinary(&self, h: HalfedgeKey) -> bool {
        self.halfedges
            .get(h)
            .and_then(|he| self.verts.get(he.vertex))
            .map_or(false, |v| v.data.is_extraordinary())
    }

    /// Vertices flagged as tails or crossings.
    pub fn extraordinary_vertices(&self) -> Vec<VertexKey> {
        self.verts
            .iter()
            .filter(|(_, v)| v.data.is_extraordinary())
            .map(|(k, _)| k)
            .collect()
    }
}
