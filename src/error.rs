// Copyright 2025 Lars Brubaker
// License: MIT
//
// Error types for graph editing and validation.

use crate::mesh::{EdgeKey, VertexKey};

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Precondition failures reported to the caller. None of these leave the
/// graph modified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("vertex not found: {0:?}")]
    VertexNotFound(VertexKey),

    #[error("edge not found: {0:?}")]
    EdgeNotFound(EdgeKey),

    /// The key was issued by a different graph.
    #[error("vertex {0:?} belongs to another graph")]
    ForeignVertex(VertexKey),

    #[error("edge {0:?} belongs to another graph")]
    ForeignEdge(EdgeKey),

    /// Both endpoints of a new edge are the same vertex.
    #[error("cannot link vertex {0} to itself")]
    SelfLoop(u32),

    /// Two distinct vertices sit on the same point, so no direction exists.
    #[error("vertices {0} and {1} are coincident")]
    CoincidentVertices(u32, u32),

    #[error("vertices {0} and {1} are already joined by an edge")]
    EdgeExists(u32, u32),

    /// The two endpoints open onto different faces, so the segment would
    /// cross existing edges.
    #[error("endpoints open onto different faces ({0} and {1})")]
    FaceMismatch(u32, u32),

    /// A split point off the edge, or on one of its endpoints.
    #[error("split point does not lie inside edge {0}")]
    PointOffEdge(u32),

    #[error("hole polyline needs at least three distinct points and must be closed")]
    DegenerateHole,

    #[error("hole polyline touches existing geometry or itself")]
    HoleNotIsolated,
}

/// A broken DCEL invariant found by [`Graph::validate`](crate::mesh::Graph::validate).
/// Ids are the stable element ids, not slot keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    #[error("{halfedges} halfedges for {edges} edges")]
    HalfedgeCount { halfedges: usize, edges: usize },

    #[error("halfedge {0} references a destroyed element")]
    DanglingReference(u32),

    #[error("halfedge {0}: twin.twin does not lead back")]
    TwinAsymmetry(u32),

    #[error("halfedge {0}: next.prev does not lead back")]
    NextPrevMismatch(u32),

    #[error("halfedge {0}: next does not start where the halfedge ends")]
    BrokenChain(u32),

    #[error("halfedge {0}: next lies on a different face")]
    FaceLabelMismatch(u32),

    #[error("edge {0}: representative halfedge belongs to another edge")]
    EdgeBackPointer(u32),

    #[error("vertex {0}: representative halfedge does not start at the vertex")]
    VertexBackPointer(u32),

    #[error("vertex {0} has no halfedge but edges leave it")]
    LonelyVertexWithEdges(u32),

    #[error("face {0}: boundary cycle is labelled with another face")]
    FaceBackPointer(u32),

    #[error("halfedge {0} is on no registered boundary cycle")]
    UnregisteredCycle(u32),

    #[error("halfedge {0} is on a boundary cycle registered twice")]
    DuplicateCycle(u32),

    #[error("expected exactly one unbounded face, found {0}")]
    UnboundedFaceCount(usize),
}
