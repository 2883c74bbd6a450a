// planar-dcel: halfedge planar subdivision built from intersecting polylines
// Copyright 2025 Lars Brubaker
// License: MIT

pub mod embed;
pub mod error;
pub mod geom;
pub mod intersect;
pub mod linker;
pub mod mesh;
pub mod post;

pub use embed::{embed, embed_hole, embed_polyline, EmbedSummary, Embedder, HoleEmbedding};
pub use error::{Error, InvariantViolation, Result};
pub use geom::{Circle, Point, Polyline, Real, DEFAULT_TOLERANCE};
pub use linker::{EdgeInsertion, EdgeRemoval, FaceMerge, RemoveParams};
pub use mesh::{
    EdgeData, EdgeKey, FaceData, FaceKey, Graph, GraphId, HalfedgeData, HalfedgeKey, Located,
    Mark, PlanarGraph, VertexData, VertexKey,
};
pub use post::{
    generate_edge_infos, generate_face_infos, halfedges_to_edges, EdgeInfo, FaceInfo,
    HalfedgeInfo, PostProcessor,
};
