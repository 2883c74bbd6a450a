// Copyright 2025 Lars Brubaker
// License: MIT
//
// Structural consistency checks over the whole graph.
//
// The checks run as passes, one invariant each. A pass may index anything
// the passes before it proved live, so a corruption is always reported as
// the most basic invariant it breaks, whatever the iteration order.

use rustc_hash::FxHashSet;

use super::{Graph, HalfedgeKey};
use crate::error::InvariantViolation;

type Check = Result<(), InvariantViolation>;

impl<V, E, F> Graph<V, E, F> {
    /// Check every DCEL invariant. Returns the first violation found.
    pub fn validate(&self) -> Check {
        self.check_counts()?;
        self.check_halfedge_links()?;
        self.check_back_pointers()?;
        self.check_cycle_registration()
    }

    /// Panics with the violated invariant when the graph is inconsistent.
    pub fn assert_valid(&self) {
        if let Err(violation) = self.validate() {
            panic!("halfedge graph is inconsistent: {violation}");
        }
    }

    fn check_counts(&self) -> Check {
        if self.halfedges.len() != 2 * self.edges.len() {
            return Err(InvariantViolation::HalfedgeCount {
                halfedges: self.halfedges.len(),
                edges: self.edges.len(),
            });
        }
        let unbounded = self.faces.values().filter(|f| f.halfedge.is_none()).count();
        if unbounded != 1 {
            return Err(InvariantViolation::UnboundedFaceCount(unbounded));
        }
        Ok(())
    }

    fn check_halfedge_links(&self) -> Check {
        for he in self.halfedges.values() {
            let live = self.halfedges.contains_key(he.next)
                && self.halfedges.contains_key(he.prev)
                && self.halfedges.contains_key(he.twin)
                && self.verts.contains_key(he.vertex)
                && self.edges.contains_key(he.edge)
                && self.faces.contains_key(he.face);
            if !live {
                return Err(InvariantViolation::DanglingReference(he.id));
            }
        }

        for (h, he) in self.halfedges.iter() {
            let twin = &self.halfedges[he.twin];
            if he.twin == h || twin.twin != h || twin.edge != he.edge {
                return Err(InvariantViolation::TwinAsymmetry(he.id));
            }
        }

        // With next.prev inverting next everywhere, next is a permutation,
        // so prev.next holds too and every cycle closes.
        for (h, he) in self.halfedges.iter() {
            if self.halfedges[he.next].prev != h {
                return Err(InvariantViolation::NextPrevMismatch(he.id));
            }
        }

        for he in self.halfedges.values() {
            if self.halfedges[he.next].vertex != self.halfedges[he.twin].vertex {
                return Err(InvariantViolation::BrokenChain(he.id));
            }
        }

        for he in self.halfedges.values() {
            if self.halfedges[he.next].face != he.face {
                return Err(InvariantViolation::FaceLabelMismatch(he.id));
            }
        }
        Ok(())
    }

    fn check_back_pointers(&self) -> Check {
        for (e, edge) in self.edges.iter() {
            if self.halfedges.get(edge.halfedge).map(|h| h.edge) != Some(e) {
                return Err(InvariantViolation::EdgeBackPointer(edge.id));
            }
        }

        for (v, vert) in self.verts.iter() {
            if let Some(h) = vert.halfedge {
                if self.halfedges.get(h).map(|he| he.vertex) != Some(v) {
                    return Err(InvariantViolation::VertexBackPointer(vert.id));
                }
            }
        }

        for he in self.halfedges.values() {
            let origin = &self.verts[he.vertex];
            if origin.halfedge.is_none() {
                return Err(InvariantViolation::LonelyVertexWithEdges(origin.id));
            }
        }
        Ok(())
    }

    /// Every halfedge is reached by exactly one registered cycle.
    fn check_cycle_registration(&self) -> Check {
        let mut seen: FxHashSet<HalfedgeKey> = FxHashSet::default();
        for (f, face) in self.faces.iter() {
            for rep in face.halfedge.iter().chain(face.holes.iter()).copied() {
                if !self.halfedges.contains_key(rep) {
                    return Err(InvariantViolation::FaceBackPointer(face.id));
                }
                for h in self.cycle(rep) {
                    let he = &self.halfedges[h];
                    if he.face != f {
                        return Err(InvariantViolation::FaceBackPointer(face.id));
                    }
                    if !seen.insert(h) {
                        return Err(InvariantViolation::DuplicateCycle(he.id));
                    }
                }
            }
        }
        match self.halfedges.iter().find(|(h, _)| !seen.contains(h)) {
            Some((_, he)) => Err(InvariantViolation::UnregisteredCycle(he.id)),
            None => Ok(()),
        }
    }
}
