// Copyright 2025 Lars Brubaker
// License: MIT
//
// Graph-stamped keys and the slot arenas they index.
//
// A slot-map key names only a slot and its generation, so two graphs hand out
// identical keys. Every public key also records the graph that issued it, and
// an arena treats a key stamped by another graph as absent.

use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::{new_key_type, Key, SlotMap};

static NEXT_GRAPH_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique identity of one graph.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphId(u32);

impl GraphId {
    pub(crate) fn fresh() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

pub(crate) trait GraphKey: Copy + fmt::Debug {
    type Slot: Key;

    fn from_parts(slot: Self::Slot, owner: GraphId) -> Self;
    fn slot(self) -> Self::Slot;
    fn owner(self) -> GraphId;

    /// A placeholder key that resolves nowhere.
    fn null_in(owner: GraphId) -> Self {
        Self::from_parts(Self::Slot::null(), owner)
    }
}

macro_rules! graph_keys {
    ($($(#[$doc:meta])* $name:ident => $slot:ident;)*) => {
        new_key_type! {
            $(pub(crate) struct $slot;)*
        }

        $(
            $(#[$doc])*
            #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $name {
                slot: $slot,
                graph: GraphId,
            }

            impl $name {
                /// The graph that issued this key.
                pub fn graph(&self) -> GraphId {
                    self.graph
                }
            }

            impl GraphKey for $name {
                type Slot = $slot;

                fn from_parts(slot: $slot, owner: GraphId) -> Self {
                    $name { slot, graph: owner }
                }

                fn slot(self) -> $slot {
                    self.slot
                }

                fn owner(self) -> GraphId {
                    self.graph
                }
            }

            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}({:?}@g{})", stringify!($name), self.slot.data(), self.graph.0)
                }
            }
        )*
    };
}

graph_keys! {
    /// Key for a vertex.
    VertexKey => VertexSlot;

    /// Key for one directed side of an edge.
    HalfedgeKey => HalfedgeSlot;

    /// Key for an undirected edge (a twin pair of halfedges).
    EdgeKey => EdgeSlot;

    /// Key for a face.
    FaceKey => FaceSlot;
}

/// Slot map that stamps the keys it issues with its graph.
pub(crate) struct Arena<K: GraphKey, T> {
    graph: GraphId,
    slots: SlotMap<K::Slot, T>,
}

impl<K: GraphKey, T> Arena<K, T> {
    pub(crate) fn new(graph: GraphId) -> Self {
        Arena {
            graph,
            slots: SlotMap::with_key(),
        }
    }

    #[inline]
    fn local(&self, k: K) -> Option<K::Slot> {
        (k.owner() == self.graph).then(|| k.slot())
    }

    pub(crate) fn insert(&mut self, value: T) -> K {
        K::from_parts(self.slots.insert(value), self.graph)
    }

    #[inline]
    pub(crate) fn get(&self, k: K) -> Option<&T> {
        self.local(k).and_then(|s| self.slots.get(s))
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, k: K) -> Option<&mut T> {
        let s = self.local(k)?;
        self.slots.get_mut(s)
    }

    #[inline]
    pub(crate) fn contains_key(&self, k: K) -> bool {
        self.get(k).is_some()
    }

    pub(crate) fn remove(&mut self, k: K) -> Option<T> {
        let s = self.local(k)?;
        self.slots.remove(s)
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = K> + '_ {
        let graph = self.graph;
        self.slots.keys().map(move |s| K::from_parts(s, graph))
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.slots.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.slots.values_mut()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        let graph = self.graph;
        self.slots.iter().map(move |(s, v)| (K::from_parts(s, graph), v))
    }
}

impl<K: GraphKey, T> Index<K> for Arena<K, T> {
    type Output = T;

    #[inline]
    fn index(&self, k: K) -> &T {
        match self.get(k) {
            Some(v) => v,
            None => panic!("{k:?} is stale or belongs to another graph"),
        }
    }
}

impl<K: GraphKey, T> IndexMut<K> for Arena<K, T> {
    #[inline]
    fn index_mut(&mut self, k: K) -> &mut T {
        match self.get_mut(k) {
            Some(v) => v,
            None => panic!("{k:?} is stale or belongs to another graph"),
        }
    }
}
