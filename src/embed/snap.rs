// Copyright 2025 Lars Brubaker
// License: MIT
//
// Grid index that merges points closer than the tolerance into one vertex.
//
// Cells are `tolerance` wide, so any vertex within `tolerance` of a query
// point sits in the query's cell or one of its eight neighbours.
//
// Cell coordinates are clamped to +-2^62. Points farther out than that many
// cells share the border cells, which keeps lookups correct (distances are
// still compared) and only makes those buckets slower.

use rustc_hash::FxHashMap;

use crate::geom::{Point, Real};
use crate::mesh::{PlanarGraph, VertexData, VertexKey};

type Cell = (i64, i64);

const CELL_LIMIT: Real = (1u64 << 62) as Real;

pub struct VertexIndex {
    tolerance: Real,
    cell: Real,
    cells: FxHashMap<Cell, Vec<VertexKey>>,
}

impl VertexIndex {
    pub fn new(tolerance: Real) -> Self {
        VertexIndex {
            tolerance,
            cell: tolerance.max(Real::EPSILON),
            cells: FxHashMap::default(),
        }
    }

    /// Index every vertex already in `graph`.
    pub fn from_graph(graph: &PlanarGraph, tolerance: Real) -> Self {
        let mut index = VertexIndex::new(tolerance);
        for v in graph.vertices() {
            index.insert(graph.point(v), v);
        }
        index
    }

    fn cell_of(&self, p: Point) -> Cell {
        (self.axis_cell(p.x), self.axis_cell(p.y))
    }

    #[inline]
    fn axis_cell(&self, x: Real) -> i64 {
        (x / self.cell).floor().clamp(-CELL_LIMIT, CELL_LIMIT) as i64
    }

    pub fn insert(&mut self, p: Point, v: VertexKey) {
        let cell = self.cell_of(p);
        self.cells.entry(cell).or_default().push(v);
    }

    /// Nearest indexed vertex within the tolerance of `p`.
    pub fn find(&self, graph: &PlanarGraph, p: Point) -> Option<VertexKey> {
        let (cx, cy) = self.cell_of(p);
        let mut best: Option<(Real, VertexKey)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let bucket = match self.cells.get(&(cx + dx, cy + dy)) {
                    Some(b) => b,
                    None => continue,
                };
                for &v in bucket {
                    if !graph.contains_vertex(v) {
                        continue;
                    }
                    let d = graph.point(v).distance(p);
                    if d <= self.tolerance && best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, v));
                    }
                }
            }
        }
        best.map(|(_, v)| v)
    }

    /// The vertex at `p`, creating an island vertex if none is close enough.
    /// The flag is true when the vertex was created.
    pub fn find_or_insert(&mut self, graph: &mut PlanarGraph, p: Point) -> (VertexKey, bool) {
        if let Some(v) = self.find(graph, p) {
            return (v, false);
        }
        let v = graph.link_island_vertex(VertexData::new(p));
        self.insert(p, v);
        (v, true)
    }
}
