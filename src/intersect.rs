// Copyright 2025 Lars Brubaker
// License: MIT
//
// Pairwise segment intersection.
//
// Every pair of segments is tested. Each hit is recorded as a split point on
// the segments whose interior it falls in, so that cutting every segment at
// its split points yields pieces that meet only at their ends. A crossing
// point is computed once and shared by both segments, which keeps both
// pieces snapping to the same vertex.

use log::debug;

use crate::geom::{line_intersection_params, orient, project_param, Point, Real};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(a: Point, b: Point) -> Self {
        Segment { a, b }
    }

    /// A lone point, used to cut segments passing through it.
    pub fn point(p: Point) -> Self {
        Segment { a: p, b: p }
    }

    pub fn length(&self) -> Real {
        self.a.distance(self.b)
    }

    pub fn is_degenerate(&self, tolerance: Real) -> bool {
        self.length() <= tolerance
    }

    #[inline]
    fn at(&self, t: Real) -> Point {
        self.a.lerp(self.b, t)
    }

    /// True if `t` is more than `tolerance` away from both ends.
    fn is_interior(&self, t: Real, tolerance: Real) -> bool {
        let len = self.length();
        t * len > tolerance && (1.0 - t) * len > tolerance
    }

    /// Distance from `p` to the supporting line.
    fn line_distance(&self, p: Point) -> Real {
        let len = self.length();
        if len == 0.0 {
            self.a.distance(p)
        } else {
            orient(self.a, self.b, p).abs() / len
        }
    }
}

/// A point where a segment must be cut.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitPoint {
    /// Parameter along the segment, in `(0, 1)`.
    pub t: Real,
    pub point: Point,
    /// Set when two segments properly cross here.
    pub crossing: bool,
}

/// Split points of every segment, sorted by `t` with near-duplicates removed.
pub fn compute_splits(segments: &[Segment], tolerance: Real) -> Vec<Vec<SplitPoint>> {
    let mut splits: Vec<Vec<SplitPoint>> = vec![Vec::new(); segments.len()];

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            intersect_pair(segments, i, j, tolerance, &mut splits);
        }
    }

    let mut total = 0;
    for (seg, list) in segments.iter().zip(splits.iter_mut()) {
        sort_and_dedup(list, seg, tolerance);
        total += list.len();
    }
    debug!(
        "intersect: {} segments, {} split points",
        segments.len(),
        total
    );
    splits
}

fn intersect_pair(
    segments: &[Segment],
    i: usize,
    j: usize,
    tolerance: Real,
    splits: &mut [Vec<SplitPoint>],
) {
    let (s, q) = (&segments[i], &segments[j]);
    let s_point = s.is_degenerate(tolerance);
    let q_point = q.is_degenerate(tolerance);

    match (s_point, q_point) {
        (true, true) => {}
        (true, false) => split_at_point(q, s.a, j, tolerance, splits),
        (false, true) => split_at_point(s, q.a, i, tolerance, splits),
        (false, false) => match line_intersection_params(s.a, s.b, q.a, q.b, tolerance) {
            Some((t, u)) => crossing(s, q, t, u, i, j, tolerance, splits),
            None => overlap(s, q, i, j, tolerance, splits),
        },
    }
}

/// `p` cuts `seg` when it lies on the segment's interior.
fn split_at_point(
    seg: &Segment,
    p: Point,
    index: usize,
    tolerance: Real,
    splits: &mut [Vec<SplitPoint>],
) {
    if seg.line_distance(p) > tolerance {
        return;
    }
    let t = project_param(seg.a, seg.b, p);
    if seg.is_interior(t, tolerance) {
        splits[index].push(SplitPoint {
            t,
            point: p,
            crossing: false,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn crossing(
    s: &Segment,
    q: &Segment,
    t: Real,
    u: Real,
    i: usize,
    j: usize,
    tolerance: Real,
    splits: &mut [Vec<SplitPoint>],
) {
    let slack_s = tolerance / s.length();
    let slack_q = tolerance / q.length();
    if t < -slack_s || t > 1.0 + slack_s || u < -slack_q || u > 1.0 + slack_q {
        return;
    }
    let t = t.clamp(0.0, 1.0);
    let u = u.clamp(0.0, 1.0);
    let s_inner = s.is_interior(t, tolerance);
    let q_inner = q.is_interior(u, tolerance);

    // Prefer an exact input endpoint over a computed point.
    let point = if !s_inner {
        if t < 0.5 {
            s.a
        } else {
            s.b
        }
    } else if !q_inner {
        if u < 0.5 {
            q.a
        } else {
            q.b
        }
    } else {
        s.at(t)
    };
    let crossing = s_inner && q_inner;

    if s_inner {
        splits[i].push(SplitPoint { t, point, crossing });
    }
    if q_inner {
        splits[j].push(SplitPoint {
            t: u,
            point,
            crossing,
        });
    }
}

/// Parallel segments: if collinear, each is cut at the other's endpoints.
fn overlap(
    s: &Segment,
    q: &Segment,
    i: usize,
    j: usize,
    tolerance: Real,
    splits: &mut [Vec<SplitPoint>],
) {
    if s.line_distance(q.a) > tolerance || s.line_distance(q.b) > tolerance {
        return;
    }
    for p in [q.a, q.b] {
        split_at_point(s, p, i, tolerance, splits);
    }
    for p in [s.a, s.b] {
        split_at_point(q, p, j, tolerance, splits);
    }
}

fn sort_and_dedup(list: &mut Vec<SplitPoint>, seg: &Segment, tolerance: Real) {
    list.sort_by(|a, b| a.t.total_cmp(&b.t));
    let len = seg.length();
    list.dedup_by(|later, earlier| {
        let same = (later.t - earlier.t) * len <= tolerance;
        if same {
            earlier.crossing |= later.crossing;
        }
        same
    });
}
