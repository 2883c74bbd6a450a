// Copyright 2025 Lars Brubaker
// License: MIT
//
// Planar geometry used by the halfedge graph.
//
// Orientation convention: y axis up, counter-clockwise loops have positive
// signed area. A face lies on the left of each of its halfedges, so the outer
// boundary of a bounded face is counter-clockwise and every boundary that
// faces the unbounded side of a component is clockwise ("complemented").

use std::f64::consts::TAU;
use std::ops::{Add, Mul, Sub};

pub type Real = f64;

/// Absolute distance under which two points are treated as the same vertex.
pub const DEFAULT_TOLERANCE: Real = 1e-9;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: Real,
    pub y: Real,
}

impl Point {
    #[inline]
    pub const fn new(x: Real, y: Real) -> Self {
        Point { x, y }
    }

    /// z component of the 3D cross product of `self` and `other`.
    #[inline]
    pub fn cross(self, other: Point) -> Real {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn dot(self, other: Point) -> Real {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn norm_squared(self) -> Real {
        self.dot(self)
    }

    #[inline]
    pub fn norm(self) -> Real {
        self.norm_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Point) -> Real {
        (self - other).norm()
    }

    /// Point at parameter `t` along `self -> other`.
    #[inline]
    pub fn lerp(self, other: Point, t: Real) -> Point {
        self + (other - self) * t
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        Point::new(self.x / 2.0 + other.x / 2.0, self.y / 2.0 + other.y / 2.0)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;
    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<Real> for Point {
    type Output = Point;
    #[inline]
    fn mul(self, rhs: Real) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(Real, Real)> for Point {
    fn from((x, y): (Real, Real)) -> Self {
        Point::new(x, y)
    }
}

/// Twice the signed area of triangle (u, v, w). Positive when CCW.
#[inline]
pub fn orient(u: Point, v: Point, w: Point) -> Real {
    (v - u).cross(w - u)
}

/// Angle swept when rotating direction `from` counter-clockwise onto `to`,
/// in `[0, TAU)`.
pub fn ccw_angle(from: Point, to: Point) -> Real {
    let a = from.cross(to).atan2(from.dot(to));
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Shoelace signed area of a closed loop given by its vertices.
pub fn signed_area(loop_points: &[Point]) -> Real {
    let n = loop_points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice = 0.0;
    for i in 0..n {
        let p = loop_points[i];
        let q = loop_points[(i + 1) % n];
        twice += p.cross(q);
    }
    twice * 0.5
}

/// Even-odd containment of `p` in the closed loop. Boundary points give an
/// unspecified answer.
pub fn point_in_polygon(loop_points: &[Point], p: Point) -> bool {
    let n = loop_points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = loop_points[i];
        let b = loop_points[j];
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Parameter of the projection of `p` onto segment `a -> b`, unclamped.
/// Zero-length segments project everything to 0.
#[inline]
pub fn project_param(a: Point, b: Point, p: Point) -> Real {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        0.0
    } else {
        (p - a).dot(ab) / len2
    }
}

/// Distance from `p` to the closed segment `a -> b`.
pub fn segment_distance(a: Point, b: Point, p: Point) -> Real {
    let t = project_param(a, b, p).clamp(0.0, 1.0);
    a.lerp(b, t).distance(p)
}

/// Intersection parameters `(t, u)` of the supporting lines of `p0 -> p1`
/// and `q0 -> q1`, such that `p0 + t (p1 - p0) == q0 + u (q1 - q0)`.
/// Returns `None` when the segments are parallel within `tolerance`.
pub fn line_intersection_params(
    p0: Point,
    p1: Point,
    q0: Point,
    q1: Point,
    tolerance: Real,
) -> Option<(Real, Real)> {
    let r = p1 - p0;
    let s = q1 - q0;
    let denom = r.cross(s);
    let scale = r.norm() * s.norm();
    if scale == 0.0 || denom.abs() <= tolerance * scale {
        return None;
    }
    let qp = q0 - p0;
    let t = qp.cross(s) / denom;
    let u = qp.cross(r) / denom;
    Some((t, u))
}

/// An ordered run of points, optionally closed back onto its first point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Polyline {
    pub fn new(closed: bool, points: Vec<Point>) -> Self {
        Polyline { points, closed }
    }

    pub fn open(points: Vec<Point>) -> Self {
        Polyline::new(false, points)
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Polyline::new(true, points)
    }

    /// Builds a polyline from `(x, y)` pairs.
    pub fn from_coords(closed: bool, coords: &[(Real, Real)]) -> Self {
        Polyline::new(closed, coords.iter().copied().map(Point::from).collect())
    }

    pub fn add_point(&mut self, p: Point) {
        self.points.push(p);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs, including the closing pair of a closed
    /// polyline with at least three points.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        let closing = if self.closed && n >= 3 {
            Some((self.points[n - 1], self.points[0]))
        } else {
            None
        };
        self.points.windows(2).map(|w| (w[0], w[1])).chain(closing)
    }

    pub fn signed_area(&self) -> Real {
        signed_area(&self.points)
    }

    /// True when the loop winds clockwise, i.e. encloses the unbounded side.
    pub fn is_complemented(&self) -> bool {
        self.signed_area() < 0.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: Real,
}

impl Circle {
    pub fn new(center: Point, radius: Real) -> Self {
        Circle { center, radius }
    }

    pub fn contains_point(&self, p: Point) -> bool {
        self.center.distance(p) <= self.radius
    }

    pub fn intersects_segment(&self, a: Point, b: Point) -> bool {
        segment_distance(a, b, self.center) <= self.radius
    }
}
