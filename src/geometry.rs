//! Planar geometric predicates
//!
//! All predicates work in the `x`/`z` plane of a [`DVec3`]; the `y`
//! coordinate (terrain height) is ignored. Lines are kept in general form
//! `A·x + B·z + C = 0`.

use glam::{DVec2, DVec3};

/// A line in general form `a·x + b·z + c = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// Coefficient of `x`
    pub a: f64,
    /// Coefficient of `z`
    pub b: f64,
    /// Constant term
    pub c: f64,
}

impl Line {
    /// Line through two points
    ///
    /// The points must not coincide, otherwise all coefficients are zero and
    /// the line is undefined.
    pub fn through(v1: DVec3, v2: DVec3) -> Self {
        let d = v2 - v1;
        Self {
            a: d.z,
            b: -d.x,
            c: d.x * v1.z - d.z * v1.x,
        }
    }

    /// Line through `p` perpendicular to this one
    pub fn perpendicular_through(&self, p: DVec3) -> Self {
        let a = -self.b;
        let b = self.a;
        Self {
            a,
            b,
            c: -a * p.x - b * p.z,
        }
    }

    /// Value of `a·x + b·z + c` at `p`
    #[inline]
    pub fn eval(&self, p: DVec3) -> f64 {
        self.a * p.x + self.b * p.z + self.c
    }

    /// Unique intersection point with another line, `None` when parallel
    ///
    /// The returned point has `y == 0`.
    pub fn intersect(&self, other: &Line) -> Option<DVec3> {
        let denom = other.b * self.a - self.b * other.a;
        if denom == 0.0 {
            return None;
        }

        let z = (other.a * self.c - self.a * other.c) / denom;
        let x = if other.a == 0.0 {
            (-self.b * z - self.c) / self.a
        } else {
            (-other.b * z - other.c) / other.a
        };

        Some(DVec3::new(x, 0.0, z))
    }
}

/// A circle in the `x`/`z` plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center (`y == 0`)
    pub center: DVec3,
    /// Squared radius, kept squared to avoid a round trip through `sqrt`
    pub radius_squared: f64,
}

impl Circle {
    /// True if `p` lies strictly inside the circle
    #[inline]
    pub fn strictly_contains(&self, p: DVec3) -> bool {
        planar_distance_squared(p, self.center) < self.radius_squared
    }
}

/// Projection of a point onto the triangulation plane
#[inline]
pub fn planar(p: DVec3) -> DVec2 {
    DVec2::new(p.x, p.z)
}

/// Squared distance between two points in the `x`/`z` plane
#[inline]
pub fn planar_distance_squared(p: DVec3, q: DVec3) -> f64 {
    planar(p).distance_squared(planar(q))
}

/// Signed side of `p` relative to the directed line `a → b`
///
/// Same sign convention as [`Line::through`]`(a, b).eval(p)`, but evaluated
/// relative to an endpoint for better precision. Zero means collinear.
///
/// The endpoints are ordered before evaluating, so `orientation(b, a, p)` is
/// exactly `-orientation(a, b, p)`: two triangles sharing an edge never both
/// reject a point lying on it.
#[inline]
pub fn orientation(a: DVec3, b: DVec3, p: DVec3) -> f64 {
    if (a.x, a.z) <= (b.x, b.z) {
        raw_orientation(a, b, p)
    } else {
        -raw_orientation(b, a, p)
    }
}

#[inline]
fn raw_orientation(a: DVec3, b: DVec3, p: DVec3) -> f64 {
    (b.z - a.z) * (p.x - a.x) - (b.x - a.x) * (p.z - a.z)
}

/// Unsigned area of a triangle in the `x`/`z` plane
#[inline]
pub fn triangle_area(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    0.5 * orientation(a, b, c).abs()
}

/// True if `p` is strictly on the same side of all three edges of the triangle
///
/// Points on an edge are not inside; use [`point_in_segment`] for them.
pub fn point_in_triangle(p: DVec3, v1: DVec3, v2: DVec3, v3: DVec3) -> bool {
    let s1 = orientation(v1, v2, p);
    let s2 = orientation(v2, v3, p);
    let s3 = orientation(v3, v1, p);

    (s1 > 0.0 && s2 > 0.0 && s3 > 0.0) || (s1 < 0.0 && s2 < 0.0 && s3 < 0.0)
}

/// True if `p` lies inside the triangle or on its boundary
///
/// Degenerate (zero-area) triangles contain nothing.
pub fn point_in_or_on_triangle(p: DVec3, v1: DVec3, v2: DVec3, v3: DVec3) -> bool {
    if orientation(v1, v2, v3) == 0.0 {
        return false;
    }

    let s1 = orientation(v1, v2, p);
    let s2 = orientation(v2, v3, p);
    let s3 = orientation(v3, v1, p);

    (s1 >= 0.0 && s2 >= 0.0 && s3 >= 0.0) || (s1 <= 0.0 && s2 <= 0.0 && s3 <= 0.0)
}

/// True if `p` lies exactly on the closed segment `v1 → v2`
///
/// Requires zero distance to the supporting line and a projection parameter
/// in `[0, 1]`. A degenerate segment only contains its own endpoint.
pub fn point_in_segment(p: DVec3, v1: DVec3, v2: DVec3) -> bool {
    let d = planar(v2) - planar(v1);
    let len_sq = d.length_squared();
    if len_sq == 0.0 {
        return planar(p) == planar(v1);
    }

    if orientation(v1, v2, p) != 0.0 {
        return false;
    }

    let t = (planar(p) - planar(v1)).dot(d) / len_sq;
    (0.0..=1.0).contains(&t)
}

/// True if `p` lies inside or on the circle with the given center and radius
#[inline]
pub fn point_in_circle(p: DVec3, center: DVec3, radius: f64) -> bool {
    planar_distance_squared(p, center) <= radius * radius
}

/// Circumscribed circle of a triangle
///
/// Intersects the perpendicular bisectors of `v1 → v2` and `v2 → v3`; the
/// radius is the distance from the center to `v3`. Returns `None` when the
/// vertices are collinear.
pub fn circumcircle(v1: DVec3, v2: DVec3, v3: DVec3) -> Option<Circle> {
    let edge12 = Line::through(v1, v2);
    let edge23 = Line::through(v2, v3);

    let bisector12 = edge12.perpendicular_through(0.5 * (v1 + v2));
    let bisector23 = edge23.perpendicular_through(0.5 * (v2 + v3));

    let center = bisector12.intersect(&bisector23)?;
    Some(Circle {
        center,
        radius_squared: planar_distance_squared(center, v3),
    })
}

/// True if `d` lies strictly inside the circumcircle of `(a, b, c)`
///
/// Evaluates the incircle determinant relative to `d` instead of building the
/// circle, so points on the circle are never reported inside for inputs whose
/// products are exact (e.g. integer grids). Works for either winding and is
/// false for collinear `a`, `b`, `c`.
pub fn in_circumcircle(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> bool {
    let [a, b, c] = [a, b, c].map(|v| planar(v) - planar(d));
    let det = a.length_squared() * b.perp_dot(c)
        + b.length_squared() * c.perp_dot(a)
        + c.length_squared() * a.perp_dot(b);
    let winding = (b - a).perp_dot(c - a);
    det * winding > 0.0
}
