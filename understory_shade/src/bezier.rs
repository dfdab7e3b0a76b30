// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form closest points on quadratic Béziers.
//!
//! This is the non-iterative approximation from Hoppe et al., "Random-Access
//! Rendering of General Vector Graphics" (2008). It is exact on the curve and
//! at the endpoints and approximate elsewhere, which is what distance-based
//! anti-aliasing needs near an edge.

use kurbo::{Line, ParamCurve, ParamCurveNearest, Point, QuadBez, Vec2};

/// Doubled control-polygon area, relative to its squared extent, below which
/// the curve is treated as a straight segment.
const DEGENERATE_AREA_RATIO: f64 = 1e-9;

/// Offset from the query point to the (approximate) closest point on a
/// quadratic Bézier.
///
/// The control points `b0`, `b1`, `b2` are given relative to the query point,
/// so the returned vector's length is the distance.
///
/// The rational formula divides by the control polygon's doubled signed area,
/// which vanishes when the control points are collinear. In that case this
/// returns the closest point on the straight segment `b0..b2` instead.
#[must_use]
pub fn closest_point_offset(b0: Vec2, b1: Vec2, b2: Vec2) -> Vec2 {
    let a = b0.cross(b2);
    let b = 2.0 * b1.cross(b0);
    let d = 2.0 * b2.cross(b1);
    let denom = 2.0 * a + b + d;

    let extent = (b1 - b0)
        .hypot2()
        .max((b2 - b1).hypot2())
        .max((b2 - b0).hypot2());
    if denom.abs() <= DEGENERATE_AREA_RATIO * extent {
        return chord_closest_point(b0, b2);
    }

    let f = b * d - a * a;
    let d21 = b2 - b1;
    let d10 = b1 - b0;
    let d20 = b2 - b0;

    let gf = 2.0 * (b * d21 + d * d10 + a * d20);
    let gf = Vec2::new(gf.y, -gf.x);
    let gf_len2 = gf.hypot2();
    if gf_len2 == 0.0 {
        return chord_closest_point(b0, b2);
    }
    let pp = -f * gf / gf_len2;
    let d0p = b0 - pp;
    let ap = d0p.cross(d20);
    let bp = 2.0 * d10.cross(d0p);

    let t = ((ap + bp) / denom).clamp(0.0, 1.0);
    b0.lerp(b1, t).lerp(b1.lerp(b2, t), t)
}

fn chord_closest_point(b0: Vec2, b2: Vec2) -> Vec2 {
    if b0 == b2 {
        return b0;
    }
    let chord = Line::new(b0.to_point(), b2.to_point());
    let nearest = chord.nearest(Point::ORIGIN, 0.0);
    chord.eval(nearest.t).to_vec2()
}

/// Approximate distance from `p` to `quad`.
#[must_use]
pub fn approx_distance(p: Point, quad: QuadBez) -> f64 {
    closest_point_offset(quad.p0 - p, quad.p1 - p, quad.p2 - p).hypot()
}
