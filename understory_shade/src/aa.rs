// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance-based anti-aliasing.

use core::f64::consts::FRAC_1_SQRT_2;

use kurbo::{Point, Rect, Vec2};

/// Converts a signed distance into coverage.
///
/// `signed_distance` is in local units, positive outside the shape.
/// `aa_range` is the local-space extent of one device pixel (see
/// [`aa_range_from_fwidth`]). Coverage falls linearly from `1` at
/// `-aa_range / 2` to `0` at `aa_range / 2`, so a fragment exactly on the edge
/// gets `0.5`.
///
/// A range that is zero, negative or not finite degrades to a hard edge.
#[must_use]
pub fn distance_aa(aa_range: f64, signed_distance: f64) -> f64 {
    if aa_range <= 0.0 || !aa_range.is_finite() {
        return if signed_distance < 0.0 {
            1.0
        } else if signed_distance > 0.0 {
            0.0
        } else {
            0.5
        };
    }
    (0.5 - signed_distance / aa_range).clamp(0.0, 1.0)
}

/// Sum of absolute local-position derivatives along device x and y.
///
/// This is what a GPU `fwidth(local_pos)` returns for a fragment.
#[must_use]
pub fn fwidth(dpdx: Vec2, dpdy: Vec2) -> Vec2 {
    Vec2::new(dpdx.x.abs() + dpdy.x.abs(), dpdx.y.abs() + dpdy.y.abs())
}

/// AA range for [`distance_aa`] from a fragment's [`fwidth`].
///
/// Scaled so an unscaled, axis-aligned mapping (`fwidth == (1, 1)`) yields a
/// range of exactly one local unit.
#[must_use]
pub fn aa_range_from_fwidth(fwidth: Vec2) -> f64 {
    FRAC_1_SQRT_2 * fwidth.hypot()
}

/// Signed distance from `pos` to the boundary of `rect`, negative inside.
///
/// Used for analytic edge coverage of transformed primitives.
#[must_use]
pub fn signed_distance_rect(pos: Point, rect: Rect) -> f64 {
    let rect = rect.abs();
    let d = Vec2::new(
        (rect.x0 - pos.x).max(pos.x - rect.x1),
        (rect.y0 - pos.y).max(pos.y - rect.y1),
    );
    let outside = Vec2::new(d.x.max(0.0), d.y.max(0.0)).hypot();
    outside + d.x.max(d.y).min(0.0)
}
