// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};
use understory_shade::{distance_aa, signed_distance_rect};

/// Per-pixel clip coverage.
pub trait ClipMask {
    /// Coverage in `[0, 1]` at a device-space position.
    fn alpha(&self, device: Point) -> f32;
}

/// No clipping.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoClip;

impl ClipMask for NoClip {
    fn alpha(&self, _device: Point) -> f32 {
        1.0
    }
}

/// An anti-aliased device-space clip rectangle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RectClip {
    /// Clip rectangle in device pixels.
    pub rect: Rect,
}

impl ClipMask for RectClip {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coverage is in [0, 1]"
    )]
    fn alpha(&self, device: Point) -> f32 {
        distance_aa(1.0, signed_distance_rect(device, self.rect)) as f32
    }
}
