// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Rect, Vec2};
use understory_shade::{aa_range_from_fwidth, fwidth};

/// Maps device pixel centers into a primitive's local space.
///
/// This stands in for the vertex stage: it produces the interpolated local
/// position of each fragment and the per-pixel derivatives a GPU would expose
/// through `fwidth`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FragmentMapping {
    device_to_local: Affine,
}

impl Default for FragmentMapping {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl FragmentMapping {
    /// Local space equals device space.
    pub const IDENTITY: Self = Self {
        device_to_local: Affine::IDENTITY,
    };

    /// Mapping from an explicit device-to-local transform.
    #[must_use]
    pub fn new(device_to_local: Affine) -> Self {
        Self { device_to_local }
    }

    /// Mapping from the primitive's local-to-device transform.
    ///
    /// A singular transform has no inverse; the result then maps every pixel
    /// to non-finite positions and nothing is drawn.
    #[must_use]
    pub fn from_local_to_device(local_to_device: Affine) -> Self {
        Self::new(local_to_device.inverse())
    }

    /// The device-to-local transform.
    #[must_use]
    pub fn device_to_local(&self) -> Affine {
        self.device_to_local
    }

    /// Local position of the center of device pixel `(x, y)`.
    #[must_use]
    pub fn local_pos(&self, x: usize, y: usize) -> Point {
        self.device_to_local * device_center(x, y)
    }

    /// Local-space extent of one device pixel.
    ///
    /// Constant over the whole pass since the mapping is affine.
    #[must_use]
    pub fn aa_range(&self) -> f64 {
        let [a, b, c, d, _, _] = self.device_to_local.as_coeffs();
        aa_range_from_fwidth(fwidth(Vec2::new(a, b), Vec2::new(c, d)))
    }

    /// Whether local axes stay parallel to device axes.
    ///
    /// Primitives under such a mapping need no analytic edge coverage.
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        let [_, b, c, _, _, _] = self.device_to_local.as_coeffs();
        b == 0.0 && c == 0.0
    }

    /// Device-space bounding box of a local rect.
    #[must_use]
    pub fn device_bounds(&self, local: Rect) -> Rect {
        self.device_to_local.inverse().transform_rect_bbox(local)
    }
}

pub(crate) fn device_center(x: usize, y: usize) -> Point {
    Point::new(x as f64 + 0.5, y as f64 + 0.5)
}
