// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas-relative texture coordinates with half-texel clamping.

use kurbo::{Point, Rect, Size, Vec2};

/// How a plane's texture is addressed.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum TextureTarget {
    /// Normalized addressing: region corners are given in texels and divided
    /// by the texture's pixel size.
    Array {
        /// Pixel dimensions of the physical texture.
        size: Size,
    },
    /// Rectangle-texture addressing: region corners are used as they are.
    #[default]
    Rect,
}

impl TextureTarget {
    /// Per-axis divisor turning texel coordinates into sampling coordinates.
    #[must_use]
    pub fn normalization(self) -> Vec2 {
        match self {
            Self::Array { size } => Vec2::new(size.width, size.height),
            Self::Rect => Vec2::new(1.0, 1.0),
        }
    }
}

/// A plane's region in sampling coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextureRegion {
    /// Top-left corner of the region.
    pub offset: Vec2,
    /// Extent of the region.
    pub size: Vec2,
    /// Half a texel, the inset kept from every region edge.
    pub half_texel: Vec2,
}

impl TextureRegion {
    /// Builds the region for the atlas rectangle `uv_rect` (`p0`/`p1`) of a
    /// texture addressed through `target`.
    #[must_use]
    pub fn new(uv_rect: Rect, target: TextureTarget) -> Self {
        let n = target.normalization();
        let p0 = Vec2::new(uv_rect.x0 / n.x, uv_rect.y0 / n.y);
        let p1 = Vec2::new(uv_rect.x1 / n.x, uv_rect.y1 / n.y);
        Self {
            offset: p0,
            size: p1 - p0,
            half_texel: Vec2::new(0.5 / n.x, 0.5 / n.y),
        }
    }

    /// Region-relative offset for a position `relative` inside an image
    /// stretched over `stretch_size`.
    ///
    /// The result is kept half a texel away from the region edges so bilinear
    /// filtering never reads a neighboring atlas entry.
    #[must_use]
    pub fn inset_offset(&self, relative: Vec2, stretch_size: Size) -> Vec2 {
        let scaled = Vec2::new(
            relative.x / stretch_size.width * self.size.x,
            relative.y / stretch_size.height * self.size.y,
        );
        clamp_texel(scaled, self.half_texel, self.size - self.half_texel)
    }

    /// Sampling coordinate for a position `relative` inside an image
    /// stretched over `stretch_size`.
    #[must_use]
    pub fn sample_point(&self, relative: Vec2, stretch_size: Size) -> Point {
        (self.offset + self.inset_offset(relative, stretch_size)).to_point()
    }
}

/// Per-axis clamp of `v` into `[lo, hi]`.
///
/// When a region is narrower than one texel the range inverts (`lo > hi`);
/// that axis then resolves to the midpoint of `lo` and `hi`, i.e. the center
/// of the region.
#[must_use]
pub fn clamp_texel(v: Vec2, lo: Vec2, hi: Vec2) -> Vec2 {
    Vec2::new(clamp_axis(v.x, lo.x, hi.x), clamp_axis(v.y, lo.y, hi.y))
}

fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
    if lo > hi {
        (lo + hi) * 0.5
    } else {
        v.max(lo).min(hi)
    }
}
