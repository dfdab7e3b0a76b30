// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::color::{PremulColor, Srgb};

/// A premultiplied RGBA render target with f32 channels.
#[derive(Clone, Debug, PartialEq)]
pub struct Pixmap {
    width: usize,
    height: usize,
    pixels: Vec<PremulColor<Srgb>>,
}

impl Pixmap {
    /// Creates a transparent pixmap.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![PremulColor::new([0.0; 4]); width * height],
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major pixels.
    #[must_use]
    pub fn pixels(&self) -> &[PremulColor<Srgb>] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [PremulColor<Srgb>] {
        &mut self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the pixmap.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<PremulColor<Srgb>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }

    /// Quantizes to premultiplied 8-bit RGBA, row-major.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.components.map(quantize))
            .collect()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the value is clamped to [0, 255] before the cast"
)]
fn quantize(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Source-over compositing of premultiplied colors.
pub(crate) fn over(src: PremulColor<Srgb>, dst: PremulColor<Srgb>) -> PremulColor<Srgb> {
    let inv = 1.0 - src.components[3];
    let [sr, sg, sb, sa] = src.components;
    let [dr, dg, db, da] = dst.components;
    PremulColor::new([sr + dr * inv, sg + dg * inv, sb + db * inv, sa + da * inv])
}
