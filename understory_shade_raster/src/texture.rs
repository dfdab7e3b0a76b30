// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Size};
use understory_shade::{PlaneSampler, Texel, TextureTarget};

use crate::RasterError;

/// Texture filtering used by [`PlaneTextures`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Filter {
    /// Linear interpolation between the four nearest texel centers.
    #[default]
    Bilinear,
    /// The texel containing the sampling point.
    Nearest,
}

/// One layered texture holding a YUV plane.
///
/// Sampling clamps to the edge texels of the layer.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneTexture {
    width: usize,
    height: usize,
    layers: Vec<Vec<Texel>>,
    rect_addressing: bool,
}

impl PlaneTexture {
    /// Creates a texture from row-major texel layers.
    ///
    /// Every layer must hold exactly `width * height` texels. The texture uses
    /// normalized addressing; see [`PlaneTexture::with_rect_addressing`].
    pub fn new(width: usize, height: usize, layers: Vec<Vec<Texel>>) -> Result<Self, RasterError> {
        let expected = width * height;
        if let Some(layer) = layers.iter().find(|layer| layer.len() != expected) {
            return Err(RasterError::TextureSize {
                expected,
                actual: layer.len(),
            });
        }
        Ok(Self {
            width,
            height,
            layers,
            rect_addressing: false,
        })
    }

    /// Single-layer texture from 8-bit single-channel data, stored in `r`.
    pub fn from_r8(width: usize, height: usize, data: &[u8]) -> Result<Self, RasterError> {
        Self::from_unorm8(width, height, 1, data)
    }

    /// Single-layer texture from 8-bit two-channel data, stored in `r` and `g`.
    pub fn from_rg8(width: usize, height: usize, data: &[u8]) -> Result<Self, RasterError> {
        Self::from_unorm8(width, height, 2, data)
    }

    /// Single-layer texture from 8-bit RGBA data.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Result<Self, RasterError> {
        Self::from_unorm8(width, height, 4, data)
    }

    fn from_unorm8(
        width: usize,
        height: usize,
        channels: usize,
        data: &[u8],
    ) -> Result<Self, RasterError> {
        let expected = width * height;
        if data.len() != expected * channels {
            return Err(RasterError::TextureSize {
                expected,
                actual: data.len() / channels,
            });
        }
        let texels = data
            .chunks_exact(channels)
            .map(|chunk| {
                let mut texel = [0.0, 0.0, 0.0, 1.0];
                for (dst, &src) in texel.iter_mut().zip(chunk) {
                    *dst = f32::from(src) / 255.0;
                }
                texel
            })
            .collect();
        Self::new(width, height, vec![texels])
    }

    /// Switches to rectangle addressing: sampling coordinates are in texels
    /// instead of normalized to `[0, 1]`.
    #[must_use]
    pub fn with_rect_addressing(mut self) -> Self {
        self.rect_addressing = true;
        self
    }

    /// Width in texels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of layers.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// How image resources in this texture are addressed.
    #[must_use]
    pub fn target(&self) -> TextureTarget {
        if self.rect_addressing {
            TextureTarget::Rect
        } else {
            TextureTarget::Array {
                size: Size::new(self.width as f64, self.height as f64),
            }
        }
    }

    /// Samples `layer` at `uv`. Missing layers read as transparent black.
    #[must_use]
    pub fn sample(&self, uv: Point, layer: u32, filter: Filter) -> Texel {
        let Some(texels) = usize::try_from(layer).ok().and_then(|l| self.layers.get(l)) else {
            return [0.0; 4];
        };
        if self.width == 0 || self.height == 0 {
            return [0.0; 4];
        }
        let (x, y) = if self.rect_addressing {
            (uv.x, uv.y)
        } else {
            (uv.x * self.width as f64, uv.y * self.height as f64)
        };
        let fetch = |i: f64, j: f64| {
            texels[texel_index(j, self.height) * self.width + texel_index(i, self.width)]
        };
        match filter {
            Filter::Nearest => fetch(x, y),
            Filter::Bilinear => {
                let (x, y) = (x - 0.5, y - 0.5);
                let (x0, y0) = (x.floor(), y.floor());
                let (fx, fy) = (weight(x - x0), weight(y - y0));
                let top = lerp(fetch(x0, y0), fetch(x0 + 1.0, y0), fx);
                let bottom = lerp(fetch(x0, y0 + 1.0), fetch(x0 + 1.0, y0 + 1.0), fx);
                lerp(top, bottom, fy)
            }
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the coordinate is floored and clamped into the texture first"
)]
fn texel_index(coord: f64, len: usize) -> usize {
    if coord >= 0.0 {
        (coord as usize).min(len - 1)
    } else {
        0
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "filter weights are in [0, 1] and texels are f32"
)]
fn weight(w: f64) -> f32 {
    w as f32
}

fn lerp(a: Texel, b: Texel, t: f32) -> Texel {
    core::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// The planes of one YUV draw, indexed like the planes of
/// [`understory_shade::YuvImagePrimitive`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaneTextures {
    /// Plane textures, luma first.
    pub planes: Vec<PlaneTexture>,
    /// Filtering applied to every plane.
    pub filter: Filter,
}

impl PlaneTextures {
    /// Bilinear-filtered planes.
    #[must_use]
    pub fn new(planes: Vec<PlaneTexture>) -> Self {
        Self {
            planes,
            filter: Filter::Bilinear,
        }
    }

    /// Replaces the filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    /// Texture bound to `plane`.
    #[must_use]
    pub fn plane(&self, plane: usize) -> Option<&PlaneTexture> {
        self.planes.get(plane)
    }
}

impl PlaneSampler for PlaneTextures {
    fn sample(&self, plane: usize, uv: Point, layer: u32) -> Texel {
        self.planes
            .get(plane)
            .map_or([0.0; 4], |texture| texture.sample(uv, layer, self.filter))
    }
}
