// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! YUV image shading: plane sampling and YUV to RGB conversion.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::color::{PremulColor, Srgb};

use crate::aa::{distance_aa, signed_distance_rect};
use crate::record::{ImageResource, YuvImageRecord};
use crate::sampler::{TextureRegion, TextureTarget};

/// Raw channels of one texture sample.
pub type Texel = [f32; 4];

/// Limited-range offsets (`16/255`, `128/255`, `128/255`) removed from a YUV
/// sample before the color matrix is applied.
pub const YUV_OFFSET: [f32; 3] = [0.06275, 0.50196, 0.50196];

/// Texture sampling supplied by the caller.
///
/// `plane` is the plane index (0 for luma), `uv` the sampling coordinate in the
/// plane's addressing mode and `layer` the atlas layer.
pub trait PlaneSampler {
    /// Samples one plane.
    fn sample(&self, plane: usize, uv: Point, layer: u32) -> Texel;
}

impl<F> PlaneSampler for F
where
    F: Fn(usize, Point, u32) -> Texel,
{
    fn sample(&self, plane: usize, uv: Point, layer: u32) -> Texel {
        self(plane, uv, layer)
    }
}

/// Color standard selecting the YUV to RGB matrix.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum YuvColorSpace {
    /// ITU-R BT.601.
    #[default]
    Rec601,
    /// ITU-R BT.709.
    Rec709,
    /// ITU-R BT.2020 (non-constant luminance).
    Rec2020,
}

impl YuvColorSpace {
    /// Limited-range YUV to RGB matrix, column-major: `matrix()[c]` holds the
    /// contribution of channel `c` (Y, U, V) to R, G and B.
    #[must_use]
    pub const fn matrix(self) -> [[f32; 3]; 3] {
        match self {
            Self::Rec601 => [
                [1.16438, 1.16438, 1.16438],
                [0.0, -0.39176, 2.01723],
                [1.59603, -0.81297, 0.0],
            ],
            Self::Rec709 => [
                [1.16438, 1.16438, 1.16438],
                [0.0, -0.21325, 2.11240],
                [1.79274, -0.53291, 0.0],
            ],
            Self::Rec2020 => [
                [1.16438, 1.16438, 1.16438],
                [0.0, -0.18733, 2.14177],
                [1.67867, -0.65042, 0.0],
            ],
        }
    }

    /// Decodes a configuration tag. Unrecognized tags select
    /// [`YuvColorSpace::Rec601`].
    #[must_use]
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            0 => Self::Rec601,
            1 => Self::Rec709,
            2 => Self::Rec2020,
            _ => {
                tracing::debug!(tag, "unrecognized YUV color space, using Rec601");
                Self::Rec601
            }
        }
    }
}

/// How the Y, U and V channels are packed into texture planes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum YuvFormat {
    /// Three single-channel planes: Y, U and V.
    #[default]
    Planar,
    /// A luma plane and an interleaved two-channel chroma plane.
    Nv12,
    /// One plane whose `g`, `b` and `r` channels hold Y, Cb and Cr.
    InterleavedYCbCr,
}

impl YuvFormat {
    /// Number of texture planes the format reads.
    #[must_use]
    pub const fn plane_count(self) -> usize {
        match self {
            Self::Planar => 3,
            Self::Nv12 => 2,
            Self::InterleavedYCbCr => 1,
        }
    }

    /// Decodes a configuration tag. Unrecognized tags select
    /// [`YuvFormat::Planar`].
    #[must_use]
    pub fn from_tag(tag: u32) -> Self {
        match tag {
            0 => Self::Planar,
            1 => Self::Nv12,
            2 => Self::InterleavedYCbCr,
            _ => {
                tracing::debug!(tag, "unrecognized YUV format, using planar");
                Self::Planar
            }
        }
    }
}

/// Per-draw YUV configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct YuvConfig {
    /// Plane packing.
    pub format: YuvFormat,
    /// Color standard.
    pub color_space: YuvColorSpace,
}

/// Converts a YUV sample in `[0, 1]` to RGB.
///
/// The result is not clamped; out-of-gamut inputs produce values outside
/// `[0, 1]`.
#[must_use]
pub fn yuv_to_rgb(yuv: [f32; 3], color_space: YuvColorSpace) -> [f32; 3] {
    let [c0, c1, c2] = color_space.matrix();
    let y = yuv[0] - YUV_OFFSET[0];
    let u = yuv[1] - YUV_OFFSET[1];
    let v = yuv[2] - YUV_OFFSET[2];
    [
        c0[0] * y + c1[0] * u + c2[0] * v,
        c0[1] * y + c1[1] * u + c2[1] * v,
        c0[2] * y + c1[2] * u + c2[2] * v,
    ]
}

/// One plane's resolved texture region and how its texture is addressed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneResource {
    /// Atlas rectangle and layer.
    pub resource: ImageResource,
    /// Addressing of the plane's texture.
    pub target: TextureTarget,
}

/// A YUV image ready for per-fragment evaluation.
///
/// Plane 0 is luma. Plane 1 is U (planar) or interleaved UV (NV12) and also
/// defines the chroma region size and half texel shared with plane 2; plane 2
/// (V, planar only) contributes just its offset and layer. Planes a format
/// does not read are ignored.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct YuvImagePrimitive {
    /// Local rect of the primitive; fragment positions are taken relative to
    /// its origin.
    pub local_rect: Rect,
    /// Local size the image is stretched over.
    pub stretch_size: Size,
    /// Atlas layer of each plane.
    pub layers: [u32; 3],
    /// Region of each plane in sampling coordinates.
    pub planes: [TextureRegion; 3],
}

impl YuvImagePrimitive {
    /// Sets up an image from its record, local rect and up to three plane
    /// resources (in plane order).
    #[must_use]
    pub fn from_resources(
        record: &YuvImageRecord,
        local_rect: Rect,
        planes: &[PlaneResource],
    ) -> Self {
        let mut prim = Self {
            local_rect,
            stretch_size: record.size,
            ..Self::default()
        };
        for (i, plane) in planes.iter().take(3).enumerate() {
            prim.layers[i] = plane.resource.layer;
            prim.planes[i] = TextureRegion::new(plane.resource.uv_rect, plane.target);
        }
        prim
    }
}

/// Per-fragment inputs for YUV image shading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YuvFragment {
    /// Fragment position in the image's local space.
    pub local_pos: Point,
    /// Bounds of a transformed primitive.
    ///
    /// When set, the position is clamped into the bounds before sampling (the
    /// image edge stretches instead of repeating) and coverage includes the
    /// anti-aliased distance to the bounds.
    pub local_bounds: Option<Rect>,
    /// Local-space extent of one device pixel; only used with `local_bounds`.
    pub aa_range: f64,
    /// Coverage from the clip mask, in `[0, 1]`.
    pub clip_alpha: f32,
}

impl YuvFragment {
    /// An untransformed, unclipped fragment.
    #[must_use]
    pub fn new(local_pos: Point) -> Self {
        Self {
            local_pos,
            local_bounds: None,
            aa_range: 1.0,
            clip_alpha: 1.0,
        }
    }
}

/// Samples the Y, U and V channels for a position `relative` to the image
/// origin.
#[must_use]
pub fn sample_yuv<S>(
    image: &YuvImagePrimitive,
    format: YuvFormat,
    relative: Vec2,
    sampler: &S,
) -> [f32; 3]
where
    S: PlaneSampler + ?Sized,
{
    let [y_plane, uv_plane, v_plane] = &image.planes;
    let [y_layer, uv_layer, v_layer] = image.layers;
    let st_y = y_plane.sample_point(relative, image.stretch_size);
    match format {
        YuvFormat::InterleavedYCbCr => {
            // Y, Cb and Cr live in the green, blue and red channels.
            let [r, g, b, _] = sampler.sample(0, st_y, y_layer);
            [g, b, r]
        }
        YuvFormat::Nv12 => {
            let uv_offset = uv_plane.inset_offset(relative, image.stretch_size);
            let y = sampler.sample(0, st_y, y_layer)[0];
            let [u, v, ..] = sampler.sample(1, (uv_plane.offset + uv_offset).to_point(), uv_layer);
            [y, u, v]
        }
        YuvFormat::Planar => {
            let uv_offset = uv_plane.inset_offset(relative, image.stretch_size);
            let st_u = (uv_plane.offset + uv_offset).to_point();
            let st_v = (v_plane.offset + uv_offset).to_point();
            [
                sampler.sample(0, st_y, y_layer)[0],
                sampler.sample(1, st_u, uv_layer)[0],
                sampler.sample(2, st_v, v_layer)[0],
            ]
        }
    }
}

/// Shades one fragment of a YUV image.
///
/// The image is opaque; the returned color is its RGB scaled by the
/// fragment's coverage: the clip coverage, times the edge coverage for
/// transformed fragments.
#[must_use]
pub fn shade_yuv<S>(
    image: &YuvImagePrimitive,
    config: &YuvConfig,
    fragment: &YuvFragment,
    sampler: &S,
) -> PremulColor<Srgb>
where
    S: PlaneSampler + ?Sized,
{
    let pos = fragment.local_pos;
    let (edge_alpha, relative) = match fragment.local_bounds {
        Some(bounds) => {
            let bounds = bounds.abs();
            let coverage = distance_aa(fragment.aa_range, signed_distance_rect(pos, bounds));
            let clamped = Point::new(
                pos.x.max(bounds.x0).min(bounds.x1),
                pos.y.max(bounds.y0).min(bounds.y1),
            );
            (coverage, clamped - bounds.origin())
        }
        None => (1.0, pos - image.local_rect.origin()),
    };
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coverage is in [0, 1] and colors are f32"
    )]
    let alpha = edge_alpha as f32 * fragment.clip_alpha;

    let yuv = sample_yuv(image, config.format, relative, sampler);
    let [r, g, b] = yuv_to_rgb(yuv, config.color_space);
    PremulColor::new([r * alpha, g * alpha, b * alpha, alpha])
}
