// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Shade: per-fragment shading for YUV images and decorative lines.
//!
//! This crate holds the closed-form, per-pixel math that two primitive
//! renderers share:
//! - YUV image shading: atlas-relative sampling of one to three texture
//!   planes with half-texel clamping, followed by a fixed YUV to RGB matrix.
//! - Line decorations: solid, dashed, dotted and wavy strokes evaluated
//!   analytically from the fragment's local position, with distance-based
//!   anti-aliasing.
//!
//! Every shading entry point is a pure function of a flat, per-primitive
//! parameter struct and a per-fragment struct. Nothing is cached or mutated
//! between fragments, so callers can evaluate fragments in any order and from
//! any number of threads.
//!
//! It does **not** own a texture atlas, clip masks or coordinate transforms.
//! Callers are expected to:
//! - Pack primitive records into a [`BlockStore`] and resolve texture regions.
//! - Supply the fragment's local position and AA range (see
//!   [`aa_range_from_fwidth`]).
//! - Provide texture sampling through a [`PlaneSampler`].
//!
//! ## Minimal line example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use peniko::Color;
//! use understory_shade::{LineFragment, LineOrientation, LinePrimitive, LineRecord, LineStyle, shade_line};
//!
//! let record = LineRecord {
//!     color: Color::BLACK,
//!     wavy_line_thickness: 0.0,
//!     style: LineStyle::Dashed,
//!     orientation: LineOrientation::Horizontal,
//! };
//! // A 2px thick underline: dashes are 6px long with a 12px period.
//! let line = LinePrimitive::from_record(&record, Rect::new(0.0, 10.0, 100.0, 12.0));
//!
//! let on = shade_line(&line, &LineFragment::new(Point::new(3.0, 11.0), 1.0));
//! let off = shade_line(&line, &LineFragment::new(Point::new(9.0, 11.0), 1.0));
//! assert_eq!(on.components[3], 1.0);
//! assert_eq!(off.components[3], 0.0);
//! ```
//!
//! ## Minimal YUV example
//!
//! ```rust
//! use kurbo::{Point, Rect, Size};
//! use understory_shade::{
//!     ImageResource, PlaneResource, TextureTarget, Texel, YuvConfig, YuvFormat, YuvFragment,
//!     YuvImagePrimitive, YuvImageRecord, shade_yuv,
//! };
//!
//! let plane = PlaneResource {
//!     resource: ImageResource { uv_rect: Rect::new(0.0, 0.0, 16.0, 16.0), layer: 0 },
//!     target: TextureTarget::Array { size: Size::new(16.0, 16.0) },
//! };
//! let image = YuvImagePrimitive::from_resources(
//!     &YuvImageRecord { size: Size::new(16.0, 16.0) },
//!     Rect::new(0.0, 0.0, 16.0, 16.0),
//!     &[plane, plane],
//! );
//!
//! // Limited-range white: Y = 235, U = V = 128.
//! let sampler = |plane: usize, _uv: Point, _layer: u32| -> Texel {
//!     match plane {
//!         0 => [235.0 / 255.0, 0.0, 0.0, 1.0],
//!         _ => [128.0 / 255.0, 128.0 / 255.0, 0.0, 1.0],
//!     }
//! };
//! let config = YuvConfig { format: YuvFormat::Nv12, ..YuvConfig::default() };
//! let color = shade_yuv(&image, &config, &YuvFragment::new(Point::new(8.0, 8.0)), &sampler);
//! assert!((color.components[0] - 1.0).abs() < 1e-3);
//! ```
//!
//! ## Design notes
//!
//! - Packing mode, color standard and line style are closed enums resolved
//!   once per draw; the fragment functions are a `match` over them.
//! - Records decode with a default-safe policy: unknown tags fall back to a
//!   documented default instead of failing.
//! - Numeric hazards of the GPU formulation (inverted clamp ranges, zero
//!   periods, near-collinear Bézier control points) are guarded explicitly.
//!
//! This crate is `no_std`.

#![no_std]

mod aa;
pub mod bezier;
mod line;
mod record;
mod sampler;
mod yuv;

pub use aa::{aa_range_from_fwidth, distance_aa, fwidth, signed_distance_rect};
pub use line::{
    LineFragment, LineOrientation, LineParams, LinePrimitive, LineStyle, WAVY_LINE_AA_SNAP,
    line_alpha, shade_line,
};
pub use record::{
    Block, BlockAddress, BlockStore, FetchError, ImageResource, LineRecord, YuvImageRecord,
    fetch_blocks,
};
pub use sampler::{TextureRegion, TextureTarget, clamp_texel};
pub use yuv::{
    PlaneResource, PlaneSampler, Texel, YUV_OFFSET, YuvColorSpace, YuvConfig, YuvFormat,
    YuvFragment, YuvImagePrimitive, sample_yuv, shade_yuv, yuv_to_rgb,
};
