// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Shade Raster: a parallel CPU driver for `understory_shade`.
//!
//! This crate plays the parts of the pipeline that sit around the shading
//! core on a GPU:
//! - [`BlockBuffer`] is an in-memory resource cache for primitive records.
//! - [`PlaneTextures`] holds YUV planes and samples them (nearest or bilinear).
//! - [`FragmentMapping`] maps device pixel centers to local space and derives
//!   the AA range, like the vertex stage and `fwidth` would.
//! - [`ClipMask`] supplies per-pixel clip coverage.
//!
//! [`render_line`] and [`render_yuv`] evaluate every pixel a primitive covers,
//! rows in parallel on the rayon thread pool, and composite the result
//! source-over into a premultiplied [`Pixmap`]. Fragment evaluation is the
//! pure core function, so no locking is involved.
//!
//! ```rust
//! use kurbo::Rect;
//! use peniko::Color;
//! use understory_shade::{LineOrientation, LinePrimitive, LineRecord, LineStyle};
//! use understory_shade_raster::{FragmentMapping, NoClip, Pixmap, render_line};
//!
//! let record = LineRecord {
//!     color: Color::WHITE,
//!     wavy_line_thickness: 2.0,
//!     style: LineStyle::Wavy,
//!     orientation: LineOrientation::Horizontal,
//! };
//! let rect = Rect::new(0.0, 0.0, 64.0, 6.0);
//! let line = LinePrimitive::from_record(&record, rect);
//!
//! let mut target = Pixmap::new(64, 8);
//! render_line(&mut target, &line, rect, &FragmentMapping::IDENTITY, &NoClip);
//! assert!(target.pixels().iter().any(|p| p.components[3] > 0.0));
//! ```

mod clip;
mod mapping;
mod pixmap;
mod render;
mod store;
mod texture;

use core::fmt;

use understory_shade::FetchError;

pub use clip::{ClipMask, NoClip, RectClip};
pub use mapping::FragmentMapping;
pub use pixmap::Pixmap;
pub use render::{LineDraw, YuvDraw, render_line, render_line_draws, render_yuv, render_yuv_draws};
pub use store::BlockBuffer;
pub use texture::{Filter, PlaneTexture, PlaneTextures};

/// Errors raised while preparing draws for rasterization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterError {
    /// A record could not be read from the block store.
    Fetch(FetchError),
    /// Texel data does not match the declared texture size.
    TextureSize {
        /// Texels required by the width, height and layer count.
        expected: usize,
        /// Texels provided.
        actual: usize,
    },
    /// The YUV format reads a plane that has no texture.
    MissingPlane {
        /// Index of the missing plane.
        plane: usize,
    },
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(err) => write!(f, "failed to fetch primitive record: {err}"),
            Self::TextureSize { expected, actual } => write!(
                f,
                "texture data has {actual} texels, expected {expected}"
            ),
            Self::MissingPlane { plane } => write!(f, "no texture bound for plane {plane}"),
        }
    }
}

impl core::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Fetch(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FetchError> for RasterError {
    fn from(err: FetchError) -> Self {
        Self::Fetch(err)
    }
}
