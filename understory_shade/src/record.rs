// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-layout primitive records.
//!
//! Upstream packs every primitive into 4-float blocks inside a shared resource
//! cache. The decoders here only interpret fixed offsets: a record that was
//! packed wrongly decodes into whatever its floats say. Enum tags are the one
//! exception, they fall back to a documented default when unrecognized.

use core::fmt;

use kurbo::{Rect, Size};
use peniko::Color;

use crate::line::{LineOrientation, LineStyle};

/// One record block: four floats, the unit the resource cache hands out.
pub type Block = [f32; 4];

/// Integer handle addressing the first block of a record in a [`BlockStore`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockAddress(pub u32);

/// Read-only access to packed primitive records.
///
/// This is the seam to the resource cache owned by the upstream pipeline.
pub trait BlockStore {
    /// Returns `count` consecutive blocks starting at `address`, or `None` if
    /// the range is not backed by data.
    fn blocks(&self, address: BlockAddress, count: usize) -> Option<&[Block]>;
}

impl BlockStore for [Block] {
    fn blocks(&self, address: BlockAddress, count: usize) -> Option<&[Block]> {
        let start = usize::try_from(address.0).ok()?;
        self.get(start..start.checked_add(count)?)
    }
}

/// Error returned when a record range is not backed by the [`BlockStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FetchError {
    /// Address of the first requested block.
    pub address: BlockAddress,
    /// Number of blocks requested.
    pub requested: usize,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "blocks {}..{} are not backed by the block store",
            self.address.0,
            u64::from(self.address.0) + self.requested as u64
        )
    }
}

impl core::error::Error for FetchError {}

/// Fetches exactly `N` blocks starting at `address`.
pub fn fetch_blocks<S, const N: usize>(
    store: &S,
    address: BlockAddress,
) -> Result<[Block; N], FetchError>
where
    S: BlockStore + ?Sized,
{
    let err = FetchError {
        address,
        requested: N,
    };
    let blocks = store.blocks(address, N).ok_or(err)?;
    <[Block; N]>::try_from(blocks).map_err(|_| err)
}

/// Interprets a float-encoded enum tag.
///
/// Returns `None` for anything that is not a small non-negative integer,
/// including NaN.
#[expect(
    clippy::cast_possible_truncation,
    reason = "tags are small integers stored in float blocks; the round trip check rejects the rest"
)]
pub(crate) fn tag_index(tag: f32) -> Option<u32> {
    let index = tag as u32;
    (index as f32 == tag).then_some(index)
}

/// Line decoration record: color, wavy thickness, style and orientation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineRecord {
    /// Straight (unpremultiplied) line color.
    pub color: Color,
    /// Stroke thickness of a wavy line; ignored by other styles.
    pub wavy_line_thickness: f32,
    /// Stroke style.
    pub style: LineStyle,
    /// Which local axis runs along the line.
    pub orientation: LineOrientation,
}

impl LineRecord {
    /// Number of blocks a line record occupies.
    pub const BLOCK_COUNT: usize = 2;

    /// Decodes a line record.
    ///
    /// Layout: `[r, g, b, a]`, `[wavy_line_thickness, style, orientation, _]`.
    #[must_use]
    pub fn decode(blocks: &[Block; 2]) -> Self {
        let [color, params] = *blocks;
        Self {
            color: Color::new(color),
            wavy_line_thickness: params[0],
            style: LineStyle::from_tag(params[1]),
            orientation: LineOrientation::from_tag(params[2]),
        }
    }

    /// Packs this record into its block layout.
    #[must_use]
    pub fn encode(&self) -> [Block; 2] {
        [
            self.color.components,
            [
                self.wavy_line_thickness,
                self.style.tag(),
                self.orientation.tag(),
                0.0,
            ],
        ]
    }

    /// Fetches and decodes the line record at `address`.
    pub fn fetch<S: BlockStore + ?Sized>(
        store: &S,
        address: BlockAddress,
    ) -> Result<Self, FetchError> {
        fetch_blocks(store, address).map(|blocks| Self::decode(&blocks))
    }
}

/// YUV image record: the logical stretch size of the decoded image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YuvImageRecord {
    /// Size in local space the image is stretched over.
    pub size: Size,
}

impl YuvImageRecord {
    /// Number of blocks a YUV image record occupies.
    pub const BLOCK_COUNT: usize = 1;

    /// Decodes a YUV image record. Layout: `[width, height, _, _]`.
    #[must_use]
    pub fn decode(blocks: &[Block; 1]) -> Self {
        let [w, h, _, _] = blocks[0];
        Self {
            size: Size::new(f64::from(w), f64::from(h)),
        }
    }

    /// Packs this record into its block layout.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "records are stored as f32 blocks"
    )]
    pub fn encode(&self) -> [Block; 1] {
        [[self.size.width as f32, self.size.height as f32, 0.0, 0.0]]
    }

    /// Fetches and decodes the YUV image record at `address`.
    pub fn fetch<S: BlockStore + ?Sized>(
        store: &S,
        address: BlockAddress,
    ) -> Result<Self, FetchError> {
        fetch_blocks(store, address).map(|blocks| Self::decode(&blocks))
    }
}

/// A resolved texture region: where one plane lives in the atlas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ImageResource {
    /// Corners `p0`/`p1` of the region, in texels (or in already normalized
    /// coordinates, depending on the plane's texture target).
    pub uv_rect: Rect,
    /// Atlas layer holding the region.
    pub layer: u32,
}

impl ImageResource {
    /// Number of blocks an image resource occupies.
    pub const BLOCK_COUNT: usize = 2;

    /// Decodes an image resource.
    ///
    /// Layout: `[p0.x, p0.y, p1.x, p1.y]`, `[layer, _, _, _]`. A layer that is
    /// not a small non-negative integer reads as layer 0.
    #[must_use]
    pub fn decode(blocks: &[Block; 2]) -> Self {
        let [[x0, y0, x1, y1], [layer, ..]] = *blocks;
        let layer = tag_index(layer).unwrap_or_else(|| {
            tracing::debug!(layer, "unrecognized atlas layer, sampling layer 0");
            0
        });
        Self {
            uv_rect: Rect::new(
                f64::from(x0),
                f64::from(y0),
                f64::from(x1),
                f64::from(y1),
            ),
            layer,
        }
    }

    /// Packs this resource into its block layout.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "records are stored as f32 blocks"
    )]
    pub fn encode(&self) -> [Block; 2] {
        let r = self.uv_rect;
        [
            [r.x0 as f32, r.y0 as f32, r.x1 as f32, r.y1 as f32],
            [self.layer as f32, 0.0, 0.0, 0.0],
        ]
    }

    /// Fetches and decodes the image resource at `address`.
    pub fn fetch<S: BlockStore + ?Sized>(
        store: &S,
        address: BlockAddress,
    ) -> Result<Self, FetchError> {
        fetch_blocks(store, address).map(|blocks| Self::decode(&blocks))
    }
}
