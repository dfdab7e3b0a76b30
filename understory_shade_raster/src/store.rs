// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_shade::{Block, BlockAddress, BlockStore, ImageResource, LineRecord, YuvImageRecord};

/// A growable in-memory block store.
///
/// Records are appended and addressed by the index of their first block, the
/// way the upstream resource cache hands out addresses.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockBuffer {
    blocks: Vec<Block>,
}

impl BlockBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw blocks and returns the address of the first one.
    pub fn push(&mut self, blocks: &[Block]) -> BlockAddress {
        let address = BlockAddress(
            u32::try_from(self.blocks.len()).expect("BlockBuffer: too many blocks for u32 address"),
        );
        self.blocks.extend_from_slice(blocks);
        address
    }

    /// Appends a line record.
    pub fn push_line(&mut self, record: &LineRecord) -> BlockAddress {
        self.push(&record.encode())
    }

    /// Appends a YUV image record.
    pub fn push_yuv_image(&mut self, record: &YuvImageRecord) -> BlockAddress {
        self.push(&record.encode())
    }

    /// Appends an image resource.
    pub fn push_image_resource(&mut self, resource: &ImageResource) -> BlockAddress {
        self.push(&resource.encode())
    }

    /// Number of stored blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the buffer holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Removes every block. Previously returned addresses become invalid.
    pub fn clear(&mut self) {
        self.blocks.clear();
    }
}

impl BlockStore for BlockBuffer {
    fn blocks(&self, address: BlockAddress, count: usize) -> Option<&[Block]> {
        self.blocks.as_slice().blocks(address, count)
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;
    use peniko::Color;
    use understory_shade::{FetchError, LineOrientation, LineStyle};

    use super::*;

    #[test]
    fn records_are_addressed_by_first_block() {
        let mut buf = BlockBuffer::new();
        let line = LineRecord {
            color: Color::BLACK,
            wavy_line_thickness: 1.0,
            style: LineStyle::Dotted,
            orientation: LineOrientation::Vertical,
        };
        let resource = ImageResource {
            uv_rect: Rect::new(0.0, 0.0, 4.0, 4.0),
            layer: 2,
        };
        let a = buf.push_line(&line);
        let b = buf.push_image_resource(&resource);
        assert_eq!((a, b), (BlockAddress(0), BlockAddress(2)));
        assert_eq!(buf.len(), 4);
        assert_eq!(LineRecord::fetch(&buf, a), Ok(line));
        assert_eq!(ImageResource::fetch(&buf, b), Ok(resource));
    }

    #[test]
    fn fetch_past_the_end_fails() {
        let mut buf = BlockBuffer::new();
        let a = buf.push_yuv_image(&YuvImageRecord {
            size: kurbo::Size::new(2.0, 2.0),
        });
        assert_eq!(
            LineRecord::fetch(&buf, a),
            Err(FetchError {
                address: a,
                requested: 2
            })
        );
        buf.clear();
        assert!(buf.is_empty());
    }
}
