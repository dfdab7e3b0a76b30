// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::Range;

use kurbo::Rect;
use peniko::color::{PremulColor, Srgb};
use rayon::prelude::*;
use understory_shade::{
    BlockAddress, BlockStore, ImageResource, LineFragment, LinePrimitive, LineRecord,
    PlaneResource, PlaneSampler, YuvConfig, YuvFragment, YuvImagePrimitive, YuvImageRecord,
    shade_line, shade_yuv,
};

use crate::mapping::device_center;
use crate::pixmap::over;
use crate::{ClipMask, FragmentMapping, Pixmap, PlaneTextures, RasterError};

/// A line decoration stored in a block store.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineDraw {
    /// Address of the [`LineRecord`].
    pub record: BlockAddress,
    /// Local rect covered by the line.
    pub local_rect: Rect,
}

/// A YUV image stored in a block store.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct YuvDraw {
    /// Address of the [`YuvImageRecord`].
    pub image: BlockAddress,
    /// Addresses of the plane [`ImageResource`]s, luma first. Entries past the
    /// format's plane count are not read.
    pub planes: [BlockAddress; 3],
    /// Local rect covered by the image.
    pub local_rect: Rect,
}

/// Shades and composites a line decoration.
///
/// Pixels whose center maps outside `local_rect` are left untouched.
pub fn render_line<C>(
    target: &mut Pixmap,
    line: &LinePrimitive,
    local_rect: Rect,
    mapping: &FragmentMapping,
    clip: &C,
) where
    C: ClipMask + Sync + ?Sized,
{
    let _span = tracing::debug_span!("render_line", style = ?line.params.style()).entered();
    let local_rect = local_rect.abs();
    let aa_range = mapping.aa_range();
    shade_region(target, mapping.device_bounds(local_rect), |x, y| {
        let local_pos = mapping.local_pos(x, y);
        if !local_rect.contains(local_pos) {
            return None;
        }
        let fragment = LineFragment {
            local_pos,
            aa_range,
            clip_alpha: clip.alpha(device_center(x, y)),
        };
        Some(shade_line(line, &fragment))
    });
}

/// Shades and composites a YUV image.
///
/// Under an axis-aligned mapping, pixels whose center maps outside the
/// image's local rect are skipped. Otherwise every pixel near the rect is
/// shaded as a transformed fragment, which stretches the image edge and
/// anti-aliases it.
pub fn render_yuv<S, C>(
    target: &mut Pixmap,
    image: &YuvImagePrimitive,
    config: &YuvConfig,
    mapping: &FragmentMapping,
    sampler: &S,
    clip: &C,
) where
    S: PlaneSampler + Sync + ?Sized,
    C: ClipMask + Sync + ?Sized,
{
    let _span = tracing::debug_span!("render_yuv", format = ?config.format).entered();
    let local_rect = image.local_rect.abs();
    let aa_range = mapping.aa_range();
    let axis_aligned = mapping.is_axis_aligned();
    let region = if axis_aligned {
        mapping.device_bounds(local_rect)
    } else {
        mapping.device_bounds(local_rect.inflate(aa_range, aa_range))
    };
    shade_region(target, region, |x, y| {
        let local_pos = mapping.local_pos(x, y);
        if axis_aligned && !local_rect.contains(local_pos) {
            return None;
        }
        let fragment = YuvFragment {
            local_pos,
            local_bounds: (!axis_aligned).then_some(local_rect),
            aa_range,
            clip_alpha: clip.alpha(device_center(x, y)),
        };
        Some(shade_yuv(image, config, &fragment, sampler))
    });
}

/// Fetches and renders line records.
///
/// Every record is fetched before anything is drawn, so a failed fetch
/// leaves `target` unchanged.
pub fn render_line_draws<B, C>(
    target: &mut Pixmap,
    store: &B,
    draws: &[LineDraw],
    mapping: &FragmentMapping,
    clip: &C,
) -> Result<(), RasterError>
where
    B: BlockStore + ?Sized,
    C: ClipMask + Sync + ?Sized,
{
    let lines = draws
        .iter()
        .map(|draw| -> Result<_, RasterError> {
            let record = LineRecord::fetch(store, draw.record)?;
            Ok((LinePrimitive::from_record(&record, draw.local_rect), draw.local_rect))
        })
        .collect::<Result<Vec<_>, RasterError>>()?;
    for (line, local_rect) in &lines {
        render_line(target, line, *local_rect, mapping, clip);
    }
    Ok(())
}

/// Fetches and renders YUV image records, sampling `textures`.
///
/// Each plane the format reads must have a texture; its addressing decides
/// how the plane's image resource is normalized. As with
/// [`render_line_draws`], nothing is drawn unless every draw resolves.
pub fn render_yuv_draws<B, C>(
    target: &mut Pixmap,
    store: &B,
    draws: &[YuvDraw],
    config: &YuvConfig,
    textures: &PlaneTextures,
    mapping: &FragmentMapping,
    clip: &C,
) -> Result<(), RasterError>
where
    B: BlockStore + ?Sized,
    C: ClipMask + Sync + ?Sized,
{
    let images = draws
        .iter()
        .map(|draw| -> Result<_, RasterError> {
            let record = YuvImageRecord::fetch(store, draw.image)?;
            let planes = (0..config.format.plane_count())
                .map(|plane| -> Result<_, RasterError> {
                    let texture = textures
                        .plane(plane)
                        .ok_or(RasterError::MissingPlane { plane })?;
                    Ok(PlaneResource {
                        resource: ImageResource::fetch(store, draw.planes[plane])?,
                        target: texture.target(),
                    })
                })
                .collect::<Result<Vec<_>, RasterError>>()?;
            Ok(YuvImagePrimitive::from_resources(
                &record,
                draw.local_rect,
                &planes,
            ))
        })
        .collect::<Result<Vec<_>, RasterError>>()?;
    for image in &images {
        render_yuv(target, image, config, mapping, textures, clip);
    }
    Ok(())
}

/// Composites `shade(x, y)` over every pixel of the device-space `region`,
/// one row per rayon task.
fn shade_region<F>(target: &mut Pixmap, region: Rect, shade: F)
where
    F: Fn(usize, usize) -> Option<PremulColor<Srgb>> + Sync,
{
    let width = target.width();
    let xs = pixel_span(region.x0, region.x1, width);
    let ys = pixel_span(region.y0, region.y1, target.height());
    if xs.is_empty() || ys.is_empty() {
        tracing::debug!(?region, "primitive covers no pixels");
        return;
    }
    let rows = &mut target.pixels_mut()[ys.start * width..ys.end * width];
    rows.par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| {
            let y = ys.start + i;
            for x in xs.clone() {
                if let Some(src) = shade(x, y) {
                    row[x] = over(src, row[x]);
                }
            }
        });
}

/// Pixels whose extent overlaps `lo..hi`, clamped to `0..len`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "bounds are clamped to the pixmap size before the cast"
)]
fn pixel_span(lo: f64, hi: f64, len: usize) -> Range<usize> {
    if !(lo.is_finite() && hi.is_finite()) {
        return 0..0;
    }
    let max = len as f64;
    let start = lo.floor().clamp(0.0, max) as usize;
    let end = hi.ceil().clamp(0.0, max) as usize;
    start..end.max(start)
}
