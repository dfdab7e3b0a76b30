// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end rendering through the block store, textures and mapping.

use kurbo::{Affine, Rect, Size};
use peniko::Color;
use understory_shade::{
    BlockAddress, FetchError, ImageResource, LineOrientation, LinePrimitive, LineRecord,
    LineStyle, PlaneResource, YuvConfig, YuvFormat, YuvImagePrimitive, YuvImageRecord,
};
use understory_shade_raster::{
    BlockBuffer, FragmentMapping, LineDraw, NoClip, Pixmap, PlaneTexture, PlaneTextures,
    RasterError, RectClip, YuvDraw, render_line, render_line_draws, render_yuv,
    render_yuv_draws,
};

const WHITE_Y: u8 = 235;
const NEUTRAL_C: u8 = 128;

fn line_record(style: LineStyle, orientation: LineOrientation) -> LineRecord {
    LineRecord {
        color: Color::WHITE,
        wavy_line_thickness: 2.0,
        style,
        orientation,
    }
}

fn alpha(p: &Pixmap, x: usize, y: usize) -> f32 {
    p.pixel(x, y).unwrap().components[3]
}

/// White limited-range planes: 4x4 luma, 2x2 chroma.
fn white_planar_textures() -> PlaneTextures {
    PlaneTextures::new(vec![
        PlaneTexture::from_r8(4, 4, &[WHITE_Y; 16]).unwrap(),
        PlaneTexture::from_r8(2, 2, &[NEUTRAL_C; 4]).unwrap(),
        PlaneTexture::from_r8(2, 2, &[NEUTRAL_C; 4]).unwrap(),
    ])
}

fn resource(x1: f64, y1: f64) -> ImageResource {
    ImageResource {
        uv_rect: Rect::new(0.0, 0.0, x1, y1),
        layer: 0,
    }
}

#[test]
fn dashed_line_alternates_dashes_and_gaps() {
    let rect = Rect::new(0.0, 0.0, 24.0, 2.0);
    let line = LinePrimitive::from_record(
        &line_record(LineStyle::Dashed, LineOrientation::Horizontal),
        rect,
    );
    let mut target = Pixmap::new(24, 3);
    render_line(&mut target, &line, rect, &FragmentMapping::IDENTITY, &NoClip);

    // Dash length 6, period 12.
    for x in 0..24 {
        let expected = if x % 12 < 6 { 1.0 } else { 0.0 };
        assert_eq!(alpha(&target, x, 0), expected, "x = {x}");
        assert_eq!(alpha(&target, x, 1), expected, "x = {x}");
        // Outside the line's rect.
        assert_eq!(alpha(&target, x, 2), 0.0);
    }
    assert_eq!(&target.to_rgba8()[..4], &[255, 255, 255, 255]);
}

#[test]
fn vertical_line_is_the_transposed_horizontal_line() {
    let h_rect = Rect::new(0.0, 0.0, 24.0, 4.0);
    let v_rect = Rect::new(0.0, 0.0, 4.0, 24.0);
    let h = LinePrimitive::from_record(
        &line_record(LineStyle::Dotted, LineOrientation::Horizontal),
        h_rect,
    );
    let v = LinePrimitive::from_record(
        &line_record(LineStyle::Dotted, LineOrientation::Vertical),
        v_rect,
    );
    let mut h_target = Pixmap::new(24, 4);
    let mut v_target = Pixmap::new(4, 24);
    render_line(&mut h_target, &h, h_rect, &FragmentMapping::IDENTITY, &NoClip);
    render_line(&mut v_target, &v, v_rect, &FragmentMapping::IDENTITY, &NoClip);

    for y in 0..4 {
        for x in 0..24 {
            assert_eq!(h_target.pixel(x, y), v_target.pixel(y, x), "({x}, {y})");
        }
    }
}

#[test]
fn rect_clip_limits_coverage() {
    let rect = Rect::new(0.0, 0.0, 8.0, 2.0);
    let line = LinePrimitive::from_record(
        &line_record(LineStyle::Solid, LineOrientation::Horizontal),
        rect,
    );
    let clip = RectClip {
        rect: Rect::new(0.0, 0.0, 4.5, 2.0),
    };
    let mut target = Pixmap::new(8, 2);
    render_line(&mut target, &line, rect, &FragmentMapping::IDENTITY, &clip);
    assert_eq!(alpha(&target, 3, 0), 1.0);
    assert_eq!(alpha(&target, 4, 0), 0.5);
    assert_eq!(alpha(&target, 5, 0), 0.0);
}

#[test]
fn planar_image_fills_exactly_its_rect() {
    let mut store = BlockBuffer::new();
    let image = store.push_yuv_image(&YuvImageRecord {
        size: Size::new(8.0, 8.0),
    });
    let y = store.push_image_resource(&resource(4.0, 4.0));
    let u = store.push_image_resource(&resource(2.0, 2.0));
    let v = store.push_image_resource(&resource(2.0, 2.0));
    let draw = YuvDraw {
        image,
        planes: [y, u, v],
        local_rect: Rect::new(2.0, 2.0, 10.0, 10.0),
    };

    let mut target = Pixmap::new(12, 12);
    render_yuv_draws(
        &mut target,
        &store,
        &[draw],
        &YuvConfig::default(),
        &white_planar_textures(),
        &FragmentMapping::IDENTITY,
        &NoClip,
    )
    .unwrap();

    for y in 0..12 {
        for x in 0..12 {
            let [r, g, b, a] = target.pixel(x, y).unwrap().components;
            if (2..10).contains(&x) && (2..10).contains(&y) {
                assert_eq!(a, 1.0);
                for c in [r, g, b] {
                    assert!((c - 1.0).abs() < 1e-3, "({x}, {y}): {c}");
                }
            } else {
                assert_eq!(a, 0.0, "({x}, {y})");
            }
        }
    }
}

#[test]
fn stretched_atlas_tile_does_not_bleed_into_its_neighbor() {
    // An 8x4 luma atlas: a white 4x4 tile next to a black one.
    let luma: Vec<u8> = (0..32)
        .map(|i| if i % 8 < 4 { WHITE_Y } else { 16 })
        .collect();
    let textures = PlaneTextures::new(vec![
        PlaneTexture::from_r8(8, 4, &luma).unwrap(),
        PlaneTexture::from_r8(2, 2, &[NEUTRAL_C; 4]).unwrap(),
        PlaneTexture::from_r8(2, 2, &[NEUTRAL_C; 4]).unwrap(),
    ]);
    let planes: Vec<PlaneResource> = [resource(4.0, 4.0), resource(2.0, 2.0), resource(2.0, 2.0)]
        .into_iter()
        .zip(&textures.planes)
        .map(|(resource, texture)| PlaneResource {
            resource,
            target: texture.target(),
        })
        .collect();
    let local_rect = Rect::new(0.0, 0.0, 16.0, 16.0);
    let image = YuvImagePrimitive::from_resources(
        &YuvImageRecord {
            size: Size::new(16.0, 16.0),
        },
        local_rect,
        &planes,
    );

    let mut target = Pixmap::new(16, 16);
    render_yuv(
        &mut target,
        &image,
        &YuvConfig::default(),
        &FragmentMapping::IDENTITY,
        &textures,
        &NoClip,
    );
    for (i, p) in target.pixels().iter().enumerate() {
        assert!(p.components[0] > 0.999, "pixel {i}: {:?}", p.components);
    }
}

#[test]
fn interleaved_image_with_rect_addressing() {
    let texel = [NEUTRAL_C, WHITE_Y, NEUTRAL_C, 255];
    let textures = PlaneTextures::new(vec![
        PlaneTexture::from_rgba8(2, 2, &texel.repeat(4))
            .unwrap()
            .with_rect_addressing(),
    ]);
    let mut store = BlockBuffer::new();
    let image = store.push_yuv_image(&YuvImageRecord {
        size: Size::new(4.0, 4.0),
    });
    let plane = store.push_image_resource(&resource(2.0, 2.0));
    let draw = YuvDraw {
        image,
        // Only the first plane is read.
        planes: [plane, BlockAddress(999), BlockAddress(999)],
        local_rect: Rect::new(0.0, 0.0, 4.0, 4.0),
    };
    let config = YuvConfig {
        format: YuvFormat::InterleavedYCbCr,
        ..YuvConfig::default()
    };

    let mut target = Pixmap::new(4, 4);
    render_yuv_draws(
        &mut target,
        &store,
        &[draw],
        &config,
        &textures,
        &FragmentMapping::IDENTITY,
        &NoClip,
    )
    .unwrap();
    let [r, g, b, a] = target.pixel(1, 2).unwrap().components;
    assert_eq!(a, 1.0);
    assert!((r - 1.0).abs() < 1e-3 && (g - 1.0).abs() < 1e-3 && (b - 1.0).abs() < 1e-3);
}

#[test]
fn rotated_image_has_anti_aliased_edges() {
    let textures = white_planar_textures();
    let planes: Vec<PlaneResource> = [resource(4.0, 4.0), resource(2.0, 2.0), resource(2.0, 2.0)]
        .into_iter()
        .zip(&textures.planes)
        .map(|(resource, texture)| PlaneResource {
            resource,
            target: texture.target(),
        })
        .collect();
    let local_rect = Rect::new(-6.0, -6.0, 6.0, 6.0);
    let image = YuvImagePrimitive::from_resources(
        &YuvImageRecord {
            size: Size::new(12.0, 12.0),
        },
        local_rect,
        &planes,
    );
    let mapping =
        FragmentMapping::from_local_to_device(Affine::translate((16.0, 16.0)) * Affine::rotate(0.3));

    let mut target = Pixmap::new(32, 32);
    render_yuv(
        &mut target,
        &image,
        &YuvConfig::default(),
        &mapping,
        &textures,
        &NoClip,
    );

    assert_eq!(alpha(&target, 16, 16), 1.0);
    assert_eq!(alpha(&target, 0, 0), 0.0);
    let partial = target
        .pixels()
        .iter()
        .filter(|p| p.components[3] > 0.0 && p.components[3] < 1.0)
        .count();
    assert!(partial > 0);
    // Color stays premultiplied white.
    for p in target.pixels() {
        let [r, _, _, a] = p.components;
        assert!((r - a).abs() < 1e-3);
    }
}

#[test]
fn rendering_is_deterministic() {
    let rect = Rect::new(0.0, 2.0, 40.0, 8.0);
    let line = LinePrimitive::from_record(
        &line_record(LineStyle::Wavy, LineOrientation::Horizontal),
        rect,
    );
    let mapping = FragmentMapping::from_local_to_device(Affine::rotate(0.1));
    let render = || {
        let mut target = Pixmap::new(48, 16);
        render_line(&mut target, &line, rect, &mapping, &NoClip);
        target
    };
    let first = render();
    assert!(first.pixels().iter().any(|p| p.components[3] > 0.0));
    assert_eq!(first, render());
}

#[test]
fn failed_fetch_draws_nothing() {
    let mut store = BlockBuffer::new();
    let record = store.push_line(&line_record(LineStyle::Solid, LineOrientation::Horizontal));
    let rect = Rect::new(0.0, 0.0, 4.0, 4.0);
    let draws = [
        LineDraw {
            record,
            local_rect: rect,
        },
        LineDraw {
            record: BlockAddress(100),
            local_rect: rect,
        },
    ];
    let mut target = Pixmap::new(4, 4);
    let result = render_line_draws(
        &mut target,
        &store,
        &draws,
        &FragmentMapping::IDENTITY,
        &NoClip,
    );
    assert_eq!(
        result,
        Err(RasterError::Fetch(FetchError {
            address: BlockAddress(100),
            requested: 2,
        }))
    );
    assert_eq!(target, Pixmap::new(4, 4));

    render_line_draws(&mut target, &store, &draws[..1], &FragmentMapping::IDENTITY, &NoClip)
        .unwrap();
    assert_eq!(alpha(&target, 3, 3), 1.0);
}

#[test]
fn unbound_plane_is_reported() {
    let mut store = BlockBuffer::new();
    let image = store.push_yuv_image(&YuvImageRecord {
        size: Size::new(4.0, 4.0),
    });
    let y = store.push_image_resource(&resource(4.0, 4.0));
    let draw = YuvDraw {
        image,
        planes: [y, y, y],
        local_rect: Rect::new(0.0, 0.0, 4.0, 4.0),
    };
    let textures = PlaneTextures::new(vec![PlaneTexture::from_r8(4, 4, &[WHITE_Y; 16]).unwrap()]);
    let config = YuvConfig {
        format: YuvFormat::Nv12,
        ..YuvConfig::default()
    };
    let mut target = Pixmap::new(4, 4);
    let result = render_yuv_draws(
        &mut target,
        &store,
        &[draw],
        &config,
        &textures,
        &FragmentMapping::IDENTITY,
        &NoClip,
    );
    assert_eq!(result, Err(RasterError::MissingPlane { plane: 1 }));
}
