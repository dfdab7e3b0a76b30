// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full raster passes through `understory_shade_raster`.

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use kurbo::{Affine, Rect, Size};
use peniko::Color;
use understory_shade::{
    ImageResource, LineOrientation, LinePrimitive, LineRecord, LineStyle, PlaneResource,
    YuvConfig, YuvImagePrimitive, YuvImageRecord,
};
use understory_shade_raster::{
    FragmentMapping, NoClip, Pixmap, PlaneTexture, PlaneTextures, render_line, render_yuv,
};

const SIZE: usize = 256;

fn planar_textures() -> PlaneTextures {
    let luma: Vec<u8> = (0..SIZE * SIZE).map(|i| (i % 220) as u8 + 16).collect();
    let chroma: Vec<u8> = (0..SIZE * SIZE / 4).map(|i| (i % 200) as u8 + 28).collect();
    PlaneTextures::new(vec![
        PlaneTexture::from_r8(SIZE, SIZE, &luma).expect("luma size"),
        PlaneTexture::from_r8(SIZE / 2, SIZE / 2, &chroma).expect("chroma size"),
        PlaneTexture::from_r8(SIZE / 2, SIZE / 2, &chroma).expect("chroma size"),
    ])
}

fn image(textures: &PlaneTextures, local_rect: Rect) -> YuvImagePrimitive {
    let extent = [SIZE as f64, SIZE as f64 / 2.0, SIZE as f64 / 2.0];
    let planes: Vec<PlaneResource> = textures
        .planes
        .iter()
        .zip(extent)
        .map(|(texture, e)| PlaneResource {
            resource: ImageResource {
                uv_rect: Rect::new(0.0, 0.0, e, e),
                layer: 0,
            },
            target: texture.target(),
        })
        .collect();
    YuvImagePrimitive::from_resources(
        &YuvImageRecord {
            size: local_rect.size(),
        },
        local_rect,
        &planes,
    )
}

fn bench_raster(c: &mut Criterion) {
    let mut group = c.benchmark_group("raster");
    let textures = planar_textures();
    let config = YuvConfig::default();

    let local_rect = Rect::from_origin_size((0.0, 0.0), Size::new(SIZE as f64, SIZE as f64));
    let axis_aligned = image(&textures, local_rect);
    group.bench_function("yuv_axis_aligned", |b| {
        b.iter_batched(
            || Pixmap::new(SIZE, SIZE),
            |mut target| {
                render_yuv(
                    &mut target,
                    &axis_aligned,
                    &config,
                    &FragmentMapping::IDENTITY,
                    &textures,
                    &NoClip,
                );
                target
            },
            BatchSize::LargeInput,
        );
    });

    let centered = image(&textures, local_rect - local_rect.center().to_vec2());
    let rotated = FragmentMapping::from_local_to_device(
        Affine::translate((SIZE as f64 / 2.0, SIZE as f64 / 2.0))
            * Affine::rotate(0.4)
            * Affine::scale(0.6),
    );
    group.bench_function("yuv_rotated", |b| {
        b.iter_batched(
            || Pixmap::new(SIZE, SIZE),
            |mut target| {
                render_yuv(&mut target, &centered, &config, &rotated, &textures, &NoClip);
                target
            },
            BatchSize::LargeInput,
        );
    });

    let line_rect = Rect::new(0.0, 0.0, SIZE as f64, 8.0);
    let wavy = LinePrimitive::from_record(
        &LineRecord {
            color: Color::BLACK,
            wavy_line_thickness: 3.0,
            style: LineStyle::Wavy,
            orientation: LineOrientation::Horizontal,
        },
        line_rect,
    );
    group.bench_function("wavy_line", |b| {
        b.iter_batched(
            || Pixmap::new(SIZE, 8),
            |mut target| {
                render_line(&mut target, &wavy, line_rect, &FragmentMapping::IDENTITY, &NoClip);
                target
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_raster);
criterion_main!(benches);
