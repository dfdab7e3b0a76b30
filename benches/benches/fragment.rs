// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-fragment cost of the shading core.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, QuadBez, Rect, Size};
use peniko::Color;
use understory_shade::bezier::approx_distance;
use understory_shade::{
    ImageResource, LineFragment, LineOrientation, LinePrimitive, LineRecord, LineStyle,
    PlaneResource, Texel, TextureTarget, YuvConfig, YuvFormat, YuvFragment, YuvImagePrimitive,
    YuvImageRecord, shade_line, shade_yuv,
};

/// Fragment positions covering a `w` x `h` grid of pixel centers.
fn grid(w: u32, h: u32) -> Vec<Point> {
    (0..h)
        .flat_map(|y| (0..w).map(move |x| Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)))
        .collect()
}

fn bench_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_line");
    let rect = Rect::new(0.0, 0.0, 256.0, 6.0);
    let points = grid(256, 6);

    for style in [
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::Dotted,
        LineStyle::Wavy,
    ] {
        let record = LineRecord {
            color: Color::from_rgb8(0x20, 0x60, 0xe0),
            wavy_line_thickness: 2.0,
            style,
            orientation: LineOrientation::Horizontal,
        };
        let line = LinePrimitive::from_record(&record, rect);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{style:?}")), &line, |b, line| {
            b.iter(|| {
                let mut sum = 0.0_f32;
                for &p in &points {
                    sum += shade_line(line, &LineFragment::new(p, 1.0)).components[3];
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

fn bench_yuv(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_yuv");
    let local_rect = Rect::new(0.0, 0.0, 64.0, 64.0);
    let plane = |w: f64, h: f64| PlaneResource {
        resource: ImageResource {
            uv_rect: Rect::new(0.0, 0.0, w, h),
            layer: 0,
        },
        target: TextureTarget::Rect,
    };
    let image = YuvImagePrimitive::from_resources(
        &YuvImageRecord {
            size: Size::new(64.0, 64.0),
        },
        local_rect,
        &[plane(64.0, 64.0), plane(32.0, 32.0), plane(32.0, 32.0)],
    );
    let sampler = |plane: usize, uv: Point, _layer: u32| -> Texel {
        let v = (uv.x * 0.01 + uv.y * 0.003) as f32;
        [v + plane as f32 * 0.1, 0.5, 0.5, 1.0]
    };
    let points = grid(64, 64);

    for format in [YuvFormat::Planar, YuvFormat::Nv12, YuvFormat::InterleavedYCbCr] {
        let config = YuvConfig {
            format,
            ..YuvConfig::default()
        };
        group.bench_function(BenchmarkId::new("untransformed", format!("{format:?}")), |b| {
            b.iter(|| {
                let mut sum = 0.0_f32;
                for &p in &points {
                    sum += shade_yuv(&image, &config, &YuvFragment::new(p), &sampler).components[0];
                }
                black_box(sum)
            });
        });
    }

    let config = YuvConfig::default();
    group.bench_function("transformed/Planar", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            for &p in &points {
                let fragment = YuvFragment {
                    local_pos: p,
                    local_bounds: Some(local_rect),
                    aa_range: 1.2,
                    clip_alpha: 1.0,
                };
                sum += shade_yuv(&image, &config, &fragment, &sampler).components[3];
            }
            black_box(sum)
        });
    });

    group.finish();
}

fn bench_bezier(c: &mut Criterion) {
    let quad = QuadBez::new((0.0, 0.0), (32.0, 48.0), (64.0, 0.0));
    let points = grid(64, 32);
    c.bench_function("bezier_approx_distance", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for &p in &points {
                sum += approx_distance(p, black_box(quad));
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_line, bench_yuv, bench_bezier);
criterion_main!(benches);
