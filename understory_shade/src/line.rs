// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decorative line styles: solid, dashed, dotted and wavy.
//!
//! All style math is written for a horizontal line. Vertical lines swap x and
//! y once, at setup for the flat parameters and per fragment for the local
//! position, before the same evaluation runs.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _; // for `floor`
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use peniko::color::{PremulColor, Srgb};

use crate::aa::distance_aa;
use crate::record::{LineRecord, tag_index};

/// Coverage threshold that binarizes thin wavy lines.
///
/// At a half thickness of one pixel or less, coverage above this value
/// becomes `1` and the rest `0`.
pub const WAVY_LINE_AA_SNAP: f64 = 0.7;

/// Stroke style of a line decoration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineStyle {
    /// A continuous stroke.
    #[default]
    Solid,
    /// Round dots one thickness in diameter, one diameter apart.
    Dotted,
    /// Hard-edged dashes three thicknesses long.
    Dashed,
    /// A zigzag with flattened peaks.
    Wavy,
}

impl LineStyle {
    /// Decodes a record tag. Unrecognized tags shade as [`LineStyle::Solid`],
    /// leaving coverage unmodified.
    #[must_use]
    pub fn from_tag(tag: f32) -> Self {
        match tag_index(tag) {
            Some(0) => Self::Solid,
            Some(1) => Self::Dotted,
            Some(2) => Self::Dashed,
            Some(3) => Self::Wavy,
            _ => {
                tracing::debug!(tag, "unrecognized line style tag, shading as solid");
                Self::Solid
            }
        }
    }

    /// Record tag for this style.
    #[must_use]
    pub fn tag(self) -> f32 {
        match self {
            Self::Solid => 0.0,
            Self::Dotted => 1.0,
            Self::Dashed => 2.0,
            Self::Wavy => 3.0,
        }
    }
}

/// Which local axis runs along the line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineOrientation {
    /// The line runs along local x.
    #[default]
    Horizontal,
    /// The line runs along local y.
    Vertical,
}

impl LineOrientation {
    /// Decodes a record tag. Unrecognized tags read as
    /// [`LineOrientation::Horizontal`].
    #[must_use]
    pub fn from_tag(tag: f32) -> Self {
        match tag_index(tag) {
            Some(0) => Self::Horizontal,
            Some(1) => Self::Vertical,
            _ => {
                tracing::debug!(tag, "unrecognized line orientation tag, using horizontal");
                Self::Horizontal
            }
        }
    }

    /// Record tag for this orientation.
    #[must_use]
    pub fn tag(self) -> f32 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => 1.0,
        }
    }

    /// Maps a local point into the horizontal frame (x along the line).
    ///
    /// Swapping is its own inverse, so this also maps back.
    #[must_use]
    pub fn canonical(self, p: Point) -> Point {
        match self {
            Self::Horizontal => p,
            Self::Vertical => Point::new(p.y, p.x),
        }
    }

    /// Maps a local size into the horizontal frame.
    #[must_use]
    pub fn canonical_size(self, s: Size) -> Size {
        match self {
            Self::Horizontal => s,
            Self::Vertical => Size::new(s.height, s.width),
        }
    }
}

/// Flat per-primitive style parameters, in the horizontal frame.
///
/// Computed once per primitive; every fragment of the line reads the same
/// values.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LineParams {
    /// No parameters: coverage is left unmodified.
    Solid,
    /// Binary on/off dashes.
    Dashed {
        /// Length of one dash plus one gap.
        period: f64,
        /// Length of the "on" part at the start of each period.
        dash_length: f64,
    },
    /// Anti-aliased round dots.
    Dotted {
        /// Distance between dot starts.
        period: f64,
        /// Dot radius.
        radius: f64,
        /// Cross-axis coordinate of the dot centers.
        center_line: f64,
        /// Along-axis extent (from the line origin) past which nothing is
        /// drawn, so the line ends on a whole dot.
        max_extent: f64,
    },
    /// A zigzag of slopes and flats, three segments per half period.
    Wavy {
        /// Half the stroke thickness.
        half_thickness: f64,
        /// Along-axis length of each slope.
        slope_length: f64,
        /// Along-axis length of each flat peak or trough.
        flat_length: f64,
        /// Cross-axis extent of the whole wave.
        vertical_extent: f64,
    },
}

impl LineParams {
    /// Derives the parameters of `style` for a line whose local rect, already
    /// in the horizontal frame, starts at `origin` and has `size`.
    ///
    /// `size.height` is the line thickness (or, for wavy lines, the height of
    /// the band the wave occupies).
    #[must_use]
    pub fn derive(style: LineStyle, origin: Point, size: Size, wavy_line_thickness: f64) -> Self {
        match style {
            LineStyle::Solid => Self::Solid,
            LineStyle::Dashed => {
                let dash_length = size.height * 3.0;
                Self::Dashed {
                    period: dash_length * 2.0,
                    dash_length,
                }
            }
            LineStyle::Dotted => {
                let diameter = size.height;
                let period = diameter * 2.0;
                let max_extent = if period > 0.0 {
                    (size.width / period).floor() * period
                } else {
                    0.0
                };
                Self::Dotted {
                    period,
                    radius: diameter / 2.0,
                    center_line: origin.y + size.height * 0.5,
                    max_extent,
                }
            }
            LineStyle::Wavy => {
                let line_thickness = wavy_line_thickness.max(1.0);
                // Slopes run at 45 degrees, so the height between peaks and
                // troughs is also the along-axis length of each slope.
                let slope_length = size.height - line_thickness;
                let flat_length = ((line_thickness - 1.0) * 2.0).max(1.0);
                Self::Wavy {
                    half_thickness: line_thickness / 2.0,
                    slope_length,
                    flat_length,
                    vertical_extent: size.height,
                }
            }
        }
    }

    /// The style these parameters belong to.
    #[must_use]
    pub fn style(&self) -> LineStyle {
        match self {
            Self::Solid => LineStyle::Solid,
            Self::Dashed { .. } => LineStyle::Dashed,
            Self::Dotted { .. } => LineStyle::Dotted,
            Self::Wavy { .. } => LineStyle::Wavy,
        }
    }
}

/// A line decoration ready for per-fragment evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinePrimitive {
    /// Straight line color.
    pub color: Color,
    /// Which local axis runs along the line.
    pub orientation: LineOrientation,
    /// Style parameters, in the horizontal frame.
    pub params: LineParams,
    /// Start of the line, in the horizontal frame. Periodic styles measure
    /// their phase from here.
    pub local_origin: Point,
}

impl LinePrimitive {
    /// Sets up a line from its record and local rect.
    #[must_use]
    pub fn from_record(record: &LineRecord, local_rect: Rect) -> Self {
        let local_rect = local_rect.abs();
        let origin = record.orientation.canonical(local_rect.origin());
        let size = record.orientation.canonical_size(local_rect.size());
        Self {
            color: record.color,
            orientation: record.orientation,
            params: LineParams::derive(
                record.style,
                origin,
                size,
                f64::from(record.wavy_line_thickness),
            ),
            local_origin: origin,
        }
    }
}

/// Per-fragment inputs for line shading.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineFragment {
    /// Fragment position in the line's local space.
    pub local_pos: Point,
    /// Local-space extent of one device pixel.
    pub aa_range: f64,
    /// Coverage from the clip mask, in `[0, 1]`.
    pub clip_alpha: f32,
}

impl LineFragment {
    /// A fragment with no clip mask applied.
    #[must_use]
    pub fn new(local_pos: Point, aa_range: f64) -> Self {
        Self {
            local_pos,
            aa_range,
            clip_alpha: 1.0,
        }
    }
}

/// GLSL `mod`: the result takes the sign of `period`.
///
/// Returns `None` when the period is zero, negative or NaN; such a pattern
/// has nothing to draw.
fn phase(x: f64, period: f64) -> Option<f64> {
    (period > 0.0).then(|| x - period * (x / period).floor())
}

/// Signed distance from `p` to the line through `p0` with normal `perp_dir`.
fn distance_to_line(p0: Point, perp_dir: Vec2, p: Point) -> f64 {
    (perp_dir / perp_dir.hypot()).dot(p0 - p)
}

/// Style coverage of `line` at `local_pos`, ignoring clipping.
#[must_use]
pub fn line_alpha(line: &LinePrimitive, local_pos: Point, aa_range: f64) -> f64 {
    let pos = line.orientation.canonical(local_pos);
    let origin = line.local_origin;
    match line.params {
        LineParams::Solid => 1.0,
        LineParams::Dashed {
            period,
            dash_length,
        } => match phase(pos.x - origin.x, period) {
            Some(x) if x <= dash_length => 1.0,
            _ => 0.0,
        },
        LineParams::Dotted {
            period,
            radius,
            center_line,
            max_extent,
        } => {
            let Some(x) = phase(pos.x - origin.x, period) else {
                return 0.0;
            };
            // Clip off the partial dot at the end of the line.
            if pos.x - origin.x > max_extent {
                return 0.0;
            }
            let dot_distance = Vec2::new(x - radius, pos.y - center_line).hypot() - radius;
            distance_aa(aa_range, dot_distance)
        }
        LineParams::Wavy {
            half_thickness,
            slope_length,
            flat_length,
            vertical_extent,
        } => wavy_alpha(
            pos - origin,
            half_thickness,
            slope_length,
            flat_length,
            vertical_extent,
            aa_range,
        ),
    }
}

fn wavy_alpha(
    local: Vec2,
    half_thickness: f64,
    slope_length: f64,
    flat_length: f64,
    vertical_extent: f64,
    aa_range: f64,
) -> f64 {
    let half_period = slope_length + flat_length;
    let (Some(full_phase), Some(x)) = (
        phase(local.x, 2.0 * half_period),
        phase(local.x, half_period),
    ) else {
        return 0.0;
    };

    let mid_height = vertical_extent / 2.0;
    // Peaks up in the first half period, down in the second.
    let flip = if full_phase <= half_period { -1.0 } else { 1.0 };
    let peak_height = mid_height + (mid_height - half_thickness) * flip;

    // The three segments of one half period: the flat peak and the slopes
    // into and out of it.
    let p = Point::new(x, local.y);
    let peak_start = Point::new(0.0, peak_height);
    let peak_end = Point::new(flat_length, peak_height);
    let dist1 = distance_to_line(peak_start, Vec2::new(1.0, -flip), p);
    let dist2 = distance_to_line(peak_start, Vec2::new(0.0, -flip), p);
    let dist3 = distance_to_line(peak_end, Vec2::new(-1.0, -flip), p);
    let dist = dist1.max(dist2).max(dist3).abs();

    let alpha = distance_aa(aa_range, dist - half_thickness);
    if half_thickness <= 1.0 {
        if alpha > WAVY_LINE_AA_SNAP { 1.0 } else { 0.0 }
    } else {
        alpha
    }
}

/// Shades one fragment of `line`.
///
/// Returns the premultiplied line color scaled by the style coverage times
/// the fragment's clip coverage.
#[must_use]
pub fn shade_line(line: &LinePrimitive, fragment: &LineFragment) -> PremulColor<Srgb> {
    let style_alpha = line_alpha(line, fragment.local_pos, fragment.aa_range);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "coverage is in [0, 1] and colors are f32"
    )]
    let alpha = style_alpha as f32 * fragment.clip_alpha;
    let [r, g, b, a] = line.color.premultiply().components;
    PremulColor::new([r * alpha, g * alpha, b * alpha, a * alpha])
}
