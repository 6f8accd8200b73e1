//! Wheel geometry: segment spans, pie-slice paths, and label anchors.
//!
//! Pure functions of the item list and a [`WheelFrame`]. Both the SVG output
//! and the vello scene are built from the [`Segment`]s produced here, so the
//! two surfaces always agree on where a recipe sits.

use vello::kurbo::Point;

use crate::selection::segment_angle;
use crate::wheel::WheelItem;

/// Labels longer than this many characters are shortened.
pub const LABEL_MAX_CHARS: usize = 12;
/// Characters kept when a label is shortened.
pub const LABEL_KEEP_CHARS: usize = 10;
/// Marker appended to shortened labels.
pub const ELLIPSIS: &str = "...";
/// Label distance from the center as a fraction of the radius.
pub const LABEL_RADIUS_FRAC: f64 = 0.7;
/// Gap between the wheel edge and the frame edge.
pub const RIM_INSET: f64 = 20.0;

/// Square drawing area for one wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelFrame {
    pub center: Point,
    pub radius: f64,
}

impl WheelFrame {
    /// Frame for a `size` x `size` canvas.
    pub fn from_size(size: f64) -> Self {
        Self {
            center: Point::new(size / 2.0, size / 2.0),
            radius: (size / 2.0 - RIM_INSET).max(0.0),
        }
    }

    /// Frame centered at an arbitrary point, used by the native viewer.
    pub fn centered(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Point at `radians` (screen convention, y down) and `distance` from the center.
    pub fn point_at(&self, radians: f64, distance: f64) -> Point {
        Point::new(
            self.center.x + distance * radians.cos(),
            self.center.y + distance * radians.sin(),
        )
    }
}

/// Where and how a segment's label is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub anchor: Point,
    /// Clockwise rotation in degrees, `[0, 360)`.
    pub rotation: f64,
    /// Possibly shortened display text.
    pub text: String,
}

/// One drawable pie slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// Angular span in degrees, clockwise from 12 o'clock.
    pub span_start: f64,
    pub span_end: f64,
    /// Screen-space angles in radians (0 = 3 o'clock).
    pub start_radians: f64,
    pub end_radians: f64,
    pub start_point: Point,
    pub end_point: Point,
    pub large_arc: bool,
    /// SVG path data for the slice.
    pub path: String,
    pub label: Label,
    pub color: String,
    pub full_name: String,
}

impl Segment {
    pub fn span(&self) -> f64 {
        self.span_end - self.span_start
    }
}

/// Shorten a display name for the wheel face.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > LABEL_MAX_CHARS {
        let mut short: String = name.chars().take(LABEL_KEEP_CHARS).collect();
        short.push_str(ELLIPSIS);
        short
    } else {
        name.to_owned()
    }
}

/// Build every segment for `items`. An empty list yields no segments.
pub fn segments(items: &[WheelItem], frame: &WheelFrame) -> Vec<Segment> {
    let total = items.len();
    items
        .iter()
        .enumerate()
        .map(|(index, item)| segment(index, total, item, frame))
        .collect()
}

fn segment(index: usize, total: usize, item: &WheelItem, frame: &WheelFrame) -> Segment {
    let step = segment_angle(total);
    let span_start = step * index as f64;
    let span_end = step * (index + 1) as f64;

    let start_radians = (span_start - 90.0).to_radians();
    let end_radians = (span_end - 90.0).to_radians();
    let start_point = frame.point_at(start_radians, frame.radius);
    let end_point = frame.point_at(end_radians, frame.radius);
    let large_arc = step > 180.0;

    let path = if total == 1 {
        full_circle_path(frame, start_point)
    } else {
        slice_path(frame, start_point, end_point, large_arc)
    };

    let mid = span_start + step / 2.0;
    let label = Label {
        anchor: frame.point_at((mid - 90.0).to_radians(), frame.radius * LABEL_RADIUS_FRAC),
        rotation: mid.rem_euclid(360.0),
        text: truncate_label(&item.recipe_name),
    };

    Segment {
        index,
        span_start,
        span_end,
        start_radians,
        end_radians,
        start_point,
        end_point,
        large_arc,
        path,
        label,
        color: item.color.clone(),
        full_name: item.recipe_name.clone(),
    }
}

fn slice_path(frame: &WheelFrame, from: Point, to: Point, large_arc: bool) -> String {
    let WheelFrame { center, radius } = *frame;
    format!(
        "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
        fmt_coord(center.x),
        fmt_coord(center.y),
        fmt_coord(from.x),
        fmt_coord(from.y),
        fmt_coord(radius),
        fmt_coord(radius),
        u8::from(large_arc),
        fmt_coord(to.x),
        fmt_coord(to.y),
    )
}

/// A lone segment's endpoints coincide, which an SVG arc would draw as
/// nothing; go around through the opposite point in two halves instead.
fn full_circle_path(frame: &WheelFrame, start: Point) -> String {
    let WheelFrame { center, radius } = *frame;
    let opposite = Point::new(2.0 * center.x - start.x, 2.0 * center.y - start.y);
    let r = fmt_coord(radius);
    format!(
        "M {} {} L {} {} A {r} {r} 0 1 1 {} {} A {r} {r} 0 1 1 {} {} Z",
        fmt_coord(center.x),
        fmt_coord(center.y),
        fmt_coord(start.x),
        fmt_coord(start.y),
        fmt_coord(opposite.x),
        fmt_coord(opposite.y),
        fmt_coord(start.x),
        fmt_coord(start.y),
    )
}

/// Three decimals, trailing zeros trimmed, no negative zero.
pub(crate) fn fmt_coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_owned()
}
