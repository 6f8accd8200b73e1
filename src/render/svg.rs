//! Standalone SVG rendering of a wheel.
//!
//! Produces a complete `image/svg+xml` document: the rotated segment group,
//! the fixed pointer at 12 o'clock, and the center SPIN button. Each segment
//! carries a `<title>` with the full recipe name so the untruncated text is
//! still available as a tooltip.

use std::fmt::Write as _;

use crate::geometry::{self, WheelFrame, fmt_coord};
use crate::wheel::WheelItem;

pub const STROKE: &str = "#fff";
pub const LABEL_FILL: &str = "#fff";
pub const LABEL_FONT_SIZE: u32 = 14;
pub const POINTER_FILL: &str = "#333";
pub const BUTTON_RADIUS: f64 = 40.0;
pub const BUTTON_BORDER: &str = "#1f2937";

pub const EMPTY_TITLE: &str = "No recipes yet";
pub const EMPTY_HINT: &str = "Add recipes to start spinning!";

/// What the center button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Ready,
    Spinning,
}

impl ButtonState {
    pub fn label(self) -> &'static str {
        match self {
            ButtonState::Ready => "SPIN",
            ButtonState::Spinning => "...",
        }
    }
}

/// Render `items` on a `size` x `size` canvas rotated by `rotation` degrees.
pub fn render(items: &[WheelItem], size: f64, rotation: f64, button: ButtonState) -> String {
    let frame = WheelFrame::from_size(size);
    let s = fmt_coord(size);
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#
    );

    if items.is_empty() {
        empty_state(&mut out, &frame);
        out.push_str("</svg>\n");
        return out;
    }

    let cx = fmt_coord(frame.center.x);
    let cy = fmt_coord(frame.center.y);
    let _ = writeln!(
        out,
        r#"  <g class="wheel" transform="rotate({} {cx} {cy})">"#,
        fmt_coord(rotation.rem_euclid(360.0))
    );
    for seg in geometry::segments(items, &frame) {
        let x = fmt_coord(seg.label.anchor.x);
        let y = fmt_coord(seg.label.anchor.y);
        let _ = writeln!(out, "    <g>");
        let _ = writeln!(out, "      <title>{}</title>", escape(&seg.full_name));
        let _ = writeln!(
            out,
            r#"      <path d="{}" fill="{}" stroke="{STROKE}" stroke-width="2"/>"#,
            seg.path,
            escape(&seg.color)
        );
        let _ = writeln!(
            out,
            r#"      <text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" fill="{LABEL_FILL}" font-size="{LABEL_FONT_SIZE}" font-weight="bold" transform="rotate({} {x} {y})">{}</text>"#,
            fmt_coord(seg.label.rotation),
            escape(&seg.label.text)
        );
        let _ = writeln!(out, "    </g>");
    }
    out.push_str("  </g>\n");

    pointer(&mut out, &frame);
    let _ = writeln!(
        out,
        r##"  <circle cx="{cx}" cy="{cy}" r="{}" fill="#fff" stroke="{BUTTON_BORDER}" stroke-width="4"/>"##,
        fmt_coord(BUTTON_RADIUS)
    );
    let _ = writeln!(
        out,
        r#"  <text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle" fill="{BUTTON_BORDER}" font-size="18" font-weight="bold">{}</text>"#,
        button.label()
    );
    out.push_str("</svg>\n");
    out
}

fn pointer(out: &mut String, frame: &WheelFrame) {
    let cx = frame.center.x;
    let _ = writeln!(
        out,
        r#"  <polygon class="pointer" points="{},0 {},0 {},30" fill="{POINTER_FILL}"/>"#,
        fmt_coord(cx - 15.0),
        fmt_coord(cx + 15.0),
        fmt_coord(cx)
    );
}

fn empty_state(out: &mut String, frame: &WheelFrame) {
    let cx = fmt_coord(frame.center.x);
    let cy = fmt_coord(frame.center.y);
    let _ = writeln!(
        out,
        r##"  <circle cx="{cx}" cy="{cy}" r="{}" fill="#f9fafb" stroke="#d1d5db" stroke-width="4"/>"##,
        fmt_coord(frame.radius)
    );
    let _ = writeln!(
        out,
        r##"  <text x="{cx}" y="{}" text-anchor="middle" fill="#6b7280" font-size="18" font-weight="600">{EMPTY_TITLE}</text>"##,
        fmt_coord(frame.center.y - 6.0)
    );
    let _ = writeln!(
        out,
        r##"  <text x="{cx}" y="{}" text-anchor="middle" fill="#6b7280" font-size="14">{EMPTY_HINT}</text>"##,
        fmt_coord(frame.center.y + 18.0)
    );
}

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
