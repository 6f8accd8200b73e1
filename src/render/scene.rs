//! Wheel rendering using vello.
//!
//! Draws the same segments as the SVG output into a vello [`Scene`] for the
//! native viewer: pie slices rotated as one group, white labels laid out with
//! skrifa metrics, a fixed pointer at 12 o'clock, the center SPIN button, and
//! a result banner under the wheel once a spin has settled.

use vello::kurbo::{Affine, BezPath, Circle, CircleSegment, Point, Rect, RoundedRect, Stroke};
use vello::peniko::{Color, Fill, FontData};
use vello::{Glyph, Scene};

use crate::geometry::{self, RIM_INSET, WheelFrame};
use crate::palette;
use crate::render::svg::{BUTTON_RADIUS, ButtonState, EMPTY_HINT, EMPTY_TITLE};
use crate::wheel::WheelItem;

// --- Colors ---

const BG_COLOR: Color = Color::new([0.953, 0.957, 0.965, 1.0]);
const WHITE: Color = Color::new([1.0, 1.0, 1.0, 1.0]);
const INK: Color = Color::new([0.122, 0.161, 0.216, 1.0]); // #1f2937
const POINTER: Color = Color::new([0.2, 0.2, 0.2, 1.0]); // #333
const EMPTY_FILL: Color = Color::new([0.976, 0.980, 0.984, 1.0]); // #f9fafb
const EMPTY_BORDER: Color = Color::new([0.820, 0.835, 0.859, 1.0]); // #d1d5db
const MUTED: Color = Color::new([0.420, 0.447, 0.502, 1.0]); // #6b7280
const BANNER: Color = Color::new([0.376, 0.341, 0.937, 1.0]);
const FALLBACK_SEGMENT: Color = Color::new([0.6, 0.6, 0.6, 1.0]);

// --- Layout ---

const TOP_MARGIN: f64 = 24.0;
const BANNER_HEIGHT: f64 = 110.0;
const BANNER_WIDTH: f64 = 360.0;
const LABEL_SIZE: f32 = 14.0;
const BUTTON_TEXT_SIZE: f32 = 18.0;
const POINTER_HALF_WIDTH: f64 = 15.0;
const POINTER_HEIGHT: f64 = 30.0;

/// Everything the scene needs to know about one wheel at one instant.
#[derive(Debug, Clone, Copy)]
pub struct WheelView<'a> {
    pub items: &'a [WheelItem],
    /// Current animated rotation in degrees.
    pub rotation: f64,
    pub spinning: bool,
    pub result: Option<&'a WheelItem>,
}

/// Wheel frame for a window, leaving room for the result banner.
pub fn layout(width: f64, height: f64) -> WheelFrame {
    let side = width
        .min(height - BANNER_HEIGHT - TOP_MARGIN)
        .max(2.0 * RIM_INSET);
    WheelFrame::centered(
        Point::new(width / 2.0, TOP_MARGIN + side / 2.0),
        side / 2.0 - RIM_INSET,
    )
}

/// True if `point` falls on the center button.
pub fn hits_button(frame: &WheelFrame, point: Point) -> bool {
    point.distance(frame.center) <= BUTTON_RADIUS
}

/// Top-level render function: draws the full window.
pub fn render_wheel(
    scene: &mut Scene,
    width: f64,
    height: f64,
    view: &WheelView<'_>,
    font: Option<&FontData>,
) {
    let bg_rect = Rect::new(0.0, 0.0, width, height);
    scene.fill(Fill::NonZero, Affine::IDENTITY, BG_COLOR, None, &bg_rect);

    let frame = layout(width, height);

    if view.items.is_empty() {
        draw_empty(scene, &frame, font);
        return;
    }

    let spin = Affine::rotate_about(view.rotation.to_radians(), frame.center);
    for seg in geometry::segments(view.items, &frame) {
        let color = palette::rgba(&seg.color).map_or(FALLBACK_SEGMENT, Color::new);
        let slice = CircleSegment::new(
            frame.center,
            frame.radius,
            0.0,
            seg.start_radians,
            seg.end_radians - seg.start_radians,
        );
        scene.fill(Fill::NonZero, spin, color, None, &slice);
        scene.stroke(&Stroke::new(2.0), spin, WHITE, None, &slice);

        if let Some(font) = font {
            let label = spin
                * Affine::translate(seg.label.anchor.to_vec2())
                * Affine::rotate(seg.label.rotation.to_radians());
            draw_centered_line(scene, font, &seg.label.text, LABEL_SIZE, label, WHITE);
        }
    }

    draw_pointer(scene, &frame);
    draw_button(scene, &frame, view.spinning, font);

    if let (Some(item), false) = (view.result, view.spinning) {
        draw_banner(scene, &frame, width, item, font);
    }
}

fn draw_empty(scene: &mut Scene, frame: &WheelFrame, font: Option<&FontData>) {
    let disc = Circle::new(frame.center, frame.radius);
    scene.fill(Fill::NonZero, Affine::IDENTITY, EMPTY_FILL, None, &disc);
    scene.stroke(&Stroke::new(4.0), Affine::IDENTITY, EMPTY_BORDER, None, &disc);
    if let Some(font) = font {
        let Point { x, y } = frame.center;
        draw_centered_line(scene, font, EMPTY_TITLE, 18.0, Affine::translate((x, y - 12.0)), MUTED);
        draw_centered_line(scene, font, EMPTY_HINT, 14.0, Affine::translate((x, y + 14.0)), MUTED);
    }
}

fn draw_pointer(scene: &mut Scene, frame: &WheelFrame) {
    let tip_y = frame.center.y - frame.radius + POINTER_HEIGHT - RIM_INSET;
    let base_y = tip_y - POINTER_HEIGHT;
    let mut path = BezPath::new();
    path.move_to((frame.center.x - POINTER_HALF_WIDTH, base_y));
    path.line_to((frame.center.x + POINTER_HALF_WIDTH, base_y));
    path.line_to((frame.center.x, tip_y));
    path.close_path();
    scene.fill(Fill::NonZero, Affine::IDENTITY, POINTER, None, &path);
}

fn draw_button(scene: &mut Scene, frame: &WheelFrame, spinning: bool, font: Option<&FontData>) {
    let button = Circle::new(frame.center, BUTTON_RADIUS);
    scene.fill(Fill::NonZero, Affine::IDENTITY, WHITE, None, &button);
    scene.stroke(&Stroke::new(4.0), Affine::IDENTITY, INK, None, &button);

    if let Some(font) = font {
        let state = if spinning {
            ButtonState::Spinning
        } else {
            ButtonState::Ready
        };
        let ink = if spinning { INK.with_alpha(0.5) } else { INK };
        draw_centered_line(
            scene,
            font,
            state.label(),
            BUTTON_TEXT_SIZE,
            Affine::translate(frame.center.to_vec2()),
            ink,
        );
    }
}

fn draw_banner(
    scene: &mut Scene,
    frame: &WheelFrame,
    width: f64,
    item: &WheelItem,
    font: Option<&FontData>,
) {
    let top = frame.center.y + frame.radius + RIM_INSET + 8.0;
    let left = (width - BANNER_WIDTH) / 2.0;
    let rect = RoundedRect::new(left, top, left + BANNER_WIDTH, top + BANNER_HEIGHT - 16.0, 8.0);
    scene.fill(Fill::NonZero, Affine::IDENTITY, BANNER, None, &rect);

    if let Some(font) = font {
        let x = width / 2.0;
        draw_centered_line(scene, font, "Selected Recipe:", 14.0, Affine::translate((x, top + 24.0)), WHITE);
        draw_centered_line(scene, font, &item.recipe_name, 26.0, Affine::translate((x, top + 60.0)), WHITE);
    }
}

/// Draw one line of text centered on the origin of `transform`.
fn draw_centered_line(
    scene: &mut Scene,
    font: &FontData,
    text: &str,
    font_size: f32,
    transform: Affine,
    color: Color,
) {
    let (glyphs, width) = layout_line(text, font, font_size);
    if glyphs.is_empty() {
        return;
    }
    // Shift so the run is centered horizontally and roughly on its x-height.
    let centered = transform * Affine::translate((-width / 2.0, font_size as f64 * 0.35));
    scene
        .draw_glyphs(font)
        .font_size(font_size)
        .transform(centered)
        .brush(&color)
        .draw(Fill::NonZero, glyphs.into_iter());
}

/// Lay out a single line from x = 0 using skrifa advance widths.
/// Returns the glyphs and the total advance.
fn layout_line(text: &str, font_data: &FontData, font_size: f32) -> (Vec<Glyph>, f64) {
    let Ok(font_ref) = skrifa::FontRef::from_index(font_data.data.as_ref(), font_data.index) else {
        return (vec![], 0.0);
    };

    use skrifa::MetadataProvider;
    let charmap = font_ref.charmap();
    let glyph_metrics = font_ref.glyph_metrics(
        skrifa::instance::Size::new(font_size),
        skrifa::instance::LocationRef::default(),
    );

    let mut glyphs = Vec::with_capacity(text.len());
    let mut x = 0.0_f64;
    for ch in text.chars() {
        let gid = charmap.map(ch).unwrap_or_default();
        glyphs.push(Glyph {
            id: gid.to_u32(),
            x: x as f32,
            y: 0.0,
        });
        x += glyph_metrics
            .advance_width(gid)
            .unwrap_or(font_size * 0.5) as f64;
    }
    (glyphs, x)
}

// --- Font loading ---

/// Try to load a font from common system paths.
fn load_system_font(font_names: &[&str]) -> Option<FontData> {
    let dirs = [
        "/System/Library/Fonts/",
        "/System/Library/Fonts/Supplemental/",
        "/Library/Fonts/",
        "/usr/share/fonts/truetype/dejavu/",
        "/usr/share/fonts/truetype/liberation/",
        "/usr/share/fonts/truetype/",
        "/usr/share/fonts/opentype/",
    ];
    let extensions = ["ttf", "otf", "ttc"];

    for name in font_names {
        for dir in &dirs {
            for ext in &extensions {
                let path = format!("{dir}{name}.{ext}");
                if let Ok(data) = std::fs::read(&path) {
                    return Some(FontData::new(data.into(), 0));
                }
            }
        }
    }
    None
}

/// Bold sans for labels and the button.
/// Font stack: Helvetica Bold > Arial Bold > DejaVu Sans Bold > Liberation Sans Bold
pub fn load_label_font() -> Option<FontData> {
    load_system_font(&[
        "Helvetica-Bold",
        "Arial Bold",
        "DejaVuSans-Bold",
        "LiberationSans-Bold",
        "Helvetica",
        "Arial",
        "DejaVuSans",
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::wheel_of;

    #[test]
    fn layout_fits_window_and_banner() {
        let frame = layout(800.0, 600.0);
        assert!((frame.center.x - 400.0).abs() < f64::EPSILON);
        let side = 600.0 - BANNER_HEIGHT - TOP_MARGIN;
        assert!((frame.radius - (side / 2.0 - RIM_INSET)).abs() < 1e-9);
        assert!(frame.center.y + frame.radius + RIM_INSET + BANNER_HEIGHT <= 600.0 + 1e-9);
    }

    #[test]
    fn layout_narrow_window_uses_width() {
        let frame = layout(300.0, 900.0);
        assert!((frame.radius - (150.0 - RIM_INSET)).abs() < 1e-9);
    }

    #[test]
    fn layout_never_negative() {
        let frame = layout(10.0, 10.0);
        assert!(frame.radius >= 0.0);
    }

    #[test]
    fn button_hit_test() {
        let frame = layout(800.0, 800.0);
        assert!(hits_button(&frame, frame.center));
        let Point { x, y } = frame.center;
        assert!(hits_button(&frame, Point::new(x + BUTTON_RADIUS - 1.0, y)));
        assert!(!hits_button(&frame, Point::new(x, y + BUTTON_RADIUS + 1.0)));
    }

    #[test]
    fn renders_without_font() {
        let wheel = wheel_of(6);
        let mut scene = Scene::new();
        let view = WheelView {
            items: wheel.list(),
            rotation: 1830.0,
            spinning: false,
            result: wheel.list().first(),
        };
        render_wheel(&mut scene, 800.0, 600.0, &view, None);
        let empty = WheelView {
            items: &[],
            rotation: 0.0,
            spinning: false,
            result: None,
        };
        render_wheel(&mut scene, 800.0, 600.0, &empty, None);
    }
}
