//! Wheel segment palette.
//!
//! Twelve fixed colors, handed out by insertion position and cycling after
//! the twelfth. The order is significant: stored items keep the exact string
//! they were assigned, so reordering this table would change new wheels only.

/// The fixed segment palette, in assignment order.
pub const PALETTE: [&str; 12] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E2", "#F8B739", "#52BE80", "#EC7063", "#5DADE2",
];

/// Color for the item inserted when `index` items were already present.
pub fn color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// Parse a `#RRGGBB` string into straight RGBA floats.
///
/// Returns `None` for anything that is not a six-digit hex color.
pub fn rgba(hex: &str) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| v as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, 1.0])
}
