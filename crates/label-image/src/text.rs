//! Caption text measurement and drawing.

use ab_glyph::{Font, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Default caption size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 28.0;

/// Ellipsis appended to shortened captions.
pub const ELLIPSIS: char = '…';

/// Shorten `text` to `keep` characters plus an ellipsis when it is longer
/// than `max_chars` characters. Shorter text is returned unchanged.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize, keep: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(keep).collect();
    out.push(ELLIPSIS);
    out
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width(font: &impl Font, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height(font: &impl Font, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Draw text horizontally centered on an existing RGBA image.
pub fn draw_centered_text(
    img: &mut RgbaImage,
    font: &impl Font,
    scale: PxScale,
    y: i32,
    text: &str,
    color: Rgba<u8>,
) {
    let text_width = measure_text_width(font, scale, text) as i32;
    let x = ((img.width() as i32) - text_width).max(0) / 2;
    draw_text_mut(img, color, x, y, scale, font, text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seventeen_chars_are_truncated() {
        let name = "Domperidone 500mg";
        assert_eq!(name.chars().count(), 17);
        assert_eq!(truncate_with_ellipsis(name, 16, 15), "Domperidone 500…");
    }

    #[test]
    fn sixteen_chars_are_kept() {
        let name = "Bisoprolol 2.5mg";
        assert_eq!(name.chars().count(), 16);
        assert_eq!(truncate_with_ellipsis(name, 16, 15), name);
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let name = "Paracétamol 500mg forte";
        let out = truncate_with_ellipsis(name, 16, 15);
        assert_eq!(out.chars().count(), 16);
        assert!(out.starts_with("Paracétamol"));
    }
}
