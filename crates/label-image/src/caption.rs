//! QR image with a caption line underneath.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};

use crate::font::CaptionFont;

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Space between the symbol and the caption, and below the caption.
const CAPTION_PADDING: u32 = 8;

/// Return `qr` with `caption` centered beneath it.
///
/// The canvas widens when the caption is wider than the symbol; the symbol
/// stays horizontally centered.
pub fn with_caption(qr: &GrayImage, caption: &str, font: &CaptionFont) -> GrayImage {
    if caption.is_empty() {
        return qr.clone();
    }

    let caption_width = font.text_width(caption) + 2 * CAPTION_PADDING;
    let width = qr.width().max(caption_width);
    let height = qr.height() + font.line_height() + 2 * CAPTION_PADDING;

    let mut canvas = RgbaImage::from_pixel(width, height, WHITE);
    let qr_x = (width - qr.width()) / 2;
    let symbol = DynamicImage::ImageLuma8(qr.clone()).to_rgba8();
    image::imageops::replace(&mut canvas, &symbol, qr_x as i64, 0);

    let text_y = (qr.height() + CAPTION_PADDING) as i32;
    font.draw_centered(&mut canvas, text_y, caption, BLACK);

    DynamicImage::ImageRgba8(canvas).to_luma8()
}

#[cfg(test)]
mod tests {
    use image::Luma;

    use super::*;
    use crate::qr::{QrStyle, generate_qr};

    #[test]
    fn caption_adds_height_below_symbol() {
        let qr = generate_qr("https://example.com/export.json", &QrStyle::EXPORT_LINK).unwrap();
        let font = CaptionFont::bitmap();
        let out = with_caption(&qr, "Inventory", &font);

        assert_eq!(out.height(), qr.height() + font.line_height() + 2 * CAPTION_PADDING);
        assert!(out.width() >= qr.width());
        // Some caption pixels are dark.
        let dark = (qr.height()..out.height())
            .flat_map(|y| (0..out.width()).map(move |x| (x, y)))
            .any(|(x, y)| out.get_pixel(x, y) == &Luma([0u8]));
        assert!(dark);
    }

    #[test]
    fn wide_caption_widens_canvas() {
        let qr = GrayImage::from_pixel(20, 20, Luma([0u8]));
        let font = CaptionFont::bitmap();
        let caption = "A rather long caption line";
        let out = with_caption(&qr, caption, &font);

        assert_eq!(out.width(), font.text_width(caption) + 2 * CAPTION_PADDING);
        // Symbol is centered.
        let qr_x = (out.width() - 20) / 2;
        assert_eq!(out.get_pixel(qr_x, 0), &Luma([0u8]));
        assert_eq!(out.get_pixel(0, 0), &Luma([255u8]));
    }

    #[test]
    fn empty_caption_returns_symbol_unchanged() {
        let qr = GrayImage::from_pixel(10, 10, Luma([0u8]));
        assert_eq!(with_caption(&qr, "", &CaptionFont::bitmap()), qr);
    }
}
