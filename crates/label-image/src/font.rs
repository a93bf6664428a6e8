//! Caption font lookup.
//!
//! Tries a configured font file, then well-known system fonts. When none
//! can be read and parsed, captions use the built-in bitmap typeface.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};

use crate::{bitmap, text};

/// Pixel scale of the bitmap fallback relative to its 5x7 cell.
const BITMAP_SCALE: u32 = 3;

/// Font used for rendering captions onto raster images.
pub enum CaptionFont {
    Vector { font: FontVec, scale: PxScale },
    Bitmap { scale: u32 },
}

impl std::fmt::Debug for CaptionFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vector { scale, .. } => f.debug_struct("Vector").field("scale", scale).finish(),
            Self::Bitmap { scale } => f.debug_struct("Bitmap").field("scale", scale).finish(),
        }
    }
}

impl CaptionFont {
    /// Best-effort lookup. Never fails: falls back to the bitmap typeface.
    pub fn load(custom: Option<&Path>) -> Self {
        let candidates = custom
            .map(Path::to_path_buf)
            .into_iter()
            .chain(system_font_candidates().iter().map(PathBuf::from));

        for path in candidates {
            let Ok(data) = std::fs::read(&path) else {
                continue;
            };
            match FontVec::try_from_vec(data) {
                Ok(font) => {
                    tracing::info!(path = %path.display(), "Using font for captions");
                    return Self::Vector {
                        font,
                        scale: PxScale::from(text::DEFAULT_FONT_SIZE),
                    };
                }
                Err(_) => {
                    tracing::debug!(path = %path.display(), "Font file could not be parsed");
                }
            }
        }

        tracing::info!("No usable font found, using built-in bitmap captions");
        Self::bitmap()
    }

    /// The deterministic fallback typeface.
    pub fn bitmap() -> Self {
        Self::Bitmap {
            scale: BITMAP_SCALE,
        }
    }

    pub fn is_bitmap(&self) -> bool {
        matches!(self, Self::Bitmap { .. })
    }

    pub fn text_width(&self, s: &str) -> u32 {
        match self {
            Self::Vector { font, scale } => text::measure_text_width(font, *scale, s),
            Self::Bitmap { scale } => bitmap::text_width(s, *scale),
        }
    }

    pub fn line_height(&self) -> u32 {
        match self {
            Self::Vector { font, scale } => text::line_height(font, *scale),
            Self::Bitmap { scale } => bitmap::line_height(*scale),
        }
    }

    /// Draw `s` centered horizontally with its top at `y`.
    pub fn draw_centered(&self, img: &mut RgbaImage, y: i32, s: &str, color: Rgba<u8>) {
        match self {
            Self::Vector { font, scale } => {
                text::draw_centered_text(img, font, *scale, y, s, color);
            }
            Self::Bitmap { scale } => {
                let w = bitmap::text_width(s, *scale) as i32;
                let x = ((img.width() as i32) - w).max(0) / 2;
                bitmap::draw_text(img, s, x, y, *scale, color);
            }
        }
    }
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &["C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\segoeui.ttf"]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreadable_custom_font_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.ttf");
        std::fs::write(&bogus, b"not a font").unwrap();

        let font = CaptionFont::load(Some(&bogus));
        assert!(font.line_height() > 0);
        assert!(font.text_width("Scan me") > 0);
    }

    #[test]
    fn bitmap_fallback_is_deterministic() {
        let a = CaptionFont::bitmap();
        let b = CaptionFont::bitmap();
        assert!(a.is_bitmap());
        assert_eq!(a.text_width("Inventory"), b.text_width("Inventory"));
        assert_eq!(a.text_width("Inventory"), bitmap::text_width("Inventory", BITMAP_SCALE));
    }
}
