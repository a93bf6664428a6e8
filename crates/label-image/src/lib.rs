//! Raster images for printed labels.
//!
//! QR symbol generation with error-correction and version selection,
//! caption rendering with a font fallback, and PNG output.

pub mod bitmap;
pub mod caption;
pub mod font;
pub mod qr;
pub mod text;

use std::path::Path;

use image::GrayImage;

pub use caption::with_caption;
pub use font::CaptionFont;
pub use qr::{QrStyle, generate_qr};
pub use text::truncate_with_ellipsis;

/// Error type for label image generation.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("QR encode error: {0}")]
    Encode(String),

    #[error("Image write error: {0}")]
    Write(#[from] image::ImageError),
}

/// Save a grayscale image as PNG.
pub fn save_png(img: &GrayImage, path: impl AsRef<Path>) -> Result<(), ImageError> {
    img.save_with_format(path.as_ref(), image::ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_png_writes_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("X-001.png");
        let img = generate_qr("X-001", &QrStyle::UNIT_LABEL).unwrap();
        save_png(&img, &path).unwrap();

        let back = image::open(&path).unwrap().to_luma8();
        assert_eq!(back.dimensions(), img.dimensions());
    }

    #[test]
    fn save_png_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let img = GrayImage::new(4, 4);
        let err = save_png(&img, dir.path().join("missing/x.png")).unwrap_err();
        assert!(matches!(err, ImageError::Write(_)));
    }
}
