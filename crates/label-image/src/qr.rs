//! QR code generation for printed labels.

use image::{GrayImage, Luma};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode, Version};

use crate::ImageError;

/// Largest standard QR version.
pub const MAX_VERSION: i16 = 40;

/// Encoding and rasterization parameters for one kind of QR symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrStyle {
    pub ec_level: EcLevel,
    /// Smallest version to use; larger versions are chosen when the payload needs them.
    pub min_version: i16,
    /// Pixels per module.
    pub module_px: u32,
    /// Quiet zone width in modules.
    pub quiet_zone: u32,
}

impl QrStyle {
    /// Per-unit product labels: small symbols printed 16 mm wide on sticker paper.
    pub const UNIT_LABEL: QrStyle = QrStyle {
        ec_level: EcLevel::M,
        min_version: 2,
        module_px: 3,
        quiet_zone: 2,
    };

    /// Link to the published export. Longer URL, scanned off varied media.
    pub const EXPORT_LINK: QrStyle = QrStyle {
        ec_level: EcLevel::H,
        min_version: 3,
        module_px: 8,
        quiet_zone: 4,
    };
}

/// Encode `data` at the smallest version that fits, starting at `style.min_version`.
pub fn encode(data: &str, style: &QrStyle) -> Result<QrCode, ImageError> {
    let start = style.min_version.clamp(1, MAX_VERSION);
    for v in start..=MAX_VERSION {
        match QrCode::with_version(data.as_bytes(), Version::Normal(v), style.ec_level) {
            Ok(code) => return Ok(code),
            Err(QrError::DataTooLong) => continue,
            Err(e) => return Err(ImageError::Encode(e.to_string())),
        }
    }
    Err(ImageError::Encode(format!(
        "payload of {} bytes does not fit in version {MAX_VERSION} at {:?}",
        data.len(),
        style.ec_level
    )))
}

/// Generate a monochrome QR image for `data`.
///
/// The image is `(modules + 2 * quiet_zone) * module_px` pixels square.
pub fn generate_qr(data: &str, style: &QrStyle) -> Result<GrayImage, ImageError> {
    let code = encode(data, style)?;
    Ok(render(&code, style))
}

fn render(code: &QrCode, style: &QrStyle) -> GrayImage {
    let modules = code.to_colors();
    let module_count = code.width() as u32;
    let scale = style.module_px.max(1);
    let img_size = (module_count + 2 * style.quiet_zone) * scale;

    let mut img = GrayImage::from_pixel(img_size, img_size, Luma([255u8]));

    for (i, color) in modules.iter().enumerate() {
        if *color != qrcode::Color::Dark {
            continue;
        }
        let x = (i as u32) % module_count + style.quiet_zone;
        let y = (i as u32) / module_count + style.quiet_zone;
        for dx in 0..scale {
            for dy in 0..scale {
                img.put_pixel(x * scale + dx, y * scale + dy, Luma([0u8]));
            }
        }
    }

    img
}
