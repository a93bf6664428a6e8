//! Per-unit QR images and the printable label sheet.

use std::path::Path;

use inventory::{Catalog, label};
use label_image::{QrStyle, generate_qr, save_png};
use tracing::{info, warn};

use crate::layout::{DocumentRenderer, GridSpec, LabelSheet, LayoutError, SheetSummary};

/// Generate one QR symbol per unit, save each as `{productCode}.png` in
/// `qr_dir`, and lay them out through `renderer`.
///
/// A unit whose payload cannot be encoded is logged and skipped; the rest of
/// the run continues. Failing to write a PNG aborts the run.
pub fn render_labels<R: DocumentRenderer>(
    catalog: &Catalog,
    grid: &GridSpec,
    renderer: &mut R,
    qr_dir: &Path,
) -> Result<SheetSummary, LayoutError> {
    let mut sheet = LabelSheet::new(renderer, grid.clone())?;

    for product in &catalog.products {
        sheet.begin_product(&product.code_prefix)?;

        for unit in label::unit_labels(product) {
            let symbol = match generate_qr(&unit.payload, &QrStyle::UNIT_LABEL) {
                Ok(img) => img,
                Err(e) => {
                    warn!(code = %unit.product_code, "Skipping unit: {e}");
                    sheet.skip();
                    continue;
                }
            };

            save_png(&symbol, qr_dir.join(format!("{}.png", unit.product_code)))?;
            sheet.place(&symbol, &product.name, &product.price)?;
        }
    }

    let summary = sheet.finish();
    info!(
        pages = summary.pages,
        placed = summary.labels_placed,
        skipped = summary.labels_skipped,
        "Label sheet laid out"
    );
    Ok(summary)
}
