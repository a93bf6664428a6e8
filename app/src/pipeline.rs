//! One generation run: export, QR images, label sheet.

use std::path::{Path, PathBuf};

use anyhow::Context;
use inventory::{Catalog, build_export, write_export};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::layout::{DocumentRenderer, GridSpec, PageGroup, PdfRenderer};
use crate::services::labels::render_labels;

pub const PDF_TITLE: &str = "Product QR Codes";

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub export_items: usize,
    pub labels_placed: u32,
    pub labels_skipped: u32,
    pub pages: u32,
    pub page_groups: Vec<PageGroup>,
    pub pdf_path: PathBuf,
    pub export_path: PathBuf,
    pub qr_dir: PathBuf,
}

/// Write the inventory export, per-unit PNGs and the label PDF.
///
/// The catalog and every price are validated before anything touches the
/// disk, so a bad catalog leaves previous outputs in place.
pub fn run_generation(config: &AppConfig, catalog: &Catalog) -> anyhow::Result<RunSummary> {
    catalog.validate()?;

    let created_at = chrono::Local::now().naive_local();
    let items = build_export(catalog, created_at, &config.currency_prefix)?;

    let grid = GridSpec::a4(config.grid_columns, config.grid_rows);
    grid.validate()?;

    let qr_dir = config.qr_dir();
    prepare_image_dir(&qr_dir, config.clean_output)?;

    let export_path = config.export_path();
    write_export(&export_path, &items)
        .with_context(|| format!("writing {}", export_path.display()))?;

    let pdf_path = config.pdf_path();
    let mut renderer = PdfRenderer::new(PDF_TITLE, &grid)?;
    let summary = render_labels(catalog, &grid, &mut renderer, &qr_dir)?;
    renderer
        .save(&pdf_path)
        .with_context(|| format!("writing {}", pdf_path.display()))?;
    info!(path = %pdf_path.display(), pages = summary.pages, "Label PDF written");

    Ok(RunSummary {
        export_items: items.len(),
        labels_placed: summary.labels_placed,
        labels_skipped: summary.labels_skipped,
        pages: summary.pages,
        page_groups: summary.page_groups,
        pdf_path,
        export_path,
        qr_dir,
    })
}

/// Create the image directory. With `clean`, stale PNGs from an earlier
/// run are removed; other files are left alone.
fn prepare_image_dir(dir: &Path, clean: bool) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    if !clean {
        return Ok(());
    }

    let mut removed = 0usize;
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_png = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
        if path.is_file() && is_png {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), "Could not remove stale image: {e}"),
            }
        }
    }
    if removed > 0 {
        info!(removed, dir = %dir.display(), "Cleared previous QR images");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_removes_only_png_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("OLD-001.png"), b"x").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        prepare_image_dir(dir.path(), true).unwrap();

        assert!(!dir.path().join("OLD-001.png").exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[test]
    fn no_clean_keeps_previous_images() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("OLD-001.png"), b"x").unwrap();

        prepare_image_dir(dir.path(), false).unwrap();

        assert!(dir.path().join("OLD-001.png").exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/qr_images");
        prepare_image_dir(&nested, true).unwrap();
        assert!(nested.is_dir());
    }
}
