//! Grid page layout for QR label sheets.
//!
//! Cells are filled row-major on fixed-size pages. Every product starts on
//! a fresh page; a product that overflows a page continues on the next one.
//! All coordinates are millimetres from the bottom-left page corner.

pub mod metrics;
pub mod pdf;
pub mod sheet;

pub use pdf::PdfRenderer;
pub use sheet::{DocumentRenderer, LabelSheet, PageGroup, SheetSummary};

/// A4 portrait.
pub const A4_WIDTH_MM: f32 = 210.0;
pub const A4_HEIGHT_MM: f32 = 297.0;

/// Room left under the price baseline for descenders.
const CAPTION_DESCENT_MM: f32 = 0.5;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Label image error: {0}")]
    Image(#[from] label_image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page and grid geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub columns: u32,
    pub rows: u32,
    pub qr_size_mm: f32,
    pub spacing_x_mm: f32,
    pub spacing_y_mm: f32,
    pub origin_x_mm: f32,
    pub top_margin_mm: f32,
    /// Distance from the symbol's bottom edge to the name baseline.
    pub name_offset_mm: f32,
    /// Distance from the name baseline to the price baseline.
    pub price_offset_mm: f32,
    pub name_font_pt: f32,
    pub price_font_pt: f32,
    /// Names longer than this many characters are shortened.
    pub name_max_chars: usize,
    pub name_keep_chars: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            page_width_mm: A4_WIDTH_MM,
            page_height_mm: A4_HEIGHT_MM,
            columns: 10,
            rows: 10,
            qr_size_mm: 16.0,
            spacing_x_mm: 18.0,
            spacing_y_mm: 24.0,
            origin_x_mm: 12.0,
            top_margin_mm: 15.0,
            name_offset_mm: 3.0,
            price_offset_mm: 4.0,
            name_font_pt: 6.0,
            price_font_pt: 5.0,
            name_max_chars: 16,
            name_keep_chars: 15,
        }
    }
}

impl GridSpec {
    /// A4 sheet with the given grid dimensions and default spacing.
    pub fn a4(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            rows,
            ..Self::default()
        }
    }

    pub fn cells_per_page(&self) -> u32 {
        self.columns * self.rows
    }

    /// Bottom edge of the first row's symbols.
    fn first_row_y(&self) -> f32 {
        self.page_height_mm - self.top_margin_mm - self.qr_size_mm
    }

    /// Reject geometry where captions would collide with the next row or
    /// cells would fall off the page.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.columns == 0 || self.rows == 0 {
            return Err(LayoutError::InvalidGrid("columns and rows must be at least 1".into()));
        }
        if self.spacing_x_mm < self.qr_size_mm {
            return Err(LayoutError::InvalidGrid(format!(
                "column spacing {} mm is smaller than the symbol ({} mm)",
                self.spacing_x_mm, self.qr_size_mm
            )));
        }
        let caption_depth = self.name_offset_mm + self.price_offset_mm + CAPTION_DESCENT_MM;
        if self.spacing_y_mm - self.qr_size_mm < caption_depth {
            return Err(LayoutError::InvalidGrid(format!(
                "row spacing {} mm leaves no room for two caption lines",
                self.spacing_y_mm
            )));
        }
        let right = self.origin_x_mm + (self.columns - 1) as f32 * self.spacing_x_mm + self.qr_size_mm;
        if right > self.page_width_mm {
            return Err(LayoutError::InvalidGrid(format!(
                "{} columns need {right:.1} mm but the page is {} mm wide",
                self.columns, self.page_width_mm
            )));
        }
        let bottom = self.first_row_y()
            - (self.rows - 1) as f32 * self.spacing_y_mm
            - self.name_offset_mm
            - self.price_offset_mm;
        if bottom < 0.0 {
            return Err(LayoutError::InvalidGrid(format!(
                "{} rows do not fit on a {} mm page",
                self.rows, self.page_height_mm
            )));
        }
        Ok(())
    }

    /// Physical placement of the cell the cursor points at.
    pub fn cell(&self, cursor: &PageCursor) -> Cell {
        let column = cursor.column(self);
        let row = cursor.row(self);
        Cell {
            page: cursor.page,
            column,
            row,
            x_mm: self.origin_x_mm + column as f32 * self.spacing_x_mm,
            y_mm: self.first_row_y() - row as f32 * self.spacing_y_mm,
        }
    }
}

/// Layout position: cell index within the current page, and the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageCursor {
    pub cell: u32,
    pub page: u32,
}

impl PageCursor {
    pub fn column(&self, grid: &GridSpec) -> u32 {
        self.cell % grid.columns
    }

    pub fn row(&self, grid: &GridSpec) -> u32 {
        (self.cell / grid.columns) % grid.rows
    }

    fn next_page(self) -> Self {
        Self {
            cell: 0,
            page: self.page + 1,
        }
    }

    /// Position for the first unit of a product. Every product except the
    /// first in the run opens a new page. Returns whether a page was added.
    pub fn start_product(self, first_product: bool) -> (Self, bool) {
        if first_product {
            (self, false)
        } else {
            (self.next_page(), true)
        }
    }

    /// Make sure the cursor points at a free cell, moving to a new page when
    /// the current one is full. Called only when another unit of the same
    /// product is about to be placed, so a product that exactly fills a page
    /// never leaves a trailing blank page.
    pub fn reserve(self, grid: &GridSpec) -> (Self, bool) {
        if self.cell >= grid.cells_per_page() {
            (self.next_page(), true)
        } else {
            (self, false)
        }
    }

    /// Move past the cell just filled.
    pub fn advance(self) -> Self {
        Self {
            cell: self.cell + 1,
            ..self
        }
    }
}

/// Where one label lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub page: u32,
    pub column: u32,
    pub row: u32,
    /// Bottom-left corner of the QR symbol.
    pub x_mm: f32,
    pub y_mm: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_valid() {
        GridSpec::default().validate().unwrap();
        assert_eq!(GridSpec::default().cells_per_page(), 100);
    }

    #[test]
    fn grid_that_overflows_is_rejected() {
        assert!(GridSpec::a4(10, 12).validate().is_err());
        assert!(GridSpec::a4(12, 10).validate().is_err());
        assert!(GridSpec::a4(0, 10).validate().is_err());

        let cramped = GridSpec {
            spacing_y_mm: 20.0,
            ..GridSpec::default()
        };
        assert!(cramped.validate().is_err());
    }

    #[test]
    fn cells_fill_row_major() {
        let grid = GridSpec::default();
        let c = grid.cell(&PageCursor { cell: 0, page: 0 });
        assert_eq!((c.column, c.row), (0, 0));
        assert_eq!(c.x_mm, 12.0);
        assert_eq!(c.y_mm, 297.0 - 15.0 - 16.0);

        let c = grid.cell(&PageCursor { cell: 13, page: 2 });
        assert_eq!((c.page, c.column, c.row), (2, 3, 1));
        assert_eq!(c.x_mm, 12.0 + 3.0 * 18.0);
        assert_eq!(c.y_mm, 266.0 - 24.0);
    }

    #[test]
    fn hundred_and_first_unit_starts_new_page() {
        let grid = GridSpec::default();
        let mut cursor = PageCursor::default();
        for _ in 0..100 {
            let (c, new_page) = cursor.reserve(&grid);
            assert!(!new_page);
            cursor = c.advance();
        }
        let (c, new_page) = cursor.reserve(&grid);
        assert!(new_page);
        assert_eq!(c, PageCursor { cell: 0, page: 1 });
    }

    #[test]
    fn product_change_always_starts_new_page() {
        let cursor = PageCursor { cell: 3, page: 0 };
        let (c, new_page) = cursor.start_product(false);
        assert!(new_page);
        assert_eq!(c, PageCursor { cell: 0, page: 1 });

        let (c, new_page) = PageCursor::default().start_product(true);
        assert!(!new_page);
        assert_eq!(c, PageCursor::default());
    }
}
