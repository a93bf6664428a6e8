//! Places labelled QR symbols onto grid pages through a [`DocumentRenderer`].

use std::path::Path;

use image::GrayImage;
use label_image::truncate_with_ellipsis;
use tracing::debug;

use super::{Cell, GridSpec, LayoutError, PageCursor};

/// Drawing surface for label sheets. Coordinates are millimetres from the
/// bottom-left corner of the current page; text is placed by its baseline.
pub trait DocumentRenderer {
    fn new_page(&mut self) -> Result<(), LayoutError>;

    fn draw_image(
        &mut self,
        image: &GrayImage,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<(), LayoutError>;

    fn draw_text(&mut self, text: &str, x_mm: f32, y_mm: f32, size_pt: f32) -> Result<(), LayoutError>;

    /// Rendered width of `text` in millimetres.
    fn measure_text_width(&self, text: &str, size_pt: f32) -> f32;

    fn save(self, path: &Path) -> Result<(), LayoutError>
    where
        Self: Sized;
}

/// Pages used by one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageGroup {
    pub code_prefix: String,
    pub first_page: u32,
    pub last_page: u32,
    pub labels: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSummary {
    pub pages: u32,
    pub labels_placed: u32,
    pub labels_skipped: u32,
    pub page_groups: Vec<PageGroup>,
}

/// Layout state for one document.
pub struct LabelSheet<'a, R: DocumentRenderer> {
    renderer: &'a mut R,
    grid: GridSpec,
    cursor: PageCursor,
    groups: Vec<PageGroup>,
    placed: u32,
    skipped: u32,
}

impl<'a, R: DocumentRenderer> LabelSheet<'a, R> {
    /// The renderer must already have its first page open.
    pub fn new(renderer: &'a mut R, grid: GridSpec) -> Result<Self, LayoutError> {
        grid.validate()?;
        Ok(Self {
            renderer,
            grid,
            cursor: PageCursor::default(),
            groups: Vec::new(),
            placed: 0,
            skipped: 0,
        })
    }

    /// Start a product's run of labels on a fresh page.
    pub fn begin_product(&mut self, code_prefix: &str) -> Result<(), LayoutError> {
        let (cursor, new_page) = self.cursor.start_product(self.groups.is_empty());
        if new_page {
            self.renderer.new_page()?;
        }
        self.cursor = cursor;
        self.groups.push(PageGroup {
            code_prefix: code_prefix.to_string(),
            first_page: cursor.page,
            last_page: cursor.page,
            labels: 0,
        });
        debug!("Product {code_prefix} starts on page {}", cursor.page + 1);
        Ok(())
    }

    /// Draw one symbol with its name and price captions in the next cell.
    pub fn place(&mut self, image: &GrayImage, name: &str, price: &str) -> Result<Cell, LayoutError> {
        if self.groups.is_empty() {
            self.begin_product("")?;
        }
        let (cursor, new_page) = self.cursor.reserve(&self.grid);
        if new_page {
            self.renderer.new_page()?;
        }
        self.cursor = cursor;

        let grid = &self.grid;
        let cell = grid.cell(&cursor);
        let size = grid.qr_size_mm;
        self.renderer.draw_image(image, cell.x_mm, cell.y_mm, size, size)?;

        let name = truncate_with_ellipsis(name, grid.name_max_chars, grid.name_keep_chars);
        let name_y = cell.y_mm - grid.name_offset_mm;
        let name_x = self.centered_x(&cell, &name, grid.name_font_pt);
        self.renderer.draw_text(&name, name_x, name_y, grid.name_font_pt)?;

        let price = format!("Price: {price}");
        let price_y = name_y - grid.price_offset_mm;
        let price_x = self.centered_x(&cell, &price, grid.price_font_pt);
        self.renderer.draw_text(&price, price_x, price_y, grid.price_font_pt)?;

        self.cursor = cursor.advance();
        self.placed += 1;
        if let Some(group) = self.groups.last_mut() {
            group.last_page = cell.page;
            group.labels += 1;
        }
        Ok(cell)
    }

    /// Record a unit that could not be rendered. It takes no cell.
    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    fn centered_x(&self, cell: &Cell, text: &str, size_pt: f32) -> f32 {
        let width = self.renderer.measure_text_width(text, size_pt);
        cell.x_mm + (self.grid.qr_size_mm - width) / 2.0
    }

    pub fn finish(self) -> SheetSummary {
        SheetSummary {
            pages: self.cursor.page + 1,
            labels_placed: self.placed,
            labels_skipped: self.skipped,
            page_groups: self.groups,
        }
    }
}
