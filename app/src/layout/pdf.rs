//! PDF output via printpdf with the builtin Helvetica face.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::GrayImage;
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef, Mm,
    PdfDocument, PdfDocumentReference, PdfLayerReference, Px,
};

use super::metrics::{helvetica_width_pt, pt_to_mm};
use super::{DocumentRenderer, GridSpec, LayoutError};

const LAYER_NAME: &str = "Labels";

pub struct PdfRenderer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    page_width_mm: f32,
    page_height_mm: f32,
}

impl PdfRenderer {
    /// Open a document with its first page sized to the grid's page.
    pub fn new(title: &str, grid: &GridSpec) -> Result<Self, LayoutError> {
        let (doc, page, layer) = PdfDocument::new(
            title,
            Mm(grid.page_width_mm),
            Mm(grid.page_height_mm),
            LAYER_NAME,
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| LayoutError::Pdf(e.to_string()))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            font,
            page_width_mm: grid.page_width_mm,
            page_height_mm: grid.page_height_mm,
        })
    }
}

impl DocumentRenderer for PdfRenderer {
    fn new_page(&mut self) -> Result<(), LayoutError> {
        let (page, layer) = self.doc.add_page(
            Mm(self.page_width_mm),
            Mm(self.page_height_mm),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &GrayImage,
        x_mm: f32,
        y_mm: f32,
        width_mm: f32,
        height_mm: f32,
    ) -> Result<(), LayoutError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || width_mm <= 0.0 {
            return Err(LayoutError::Pdf("cannot place an empty image".into()));
        }

        // printpdf sizes images by DPI; pick the one that yields the target width.
        let dpi = width as f32 / (width_mm / 25.4);
        let natural_height_mm = height as f32 / dpi * 25.4;
        let scale_y = (natural_height_mm - height_mm).abs() > 0.01;

        let xobject = ImageXObject {
            width: Px(width as usize),
            height: Px(height as usize),
            color_space: ColorSpace::Greyscale,
            bits_per_component: ColorBits::Bit8,
            interpolate: false,
            image_data: image.as_raw().clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };
        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x_mm)),
                translate_y: Some(Mm(y_mm)),
                dpi: Some(dpi),
                scale_y: scale_y.then(|| height_mm / natural_height_mm),
                ..Default::default()
            },
        );
        Ok(())
    }

    fn draw_text(&mut self, text: &str, x_mm: f32, y_mm: f32, size_pt: f32) -> Result<(), LayoutError> {
        self.layer
            .use_text(text, size_pt, Mm(x_mm), Mm(y_mm), &self.font);
        Ok(())
    }

    fn measure_text_width(&self, text: &str, size_pt: f32) -> f32 {
        pt_to_mm(helvetica_width_pt(text, size_pt))
    }

    fn save(self, path: &Path) -> Result<(), LayoutError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.doc
            .save(&mut writer)
            .map_err(|e| LayoutError::Pdf(e.to_string()))?;
        Ok(())
    }
}
