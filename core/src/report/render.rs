// core/src/report/render.rs

//! Tabular documents and their PDF rendering.

use crate::error::{BoxOfficeError, Result};
use printpdf::image_crate::{self, DynamicImage, GenericImageView};
use printpdf::{BuiltinFont, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use tracing::{debug, warn};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportCell {
  Text(String),
  /// Fetched image bytes, `None` when the fetch failed or there was no URL.
  Image(Option<Vec<u8>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
  pub record_id: i64,
  pub cells: Vec<ReportCell>,
}

/// Title, an optional header row, and data rows in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportDocument {
  pub title: String,
  pub headers: Vec<String>,
  pub rows: Vec<ReportRow>,
}

impl ReportDocument {
  fn column_count(&self) -> usize {
    self
      .rows
      .iter()
      .map(|r| r.cells.len())
      .chain(std::iter::once(self.headers.len()))
      .max()
      .unwrap_or(0)
      .max(1)
  }

  fn has_images(&self) -> bool {
    self
      .rows
      .iter()
      .any(|r| r.cells.iter().any(|c| matches!(c, ReportCell::Image(_))))
  }
}

/// An image cell the renderer could not embed. `row` indexes `ReportDocument::rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedImage {
  pub row: usize,
  pub column: usize,
  pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RenderedDocument {
  pub bytes: Vec<u8>,
  pub skipped_images: Vec<SkippedImage>,
}

/// Serializes a finished document. Failing here is fatal to the report.
pub trait DocumentRenderer: Send + Sync {
  fn render(&self, document: &ReportDocument) -> Result<RenderedDocument>;
}

// Points to millimetres.
const PT_TO_MM: f32 = 0.352_778;
const IMAGE_DPI: f32 = 300.0;

/// Lays documents out as a fixed-width table on A4 pages with built-in fonts,
/// repeating the header row on every page.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
  pub page_width_mm: f32,
  pub page_height_mm: f32,
  pub margin_mm: f32,
  pub title_size: f32,
  pub body_size: f32,
  pub text_row_height_mm: f32,
  /// Row height used when any cell holds an image.
  pub image_row_height_mm: f32,
}

impl Default for PdfRenderer {
  fn default() -> Self {
    // A4 landscape
    Self {
      page_width_mm: 297.0,
      page_height_mm: 210.0,
      margin_mm: 12.0,
      title_size: 20.0,
      body_size: 9.0,
      text_row_height_mm: 8.0,
      image_row_height_mm: 22.0,
    }
  }
}

struct PageCursor {
  layer: PdfLayerReference,
  y_top: f32,
}

impl PdfRenderer {
  fn approx_text_width_mm(&self, text: &str, size: f32) -> f32 {
    // Helvetica averages roughly half an em per glyph.
    text.chars().count() as f32 * size * 0.5 * PT_TO_MM
  }

  fn fit_text(&self, text: &str, width_mm: f32) -> String {
    let single_line = text.replace(['\r', '\n'], " ");
    let max_chars = (width_mm / (self.body_size * 0.5 * PT_TO_MM)).floor() as usize;
    if single_line.chars().count() <= max_chars {
      return single_line;
    }
    let kept: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
  }

  fn draw_row(&self, cursor: &PageCursor, cells: &[&str], font: &IndirectFontRef, col_width: f32) {
    let baseline = cursor.y_top - self.text_row_height_mm + 2.5;
    for (idx, text) in cells.iter().enumerate() {
      let x = self.margin_mm + idx as f32 * col_width + 1.0;
      cursor
        .layer
        .use_text(self.fit_text(text, col_width - 2.0), self.body_size, Mm(x), Mm(baseline), font);
    }
  }

  fn embed_image(&self, cursor: &PageCursor, bytes: &[u8], x: f32, box_w: f32, box_h: f32) -> std::result::Result<(), String> {
    let decoded = image_crate::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let (px_w, px_h) = decoded.dimensions();
    if px_w == 0 || px_h == 0 {
      return Err("image has no pixels".to_string());
    }

    let native_w = px_w as f32 * 25.4 / IMAGE_DPI;
    let native_h = px_h as f32 * 25.4 / IMAGE_DPI;
    let scale = (box_w / native_w).min(box_h / native_h);

    // Flatten alpha so the embedded XObject is plain RGB.
    let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
    Image::from_dynamic_image(&rgb).add_to_layer(
      cursor.layer.clone(),
      ImageTransform {
        translate_x: Some(Mm(x)),
        translate_y: Some(Mm(cursor.y_top - box_h - 1.0)),
        scale_x: Some(scale),
        scale_y: Some(scale),
        dpi: Some(IMAGE_DPI),
        ..Default::default()
      },
    );
    Ok(())
  }
}

impl DocumentRenderer for PdfRenderer {
  fn render(&self, document: &ReportDocument) -> Result<RenderedDocument> {
    let init_error = |message: String| BoxOfficeError::DocumentInit {
      report: document.title.clone(),
      message,
    };

    let (doc, page, layer) = PdfDocument::new(
      document.title.as_str(),
      Mm(self.page_width_mm),
      Mm(self.page_height_mm),
      "Layer 1",
    );
    let font = doc
      .add_builtin_font(BuiltinFont::Helvetica)
      .map_err(|e| init_error(e.to_string()))?;
    let bold = doc
      .add_builtin_font(BuiltinFont::HelveticaBold)
      .map_err(|e| init_error(e.to_string()))?;

    let columns = document.column_count();
    let col_width = (self.page_width_mm - 2.0 * self.margin_mm) / columns as f32;
    let row_height = if document.has_images() {
      self.image_row_height_mm
    } else {
      self.text_row_height_mm
    };

    let mut cursor = PageCursor {
      layer: doc.get_page(page).get_layer(layer),
      y_top: self.page_height_mm - self.margin_mm,
    };

    let title_width = self.approx_text_width_mm(&document.title, self.title_size);
    let title_x = ((self.page_width_mm - title_width) / 2.0).max(self.margin_mm);
    cursor.layer.use_text(
      document.title.as_str(),
      self.title_size,
      Mm(title_x),
      Mm(cursor.y_top - self.title_size * PT_TO_MM),
      &bold,
    );
    cursor.y_top -= self.title_size * PT_TO_MM + 6.0;

    let headers: Vec<&str> = document.headers.iter().map(String::as_str).collect();
    if !headers.is_empty() {
      self.draw_row(&cursor, &headers, &bold, col_width);
      cursor.y_top -= self.text_row_height_mm;
    }

    let mut skipped_images = Vec::new();
    for (row_idx, row) in document.rows.iter().enumerate() {
      if cursor.y_top - row_height < self.margin_mm {
        let (next_page, next_layer) = doc.add_page(Mm(self.page_width_mm), Mm(self.page_height_mm), "Layer 1");
        cursor = PageCursor {
          layer: doc.get_page(next_page).get_layer(next_layer),
          y_top: self.page_height_mm - self.margin_mm,
        };
        debug!(row = row_idx, "Starting a new report page.");
        if !headers.is_empty() {
          self.draw_row(&cursor, &headers, &bold, col_width);
          cursor.y_top -= self.text_row_height_mm;
        }
      }

      let texts: Vec<&str> = row
        .cells
        .iter()
        .map(|cell| match cell {
          ReportCell::Text(text) => text.as_str(),
          ReportCell::Image(_) => "",
        })
        .collect();
      self.draw_row(&cursor, &texts, &font, col_width);

      for (col_idx, cell) in row.cells.iter().enumerate() {
        if let ReportCell::Image(Some(bytes)) = cell {
          let x = self.margin_mm + col_idx as f32 * col_width + 1.0;
          if let Err(reason) = self.embed_image(&cursor, bytes, x, col_width - 2.0, row_height - 2.0) {
            warn!(row = row_idx, column = col_idx, %reason, "Could not embed image; leaving cell blank.");
            skipped_images.push(SkippedImage {
              row: row_idx,
              column: col_idx,
              reason,
            });
          }
        }
      }

      cursor.y_top -= row_height;
    }

    drop(cursor);
    let bytes = doc.save_to_bytes().map_err(|e| init_error(e.to_string()))?;
    Ok(RenderedDocument { bytes, skipped_images })
  }
}
