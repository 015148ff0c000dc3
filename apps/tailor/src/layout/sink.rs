//! Document sink: the drawing primitive the layout engine issues commands to.
//!
//! The engine only knows the `DocumentSink` contract. `PdfSink` measures with
//! the static Helvetica tables and records positioned runs into a
//! `RenderedDocument`, which `layout::pdf` serializes.

use serde::Serialize;
use thiserror::Error;

use crate::layout::font_metrics::{get_metrics, FontWeight, PageMetrics};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("PDF content encoding failed: {0}")]
    Encode(String),

    #[error("PDF serialization failed: {0}")]
    Serialize(String),
}

/// Narrow drawing contract consumed by the layout engine.
///
/// Coordinates are in points with y growing downwards from the page top.
pub trait DocumentSink {
    fn set_font(&mut self, size: f32, weight: FontWeight);

    /// Wraps `text` to `max_width` using the active font.
    fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String>;

    fn draw_text(&mut self, text: &str, x: f32, y: f32);

    fn add_page(&mut self);
}

/// One positioned text run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub weight: FontWeight,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderedPage {
    pub runs: Vec<TextRun>,
}

/// Ordered pages of positioned runs, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<RenderedPage>,
}

impl RenderedDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All runs in draw order, across pages.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs.iter())
    }

    pub fn to_pdf_bytes(&self) -> Result<Vec<u8>, SinkError> {
        crate::layout::pdf::write_pdf(self)
    }
}

/// Sink backed by the Helvetica metric tables. Starts with one empty page.
pub struct PdfSink {
    font_size: f32,
    weight: FontWeight,
    document: RenderedDocument,
}

impl PdfSink {
    pub fn new(metrics: &PageMetrics) -> Self {
        Self {
            font_size: metrics.normal.font_size,
            weight: metrics.normal.weight,
            document: RenderedDocument {
                page_width: metrics.width,
                page_height: metrics.height,
                pages: vec![RenderedPage::default()],
            },
        }
    }

    pub fn finish(self) -> RenderedDocument {
        self.document
    }
}

impl DocumentSink for PdfSink {
    fn set_font(&mut self, size: f32, weight: FontWeight) {
        self.font_size = size;
        self.weight = weight;
    }

    fn wrap_text(&self, text: &str, max_width: f32) -> Vec<String> {
        get_metrics(self.weight).wrap(text, self.font_size, max_width)
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32) {
        let run = TextRun {
            text: text.to_string(),
            x,
            y,
            font_size: self.font_size,
            weight: self.weight,
        };
        if let Some(page) = self.document.pages.last_mut() {
            page.runs.push(run);
        }
    }

    fn add_page(&mut self) {
        self.document.pages.push(RenderedPage::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sink_has_one_empty_page() {
        let doc = PdfSink::new(&PageMetrics::a4()).finish();
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.runs().count(), 0);
    }

    #[test]
    fn test_draw_uses_active_font() {
        let mut sink = PdfSink::new(&PageMetrics::a4());
        sink.set_font(18.0, FontWeight::Bold);
        sink.draw_text("Jane Doe", 50.0, 50.0);
        sink.add_page();
        sink.set_font(11.0, FontWeight::Normal);
        sink.draw_text("Continued", 50.0, 50.0);

        let doc = sink.finish();
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].runs[0].weight, FontWeight::Bold);
        assert_eq!(doc.pages[0].runs[0].font_size, 18.0);
        assert_eq!(doc.pages[1].runs[0].text, "Continued");
    }

    #[test]
    fn test_wrap_depends_on_font_size() {
        let mut sink = PdfSink::new(&PageMetrics::a4());
        let text = "Designed and operated a multi-region event pipeline";
        // About 255pt wide at 11pt regular, about 448pt at 18pt bold.
        sink.set_font(11.0, FontWeight::Normal);
        assert_eq!(sink.wrap_text(text, 300.0), vec![text.to_string()]);
        sink.set_font(18.0, FontWeight::Bold);
        assert_eq!(
            sink.wrap_text(text, 300.0),
            vec!["Designed and operated a", "multi-region event pipeline"]
        );
    }
}
