//! Paginated layout engine: a single forward pass over classified lines.
//!
//! The cursor is private to one pass. Per line: optional heading pre-spacing,
//! set the tier font, wrap to the content width, then for each sub-line check
//! for overflow, draw, and advance. Blank paragraph separators add a gap
//! afterwards and may open a new page on their own.

use serde::Serialize;
use tracing::debug;

use crate::layout::classifier::{classify_document, ClassifiedLine, LineKind};
use crate::layout::font_metrics::PageMetrics;
use crate::layout::sink::{DocumentSink, PdfSink, RenderedDocument};

/// Counters reported after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutSummary {
    pub pages: usize,
    pub runs: usize,
}

struct LayoutCursor<'a> {
    y: f32,
    pages: usize,
    runs: usize,
    metrics: &'a PageMetrics,
}

impl<'a> LayoutCursor<'a> {
    fn new(metrics: &'a PageMetrics) -> Self {
        Self {
            y: metrics.margin,
            pages: 1,
            runs: 0,
            metrics,
        }
    }

    fn at_top(&self) -> bool {
        self.y <= self.metrics.margin + self.metrics.top_tolerance
    }

    fn new_page<S: DocumentSink>(&mut self, sink: &mut S) {
        sink.add_page();
        self.pages += 1;
        self.y = self.metrics.margin;
    }
}

/// Lays out `lines` onto `sink`. The sink must already hold its first page.
pub fn render_lines<S: DocumentSink>(
    lines: &[ClassifiedLine],
    metrics: &PageMetrics,
    sink: &mut S,
) -> LayoutSummary {
    let mut cursor = LayoutCursor::new(metrics);
    let max_width = metrics.content_width();
    let bottom = metrics.bottom_limit();

    for line in lines {
        let style = metrics.style(line.tier());

        if line.kind == LineKind::Heading && !cursor.at_top() {
            cursor.y += metrics.before_heading;
        }

        sink.set_font(style.font_size, style.weight);

        for sub_line in sink.wrap_text(&line.text, max_width) {
            // Overflow is judged on font size, not line advance.
            if cursor.y + style.font_size > bottom {
                cursor.new_page(sink);
            }
            sink.draw_text(&sub_line, metrics.margin, cursor.y);
            cursor.runs += 1;
            cursor.y += style.line_advance;
        }

        if line.kind == LineKind::Blank && line.paragraph_break {
            cursor.y += metrics.paragraph_gap;
            if cursor.y >= bottom {
                cursor.new_page(sink);
            }
        }
    }

    LayoutSummary {
        pages: cursor.pages,
        runs: cursor.runs,
    }
}

/// Classifies and lays out a Markdown resume with the Helvetica sink.
pub fn render_markdown(markdown: &str, metrics: &PageMetrics) -> RenderedDocument {
    let lines = classify_document(markdown);
    let mut sink = PdfSink::new(metrics);
    let summary = render_lines(&lines, metrics, &mut sink);
    debug!(
        lines = lines.len(),
        pages = summary.pages,
        runs = summary.runs,
        "Markdown laid out"
    );
    sink.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::FontWeight;

    fn ys(doc: &RenderedDocument) -> Vec<f32> {
        doc.runs().map(|r| r.y).collect()
    }

    fn texts(doc: &RenderedDocument) -> Vec<&str> {
        doc.runs().map(|r| r.text.as_str()).collect()
    }

    /// Small page: baselines 50..=150, so seven 11pt body lines fit.
    fn short_page() -> PageMetrics {
        PageMetrics {
            height: 200.0,
            ..PageMetrics::a4()
        }
    }

    #[test]
    fn test_end_to_end_single_page() {
        let md = "# Jane Doe\n## Summary\nExperienced engineer.\n\n## Skills\n* Go\n* Rust";
        let doc = render_markdown(md, &PageMetrics::a4());

        assert_eq!(doc.page_count(), 1);
        assert_eq!(
            texts(&doc),
            vec![
                "Jane Doe",
                "Summary",
                "Experienced engineer.",
                "Skills",
                "  \u{2022} Go",
                "  \u{2022} Rust"
            ]
        );
        // name 50 (+22) → heading +8 at 80 (+18) → body 98 (+14) → blank before
        // heading adds nothing → heading +8 at 120 (+18) → bullets 138, 152
        assert_eq!(ys(&doc), vec![50.0, 80.0, 98.0, 120.0, 138.0, 152.0]);
        assert!(doc.runs().all(|r| r.x == 50.0));
    }

    #[test]
    fn test_tier_styles_applied_per_line() {
        let doc = render_markdown("# Jane Doe\n## Skills\n* Go", &PageMetrics::a4());
        let runs: Vec<_> = doc.runs().collect();
        assert_eq!((runs[0].font_size, runs[0].weight), (18.0, FontWeight::Bold));
        assert_eq!((runs[1].font_size, runs[1].weight), (14.0, FontWeight::Bold));
        assert_eq!((runs[2].font_size, runs[2].weight), (11.0, FontWeight::Normal));
    }

    #[test]
    fn test_first_heading_gets_no_pre_spacing() {
        let doc = render_markdown("## Summary\nText", &PageMetrics::a4());
        assert_eq!(ys(&doc), vec![50.0, 68.0]);
    }

    #[test]
    fn test_consecutive_headings_both_spaced_after_top() {
        let doc = render_markdown("Intro\n## A\n## B", &PageMetrics::a4());
        // body 50 (+14) → A +8 at 72 (+18) → B +8 at 98
        assert_eq!(ys(&doc), vec![50.0, 72.0, 98.0]);
    }

    #[test]
    fn test_heading_after_heading_at_top_still_spaced_once_moved() {
        let doc = render_markdown("## A\n## B", &PageMetrics::a4());
        assert_eq!(ys(&doc), vec![50.0, 76.0]);
    }

    #[test]
    fn test_paragraph_gap_between_body_lines() {
        let doc = render_markdown("First\n\nSecond", &PageMetrics::a4());
        assert_eq!(ys(&doc), vec![50.0, 71.0]);
    }

    #[test]
    fn test_trailing_blank_adds_nothing() {
        let metrics = PageMetrics::a4();
        let lines = classify_document("Only\n");
        let mut sink = PdfSink::new(&metrics);
        let summary = render_lines(&lines, &metrics, &mut sink);
        assert_eq!(summary, LayoutSummary { pages: 1, runs: 1 });
    }

    #[test]
    fn test_long_line_wraps_with_same_style() {
        let long_name = "Alexandra Catherine Montgomery-Wellington Featherstonehaugh the Third of Edinburgh";
        let doc = render_markdown(&format!("# {long_name}"), &PageMetrics::a4());
        let runs: Vec<_> = doc.runs().collect();
        assert!(runs.len() > 1, "18pt bold name should wrap");
        assert!(runs.iter().all(|r| r.font_size == 18.0 && r.weight == FontWeight::Bold));
        assert_eq!(runs[1].y - runs[0].y, 22.0);
    }

    #[test]
    fn test_overflow_starts_new_page() {
        let md = (1..=60)
            .map(|i| format!("Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let metrics = PageMetrics::a4();
        let doc = render_markdown(&md, &metrics);

        assert!(doc.page_count() > 1);
        for run in doc.runs() {
            assert!(run.y <= metrics.bottom_limit());
            assert!(run.y + run.font_size <= metrics.bottom_limit());
        }
        // Every page restarts at the top margin.
        for page in &doc.pages {
            assert_eq!(page.runs[0].y, metrics.margin);
            let page_ys: Vec<f32> = page.runs.iter().map(|r| r.y).collect();
            assert!(page_ys.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(doc.runs().count(), 60);
    }

    #[test]
    fn test_overflow_uses_font_size_not_advance() {
        let metrics = short_page();
        let md = vec!["L"; 8].join("\n");
        let doc = render_markdown(&md, &metrics);
        // 134 + 11 = 145 fits under 150 even though 134 + 14 = 148 leaves a gap.
        assert_eq!(
            doc.pages[0].runs.iter().map(|r| r.y).collect::<Vec<_>>(),
            vec![50.0, 64.0, 78.0, 92.0, 106.0, 120.0, 134.0]
        );
        assert_eq!(doc.pages[1].runs[0].y, 50.0);
    }

    #[test]
    fn test_paragraph_gap_can_open_page_by_itself() {
        let metrics = short_page();
        // After seven lines the cursor sits at 148; the gap pushes it to 155.
        // The trailing "**" strips to an empty body line and draws nothing.
        let md = format!("{}\n\n**", vec!["L"; 7].join("\n"));
        let doc = render_markdown(&md, &metrics);
        assert_eq!(doc.page_count(), 2);
        assert!(doc.pages[1].runs.is_empty());
    }
}
