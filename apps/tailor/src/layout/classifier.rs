//! Markdown line classifier: one logical line in, one `ClassifiedLine` out.
//!
//! Recognised structure (first match wins on the trimmed line):
//! - `# `  → Title (the candidate's name)
//! - `## ` → Heading
//! - `* ` / `- ` → Bullet, rendered as an indented bullet glyph
//! - empty → Blank
//! - anything else → Body
//!
//! Inline `**bold**` delimiters are removed from every non-blank line. The
//! emphasis itself is not rendered: each logical line has a single style.

use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::Tier;

const TITLE_MARKER: &str = "# ";
const HEADING_MARKER: &str = "## ";
const BULLET_MARKERS: [&str; 2] = ["* ", "- "];
const BOLD_DELIMITER: &str = "**";
/// Prefix that replaces a bullet marker.
pub const BULLET_PREFIX: &str = "  \u{2022} ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Title,
    Heading,
    Bullet,
    Blank,
    Body,
}

impl LineKind {
    pub fn tier(self) -> Tier {
        match self {
            LineKind::Title => Tier::Name,
            LineKind::Heading => Tier::Heading,
            LineKind::Bullet | LineKind::Blank | LineKind::Body => Tier::Normal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedLine {
    pub kind: LineKind,
    /// Marker-stripped text; empty for `Blank`.
    pub text: String,
    /// Set on a `Blank` line that separates two paragraphs.
    pub paragraph_break: bool,
}

impl ClassifiedLine {
    pub fn tier(&self) -> Tier {
        self.kind.tier()
    }
}

/// Classifies one raw line. `next_raw` is the following raw line, `None` for
/// the last line of the document; it only matters for blank lines.
pub fn classify(raw: &str, next_raw: Option<&str>) -> ClassifiedLine {
    let trimmed = raw.trim();

    let (kind, text) = if let Some(rest) = trimmed.strip_prefix(TITLE_MARKER) {
        (LineKind::Title, rest.trim().to_string())
    } else if let Some(rest) = trimmed.strip_prefix(HEADING_MARKER) {
        (LineKind::Heading, rest.trim().to_string())
    } else if let Some(rest) = BULLET_MARKERS
        .iter()
        .find_map(|marker| trimmed.strip_prefix(marker))
    {
        (LineKind::Bullet, format!("{BULLET_PREFIX}{}", rest.trim()))
    } else if trimmed.is_empty() {
        return ClassifiedLine {
            kind: LineKind::Blank,
            text: String::new(),
            paragraph_break: separates_paragraphs(next_raw),
        };
    } else {
        (LineKind::Body, trimmed.to_string())
    };

    ClassifiedLine {
        kind,
        text: strip_bold(&text),
        paragraph_break: false,
    }
}

/// Splits generated Markdown on `\n` and classifies every line with one line
/// of lookahead. The output always has one entry per logical line.
pub fn classify_document(markdown: &str) -> Vec<ClassifiedLine> {
    let raw_lines: Vec<&str> = markdown.split('\n').collect();
    raw_lines
        .iter()
        .enumerate()
        .map(|(i, raw)| classify(raw, raw_lines.get(i + 1).copied()))
        .collect()
}

/// A blank line adds paragraph spacing only when more content follows and that
/// content does not bring its own heading spacing.
fn separates_paragraphs(next_raw: Option<&str>) -> bool {
    match next_raw {
        None => false,
        Some(next) if next.trim().is_empty() => false,
        Some(next) => !(next.starts_with(TITLE_MARKER) || next.starts_with(HEADING_MARKER)),
    }
}

fn strip_bold(text: &str) -> String {
    text.replace(BOLD_DELIMITER, "")
}
