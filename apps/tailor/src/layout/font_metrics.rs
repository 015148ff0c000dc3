//! Static font-metric tables and the page/tier configuration shared by the
//! line classifier and the layout engine.
//!
//! Character widths are in em units (relative to font size), taken from the
//! standard Helvetica and Helvetica-Bold AFM files. Both are PDF base-14 fonts,
//! so no font program is embedded and the tables match what a viewer draws.
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Font weight
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    /// PostScript name of the base-14 font used for this weight.
    pub fn base_font(self) -> &'static str {
        match self {
            FontWeight::Normal => "Helvetica",
            FontWeight::Bold => "Helvetica-Bold",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            FontWeight::Normal => "F1",
            FontWeight::Bold => "F2",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Style tiers
// ────────────────────────────────────────────────────────────────────────────

/// A named style bundle selected by line kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// The candidate's name (`# `).
    Name,
    /// Section headings (`## `).
    Heading,
    /// Bullets, body text and blank lines.
    Normal,
}

/// Font size, weight and line advance for one tier. All sizes in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierStyle {
    pub font_size: f32,
    pub weight: FontWeight,
    /// How far the cursor moves down after each drawn sub-line.
    pub line_advance: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Page metrics
// ────────────────────────────────────────────────────────────────────────────

/// A4 width in points.
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 height in points.
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Fixed layout constants for one rendering pass.
///
/// The y axis runs top-down: `margin` is the first baseline on a page and
/// `height - margin` is the lowest baseline any run may occupy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMetrics {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub name: TierStyle,
    pub heading: TierStyle,
    pub normal: TierStyle,
    /// Extra space after a blank line that separates two paragraphs.
    pub paragraph_gap: f32,
    /// Extra space before a section heading that is not the first content.
    pub before_heading: f32,
    /// A heading within this distance of the top margin counts as "at the top".
    pub top_tolerance: f32,
}

impl PageMetrics {
    /// A4 paper, 50pt margins, Helvetica 18/14/11.
    pub fn a4() -> Self {
        PageMetrics {
            width: A4_WIDTH_PT,
            height: A4_HEIGHT_PT,
            margin: 50.0,
            name: TierStyle {
                font_size: 18.0,
                weight: FontWeight::Bold,
                line_advance: 22.0,
            },
            heading: TierStyle {
                font_size: 14.0,
                weight: FontWeight::Bold,
                line_advance: 18.0,
            },
            normal: TierStyle {
                font_size: 11.0,
                weight: FontWeight::Normal,
                line_advance: 14.0,
            },
            paragraph_gap: 7.0,
            before_heading: 8.0,
            top_tolerance: 5.0,
        }
    }

    pub fn style(&self, tier: Tier) -> TierStyle {
        match tier {
            Tier::Name => self.name,
            Tier::Heading => self.heading,
            Tier::Normal => self.normal,
        }
    }

    /// Usable line width: page width minus both margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin * 2.0
    }

    /// Lowest y a baseline may reach before a page break is forced.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageMetrics {
    fn default() -> Self {
        Self::a4()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one weight of Helvetica.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Width of U+2022 BULLET.
    pub bullet_width: f32,
    /// Fallback width for every other non-ASCII character.
    pub average_char_width: f32,
    pub space_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars().map(|c| self.char_width(c)).sum()
    }

    fn char_width(&self, c: char) -> f32 {
        let code = c as usize;
        if (32..=126).contains(&code) {
            self.widths[code - 32]
        } else if c == '\u{2022}' {
            self.bullet_width
        } else if c.is_whitespace() {
            self.space_width
        } else {
            self.average_char_width
        }
    }

    /// Measures a string in points at the given font size.
    pub fn measure_pt(&self, s: &str, font_size: f32) -> f32 {
        self.measure_str(s) * font_size
    }

    /// Greedy word wrap at `max_width` points.
    ///
    /// Leading whitespace is kept on the first sub-line (bullet indents), runs
    /// of inner whitespace collapse to one space, and a single word wider than
    /// the line is broken between characters. Empty or all-whitespace text
    /// yields no sub-lines.
    pub fn wrap(&self, text: &str, font_size: f32, max_width: f32) -> Vec<String> {
        let body = text.trim_start();
        if body.trim_end().is_empty() {
            return Vec::new();
        }
        let indent = &text[..text.len() - body.len()];

        let mut lines = Vec::new();
        let mut current = indent.to_string();
        let mut current_width = self.measure_pt(indent, font_size);
        let mut line_has_word = false;
        let space_w = self.space_width * font_size;

        for word in body.split_whitespace() {
            let word_w = self.measure_pt(word, font_size);
            let gap = if line_has_word { space_w } else { 0.0 };

            if current_width + gap + word_w <= max_width {
                if line_has_word {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += gap + word_w;
                line_has_word = true;
                continue;
            }

            if line_has_word {
                lines.push(std::mem::take(&mut current));
                current_width = 0.0;
            }

            // The word starts a fresh line (or follows the indent); split it
            // by character if it still does not fit.
            for c in word.chars() {
                let w = self.char_width(c) * font_size;
                if current_width + w > max_width && !current.trim().is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0.0;
                }
                current.push(c);
                current_width += w;
            }
            line_has_word = true;
        }

        if !current.trim().is_empty() {
            lines.push(current);
        }
        lines
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.556,
    space_width: 0.278,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.611,
    space_width: 0.278,
};

/// Returns the static metric table for a given weight.
pub fn get_metrics(weight: FontWeight) -> &'static FontMetricTable {
    match weight {
        FontWeight::Normal => &HELVETICA_TABLE,
        FontWeight::Bold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
