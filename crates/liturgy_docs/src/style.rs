//! Typography and page geometry for generated documents.
//!
//! Sizes are in half-points (24 = 12pt), spacing and page dimensions in
//! twips (1440 = 1 inch), matching the units Word uses internally.

use serde::{Deserialize, Serialize};

/// Every constant the composer and renderer need to lay out a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentStyle {
    /// Document-wide body font.
    pub font: String,
    /// Document-wide default run size.
    pub default_size: usize,

    pub title_size: usize,
    pub subtitle_size: usize,
    pub heading_size: usize,
    pub reference_size: usize,
    pub body_size: usize,

    /// Space after the title and subtitle paragraphs.
    pub title_spacing_after: u32,
    pub heading_spacing_before: u32,
    pub heading_spacing_after: u32,
    /// Space after each body paragraph inside a table cell.
    pub body_spacing_after: u32,

    pub page_width: u32,
    pub page_height: u32,
    pub margin: u32,
}

impl Default for DocumentStyle {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            default_size: 24,
            title_size: 32,
            subtitle_size: 24,
            heading_size: 28,
            reference_size: 20,
            body_size: 24,
            title_spacing_after: 400,
            heading_spacing_before: 300,
            heading_spacing_after: 200,
            body_spacing_after: 100,
            // US Letter
            page_width: 12240,
            page_height: 15840,
            margin: 1440,
        }
    }
}

impl DocumentStyle {
    /// Width between the left and right margins.
    pub fn usable_width(&self) -> u32 {
        self.page_width.saturating_sub(self.margin.saturating_mul(2))
    }

    /// Grid for the two-column table: the usable width split evenly.
    pub fn column_widths(&self) -> [u32; 2] {
        let half = self.usable_width() / 2;
        [half, half]
    }
}
