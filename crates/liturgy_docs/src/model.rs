//! Abstract document tree produced by the composer and consumed by the
//! renderer.
//!
//! The tree only knows about paragraphs, styled runs and the two-column
//! table used for each section. It has no dependency on `docx-rs`, so its
//! shape can be asserted on directly in tests.

/// A composed document: an ordered sequence of top-level blocks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// What a paragraph is for. Rendering ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphRole {
    Title,
    Subtitle,
    SectionHeading,
    Reference,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
}

/// Vertical spacing around a paragraph, in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub role: ParagraphRole,
    pub alignment: Alignment,
    pub spacing: Spacing,
    pub inlines: Vec<Inline>,
}

/// Content inside a paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(TextRun),
    /// Soft line break: a new line without starting a new paragraph.
    Break,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    /// Half-points.
    pub size: usize,
}

impl TextRun {
    pub fn new(text: impl Into<String>, size: usize) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
            size,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

impl Paragraph {
    pub fn new(role: ParagraphRole) -> Self {
        Self {
            role,
            alignment: Alignment::Left,
            spacing: Spacing::default(),
            inlines: Vec::new(),
        }
    }

    pub fn centered(mut self) -> Self {
        self.alignment = Alignment::Center;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing = Spacing { before, after };
        self
    }

    pub fn add_run(mut self, run: TextRun) -> Self {
        self.inlines.push(Inline::Text(run));
        self
    }

    pub fn add_break(mut self) -> Self {
        self.inlines.push(Inline::Break);
        self
    }

    /// Concatenated run text, with inline breaks rendered as `\n`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for inline in &self.inlines {
            match inline {
                Inline::Text(run) => out.push_str(&run.text),
                Inline::Break => out.push('\n'),
            }
        }
        out
    }

    pub fn break_count(&self) -> usize {
        self.inlines
            .iter()
            .filter(|i| matches!(i, Inline::Break))
            .count()
    }

    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.inlines.iter().filter_map(|i| match i {
            Inline::Text(run) => Some(run),
            Inline::Break => None,
        })
    }
}

/// Shared presentation of every table cell: fixed half width, no borders,
/// content pinned to the top.
#[derive(Debug, PartialEq, Eq)]
pub struct CellStyle {
    /// Share of the table width, in percent.
    pub width_percent: u32,
    pub borders: bool,
    pub align_top: bool,
}

pub static CELL_STYLE: CellStyle = CellStyle {
    width_percent: 50,
    borders: false,
    align_top: true,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub style: &'static CellStyle,
    pub paragraphs: Vec<Paragraph>,
}

impl Cell {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            style: &CELL_STYLE,
            paragraphs,
        }
    }

    pub fn plain_text(&self) -> Vec<String> {
        self.paragraphs.iter().map(Paragraph::plain_text).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Reference,
    Text,
}

/// One row of a section table. Both language columns are always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub kind: RowKind,
    pub latin: Cell,
    pub slovenian: Cell,
}

impl TableRow {
    pub fn cells(&self) -> [&Cell; 2] {
        [&self.latin, &self.slovenian]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    pub fn reference_row(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == RowKind::Reference)
    }

    pub fn text_row(&self) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == RowKind::Text)
    }
}

impl Document {
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn section_headings(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs()
            .filter(|p| p.role == ParagraphRole::SectionHeading)
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }
}
