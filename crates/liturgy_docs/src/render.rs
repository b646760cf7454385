use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, LineSpacing, PageMargin, Run, RunFonts, TableCell,
    TableLayoutType, VAlignType, WidthType,
};
use tracing::{debug, info};

use crate::compose::compose;
use crate::model::{Alignment, Block, Cell, Document, Inline, Paragraph, Table, TableRow, TextRun};
use crate::payload::LiturgyRequest;
use crate::style::DocumentStyle;

/// `pct` widths are expressed in fiftieths of a percent.
const FULL_WIDTH_PCT: usize = 5000;

#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Failed to pack DOCX: {0}")]
    Pack(String),
}

/// Compose the request and render it to DOCX bytes in one step.
pub fn generate_liturgy_docx(
    request: &LiturgyRequest,
    style: &DocumentStyle,
) -> Result<Vec<u8>, DocsError> {
    let document = compose(request, style);
    let bytes = render_docx(&document, style)?;
    info!(
        sections = request.sections.len(),
        bytes = bytes.len(),
        "Generated liturgy document"
    );
    Ok(bytes)
}

/// Render a composed document to DOCX bytes.
///
/// Document-wide defaults (font, size, page size, margins) come from
/// `style`; every paragraph and run carries its own explicit formatting.
pub fn render_docx(document: &Document, style: &DocumentStyle) -> Result<Vec<u8>, DocsError> {
    let margin = style.margin.min(i32::MAX as u32) as i32;
    let mut docx = Docx::new()
        .default_fonts(
            RunFonts::new()
                .ascii(&style.font)
                .hi_ansi(&style.font)
                .east_asia(&style.font)
                .cs(&style.font),
        )
        .default_size(style.default_size)
        .page_size(style.page_width, style.page_height)
        .page_margin(
            PageMargin::new()
                .top(margin)
                .bottom(margin)
                .left(margin)
                .right(margin),
        );

    for block in &document.blocks {
        docx = match block {
            Block::Paragraph(p) => docx.add_paragraph(paragraph(p)),
            Block::Table(t) => docx.add_table(table(t, style)),
        };
    }
    debug!(blocks = document.blocks.len(), "Packing DOCX");

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| DocsError::Pack(e.to_string()))?;

    Ok(buf.into_inner())
}

fn run(text: &TextRun) -> Run {
    let mut run = Run::new().add_text(&text.text).size(text.size);
    if text.bold {
        run = run.bold();
    }
    if text.italic {
        run = run.italic();
    }
    run
}

fn paragraph(p: &Paragraph) -> docx_rs::Paragraph {
    let mut out = docx_rs::Paragraph::new();
    for inline in &p.inlines {
        out = match inline {
            Inline::Text(text) => out.add_run(run(text)),
            Inline::Break => out.add_run(Run::new().add_break(BreakType::TextWrapping)),
        };
    }
    if p.alignment == Alignment::Center {
        out = out.align(AlignmentType::Center);
    }
    if p.spacing.before > 0 || p.spacing.after > 0 {
        out = out.line_spacing(
            LineSpacing::new()
                .before(p.spacing.before)
                .after(p.spacing.after),
        );
    }
    out
}

fn cell(c: &Cell, usable_width: u32) -> TableCell {
    let width = usable_width as usize * c.style.width_percent as usize / 100;
    let mut out = TableCell::new().width(width, WidthType::Dxa);
    if !c.style.borders {
        // explicit `nil` on every side; an empty `tcBorders` inherits the table style
        out = out.clear_all_border();
    }
    if c.style.align_top {
        out = out.vertical_align(VAlignType::Top);
    }
    for p in &c.paragraphs {
        out = out.add_paragraph(paragraph(p));
    }
    out
}

fn row(r: &TableRow, usable_width: u32) -> docx_rs::TableRow {
    docx_rs::TableRow::new(vec![
        cell(&r.latin, usable_width),
        cell(&r.slovenian, usable_width),
    ])
}

fn table(t: &Table, style: &DocumentStyle) -> docx_rs::Table {
    let usable_width = style.usable_width();
    let rows = t.rows.iter().map(|r| row(r, usable_width)).collect();

    docx_rs::Table::new(rows)
        .set_grid(style.column_widths().iter().map(|w| *w as usize).collect())
        .width(FULL_WIDTH_PCT, WidthType::Pct)
        .layout(TableLayoutType::Fixed)
        .clear_all_border()
}
