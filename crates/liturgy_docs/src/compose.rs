//! Composer: maps a validated request onto the abstract document tree.

use tracing::debug;

use crate::model::{Block, Cell, Document, Paragraph, ParagraphRole, RowKind, Table, TableRow, TextRun};
use crate::payload::{LiturgyRequest, Section};
use crate::style::DocumentStyle;

/// Split body text into paragraph blocks of non-empty, trimmed lines.
///
/// An empty line (two consecutive line breaks) ends a block. Lines that are
/// only whitespace are dropped without ending the block, and blocks left
/// with no lines are dropped entirely.
pub fn split_paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for raw in text.split('\n') {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

/// Render body text as cell paragraphs: one per paragraph block, lines
/// joined by inline breaks. Always yields at least one paragraph.
pub fn text_paragraphs(text: &str, style: &DocumentStyle) -> Vec<Paragraph> {
    let body = || Paragraph::new(ParagraphRole::Body).spacing(0, style.body_spacing_after);

    let blocks = split_paragraphs(text);
    if blocks.is_empty() {
        return vec![body().add_run(TextRun::new("", style.body_size))];
    }

    blocks
        .into_iter()
        .map(|lines| {
            let mut paragraph = body();
            for (i, line) in lines.into_iter().enumerate() {
                if i > 0 {
                    paragraph = paragraph.add_break();
                }
                paragraph = paragraph.add_run(TextRun::new(line, style.body_size));
            }
            paragraph
        })
        .collect()
}

/// Row descriptor for a section table, before any layout is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSpec<'a> {
    Reference { latin: &'a str, slovenian: &'a str },
    Text { latin: &'a str, slovenian: &'a str },
}

/// Rows for one section: the reference row when either side cites
/// something, then the text row, which is always present.
pub fn row_specs(section: &Section) -> Vec<RowSpec<'_>> {
    let reference = (section.latin.has_reference() || section.slovenian.has_reference()).then(
        || RowSpec::Reference {
            latin: section.latin.reference(),
            slovenian: section.slovenian.reference(),
        },
    );
    let text = RowSpec::Text {
        latin: section.latin.text(),
        slovenian: section.slovenian.text(),
    };

    [reference, Some(text)].into_iter().flatten().collect()
}

fn reference_cell(reference: &str, style: &DocumentStyle) -> Cell {
    let run = TextRun::new(reference, style.reference_size).italic();
    Cell::new(vec![Paragraph::new(ParagraphRole::Reference).add_run(run)])
}

fn build_row(spec: RowSpec<'_>, style: &DocumentStyle) -> TableRow {
    match spec {
        RowSpec::Reference { latin, slovenian } => TableRow {
            kind: RowKind::Reference,
            latin: reference_cell(latin, style),
            slovenian: reference_cell(slovenian, style),
        },
        RowSpec::Text { latin, slovenian } => TableRow {
            kind: RowKind::Text,
            latin: Cell::new(text_paragraphs(latin, style)),
            slovenian: Cell::new(text_paragraphs(slovenian, style)),
        },
    }
}

fn section_table(section: &Section, style: &DocumentStyle) -> Table {
    Table {
        rows: row_specs(section)
            .into_iter()
            .map(|spec| build_row(spec, style))
            .collect(),
    }
}

/// Compose the whole document: title, subtitle, then a heading and a
/// two-column table per section in input order.
pub fn compose(request: &LiturgyRequest, style: &DocumentStyle) -> Document {
    let mut blocks = Vec::with_capacity(2 + request.sections.len() * 2);

    if let Some(title) = request.title() {
        blocks.push(Block::Paragraph(
            Paragraph::new(ParagraphRole::Title)
                .centered()
                .spacing(0, style.title_spacing_after)
                .add_run(TextRun::new(title, style.title_size).bold()),
        ));
    }

    blocks.push(Block::Paragraph(
        Paragraph::new(ParagraphRole::Subtitle)
            .centered()
            .spacing(0, style.title_spacing_after)
            .add_run(TextRun::new(request.subtitle.as_str(), style.subtitle_size)),
    ));

    for section in &request.sections {
        blocks.push(Block::Paragraph(
            Paragraph::new(ParagraphRole::SectionHeading)
                .centered()
                .spacing(style.heading_spacing_before, style.heading_spacing_after)
                .add_run(TextRun::new(section.name.as_str(), style.heading_size).bold()),
        ));
        blocks.push(Block::Table(section_table(section, style)));
    }

    debug!(sections = request.sections.len(), blocks = blocks.len(), "Composed liturgy document");
    Document { blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, Inline};
    use crate::payload::{LocalizedBlock, validate};
    use serde_json::json;

    fn block(reference: &str, text: &str) -> LocalizedBlock {
        LocalizedBlock {
            reference: Some(reference.to_string()),
            text: Some(text.to_string()),
        }
    }

    fn section(name: &str, latin: LocalizedBlock, slovenian: LocalizedBlock) -> Section {
        Section {
            name: name.to_string(),
            latin,
            slovenian,
        }
    }

    fn request(sections: Vec<Section>) -> LiturgyRequest {
        LiturgyRequest {
            title: None,
            subtitle: "S".to_string(),
            filename: None,
            sections,
        }
    }

    #[test]
    fn test_split_single_breaks_stay_in_one_block() {
        assert_eq!(split_paragraphs("a\nb\nc"), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_split_blank_line_starts_new_block() {
        assert_eq!(split_paragraphs("a\nb\n\nc"), vec![vec!["a", "b"], vec!["c"]]);
    }

    #[test]
    fn test_split_extra_blank_lines_collapse() {
        assert_eq!(split_paragraphs("\n\na\n\n\n\nb\n\n"), vec![vec!["a"], vec!["b"]]);
    }

    #[test]
    fn test_split_whitespace_lines_are_dropped_not_boundaries() {
        assert_eq!(split_paragraphs("a\n   \nb"), vec![vec!["a", "b"]]);
    }

    #[test]
    fn test_split_handles_crlf() {
        assert_eq!(
            split_paragraphs("a\r\nb\r\n\r\nc\r\n"),
            vec![vec!["a", "b"], vec!["c"]]
        );
    }

    #[test]
    fn test_split_trims_lines() {
        assert_eq!(split_paragraphs("  Pater noster,\t\n qui es in caelis "), vec![vec![
            "Pater noster,",
            "qui es in caelis"
        ]]);
    }

    #[test]
    fn test_paragraph_count_follows_blank_lines() {
        let style = DocumentStyle::default();
        let paragraphs = text_paragraphs("one\ntwo\n\nthree", &style);
        assert_eq!(paragraphs.len(), 2);

        let paragraphs = text_paragraphs("one\ntwo\n\n   \nthree\nfour", &style);
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[1].break_count(), 1);

        let paragraphs = text_paragraphs("one\ntwo\n \nthree", &style);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].break_count(), 2);
        assert_eq!(paragraphs[0].plain_text(), "one\ntwo\nthree");
    }

    #[test]
    fn test_empty_text_yields_one_blank_paragraph() {
        let style = DocumentStyle::default();
        for text in ["", "   ", "\n\n", " \n\t\n "] {
            let paragraphs = text_paragraphs(text, &style);
            assert_eq!(paragraphs.len(), 1, "input {text:?}");
            assert_eq!(paragraphs[0].plain_text(), "");
            assert_eq!(paragraphs[0].break_count(), 0);
        }
    }

    #[test]
    fn test_body_runs_use_body_size() {
        let style = DocumentStyle::default();
        let paragraphs = text_paragraphs("a\nb", &style);
        assert!(paragraphs[0].runs().all(|r| r.size == style.body_size && !r.bold));
        assert_eq!(paragraphs[0].spacing.after, style.body_spacing_after);
        assert_eq!(
            paragraphs[0].inlines[1],
            Inline::Break,
            "lines are joined with an inline break"
        );
    }

    #[test]
    fn test_row_specs_without_references() {
        let s = section("Gloria", block("", "Gloria"), block("", "Slava"));
        let specs = row_specs(&s);
        assert_eq!(specs, vec![RowSpec::Text {
            latin: "Gloria",
            slovenian: "Slava"
        }]);
    }

    #[test]
    fn test_row_specs_with_one_reference() {
        let s = section("Lectio", block("", "..."), block("Jn 1,1", "..."));
        let specs = row_specs(&s);
        assert_eq!(specs.len(), 2);
        assert_eq!(specs[0], RowSpec::Reference {
            latin: "",
            slovenian: "Jn 1,1"
        });
    }

    #[test]
    fn test_title_is_omitted_when_absent() {
        let style = DocumentStyle::default();
        let doc = compose(&request(Vec::new()), &style);
        assert_eq!(doc.blocks.len(), 1);
        let subtitle = doc.paragraphs().next().unwrap();
        assert_eq!(subtitle.role, ParagraphRole::Subtitle);
        assert_eq!(subtitle.alignment, Alignment::Center);
    }

    #[test]
    fn test_title_then_subtitle() {
        let style = DocumentStyle::default();
        let mut req = request(Vec::new());
        req.title = Some("Missa".to_string());
        let doc = compose(&req, &style);

        let paragraphs: Vec<_> = doc.paragraphs().collect();
        assert_eq!(paragraphs[0].role, ParagraphRole::Title);
        let title_run = paragraphs[0].runs().next().unwrap();
        assert!(title_run.bold);
        assert_eq!(title_run.size, style.title_size);
        assert_eq!(paragraphs[1].role, ParagraphRole::Subtitle);
        assert_eq!(paragraphs[1].runs().next().unwrap().size, style.subtitle_size);
    }

    #[test]
    fn test_one_heading_and_table_per_section_in_order() {
        let style = DocumentStyle::default();
        let req = request(vec![
            section("Introitus", block("Ps 24", "Ad te levavi"), block("", "K tebi")),
            section("Kyrie", block("", "Kyrie eleison"), block("", "Gospod, usmili se")),
            section("Gloria", LocalizedBlock::default(), LocalizedBlock::default()),
        ]);
        let doc = compose(&req, &style);

        let headings: Vec<_> = doc.section_headings().map(|p| p.plain_text()).collect();
        assert_eq!(headings, vec!["Introitus", "Kyrie", "Gloria"]);

        let row_counts: Vec<_> = doc.tables().map(|t| t.rows.len()).collect();
        assert_eq!(row_counts, vec![2, 1, 1]);

        // heading immediately precedes its table
        for pair in doc.blocks[1..].chunks(2) {
            assert!(matches!(&pair[0], Block::Paragraph(p) if p.role == ParagraphRole::SectionHeading));
            assert!(matches!(&pair[1], Block::Table(_)));
        }
    }

    #[test]
    fn test_columns_keep_matching_structure_when_one_side_is_empty() {
        let style = DocumentStyle::default();
        let req = request(vec![section(
            "Credo",
            block("", "Credo in unum Deum\n\nPatrem omnipotentem"),
            LocalizedBlock::default(),
        )]);
        let doc = compose(&req, &style);
        let table = doc.tables().next().unwrap();
        for row in &table.rows {
            for cell in row.cells() {
                assert!(!cell.paragraphs.is_empty());
                assert_eq!(cell.style.width_percent, 50);
            }
        }
        let text = table.text_row().unwrap();
        assert_eq!(text.latin.paragraphs.len(), 2);
        assert_eq!(text.slovenian.plain_text(), vec![""]);
    }

    #[test]
    fn test_reference_scenario() {
        let style = DocumentStyle::default();
        let req = validate(&json!({
            "subtitle": "S",
            "filename": "x.docx",
            "sections": [{
                "name": "Intro",
                "latin": { "reference": "Ps 1", "text": "a\nb\n\nc" },
                "slovenian": { "reference": "", "text": "č" }
            }]
        }))
        .unwrap();
        let doc = compose(&req, &style);

        let paragraphs: Vec<_> = doc.paragraphs().map(|p| p.plain_text()).collect();
        assert_eq!(paragraphs, vec!["S", "Intro"]);

        let table = doc.tables().next().unwrap();
        assert_eq!(table.rows.len(), 2);

        let reference = table.reference_row().unwrap();
        assert_eq!(reference.latin.plain_text(), vec!["Ps 1"]);
        let run = reference.latin.paragraphs[0].runs().next().unwrap();
        assert!(run.italic);
        assert_eq!(run.size, style.reference_size);
        assert_eq!(reference.slovenian.plain_text(), vec![""]);

        let text = table.text_row().unwrap();
        assert_eq!(text.latin.plain_text(), vec!["a\nb", "c"]);
        assert_eq!(text.latin.paragraphs[0].break_count(), 1);
        assert_eq!(text.slovenian.plain_text(), vec!["č"]);
    }

    #[test]
    fn test_compose_is_deterministic() {
        let style = DocumentStyle::default();
        let req = request(vec![section(
            "Sanctus",
            block("Is 6,3", "Sanctus,\nSanctus,\nSanctus"),
            block("Iz 6,3", "Svet,\nsvet,\nsvet"),
        )]);
        assert_eq!(compose(&req, &style), compose(&req, &style));
    }
}
