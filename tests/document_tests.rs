mod common;

use common::fixtures::*;
use common::{TestResult, render_tables};
use lopdf::Object;
use tabula::{Border, Borders, Cell, Color, DocumentConfig, Margins, Table};

#[test]
fn single_page_table_draws_every_cell() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let (document, pdf) = render_tables(small_page(), vec![grid(2, 2, 19.0, "r")])?;

    assert_eq!(document.page_count(), 1);
    assert_eq!(pdf.page_count(), 1);
    let mut labels = pdf.labels(1)?;
    labels.sort();
    assert_eq!(labels, ["r0c0", "r0c1", "r1c0", "r1c1"]);
    // Three horizontal and three vertical merged borders.
    assert_eq!(pdf.count_operator(1, "S")?, 6);
    Ok(())
}

#[test]
fn long_table_breaks_across_pages() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let (document, pdf) = render_tables(small_page(), vec![grid(9, 2, 19.0, "r")])?;

    assert_eq!(document.page_count(), 3);
    assert_eq!(pdf.page_count(), 3);
    assert_eq!(pdf.labels(1)?.len(), 8);
    assert_eq!(pdf.labels(2)?.len(), 8);
    let mut last = pdf.labels(3)?;
    last.sort();
    assert_eq!(last, ["r8c0", "r8c1"]);
    Ok(())
}

#[test]
fn header_repeats_on_every_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = grid(6, 2, 19.0, "r").with_header(grid(1, 2, 19.0, "h"))?;
    let (document, pdf) = render_tables(small_page(), vec![table])?;

    assert!(document.page_count() >= 2);
    let mut body = 0;
    for page in 1..=pdf.page_count() as u32 {
        let labels = pdf.labels(page)?;
        assert_eq!(&labels[..2], ["h0c0", "h0c1"], "page {page}");
        body += labels.iter().filter(|l| l.starts_with('r')).count();
    }
    assert_eq!(body, 12);
    Ok(())
}

#[test]
fn skipped_last_footer_is_not_drawn_after_the_last_row() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let table = grid(6, 2, 19.0, "r")
        .with_footer(grid(1, 2, 9.0, "f"))?
        .with_skip_last_footer(true);
    let (document, pdf) = render_tables(small_page(), vec![table])?;

    let last = document.page_count() as u32;
    assert!(last >= 2);
    assert!(pdf.labels(1)?.iter().any(|l| l.starts_with('f')));
    assert!(!pdf.labels(last)?.iter().any(|l| l.starts_with('f')));
    Ok(())
}

#[test]
fn rowspan_cell_continues_on_the_next_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut table = Table::with_equal_columns(2)?;
    table.add_cell(
        Cell::new()
            .with_borders(Borders::all(Border::solid(1.0, Color::BLACK)))
            .with_padding(Margins::all(0.0))
            .with_lines(10.0, 10)
            .with_span(6, 1)
            .with_label("tall"),
    )?;
    for row in 0..6 {
        table.add_cell(boxed(19.0).with_label(format!("r{row}")))?;
    }
    let (document, pdf) = render_tables(small_page(), vec![table])?;

    assert_eq!(document.page_count(), 2);
    assert!(pdf.labels(1)?.contains(&"tall".to_string()));
    assert!(pdf.count_operator(2, "S")? > 0);
    Ok(())
}

#[test]
fn wider_table_border_wins_over_cell_borders() -> TestResult {
    let mut table = Table::with_equal_columns(1)?
        .with_borders(Borders::all(Border::solid(3.0, Color::BLACK)));
    table.add_cell(boxed(19.0).with_label("only"))?;
    let (_, pdf) = render_tables(small_page(), vec![table])?;

    let widths: Vec<f32> = pdf
        .page_content(1)?
        .operations
        .iter()
        .filter(|op| op.operator == "w")
        .map(|op| op.operands[0].as_float())
        .collect::<Result<_, _>>()?;
    assert_eq!(widths, [3.0; 4]);
    Ok(())
}

#[test]
fn configured_table_border_is_stroked() -> TestResult {
    let config = DocumentConfig::from_json(
        r#"{ "pageSize": { "width": 200, "height": 100 }, "margins": 0, "tableBorder": "3pt solid" }"#,
    )?;
    let (_, pdf) = render_tables(config, vec![grid(1, 1, 19.0, "r")])?;

    let widths: Vec<f32> = pdf
        .page_content(1)?
        .operations
        .iter()
        .filter(|op| op.operator == "w")
        .map(|op| op.operands[0].as_float())
        .collect::<Result<_, _>>()?;
    assert_eq!(widths, [3.0; 4]);
    Ok(())
}

#[test]
fn config_sets_the_media_box() -> TestResult {
    let config = DocumentConfig::from_json(r#"{ "pageSize": "Letter" }"#)?;
    let (_, pdf) = render_tables(config, vec![grid(1, 1, 10.0, "r")])?;

    let (_, page_id) = pdf.doc.get_pages().into_iter().next().ok_or("no page")?;
    let page = pdf.doc.get_dictionary(page_id)?;
    let media_box: Vec<f32> = page
        .get(b"MediaBox")?
        .as_array()?
        .iter()
        .map(Object::as_float)
        .collect::<Result<_, _>>()?;
    assert_eq!(media_box, [0.0, 0.0, 612.0, 792.0]);
    Ok(())
}

#[test]
fn tagged_document_has_one_table_and_artifact_borders() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let config = DocumentConfig {
        tagged: true,
        ..small_page()
    };
    let (document, pdf) = render_tables(config, vec![grid(9, 2, 19.0, "r")])?;
    assert!(document.page_count() > 1);

    let catalog = pdf.doc.catalog()?;
    let root = pdf.doc.get_dictionary(catalog.get(b"StructTreeRoot")?.as_reference()?)?;
    let kids = root.get(b"K")?.as_array()?;
    assert_eq!(kids.len(), 1);
    let table = pdf.doc.get_dictionary(kids[0].as_reference()?)?;
    assert_eq!(table.get(b"S")?.as_name()?, b"Table");
    assert_eq!(table.get(b"K")?.as_array()?.len(), 9);

    for page in 1..=pdf.page_count() as u32 {
        assert!(pdf.count_operator(page, "BMC")? > 0);
        assert_eq!(
            pdf.count_operator(page, "BMC")?,
            pdf.count_operator(page, "EMC")?
        );
    }
    Ok(())
}
