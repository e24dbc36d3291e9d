use std::env;
use std::fs::{self, File};
use std::io::BufWriter;
use std::time::Instant;
use tabula::{Cell, DocumentConfig, DocumentError, DocumentRenderer, Table};

/// Builds a demo ledger table with a repeated header and footer.
fn demo_table(rows: usize) -> Result<Table, DocumentError> {
    let mut header = Table::with_equal_columns(3)?;
    for title in ["Item", "Quantity", "Amount"] {
        header.add_cell(Cell::new().with_block(14.0).with_label(title))?;
    }
    let mut footer = Table::with_equal_columns(3)?;
    footer.add_cell(Cell::new().with_span(1, 3).with_block(14.0).with_label("Continued"))?;

    let mut table = Table::new(vec![2.0, 1.0, 1.0])?
        .with_header(header)?
        .with_footer(footer)?
        .with_skip_last_footer(true);
    for row in 0..rows {
        table.add_cell(Cell::new().with_lines(10.0, 1 + row % 3).with_label(format!("Item {row}")))?;
        table.add_cell(Cell::new().with_block(10.0).with_label(format!("{}", row % 7 + 1)))?;
        table.add_cell(Cell::new().with_block(10.0).with_label(format!("{}.00", row * 3)))?;
    }
    Ok(table)
}

/// A small CLI that lays out a demo table and writes it to a PDF.
fn main() -> Result<(), DocumentError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 4 {
        eprintln!("Lays out a demo table across as many pages as it needs.");
        eprintln!();
        eprintln!("Usage: {} <path/to/config.json> <rows> <path/to/output.pdf>", args[0]);
        std::process::exit(1);
    }

    let config = DocumentConfig::from_json(&fs::read_to_string(&args[1])?)?;
    let rows: usize = match args[2].parse() {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Invalid row count '{}': {}", args[2], e);
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    let mut document = DocumentRenderer::new(config);
    document.add_table(demo_table(rows)?)?;
    let mut writer = BufWriter::new(File::create(&args[3])?);
    document.write_pdf(&mut writer)?;

    println!(
        "Wrote {} pages to {} in {:.2?}.",
        document.page_count(),
        args[3],
        start.elapsed()
    );
    Ok(())
}
