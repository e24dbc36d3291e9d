use tabula::{Border, Borders, Cell, Color, DocumentConfig, Margins, PageSize, Table};

/// A 200 x 100 pt page without margins.
pub fn small_page() -> DocumentConfig {
    DocumentConfig {
        page_size: PageSize::Custom {
            width: 200.0,
            height: 100.0,
        },
        margins: Margins::all(0.0),
        ..Default::default()
    }
}

/// A cell with a 1pt solid border, no padding and one block of `block` points.
pub fn boxed(block: f32) -> Cell {
    Cell::new()
        .with_borders(Borders::all(Border::solid(1.0, Color::BLACK)))
        .with_padding(Margins::all(0.0))
        .with_block(block)
}

/// A grid of boxed cells labelled `{prefix}{row}c{col}`.
pub fn grid(rows: usize, columns: usize, block: f32, prefix: &str) -> Table {
    let mut table = Table::with_equal_columns(columns).unwrap();
    for row in 0..rows {
        for col in 0..columns {
            table
                .add_cell(boxed(block).with_label(format!("{prefix}{row}c{col}")))
                .unwrap();
        }
    }
    table
}
