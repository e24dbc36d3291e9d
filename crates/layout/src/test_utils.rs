use crate::config::LayoutConfig;
use crate::interface::LayoutContext;
use crate::model::{Cell, Table};
use std::sync::Arc;
use tabula_style::{Border, Borders, Margins};
use tabula_types::{Color, LayoutArea, Rect};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A cell with a solid border of `border` points on every side, no padding and a
/// single block of `height` points.
pub fn boxed_cell(border: f32, height: f32) -> Cell {
    Cell::new()
        .with_borders(Borders::all(Border::solid(border, Color::BLACK)))
        .with_padding(Margins::all(0.0))
        .with_block(height)
}

/// A `rows` x `columns` table of `boxed_cell(1.0, block)` cells, labelled `r{row}c{col}`.
pub fn uniform_table(rows: usize, columns: usize, block: f32) -> Table {
    let mut table = Table::with_equal_columns(columns).expect("valid column count");
    for row in 0..rows {
        for col in 0..columns {
            table
                .add_cell(boxed_cell(1.0, block).with_label(format!("r{row}c{col}")))
                .expect("cell fits the grid");
        }
    }
    table
}

pub fn area(height: f32) -> LayoutArea {
    LayoutArea::new(1, Rect::new(0.0, 0.0, 300.0, height))
}

pub fn config() -> LayoutConfig {
    LayoutConfig::default()
}

pub fn ctx<'a>(config: &'a LayoutConfig, height: f32) -> LayoutContext<'a> {
    LayoutContext::new(area(height), config)
}

pub fn shared(table: Table) -> Arc<Table> {
    Arc::new(table)
}
