//! Tabular rendering of a [`WorkingSet`] for operator summaries.
//!
//! Columns mirror the result sheets: `Punkt | Fasthold | Hvornår | Kote | σ | Ny kote | Ny σ |
//! Δ-kote [mm] | Opløft [mm/år] | System`. Empty cells are rendered blank.
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::time::fmt_utc_minutes;

use super::{WorkingPoint, WorkingSet};

fn fmt_opt(value: Option<f64>, prec: usize) -> String {
    value.map(|v| format!("{v:.prec$}")).unwrap_or_default()
}

fn right(content: String) -> Cell {
    Cell::new(content).set_alignment(CellAlignment::Right)
}

fn row_cells(row: &WorkingPoint) -> Row {
    Row::from(vec![
        Cell::new(&row.point),
        Cell::new(&row.fixed).set_alignment(CellAlignment::Center),
        Cell::new(row.when.map(fmt_utc_minutes).unwrap_or_default()),
        right(fmt_opt(row.height, 5)),
        right(fmt_opt(row.sigma, 2)),
        right(fmt_opt(row.new_height, 5)),
        right(fmt_opt(row.new_sigma, 2)),
        right(fmt_opt(row.delta_height, 2)),
        right(fmt_opt(row.uplift, 2)),
        Cell::new(&row.system),
    ])
}

impl WorkingSet {
    /// Render the working set as a UTF-8 table.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Punkt"),
            Cell::new("Fasthold"),
            Cell::new("Hvornår"),
            Cell::new("Kote"),
            Cell::new("σ"),
            Cell::new("Ny kote"),
            Cell::new("Ny σ"),
            Cell::new("Δ-kote [mm]"),
            Cell::new("Opløft [mm/år]"),
            Cell::new("System"),
        ]);

        for row in self.iter() {
            table.add_row(row_cells(row));
        }
        table
    }
}

impl fmt::Display for WorkingSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_table())
    }
}
