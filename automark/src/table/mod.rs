use std::cmp::max;

/// Accumulates rows of cells and renders them with every column padded to its widest cell.
/// Widths are counted in chars, which is good enough for the state names and symbols we print.
#[derive(Default, Debug, Clone)]
pub struct Table {
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn push_row(&mut self, row: Vec<String>) {
        if row.len() > self.widths.len() {
            self.widths.resize(row.len(), 0);
        }
        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = max(*width, cell.chars().count());
        }
        self.rows.push(row);
    }

    pub fn render(&self, sep: &str) -> String {
        let mut out = String::new();
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for (cell, &width) in row.iter().zip(&self.widths) {
                out.push_str(cell);
                for _ in cell.chars().count()..width {
                    out.push(' ');
                }
                out.push_str(sep);
            }
        }
        out
    }
}
