//! In-memory tabular model for decoded game schedules.
//!
//! A [`Table`] is an ordered list of rows over a single ordered column set;
//! columns are identified by name only. [`normalize`] converts each typed
//! [`Cell`] into the primitive representation the destination accepts
//! (string, number, or empty string).

use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde_json::Value;

/// Closed set of cell values a decoded table can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Time(NaiveTime),
    Duration(chrono::Duration),
}

/// Converts a typed cell into the destination's writable primitive.
///
/// Total over [`Cell`]; columns are allowed to mix representable types
/// across rows, so the dispatch is per cell, never per column.
pub fn normalize(cell: &Cell) -> Value {
    match cell {
        Cell::Missing => Value::String(String::new()),
        Cell::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(String::new())),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
        Cell::Time(t) => Value::String(t.format("%H:%M").to_string()),
        Cell::Duration(d) => Value::String(format_duration(d)),
    }
}

fn format_duration(d: &chrono::Duration) -> String {
    let total = d.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let total = total.abs();
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Ascending order used when sorting rows by a column. Missing cells sort
/// last; comparisons across unrelated cell kinds fall back to a fixed rank
/// so the sort stays total.
fn compare_cells(a: &Cell, b: &Cell) -> Ordering {
    fn rank(c: &Cell) -> u8 {
        match c {
            Cell::Missing => 2,
            Cell::Text(_) => 1,
            _ => 0,
        }
    }
    match (a, b) {
        (Cell::Number(x), Cell::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Cell::Date(x), Cell::Date(y)) => x.cmp(y),
        (Cell::Time(x), Cell::Time(y)) => x.cmp(y),
        (Cell::Duration(x), Cell::Duration(y)) => x.cmp(y),
        (Cell::Text(x), Cell::Text(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Ordered rows over an ordered column set.
///
/// Invariant: every row holds exactly `columns.len()` cells.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of data rows (the header is not a row).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Appends a row. The row must match the column set.
    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// Sets every row's value under `name` to `cell`, appending the column
    /// if it does not exist yet.
    pub fn push_const_column(&mut self, name: &str, cell: Cell) {
        match self.column_index(name) {
            Some(idx) => {
                for row in &mut self.rows {
                    row[idx] = cell.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(cell.clone());
                }
            }
        }
    }

    /// Appends a column `to` holding the ISO week number of the date in
    /// column `from`. No-op when `from` is absent; rows whose `from` cell is
    /// not a date get a missing week.
    pub fn derive_week(&mut self, from: &str, to: &str) {
        let Some(src) = self.column_index(from) else {
            return;
        };
        let weeks: Vec<Cell> = self
            .rows
            .iter()
            .map(|row| match &row[src] {
                Cell::Date(d) => Cell::Number(f64::from(d.iso_week().week())),
                _ => Cell::Missing,
            })
            .collect();
        match self.column_index(to) {
            Some(idx) => {
                for (row, week) in self.rows.iter_mut().zip(weeks) {
                    row[idx] = week;
                }
            }
            None => {
                self.columns.push(to.to_string());
                for (row, week) in self.rows.iter_mut().zip(weeks) {
                    row.push(week);
                }
            }
        }
    }

    /// Projects the table onto `order`. Columns named in `order` but absent
    /// from the table yield missing cells; columns not named are dropped.
    pub fn project(&self, order: &[String]) -> Table {
        let indices: Vec<Option<usize>> = order.iter().map(|c| self.column_index(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                indices
                    .iter()
                    .map(|idx| idx.map_or(Cell::Missing, |i| row[i].clone()))
                    .collect()
            })
            .collect();
        Table {
            columns: order.to_vec(),
            rows,
        }
    }

    /// Row-wise union of several tables, without deduplication. The output
    /// column set is the union of all inputs in first-appearance order;
    /// cells a source table lacks come out missing.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }
        let mut rows = Vec::new();
        for table in tables {
            let indices: Vec<Option<usize>> =
                columns.iter().map(|c| table.column_index(c)).collect();
            for row in table.rows {
                rows.push(
                    indices
                        .iter()
                        .map(|idx| idx.map_or(Cell::Missing, |i| row[i].clone()))
                        .collect(),
                );
            }
        }
        Table { columns, rows }
    }

    /// Stable ascending sort by the named column. No-op when absent.
    pub fn sort_by_column(&mut self, name: &str) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        self.rows.sort_by(|a, b| compare_cells(&a[idx], &b[idx]));
    }
}
