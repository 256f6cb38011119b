//! Excel implementation of the [`Decoder`] seam.
//!
//! The export is an XLSX workbook whose first worksheet carries a header
//! row followed by one row per game. Cells come out as the closed
//! [`Cell`](crate::table::Cell) variant; anything calamine cannot represent
//! (error cells, rows shorter than the header) decodes as missing.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};

use crate::contract::{DecodeError, Decoder};
use crate::table::{Cell, Table};

pub struct ExcelDecoder;

impl Decoder for ExcelDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Table, DecodeError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(DecodeError::NoWorksheet)??;

        let mut rows = range.rows();
        let header = rows.next().ok_or(DecodeError::NoHeader)?;
        let mut columns: Vec<String> = header.iter().map(header_cell).collect();
        while columns.last().is_some_and(|c| c.is_empty()) {
            columns.pop();
        }
        if columns.is_empty() {
            return Err(DecodeError::NoHeader);
        }

        let mut table = Table::new(columns.clone());
        for row in rows {
            let cells = (0..columns.len())
                .map(|i| row.get(i).map_or(Cell::Missing, to_cell))
                .collect();
            table.push_row(cells);
        }
        Ok(table)
    }
}

fn header_cell(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) if dt.is_duration() => {
            data.as_duration().map_or(Cell::Missing, Cell::Duration)
        }
        // A serial value below one day is a time of day; everything else is
        // treated as a date (the destination drops time-of-day components of
        // datetimes, matching the upstream export's layout).
        Data::DateTime(dt) if dt.as_f64() < 1.0 => {
            data.as_time().map_or(Cell::Missing, Cell::Time)
        }
        Data::DateTime(_) => data.as_date().map_or(Cell::Missing, Cell::Date),
        Data::DateTimeIso(s) => data
            .as_date()
            .map(Cell::Date)
            .or_else(|| data.as_time().map(Cell::Time))
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => data
            .as_duration()
            .map_or_else(|| Cell::Text(s.clone()), Cell::Duration),
    }
}
