use calamine::{Data, Reader, Xlsx};
use std::io::Cursor;

use super::{Cell, RecordTable};
use crate::core::error::{Result, SheetdashError};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the first worksheet of an xlsx workbook. The first row is the
/// header; the result is already cleaned.
pub fn parse_xlsx(bytes: &[u8]) -> Result<RecordTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SheetdashError::Spreadsheet("workbook has no worksheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(RecordTable::empty());
    };

    let columns = header.iter().map(|d| to_cell(d).to_string()).collect();
    let body = rows.map(|row| row.iter().map(to_cell).collect()).collect();

    Ok(RecordTable::new(columns, body).cleaned())
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Float(v) => Cell::Number(*v),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) if !dt.is_duration() => match dt.as_datetime() {
            Some(datetime) => Cell::Text(datetime.format(DATETIME_FORMAT).to_string()),
            None => Cell::Number(dt.as_f64()),
        },
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) | Data::Empty => Cell::Empty,
    }
}
