// Primitives for reading Excel files.

use calamine::{open_workbook_auto, DataType, Reader};

use crate::raffle::*;

/// Reads all the rows of the first worksheet, header included.
///
/// Any failure of the decoder is reported as a parse failure: the user can only
/// check that the file is a real spreadsheet.
pub fn read_excel_rows(path: &str) -> IngestResult<Vec<Vec<Cell>>> {
    check_extension(&simplify_file_name(path))?;
    debug!("read_excel_rows: path: {:?}", path);
    let mut workbook = open_workbook_auto(path).map_err(|e| parse_failure(path, e))?;
    let wrange = match workbook.worksheet_range_at(0) {
        Some(Ok(r)) => r,
        Some(Err(e)) => return Err(parse_failure(path, e)),
        None => {
            return Err(IngestError::ParseFailure {
                detail: format!("{}: the workbook has no worksheet", path),
            })
        }
    };
    debug!(
        "read_excel_rows: path: {:?} size: {:?}",
        path,
        wrange.get_size()
    );

    let mut res: Vec<Vec<Cell>> = Vec::new();
    for row in wrange.rows() {
        res.push(row.iter().map(read_cell).collect());
    }
    Ok(res)
}

pub fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::String(s) => Cell::String(s.clone()),
        DataType::Float(f) => Cell::Float(*f),
        DataType::Int(i) => Cell::Int(*i),
        DataType::Bool(b) => Cell::Bool(*b),
        DataType::Empty => Cell::Empty,
        // The serial number of the date, as displayed by a raw export.
        DataType::DateTime(f) => Cell::Float(*f),
        // The text Excel shows in the cell, e.g. #DIV/0!
        DataType::Error(e) => Cell::Other(e.to_string()),
        #[allow(unreachable_patterns)]
        other => Cell::Other(format!("{:?}", other)),
    }
}

fn parse_failure(path: &str, e: calamine::Error) -> IngestError {
    warn!("read_excel_rows: failed to decode {:?}: {}", path, e);
    IngestError::ParseFailure {
        detail: format!("{}: {}", path, e),
    }
}
