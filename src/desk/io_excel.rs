use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::{debug, warn};
use snafu::prelude::*;

use crate::desk::{
    io_common::{make_row_label, RosterRow},
    *,
};

/// Reads a roster from an Excel workbook, from the named worksheet or the
/// first one. The first row is a header and is skipped.
pub fn read_excel_roster(path: &str, worksheet: Option<&str>) -> DeskResult<Vec<RosterRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let wrange = match worksheet {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu {
                path,
                worksheet: name,
            })?,
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?,
    }
    .context(OpeningExcelSnafu { path })?;
    Ok(read_range(path, &wrange))
}

/// Rows with a cell that cannot be read as text are logged and skipped.
fn read_range(path: &str, wrange: &Range<DataType>) -> Vec<RosterRow> {
    let row_label = make_row_label(path);
    let mut res: Vec<RosterRow> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(1) {
        let lineno = idx + 1;
        let cells: DeskResult<Vec<String>> =
            row.iter().map(|elt| read_cell(elt, lineno)).collect();
        let cells = match cells {
            Ok(cells) => cells,
            Err(e) => {
                warn!("read_excel_roster: {}: skipping row: {}", row_label(lineno), e);
                continue;
            }
        };
        let roster_row = RosterRow::from_cells(row_label(lineno), &cells);
        debug!("read_excel_roster: {:?}", roster_row);
        if !roster_row.is_blank() {
            res.push(roster_row);
        }
    }
    res
}

fn read_cell(elt: &DataType, lineno: usize) -> DeskResult<String> {
    match elt {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Int(i) => Ok(i.to_string()),
        // Ages and site numbers are usually stored as floats.
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Empty => Ok(String::new()),
        _ => Err(DeskError::ExcelWrongCellType {
            lineno,
            content: format!("{:?}", elt),
        }),
    }
}
