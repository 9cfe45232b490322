// Primitives for reading CSV rosters.

use log::{debug, warn};
use snafu::prelude::*;

use crate::desk::{
    io_common::{make_row_label, RosterRow},
    *,
};

/// Reads a roster. The first line is a header and is skipped. Lines that are
/// not valid UTF-8 are logged and skipped.
pub fn read_csv_roster(path: &str) -> DeskResult<Vec<RosterRow>> {
    let row_label = make_row_label(path);
    let rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;

    let mut res: Vec<RosterRow> = Vec::new();
    for (idx, line_r) in rdr.into_records().enumerate() {
        // The header is line 1.
        let lineno = idx + 2;
        let line = match line_r {
            Err(e) if matches!(e.kind(), csv::ErrorKind::Utf8 { .. }) => {
                warn!("read_csv_roster: {}: skipping line: {}", row_label(lineno), e);
                continue;
            }
            r => r.context(CsvLineParseSnafu { lineno })?,
        };
        let cells: Vec<String> = line.iter().map(|s| s.to_string()).collect();
        let row = RosterRow::from_cells(row_label(lineno), &cells);
        debug!("read_csv_roster: {:?}", row);
        if !row.is_blank() {
            res.push(row);
        }
    }
    Ok(res)
}
