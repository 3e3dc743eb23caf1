//! Selection-table output for review in annotation tools.
//!
//! Converts evaluation result rows back into a tab-separated selection
//! table, one per ground-truth file, so predictions can be loaded next
//! to the original annotations.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::constants::selection_table::{CHANNEL, VIEW};
use crate::error::{Error, Result};
use crate::output::results::ResultsRow;

/// Write one selection table from the result rows of a single
/// ground-truth file.
///
/// Rows keep their input order; begin/end columns carry the window
/// times relative to the ground-truth recording start, as written by
/// the `eval` command.
pub fn write_selection_table(path: &Path, rows: &[&ResultsRow]) -> Result<()> {
    let write_failed = |source| Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_failed)?;
    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "Selection\tView\tChannel\tBegin Time (s)\tEnd Time (s)\tprediction\tground_truth\tquality\tnotes\tsong\tcall_type\tlikely_sex"
    )
    .map_err(write_failed)?;

    for (idx, row) in rows.iter().enumerate() {
        writeln!(
            writer,
            "{}\t{VIEW}\t{CHANNEL}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            idx + 1,
            row.binary_start_rel,
            row.binary_end_rel,
            row.multiclass_prediction,
            row.ground_truth,
            row.quality,
            row.notes,
            row.song,
            row.call_type,
            row.likely_sex,
        )
        .map_err(write_failed)?;
    }

    writer.flush().map_err(write_failed)
}
