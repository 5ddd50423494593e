// =============================================================================
// Sheet computation errors
// =============================================================================
//
// The compute core surfaces exactly two failure shapes:
//
//   MissingColumn -- one or more of Open/High/Low/Close could not be identified
//                    in the header row. Fatal: no derived column is built.
//   Csv           -- the upload could not be read or written as CSV.
//
// Non-numeric cells inside an identified OHLC column are NOT errors: they
// become undefined values and flow through the formulas as blanks.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    /// Required OHLC columns absent from the header row. `fields` holds the
    /// canonical names of every column that could not be identified.
    #[error("missing OHLC column(s) in input CSV: {}", .fields.join(", "))]
    MissingColumn { fields: Vec<String> },

    /// The input or output stream is not valid CSV.
    #[error("failed to process CSV: {0}")]
    Csv(String),
}
