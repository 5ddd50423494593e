// =============================================================================
// Table model & numeric coercion
// =============================================================================
//
// `RawTable` is the parsed upload: one header row plus ordered data rows of
// text cells. Row order is time-ascending and drives every lag in the
// indicator pipeline, so rows are never reordered or dropped.
//
// `Bar` is one coerced price row. Every OHLC field is `Option<f64>`:
// `None` means "undefined" (blank or non-numeric cell) and is distinct from
// zero everywhere downstream. An undefined operand makes the dependent
// formula undefined, never zero.
// =============================================================================

use crate::sheet::detect::ColumnMap;

/// A row-ordered text table with a header row, as parsed from CSV.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One OHLC price row after numeric coercion, plus the pass-through label
/// cell (date/time or similar) when the table carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub label: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
}

impl RawTable {
    /// Coerce every data row into a `Bar` using the detected column mapping.
    ///
    /// Cells outside the row's width (short CSV rows) and non-numeric cells
    /// coerce to `None`. The label cell is carried verbatim as text.
    pub fn bars(&self, columns: &ColumnMap) -> Vec<Bar> {
        self.rows
            .iter()
            .map(|row| Bar {
                label: columns
                    .label
                    .map(|idx| row.get(idx).cloned().unwrap_or_default()),
                open: row.get(columns.open).and_then(|c| coerce_numeric(c)),
                high: row.get(columns.high).and_then(|c| coerce_numeric(c)),
                low: row.get(columns.low).and_then(|c| coerce_numeric(c)),
                close: row.get(columns.close).and_then(|c| coerce_numeric(c)),
            })
            .collect()
    }
}

/// Parse a cell as a finite float. Empty, whitespace-only, non-numeric, and
/// non-finite cells all coerce to `None` (undefined), mirroring how the
/// reference sheet leaves such cells blank.
pub fn coerce_numeric(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
