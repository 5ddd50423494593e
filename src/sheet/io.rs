// =============================================================================
// CSV read / render / write
// =============================================================================
//
// Reading: the upload is parsed into a `RawTable`. Ragged data rows are
// padded (or truncated) to the header width so downstream indexing is total.
//
// Rendering: the derived sheet is flattened to text cells once, and both the
// JSON preview and the downloadable CSV are produced from that same
// rendering, so the two can never disagree. Numerics are rounded to a fixed
// decimal precision; undefined cells render as empty strings, never "0" and
// never "NaN".
// =============================================================================

use crate::error::SheetError;
use crate::indicators::adx::AdxSheet;
use crate::sheet::frame::RawTable;

/// Header strings of the derived numeric columns, in reference-sheet order.
/// The label column, when present, precedes them.
const DERIVED_HEADERS: [&str; 16] = [
    "Open", "High", "Low", "Close", "TR", "+DM 1", "-DM 1", "TR14", "+DM14", "-DM14", "+DI14",
    "-DI14", "DI 14 Diff", "DI 14 Sum", "DX", "ADX",
];

/// A sheet flattened to display text: one header row plus text cells.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parse CSV bytes into a `RawTable`.
///
/// The first record is the header row. Data rows are normalized to the
/// header width; missing trailing cells become empty (undefined) cells.
pub fn parse_csv(data: &[u8]) -> Result<RawTable, SheetError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| SheetError::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();
    let width = headers.len();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SheetError::Csv(e.to_string()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}

/// Flatten a derived sheet to text cells at the given decimal precision.
pub fn render_sheet(sheet: &AdxSheet, precision: u32) -> RenderedSheet {
    let mut headers: Vec<String> = Vec::with_capacity(DERIVED_HEADERS.len() + 1);
    if let Some(label_header) = &sheet.label_header {
        headers.push(label_header.clone());
    }
    headers.extend(DERIVED_HEADERS.iter().map(|h| h.to_string()));

    let rows = sheet
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = Vec::with_capacity(headers.len());
            if sheet.label_header.is_some() {
                cells.push(row.label.clone().unwrap_or_default());
            }
            for value in [
                row.open,
                row.high,
                row.low,
                row.close,
                row.tr,
                row.plus_dm,
                row.minus_dm,
                row.tr14,
                row.plus_dm14,
                row.minus_dm14,
                row.plus_di14,
                row.minus_di14,
                row.di_diff,
                row.di_sum,
                row.dx,
                row.adx,
            ] {
                cells.push(render_cell(value, precision));
            }
            cells
        })
        .collect();

    RenderedSheet { headers, rows }
}

/// Serialize a rendered sheet as CSV text with a header row.
pub fn to_csv(rendered: &RenderedSheet) -> Result<String, SheetError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&rendered.headers)
        .map_err(|e| SheetError::Csv(e.to_string()))?;
    for row in &rendered.rows {
        writer
            .write_record(row)
            .map_err(|e| SheetError::Csv(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| SheetError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| SheetError::Csv(e.to_string()))
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Render one numeric cell: blank for undefined, otherwise the rounded value.
fn render_cell(value: Option<f64>, precision: u32) -> String {
    match value {
        Some(v) => {
            let rounded = round_to(v, precision);
            // Normalize -0.0 so it never renders as "-0".
            let rounded = if rounded == 0.0 { 0.0 } else { rounded };
            format!("{rounded}")
        }
        None => String::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::adx::calculate_adx_sheet;

    #[test]
    fn parse_simple_csv() {
        let data = b"Date,Open,High,Low,Close\n2021-01-04,1,2,0.5,1.5\n";
        let table = parse_csv(data).unwrap();
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "2021-01-04");
        assert_eq!(table.rows[0][4], "1.5");
    }

    #[test]
    fn parse_pads_ragged_rows() {
        let data = b"Open,High,Low,Close\n1,2\n1,2,0.5,1.5,extra\n";
        let table = parse_csv(data).unwrap();
        assert_eq!(table.rows[0], vec!["1", "2", "", ""]);
        // Overlong rows are truncated to the header width.
        assert_eq!(table.rows[1].len(), 4);
    }

    #[test]
    fn round_to_display_precision() {
        assert_eq!(round_to(66.666_666_666_7, 6), 66.666_667);
        assert_eq!(round_to(19.5, 6), 19.5);
        assert_eq!(round_to(1.234_567_89, 2), 1.23);
    }

    #[test]
    fn render_blank_for_undefined() {
        assert_eq!(render_cell(None, 6), "");
        assert_eq!(render_cell(Some(0.0), 6), "0");
        assert_eq!(render_cell(Some(-0.000_000_01), 6), "0");
        assert_eq!(render_cell(Some(19.5), 6), "19.5");
    }

    fn rising_csv(rows: usize) -> Vec<u8> {
        let mut data = String::from("Date,Open,High,Low,Close\n");
        for i in 0..rows {
            let base = 100.0 + i as f64;
            data.push_str(&format!(
                "2021-{:02},{},{},{},{}\n",
                i + 1,
                base + 0.2,
                base + 1.0,
                base,
                base + 0.5
            ));
        }
        data.into_bytes()
    }

    #[test]
    fn rendered_sheet_preserves_rows_and_label() {
        let table = parse_csv(&rising_csv(30)).unwrap();
        let sheet = calculate_adx_sheet(&table).unwrap();
        let rendered = render_sheet(&sheet, 6);

        assert_eq!(rendered.rows.len(), 30);
        assert_eq!(rendered.headers[0], "Date");
        assert_eq!(rendered.headers.len(), 17);
        // Row 0: label passes through, TR/DM/smoothed columns all blank.
        assert_eq!(rendered.rows[0][0], "2021-01");
        assert_eq!(rendered.rows[0][5], "");
        assert!(rendered.rows[0][8..].iter().all(|c| c.is_empty()));
        // Seed row carries the first smoothed values.
        assert_eq!(rendered.rows[13][8], "19.5"); // TR14 seed = 13 * 1.5
    }

    #[test]
    fn csv_output_is_deterministic() {
        let table = parse_csv(&rising_csv(30)).unwrap();
        let first = to_csv(&render_sheet(&calculate_adx_sheet(&table).unwrap(), 6)).unwrap();
        let second = to_csv(&render_sheet(&calculate_adx_sheet(&table).unwrap(), 6)).unwrap();
        assert_eq!(first, second);
        assert!(first.starts_with("Date,Open,High,Low,Close,TR,+DM 1,-DM 1,"));
        // One header line plus one line per input row.
        assert_eq!(first.lines().count(), 31);
    }
}
