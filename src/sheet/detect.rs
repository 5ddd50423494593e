// =============================================================================
// OHLC column detection
// =============================================================================
//
// Maps heterogeneous input headers to the canonical Open/High/Low/Close
// fields. Matching is case-insensitive with a deterministic priority per
// field so tie-breaks are pinned:
//
//   1. exact full-name match        ("Close", "close", "CLOSE")
//   2. exact single-letter alias    ("c")
//   3. first header containing the name as a substring ("Adj Close")
//
// If the first header is not one of the four mapped OHLC columns it is
// treated as a label (date/time) column and passed through verbatim.
// =============================================================================

use crate::error::SheetError;

/// Canonical field names paired with their single-letter aliases, in the
/// order they are reported when missing.
const FIELDS: [(&str, &str); 4] = [("open", "o"), ("high", "h"), ("low", "l"), ("close", "c")];

/// Indices of the detected OHLC columns within the header row, plus the
/// optional leading label column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub open: usize,
    pub high: usize,
    pub low: usize,
    pub close: usize,
    /// Index of the pass-through label column (always 0 when present).
    pub label: Option<usize>,
}

/// Detect the OHLC columns in `headers`.
///
/// Fails with `SheetError::MissingColumn` naming every field that could not
/// be identified. Detection is a pure function of the header row; no data
/// row is consulted.
pub fn detect_ohlc_columns(headers: &[String]) -> Result<ColumnMap, SheetError> {
    let lower: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let find = |name: &str, alias: &str| -> Option<usize> {
        lower
            .iter()
            .position(|h| h == name)
            .or_else(|| lower.iter().position(|h| h == alias))
            .or_else(|| lower.iter().position(|h| h.contains(name)))
    };

    let mut found: [Option<usize>; 4] = [None; 4];
    let mut missing: Vec<String> = Vec::new();
    for (slot, (name, alias)) in found.iter_mut().zip(FIELDS.iter()) {
        *slot = find(name, alias);
        if slot.is_none() {
            missing.push(name.to_string());
        }
    }

    if !missing.is_empty() {
        return Err(SheetError::MissingColumn { fields: missing });
    }

    let (open, high, low, close) = (
        found[0].unwrap_or_default(),
        found[1].unwrap_or_default(),
        found[2].unwrap_or_default(),
        found[3].unwrap_or_default(),
    );

    let label = if !headers.is_empty() && ![open, high, low, close].contains(&0) {
        Some(0)
    } else {
        None
    };

    Ok(ColumnMap {
        open,
        high,
        low,
        close,
        label,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn exact_match_case_insensitive() {
        let map = detect_ohlc_columns(&headers(&["OPEN", "high", "Low", "cLoSe"])).unwrap();
        assert_eq!((map.open, map.high, map.low, map.close), (0, 1, 2, 3));
        assert_eq!(map.label, None);
    }

    #[test]
    fn single_letter_aliases() {
        let map = detect_ohlc_columns(&headers(&["Date", "O", "H", "L", "C"])).unwrap();
        assert_eq!((map.open, map.high, map.low, map.close), (1, 2, 3, 4));
        assert_eq!(map.label, Some(0));
    }

    #[test]
    fn substring_fallback() {
        let map =
            detect_ohlc_columns(&headers(&["Opening Px", "Highest", "Lowest", "Closing Px"]))
                .unwrap();
        assert_eq!((map.open, map.high, map.low, map.close), (0, 1, 2, 3));
    }

    #[test]
    fn exact_match_beats_substring() {
        // "Adj Close" contains "close" but the exact header must win.
        let map =
            detect_ohlc_columns(&headers(&["Adj Close", "Open", "High", "Low", "Close"])).unwrap();
        assert_eq!(map.close, 4);
        // "Adj Close" is first and unmapped, so it becomes the label column.
        assert_eq!(map.label, Some(0));
    }

    #[test]
    fn substring_picks_first_in_header_order() {
        let map = detect_ohlc_columns(&headers(&[
            "open_bid",
            "open_ask",
            "High",
            "Low",
            "Close",
        ]))
        .unwrap();
        assert_eq!(map.open, 0);
    }

    #[test]
    fn missing_columns_reported_in_canonical_order() {
        let err = detect_ohlc_columns(&headers(&["Date", "Open", "Volume"])).unwrap_err();
        match err {
            SheetError::MissingColumn { fields } => {
                assert_eq!(fields, vec!["high", "low", "close"]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn empty_headers_miss_everything() {
        let err = detect_ohlc_columns(&[]).unwrap_err();
        match err {
            SheetError::MissingColumn { fields } => {
                assert_eq!(fields, vec!["open", "high", "low", "close"]);
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn no_label_when_first_column_is_ohlc() {
        let map = detect_ohlc_columns(&headers(&["Open", "High", "Low", "Close", "Volume"]))
            .unwrap();
        assert_eq!(map.label, None);
    }
}
