// =============================================================================
// Average Directional Index (ADX) sheet
// =============================================================================
//
// Builds the full derived table the reference spreadsheet computes, column by
// column, for every input row:
//
//   TR, +DM 1, -DM 1          raw per-row series (row 0 undefined)
//   TR14, +DM14, -DM14        Wilder running sums, seeded at index N-1
//   +DI14 = 100 * +DM14/TR14  (0 where TR14 is 0)
//   -DI14 = 100 * -DM14/TR14
//   DI 14 Diff = |+DI14 - -DI14|,  DI 14 Sum = +DI14 + -DI14
//   DX = 100 * Diff/Sum       (0 where the sum is 0)
//   ADX                       seeded at index 2N-1 with the mean of
//                             DX[N ..= 2N-1], then (ADX*(N-1) + DX) / N
//
// Note the two distinct seeds: the smoothed TR/DM columns start at index 13,
// ADX starts at index 27. Cells below a seed are undefined and render blank.
// =============================================================================

use crate::error::SheetError;
use crate::indicators::directional::directional_movement_series;
use crate::indicators::true_range::true_range_series;
use crate::indicators::wilder::wilder_sum;
use crate::sheet::{detect_ohlc_columns, RawTable};

/// Smoothing period of the reference sheet. Fixed: this engine reproduces
/// one spreadsheet convention, it is not a configurable indicator library.
pub const PERIOD: usize = 14;

/// One fully derived output row. Every numeric field is `None` when the
/// spreadsheet cell would be blank.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxRow {
    pub label: Option<String>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub tr: Option<f64>,
    pub plus_dm: Option<f64>,
    pub minus_dm: Option<f64>,
    pub tr14: Option<f64>,
    pub plus_dm14: Option<f64>,
    pub minus_dm14: Option<f64>,
    pub plus_di14: Option<f64>,
    pub minus_di14: Option<f64>,
    pub di_diff: Option<f64>,
    pub di_sum: Option<f64>,
    pub dx: Option<f64>,
    pub adx: Option<f64>,
}

/// The derived table: one row per input row, plus the header of the
/// pass-through label column when the input had one.
#[derive(Debug, Clone, PartialEq)]
pub struct AdxSheet {
    pub label_header: Option<String>,
    pub rows: Vec<AdxRow>,
}

/// Compute the complete derived sheet for a raw input table.
///
/// Pure and stateless: identical input produces an identical sheet. Fails
/// only when the OHLC columns cannot be identified; non-numeric cells
/// degrade to blank cells instead.
pub fn calculate_adx_sheet(table: &RawTable) -> Result<AdxSheet, SheetError> {
    let columns = detect_ohlc_columns(&table.headers)?;
    let bars = table.bars(&columns);

    let tr = true_range_series(&bars);
    let (plus_dm, minus_dm) = directional_movement_series(&bars);

    let tr14 = wilder_sum(&tr, PERIOD);
    let plus_dm14 = wilder_sum(&plus_dm, PERIOD);
    let minus_dm14 = wilder_sum(&minus_dm, PERIOD);

    let len = bars.len();
    let mut plus_di14 = Vec::with_capacity(len);
    let mut minus_di14 = Vec::with_capacity(len);
    let mut di_diff = Vec::with_capacity(len);
    let mut di_sum = Vec::with_capacity(len);
    let mut dx = Vec::with_capacity(len);

    for i in 0..len {
        let plus_di = directional_index(plus_dm14[i], tr14[i]);
        let minus_di = directional_index(minus_dm14[i], tr14[i]);

        let (diff, sum) = match (plus_di, minus_di) {
            (Some(p), Some(m)) => (Some((p - m).abs()), Some(p + m)),
            _ => (None, None),
        };

        plus_di14.push(plus_di);
        minus_di14.push(minus_di);
        di_diff.push(diff);
        di_sum.push(sum);
        dx.push(dx_value(diff, sum));
    }

    let adx = average_directional_index(&dx, PERIOD);

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| AdxRow {
            label: bar.label.clone(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            tr: tr[i],
            plus_dm: plus_dm[i],
            minus_dm: minus_dm[i],
            tr14: tr14[i],
            plus_dm14: plus_dm14[i],
            minus_dm14: minus_dm14[i],
            plus_di14: plus_di14[i],
            minus_di14: minus_di14[i],
            di_diff: di_diff[i],
            di_sum: di_sum[i],
            dx: dx[i],
            adx: adx[i],
        })
        .collect();

    Ok(AdxSheet {
        label_header: columns.label.map(|idx| table.headers[idx].clone()),
        rows,
    })
}

/// DI from a smoothed DM and a smoothed TR: `100 * DM14 / TR14`, with the
/// ratio taken as 0 where TR14 is 0 so a flat market never divides by zero.
fn directional_index(dm14: Option<f64>, tr14: Option<f64>) -> Option<f64> {
    match (dm14, tr14) {
        (Some(dm), Some(tr)) => {
            if tr == 0.0 {
                Some(0.0)
            } else {
                Some(100.0 * dm / tr)
            }
        }
        _ => None,
    }
}

/// DX from the DI spread: `100 * Diff / Sum`, 0 where the sum is 0 (both
/// DIs zero means no directional reading, not a fault).
fn dx_value(di_diff: Option<f64>, di_sum: Option<f64>) -> Option<f64> {
    match (di_diff, di_sum) {
        (Some(diff), Some(sum)) => {
            if sum == 0.0 {
                Some(0.0)
            } else {
                Some(100.0 * diff / sum)
            }
        }
        _ => None,
    }
}

/// Smooth DX into ADX. The seed at index `2 * period - 1` is the arithmetic
/// mean of the `period` DX values starting at index `period`; later rows use
/// `ADX[i] = (ADX[i-1] * (N-1) + DX[i]) / N`. The seed needs its whole DX
/// window defined; an undefined DX mid-recursion leaves the rest undefined.
fn average_directional_index(dx: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; dx.len()];
    if period == 0 {
        return out;
    }

    let seed_idx = 2 * period - 1;
    if dx.len() <= seed_idx {
        return out;
    }

    let window: Vec<f64> = dx[period..=seed_idx].iter().flatten().copied().collect();
    if window.len() != period {
        return out;
    }

    let n = period as f64;
    let mut adx = window.iter().sum::<f64>() / n;
    out[seed_idx] = Some(adx);

    for i in seed_idx + 1..dx.len() {
        match dx[i] {
            Some(value) => {
                adx = (adx * (n - 1.0) + value) / n;
                out[i] = Some(adx);
            }
            None => break,
        }
    }

    out
}
