// =============================================================================
// True Range (TR)
// =============================================================================
//
// TR captures the full day range including gaps across the previous close:
//
//   TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|)
//
// Row 0 has no predecessor and is undefined, not zero. Any undefined operand
// (a blank or non-numeric input cell) makes that row's TR undefined.
// =============================================================================

use crate::sheet::Bar;

/// Compute the per-row True Range series. The output always has one entry
/// per input row.
pub fn true_range_series(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            out.push(None);
            continue;
        }
        let tr = match (bar.high, bar.low, bars[i - 1].close) {
            (Some(high), Some(low), Some(prev_close)) => {
                let hl = high - low;
                let hc = (high - prev_close).abs();
                let lc = (low - prev_close).abs();
                Some(hl.max(hc).max(lc))
            }
            _ => None,
        };
        out.push(tr);
    }
    out
}
