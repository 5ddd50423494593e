// =============================================================================
// Directional Movement (+DM / -DM)
// =============================================================================
//
// Winner-take-one movement attribution per row:
//
//   UpMove[i]   = H[i] - H[i-1]
//   DownMove[i] = L[i-1] - L[i]
//   +DM[i] = UpMove[i]   iff UpMove > DownMove and UpMove > 0,   else 0
//   -DM[i] = DownMove[i] iff DownMove > UpMove and DownMove > 0, else 0
//
// Both inequalities are strict, so an UpMove == DownMove tie yields 0/0 and
// at most one of +DM/-DM can be nonzero on any row. Row 0 is undefined.
// =============================================================================

use crate::sheet::Bar;

/// Compute the per-row (+DM, -DM) series. Each output has one entry per
/// input row; rows with an undefined High or Low (current or previous) are
/// undefined in both outputs.
pub fn directional_movement_series(bars: &[Bar]) -> (Vec<Option<f64>>, Vec<Option<f64>>) {
    let mut plus = Vec::with_capacity(bars.len());
    let mut minus = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            plus.push(None);
            minus.push(None);
            continue;
        }
        match (bar.high, bars[i - 1].high, bar.low, bars[i - 1].low) {
            (Some(high), Some(prev_high), Some(low), Some(prev_low)) => {
                let up_move = high - prev_high;
                let down_move = prev_low - low;

                let plus_dm = if up_move > down_move && up_move > 0.0 {
                    up_move
                } else {
                    0.0
                };
                let minus_dm = if down_move > up_move && down_move > 0.0 {
                    down_move
                } else {
                    0.0
                };

                plus.push(Some(plus_dm));
                minus.push(Some(minus_dm));
            }
            _ => {
                plus.push(None);
                minus.push(None);
            }
        }
    }

    (plus, minus)
}
