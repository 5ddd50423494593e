// =============================================================================
// Wilder running-sum smoothing
// =============================================================================
//
// Reduces a raw per-row series (TR, +DM, or -DM) to a smoothed running sum:
//
//   seed:  S[N-1] = R[0] + ... + R[N-1]
//   then:  S[i]   = S[i-1] - S[i-1]/N + R[i]
//
// This carries the magnitude of N summed periods forward, decayed by
// (N-1)/N per step. It is NOT a normalized moving average.
//
// Indices below the seed are undefined. Undefined raw values are summed as
// zero, matching the reference sheet which fills blanks with 0 before
// smoothing (the undefined row-0 value in particular).
// =============================================================================

/// Smooth `raw` with period `period`. The output always has one entry per
/// input entry; everything below index `period - 1` is undefined, as is the
/// whole output when the series is shorter than one full period.
pub fn wilder_sum(raw: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; raw.len()];
    if period == 0 || raw.len() < period {
        return out;
    }

    let n = period as f64;
    let mut sum: f64 = raw[..period].iter().map(|v| v.unwrap_or(0.0)).sum();
    out[period - 1] = Some(sum);

    for i in period..raw.len() {
        sum = sum - sum / n + raw[i].unwrap_or(0.0);
        out[i] = Some(sum);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn defined(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn period_zero_yields_all_undefined() {
        assert_eq!(wilder_sum(&defined(&[1.0, 2.0, 3.0]), 0), vec![None; 3]);
    }

    #[test]
    fn short_series_yields_all_undefined() {
        let raw = defined(&[1.0; 13]);
        assert_eq!(wilder_sum(&raw, 14), vec![None; 13]);
    }

    #[test]
    fn seed_lands_at_period_minus_one() {
        let raw = defined(&[2.0; 14]);
        let smoothed = wilder_sum(&raw, 14);
        assert!(smoothed[..13].iter().all(Option::is_none));
        assert_eq!(smoothed[13], Some(28.0));
    }

    #[test]
    fn fourteen_identical_values_then_zero() {
        // Seed = 14R; one step with a zero raw value decays it to 13R.
        let mut raw = defined(&[2.0; 14]);
        raw.push(Some(0.0));
        let smoothed = wilder_sum(&raw, 14);
        assert_eq!(smoothed[13], Some(28.0));
        assert_eq!(smoothed[14], Some(26.0));
    }

    #[test]
    fn constant_series_holds_the_seed() {
        // S - S/14 + R with S = 14R is again 14R.
        let raw = defined(&[1.5; 30]);
        let smoothed = wilder_sum(&raw, 14);
        for value in &smoothed[13..] {
            assert!((value.unwrap() - 21.0).abs() < 1e-12);
        }
    }

    #[test]
    fn undefined_values_sum_as_zero() {
        let mut raw = defined(&[3.0; 16]);
        raw[0] = None; // the row with no predecessor
        raw[15] = None;
        let smoothed = wilder_sum(&raw, 14);
        assert_eq!(smoothed[13], Some(39.0)); // 13 * 3.0
        let s14 = smoothed[14].unwrap(); // 39 - 39/14 + 3
        assert!((s14 - (39.0 - 39.0 / 14.0 + 3.0)).abs() < 1e-12);
        let s15 = smoothed[15].unwrap(); // decay only, raw counted as 0
        assert!((s15 - (s14 - s14 / 14.0)).abs() < 1e-12);
    }

    #[test]
    fn recursion_matches_hand_computation() {
        let raw = defined(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        let smoothed = wilder_sum(&raw, 3);
        assert_eq!(smoothed[0], None);
        assert_eq!(smoothed[1], None);
        let mut expected = 6.0;
        assert_eq!(smoothed[2], Some(expected));
        for i in 3..raw.len() {
            expected = expected - expected / 3.0 + raw[i].unwrap();
            assert!((smoothed[i].unwrap() - expected).abs() < 1e-12);
        }
    }
}
