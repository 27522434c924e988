// =============================================================================
// Relative Strength Index (RSI): last-N directional moves
// =============================================================================
//
// Step 1: Compute price changes (deltas) from consecutive closes.
// Step 2: Split deltas into gains (d > 0) and losses (|d| for d < 0).
//         Flat deltas belong to neither list.
// Step 3: avg_gain = sum(last `period` gains)  / period   (0 if no gains)
//         avg_loss = sum(last `period` losses) / period   (1e-10 if no losses)
// Step 4: RS  = avg_gain / avg_loss
//         RSI = 100 - 100 / (1 + RS), rounded to 2 decimals.
//
// This is NOT Wilder smoothing. The averages cover the most recent `period`
// moves of each sign, however far back they sit in the series, and always
// divide by `period`. Historical scan output depends on these exact numbers.
// =============================================================================

/// Default look-back used by the scanner.
pub const RSI_PERIOD: usize = 14;

/// Stand-in average loss when the series has no down moves.
const LOSS_EPSILON: f64 = 1e-10;

/// Compute the RSI of `closes` for the given `period`.
///
/// # Edge cases
/// - `period == 0` => `None`
/// - `closes.len() < period + 1` => `None`
/// - No gains and no losses at all (flat series) => `None`
/// - Gains but no losses => 100.0
/// - Non-finite result => `None`
pub fn relative_strength_index(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let gains: Vec<f64> = deltas.iter().copied().filter(|&d| d > 0.0).collect();
    let losses: Vec<f64> = deltas.iter().filter(|&&d| d < 0.0).map(|d| -d).collect();

    if gains.is_empty() && losses.is_empty() {
        return None;
    }

    let period_f = period as f64;
    let avg_gain = if gains.is_empty() {
        0.0
    } else {
        last_n(&gains, period).iter().sum::<f64>() / period_f
    };
    let avg_loss = if losses.is_empty() {
        LOSS_EPSILON
    } else {
        last_n(&losses, period).iter().sum::<f64>() / period_f
    };

    let rs = avg_gain / avg_loss;
    let rsi = round2(100.0 - 100.0 / (1.0 + rs));

    rsi.is_finite().then_some(rsi)
}

fn last_n(values: &[f64], n: usize) -> &[f64] {
    &values[values.len().saturating_sub(n)..]
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
