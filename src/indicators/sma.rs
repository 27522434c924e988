// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA = (close_{n-w+1} + ... + close_n) / w
//
// Only the trailing `window` closes contribute; everything older is ignored.

/// Arithmetic mean of the last `window` closes.
///
/// Returns `None` when:
/// - `window == 0`
/// - Fewer than `window` data points.
/// - The mean is non-finite.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }

    let tail = &closes[closes.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;

    mean.is_finite().then_some(mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_uses_trailing_window_only() {
        let closes = vec![100.0, 100.0, 1.0, 2.0, 3.0];
        let sma = simple_moving_average(&closes, 3).unwrap();
        assert!((sma - 2.0).abs() < 1e-12);
    }

    #[test]
    fn sma_window_equal_to_len() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let sma = simple_moving_average(&closes, 20).unwrap();
        assert!((sma - 10.5).abs() < 1e-12);
    }

    #[test]
    fn sma_undefined_for_short_series() {
        for len in 0..20 {
            let closes = vec![1.0; len];
            assert!(
                simple_moving_average(&closes, 20).is_none(),
                "len {len} should be undefined"
            );
        }
    }

    #[test]
    fn sma_window_zero() {
        assert!(simple_moving_average(&[1.0, 2.0], 0).is_none());
    }

    #[test]
    fn sma_non_finite_is_none() {
        assert!(simple_moving_average(&[f64::INFINITY, 1.0], 2).is_none());
    }
}
