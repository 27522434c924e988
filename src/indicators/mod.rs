// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator functions over a closing-price series.
// Every public function returns `Option<f64>` so callers are forced to handle
// insufficient-data and numerical-edge-case scenarios.

pub mod rsi;
pub mod sma;

pub use rsi::{relative_strength_index, RSI_PERIOD};
pub use sma::simple_moving_average;
