// bonding-core: bonding-curve pricing and fee distribution engine.
// integer first: every amount is an 18-decimal fixed-point integer, floats are display only.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: FixedPoint18, Bps, parsing and formatting
//   2.x  math.rs: 512-bit mul/div, integer sqrt, display ratios
//   3.x  curve.rs: CurveState, Quote, price, buy/sell quotes, shares for amount
//   4.x  fees.rs: fee split, early buyer bonus, lp pro-rata payouts
//   5.x  trade.rs: buy/sell previews, slippage bounds
//   7.x  config.rs: virtual liquidity, fee schedule, env presets
//   8.x  engine/: engine facade over a validated config

pub mod config;
pub mod curve;
pub mod engine;
pub mod fees;
pub mod trade;
pub mod types;

mod math;

// re exports for convenience
pub use config::*;
pub use curve::*;
pub use engine::*;
pub use fees::*;
pub use trade::*;
pub use types::*;
