// 8.0.2: errors for engine operations. domain edge cases never land here,
// they return neutral results instead.

use crate::config::ConfigError;
use crate::types::{FixedPoint18, ParseFixedError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("arithmetic overflow in {operation}")]
    Overflow { operation: &'static str },

    #[error("division by zero in {operation}")]
    DivisionByZero { operation: &'static str },

    #[error("virtual reserve and virtual supply must be positive")]
    ZeroVirtualLiquidity,

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] ParseFixedError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("slippage limit {limit} exceeded: got {actual}")]
    SlippageExceeded { limit: FixedPoint18, actual: FixedPoint18 },
}
