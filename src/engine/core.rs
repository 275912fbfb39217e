// 8.0 engine/core.rs: the engine value. config in, quotes out.

use super::results::EngineError;
use crate::config::EngineConfig;
use crate::curve::CurveState;
use crate::types::FixedPoint18;
use tracing::info;

/** 8.1: validated protocol constants. cheap to clone, safe to share */
#[derive(Debug, Clone)]
pub struct Engine {
    pub(super) config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            virtual_reserve = %config.curve.virtual_reserve,
            virtual_supply = %config.curve.virtual_supply,
            fee_bps = config.fees.fee_bps,
            "engine configured"
        );
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Snapshot for ledger balances, with this engine's virtual liquidity.
    pub fn state(&self, reserve: FixedPoint18, supply: FixedPoint18) -> CurveState {
        self.config.curve.state(reserve, supply)
    }

    /// Same as [`Engine::state`] for balances that arrive as decimal strings.
    pub fn state_from_str(&self, reserve: &str, supply: &str) -> Result<CurveState, EngineError> {
        Ok(self.state(reserve.parse()?, supply.parse()?))
    }
}
