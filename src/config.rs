// 7.0 config.rs: all protocol constants in one place. virtual liquidity and the fee schedule.
// 7.1 nothing here is global state; callers build a config and pass it in.

use serde::{Deserialize, Serialize};

use crate::curve::CurveState;
use crate::types::{Bps, FixedPoint18};

/// Virtual reserve and virtual supply seeded into every pool, in whole tokens.
pub const DEFAULT_VIRTUAL_UNITS: u64 = 1000;

// Virtual liquidity injected into every CurveState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveParams {
    // Offset added to the real reserve
    pub virtual_reserve: FixedPoint18,
    // Offset added to the real supply
    pub virtual_supply: FixedPoint18,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            virtual_reserve: FixedPoint18::from_units(DEFAULT_VIRTUAL_UNITS),
            virtual_supply: FixedPoint18::from_units(DEFAULT_VIRTUAL_UNITS),
        }
    }
}

impl CurveParams {
    /// Snapshot of a pool with these virtuals. real balances come from the ledger.
    pub fn state(&self, reserve: FixedPoint18, supply: FixedPoint18) -> CurveState {
        CurveState {
            reserve,
            supply,
            virtual_reserve: self.virtual_reserve,
            virtual_supply: self.virtual_supply,
        }
    }
}

/** 7.2: fee schedule. all shares in bps of the total fee, 10_000 = whole fee */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    // Protocol fee on the gross trade amount, in bps of the trade
    pub fee_bps: u32,
    // Pool creator's cut of the fee
    pub creator_bps: u32,
    // Liquidity providers' cut of the fee
    pub lp_bps: u32,
    // Treasury's cut of the fee
    pub treasury_bps: u32,
    // Early buyer bonus, folded into treasury when not earned
    pub early_bonus_bps: u32,
    // Buyers with a sequence number below this earn the bonus
    pub early_buyer_limit: u64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_bps: 100, // 1%
            creator_bps: 4_000,
            lp_bps: 3_000,
            treasury_bps: 2_000,
            early_bonus_bps: 1_000,
            early_buyer_limit: 10,
        }
    }
}

impl FeeSchedule {
    pub fn fee_rate(&self) -> Bps {
        Bps::new(self.fee_bps)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fee_bps > MAX_FEE_BPS {
            return Err(ConfigError::InvalidFees {
                reason: format!("fee of {} bps exceeds the {} bps cap", self.fee_bps, MAX_FEE_BPS),
            });
        }

        let split = self.creator_bps as u64
            + self.lp_bps as u64
            + self.treasury_bps as u64
            + self.early_bonus_bps as u64;
        if split != Bps::MAX as u64 {
            return Err(ConfigError::InvalidFees {
                reason: format!("fee split sums to {} bps, expected {}", split, Bps::MAX),
            });
        }

        Ok(())
    }
}

/// Highest protocol fee a schedule may charge (10%).
pub const MAX_FEE_BPS: u32 = 1_000;

// The complete engine configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub curve: CurveParams,
    pub fees: FeeSchedule,
}

impl EngineConfig {
    // Fee-free pools for testnet
    pub fn testnet() -> Self {
        let mut config = Self::default();
        config.fees.fee_bps = 0;
        config
    }

    // Ten times the virtual liquidity. flatter curve, smaller impact per trade
    pub fn deep_liquidity() -> Self {
        let mut config = Self::default();
        config.curve.virtual_reserve = FixedPoint18::from_units(DEFAULT_VIRTUAL_UNITS * 10);
        config.curve.virtual_supply = FixedPoint18::from_units(DEFAULT_VIRTUAL_UNITS * 10);
        config
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.curve.virtual_reserve.is_zero() || self.curve.virtual_supply.is_zero() {
            return Err(ConfigError::InvalidCurve {
                reason: "virtual reserve and virtual supply must be positive".to_string(),
            });
        }

        self.fees.validate()
    }
}

// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid curve params: {reason}")]
    InvalidCurve { reason: String },

    #[error("invalid fee schedule: {reason}")]
    InvalidFees { reason: String },
}

// Environment presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    Development,
    Testnet,
    Mainnet,
}

impl Environment {
    pub fn config(&self) -> EngineConfig {
        match self {
            Environment::Development => EngineConfig::default(),
            Environment::Testnet => EngineConfig::testnet(),
            Environment::Mainnet => EngineConfig::default(),
        }
    }
}
