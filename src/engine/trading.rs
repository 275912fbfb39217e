//! Fee split and trade previews under the engine's fee schedule.

use super::core::Engine;
use super::results::EngineError;
use crate::curve::CurveState;
use crate::fees::{self, FeeBreakdown, LpSplit};
use crate::trade::{self, BuyPreview, SellPreview};
use crate::types::FixedPoint18;

impl Engine {
    pub fn distribute(
        &self,
        gross_amount: FixedPoint18,
        is_buy: bool,
        buyer_sequence_number: u64,
    ) -> Result<FeeBreakdown, EngineError> {
        fees::distribute(gross_amount, is_buy, buyer_sequence_number, &self.config.fees)
    }

    pub fn lp_proportional_share(
        &self,
        user_shares: FixedPoint18,
        total_shares: FixedPoint18,
        lp_pool: FixedPoint18,
    ) -> Result<FixedPoint18, EngineError> {
        fees::lp_proportional_share(user_shares, total_shares, lp_pool)
    }

    pub fn split_lp_pool(&self, provider_shares: &[FixedPoint18], lp_pool: FixedPoint18) -> Result<LpSplit, EngineError> {
        fees::split_lp_pool(provider_shares, lp_pool)
    }

    pub fn preview_buy(
        &self,
        state: &CurveState,
        gross_spend: FixedPoint18,
        buyer_sequence_number: u64,
    ) -> Result<BuyPreview, EngineError> {
        trade::preview_buy(state, gross_spend, buyer_sequence_number, &self.config.fees)
    }

    pub fn preview_sell(&self, state: &CurveState, shares: FixedPoint18) -> Result<SellPreview, EngineError> {
        trade::preview_sell(state, shares, &self.config.fees)
    }
}
