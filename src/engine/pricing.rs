//! Curve operations bound to the engine's virtual liquidity.

use super::core::Engine;
use super::results::EngineError;
use crate::curve::{self, CurveState, Quote};
use crate::types::FixedPoint18;

impl Engine {
    /// Spot price of the pool.
    pub fn price(&self, state: &CurveState) -> Result<FixedPoint18, EngineError> {
        curve::price(state)
    }

    pub fn market_cap(&self, state: &CurveState) -> Result<FixedPoint18, EngineError> {
        curve::market_cap(state)
    }

    pub fn quote_buy(&self, state: &CurveState, desired_shares: FixedPoint18) -> Result<Quote, EngineError> {
        curve::quote_buy(state, desired_shares)
    }

    pub fn quote_sell(&self, state: &CurveState, shares_to_sell: FixedPoint18) -> Result<Quote, EngineError> {
        curve::quote_sell(state, shares_to_sell)
    }

    pub fn shares_for_amount(&self, state: &CurveState, gross_amount: FixedPoint18) -> Result<FixedPoint18, EngineError> {
        curve::shares_for_amount(state, gross_amount)
    }
}
