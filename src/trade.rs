// 5.0: trade previews. composes the curve and the fee split the way a request handler does.
// a buy spends a gross amount: fee first, the net buys shares, any unspent wei is refunded.
// a sell prices the shares first, then the fee comes out of the payout.
// previews are advisory. the caller re-checks them against the ledger at settlement.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeeSchedule;
use crate::curve::{quote_buy, quote_sell, shares_for_amount, CurveState, Quote};
use crate::engine::EngineError;
use crate::fees::{distribute, FeeBreakdown};
use crate::math::{self, Rounding};
use crate::types::{Bps, FixedPoint18};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuyPreview {
    pub fees: FeeBreakdown,
    pub quote: Quote,
    // net amount the curve did not consume
    pub refund: FixedPoint18,
}

impl BuyPreview {
    pub fn shares(&self) -> FixedPoint18 {
        self.quote.shares
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SellPreview {
    pub quote: Quote,
    pub fees: FeeBreakdown,
}

impl SellPreview {
    // what the seller actually receives
    pub fn proceeds(&self) -> FixedPoint18 {
        self.fees.net_amount
    }
}

/// 5.1: spend `gross_spend`, fee included.
pub fn preview_buy(
    state: &CurveState,
    gross_spend: FixedPoint18,
    buyer_sequence_number: u64,
    schedule: &FeeSchedule,
) -> Result<BuyPreview, EngineError> {
    let fees = distribute(gross_spend, true, buyer_sequence_number, schedule)?;
    let shares = shares_for_amount(state, fees.net_amount)?;
    let quote = quote_buy(state, shares)?;
    let refund = fees
        .net_amount
        .checked_sub(quote.amount)
        .ok_or(EngineError::Overflow { operation: "preview_buy" })?;

    debug!(
        gross = %gross_spend,
        shares = %shares,
        cost = %quote.amount,
        refund = %refund,
        "buy previewed"
    );

    Ok(BuyPreview { fees, quote, refund })
}

/// 5.2: sell `shares`, fee taken from the payout.
pub fn preview_sell(
    state: &CurveState,
    shares: FixedPoint18,
    schedule: &FeeSchedule,
) -> Result<SellPreview, EngineError> {
    let quote = quote_sell(state, shares)?;
    // sells never earn the early bonus, the sequence number is irrelevant
    let fees = distribute(quote.amount, false, u64::MAX, schedule)?;

    debug!(
        shares = %shares,
        payout = %quote.amount,
        proceeds = %fees.net_amount,
        "sell previewed"
    );

    Ok(SellPreview { quote, fees })
}

/// 5.3: lowest acceptable output after `slippage`, rounded down.
pub fn min_amount_out(expected: FixedPoint18, slippage: Bps) -> Result<FixedPoint18, EngineError> {
    let keep = Bps::MAX.saturating_sub(slippage.value());
    math::mul_div(expected.wei(), U256::from(keep), U256::from(Bps::MAX), Rounding::Down, "min_amount_out")
        .map(FixedPoint18::from_wei)
}

/// Highest acceptable input after `slippage`, rounded up.
pub fn max_amount_in(expected: FixedPoint18, slippage: Bps) -> Result<FixedPoint18, EngineError> {
    let allow = Bps::MAX as u64 + slippage.value() as u64;
    math::mul_div(expected.wei(), U256::from(allow), U256::from(Bps::MAX), Rounding::Up, "max_amount_in")
        .map(FixedPoint18::from_wei)
}

pub fn check_min_out(min_out: FixedPoint18, actual: FixedPoint18) -> Result<(), EngineError> {
    if actual < min_out {
        return Err(EngineError::SlippageExceeded { limit: min_out, actual });
    }
    Ok(())
}

pub fn check_max_in(max_in: FixedPoint18, actual: FixedPoint18) -> Result<(), EngineError> {
    if actual > max_in {
        return Err(EngineError::SlippageExceeded { limit: max_in, actual });
    }
    Ok(())
}
