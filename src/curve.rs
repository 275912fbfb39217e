//! Bonding-curve pricing with virtual liquidity.
//!
//! A pool is priced from its effective balances `R = reserve + virtual_reserve`
//! and `S = supply + virtual_supply`; spot price is `R / S`. Trades move the
//! pool along the curve that keeps `R / S²` fixed, so spot price grows
//! linearly with supply: a buy of `Δ` shares lifts the effective reserve to
//! `R' = R · (S + Δ)² / S²` and a sell lowers it to `R · (S - Δ)² / S²`.
//!
//! Holding the plain product `R · S` fixed instead would lower the reserve
//! as supply grows, i.e. a buy would pay the buyer. The direction here is
//! pinned by the monotonic pricing tests.
//!
//! Marginal cost is the derivative of `R · S'² / S²`, i.e. `2 · R / S`, so a
//! tiny buy executes at about twice [`price`]. Show `price_per_share` from the
//! quote as the execution price, never the spot.
//!
//! Costs round up and payouts round down, so rounding always favours the pool.
//! Everything is integer math in 512 bits; only `impact_percent` is a float.

use primitive_types::{U256, U512};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::EngineError;
use crate::math::{self, Rounding};
use crate::types::{FixedPoint18, WAD};

/// Price floor (0.001) for a zero effective supply. positive virtuals keep real pools above it.
pub const MIN_PRICE: FixedPoint18 = FixedPoint18::from_wei_u64(1_000_000_000_000_000);

// 3.0: one immutable snapshot of a pool. built per call, never persisted here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveState {
    pub reserve: FixedPoint18,
    pub supply: FixedPoint18,
    pub virtual_reserve: FixedPoint18,
    pub virtual_supply: FixedPoint18,
}

impl CurveState {
    pub fn new(
        reserve: FixedPoint18,
        supply: FixedPoint18,
        virtual_reserve: FixedPoint18,
        virtual_supply: FixedPoint18,
    ) -> Result<Self, EngineError> {
        if virtual_reserve.is_zero() || virtual_supply.is_zero() {
            return Err(EngineError::ZeroVirtualLiquidity);
        }
        Ok(Self {
            reserve,
            supply,
            virtual_reserve,
            virtual_supply,
        })
    }

    /// Virtuals must be positive however the state was built (`new`, a literal or serde).
    fn check_virtuals(&self) -> Result<(), EngineError> {
        if self.virtual_reserve.is_zero() || self.virtual_supply.is_zero() {
            return Err(EngineError::ZeroVirtualLiquidity);
        }
        Ok(())
    }

    pub fn effective_reserve(&self) -> Result<U256, EngineError> {
        self.check_virtuals()?;
        self.reserve
            .wei()
            .checked_add(self.virtual_reserve.wei())
            .ok_or(EngineError::Overflow { operation: "effective_reserve" })
    }

    pub fn effective_supply(&self) -> Result<U256, EngineError> {
        self.check_virtuals()?;
        self.supply
            .wei()
            .checked_add(self.virtual_supply.wei())
            .ok_or(EngineError::Overflow { operation: "effective_supply" })
    }

    /// Ledger view after a buy quote settles: reserve gains the cost, supply gains the shares.
    pub fn after_buy(&self, quote: &Quote) -> Result<Self, EngineError> {
        let overflow = EngineError::Overflow { operation: "after_buy" };
        Ok(Self {
            reserve: self.reserve.checked_add(quote.amount).ok_or(overflow.clone())?,
            supply: self.supply.checked_add(quote.shares).ok_or(overflow)?,
            ..*self
        })
    }

    /// Ledger view after a sell quote settles.
    pub fn after_sell(&self, quote: &Quote) -> Result<Self, EngineError> {
        let underflow = EngineError::Overflow { operation: "after_sell" };
        Ok(Self {
            reserve: self.reserve.checked_sub(quote.amount).ok_or(underflow.clone())?,
            supply: self.supply.checked_sub(quote.shares).ok_or(underflow)?,
            ..*self
        })
    }
}

// 3.1: a priced trade. amount is the cost of a buy or the payout of a sell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub amount: FixedPoint18,
    pub shares: FixedPoint18,
    pub price_per_share: FixedPoint18,
    // display only
    pub impact_percent: f64,
    pub spot_price_before: FixedPoint18,
    pub spot_price_after: FixedPoint18,
}

impl Quote {
    /// Zero trade at the current spot price. returned for every rejected input.
    pub fn neutral(spot: FixedPoint18) -> Self {
        Self {
            amount: FixedPoint18::ZERO,
            shares: FixedPoint18::ZERO,
            price_per_share: spot,
            impact_percent: 0.0,
            spot_price_before: spot,
            spot_price_after: spot,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.shares.is_zero()
    }
}

fn spot(reserve: U256, supply: U256) -> Result<FixedPoint18, EngineError> {
    if supply.is_zero() {
        warn!("effective supply is zero, using price floor");
        return Ok(MIN_PRICE);
    }
    math::mul_div_floor(reserve, U256::from(WAD), supply, "price").map(FixedPoint18::from_wei)
}

/// Spot price `R * 10^18 / S`.
pub fn price(state: &CurveState) -> Result<FixedPoint18, EngineError> {
    spot(state.effective_reserve()?, state.effective_supply()?)
}

/// Market value of the real supply at spot.
pub fn market_cap(state: &CurveState) -> Result<FixedPoint18, EngineError> {
    let p = price(state)?;
    math::mul_div_floor(p.wei(), state.supply.wei(), U256::from(WAD), "market_cap")
        .map(FixedPoint18::from_wei)
}

// R * S'^2 / S^2, the effective reserve once the effective supply reaches s_new
fn reserve_at(reserve: U256, supply: U256, s_new: U256, rounding: Rounding) -> Result<U256, EngineError> {
    let numerator = U512::from(reserve)
        .checked_mul(s_new.full_mul(s_new))
        .ok_or(EngineError::Overflow { operation: "reserve_at" })?;
    let denominator = supply.full_mul(supply);
    let r_new = math::div_rounded(numerator, denominator, rounding, "reserve_at")?;
    math::narrow(r_new, "reserve_at")
}

fn per_share(amount: U256, shares: U256) -> Result<FixedPoint18, EngineError> {
    math::mul_div_floor(amount, U256::from(WAD), shares, "price_per_share").map(FixedPoint18::from_wei)
}

/// Cost of buying `desired_shares`.
pub fn quote_buy(state: &CurveState, desired_shares: FixedPoint18) -> Result<Quote, EngineError> {
    let r = state.effective_reserve()?;
    let s = state.effective_supply()?;
    let spot_before = spot(r, s)?;

    if desired_shares.is_zero() || s.is_zero() {
        return Ok(Quote::neutral(spot_before));
    }

    let shares = desired_shares.wei();
    let s_new = s
        .checked_add(shares)
        .ok_or(EngineError::Overflow { operation: "quote_buy" })?;
    let r_new = reserve_at(r, s, s_new, Rounding::Up)?;
    // s_new > s, so r_new > r whenever r > 0
    let cost = r_new - r;

    let quote = Quote {
        amount: FixedPoint18::from_wei(cost),
        shares: desired_shares,
        price_per_share: per_share(cost, shares)?,
        impact_percent: math::percent_change(r_new, s_new, r, s),
        spot_price_before: spot_before,
        spot_price_after: spot(r_new, s_new)?,
    };

    debug!(
        shares = %desired_shares,
        cost = %quote.amount,
        impact_pct = quote.impact_percent,
        "buy quoted"
    );

    Ok(quote)
}

/// Payout for selling `shares_to_sell`. neutral when selling more than the real supply.
pub fn quote_sell(state: &CurveState, shares_to_sell: FixedPoint18) -> Result<Quote, EngineError> {
    let r = state.effective_reserve()?;
    let s = state.effective_supply()?;
    let spot_before = spot(r, s)?;

    if shares_to_sell.is_zero() || s.is_zero() {
        return Ok(Quote::neutral(spot_before));
    }
    if shares_to_sell > state.supply {
        debug!(
            shares = %shares_to_sell,
            supply = %state.supply,
            "sell exceeds supply, returning neutral quote"
        );
        return Ok(Quote::neutral(spot_before));
    }

    let shares = shares_to_sell.wei();
    // shares <= supply, so s_new >= virtual_supply > 0
    let s_new = s - shares;
    let r_floor = reserve_at(r, s, s_new, Rounding::Up)?;
    // never pay out virtual liquidity
    let payout = (r - r_floor).min(state.reserve.wei());
    let r_after = r - payout;

    let quote = Quote {
        amount: FixedPoint18::from_wei(payout),
        shares: shares_to_sell,
        price_per_share: per_share(payout, shares)?,
        impact_percent: math::percent_change(r_after, s_new, r, s),
        spot_price_before: spot_before,
        spot_price_after: spot(r_after, s_new)?,
    };

    debug!(
        shares = %shares_to_sell,
        payout = %quote.amount,
        impact_pct = quote.impact_percent,
        "sell quoted"
    );

    Ok(quote)
}

/// Largest share count whose buy cost does not exceed `gross_amount`.
pub fn shares_for_amount(state: &CurveState, gross_amount: FixedPoint18) -> Result<FixedPoint18, EngineError> {
    let r = state.effective_reserve()?;
    let s = state.effective_supply()?;
    if gross_amount.is_zero() || r.is_zero() || s.is_zero() {
        return Ok(FixedPoint18::ZERO);
    }

    let target = r
        .checked_add(gross_amount.wei())
        .ok_or(EngineError::Overflow { operation: "shares_for_amount" })?;

    // S'^2 <= S^2 * (R + A) / R  <=>  cost(S' - S) <= A
    let scaled = s
        .full_mul(s)
        .checked_mul(U512::from(target))
        .ok_or(EngineError::Overflow { operation: "shares_for_amount" })?;
    let radicand = math::div_rounded(scaled, U512::from(r), Rounding::Down, "shares_for_amount")?;
    let s_new = math::narrow(math::isqrt(radicand), "shares_for_amount")?;

    Ok(FixedPoint18::from_wei(s_new.saturating_sub(s)))
}
