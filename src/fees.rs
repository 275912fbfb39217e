//! Protocol fee split.
//!
//! The fee is a flat share of the gross trade amount. It is divided between
//! the pool creator, liquidity providers, the treasury and, for the first
//! buyers of a pool, an early buyer bonus. Treasury takes whatever the other
//! shares leave, so integer division never loses a wei: the parts always sum
//! to the fee and the fee plus the net always sum to the gross.

use primitive_types::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeeSchedule;
use crate::engine::EngineError;
use crate::math;
use crate::types::{checked_sum, Bps, FixedPoint18};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub gross_amount: FixedPoint18,
    pub total_fee: FixedPoint18,
    pub creator_share: FixedPoint18,
    pub lp_share: FixedPoint18,
    pub treasury_share: FixedPoint18,
    pub early_buyer_bonus: FixedPoint18,
    pub net_amount: FixedPoint18,
    // fee rate in bps of the gross; shares below in whole percents of the fee
    pub fee_bps: u32,
    pub creator_pct: u32,
    pub lp_pct: u32,
    pub treasury_pct: u32,
    pub early_bonus_pct: u32,
    pub early_bonus_eligible: bool,
}

impl FeeBreakdown {
    pub fn bonus_applied(&self) -> bool {
        self.early_bonus_eligible
    }
}

fn bps_of(amount: FixedPoint18, bps: u32) -> Result<FixedPoint18, EngineError> {
    math::mul_div_floor(amount.wei(), U256::from(bps), U256::from(Bps::MAX), "bps_of")
        .map(FixedPoint18::from_wei)
}

pub fn early_bonus_applies(is_buy: bool, buyer_sequence_number: u64, schedule: &FeeSchedule) -> bool {
    is_buy && buyer_sequence_number < schedule.early_buyer_limit
}

/// Split the protocol fee on `gross_amount`.
///
/// `buyer_sequence_number` is the zero-based count of buyers the pool had
/// before this one, as tracked by the caller.
pub fn distribute(
    gross_amount: FixedPoint18,
    is_buy: bool,
    buyer_sequence_number: u64,
    schedule: &FeeSchedule,
) -> Result<FeeBreakdown, EngineError> {
    schedule.validate()?;

    let fee_rate = schedule.fee_rate();
    let total_fee = bps_of(gross_amount, fee_rate.value())?;
    let net_amount = gross_amount.saturating_sub(total_fee);

    let with_bonus = early_bonus_applies(is_buy, buyer_sequence_number, schedule);
    let creator_share = bps_of(total_fee, schedule.creator_bps)?;
    let lp_share = bps_of(total_fee, schedule.lp_bps)?;
    let early_buyer_bonus = if with_bonus {
        bps_of(total_fee, schedule.early_bonus_bps)?
    } else {
        FixedPoint18::ZERO
    };
    // remainder, including the folded bonus and any rounding dust
    let treasury_share = total_fee
        .saturating_sub(creator_share)
        .saturating_sub(lp_share)
        .saturating_sub(early_buyer_bonus);

    let (treasury_bps, bonus_bps) = if with_bonus {
        (schedule.treasury_bps, schedule.early_bonus_bps)
    } else {
        (schedule.treasury_bps + schedule.early_bonus_bps, 0)
    };

    let breakdown = FeeBreakdown {
        gross_amount,
        total_fee,
        creator_share,
        lp_share,
        treasury_share,
        early_buyer_bonus,
        net_amount,
        fee_bps: fee_rate.value(),
        creator_pct: schedule.creator_bps / 100,
        lp_pct: schedule.lp_bps / 100,
        treasury_pct: treasury_bps / 100,
        early_bonus_pct: bonus_bps / 100,
        early_bonus_eligible: with_bonus,
    };

    debug!(
        gross = %gross_amount,
        fee = %total_fee,
        rate = %fee_rate,
        is_buy,
        buyer_sequence_number,
        bonus = with_bonus,
        "fee distributed"
    );

    Ok(breakdown)
}

/// [`distribute`] with the default 1% schedule.
pub fn distribute_default(
    gross_amount: FixedPoint18,
    is_buy: bool,
    buyer_sequence_number: u64,
) -> Result<FeeBreakdown, EngineError> {
    distribute(gross_amount, is_buy, buyer_sequence_number, &FeeSchedule::default())
}

/// `user_shares * lp_pool / total_shares`, zero when nobody holds LP shares.
pub fn lp_proportional_share(
    user_shares: FixedPoint18,
    total_shares: FixedPoint18,
    lp_pool: FixedPoint18,
) -> Result<FixedPoint18, EngineError> {
    if total_shares.is_zero() {
        return Ok(FixedPoint18::ZERO);
    }
    math::mul_div_floor(user_shares.wei(), lp_pool.wei(), total_shares.wei(), "lp_proportional_share")
        .map(FixedPoint18::from_wei)
}

// 4.3: one lp_share paid out across every provider. dust is what flooring left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LpSplit {
    pub payouts: Vec<FixedPoint18>,
    pub dust: FixedPoint18,
}

/// Pro-rata payouts of `lp_pool`, one per entry of `provider_shares`, in order.
pub fn split_lp_pool(provider_shares: &[FixedPoint18], lp_pool: FixedPoint18) -> Result<LpSplit, EngineError> {
    let total = checked_sum(provider_shares).ok_or(EngineError::Overflow { operation: "split_lp_pool" })?;

    let payouts = provider_shares
        .iter()
        .map(|shares| lp_proportional_share(*shares, total, lp_pool))
        .collect::<Result<Vec<_>, _>>()?;

    let paid = checked_sum(&payouts).ok_or(EngineError::Overflow { operation: "split_lp_pool" })?;
    // each payout is floored, so the sum never exceeds the pool
    let dust = lp_pool.saturating_sub(paid);

    Ok(LpSplit { payouts, dust })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: u64) -> FixedPoint18 {
        FixedPoint18::from_units(n)
    }

    fn assert_conserved(b: &FeeBreakdown) {
        let parts = checked_sum(&[b.creator_share, b.lp_share, b.treasury_share, b.early_buyer_bonus]);
        assert_eq!(parts, Some(b.total_fee));
        assert_eq!(b.net_amount.checked_add(b.total_fee), Some(b.gross_amount));
    }

    #[test]
    fn early_buyer_split() {
        let b = distribute_default(units(1000), true, 0).unwrap();
        assert_eq!(b.total_fee, units(10));
        assert_eq!(b.creator_share, units(4));
        assert_eq!(b.lp_share, units(3));
        assert_eq!(b.treasury_share, units(2));
        assert_eq!(b.early_buyer_bonus, units(1));
        assert_eq!(b.net_amount, units(990));
        assert!(b.bonus_applied());
        assert_eq!((b.creator_pct, b.lp_pct, b.treasury_pct, b.early_bonus_pct), (40, 30, 20, 10));
        assert_conserved(&b);
    }

    #[test]
    fn late_buyer_folds_bonus_into_treasury() {
        let b = distribute_default(units(1000), true, 15).unwrap();
        assert_eq!(b.early_buyer_bonus, FixedPoint18::ZERO);
        assert_eq!(b.treasury_share, units(3));
        assert_eq!(b.creator_share, units(4));
        assert_eq!(b.lp_share, units(3));
        assert_eq!(b.net_amount, units(990));
        assert_eq!((b.treasury_pct, b.early_bonus_pct), (30, 0));
        assert_conserved(&b);
    }

    #[test]
    fn tenth_buyer_misses_bonus() {
        assert!(distribute_default(units(1), true, 9).unwrap().bonus_applied());
        assert!(!distribute_default(units(1), true, 10).unwrap().bonus_applied());
    }

    #[test]
    fn sells_never_earn_bonus() {
        let b = distribute_default(units(1000), false, 0).unwrap();
        assert!(b.early_buyer_bonus.is_zero());
        assert_eq!(b.treasury_share, units(3));
        assert_conserved(&b);
    }

    #[test]
    fn rounding_dust_goes_to_treasury() {
        // fee of 1_234 wei: creator 493, lp 370, bonus 123, treasury 248 (246 + 2 dust)
        let b = distribute_default(FixedPoint18::from_wei(123_456u64), true, 0).unwrap();
        assert_eq!(b.total_fee, FixedPoint18::from_wei(1_234u64));
        assert_eq!(b.creator_share, FixedPoint18::from_wei(493u64));
        assert_eq!(b.lp_share, FixedPoint18::from_wei(370u64));
        assert_eq!(b.early_buyer_bonus, FixedPoint18::from_wei(123u64));
        assert_eq!(b.treasury_share, FixedPoint18::from_wei(248u64));
        assert_conserved(&b);
    }

    #[test]
    fn tiny_amounts_have_no_fee() {
        let b = distribute_default(FixedPoint18::from_wei(99u64), true, 0).unwrap();
        assert!(b.total_fee.is_zero());
        assert_eq!(b.net_amount, FixedPoint18::from_wei(99u64));
        assert_conserved(&b);
    }

    #[test]
    fn fee_follows_schedule_rate() {
        let schedule = FeeSchedule {
            fee_bps: 250,
            ..FeeSchedule::default()
        };
        let b = distribute(units(1000), true, 20, &schedule).unwrap();
        assert_eq!(b.fee_bps, schedule.fee_rate().value());
        assert_eq!(b.total_fee, units(25));
        assert_eq!(b.creator_share, units(10));
        assert_conserved(&b);

        let free = FeeSchedule {
            fee_bps: 0,
            ..FeeSchedule::default()
        };
        let b = distribute(units(1000), true, 0, &free).unwrap();
        assert!(b.total_fee.is_zero());
        assert_eq!(b.net_amount, units(1000));
    }

    #[test]
    fn invalid_schedule_rejected() {
        let mut schedule = FeeSchedule::default();
        schedule.lp_bps = 5_000;
        let err = distribute(units(1), true, 0, &schedule).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn lp_share_pro_rata() {
        let share = lp_proportional_share(units(25), units(100), units(3)).unwrap();
        assert_eq!(share, FixedPoint18::from_wei(750_000_000_000_000_000u64));
        assert!(lp_proportional_share(units(25), FixedPoint18::ZERO, units(3)).unwrap().is_zero());
    }

    #[test]
    fn lp_split_conserves_pool() {
        let shares = [FixedPoint18::from_wei(1u64); 3];
        let split = split_lp_pool(&shares, FixedPoint18::from_wei(10u64)).unwrap();
        assert_eq!(split.payouts, vec![FixedPoint18::from_wei(3u64); 3]);
        assert_eq!(split.dust, FixedPoint18::from_wei(1u64));
    }

    #[test]
    fn lp_split_without_providers_keeps_pool_as_dust() {
        let split = split_lp_pool(&[], units(3)).unwrap();
        assert!(split.payouts.is_empty());
        assert_eq!(split.dust, units(3));

        let split = split_lp_pool(&[FixedPoint18::ZERO], units(3)).unwrap();
        assert_eq!(split.payouts, vec![FixedPoint18::ZERO]);
        assert_eq!(split.dust, units(3));
    }
}
