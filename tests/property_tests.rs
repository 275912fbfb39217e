//! Property-based tests for the curve and fee math.
//!
//! These tests verify invariants hold under random inputs.

use bonding_core::*;
use proptest::prelude::*;

// Strategies for generating test data
fn amount_strategy() -> impl Strategy<Value = FixedPoint18> {
    // 0.000001 to 1,000,000 tokens
    (1_000_000_000_000u128..1_000_000_000_000_000_000_000_000u128).prop_map(FixedPoint18::from_wei)
}

fn any_amount_strategy() -> impl Strategy<Value = FixedPoint18> {
    (0u128..=u128::MAX).prop_map(FixedPoint18::from_wei)
}

fn shares_strategy() -> impl Strategy<Value = FixedPoint18> {
    // 0.001 to 5,000 shares
    (1_000_000_000_000_000u128..5_000_000_000_000_000_000_000u128).prop_map(FixedPoint18::from_wei)
}

fn wei(n: u128) -> FixedPoint18 {
    FixedPoint18::from_wei(n)
}

// a pool reached by real buys from launch, so reserve always backs supply
fn traded_pool_strategy() -> impl Strategy<Value = CurveState> {
    proptest::collection::vec(shares_strategy(), 0..8).prop_map(|buys| {
        let mut state = CurveParams::default().state(FixedPoint18::ZERO, FixedPoint18::ZERO);
        for shares in buys {
            let quote = quote_buy(&state, shares).unwrap();
            state = state.after_buy(&quote).unwrap();
        }
        state
    })
}

// exact comparison of spot prices a/b > c/d without rounding
fn price_gt(num_a: FixedPoint18, den_a: FixedPoint18, num_b: FixedPoint18, den_b: FixedPoint18) -> bool {
    num_a.wei().full_mul(den_b.wei()) > num_b.wei().full_mul(den_a.wei())
}

fn effective(state: &CurveState) -> (FixedPoint18, FixedPoint18) {
    (
        FixedPoint18::from_wei(state.effective_reserve().unwrap()),
        FixedPoint18::from_wei(state.effective_supply().unwrap()),
    )
}

proptest! {
    /// Fee parts always sum to the fee, and fee plus net to the gross
    #[test]
    fn fee_conservation(
        gross in any_amount_strategy(),
        is_buy in any::<bool>(),
        seq in 0u64..30,
    ) {
        let b = distribute_default(gross, is_buy, seq).unwrap();
        let parts = checked_sum(&[b.creator_share, b.lp_share, b.treasury_share, b.early_buyer_bonus]);
        prop_assert_eq!(parts, Some(b.total_fee));
        prop_assert_eq!(b.net_amount.checked_add(b.total_fee), Some(gross));
    }

    /// Without the bonus, treasury holds its own share plus the bonus share
    #[test]
    fn early_bonus_folds_into_treasury(
        gross in amount_strategy(),
        seq in 10u64..1_000,
        is_buy in any::<bool>(),
    ) {
        let late = distribute_default(gross, is_buy, seq).unwrap();
        let early = distribute_default(gross, true, 0).unwrap();
        let sell = distribute_default(gross, false, 0).unwrap();

        prop_assert!(late.early_buyer_bonus.is_zero());
        prop_assert!(sell.early_buyer_bonus.is_zero());
        prop_assert_eq!(
            Some(late.treasury_share),
            early.treasury_share.checked_add(early.early_buyer_bonus)
        );
        prop_assert_eq!(late.creator_share, early.creator_share);
        prop_assert_eq!(late.lp_share, early.lp_share);
        prop_assert_eq!(sell, late);
    }

    /// Buying more never costs less
    #[test]
    fn buy_cost_monotonic(
        state in traded_pool_strategy(),
        a in shares_strategy(),
        b in shares_strategy(),
    ) {
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let cost_small = quote_buy(&state, small).unwrap().amount;
        let cost_large = quote_buy(&state, large).unwrap().amount;
        prop_assert!(cost_small <= cost_large);
    }

    /// A settled buy strictly raises spot price, and costs more than nothing
    #[test]
    fn buy_raises_price(state in traded_pool_strategy(), shares in shares_strategy()) {
        let quote = quote_buy(&state, shares).unwrap();
        prop_assert!(!quote.amount.is_zero());
        prop_assert!(quote.impact_percent > 0.0);

        let after = state.after_buy(&quote).unwrap();
        let (r0, s0) = effective(&state);
        let (r1, s1) = effective(&after);
        prop_assert!(price_gt(r1, s1, r0, s0), "spot did not rise");
        prop_assert!(quote.spot_price_after >= quote.spot_price_before);
    }

    /// Selling more never pays less, and a sale strictly lowers spot price
    #[test]
    fn sell_monotonic_and_lowers_price(
        state in traded_pool_strategy(),
        frac_a in 1u32..=1_000,
        frac_b in 1u32..=1_000,
    ) {
        prop_assume!(state.supply > FixedPoint18::from_units(1));
        let portion = |f: u32| state
            .supply
            .checked_mul_div(wei(f as u128), wei(1_000))
            .unwrap();
        let (small, large) = if frac_a <= frac_b { (portion(frac_a), portion(frac_b)) } else { (portion(frac_b), portion(frac_a)) };

        let q_small = quote_sell(&state, small).unwrap();
        let q_large = quote_sell(&state, large).unwrap();
        prop_assert!(q_small.amount <= q_large.amount);
        prop_assert!(!q_small.amount.is_zero());

        let after = state.after_sell(&q_large).unwrap();
        let (r0, s0) = effective(&state);
        let (r1, s1) = effective(&after);
        prop_assert!(price_gt(r0, s0, r1, s1), "spot did not fall");
        prop_assert!(q_large.impact_percent < 0.0);
    }

    /// Selling the whole supply never pays out more than the real reserve
    #[test]
    fn full_sell_is_backed(state in traded_pool_strategy()) {
        let quote = quote_sell(&state, state.supply).unwrap();
        prop_assert!(quote.amount <= state.reserve);
        let after = state.after_sell(&quote).unwrap();
        prop_assert!(after.supply.is_zero());
    }

    /// Shares for an amount cost at most that amount, and one more wei of shares costs more
    #[test]
    fn shares_for_amount_is_tight(state in traded_pool_strategy(), spend in amount_strategy()) {
        let shares = shares_for_amount(&state, spend).unwrap();
        let cost = quote_buy(&state, shares).unwrap().amount;
        prop_assert!(cost <= spend);

        let one_more = shares.checked_add(wei(1)).unwrap();
        prop_assert!(quote_buy(&state, one_more).unwrap().amount > spend);
    }

    /// Identical inputs give identical outputs
    #[test]
    fn quotes_are_deterministic(state in traded_pool_strategy(), shares in shares_strategy()) {
        let a = quote_buy(&state, shares).unwrap();
        let b = quote_buy(&state, shares).unwrap();
        prop_assert_eq!(a.amount, b.amount);
        prop_assert_eq!(a.price_per_share, b.price_per_share);
        prop_assert_eq!(a.impact_percent.to_bits(), b.impact_percent.to_bits());

        let s1 = quote_sell(&state, state.supply).unwrap();
        let s2 = quote_sell(&state, state.supply).unwrap();
        prop_assert_eq!(s1.impact_percent.to_bits(), s2.impact_percent.to_bits());
        prop_assert_eq!(s1, s2);

        prop_assert_eq!(
            distribute_default(shares, true, 3).unwrap(),
            distribute_default(shares, true, 3).unwrap()
        );
    }

    /// Formatting and parsing are inverses
    #[test]
    fn format_parse_round_trip(amount in any_amount_strategy()) {
        let text = amount.to_string();
        let parsed: FixedPoint18 = text.parse().unwrap();
        prop_assert_eq!(parsed, amount);
        prop_assert_eq!(parsed.to_string(), text);
    }

    /// Pro-rata LP payouts plus dust equal the pool exactly
    #[test]
    fn lp_split_conserves_pool(
        shares in proptest::collection::vec(any_amount_strategy(), 0..12),
        pool in amount_strategy(),
    ) {
        let split = split_lp_pool(&shares, pool).unwrap();
        prop_assert_eq!(split.payouts.len(), shares.len());
        let paid = checked_sum(&split.payouts).unwrap();
        prop_assert_eq!(paid.checked_add(split.dust), Some(pool));
    }
}
