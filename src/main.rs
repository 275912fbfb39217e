//! Bonding Curve Simulation.
//!
//! Walks a single pool from launch through early buyers, late buyers,
//! sell-back, LP payouts and a stale quote rejected by slippage limits.
//! Set `RUST_LOG=bonding_core=debug` to see every quote.

use bonding_core::*;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("Bonding Curve Engine Simulation");
    println!("Single Pool, Virtual Liquidity, 1% Fee\n");

    let scenarios: [(&str, fn(&Engine) -> Result<(), EngineError>); 5] = [
        ("Scenario 1: Launch Pricing", scenario_1_launch_pricing),
        ("Scenario 2: Early And Late Buyers", scenario_2_buyer_run),
        ("Scenario 3: Sell Back To The Curve", scenario_3_sell_back),
        ("Scenario 4: LP Payout Split", scenario_4_lp_payouts),
        ("Scenario 5: Stale Quote Slippage", scenario_5_stale_quote),
    ];

    let engine = match Engine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("invalid config: {e}");
            std::process::exit(1);
        }
    };

    for (title, run) in scenarios {
        println!("{title}\n");
        if let Err(e) = run(&engine) {
            eprintln!("  failed: {e}");
            std::process::exit(1);
        }
        println!();
    }

    println!("All simulations completed successfully.");
}

fn empty_pool(engine: &Engine) -> CurveState {
    engine.state(FixedPoint18::ZERO, FixedPoint18::ZERO)
}

/// Price and quotes on a pool nobody has traded yet.
fn scenario_1_launch_pricing(engine: &Engine) -> Result<(), EngineError> {
    let state = empty_pool(engine);
    println!("  Spot price at launch: {}", engine.price(&state)?);

    for shares in [1u64, 10, 100, 1000] {
        let quote = engine.quote_buy(&state, FixedPoint18::from_units(shares))?;
        println!(
            "  Buy {:>5} shares: cost {:>10}, avg {:.6}, impact {:.2}%",
            shares,
            quote.amount,
            quote.price_per_share.to_f64_lossy(),
            quote.impact_percent
        );
    }
    Ok(())
}

/// Fifteen buyers spend 100 each. the first ten earn the early bonus.
fn scenario_2_buyer_run(engine: &Engine) -> Result<(), EngineError> {
    let mut state = empty_pool(engine);
    let spend = FixedPoint18::from_units(100);

    for seq in 0..15u64 {
        let preview = engine.preview_buy(&state, spend, seq)?;
        state = state.after_buy(&preview.quote)?;
        println!(
            "  Buyer {:>2}: {:.4} shares, bonus {}, treasury {}, spot now {:.6}",
            seq,
            preview.shares().to_f64_lossy(),
            preview.fees.early_buyer_bonus,
            preview.fees.treasury_share,
            engine.price(&state)?.to_f64_lossy()
        );
    }

    println!("\n  Reserve {}, supply {}", state.reserve, state.supply);
    println!("  Market cap {}", engine.market_cap(&state)?);
    Ok(())
}

/// Buy then sell the same shares. the curve is whole again, only fees left the pool.
fn scenario_3_sell_back(engine: &Engine) -> Result<(), EngineError> {
    let state = empty_pool(engine);
    let buy = engine.preview_buy(&state, FixedPoint18::from_units(500), 0)?;
    let after_buy = state.after_buy(&buy.quote)?;
    println!("  Spent 500, got {} shares for {}", buy.shares(), buy.quote.amount);

    let sell = engine.preview_sell(&after_buy, buy.shares())?;
    let after_sell = after_buy.after_sell(&sell.quote)?;
    println!("  Sold back for {}, seller receives {}", sell.quote.amount, sell.proceeds());
    println!("  Pool left with reserve {}, supply {}", after_sell.reserve, after_sell.supply);

    let oversell = engine.quote_sell(&after_buy, buy.shares().checked_add(FixedPoint18::ONE).unwrap_or(FixedPoint18::ZERO))?;
    println!("  Selling more than supply quotes {} (neutral)", oversell.amount);
    Ok(())
}

/// The lp share of one trade paid across three providers.
fn scenario_4_lp_payouts(engine: &Engine) -> Result<(), EngineError> {
    let fees = engine.distribute(FixedPoint18::from_units(1000), true, 20)?;
    let providers = [FixedPoint18::from_units(1), FixedPoint18::from_units(1), FixedPoint18::from_units(1)];
    let split = engine.split_lp_pool(&providers, fees.lp_share)?;

    println!("  LP share of fee: {}", fees.lp_share);
    for (i, payout) in split.payouts.iter().enumerate() {
        println!("  Provider {}: {}", i + 1, payout);
    }
    println!("  Undistributed dust: {} wei", split.dust.wei());
    Ok(())
}

/// A quote goes stale when another buyer lands first.
fn scenario_5_stale_quote(engine: &Engine) -> Result<(), EngineError> {
    let state = empty_pool(engine);
    let shares = FixedPoint18::from_units(50);
    let quoted = engine.quote_buy(&state, shares)?;
    let max_in = max_amount_in(quoted.amount, Bps::new(100))?;
    println!("  Quoted {} for 50 shares, max in with 1% slippage: {}", quoted.amount, max_in);

    let front_run = engine.quote_buy(&state, FixedPoint18::from_units(200))?;
    let moved = state.after_buy(&front_run)?;
    let fresh = engine.quote_buy(&moved, shares)?;

    match check_max_in(max_in, fresh.amount) {
        Ok(()) => println!("  Fresh cost {} within limit", fresh.amount),
        Err(e) => println!("  Rejected at settlement: {e}"),
    }
    Ok(())
}
