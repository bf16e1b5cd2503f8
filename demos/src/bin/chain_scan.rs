//! Scans synthetic option chains for several underlyings in parallel.
//!
//! This example shows how to:
//! 1. Build quoted option chains without a provided implied volatility
//! 2. Share one `OptionsAnalytics` instance across worker threads with `Arc`
//! 3. Solve implied volatility, score every contract and rank the matches
//! 4. Produce a scenario report for the best candidate of each underlying

use options_analytics::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

/// Underlying used to generate a chain.
struct Underlying {
    symbol: &'static str,
    spot: f64,
    volatility: f64,
    days_to_expiry: u32,
}

#[derive(Serialize)]
struct ScanSummary {
    symbol: String,
    contracts: usize,
    qualified: usize,
    best: Option<ScoredContract>,
    report: Option<ScenarioReport>,
}

static UNDERLYINGS: [Underlying; 3] = [
    Underlying {
        symbol: "SPY",
        spot: 512.0,
        volatility: 0.16,
        days_to_expiry: 21,
    },
    Underlying {
        symbol: "AAPL",
        spot: 188.0,
        volatility: 0.27,
        days_to_expiry: 35,
    },
    Underlying {
        symbol: "TSLA",
        spot: 176.0,
        volatility: 0.58,
        days_to_expiry: 14,
    },
];

/// Quotes every strike within ±15% of spot around the model price, widening
/// the spread and thinning liquidity away from the money.
fn synthetic_chain(underlying: &Underlying, rate: f64) -> Vec<OptionContract> {
    let step = (underlying.spot * 0.025).round().max(1.0);
    let atm = (underlying.spot / step).round() * step;

    (-6..=6)
        .flat_map(|i| {
            let strike = atm + f64::from(i) * step;
            let distance = f64::from(i.unsigned_abs());
            [OptionType::Call, OptionType::Put].map(move |option_type| {
                let params = PricingParams::from_days(
                    underlying.spot,
                    strike,
                    underlying.days_to_expiry,
                    rate,
                    option_type,
                );
                let fair = BlackScholes::price(&params, underlying.volatility);
                let half_spread = (fair * (0.01 + 0.01 * distance)).max(0.01);
                let bid = round_to((fair - half_spread).max(0.0), 2);
                let ask = round_to(fair + half_spread, 2);

                OptionContract::new(
                    underlying.symbol,
                    option_type,
                    strike,
                    underlying.days_to_expiry,
                )
                .with_quote(bid, ask, round_to(fair, 2))
                .with_liquidity(
                    (4_000.0 / (1.0 + distance * distance)) as u64,
                    (20_000.0 / (1.0 + distance)) as u64,
                )
            })
        })
        .collect()
}

fn scan(analytics: &OptionsAnalytics, underlying: &Underlying) -> ScanSummary {
    let market = analytics.market(underlying.spot);
    let chain = synthetic_chain(underlying, market.risk_free_rate);
    let profile = CriteriaProfile::general();

    let found = analytics.scan_chain(&chain, &market, &profile);
    info!(
        "{}: {} of {} contracts qualified for '{}'",
        underlying.symbol,
        found.len(),
        chain.len(),
        profile.name
    );

    let best = found.first().cloned();
    let report = best.as_ref().and_then(|best| {
        match analytics.scenarios(&best.contract, &market) {
            Ok(report) => Some(report),
            Err(err) => {
                warn!("{}: scenario report failed: {}", underlying.symbol, err);
                None
            }
        }
    });

    ScanSummary {
        symbol: underlying.symbol.to_string(),
        contracts: chain.len(),
        qualified: found.len(),
        best,
        report,
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting chain scan example");

    let config = EngineConfig::default()
        .with_risk_free_rate(0.045)
        .with_pass_threshold(75.0);
    let analytics = OptionsAnalytics::new(config)?;

    let analytics = Arc::new(analytics);
    let handles: Vec<_> = UNDERLYINGS
        .iter()
        .map(|underlying| {
            let analytics = Arc::clone(&analytics);
            thread::spawn(move || scan(&analytics, underlying))
        })
        .collect();

    let mut summaries = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.join() {
            Ok(summary) => summaries.push(summary),
            Err(_) => warn!("scan worker panicked"),
        }
    }

    for summary in &summaries {
        if let Some(best) = &summary.best {
            info!(
                "{} best: {:?} {} delta={:.4} iv={:.2}% score={}",
                summary.symbol,
                best.contract.option_type,
                best.contract.strike,
                best.greeks.delta,
                best.contract.implied_volatility.unwrap_or_default() * 100.0,
                best.score.score
            );
        } else {
            warn!("{}: no qualified contracts", summary.symbol);
        }
    }

    println!("{}", serde_json::to_string_pretty(&summaries)?);

    info!("Chain scan example completed");
    Ok(())
}
