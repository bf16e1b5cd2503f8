use options_analytics::analytics::DEFAULT_PRICE_SHOCKS;
use options_analytics::prelude::*;

fn engine(option_type: OptionType, strike: f64, days: u32) -> ScenarioEngine {
    let contract = OptionContract::new("SPY", option_type, strike, days)
        .with_quote(2.0, 2.1, 2.05)
        .with_implied_volatility(0.3);
    ScenarioEngine::new(&contract, &MarketContext::new(100.0)).unwrap()
}

#[test]
fn test_zero_shock_reproduces_base() {
    for option_type in [OptionType::Call, OptionType::Put] {
        for strike in [90.0, 100.0, 110.0] {
            let engine = engine(option_type, strike, 45);
            let flat = engine.price_shock(0.0).unwrap();

            assert_eq!(flat.price, engine.base().theoretical_price);
            assert_eq!(flat.profit_loss, 0.0);
            assert_eq!(flat.profit_loss_pct, 0.0);
            assert_eq!(flat.greeks, *engine.base());
            assert_eq!(flat.greeks_change, GreeksChange::default());
        }
    }
}

#[test]
fn test_matrix_edges_match_single_axis_scenarios() {
    let engine = engine(OptionType::Call, 100.0, 30);
    let config = ScenarioConfig::default();
    let matrix = engine
        .combined_matrix(&config.matrix_price_changes, &config.matrix_day_offsets)
        .unwrap();
    assert_eq!(
        matrix.len(),
        config.matrix_price_changes.len() * config.matrix_day_offsets.len()
    );

    for cell in matrix.iter().filter(|cell| cell.days_elapsed == 0) {
        let shock = engine.price_shock(cell.price_change_pct).unwrap();
        assert_eq!(cell.price, shock.price);
        assert_eq!(cell.profit_loss, shock.profit_loss);
    }

    let decay = engine.time_decay(7);
    for cell in matrix
        .iter()
        .filter(|cell| cell.price_change_pct == 0.0 && cell.days_elapsed > 0)
    {
        let step = decay
            .iter()
            .find(|point| point.day == cell.days_elapsed)
            .unwrap();
        assert_eq!(cell.price, step.price);
    }
}

#[test]
fn test_profit_loss_follows_option_direction() {
    let call = engine(OptionType::Call, 100.0, 30)
        .price_shock_grid(&DEFAULT_PRICE_SHOCKS)
        .unwrap();
    let put = engine(OptionType::Put, 100.0, 30)
        .price_shock_grid(&DEFAULT_PRICE_SHOCKS)
        .unwrap();

    assert!(call.windows(2).all(|w| w[0].profit_loss <= w[1].profit_loss));
    assert!(put.windows(2).all(|w| w[0].profit_loss >= w[1].profit_loss));
    assert!(call[0].profit_loss < 0.0 && call[6].profit_loss > 0.0);
    assert!(put[0].profit_loss > 0.0 && put[6].profit_loss < 0.0);
}

#[test]
fn test_time_decay_erodes_value() {
    let engine = engine(OptionType::Call, 100.0, 30);
    let decay = engine.time_decay(7);

    assert_eq!(decay.len(), 7);
    assert_eq!(decay[0].day, 1);
    assert_eq!(decay[6].days_remaining, 23);
    assert!(decay.windows(2).all(|w| w[1].price <= w[0].price));
    assert!(decay.iter().all(|point| point.value_change <= 0.0));
    assert!(decay.iter().all(|point| point.theta_decay < 0.0));
}

#[test]
fn test_time_decay_stops_before_expiry() {
    assert_eq!(engine(OptionType::Call, 100.0, 4).time_decay(7).len(), 3);
    assert!(engine(OptionType::Call, 100.0, 1).time_decay(7).is_empty());
}

#[test]
fn test_matrix_past_expiry_uses_intrinsic() {
    let engine = engine(OptionType::Put, 100.0, 3);
    let matrix = engine.combined_matrix(&[-5.0, 5.0], &[7]).unwrap();

    assert_eq!(matrix[0].days_remaining, 0);
    assert!((matrix[0].price - 5.0).abs() < 1e-9);
    assert_eq!(matrix[1].price, 0.0);
}

#[test]
fn test_report_risk_metrics() {
    let engine = engine(OptionType::Call, 100.0, 30);
    let report = engine.report(&ScenarioConfig::default()).unwrap();
    let metrics = report.risk_metrics.unwrap();

    assert_eq!(report.symbol, "SPY");
    assert_eq!(report.volatility, 0.3);
    assert_eq!(metrics.max_profit, report.price_shocks[6].profit_loss);
    assert_eq!(metrics.max_loss, report.price_shocks[0].profit_loss);
    assert_eq!(metrics.breakeven_price_change_pct, 0.0);
    assert!(metrics.risk_reward_ratio.unwrap() > 1.0);
}

#[test]
fn test_invalid_shock_is_rejected() {
    let engine = engine(OptionType::Call, 100.0, 30);
    assert!(matches!(
        engine.price_shock(-100.0),
        Err(AnalyticsError::InvalidInput { .. })
    ));
    assert!(engine.price_shock_grid(&[0.0, f64::NAN]).is_err());
}

#[test]
fn test_missing_volatility() {
    let contract = OptionContract::new("QQQ", OptionType::Call, 100.0, 30);
    let err = ScenarioEngine::new(&contract, &MarketContext::new(100.0)).unwrap_err();
    assert!(matches!(err, AnalyticsError::MissingVolatility { ref symbol } if symbol == "QQQ"));
}
