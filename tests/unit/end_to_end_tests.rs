use options_analytics::prelude::*;
use serde_json::Value;

#[test]
fn test_reference_valuation() {
    let call = greeks(100.0, 100.0, 91, 0.30, 0.05, OptionType::Call).unwrap();
    assert_eq!(call.theoretical_price, 6.57);
    assert_eq!(call.intrinsic_value, 0.0);
    assert_eq!(call.time_value, 6.57);
    assert!((call.delta - 0.563).abs() < 1e-3);
    assert!((call.gamma - 0.0263).abs() < 1e-4);
    assert!((call.vega - 0.197).abs() < 1e-3);
    assert!(call.theta < 0.0);

    let quarter = price(100.0, 100.0, 0.25, 0.05, 0.30, OptionType::Call).unwrap();
    assert!((quarter - 6.5831).abs() < 1e-4);
}

#[test]
fn test_price_then_solve_then_score() {
    let engine = OptionsAnalytics::default();
    let market = engine.market(100.0);
    let params = PricingParams::from_days(100.0, 100.0, 30, 0.05, OptionType::Call);
    let fair = BlackScholes::price(&params, 0.25);

    let contract = OptionContract::new("SPY", OptionType::Call, 100.0, 30)
        .with_expiration("2026-11-18")
        .with_quote(fair - 0.05, fair + 0.05, fair)
        .with_liquidity(1_000, 5_000);

    let iv = engine.implied_volatility(&contract, &market).unwrap();
    assert!(iv.converged);
    assert!((iv.iv - 0.25).abs() < 1e-3);

    let contract = engine.with_solved_iv(&contract, &market);
    let greeks = engine.greeks(&contract, &market).unwrap();
    let result = engine.score(&contract, &greeks, &CriteriaProfile::general());
    assert!(result.qualified);

    let report = engine.scenarios(&contract, &market).unwrap();
    assert_eq!(report.price_shocks.len(), 7);
    assert_eq!(report.time_decay.len(), 7);
    assert_eq!(report.matrix.len(), 20);
}

#[test]
fn test_results_serialize_to_json() {
    let call = greeks(100.0, 100.0, 91, 0.30, 0.05, OptionType::Call).unwrap();
    let json: Value = serde_json::to_value(call).unwrap();
    assert_eq!(json["theoretical_price"], 6.57);
    assert!(json["delta"].is_f64());

    let contract = OptionContract::new("SPY", OptionType::Call, 100.0, 91)
        .with_quote(0.0, 0.0, 0.0)
        .with_implied_volatility(0.3);
    let result = score(&contract, &call, &CriteriaProfile::general());
    let json: Value = serde_json::to_value(&result).unwrap();
    assert_eq!(json["profile"], "general");
    assert_eq!(json["degenerate"], "ZeroMidPrice");
    assert_eq!(json["breakdown"].as_array().unwrap().len(), 9);
}

#[test]
fn test_contract_deserializes_with_defaults() {
    let json = r#"{
        "symbol": "AAPL",
        "option_type": "Put",
        "strike": 180.0,
        "days_to_expiry": 14,
        "bid": 2.1,
        "ask": 2.3
    }"#;
    let contract: OptionContract = serde_json::from_str(json).unwrap();

    assert_eq!(contract.option_type, OptionType::Put);
    assert_eq!(contract.volume, 0);
    assert_eq!(contract.implied_volatility, None);
    assert!(contract.validate().is_ok());
}

#[test]
fn test_engine_config_from_json() {
    let config = EngineConfig::from_json(
        r#"{"pass_threshold": 60.0, "solver": {"tolerance": 1e-6}, "scenario": {"days_forward": 3}}"#,
    )
    .unwrap();
    assert_eq!(config.pass_threshold, 60.0);
    assert_eq!(config.solver.tolerance, 1e-6);
    assert_eq!(config.solver.max_iterations, 100);
    assert_eq!(config.scenario.days_forward, 3);

    let err = EngineConfig::from_json(r#"{"pass_threshold": "high"}"#).unwrap_err();
    assert!(matches!(err, AnalyticsError::InvalidConfig { .. }));
}
