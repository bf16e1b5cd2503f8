use options_analytics::prelude::*;

fn atm_call() -> (OptionContract, GreeksResult) {
    let contract = OptionContract::new("SPY", OptionType::Call, 100.0, 30)
        .with_quote(3.00, 3.10, 3.05)
        .with_liquidity(100, 500)
        .with_implied_volatility(0.25);
    let greeks = greeks(100.0, 100.0, 30, 0.25, 0.05, OptionType::Call).unwrap();
    (contract, greeks)
}

fn loosened(profile: &CriteriaProfile) -> CriteriaProfile {
    profile
        .clone()
        .with_delta_range(0.0, 1.0)
        .with_min_gamma(0.0)
        .with_max_theta(-100.0)
        .with_min_vega(0.0)
        .with_min_volume(0)
        .with_min_open_interest(0)
        .with_max_spread_pct(1_000.0)
        .with_price_range(0.0, 10_000.0)
        .with_iv_range(0.0, 10.0)
}

#[test]
fn test_general_profile_accepts_liquid_atm_call() {
    let (contract, greeks) = atm_call();
    let result = score(&contract, &greeks, &CriteriaProfile::general());

    assert_eq!(result.total, 9);
    assert_eq!(result.passed, 9);
    assert_eq!(result.score, 100.0);
    assert!(result.qualified);
    assert_eq!(result.failed().count(), 0);
    assert_eq!(result.degenerate, None);
}

#[test]
fn test_scalping_profile_rejects_thin_contract() {
    let (contract, greeks) = atm_call();
    let result = score(&contract, &greeks, &CriteriaProfile::scalping());

    let failed: Vec<Criterion> = result.failed().collect();
    assert_eq!(failed, vec![Criterion::Volume, Criterion::OpenInterest]);
    assert_eq!(result.passed, 7);
    assert_eq!(result.score, 77.78);
    assert!(!result.qualified);
}

#[test]
fn test_loosening_thresholds_never_lowers_the_score() {
    let candidates = [
        atm_call(),
        (
            OptionContract::new("SPY", OptionType::Put, 80.0, 10)
                .with_quote(0.01, 0.05, 0.02)
                .with_liquidity(3, 10),
            greeks(100.0, 80.0, 10, 0.4, 0.05, OptionType::Put).unwrap(),
        ),
        (
            OptionContract::new("SPY", OptionType::Call, 60.0, 200).with_quote(41.0, 42.0, 41.5),
            greeks(100.0, 60.0, 200, 0.2, 0.05, OptionType::Call).unwrap(),
        ),
    ];

    for profile in [CriteriaProfile::general(), CriteriaProfile::scalping()] {
        let relaxed = loosened(&profile);
        for (contract, greeks) in &candidates {
            let strict = score(contract, greeks, &profile);
            let loose = score(contract, greeks, &relaxed);
            assert_eq!(strict.total, loose.total);
            assert!(loose.score >= strict.score);
            assert!(loose.passed >= strict.passed);
        }
    }
}

#[test]
fn test_threshold_is_inclusive() {
    let (contract, greeks) = atm_call();
    let profile = CriteriaProfile::empty("four-of-five")
        .with_delta_range(0.4, 0.6)
        .with_min_gamma(0.01)
        .with_min_vega(0.05)
        .with_min_volume(50)
        .with_min_open_interest(1_000_000);

    let result = score(&contract, &greeks, &profile);
    assert_eq!(result.score, 80.0);
    assert!(result.qualified);

    let strict = score_with_threshold(&contract, &greeks, &profile, 80.01);
    assert!(!strict.qualified);
}

#[test]
fn test_zero_mid_price_is_degenerate() {
    let (contract, greeks) = atm_call();
    let contract = contract.with_quote(0.0, 0.0, 0.0);
    let result = score(&contract, &greeks, &CriteriaProfile::general());

    assert_eq!(result.degenerate, Some(Degeneracy::ZeroMidPrice));
    assert_eq!(result.score, 0.0);
    assert!(!result.qualified);
    let spread = result.check(Criterion::Spread).unwrap();
    assert!(!spread.passed);
    assert_eq!(spread.actual, None);
    assert!(!result.check(Criterion::Price).unwrap().passed);
}

#[test]
fn test_zero_mid_price_cannot_qualify_with_open_price_range() {
    let (contract, greeks) = atm_call();
    let contract = contract.with_quote(0.0, 0.0, 0.0);
    let profile = CriteriaProfile::general().with_price_range(0.0, 50.0);
    let result = score(&contract, &greeks, &profile);

    assert_eq!(result.passed, 7);
    assert_eq!(result.score, 0.0);
    assert!(!result.qualified);
    assert!(!result.check(Criterion::Price).unwrap().passed);
}

#[test]
fn test_empty_profile_scores_zero() {
    let (contract, greeks) = atm_call();
    let result = score(&contract, &greeks, &CriteriaProfile::empty("nothing"));

    assert_eq!(result.total, 0);
    assert_eq!(result.score, 0.0);
    assert!(!result.qualified);
    assert_eq!(result.degenerate, Some(Degeneracy::EmptyProfile));
}

#[test]
fn test_missing_iv_fails_iv_criterion() {
    let (mut contract, greeks) = atm_call();
    contract.implied_volatility = None;
    let result = score(&contract, &greeks, &CriteriaProfile::general());

    let iv = result.check(Criterion::ImpliedVolatility).unwrap();
    assert!(!iv.passed);
    assert_eq!(iv.actual, None);
}

#[test]
fn test_find_opportunities_orders_by_absolute_delta() {
    let profile = CriteriaProfile::empty("liquid").with_min_volume(10);
    let candidate = |strike: f64, option_type: OptionType| {
        let contract = OptionContract::new("SPY", option_type, strike, 30)
            .with_quote(1.0, 1.1, 1.05)
            .with_liquidity(100, 100);
        let greeks = greeks(100.0, strike, 30, 0.3, 0.05, option_type).unwrap();
        (contract, greeks)
    };
    let mut illiquid = candidate(100.0, OptionType::Call);
    illiquid.0.volume = 0;

    let candidates = vec![
        candidate(110.0, OptionType::Call),
        illiquid,
        candidate(95.0, OptionType::Put),
        candidate(90.0, OptionType::Call),
    ];

    let found = find_opportunities(&candidates, &profile, DEFAULT_PASS_THRESHOLD);
    let order: Vec<(f64, OptionType)> = found
        .iter()
        .map(|s| (s.contract.strike, s.contract.option_type))
        .collect();
    assert_eq!(
        order,
        vec![
            (90.0, OptionType::Call),
            (95.0, OptionType::Put),
            (110.0, OptionType::Call),
        ]
    );
}
