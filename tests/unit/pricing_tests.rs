use options_analytics::prelude::*;

const SPOTS: [f64; 5] = [60.0, 90.0, 100.0, 110.0, 160.0];
const STRIKES: [f64; 3] = [80.0, 100.0, 120.0];
const DAYS: [u32; 4] = [1, 30, 91, 365];
const VOLS: [f64; 4] = [0.05, 0.2, 0.5, 1.5];
const RATES: [f64; 3] = [0.0, 0.05, 0.1];

fn for_each_case(mut f: impl FnMut(f64, f64, u32, f64, f64)) {
    for spot in SPOTS {
        for strike in STRIKES {
            for days in DAYS {
                for vol in VOLS {
                    for rate in RATES {
                        f(spot, strike, days, vol, rate);
                    }
                }
            }
        }
    }
}

#[test]
fn test_put_call_parity_holds_across_inputs() {
    for_each_case(|spot, strike, days, vol, rate| {
        let call = BlackScholes::price(
            &PricingParams::from_days(spot, strike, days, rate, OptionType::Call),
            vol,
        );
        let put = BlackScholes::price(
            &PricingParams::from_days(spot, strike, days, rate, OptionType::Put),
            vol,
        );
        let t = f64::from(days) / 365.0;
        let forward = spot - strike * (-rate * t).exp();
        assert!(
            (call - put - forward).abs() < 1e-6,
            "parity broken at S={spot} K={strike} days={days} vol={vol} r={rate}"
        );
    });
}

#[test]
fn test_delta_bounds_and_gamma_symmetry() {
    for_each_case(|spot, strike, days, vol, rate| {
        let call = greeks(spot, strike, days, vol, rate, OptionType::Call).unwrap();
        let put = greeks(spot, strike, days, vol, rate, OptionType::Put).unwrap();

        assert!((0.0..=1.0).contains(&call.delta));
        assert!((-1.0..=0.0).contains(&put.delta));
        assert!(call.gamma >= 0.0);
        assert_eq!(call.gamma, put.gamma);
        assert_eq!(call.vega, put.vega);
        assert!(call.vega >= 0.0);
    });
}

#[test]
fn test_prices_respect_no_arbitrage_bounds() {
    for_each_case(|spot, strike, days, vol, rate| {
        let t = f64::from(days) / 365.0;
        let discount = (-rate * t).exp();

        let call = price(spot, strike, t, rate, vol, OptionType::Call).unwrap();
        let put = price(spot, strike, t, rate, vol, OptionType::Put).unwrap();

        assert!(call > -1e-9 && put > -1e-9);
        assert!(call >= (spot - strike * discount).max(0.0) - 1e-6);
        assert!(put >= (strike * discount - spot).max(0.0) - 1e-6);
    });
}

#[test]
fn test_terminal_values_equal_intrinsic() {
    for spot in SPOTS {
        for strike in STRIKES {
            for option_type in [OptionType::Call, OptionType::Put] {
                let result = greeks(spot, strike, 0, 0.3, 0.05, option_type).unwrap();
                let intrinsic = option_type.intrinsic_value(spot, strike);

                assert!((result.theoretical_price - round_to(intrinsic, 2)).abs() < 1e-9);
                assert_eq!(result.gamma, 0.0);
                assert_eq!(result.theta, 0.0);
                assert_eq!(result.vega, 0.0);
                assert_eq!(result.time_value, 0.0);
            }
        }
    }
}

#[test]
fn test_terminal_delta_is_a_step() {
    let itm_call = greeks(110.0, 100.0, 0, 0.3, 0.05, OptionType::Call).unwrap();
    let otm_call = greeks(90.0, 100.0, 0, 0.3, 0.05, OptionType::Call).unwrap();
    let itm_put = greeks(90.0, 100.0, 0, 0.3, 0.05, OptionType::Put).unwrap();
    let otm_put = greeks(110.0, 100.0, 0, 0.3, 0.05, OptionType::Put).unwrap();

    assert_eq!(itm_call.delta, 1.0);
    assert_eq!(otm_call.delta, 0.0);
    assert_eq!(itm_put.delta, -1.0);
    assert_eq!(otm_put.delta, 0.0);
}

#[test]
fn test_call_price_increases_with_spot_and_volatility() {
    let mut previous = 0.0;
    for spot in [80.0, 90.0, 100.0, 110.0, 120.0] {
        let value = price(spot, 100.0, 0.5, 0.05, 0.3, OptionType::Call).unwrap();
        assert!(value > previous);
        previous = value;
    }

    let mut previous = 0.0;
    for vol in [0.1, 0.2, 0.4, 0.8] {
        let value = price(100.0, 100.0, 0.5, 0.05, vol, OptionType::Call).unwrap();
        assert!(value > previous);
        previous = value;
    }
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let cases = [
        price(0.0, 100.0, 0.25, 0.05, 0.3, OptionType::Call),
        price(100.0, -1.0, 0.25, 0.05, 0.3, OptionType::Call),
        price(100.0, 100.0, -0.1, 0.05, 0.3, OptionType::Call),
        price(100.0, 100.0, 0.25, 0.05, 0.0, OptionType::Call),
        price(f64::NAN, 100.0, 0.25, 0.05, 0.3, OptionType::Put),
        price(100.0, 100.0, 0.25, f64::INFINITY, 0.3, OptionType::Put),
    ];
    for result in cases {
        assert!(matches!(result, Err(AnalyticsError::InvalidInput { .. })));
    }
}
