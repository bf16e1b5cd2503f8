//! Greeks calculator.
//!
//! Produces the rounded, report-ready sensitivities of a single contract.
//! Time is converted from calendar days to years once and that value feeds
//! the price and all four Greeks.

use super::black_scholes::BlackScholes;
use super::error::AnalyticsResult;
use super::types::{MarketContext, OptionContract, OptionType, PricingParams, validate_volatility};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Decimal places kept for Greeks.
const GREEK_DECIMALS: u32 = 4;
/// Decimal places kept for prices.
const PRICE_DECIMALS: u32 = 2;

/// Greeks and value decomposition of one contract.
///
/// Greeks are rounded to 4 decimals, prices to 2.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreeksResult {
    /// ∂V/∂S, in [-1, 1].
    pub delta: f64,
    /// ∂²V/∂S², non-negative.
    pub gamma: f64,
    /// Value change per calendar day.
    pub theta: f64,
    /// Value change per 1 percentage point of volatility.
    pub vega: f64,
    /// Black-Scholes value.
    pub theoretical_price: f64,
    /// Value if exercised now.
    pub intrinsic_value: f64,
    /// Theoretical price above intrinsic value, floored at zero.
    pub time_value: f64,
}

/// Difference between two [`GreeksResult`] values (`new - base`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GreeksChange {
    /// Delta change.
    pub delta: f64,
    /// Gamma change.
    pub gamma: f64,
    /// Theta change.
    pub theta: f64,
    /// Vega change.
    pub vega: f64,
}

impl GreeksResult {
    /// Computes the Greeks of already validated parameters.
    pub(crate) fn from_params(params: &PricingParams, vol: f64) -> Self {
        let theoretical_price = round_to(BlackScholes::price(params, vol), PRICE_DECIMALS);
        let intrinsic_value = round_to(params.intrinsic_value(), PRICE_DECIMALS);
        // European puts deep in the money can trade under intrinsic
        let time_value = round_to(
            (theoretical_price - intrinsic_value).max(0.0),
            PRICE_DECIMALS,
        );

        Self {
            delta: round_to(BlackScholes::delta(params, vol), GREEK_DECIMALS),
            gamma: round_to(BlackScholes::gamma(params, vol), GREEK_DECIMALS),
            theta: round_to(BlackScholes::theta(params, vol), GREEK_DECIMALS),
            vega: round_to(BlackScholes::vega(params, vol) / 100.0, GREEK_DECIMALS),
            theoretical_price,
            intrinsic_value,
            time_value,
        }
    }

    /// Change of each Greek relative to `base`.
    #[must_use]
    pub fn change_from(&self, base: &GreeksResult) -> GreeksChange {
        GreeksChange {
            delta: round_to(self.delta - base.delta, GREEK_DECIMALS),
            gamma: round_to(self.gamma - base.gamma, GREEK_DECIMALS),
            theta: round_to(self.theta - base.theta, GREEK_DECIMALS),
            vega: round_to(self.vega - base.vega, GREEK_DECIMALS),
        }
    }
}

/// Calculates the Greeks of a European option.
///
/// # Arguments
/// - `spot`: Underlying price
/// - `strike`: Strike price
/// - `days_to_expiry`: Calendar days to expiration (`T = days / 365`)
/// - `volatility`: Annualized volatility (0.30 = 30%)
/// - `rate`: Annualized risk-free rate
/// - `option_type`: Call or Put
///
/// At zero days every Greek takes its terminal value: delta is a step
/// function of moneyness and gamma, theta and vega are zero.
///
/// # Errors
/// [`AnalyticsError::InvalidInput`](super::AnalyticsError::InvalidInput) for
/// non-positive spot, strike or volatility.
pub fn greeks(
    spot: f64,
    strike: f64,
    days_to_expiry: u32,
    volatility: f64,
    rate: f64,
    option_type: OptionType,
) -> AnalyticsResult<GreeksResult> {
    let params = PricingParams::from_days(spot, strike, days_to_expiry, rate, option_type);
    params.validate()?;
    validate_volatility(volatility)?;
    Ok(GreeksResult::from_params(&params, volatility))
}

/// Calculates the Greeks of `contract` under `market`.
///
/// Uses the contract's implied volatility, falling back to the market's.
pub fn greeks_for_contract(
    contract: &OptionContract,
    market: &MarketContext,
) -> AnalyticsResult<GreeksResult> {
    contract.validate()?;
    market.validate()?;
    let vol = market.volatility_for(contract)?;
    greeks(
        market.spot,
        contract.strike,
        contract.days_to_expiry,
        vol,
        market.risk_free_rate,
        contract.option_type,
    )
}
