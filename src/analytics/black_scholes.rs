//! Black-Scholes pricing model and raw Greeks.
//!
//! This module is the leaf of the engine: every other component prices
//! through it. The normal CDF is built on a fixed rational approximation of
//! `erf` so that prices, Greeks and implied volatilities agree to the last
//! digit across platforms.

use super::error::AnalyticsResult;
use super::types::{OptionType, PricingParams, validate_volatility};
use std::f64::consts::PI;

/// Square root of 2, precomputed for efficiency.
const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Black-Scholes pricing model implementation.
///
/// Provides methods for calculating option prices and Greeks
/// using the Black-Scholes-Merton formula. The associated functions do not
/// validate their inputs; use [`price`] or [`PricingParams::validate`] at
/// the boundary.
pub struct BlackScholes;

impl BlackScholes {
    /// Approximation of the error function (erf).
    ///
    /// Uses Abramowitz and Stegun approximation (formula 7.1.26)
    /// with maximum error of 1.5×10⁻⁷. The approximation is odd-symmetric,
    /// so `norm_cdf(x) + norm_cdf(-x) == 1` up to rounding.
    ///
    /// # Arguments
    /// - `x`: Input value
    ///
    /// # Returns
    /// Approximation of erf(x)
    #[must_use]
    pub fn erf(x: f64) -> f64 {
        const A1: f64 = 0.254829592;
        const A2: f64 = -0.284496736;
        const A3: f64 = 1.421413741;
        const A4: f64 = -1.453152027;
        const A5: f64 = 1.061405429;
        const P: f64 = 0.3275911;

        let sign = if x < 0.0 { -1.0 } else { 1.0 };
        let x = x.abs();

        let t = 1.0 / (1.0 + P * x);
        let y = 1.0 - (((((A5 * t + A4) * t) + A3) * t + A2) * t + A1) * t * (-x * x).exp();

        sign * y
    }

    /// Standard normal cumulative distribution function (CDF).
    ///
    /// Calculates P(Z ≤ x) where Z is a standard normal random variable.
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * (1.0 + Self::erf(x / SQRT_2))
    }

    /// Standard normal probability density function (PDF).
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
    }

    /// Calculates the d1 parameter of the Black-Scholes formula.
    ///
    /// d1 = [ln(S/K) + (r + σ²/2)T] / (σ√T)
    ///
    /// # Arguments
    /// - `spot`: Current underlying price (S)
    /// - `strike`: Option strike price (K)
    /// - `rate`: Risk-free interest rate (r)
    /// - `time`: Time to expiration in years (T)
    /// - `vol`: Volatility (σ)
    #[must_use]
    pub fn d1(spot: f64, strike: f64, rate: f64, time: f64, vol: f64) -> f64 {
        let sqrt_time = time.sqrt();
        ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * sqrt_time)
    }

    /// Calculates the d2 parameter of the Black-Scholes formula.
    ///
    /// d2 = d1 - σ√T
    #[must_use]
    pub fn d2(d1: f64, vol: f64, time: f64) -> f64 {
        d1 - vol * time.sqrt()
    }

    fn d1_for(params: &PricingParams, vol: f64) -> f64 {
        Self::d1(
            params.spot,
            params.strike,
            params.risk_free_rate,
            params.time_to_expiry,
            vol,
        )
    }

    /// Calculates the theoretical option price using Black-Scholes formula.
    ///
    /// For calls: C = S·N(d1) - K·e^(-rT)·N(d2)
    /// For puts:  P = K·e^(-rT)·N(-d2) - S·N(-d1)
    ///
    /// At or past expiry the option is worth its intrinsic value.
    #[must_use]
    pub fn price(params: &PricingParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return params.intrinsic_value();
        }

        let d1 = Self::d1_for(params, vol);
        let d2 = Self::d2(d1, vol, params.time_to_expiry);
        let discount = (-params.risk_free_rate * params.time_to_expiry).exp();

        match params.option_type {
            OptionType::Call => {
                params.spot * Self::norm_cdf(d1) - params.strike * discount * Self::norm_cdf(d2)
            }
            OptionType::Put => {
                params.strike * discount * Self::norm_cdf(-d2) - params.spot * Self::norm_cdf(-d1)
            }
        }
    }

    /// Calculates vega (∂price/∂σ) - sensitivity to volatility.
    ///
    /// Vega = S · N'(d1) · √T
    ///
    /// Expressed per unit of volatility (1.0 = 100 vol points). Zero at expiry.
    #[must_use]
    pub fn vega(params: &PricingParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return 0.0;
        }

        let d1 = Self::d1_for(params, vol);
        params.spot * Self::norm_pdf(d1) * params.time_to_expiry.sqrt()
    }

    /// Calculates delta (∂price/∂S) - sensitivity to underlying price.
    ///
    /// For calls: Δ = N(d1)
    /// For puts:  Δ = N(d1) - 1
    ///
    /// At expiry delta is a step function: 1 (call) or -1 (put) when in the
    /// money, 0 otherwise, including exactly at the money.
    #[must_use]
    pub fn delta(params: &PricingParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return match params.option_type {
                OptionType::Call => {
                    if params.spot > params.strike {
                        1.0
                    } else {
                        0.0
                    }
                }
                OptionType::Put => {
                    if params.spot < params.strike {
                        -1.0
                    } else {
                        0.0
                    }
                }
            };
        }

        let d1 = Self::d1_for(params, vol);

        match params.option_type {
            OptionType::Call => Self::norm_cdf(d1),
            OptionType::Put => Self::norm_cdf(d1) - 1.0,
        }
    }

    /// Calculates gamma (∂²price/∂S²) - rate of change of delta.
    ///
    /// Γ = N'(d1) / (S · σ · √T)
    ///
    /// Identical for calls and puts. Zero at expiry.
    #[must_use]
    pub fn gamma(params: &PricingParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return 0.0;
        }

        let d1 = Self::d1_for(params, vol);
        Self::norm_pdf(d1) / (params.spot * vol * params.time_to_expiry.sqrt())
    }

    /// Calculates theta (∂price/∂t) - time decay.
    ///
    /// Returns the calendar-day theta (annual theta / 365), negative for most
    /// long positions. Zero at expiry.
    #[must_use]
    pub fn theta(params: &PricingParams, vol: f64) -> f64 {
        if params.time_to_expiry <= 0.0 {
            return 0.0;
        }

        let d1 = Self::d1_for(params, vol);
        let d2 = Self::d2(d1, vol, params.time_to_expiry);
        let discount = (-params.risk_free_rate * params.time_to_expiry).exp();
        let sqrt_time = params.time_to_expiry.sqrt();

        let term1 = -params.spot * Self::norm_pdf(d1) * vol / (2.0 * sqrt_time);

        let theta_annual = match params.option_type {
            OptionType::Call => {
                term1 - params.risk_free_rate * params.strike * discount * Self::norm_cdf(d2)
            }
            OptionType::Put => {
                term1 + params.risk_free_rate * params.strike * discount * Self::norm_cdf(-d2)
            }
        };

        theta_annual / super::types::DAYS_PER_YEAR
    }
}

/// Prices a European option, validating inputs first.
///
/// Returns the intrinsic value when `time_to_expiry_years` is zero.
///
/// # Errors
/// [`AnalyticsError::InvalidInput`](super::AnalyticsError::InvalidInput) when
/// spot or strike is not positive, time is negative or volatility is not
/// positive.
///
/// # Example
/// ```rust
/// use options_analytics::{OptionType, price};
///
/// let call = price(100.0, 100.0, 0.25, 0.05, 0.30, OptionType::Call).unwrap();
/// assert!((call - 6.58).abs() < 0.01);
/// ```
pub fn price(
    spot: f64,
    strike: f64,
    time_to_expiry_years: f64,
    rate: f64,
    volatility: f64,
    option_type: OptionType,
) -> AnalyticsResult<f64> {
    let params = PricingParams::new(spot, strike, time_to_expiry_years, rate, option_type);
    params.validate()?;
    validate_volatility(volatility)?;
    Ok(BlackScholes::price(&params, volatility))
}
