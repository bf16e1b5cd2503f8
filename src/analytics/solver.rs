//! Newton-Raphson solver for implied volatility calculation.
//!
//! This module finds the volatility that makes the Black-Scholes price equal
//! to an observed market price. Vega is the derivative of the iteration.

use super::black_scholes::BlackScholes;
use super::error::{AnalyticsError, AnalyticsResult};
use super::types::{
    MarketContext, OptionContract, OptionType, PriceSource, PricingParams, QuoteQuality,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration for the implied volatility solvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum iterations before giving up.
    pub max_iterations: u32,
    /// Convergence tolerance on the absolute price difference.
    pub tolerance: f64,
    /// Initial IV guess (default: 0.30 = 30%).
    pub initial_guess: f64,
    /// Minimum IV bound (default: 0.01 = 1%).
    pub min_iv: f64,
    /// Maximum IV bound (default: 5.0 = 500%).
    pub max_iv: f64,
    /// Vega below which a Newton step is not attempted.
    pub min_vega: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-4,
            initial_guess: 0.30,
            min_iv: 0.01,
            max_iv: 5.0,
            min_vega: 1e-8,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the initial IV guess.
    #[must_use]
    pub fn with_initial_guess(mut self, initial_guess: f64) -> Self {
        self.initial_guess = initial_guess;
        self
    }

    /// Sets the IV bounds.
    #[must_use]
    pub fn with_bounds(mut self, min_iv: f64, max_iv: f64) -> Self {
        self.min_iv = min_iv;
        self.max_iv = max_iv;
        self
    }

    /// Sets the vega floor.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = min_vega;
        self
    }

    /// Checks that bounds, tolerance and iteration cap are usable.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.max_iterations == 0 {
            return Err(AnalyticsError::InvalidConfig {
                message: "solver max_iterations must be at least 1".to_string(),
            });
        }
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(AnalyticsError::InvalidConfig {
                message: format!("solver tolerance must be positive, got {}", self.tolerance),
            });
        }
        if !(self.min_iv.is_finite() && self.max_iv.is_finite())
            || self.min_iv <= 0.0
            || self.min_iv >= self.max_iv
        {
            return Err(AnalyticsError::InvalidConfig {
                message: format!(
                    "solver bounds must satisfy 0 < min < max, got [{}, {}]",
                    self.min_iv, self.max_iv
                ),
            });
        }
        if self.min_vega.is_nan() || self.min_vega < 0.0 {
            return Err(AnalyticsError::InvalidConfig {
                message: format!("solver min_vega must be non-negative, got {}", self.min_vega),
            });
        }
        Ok(())
    }
}

/// Outcome of a successful solver run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IVSolution {
    /// Implied volatility (0.25 = 25%).
    pub iv: f64,
    /// Iterations performed.
    pub iterations: u32,
    /// Absolute price difference at `iv`.
    pub residual: f64,
    /// False when the solver stopped early on a vanishing vega and `iv` is
    /// only the best estimate reached.
    pub converged: bool,
}

/// Implied volatility of a listed contract along with quote metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IVResult {
    /// Calculated implied volatility (0.25 = 25%).
    pub iv: f64,
    /// Price used for calculation in price units.
    pub price_used: f64,
    /// Bid-ask spread at calculation time in basis points, if a mid exists.
    pub spread_bps: Option<f64>,
    /// Number of solver iterations.
    pub iterations: u32,
    /// Whether the solver met its tolerance.
    pub converged: bool,
    /// Calculation quality based on liquidity.
    pub quality: QuoteQuality,
}

impl IVResult {
    /// Returns the IV as a percentage (e.g., 25.0 for 25%).
    #[must_use]
    pub fn iv_percent(&self) -> f64 {
        self.iv * 100.0
    }

    /// Returns true if the solver converged and the quote is of high quality.
    #[must_use]
    pub fn is_high_quality(&self) -> bool {
        self.converged && self.quality == QuoteQuality::High
    }

    /// Returns true if the solver converged and the quote quality is High or Medium.
    #[must_use]
    pub fn is_acceptable_quality(&self) -> bool {
        self.converged && matches!(self.quality, QuoteQuality::High | QuoteQuality::Medium)
    }
}

fn validate_market_price(market_price: f64) -> AnalyticsResult<()> {
    if !market_price.is_finite() || market_price <= 0.0 {
        return Err(AnalyticsError::invalid(format!(
            "market price must be positive, got {market_price}"
        )));
    }
    Ok(())
}

/// Solves for implied volatility using Newton-Raphson method.
///
/// Starting from `config.initial_guess`, each step moves the estimate by
/// `(market_price - BS(σ)) / vega(σ)` and clamps it into
/// `[config.min_iv, config.max_iv]`. Iteration stops when the absolute price
/// difference drops below `config.tolerance`.
///
/// When vega falls below `config.min_vega` (deep ITM/OTM or close to expiry)
/// the solver stops instead of dividing by it. The best estimate is returned
/// with `converged = false` if any step improved on the initial residual.
///
/// # Errors
/// - `InvalidConfig` if `config` fails [`SolverConfig::validate`]
/// - `InvalidInput` for invalid parameters or a non-positive market price
/// - `NonConvergent` if the iteration cap is reached, if vega vanishes before
///   any improvement, or if the option is already expired
///
/// # Example
/// ```rust
/// use options_analytics::analytics::{BlackScholes, PricingParams, SolverConfig, solve_iv};
///
/// let params = PricingParams::call(100.0, 100.0, 0.25, 0.05);
/// let market_price = BlackScholes::price(&params, 0.42);
///
/// let solution = solve_iv(&params, market_price, &SolverConfig::default()).unwrap();
/// assert!((solution.iv - 0.42).abs() < 1e-3);
/// ```
pub fn solve_iv(
    params: &PricingParams,
    market_price: f64,
    config: &SolverConfig,
) -> AnalyticsResult<IVSolution> {
    config.validate()?;
    params.validate()?;
    validate_market_price(market_price)?;

    let mut iv = config.initial_guess.clamp(config.min_iv, config.max_iv);

    if params.time_to_expiry <= 0.0 {
        // value no longer depends on volatility
        return Err(AnalyticsError::NonConvergent {
            iterations: 0,
            last_iv: iv,
            residual: (market_price - params.intrinsic_value()).abs(),
        });
    }

    let mut best_iv = iv;
    let mut best_residual = f64::INFINITY;
    let mut initial_residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        let diff = market_price - BlackScholes::price(params, iv);
        let residual = diff.abs();

        if iteration == 0 {
            initial_residual = residual;
        }
        if residual < best_residual {
            best_residual = residual;
            best_iv = iv;
        }

        if residual < config.tolerance {
            debug!(
                "implied volatility converged: iv={:.6} iterations={} residual={:.2e}",
                iv,
                iteration + 1,
                residual
            );
            return Ok(IVSolution {
                iv,
                iterations: iteration + 1,
                residual,
                converged: true,
            });
        }

        let vega = BlackScholes::vega(params, iv);
        if vega < config.min_vega {
            debug!(
                "vega {:.2e} below floor at iv={:.6}, stopping after {} iterations",
                vega,
                iv,
                iteration + 1
            );
            if best_residual < initial_residual {
                return Ok(IVSolution {
                    iv: best_iv,
                    iterations: iteration + 1,
                    residual: best_residual,
                    converged: false,
                });
            }
            return Err(AnalyticsError::NonConvergent {
                iterations: iteration + 1,
                last_iv: best_iv,
                residual: best_residual,
            });
        }

        iv = (iv + diff / vega).clamp(config.min_iv, config.max_iv);
        trace!(
            "iteration {}: residual={:.6} vega={:.6} next_iv={:.6}",
            iteration + 1,
            residual,
            vega,
            iv
        );
    }

    Err(AnalyticsError::NonConvergent {
        iterations: config.max_iterations,
        last_iv: best_iv,
        residual: best_residual,
    })
}

/// Solves for implied volatility with the default [`SolverConfig`].
///
/// Returns only the volatility; see [`solve_iv`] for the full outcome.
pub fn implied_volatility(
    spot: f64,
    strike: f64,
    days_to_expiry: u32,
    rate: f64,
    observed_price: f64,
    option_type: OptionType,
) -> AnalyticsResult<f64> {
    let params = PricingParams::from_days(spot, strike, days_to_expiry, rate, option_type);
    solve_iv(&params, observed_price, &SolverConfig::default()).map(|solution| solution.iv)
}

/// Solves for IV using bisection method as a fallback.
///
/// Slower than Newton-Raphson but does not depend on vega. Fails with
/// `NonConvergent` when the market price is not bracketed by the prices at
/// the configured volatility bounds.
pub fn solve_iv_bisection(
    params: &PricingParams,
    market_price: f64,
    config: &SolverConfig,
) -> AnalyticsResult<IVSolution> {
    config.validate()?;
    params.validate()?;
    validate_market_price(market_price)?;

    let mut low = config.min_iv;
    let mut high = config.max_iv;

    let price_low = BlackScholes::price(params, low);
    let price_high = BlackScholes::price(params, high);

    if market_price < price_low || market_price > price_high {
        let (last_iv, bound_price) = if market_price < price_low {
            (low, price_low)
        } else {
            (high, price_high)
        };
        return Err(AnalyticsError::NonConvergent {
            iterations: 0,
            last_iv,
            residual: (market_price - bound_price).abs(),
        });
    }

    let mut mid = (low + high) / 2.0;
    let mut residual = f64::INFINITY;

    for iteration in 0..config.max_iterations {
        mid = (low + high) / 2.0;
        let diff = BlackScholes::price(params, mid) - market_price;
        residual = diff.abs();

        if residual < config.tolerance {
            return Ok(IVSolution {
                iv: mid,
                iterations: iteration + 1,
                residual,
                converged: true,
            });
        }

        if diff > 0.0 {
            high = mid;
        } else {
            low = mid;
        }
    }

    Err(AnalyticsError::NonConvergent {
        iterations: config.max_iterations,
        last_iv: mid,
        residual,
    })
}

/// Implied volatility of a listed contract.
///
/// The observed price is taken from the contract quote selected by `source`.
///
/// # Errors
/// - `InvalidInput` if the contract or market is malformed or the selected
///   quote is not positive
/// - `NonConvergent` as for [`solve_iv`]
pub fn implied_volatility_for_contract(
    contract: &OptionContract,
    market: &MarketContext,
    source: PriceSource,
    config: &SolverConfig,
) -> AnalyticsResult<IVResult> {
    contract.validate()?;
    market.validate()?;

    let price_used = contract.market_price(source).ok_or_else(|| {
        AnalyticsError::invalid(format!(
            "{}: no positive {source:?} quote available",
            contract.symbol
        ))
    })?;

    let params = market.pricing_params(contract);
    let solution = solve_iv(&params, price_used, config)?;

    Ok(IVResult {
        iv: solution.iv,
        price_used,
        spread_bps: contract.spread_bps(),
        iterations: solution.iterations,
        converged: solution.converged,
        quality: contract.quote_quality(),
    })
}
