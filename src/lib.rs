//! # Options Analytics
//!
//! A pure, deterministic analytics engine for equity options. It prices
//! European contracts with the Black-Scholes model, derives the first-order
//! Greeks, solves for implied volatility, projects value under price and time
//! shocks, and scores contracts against trading-style criteria profiles.
//!
//! ## Components
//!
//! - **Pricing model** ([`BlackScholes`], [`price`]): closed-form European
//!   valuation with intrinsic value at expiry.
//! - **Greeks** ([`greeks`], [`GreeksResult`]): delta, gamma, theta (per
//!   calendar day) and vega (per volatility point), plus intrinsic and time
//!   value.
//! - **Implied volatility** ([`solve_iv`], [`solve_iv_bisection`]): Newton-Raphson
//!   inversion of the pricing model using vega as the derivative.
//! - **Scenarios** ([`ScenarioEngine`]): price shocks, time decay, the
//!   combined price x time matrix and grid-level risk metrics.
//! - **Scoring** ([`score`], [`CriteriaProfile`]): per-criterion pass/fail
//!   breakdown and a composite 0-100 qualification score.
//!
//! Every operation is a function of its inputs only. There is no shared state,
//! no I/O and no internal caching, so calls can be memoized or fanned out over
//! threads by the caller without synchronization.
//!
//! ## Example
//!
//! ```rust
//! use options_analytics::prelude::*;
//!
//! let result = greeks(100.0, 100.0, 91, 0.30, 0.05, OptionType::Call).unwrap();
//! assert!(result.delta > 0.5 && result.delta < 0.6);
//! assert!(result.gamma > 0.0);
//! ```
//!
//! ## Numerical notes
//!
//! The normal CDF is built on the Abramowitz and Stegun 7.1.26 rational
//! approximation of `erf`. The same approximation is used for pricing, Greeks
//! and the IV solver so that values pinned in regression tests stay stable.

pub mod analytics;
pub mod prelude;
mod utils;

pub use analytics::{
    AnalyticsError, AnalyticsResult, BlackScholes, CriteriaProfile, EngineConfig, GreeksResult,
    MarketContext, OptionContract, OptionType, OptionsAnalytics, ScenarioEngine, ScoreResult,
    SolverConfig, greeks, price, score, solve_iv, solve_iv_bisection,
};
pub use utils::round_to;
