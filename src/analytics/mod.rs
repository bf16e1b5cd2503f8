//! Options analytics engine.
//!
//! This module groups the five computation units of the engine and the data
//! types they exchange.
//!
//! # Overview
//!
//! ```text
//! black_scholes  <- greeks  <- solver
//!       ^             ^
//!       +--------- scenario
//!
//! scorer consumes GreeksResult values as plain inputs
//! ```
//!
//! All functions are pure: identical inputs produce bit-identical outputs.
//! Edge cases with a defined policy (expiry, vanishing vega, zero mid price)
//! are resolved locally and never surface as errors. Only malformed input and
//! solver non-convergence are reported through [`AnalyticsError`].
//!
//! # Example
//!
//! ```rust
//! use options_analytics::analytics::{MarketContext, OptionContract, OptionType, ScenarioEngine};
//!
//! let contract = OptionContract::new("SPY", OptionType::Call, 100.0, 30)
//!     .with_quote(2.40, 2.50, 2.45)
//!     .with_liquidity(1_200, 5_000)
//!     .with_implied_volatility(0.25);
//! let market = MarketContext::new(100.0);
//!
//! let engine = ScenarioEngine::new(&contract, &market).unwrap();
//! let flat = engine.price_shock(0.0).unwrap();
//! assert!(flat.profit_loss.abs() < 1e-9);
//! ```

mod black_scholes;
mod config;
mod engine;
mod error;
mod greeks;
mod scenario;
mod scorer;
mod solver;
mod types;

pub use black_scholes::{BlackScholes, price};
pub use config::{EngineConfig, ScenarioConfig};
pub use engine::OptionsAnalytics;
pub use error::{AnalyticsError, AnalyticsResult};
pub use greeks::{GreeksChange, GreeksResult, greeks, greeks_for_contract};
pub use scenario::{
    DEFAULT_PRICE_SHOCKS, PriceShockPoint, RiskMetrics, ScenarioEngine, ScenarioPoint,
    ScenarioReport, TimeDecayPoint,
};
pub use scorer::{
    Bounds, Criterion, CriterionCheck, CriteriaProfile, DEFAULT_PASS_THRESHOLD, Degeneracy,
    ScoreResult, ScoredContract, find_opportunities, score, score_with_threshold,
};
pub use solver::{
    IVResult, IVSolution, SolverConfig, implied_volatility, implied_volatility_for_contract,
    solve_iv, solve_iv_bisection,
};
pub use types::{
    DAYS_PER_YEAR, DEFAULT_RISK_FREE_RATE, MarketContext, Moneyness, OptionContract, OptionType,
    PriceSource, PricingParams, QuoteQuality,
};
