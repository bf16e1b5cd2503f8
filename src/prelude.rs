//! Convenience re-exports of the most commonly used types and functions.
//!
//! ```rust
//! use options_analytics::prelude::*;
//! ```

pub use crate::analytics::{
    AnalyticsError, AnalyticsResult, BlackScholes, Bounds, Criterion, CriterionCheck,
    CriteriaProfile, DEFAULT_PASS_THRESHOLD, Degeneracy, EngineConfig, GreeksChange,
    GreeksResult, IVResult, IVSolution, MarketContext, Moneyness, OptionContract, OptionType,
    OptionsAnalytics, PriceShockPoint, PriceSource, PricingParams, QuoteQuality, RiskMetrics,
    ScenarioConfig, ScenarioEngine, ScenarioPoint, ScenarioReport, ScoreResult,
    ScoredContract, SolverConfig, TimeDecayPoint, find_opportunities, greeks,
    greeks_for_contract, implied_volatility, implied_volatility_for_contract, price, score,
    score_with_threshold, solve_iv, solve_iv_bisection,
};
pub use crate::utils::round_to;
