//! Engine configuration.
//!
//! Every field has a default, so a JSON document only needs to name the
//! values it overrides:
//!
//! ```rust
//! use options_analytics::EngineConfig;
//!
//! let config = EngineConfig::from_json(r#"{"pass_threshold": 70.0}"#).unwrap();
//! assert_eq!(config.pass_threshold, 70.0);
//! assert_eq!(config.solver.max_iterations, 100);
//! ```

use super::error::{AnalyticsError, AnalyticsResult};
use super::scenario::DEFAULT_PRICE_SHOCKS;
use super::scorer::DEFAULT_PASS_THRESHOLD;
use super::solver::SolverConfig;
use super::types::{DEFAULT_RISK_FREE_RATE, PriceSource};
use serde::{Deserialize, Serialize};

/// Grids used by [`ScenarioEngine::report`](super::ScenarioEngine::report).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Percent spot shocks for the price-shock grid.
    pub price_changes: Vec<f64>,
    /// Days projected by the time-decay scenario.
    pub days_forward: u32,
    /// Percent spot shocks for the combined matrix rows.
    pub matrix_price_changes: Vec<f64>,
    /// Elapsed days for the combined matrix columns.
    pub matrix_day_offsets: Vec<u32>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            price_changes: DEFAULT_PRICE_SHOCKS.to_vec(),
            days_forward: 7,
            matrix_price_changes: vec![-5.0, -2.0, 0.0, 2.0, 5.0],
            matrix_day_offsets: vec![0, 1, 3, 7],
        }
    }
}

impl ScenarioConfig {
    /// Sets the price-shock grid.
    #[must_use]
    pub fn with_price_changes(mut self, price_changes: Vec<f64>) -> Self {
        self.price_changes = price_changes;
        self
    }

    /// Sets the time-decay horizon.
    #[must_use]
    pub fn with_days_forward(mut self, days_forward: u32) -> Self {
        self.days_forward = days_forward;
        self
    }

    /// Sets both axes of the combined matrix.
    #[must_use]
    pub fn with_matrix(mut self, price_changes: Vec<f64>, day_offsets: Vec<u32>) -> Self {
        self.matrix_price_changes = price_changes;
        self.matrix_day_offsets = day_offsets;
        self
    }

    fn validate(&self) -> AnalyticsResult<()> {
        let shocks = self.price_changes.iter().chain(&self.matrix_price_changes);
        for &pct in shocks {
            if !pct.is_finite() || pct <= -100.0 {
                return Err(AnalyticsError::InvalidConfig {
                    message: format!("scenario price change {pct} must be finite and above -100"),
                });
            }
        }
        Ok(())
    }
}

/// Top-level configuration of [`OptionsAnalytics`](super::OptionsAnalytics).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Risk-free rate for market contexts built by the engine.
    pub risk_free_rate: f64,
    /// Minimum score, in percent, for a contract to qualify.
    pub pass_threshold: f64,
    /// Quote used as the observed price when solving implied volatility.
    pub price_source: PriceSource,
    /// Implied volatility solver settings.
    pub solver: SolverConfig,
    /// Scenario grid settings.
    pub scenario: ScenarioConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            price_source: PriceSource::default(),
            solver: SolverConfig::default(),
            scenario: ScenarioConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_risk_free_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Sets the qualification threshold.
    #[must_use]
    pub fn with_pass_threshold(mut self, pass_threshold: f64) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    /// Sets the price source for implied volatility.
    #[must_use]
    pub fn with_price_source(mut self, price_source: PriceSource) -> Self {
        self.price_source = price_source;
        self
    }

    /// Sets the solver configuration.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the scenario configuration.
    #[must_use]
    pub fn with_scenario(mut self, scenario: ScenarioConfig) -> Self {
        self.scenario = scenario;
        self
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if the document is malformed or a value is out of range.
    pub fn from_json(json: &str) -> AnalyticsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every nested section.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::InvalidConfig {
                message: format!("risk_free_rate must be finite, got {}", self.risk_free_rate),
            });
        }
        if !(0.0..=100.0).contains(&self.pass_threshold) {
            return Err(AnalyticsError::InvalidConfig {
                message: format!(
                    "pass_threshold must be within [0, 100], got {}",
                    self.pass_threshold
                ),
            });
        }
        self.solver.validate()?;
        self.scenario.validate()
    }
}
