//! Error types for the analytics engine.

use std::fmt;

/// Convenience alias for results produced by the engine.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors surfaced by the analytics engine.
///
/// Conditions with a defined fallback (expiry, vanishing vega, zero mid price)
/// are resolved by the component that meets them and never appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Malformed input rejected before any formula evaluation.
    InvalidInput {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Implied volatility solver did not meet its tolerance.
    NonConvergent {
        /// Number of iterations attempted.
        iterations: u32,
        /// Best volatility estimate reached before giving up.
        last_iv: f64,
        /// Absolute price residual at `last_iv`.
        residual: f64,
    },

    /// Neither the contract nor the market context carries a volatility.
    MissingVolatility {
        /// Underlying symbol of the contract being valued.
        symbol: String,
    },

    /// Engine configuration could not be parsed or failed validation.
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },
}

impl AnalyticsError {
    /// Shorthand for building an [`AnalyticsError::InvalidInput`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        AnalyticsError::InvalidInput {
            message: message.into(),
        }
    }
}

impl fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyticsError::InvalidInput { message } => {
                write!(f, "invalid input: {message}")
            }
            AnalyticsError::NonConvergent {
                iterations,
                last_iv,
                residual,
            } => {
                write!(
                    f,
                    "solver did not converge after {iterations} iterations, last IV: {last_iv:.4}, residual: {residual:.6}"
                )
            }
            AnalyticsError::MissingVolatility { symbol } => {
                write!(
                    f,
                    "no volatility available for {symbol}: contract has no implied volatility and market context has no fallback"
                )
            }
            AnalyticsError::InvalidConfig { message } => {
                write!(f, "invalid configuration: {message}")
            }
        }
    }
}

impl std::error::Error for AnalyticsError {}

impl From<serde_json::Error> for AnalyticsError {
    fn from(err: serde_json::Error) -> Self {
        AnalyticsError::InvalidConfig {
            message: err.to_string(),
        }
    }
}
