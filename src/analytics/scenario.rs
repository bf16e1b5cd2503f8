//! Scenario engine: re-pricing under hypothetical spot and time shifts.
//!
//! A [`ScenarioEngine`] values its contract once at construction and reuses
//! that base valuation for every scenario. All transforms go through the same
//! re-pricing routine, so a cell of the combined matrix with zero day offset
//! equals the corresponding price shock, and a zero price change equals the
//! corresponding time-decay step.

use super::config::ScenarioConfig;
use super::error::{AnalyticsError, AnalyticsResult};
use super::greeks::{GreeksChange, GreeksResult};
use super::types::{MarketContext, OptionContract, PricingParams};
use crate::utils::round_to;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Canonical percent spot shocks.
pub const DEFAULT_PRICE_SHOCKS: [f64; 7] = [-10.0, -5.0, -2.0, 0.0, 2.0, 5.0, 10.0];

/// Result of re-pricing under a spot shock with time held fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceShockPoint {
    /// Applied spot change in percent.
    pub price_change_pct: f64,
    /// Shocked spot price.
    pub spot: f64,
    /// Re-priced option value.
    pub price: f64,
    /// `price - base price`.
    pub profit_loss: f64,
    /// Profit/loss as a percentage of the base price, 0 when the base is 0.
    pub profit_loss_pct: f64,
    /// Greeks at the shocked spot.
    pub greeks: GreeksResult,
    /// Greeks change versus the base valuation.
    pub greeks_change: GreeksChange,
}

/// One step of a time-decay projection with spot held fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeDecayPoint {
    /// Days elapsed since the base valuation.
    pub day: u32,
    /// Days left until expiration.
    pub days_remaining: u32,
    /// Re-priced option value.
    pub price: f64,
    /// `price - base price`, the decay actually realized by re-pricing.
    pub value_change: f64,
    /// Decay implied by the base theta: `base theta * day`.
    pub theta_decay: f64,
    /// Theta at this point.
    pub theta: f64,
}

/// One cell of the combined price x time matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPoint {
    /// Applied spot change in percent.
    pub price_change_pct: f64,
    /// Days elapsed since the base valuation.
    pub days_elapsed: u32,
    /// Shocked spot price.
    pub spot: f64,
    /// Days left until expiration, floored at zero.
    pub days_remaining: u32,
    /// Re-priced option value.
    pub price: f64,
    /// `price - base price`.
    pub profit_loss: f64,
    /// Profit/loss as a percentage of the base price, 0 when the base is 0.
    pub profit_loss_pct: f64,
}

/// Extremes of a price-shock grid.
///
/// Every figure is read off the supplied grid. In particular the breakeven is
/// the grid point with the smallest absolute P/L, not a solved root, so its
/// accuracy is limited by the grid spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Largest P/L in the grid.
    pub max_profit: f64,
    /// Smallest P/L in the grid (negative for a loss).
    pub max_loss: f64,
    /// `|max_profit / max_loss|`, `None` when `max_loss` is zero.
    pub risk_reward_ratio: Option<f64>,
    /// Percent spot change of the grid point closest to zero P/L.
    pub breakeven_price_change_pct: f64,
}

impl RiskMetrics {
    /// Derives risk metrics from a price-shock grid.
    ///
    /// # Errors
    /// `InvalidInput` if `shocks` is empty.
    pub fn from_price_shocks(shocks: &[PriceShockPoint]) -> AnalyticsResult<Self> {
        let first = shocks
            .first()
            .ok_or_else(|| AnalyticsError::invalid("price shock grid is empty"))?;

        let mut max_profit = first.profit_loss;
        let mut max_loss = first.profit_loss;
        let mut breakeven = first;

        for point in &shocks[1..] {
            max_profit = max_profit.max(point.profit_loss);
            max_loss = max_loss.min(point.profit_loss);
            if point.profit_loss.abs() < breakeven.profit_loss.abs() {
                breakeven = point;
            }
        }

        let risk_reward_ratio = if max_loss != 0.0 {
            Some(round_to((max_profit / max_loss).abs(), 2))
        } else {
            None
        };

        Ok(Self {
            max_profit,
            max_loss,
            risk_reward_ratio,
            breakeven_price_change_pct: breakeven.price_change_pct,
        })
    }
}

/// Full scenario analysis of one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Underlying symbol.
    pub symbol: String,
    /// Volatility used for every valuation.
    pub volatility: f64,
    /// Base valuation.
    pub base: GreeksResult,
    /// Spot shock grid.
    pub price_shocks: Vec<PriceShockPoint>,
    /// Metrics of the spot shock grid, absent when the grid is empty.
    pub risk_metrics: Option<RiskMetrics>,
    /// Day-by-day decay projection.
    pub time_decay: Vec<TimeDecayPoint>,
    /// Combined price x time matrix.
    pub matrix: Vec<ScenarioPoint>,
}

/// Scenario generator for a single contract.
#[derive(Debug, Clone)]
pub struct ScenarioEngine {
    symbol: String,
    params: PricingParams,
    days_to_expiry: u32,
    volatility: f64,
    base: GreeksResult,
}

impl ScenarioEngine {
    /// Values `contract` under `market` and prepares it for scenario runs.
    ///
    /// # Errors
    /// `InvalidInput` for malformed inputs, `MissingVolatility` when no
    /// volatility is available.
    pub fn new(contract: &OptionContract, market: &MarketContext) -> AnalyticsResult<Self> {
        contract.validate()?;
        market.validate()?;
        let volatility = market.volatility_for(contract)?;
        let params = market.pricing_params(contract);
        let base = GreeksResult::from_params(&params, volatility);

        Ok(Self {
            symbol: contract.symbol.clone(),
            params,
            days_to_expiry: contract.days_to_expiry,
            volatility,
            base,
        })
    }

    /// Base valuation every scenario is measured against.
    #[must_use]
    pub fn base(&self) -> &GreeksResult {
        &self.base
    }

    /// Volatility used for every valuation.
    #[must_use]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    fn reprice(&self, spot: f64, days_remaining: u32) -> GreeksResult {
        let params = PricingParams::from_days(
            spot,
            self.params.strike,
            days_remaining,
            self.params.risk_free_rate,
            self.params.option_type,
        );
        GreeksResult::from_params(&params, self.volatility)
    }

    fn shocked_spot(&self, price_change_pct: f64) -> AnalyticsResult<f64> {
        if !price_change_pct.is_finite() || price_change_pct <= -100.0 {
            return Err(AnalyticsError::invalid(format!(
                "price change must be finite and above -100%, got {price_change_pct}"
            )));
        }
        Ok(self.params.spot * (1.0 + price_change_pct / 100.0))
    }

    fn profit_loss(&self, price: f64) -> (f64, f64) {
        let profit_loss = round_to(price - self.base.theoretical_price, 2);
        let profit_loss_pct = if self.base.theoretical_price > 0.0 {
            round_to(profit_loss / self.base.theoretical_price * 100.0, 2)
        } else {
            0.0
        };
        (profit_loss, profit_loss_pct)
    }

    /// Re-prices with spot moved by `price_change_pct` percent.
    ///
    /// A zero change reproduces the base valuation exactly.
    ///
    /// # Errors
    /// `InvalidInput` if the change is not finite or at or below -100%.
    pub fn price_shock(&self, price_change_pct: f64) -> AnalyticsResult<PriceShockPoint> {
        let spot = self.shocked_spot(price_change_pct)?;
        let greeks = self.reprice(spot, self.days_to_expiry);
        let (profit_loss, profit_loss_pct) = self.profit_loss(greeks.theoretical_price);

        Ok(PriceShockPoint {
            price_change_pct,
            spot,
            price: greeks.theoretical_price,
            profit_loss,
            profit_loss_pct,
            greeks_change: greeks.change_from(&self.base),
            greeks,
        })
    }

    /// Applies [`price_shock`](Self::price_shock) to every entry of `price_changes`.
    pub fn price_shock_grid(&self, price_changes: &[f64]) -> AnalyticsResult<Vec<PriceShockPoint>> {
        price_changes
            .iter()
            .map(|&pct| self.price_shock(pct))
            .collect()
    }

    /// Projects the value day by day for up to `days_forward` days.
    ///
    /// Stops before the day the contract expires, so the result may be
    /// shorter than `days_forward` and is empty for contracts expiring today
    /// or tomorrow.
    #[must_use]
    pub fn time_decay(&self, days_forward: u32) -> Vec<TimeDecayPoint> {
        (1..=days_forward)
            .take_while(|&day| day < self.days_to_expiry)
            .map(|day| {
                let days_remaining = self.days_to_expiry - day;
                let greeks = self.reprice(self.params.spot, days_remaining);
                TimeDecayPoint {
                    day,
                    days_remaining,
                    price: greeks.theoretical_price,
                    value_change: round_to(
                        greeks.theoretical_price - self.base.theoretical_price,
                        2,
                    ),
                    theta_decay: round_to(self.base.theta * f64::from(day), 4),
                    theta: greeks.theta,
                }
            })
            .collect()
    }

    /// Re-prices every (price change, day offset) pair.
    ///
    /// Rows follow `price_changes`, columns follow `day_offsets`. Offsets at
    /// or beyond expiry value the contract at intrinsic.
    ///
    /// # Errors
    /// `InvalidInput` if any price change is not finite or at or below -100%.
    pub fn combined_matrix(
        &self,
        price_changes: &[f64],
        day_offsets: &[u32],
    ) -> AnalyticsResult<Vec<ScenarioPoint>> {
        let mut points = Vec::with_capacity(price_changes.len() * day_offsets.len());

        for &price_change_pct in price_changes {
            let spot = self.shocked_spot(price_change_pct)?;
            for &days_elapsed in day_offsets {
                let days_remaining = self.days_to_expiry.saturating_sub(days_elapsed);
                let price = self.reprice(spot, days_remaining).theoretical_price;
                let (profit_loss, profit_loss_pct) = self.profit_loss(price);
                points.push(ScenarioPoint {
                    price_change_pct,
                    days_elapsed,
                    spot,
                    days_remaining,
                    price,
                    profit_loss,
                    profit_loss_pct,
                });
            }
        }

        Ok(points)
    }

    /// Runs every scenario family described by `config`.
    pub fn report(&self, config: &ScenarioConfig) -> AnalyticsResult<ScenarioReport> {
        let price_shocks = self.price_shock_grid(&config.price_changes)?;
        let risk_metrics = if price_shocks.is_empty() {
            None
        } else {
            Some(RiskMetrics::from_price_shocks(&price_shocks)?)
        };
        let time_decay = self.time_decay(config.days_forward);
        let matrix =
            self.combined_matrix(&config.matrix_price_changes, &config.matrix_day_offsets)?;

        debug!(
            "scenario report for {}: {} shocks, {} decay steps, {} matrix cells",
            self.symbol,
            price_shocks.len(),
            time_decay.len(),
            matrix.len()
        );

        Ok(ScenarioReport {
            symbol: self.symbol.clone(),
            volatility: self.volatility,
            base: self.base,
            price_shocks,
            risk_metrics,
            time_decay,
            matrix,
        })
    }
}
