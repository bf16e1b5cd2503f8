//! Opportunity scorer.
//!
//! Each threshold of a [`CriteriaProfile`] is evaluated as an independent
//! predicate against a contract and its Greeks. The composite score is the
//! share of predicates that pass, in percent.

use super::greeks::GreeksResult;
use super::types::OptionContract;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Qualification threshold, in percent, used when the caller gives none.
pub const DEFAULT_PASS_THRESHOLD: f64 = 80.0;

/// Inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound, inclusive.
    pub min: f64,
    /// Upper bound, inclusive.
    pub max: f64,
}

impl Bounds {
    /// Creates a range.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True if `value` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Named set of thresholds. Unset thresholds are not evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaProfile {
    /// Profile name used in reports.
    pub name: String,
    /// Range for `|delta|`.
    #[serde(default)]
    pub delta: Option<Bounds>,
    /// Minimum gamma.
    #[serde(default)]
    pub min_gamma: Option<f64>,
    /// Theta ceiling on decay: theta must be at or above this (usually negative) value.
    #[serde(default)]
    pub max_theta: Option<f64>,
    /// Minimum vega.
    #[serde(default)]
    pub min_vega: Option<f64>,
    /// Minimum session volume.
    #[serde(default)]
    pub min_volume: Option<u64>,
    /// Minimum open interest.
    #[serde(default)]
    pub min_open_interest: Option<u64>,
    /// Maximum bid-ask spread as a percentage of mid.
    #[serde(default)]
    pub max_spread_pct: Option<f64>,
    /// Range for the mid price.
    #[serde(default)]
    pub price: Option<Bounds>,
    /// Range for implied volatility (0.30 = 30%).
    #[serde(default)]
    pub implied_volatility: Option<Bounds>,
}

impl CriteriaProfile {
    /// A profile with no thresholds. Scoring against it is degenerate.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delta: None,
            min_gamma: None,
            max_theta: None,
            min_vega: None,
            min_volume: None,
            min_open_interest: None,
            max_spread_pct: None,
            price: None,
            implied_volatility: None,
        }
    }

    /// Directional opportunity screening with relaxed liquidity requirements.
    #[must_use]
    pub fn general() -> Self {
        Self {
            name: "general".to_string(),
            delta: Some(Bounds::new(0.30, 0.70)),
            min_gamma: Some(0.01),
            max_theta: Some(-0.50),
            min_vega: Some(0.05),
            min_volume: Some(10),
            min_open_interest: Some(50),
            max_spread_pct: Some(15.0),
            price: Some(Bounds::new(0.50, 50.0)),
            implied_volatility: Some(Bounds::new(0.10, 1.50)),
        }
    }

    /// Short-horizon scalping: near-the-money, high gamma, deep liquidity and
    /// tight spreads.
    #[must_use]
    pub fn scalping() -> Self {
        Self {
            name: "scalping".to_string(),
            delta: Some(Bounds::new(0.40, 0.60)),
            min_gamma: Some(0.03),
            max_theta: Some(-0.25),
            min_vega: Some(0.02),
            min_volume: Some(500),
            min_open_interest: Some(1_000),
            max_spread_pct: Some(5.0),
            price: Some(Bounds::new(0.50, 10.0)),
            implied_volatility: Some(Bounds::new(0.15, 0.80)),
        }
    }

    /// Sets the `|delta|` range.
    #[must_use]
    pub fn with_delta_range(mut self, min: f64, max: f64) -> Self {
        self.delta = Some(Bounds::new(min, max));
        self
    }

    /// Sets the minimum gamma.
    #[must_use]
    pub fn with_min_gamma(mut self, min_gamma: f64) -> Self {
        self.min_gamma = Some(min_gamma);
        self
    }

    /// Sets the theta floor.
    #[must_use]
    pub fn with_max_theta(mut self, max_theta: f64) -> Self {
        self.max_theta = Some(max_theta);
        self
    }

    /// Sets the minimum vega.
    #[must_use]
    pub fn with_min_vega(mut self, min_vega: f64) -> Self {
        self.min_vega = Some(min_vega);
        self
    }

    /// Sets the minimum volume.
    #[must_use]
    pub fn with_min_volume(mut self, min_volume: u64) -> Self {
        self.min_volume = Some(min_volume);
        self
    }

    /// Sets the minimum open interest.
    #[must_use]
    pub fn with_min_open_interest(mut self, min_open_interest: u64) -> Self {
        self.min_open_interest = Some(min_open_interest);
        self
    }

    /// Sets the maximum spread percentage.
    #[must_use]
    pub fn with_max_spread_pct(mut self, max_spread_pct: f64) -> Self {
        self.max_spread_pct = Some(max_spread_pct);
        self
    }

    /// Sets the mid-price range.
    #[must_use]
    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price = Some(Bounds::new(min, max));
        self
    }

    /// Sets the implied volatility range.
    #[must_use]
    pub fn with_iv_range(mut self, min: f64, max: f64) -> Self {
        self.implied_volatility = Some(Bounds::new(min, max));
        self
    }

    /// Number of thresholds that are set.
    #[must_use]
    pub fn criteria_count(&self) -> usize {
        [
            self.delta.is_some(),
            self.min_gamma.is_some(),
            self.max_theta.is_some(),
            self.min_vega.is_some(),
            self.min_volume.is_some(),
            self.min_open_interest.is_some(),
            self.max_spread_pct.is_some(),
            self.price.is_some(),
            self.implied_volatility.is_some(),
        ]
        .into_iter()
        .filter(|set| *set)
        .count()
    }
}

/// A single criterion of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    /// `|delta|` within range.
    Delta,
    /// Gamma at or above minimum.
    Gamma,
    /// Theta at or above the floor.
    Theta,
    /// Vega at or above minimum.
    Vega,
    /// Volume at or above minimum.
    Volume,
    /// Open interest at or above minimum.
    OpenInterest,
    /// Spread percentage at or below maximum.
    Spread,
    /// Mid price within range.
    Price,
    /// Implied volatility within range.
    ImpliedVolatility,
}

/// Outcome of one criterion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionCheck {
    /// Criterion evaluated.
    pub criterion: Criterion,
    /// Whether the contract passed.
    pub passed: bool,
    /// Observed value, `None` when the data is missing.
    pub actual: Option<f64>,
}

/// Data-quality condition that made a score uninformative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degeneracy {
    /// Bid and ask are both zero; spread and price could not be evaluated.
    ZeroMidPrice,
    /// The profile defines no criteria.
    EmptyProfile,
}

/// Score of one contract against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Name of the profile used.
    pub profile: String,
    /// Criteria passed.
    pub passed: usize,
    /// Criteria evaluated.
    pub total: usize,
    /// `passed / total * 100`, rounded to 2 decimals; 0 when degenerate.
    pub score: f64,
    /// Threshold the score was compared against.
    pub threshold: f64,
    /// `score >= threshold`, always false for a degenerate score.
    pub qualified: bool,
    /// Per-criterion outcome in evaluation order.
    pub breakdown: Vec<CriterionCheck>,
    /// Set when the inputs made the score uninformative.
    pub degenerate: Option<Degeneracy>,
}

impl ScoreResult {
    /// Outcome of `criterion`, if it was evaluated.
    #[must_use]
    pub fn check(&self, criterion: Criterion) -> Option<&CriterionCheck> {
        self.breakdown
            .iter()
            .find(|check| check.criterion == criterion)
    }

    /// Criteria the contract failed.
    pub fn failed(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.breakdown
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.criterion)
    }
}

/// A contract with its Greeks and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredContract {
    /// The contract.
    pub contract: OptionContract,
    /// Its Greeks.
    pub greeks: GreeksResult,
    /// Its score.
    pub score: ScoreResult,
}

fn check(
    criterion: Criterion,
    actual: Option<f64>,
    predicate: impl Fn(f64) -> bool,
) -> CriterionCheck {
    CriterionCheck {
        criterion,
        passed: actual.is_some_and(predicate),
        actual,
    }
}

/// Scores a contract against `profile` with the default threshold of 80.
#[must_use]
pub fn score(
    contract: &OptionContract,
    greeks: &GreeksResult,
    profile: &CriteriaProfile,
) -> ScoreResult {
    score_with_threshold(contract, greeks, profile, DEFAULT_PASS_THRESHOLD)
}

/// Scores a contract against `profile`.
///
/// Never fails: a zero mid price or an empty profile yields a score of 0
/// that never qualifies, reported through [`ScoreResult::degenerate`]. The
/// per-criterion breakdown is still filled in; a zero mid fails the spread
/// and price criteria.
#[must_use]
pub fn score_with_threshold(
    contract: &OptionContract,
    greeks: &GreeksResult,
    profile: &CriteriaProfile,
    threshold: f64,
) -> ScoreResult {
    let mid = contract.mid_price();
    let mut breakdown = Vec::with_capacity(profile.criteria_count());

    if let Some(range) = profile.delta {
        breakdown.push(check(Criterion::Delta, Some(greeks.delta.abs()), |d| {
            range.contains(d)
        }));
    }
    if let Some(min) = profile.min_gamma {
        breakdown.push(check(Criterion::Gamma, Some(greeks.gamma), |g| g >= min));
    }
    if let Some(floor) = profile.max_theta {
        breakdown.push(check(Criterion::Theta, Some(greeks.theta), |t| t >= floor));
    }
    if let Some(min) = profile.min_vega {
        breakdown.push(check(Criterion::Vega, Some(greeks.vega), |v| v >= min));
    }
    if let Some(min) = profile.min_volume {
        breakdown.push(check(
            Criterion::Volume,
            Some(contract.volume as f64),
            |_| contract.volume >= min,
        ));
    }
    if let Some(min) = profile.min_open_interest {
        breakdown.push(check(
            Criterion::OpenInterest,
            Some(contract.open_interest as f64),
            |_| contract.open_interest >= min,
        ));
    }
    if let Some(max) = profile.max_spread_pct {
        breakdown.push(check(Criterion::Spread, contract.spread_pct(), |s| s <= max));
    }
    if let Some(range) = profile.price {
        let price = (mid > 0.0).then_some(mid);
        breakdown.push(check(Criterion::Price, price, |p| range.contains(p)));
    }
    if let Some(range) = profile.implied_volatility {
        breakdown.push(check(
            Criterion::ImpliedVolatility,
            contract.implied_volatility,
            |iv| range.contains(iv),
        ));
    }

    let total = breakdown.len();
    let passed = breakdown.iter().filter(|check| check.passed).count();

    let degenerate = if total == 0 {
        Some(Degeneracy::EmptyProfile)
    } else if mid <= 0.0 {
        Some(Degeneracy::ZeroMidPrice)
    } else {
        None
    };

    // the breakdown is kept for diagnostics but a degenerate score is zero
    let raw_score = if degenerate.is_some() {
        0.0
    } else {
        (passed * 100) as f64 / total as f64
    };

    ScoreResult {
        profile: profile.name.clone(),
        passed,
        total,
        score: round_to(raw_score, 2),
        threshold,
        qualified: degenerate.is_none() && raw_score >= threshold,
        breakdown,
        degenerate,
    }
}

/// Scores every candidate and keeps the qualified ones, ordered by `|delta|`
/// descending.
///
/// The sort is stable: candidates with equal `|delta|` keep their input order.
#[must_use]
pub fn find_opportunities(
    candidates: &[(OptionContract, GreeksResult)],
    profile: &CriteriaProfile,
    threshold: f64,
) -> Vec<ScoredContract> {
    let mut qualified: Vec<ScoredContract> = candidates
        .iter()
        .filter_map(|(contract, greeks)| {
            let score = score_with_threshold(contract, greeks, profile, threshold);
            score.qualified.then(|| ScoredContract {
                contract: contract.clone(),
                greeks: *greeks,
                score,
            })
        })
        .collect();

    qualified.sort_by(|a, b| b.greeks.delta.abs().total_cmp(&a.greeks.delta.abs()));
    qualified
}
