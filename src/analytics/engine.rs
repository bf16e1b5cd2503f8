//! Facade composing the engine components under one configuration.

use super::config::EngineConfig;
use super::error::AnalyticsResult;
use super::greeks::{GreeksResult, greeks_for_contract};
use super::scenario::{ScenarioEngine, ScenarioReport};
use super::scorer::{
    CriteriaProfile, ScoreResult, ScoredContract, find_opportunities, score_with_threshold,
};
use super::solver::{IVResult, implied_volatility_for_contract};
use super::types::{MarketContext, OptionContract};
use tracing::trace;

/// Options analytics with a fixed [`EngineConfig`].
///
/// Holds configuration only; every method is a pure function of its
/// arguments and the configuration, so one instance can be shared freely
/// across threads.
#[derive(Debug, Clone, Default)]
pub struct OptionsAnalytics {
    config: EngineConfig,
}

impl OptionsAnalytics {
    /// Creates the facade after validating `config`.
    pub fn new(config: EngineConfig) -> AnalyticsResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Market context at `spot` using the configured risk-free rate.
    #[must_use]
    pub fn market(&self, spot: f64) -> MarketContext {
        MarketContext::new(spot).with_rate(self.config.risk_free_rate)
    }

    /// Greeks of `contract`.
    pub fn greeks(
        &self,
        contract: &OptionContract,
        market: &MarketContext,
    ) -> AnalyticsResult<GreeksResult> {
        greeks_for_contract(contract, market)
    }

    /// Implied volatility of `contract` from the configured price source.
    pub fn implied_volatility(
        &self,
        contract: &OptionContract,
        market: &MarketContext,
    ) -> AnalyticsResult<IVResult> {
        implied_volatility_for_contract(
            contract,
            market,
            self.config.price_source,
            &self.config.solver,
        )
    }

    /// Scenario report of `contract` over the configured grids.
    pub fn scenarios(
        &self,
        contract: &OptionContract,
        market: &MarketContext,
    ) -> AnalyticsResult<ScenarioReport> {
        ScenarioEngine::new(contract, market)?.report(&self.config.scenario)
    }

    /// Score of `contract` against `profile` at the configured threshold.
    #[must_use]
    pub fn score(
        &self,
        contract: &OptionContract,
        greeks: &GreeksResult,
        profile: &CriteriaProfile,
    ) -> ScoreResult {
        score_with_threshold(contract, greeks, profile, self.config.pass_threshold)
    }

    /// Fills in a missing implied volatility by solving it from the quote.
    ///
    /// The contract is returned unchanged when it already carries one or
    /// when the solver does not converge.
    #[must_use]
    pub fn with_solved_iv(
        &self,
        contract: &OptionContract,
        market: &MarketContext,
    ) -> OptionContract {
        if contract.implied_volatility.is_some() {
            return contract.clone();
        }
        match self.implied_volatility(contract, market) {
            Ok(result) if result.converged => contract.clone().with_implied_volatility(result.iv),
            Ok(result) => {
                trace!(
                    "{} {}: implied volatility unconverged, best {:.4} after {} iterations",
                    contract.symbol, contract.strike, result.iv, result.iterations
                );
                contract.clone()
            }
            Err(err) => {
                trace!(
                    "{} {}: implied volatility unavailable: {}",
                    contract.symbol, contract.strike, err
                );
                contract.clone()
            }
        }
    }

    /// Values every contract of a chain and returns the qualified ones,
    /// ordered by `|delta|` descending.
    ///
    /// Contracts without a quoted implied volatility get one solved from
    /// their quote first. Contracts that cannot be valued are skipped.
    #[must_use]
    pub fn scan_chain(
        &self,
        chain: &[OptionContract],
        market: &MarketContext,
        profile: &CriteriaProfile,
    ) -> Vec<ScoredContract> {
        let candidates: Vec<(OptionContract, GreeksResult)> = chain
            .iter()
            .filter_map(|contract| {
                let contract = self.with_solved_iv(contract, market);
                match greeks_for_contract(&contract, market) {
                    Ok(greeks) => Some((contract, greeks)),
                    Err(err) => {
                        trace!("skipping {} {}: {}", contract.symbol, contract.strike, err);
                        None
                    }
                }
            })
            .collect();

        find_opportunities(&candidates, profile, self.config.pass_threshold)
    }
}
