//! Contract and market data consumed by the engine.

use super::error::{AnalyticsError, AnalyticsResult};
use serde::{Deserialize, Serialize};

/// Calendar days per year used for every days-to-years conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Annualized risk-free rate used when the caller supplies none.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.05;

/// Relative distance from the strike within which a contract is at-the-money.
const ATM_BAND: f64 = 0.001;

/// Option type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option (right to buy the underlying at strike price).
    Call,
    /// Put option (right to sell the underlying at strike price).
    Put,
}

impl OptionType {
    /// Intrinsic value of an option of this type.
    ///
    /// For calls: max(0, spot - strike)
    /// For puts: max(0, strike - spot)
    #[must_use]
    pub fn intrinsic_value(self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

/// Which quote of a contract stands in for its market price.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Simple mid price: `(bid + ask) / 2`.
    #[default]
    MidPrice,
    /// Last traded price.
    LastTrade,
    /// Ask price, the cost of opening a long position.
    Ask,
}

/// Quote quality derived from the bid-ask spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteQuality {
    /// Spread < 100 bps (1%), high liquidity.
    High,
    /// Spread 100-500 bps (1-5%), moderate liquidity.
    Medium,
    /// Spread > 500 bps (5%) or no usable mid price.
    Low,
}

impl QuoteQuality {
    /// Classifies a spread expressed in basis points of the mid price.
    #[must_use]
    pub fn from_spread_bps(spread_bps: f64) -> Self {
        if spread_bps < 100.0 {
            QuoteQuality::High
        } else if spread_bps <= 500.0 {
            QuoteQuality::Medium
        } else {
            QuoteQuality::Low
        }
    }
}

/// Relationship between spot and strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Moneyness {
    /// In the money: positive intrinsic value.
    InTheMoney,
    /// At the money: spot within 0.1% of strike.
    AtTheMoney,
    /// Out of the money.
    OutOfTheMoney,
}

/// Inputs of a single Black-Scholes valuation, volatility excluded.
///
/// Volatility is passed separately so the same parameters can be re-priced
/// at many volatilities by the IV solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParams {
    /// Underlying spot price in price units.
    pub spot: f64,
    /// Option strike price in price units.
    pub strike: f64,
    /// Time to expiration in years (e.g., 30 days = 30.0 / 365.0).
    pub time_to_expiry: f64,
    /// Risk-free interest rate (annualized, e.g., 0.05 for 5%).
    pub risk_free_rate: f64,
    /// Option type (Call or Put).
    pub option_type: OptionType,
}

impl PricingParams {
    /// Creates new pricing parameters.
    ///
    /// # Arguments
    /// - `spot`: Underlying spot price in price units
    /// - `strike`: Option strike price in price units
    /// - `time_to_expiry`: Time to expiration in years
    /// - `risk_free_rate`: Risk-free interest rate (annualized)
    /// - `option_type`: Call or Put
    #[must_use]
    pub fn new(
        spot: f64,
        strike: f64,
        time_to_expiry: f64,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            option_type,
        }
    }

    /// Creates parameters for a call option.
    #[must_use]
    pub fn call(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Call,
        )
    }

    /// Creates parameters for a put option.
    #[must_use]
    pub fn put(spot: f64, strike: f64, time_to_expiry: f64, risk_free_rate: f64) -> Self {
        Self::new(
            spot,
            strike,
            time_to_expiry,
            risk_free_rate,
            OptionType::Put,
        )
    }

    /// Creates parameters with time expressed in whole calendar days.
    #[must_use]
    pub fn from_days(
        spot: f64,
        strike: f64,
        days_to_expiry: u32,
        risk_free_rate: f64,
        option_type: OptionType,
    ) -> Self {
        Self::new(
            spot,
            strike,
            f64::from(days_to_expiry) / DAYS_PER_YEAR,
            risk_free_rate,
            option_type,
        )
    }

    /// Returns a copy of these parameters with a different spot price.
    #[must_use]
    pub fn with_spot(self, spot: f64) -> Self {
        Self { spot, ..self }
    }

    /// Returns a copy of these parameters with a different time to expiry.
    #[must_use]
    pub fn with_time_to_expiry(self, time_to_expiry: f64) -> Self {
        Self {
            time_to_expiry,
            ..self
        }
    }

    /// Checks the parameters against the pricing model's preconditions.
    ///
    /// Spot and strike must be positive, time must be non-negative and every
    /// field must be finite.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(AnalyticsError::invalid(format!(
                "spot price must be positive, got {}",
                self.spot
            )));
        }

        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(AnalyticsError::invalid(format!(
                "strike price must be positive, got {}",
                self.strike
            )));
        }

        if !self.time_to_expiry.is_finite() || self.time_to_expiry < 0.0 {
            return Err(AnalyticsError::invalid(format!(
                "time to expiry must be non-negative, got {}",
                self.time_to_expiry
            )));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::invalid(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            )));
        }

        Ok(())
    }

    /// Calculates the intrinsic value of the option.
    #[must_use]
    pub fn intrinsic_value(&self) -> f64 {
        self.option_type.intrinsic_value(self.spot, self.strike)
    }

    /// Returns true if the option is in-the-money.
    #[must_use]
    pub fn is_itm(&self) -> bool {
        self.intrinsic_value() > 0.0
    }

    /// Returns true if the option is at-the-money (within 0.1% of strike).
    #[must_use]
    pub fn is_atm(&self) -> bool {
        (self.spot - self.strike).abs() / self.strike < ATM_BAND
    }

    /// Returns true if the option is out-of-the-money.
    #[must_use]
    pub fn is_otm(&self) -> bool {
        !self.is_itm() && !self.is_atm()
    }
}

/// Validates that a volatility can be fed to the pricing formulas.
pub(crate) fn validate_volatility(volatility: f64) -> AnalyticsResult<()> {
    if !volatility.is_finite() || volatility <= 0.0 {
        return Err(AnalyticsError::invalid(format!(
            "volatility must be positive, got {volatility}"
        )));
    }
    Ok(())
}

/// A single listed option instrument as delivered by a market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Underlying symbol.
    pub symbol: String,
    /// Call or put.
    pub option_type: OptionType,
    /// Strike price.
    pub strike: f64,
    /// Expiration date label (e.g. `2025-03-21`), informational only.
    #[serde(default)]
    pub expiration: Option<String>,
    /// Whole calendar days until expiration.
    pub days_to_expiry: u32,
    /// Best bid.
    #[serde(default)]
    pub bid: f64,
    /// Best ask.
    #[serde(default)]
    pub ask: f64,
    /// Last traded price.
    #[serde(default)]
    pub last: f64,
    /// Contracts traded in the current session.
    #[serde(default)]
    pub volume: u64,
    /// Open contracts.
    #[serde(default)]
    pub open_interest: u64,
    /// Implied volatility quoted by the provider, if any.
    #[serde(default)]
    pub implied_volatility: Option<f64>,
}

impl OptionContract {
    /// Creates a contract without quotes, liquidity or implied volatility.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        option_type: OptionType,
        strike: f64,
        days_to_expiry: u32,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            option_type,
            strike,
            expiration: None,
            days_to_expiry,
            bid: 0.0,
            ask: 0.0,
            last: 0.0,
            volume: 0,
            open_interest: 0,
            implied_volatility: None,
        }
    }

    /// Sets bid, ask and last trade prices.
    #[must_use]
    pub fn with_quote(mut self, bid: f64, ask: f64, last: f64) -> Self {
        self.bid = bid;
        self.ask = ask;
        self.last = last;
        self
    }

    /// Sets volume and open interest.
    #[must_use]
    pub fn with_liquidity(mut self, volume: u64, open_interest: u64) -> Self {
        self.volume = volume;
        self.open_interest = open_interest;
        self
    }

    /// Sets the provider's implied volatility.
    #[must_use]
    pub fn with_implied_volatility(mut self, implied_volatility: f64) -> Self {
        self.implied_volatility = Some(implied_volatility);
        self
    }

    /// Sets the expiration date label.
    #[must_use]
    pub fn with_expiration(mut self, expiration: impl Into<String>) -> Self {
        self.expiration = Some(expiration.into());
        self
    }

    /// Checks strike, quotes and implied volatility for consistency.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.strike.is_finite() || self.strike <= 0.0 {
            return Err(AnalyticsError::invalid(format!(
                "{}: strike price must be positive, got {}",
                self.symbol, self.strike
            )));
        }

        for (name, value) in [("bid", self.bid), ("ask", self.ask), ("last", self.last)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalyticsError::invalid(format!(
                    "{}: {name} must be non-negative, got {value}",
                    self.symbol
                )));
            }
        }

        if self.bid > self.ask {
            return Err(AnalyticsError::invalid(format!(
                "{}: bid {} exceeds ask {}",
                self.symbol, self.bid, self.ask
            )));
        }

        if let Some(iv) = self.implied_volatility {
            validate_volatility(iv)?;
        }

        Ok(())
    }

    /// Mid price: `(bid + ask) / 2`.
    #[must_use]
    pub fn mid_price(&self) -> f64 {
        (self.bid + self.ask) / 2.0
    }

    /// Absolute bid-ask spread.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    /// Bid-ask spread as a percentage of the mid price.
    ///
    /// Returns `None` when the mid price is zero.
    #[must_use]
    pub fn spread_pct(&self) -> Option<f64> {
        let mid = self.mid_price();
        if mid > 0.0 {
            Some(self.spread() / mid * 100.0)
        } else {
            None
        }
    }

    /// Bid-ask spread in basis points of the mid price.
    #[must_use]
    pub fn spread_bps(&self) -> Option<f64> {
        self.spread_pct().map(|pct| pct * 100.0)
    }

    /// Quote quality classified from the spread.
    #[must_use]
    pub fn quote_quality(&self) -> QuoteQuality {
        self.spread_bps()
            .map_or(QuoteQuality::Low, QuoteQuality::from_spread_bps)
    }

    /// The quote selected by `source`, if it is positive.
    #[must_use]
    pub fn market_price(&self, source: PriceSource) -> Option<f64> {
        let price = match source {
            PriceSource::MidPrice => self.mid_price(),
            PriceSource::LastTrade => self.last,
            PriceSource::Ask => self.ask,
        };
        (price > 0.0).then_some(price)
    }

    /// Intrinsic value at the given spot price.
    #[must_use]
    pub fn intrinsic_value(&self, spot: f64) -> f64 {
        self.option_type.intrinsic_value(spot, self.strike)
    }

    /// Moneyness at the given spot price.
    #[must_use]
    pub fn moneyness(&self, spot: f64) -> Moneyness {
        if (spot - self.strike).abs() / self.strike < ATM_BAND {
            Moneyness::AtTheMoney
        } else if self.intrinsic_value(spot) > 0.0 {
            Moneyness::InTheMoney
        } else {
            Moneyness::OutOfTheMoney
        }
    }

    /// Time to expiry in years.
    #[must_use]
    pub fn time_to_expiry(&self) -> f64 {
        f64::from(self.days_to_expiry) / DAYS_PER_YEAR
    }
}

/// Pricing inputs shared by all contracts of one underlying.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Underlying spot price.
    pub spot: f64,
    /// Annualized risk-free rate.
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,
    /// Volatility used when a contract carries no implied volatility,
    /// typically a historical estimate.
    #[serde(default)]
    pub fallback_volatility: Option<f64>,
}

fn default_risk_free_rate() -> f64 {
    DEFAULT_RISK_FREE_RATE
}

impl MarketContext {
    /// Creates a context with the default risk-free rate and no fallback volatility.
    #[must_use]
    pub fn new(spot: f64) -> Self {
        Self {
            spot,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            fallback_volatility: None,
        }
    }

    /// Sets the risk-free rate.
    #[must_use]
    pub fn with_rate(mut self, risk_free_rate: f64) -> Self {
        self.risk_free_rate = risk_free_rate;
        self
    }

    /// Sets the fallback volatility.
    #[must_use]
    pub fn with_fallback_volatility(mut self, volatility: f64) -> Self {
        self.fallback_volatility = Some(volatility);
        self
    }

    /// Checks spot, rate and fallback volatility.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !self.spot.is_finite() || self.spot <= 0.0 {
            return Err(AnalyticsError::invalid(format!(
                "spot price must be positive, got {}",
                self.spot
            )));
        }
        if !self.risk_free_rate.is_finite() {
            return Err(AnalyticsError::invalid(format!(
                "risk-free rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        if let Some(vol) = self.fallback_volatility {
            validate_volatility(vol)?;
        }
        Ok(())
    }

    /// Volatility to value `contract` with: its own implied volatility when
    /// present, otherwise the fallback.
    pub fn volatility_for(&self, contract: &OptionContract) -> AnalyticsResult<f64> {
        let vol = contract
            .implied_volatility
            .or(self.fallback_volatility)
            .ok_or_else(|| AnalyticsError::MissingVolatility {
                symbol: contract.symbol.clone(),
            })?;
        validate_volatility(vol)?;
        Ok(vol)
    }

    /// Pricing parameters of `contract` under this context.
    #[must_use]
    pub fn pricing_params(&self, contract: &OptionContract) -> PricingParams {
        PricingParams::from_days(
            self.spot,
            contract.strike,
            contract.days_to_expiry,
            self.risk_free_rate,
            contract.option_type,
        )
    }
}
