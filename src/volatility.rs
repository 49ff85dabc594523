use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::indicator::{EwmStd, RollingStd};

/// Window (rolling) and span (ewma) used to derive volatility from log-returns.
///
/// Both methods share the same value; callers need `lag + VOLATILITY_WINDOW` prices.
pub const VOLATILITY_WINDOW: usize = 7;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilityMethod {
    #[default]
    Rolling,
    Ewma,
}

impl VolatilityMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
            Self::Ewma => "ewma",
        }
    }

    pub fn window(self) -> usize {
        match self {
            Self::Rolling => VOLATILITY_WINDOW,
            Self::Ewma => VOLATILITY_WINDOW,
        }
    }
}

impl fmt::Display for VolatilityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VolatilityMethod {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rolling" => Ok(Self::Rolling),
            "ewma" => Ok(Self::Ewma),
            other => Err(ForecastError::InvalidInput(format!(
                "volatility method not recognized: '{}' (expected rolling|ewma)",
                other
            ))),
        }
    }
}

/// First difference of the natural log of consecutive prices.
///
/// Prices are not validated: zero or negative prices yield non-finite returns.
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1].ln() - w[0].ln()).collect()
}

/// Volatility of a log-return series, with undefined values dropped.
pub fn volatility_series(returns: &[f64], method: VolatilityMethod) -> Vec<f64> {
    let window = method.window();
    match method {
        VolatilityMethod::Rolling => {
            let mut rs = RollingStd::new(window);
            returns
                .iter()
                .filter_map(|r| rs.push(*r))
                .filter(|v| v.is_finite())
                .collect()
        }
        VolatilityMethod::Ewma => {
            let mut ewm = EwmStd::new(window);
            returns
                .iter()
                .map(|r| ewm.push(*r))
                .filter(|v| v.is_finite())
                .collect()
        }
    }
}

/// Derive the last `lag` volatility values from a chronological price series.
pub fn build_features(prices: &[f64], lag: usize, method: VolatilityMethod) -> Result<Vec<f64>> {
    if lag == 0 {
        return Err(ForecastError::InvalidInput("lag must be > 0".to_string()));
    }
    let min_required = lag.saturating_add(method.window());
    if prices.len() < min_required {
        return Err(ForecastError::InvalidInput(format!(
            "for a model with lag = {}, at least {} prices are required to compute volatility using '{}' (got {})",
            lag,
            min_required,
            method,
            prices.len()
        )));
    }

    let returns = log_returns(prices);
    let vol = volatility_series(&returns, method);
    if vol.len() < lag {
        return Err(ForecastError::InvalidInput(format!(
            "not enough volatility data for lag {}: derived {} values",
            lag,
            vol.len()
        )));
    }

    Ok(vol[vol.len() - lag..].to_vec())
}
