use serde::Serialize;

use crate::bundle_store::BundleStore;
use crate::error::{ForecastError, InferenceStage, Result};
use crate::model::ModelBundle;
use crate::volatility::{build_features, VolatilityMethod};

/// Forecast plus the volatility window that was fed to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceForecast {
    pub volatility_forecast: Vec<f64>,
    pub volatility_input: Vec<f64>,
}

/// Request-scoped inference over a bundle store.
#[derive(Debug, Clone)]
pub struct Forecaster {
    store: BundleStore,
}

impl Forecaster {
    pub fn new(store: BundleStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &BundleStore {
        &self.store
    }

    /// Load the bundle for `lag` and forecast from a volatility window.
    pub fn predict(&self, lag: usize, features: &[f64]) -> Result<Vec<f64>> {
        let bundle = self.store.load(lag)?;
        forecast_with_bundle(&bundle, features)
    }

    /// Derive the volatility window from prices, then forecast from it.
    pub fn predict_from_prices(
        &self,
        lag: usize,
        prices: &[f64],
        method: VolatilityMethod,
    ) -> Result<PriceForecast> {
        let volatility_input = build_features(prices, lag, method)?;
        tracing::debug!(lag, %method, input = ?volatility_input, "Derived volatility window");
        let volatility_forecast = self.predict(lag, &volatility_input)?;
        Ok(PriceForecast {
            volatility_forecast,
            volatility_input,
        })
    }

    pub fn available_lags(&self) -> Result<Vec<usize>> {
        self.store.available_lags()
    }
}

/// Scale, predict, inverse-scale and clamp negatives to zero.
pub fn forecast_with_bundle(bundle: &ModelBundle, features: &[f64]) -> Result<Vec<f64>> {
    let lag = bundle.lag();
    if features.len() != lag {
        return Err(ForecastError::InvalidInput(format!(
            "expected {} input values, but received {}",
            lag,
            features.len()
        )));
    }

    let scaled = bundle
        .scaler_x
        .transform(features)
        .map_err(|e| ForecastError::inference(InferenceStage::Scaling, e.to_string()))?;
    let y_scaled = bundle
        .model
        .predict(&scaled)
        .map_err(|e| ForecastError::inference(InferenceStage::Prediction, e.to_string()))?;
    let y = bundle
        .scaler_y
        .inverse_transform(&y_scaled)
        .map_err(|e| ForecastError::inference(InferenceStage::InverseScaling, e.to_string()))?;

    if let Some(horizon) = bundle.info.horizon {
        if y.len() != horizon {
            return Err(ForecastError::inference(
                InferenceStage::Prediction,
                format!("model emitted {} steps, bundle horizon is {}", y.len(), horizon),
            ));
        }
    }

    Ok(y.into_iter().map(|v| v.max(0.0)).collect())
}
