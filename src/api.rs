//! HTTP surface: direct prediction, prediction from prices, and the model catalog.

use std::num::NonZeroUsize;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::error::ForecastError;
use crate::inference::{Forecaster, PriceForecast};
use crate::volatility::VolatilityMethod;

#[derive(Clone)]
pub struct AppState {
    forecaster: Arc<Forecaster>,
}

impl AppState {
    pub fn new(forecaster: Forecaster) -> Self {
        Self {
            forecaster: Arc::new(forecaster),
        }
    }
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityInput {
    pub lag: NonZeroUsize,
    pub features: Vec<f64>,
}

/// Body of `POST /predict-from-prices`. `method` defaults to `rolling`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceInput {
    pub lag: NonZeroUsize,
    pub prices: Vec<f64>,
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    VolatilityMethod::default().as_str().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub volatility_forecast: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableModelsResponse {
    pub available_lags: Vec<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub ts: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

#[derive(Debug)]
pub enum ApiError {
    Forecast(ForecastError),
    Rejected(JsonRejection),
    Task(String),
}

impl From<ForecastError> for ApiError {
    fn from(e: ForecastError) -> Self {
        Self::Forecast(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Rejected(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::Forecast(e) => {
                let status = StatusCode::from_u16(e.status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, e.to_string())
            }
            Self::Rejected(r) => (r.status(), r.body_text()),
            Self::Task(reason) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("inference task failed: {}", reason),
            ),
        };
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), %detail, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), %detail, "Request rejected");
        }
        (status, Json(ErrorBody { detail })).into_response()
    }
}

pub fn router(forecaster: Forecaster) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/predict-from-prices", post(predict_from_prices_handler))
        .route("/available-models", get(available_models_handler))
        .route("/health", get(health_handler))
        .with_state(AppState::new(forecaster))
}

pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    tracing::info!(addr = %listener.local_addr()?, "Volatility forecast API listening");
    axum::serve(listener, app).await?;
    Ok(())
}

// Bundle loading reads from disk; keep it off the async workers.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ForecastError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::Task(e.to_string()))?
        .map_err(ApiError::from)
}

async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<VolatilityInput>, JsonRejection>,
) -> Result<Json<ForecastResponse>, ApiError> {
    let Json(input) = payload?;
    let lag = input.lag.get();
    let forecaster = state.forecaster.clone();
    let volatility_forecast =
        run_blocking(move || forecaster.predict(lag, &input.features)).await?;
    tracing::info!(lag, steps = volatility_forecast.len(), "Forecast served");
    Ok(Json(ForecastResponse {
        volatility_forecast,
    }))
}

async fn predict_from_prices_handler(
    State(state): State<AppState>,
    payload: Result<Json<PriceInput>, JsonRejection>,
) -> Result<Json<PriceForecast>, ApiError> {
    let Json(input) = payload?;
    let lag = input.lag.get();
    let method: VolatilityMethod = input.method.parse()?;
    let forecaster = state.forecaster.clone();
    let forecast =
        run_blocking(move || forecaster.predict_from_prices(lag, &input.prices, method)).await?;
    tracing::info!(
        lag,
        %method,
        steps = forecast.volatility_forecast.len(),
        "Forecast from prices served"
    );
    Ok(Json(forecast))
}

async fn available_models_handler(
    State(state): State<AppState>,
) -> Result<Json<AvailableModelsResponse>, ApiError> {
    let forecaster = state.forecaster.clone();
    let available_lags = run_blocking(move || forecaster.available_lags()).await?;
    Ok(Json(AvailableModelsResponse { available_lags }))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ts: chrono::Utc::now().to_rfc3339(),
    })
}
