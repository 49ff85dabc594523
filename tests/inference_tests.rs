use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use vol_forecast::bundle_store::BundleStore;
use vol_forecast::error::ForecastError;
use vol_forecast::inference::Forecaster;
use vol_forecast::model::{Activation, BundleInfo, DenseLayer, ModelBundle, Regressor, Scaler};
use vol_forecast::volatility::{build_features, VolatilityMethod};

fn temp_store_dir(test_name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be monotonic")
        .as_nanos();
    std::env::temp_dir().join(format!("vf-{}-{}", test_name, ts))
}

/// Scaled MLP whose raw output swings negative for calm inputs.
fn swinging_bundle(lag: usize) -> ModelBundle {
    let hidden = DenseLayer {
        weights: (0..lag)
            .map(|i| if i + 1 == lag { vec![1.0, -1.0] } else { vec![0.0, 0.0] })
            .collect(),
        biases: vec![0.0, 0.0],
    };
    let output = DenseLayer {
        weights: vec![
            (0..7).map(|j| 1.0 + 0.5 * j as f64).collect(),
            (0..7).map(|j| -(1.0 + 0.5 * j as f64)).collect(),
        ],
        biases: vec![0.0; 7],
    };
    ModelBundle {
        model: Regressor::Mlp {
            activation: Activation::Relu,
            layers: vec![hidden, output],
        },
        scaler_x: Scaler::Standard {
            mean: vec![0.02; lag],
            scale: vec![0.005; lag],
        },
        scaler_y: Scaler::Standard {
            mean: vec![0.02; 7],
            scale: vec![0.01; 7],
        },
        info: BundleInfo {
            lag,
            horizon: Some(7),
        },
    }
}

fn forecaster_with(test_name: &str, lags: &[usize]) -> Forecaster {
    let store = BundleStore::new(temp_store_dir(test_name));
    for &lag in lags {
        store.save(&swinging_bundle(lag)).expect("save should succeed");
    }
    Forecaster::new(store)
}

#[test]
/// Every forecast element is non-negative, whatever the window looks like.
fn forecasts_are_never_negative() {
    let forecaster = forecaster_with("inference-nonneg", &[7]);
    let windows = [
        vec![0.01, 0.012, 0.013, 0.014, 0.015, 0.016, 0.017],
        vec![0.0; 7],
        vec![0.05, 0.04, 0.03, 0.02, 0.01, 0.005, 0.001],
        vec![0.2; 7],
    ];
    for features in windows {
        let out = forecaster.predict(7, &features).expect("predict should succeed");
        assert_eq!(out.len(), 7);
        assert!(out.iter().all(|v| *v >= 0.0), "negative value in {:?}", out);
    }

    // the calm window drives the raw output below zero on later steps
    let calm = forecaster.predict(7, &[0.001; 7]).unwrap();
    assert_eq!(calm[6], 0.0);
}

#[test]
fn unknown_lag_is_not_found() {
    let forecaster = forecaster_with("inference-404", &[7]);
    let err = forecaster.predict(99, &[0.01; 99]).unwrap_err();
    assert!(matches!(err, ForecastError::NotFound { lag: 99 }));
}

#[test]
fn feature_count_mismatch_states_both_lengths() {
    let forecaster = forecaster_with("inference-400", &[14]);
    let err = forecaster.predict(14, &[0.01; 9]).unwrap_err();
    assert_eq!(err.status(), 400);
    let msg = err.to_string();
    assert!(msg.contains("14"));
    assert!(msg.contains("9"));
}

#[test]
/// Forecasting from prices equals forecasting from the window derived from those prices.
fn price_path_composes_with_direct_prediction() {
    let forecaster = forecaster_with("inference-compose", &[7, 14]);
    let prices: Vec<f64> = [
        30000.0, 30200.0, 30100.0, 30500.0, 30750.0, 30800.0, 31000.0, 31200.0, 31150.0, 31300.0,
        31550.0, 31400.0, 31600.0, 31800.0, 31750.0, 32000.0, 31900.0, 32100.0, 32350.0, 32200.0,
        31250.0,
    ]
    .to_vec();

    for (lag, method) in [
        (7, VolatilityMethod::Rolling),
        (7, VolatilityMethod::Ewma),
        (14, VolatilityMethod::Rolling),
        (14, VolatilityMethod::Ewma),
    ] {
        let result = forecaster
            .predict_from_prices(lag, &prices, method)
            .expect("forecast from prices should succeed");
        let window = build_features(&prices, lag, method).unwrap();
        assert_eq!(result.volatility_input, window);
        assert_eq!(
            result.volatility_forecast,
            forecaster.predict(lag, &window).unwrap()
        );
    }
}

#[test]
/// Price validation runs before the bundle is looked up.
fn short_price_series_fails_before_lookup() {
    let forecaster = forecaster_with("inference-short-prices", &[]);
    let err = forecaster
        .predict_from_prices(7, &[1.0, 2.0, 3.0, 4.0, 5.0], VolatilityMethod::Rolling)
        .unwrap_err();
    assert!(matches!(err, ForecastError::InvalidInput(_)));
}

#[test]
fn bundles_are_reloaded_on_every_call() {
    let forecaster = forecaster_with("inference-no-cache", &[7]);
    let before = forecaster.predict(7, &[0.03; 7]).unwrap();

    let mut replaced = swinging_bundle(7);
    replaced.scaler_y = Scaler::Standard {
        mean: vec![0.5; 7],
        scale: vec![0.01; 7],
    };
    forecaster.store().save(&replaced).unwrap();

    let after = forecaster.predict(7, &[0.03; 7]).unwrap();
    assert_ne!(before, after);
}
