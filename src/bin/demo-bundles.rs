use anyhow::{Context, Result};

use vol_forecast::bundle_store::BundleStore;
use vol_forecast::config::Config;
use vol_forecast::model::{Activation, BundleInfo, DenseLayer, ModelBundle, Regressor, Scaler};

const DEMO_LAGS: [usize; 4] = [7, 14, 21, 28];
const HORIZON: usize = 7;
const VOL_CENTER: f64 = 0.02;
const VOL_SCALE: f64 = 0.01;

/// Network that blends the last observation with the window mean, drifting
/// toward the mean as the horizon grows.
fn demo_bundle(lag: usize) -> ModelBundle {
    let mean_w = 1.0 / lag as f64;
    // hidden units: relu(mean), relu(-mean), relu(last), relu(-last)
    let weights: Vec<Vec<f64>> = (0..lag)
        .map(|i| {
            let last = if i + 1 == lag { 1.0 } else { 0.0 };
            vec![mean_w, -mean_w, last, -last]
        })
        .collect();
    let hidden = DenseLayer {
        weights,
        biases: vec![0.0; 4],
    };

    let last_share: Vec<f64> = (0..HORIZON).map(|j| 0.6 * 0.85f64.powi(j as i32)).collect();
    let output = DenseLayer {
        weights: vec![
            last_share.iter().map(|s| 1.0 - s).collect(),
            last_share.iter().map(|s| s - 1.0).collect(),
            last_share.clone(),
            last_share.iter().map(|s| -s).collect(),
        ],
        biases: vec![0.0; HORIZON],
    };

    ModelBundle {
        model: Regressor::Mlp {
            activation: Activation::Relu,
            layers: vec![hidden, output],
        },
        scaler_x: Scaler::Standard {
            mean: vec![VOL_CENTER; lag],
            scale: vec![VOL_SCALE; lag],
        },
        scaler_y: Scaler::Standard {
            mean: vec![VOL_CENTER; HORIZON],
            scale: vec![VOL_SCALE; HORIZON],
        },
        info: BundleInfo {
            lag,
            horizon: Some(HORIZON),
        },
    }
}

fn main() -> Result<()> {
    let dir_arg = std::env::args().nth(1);
    // Follow the server's bundle naming when a config is available.
    let store = match Config::load() {
        Ok(config) => match dir_arg {
            Some(dir) => config.models.store_at(dir),
            None => config.models.store(),
        },
        Err(e) => {
            eprintln!("No usable config ({:#}); using default bundle naming", e);
            let dir = dir_arg
                .or_else(|| std::env::var("VF_MODEL_DIR").ok())
                .unwrap_or_else(|| "models".to_string());
            BundleStore::new(dir)
        }
    };

    for lag in DEMO_LAGS {
        let path = store
            .save(&demo_bundle(lag))
            .with_context(|| format!("failed to write demo bundle for lag {}", lag))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}
