use serde::{Deserialize, Serialize};

use super::{Regressor, Scaler};

/// Training metadata persisted next to the fitted components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleInfo {
    pub lag: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizon: Option<usize>,
}

/// A trained regressor with its paired input/output scalers, one per lag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: Regressor,
    pub scaler_x: Scaler,
    pub scaler_y: Scaler,
    pub info: BundleInfo,
}

impl ModelBundle {
    pub fn lag(&self) -> usize {
        self.info.lag
    }

    /// Check the recorded lag against the lag the bundle was looked up by,
    /// and that the components chain: `lag -> scaler_x -> model -> scaler_y`.
    pub fn validate(&self, expected_lag: usize) -> Result<(), String> {
        if self.info.lag != expected_lag {
            return Err(format!(
                "bundle records lag {} but is stored as lag {}",
                self.info.lag, expected_lag
            ));
        }
        self.scaler_x
            .validate()
            .map_err(|e| format!("input {}", e))?;
        self.scaler_y
            .validate()
            .map_err(|e| format!("output {}", e))?;
        self.model.validate().map_err(|e| e.to_string())?;

        if self.scaler_x.width() != expected_lag {
            return Err(format!(
                "input scaler covers {} values, lag is {}",
                self.scaler_x.width(),
                expected_lag
            ));
        }
        if self.model.input_width() != self.scaler_x.width() {
            return Err(format!(
                "regressor takes {} inputs, input scaler emits {}",
                self.model.input_width(),
                self.scaler_x.width()
            ));
        }
        if self.scaler_y.width() != self.model.output_width() {
            return Err(format!(
                "output scaler covers {} values, regressor emits {}",
                self.scaler_y.width(),
                self.model.output_width()
            ));
        }
        if let Some(horizon) = self.info.horizon {
            if horizon != self.model.output_width() {
                return Err(format!(
                    "bundle horizon is {}, regressor emits {}",
                    horizon,
                    self.model.output_width()
                ));
            }
        }
        Ok(())
    }
}
