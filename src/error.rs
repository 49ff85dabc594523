use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Step of the inference pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStage {
    Scaling,
    Prediction,
    InverseScaling,
}

impl fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Scaling => "scaling",
            Self::Prediction => "prediction",
            Self::InverseScaling => "inverse scaling",
        };
        f.write_str(label)
    }
}

#[derive(Error, Debug)]
pub enum ForecastError {
    #[error("no model found for lag {lag}")]
    NotFound { lag: usize },

    #[error("{0}")]
    InvalidInput(String),

    #[error("internal error during inference ({stage}): {reason}")]
    Inference {
        stage: InferenceStage,
        reason: String,
    },

    #[error("invalid model bundle {}: {reason}", .path.display())]
    Bundle { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ForecastError {
    pub fn inference(stage: InferenceStage, reason: impl Into<String>) -> Self {
        Self::Inference {
            stage,
            reason: reason.into(),
        }
    }

    /// HTTP status code the error maps to.
    pub fn status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidInput(_) => 400,
            Self::Inference { .. } | Self::Bundle { .. } | Self::Io(_) => 500,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForecastError>;
