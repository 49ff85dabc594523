use serde::{Deserialize, Serialize};

use super::ModelError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Logistic,
    Identity,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Logistic => 1.0 / (1.0 + (-x).exp()),
            Self::Identity => x,
        }
    }
}

/// Fully-connected layer. `weights[i][j]` connects input `i` to output `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    pub fn input_width(&self) -> usize {
        self.weights.len()
    }

    pub fn output_width(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64]) -> Vec<f64> {
        let mut out = self.biases.clone();
        for (x, row) in input.iter().zip(&self.weights) {
            for (o, w) in out.iter_mut().zip(row) {
                *o += x * w;
            }
        }
        out
    }
}

/// Fitted multi-output regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Regressor {
    /// Feed-forward network; hidden layers use `activation`, the output layer is linear.
    Mlp {
        #[serde(default)]
        activation: Activation,
        layers: Vec<DenseLayer>,
    },
    /// `coef[j][i]` maps input `i` to output `j`.
    Linear {
        coef: Vec<Vec<f64>>,
        intercept: Vec<f64>,
    },
}

impl Regressor {
    pub fn input_width(&self) -> usize {
        match self {
            Self::Mlp { layers, .. } => layers.first().map(DenseLayer::input_width).unwrap_or(0),
            Self::Linear { coef, .. } => coef.first().map(Vec::len).unwrap_or(0),
        }
    }

    pub fn output_width(&self) -> usize {
        match self {
            Self::Mlp { layers, .. } => layers.last().map(DenseLayer::output_width).unwrap_or(0),
            Self::Linear { intercept, .. } => intercept.len(),
        }
    }

    /// Check that layer shapes chain together.
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            Self::Mlp { layers, .. } => {
                if layers.is_empty() {
                    return Err(ModelError::Empty("mlp regressor"));
                }
                let mut width = layers[0].input_width();
                for (idx, layer) in layers.iter().enumerate() {
                    if layer.input_width() != width {
                        return Err(ModelError::Malformed {
                            component: "mlp regressor",
                            reason: format!(
                                "layer {} takes {} inputs, previous layer emits {}",
                                idx,
                                layer.input_width(),
                                width
                            ),
                        });
                    }
                    if let Some(row) = layer
                        .weights
                        .iter()
                        .find(|row| row.len() != layer.output_width())
                    {
                        return Err(ModelError::Malformed {
                            component: "mlp regressor",
                            reason: format!(
                                "layer {} has a weight row of {} values for {} outputs",
                                idx,
                                row.len(),
                                layer.output_width()
                            ),
                        });
                    }
                    width = layer.output_width();
                }
                Ok(())
            }
            Self::Linear { coef, intercept } => {
                if coef.is_empty() {
                    return Err(ModelError::Empty("linear regressor"));
                }
                if coef.len() != intercept.len() {
                    return Err(ModelError::Malformed {
                        component: "linear regressor",
                        reason: format!(
                            "{} coefficient rows for {} intercepts",
                            coef.len(),
                            intercept.len()
                        ),
                    });
                }
                let n_in = coef[0].len();
                if coef.iter().any(|row| row.len() != n_in) {
                    return Err(ModelError::Malformed {
                        component: "linear regressor",
                        reason: "coefficient rows differ in width".to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    /// Predict a single row.
    pub fn predict(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.validate()?;
        if row.len() != self.input_width() {
            return Err(ModelError::WidthMismatch {
                component: "regressor",
                expected: self.input_width(),
                got: row.len(),
            });
        }
        let out = match self {
            Self::Mlp { activation, layers } => {
                let last = layers.len() - 1;
                let mut h = row.to_vec();
                for (idx, layer) in layers.iter().enumerate() {
                    h = layer.forward(&h);
                    if idx != last {
                        h.iter_mut().for_each(|v| *v = activation.apply(*v));
                    }
                }
                h
            }
            Self::Linear { coef, intercept } => coef
                .iter()
                .zip(intercept)
                .map(|(w, b)| b + w.iter().zip(row).map(|(w, x)| w * x).sum::<f64>())
                .collect(),
        };
        if out.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite("regressor"));
        }
        Ok(out)
    }
}
