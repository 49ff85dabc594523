use serde::{Deserialize, Serialize};

use super::ModelError;

/// Fitted per-column normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

impl Scaler {
    /// Identity scaler of the given width.
    pub fn identity(width: usize) -> Self {
        Self::Standard {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    pub fn width(&self) -> usize {
        match self {
            Self::Standard { mean, .. } => mean.len(),
            Self::MinMax { min, .. } => min.len(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        let (a, b) = match self {
            Self::Standard { mean, scale } => (mean.len(), scale.len()),
            Self::MinMax { min, scale } => (min.len(), scale.len()),
        };
        if a == 0 {
            return Err(ModelError::Empty("scaler"));
        }
        if a != b {
            return Err(ModelError::Malformed {
                component: "scaler",
                reason: format!("offset width {} != scale width {}", a, b),
            });
        }
        Ok(())
    }

    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_width(row)?;
        let out = match self {
            Self::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / nonzero(*s))
                .collect(),
            Self::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };
        Ok(out)
    }

    pub fn inverse_transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_width(row)?;
        let out = match self {
            Self::Standard { mean, scale } => row
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| x * nonzero(*s) + m)
                .collect(),
            Self::MinMax { min, scale } => row
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / nonzero(*s))
                .collect(),
        };
        Ok(out)
    }

    fn check_width(&self, row: &[f64]) -> Result<(), ModelError> {
        self.validate()?;
        if row.len() != self.width() {
            return Err(ModelError::WidthMismatch {
                component: "scaler",
                expected: self.width(),
                got: row.len(),
            });
        }
        Ok(())
    }
}

// Constant columns are fitted with a zero scale; treat them as unscaled.
fn nonzero(s: f64) -> f64 {
    if s == 0.0 {
        1.0
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_transform_and_inverse() {
        let sc = Scaler::Standard {
            mean: vec![1.0, 2.0],
            scale: vec![2.0, 0.5],
        };
        let t = sc.transform(&[3.0, 3.0]).unwrap();
        assert_eq!(t, vec![1.0, 2.0]);
        let back = sc.inverse_transform(&t).unwrap();
        assert_eq!(back, vec![3.0, 3.0]);
    }

    #[test]
    fn min_max_transform_and_inverse() {
        let sc = Scaler::MinMax {
            min: vec![-1.0],
            scale: vec![4.0],
        };
        assert_eq!(sc.transform(&[0.5]).unwrap(), vec![1.0]);
        assert_eq!(sc.inverse_transform(&[1.0]).unwrap(), vec![0.5]);
    }

    #[test]
    fn zero_scale_is_ignored() {
        let sc = Scaler::Standard {
            mean: vec![2.0],
            scale: vec![0.0],
        };
        assert_eq!(sc.transform(&[5.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn width_mismatch_is_rejected() {
        let sc = Scaler::identity(3);
        let err = sc.transform(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ModelError::WidthMismatch {
                component: "scaler",
                expected: 3,
                got: 1
            }
        );
    }

    #[test]
    fn deserializes_tagged_json() {
        let sc: Scaler =
            serde_json::from_str(r#"{"kind":"min_max","min":[0.0],"scale":[2.0]}"#).unwrap();
        assert_eq!(sc.width(), 1);
        assert!(sc.validate().is_ok());
    }

    #[test]
    fn ragged_parameters_fail_both_directions() {
        let sc = Scaler::Standard {
            mean: vec![0.0; 7],
            scale: vec![1.0; 5],
        };
        let row = vec![0.3; 7];
        assert!(matches!(
            sc.transform(&row),
            Err(ModelError::Malformed { .. })
        ));
        assert!(matches!(
            sc.inverse_transform(&row),
            Err(ModelError::Malformed { .. })
        ));
    }

    #[test]
    fn validate_rejects_ragged_parameters() {
        let sc = Scaler::Standard {
            mean: vec![0.0, 0.0],
            scale: vec![1.0],
        };
        assert!(sc.validate().is_err());
    }
}
