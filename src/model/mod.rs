pub mod bundle;
pub mod regressor;
pub mod scaler;

use thiserror::Error;

pub use bundle::{BundleInfo, ModelBundle};
pub use regressor::{Activation, DenseLayer, Regressor};
pub use scaler::Scaler;

/// Shape or numeric failure inside a fitted model component.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{component} expects {expected} values, got {got}")]
    WidthMismatch {
        component: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} has no parameters")]
    Empty(&'static str),

    #[error("{component} is malformed: {reason}")]
    Malformed {
        component: &'static str,
        reason: String,
    },

    #[error("{0} produced a non-finite value")]
    NonFinite(&'static str),
}
