pub mod api;
pub mod bundle_store;
pub mod config;
pub mod error;
pub mod indicator;
pub mod inference;
pub mod model;
pub mod volatility;
