pub mod ewm_std;
pub mod rolling_std;

pub use ewm_std::EwmStd;
pub use rolling_std::RollingStd;
