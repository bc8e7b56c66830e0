//! End-to-end runs: preparation, the forecaster call, and result shaping.
mod forecast;
mod prepare;

pub use forecast::ForecastReport;
pub use prepare::PreparedSeries;
