//! Cadence-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod frequency;
mod intervals;
mod policy;
mod reports;

pub use config::{CadenceConfig, ColumnBindings, DisplayWindow, ForecastRequest};
pub use error::CadenceError;
pub use frequency::Frequency;
pub use intervals::IntervalSpec;
pub use policy::ImputationPolicy;
pub use reports::PreparationReport;
