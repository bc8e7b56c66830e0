//! Re-export of foundational types from `cadence-types`.
// Consolidated re-exports so downstream crates can depend on `cadence-core` only

pub use cadence_types::{
    CadenceConfig, CadenceError, ColumnBindings, DisplayWindow, ForecastRequest, Frequency,
    ImputationPolicy, IntervalSpec, PreparationReport,
};
