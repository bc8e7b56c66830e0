use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cadence_core::{CadenceError, ForecastInput, ForecastTable, Forecaster};

use crate::naive_forecast;

/// Instruction for how a forecast call should behave for a given model.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(CadenceError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    forecast_rules: HashMap<String, MockBehavior<ForecastTable>>,
    requests: Vec<ForecastInput>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `forecast` calls naming a specific model.
    pub async fn set_forecast_behavior(
        &self,
        model: impl Into<String>,
        behavior: MockBehavior<ForecastTable>,
    ) {
        let mut guard = self.state.lock().await;
        guard.forecast_rules.insert(model.into(), behavior);
    }

    /// Inputs received so far, in call order.
    pub async fn requests(&self) -> Vec<ForecastInput> {
        self.state.lock().await.requests.clone()
    }

    /// Number of forecast calls received so far.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }
}

/// Forecaster whose behavior is scripted per model through a
/// [`DynamicMockController`]. Models without a rule fall back to the naive
/// last-value forecast.
pub struct DynamicMockForecaster {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockForecaster {
    /// Create a mock forecaster and the controller that scripts it.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<Self>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let forecaster = Arc::new(Self {
            name,
            state: Arc::clone(&state),
        });
        (forecaster, DynamicMockController { state })
    }
}

#[async_trait]
impl Forecaster for DynamicMockForecaster {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn forecast(&self, input: ForecastInput) -> Result<ForecastTable, CadenceError> {
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.requests.push(input.clone());
            guard.forecast_rules.get(&input.model).cloned()
        };
        match behavior {
            Some(MockBehavior::Return(table)) => Ok(table),
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            None => naive_forecast(&input),
        }
    }
}
