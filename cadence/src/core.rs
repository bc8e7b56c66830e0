use std::sync::Arc;

use cadence_core::{
    CadenceConfig, CadenceError, ColumnBindings, ForecastRequest, Forecaster, ImputationPolicy,
};

/// Orchestrator that prepares series and hands them to a forecaster.
pub struct Cadence {
    pub(crate) forecaster: Arc<dyn Forecaster>,
    pub(crate) cfg: CadenceConfig,
}

/// Builder for constructing a `Cadence` orchestrator with custom configuration.
pub struct CadenceBuilder {
    forecaster: Option<Arc<dyn Forecaster>>,
    cfg: CadenceConfig,
}

impl Default for CadenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CadenceBuilder {
    /// Create a new builder with sensible defaults.
    ///
    /// Behavior and trade-offs:
    /// - Starts with no forecaster; you must register one via [`with_forecaster`].
    /// - Defaults: 30s forecaster timeout, intervals only for groups with at
    ///   least 25 prepared rows, forward-then-backward fill.
    ///
    /// [`with_forecaster`]: CadenceBuilder::with_forecaster
    #[must_use]
    pub fn new() -> Self {
        Self {
            forecaster: None,
            cfg: CadenceConfig::default(),
        }
    }

    /// Register the forecasting backend.
    ///
    /// Registering again replaces the previous forecaster.
    #[must_use]
    pub fn with_forecaster(mut self, f: Arc<dyn Forecaster>) -> Self {
        self.forecaster = Some(f);
        self
    }

    /// Set the forecaster call timeout.
    ///
    /// Behavior and trade-offs:
    /// - Bounds the only suspending step of a run. On expiry the run fails with
    ///   `ForecasterTimeout`; preparation work is discarded.
    #[must_use]
    pub const fn forecaster_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.cfg.forecaster_timeout = timeout;
        self
    }

    /// Set the shortest prepared group that still receives prediction intervals.
    ///
    /// Behavior and trade-offs:
    /// - Shorter runs drop requested levels and forecast point values only,
    ///   with a warning in the report. Quantiles are never dropped.
    /// - `0` disables the downgrade.
    #[must_use]
    pub const fn min_interval_history(mut self, rows: usize) -> Self {
        self.cfg.min_interval_history = rows;
        self
    }

    /// Set the policy used by [`Cadence::new_request`].
    #[must_use]
    pub const fn default_policy(mut self, policy: ImputationPolicy) -> Self {
        self.cfg.default_policy = policy;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: CadenceConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the `Cadence` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no forecaster has been registered via
    /// [`with_forecaster`], or the timeout is zero.
    ///
    /// [`with_forecaster`]: CadenceBuilder::with_forecaster
    pub fn build(self) -> Result<Cadence, CadenceError> {
        let Some(forecaster) = self.forecaster else {
            return Err(CadenceError::InvalidArg(
                "no forecaster registered; add one via with_forecaster(...)".to_string(),
            ));
        };
        if self.cfg.forecaster_timeout.is_zero() {
            return Err(CadenceError::InvalidArg(
                "forecaster_timeout must be non-zero".to_string(),
            ));
        }
        Ok(Cadence {
            forecaster,
            cfg: self.cfg,
        })
    }
}

/// Attribute a forecaster failure to the forecaster that produced it.
///
/// Errors that already name their origin, and preparation errors the
/// forecaster may echo back, pass through unchanged.
pub(crate) fn tag_err(forecaster: &str, e: CadenceError) -> CadenceError {
    match e {
        e @ (CadenceError::Forecaster { .. }
        | CadenceError::ForecasterTimeout { .. }
        | CadenceError::AmbiguousFrequency { .. }
        | CadenceError::InvalidFrequency { .. }
        | CadenceError::UnfillableSeries { .. }
        | CadenceError::ConflictingIntervalSpec) => e,
        other => CadenceError::Forecaster {
            forecaster: forecaster.to_string(),
            msg: other.to_string(),
        },
    }
}

impl Cadence {
    /// Wrap a forecaster future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cadence::core::forecaster_call_with_timeout",
            skip(fut),
            fields(
                forecaster = forecaster_name,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn forecaster_call_with_timeout<T, Fut>(
        forecaster_name: &'static str,
        timeout: std::time::Duration,
        fut: Fut,
    ) -> Result<T, CadenceError>
    where
        Fut: core::future::Future<Output = Result<T, CadenceError>>,
    {
        (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
            #[cfg(feature = "tracing")]
            tracing::warn!(forecaster = forecaster_name, "forecaster call timed out");
            Err(CadenceError::forecaster_timeout(forecaster_name))
        })
    }

    /// Start building a new `Cadence` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let cadence = cadence::Cadence::builder()
    ///     .with_forecaster(Arc::new(cadence_mock::MockForecaster::new()))
    ///     .forecaster_timeout(Duration::from_secs(10))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> CadenceBuilder {
        CadenceBuilder::new()
    }

    /// A request with default settings, the configured default policy, and
    /// the given column bindings.
    #[must_use]
    pub fn new_request(&self, columns: ColumnBindings) -> ForecastRequest {
        ForecastRequest::new(columns).with_imputation(Some(self.cfg.default_policy))
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CadenceConfig {
        &self.cfg
    }

    /// Name of the registered forecaster.
    #[must_use]
    pub fn forecaster_name(&self) -> &'static str {
        self.forecaster.name()
    }
}
