use crate::{CadenceError, ForecastTable};

/// Lower/upper column pair resolved for one confidence level.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalColumns {
    /// Requested confidence level (percent).
    pub level: f64,
    /// Lower-bound column name.
    pub lower: String,
    /// Upper-bound column name.
    pub upper: String,
}

/// Column resolved for one quantile.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileColumn {
    /// Requested quantile in `(0, 1)`.
    pub quantile: f64,
    /// Column name.
    pub column: String,
}

/// Outcome of resolving requested levels or quantiles against a result table.
///
/// Unresolvable requests are reported, never silently dropped; what did
/// resolve stays usable.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnResolution<T> {
    /// Resolved entries in ascending request order.
    pub resolved: Vec<T>,
    /// One `UnresolvableColumn` per request with no matching column.
    pub unresolved: Vec<CadenceError>,
}

impl<T> ColumnResolution<T> {
    /// Returns `true` if every request resolved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

impl<T> Default for ColumnResolution<T> {
    fn default() -> Self {
        Self {
            resolved: Vec::new(),
            unresolved: Vec::new(),
        }
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v.dedup();
    v
}

/// Candidate renderings of a level: integer form first when the level has no
/// fractional part, then the float literal.
fn level_renderings(level: f64) -> Vec<String> {
    let float = format!("{level:?}");
    if level.fract() == 0.0 && level.is_finite() {
        vec![format!("{level:.0}"), float]
    } else {
        vec![float]
    }
}

/// Canonical `(lower, upper)` column names for a level, as a forecaster
/// should emit them.
#[must_use]
pub fn interval_column_names(point_col: &str, level: f64) -> (String, String) {
    let rendered = level_renderings(level).swap_remove(0);
    (
        format!("{point_col}-lo-{rendered}"),
        format!("{point_col}-hi-{rendered}"),
    )
}

/// Map each confidence level to its `<point>-lo-<level>` / `<point>-hi-<level>`
/// columns.
///
/// An integral level is first looked up in integer form (`80`), then in float
/// form (`80.0`). Both bounds must exist under the same rendering.
#[must_use]
pub fn resolve_interval_columns(
    table: &ForecastTable,
    point_col: &str,
    levels: &[f64],
) -> ColumnResolution<IntervalColumns> {
    let mut out = ColumnResolution::default();
    for level in sorted(levels) {
        let mut tried: Vec<String> = Vec::new();
        let mut found: Option<IntervalColumns> = None;
        for rendered in level_renderings(level) {
            let lower = format!("{point_col}-lo-{rendered}");
            let upper = format!("{point_col}-hi-{rendered}");
            if table.has_column(&lower) && table.has_column(&upper) {
                found = Some(IntervalColumns {
                    level,
                    lower,
                    upper,
                });
                break;
            }
            tried.push(lower);
            tried.push(upper);
        }
        match found {
            Some(cols) => out.resolved.push(cols),
            None => out
                .unresolved
                .push(CadenceError::unresolvable(format!("level {level}"), tried)),
        }
    }
    out
}

/// Column name for a quantile: `<point>-q-<round(100*q)>`.
///
/// The percentage is rounded half away from zero (`f64::round`), not half to
/// even and not truncated: `0.125` maps to `q-13`, `0.1` to `q-10`.
/// Forecasters must emit names with the same rounding to be resolved.
#[must_use]
pub fn quantile_column_name(point_col: &str, quantile: f64) -> String {
    format!("{point_col}-q-{:.0}", (quantile * 100.0).round())
}

/// Map each quantile to its `<point>-q-<percent>` column.
#[must_use]
pub fn resolve_quantile_columns(
    table: &ForecastTable,
    point_col: &str,
    quantiles: &[f64],
) -> ColumnResolution<QuantileColumn> {
    let mut out = ColumnResolution::default();
    for quantile in sorted(quantiles) {
        let column = quantile_column_name(point_col, quantile);
        if table.has_column(&column) {
            out.resolved.push(QuantileColumn { quantile, column });
        } else {
            out.unresolved.push(CadenceError::unresolvable(
                format!("quantile {quantile}"),
                vec![column],
            ));
        }
    }
    out
}
