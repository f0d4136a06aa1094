use tracing::debug;

use crate::model::Forecast;

/// Periods kept by default: today and tonight.
pub const DEFAULT_PERIODS_KEPT: usize = 2;

/// Keep only the first `keep` periods; every other field passes through.
pub fn reduce(mut forecast: Forecast, keep: usize) -> Forecast {
    let original = forecast.properties.periods.len();
    forecast.properties.periods.truncate(keep);
    debug!(
        original,
        kept = forecast.properties.periods.len(),
        "reduced forecast periods"
    );
    forecast
}
