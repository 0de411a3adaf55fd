//! Linear extrapolation of a period series

use psy_core::config::MAX_FORECAST_PERIODS;
use psy_core::numeric::{clamp, round_to};
use psy_core::{DataStatus, Error, Period, Result};
use psy_timeseries::{means, TimeSeriesPoint};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::regression::fit_linear;
use crate::types::{ConfidenceInterval, Forecast, ForecastSet};

/// Forecast parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastParameters {
    /// Half width of the band around each raw prediction
    pub half_width: f64,
    /// Percentile floor of predictions and bands
    pub lower_bound: f64,
    /// Percentile ceiling of predictions and bands
    pub upper_bound: f64,
    /// Points required before extrapolating
    pub min_points: usize,
}

impl Default for ForecastParameters {
    fn default() -> Self {
        Self {
            half_width: 10.0,
            lower_bound: 1.0,
            upper_bound: 99.0,
            min_points: 3,
        }
    }
}

impl ForecastParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.half_width.is_finite() && self.half_width >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "forecast half width must be finite and non-negative, got {}",
                self.half_width
            )));
        }
        if !(self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound < self.upper_bound)
        {
            return Err(Error::InvalidParameter(format!(
                "forecast bounds must satisfy lower ({}) < upper ({})",
                self.lower_bound, self.upper_bound
            )));
        }
        if self.min_points < 2 {
            return Err(Error::InvalidParameter(
                "forecasting needs at least 2 points".to_string(),
            ));
        }
        Ok(())
    }
}

/// Projects the OLS line of a series into future periods
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    params: ForecastParameters,
}

impl ForecastEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameters(params: ForecastParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &ForecastParameters {
        &self.params
    }

    /// Forecast `periods` steps after the last point of `series`
    ///
    /// Step `i` predicts `slope * (n - 1 + i) + intercept`. Predictions and
    /// interval bounds are clamped into `[lower_bound, upper_bound]`.
    #[instrument(skip(self, series), fields(n = series.len()))]
    pub fn forecast(
        &self,
        series: &[TimeSeriesPoint],
        periods: u32,
        period: Period,
    ) -> Result<ForecastSet> {
        if periods == 0 || periods > MAX_FORECAST_PERIODS {
            return Err(Error::validation(
                "forecastPeriods",
                periods,
                format!("must be between 1 and {MAX_FORECAST_PERIODS}"),
            ));
        }

        let n = series.len();
        let Some(last) = series.last() else {
            return Ok(ForecastSet::insufficient());
        };
        if n < self.params.min_points {
            return Ok(ForecastSet::insufficient());
        }
        let Some(fit) = fit_linear(&means(series)) else {
            return Ok(ForecastSet::insufficient());
        };

        let (lo, hi) = (self.params.lower_bound, self.params.upper_bound);
        let mut forecasts = Vec::with_capacity(periods as usize);
        for step in 1..=periods {
            let raw = fit.predict((n - 1) as f64 + f64::from(step));
            let date = period.advance(last.date, i64::from(step))?;
            forecasts.push(Forecast {
                period: step as usize,
                date,
                period_key: period.key(date),
                predicted_value: round_to(clamp(raw, lo, hi), 2),
                confidence_interval: ConfidenceInterval {
                    lower: round_to(clamp(raw - self.params.half_width, lo, hi), 2),
                    upper: round_to(clamp(raw + self.params.half_width, lo, hi), 2),
                },
            });
        }

        debug!(slope = fit.slope, horizon = periods, "forecast produced");

        Ok(ForecastSet {
            status: DataStatus::Complete,
            slope: round_to(fit.slope, 3),
            intercept: round_to(fit.intercept, 2),
            forecasts,
        })
    }
}
