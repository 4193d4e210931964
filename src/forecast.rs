//! Fits an additive time-series model to the monthly spending aggregate and
//! projects future periods with uncertainty bounds.
//!
//! The model is a least-squares linear trend over each observed bucket's
//! calendar-month offset, plus an opt-in yearly seasonal component. Fitting
//! against calendar offsets means sparse month coverage enters the fit at its
//! true spacing; gaps are neither zero-filled nor interpolated.

use serde::Serialize;

use crate::aggregate::MonthBucket;

/// Two-sided 80% normal quantile; the nominal width of the uncertainty
/// interval.
const INTERVAL_Z: f64 = 1.2816;

/// One forecast period with its point estimate and uncertainty bounds.
///
/// Invariant: `lower_bound <= point_estimate <= upper_bound`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    /// The forecast calendar month.
    pub period: MonthBucket,
    /// The central estimate of that month's spend.
    pub point_estimate: f64,
    /// The lower edge of the uncertainty interval.
    pub lower_bound: f64,
    /// The upper edge of the uncertainty interval.
    pub upper_bound: f64,
}

/// Projects `horizon` calendar months past the last observed month.
///
/// `monthly` must be chronologically ordered, as produced by
/// [crate::aggregate::aggregate_by_month]. When `yearly_seasonality` is set,
/// a per-calendar-month offset is added for months with at least two
/// observations; it is off by default upstream because a short expense
/// history rarely supports it.
///
/// Returns `None` — forecast unavailable, a degraded but non-fatal state —
/// when fewer than two months were observed or the series is degenerate
/// (all values identical). Callers proceed without the forecast.
pub fn forecast(
    monthly: &[(MonthBucket, f64)],
    horizon: usize,
    yearly_seasonality: bool,
) -> Option<Vec<ForecastPoint>> {
    let n = monthly.len();

    if n < 2 {
        tracing::debug!("Forecast unavailable: {n} observed months, need at least 2");
        return None;
    }

    let first_value = monthly[0].1;
    if monthly.iter().all(|(_, value)| *value == first_value) {
        tracing::debug!("Forecast unavailable: series is degenerate (all values identical)");
        return None;
    }

    let origin = monthly[0].0;
    let xs: Vec<f64> = monthly
        .iter()
        .map(|(month, _)| month.months_since(origin) as f64)
        .collect();
    let ys: Vec<f64> = monthly.iter().map(|(_, value)| *value).collect();

    let x_mean = xs.iter().sum::<f64>() / n as f64;
    let y_mean = ys.iter().sum::<f64>() / n as f64;

    let sxx: f64 = xs.iter().map(|x| (x - x_mean).powi(2)).sum();
    let sxy: f64 = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| (x - x_mean) * (y - y_mean))
        .sum();

    // Buckets are distinct, so sxx is positive for n >= 2.
    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;

    let detrended: Vec<f64> = xs
        .iter()
        .zip(&ys)
        .map(|(x, y)| y - (intercept + slope * x))
        .collect();

    // Seasonal offset per calendar month (index 1-12), from the mean
    // detrended value of months observed at least twice.
    let mut seasonal = [0.0f64; 13];

    if yearly_seasonality {
        for calendar_month in 1..=12u8 {
            let values: Vec<f64> = monthly
                .iter()
                .zip(&detrended)
                .filter(|((month, _), _)| month.month == calendar_month)
                .map(|(_, residual)| *residual)
                .collect();

            if values.len() >= 2 {
                seasonal[calendar_month as usize] =
                    values.iter().sum::<f64>() / values.len() as f64;
            }
        }
    }

    let residual_variance: f64 = monthly
        .iter()
        .zip(&detrended)
        .map(|((month, _), residual)| (residual - seasonal[month.month as usize]).powi(2))
        .sum::<f64>()
        / (n - 2).max(1) as f64;
    let residual_std = residual_variance.sqrt();

    let last_month = monthly[n - 1].0;
    let mut period = last_month.next();
    let mut points = Vec::with_capacity(horizon);

    for step in 1..=horizon {
        let x = period.months_since(origin) as f64;
        let point_estimate = intercept + slope * x + seasonal[period.month as usize];

        // The interval widens with the forecast step, reflecting the growing
        // extrapolation uncertainty.
        let half_width = INTERVAL_Z * residual_std * (1.0 + step as f64 / n as f64).sqrt();

        points.push(ForecastPoint {
            period,
            point_estimate,
            lower_bound: point_estimate - half_width,
            upper_bound: point_estimate + half_width,
        });

        period = period.next();
    }

    Some(points)
}
