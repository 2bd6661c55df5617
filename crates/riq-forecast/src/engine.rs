//! Revenue projection from raw line items.

use chrono::Days;

use crate::regression::fit_line;
use crate::series::daily_revenue;
use crate::{
    ForecastError, ForecastResult, Prediction, SalesLineItem, Trend, MIN_HISTORY_DAYS,
    WINDOW_DAYS,
};

/// Project daily revenue `days_ahead` days past the latest sales date.
///
/// The trend is fitted over the most recent [`WINDOW_DAYS`] distinct dates,
/// indexed sequentially, so gaps in the calendar do not stretch the x axis.
/// Predictions are clamped at zero and rounded to whole currency units.
pub fn predict_revenue(
    items: &[SalesLineItem],
    days_ahead: u32,
) -> Result<ForecastResult, ForecastError> {
    if items.is_empty() {
        return Err(ForecastError::NoData);
    }

    let history = daily_revenue(items);
    if history.len() < MIN_HISTORY_DAYS {
        return Err(ForecastError::InsufficientHistory {
            found: history.len(),
        });
    }

    let window = &history[history.len().saturating_sub(WINDOW_DAYS)..];
    let m = window.len();
    let amounts: Vec<f64> = window.iter().map(|point| point.amount).collect();
    let fit = fit_line(&amounts).ok_or(ForecastError::DegenerateSeries)?;

    let last_date = window[m - 1].date;
    let mut predictions = Vec::with_capacity(days_ahead as usize);
    for offset in 1..=days_ahead {
        let date = last_date
            .checked_add_days(Days::new(u64::from(offset)))
            .ok_or(ForecastError::DateOutOfRange)?;
        let x = (m - 1) as f64 + f64::from(offset);
        let amount = fit.value_at(x).max(0.0);
        predictions.push(Prediction {
            date,
            predicted_revenue: amount.round() as i64,
        });
    }

    let trend = Trend::from_slope(fit.slope);
    let summary = format!(
        "Forecast based on {m} days of history. Revenue trend is {trend} (~${}/day).",
        fit.slope.round().abs()
    );

    Ok(ForecastResult {
        window_size: m,
        slope: fit.slope,
        intercept: fit.intercept,
        trend,
        summary,
        predictions,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::DEFAULT_DAYS_AHEAD;

    fn series(start: NaiveDate, amounts: &[f64]) -> Vec<SalesLineItem> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, &amount)| {
                SalesLineItem::new(start + Days::new(i as u64), amount)
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn recovers_synthetic_line() {
        let amounts: Vec<f64> = (0..20).map(|i| 500.0 + 25.0 * i as f64).collect();
        let result = predict_revenue(&series(date(2026, 3, 1), &amounts), 7).unwrap();

        assert_eq!(result.window_size, 20);
        assert!((result.slope - 25.0).abs() < 1e-6 * 25.0);
        assert!((result.intercept - 500.0).abs() < 1e-6 * 500.0);
        assert_eq!(result.trend, Trend::Increasing);
        assert_eq!(result.predictions[0].predicted_revenue, 1000);
        assert_eq!(
            result.summary,
            "Forecast based on 20 days of history. Revenue trend is increasing (~$25/day)."
        );
    }

    #[test]
    fn prediction_dates_are_consecutive_after_last_date() {
        // Runs across a month and a year boundary.
        let start = date(2025, 12, 20);
        let amounts = [100.0; 12];
        let result = predict_revenue(&series(start, &amounts), 10).unwrap();

        let last = date(2025, 12, 31);
        let dates: Vec<NaiveDate> = result.predictions.iter().map(|p| p.date).collect();
        let expected: Vec<NaiveDate> = (1..=10).map(|i| last + Days::new(i)).collect();
        assert_eq!(dates, expected);
        assert_eq!(dates[0], date(2026, 1, 1));
    }

    #[test]
    fn predictions_never_negative() {
        let amounts: Vec<f64> = (0..10).map(|i| 300.0 - 80.0 * i as f64).collect();
        let result = predict_revenue(&series(date(2026, 2, 1), &amounts), 14).unwrap();

        assert_eq!(result.trend, Trend::Decreasing);
        assert!(result.predictions.iter().all(|p| p.predicted_revenue >= 0));
        assert_eq!(result.predictions.last().unwrap().predicted_revenue, 0);
    }

    #[test]
    fn negative_history_is_clamped() {
        let result = predict_revenue(&series(date(2026, 2, 1), &[-50.0; 6]), 3).unwrap();
        assert!(result.predictions.iter().all(|p| p.predicted_revenue == 0));
    }

    #[test]
    fn fewer_than_five_dates_is_insufficient() {
        // Many rows, but only four distinct dates.
        let mut items = series(date(2026, 1, 1), &[10.0, 20.0, 30.0, 40.0]);
        items.extend(series(date(2026, 1, 1), &[1.0, 2.0, 3.0, 4.0]));

        let err = predict_revenue(&items, 7).unwrap_err();
        assert_eq!(err, ForecastError::InsufficientHistory { found: 4 });
    }

    #[test]
    fn empty_input_is_no_data() {
        assert_eq!(predict_revenue(&[], 7).unwrap_err(), ForecastError::NoData);
    }

    #[test]
    fn window_keeps_most_recent_ninety_days() {
        // 30 flat days at 10_000 followed by 90 days rising from zero.
        let mut amounts = vec![10_000.0; 30];
        amounts.extend((0..90).map(|i| 20.0 * i as f64));
        let start = date(2025, 6, 1);
        let result = predict_revenue(&series(start, &amounts), 1).unwrap();

        assert_eq!(result.window_size, WINDOW_DAYS);
        assert!((result.slope - 20.0).abs() < 1e-6 * 20.0);
        assert!(result.intercept.abs() < 1e-6);
        assert_eq!(
            result.predictions[0].date,
            start + Days::new(amounts.len() as u64)
        );
    }

    #[test]
    fn small_slope_is_stable() {
        let amounts: Vec<f64> = (0..8).map(|i| 1000.0 + 5.0 * i as f64).collect();
        let result =
            predict_revenue(&series(date(2026, 4, 1), &amounts), DEFAULT_DAYS_AHEAD).unwrap();
        assert_eq!(result.trend, Trend::Stable);
        assert_eq!(result.predictions.len(), 7);
    }

    #[test]
    fn non_finite_amounts_are_degenerate() {
        let amounts = [10.0, 20.0, f64::NAN, 40.0, 50.0];
        let err = predict_revenue(&series(date(2026, 4, 1), &amounts), 7).unwrap_err();
        assert_eq!(err, ForecastError::DegenerateSeries);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let amounts: Vec<f64> = (0..30).map(|i| 700.0 + (i % 7) as f64 * 40.0).collect();
        let items = series(date(2026, 5, 1), &amounts);
        assert_eq!(predict_revenue(&items, 7), predict_revenue(&items, 7));
    }

    #[test]
    fn zero_days_ahead_gives_no_predictions() {
        let result = predict_revenue(&series(date(2026, 4, 1), &[1.0; 5]), 0).unwrap();
        assert!(result.predictions.is_empty());
    }

    #[test]
    fn result_serializes_with_iso_dates() {
        let result = predict_revenue(&series(date(2026, 4, 1), &[100.0; 5]), 1).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["trend"], "stable");
        assert_eq!(json["predictions"][0]["date"], "2026-04-06");
        assert_eq!(json["predictions"][0]["predicted_revenue"], 100);
    }
}
