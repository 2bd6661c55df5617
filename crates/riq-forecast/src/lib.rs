//! Revenue forecasting for RestaurantIQ.
//!
//! Aggregates raw sales line items into a per-day revenue series and
//! projects it forward with an ordinary least squares trend line fitted
//! over the most recent window of days. Everything here is a pure
//! function of its inputs; fetching the line items is the caller's job.

mod engine;
mod regression;
mod series;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use engine::predict_revenue;
pub use regression::{fit_line, LinearFit};
pub use series::daily_revenue;

/// Fewer distinct days than this and no trend is fitted.
pub const MIN_HISTORY_DAYS: usize = 5;
/// Only the most recent days of history feed the regression.
pub const WINDOW_DAYS: usize = 90;
/// Slope (currency per day) beyond which the trend is no longer `stable`.
pub const TREND_THRESHOLD: f64 = 10.0;
pub const DEFAULT_DAYS_AHEAD: u32 = 7;

/// One row of the sales line items collection, as read from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesLineItem {
    pub business_date: NaiveDate,
    /// Null amounts count as zero.
    #[serde(default)]
    pub net_sales: Option<f64>,
}

impl SalesLineItem {
    pub fn new(business_date: NaiveDate, net_sales: f64) -> Self {
        Self {
            business_date,
            net_sales: Some(net_sales),
        }
    }
}

/// Total revenue for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_THRESHOLD {
            Self::Increasing
        } else if slope < -TREND_THRESHOLD {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projected revenue for one future day, rounded to a whole currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub date: NaiveDate,
    pub predicted_revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Number of days of history the trend was fitted on.
    pub window_size: usize,
    pub slope: f64,
    pub intercept: f64,
    pub trend: Trend,
    pub summary: String,
    pub predictions: Vec<Prediction>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("no sales data found to generate a forecast")]
    NoData,

    #[error("insufficient history: {found} days of sales data, at least {MIN_HISTORY_DAYS} needed")]
    InsufficientHistory { found: usize },

    #[error("degenerate series: revenue history does not define a trend")]
    DegenerateSeries,

    #[error("forecast dates fall outside the supported calendar range")]
    DateOutOfRange,
}
