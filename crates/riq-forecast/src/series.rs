//! Daily revenue aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{RevenuePoint, SalesLineItem};

/// Sum line items per business date, ascending by date.
pub fn daily_revenue(items: &[SalesLineItem]) -> Vec<RevenuePoint> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for item in items {
        *by_date.entry(item.business_date).or_insert(0.0) += item.net_sales.unwrap_or(0.0);
    }

    by_date
        .into_iter()
        .map(|(date, amount)| RevenuePoint { date, amount })
        .collect()
}
