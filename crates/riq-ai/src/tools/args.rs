//! Typed tool arguments.
//!
//! Model-supplied arguments are untrusted. Each tool's arguments are
//! decoded into a struct that rejects unknown keys and malformed IDs or
//! dates, then checked for value ranges before anything reaches the
//! backend.

use chrono::NaiveDate;
use riq_forecast::DEFAULT_DAYS_AHEAD;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::catalog::names;

/// Longest horizon a forecast tool accepts.
pub const MAX_DAYS_AHEAD: u32 = 365;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgsError {
    #[error("unknown tool")]
    UnknownTool(String),

    #[error("invalid arguments for {tool}: {reason}")]
    Invalid { tool: String, reason: String },
}

impl ArgsError {
    fn invalid(tool: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }
}

/// Accepts `7` and `7.0`; rejects fractions, negatives and non-numbers.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(number)) => {
            if let Some(n) = number.as_u64() {
                return u32::try_from(n)
                    .map(Some)
                    .map_err(|_| D::Error::custom(format!("{n} is too large")));
            }
            match number.as_f64() {
                Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
                    Ok(Some(f as u32))
                }
                _ => Err(D::Error::custom(format!(
                    "expected a non-negative whole number, got {number}"
                ))),
            }
        }
        Some(other) => Err(D::Error::custom(format!(
            "expected a whole number, got {other}"
        ))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NoArgs {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_reference_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevenueTrendArgs {
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub p_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DailyAnalyticsArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_business_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BomArgs {
    pub p_menu_item_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientSearchArgs {
    pub ingredient_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemSearchArgs {
    pub item_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReceiveInventoryArgs {
    pub p_ingredient_id: Uuid,
    pub p_qty: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CountInventoryArgs {
    pub p_ingredient_id: Uuid,
    pub p_actual_qty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateForecastArgs {
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub p_days_ahead: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p_reference_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredictRevenueArgs {
    #[serde(
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub days_ahead: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpsertBomArgs {
    pub p_menu_item_id: Uuid,
    pub p_ingredient_id: Uuid,
    pub p_qty_per_item: f64,
}

/// Decoded arguments, one variant per catalog tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolArgs {
    InventorySnapshot,
    Forecast(ForecastArgs),
    RevenueTrend(RevenueTrendArgs),
    DailyAnalytics(DailyAnalyticsArgs),
    Bom(BomArgs),
    SearchIngredient(IngredientSearchArgs),
    SearchMenuItem(MenuItemSearchArgs),
    ReceiveInventory(ReceiveInventoryArgs),
    CountInventory(CountInventoryArgs),
    GenerateForecast(GenerateForecastArgs),
    PredictRevenue(PredictRevenueArgs),
    UpsertBom(UpsertBomArgs),
}

fn decode<T: DeserializeOwned>(tool: &str, value: Value) -> Result<T, ArgsError> {
    serde_json::from_value(value).map_err(|e| ArgsError::invalid(tool, e.to_string()))
}

fn effective_days(days: Option<u32>) -> u32 {
    match days {
        None | Some(0) => DEFAULT_DAYS_AHEAD,
        Some(days) => days,
    }
}

impl ToolArgs {
    /// Decode and range-check the arguments for `tool`.
    pub fn parse(tool: &str, arguments: &Map<String, Value>) -> Result<Self, ArgsError> {
        let value = Value::Object(arguments.clone());
        let args = match tool {
            names::GET_INVENTORY_SNAPSHOT => {
                decode::<NoArgs>(tool, value)?;
                Self::InventorySnapshot
            }
            names::GET_FORECAST => Self::Forecast(decode(tool, value)?),
            names::GET_REVENUE_TREND => Self::RevenueTrend(decode(tool, value)?),
            names::GET_DAILY_ANALYTICS => Self::DailyAnalytics(decode(tool, value)?),
            names::GET_BOM_FOR_ITEM => Self::Bom(decode(tool, value)?),
            names::SEARCH_INGREDIENT => Self::SearchIngredient(decode(tool, value)?),
            names::SEARCH_MENU_ITEM => Self::SearchMenuItem(decode(tool, value)?),
            names::RECEIVE_INVENTORY => Self::ReceiveInventory(decode(tool, value)?),
            names::COUNT_INVENTORY => Self::CountInventory(decode(tool, value)?),
            names::GENERATE_FORECAST => Self::GenerateForecast(decode(tool, value)?),
            names::PREDICT_REVENUE => Self::PredictRevenue(decode(tool, value)?),
            names::UPSERT_BOM_ENTRY => Self::UpsertBom(decode(tool, value)?),
            other => return Err(ArgsError::UnknownTool(other.to_string())),
        };
        args.check(tool)?;
        Ok(args)
    }

    fn check(&self, tool: &str) -> Result<(), ArgsError> {
        let positive = |field: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ArgsError::invalid(
                    tool,
                    format!("{field} must be greater than zero, got {value}"),
                ))
            }
        };
        let horizon = |field: &str, days: Option<u32>| match days {
            Some(days) if days > MAX_DAYS_AHEAD => Err(ArgsError::invalid(
                tool,
                format!("{field} must be at most {MAX_DAYS_AHEAD}, got {days}"),
            )),
            _ => Ok(()),
        };

        match self {
            Self::ReceiveInventory(args) => positive("p_qty", args.p_qty),
            Self::CountInventory(args) => {
                if args.p_actual_qty.is_finite() && args.p_actual_qty >= 0.0 {
                    Ok(())
                } else {
                    Err(ArgsError::invalid(
                        tool,
                        format!("p_actual_qty must not be negative, got {}", args.p_actual_qty),
                    ))
                }
            }
            Self::UpsertBom(args) => positive("p_qty_per_item", args.p_qty_per_item),
            Self::GenerateForecast(args) => horizon("p_days_ahead", args.p_days_ahead),
            Self::PredictRevenue(args) => horizon("days_ahead", args.days_ahead),
            Self::SearchIngredient(_) | Self::SearchMenuItem(_) => match self.search_term() {
                Some(term) if !term.is_empty() => Ok(()),
                _ => Err(ArgsError::invalid(tool, "search term must not be empty")),
            },
            _ => Ok(()),
        }
    }

    /// Trimmed search term, for the name-search tools.
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Self::SearchIngredient(args) => Some(args.ingredient_name.trim()),
            Self::SearchMenuItem(args) => Some(args.item_name.trim()),
            _ => None,
        }
    }

    /// Forecast horizon with the default applied to a missing or zero value.
    pub fn days_ahead(&self) -> Option<u32> {
        match self {
            Self::GenerateForecast(args) => Some(effective_days(args.p_days_ahead)),
            Self::PredictRevenue(args) => Some(effective_days(args.days_ahead)),
            _ => None,
        }
    }

    /// Parameter object for a backend procedure call.
    pub fn to_params(&self) -> Result<Value, ArgsError> {
        let encoded = match self {
            Self::InventorySnapshot => Ok(Value::Object(Map::new())),
            Self::Forecast(args) => serde_json::to_value(args),
            Self::RevenueTrend(args) => serde_json::to_value(args),
            Self::DailyAnalytics(args) => serde_json::to_value(args),
            Self::Bom(args) => serde_json::to_value(args),
            Self::SearchIngredient(args) => serde_json::to_value(args),
            Self::SearchMenuItem(args) => serde_json::to_value(args),
            Self::ReceiveInventory(args) => serde_json::to_value(args),
            Self::CountInventory(args) => serde_json::to_value(args),
            Self::GenerateForecast(args) => serde_json::to_value(GenerateForecastArgs {
                p_days_ahead: Some(effective_days(args.p_days_ahead)),
                p_reference_date: args.p_reference_date,
            }),
            Self::PredictRevenue(args) => serde_json::to_value(args),
            Self::UpsertBom(args) => serde_json::to_value(args),
        };
        encoded.map_err(|e| ArgsError::invalid("arguments", e.to_string()))
    }
}
