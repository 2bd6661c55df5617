//! Validates model tool calls and routes them to their handlers.

use std::sync::Arc;

use riq_backend::{fetch_all, Backend, BackendError, SearchQuery};
use riq_forecast::{predict_revenue, ForecastError, SalesLineItem};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::args::{ArgsError, ToolArgs};
use super::catalog::{Handler, ToolCatalog, ToolDefinition, SALES_COLLECTION, SALES_COLUMNS};
use super::result::ToolResult;

#[derive(Debug, thiserror::Error)]
enum DispatchError {
    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Args(#[from] ArgsError),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    Forecast(#[from] ForecastError),
    #[error("malformed sales rows: {0}")]
    SalesRows(String),
    #[error("failed to encode forecast: {0}")]
    Encode(String),
}

/// Executes catalog tools against the data backend.
///
/// Never fails outward: every problem becomes an error [`ToolResult`]
/// that the model can read and recover from.
pub struct ToolDispatcher {
    catalog: ToolCatalog,
    backend: Arc<dyn Backend>,
}

impl ToolDispatcher {
    pub fn new(catalog: ToolCatalog, backend: Arc<dyn Backend>) -> Self {
        Self { catalog, backend }
    }

    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    pub async fn execute(&self, name: &str, arguments: &Map<String, Value>) -> ToolResult {
        let Some(tool) = self.catalog.get(name) else {
            warn!(tool = name, "model requested unknown tool");
            return ToolResult::error(ArgsError::UnknownTool(name.to_string()).to_string());
        };

        debug!(tool = name, "executing tool");
        match self.run(tool, arguments).await {
            Ok(data) => ToolResult::ok(data),
            Err(e) => {
                warn!(tool = name, error = %e, "tool execution failed");
                ToolResult::error(e.to_string())
            }
        }
    }

    async fn run(
        &self,
        tool: &ToolDefinition,
        arguments: &Map<String, Value>,
    ) -> Result<Value, DispatchError> {
        if let Some(missing) = tool
            .required_params()
            .find(|param| arguments.get(*param).map_or(true, Value::is_null))
        {
            return Err(DispatchError::MissingParameter(missing));
        }

        let args = ToolArgs::parse(tool.name, arguments)?;

        match tool.handler {
            Handler::Procedure(procedure) => {
                let params = args.to_params()?;
                Ok(self.backend.call_procedure(procedure, &params).await?)
            }
            Handler::Search {
                collection,
                field,
                columns,
                limit,
            } => {
                let query = SearchQuery {
                    collection,
                    field,
                    term: args.search_term().unwrap_or_default(),
                    columns,
                    limit,
                };
                let mut rows = self.backend.search(&query).await?;
                rows.truncate(limit);
                Ok(Value::Array(rows))
            }
            Handler::RevenueForecast => {
                let days_ahead = args
                    .days_ahead()
                    .unwrap_or(riq_forecast::DEFAULT_DAYS_AHEAD);
                self.forecast_revenue(days_ahead).await
            }
        }
    }

    async fn forecast_revenue(&self, days_ahead: u32) -> Result<Value, DispatchError> {
        let rows = fetch_all(self.backend.as_ref(), SALES_COLLECTION, SALES_COLUMNS).await?;
        let items: Vec<SalesLineItem> = serde_json::from_value(Value::Array(rows))
            .map_err(|e| DispatchError::SalesRows(e.to_string()))?;

        let forecast = predict_revenue(&items, days_ahead)?;
        debug!(
            window = forecast.window_size,
            trend = %forecast.trend,
            days_ahead,
            "revenue forecast computed"
        );
        serde_json::to_value(forecast).map_err(|e| DispatchError::Encode(e.to_string()))
    }
}
