//! Tools the model can call.
//!
//! The catalog declares each tool once; the same declaration feeds the
//! model-facing schema and the dispatcher's required-parameter check.

mod args;
mod catalog;
mod dispatcher;
mod result;

pub use args::{
    ArgsError, BomArgs, CountInventoryArgs, DailyAnalyticsArgs, ForecastArgs,
    GenerateForecastArgs, IngredientSearchArgs, MenuItemSearchArgs, PredictRevenueArgs,
    ReceiveInventoryArgs, RevenueTrendArgs, ToolArgs, UpsertBomArgs, MAX_DAYS_AHEAD,
};
pub use catalog::{
    names, to_gemini_tool, Handler, ParamSpec, ParamType, ToolCatalog, ToolDefinition,
    SALES_COLLECTION, SALES_COLUMNS,
};
pub use dispatcher::ToolDispatcher;
pub use result::ToolResult;
