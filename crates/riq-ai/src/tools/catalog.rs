//! The fixed restaurant tool catalog.

use riq_backend::SEARCH_LIMIT;
use serde_json::{json, Map, Value};

/// Tool names as the model sees them.
pub mod names {
    pub const GET_INVENTORY_SNAPSHOT: &str = "get_inventory_snapshot";
    pub const GET_FORECAST: &str = "get_forecast";
    pub const GET_REVENUE_TREND: &str = "get_revenue_trend";
    pub const GET_DAILY_ANALYTICS: &str = "get_daily_analytics";
    pub const GET_BOM_FOR_ITEM: &str = "get_bom_for_item";
    pub const SEARCH_INGREDIENT: &str = "search_ingredient";
    pub const SEARCH_MENU_ITEM: &str = "search_menu_item";
    pub const RECEIVE_INVENTORY: &str = "receive_inventory";
    pub const COUNT_INVENTORY: &str = "count_inventory";
    pub const GENERATE_FORECAST: &str = "generate_forecast";
    pub const PREDICT_REVENUE: &str = "predict_revenue";
    pub const UPSERT_BOM_ENTRY: &str = "upsert_bom_entry";
}

/// Collection and columns the revenue forecaster reads.
pub const SALES_COLLECTION: &str = "sales_line_items";
pub const SALES_COLUMNS: &str = "business_date, net_sales";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
}

impl ParamType {
    pub fn as_schema_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamType,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    const fn required(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: true,
            description,
        }
    }

    const fn optional(name: &'static str, kind: ParamType, description: &'static str) -> Self {
        Self {
            name,
            kind,
            required: false,
            description,
        }
    }
}

/// How the dispatcher carries out a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Forward the arguments to a backend stored procedure.
    Procedure(&'static str),
    /// Partial-name lookup over a backend collection.
    Search {
        collection: &'static str,
        field: &'static str,
        columns: &'static str,
        limit: usize,
    },
    /// Run the local revenue forecaster over the sales history.
    RevenueForecast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: &'static str,
    /// Read by the model only.
    pub description: &'static str,
    pub params: Vec<ParamSpec>,
    /// Executing the tool changes backend state.
    pub mutating: bool,
    pub handler: Handler,
}

impl ToolDefinition {
    pub fn required_params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().filter(|p| p.required).map(|p| p.name)
    }

    /// JSON schema object describing the parameters.
    pub fn parameter_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .params
            .iter()
            .map(|p| {
                (
                    p.name.to_string(),
                    json!({ "type": p.kind.as_schema_type(), "description": p.description }),
                )
            })
            .collect();

        let mut schema = json!({ "type": "object", "properties": properties });
        let required: Vec<&str> = self.required_params().collect();
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }
}

/// Convert a tool definition to a Gemini function declaration.
pub fn to_gemini_tool(tool: &ToolDefinition) -> Value {
    json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": tool.parameter_schema(),
    })
}

/// Registry of callable tools, keyed by unique name.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<ToolDefinition>,
}

impl ToolCatalog {
    pub fn new(tools: Vec<ToolDefinition>) -> Self {
        Self { tools }
    }

    /// The twelve restaurant operations tools.
    pub fn restaurant() -> Self {
        use names::*;
        use ParamType::{Integer, Number, String as Text};

        const INGREDIENT_ID: ParamSpec =
            ParamSpec::required("p_ingredient_id", Text, "UUID of the ingredient");
        const MENU_ITEM_ID: ParamSpec =
            ParamSpec::required("p_menu_item_id", Text, "UUID of the menu item");

        Self::new(vec![
            ToolDefinition {
                name: GET_INVENTORY_SNAPSHOT,
                description: "Current stock level of every ingredient with stock status, days of supply and reorder advice. Use for questions about inventory, what is running low, or what to order.",
                params: vec![],
                mutating: false,
                handler: Handler::Procedure(GET_INVENTORY_SNAPSHOT),
            },
            ToolDefinition {
                name: GET_FORECAST,
                description: "Ingredient demand forecast for the next 7 days from historical sales: quantity needed, current stock and shortfalls. Use for prep and planning questions.",
                params: vec![ParamSpec::optional(
                    "p_reference_date",
                    Text,
                    "First forecast day, YYYY-MM-DD. Defaults to today.",
                )],
                mutating: false,
                handler: Handler::Procedure(GET_FORECAST),
            },
            ToolDefinition {
                name: GET_REVENUE_TREND,
                description: "Daily revenue, order count and average order value for the past N days. Use for 'how are we doing' or 'show me sales'.",
                params: vec![ParamSpec::optional(
                    "p_days",
                    Integer,
                    "Days to look back. Defaults to 30.",
                )],
                mutating: false,
                handler: Handler::Procedure(GET_REVENUE_TREND),
            },
            ToolDefinition {
                name: GET_DAILY_ANALYTICS,
                description: "Detailed analytics for one date: revenue by service period and dining option, peak hours, top servers.",
                params: vec![ParamSpec::optional(
                    "p_business_date",
                    Text,
                    "Date to analyse, YYYY-MM-DD. Defaults to the latest date with data.",
                )],
                mutating: false,
                handler: Handler::Procedure(GET_DAILY_ANALYTICS),
            },
            ToolDefinition {
                name: GET_BOM_FOR_ITEM,
                description: "Bill of materials (recipe ingredients) for one menu item.",
                params: vec![MENU_ITEM_ID],
                mutating: false,
                handler: Handler::Procedure(GET_BOM_FOR_ITEM),
            },
            ToolDefinition {
                name: SEARCH_INGREDIENT,
                description: "Find ingredients by name to get their IDs. Call this before receive_inventory or count_inventory when the user names an ingredient.",
                params: vec![ParamSpec::required(
                    "ingredient_name",
                    Text,
                    "Full or partial ingredient name",
                )],
                mutating: false,
                handler: Handler::Search {
                    collection: "ingredients",
                    field: "name",
                    columns: "id, name, unit",
                    limit: SEARCH_LIMIT,
                },
            },
            ToolDefinition {
                name: SEARCH_MENU_ITEM,
                description: "Find menu items by name to get their IDs. Call this before any operation that needs a menu item ID.",
                params: vec![ParamSpec::required(
                    "item_name",
                    Text,
                    "Full or partial menu item name",
                )],
                mutating: false,
                handler: Handler::Search {
                    collection: "menu_items",
                    field: "name",
                    columns: "id, name, category",
                    limit: SEARCH_LIMIT,
                },
            },
            ToolDefinition {
                name: RECEIVE_INVENTORY,
                description: "Record a delivery of an ingredient. Changes data: always ask the user to confirm first.",
                params: vec![
                    INGREDIENT_ID,
                    ParamSpec::required("p_qty", Number, "Quantity received, greater than zero"),
                    ParamSpec::optional("p_note", Text, "Optional note about the delivery"),
                ],
                mutating: true,
                handler: Handler::Procedure(RECEIVE_INVENTORY),
            },
            ToolDefinition {
                name: COUNT_INVENTORY,
                description: "Record a physical stock count, correcting the system quantity. Changes data: always ask the user to confirm first.",
                params: vec![
                    INGREDIENT_ID,
                    ParamSpec::required("p_actual_qty", Number, "Counted quantity, zero or more"),
                ],
                mutating: true,
                handler: Handler::Procedure(COUNT_INVENTORY),
            },
            ToolDefinition {
                name: GENERATE_FORECAST,
                description: "Regenerate stored item and ingredient demand forecasts for the next N days.",
                params: vec![
                    ParamSpec::optional("p_days_ahead", Integer, "Days to forecast. Defaults to 7."),
                    ParamSpec::optional(
                        "p_reference_date",
                        Text,
                        "First forecast day, YYYY-MM-DD",
                    ),
                ],
                mutating: true,
                handler: Handler::Procedure(GENERATE_FORECAST),
            },
            ToolDefinition {
                name: PREDICT_REVENUE,
                description: "Project revenue for the next N days from the recent sales trend. Use for income, revenue or sales projections; the result is an estimate.",
                params: vec![ParamSpec::optional(
                    "days_ahead",
                    Integer,
                    "Days to project. Defaults to 7.",
                )],
                mutating: false,
                handler: Handler::RevenueForecast,
            },
            ToolDefinition {
                name: UPSERT_BOM_ENTRY,
                description: "Create or update one ingredient line of a menu item's recipe. Changes data: always ask the user to confirm first.",
                params: vec![
                    MENU_ITEM_ID,
                    INGREDIENT_ID,
                    ParamSpec::required(
                        "p_qty_per_item",
                        Number,
                        "Ingredient quantity per menu item, greater than zero",
                    ),
                ],
                mutating: true,
                handler: Handler::Procedure(UPSERT_BOM_ENTRY),
            },
        ])
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.tools
    }

    pub fn is_mutating(&self, name: &str) -> bool {
        self.get(name).is_some_and(|tool| tool.mutating)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolCatalog {
    fn default() -> Self {
        Self::restaurant()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn restaurant_catalog_has_twelve_unique_tools() {
        let catalog = ToolCatalog::restaurant();
        assert_eq!(catalog.len(), 12);
        let unique: HashSet<&str> = catalog.definitions().iter().map(|t| t.name).collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn mutating_tools_are_exactly_the_write_operations() {
        let catalog = ToolCatalog::restaurant();
        let mut mutating: Vec<&str> = catalog
            .definitions()
            .iter()
            .filter(|t| t.mutating)
            .map(|t| t.name)
            .collect();
        mutating.sort_unstable();
        assert_eq!(
            mutating,
            vec![
                names::COUNT_INVENTORY,
                names::GENERATE_FORECAST,
                names::RECEIVE_INVENTORY,
                names::UPSERT_BOM_ENTRY,
            ]
        );
    }

    #[test]
    fn schema_lists_required_params() {
        let catalog = ToolCatalog::restaurant();
        let schema = catalog.get(names::RECEIVE_INVENTORY).unwrap().parameter_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["p_ingredient_id", "p_qty"]));
        assert_eq!(schema["properties"]["p_qty"]["type"], "number");
        assert_eq!(schema["properties"]["p_note"]["type"], "string");
    }

    #[test]
    fn schema_without_required_omits_key() {
        let catalog = ToolCatalog::restaurant();
        let schema = catalog.get(names::GET_INVENTORY_SNAPSHOT).unwrap().parameter_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"], json!({}));
    }

    #[test]
    fn gemini_declaration_shape() {
        let catalog = ToolCatalog::restaurant();
        let decl = to_gemini_tool(catalog.get(names::SEARCH_INGREDIENT).unwrap());
        assert_eq!(decl["name"], "search_ingredient");
        assert!(decl["description"].as_str().unwrap().contains("ingredients"));
        assert_eq!(decl["parameters"]["required"], json!(["ingredient_name"]));
    }

    #[test]
    fn search_tools_are_capped_at_five() {
        let catalog = ToolCatalog::restaurant();
        for name in [names::SEARCH_INGREDIENT, names::SEARCH_MENU_ITEM] {
            match catalog.get(name).unwrap().handler {
                Handler::Search { limit, .. } => assert_eq!(limit, 5),
                other => panic!("{name} should be a search, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_tool_is_absent() {
        let catalog = ToolCatalog::restaurant();
        assert!(catalog.get("drop_tables").is_none());
        assert!(!catalog.is_mutating("drop_tables"));
    }
}
