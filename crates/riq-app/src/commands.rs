//! Subcommand implementations.

use std::io::Write;
use std::process::ExitCode;

use chrono::NaiveDate;
use riq_ai::tools::names;
use riq_ai::{ToolResult, TurnOutcome};
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assistant::Assistant;

/// Line-oriented chat on stdin until EOF, `/quit` or Ctrl-C at the prompt.
pub async fn chat(assistant: &Assistant) -> ExitCode {
    let mut session = assistant.new_session();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("RestaurantIQ ready. /clear resets the conversation, /quit exits.");
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = tokio::signal::ctrl_c() => break,
        };
        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read stdin: {e}");
                return ExitCode::FAILURE;
            }
        };

        match line.trim() {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("Conversation cleared.");
            }
            text => {
                tokio::select! {
                    outcome = session.submit(text) => println!("{}", render_outcome(&outcome)),
                    _ = tokio::signal::ctrl_c() => println!("\n(cancelled)"),
                }
            }
        }
    }
    println!();
    ExitCode::SUCCESS
}

pub async fn ask(assistant: &Assistant, text: &str) -> ExitCode {
    let outcome = assistant.new_session().submit(text).await;
    if outcome.error {
        eprintln!("{}", outcome.text);
        ExitCode::FAILURE
    } else {
        println!("{}", outcome.text);
        ExitCode::SUCCESS
    }
}

pub async fn regenerate_forecasts(
    assistant: &Assistant,
    days_ahead: Option<u32>,
    reference_date: Option<NaiveDate>,
) -> ExitCode {
    let mut args = Map::new();
    if let Some(days) = days_ahead {
        args.insert("p_days_ahead".into(), json!(days));
    }
    if let Some(date) = reference_date {
        args.insert("p_reference_date".into(), json!(date.to_string()));
    }

    println!("Generating forecasts...");
    let result = assistant
        .dispatcher()
        .execute(names::GENERATE_FORECAST, &args)
        .await;
    report(result, render_regeneration)
}

pub async fn forecast(assistant: &Assistant, days_ahead: Option<u32>) -> ExitCode {
    let mut args = Map::new();
    if let Some(days) = days_ahead {
        args.insert("days_ahead".into(), json!(days));
    }
    let result = assistant
        .dispatcher()
        .execute(names::PREDICT_REVENUE, &args)
        .await;
    report(result, render_forecast)
}

fn report(result: ToolResult, render: fn(&Value) -> String) -> ExitCode {
    match result {
        ToolResult::Ok { data } => {
            println!("{}", render(&data));
            ExitCode::SUCCESS
        }
        ToolResult::Error { error_message } => {
            eprintln!("Error: {error_message}");
            ExitCode::FAILURE
        }
    }
}

fn render_outcome(outcome: &TurnOutcome) -> String {
    if outcome.error {
        format!("! {}", outcome.text)
    } else {
        outcome.text.clone()
    }
}

fn count(value: &Value) -> String {
    match value {
        Value::Array(rows) => rows.len().to_string(),
        Value::Null => "0".to_string(),
        other => other.to_string(),
    }
}

fn render_regeneration(data: &Value) -> String {
    format!(
        "Forecast generated:\n  Item forecasts: {}\n  Ingredient forecasts: {}",
        count(&data["item_forecasts"]),
        count(&data["ingredient_forecasts"])
    )
}

fn render_forecast(data: &Value) -> String {
    let mut out = data["summary"].as_str().unwrap_or_default().to_string();
    out.push_str("\n\nDate        Predicted revenue");
    for prediction in data["predictions"].as_array().into_iter().flatten() {
        out.push_str(&format!(
            "\n{:<10}  {:>17}",
            prediction["date"].as_str().unwrap_or_default(),
            prediction["predicted_revenue"]
        ));
    }
    out
}
