use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// RestaurantIQ: a conversational assistant for restaurant operations.
#[derive(Parser, Debug)]
#[command(name = "restaurantiq", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter override, e.g. `riq=debug`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Interactive chat on stdin (default).
    Chat,
    /// Ask a single question and print the answer.
    Ask {
        /// The question.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Regenerate stored item and ingredient demand forecasts.
    RegenerateForecasts {
        #[arg(long)]
        days_ahead: Option<u32>,
        /// First forecast day (YYYY-MM-DD).
        #[arg(long)]
        reference_date: Option<NaiveDate>,
    },
    /// Project daily revenue from the sales history.
    Forecast {
        #[arg(long)]
        days_ahead: Option<u32>,
    },
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_chat() {
        let args = Args::try_parse_from(["restaurantiq"]).unwrap();
        assert!(args.command.is_none());
    }

    #[test]
    fn ask_joins_words() {
        let args = Args::try_parse_from(["restaurantiq", "ask", "what's", "low?"]).unwrap();
        assert_eq!(
            args.command,
            Some(Command::Ask {
                text: vec!["what's".into(), "low?".into()]
            })
        );
    }

    #[test]
    fn regenerate_parses_date() {
        let args = Args::try_parse_from([
            "restaurantiq",
            "--log-level",
            "riq=debug",
            "regenerate-forecasts",
            "--days-ahead",
            "14",
            "--reference-date",
            "2026-02-08",
        ])
        .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("riq=debug"));
        assert_eq!(
            args.command,
            Some(Command::RegenerateForecasts {
                days_ahead: Some(14),
                reference_date: NaiveDate::from_ymd_opt(2026, 2, 8),
            })
        );
    }

    #[test]
    fn bad_date_rejected() {
        assert!(Args::try_parse_from([
            "restaurantiq",
            "regenerate-forecasts",
            "--reference-date",
            "next week",
        ])
        .is_err());
    }
}
