//! Data backend for RestaurantIQ.
//!
//! The backend is a remote collaborator: it owns the stored procedures
//! (inventory snapshot, recipe lookup, analytics, receipts, counts, ...)
//! and the collections they read. This crate only defines the surface the
//! assistant talks to:
//! - named procedure calls taking a JSON parameter object
//! - case-insensitive partial-name search over a collection
//! - offset/limit page reads, and [`fetch_all`] built on top of them
//!
//! [`PostgrestClient`] speaks to a Supabase-style PostgREST endpoint;
//! [`MemoryBackend`] keeps everything in process.

mod fetch;
mod memory;
mod postgrest;

use async_trait::async_trait;
use serde_json::Value;

pub use fetch::{fetch_all, MAX_FETCH_ROWS, PAGE_SIZE};
pub use memory::MemoryBackend;
pub use postgrest::{PostgrestClient, PostgrestConfig};

/// Upper bound on rows returned by a name search.
pub const SEARCH_LIMIT: usize = 5;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Invoke a named stored procedure.
    async fn call_procedure(&self, name: &str, params: &Value) -> Result<Value, BackendError>;

    /// Case-insensitive partial match of `query.term` against `query.field`.
    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<Value>, BackendError>;

    /// Read `limit` rows starting at `offset`, in the backend's default order.
    async fn read_page(
        &self,
        collection: &str,
        columns: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>, BackendError>;
}

/// A partial-name lookup against one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchQuery<'a> {
    pub collection: &'a str,
    /// Name-like field matched against `term`.
    pub field: &'a str,
    pub term: &'a str,
    /// Comma-separated columns to return.
    pub columns: &'a str,
    pub limit: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The backend answered with a structured error of its own.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("result too large: more than {limit} rows")]
    TooLarge { limit: usize },
}
