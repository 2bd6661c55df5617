//! In-process backend holding collections and procedures in memory.
//!
//! Procedures are plain closures over the parameter object. Every call
//! is recorded so callers can assert on what reached the backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::{Backend, BackendError, SearchQuery};

type ProcedureFn = Box<dyn Fn(&Value) -> Result<Value, BackendError> + Send + Sync>;

#[derive(Default)]
pub struct MemoryBackend {
    collections: HashMap<String, Vec<Value>>,
    procedures: HashMap<String, ProcedureFn>,
    read_failure_at_page: Option<usize>,
    page_reads: AtomicUsize,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collection(mut self, name: impl Into<String>, rows: Vec<Value>) -> Self {
        self.collections.insert(name.into(), rows);
        self
    }

    pub fn with_procedure<F>(mut self, name: impl Into<String>, procedure: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, BackendError> + Send + Sync + 'static,
    {
        self.procedures.insert(name.into(), Box::new(procedure));
        self
    }

    /// Register a procedure that always answers with a backend error.
    pub fn with_failing_procedure(self, name: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_procedure(name, move |_| {
            Err(BackendError::Rejected {
                status: 400,
                message: message.clone(),
            })
        })
    }

    /// Make the page read with this zero-based index fail.
    pub fn with_read_failure_at_page(mut self, page: usize) -> Self {
        self.read_failure_at_page = Some(page);
        self
    }

    /// Number of page reads issued so far, failed ones included.
    pub fn page_reads(&self) -> usize {
        self.page_reads.load(Ordering::SeqCst)
    }

    /// Procedure calls received so far, in order.
    pub fn procedure_calls(&self) -> Vec<(String, Value)> {
        self.lock_calls().clone()
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<(String, Value)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn collection(&self, name: &str) -> Result<&[Value], BackendError> {
        self.collections
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| BackendError::Rejected {
                status: 404,
                message: format!("relation \"{name}\" does not exist"),
            })
    }
}

/// Keep only the listed columns of an object row.
fn project(row: &Value, columns: &str) -> Value {
    let Some(object) = row.as_object() else {
        return row.clone();
    };
    if columns.trim() == "*" {
        return row.clone();
    }

    let projected: Map<String, Value> = columns
        .split(',')
        .map(str::trim)
        .filter_map(|column| {
            object
                .get(column)
                .map(|value| (column.to_string(), value.clone()))
        })
        .collect();
    Value::Object(projected)
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn call_procedure(&self, name: &str, params: &Value) -> Result<Value, BackendError> {
        self.lock_calls().push((name.to_string(), params.clone()));
        let procedure = self
            .procedures
            .get(name)
            .ok_or_else(|| BackendError::UnknownProcedure(name.to_string()))?;
        procedure(params)
    }

    async fn search(&self, query: &SearchQuery<'_>) -> Result<Vec<Value>, BackendError> {
        let needle = query.term.to_lowercase();
        let rows = self.collection(query.collection)?;

        Ok(rows
            .iter()
            .filter(|row| {
                row.get(query.field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            })
            .take(query.limit)
            .map(|row| project(row, query.columns))
            .collect())
    }

    async fn read_page(
        &self,
        collection: &str,
        columns: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Value>, BackendError> {
        let page_index = self.page_reads.fetch_add(1, Ordering::SeqCst);
        if self.read_failure_at_page == Some(page_index) {
            return Err(BackendError::Network("connection reset by peer".into()));
        }

        let rows = self.collection(collection)?;
        Ok(rows
            .iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, columns))
            .collect())
    }
}
