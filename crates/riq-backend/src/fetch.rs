//! Paginated full-collection reads.

use serde_json::Value;
use tracing::debug;

use crate::{Backend, BackendError};

/// Rows requested per page read.
pub const PAGE_SIZE: usize = 1000;
/// Refuse to buffer more than this many rows for one fetch.
pub const MAX_FETCH_ROWS: usize = 1_000_000;

/// Read every row of `collection` page by page.
///
/// Stops at the first page shorter than [`PAGE_SIZE`]. Any page error
/// aborts the whole fetch and the rows collected so far are dropped, so a
/// caller never sees a silently truncated collection.
pub async fn fetch_all(
    backend: &dyn Backend,
    collection: &str,
    columns: &str,
) -> Result<Vec<Value>, BackendError> {
    let mut rows = Vec::new();
    let mut offset = 0;

    loop {
        let page = backend
            .read_page(collection, columns, offset, PAGE_SIZE)
            .await?;
        let page_len = page.len();
        rows.extend(page);

        if rows.len() > MAX_FETCH_ROWS {
            return Err(BackendError::TooLarge {
                limit: MAX_FETCH_ROWS,
            });
        }
        if page_len < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
    }

    debug!(collection, rows = rows.len(), "fetched collection");
    Ok(rows)
}
