//! Row-level access to the data backend.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StoreError;
use crate::query::{Query, Table};

/// JSON row access to backend tables.
///
/// Rows are plain JSON objects keyed by column name; every table has a
/// string `id` column.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Rows matching the query.
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError>;

    /// Inserts a row and returns it as stored.
    async fn insert(&self, table: Table, row: Value) -> Result<Value, StoreError>;

    /// Updates the given columns of the row with `id` and returns it as stored.
    async fn update(&self, table: Table, id: &str, row: Value) -> Result<Value, StoreError>;

    /// Deletes the row with `id`.
    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError>;
}

/// Decodes fetched rows into records; the first malformed row fails the batch.
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Encodes a record as a row object.
pub fn encode_row<T: Serialize>(record: &T) -> Result<Value, StoreError> {
    Ok(serde_json::to_value(record)?)
}
