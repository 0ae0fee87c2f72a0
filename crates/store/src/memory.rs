//! In-memory tables for tests and offline runs.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreError;
use crate::query::{Query, Table};
use crate::repository::Repository;

/// Tables held in memory behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
}

impl MemoryRepository {
    /// Empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends seed rows to a table.
    #[must_use]
    pub fn with_rows(mut self, table: Table, rows: impl IntoIterator<Item = Value>) -> Self {
        self.tables.get_mut().entry(table).or_default().extend(rows);
        self
    }

    /// Number of rows currently in a table.
    pub async fn row_count(&self, table: Table) -> usize {
        self.tables.read().await.get(&table).map_or(0, Vec::len)
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn not_found(table: Table, id: &str) -> StoreError {
    StoreError::NotFound(format!("{table} row {id}"))
}

#[async_trait]
impl Repository for MemoryRepository {
    async fn select(&self, query: &Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .get(&query.table)
            .map(|rows| rows.iter().filter(|row| query.matches(row)).cloned().collect())
            .unwrap_or_default())
    }

    async fn insert(&self, table: Table, mut row: Value) -> Result<Value, StoreError> {
        let Some(fields) = row.as_object_mut() else {
            return Err(StoreError::Rejected("row must be an object".to_string()));
        };
        fields
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::now_v7().to_string()));

        let mut tables = self.tables.write().await;
        let rows = tables.entry(table).or_default();
        if let Some(id) = row_id(&row)
            && rows.iter().any(|r| row_id(r) == Some(id))
        {
            return Err(StoreError::Conflict(format!("{table} row {id} exists")));
        }
        rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: &str, row: Value) -> Result<Value, StoreError> {
        let Value::Object(changes) = row else {
            return Err(StoreError::Rejected("row must be an object".to_string()));
        };

        let mut tables = self.tables.write().await;
        let stored = tables
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|r| row_id(r) == Some(id)))
            .ok_or_else(|| not_found(table, id))?;

        if let Some(fields) = stored.as_object_mut() {
            for (column, value) in changes {
                if column != "id" {
                    fields.insert(column, value);
                }
            }
        }
        Ok(stored.clone())
    }

    async fn delete(&self, table: Table, id: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.get_mut(&table).ok_or_else(|| not_found(table, id))?;
        let before = rows.len();
        rows.retain(|r| row_id(r) != Some(id));
        if rows.len() == before {
            return Err(not_found(table, id));
        }
        Ok(())
    }
}
