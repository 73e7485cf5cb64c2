//! The tabular record store collaborator.
//!
//! One row per employee per reference year. Month columns are dynamic
//! (`{abbrev}_{year}`), so [`PlanRecord`] wraps the raw JSON object instead of
//! enumerating fields. This crate only looks records up and patches them;
//! record lifecycle belongs entirely to the external store.

use crate::columns::coerce_fte;
use crate::error::{Result, StaffingError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One employee plan row, keyed by dynamic physical column names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanRecord(pub Map<String, Value>);

impl PlanRecord {
    pub fn from_value(value: Value) -> Result<Self> {
        let record = serde_json::from_value(value)?;
        Ok(record)
    }

    /// The opaque record id, stringified (the store may use numeric ids).
    pub fn id(&self) -> String {
        match self.0.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.0.get("name").and_then(Value::as_str).unwrap_or("")
    }

    pub fn dept(&self) -> &str {
        self.0.get("dept").and_then(Value::as_str).unwrap_or("")
    }

    pub fn year(&self) -> Option<i32> {
        self.0.get("year").and_then(Value::as_i64).map(|y| y as i32)
    }

    /// True when the physical column is present on the row, even with a null
    /// value. A null FTE cell is an empty allocation, not a schema gap.
    pub fn has_column(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    /// The column's FTE value, coerced to a finite number.
    pub fn fte(&self, column: &str) -> f64 {
        self.get(column).map(coerce_fte).unwrap_or(0.0)
    }
}

/// Read/patch contract this crate consumes. Lookups order results
/// arbitrarily; callers take the first match as the best match.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Case-insensitive substring match on `name`, optionally narrowed by
    /// exact year equality.
    async fn search_by_name(
        &self,
        table: &str,
        name: &str,
        year: Option<i32>,
        limit: Option<u32>,
    ) -> Result<Vec<PlanRecord>>;

    /// Case-insensitive substring match on `dept`, optionally narrowed by
    /// exact year equality.
    async fn search_by_dept(
        &self,
        table: &str,
        dept: &str,
        year: Option<i32>,
    ) -> Result<Vec<PlanRecord>>;

    /// Exact-id lookup, optionally requiring an exact `dept` value.
    async fn fetch_by_id(
        &self,
        table: &str,
        id: &str,
        dept: Option<&str>,
    ) -> Result<Option<PlanRecord>>;

    /// Partial-column patch by id, applied atomically per call.
    async fn patch(&self, table: &str, id: &str, updates: Map<String, Value>) -> Result<()>;
}

/// PostgREST-style implementation (Supabase REST in the original deployment).
#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl RestStore {
    /// `base_url` is the REST root, e.g. `https://host/rest/v1`.
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
    }

    async fn fetch_rows(&self, table: &str, query: &[(String, String)]) -> Result<Vec<PlanRecord>> {
        let res = self
            .authorize(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StaffingError::Store(format!(
                "status {}: {}",
                status, body
            )));
        }
        let rows: Vec<PlanRecord> = res.json().await?;
        Ok(rows)
    }
}

#[async_trait]
impl RecordStore for RestStore {
    async fn search_by_name(
        &self,
        table: &str,
        name: &str,
        year: Option<i32>,
        limit: Option<u32>,
    ) -> Result<Vec<PlanRecord>> {
        let mut query = vec![
            ("name".to_string(), format!("ilike.*{}*", name)),
            ("select".to_string(), "*".to_string()),
        ];
        if let Some(y) = year {
            query.push(("year".to_string(), format!("eq.{}", y)));
        }
        if let Some(l) = limit {
            query.push(("limit".to_string(), l.to_string()));
        }
        self.fetch_rows(table, &query).await
    }

    async fn search_by_dept(
        &self,
        table: &str,
        dept: &str,
        year: Option<i32>,
    ) -> Result<Vec<PlanRecord>> {
        let mut query = vec![
            ("dept".to_string(), format!("ilike.*{}*", dept)),
            ("select".to_string(), "*".to_string()),
        ];
        if let Some(y) = year {
            query.push(("year".to_string(), format!("eq.{}", y)));
        }
        self.fetch_rows(table, &query).await
    }

    async fn fetch_by_id(
        &self,
        table: &str,
        id: &str,
        dept: Option<&str>,
    ) -> Result<Option<PlanRecord>> {
        let mut query = vec![("id".to_string(), format!("eq.{}", id))];
        if let Some(d) = dept {
            query.push(("dept".to_string(), format!("eq.{}", d)));
        }
        let rows = self.fetch_rows(table, &query).await?;
        Ok(rows.into_iter().next())
    }

    async fn patch(&self, table: &str, id: &str, updates: Map<String, Value>) -> Result<()> {
        let res = self
            .authorize(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(&updates)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(StaffingError::Store(format!(
                "status {}: {}",
                status, body
            )));
        }
        Ok(())
    }
}
