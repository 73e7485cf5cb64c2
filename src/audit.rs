//! The audit envelope emitted after every mutating or query execution.
//!
//! Emission failures are swallowed: a broken audit sink must never mask or
//! alter the primary response to the caller.

use crate::error::{Result, StaffingError};
use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub site: String,
    pub command: String,
    pub action: String,
    pub target_table: String,
    pub plan_year: Option<i32>,
    pub status: AuditStatus,
    pub result: Value,
}

#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, entry: &AuditRecord) -> Result<()>;
}

/// Writes each envelope into a REST audit table, best effort.
pub async fn emit(sink: &dyn AuditSink, entry: &AuditRecord) {
    if let Err(e) = sink.record(entry).await {
        warn!("Audit emission failed (ignored): {}", e);
    }
}

/// PostgREST-style audit sink posting into a dedicated table.
#[derive(Clone)]
pub struct RestAuditSink {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
}

impl RestAuditSink {
    pub fn new(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            table: "assistant_audit".to_string(),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }
}

#[async_trait]
impl AuditSink for RestAuditSink {
    async fn record(&self, entry: &AuditRecord) -> Result<()> {
        let url = format!("{}/{}", self.base_url, self.table);
        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("Prefer", "return=minimal")
            .json(entry)
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
