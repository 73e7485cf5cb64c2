//! # Staffing Command Engine
//!
//! A library for turning free-text natural-language requests into validated,
//! deterministic mutations of per-employee, per-month FTE plan records, with
//! batch rollover of allocations between planning years.
//!
//! ## Core Concepts
//!
//! - **Intent**: the structured action type the language-model collaborator
//!   assigns to a free-text command (a closed set of seven executable intents
//!   plus `help` and `unknown`).
//! - **Column addressing**: each plan record carries one numeric FTE column
//!   per (month, year) pair, keyed `{abbrev}_{year}` (e.g. `mrz_2026`).
//! - **Rollover**: batch copy of a year's twelve month values into another
//!   year's columns for an explicit id list, with a fill-vs-overwrite policy.
//! - **Audit**: every mutating or query execution emits an outcome envelope;
//!   a failing audit sink never alters the primary response.
//!
//! ## Example
//!
//! ```rust,ignore
//! use staffing_command_engine::*;
//!
//! let assistant = StaffingAssistant::new(
//!     Box::new(OpenAiParser::new(api_key)),
//!     Box::new(RestStore::new(rest_url, service_key)),
//!     Box::new(RestAuditSink::new(rest_url, service_key)),
//! );
//!
//! let response = assistant
//!     .run(&CommandRequest {
//!         command: "Frau Müller im März 2026 um 0,25 VK reduzieren".to_string(),
//!         table: "stellenplan".to_string(),
//!         site: Some("KH1".to_string()),
//!     })
//!     .await?;
//! ```

pub mod audit;
pub mod columns;
pub mod error;
pub mod executor;
pub mod intent;
pub mod llm;
pub mod rollover;
pub mod store;

pub use audit::{AuditRecord, AuditSink, AuditStatus, RestAuditSink};
pub use columns::{
    coerce_fte, ensure_column_exists, ensure_year_in_range, month_column, month_columns_for_year,
    MONTH_ABBREVS, YEAR_MAX, YEAR_MIN,
};
pub use error::{Result, StaffingError};
pub use executor::{
    ActionExecutor, ActionOutcome, EmployeeSummary, ExistsReport, FteAdjustment, FteYearReport,
    StationReport, UnitRoster, UnitTransfer,
};
pub use intent::{IntentFields, IntentKind, ParsedCommand, PlanAction};
pub use llm::{CommandParser, OpenAiParser};
pub use rollover::{
    run_rollover, RolloverEntry, RolloverMode, RolloverReport, RolloverRequest, RolloverStatus,
};
pub use store::{PlanRecord, RecordStore, RestStore};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// One inbound free-text command against a plan table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRequest {
    pub command: String,
    pub table: String,
    pub site: Option<String>,
}

/// The caller-facing outcome. The partially-understood interpretation is
/// echoed back even when execution failed, so the caller can show what was
/// parsed.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub success: bool,
    pub parsed: Option<ParsedCommand>,
    pub applied: Option<ActionOutcome>,
    pub note: Option<String>,
    pub error: Option<String>,
}

/// Facade wiring the language-model parser, the record store and the audit
/// sink into the parse → clarify → execute → audit flow.
pub struct StaffingAssistant {
    parser: Box<dyn CommandParser>,
    store: Box<dyn RecordStore>,
    audit: Box<dyn AuditSink>,
}

impl StaffingAssistant {
    pub fn new(
        parser: Box<dyn CommandParser>,
        store: Box<dyn RecordStore>,
        audit: Box<dyn AuditSink>,
    ) -> Self {
        Self {
            parser,
            store,
            audit,
        }
    }

    /// Parse-only mode: interpret the command without touching the store.
    pub async fn interpret(&self, request: &CommandRequest) -> Result<CommandResponse> {
        let parsed = self.parser.parse(&request.command).await?;
        debug!("Interpreted command as intent '{}'", parsed.intent.as_str());
        let note = parsed
            .needs_clarification
            .then(|| "Clarification needed".to_string());
        Ok(CommandResponse {
            success: true,
            parsed: Some(parsed),
            applied: None,
            note,
            error: None,
        })
    }

    /// Interpret the command and execute it against the plan table, emitting
    /// an audit record for every execution outcome.
    pub async fn run(&self, request: &CommandRequest) -> Result<CommandResponse> {
        let parsed = self.parser.parse(&request.command).await?;
        if parsed.needs_clarification {
            return Ok(CommandResponse {
                success: true,
                parsed: Some(parsed),
                applied: None,
                note: Some("Clarification needed".to_string()),
                error: None,
            });
        }

        info!(
            "Executing intent '{}' on table '{}'",
            parsed.intent.as_str(),
            request.table
        );
        let outcome = match PlanAction::from_parsed(&parsed) {
            Ok(action) => {
                ActionExecutor::new(self.store.as_ref(), &request.table)
                    .execute(&action)
                    .await
            }
            Err(e) => Err(e),
        };

        let site = request.site.clone().unwrap_or_else(|| "unknown".to_string());
        let plan_year = parsed.fields.year.filter(|y| *y != 0);

        match outcome {
            Ok(applied) => {
                let entry = AuditRecord {
                    site,
                    command: request.command.clone(),
                    action: parsed.intent.as_str().to_string(),
                    target_table: request.table.clone(),
                    plan_year,
                    status: AuditStatus::Ok,
                    result: serde_json::to_value(&applied).unwrap_or_default(),
                };
                audit::emit(self.audit.as_ref(), &entry).await;
                Ok(CommandResponse {
                    success: true,
                    parsed: Some(parsed),
                    applied: Some(applied),
                    note: None,
                    error: None,
                })
            }
            Err(e) => {
                let message = e.to_string();
                let entry = AuditRecord {
                    site,
                    command: request.command.clone(),
                    action: parsed.intent.as_str().to_string(),
                    target_table: request.table.clone(),
                    plan_year,
                    status: AuditStatus::Error,
                    result: serde_json::json!({ "error": message }),
                };
                audit::emit(self.audit.as_ref(), &entry).await;
                Ok(CommandResponse {
                    success: false,
                    parsed: Some(parsed),
                    applied: None,
                    note: None,
                    error: Some(message),
                })
            }
        }
    }

    /// Batch rollover of month allocations between years, audited like any
    /// other mutating execution.
    pub async fn rollover(&self, request: &RolloverRequest) -> Result<RolloverReport> {
        let command = format!(
            "rollover {} -> {} ({} ids, {:?})",
            request.from_year,
            request.to_year,
            request.ids.len(),
            request.mode
        );
        let outcome = run_rollover(self.store.as_ref(), request).await;

        let (status, result) = match &outcome {
            Ok(report) => (
                AuditStatus::Ok,
                serde_json::to_value(report).unwrap_or_default(),
            ),
            Err(e) => (
                AuditStatus::Error,
                serde_json::json!({ "error": e.to_string() }),
            ),
        };
        let entry = AuditRecord {
            site: "system".to_string(),
            command,
            action: "rollover".to_string(),
            target_table: request.table.clone(),
            plan_year: Some(request.to_year),
            status,
            result,
        };
        audit::emit(self.audit.as_ref(), &entry).await;

        outcome
    }
}
