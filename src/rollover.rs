//! Batch rollover of month allocations from one planning year to another.
//!
//! Copies the twelve `from_year` month columns into the `to_year` columns on
//! the same record, for an explicit list of record ids. There is no implicit
//! all-records mode; callers must name every id to prevent accidental mass
//! mutation. Ids are processed strictly sequentially and each id's outcome is
//! isolated, so a missing record never aborts the batch.

use crate::columns::{month_columns_for_year, YEAR_MAX, YEAR_MIN};
use crate::error::{Result, StaffingError};
use crate::store::{PlanRecord, RecordStore};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloverMode {
    /// Copy only into target columns that are currently null.
    #[default]
    Fill,
    /// Copy regardless of the current target value.
    Overwrite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverRequest {
    pub table: String,
    #[serde(rename = "fromYear")]
    pub from_year: i32,
    #[serde(rename = "toYear")]
    pub to_year: i32,
    #[serde(default)]
    pub dept: Option<String>,
    pub ids: Vec<String>,
    #[serde(default)]
    pub mode: RolloverMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverStatus {
    Ok,
    Skipped,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverEntry {
    pub id: String,
    pub status: RolloverStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolloverReport {
    pub table: String,
    #[serde(rename = "fromYear")]
    pub from_year: i32,
    #[serde(rename = "toYear")]
    pub to_year: i32,
    pub dept: Option<String>,
    pub mode: RolloverMode,
    pub results: Vec<RolloverEntry>,
}

/// The per-record month-column patch, without the `updated_at` stamp.
///
/// In fill mode a month is written only when the target column is currently
/// null. A from-column that is absent from the record contributes no write at
/// all (an explicit null source value is still copied).
pub fn build_rollover_patch(
    record: &PlanRecord,
    from_year: i32,
    to_year: i32,
    mode: RolloverMode,
) -> Map<String, Value> {
    let cols_from = month_columns_for_year(from_year);
    let cols_to = month_columns_for_year(to_year);
    let mut patch = Map::new();

    for (col_from, col_to) in cols_from.iter().zip(&cols_to) {
        let Some(val_from) = record.get(col_from) else {
            continue;
        };
        let current_to = record.get(col_to);
        let write = match mode {
            RolloverMode::Fill => matches!(current_to, None | Some(Value::Null)),
            RolloverMode::Overwrite => true,
        };
        if write {
            patch.insert(col_to.clone(), val_from.clone());
        }
    }
    patch
}

/// Runs the batch. Preconditions are checked before any store I/O; after
/// that, each id is fetched and patched independently.
pub async fn run_rollover(
    store: &dyn RecordStore,
    request: &RolloverRequest,
) -> Result<RolloverReport> {
    if request.from_year < YEAR_MIN
        || request.to_year > YEAR_MAX
        || request.from_year >= request.to_year
    {
        return Err(StaffingError::InvalidRolloverRange {
            from: request.from_year,
            to: request.to_year,
        });
    }
    if request.ids.is_empty() {
        return Err(StaffingError::EmptyRolloverIds);
    }

    info!(
        "Rollover {} -> {} on '{}' ({} ids, mode {:?})",
        request.from_year,
        request.to_year,
        request.table,
        request.ids.len(),
        request.mode
    );

    let mut results = Vec::with_capacity(request.ids.len());
    for id in &request.ids {
        let record = store
            .fetch_by_id(&request.table, id, request.dept.as_deref())
            .await?;

        let Some(record) = record else {
            debug!("Rollover id {} not found, continuing", id);
            results.push(RolloverEntry {
                id: id.clone(),
                status: RolloverStatus::NotFound,
                updated: None,
            });
            continue;
        };

        let mut patch =
            build_rollover_patch(&record, request.from_year, request.to_year, request.mode);
        if patch.is_empty() {
            results.push(RolloverEntry {
                id: id.clone(),
                status: RolloverStatus::Skipped,
                updated: None,
            });
            continue;
        }

        let updated: Vec<String> = patch.keys().cloned().collect();
        patch.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
        store.patch(&request.table, id, patch).await?;
        results.push(RolloverEntry {
            id: id.clone(),
            status: RolloverStatus::Ok,
            updated: Some(updated),
        });
    }

    Ok(RolloverReport {
        table: request.table.clone(),
        from_year: request.from_year,
        to_year: request.to_year,
        dept: request.dept.clone(),
        mode: request.mode,
        results,
    })
}
