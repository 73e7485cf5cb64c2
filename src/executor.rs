//! One handler per executable intent.
//!
//! All handlers share the same shape: resolve the year range, fetch the
//! best-matching record through the store collaborator, validate the target
//! column(s) exist, compute the change and issue a single patch. Query
//! intents skip the write and project matches to [`EmployeeSummary`].

use crate::columns::{
    coerce_fte, ensure_column_exists, ensure_year_in_range, month_column, month_columns_for_year,
};
use crate::error::{Result, StaffingError};
use crate::intent::PlanAction;
use crate::store::{PlanRecord, RecordStore};
use chrono::Utc;
use log::{debug, info};
use serde::Serialize;
use serde_json::{json, Map};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct FteAdjustment {
    pub employee_id: String,
    pub table: String,
    pub column: String,
    pub old_value: f64,
    pub new_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitTransfer {
    pub employee_id: String,
    pub table: String,
    pub old_dept: String,
    pub new_dept: String,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeSummary {
    pub id: String,
    pub name: String,
    pub dept: String,
    pub year: Option<i32>,
}

impl EmployeeSummary {
    fn from_record(record: &PlanRecord) -> Self {
        Self {
            id: record.id(),
            name: record.name().to_string(),
            dept: record.dept().to_string(),
            year: record.year(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExistsReport {
    pub exists: bool,
    pub matches: Vec<EmployeeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationReport {
    pub stations: Vec<EmployeeSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitRoster {
    pub dept: String,
    pub year: Option<i32>,
    pub employees: Vec<EmployeeSummary>,
}

/// Yearly FTE report. `found: false` is a deliberate soft outcome for an
/// absent record, distinct from the hard not-found failure of the mutating
/// handlers.
#[derive(Debug, Clone, Serialize)]
pub struct FteYearReport {
    pub found: bool,
    pub name: String,
    pub year: i32,
    pub month: Option<String>,
    pub month_column: Option<String>,
    pub month_value: Option<f64>,
    pub avg_vk: Option<f64>,
    pub avg_year: Option<f64>,
    pub months: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ActionOutcome {
    Adjustment(FteAdjustment),
    Transfer(UnitTransfer),
    Exists(ExistsReport),
    Stations(StationReport),
    Roster(UnitRoster),
    FteYear(FteYearReport),
    Help { help: bool },
}

pub struct ActionExecutor<'a> {
    store: &'a dyn RecordStore,
    table: &'a str,
}

impl<'a> ActionExecutor<'a> {
    pub fn new(store: &'a dyn RecordStore, table: &'a str) -> Self {
        Self { store, table }
    }

    pub async fn execute(&self, action: &PlanAction) -> Result<ActionOutcome> {
        match action {
            PlanAction::AdjustFteRelative {
                name,
                month,
                year,
                delta,
            } => self
                .adjust(name, month, *year, Adjustment::Relative(*delta))
                .await
                .map(ActionOutcome::Adjustment),
            PlanAction::AdjustFteAbsolute {
                name,
                month,
                year,
                target,
            } => self
                .adjust(name, month, *year, Adjustment::Absolute(*target))
                .await
                .map(ActionOutcome::Adjustment),
            PlanAction::MoveEmployeeUnit { name, year, unit } => self
                .move_unit(name, *year, unit)
                .await
                .map(ActionOutcome::Transfer),
            PlanAction::CheckEmployeeExists { name, year } => {
                let matches = self.summaries_by_name(name, *year).await?;
                Ok(ActionOutcome::Exists(ExistsReport {
                    exists: !matches.is_empty(),
                    matches,
                }))
            }
            PlanAction::GetEmployeeUnit { name, year } => {
                let stations = self.summaries_by_name(name, *year).await?;
                Ok(ActionOutcome::Stations(StationReport { stations }))
            }
            PlanAction::ListUnitEmployees { unit, year } => {
                let rows = self.store.search_by_dept(self.table, unit, *year).await?;
                Ok(ActionOutcome::Roster(UnitRoster {
                    dept: unit.clone(),
                    year: *year,
                    employees: rows.iter().map(EmployeeSummary::from_record).collect(),
                }))
            }
            PlanAction::GetEmployeeFteYear { name, year, month } => self
                .fte_year(name, *year, month.as_deref())
                .await
                .map(ActionOutcome::FteYear),
            PlanAction::Help => Ok(ActionOutcome::Help { help: true }),
        }
    }

    /// Case-insensitive substring search on name, first result taken as the
    /// best match.
    async fn best_match(&self, name: &str, year: i32) -> Result<PlanRecord> {
        self.store
            .search_by_name(self.table, name, Some(year), Some(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StaffingError::EmployeeNotFound {
                name: name.to_string(),
                year,
            })
    }

    async fn summaries_by_name(
        &self,
        name: &str,
        year: Option<i32>,
    ) -> Result<Vec<EmployeeSummary>> {
        let rows = self.store.search_by_name(self.table, name, year, None).await?;
        Ok(rows.iter().map(EmployeeSummary::from_record).collect())
    }

    async fn adjust(
        &self,
        name: &str,
        month: &str,
        year: i32,
        adjustment: Adjustment,
    ) -> Result<FteAdjustment> {
        ensure_year_in_range(year)?;
        let column = month_column(month, year);
        let record = self.best_match(name, year).await?;
        ensure_column_exists(&record, &column, self.table)?;

        let old_value = record.fte(&column);
        let new_value = match adjustment {
            Adjustment::Relative(delta) => old_value + delta,
            Adjustment::Absolute(target) => target,
        };

        let mut updates = Map::new();
        updates.insert(column.clone(), json!(new_value));
        updates.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
        self.store.patch(self.table, &record.id(), updates).await?;

        info!(
            "Adjusted {} for record {}: {} -> {}",
            column,
            record.id(),
            old_value,
            new_value
        );
        Ok(FteAdjustment {
            employee_id: record.id(),
            table: self.table.to_string(),
            column,
            old_value,
            new_value,
        })
    }

    async fn move_unit(&self, name: &str, year: i32, unit: &str) -> Result<UnitTransfer> {
        ensure_year_in_range(year)?;
        let record = self.best_match(name, year).await?;
        let old_dept = record.dept().to_string();

        let mut updates = Map::new();
        updates.insert("dept".to_string(), json!(unit));
        updates.insert("updated_at".to_string(), json!(Utc::now().to_rfc3339()));
        self.store.patch(self.table, &record.id(), updates).await?;

        info!(
            "Moved record {} from '{}' to '{}'",
            record.id(),
            old_dept,
            unit
        );
        Ok(UnitTransfer {
            employee_id: record.id(),
            table: self.table.to_string(),
            old_dept,
            new_dept: unit.to_string(),
            year,
        })
    }

    async fn fte_year(&self, name: &str, year: i32, month: Option<&str>) -> Result<FteYearReport> {
        ensure_year_in_range(year)?;
        let rows = self
            .store
            .search_by_name(self.table, name, Some(year), Some(1))
            .await?;

        let Some(record) = rows.into_iter().next() else {
            debug!("No record for '{}' in {}, reporting found=false", name, year);
            return Ok(FteYearReport {
                found: false,
                name: name.to_string(),
                year,
                month: month.map(str::to_string),
                month_column: month.map(|m| month_column(m, year)),
                month_value: None,
                avg_vk: None,
                avg_year: None,
                months: BTreeMap::new(),
            });
        };

        let columns = month_columns_for_year(year);
        for column in &columns {
            ensure_column_exists(&record, column, self.table)?;
        }
        let values: Vec<f64> = columns
            .iter()
            .map(|c| record.get(c).map(coerce_fte).unwrap_or(0.0))
            .collect();
        let avg = values.iter().sum::<f64>() / columns.len() as f64;

        let mut month_col = None;
        let mut month_value = None;
        if let Some(m) = month {
            let column = month_column(m, year);
            ensure_column_exists(&record, &column, self.table)?;
            month_value = Some(record.fte(&column));
            month_col = Some(column);
        }

        Ok(FteYearReport {
            found: true,
            name: name.to_string(),
            year,
            month: month.map(str::to_string),
            month_column: month_col,
            month_value,
            avg_vk: Some(month_value.unwrap_or(avg)),
            avg_year: Some(avg),
            months: columns.into_iter().zip(values).collect(),
        })
    }
}

enum Adjustment {
    Relative(f64),
    Absolute(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_outcome_shape() {
        let outcome = ActionOutcome::Help { help: true };
        assert_eq!(serde_json::to_value(&outcome).unwrap(), json!({"help": true}));
    }

    #[test]
    fn test_adjustment_outcome_shape() {
        let outcome = ActionOutcome::Adjustment(FteAdjustment {
            employee_id: "7".to_string(),
            table: "stellenplan".to_string(),
            column: "mrz_2026".to_string(),
            old_value: 0.75,
            new_value: 0.5,
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["column"], "mrz_2026");
        assert_eq!(value["old_value"], 0.75);
        assert_eq!(value["new_value"], 0.5);
    }
}
