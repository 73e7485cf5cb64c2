//! The closed set of recognized command intents and their field shapes.
//!
//! [`ParsedCommand`] mirrors the JSON structure returned by the language-model
//! collaborator; every field in the bag is optional at the schema level.
//! [`PlanAction`] is the strongly-typed union the executor runs: one variant
//! per executable intent, carrying only its relevant fields. Required-field
//! enforcement lives at the [`PlanAction::from_parsed`] construction boundary
//! because requirements differ per intent.

use crate::error::{Result, StaffingError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    #[schemars(description = "Relative FTE change for one employee in one month, e.g. -0.5")]
    AdjustPersonFteRel,

    #[schemars(description = "Absolute FTE target for one employee in one month, e.g. 0.8")]
    AdjustPersonFteAbs,

    #[schemars(description = "Move an employee to a different organizational unit")]
    MoveEmployeeUnit,

    #[schemars(description = "Check whether an employee exists in the plan")]
    CheckEmployeeExists,

    #[schemars(description = "Look up which unit(s) an employee is assigned to")]
    GetEmployeeUnit,

    #[schemars(description = "List all employees of an organizational unit")]
    ListUnitEmployees,

    #[schemars(description = "Report an employee's twelve month FTE values and yearly average")]
    GetEmployeeFteYear,

    #[schemars(description = "The user asks what the assistant can do")]
    Help,

    #[serde(other)]
    #[schemars(description = "The command could not be mapped to any known intent")]
    Unknown,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::AdjustPersonFteRel => "adjust_person_fte_rel",
            IntentKind::AdjustPersonFteAbs => "adjust_person_fte_abs",
            IntentKind::MoveEmployeeUnit => "move_employee_unit",
            IntentKind::CheckEmployeeExists => "check_employee_exists",
            IntentKind::GetEmployeeUnit => "get_employee_unit",
            IntentKind::ListUnitEmployees => "list_unit_employees",
            IntentKind::GetEmployeeFteYear => "get_employee_fte_year",
            IntentKind::Help => "help",
            IntentKind::Unknown => "unknown",
        }
    }
}

/// The generic field bag attached to every parsed command. All fields are
/// nullable; which ones are actually required depends on the intent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct IntentFields {
    #[schemars(description = "Employee name as mentioned in the command")]
    pub employee_name: Option<String>,

    #[schemars(description = "Personal number, if the command references one")]
    pub personal_number: Option<String>,

    #[schemars(description = "Month as German text, e.g. 'März' or 'mrz'")]
    pub month: Option<String>,

    #[schemars(description = "Plan year the command refers to")]
    pub year: Option<i32>,

    #[schemars(description = "Relative FTE change, e.g. -0.5 for 'um 0,5 VK reduzieren'")]
    pub delta_fte: Option<f64>,

    #[schemars(description = "Absolute FTE target, e.g. 0.8 for 'auf 0,8 VK setzen'")]
    pub target_fte: Option<f64>,

    #[schemars(description = "Organizational unit (ward/station/department)")]
    pub unit: Option<String>,

    #[schemars(description = "Hospital site code, if mentioned")]
    pub site: Option<String>,
}

/// The typed interpretation returned by the language-model collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ParsedCommand {
    #[schemars(description = "The recognized intent")]
    pub intent: IntentKind,

    #[serde(default)]
    #[schemars(description = "Extracted fields; null where not mentioned")]
    pub fields: IntentFields,

    #[schemars(description = "Model confidence between 0.0 and 1.0")]
    pub confidence: f64,

    #[schemars(description = "True when mandatory information is missing and a follow-up question is needed")]
    pub needs_clarification: bool,

    #[schemars(description = "The follow-up question to ask the user, if any")]
    pub clarification_question: Option<String>,

    #[schemars(description = "Free-form interpretation notes")]
    pub notes: Option<String>,
}

impl ParsedCommand {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ParsedCommand)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

/// One variant per executable intent, constructed by validating the generic
/// field bag against the variant's required-field list.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    AdjustFteRelative {
        name: String,
        month: String,
        year: i32,
        delta: f64,
    },
    AdjustFteAbsolute {
        name: String,
        month: String,
        year: i32,
        target: f64,
    },
    MoveEmployeeUnit {
        name: String,
        year: i32,
        unit: String,
    },
    CheckEmployeeExists {
        name: String,
        year: Option<i32>,
    },
    GetEmployeeUnit {
        name: String,
        year: Option<i32>,
    },
    ListUnitEmployees {
        unit: String,
        year: Option<i32>,
    },
    GetEmployeeFteYear {
        name: String,
        year: i32,
        month: Option<String>,
    },
    Help,
}

impl PlanAction {
    pub fn from_parsed(parsed: &ParsedCommand) -> Result<Self> {
        let intent = parsed.intent.as_str();
        let f = &parsed.fields;
        let action = match parsed.intent {
            IntentKind::AdjustPersonFteRel => PlanAction::AdjustFteRelative {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                month: required_text(intent, "month", &f.month)?,
                year: required_year(intent, f.year)?,
                delta: f.delta_fte.ok_or(StaffingError::MissingField {
                    intent,
                    field: "delta_fte",
                })?,
            },
            IntentKind::AdjustPersonFteAbs => PlanAction::AdjustFteAbsolute {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                month: required_text(intent, "month", &f.month)?,
                year: required_year(intent, f.year)?,
                target: f.target_fte.ok_or(StaffingError::MissingField {
                    intent,
                    field: "target_fte",
                })?,
            },
            IntentKind::MoveEmployeeUnit => PlanAction::MoveEmployeeUnit {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                year: required_year(intent, f.year)?,
                unit: required_text(intent, "unit", &f.unit)?,
            },
            IntentKind::CheckEmployeeExists => PlanAction::CheckEmployeeExists {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                year: optional_year(f.year),
            },
            IntentKind::GetEmployeeUnit => PlanAction::GetEmployeeUnit {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                year: optional_year(f.year),
            },
            IntentKind::ListUnitEmployees => PlanAction::ListUnitEmployees {
                unit: required_text(intent, "unit", &f.unit)?,
                year: optional_year(f.year),
            },
            IntentKind::GetEmployeeFteYear => PlanAction::GetEmployeeFteYear {
                name: required_text(intent, "employee_name", &f.employee_name)?,
                year: required_year(intent, f.year)?,
                month: f.month.clone().filter(|m| !m.trim().is_empty()),
            },
            IntentKind::Help => PlanAction::Help,
            IntentKind::Unknown => {
                return Err(StaffingError::UnknownIntent("unknown".to_string()))
            }
        };
        Ok(action)
    }
}

fn required_text(
    intent: &'static str,
    field: &'static str,
    value: &Option<String>,
) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(StaffingError::MissingField { intent, field }),
    }
}

// Year 0 counts as absent; the upstream parser emits 0 when it could not
// commit to a year.
fn required_year(intent: &'static str, year: Option<i32>) -> Result<i32> {
    optional_year(year).ok_or(StaffingError::MissingField {
        intent,
        field: "year",
    })
}

fn optional_year(year: Option<i32>) -> Option<i32> {
    year.filter(|y| *y != 0)
}
