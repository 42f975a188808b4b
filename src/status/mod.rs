//! Condition-based status synthesis
//!
//! Reduces a resource's `status.conditions` list to a tri-state readiness
//! code and a short human-readable explanation.
//!
//! Lookups take the first condition whose `type` matches. Conditions are
//! not assumed to be sorted or unique, so an earlier duplicate always wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Condition type looked at when none is specified
pub const READY: &str = "Ready";

/// Status of a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Kubernetes-style status condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

impl Condition {
    pub fn new(type_: impl Into<String>, status: ConditionStatus) -> Self {
        Self {
            type_: type_.into(),
            status,
            reason: None,
            message: None,
            last_transition_time: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Ordinal readiness code
///
/// The numeric values are part of the contract with the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Ok = 1,
    Warning = 2,
    Error = 3,
}

impl StatusCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCode::Ok => "ok",
            StatusCode::Warning => "warning",
            StatusCode::Error => "error",
        }
    }
}

impl From<ConditionStatus> for StatusCode {
    fn from(status: ConditionStatus) -> Self {
        match status {
            ConditionStatus::True => StatusCode::Ok,
            ConditionStatus::False => StatusCode::Error,
            ConditionStatus::Unknown => StatusCode::Warning,
        }
    }
}

/// An ordered list of conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(Vec<Condition>);

impl Conditions {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }

    /// Read `status.conditions` from a raw object
    ///
    /// Entries that fail to parse are dropped; a missing list yields an
    /// empty store.
    pub fn from_object(obj: &Value) -> Self {
        let conditions = obj
            .get("status")
            .and_then(|s| s.get("conditions"))
            .and_then(|c| c.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|c| match serde_json::from_value::<Condition>(c.clone()) {
                        Ok(condition) => Some(condition),
                        Err(e) => {
                            tracing::debug!("Skipping malformed condition {:?}: {}", c, e);
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self(conditions)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First condition with the given type
    pub fn find(&self, type_: &str) -> Option<&Condition> {
        self.0.iter().find(|c| c.type_ == type_)
    }

    /// Synthesize the status of one condition type
    pub fn status(&self, type_: &str) -> ConditionSummary {
        ConditionSummary::new(type_, self.find(type_))
    }

    /// Synthesize the `Ready` status
    pub fn ready(&self) -> ConditionSummary {
        self.status(READY)
    }
}

impl From<Vec<Condition>> for Conditions {
    fn from(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }
}

/// The synthesized view of a single condition type
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSummary {
    type_: String,
    condition: Option<Condition>,
}

impl ConditionSummary {
    pub fn new(type_: impl Into<String>, condition: Option<&Condition>) -> Self {
        Self {
            type_: type_.into(),
            condition: condition.cloned(),
        }
    }

    /// The matched condition, if any
    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }

    /// Status of the matched condition; missing is `Unknown`
    pub fn condition_status(&self) -> ConditionStatus {
        self.condition
            .as_ref()
            .map(|c| c.status)
            .unwrap_or(ConditionStatus::Unknown)
    }

    pub fn status_code(&self) -> StatusCode {
        self.condition_status().into()
    }

    /// Human-readable status line
    ///
    /// - True: `Ready`
    /// - False: `Not Ready - <reason>`
    /// - Unknown: `Unknown - <reason> - <message>`
    pub fn status_text(&self) -> String {
        let reason = self.condition.as_ref().and_then(|c| c.reason.as_deref());
        match self.condition_status() {
            ConditionStatus::True => self.type_.clone(),
            ConditionStatus::False => {
                let mut text = format!("Not {}", self.type_);
                if let Some(reason) = reason {
                    text.push_str(" - ");
                    text.push_str(reason);
                }
                text
            }
            ConditionStatus::Unknown => {
                let mut text = ConditionStatus::Unknown.as_str().to_string();
                if let Some(reason) = reason {
                    text.push_str(" - ");
                    text.push_str(reason);
                }
                if let Some(message) = self.condition.as_ref().and_then(|c| c.message.as_deref())
                {
                    text.push_str(" - ");
                    text.push_str(message);
                }
                text
            }
        }
    }
}

/// One row of a condition table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionRow {
    #[serde(rename = "type")]
    pub type_: String,
    pub status: StatusCode,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

/// Summarize every condition in list order
///
/// Duplicated types are summarized once, by their first occurrence.
pub fn summarize_conditions(conditions: &Conditions) -> Vec<ConditionRow> {
    let mut seen = std::collections::HashSet::new();
    conditions
        .iter()
        .filter(|c| seen.insert(c.type_.as_str()))
        .map(|c| {
            let summary = conditions.status(&c.type_);
            ConditionRow {
                type_: c.type_.clone(),
                status: summary.status_code(),
                text: summary.status_text(),
                message: c.message.clone(),
                last_transition_time: c.last_transition_time,
            }
        })
        .collect()
}
