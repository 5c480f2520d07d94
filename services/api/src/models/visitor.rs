//! Visitor model and related functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    Pending,
    Contacted,
    Completed,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpStatus::Pending => "pending",
            FollowUpStatus::Contacted => "contacted",
            FollowUpStatus::Completed => "completed",
        }
    }
}

impl FromStr for FollowUpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FollowUpStatus::Pending),
            "contacted" => Ok(FollowUpStatus::Contacted),
            "completed" => Ok(FollowUpStatus::Completed),
            other => Err(format!("unknown follow-up status: {other}")),
        }
    }
}

/// Visitor entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub visit_date: NaiveDate,
    pub invited_by: Option<String>,
    pub follow_up_status: FollowUpStatus,
    pub notes: Option<String>,
}

/// New visitor payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVisitor {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub visit_date: NaiveDate,
    pub invited_by: Option<String>,
    pub follow_up_status: FollowUpStatus,
    pub notes: Option<String>,
}
