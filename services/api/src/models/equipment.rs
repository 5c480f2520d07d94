//! Equipment model and related functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    Excellent,
    Good,
    Fair,
    NeedsRepair,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Excellent => "excellent",
            Condition::Good => "good",
            Condition::Fair => "fair",
            Condition::NeedsRepair => "needs-repair",
        }
    }
}

impl FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "excellent" => Ok(Condition::Excellent),
            "good" => Ok(Condition::Good),
            "fair" => Ok(Condition::Fair),
            "needs-repair" => Ok(Condition::NeedsRepair),
            other => Err(format!("unknown condition: {other}")),
        }
    }
}

/// Equipment entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub condition: Condition,
    pub purchase_date: NaiveDate,
    pub value: f64,
    pub location: String,
    pub notes: Option<String>,
}

/// New equipment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEquipment {
    pub name: String,
    pub category: String,
    pub condition: Condition,
    pub purchase_date: NaiveDate,
    pub value: f64,
    pub location: String,
    pub notes: Option<String>,
}

/// Partial equipment update; omitted fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEquipment {
    pub name: Option<String>,
    pub category: Option<String>,
    pub condition: Option<Condition>,
    pub purchase_date: Option<NaiveDate>,
    pub value: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}
