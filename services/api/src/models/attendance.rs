//! Attendance model and related functionality
//!
//! Attendance is recorded as a per-service count aggregate keyed by
//! (service date, service type).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    SundayEncounter,
    WednesdayMiracle,
    FridayPrayer,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::SundayEncounter => "sunday-encounter",
            ServiceType::WednesdayMiracle => "wednesday-miracle",
            ServiceType::FridayPrayer => "friday-prayer",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sunday-encounter" => Ok(ServiceType::SundayEncounter),
            "wednesday-miracle" => Ok(ServiceType::WednesdayMiracle),
            "friday-prayer" => Ok(ServiceType::FridayPrayer),
            other => Err(format!("unknown service type: {other}")),
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance count aggregate for one service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub service_date: NaiveDate,
    pub service_type: ServiceType,
    pub total_count: i32,
    pub men_count: i32,
    pub women_count: i32,
    pub youth_count: i32,
    pub children_count: i32,
    pub guests_count: i32,
    pub notes: Option<String>,
}

/// New attendance record payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAttendanceRecord {
    pub service_date: NaiveDate,
    pub service_type: ServiceType,
    pub total_count: i32,
    pub men_count: i32,
    pub women_count: i32,
    pub youth_count: i32,
    pub children_count: i32,
    pub guests_count: i32,
    pub notes: Option<String>,
}

impl NewAttendanceRecord {
    /// Sum of the category sub-counts
    pub fn category_sum(&self) -> i32 {
        self.men_count
            + self.women_count
            + self.youth_count
            + self.children_count
            + self.guests_count
    }
}
