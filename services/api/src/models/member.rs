//! Member model and related functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Church department a member belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Department {
    Faith,
    Love,
    Hope,
}

impl Department {
    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Faith => "Faith",
            Department::Love => "Love",
            Department::Hope => "Hope",
        }
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Faith" => Ok(Department::Faith),
            "Love" => Ok(Department::Love),
            "Hope" => Ok(Department::Hope),
            other => Err(format!("unknown department: {other}")),
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BaptismStatus {
    Baptized,
    NotBaptized,
    Scheduled,
}

impl BaptismStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BaptismStatus::Baptized => "baptized",
            BaptismStatus::NotBaptized => "not-baptized",
            BaptismStatus::Scheduled => "scheduled",
        }
    }
}

impl FromStr for BaptismStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "baptized" => Ok(BaptismStatus::Baptized),
            "not-baptized" => Ok(BaptismStatus::NotBaptized),
            "scheduled" => Ok(BaptismStatus::Scheduled),
            other => Err(format!("unknown baptism status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Inactive,
}

impl MemberStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            other => Err(format!("unknown member status: {other}")),
        }
    }
}

/// Member entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub member_number: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub department: Department,
    pub baptism_status: BaptismStatus,
    pub status: MemberStatus,
    pub join_date: NaiveDate,
    pub birth_date: NaiveDate,
    pub address: String,
    pub photo: Option<String>,
}

/// New member creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMember {
    pub member_number: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub department: Department,
    pub baptism_status: BaptismStatus,
    pub status: MemberStatus,
    pub join_date: NaiveDate,
    pub birth_date: NaiveDate,
    pub address: String,
    pub photo: Option<String>,
}

/// Partial member update; omitted fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMember {
    pub member_number: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub department: Option<Department>,
    pub baptism_status: Option<BaptismStatus>,
    pub status: Option<MemberStatus>,
    pub join_date: Option<NaiveDate>,
    pub birth_date: Option<NaiveDate>,
    pub address: Option<String>,
    pub photo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_spellings() {
        assert_eq!(BaptismStatus::NotBaptized.as_str(), "not-baptized");
        assert_eq!(
            "not-baptized".parse::<BaptismStatus>().unwrap(),
            BaptismStatus::NotBaptized
        );
        assert_eq!("Faith".parse::<Department>().unwrap(), Department::Faith);
        assert!("faith".parse::<Department>().is_err());
    }

    #[test]
    fn test_serde_matches_wire_spelling() {
        let json = serde_json::to_string(&BaptismStatus::NotBaptized).unwrap();
        assert_eq!(json, "\"not-baptized\"");
        let json = serde_json::to_string(&MemberStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }
}
