//! Donation model and related functionality

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationCategory {
    Tithe,
    Offering,
    Project,
    Special,
}

impl DonationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationCategory::Tithe => "tithe",
            DonationCategory::Offering => "offering",
            DonationCategory::Project => "project",
            DonationCategory::Special => "special",
        }
    }
}

impl FromStr for DonationCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tithe" => Ok(DonationCategory::Tithe),
            "offering" => Ok(DonationCategory::Offering),
            "project" => Ok(DonationCategory::Project),
            "special" => Ok(DonationCategory::Special),
            other => Err(format!("unknown donation category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Check,
    Online,
    Transfer,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Check => "check",
            PaymentMethod::Online => "online",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "check" => Ok(PaymentMethod::Check),
            "online" => Ok(PaymentMethod::Online),
            "transfer" => Ok(PaymentMethod::Transfer),
            other => Err(format!("unknown payment method: {other}")),
        }
    }
}

/// Donation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: Uuid,
    pub member_id: Uuid,
    pub amount: f64,
    pub category: DonationCategory,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    pub receipt_sent: bool,
}

/// New donation payload. The receipt flag defaults to "not sent"; a
/// deferred task flips it later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDonation {
    pub member_id: Uuid,
    pub amount: f64,
    pub category: DonationCategory,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub notes: Option<String>,
    #[serde(default)]
    pub receipt_sent: bool,
}
