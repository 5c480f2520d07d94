//! Message template model

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Sms,
    Email,
}

impl TemplateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateType::Sms => "sms",
            TemplateType::Email => "email",
        }
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sms" => Ok(TemplateType::Sms),
            "email" => Ok(TemplateType::Email),
            other => Err(format!("unknown template type: {other}")),
        }
    }
}

/// Message template entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub id: Uuid,
    pub name: String,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TemplateType,
}

/// New message template payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessageTemplate {
    pub name: String,
    pub subject: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: TemplateType,
}
