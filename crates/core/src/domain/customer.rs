use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub i64);

/// Contact details as collected for a submission. Email is the identity key
/// and is matched exactly, without case folding or trimming.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(flatten)]
    pub info: CustomerInfo,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    pub fn display_name(&self) -> String {
        display_name(&self.info.first_name, &self.info.last_name)
    }
}

pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{first_name} {last_name}").trim().to_string()
}

/// Outcome of resolving a submission's customer by email.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerResolution {
    pub customer: Customer,
    pub is_existing: bool,
}
