//! Aircraft parts and their authenticity record
//!
//! Part status is never derived. It moves only through an explicit
//! verification, or through a caller update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::days_until;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    Authentic,
    Counterfeit,
    Pending,
    Retired,
}

impl PartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartStatus::Authentic => "authentic",
            PartStatus::Counterfeit => "counterfeit",
            PartStatus::Pending => "pending",
            PartStatus::Retired => "retired",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "authentic" => Some(PartStatus::Authentic),
            "counterfeit" => Some(PartStatus::Counterfeit),
            "pending" => Some(PartStatus::Pending),
            "retired" => Some(PartStatus::Retired),
            _ => None,
        }
    }
}

impl Default for PartStatus {
    fn default() -> Self {
        PartStatus::Pending
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufactured {
    pub date: Option<DateTime<Utc>>,
    pub facility: Option<String>,
    pub batch_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certified {
    pub date: Option<DateTime<Utc>>,
    pub authority: Option<String>,
    pub certificate_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installed {
    pub date: Option<DateTime<Utc>>,
    /// Installing mechanic id
    pub mechanic: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub result: Option<String>,
    pub mechanic: Option<String>,
    pub notes: Option<String>,
}

/// Manufacture, certification, installation and inspection events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lifecycle {
    pub manufactured: Manufactured,
    pub certified: Certified,
    pub installed: Installed,
    pub inspections: Vec<Inspection>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    pub weight: Option<f64>,
    pub material: Option<String>,
    /// Free-form dimensions and operating limits
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Authenticity {
    pub verified: bool,
    pub verification_date: Option<DateTime<Utc>>,
    pub verification_method: Option<String>,
    pub blockchain_proof: Option<String>,
}

/// A tracked aircraft part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: String,
    /// Stored upper-case
    pub part_number: String,
    pub name: String,
    pub manufacturer: String,
    /// Unique across all parts
    pub serial_number: String,
    /// Owning aircraft id
    pub aircraft: String,
    pub install_date: DateTime<Utc>,
    pub status: PartStatus,
    pub location: String,
    pub blockchain_hash: String,
    pub qr_code: Option<String>,
    pub next_inspection: DateTime<Utc>,
    pub lifecycle: Lifecycle,
    pub specifications: Specifications,
    pub authenticity: Authenticity,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    pub fn days_until_inspection(&self, now: DateTime<Utc>) -> i64 {
        days_until(self.next_inspection, now)
    }

    /// Record the outcome of an authenticity check
    pub fn record_verification(&mut self, authentic: bool, method: &str, now: DateTime<Utc>) {
        self.status = if authentic {
            PartStatus::Authentic
        } else {
            PartStatus::Counterfeit
        };
        self.authenticity = Authenticity {
            verified: true,
            verification_date: Some(now),
            verification_method: Some(method.to_string()),
            blockchain_proof: Some(self.blockchain_hash.clone()),
        };
        self.updated_at = now;
    }

    pub fn add_inspection(&mut self, inspection: Inspection) {
        self.updated_at = inspection.date;
        self.lifecycle.inspections.push(inspection);
    }
}
