//! Mechanics, certifications and performance scoring

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper bound of `reputation_score`
pub const MAX_REPUTATION: u32 = 1000;

/// Upper bound of `rating`
pub const MAX_RATING: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertificationStatus {
    Active,
    Expired,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub name: String,
    pub number: Option<String>,
    pub issued_by: Option<String>,
    pub issued_date: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub status: CertificationStatus,
}

impl Certification {
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == CertificationStatus::Active
            && self.expiry_date.map(|expiry| expiry < now).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvailabilityStatus {
    Available,
    Busy,
    OffDuty,
    Vacation,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Busy => "busy",
            AvailabilityStatus::OffDuty => "off-duty",
            AvailabilityStatus::Vacation => "vacation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(AvailabilityStatus::Available),
            "busy" => Some(AvailabilityStatus::Busy),
            "off-duty" => Some(AvailabilityStatus::OffDuty),
            "vacation" => Some(AvailabilityStatus::Vacation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub status: AvailabilityStatus,
    #[serde(default)]
    pub schedule: Vec<ScheduleSlot>,
}

impl Default for Availability {
    fn default() -> Self {
        Self {
            status: AvailabilityStatus::Available,
            schedule: Vec::new(),
        }
    }
}

/// Scores in `[0, 100]`, satisfaction in `[0, 5]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    pub quality_score: f64,
    pub on_time_completion: f64,
    pub compliance_rate: f64,
    pub average_task_time: Option<f64>,
    pub customer_satisfaction: f64,
}

impl Performance {
    /// Mean of the quality, on-time and compliance scores
    pub fn triad_average(&self) -> f64 {
        (self.quality_score + self.on_time_completion + self.compliance_rate) / 3.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkHistoryEntry {
    /// Work order id
    pub maintenance: String,
    pub completed_at: DateTime<Utc>,
    pub rating: Option<f64>,
    pub feedback: Option<String>,
}

/// Partial performance update; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceUpdate {
    pub quality_score: Option<f64>,
    pub on_time_completion: Option<f64>,
    pub compliance_rate: Option<f64>,
    pub rating: Option<f64>,
}

/// A maintenance technician.
///
/// The hashed credential and the private key are held by the store in
/// separate columns and never appear on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mechanic {
    pub id: String,
    /// Unique
    pub employee_id: String,
    pub name: String,
    /// Unique, stored lower-case
    pub email: String,
    pub certifications: Vec<Certification>,
    pub specialties: Vec<String>,
    /// Running average in `[0, 5]`
    pub rating: f64,
    pub tasks_completed: u32,
    pub tasks_in_progress: u32,
    /// `[0, 1000]`, derived from the performance triad
    pub reputation_score: u32,
    pub blockchain_signatures: u32,
    pub wallet_address: String,
    pub performance: Performance,
    pub work_history: Vec<WorkHistoryEntry>,
    pub availability: Availability,
    pub join_date: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Mechanic {
    /// Rounded mean of the performance triad
    pub fn overall_performance(&self) -> u32 {
        self.performance.triad_average().round().max(0.0) as u32
    }

    pub fn on_task_assigned(&mut self, now: DateTime<Utc>) {
        self.tasks_in_progress += 1;
        self.updated_at = now;
    }

    pub fn on_task_completed(&mut self, work_order_id: &str, now: DateTime<Utc>) {
        self.tasks_completed += 1;
        self.tasks_in_progress = self.tasks_in_progress.saturating_sub(1);
        self.work_history.push(WorkHistoryEntry {
            maintenance: work_order_id.to_string(),
            completed_at: now,
            rating: None,
            feedback: None,
        });
        self.last_active = now;
        self.updated_at = now;
    }

    pub fn record_signature(&mut self, now: DateTime<Utc>) {
        self.blockchain_signatures += 1;
        self.last_active = now;
        self.updated_at = now;
    }

    /// Apply a performance update and recompute the reputation score.
    ///
    /// A rating is folded into the running average weighted by the number of
    /// work history entries.
    pub fn update_performance(&mut self, update: &PerformanceUpdate, now: DateTime<Utc>) {
        if let Some(score) = update.quality_score {
            self.performance.quality_score = score.clamp(0.0, 100.0);
        }
        if let Some(score) = update.on_time_completion {
            self.performance.on_time_completion = score.clamp(0.0, 100.0);
        }
        if let Some(score) = update.compliance_rate {
            self.performance.compliance_rate = score.clamp(0.0, 100.0);
        }
        if let Some(rating) = update.rating {
            let n = self.work_history.len() as f64;
            let averaged = (self.rating * n + rating.clamp(0.0, MAX_RATING)) / (n + 1.0);
            self.rating = averaged.clamp(0.0, MAX_RATING);
        }

        let score = (self.performance.triad_average() * 10.0).round();
        self.reputation_score = (score.max(0.0) as u32).min(MAX_REPUTATION);
        self.updated_at = now;
    }

    pub fn add_certification(&mut self, certification: Certification, now: DateTime<Utc>) {
        self.certifications.push(certification);
        self.updated_at = now;
    }

    /// Mark active certifications past their expiry as expired. Returns
    /// whether anything changed.
    pub fn expire_certifications(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        for cert in self.certifications.iter_mut().filter(|c| c.is_lapsed(now)) {
            cert.status = CertificationStatus::Expired;
            changed = true;
        }
        changed
    }
}
