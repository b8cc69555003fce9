//! Work order lifecycle
//!
//! States: `pending -> scheduled -> in-progress -> completed`, with `overdue`
//! reachable from every state except `completed`. `cancelled` is set only by
//! an explicit update and still turns `overdue` once the due date passes.
//!
//! On every write the status is re-derived with these rules, in order:
//! 1. `pending` and `scheduled_date <= now` becomes `scheduled`
//! 2. any order other than `completed` with `due_date < now` becomes `overdue`
//! 3. `in-progress` with a non-empty, fully completed checklist becomes
//!    `completed`; `completed_date` is set at this transition only
//!
//! Completing an order yields [`FollowUp`] effects on the assigned mechanic and
//! the owning aircraft. The store applies them in the same transaction as the
//! work order itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaintenanceType {
    #[serde(rename = "Scheduled Inspection")]
    ScheduledInspection,
    #[serde(rename = "Engine Service")]
    EngineService,
    #[serde(rename = "Avionics Check")]
    AvionicsCheck,
    #[serde(rename = "Landing Gear Service")]
    LandingGearService,
    #[serde(rename = "Hydraulic Service")]
    HydraulicService,
    #[serde(rename = "Emergency Repair")]
    EmergencyRepair,
    #[serde(rename = "Compliance Check")]
    ComplianceCheck,
    #[serde(rename = "Parts Replacement")]
    PartsReplacement,
}

impl MaintenanceType {
    pub const ALL: [MaintenanceType; 8] = [
        MaintenanceType::ScheduledInspection,
        MaintenanceType::EngineService,
        MaintenanceType::AvionicsCheck,
        MaintenanceType::LandingGearService,
        MaintenanceType::HydraulicService,
        MaintenanceType::EmergencyRepair,
        MaintenanceType::ComplianceCheck,
        MaintenanceType::PartsReplacement,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceType::ScheduledInspection => "Scheduled Inspection",
            MaintenanceType::EngineService => "Engine Service",
            MaintenanceType::AvionicsCheck => "Avionics Check",
            MaintenanceType::LandingGearService => "Landing Gear Service",
            MaintenanceType::HydraulicService => "Hydraulic Service",
            MaintenanceType::EmergencyRepair => "Emergency Repair",
            MaintenanceType::ComplianceCheck => "Compliance Check",
            MaintenanceType::PartsReplacement => "Parts Replacement",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MaintenanceStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Overdue,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Pending => "pending",
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in-progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
            MaintenanceStatus::Overdue => "overdue",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(MaintenanceStatus::Pending),
            "scheduled" => Some(MaintenanceStatus::Scheduled),
            "in-progress" => Some(MaintenanceStatus::InProgress),
            "completed" => Some(MaintenanceStatus::Completed),
            "cancelled" => Some(MaintenanceStatus::Cancelled),
            "overdue" => Some(MaintenanceStatus::Overdue),
            _ => None,
        }
    }

    /// Only `completed` is left alone by derivation
    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Completed)
    }

    /// Statuses a caller may request directly; the rest are derived
    pub fn is_settable(&self) -> bool {
        matches!(
            self,
            MaintenanceStatus::Pending
                | MaintenanceStatus::Scheduled
                | MaintenanceStatus::InProgress
                | MaintenanceStatus::Cancelled
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub task: String,
    pub completed: bool,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

impl ChecklistItem {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            completed: false,
            completed_by: None,
            completed_at: None,
            notes: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartActionKind {
    Inspect,
    Replace,
    Repair,
    Calibrate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAction {
    pub part: String,
    pub action: PartActionKind,
    pub completed: bool,
}

/// One regulator or manufacturer check
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceCheck {
    pub required: bool,
    pub passed: Option<bool>,
    pub check_date: Option<DateTime<Utc>>,
    /// Inspector name or manufacturer reference
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Compliance {
    pub faa: ComplianceCheck,
    pub easa: ComplianceCheck,
    pub manufacturer: ComplianceCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub labor: f64,
    pub parts: f64,
    pub total: f64,
}

impl Cost {
    pub fn new(labor: f64, parts: f64) -> Self {
        Self {
            labor,
            parts,
            total: labor + parts,
        }
    }
}

/// Audit stamp produced by the signature action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalSignature {
    pub mechanic: String,
    pub supervisor: String,
    pub timestamp: DateTime<Utc>,
    pub hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainRecord {
    pub transaction_hash: String,
    pub block_number: u64,
    pub gas_used: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    pub kind: String,
    pub filename: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
    pub uploaded_by: Option<String>,
}

/// A maintenance work order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    /// `WO-<year>-<sequence>`
    pub work_order: String,
    pub aircraft: String,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub priority: Priority,
    pub status: MaintenanceStatus,
    pub assigned_to: String,
    pub scheduled_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub completed_date: Option<DateTime<Utc>>,
    pub estimated_hours: f64,
    pub actual_hours: Option<f64>,
    pub parts: Vec<PartAction>,
    pub checklist: Vec<ChecklistItem>,
    pub compliance: Compliance,
    pub blockchain_record: Option<BlockchainRecord>,
    pub digital_signature: Option<DigitalSignature>,
    pub documentation: Vec<Documentation>,
    pub cost: Option<Cost>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status before and after a derivation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTransition {
    pub from: MaintenanceStatus,
    pub to: MaintenanceStatus,
}

impl StatusTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    pub fn became_completed(&self) -> bool {
        self.from != MaintenanceStatus::Completed && self.to == MaintenanceStatus::Completed
    }
}

/// Cross-entity update owed after a work order completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    /// Increment `tasks_completed`, decrement `tasks_in_progress` (floored at 0)
    MechanicTaskCompleted {
        mechanic_id: String,
        work_order_id: String,
        completed_at: DateTime<Utc>,
    },
    /// Set `last_maintenance` and advance `next_maintenance`
    AircraftInspected {
        aircraft_id: String,
        completed_at: DateTime<Utc>,
    },
}

/// Status `order` should carry at `now`
pub fn derive_status(order: &WorkOrder, now: DateTime<Utc>) -> MaintenanceStatus {
    let mut status = order.status;
    if status.is_terminal() {
        return status;
    }

    if status == MaintenanceStatus::Pending && order.scheduled_date <= now {
        status = MaintenanceStatus::Scheduled;
    }

    if order.due_date < now {
        status = MaintenanceStatus::Overdue;
    }

    if status == MaintenanceStatus::InProgress && order.checklist_done() {
        status = MaintenanceStatus::Completed;
    }

    status
}

impl WorkOrder {
    /// Non-empty and every item completed
    pub fn checklist_done(&self) -> bool {
        !self.checklist.is_empty() && self.checklist.iter().all(|item| item.completed)
    }

    pub fn completed_tasks(&self) -> usize {
        self.checklist.iter().filter(|item| item.completed).count()
    }

    /// Rounded percentage of completed checklist items; 0 for an empty checklist
    pub fn completion_percentage(&self) -> u32 {
        if self.checklist.is_empty() {
            return 0;
        }
        ((self.completed_tasks() as f64 / self.checklist.len() as f64) * 100.0).round() as u32
    }

    /// Re-derive status and stamp `updated_at`; call before every write
    pub fn refresh(&mut self, now: DateTime<Utc>) -> StatusTransition {
        let from = self.status;
        let to = derive_status(self, now);
        self.status = to;
        if to == MaintenanceStatus::Completed && self.completed_date.is_none() {
            self.completed_date = Some(now);
        }
        self.updated_at = now;
        StatusTransition { from, to }
    }

    /// Apply a caller-requested status, rejecting derived-only values
    pub fn request_status(&mut self, requested: MaintenanceStatus) -> Result<()> {
        if requested == self.status {
            return Ok(());
        }
        if !requested.is_settable() {
            return Err(DomainError::InvalidStatus(format!(
                "status '{}' is derived and cannot be set directly",
                requested.as_str()
            )));
        }
        if self.status == MaintenanceStatus::Completed {
            return Err(DomainError::InvalidStatus(
                "completed work orders cannot change status".to_string(),
            ));
        }
        self.status = requested;
        Ok(())
    }

    /// Mark checklist item `index` done and re-derive status
    pub fn complete_task(
        &mut self,
        index: usize,
        mechanic_id: &str,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<StatusTransition> {
        let len = self.checklist.len();
        let item = self
            .checklist
            .get_mut(index)
            .ok_or(DomainError::OutOfRange { index, len })?;

        item.completed = true;
        item.completed_by = Some(mechanic_id.to_string());
        item.completed_at = Some(now);
        item.notes = notes;

        Ok(self.refresh(now))
    }

    /// Effects owed once this order has transitioned into `completed`
    pub fn completion_effects(&self, now: DateTime<Utc>) -> Vec<FollowUp> {
        let mut effects = vec![FollowUp::MechanicTaskCompleted {
            mechanic_id: self.assigned_to.clone(),
            work_order_id: self.id.clone(),
            completed_at: now,
        }];
        if self.maintenance_type == MaintenanceType::ScheduledInspection {
            effects.push(FollowUp::AircraftInspected {
                aircraft_id: self.aircraft.clone(),
                completed_at: now,
            });
        }
        effects
    }

    /// Whether the scheduled or due date falls inside `[start, end]`
    pub fn falls_within(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let inside = |d: DateTime<Utc>| d >= start && d <= end;
        inside(self.scheduled_date) || inside(self.due_date)
    }
}
