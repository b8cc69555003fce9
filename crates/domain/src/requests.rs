//! Request bodies and their validation
//!
//! Every body field is optional at the type level so that missing fields
//! surface as field-level messages rather than a single decode error.
//! `validate` turns a body into a draft with defaults applied.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::AircraftStatus;
use crate::error::{DomainError, Result};
use crate::maintenance::{ChecklistItem, MaintenanceStatus, MaintenanceType, Priority};
use crate::mechanic::{AvailabilityStatus, Certification, CertificationStatus};
use crate::part::PartStatus;
use crate::transaction::EntityType;
use crate::validation::{is_valid_email, FieldErrors};

pub const MIN_YEAR_BUILT: i64 = 1900;
pub const MIN_PASSWORD_LEN: usize = 6;

const AIRCRAFT_STATUSES: &[&str] = &["compliant", "alert", "overdue", "grounded"];
const PART_STATUSES: &[&str] = &["authentic", "counterfeit", "pending", "retired"];
const PRIORITIES: &[&str] = &["low", "medium", "high", "critical"];
const SETTABLE_STATUSES: &[&str] = &["pending", "scheduled", "in-progress", "cancelled"];
const CERTIFICATION_STATUSES: &[&str] = &["active", "expired", "suspended"];
const AVAILABILITY_STATUSES: &[&str] = &["available", "busy", "off-duty", "vacation"];
const MAINTENANCE_TYPES: &[&str] = &[
    "Scheduled Inspection",
    "Engine Service",
    "Avionics Check",
    "Landing Gear Service",
    "Hydraulic Service",
    "Emergency Repair",
    "Compliance Check",
    "Parts Replacement",
];
const ENTITY_TYPES: &[&str] = &["Aircraft", "Part", "Maintenance", "Mechanic", "Contract"];

fn parse_certification_status(value: &str) -> Option<CertificationStatus> {
    match value {
        "active" => Some(CertificationStatus::Active),
        "expired" => Some(CertificationStatus::Expired),
        "suspended" => Some(CertificationStatus::Suspended),
        _ => None,
    }
}

fn parse_settable_status(value: &str) -> Option<MaintenanceStatus> {
    MaintenanceStatus::parse(value).filter(MaintenanceStatus::is_settable)
}

// ---------------------------------------------------------------------------
// Aircraft
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AircraftRequest {
    pub registration: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub year_built: Option<i64>,
    pub flight_hours: Option<f64>,
    pub last_maintenance: Option<String>,
    pub next_maintenance: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AircraftDraft {
    /// Upper-cased
    pub registration: String,
    pub model: String,
    pub manufacturer: String,
    pub year_built: i32,
    pub flight_hours: f64,
    pub last_maintenance: DateTime<Utc>,
    pub next_maintenance: DateTime<Utc>,
    pub location: String,
    /// Only `grounded` survives derivation
    pub status: Option<AircraftStatus>,
}

impl AircraftRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<AircraftDraft> {
        let mut errors = FieldErrors::new();

        let registration = errors.required("registration", self.registration.as_ref());
        let model = errors.required("model", self.model.as_ref());
        let manufacturer = errors.required("manufacturer", self.manufacturer.as_ref());
        let location = errors.required("location", self.location.as_ref());

        let year_built = match self.year_built {
            Some(year) => {
                let in_range = errors.min("yearBuilt", year as f64, MIN_YEAR_BUILT as f64)
                    && errors.max("yearBuilt", year as f64, now.year() as f64);
                in_range.then_some(year as i32)
            }
            None => {
                errors.push("\"yearBuilt\" is required");
                None
            }
        };

        let flight_hours = self.flight_hours.unwrap_or(0.0);
        errors.min("flightHours", flight_hours, 0.0);

        let last_maintenance = errors.optional_date("lastMaintenance", self.last_maintenance.as_ref());
        let next_maintenance = errors.required_date("nextMaintenance", self.next_maintenance.as_ref());

        let status = self
            .status
            .as_deref()
            .and_then(|s| errors.one_of("status", s, AIRCRAFT_STATUSES, AircraftStatus::parse));

        errors.finish()?;

        match (registration, model, manufacturer, location, year_built, next_maintenance) {
            (Some(registration), Some(model), Some(manufacturer), Some(location), Some(year_built), Some(next_maintenance)) => {
                Ok(AircraftDraft {
                    registration: registration.to_uppercase(),
                    model,
                    manufacturer,
                    year_built,
                    flight_hours,
                    last_maintenance: last_maintenance.unwrap_or(now),
                    next_maintenance,
                    location,
                    status,
                })
            }
            _ => Err(DomainError::validation("aircraft body is incomplete")),
        }
    }
}

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartRequest {
    pub part_number: Option<String>,
    pub name: Option<String>,
    pub manufacturer: Option<String>,
    pub serial_number: Option<String>,
    pub aircraft: Option<String>,
    pub install_date: Option<String>,
    pub location: Option<String>,
    pub next_inspection: Option<String>,
    pub status: Option<String>,
    pub manufactured_date: Option<String>,
    pub manufacturing_facility: Option<String>,
    pub batch_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartDraft {
    /// Upper-cased
    pub part_number: String,
    pub name: String,
    pub manufacturer: String,
    pub serial_number: String,
    pub aircraft: String,
    pub install_date: DateTime<Utc>,
    pub location: String,
    pub next_inspection: DateTime<Utc>,
    pub status: PartStatus,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub manufacturing_facility: Option<String>,
    pub batch_number: Option<String>,
}

impl PartRequest {
    pub fn validate(&self) -> Result<PartDraft> {
        let mut errors = FieldErrors::new();

        let part_number = errors.required("partNumber", self.part_number.as_ref());
        let name = errors.required("name", self.name.as_ref());
        let manufacturer = errors.required("manufacturer", self.manufacturer.as_ref());
        let serial_number = errors.required("serialNumber", self.serial_number.as_ref());
        let aircraft = errors.required("aircraft", self.aircraft.as_ref());
        let install_date = errors.required_date("installDate", self.install_date.as_ref());
        let location = errors.required("location", self.location.as_ref());
        let next_inspection = errors.required_date("nextInspection", self.next_inspection.as_ref());
        let status = self
            .status
            .as_deref()
            .and_then(|s| errors.one_of("status", s, PART_STATUSES, PartStatus::parse));
        let manufactured_date = errors.optional_date("manufacturedDate", self.manufactured_date.as_ref());

        errors.finish()?;

        match (part_number, name, manufacturer, serial_number, aircraft, install_date, location, next_inspection) {
            (
                Some(part_number),
                Some(name),
                Some(manufacturer),
                Some(serial_number),
                Some(aircraft),
                Some(install_date),
                Some(location),
                Some(next_inspection),
            ) => Ok(PartDraft {
                part_number: part_number.to_uppercase(),
                name,
                manufacturer,
                serial_number,
                aircraft,
                install_date,
                location,
                next_inspection,
                status: status.unwrap_or_default(),
                manufactured_date,
                manufacturing_facility: self.manufacturing_facility.clone(),
                batch_number: self.batch_number.clone(),
            }),
            _ => Err(DomainError::validation("part body is incomplete")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub result: Option<String>,
    pub mechanic_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanQrRequest {
    pub qr_code: Option<String>,
}

impl ScanQrRequest {
    pub fn validate(&self) -> Result<String> {
        match self.qr_code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => Ok(code.to_string()),
            _ => Err(DomainError::validation("QR code is required")),
        }
    }
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItemRequest {
    pub task: Option<String>,
    pub completed: Option<bool>,
}

fn validate_checklist(errors: &mut FieldErrors, items: &[ChecklistItemRequest]) -> Vec<ChecklistItem> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let field = format!("checklist[{}].task", i);
            errors.required(&field, item.task.as_ref()).map(|task| {
                let mut entry = ChecklistItem::new(task);
                entry.completed = item.completed.unwrap_or(false);
                entry
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRequest {
    pub aircraft: Option<String>,
    #[serde(rename = "type")]
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<String>,
    pub scheduled_date: Option<String>,
    pub due_date: Option<String>,
    pub estimated_hours: Option<f64>,
    pub checklist: Option<Vec<ChecklistItemRequest>>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceDraft {
    pub aircraft: String,
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub priority: Priority,
    pub assigned_to: String,
    pub scheduled_date: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub estimated_hours: f64,
    pub checklist: Vec<ChecklistItem>,
    pub status: MaintenanceStatus,
}

impl MaintenanceRequest {
    pub fn validate(&self) -> Result<MaintenanceDraft> {
        let mut errors = FieldErrors::new();

        let aircraft = errors.required("aircraft", self.aircraft.as_ref());
        let maintenance_type = match self.maintenance_type.as_deref() {
            Some(t) => errors.one_of("type", t, MAINTENANCE_TYPES, MaintenanceType::parse),
            None => {
                errors.push("\"type\" is required");
                None
            }
        };
        let description = errors.required("description", self.description.as_ref());
        let priority = self
            .priority
            .as_deref()
            .and_then(|p| errors.one_of("priority", p, PRIORITIES, Priority::parse));
        let assigned_to = errors.required("assignedTo", self.assigned_to.as_ref());
        let scheduled_date = errors.required_date("scheduledDate", self.scheduled_date.as_ref());
        let due_date = errors.required_date("dueDate", self.due_date.as_ref());
        let estimated_hours = match self.estimated_hours {
            Some(hours) => errors.min("estimatedHours", hours, 0.0).then_some(hours),
            None => {
                errors.push("\"estimatedHours\" is required");
                None
            }
        };
        let checklist = validate_checklist(&mut errors, self.checklist.as_deref().unwrap_or(&[]));
        let status = self
            .status
            .as_deref()
            .and_then(|s| errors.one_of("status", s, SETTABLE_STATUSES, parse_settable_status));

        errors.finish()?;

        match (aircraft, maintenance_type, description, assigned_to, scheduled_date, due_date, estimated_hours) {
            (
                Some(aircraft),
                Some(maintenance_type),
                Some(description),
                Some(assigned_to),
                Some(scheduled_date),
                Some(due_date),
                Some(estimated_hours),
            ) => Ok(MaintenanceDraft {
                aircraft,
                maintenance_type,
                description,
                priority: priority.unwrap_or(Priority::Medium),
                assigned_to,
                scheduled_date,
                due_date,
                estimated_hours,
                checklist,
                status: status.unwrap_or(MaintenanceStatus::Pending),
            }),
            _ => Err(DomainError::validation("maintenance body is incomplete")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRequest {
    pub labor: Option<f64>,
    pub parts: Option<f64>,
}

/// Partial work order update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceUpdateRequest {
    #[serde(rename = "type")]
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub scheduled_date: Option<String>,
    pub due_date: Option<String>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub checklist: Option<Vec<ChecklistItemRequest>>,
    pub cost: Option<CostRequest>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaintenanceUpdate {
    pub maintenance_type: Option<MaintenanceType>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub status: Option<MaintenanceStatus>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub checklist: Option<Vec<ChecklistItem>>,
    pub cost: Option<(f64, f64)>,
}

impl MaintenanceUpdateRequest {
    pub fn validate(&self) -> Result<MaintenanceUpdate> {
        let mut errors = FieldErrors::new();

        let maintenance_type = self
            .maintenance_type
            .as_deref()
            .and_then(|t| errors.one_of("type", t, MAINTENANCE_TYPES, MaintenanceType::parse));
        let description = errors.optional("description", self.description.as_ref());
        let priority = self
            .priority
            .as_deref()
            .and_then(|p| errors.one_of("priority", p, PRIORITIES, Priority::parse));
        let status = self
            .status
            .as_deref()
            .and_then(|s| errors.one_of("status", s, SETTABLE_STATUSES, parse_settable_status));
        let scheduled_date = errors.optional_date("scheduledDate", self.scheduled_date.as_ref());
        let due_date = errors.optional_date("dueDate", self.due_date.as_ref());
        let estimated_hours = self
            .estimated_hours
            .filter(|h| errors.min("estimatedHours", *h, 0.0));
        let actual_hours = self.actual_hours.filter(|h| errors.min("actualHours", *h, 0.0));
        let checklist = self
            .checklist
            .as_deref()
            .map(|items| validate_checklist(&mut errors, items));
        let cost = self.cost.as_ref().map(|c| {
            let labor = c.labor.unwrap_or(0.0);
            let parts = c.parts.unwrap_or(0.0);
            errors.min("cost.labor", labor, 0.0);
            errors.min("cost.parts", parts, 0.0);
            (labor, parts)
        });

        errors.finish()?;

        Ok(MaintenanceUpdate {
            maintenance_type,
            description,
            priority,
            status,
            scheduled_date,
            due_date,
            estimated_hours,
            actual_hours,
            checklist,
            cost,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteTaskRequest {
    pub task_index: Option<i64>,
    pub mechanic_id: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompleteTask {
    pub task_index: usize,
    pub mechanic_id: String,
    pub notes: Option<String>,
}

impl CompleteTaskRequest {
    pub fn validate(&self) -> Result<CompleteTask> {
        let mut errors = FieldErrors::new();
        let task_index = match self.task_index {
            Some(i) => errors.min("taskIndex", i as f64, 0.0).then_some(i as usize),
            None => {
                errors.push("\"taskIndex\" is required");
                None
            }
        };
        let mechanic_id = errors.required("mechanicId", self.mechanic_id.as_ref());
        errors.finish()?;

        match (task_index, mechanic_id) {
            (Some(task_index), Some(mechanic_id)) => Ok(CompleteTask {
                task_index,
                mechanic_id,
                notes: self.notes.clone(),
            }),
            _ => Err(DomainError::validation("task body is incomplete")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub mechanic_id: Option<String>,
    pub supervisor_id: Option<String>,
}

impl SignatureRequest {
    /// `(mechanic_id, supervisor_id)`
    pub fn validate(&self) -> Result<(String, String)> {
        let mut errors = FieldErrors::new();
        let mechanic = errors.required("mechanicId", self.mechanic_id.as_ref());
        let supervisor = errors.required("supervisorId", self.supervisor_id.as_ref());
        errors.finish()?;
        match (mechanic, supervisor) {
            (Some(m), Some(s)) => Ok((m, s)),
            _ => Err(DomainError::validation("signature body is incomplete")),
        }
    }
}

// ---------------------------------------------------------------------------
// Mechanics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificationRequest {
    pub name: Option<String>,
    pub number: Option<String>,
    pub issued_by: Option<String>,
    pub issued_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
}

impl CertificationRequest {
    fn collect(&self, errors: &mut FieldErrors, prefix: &str) -> Option<Certification> {
        let name = errors.required(&format!("{}name", prefix), self.name.as_ref());
        let issued_date = errors.optional_date(&format!("{}issuedDate", prefix), self.issued_date.as_ref());
        let expiry_date = errors.optional_date(&format!("{}expiryDate", prefix), self.expiry_date.as_ref());
        let status = self.status.as_deref().and_then(|s| {
            errors.one_of(
                &format!("{}status", prefix),
                s,
                CERTIFICATION_STATUSES,
                parse_certification_status,
            )
        });

        name.map(|name| Certification {
            name,
            number: self.number.clone(),
            issued_by: self.issued_by.clone(),
            issued_date,
            expiry_date,
            status: status.unwrap_or(CertificationStatus::Active),
        })
    }

    pub fn validate(&self) -> Result<Certification> {
        let mut errors = FieldErrors::new();
        let cert = self.collect(&mut errors, "");
        errors.finish()?;
        cert.ok_or_else(|| DomainError::validation("\"name\" is required"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicRequest {
    pub employee_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub certifications: Option<Vec<CertificationRequest>>,
    pub specialties: Option<Vec<String>>,
}

#[derive(Clone, PartialEq)]
pub struct MechanicDraft {
    pub employee_id: String,
    pub name: String,
    /// Lower-cased
    pub email: String,
    /// Plain text until the service hashes it
    pub password: String,
    pub certifications: Vec<Certification>,
    pub specialties: Vec<String>,
}

impl std::fmt::Debug for MechanicDraft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MechanicDraft")
            .field("employee_id", &self.employee_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn clean_specialties(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn validate_email(errors: &mut FieldErrors, value: Option<&String>, required: bool) -> Option<String> {
    let email = if required {
        errors.required("email", value)
    } else {
        errors.optional("email", value)
    };
    let email = email?.to_lowercase();
    if is_valid_email(&email) {
        Some(email)
    } else {
        errors.push("\"email\" must be a valid email");
        None
    }
}

impl MechanicRequest {
    pub fn validate(&self) -> Result<MechanicDraft> {
        let mut errors = FieldErrors::new();

        let employee_id = errors.required("employeeId", self.employee_id.as_ref());
        let name = errors.required("name", self.name.as_ref());
        let email = validate_email(&mut errors, self.email.as_ref(), true);
        let password = match self.password.as_deref() {
            Some(p) if p.chars().count() >= MIN_PASSWORD_LEN => Some(p.to_string()),
            Some(_) => {
                errors.push(format!(
                    "\"password\" length must be at least {} characters long",
                    MIN_PASSWORD_LEN
                ));
                None
            }
            None => {
                errors.push("\"password\" is required");
                None
            }
        };
        let certifications: Vec<Certification> = self
            .certifications
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.collect(&mut errors, &format!("certifications[{}].", i)))
            .collect();
        let specialties = clean_specialties(self.specialties.as_deref().unwrap_or(&[]));

        errors.finish()?;

        match (employee_id, name, email, password) {
            (Some(employee_id), Some(name), Some(email), Some(password)) => Ok(MechanicDraft {
                employee_id,
                name,
                email,
                password,
                certifications,
                specialties,
            }),
            _ => Err(DomainError::validation("mechanic body is incomplete")),
        }
    }
}

/// Partial mechanic update. Credentials and wallet fields are not accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicUpdateRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub availability: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MechanicUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub specialties: Option<Vec<String>>,
    pub availability: Option<AvailabilityStatus>,
    pub is_active: Option<bool>,
}

impl MechanicUpdateRequest {
    pub fn validate(&self) -> Result<MechanicUpdate> {
        let mut errors = FieldErrors::new();
        let name = errors.optional("name", self.name.as_ref());
        let email = validate_email(&mut errors, self.email.as_ref(), false);
        let availability = self.availability.as_deref().and_then(|a| {
            errors.one_of("availability", a, AVAILABILITY_STATUSES, AvailabilityStatus::parse)
        });
        errors.finish()?;

        Ok(MechanicUpdate {
            name,
            email,
            specialties: self.specialties.as_deref().map(clean_specialties),
            availability,
            is_active: self.is_active,
        })
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequest {
    pub contract_address: Option<String>,
    pub method: Option<String>,
    pub params: Option<serde_json::Value>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub contract_address: String,
    pub method: String,
    pub params: serde_json::Value,
    pub entity_type: EntityType,
    pub entity_id: Option<String>,
}

impl ContractRequest {
    pub fn validate(&self) -> Result<ContractCall> {
        let mut errors = FieldErrors::new();
        let contract_address = errors.required("contractAddress", self.contract_address.as_ref());
        let method = errors.required("method", self.method.as_ref());
        let entity_type = self
            .entity_type
            .as_deref()
            .and_then(|t| errors.one_of("entityType", t, ENTITY_TYPES, EntityType::parse));
        errors.finish()?;

        match (contract_address, method) {
            (Some(contract_address), Some(method)) => Ok(ContractCall {
                contract_address,
                method,
                params: self.params.clone().unwrap_or(serde_json::Value::Null),
                entity_type: entity_type.unwrap_or(EntityType::Contract),
                entity_id: self.entity_id.clone(),
            }),
            _ => Err(DomainError::validation(
                "Contract address and method are required",
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifySignatureRequest {
    pub signature: Option<String>,
    pub data: Option<serde_json::Value>,
    pub public_key: Option<String>,
}

impl VerifySignatureRequest {
    pub fn validate(&self) -> Result<String> {
        let signature = self.signature.as_deref().map(str::trim).unwrap_or_default();
        let has_data = !matches!(self.data, None | Some(serde_json::Value::Null));
        if signature.is_empty() || !has_data {
            return Err(DomainError::validation(
                "Signature and data are required",
            ));
        }
        Ok(signature.to_string())
    }
}

/// Echo of a checked signature
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureCheck {
    pub is_valid: bool,
    pub signature: String,
    pub timestamp: DateTime<Utc>,
    pub verification_method: String,
}
