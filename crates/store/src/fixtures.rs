//! Sample entities for store tests

use chrono::{DateTime, Duration, TimeZone, Utc};
use skychain_domain::{
    Aircraft, AircraftStatus, Availability, ChecklistItem, Compliance, ComplianceStatus,
    DigitalTwin, MaintenanceStatus, MaintenanceType, Mechanic, Part, PartStatus, Performance,
    Priority, WorkOrder,
};

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
}

pub(crate) fn aircraft(id: &str, registration: &str) -> Aircraft {
    Aircraft {
        id: id.to_string(),
        registration: registration.to_string(),
        model: "737-800".to_string(),
        manufacturer: "Boeing".to_string(),
        year_built: 2015,
        flight_hours: 12_000.0,
        last_maintenance: now() - Duration::days(30),
        next_maintenance: now() + Duration::days(60),
        status: AircraftStatus::Compliant,
        location: "KSEA".to_string(),
        blockchain_hash: format!("0x{:0>64}", id.len()),
        qr_code: None,
        parts: Vec::new(),
        maintenance_history: Vec::new(),
        compliance_status: ComplianceStatus {
            faa: true,
            easa: true,
            last_audit: now(),
        },
        digital_twin: DigitalTwin {
            enabled: true,
            last_sync: now(),
        },
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn part(id: &str, serial: &str, aircraft_id: &str) -> Part {
    Part {
        id: id.to_string(),
        part_number: "PN-100".to_string(),
        name: "Hydraulic Pump".to_string(),
        manufacturer: "Parker".to_string(),
        serial_number: serial.to_string(),
        aircraft: aircraft_id.to_string(),
        install_date: now(),
        status: PartStatus::Pending,
        location: "Bay 1".to_string(),
        blockchain_hash: format!("0x{}", serial),
        qr_code: Some(format!("qr-{}", serial)),
        next_inspection: now() + Duration::days(90),
        lifecycle: Default::default(),
        specifications: Default::default(),
        authenticity: Default::default(),
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn work_order(id: &str, number: &str, aircraft_id: &str, mechanic_id: &str) -> WorkOrder {
    WorkOrder {
        id: id.to_string(),
        work_order: number.to_string(),
        aircraft: aircraft_id.to_string(),
        maintenance_type: MaintenanceType::ScheduledInspection,
        description: "A-check".to_string(),
        priority: Priority::Medium,
        status: MaintenanceStatus::Scheduled,
        assigned_to: mechanic_id.to_string(),
        scheduled_date: now(),
        due_date: now() + Duration::days(3),
        completed_date: None,
        estimated_hours: 4.0,
        actual_hours: None,
        parts: Vec::new(),
        checklist: vec![ChecklistItem::new("Inspect gear")],
        compliance: Compliance::default(),
        blockchain_record: None,
        digital_signature: None,
        documentation: Vec::new(),
        cost: None,
        created_at: now(),
        updated_at: now(),
    }
}

pub(crate) fn mechanic(id: &str, employee_id: &str, email: &str) -> Mechanic {
    Mechanic {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        name: format!("Mechanic {}", employee_id),
        email: email.to_string(),
        certifications: Vec::new(),
        specialties: vec!["Avionics".to_string()],
        rating: 0.0,
        tasks_completed: 0,
        tasks_in_progress: 0,
        reputation_score: 0,
        blockchain_signatures: 0,
        wallet_address: format!("0x{:0>40}", employee_id),
        performance: Performance::default(),
        work_history: Vec::new(),
        availability: Availability::default(),
        join_date: now(),
        last_active: now(),
        is_active: true,
        created_at: now(),
        updated_at: now(),
    }
}
