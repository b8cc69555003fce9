//! Fixtures shared by the integration scenarios

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use skychain_chain::{AuthenticityVerifier, DataUrlQrEncoder, FixedVerifier};
use skychain_core::FixedClock;
use skychain_domain::requests::{
    AircraftRequest, ChecklistItemRequest, MaintenanceRequest, MechanicRequest, PartRequest,
};
use skychain_fleet::FleetService;
use skychain_store::Store;

/// Instant every scenario starts from
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 8, 30, 0).unwrap()
}

/// Install a test subscriber once; later calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// SQLite file under the temp dir, removed with its WAL files on drop
pub struct TempDb {
    path: PathBuf,
}

impl TempDb {
    pub fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("skychain_{}_{}.db", label, uuid::Uuid::new_v4()));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Store {
        Store::open(&self.path).unwrap()
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut name = self.path.clone().into_os_string();
            name.push(suffix);
            let _ = std::fs::remove_file(name);
        }
    }
}

pub fn service_on(store: Store, clock: Arc<FixedClock>, verifier: Arc<dyn AuthenticityVerifier>) -> FleetService {
    FleetService::new(Arc::new(store), verifier, Arc::new(DataUrlQrEncoder), clock)
}

/// Service over `db` with a pinned clock and an always-authentic verifier
pub fn fleet(db: &TempDb) -> (FleetService, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(epoch()));
    let service = service_on(db.open(), clock.clone(), Arc::new(FixedVerifier::authentic()));
    (service, clock)
}

pub fn days(n: i64) -> String {
    (epoch() + Duration::days(n)).to_rfc3339()
}

pub fn aircraft(registration: &str, next_maintenance_days: i64) -> AircraftRequest {
    AircraftRequest {
        registration: Some(registration.to_string()),
        model: Some("ATR 72".to_string()),
        manufacturer: Some("ATR".to_string()),
        year_built: Some(2012),
        next_maintenance: Some(days(next_maintenance_days)),
        location: Some("Line station".to_string()),
        ..Default::default()
    }
}

pub fn mechanic(employee_id: &str) -> MechanicRequest {
    MechanicRequest {
        employee_id: Some(employee_id.to_string()),
        name: Some(format!("Mechanic {employee_id}")),
        email: Some(format!("{}@fleet.example", employee_id.to_lowercase())),
        password: Some("correct-horse".to_string()),
        specialties: Some(vec!["Airframe".to_string()]),
        ..Default::default()
    }
}

pub fn part(serial: &str, aircraft_id: &str) -> PartRequest {
    PartRequest {
        part_number: Some("ATR-4411".to_string()),
        name: Some("Propeller governor".to_string()),
        manufacturer: Some("Woodward".to_string()),
        serial_number: Some(serial.to_string()),
        aircraft: Some(aircraft_id.to_string()),
        install_date: Some(days(-10)),
        location: Some("Engine 1".to_string()),
        next_inspection: Some(days(180)),
        ..Default::default()
    }
}

pub fn work_order(
    aircraft_id: &str,
    mechanic_id: &str,
    kind: &str,
    due_days: i64,
    tasks: usize,
) -> MaintenanceRequest {
    MaintenanceRequest {
        aircraft: Some(aircraft_id.to_string()),
        maintenance_type: Some(kind.to_string()),
        description: Some(format!("{kind} for {aircraft_id}")),
        priority: Some("high".to_string()),
        assigned_to: Some(mechanic_id.to_string()),
        scheduled_date: Some(days(0)),
        due_date: Some(days(due_days)),
        estimated_hours: Some(6.0),
        checklist: Some(
            (1..=tasks)
                .map(|i| ChecklistItemRequest {
                    task: Some(format!("Step {i}")),
                    completed: None,
                })
                .collect(),
        ),
        status: None,
    }
}
