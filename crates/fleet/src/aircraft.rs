//! Aircraft operations

use serde_json::json;
use skychain_chain::{generate_wallet_address, hash_token};
use skychain_domain::requests::{AircraftDraft, AircraftRequest};
use skychain_domain::{
    Aircraft, AircraftStatus, ComplianceStatus, DigitalTwin, EntityType, TransactionType,
};
use skychain_store::{AircraftFilter, Page, PageRequest};
use tracing::info;

use crate::error::{FleetError, Result};
use crate::service::FleetService;
use crate::views::{AircraftView, PartView, WorkOrderView};

fn apply_draft(aircraft: &mut Aircraft, draft: AircraftDraft) {
    aircraft.registration = draft.registration;
    aircraft.model = draft.model;
    aircraft.manufacturer = draft.manufacturer;
    aircraft.year_built = draft.year_built;
    aircraft.flight_hours = draft.flight_hours;
    aircraft.last_maintenance = draft.last_maintenance;
    aircraft.next_maintenance = draft.next_maintenance;
    aircraft.location = draft.location;
    if let Some(status) = draft.status {
        aircraft.request_status(status);
    }
}

impl FleetService {
    pub fn list_aircraft(&self, filter: &AircraftFilter, page: PageRequest) -> Result<Page<AircraftView>> {
        let now = self.now();
        let found = self.store.read(|tx| tx.list_aircraft(filter, page))?;
        Ok(found.map(|a| AircraftView::new(a, now)))
    }

    pub fn get_aircraft(&self, id: &str) -> Result<AircraftView> {
        let aircraft = self.store.read(|tx| tx.require_aircraft(id))?;
        Ok(AircraftView::new(aircraft, self.now()))
    }

    /// Register an aircraft and record the registration on the ledger
    pub fn create_aircraft(&self, request: &AircraftRequest) -> Result<AircraftView> {
        let now = self.now();
        let draft = request.validate(now)?;

        let blockchain_hash = hash_token(
            &json!({
                "registration": draft.registration,
                "model": draft.model,
                "timestamp": now.timestamp_millis(),
            }),
            now,
        )?;
        let qr_code = self.qr.encode(&json!({
            "type": "aircraft",
            "registration": draft.registration,
            "hash": blockchain_hash,
        }))?;

        let mut aircraft = Aircraft {
            id: Self::new_id(),
            registration: String::new(),
            model: String::new(),
            manufacturer: String::new(),
            year_built: 0,
            flight_hours: 0.0,
            last_maintenance: now,
            next_maintenance: now,
            status: AircraftStatus::Compliant,
            location: String::new(),
            blockchain_hash,
            qr_code: Some(qr_code),
            parts: Vec::new(),
            maintenance_history: Vec::new(),
            compliance_status: ComplianceStatus {
                faa: true,
                easa: true,
                last_audit: now,
            },
            digital_twin: DigitalTwin {
                enabled: true,
                last_sync: now,
            },
            created_at: now,
            updated_at: now,
        };
        apply_draft(&mut aircraft, draft);
        aircraft.refresh(now);

        let record = self.ledger_record(
            TransactionType::AircraftRegistration,
            (EntityType::Aircraft, &aircraft.id),
            &generate_wallet_address(),
            &self.settings.aircraft_contract_address,
            json!({
                "registration": aircraft.registration,
                "model": aircraft.model,
                "hash": aircraft.blockchain_hash,
            }),
            now,
        )?;

        self.store.write(|tx| -> Result<()> {
            tx.insert_aircraft(&aircraft)?;
            tx.append_transaction(&record)?;
            Ok(())
        })?;

        info!(
            aircraft_id = %aircraft.id,
            registration = %aircraft.registration,
            status = aircraft.status.as_str(),
            "Aircraft registered"
        );
        Ok(AircraftView::new(aircraft, now))
    }

    /// Replace the editable fields; status is re-derived unless grounded
    pub fn update_aircraft(&self, id: &str, request: &AircraftRequest) -> Result<AircraftView> {
        let now = self.now();
        let draft = request.validate(now)?;

        let aircraft = self.store.write(|tx| -> Result<Aircraft> {
            let mut aircraft = tx.require_aircraft(id)?;
            apply_draft(&mut aircraft, draft);
            aircraft.refresh(now);
            tx.update_aircraft(&aircraft)?;
            Ok(aircraft)
        })?;

        info!(aircraft_id = %id, status = aircraft.status.as_str(), "Aircraft updated");
        Ok(AircraftView::new(aircraft, now))
    }

    /// Delete an aircraft with its parts and work orders
    pub fn delete_aircraft(&self, id: &str) -> Result<()> {
        self.store.write(|tx| tx.delete_aircraft(id))?;
        info!(aircraft_id = %id, "Aircraft deleted");
        Ok(())
    }

    pub fn aircraft_maintenance_history(&self, id: &str) -> Result<Vec<WorkOrderView>> {
        let orders = self.store.read(|tx| -> Result<_> {
            if !tx.aircraft_exists(id)? {
                return Err(FleetError::not_found("Aircraft"));
            }
            Ok(tx.work_orders_for_aircraft(id)?)
        })?;
        Ok(orders.into_iter().map(WorkOrderView::from).collect())
    }

    pub fn aircraft_parts(&self, id: &str) -> Result<Vec<PartView>> {
        let now = self.now();
        let parts = self.store.read(|tx| -> Result<_> {
            if !tx.aircraft_exists(id)? {
                return Err(FleetError::not_found("Aircraft"));
            }
            Ok(tx.parts_for_aircraft(id)?)
        })?;
        Ok(parts.into_iter().map(|p| PartView::new(p, now)).collect())
    }

    /// Regenerate and store the aircraft's QR payload
    pub fn generate_aircraft_qr(&self, id: &str) -> Result<String> {
        let now = self.now();
        self.store.write(|tx| -> Result<String> {
            let mut aircraft = tx.require_aircraft(id)?;
            let qr_code = self.qr.encode(&json!({
                "type": "aircraft",
                "registration": aircraft.registration,
                "hash": aircraft.blockchain_hash,
                "timestamp": now.timestamp_millis(),
            }))?;
            aircraft.qr_code = Some(qr_code.clone());
            aircraft.refresh(now);
            tx.update_aircraft(&aircraft)?;
            Ok(qr_code)
        })
    }
}
