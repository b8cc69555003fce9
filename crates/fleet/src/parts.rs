//! Part operations

use serde_json::json;
use skychain_chain::hash_token;
use skychain_domain::analytics::{part_statistics, PartStatistics};
use skychain_domain::part::Manufactured;
use skychain_domain::requests::{InspectionRequest, PartRequest, ScanQrRequest};
use skychain_domain::{EntityType, Inspection, Lifecycle, Part, PartStatus, TransactionType};
use skychain_store::{Page, PageRequest, PartFilter};
use tracing::{info, warn};

use crate::error::{FleetError, Result};
use crate::service::FleetService;
use crate::views::{PartView, ScanOutcome, VerificationOutcome};

impl FleetService {
    pub fn list_parts(&self, filter: &PartFilter, page: PageRequest) -> Result<Page<PartView>> {
        let now = self.now();
        let found = self.store.read(|tx| tx.list_parts(filter, page))?;
        Ok(found.map(|p| PartView::new(p, now)))
    }

    pub fn get_part(&self, id: &str) -> Result<PartView> {
        let part = self.store.read(|tx| tx.require_part(id))?;
        Ok(PartView::new(part, self.now()))
    }

    /// Register a part against an existing aircraft
    pub fn create_part(&self, request: &PartRequest) -> Result<PartView> {
        let now = self.now();
        let draft = request.validate()?;

        let blockchain_hash = hash_token(
            &json!({
                "partNumber": draft.part_number,
                "serialNumber": draft.serial_number,
                "manufacturer": draft.manufacturer,
                "timestamp": now.timestamp_millis(),
            }),
            now,
        )?;
        let qr_code = self.qr.encode(&json!({
            "type": "part",
            "partNumber": draft.part_number,
            "serialNumber": draft.serial_number,
            "hash": blockchain_hash,
        }))?;

        let part = Part {
            id: Self::new_id(),
            part_number: draft.part_number,
            name: draft.name,
            manufacturer: draft.manufacturer,
            serial_number: draft.serial_number,
            aircraft: draft.aircraft,
            install_date: draft.install_date,
            status: draft.status,
            location: draft.location,
            blockchain_hash,
            qr_code: Some(qr_code),
            next_inspection: draft.next_inspection,
            lifecycle: Lifecycle {
                manufactured: Manufactured {
                    date: Some(draft.manufactured_date.unwrap_or(now)),
                    facility: draft.manufacturing_facility,
                    batch_number: draft.batch_number,
                },
                ..Default::default()
            },
            specifications: Default::default(),
            authenticity: Default::default(),
            created_at: now,
            updated_at: now,
        };

        self.store.write(|tx| -> Result<()> {
            let mut aircraft = tx
                .get_aircraft(&part.aircraft)?
                .ok_or_else(|| FleetError::invalid_reference("Aircraft"))?;
            tx.insert_part(&part)?;
            aircraft.parts.push(part.id.clone());
            aircraft.refresh(now);
            tx.update_aircraft(&aircraft)?;
            Ok(())
        })?;

        info!(part_id = %part.id, serial_number = %part.serial_number, aircraft_id = %part.aircraft, "Part registered");
        Ok(PartView::new(part, now))
    }

    /// Replace the editable fields. Status only changes when the body names one.
    pub fn update_part(&self, id: &str, request: &PartRequest) -> Result<PartView> {
        let now = self.now();
        let draft = request.validate()?;
        let status_requested = request.status.is_some();

        let part = self.store.write(|tx| -> Result<Part> {
            let mut part = tx.require_part(id)?;

            if draft.aircraft != part.aircraft {
                let mut target = tx
                    .get_aircraft(&draft.aircraft)?
                    .ok_or_else(|| FleetError::invalid_reference("Aircraft"))?;
                if let Some(mut previous) = tx.get_aircraft(&part.aircraft)? {
                    previous.parts.retain(|p| p != &part.id);
                    previous.refresh(now);
                    tx.update_aircraft(&previous)?;
                }
                target.parts.push(part.id.clone());
                target.refresh(now);
                tx.update_aircraft(&target)?;
            }

            part.part_number = draft.part_number;
            part.name = draft.name;
            part.manufacturer = draft.manufacturer;
            part.serial_number = draft.serial_number;
            part.aircraft = draft.aircraft;
            part.install_date = draft.install_date;
            part.location = draft.location;
            part.next_inspection = draft.next_inspection;
            if status_requested {
                part.status = draft.status;
            }
            part.updated_at = now;

            tx.update_part(&part)?;
            Ok(part)
        })?;

        Ok(PartView::new(part, now))
    }

    /// Run the authenticity verifier and persist the outcome with a ledger entry
    pub fn verify_part(&self, id: &str) -> Result<VerificationOutcome> {
        let now = self.now();

        let part = self.store.write(|tx| -> Result<Part> {
            let mut part = tx.require_part(id)?;
            let authentic = self.verifier.verify(&part.blockchain_hash, &part.serial_number);
            part.record_verification(authentic, self.verifier.method(), now);

            let record = self.ledger_record(
                TransactionType::PartAuthentication,
                (EntityType::Part, &part.id),
                &part.blockchain_hash,
                &part.aircraft,
                json!({
                    "serialNumber": part.serial_number,
                    "status": part.status,
                    "method": self.verifier.method(),
                }),
                now,
            )?;

            tx.update_part(&part)?;
            tx.append_transaction(&record)?;
            Ok(part)
        })?;

        let is_authentic = part.status == PartStatus::Authentic;
        if is_authentic {
            info!(part_id = %part.id, "Part verified authentic");
        } else {
            warn!(part_id = %part.id, serial_number = %part.serial_number, "Part failed authenticity check");
        }

        Ok(VerificationOutcome {
            part_id: part.id.clone(),
            is_authentic,
            status: part.status,
            verification_date: now,
            blockchain_proof: part.blockchain_hash,
        })
    }

    pub fn add_part_inspection(&self, id: &str, request: &InspectionRequest) -> Result<PartView> {
        let now = self.now();
        let part = self.store.write(|tx| -> Result<Part> {
            let mut part = tx.require_part(id)?;
            part.add_inspection(Inspection {
                date: now,
                kind: request.kind.clone(),
                result: request.result.clone(),
                mechanic: request.mechanic_id.clone(),
                notes: request.notes.clone(),
            });
            tx.update_part(&part)?;
            Ok(part)
        })?;
        Ok(PartView::new(part, now))
    }

    /// Look a part up by QR payload and run the verifier without persisting
    pub fn scan_part_qr(&self, request: &ScanQrRequest) -> Result<ScanOutcome> {
        let now = self.now();
        let qr_code = request.validate()?;
        let part = self
            .store
            .read(|tx| tx.find_part_by_qr(&qr_code))?
            .ok_or_else(|| FleetError::NotFound("Part not found for this QR code".to_string()))?;

        let is_authentic = self.verifier.verify(&part.blockchain_hash, &part.serial_number);
        Ok(ScanOutcome {
            part: PartView::new(part, now),
            is_authentic,
            scan_timestamp: now,
            verification_status: if is_authentic { "verified" } else { "failed" },
        })
    }

    pub fn part_statistics(&self) -> Result<PartStatistics> {
        let parts = self.store.read(|tx| tx.all_parts())?;
        Ok(part_statistics(&parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use skychain_chain::FixedVerifier;
    use std::sync::Arc;

    fn with_aircraft(service: &FleetService) -> String {
        service
            .create_aircraft(&testing::aircraft_request("N1", 60))
            .unwrap()
            .aircraft
            .id
    }

    #[test]
    fn test_create_links_aircraft() {
        let (service, _clock) = testing::service();
        let aircraft_id = with_aircraft(&service);

        let view = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();
        assert_eq!(view.part.part_number, "PN-100");
        assert_eq!(view.part.status, PartStatus::Pending);
        assert_eq!(view.days_until_inspection, 90);
        assert_eq!(view.part.lifecycle.manufactured.date, Some(testing::start()));

        let aircraft = service.get_aircraft(&aircraft_id).unwrap();
        assert_eq!(aircraft.aircraft.parts, vec![view.part.id.clone()]);
        assert_eq!(service.aircraft_parts(&aircraft_id).unwrap().len(), 1);
    }

    #[test]
    fn test_create_requires_aircraft() {
        let (service, _clock) = testing::service();
        let err = service.create_part(&testing::part_request("SN-000001", "ghost")).unwrap_err();
        assert!(matches!(err, FleetError::InvalidReference(ref m) if m == "Aircraft not found"));
    }

    #[test]
    fn test_duplicate_serial() {
        let (service, _clock) = testing::service();
        let aircraft_id = with_aircraft(&service);
        service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();

        let err = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap_err();
        assert!(matches!(err, FleetError::DuplicateKey(ref m) if m == "Part serial number already exists"));
    }

    #[test]
    fn test_verify_with_authentic_stub() {
        let (service, _clock) = testing::service();
        let aircraft_id = with_aircraft(&service);
        let part = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();

        let outcome = service.verify_part(&part.part.id).unwrap();
        assert!(outcome.is_authentic);
        assert_eq!(outcome.status, PartStatus::Authentic);
        assert_eq!(outcome.verification_date, testing::start());
        assert_eq!(outcome.blockchain_proof, part.part.blockchain_hash);

        let stored = service.get_part(&part.part.id).unwrap().part;
        assert!(stored.authenticity.verified);
        assert_eq!(stored.authenticity.verification_date, Some(testing::start()));
        assert_eq!(stored.authenticity.blockchain_proof.as_deref(), Some(part.part.blockchain_hash.as_str()));

        let records = service.entity_transactions(EntityType::Part, &part.part.id).unwrap();
        assert_eq!(records[0].kind, TransactionType::PartAuthentication);
    }

    #[test]
    fn test_verify_with_counterfeit_stub() {
        let (service, _clock) = testing::service_with(Arc::new(FixedVerifier::counterfeit()));
        let aircraft_id = with_aircraft(&service);
        let part = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();

        let outcome = service.verify_part(&part.part.id).unwrap();
        assert!(!outcome.is_authentic);
        assert_eq!(outcome.status, PartStatus::Counterfeit);
    }

    #[test]
    fn test_scan_qr_does_not_persist() {
        let (service, _clock) = testing::service();
        let aircraft_id = with_aircraft(&service);
        let part = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();

        let outcome = service
            .scan_part_qr(&ScanQrRequest {
                qr_code: part.part.qr_code.clone(),
            })
            .unwrap();
        assert!(outcome.is_authentic);
        assert_eq!(outcome.verification_status, "verified");
        assert_eq!(service.get_part(&part.part.id).unwrap().part.status, PartStatus::Pending);

        let err = service
            .scan_part_qr(&ScanQrRequest {
                qr_code: Some("unknown".to_string()),
            })
            .unwrap_err();
        assert!(matches!(err, FleetError::NotFound(ref m) if m == "Part not found for this QR code"));

        let err = service.scan_part_qr(&ScanQrRequest::default()).unwrap_err();
        assert!(matches!(err, FleetError::Validation(ref m) if m[0] == "QR code is required"));
    }

    #[test]
    fn test_update_moves_part_between_aircraft() {
        let (service, _clock) = testing::service();
        let first = with_aircraft(&service);
        let second = service
            .create_aircraft(&testing::aircraft_request("N2", 60))
            .unwrap()
            .aircraft
            .id;
        let part = service.create_part(&testing::part_request("SN-000001", &first)).unwrap();
        service.verify_part(&part.part.id).unwrap();

        let updated = service
            .update_part(&part.part.id, &testing::part_request("SN-000001", &second))
            .unwrap();
        assert_eq!(updated.part.aircraft, second);
        // Status is left alone when the body does not name one
        assert_eq!(updated.part.status, PartStatus::Authentic);

        assert!(service.get_aircraft(&first).unwrap().aircraft.parts.is_empty());
        assert_eq!(service.get_aircraft(&second).unwrap().aircraft.parts.len(), 1);
    }

    #[test]
    fn test_add_inspection_and_statistics() {
        let (service, _clock) = testing::service();
        let aircraft_id = with_aircraft(&service);
        let part = service.create_part(&testing::part_request("SN-000001", &aircraft_id)).unwrap();

        let view = service
            .add_part_inspection(
                &part.part.id,
                &InspectionRequest {
                    kind: Some("visual".to_string()),
                    result: Some("pass".to_string()),
                    mechanic_id: None,
                    notes: None,
                },
            )
            .unwrap();
        assert_eq!(view.part.lifecycle.inspections.len(), 1);

        service.verify_part(&part.part.id).unwrap();
        let stats = service.part_statistics().unwrap();
        assert_eq!(stats.total_parts, 1);
        assert_eq!(stats.authentic_parts, 1);
    }
}
