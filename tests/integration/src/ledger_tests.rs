//! Part verification and ledger continuity against a real database file

use std::sync::Arc;

use serde_json::json;
use skychain_chain::{is_well_formed_token, FixedVerifier};
use skychain_core::FixedClock;
use skychain_domain::requests::{ContractRequest, SignatureRequest};
use skychain_domain::{EntityType, PartStatus, TransactionType};
use skychain_fleet::FleetError;
use skychain_store::{LedgerHealth, PageRequest, TransactionFilter};

use crate::test_utils::{self, epoch, TempDb};

#[test]
fn test_verify_authenticity_with_authentic_stub() {
    test_utils::init_tracing();
    let db = TempDb::new("verify");
    let (service, _clock) = test_utils::fleet(&db);

    let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-PART", 60)).unwrap().aircraft.id;
    let part = service.create_part(&test_utils::part("WG-778812", &aircraft_id)).unwrap();
    assert_eq!(part.part.status, PartStatus::Pending);

    let outcome = service.verify_part(&part.part.id).unwrap();
    assert!(outcome.is_authentic);
    assert_eq!(outcome.status, PartStatus::Authentic);
    assert_eq!(outcome.verification_date, epoch());
    assert!(is_well_formed_token(&outcome.blockchain_proof));

    let stored = service.get_part(&part.part.id).unwrap().part;
    assert_eq!(stored.status, PartStatus::Authentic);
    assert!(stored.authenticity.verified);
    assert_eq!(stored.authenticity.verification_date, Some(epoch()));
    assert_eq!(stored.authenticity.blockchain_proof.as_deref(), Some(outcome.blockchain_proof.as_str()));

    let records = service.entity_transactions(EntityType::Part, &part.part.id).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, TransactionType::PartAuthentication);
}

#[test]
fn test_counterfeit_stub_marks_part() {
    test_utils::init_tracing();
    let db = TempDb::new("counterfeit");
    let service = test_utils::service_on(
        db.open(),
        Arc::new(FixedClock::new(epoch())),
        Arc::new(FixedVerifier::counterfeit()),
    );

    let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-FAKE", 60)).unwrap().aircraft.id;
    let part = service.create_part(&test_utils::part("WG-000001", &aircraft_id)).unwrap();
    let outcome = service.verify_part(&part.part.id).unwrap();
    assert!(!outcome.is_authentic);
    assert_eq!(service.get_part(&part.part.id).unwrap().part.status, PartStatus::Counterfeit);
}

#[test]
fn test_ledger_chain_survives_reopen() {
    test_utils::init_tracing();
    let db = TempDb::new("ledger_reopen");
    let signed_hash = {
        let (service, _clock) = test_utils::fleet(&db);
        let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-LEDG", 60)).unwrap().aircraft.id;
        let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-3")).unwrap().mechanic.id;
        let order = service
            .create_work_order(&test_utils::work_order(&aircraft_id, &mechanic_id, "Avionics Check", 7, 1))
            .unwrap();
        let signed = service
            .sign_work_order(
                &order.order.id,
                &SignatureRequest {
                    mechanic_id: Some(mechanic_id),
                    supervisor_id: Some("SUP-1".to_string()),
                },
            )
            .unwrap();
        service
            .execute_contract(&ContractRequest {
                contract_address: Some(format!("0x{}", "ab".repeat(20))),
                method: Some("recordCompliance".to_string()),
                params: Some(json!({ "aircraft": aircraft_id })),
                entity_type: Some("Aircraft".to_string()),
                entity_id: None,
            })
            .unwrap();
        signed.blockchain_record.transaction_hash
    };

    let (service, _clock) = test_utils::fleet(&db);
    assert_eq!(service.ledger_health(), LedgerHealth::Ok);

    let page = service
        .list_transactions(&TransactionFilter::default(), PageRequest::new(None, None, 20))
        .unwrap();
    assert_eq!(page.total, 3);

    let signature = service.get_transaction(&signed_hash).unwrap();
    assert_eq!(signature.kind, TransactionType::MechanicSignature);
}

#[test]
fn test_tampered_ledger_refuses_writes() {
    test_utils::init_tracing();
    let db = TempDb::new("ledger_tamper");
    {
        let (service, _clock) = test_utils::fleet(&db);
        service.create_aircraft(&test_utils::aircraft("F-TAMP", 60)).unwrap();
    }

    {
        let conn = rusqlite::Connection::open(db.path()).unwrap();
        conn.execute(
            "UPDATE ledger_transactions SET doc = json_set(doc, '$.gasUsed', 1) WHERE seq_no = 1",
            [],
        )
        .unwrap();
    }

    let (service, _clock) = test_utils::fleet(&db);
    assert!(matches!(
        service.ledger_health(),
        LedgerHealth::Corrupted { first_bad_seq_no: 1, .. }
    ));

    // Registration appends to the ledger, so the whole write is rolled back
    let err = service.create_aircraft(&test_utils::aircraft("F-NEXT", 60)).unwrap_err();
    assert!(matches!(err, FleetError::Internal(_)));
    let page = service
        .list_aircraft(&Default::default(), PageRequest::default())
        .unwrap();
    assert_eq!(page.total, 1);
}
