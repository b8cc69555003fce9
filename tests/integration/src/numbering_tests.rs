//! Work order numbering under concurrent writers
//!
//! Each worker opens its own connection to the same database file, the way
//! separate service processes would, and races the others to create orders.

use std::collections::BTreeSet;
use std::sync::{Arc, Barrier};
use std::thread;

use skychain_chain::FixedVerifier;
use skychain_core::FixedClock;
use skychain_store::{PageRequest, WorkOrderFilter};

use crate::test_utils::{self, epoch, TempDb};

const WORKERS: usize = 4;
const ORDERS_PER_WORKER: usize = 6;

#[test]
fn test_concurrent_creation_yields_gapless_numbers() {
    test_utils::init_tracing();
    let db = TempDb::new("numbering");

    let (aircraft_id, mechanic_id) = {
        let (service, _clock) = test_utils::fleet(&db);
        let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-CONC", 90)).unwrap().aircraft.id;
        let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-1")).unwrap().mechanic.id;
        (aircraft_id, mechanic_id)
    };

    let barrier = Arc::new(Barrier::new(WORKERS));
    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let path = db.path().to_path_buf();
            let barrier = Arc::clone(&barrier);
            let aircraft_id = aircraft_id.clone();
            let mechanic_id = mechanic_id.clone();
            thread::spawn(move || {
                let store = skychain_store::Store::open(&path).unwrap();
                let service = test_utils::service_on(
                    store,
                    Arc::new(FixedClock::new(epoch())),
                    Arc::new(FixedVerifier::authentic()),
                );
                barrier.wait();
                (0..ORDERS_PER_WORKER)
                    .map(|_| {
                        service
                            .create_work_order(&test_utils::work_order(
                                &aircraft_id,
                                &mechanic_id,
                                "Hydraulic Service",
                                14,
                                1,
                            ))
                            .unwrap()
                            .order
                            .work_order
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let numbers: Vec<String> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();

    let total = WORKERS * ORDERS_PER_WORKER;
    let distinct: BTreeSet<&String> = numbers.iter().collect();
    assert_eq!(distinct.len(), total, "duplicate numbers: {numbers:?}");

    let expected: BTreeSet<String> = (1..=total).map(|n| format!("WO-2025-{n:04}")).collect();
    assert_eq!(distinct.into_iter().cloned().collect::<BTreeSet<_>>(), expected);

    // Side effects landed with every order
    let (service, _clock) = test_utils::fleet(&db);
    let mechanic = service.get_mechanic(&mechanic_id).unwrap().mechanic.mechanic;
    assert_eq!(mechanic.tasks_in_progress as usize, total);
    let aircraft = service.get_aircraft(&aircraft_id).unwrap().aircraft;
    assert_eq!(aircraft.maintenance_history.len(), total);

    let page = service
        .list_work_orders(&WorkOrderFilter::default(), PageRequest::new(None, Some(100), 10))
        .unwrap();
    assert_eq!(page.total as usize, total);
}

#[test]
fn test_numbering_restarts_each_year() {
    test_utils::init_tracing();
    let db = TempDb::new("numbering_year");
    let (service, clock) = test_utils::fleet(&db);

    let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-YEAR", 400)).unwrap().aircraft.id;
    let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-2")).unwrap().mechanic.id;
    let request = test_utils::work_order(&aircraft_id, &mechanic_id, "Engine Service", 30, 1);

    let first = service.create_work_order(&request).unwrap().order.work_order;
    let second = service.create_work_order(&request).unwrap().order.work_order;
    assert_eq!((first.as_str(), second.as_str()), ("WO-2025-0001", "WO-2025-0002"));

    clock.advance(chrono::Duration::days(366));
    let next_year = service.create_work_order(&request).unwrap().order.work_order;
    assert_eq!(next_year, "WO-2026-0001");
}
