//! Work order lifecycle across aircraft and mechanic records

use chrono::{Duration, Months};
use skychain_domain::requests::{CompleteTaskRequest, MaintenanceUpdateRequest};
use skychain_domain::{AircraftStatus, MaintenanceStatus};

use crate::test_utils::{self, epoch, TempDb};

fn start_work(service: &skychain_fleet::FleetService, id: &str) {
    let view = service
        .update_work_order(
            id,
            &MaintenanceUpdateRequest {
                status: Some("in-progress".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(view.order.status, MaintenanceStatus::InProgress);
}

fn complete(service: &skychain_fleet::FleetService, id: &str, index: i64, mechanic: &str) -> MaintenanceStatus {
    service
        .complete_task(
            id,
            &CompleteTaskRequest {
                task_index: Some(index),
                mechanic_id: Some(mechanic.to_string()),
                notes: None,
            },
        )
        .unwrap()
        .order
        .status
}

#[test]
fn test_scenario_alert_overdue_and_completion() {
    test_utils::init_tracing();
    let db = TempDb::new("lifecycle");
    let (service, _clock) = test_utils::fleet(&db);

    // Aircraft due in three days is on alert
    let aircraft = service.create_aircraft(&test_utils::aircraft("F-ABCD", 3)).unwrap();
    assert_eq!(aircraft.aircraft.status, AircraftStatus::Alert);
    let aircraft_id = aircraft.aircraft.id;

    let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-42")).unwrap().mechanic.id;

    // Work order already past due and in progress is overdue on save
    let mut late = test_utils::work_order(&aircraft_id, &mechanic_id, "Engine Service", -1, 1);
    late.status = Some("in-progress".to_string());
    let late = service.create_work_order(&late).unwrap();
    assert_eq!(late.order.status, MaintenanceStatus::Overdue);

    // Two item checklist completes once both items are done
    let order = service
        .create_work_order(&test_utils::work_order(&aircraft_id, &mechanic_id, "Avionics Check", 5, 2))
        .unwrap();
    let before = service.get_mechanic(&mechanic_id).unwrap().mechanic.mechanic;
    assert_eq!(before.tasks_in_progress, 2);

    start_work(&service, &order.order.id);
    assert_eq!(complete(&service, &order.order.id, 0, &mechanic_id), MaintenanceStatus::InProgress);
    assert_eq!(complete(&service, &order.order.id, 1, &mechanic_id), MaintenanceStatus::Completed);

    let done = service.get_work_order(&order.order.id).unwrap();
    assert_eq!(done.order.completed_date, Some(epoch()));
    assert_eq!(done.completion_percentage, 100);

    let after = service.get_mechanic(&mechanic_id).unwrap().mechanic.mechanic;
    assert_eq!(after.tasks_completed, before.tasks_completed + 1);
    assert_eq!(after.tasks_in_progress, before.tasks_in_progress - 1);
    assert_eq!(after.work_history.len(), 1);

    // Re-completing an item does not move completedDate or the counters
    complete(&service, &order.order.id, 1, &mechanic_id);
    let again = service.get_work_order(&order.order.id).unwrap();
    assert_eq!(again.order.completed_date, Some(epoch()));
    assert_eq!(
        service.get_mechanic(&mechanic_id).unwrap().mechanic.mechanic.tasks_completed,
        after.tasks_completed
    );
}

#[test]
fn test_inspection_advances_aircraft_three_months() {
    test_utils::init_tracing();
    let db = TempDb::new("inspection");
    let (service, clock) = test_utils::fleet(&db);

    let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-WXYZ", 2)).unwrap().aircraft.id;
    let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-7")).unwrap().mechanic.id;
    let order = service
        .create_work_order(&test_utils::work_order(&aircraft_id, &mechanic_id, "Scheduled Inspection", 2, 2))
        .unwrap();

    start_work(&service, &order.order.id);
    clock.advance(Duration::hours(5));
    let completed_at = epoch() + Duration::hours(5);
    complete(&service, &order.order.id, 0, &mechanic_id);
    complete(&service, &order.order.id, 1, &mechanic_id);

    let aircraft = service.get_aircraft(&aircraft_id).unwrap().aircraft;
    assert_eq!(aircraft.last_maintenance, completed_at);
    assert_eq!(
        Some(aircraft.next_maintenance),
        completed_at.checked_add_months(Months::new(3))
    );
    assert_eq!(aircraft.status, AircraftStatus::Compliant);
}

#[test]
fn test_follow_ups_survive_reopen() {
    test_utils::init_tracing();
    let db = TempDb::new("reopen");
    let (aircraft_id, mechanic_id, order_id) = {
        let (service, _clock) = test_utils::fleet(&db);
        let aircraft_id = service.create_aircraft(&test_utils::aircraft("F-REOP", 30)).unwrap().aircraft.id;
        let mechanic_id = service.create_mechanic(&test_utils::mechanic("E-9")).unwrap().mechanic.id;
        let order = service
            .create_work_order(&test_utils::work_order(&aircraft_id, &mechanic_id, "Scheduled Inspection", 10, 1))
            .unwrap();
        start_work(&service, &order.order.id);
        complete(&service, &order.order.id, 0, &mechanic_id);
        (aircraft_id, mechanic_id, order.order.id)
    };

    let (service, _clock) = test_utils::fleet(&db);
    assert_eq!(service.get_work_order(&order_id).unwrap().order.status, MaintenanceStatus::Completed);
    assert_eq!(service.get_mechanic(&mechanic_id).unwrap().mechanic.mechanic.tasks_completed, 1);
    let history = service.aircraft_maintenance_history(&aircraft_id).unwrap();
    assert_eq!(history.len(), 1);
    assert!(service.ledger_health().is_ok());
}
