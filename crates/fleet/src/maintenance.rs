//! Work order operations
//!
//! Every write re-derives the order's status before it is stored. When a write
//! moves an order into `completed`, the mechanic and aircraft follow-ups are
//! applied in the same transaction.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde_json::json;
use skychain_chain::{signature_stamp, SignatureInput};
use skychain_domain::analytics::{maintenance_statistics, MaintenanceStatistics};
use skychain_domain::requests::{
    CompleteTaskRequest, MaintenanceRequest, MaintenanceUpdateRequest, SignatureRequest,
};
use skychain_domain::{
    format_work_order, BlockchainRecord, Cost, DigitalSignature, EntityType, StatusTransition,
    TransactionType, WorkOrder,
};
use skychain_store::{Page, PageRequest, Tx, WorkOrderFilter};
use tracing::{debug, info, warn};

use crate::error::{FleetError, Result};
use crate::service::FleetService;
use crate::views::{SignatureOutcome, WorkOrderView};

/// Attempts at claiming a work order number before giving up
const NUMBERING_ATTEMPTS: usize = 5;

/// Apply completion follow-ups when `transition` entered `completed`
fn settle(tx: &Tx<'_>, order: &WorkOrder, transition: StatusTransition, now: DateTime<Utc>) -> Result<()> {
    if transition.became_completed() {
        tx.apply_follow_ups(&order.completion_effects(now))?;
        info!(work_order = %order.work_order, "Work order completed");
    }
    Ok(())
}

/// First and last instant of `year`-`month`
fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| FleetError::validation("\"month\" must be between 1 and 12"))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| FleetError::validation("\"year\" is out of range"))?;

    let start = first.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
    let end = next.and_hms_opt(0, 0, 0).map(|d| d.and_utc() - Duration::milliseconds(1));
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(FleetError::validation("\"year\" is out of range")),
    }
}

impl FleetService {
    pub fn list_work_orders(&self, filter: &WorkOrderFilter, page: PageRequest) -> Result<Page<WorkOrderView>> {
        let found = self.store.read(|tx| tx.list_work_orders(filter, page))?;
        Ok(found.map(WorkOrderView::from))
    }

    pub fn get_work_order(&self, id: &str) -> Result<WorkOrderView> {
        let order = self.store.read(|tx| tx.require_work_order(id))?;
        Ok(order.into())
    }

    /// Open a work order and claim the next `WO-<year>-NNNN` number.
    ///
    /// The number is computed and inserted inside one immediate transaction; a
    /// clash on the unique number is retried with a fresh sequence.
    pub fn create_work_order(&self, request: &MaintenanceRequest) -> Result<WorkOrderView> {
        let now = self.now();
        let draft = request.validate()?;
        let year = now.year();

        let template = WorkOrder {
            id: Self::new_id(),
            work_order: String::new(),
            aircraft: draft.aircraft,
            maintenance_type: draft.maintenance_type,
            description: draft.description,
            priority: draft.priority,
            status: draft.status,
            assigned_to: draft.assigned_to,
            scheduled_date: draft.scheduled_date,
            due_date: draft.due_date,
            completed_date: None,
            estimated_hours: draft.estimated_hours,
            actual_hours: None,
            parts: Vec::new(),
            checklist: draft.checklist,
            compliance: Default::default(),
            blockchain_record: None,
            digital_signature: None,
            documentation: Vec::new(),
            cost: None,
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=NUMBERING_ATTEMPTS {
            let created = self.store.write(|tx| -> Result<Option<WorkOrder>> {
                let mut aircraft = tx
                    .get_aircraft(&template.aircraft)?
                    .ok_or_else(|| FleetError::invalid_reference("Aircraft"))?;
                let mut mechanic = tx
                    .get_mechanic(&template.assigned_to)?
                    .ok_or_else(|| FleetError::invalid_reference("Mechanic"))?;

                let mut order = template.clone();
                order.work_order = format_work_order(year, tx.next_work_order_sequence(year)?);
                let transition = order.refresh(now);

                match tx.insert_work_order(&order) {
                    Err(err) if err.is_duplicate_on("work_order") => return Ok(None),
                    other => other?,
                }

                mechanic.on_task_assigned(now);
                tx.update_mechanic(&mechanic)?;
                aircraft.maintenance_history.push(order.id.clone());
                aircraft.refresh(now);
                tx.update_aircraft(&aircraft)?;

                settle(tx, &order, transition, now)?;
                Ok(Some(order))
            })?;

            match created {
                Some(order) => {
                    info!(
                        work_order = %order.work_order,
                        aircraft_id = %order.aircraft,
                        status = order.status.as_str(),
                        "Work order created"
                    );
                    return Ok(order.into());
                }
                None => debug!(attempt, "Work order number taken, retrying"),
            }
        }

        warn!(attempts = NUMBERING_ATTEMPTS, "Could not claim a work order number");
        Err(FleetError::DuplicateKey("Work order number already exists".to_string()))
    }

    /// Apply a partial update. Derived statuses cannot be requested.
    pub fn update_work_order(&self, id: &str, request: &MaintenanceUpdateRequest) -> Result<WorkOrderView> {
        let now = self.now();
        let update = request.validate()?;

        let order = self.store.write(|tx| -> Result<WorkOrder> {
            let mut order = tx.require_work_order(id)?;

            if let Some(kind) = update.maintenance_type {
                order.maintenance_type = kind;
            }
            if let Some(description) = update.description.clone() {
                order.description = description;
            }
            if let Some(priority) = update.priority {
                order.priority = priority;
            }
            if let Some(date) = update.scheduled_date {
                order.scheduled_date = date;
            }
            if let Some(date) = update.due_date {
                order.due_date = date;
            }
            if let Some(hours) = update.estimated_hours {
                order.estimated_hours = hours;
            }
            if let Some(hours) = update.actual_hours {
                order.actual_hours = Some(hours);
            }
            if let Some(checklist) = update.checklist.clone() {
                order.checklist = checklist;
            }
            if let Some((labor, parts)) = update.cost {
                order.cost = Some(Cost::new(labor, parts));
            }
            if let Some(status) = update.status {
                order.request_status(status)?;
            }

            let transition = order.refresh(now);
            tx.update_work_order(&order)?;
            settle(tx, &order, transition, now)?;
            Ok(order)
        })?;

        info!(work_order = %order.work_order, status = order.status.as_str(), "Work order updated");
        Ok(order.into())
    }

    /// Mark one checklist item done
    pub fn complete_task(&self, id: &str, request: &CompleteTaskRequest) -> Result<WorkOrderView> {
        let now = self.now();
        let task = request.validate()?;

        let order = self.store.write(|tx| -> Result<WorkOrder> {
            let mut order = tx.require_work_order(id)?;
            let transition = order.complete_task(task.task_index, &task.mechanic_id, task.notes.clone(), now)?;
            tx.update_work_order(&order)?;
            settle(tx, &order, transition, now)?;
            Ok(order)
        })?;

        debug!(
            work_order = %order.work_order,
            task_index = task.task_index,
            completion = order.completion_percentage(),
            "Checklist task completed"
        );
        Ok(order.into())
    }

    /// Stamp the work order with a mechanic/supervisor signature and record it
    /// on the ledger
    pub fn sign_work_order(&self, id: &str, request: &SignatureRequest) -> Result<SignatureOutcome> {
        let now = self.now();
        let (mechanic_id, supervisor_id) = request.validate()?;

        let outcome = self.store.write(|tx| -> Result<SignatureOutcome> {
            let mut order = tx.require_work_order(id)?;
            let mut mechanic = tx
                .get_mechanic(&mechanic_id)?
                .ok_or_else(|| FleetError::invalid_reference("Mechanic"))?;

            let hash = signature_stamp(&SignatureInput {
                work_order: order.work_order.clone(),
                mechanic_id: mechanic_id.clone(),
                supervisor_id: supervisor_id.clone(),
                timestamp: now,
                maintenance_type: order.maintenance_type.as_str().to_string(),
                aircraft_id: order.aircraft.clone(),
                completed_tasks: order.completed_tasks(),
            })?;

            let record = self.ledger_record(
                TransactionType::MechanicSignature,
                (EntityType::Maintenance, &order.id),
                &mechanic.wallet_address,
                &order.aircraft,
                json!({
                    "workOrder": order.work_order,
                    "signature": hash,
                    "supervisor": supervisor_id,
                }),
                now,
            )?;

            let signature = DigitalSignature {
                mechanic: mechanic_id.clone(),
                supervisor: supervisor_id.clone(),
                timestamp: now,
                hash,
            };
            let blockchain_record = BlockchainRecord {
                transaction_hash: record.transaction_hash.clone(),
                block_number: record.block_number,
                gas_used: record.gas_used,
                timestamp: now,
            };
            order.digital_signature = Some(signature.clone());
            order.blockchain_record = Some(blockchain_record.clone());
            let transition = order.refresh(now);
            mechanic.record_signature(now);

            tx.update_work_order(&order)?;
            tx.update_mechanic(&mechanic)?;
            tx.append_transaction(&record)?;
            settle(tx, &order, transition, now)?;

            Ok(SignatureOutcome {
                digital_signature: signature,
                blockchain_record,
            })
        })?;

        info!(work_order_id = %id, mechanic_id = %mechanic_id, "Work order signed");
        Ok(outcome)
    }

    pub fn maintenance_statistics(&self) -> Result<MaintenanceStatistics> {
        let orders = self.store.read(|tx| tx.all_work_orders())?;
        Ok(maintenance_statistics(&orders))
    }

    /// Work orders scheduled or due within `year`-`month`
    pub fn maintenance_calendar(&self, year: i32, month: u32) -> Result<Vec<WorkOrderView>> {
        let (start, end) = month_bounds(year, month)?;
        let orders = self.store.read(|tx| tx.work_orders_in_range(start, end))?;
        Ok(orders.into_iter().map(WorkOrderView::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing;
    use chrono::{Months, TimeZone};
    use skychain_chain::is_well_formed_token;
    use skychain_domain::MaintenanceStatus;

    struct Fixture {
        service: FleetService,
        clock: std::sync::Arc<skychain_core::FixedClock>,
        aircraft_id: String,
        mechanic_id: String,
    }

    fn fixture() -> Fixture {
        let (service, clock) = testing::service();
        let aircraft_id = service
            .create_aircraft(&testing::aircraft_request("N1", 60))
            .unwrap()
            .aircraft
            .id;
        let mechanic_id = service
            .create_mechanic(&testing::mechanic_request("E100", "e100@example.com"))
            .unwrap()
            .mechanic
            .id;
        Fixture {
            service,
            clock,
            aircraft_id,
            mechanic_id,
        }
    }

    fn task(index: i64, mechanic_id: &str) -> CompleteTaskRequest {
        CompleteTaskRequest {
            task_index: Some(index),
            mechanic_id: Some(mechanic_id.to_string()),
            notes: None,
        }
    }

    fn start_work(f: &Fixture, id: &str) -> WorkOrderView {
        f.service
            .update_work_order(
                id,
                &MaintenanceUpdateRequest {
                    status: Some("in-progress".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
    }

    #[test]
    fn test_create_numbers_and_links() {
        let f = fixture();
        let first = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 2))
            .unwrap();
        let second = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 2))
            .unwrap();

        assert_eq!(first.order.work_order, "WO-2025-0001");
        assert_eq!(second.order.work_order, "WO-2025-0002");
        // Scheduled date has arrived
        assert_eq!(first.order.status, MaintenanceStatus::Scheduled);

        let mechanic = f.service.get_mechanic(&f.mechanic_id).unwrap();
        assert_eq!(mechanic.mechanic.mechanic.tasks_in_progress, 2);
        assert_eq!(mechanic.current_tasks.len(), 2);

        let history = f.service.aircraft_maintenance_history(&f.aircraft_id).unwrap();
        assert_eq!(history.len(), 2);
        let aircraft = f.service.get_aircraft(&f.aircraft_id).unwrap();
        assert_eq!(aircraft.aircraft.maintenance_history.len(), 2);
    }

    #[test]
    fn test_create_rejects_missing_references() {
        let f = fixture();
        let err = f
            .service
            .create_work_order(&testing::maintenance_request("ghost", &f.mechanic_id, 5, 1))
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidReference(ref m) if m == "Aircraft not found"));

        let err = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, "ghost", 5, 1))
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidReference(ref m) if m == "Mechanic not found"));
    }

    #[test]
    fn test_past_due_in_progress_becomes_overdue() {
        let f = fixture();
        let mut request = testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, -1, 2);
        request.status = Some("in-progress".to_string());

        let view = f.service.create_work_order(&request).unwrap();
        assert_eq!(view.order.status, MaintenanceStatus::Overdue);

        // Any later save keeps it overdue
        let view = f
            .service
            .update_work_order(
                &view.order.id,
                &MaintenanceUpdateRequest {
                    description: Some("Re-inspect".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.order.status, MaintenanceStatus::Overdue);
    }

    #[test]
    fn test_completing_checklist_completes_order() {
        let f = fixture();
        let created = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 2))
            .unwrap();
        let id = created.order.id.clone();
        start_work(&f, &id);

        let view = f.service.complete_task(&id, &task(0, &f.mechanic_id)).unwrap();
        assert_eq!(view.order.status, MaintenanceStatus::InProgress);
        assert_eq!(view.completion_percentage, 50);

        f.clock.advance(Duration::hours(2));
        let done_at = testing::start() + Duration::hours(2);
        let view = f.service.complete_task(&id, &task(1, &f.mechanic_id)).unwrap();
        assert_eq!(view.order.status, MaintenanceStatus::Completed);
        assert_eq!(view.order.completed_date, Some(done_at));
        assert_eq!(view.completion_percentage, 100);

        let mechanic = f.service.get_mechanic(&f.mechanic_id).unwrap().mechanic.mechanic;
        assert_eq!(mechanic.tasks_completed, 1);
        assert_eq!(mechanic.tasks_in_progress, 0);
        assert_eq!(mechanic.work_history.len(), 1);

        // Re-completing an item does not move the completion date
        f.clock.advance(Duration::hours(1));
        let view = f.service.complete_task(&id, &task(0, &f.mechanic_id)).unwrap();
        assert_eq!(view.order.completed_date, Some(done_at));
        let mechanic = f.service.get_mechanic(&f.mechanic_id).unwrap().mechanic.mechanic;
        assert_eq!(mechanic.tasks_completed, 1);
    }

    #[test]
    fn test_inspection_completion_advances_aircraft() {
        let f = fixture();
        let created = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 1))
            .unwrap();
        start_work(&f, &created.order.id);
        f.service.complete_task(&created.order.id, &task(0, &f.mechanic_id)).unwrap();

        let aircraft = f.service.get_aircraft(&f.aircraft_id).unwrap().aircraft;
        let now = testing::start();
        assert_eq!(aircraft.last_maintenance, now);
        assert_eq!(aircraft.next_maintenance, now.checked_add_months(Months::new(3)).unwrap());
    }

    #[test]
    fn test_complete_task_errors() {
        let f = fixture();
        let created = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 2))
            .unwrap();

        let err = f.service.complete_task(&created.order.id, &task(2, &f.mechanic_id)).unwrap_err();
        assert!(matches!(err, FleetError::OutOfRange(ref m) if m == "Invalid task index"));

        let err = f.service.complete_task("ghost", &task(0, &f.mechanic_id)).unwrap_err();
        assert!(matches!(err, FleetError::NotFound(ref m) if m == "Maintenance record not found"));
    }

    #[test]
    fn test_derived_status_cannot_be_requested() {
        let f = fixture();
        let created = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 1))
            .unwrap();

        let err = f
            .service
            .update_work_order(
                &created.order.id,
                &MaintenanceUpdateRequest {
                    status: Some("completed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, FleetError::Validation(_)));

        let view = f
            .service
            .update_work_order(
                &created.order.id,
                &MaintenanceUpdateRequest {
                    status: Some("cancelled".to_string()),
                    cost: Some(skychain_domain::requests::CostRequest {
                        labor: Some(400.0),
                        parts: Some(100.0),
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(view.order.status, MaintenanceStatus::Cancelled);
        assert_eq!(view.order.cost.as_ref().map(|c| c.total), Some(500.0));
    }

    #[test]
    fn test_signature_records_ledger_entry() {
        let f = fixture();
        let created = f
            .service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 2))
            .unwrap();

        let outcome = f
            .service
            .sign_work_order(
                &created.order.id,
                &SignatureRequest {
                    mechanic_id: Some(f.mechanic_id.clone()),
                    supervisor_id: Some("sup-1".to_string()),
                },
            )
            .unwrap();
        assert!(is_well_formed_token(&outcome.digital_signature.hash));
        assert!((1_000_000..2_000_000).contains(&outcome.blockchain_record.block_number));

        let stored = f.service.get_work_order(&created.order.id).unwrap().order;
        assert_eq!(stored.digital_signature, Some(outcome.digital_signature.clone()));

        let mechanic = f.service.get_mechanic(&f.mechanic_id).unwrap().mechanic.mechanic;
        assert_eq!(mechanic.blockchain_signatures, 1);

        let records = f
            .service
            .entity_transactions(EntityType::Maintenance, &created.order.id)
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transaction_hash, outcome.blockchain_record.transaction_hash);

        let err = f
            .service
            .sign_work_order(
                &created.order.id,
                &SignatureRequest {
                    mechanic_id: Some("ghost".to_string()),
                    supervisor_id: Some("sup-1".to_string()),
                },
            )
            .unwrap_err();
        assert!(matches!(err, FleetError::InvalidReference(ref m) if m == "Mechanic not found"));
    }

    #[test]
    fn test_calendar_and_statistics() {
        let f = fixture();
        f.service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 5, 1))
            .unwrap();
        f.service
            .create_work_order(&testing::maintenance_request(&f.aircraft_id, &f.mechanic_id, 40, 1))
            .unwrap();

        // Both are scheduled on June 15; only one is due in June
        assert_eq!(f.service.maintenance_calendar(2025, 6).unwrap().len(), 2);
        assert_eq!(f.service.maintenance_calendar(2025, 7).unwrap().len(), 1);
        assert!(f.service.maintenance_calendar(2025, 8).unwrap().is_empty());
        assert!(matches!(f.service.maintenance_calendar(2025, 13), Err(FleetError::Validation(_))));

        let stats = f.service.maintenance_statistics().unwrap();
        assert_eq!(stats.total_tasks, 2);
        assert_eq!(stats.completed_tasks, 0);
    }

    #[test]
    fn test_month_bounds_december() {
        let (start, end) = month_bounds(2025, 12).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() - Duration::milliseconds(1));
    }
}
