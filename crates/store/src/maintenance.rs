//! Work order persistence and completion follow-ups

use chrono::{DateTime, Utc};
use rusqlite::params;
use skychain_domain::{
    parse_work_order, FollowUp, MaintenanceStatus, Priority, WorkOrder,
};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::query::{Page, PageRequest, Where};
use crate::store::{to_doc, Tx};

#[derive(Debug, Clone, Default)]
pub struct WorkOrderFilter {
    pub status: Option<MaintenanceStatus>,
    pub priority: Option<Priority>,
    pub aircraft: Option<String>,
    /// Assigned mechanic id
    pub mechanic: Option<String>,
}

impl Tx<'_> {
    pub fn get_work_order(&self, id: &str) -> Result<Option<WorkOrder>> {
        self.load_one("SELECT doc FROM maintenance WHERE id = ?1", params![id])
    }

    pub fn require_work_order(&self, id: &str) -> Result<WorkOrder> {
        self.get_work_order(id)?
            .ok_or_else(|| StoreError::not_found("Maintenance record", id))
    }

    /// Next free sequence number for work orders of `year`, starting at 1
    pub fn next_work_order_sequence(&self, year: i32) -> Result<u32> {
        let max: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(wo_seq), 0) FROM maintenance WHERE wo_year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(max.max(0) as u32 + 1)
    }

    pub fn insert_work_order(&self, order: &WorkOrder) -> Result<()> {
        let (year, seq) = parse_work_order(&order.work_order).unwrap_or((0, 0));
        self.conn.execute(
            r#"
            INSERT INTO maintenance (
                id, work_order, wo_year, wo_seq, aircraft_id, assigned_to, status,
                priority, scheduled_date, due_date, completed_date, created_at, doc
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            "#,
            params![
                order.id,
                order.work_order,
                year,
                seq,
                order.aircraft,
                order.assigned_to,
                order.status.as_str(),
                order.priority.as_str(),
                order.scheduled_date.timestamp_millis(),
                order.due_date.timestamp_millis(),
                order.completed_date.map(|d| d.timestamp_millis()),
                order.created_at.timestamp_millis(),
                to_doc(order)?,
            ],
        )?;
        debug!(work_order_id = %order.id, work_order = %order.work_order, "Work order inserted");
        Ok(())
    }

    pub fn update_work_order(&self, order: &WorkOrder) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE maintenance SET
                aircraft_id = ?2, assigned_to = ?3, status = ?4, priority = ?5,
                scheduled_date = ?6, due_date = ?7, completed_date = ?8, doc = ?9
            WHERE id = ?1
            "#,
            params![
                order.id,
                order.aircraft,
                order.assigned_to,
                order.status.as_str(),
                order.priority.as_str(),
                order.scheduled_date.timestamp_millis(),
                order.due_date.timestamp_millis(),
                order.completed_date.map(|d| d.timestamp_millis()),
                to_doc(order)?,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Maintenance record", order.id.as_str()));
        }
        Ok(())
    }

    /// Earliest due first
    pub fn list_work_orders(&self, filter: &WorkOrderFilter, request: PageRequest) -> Result<Page<WorkOrder>> {
        let mut w = Where::new();
        w.eq("status", filter.status.map(|s| s.as_str().to_string()))
            .eq("priority", filter.priority.map(|p| p.as_str().to_string()))
            .eq("aircraft_id", filter.aircraft.clone())
            .eq("assigned_to", filter.mechanic.clone());
        self.load_page("maintenance", &w, "due_date ASC, id ASC", request)
    }

    /// Newest first
    pub fn work_orders_for_aircraft(&self, aircraft_id: &str) -> Result<Vec<WorkOrder>> {
        self.load_many(
            "SELECT doc FROM maintenance WHERE aircraft_id = ?1 ORDER BY created_at DESC, id ASC",
            params![aircraft_id],
        )
    }

    /// Orders assigned to `mechanic_id`, most recently completed first
    pub fn work_history_page(&self, mechanic_id: &str, request: PageRequest) -> Result<Page<WorkOrder>> {
        let mut w = Where::new();
        w.eq("assigned_to", Some(mechanic_id.to_string()));
        self.load_page("maintenance", &w, "completed_date DESC, created_at DESC", request)
    }

    /// Scheduled or in-progress orders assigned to `mechanic_id`
    pub fn current_tasks(&self, mechanic_id: &str) -> Result<Vec<WorkOrder>> {
        self.load_many(
            "SELECT doc FROM maintenance
             WHERE assigned_to = ?1 AND status IN ('scheduled', 'in-progress')
             ORDER BY due_date ASC",
            params![mechanic_id],
        )
    }

    /// Orders whose scheduled or due date falls within `[start, end]`
    pub fn work_orders_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<WorkOrder>> {
        self.load_many(
            "SELECT doc FROM maintenance
             WHERE (scheduled_date BETWEEN ?1 AND ?2) OR (due_date BETWEEN ?1 AND ?2)
             ORDER BY scheduled_date ASC, id ASC",
            params![start.timestamp_millis(), end.timestamp_millis()],
        )
    }

    /// Orders whose status may still be re-derived: everything but `completed`
    pub fn open_work_orders(&self) -> Result<Vec<WorkOrder>> {
        self.load_many(
            "SELECT doc FROM maintenance
             WHERE status <> 'completed'
             ORDER BY due_date ASC",
            [],
        )
    }

    pub fn all_work_orders(&self) -> Result<Vec<WorkOrder>> {
        self.load_many("SELECT doc FROM maintenance ORDER BY created_at DESC, id ASC", [])
    }

    /// Apply completion follow-ups inside the current transaction.
    ///
    /// A follow-up whose target no longer exists is skipped.
    pub fn apply_follow_ups(&self, follow_ups: &[FollowUp]) -> Result<()> {
        for follow_up in follow_ups {
            match follow_up {
                FollowUp::MechanicTaskCompleted {
                    mechanic_id,
                    work_order_id,
                    completed_at,
                } => match self.get_mechanic(mechanic_id)? {
                    Some(mut mechanic) => {
                        mechanic.on_task_completed(work_order_id, *completed_at);
                        self.update_mechanic(&mechanic)?;
                    }
                    None => warn!(mechanic_id = %mechanic_id, "Completion follow-up skipped, mechanic missing"),
                },
                FollowUp::AircraftInspected {
                    aircraft_id,
                    completed_at,
                } => match self.get_aircraft(aircraft_id)? {
                    Some(mut aircraft) => {
                        aircraft.record_inspection(*completed_at);
                        aircraft.refresh(*completed_at);
                        self.update_aircraft(&aircraft)?;
                    }
                    None => warn!(aircraft_id = %aircraft_id, "Inspection follow-up skipped, aircraft missing"),
                },
            }
        }
        Ok(())
    }
}
