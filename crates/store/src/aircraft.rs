//! Aircraft persistence

use rusqlite::params;
use skychain_domain::{Aircraft, AircraftStatus};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::query::{Page, PageRequest, Where};
use crate::store::{to_doc, Tx};

#[derive(Debug, Clone, Default)]
pub struct AircraftFilter {
    pub status: Option<AircraftStatus>,
    /// Substring of registration, model or manufacturer
    pub search: Option<String>,
}

impl Tx<'_> {
    pub fn get_aircraft(&self, id: &str) -> Result<Option<Aircraft>> {
        self.load_one("SELECT doc FROM aircraft WHERE id = ?1", params![id])
    }

    pub fn require_aircraft(&self, id: &str) -> Result<Aircraft> {
        self.get_aircraft(id)?
            .ok_or_else(|| StoreError::not_found("Aircraft", id))
    }

    pub fn aircraft_exists(&self, id: &str) -> Result<bool> {
        let found: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM aircraft WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )?;
        Ok(found > 0)
    }

    pub fn insert_aircraft(&self, aircraft: &Aircraft) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO aircraft (
                id, registration, model, manufacturer, status,
                next_maintenance, created_at, doc
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                aircraft.id,
                aircraft.registration,
                aircraft.model,
                aircraft.manufacturer,
                aircraft.status.as_str(),
                aircraft.next_maintenance.timestamp_millis(),
                aircraft.created_at.timestamp_millis(),
                to_doc(aircraft)?,
            ],
        )?;
        debug!(aircraft_id = %aircraft.id, registration = %aircraft.registration, "Aircraft inserted");
        Ok(())
    }

    pub fn update_aircraft(&self, aircraft: &Aircraft) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE aircraft SET
                registration = ?2, model = ?3, manufacturer = ?4, status = ?5,
                next_maintenance = ?6, doc = ?7
            WHERE id = ?1
            "#,
            params![
                aircraft.id,
                aircraft.registration,
                aircraft.model,
                aircraft.manufacturer,
                aircraft.status.as_str(),
                aircraft.next_maintenance.timestamp_millis(),
                to_doc(aircraft)?,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Aircraft", aircraft.id.as_str()));
        }
        Ok(())
    }

    /// Delete an aircraft together with its parts and work orders
    pub fn delete_aircraft(&self, id: &str) -> Result<()> {
        let parts = self
            .conn
            .execute("DELETE FROM parts WHERE aircraft_id = ?1", params![id])?;
        let orders = self
            .conn
            .execute("DELETE FROM maintenance WHERE aircraft_id = ?1", params![id])?;
        let removed = self
            .conn
            .execute("DELETE FROM aircraft WHERE id = ?1", params![id])?;
        if removed == 0 {
            return Err(StoreError::not_found("Aircraft", id));
        }
        debug!(aircraft_id = %id, parts, orders, "Aircraft deleted with dependents");
        Ok(())
    }

    /// Newest first
    pub fn list_aircraft(&self, filter: &AircraftFilter, request: PageRequest) -> Result<Page<Aircraft>> {
        let mut w = Where::new();
        w.eq("status", filter.status.map(|s| s.as_str().to_string()))
            .search(&["registration", "model", "manufacturer"], filter.search.as_deref());
        self.load_page("aircraft", &w, "created_at DESC, id ASC", request)
    }

    pub fn all_aircraft(&self) -> Result<Vec<Aircraft>> {
        self.load_many("SELECT doc FROM aircraft ORDER BY created_at DESC, id ASC", [])
    }
}
