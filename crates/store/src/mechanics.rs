//! Mechanic persistence
//!
//! The password hash and wallet key live in their own columns and never
//! appear in the serialized [`Mechanic`] document.

use rusqlite::{params, OptionalExtension};
use skychain_domain::{AvailabilityStatus, Mechanic};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::query::{Page, PageRequest, Where};
use crate::store::{to_doc, Tx};

#[derive(Debug, Clone, Default)]
pub struct MechanicFilter {
    /// Substring of name, employee id or email
    pub search: Option<String>,
    pub specialty: Option<String>,
    pub availability: Option<AvailabilityStatus>,
}

impl Tx<'_> {
    pub fn get_mechanic(&self, id: &str) -> Result<Option<Mechanic>> {
        self.load_one("SELECT doc FROM mechanics WHERE id = ?1", params![id])
    }

    pub fn require_mechanic(&self, id: &str) -> Result<Mechanic> {
        self.get_mechanic(id)?
            .ok_or_else(|| StoreError::not_found("Mechanic", id))
    }

    pub fn insert_mechanic(&self, mechanic: &Mechanic, credential_hash: &str, private_key: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO mechanics (
                id, employee_id, email, name, wallet_address, is_active,
                availability, credential_hash, private_key, doc
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                mechanic.id,
                mechanic.employee_id,
                mechanic.email,
                mechanic.name,
                mechanic.wallet_address,
                mechanic.is_active,
                mechanic.availability.status.as_str(),
                credential_hash,
                private_key,
                to_doc(mechanic)?,
            ],
        )?;
        debug!(mechanic_id = %mechanic.id, employee_id = %mechanic.employee_id, "Mechanic inserted");
        Ok(())
    }

    pub fn update_mechanic(&self, mechanic: &Mechanic) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE mechanics SET
                employee_id = ?2, email = ?3, name = ?4, is_active = ?5,
                availability = ?6, doc = ?7
            WHERE id = ?1
            "#,
            params![
                mechanic.id,
                mechanic.employee_id,
                mechanic.email,
                mechanic.name,
                mechanic.is_active,
                mechanic.availability.status.as_str(),
                to_doc(mechanic)?,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Mechanic", mechanic.id.as_str()));
        }
        Ok(())
    }

    /// Active mechanics by name
    pub fn list_mechanics(&self, filter: &MechanicFilter, request: PageRequest) -> Result<Page<Mechanic>> {
        let mut w = Where::new();
        w.raw("is_active = ?", Some(1_i64))
            .eq("availability", filter.availability.map(|a| a.as_str().to_string()))
            .raw(
                "EXISTS (SELECT 1 FROM json_each(doc, '$.specialties') WHERE json_each.value = ?)",
                filter.specialty.clone(),
            )
            .search(&["name", "employee_id", "email"], filter.search.as_deref());
        self.load_page("mechanics", &w, "name ASC, id ASC", request)
    }

    pub fn all_mechanics(&self) -> Result<Vec<Mechanic>> {
        self.load_many("SELECT doc FROM mechanics ORDER BY name ASC, id ASC", [])
    }

    /// Stored password hash, if the mechanic exists
    pub fn credential_hash(&self, id: &str) -> Result<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT credential_hash FROM mechanics WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?)
    }
}
