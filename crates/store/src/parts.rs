//! Part persistence

use rusqlite::params;
use skychain_domain::{Part, PartStatus};
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::query::{Page, PageRequest, Where};
use crate::store::{to_doc, Tx};

#[derive(Debug, Clone, Default)]
pub struct PartFilter {
    pub status: Option<PartStatus>,
    /// Substring of part number, name, serial number or manufacturer
    pub search: Option<String>,
    pub aircraft: Option<String>,
}

impl Tx<'_> {
    pub fn get_part(&self, id: &str) -> Result<Option<Part>> {
        self.load_one("SELECT doc FROM parts WHERE id = ?1", params![id])
    }

    pub fn require_part(&self, id: &str) -> Result<Part> {
        self.get_part(id)?.ok_or_else(|| StoreError::not_found("Part", id))
    }

    pub fn find_part_by_qr(&self, qr_code: &str) -> Result<Option<Part>> {
        self.load_one("SELECT doc FROM parts WHERE qr_code = ?1 LIMIT 1", params![qr_code])
    }

    pub fn insert_part(&self, part: &Part) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO parts (
                id, aircraft_id, part_number, name, manufacturer, serial_number,
                blockchain_hash, qr_code, status, install_date, created_at, doc
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                part.id,
                part.aircraft,
                part.part_number,
                part.name,
                part.manufacturer,
                part.serial_number,
                part.blockchain_hash,
                part.qr_code,
                part.status.as_str(),
                part.install_date.timestamp_millis(),
                part.created_at.timestamp_millis(),
                to_doc(part)?,
            ],
        )?;
        debug!(part_id = %part.id, serial_number = %part.serial_number, "Part inserted");
        Ok(())
    }

    pub fn update_part(&self, part: &Part) -> Result<()> {
        let changed = self.conn.execute(
            r#"
            UPDATE parts SET
                aircraft_id = ?2, part_number = ?3, name = ?4, manufacturer = ?5,
                serial_number = ?6, qr_code = ?7, status = ?8, install_date = ?9, doc = ?10
            WHERE id = ?1
            "#,
            params![
                part.id,
                part.aircraft,
                part.part_number,
                part.name,
                part.manufacturer,
                part.serial_number,
                part.qr_code,
                part.status.as_str(),
                part.install_date.timestamp_millis(),
                to_doc(part)?,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("Part", part.id.as_str()));
        }
        Ok(())
    }

    /// Newest first
    pub fn list_parts(&self, filter: &PartFilter, request: PageRequest) -> Result<Page<Part>> {
        let mut w = Where::new();
        w.eq("status", filter.status.map(|s| s.as_str().to_string()))
            .eq("aircraft_id", filter.aircraft.clone())
            .search(
                &["part_number", "name", "serial_number", "manufacturer"],
                filter.search.as_deref(),
            );
        self.load_page("parts", &w, "created_at DESC, id ASC", request)
    }

    /// Most recently installed first
    pub fn parts_for_aircraft(&self, aircraft_id: &str) -> Result<Vec<Part>> {
        self.load_many(
            "SELECT doc FROM parts WHERE aircraft_id = ?1 ORDER BY install_date DESC, id ASC",
            params![aircraft_id],
        )
    }

    pub fn all_parts(&self) -> Result<Vec<Part>> {
        self.load_many("SELECT doc FROM parts ORDER BY created_at DESC, id ASC", [])
    }
}
