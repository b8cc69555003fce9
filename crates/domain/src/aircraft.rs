//! Aircraft domain model and compliance status derivation
//!
//! Aircraft status follows the time left until the next maintenance:
//! - fewer than 0 days: `overdue`
//! - 0 to 7 days: `alert`
//! - more than 7 days: `compliant`
//!
//! `grounded` is a manual override. Derivation leaves a grounded aircraft
//! grounded until an update explicitly clears it.

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds in one day
const DAY_MS: i64 = 86_400_000;

/// Days at or below which an aircraft is in `alert`
pub const ALERT_WINDOW_DAYS: i64 = 7;

/// Calendar months between scheduled inspections
pub const INSPECTION_INTERVAL_MONTHS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AircraftStatus {
    Compliant,
    Alert,
    Overdue,
    Grounded,
}

impl AircraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AircraftStatus::Compliant => "compliant",
            AircraftStatus::Alert => "alert",
            AircraftStatus::Overdue => "overdue",
            AircraftStatus::Grounded => "grounded",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "compliant" => Some(AircraftStatus::Compliant),
            "alert" => Some(AircraftStatus::Alert),
            "overdue" => Some(AircraftStatus::Overdue),
            "grounded" => Some(AircraftStatus::Grounded),
            _ => None,
        }
    }

    /// Status implied by the maintenance date, honouring the grounded override
    pub fn derive(
        current: AircraftStatus,
        next_maintenance: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AircraftStatus {
        if current == AircraftStatus::Grounded {
            return AircraftStatus::Grounded;
        }
        let days = days_until(next_maintenance, now);
        if days < 0 {
            AircraftStatus::Overdue
        } else if days <= ALERT_WINDOW_DAYS {
            AircraftStatus::Alert
        } else {
            AircraftStatus::Compliant
        }
    }
}

/// `ceil((target - now) / 1 day)`
pub fn days_until(target: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (target - now).num_milliseconds();
    if ms >= 0 {
        (ms + DAY_MS - 1) / DAY_MS
    } else {
        -((-ms) / DAY_MS)
    }
}

/// Regulatory compliance flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceStatus {
    pub faa: bool,
    pub easa: bool,
    pub last_audit: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalTwin {
    pub enabled: bool,
    pub last_sync: DateTime<Utc>,
}

/// A registered aircraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aircraft {
    pub id: String,
    /// Unique, stored upper-case
    pub registration: String,
    pub model: String,
    pub manufacturer: String,
    pub year_built: i32,
    pub flight_hours: f64,
    pub last_maintenance: DateTime<Utc>,
    pub next_maintenance: DateTime<Utc>,
    pub status: AircraftStatus,
    pub location: String,
    /// Opaque integrity token
    pub blockchain_hash: String,
    pub qr_code: Option<String>,
    /// Owned part ids, in installation order
    pub parts: Vec<String>,
    /// Owned work order ids, in creation order
    pub maintenance_history: Vec<String>,
    pub compliance_status: ComplianceStatus,
    pub digital_twin: DigitalTwin,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Aircraft {
    /// Status this aircraft should carry at `now`
    pub fn derive_status(&self, now: DateTime<Utc>) -> AircraftStatus {
        AircraftStatus::derive(self.status, self.next_maintenance, now)
    }

    /// Recompute status and stamp `updated_at`; call before every write
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.status = self.derive_status(now);
        self.updated_at = now;
    }

    pub fn days_until_maintenance(&self, now: DateTime<Utc>) -> i64 {
        days_until(self.next_maintenance, now)
    }

    /// Record a completed scheduled inspection
    pub fn record_inspection(&mut self, now: DateTime<Utc>) {
        self.last_maintenance = now;
        self.next_maintenance = now
            .checked_add_months(Months::new(INSPECTION_INTERVAL_MONTHS))
            .unwrap_or(now);
    }

    /// Set or clear the grounded override.
    ///
    /// Any requested status other than `grounded` only clears the override;
    /// the effective value is always re-derived.
    pub fn request_status(&mut self, requested: AircraftStatus) {
        self.status = match requested {
            AircraftStatus::Grounded => AircraftStatus::Grounded,
            // Placeholder overwritten by the next `refresh`.
            _ => AircraftStatus::Compliant,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap()
    }

    fn aircraft(next: DateTime<Utc>) -> Aircraft {
        Aircraft {
            id: "ac-1".to_string(),
            registration: "N12345".to_string(),
            model: "737-800".to_string(),
            manufacturer: "Boeing".to_string(),
            year_built: 2015,
            flight_hours: 12_000.0,
            last_maintenance: now() - Duration::days(80),
            next_maintenance: next,
            status: AircraftStatus::Compliant,
            location: "KSEA".to_string(),
            blockchain_hash: format!("0x{}", "a".repeat(64)),
            qr_code: None,
            parts: Vec::new(),
            maintenance_history: Vec::new(),
            compliance_status: ComplianceStatus {
                faa: true,
                easa: true,
                last_audit: now(),
            },
            digital_twin: DigitalTwin {
                enabled: true,
                last_sync: now(),
            },
            created_at: now(),
            updated_at: now(),
        }
    }

    #[test]
    fn test_days_until_rounds_up() {
        assert_eq!(days_until(now() + Duration::days(7), now()), 7);
        assert_eq!(days_until(now() + Duration::days(7) + Duration::seconds(1), now()), 8);
        assert_eq!(days_until(now(), now()), 0);
        assert_eq!(days_until(now() - Duration::hours(12), now()), 0);
        assert_eq!(days_until(now() - Duration::days(1), now()), -1);
        assert_eq!(days_until(now() - Duration::hours(36), now()), -1);
    }

    #[test]
    fn test_status_boundaries() {
        let n = now();
        let derive = |d: Duration| AircraftStatus::derive(AircraftStatus::Compliant, n + d, n);

        assert_eq!(derive(Duration::days(8)), AircraftStatus::Compliant);
        assert_eq!(derive(Duration::days(7)), AircraftStatus::Alert);
        assert_eq!(derive(Duration::days(3)), AircraftStatus::Alert);
        assert_eq!(derive(Duration::zero()), AircraftStatus::Alert);
        assert_eq!(derive(Duration::days(-1)), AircraftStatus::Overdue);
    }

    #[test]
    fn test_caller_status_is_overridden() {
        let mut ac = aircraft(now() + Duration::days(30));
        ac.status = AircraftStatus::Overdue;
        ac.refresh(now());
        assert_eq!(ac.status, AircraftStatus::Compliant);
    }

    #[test]
    fn test_grounded_is_sticky_until_cleared() {
        let mut ac = aircraft(now() + Duration::days(30));
        ac.request_status(AircraftStatus::Grounded);
        ac.refresh(now());
        assert_eq!(ac.status, AircraftStatus::Grounded);

        ac.request_status(AircraftStatus::Alert);
        ac.refresh(now());
        assert_eq!(ac.status, AircraftStatus::Compliant);
    }

    #[test]
    fn test_record_inspection_advances_three_months() {
        let mut ac = aircraft(now() - Duration::days(2));
        ac.record_inspection(now());
        ac.refresh(now());

        assert_eq!(ac.last_maintenance, now());
        assert_eq!(
            ac.next_maintenance,
            Utc.with_ymd_and_hms(2025, 9, 15, 10, 0, 0).unwrap()
        );
        assert_eq!(ac.status, AircraftStatus::Compliant);
    }

    #[test]
    fn test_record_inspection_clamps_month_end() {
        let end_of_november = Utc.with_ymd_and_hms(2025, 11, 30, 0, 0, 0).unwrap();
        let mut ac = aircraft(end_of_november);
        ac.record_inspection(end_of_november);
        assert_eq!(
            ac.next_maintenance,
            Utc.with_ymd_and_hms(2026, 2, 28, 0, 0, 0).unwrap()
        );
    }
}
