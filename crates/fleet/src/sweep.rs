//! Status reconciliation
//!
//! Status is derived on write, so a record nobody touches keeps the status it
//! had at its last save. The sweep re-derives every open work order and every
//! aircraft against the current time and expires lapsed certifications.

use tracing::{debug, info};

use crate::error::Result;
use crate::service::FleetService;
use crate::views::SweepReport;

impl FleetService {
    /// Re-derive stored statuses in one transaction
    pub fn sweep_statuses(&self) -> Result<SweepReport> {
        let now = self.now();

        let report = self.store.write(|tx| -> Result<SweepReport> {
            let mut report = SweepReport::default();

            for mut order in tx.open_work_orders()? {
                let transition = order.refresh(now);
                if !transition.changed() {
                    continue;
                }
                tx.update_work_order(&order)?;
                report.work_orders_updated += 1;
                if transition.became_completed() {
                    tx.apply_follow_ups(&order.completion_effects(now))?;
                    report.work_orders_completed += 1;
                }
                debug!(
                    work_order = %order.work_order,
                    from = transition.from.as_str(),
                    to = transition.to.as_str(),
                    "Work order status reconciled"
                );
            }

            // After work orders, so inspection follow-ups are already applied
            for mut aircraft in tx.all_aircraft()? {
                let before = aircraft.status;
                aircraft.refresh(now);
                if aircraft.status != before {
                    tx.update_aircraft(&aircraft)?;
                    report.aircraft_updated += 1;
                }
            }

            for mut mechanic in tx.all_mechanics()? {
                let lapsed = mechanic
                    .certifications
                    .iter()
                    .filter(|c| c.is_lapsed(now))
                    .count();
                if mechanic.expire_certifications(now) {
                    mechanic.updated_at = now;
                    tx.update_mechanic(&mechanic)?;
                    report.certifications_expired += lapsed;
                }
            }

            Ok(report)
        })?;

        if report == SweepReport::default() {
            debug!("Status sweep found nothing to change");
        } else {
            info!(
                aircraft_updated = report.aircraft_updated,
                work_orders_updated = report.work_orders_updated,
                work_orders_completed = report.work_orders_completed,
                certifications_expired = report.certifications_expired,
                "Status sweep applied"
            );
        }
        Ok(report)
    }
}
