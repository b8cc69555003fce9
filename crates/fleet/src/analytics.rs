//! Read-time rollups over the current store contents

use skychain_domain::analytics::{
    self, BlockchainMetrics, Dashboard, ManufacturerPerformance, MechanicRanking, MonthlyTrend,
    RoiReport, DEFAULT_ROI_FLEET_SIZE, DEFAULT_TREND_MONTHS,
};

use crate::error::Result;
use crate::service::FleetService;

impl FleetService {
    pub fn dashboard(&self) -> Result<Dashboard> {
        let (aircraft, parts, orders) = self.store.read(|tx| -> Result<_> {
            Ok((tx.all_aircraft()?, tx.all_parts()?, tx.all_work_orders()?))
        })?;
        Ok(analytics::dashboard(&aircraft, &parts, &orders))
    }

    pub fn fleet_performance(&self) -> Result<Vec<ManufacturerPerformance>> {
        let aircraft = self.store.read(|tx| tx.all_aircraft())?;
        Ok(analytics::fleet_performance(&aircraft))
    }

    /// Monthly rollup over the last `months` months (default 6)
    pub fn maintenance_trends(&self, months: Option<u32>) -> Result<Vec<MonthlyTrend>> {
        let orders = self.store.read(|tx| tx.all_work_orders())?;
        Ok(analytics::maintenance_trends(
            &orders,
            months.unwrap_or(DEFAULT_TREND_MONTHS),
            self.now(),
        ))
    }

    pub fn mechanic_performance(&self) -> Result<Vec<MechanicRanking>> {
        let mechanics = self.store.read(|tx| tx.all_mechanics())?;
        Ok(analytics::mechanic_performance(&mechanics))
    }

    pub fn blockchain_metrics(&self) -> Result<BlockchainMetrics> {
        let transactions = self.store.read(|tx| tx.all_transactions())?;
        Ok(analytics::blockchain_metrics(&transactions, self.now()))
    }

    /// Pure calculation; no store access
    pub fn roi(&self, fleet_size: Option<u32>) -> RoiReport {
        analytics::roi(fleet_size.unwrap_or(DEFAULT_ROI_FLEET_SIZE))
    }
}

#[cfg(test)]
mod tests {
    use crate::service::testing;

    #[test]
    fn test_dashboard_counts_store_contents() {
        let (service, _clock) = testing::service();
        service.create_aircraft(&testing::aircraft_request("N1", 60)).unwrap();
        service.create_aircraft(&testing::aircraft_request("N2", 3)).unwrap();

        let dashboard = service.dashboard().unwrap();
        assert_eq!(dashboard.kpis.total_aircraft, 2);
        assert_eq!(dashboard.kpis.compliant_aircraft, 1);
        assert_eq!(dashboard.kpis.alert_aircraft, 1);
        assert_eq!(dashboard.kpis.compliance_rate, 50.0);
        assert_eq!(dashboard.cost_reduction.traditional, 100_000.0);

        let fleet = service.fleet_performance().unwrap();
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet[0].count, 2);
    }

    #[test]
    fn test_trends_and_metrics() {
        let (service, _clock) = testing::service();
        let aircraft = service
            .create_aircraft(&testing::aircraft_request("N1", 60))
            .unwrap()
            .aircraft
            .id;
        let mechanic = service
            .create_mechanic(&testing::mechanic_request("E100", "a@example.com"))
            .unwrap()
            .mechanic
            .id;
        service
            .create_work_order(&testing::maintenance_request(&aircraft, &mechanic, 5, 1))
            .unwrap();

        let trends = service.maintenance_trends(None).unwrap();
        assert_eq!(trends.len(), 1);
        assert_eq!((trends[0].year, trends[0].month), (2025, 6));
        assert_eq!(trends[0].total_tasks, 1);

        let metrics = service.blockchain_metrics().unwrap();
        assert_eq!(metrics.total_transactions, 1);
        assert_eq!(metrics.confirmed_transactions, 1);

        assert_eq!(service.mechanic_performance().unwrap().len(), 1);
        assert_eq!(service.roi(None).fleet_size, 100);
        assert_eq!(service.roi(Some(10)).fleet_size, 10);
    }
}
