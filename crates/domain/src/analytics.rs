//! Read-time rollups over fleet entities
//!
//! Nothing here holds state. Every function takes the records it summarises
//! and, where time matters, an explicit `now`. Cost figures are fixed business
//! assumptions, not derived from recorded costs.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::aircraft::{Aircraft, AircraftStatus};
use crate::maintenance::{MaintenanceStatus, WorkOrder};
use crate::mechanic::{AvailabilityStatus, Mechanic};
use crate::part::{Part, PartStatus};
use crate::transaction::{LedgerTransaction, TransactionStatus};

/// Annual maintenance cost per aircraft without the platform
pub const TRADITIONAL_COST_PER_AIRCRAFT: f64 = 50_000.0;
/// Annual maintenance cost per aircraft with the platform
pub const OPTIMIZED_COST_PER_AIRCRAFT: f64 = 10_000.0;
/// Estimated lifetime savings per aircraft in the fleet performance view
pub const FLEET_SAVINGS_PER_AIRCRAFT: f64 = 2_100_000.0;
/// Estimated savings per work order in the trends view
pub const SAVINGS_PER_TASK: f64 = 15_000.0;
pub const DEFAULT_TREND_MONTHS: u32 = 6;
pub const DEFAULT_ROI_FLEET_SIZE: u32 = 100;
/// Window of the daily transaction series
pub const BLOCKCHAIN_METRICS_DAYS: i64 = 30;

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `part / total` as a percentage with one decimal, 0 when `total` is 0
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(part as f64 / total as f64 * 100.0)
}

/// Count per key, with an optional mean
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub key: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_hours: Option<f64>,
}

fn count_by<'a, I>(keys: I) -> Vec<Bucket>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(key, count)| Bucket {
            key: key.to_string(),
            count,
            avg_hours: None,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.cmp(&b.key)));
    buckets
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_aircraft: usize,
    pub compliant_aircraft: usize,
    pub alert_aircraft: usize,
    pub overdue_aircraft: usize,
    pub compliance_rate: f64,
    pub total_parts: usize,
    pub authentic_parts: usize,
    pub counterfeit_parts: usize,
    pub authenticity_rate: f64,
    pub total_maintenance: usize,
    pub completed_maintenance: usize,
    pub overdue_maintenance: usize,
    pub total_savings: f64,
    pub savings_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostReduction {
    pub traditional: f64,
    pub sky_chain: f64,
    pub savings: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub kpis: DashboardKpis,
    pub cost_reduction: CostReduction,
}

pub fn dashboard(aircraft: &[Aircraft], parts: &[Part], orders: &[WorkOrder]) -> Dashboard {
    let count_aircraft = |s: AircraftStatus| aircraft.iter().filter(|a| a.status == s).count();
    let count_parts = |s: PartStatus| parts.iter().filter(|p| p.status == s).count();
    let count_orders = |s: MaintenanceStatus| orders.iter().filter(|o| o.status == s).count();

    let total_aircraft = aircraft.len();
    let compliant_aircraft = count_aircraft(AircraftStatus::Compliant);
    let authentic_parts = count_parts(PartStatus::Authentic);

    let traditional = total_aircraft as f64 * TRADITIONAL_COST_PER_AIRCRAFT;
    let sky_chain = total_aircraft as f64 * OPTIMIZED_COST_PER_AIRCRAFT;
    let savings = traditional - sky_chain;
    let savings_percentage = if traditional > 0.0 {
        round1(savings / traditional * 100.0)
    } else {
        0.0
    };

    Dashboard {
        kpis: DashboardKpis {
            total_aircraft,
            compliant_aircraft,
            alert_aircraft: count_aircraft(AircraftStatus::Alert),
            overdue_aircraft: count_aircraft(AircraftStatus::Overdue),
            compliance_rate: percentage(compliant_aircraft, total_aircraft),
            total_parts: parts.len(),
            authentic_parts,
            counterfeit_parts: count_parts(PartStatus::Counterfeit),
            authenticity_rate: percentage(authentic_parts, parts.len()),
            total_maintenance: orders.len(),
            completed_maintenance: count_orders(MaintenanceStatus::Completed),
            overdue_maintenance: count_orders(MaintenanceStatus::Overdue),
            total_savings: savings,
            savings_percentage,
        },
        cost_reduction: CostReduction {
            traditional,
            sky_chain,
            savings,
            percentage: savings_percentage,
        },
    }
}

// ---------------------------------------------------------------------------
// Fleet performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturerPerformance {
    pub manufacturer: String,
    pub count: usize,
    pub compliant: usize,
    pub compliance_rate: f64,
    pub avg_flight_hours: f64,
    pub estimated_savings: f64,
}

/// Per-manufacturer rollup, largest fleet first
pub fn fleet_performance(aircraft: &[Aircraft]) -> Vec<ManufacturerPerformance> {
    let mut groups: BTreeMap<&str, Vec<&Aircraft>> = BTreeMap::new();
    for a in aircraft {
        groups.entry(a.manufacturer.as_str()).or_default().push(a);
    }

    let mut rows: Vec<ManufacturerPerformance> = groups
        .into_iter()
        .map(|(manufacturer, members)| {
            let count = members.len();
            let compliant = members
                .iter()
                .filter(|a| a.status == AircraftStatus::Compliant)
                .count();
            let hours: Vec<f64> = members.iter().map(|a| a.flight_hours).collect();
            ManufacturerPerformance {
                manufacturer: manufacturer.to_string(),
                count,
                compliant,
                compliance_rate: compliant as f64 / count as f64 * 100.0,
                avg_flight_hours: mean(&hours).unwrap_or(0.0).round(),
                estimated_savings: count as f64 * FLEET_SAVINGS_PER_AIRCRAFT,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

// ---------------------------------------------------------------------------
// Maintenance trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub total_tasks: usize,
    pub completed: usize,
    pub overdue: usize,
    pub completion_rate: f64,
    pub avg_hours: Option<f64>,
    pub total_cost: f64,
    pub estimated_savings: f64,
}

/// Work orders created in the last `months` calendar months, grouped by
/// creation month, oldest first
pub fn maintenance_trends(orders: &[WorkOrder], months: u32, now: DateTime<Utc>) -> Vec<MonthlyTrend> {
    let start = now.checked_sub_months(Months::new(months)).unwrap_or(now);

    let mut groups: BTreeMap<(i32, u32), Vec<&WorkOrder>> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.created_at >= start) {
        groups
            .entry((order.created_at.year(), order.created_at.month()))
            .or_default()
            .push(order);
    }

    groups
        .into_iter()
        .map(|((year, month), members)| {
            let total_tasks = members.len();
            let completed = members
                .iter()
                .filter(|o| o.status == MaintenanceStatus::Completed)
                .count();
            let hours: Vec<f64> = members.iter().filter_map(|o| o.actual_hours).collect();
            MonthlyTrend {
                year,
                month,
                total_tasks,
                completed,
                overdue: members
                    .iter()
                    .filter(|o| o.status == MaintenanceStatus::Overdue)
                    .count(),
                completion_rate: completed as f64 / total_tasks as f64 * 100.0,
                avg_hours: mean(&hours).map(round1),
                total_cost: members
                    .iter()
                    .filter_map(|o| o.cost.as_ref().map(|c| c.total))
                    .sum(),
                estimated_savings: total_tasks as f64 * SAVINGS_PER_TASK,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Mechanic performance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicRanking {
    pub id: String,
    pub name: String,
    pub employee_id: String,
    pub tasks_completed: u32,
    pub rating: f64,
    pub reputation_score: u32,
    pub quality_score: f64,
    pub on_time_completion: f64,
    pub compliance_rate: f64,
    pub overall_performance: f64,
}

/// Active mechanics, best overall performance first
pub fn mechanic_performance(mechanics: &[Mechanic]) -> Vec<MechanicRanking> {
    let mut rows: Vec<MechanicRanking> = mechanics
        .iter()
        .filter(|m| m.is_active)
        .map(|m| MechanicRanking {
            id: m.id.clone(),
            name: m.name.clone(),
            employee_id: m.employee_id.clone(),
            tasks_completed: m.tasks_completed,
            rating: m.rating,
            reputation_score: m.reputation_score,
            quality_score: m.performance.quality_score,
            on_time_completion: m.performance.on_time_completion,
            compliance_rate: m.performance.compliance_rate,
            overall_performance: m.performance.triad_average(),
        })
        .collect();

    rows.sort_by(|a, b| b.overall_performance.total_cmp(&a.overall_performance));
    rows
}

// ---------------------------------------------------------------------------
// Blockchain metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTransactions {
    /// `YYYY-MM-DD`
    pub date: String,
    pub count: usize,
    pub avg_gas_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkMetrics {
    pub uptime: f64,
    pub avg_block_time: f64,
    pub hash_rate: String,
    pub gas_price: String,
}

impl Default for NetworkMetrics {
    fn default() -> Self {
        Self {
            uptime: 99.99,
            avg_block_time: 2.3,
            hash_rate: "156.7 TH/s".to_string(),
            gas_price: "21 gwei".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainMetrics {
    pub total_transactions: usize,
    pub confirmed_transactions: usize,
    pub pending_transactions: usize,
    pub confirmation_rate: f64,
    pub transaction_types: Vec<Bucket>,
    pub daily_transactions: Vec<DailyTransactions>,
    pub network_metrics: NetworkMetrics,
}

pub fn blockchain_metrics(transactions: &[LedgerTransaction], now: DateTime<Utc>) -> BlockchainMetrics {
    let total = transactions.len();
    let confirmed = transactions
        .iter()
        .filter(|t| t.status == TransactionStatus::Confirmed)
        .count();

    let since = now - Duration::days(BLOCKCHAIN_METRICS_DAYS);
    let mut days: BTreeMap<String, Vec<u64>> = BTreeMap::new();
    for tx in transactions.iter().filter(|t| t.timestamp >= since) {
        days.entry(tx.timestamp.format("%Y-%m-%d").to_string())
            .or_default()
            .push(tx.gas_used);
    }

    BlockchainMetrics {
        total_transactions: total,
        confirmed_transactions: confirmed,
        pending_transactions: transactions
            .iter()
            .filter(|t| t.status == TransactionStatus::Pending)
            .count(),
        confirmation_rate: percentage(confirmed, total),
        transaction_types: count_by(transactions.iter().map(|t| t.kind.as_str())),
        daily_transactions: days
            .into_iter()
            .map(|(date, gas)| DailyTransactions {
                date,
                count: gas.len(),
                avg_gas_used: gas.iter().sum::<u64>() as f64 / gas.len() as f64,
            })
            .collect(),
        network_metrics: NetworkMetrics::default(),
    }
}

// ---------------------------------------------------------------------------
// ROI calculator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraditionalCosts {
    pub maintenance_errors: f64,
    pub compliance_audits: f64,
    pub counterfeit_parts: f64,
    pub insurance_premiums: f64,
    pub regulatory_fines: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformCosts {
    pub platform_license: f64,
    pub blockchain_fees: f64,
    pub training: f64,
    /// One-time, amortized over a year
    pub implementation: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Savings {
    pub maintenance_error_reduction: f64,
    pub faster_compliance_audits: f64,
    pub counterfeit_prevention: f64,
    pub insurance_premium_reduction: f64,
    pub regulatory_fine_avoidance: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoiReport {
    pub fleet_size: u32,
    pub traditional_costs: TraditionalCosts,
    #[serde(rename = "skyChainCosts")]
    pub platform_costs: PlatformCosts,
    pub savings: Savings,
    pub net_savings: f64,
    /// Percent
    pub roi: f64,
    /// Months; `None` when there are no net savings to pay back with
    pub payback_period: Option<f64>,
    pub cost_reduction_percentage: f64,
}

pub fn roi(fleet_size: u32) -> RoiReport {
    let n = fleet_size as f64;

    let maintenance_errors = n * 180_000.0;
    let compliance_audits = n * 45_000.0;
    let counterfeit_parts = n * 25_000.0;
    let insurance_premiums = n * 35_000.0;
    let regulatory_fines = n * 15_000.0;
    let traditional = TraditionalCosts {
        maintenance_errors,
        compliance_audits,
        counterfeit_parts,
        insurance_premiums,
        regulatory_fines,
        total: maintenance_errors
            + compliance_audits
            + counterfeit_parts
            + insurance_premiums
            + regulatory_fines,
    };

    let platform_license = n * 12_000.0;
    let blockchain_fees = n * 3_000.0;
    let training = n * 2_000.0;
    let implementation = n * 8_000.0;
    let platform = PlatformCosts {
        platform_license,
        blockchain_fees,
        training,
        implementation,
        total: platform_license + blockchain_fees + training + implementation,
    };

    let maintenance_error_reduction = maintenance_errors * 0.8;
    let faster_compliance_audits = compliance_audits * 0.95;
    let counterfeit_prevention = counterfeit_parts;
    let insurance_premium_reduction = insurance_premiums * 0.3;
    let regulatory_fine_avoidance = regulatory_fines * 0.8;
    let savings = Savings {
        maintenance_error_reduction,
        faster_compliance_audits,
        counterfeit_prevention,
        insurance_premium_reduction,
        regulatory_fine_avoidance,
        total: maintenance_error_reduction
            + faster_compliance_audits
            + counterfeit_prevention
            + insurance_premium_reduction
            + regulatory_fine_avoidance,
    };

    let net_savings = savings.total - platform.total;
    let roi = if platform.total > 0.0 {
        round1(net_savings / platform.total * 100.0)
    } else {
        0.0
    };
    let payback_period = if net_savings > 0.0 {
        Some(round1(platform.total / (net_savings / 12.0)))
    } else {
        None
    };
    let cost_reduction_percentage = if traditional.total > 0.0 {
        round1(net_savings / traditional.total * 100.0)
    } else {
        0.0
    };

    RoiReport {
        fleet_size,
        traditional_costs: traditional,
        platform_costs: platform,
        savings,
        net_savings,
        roi,
        payback_period,
        cost_reduction_percentage,
    }
}

// ---------------------------------------------------------------------------
// Per-collection statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceStatistics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub overdue_tasks: usize,
    pub in_progress_tasks: usize,
    pub completion_rate: f64,
    pub priority_breakdown: Vec<Bucket>,
    /// Includes the mean of recorded actual hours per type
    pub type_breakdown: Vec<Bucket>,
}

pub fn maintenance_statistics(orders: &[WorkOrder]) -> MaintenanceStatistics {
    let count = |s: MaintenanceStatus| orders.iter().filter(|o| o.status == s).count();
    let completed = count(MaintenanceStatus::Completed);

    let mut type_breakdown = count_by(orders.iter().map(|o| o.maintenance_type.as_str()));
    for bucket in &mut type_breakdown {
        let hours: Vec<f64> = orders
            .iter()
            .filter(|o| o.maintenance_type.as_str() == bucket.key)
            .filter_map(|o| o.actual_hours)
            .collect();
        bucket.avg_hours = mean(&hours);
    }

    MaintenanceStatistics {
        total_tasks: orders.len(),
        completed_tasks: completed,
        overdue_tasks: count(MaintenanceStatus::Overdue),
        in_progress_tasks: count(MaintenanceStatus::InProgress),
        completion_rate: percentage(completed, orders.len()),
        priority_breakdown: count_by(orders.iter().map(|o| o.priority.as_str())),
        type_breakdown,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartStatistics {
    pub total_parts: usize,
    pub authentic_parts: usize,
    pub counterfeit_parts: usize,
    pub pending_parts: usize,
    pub verification_rate: f64,
    pub status_breakdown: Vec<Bucket>,
}

pub fn part_statistics(parts: &[Part]) -> PartStatistics {
    let count = |s: PartStatus| parts.iter().filter(|p| p.status == s).count();
    let authentic = count(PartStatus::Authentic);

    PartStatistics {
        total_parts: parts.len(),
        authentic_parts: authentic,
        counterfeit_parts: count(PartStatus::Counterfeit),
        pending_parts: count(PartStatus::Pending),
        verification_rate: percentage(authentic, parts.len()),
        status_breakdown: count_by(parts.iter().map(|p| p.status.as_str())),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MechanicStatistics {
    pub total_mechanics: usize,
    /// Active mechanics whose availability is `available`
    pub active_mechanics: usize,
    pub average_rating: f64,
    pub total_certifications: usize,
    pub specialty_breakdown: Vec<Bucket>,
}

pub fn mechanic_statistics(mechanics: &[Mechanic]) -> MechanicStatistics {
    let active: Vec<&Mechanic> = mechanics.iter().filter(|m| m.is_active).collect();
    let ratings: Vec<f64> = active.iter().map(|m| m.rating).collect();

    MechanicStatistics {
        total_mechanics: active.len(),
        active_mechanics: active
            .iter()
            .filter(|m| m.availability.status == AvailabilityStatus::Available)
            .count(),
        average_rating: mean(&ratings).map(round1).unwrap_or(0.0),
        total_certifications: active.iter().map(|m| m.certifications.len()).sum(),
        specialty_breakdown: count_by(
            active
                .iter()
                .flat_map(|m| m.specialties.iter().map(String::as_str)),
        ),
    }
}
