use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Repair row as shown in a device's repair history (Repair joined with the
/// service provider's name).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RepairSummary {
    pub repair_id: i32,
    pub fault_report: String,
    pub start_date: NaiveDate,
    /// NULL while the repair is still open.
    pub end_date: Option<NaiveDate>,
    pub cost: BigDecimal,
    pub service_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceProvider {
    pub abn: i64,
    pub service_name: String,
    pub email: String,
}

/// Full single-repair view including the service provider and the device the
/// repair was done to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairDetail {
    pub repair_id: i32,
    pub fault_report: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cost: BigDecimal,
    pub done_by: ServiceProvider,
    pub done_to: i32,
}

/// Flat row backing [`RepairDetail`]; shaped by the data access layer.
#[derive(Debug, Clone, FromRow)]
pub struct RepairDetailRow {
    pub repair_id: i32,
    pub fault_report: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub cost: BigDecimal,
    pub abn: i64,
    pub service_name: String,
    pub email: String,
    pub done_to: i32,
}

impl From<RepairDetailRow> for RepairDetail {
    fn from(row: RepairDetailRow) -> Self {
        Self {
            repair_id: row.repair_id,
            fault_report: row.fault_report,
            start_date: row.start_date,
            end_date: row.end_date,
            cost: row.cost,
            done_by: ServiceProvider {
                abn: row.abn,
                service_name: row.service_name,
                email: row.email,
            },
            done_to: row.done_to,
        }
    }
}
