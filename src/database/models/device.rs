use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full device row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Device {
    pub device_id: i32,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: BigDecimal,
    pub manufacturer: String,
    pub model_number: String,
    /// NULL means unassigned; otherwise exactly one employee owns the device.
    pub issued_to: Option<i32>,
}

/// Device reachable through the used-by relation (many-to-many usage,
/// distinct from issuance).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UsedDevice {
    pub device_id: i32,
    pub manufacturer: String,
    pub model_number: String,
}

/// Device issued to an employee (ownership listing).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IssuedDevice {
    pub device_id: i32,
    pub purchase_date: NaiveDate,
    pub manufacturer: String,
    pub model_number: String,
}

/// Single-device view: Device joined with its Model.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceDetail {
    pub device_id: i32,
    pub serial_number: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: BigDecimal,
    pub manufacturer: String,
    pub model_number: String,
    pub issued_to: Option<i32>,
}

/// One row of the manager's assignment-flag view: every issued device of a
/// model, flagged by whether the chosen employee holds it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceAssignmentFlag {
    pub device_id: i32,
    pub issued_to_employee: bool,
}

/// Device plus the employee it is issued to, for a department listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeviceEmployeeAssignment {
    pub device_id: i32,
    pub serial_number: String,
    pub emp_id: i32,
    pub name: String,
}
