use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The public employee record returned on login and after edits. The
/// password column never leaves the data access layer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub emp_id: i32,
    pub name: String,
    pub home_address: String,
    pub date_of_birth: NaiveDate,
}

/// Minimal employee reference used in department listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeRef {
    pub emp_id: i32,
    pub name: String,
}

/// Employee listing that includes the address (no-devices report).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeWithAddress {
    pub emp_id: i32,
    pub name: String,
    pub home_address: String,
}

/// Sparse field update for an employee's own details. Only fields that are
/// `Some` are written; everything else stays untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.date_of_birth.is_none()
            && self.phone.is_none()
            && self.password.is_none()
    }
}
