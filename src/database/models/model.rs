use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Model {
    pub manufacturer: String,
    pub description: String,
    pub model_number: String,
    pub weight: i32,
}

/// A department-scoped cap on how many devices of a model may be provisioned.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ModelAllocation {
    pub manufacturer: String,
    pub model_number: String,
    pub max_number: i32,
}

/// Per-employee count of issued devices matching a model within a department.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployeeDeviceCount {
    pub emp_id: i32,
    pub name: String,
    pub device_count: i64,
}
