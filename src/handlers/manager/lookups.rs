//! Form-support lookups. The two query endpoints keep the legacy wire
//! contract their client-side scripts expect: a flat `{"error": true}` body
//! with a 200 status on missing parameters or lookup failure, and a single
//! keyed array on success.

use axum::extract::Query;
use axum::response::{IntoResponse, Json};
use axum::Extension;
use serde::Deserialize;
use serde_json::json;

use crate::database::{devices, employees};
use crate::error::ApiError;
use crate::middleware::SessionUser;

#[derive(Debug, Deserialize)]
pub struct ModelDevicesQuery {
    pub modelnumber: Option<String>,
    pub manufacturer: Option<String>,
}

/// GET /api/model-devices?modelnumber&manufacturer - Unassigned device ids
/// for a model.
pub async fn model_devices(Query(query): Query<ModelDevicesQuery>) -> impl IntoResponse {
    let (model_number, manufacturer) = match (&query.modelnumber, &query.manufacturer) {
        (Some(m), Some(mf)) => (m, mf),
        _ => return Json(json!({ "error": true })),
    };

    match devices::unassigned_devices_for_model(model_number, manufacturer).await {
        Ok(device_ids) => Json(json!({ "devices": device_ids })),
        Err(e) => {
            tracing::warn!("unassigned_devices_for_model failed: {}", e);
            Json(json!({ "error": true }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DepartmentEmployeesQuery {
    pub department: Option<String>,
}

/// GET /api/department-employees?department - Employees working in a
/// department.
pub async fn department_employees(
    Query(query): Query<DepartmentEmployeesQuery>,
) -> impl IntoResponse {
    let department = match &query.department {
        Some(d) => d,
        None => return Json(json!({ "error": true })),
    };

    match employees::employees_in_department(department).await {
        Ok(staff) => Json(json!({ "employees": staff })),
        Err(e) => {
            tracing::warn!("employees_in_department failed: {}", e);
            Json(json!({ "error": true }))
        }
    }
}

/// GET /api/devices - The full device inventory, including unassigned
/// stock.
pub async fn device_inventory() -> Result<impl IntoResponse, ApiError> {
    let device_list = devices::all_devices().await?;

    Ok(Json(json!({
        "success": true,
        "data": { "device_list": device_list }
    })))
}

/// GET /api/employees/no-devices - Employees in the manager's departments
/// who use no devices at all.
pub async fn employees_with_no_devices(
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse, ApiError> {
    let staff = employees::employees_with_no_devices(user.emp_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "employees": staff }
    })))
}
