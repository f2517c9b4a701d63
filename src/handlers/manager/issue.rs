use axum::response::{IntoResponse, Json};
use axum::Extension;
use serde::Deserialize;
use serde_json::json;

use crate::database::{devices, employees};
use crate::error::ApiError;
use crate::middleware::SessionUser;

/// GET /api/issue-device - Data backing the issue form: allocations and
/// employees across every department the manager runs.
pub async fn issue_form(
    Extension(user): Extension<SessionUser>,
) -> Result<impl IntoResponse, ApiError> {
    let allocations = super::allocations_for(&user.manager_of).await?;

    let mut staff = Vec::new();
    for department in &user.manager_of {
        staff.extend(employees::employees_in_department(department).await?);
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "model_allocations": allocations,
            "employees": staff
        }
    })))
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    /// Legacy clients send `empid` / `deviceid`.
    #[serde(alias = "empid")]
    pub emp_id: i32,
    #[serde(alias = "deviceid")]
    pub device_id: i32,
}

/// POST /api/issue-device - Issue a device to an employee. A device that
/// already has a holder comes back as a 409 with the reason.
pub async fn issue_post(
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<AssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    devices::issue_device(payload.emp_id, payload.device_id).await?;

    tracing::info!(
        manager = user.emp_id,
        emp_id = payload.emp_id,
        device_id = payload.device_id,
        "device issued"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Device successfully issued"
    })))
}

/// POST /api/revoke-device - Revoke a device from its holder. Revoking an
/// unissued device or one held by a different employee is a 409 with the
/// distinguishing reason.
pub async fn revoke_post(
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<AssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    devices::revoke_device(payload.emp_id, payload.device_id).await?;

    tracing::info!(
        manager = user.emp_id,
        emp_id = payload.emp_id,
        device_id = payload.device_id,
        "device revoked"
    );

    Ok(Json(json!({
        "success": true,
        "message": "Device revoked"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_request_accepts_legacy_field_names() {
        let request: AssignmentRequest =
            serde_json::from_value(serde_json::json!({ "empid": 3, "deviceid": 9 }))
                .expect("legacy body");
        assert_eq!(request.emp_id, 3);
        assert_eq!(request.device_id, 9);

        let request: AssignmentRequest =
            serde_json::from_value(serde_json::json!({ "emp_id": 3, "device_id": 9 }))
                .expect("snake_case body");
        assert_eq!(request.emp_id, 3);
        assert_eq!(request.device_id, 9);
    }
}
