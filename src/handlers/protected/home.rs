use axum::response::{IntoResponse, Json};
use axum::Extension;
use serde_json::json;

use crate::database::{devices, employees};
use crate::middleware::SessionUser;

/// GET /api/home - The landing view-model: devices the employee uses, the
/// departments they work in, and their session identity.
///
/// A failed lookup degrades to an empty list with a warning flag rather
/// than failing the whole page.
pub async fn home(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    let mut warning = false;

    let used_by = match devices::devices_used_by(user.emp_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("devices_used_by failed for {}: {}", user.emp_id, e);
            warning = true;
            vec![]
        }
    };

    let works_in = match employees::departments_for(user.emp_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::warn!("departments_for failed for {}: {}", user.emp_id, e);
            warning = true;
            vec![]
        }
    };

    let mut body = json!({
        "success": true,
        "data": {
            "user": { "emp_id": user.emp_id, "name": user.name },
            "device_list": used_by,
            "departments": works_in,
            "manager_of": user.manager_of
        }
    });
    if warning {
        body["warning"] = json!("Error communicating with database");
    }

    Json(body)
}
