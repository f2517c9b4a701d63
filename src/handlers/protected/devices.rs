use axum::extract::Path;
use axum::response::{IntoResponse, Json};
use axum::Extension;
use serde_json::json;

use crate::database::devices;
use crate::error::ApiError;
use crate::middleware::SessionUser;

/// GET /api/mydevices - Devices issued to the session user.
pub async fn mydevices(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    match devices::issued_devices(user.emp_id).await {
        Ok(device_list) => Json(json!({
            "success": true,
            "data": { "device_list": device_list }
        })),
        Err(e) => {
            tracing::warn!("issued_devices failed for {}: {}", user.emp_id, e);
            Json(json!({
                "success": true,
                "data": { "device_list": [] },
                "warning": "Error communicating with database"
            }))
        }
    }
}

/// GET /api/devices/:deviceid - Single device view: detail plus repair
/// history. A missing device is a 404; a failed repairs lookup degrades to
/// an empty history with a warning.
pub async fn device(Path(device_id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let device_info = devices::device_detail(device_id).await?;

    let (repairs, warning) = match devices::device_repairs(device_id).await {
        Ok(repairs) => (repairs, false),
        Err(e) => {
            tracing::warn!("device_repairs failed for {}: {}", device_id, e);
            (vec![], true)
        }
    };

    let mut body = json!({
        "success": true,
        "data": {
            "device_info": device_info,
            "repairs": repairs
        }
    });
    if warning {
        body["warning"] = json!("Error communicating with database");
    }

    Ok(Json(body))
}

/// GET /api/devices/:deviceid/model - Model information for a device.
pub async fn device_model(Path(device_id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let model_info = devices::model_of_device(device_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "model_info": model_info }
    })))
}

/// GET /api/repairs/:repairid - Single repair view including the service
/// provider.
pub async fn repair(Path(repair_id): Path<i32>) -> Result<impl IntoResponse, ApiError> {
    let repair_info = devices::repair_detail(repair_id).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "repair_info": repair_info }
    })))
}
