use axum::extract::Query;
use axum::response::{IntoResponse, Json};
use axum::Extension;
use serde::Deserialize;
use serde_json::json;

use crate::database::manager::DatabaseError;
use crate::database::{catalog, devices};
use crate::error::ApiError;
use crate::middleware::SessionUser;

#[derive(Debug, Deserialize)]
pub struct DepartmentModelsQuery {
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    /// Legacy clients send `empid`.
    #[serde(alias = "empid")]
    pub emp_id: Option<i32>,
    pub department: Option<String>,
}

/// GET /api/department-models - Three nested views keyed by query
/// parameters, drilling down from allocations to a single employee:
///
/// 1. bare                                  -> allocations across all managed departments
/// 2. ?model&manufacturer&department        -> per-employee device counts for that model
/// 3. ?model&manufacturer&department&emp_id -> issued devices flagged for that employee
pub async fn department_models(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DepartmentModelsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    match (&query.model, &query.manufacturer, &query.department) {
        (Some(model), Some(manufacturer), Some(department)) => {
            if !user.manages(department) {
                return Err(ApiError::forbidden(format!(
                    "You do not manage {}",
                    department
                )));
            }

            if let Some(emp_id) = query.emp_id {
                assignment_view(model, manufacturer, department, emp_id).await
            } else {
                counts_view(model, manufacturer, department).await
            }
        }
        _ => allocations_view(&user).await,
    }
}

#[derive(Debug, Deserialize)]
pub struct DepartmentDevicesQuery {
    pub model: String,
    pub manufacturer: String,
    pub department: String,
}

/// GET /api/department-models/devices - Devices of a model and the
/// employees holding them, restricted to one managed department.
pub async fn department_model_devices(
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DepartmentDevicesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.manages(&query.department) {
        return Err(ApiError::forbidden(format!(
            "You do not manage {}",
            query.department
        )));
    }

    let assignments =
        devices::device_employee_assignments(&query.manufacturer, &query.model, &query.department)
            .await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "assignments": assignments,
            "model": query.model,
            "manufacturer": query.manufacturer,
            "department": query.department
        }
    })))
}

async fn allocations_view(user: &SessionUser) -> Result<Json<serde_json::Value>, ApiError> {
    let allocations = super::allocations_for(&user.manager_of).await?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "model_allocations": allocations,
            "departments": user.manager_of
        }
    })))
}

async fn counts_view(
    model: &str,
    manufacturer: &str,
    department: &str,
) -> Result<Json<serde_json::Value>, ApiError> {
    let counts = match catalog::employee_device_counts(department, manufacturer, model).await {
        Ok(counts) => counts,
        Err(DatabaseError::NotFound(_)) => {
            return Err(ApiError::not_found("No model/manufacturer matching department"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(Json(json!({
        "success": true,
        "data": {
            "model_counts": counts,
            "model": model,
            "manufacturer": manufacturer,
            "department": department
        }
    })))
}

async fn assignment_view(
    model: &str,
    manufacturer: &str,
    department: &str,
    emp_id: i32,
) -> Result<Json<serde_json::Value>, ApiError> {
    let flags = devices::devices_with_assignment_flag(model, manufacturer, emp_id).await?;

    if flags.is_empty() {
        return Err(ApiError::not_found("No model/manufacturer/employee matching"));
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "device_assigned": flags,
            "emp_id": emp_id,
            "model": model,
            "manufacturer": manufacturer,
            "department": department
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Uri;

    #[test]
    fn drill_down_query_accepts_legacy_empid() {
        let uri: Uri = "/api/department-models?model=Pixel%202&manufacturer=Google&department=Sales&empid=7"
            .parse()
            .expect("uri");
        let Query(query) = Query::<DepartmentModelsQuery>::try_from_uri(&uri).expect("query");
        assert_eq!(query.emp_id, Some(7));
        assert_eq!(query.department.as_deref(), Some("Sales"));
    }

    #[test]
    fn drill_down_query_still_accepts_emp_id() {
        let uri: Uri = "/api/department-models?emp_id=7".parse().expect("uri");
        let Query(query) = Query::<DepartmentModelsQuery>::try_from_uri(&uri).expect("query");
        assert_eq!(query.emp_id, Some(7));
    }

    #[tokio::test]
    async fn device_listing_rejects_unmanaged_department() {
        let user = SessionUser {
            emp_id: 1,
            name: "Test Manager".to_string(),
            manager_of: vec!["Sales".to_string()],
        };
        let query = DepartmentDevicesQuery {
            model: "Pixel 2".to_string(),
            manufacturer: "Google".to_string(),
            department: "HR".to_string(),
        };

        let err = department_model_devices(Extension(user), Query(query))
            .await
            .map(|_| ())
            .expect_err("expected a forbidden error");
        assert_eq!(err.status_code(), 403);
    }
}
