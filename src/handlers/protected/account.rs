use axum::response::{IntoResponse, Json};
use axum::Extension;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::database::employees;
use crate::database::models::EmployeeUpdate;
use crate::error::ApiError;
use crate::middleware::SessionUser;

/// GET /api/details - The session identity backing the settings view.
pub async fn details_get(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "emp_id": user.emp_id,
            "name": user.name,
            "manager_of": user.manager_of
        }
    }))
}

#[derive(Debug, Deserialize)]
pub struct EditDetailsRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub dob: Option<String>,
    pub password: Option<String>,
    pub contact: Option<String>,
}

/// POST /api/details - Update the session user's own details. Only the
/// provided fields are written; the refreshed record comes back.
pub async fn details_post(
    Extension(user): Extension<SessionUser>,
    Json(payload): Json<EditDetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let update = build_update(&payload)?;

    if update.is_empty() {
        return Err(ApiError::bad_request("No fields to update"));
    }

    let employee = employees::edit_details(user.emp_id, &update).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "user": employee },
        "message": "Details updated successfully"
    })))
}

/// POST /api/auth/logout - Sessions live entirely in the token, so logout
/// is the client discarding it; this endpoint exists so the flow has a
/// defined invalidation point and a user-visible confirmation.
pub async fn logout(Extension(user): Extension<SessionUser>) -> impl IntoResponse {
    tracing::info!(emp_id = user.emp_id, "logout");
    Json(json!({
        "success": true,
        "message": "You have been logged out"
    }))
}

/// Form fields arrive as optional strings; empty strings mean "unchanged".
/// Validation rules match the legacy form: passwords need at least 8
/// characters, contact numbers exactly 10 digits.
fn build_update(payload: &EditDetailsRequest) -> Result<EmployeeUpdate, ApiError> {
    let mut update = EmployeeUpdate::default();

    if let Some(name) = non_empty(&payload.name) {
        update.name = Some(name.to_string());
    }
    if let Some(address) = non_empty(&payload.address) {
        update.address = Some(address.to_string());
    }
    if let Some(dob) = non_empty(&payload.dob) {
        let parsed = NaiveDate::parse_from_str(dob, "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request("Date of birth must be YYYY-MM-DD"))?;
        update.date_of_birth = Some(parsed);
    }
    if let Some(password) = non_empty(&payload.password) {
        if password.len() < 8 {
            return Err(ApiError::bad_request(
                "Password lengths must be greater than 7",
            ));
        }
        update.password = Some(password.to_string());
    }
    if let Some(contact) = non_empty(&payload.contact) {
        if contact.len() != 10 || !contact.chars().all(|c| c.is_ascii_digit()) {
            return Err(ApiError::bad_request("Phone number must have 10 digits"));
        }
        update.phone = Some(contact.to_string());
    }

    Ok(update)
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EditDetailsRequest {
        EditDetailsRequest {
            name: None,
            address: None,
            dob: None,
            password: None,
            contact: None,
        }
    }

    #[test]
    fn empty_strings_are_skipped() {
        let mut req = request();
        req.name = Some(String::new());
        req.password = Some(String::new());
        let update = build_update(&req).unwrap();
        assert!(update.is_empty());
    }

    #[test]
    fn sparse_update_touches_only_named_fields() {
        let mut req = request();
        req.name = Some("Alice".to_string());
        let update = build_update(&req).unwrap();
        assert_eq!(update.name.as_deref(), Some("Alice"));
        assert!(update.address.is_none());
        assert!(update.date_of_birth.is_none());
        assert!(update.password.is_none());
        assert!(update.phone.is_none());
    }

    #[test]
    fn short_password_rejected() {
        let mut req = request();
        req.password = Some("seven77".to_string());
        assert!(build_update(&req).is_err());

        req.password = Some("eight888".to_string());
        assert!(build_update(&req).is_ok());
    }

    #[test]
    fn contact_must_be_ten_digits() {
        let mut req = request();
        req.contact = Some("12345".to_string());
        assert!(build_update(&req).is_err());

        req.contact = Some("12345abcde".to_string());
        assert!(build_update(&req).is_err());

        req.contact = Some("0412345678".to_string());
        assert!(build_update(&req).is_ok());
    }

    #[test]
    fn dob_must_parse() {
        let mut req = request();
        req.dob = Some("not-a-date".to_string());
        assert!(build_update(&req).is_err());

        req.dob = Some("1990-04-01".to_string());
        let update = build_update(&req).unwrap();
        assert_eq!(
            update.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 4, 1)
        );
    }
}
