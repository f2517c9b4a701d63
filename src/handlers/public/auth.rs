use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::config;
use crate::database::manager::DatabaseError;
use crate::database::employees;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub emp_id: i32,
    pub password: String,
}

/// POST /auth/login - Authenticate an employee and receive a JWT token.
///
/// On success the token claims carry the employee record and the list of
/// departments they manage, queried once here. Every protected route reads
/// that context from the token instead of re-querying.
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<impl IntoResponse, ApiError> {
    let employee = match employees::authenticate(payload.emp_id, &payload.password).await {
        Ok(employee) => employee,
        Err(DatabaseError::NotFound(_)) => {
            // Same message for unknown id and wrong password
            return Err(ApiError::unauthorized(
                "Incorrect id/password, please try again",
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let manager_of = employees::manager_departments(employee.emp_id).await?;

    let claims = Claims::new(employee.emp_id, employee.name.clone(), manager_of.clone());
    let token = generate_jwt(&claims).map_err(|e| {
        tracing::error!("JWT generation failed: {}", e);
        ApiError::internal_server_error("Failed to create session token")
    })?;

    tracing::info!(emp_id = employee.emp_id, manager = !manager_of.is_empty(), "login");

    let expires_in = config::config().security.jwt_expiry_hours * 3600;
    Ok(Json(json!({
        "success": true,
        "data": {
            "token": token,
            "user": employee,
            "manager_of": manager_of,
            "expires_in": expires_in
        }
    })))
}
