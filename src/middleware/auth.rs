use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::auth::Claims;
use crate::config;
use crate::error::ApiError;

/// Authenticated session context extracted from the JWT. This is the
/// explicit replacement for ambient logged-in/manager session flags: it is
/// created at login, carried in the token, and injected per request.
#[derive(Clone, Debug)]
pub struct SessionUser {
    pub emp_id: i32,
    pub name: String,
    /// Login-time cache of the departments this employee manages.
    pub manager_of: Vec<String>,
}

impl SessionUser {
    pub fn is_manager(&self) -> bool {
        !self.manager_of.is_empty()
    }

    /// Guard for department-scoped manager operations: the requested
    /// department must be one the session user actually manages.
    pub fn manages(&self, department: &str) -> bool {
        self.manager_of.iter().any(|d| d == department)
    }
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            emp_id: claims.emp_id,
            name: claims.name,
            manager_of: claims.manager_of,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// session context. Unauthenticated requests never reach a handler.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let token = extract_jwt_from_headers(&headers).map_err(unauthorized)?;
    let claims = validate_jwt(&token).map_err(unauthorized)?;

    let session_user = SessionUser::from(claims);
    request.extensions_mut().insert(session_user);

    Ok(next.run(request).await)
}

/// Layered on top of `jwt_auth_middleware` for the manager-only routes:
/// requires a session that manages at least one department.
pub async fn require_manager_middleware(
    request: Request,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    let is_manager = request
        .extensions()
        .get::<SessionUser>()
        .map(SessionUser::is_manager)
        .unwrap_or(false);

    if !is_manager {
        let api_error = ApiError::forbidden("Manager access required");
        return Err((
            StatusCode::from_u16(api_error.status_code()).unwrap_or(StatusCode::FORBIDDEN),
            Json(api_error.to_json()),
        ));
    }

    Ok(next.run(request).await)
}

fn unauthorized(msg: String) -> (StatusCode, Json<serde_json::Value>) {
    let api_error = ApiError::unauthorized(msg);
    (
        StatusCode::from_u16(api_error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED),
        Json(api_error.to_json()),
    )
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().security.jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(manager_of: Vec<&str>) -> SessionUser {
        SessionUser {
            emp_id: 42,
            name: "Misty".to_string(),
            manager_of: manager_of.into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn manages_checks_exact_department() {
        let user = session(vec!["Accounting", "RND"]);
        assert!(user.manages("Accounting"));
        assert!(user.manages("RND"));
        assert!(!user.manages("Sales"));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_jwt_from_headers(&headers).unwrap(), "abc.def.ghi");

        let mut bad = HeaderMap::new();
        bad.insert("authorization", "Basic whatever".parse().unwrap());
        assert!(extract_jwt_from_headers(&bad).is_err());

        assert!(extract_jwt_from_headers(&HeaderMap::new()).is_err());
    }
}
