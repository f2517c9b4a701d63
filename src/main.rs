use axum::{routing::get, routing::post, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use device_desk_api::database::DatabaseManager;
use device_desk_api::handlers::{manager, protected, public};
use device_desk_api::middleware::{jwt_auth_middleware, require_manager_middleware};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = device_desk_api::config::config();
    tracing::info!("Starting Device Desk API in {:?} mode", config.environment);

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("DEVICE_DESK_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Device Desk API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");

    DatabaseManager::close().await;
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .route("/auth/login", post(public::auth::login))
        // Authenticated API
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn protected_routes() -> Router {
    Router::new()
        .route("/api/home", get(protected::home))
        .route("/api/models", get(protected::models))
        .route("/api/mydevices", get(protected::mydevices))
        .route("/api/devices/:deviceid", get(protected::device))
        .route("/api/devices/:deviceid/model", get(protected::device_model))
        .route("/api/repairs/:repairid", get(protected::repair))
        .route("/api/search", post(protected::search))
        .route("/api/search/weight", post(protected::search_weight))
        .route(
            "/api/details",
            get(protected::details_get).post(protected::details_post),
        )
        .route("/api/auth/logout", post(protected::logout))
        .merge(manager_routes())
        .layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn manager_routes() -> Router {
    Router::new()
        .route("/api/devices", get(manager::device_inventory))
        .route("/api/department-models", get(manager::department_models))
        .route(
            "/api/department-models/devices",
            get(manager::department_model_devices),
        )
        .route(
            "/api/issue-device",
            get(manager::issue_form).post(manager::issue_post),
        )
        .route("/api/revoke-device", post(manager::revoke_post))
        .route("/api/model-devices", get(manager::model_devices))
        .route(
            "/api/department-employees",
            get(manager::department_employees),
        )
        .route(
            "/api/employees/no-devices",
            get(manager::employees_with_no_devices),
        )
        .layer(axum::middleware::from_fn(require_manager_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Device Desk API",
            "version": version,
            "description": "Device management backend: employees view issued devices, managers issue and revoke within their departments",
            "endpoints": {
                "home": "/ (public)",
                "login": "/auth/login (public - token acquisition)",
                "employee": "/api/home, /api/models, /api/mydevices, /api/devices/:id[/model], /api/repairs/:id, /api/search, /api/details (protected)",
                "manager": "/api/department-models, /api/issue-device, /api/revoke-device, /api/model-devices, /api/department-employees, /api/employees/no-devices (manager only)"
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
