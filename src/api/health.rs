use axum::{Extension, http::StatusCode, response::Json};
use serde_json::{Value, json};

use super::AppState;

/// Reports the service version and whether the catalog database answers.
pub async fn health(Extension(state): Extension<AppState>) -> (StatusCode, Json<Value>) {
    health_report(state.store.find_user(0).is_ok())
}

/// Health body for a catalog check result. A failing catalog answers `503`
/// with `"status": "degraded"`.
pub fn health_report(catalog_ok: bool) -> (StatusCode, Json<Value>) {
    let (code, status, catalog) = if catalog_ok {
        (StatusCode::OK, "ok", "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    (
        code,
        Json(json!({
            "status": status,
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "catalog": catalog,
        })),
    )
}
