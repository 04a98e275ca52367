//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Html;
use tracing::warn;

use super::AppState;
use super::types::{ErrorResponse, FaultsResponse, TriggerFaultRequest, TriggerFaultResponse};
use crate::error::TwinError;
use crate::sim::types::AssetStatus;

const DASHBOARD_HTML: &str = include_str!("../../static/dashboard.html");

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

impl From<TwinError> for ErrorResponse {
    fn from(e: TwinError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

fn twin_error(e: TwinError) -> ApiError {
    let status = match e {
        TwinError::UnknownTarget(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorResponse::from(e)))
}

/// `GET /` → the dashboard page.
pub async fn dashboard() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

/// `GET /api/status` → 200 + one `AssetStatus` per asset.
pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<Vec<AssetStatus>> {
    let now = state.now_s();
    Json(state.engine.read().await.status(now))
}

/// `POST /api/trigger_fault`
///
/// 200 on success, 400 for a bad body or a rejected fault, 404 for an
/// unknown target.
pub async fn trigger_fault(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TriggerFaultRequest>, JsonRejection>,
) -> Result<Json<TriggerFaultResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "bad fault request");
        error(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;

    let target = req.target();
    let now = state.now_s();
    let mut engine = state.engine.write().await;
    let duration = req
        .duration
        .unwrap_or(engine.sim_config().default_fault_secs);
    engine
        .inject_fault(target, req.fault_type, duration, now)
        .map_err(|e| {
            warn!(target_key = %target, error = %e, "fault rejected");
            twin_error(e)
        })?;

    Ok(Json(TriggerFaultResponse::injected(target)))
}

/// `GET /api/faults` → 200 + live faults with remaining seconds.
pub async fn get_faults(State(state): State<Arc<AppState>>) -> Json<FaultsResponse> {
    let now = state.now_s();
    let faults = state.engine.read().await.active_faults(now);
    Json(FaultsResponse { now_s: now, faults })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::config::TwinConfig;
    use crate::sim::engine::Engine;

    fn make_test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Engine::from_config(&TwinConfig::bulawayo())))
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/trigger_fault")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn dashboard_serves_html() {
        let app = router(make_test_state());
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/api/status"));
    }

    #[tokio::test]
    async fn status_lists_every_asset() {
        let app = router(make_test_state());
        let req = Request::builder()
            .uri("/api/status")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0]["id"], "grid_1");
        assert_eq!(rows[0]["type"], "Generation");
        assert_eq!(rows[3]["id"], "home_1");
        assert_eq!(rows[3]["owner"], "Mr. Dube");
    }

    #[tokio::test]
    async fn trigger_fault_marks_target() {
        let state = make_test_state();
        let app = router(Arc::clone(&state));

        let resp = app
            .oneshot(post_json(
                r#"{"asset_id": 1, "fault_type": "Grid Surge", "duration": 30, "is_home": true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["status"], "Fault Injected");
        assert_eq!(json["target"], "home_1");
        assert_eq!(json["message"], "Command Sent.");

        let rows = state.engine.read().await.status(state.now_s());
        let home = rows.iter().find(|r| r.id.to_string() == "home_1").unwrap();
        assert_eq!(home.fault.map(|f| f.label()), Some("Grid Surge"));
    }

    #[tokio::test]
    async fn trigger_fault_defaults_duration() {
        let state = make_test_state();
        let app = router(Arc::clone(&state));

        let resp = app
            .oneshot(post_json(r#"{"asset_id": 2, "fault_type": "Voltage Dip"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let faults = state.engine.read().await.active_faults(0.0);
        assert_eq!(faults.len(), 1);
        assert!(faults[0].remaining_secs > 9.0);
    }

    #[tokio::test]
    async fn empty_body_returns_400() {
        let app = router(make_test_state());
        let req = Request::builder()
            .method("POST")
            .uri("/api/trigger_fault")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(resp).await.get("error").is_some());
    }

    #[tokio::test]
    async fn unknown_fault_type_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(r#"{"asset_id": 1, "fault_type": "Meteor"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn home_fault_on_grid_asset_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(r#"{"asset_id": 1, "fault_type": "Home Wear"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn zero_duration_returns_400() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                r#"{"asset_id": 1, "fault_type": "Voltage Dip", "duration": 0}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_target_returns_404() {
        let app = router(make_test_state());
        let resp = app
            .oneshot(post_json(
                r#"{"asset_id": 7, "fault_type": "Voltage Dip", "is_home": true}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let json = body_json(resp).await;
        assert!(json["error"].as_str().unwrap().contains("home_7"));
    }

    #[tokio::test]
    async fn faults_lists_live_faults() {
        let state = make_test_state();
        state
            .engine
            .write()
            .await
            .inject_fault(
                crate::assets::SensorKey::Grid(3),
                crate::sim::fault::FaultKind::ZeroVoltage,
                60,
                state.now_s(),
            )
            .unwrap();

        let app = router(state);
        let req = Request::builder()
            .uri("/api/faults")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["faults"][0]["target"], "grid_3");
        assert_eq!(json["faults"][0]["fault_type"], "Zero Voltage");
    }
}
