//! End-to-end tests for the gate middleware
//!
//! These tests verify that:
//! - Valid requests reach the handler and invalid ones are rejected with a
//!   400 JSON body before the handler runs
//! - Source allowlists and precedence hold across a real HTTP round trip
//! - Provider mode hands handlers only rule-derived parameters
//! - Host extensions (ActionId, SourceOverlay, SubmittedParams) are honored

use axum::http::header::COOKIE;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use axum_test::TestServer;
use param_gate::prelude::*;
use serde_json::json;

const CONFIG: &str = r#"
provide_params: true
actions:
  delete:
    id: query
    return_url: body
    ajax: query,body
  profile:
    user_id: session
  purge:
    id: delete
"#;

fn filter() -> ParamFilter {
    GateConfig::from_yaml_str(CONFIG)
        .unwrap()
        .into_filter()
        .unwrap()
}

async fn echo_provided(Provided(params): Provided) -> Json<Value> {
    Json(json!({ "provided": params }))
}

async fn plain() -> &'static str {
    "reached"
}

fn app() -> Router {
    Router::new()
        .route("/articles/delete", post(echo_provided))
        .route("/articles/list", get(plain))
        .route("/articles/purge", delete(echo_provided))
        .layer(middleware::from_fn_with_state(
            GateState::new(filter()),
            enforce,
        ))
}

// =============================================================================
// Gate pass/fail
// =============================================================================

mod gate_decisions {
    use super::*;

    #[tokio::test]
    async fn test_fully_valid_delete_request() {
        let server = TestServer::new(app()).unwrap();
        let response = server
            .post("/articles/delete?id=123&ajax=1")
            .form(&[("return_url", "/admin")])
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(
            body["provided"],
            json!({ "id": "123", "return_url": "/admin", "ajax": "1" })
        );
    }

    #[tokio::test]
    async fn test_body_cannot_supply_query_only_param() {
        let server = TestServer::new(app()).unwrap();
        let response = server
            .post("/articles/delete")
            .form(&[("id", "123")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_NOT_IN_ALLOWED_SOURCES");
        assert_eq!(body["details"]["param"], "id");
        assert_eq!(body["details"]["allowed_sources"], json!(["query"]));
    }

    #[tokio::test]
    async fn test_cookie_cannot_supply_body_only_param() {
        let server = TestServer::new(app()).unwrap();
        // return_url arrives via cookie only; the default submitted map
        // (query+body) does not contain it, so the gate has nothing to
        // check and the handler runs without it.
        let response = server
            .post("/articles/delete?id=1")
            .add_header(COOKIE, HeaderValue::from_static("return_url=/evil"))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["provided"].get("return_url").is_none());
    }

    #[tokio::test]
    async fn test_query_precedence_over_body_for_ajax() {
        let server = TestServer::new(app()).unwrap();
        // ajax is present in both sources with different values; the rule
        // list is query,body so the query value is authoritative and the
        // merged map (body wins) no longer matches it.
        let response = server
            .post("/articles/delete?id=1&ajax=0")
            .form(&[("ajax", "1")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_VALUE_MISMATCH");
        assert_eq!(body["details"]["param"], "ajax");
        assert_eq!(body["details"]["source"], "query");
    }

    #[tokio::test]
    async fn test_delete_body_source_supplies_param() {
        let server = TestServer::new(app()).unwrap();
        // id is allowed only from the DELETE body; the urlencoded body of a
        // DELETE request feeds that source and corroborates the query value
        // in the submitted map.
        let response = server
            .delete("/articles/purge?id=7")
            .form(&[("id", "7")])
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["provided"], json!({ "id": "7" }));
    }

    #[tokio::test]
    async fn test_query_cannot_supply_delete_body_param() {
        let server = TestServer::new(app()).unwrap();
        // Same request without a body: id is submitted (query) but absent
        // from the DELETE body source.
        let response = server.delete("/articles/purge?id=7").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_NOT_IN_ALLOWED_SOURCES");
        assert_eq!(body["details"]["param"], "id");
        assert_eq!(body["details"]["allowed_sources"], json!(["delete"]));
    }

    #[tokio::test]
    async fn test_delete_body_value_must_match_submitted() {
        let server = TestServer::new(app()).unwrap();
        let response = server
            .delete("/articles/purge?id=7")
            .form(&[("id", "8")])
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_VALUE_MISMATCH");
        assert_eq!(body["details"]["source"], "delete");
    }

    #[tokio::test]
    async fn test_unconfigured_action_is_not_gated() {
        let server = TestServer::new(app()).unwrap();
        let response = server.get("/articles/list?anything=goes").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "reached");
    }
}

// =============================================================================
// Host extensions
// =============================================================================

mod host_extensions {
    use super::*;
    use axum::extract::Request;
    use axum::middleware::Next;
    use axum::response::Response;

    /// Simulates host session middleware: exposes the session dictionary
    /// and names the action explicitly.
    async fn install_session(mut req: Request, next: Next) -> Response {
        req.extensions_mut().insert(SourceOverlay {
            session: [("user_id".to_string(), json!(7))].into_iter().collect(),
            ..Default::default()
        });
        req.extensions_mut().insert(ActionId("profile".to_string()));
        next.run(req).await
    }

    fn session_app() -> Router {
        Router::new()
            .route("/me", get(echo_provided))
            .layer(middleware::from_fn_with_state(
                GateState::new(filter()),
                enforce,
            ))
            // Outer layer runs first and seeds the extensions.
            .layer(middleware::from_fn(install_session))
    }

    #[tokio::test]
    async fn test_session_overlay_feeds_provider() {
        let server = TestServer::new(session_app()).unwrap();
        let response = server.get("/me").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["provided"]["user_id"], json!(7));
    }

    #[tokio::test]
    async fn test_action_id_extension_overrides_path_segment() {
        // Path segment is "me" but the extension names the action
        // "profile", whose rules are applied (user_id provided from the
        // session, nothing denied).
        let server = TestServer::new(session_app()).unwrap();
        let response = server.get("/me?user_id=9999").await;
        // user_id is session-only; the merged map contains the query value
        // which the session does not corroborate.
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_VALUE_MISMATCH");
        assert_eq!(body["details"]["source"], "session");
    }

    /// Host that performs its own (unsafe) merge including cookies.
    async fn merge_with_cookies(mut req: Request, next: Next) -> Response {
        let cookies = param_gate::web::extract::parse_cookies(req.headers());
        let mut merged: ParamMap = ParamMap::new();
        if let Some(query) = req.uri().query() {
            merged.extend(param_gate::web::extract::parse_urlencoded(query));
        }
        merged.extend(cookies);
        req.extensions_mut().insert(SubmittedParams(merged));
        next.run(req).await
    }

    #[tokio::test]
    async fn test_submitted_params_override_catches_cookie_smuggling() {
        let app = Router::new()
            .route("/articles/delete", post(echo_provided))
            .layer(middleware::from_fn_with_state(
                GateState::new(filter()),
                enforce,
            ))
            .layer(middleware::from_fn(merge_with_cookies));
        let server = TestServer::new(app).unwrap();

        // The host's merge lets the cookie override id; the gate catches
        // the disagreement with the query source.
        let response = server
            .post("/articles/delete?id=1")
            .add_header(COOKIE, HeaderValue::from_static("id=2"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["code"], "PARAM_VALUE_MISMATCH");
        assert_eq!(body["details"]["param"], "id");
    }
}

// =============================================================================
// Provider mode off
// =============================================================================

mod provider_mode {
    use super::*;

    #[tokio::test]
    async fn test_gate_without_provider_still_validates() {
        let filter = GateConfig::from_yaml_str(
            r#"
actions:
  delete:
    id: query
"#,
        )
        .unwrap()
        .into_filter()
        .unwrap();
        assert!(!filter.provides_params());

        let app = Router::new()
            .route("/articles/delete", post(plain))
            .layer(middleware::from_fn_with_state(
                GateState::new(filter),
                enforce,
            ));
        let server = TestServer::new(app).unwrap();

        let ok = server.post("/articles/delete?id=1").await;
        ok.assert_status_ok();

        let denied = server.post("/articles/delete").form(&[("id", "1")]).await;
        denied.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_provided_extractor_without_provider_mode_is_500() {
        let filter = GateConfig::from_yaml_str("actions: {}")
            .unwrap()
            .into_filter()
            .unwrap();
        let app = Router::new()
            .route("/anything", get(echo_provided))
            .layer(middleware::from_fn_with_state(
                GateState::new(filter),
                enforce,
            ));
        let server = TestServer::new(app).unwrap();
        let response = server.get("/anything").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }
}
