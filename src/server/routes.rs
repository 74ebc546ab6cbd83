use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::ServerState;
use crate::runtime::{InvocationRequest, SESSION_HEADER};

/// Error body for non-200 responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// What went wrong.
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct InvocationPayload {
    #[serde(default)]
    prompt: Option<String>,
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

pub(super) async fn invocations(
    State(state): State<ServerState>,
    headers: HeaderMap,
    payload: Result<Json<InvocationPayload>, JsonRejection>,
) -> Result<([(&'static str, String); 1], Json<serde_json::Value>), HandlerError> {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let prompt = match payload {
        Ok(Json(InvocationPayload { prompt: Some(p) })) if !p.trim().is_empty() => p,
        Ok(_) => {
            warn!("rejecting /invocations request without a prompt");
            return Err(reject(StatusCode::BAD_REQUEST, "prompt cannot be empty"));
        }
        Err(rejection) => {
            let message = rejection.body_text();
            warn!(error = %message, "rejecting malformed /invocations body");
            return Err(reject(StatusCode::BAD_REQUEST, message));
        }
    };

    match state.runtime.invoke(InvocationRequest::new(prompt, session_id)).await {
        Ok(response) => {
            let body = response.to_json();
            Ok(([(SESSION_HEADER, response.session_id)], Json(body)))
        }
        Err(e) => {
            error!(runtime = state.runtime.name(), error = %e, "invocation failed");
            Err(reject(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}

pub(super) async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Healthy" }))
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(super) mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::super::router;
    use super::*;
    use crate::error::AgentError;
    use crate::logging::{Logger, RequestIds, capture};
    use crate::runtime::{AgentRuntime, InvocationResponse};

    /// Echoes the prompt; fails on the prompt `fail`.
    struct EchoRuntime;

    #[async_trait]
    impl AgentRuntime for EchoRuntime {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, AgentError> {
            if request.prompt == "fail" {
                return Err(AgentError::Transport {
                    message: "connection refused".to_string(),
                });
            }
            let ids = RequestIds::new(request.session_id.as_deref());
            Ok(InvocationResponse {
                result: format!("echo: {}", request.prompt),
                session_id: ids.session_id,
                request_id: ids.request_id,
                tool_calls: Vec::new(),
            })
        }
    }

    pub(in crate::server) fn echo_runtime() -> Arc<dyn AgentRuntime> {
        Arc::new(EchoRuntime)
    }

    fn app() -> axum::Router {
        router(ServerState::new(echo_runtime(), Logger::disabled()))
    }

    fn post(body: &str, session: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/invocations")
            .header("content-type", "application/json");
        if let Some(s) = session {
            builder = builder.header(SESSION_HEADER, s);
        }
        builder
            .body(Body::from(body.to_string()))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("{e}"))
    }

    #[tokio::test]
    async fn test_invocation_returns_result_and_session() {
        let response = app()
            .oneshot(post(r#"{"prompt":"do you sell almonds?"}"#, Some("sess-7")))
            .await
            .unwrap_or_else(|e| panic!("{e}"));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(SESSION_HEADER).and_then(|v| v.to_str().ok()),
            Some("sess-7")
        );
        let body = json_body(response).await;
        assert_eq!(body, serde_json::json!({ "result": "echo: do you sell almonds?" }));
    }

    #[tokio::test]
    async fn test_session_generated_when_absent() {
        let response = app()
            .oneshot(post(r#"{"prompt":"hi"}"#, None))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        let session = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert_eq!(session.len(), 36);
    }

    #[tokio::test]
    async fn test_missing_prompt_is_bad_request() {
        for body in [r"{}", r#"{"prompt":"   "}"#, "not json"] {
            let response = app()
                .oneshot(post(body, None))
                .await
                .unwrap_or_else(|e| panic!("{e}"));
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
            assert!(json_body(response).await["error"].is_string());
        }
    }

    #[tokio::test]
    async fn test_runtime_failure_is_bad_gateway() {
        let response = app()
            .oneshot(post(r#"{"prompt":"fail"}"#, None))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert_eq!(body["error"], "transport failure: connection refused");
    }

    #[tokio::test]
    async fn test_requests_traced_into_logger() {
        let (logger, buffer) = capture::logger();
        let app = router(ServerState::new(echo_runtime(), logger));

        let response = app
            .oneshot(post(r#"{"prompt":"fail"}"#, None))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let out = buffer.contents();
        assert!(out.contains("uri=/invocations"), "{out}");
        assert!(out.contains("finished processing request"), "{out}");
        assert!(out.contains("status=502"), "{out}");
        assert!(out.contains("invocation failed"), "{out}");
    }

    #[tokio::test]
    async fn test_ping() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap_or_else(|e| panic!("{e}")),
            )
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({ "status": "Healthy" }));
    }
}
