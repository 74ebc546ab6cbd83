//! Hosted runtime client.
//!
//! POSTs `{"prompt": ...}` to the runtime's `/invocations` URL and expects
//! `{"result": ...}` back. The session id travels in [`SESSION_HEADER`].

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{error, info};
use url::Url;

use super::{AgentRuntime, InvocationRequest, InvocationResponse, SESSION_HEADER};
use crate::error::{AgentError, ConfigError};
use crate::logging::{InvocationTrace, Logger, RequestIds};

#[derive(Debug, Deserialize)]
struct RemoteBody {
    result: Option<serde_json::Value>,
}

/// Forwards invocations to a deployed runtime.
pub struct RemoteRuntime {
    client: reqwest::Client,
    url: Url,
    bearer_token: Option<String>,
    logger: Logger,
}

impl std::fmt::Debug for RemoteRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteRuntime")
            .field("url", &self.url.as_str())
            .field("authenticated", &self.bearer_token.is_some())
            .finish_non_exhaustive()
    }
}

impl RemoteRuntime {
    /// Creates a client for `url`. No request timeout is set; a slow turn
    /// waits for the runtime.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] when the HTTP client cannot be built.
    pub fn new(url: Url, bearer_token: Option<String>, logger: Logger) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "http client".to_string(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            url,
            bearer_token,
            logger,
        })
    }

    /// Invocation URL.
    pub const fn url(&self) -> &Url {
        &self.url
    }

    async fn post(&self, ids: &RequestIds, prompt: &str) -> Result<(String, Option<String>), AgentError> {
        let mut builder = self
            .client
            .post(self.url.clone())
            .header(SESSION_HEADER, &ids.session_id)
            .json(&serde_json::json!({ "prompt": prompt }));
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| AgentError::Transport {
            message: format!("{}: {e}", self.url),
        })?;

        let status = response.status();
        let echoed = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(|e| AgentError::Transport {
            message: e.to_string(),
        })?;

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(AgentError::Auth {
                message: format!("HTTP {}: {}", status.as_u16(), snippet(&text)),
            });
        }
        if !status.is_success() {
            return Err(AgentError::ApiRequest {
                message: snippet(&text).to_string(),
                status: Some(status.as_u16()),
            });
        }

        let body: RemoteBody = serde_json::from_str(&text).map_err(|e| AgentError::ResponseParse {
            message: e.to_string(),
        })?;
        let result = match body.result {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => {
                return Err(AgentError::ResponseParse {
                    message: "response has no 'result' field".to_string(),
                });
            }
            Some(other) => other.to_string(),
        };
        Ok((result, echoed))
    }
}

/// First 200 chars of an error body.
fn snippet(text: &str) -> &str {
    text.char_indices().nth(200).map_or(text, |(i, _)| &text[..i])
}

#[async_trait]
impl AgentRuntime for RemoteRuntime {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse, AgentError> {
        let ids = RequestIds::new(request.session_id.as_deref());

        let call = async {
            info!(url = %self.url, "invoking remote runtime");
            let outcome = self.post(&ids, &request.prompt).await;
            if let Err(e) = &outcome {
                error!(error = %e, "remote invocation failed");
            }
            outcome
        };
        let (result, echoed) = self.logger.scope(&ids, call).await?;

        self.logger.record_trace(&InvocationTrace {
            ids: &ids,
            query: &request.prompt,
            tool_calls: Vec::new(),
            response: &result,
        });

        Ok(InvocationResponse {
            result,
            session_id: echoed.unwrap_or(ids.session_id),
            request_id: ids.request_id,
            tool_calls: Vec::new(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    use axum::Router;
    use axum::http::HeaderMap;
    use axum::routing::post;
    use reqwest::header::AUTHORIZATION;
    use tokio::net::TcpListener;

    async fn spawn(router: Router) -> Url {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        let addr = listener.local_addr().unwrap_or_else(|e| panic!("{e}"));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        Url::parse(&format!("http://{addr}/invocations")).unwrap_or_else(|e| panic!("{e}"))
    }

    fn client(url: Url, token: Option<&str>) -> RemoteRuntime {
        RemoteRuntime::new(url, token.map(str::to_string), Logger::disabled())
            .unwrap_or_else(|e| panic!("{e}"))
    }

    #[tokio::test]
    async fn test_sends_prompt_session_and_token() {
        let router = Router::new().route(
            "/invocations",
            post(|headers: HeaderMap, body: axum::Json<serde_json::Value>| async move {
                let session = headers
                    .get(SESSION_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let auth = headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                axum::Json(serde_json::json!({
                    "result": format!("{}|{}|{}", body["prompt"].as_str().unwrap_or_default(), session, auth)
                }))
            }),
        );
        let rt = client(spawn(router).await, Some("tok"));

        let response = rt
            .invoke(InvocationRequest::new("almonds?", Some("sess-1".to_string())))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(response.result, "almonds?|sess-1|Bearer tok");
        assert_eq!(response.session_id, "sess-1");
        assert!(response.tool_calls.is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_is_auth_error() {
        let router = Router::new().route(
            "/invocations",
            post(|| async { (axum::http::StatusCode::FORBIDDEN, "denied") }),
        );
        let rt = client(spawn(router).await, None);
        let err = rt.invoke(InvocationRequest::new("hi", None)).await;
        assert!(matches!(err, Err(AgentError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let router = Router::new().route(
            "/invocations",
            post(|| async { (axum::http::StatusCode::BAD_GATEWAY, "upstream down") }),
        );
        let rt = client(spawn(router).await, None);
        match rt.invoke(InvocationRequest::new("hi", None)).await {
            Err(AgentError::ApiRequest { status, message }) => {
                assert_eq!(status, Some(502));
                assert_eq!(message, "upstream down");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_result_is_parse_error() {
        let router = Router::new().route(
            "/invocations",
            post(|| async { axum::Json(serde_json::json!({ "answer": "x" })) }),
        );
        let rt = client(spawn(router).await, None);
        let err = rt.invoke(InvocationRequest::new("hi", None)).await;
        assert!(matches!(err, Err(AgentError::ResponseParse { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        let addr = listener.local_addr().unwrap_or_else(|e| panic!("{e}"));
        drop(listener);

        let url = Url::parse(&format!("http://{addr}/invocations")).unwrap_or_else(|e| panic!("{e}"));
        let err = client(url, None).invoke(InvocationRequest::new("hi", None)).await;
        assert!(matches!(err, Err(AgentError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_slow_turn_is_awaited() {
        let router = Router::new().route(
            "/invocations",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_millis(1500)).await;
                axum::Json(serde_json::json!({ "result": "took a while" }))
            }),
        );
        let rt = client(spawn(router).await, None);
        let response = rt
            .invoke(InvocationRequest::new("hi", None))
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(response.result, "took a while");
    }

    #[test]
    fn test_snippet_is_char_safe() {
        let long = "é".repeat(300);
        assert_eq!(snippet(&long).chars().count(), 200);
        assert_eq!(snippet("short"), "short");
    }
}
