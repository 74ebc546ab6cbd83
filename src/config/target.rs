//! Where invocations are sent.

use url::Url;

use crate::error::ConfigError;

/// Qualifier used when no alias is configured.
pub const DEFAULT_QUALIFIER: &str = "DEFAULT";

/// Resolved agent runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeTarget {
    /// Run the agent loop in-process.
    Local,
    /// POST to a hosted runtime.
    Remote {
        /// Full invocation URL.
        url: Url,
        /// Bearer token, if any.
        bearer_token: Option<String>,
    },
}

impl RuntimeTarget {
    /// `{endpoint}/invocations` for an explicit runtime base URL.
    pub fn from_endpoint(endpoint: &str, bearer_token: Option<String>) -> Result<Self, ConfigError> {
        let base = endpoint.trim().trim_end_matches('/');
        let url = Url::parse(&format!("{base}/invocations")).map_err(|e| ConfigError::InvalidValue {
            key: "FAQ_AGENT_ENDPOINT".to_string(),
            message: format!("'{endpoint}': {e}"),
        })?;
        Ok(Self::Remote { url, bearer_token })
    }

    /// The regional AgentCore data-plane URL for `arn`.
    pub fn from_arn(
        arn: &str,
        region: &str,
        qualifier: &str,
        bearer_token: Option<String>,
    ) -> Result<Self, ConfigError> {
        let Some(token) = bearer_token else {
            return Err(ConfigError::MissingCredentials {
                what: "AGENTCORE_BEARER_TOKEN is required to invoke a deployed AgentCore runtime"
                    .to_string(),
            });
        };

        let encoded: String = url::form_urlencoded::byte_serialize(arn.as_bytes()).collect();
        let raw = format!(
            "https://bedrock-agentcore.{region}.amazonaws.com/runtimes/{encoded}/invocations"
        );
        let mut url = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
            key: "BEDROCK_AGENT_ARN".to_string(),
            message: e.to_string(),
        })?;
        url.query_pairs_mut().append_pair("qualifier", qualifier);

        Ok(Self::Remote {
            url,
            bearer_token: Some(token),
        })
    }

    /// Whether the agent runs in-process.
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

/// `arn:aws:bedrock-agentcore:{region}:{account}:runtime/{agent_id}`.
pub fn derive_arn(region: &str, account: &str, agent_id: &str) -> String {
    format!("arn:aws:bedrock-agentcore:{region}:{account}:runtime/{agent_id}")
}

/// Region component of an ARN, if well-formed.
pub fn arn_region(arn: &str) -> Option<&str> {
    let mut parts = arn.split(':');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("arn"), Some(_), Some(_), Some(region)) if !region.is_empty() => Some(region),
        _ => None,
    }
}
