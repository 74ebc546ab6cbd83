//! Application configuration with builder pattern and environment support.
//!
//! Values resolve in order: explicit builder calls (CLI flags), environment
//! variables, the AgentCore manifest, then compiled-in defaults. Every
//! problem is reported from [`AppConfigBuilder::build`] so startup fails
//! before any request is served.

pub mod manifest;
mod target;

pub use manifest::{DEFAULT_MANIFEST, Manifest};
pub use target::{DEFAULT_QUALIFIER, RuntimeTarget, arn_region, derive_arn};

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::agent::ToolRegistry;
use crate::embedding::{DEFAULT_MODEL, default_embedder_name};
use crate::error::ConfigError;
use crate::tools::{DEFAULT_DETAILED_K, DEFAULT_REFORMULATE_K, DEFAULT_SEARCH_K, SearchSettings};

/// Default FAQ corpus.
pub const DEFAULT_FAQ_PATH: &str = "data/nuts_shop_faq.csv";
/// Default chat model.
pub const DEFAULT_MODEL_ID: &str = "openai/gpt-oss-20b";
/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default maximum tool-calling round trips per invocation.
const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;
/// Default completion token limit.
const DEFAULT_MAX_TOKENS: u32 = 1024;
/// System prompt override looked up under the config dir.
const DEFAULT_PROMPT_FILE: &str = "faq-agent/system_prompt.md";

static REGION_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-gov)?-[a-z]+-\d+$").ok());

/// Checks an AWS region identifier such as `us-east-1`.
pub fn validate_region(region: &str) -> Result<(), ConfigError> {
    match REGION_RE.as_ref() {
        Some(re) if re.is_match(region) => Ok(()),
        _ => Err(ConfigError::InvalidRegion {
            region: region.to_string(),
        }),
    }
}

/// Chat model vendor. Both speak the OpenAI wire protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// Groq (default).
    #[default]
    Groq,
    /// OpenAI or any compatible API.
    OpenAi,
}

impl ProviderKind {
    /// Config name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Groq => "groq",
            Self::OpenAi => "openai",
        }
    }

    /// Vendor-specific API key variable.
    pub const fn api_key_var(self) -> &'static str {
        match self {
            Self::Groq => "GROQ_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Base URL used when none is configured.
    pub const fn default_base_url(self) -> Option<&'static str> {
        match self {
            Self::Groq => Some(GROQ_BASE_URL),
            Self::OpenAi => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "groq" => Ok(Self::Groq),
            "openai" => Ok(Self::OpenAi),
            other => Err(ConfigError::UnsupportedProvider {
                name: other.to_string(),
            }),
        }
    }
}

/// Chat model settings.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Vendor.
    pub provider: ProviderKind,
    /// API key. Only required by the local runtime.
    pub api_key: Option<String>,
    /// API base URL.
    pub base_url: Option<String>,
    /// Model id.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Completion token limit.
    pub max_tokens: u32,
    /// Tool loop limit.
    pub max_tool_iterations: usize,
}

impl ModelConfig {
    /// The API key, or [`ConfigError::ApiKeyMissing`].
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::ApiKeyMissing {
                provider: self.provider.as_str().to_string(),
            })
    }
}

/// Identifiers of a deployed AgentCore runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentConfig {
    /// AWS region.
    pub region: Option<String>,
    /// AWS account id.
    pub account: Option<String>,
    /// Runtime id.
    pub agent_id: Option<String>,
    /// Qualifier (alias).
    pub alias: Option<String>,
    /// Full runtime ARN.
    pub agent_arn: Option<String>,
    /// Bearer token for remote invocation.
    pub bearer_token: Option<String>,
    /// Explicit runtime base URL.
    pub endpoint: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Chat model.
    pub model: ModelConfig,
    /// Remote runtime identifiers.
    pub deployment: DeploymentConfig,
    /// FAQ corpus CSV.
    pub faq_path: PathBuf,
    /// Embedder name (`hash` or `fastembed`).
    pub embedder: String,
    /// Embedding model for `fastembed`.
    pub embedding_model: String,
    /// Search result counts.
    pub search: SearchSettings,
    /// Enabled tools.
    pub tools: ToolRegistry,
    /// System prompt override file, if one was found.
    pub prompt_path: Option<PathBuf>,
}

impl AppConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Configuration from the environment and the default manifest.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().from_env()?.discover_manifest()?.build()
    }

    /// Decides where invocations go.
    ///
    /// 1. an explicit endpoint;
    /// 2. an ARN, given or derived from region, account and agent id;
    /// 3. an agent id without enough to build an ARN is an error;
    /// 4. otherwise the local runtime, which needs an API key.
    pub fn runtime_target(&self) -> Result<RuntimeTarget, ConfigError> {
        let d = &self.deployment;

        if let Some(endpoint) = &d.endpoint {
            return RuntimeTarget::from_endpoint(endpoint, d.bearer_token.clone());
        }

        let arn = d.agent_arn.clone().or_else(|| {
            match (&d.region, &d.account, &d.agent_id) {
                (Some(region), Some(account), Some(id)) => Some(derive_arn(region, account, id)),
                _ => None,
            }
        });

        if let Some(arn) = arn {
            let region = d
                .region
                .clone()
                .or_else(|| arn_region(&arn).map(str::to_string))
                .ok_or_else(|| ConfigError::IncompleteRemoteTarget {
                    message: format!("cannot determine the region for {arn}"),
                })?;
            validate_region(&region)?;
            let qualifier = d.alias.as_deref().unwrap_or(DEFAULT_QUALIFIER);
            return RuntimeTarget::from_arn(&arn, &region, qualifier, d.bearer_token.clone());
        }

        if let Some(id) = &d.agent_id {
            let mut missing = Vec::new();
            if d.region.is_none() {
                missing.push("AWS_REGION");
            }
            if d.account.is_none() {
                missing.push("AWS_ACCOUNT_ID");
            }
            return Err(ConfigError::IncompleteRemoteTarget {
                message: format!(
                    "agent id '{id}' is set but {} missing (or set BEDROCK_AGENT_ARN)",
                    missing.join(" and ")
                ),
            });
        }

        self.model.require_api_key()?;
        Ok(RuntimeTarget::Local)
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    provider: Option<String>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    max_tool_iterations: Option<usize>,
    deployment: DeploymentConfig,
    faq_path: Option<PathBuf>,
    embedder: Option<String>,
    embedding_model: Option<String>,
    search_k: Option<usize>,
    detailed_k: Option<usize>,
    reformulate_k: Option<usize>,
    tools: Option<Vec<String>>,
    prompt_path: Option<PathBuf>,
    manifest_path: Option<PathBuf>,
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("'{v}': {e}"),
            })
        })
        .transpose()
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

impl AppConfigBuilder {
    /// Populates unset fields from process environment variables.
    pub fn from_env(self) -> Result<Self, ConfigError> {
        self.from_lookup(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
    }

    /// Populates unset fields from `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        fill(&mut self.provider, lookup("FAQ_AGENT_PROVIDER"));
        let provider: ProviderKind = self.provider.as_deref().map_or(Ok(ProviderKind::Groq), str::parse)?;

        fill(
            &mut self.api_key,
            lookup("FAQ_AGENT_API_KEY").or_else(|| lookup(provider.api_key_var())),
        );
        fill(
            &mut self.base_url,
            lookup("FAQ_AGENT_BASE_URL").or_else(|| match provider {
                ProviderKind::OpenAi => lookup("OPENAI_BASE_URL"),
                ProviderKind::Groq => None,
            }),
        );
        fill(&mut self.model, lookup("FAQ_AGENT_MODEL"));
        fill(
            &mut self.max_tool_iterations,
            parse_var("FAQ_AGENT_MAX_TOOL_ITERATIONS", lookup("FAQ_AGENT_MAX_TOOL_ITERATIONS"))?,
        );

        let d = &mut self.deployment;
        fill(&mut d.region, lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")));
        fill(&mut d.account, lookup("AWS_ACCOUNT_ID"));
        fill(&mut d.agent_id, lookup("BEDROCK_AGENT_ID"));
        fill(&mut d.alias, lookup("BEDROCK_AGENT_ALIAS_ID"));
        fill(&mut d.agent_arn, lookup("BEDROCK_AGENT_ARN"));
        fill(&mut d.bearer_token, lookup("AGENTCORE_BEARER_TOKEN"));
        fill(&mut d.endpoint, lookup("FAQ_AGENT_ENDPOINT"));

        fill(&mut self.faq_path, lookup("FAQ_AGENT_FAQ_PATH").map(PathBuf::from));
        fill(&mut self.embedder, lookup("FAQ_AGENT_EMBEDDER"));
        fill(&mut self.embedding_model, lookup("FAQ_AGENT_EMBEDDING_MODEL"));
        fill(&mut self.search_k, parse_var("FAQ_AGENT_SEARCH_K", lookup("FAQ_AGENT_SEARCH_K"))?);
        fill(&mut self.detailed_k, parse_var("FAQ_AGENT_DETAILED_K", lookup("FAQ_AGENT_DETAILED_K"))?);
        fill(
            &mut self.reformulate_k,
            parse_var("FAQ_AGENT_REFORMULATE_K", lookup("FAQ_AGENT_REFORMULATE_K"))?,
        );
        fill(
            &mut self.tools,
            lookup("FAQ_AGENT_TOOLS").map(|v| v.split(',').map(|s| s.trim().to_string()).collect()),
        );
        fill(&mut self.prompt_path, lookup("FAQ_AGENT_PROMPT_PATH").map(PathBuf::from));
        fill(&mut self.manifest_path, lookup("FAQ_AGENT_MANIFEST").map(PathBuf::from));

        Ok(self)
    }

    /// Fills unset deployment fields from the manifest's selected agent.
    #[must_use]
    pub fn manifest(mut self, manifest: Option<&Manifest>) -> Self {
        if let Some(agent) = manifest.and_then(Manifest::selected_agent) {
            let d = &mut self.deployment;
            fill(&mut d.region, agent.aws.region.clone());
            fill(&mut d.account, agent.aws.account.clone());
            fill(&mut d.agent_id, agent.bedrock_agentcore.agent_id.clone());
            fill(&mut d.agent_arn, agent.bedrock_agentcore.agent_arn.clone());
        }
        self
    }

    /// Reads the manifest at the configured path (or the default one) and
    /// applies it.
    ///
    /// A missing default manifest is not an error.
    pub fn discover_manifest(self) -> Result<Self, ConfigError> {
        let manifest = Manifest::discover(self.manifest_path.as_deref())?;
        Ok(self.manifest(manifest.as_ref()))
    }

    /// Sets the model provider.
    #[must_use]
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the model id.
    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn temperature(mut self, t: f32) -> Self {
        self.temperature = Some(t);
        self
    }

    /// Sets the completion token limit.
    #[must_use]
    pub const fn max_tokens(mut self, n: u32) -> Self {
        self.max_tokens = Some(n);
        self
    }

    /// Sets the tool loop limit.
    #[must_use]
    pub const fn max_tool_iterations(mut self, n: usize) -> Self {
        self.max_tool_iterations = Some(n);
        self
    }

    /// Sets an explicit runtime endpoint.
    #[must_use]
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.deployment.endpoint = Some(url.into());
        self
    }

    /// Sets the AWS region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.deployment.region = Some(region.into());
        self
    }

    /// Sets the deployed agent id.
    #[must_use]
    pub fn agent_id(mut self, id: impl Into<String>) -> Self {
        self.deployment.agent_id = Some(id.into());
        self
    }

    /// Sets the corpus path.
    #[must_use]
    pub fn faq_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.faq_path = Some(path.into());
        self
    }

    /// Sets the embedder name.
    #[must_use]
    pub fn embedder(mut self, name: impl Into<String>) -> Self {
        self.embedder = Some(name.into());
        self
    }

    /// Sets the `search_faq` result count.
    #[must_use]
    pub const fn search_k(mut self, k: usize) -> Self {
        self.search_k = Some(k);
        self
    }

    /// Enables only the named tools.
    #[must_use]
    pub fn tools<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.tools = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the system prompt override file.
    #[must_use]
    pub fn prompt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.prompt_path = Some(path.into());
        self
    }

    /// Sets the manifest path.
    #[must_use]
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Builds and validates the [`AppConfig`].
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let provider: ProviderKind = self.provider.as_deref().map_or(Ok(ProviderKind::Groq), str::parse)?;

        if let Some(region) = &self.deployment.region {
            validate_region(region)?;
        }

        let positive = |key: &str, value: Option<usize>, default: usize| match value {
            Some(0) => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "must be at least 1".to_string(),
            }),
            Some(n) => Ok(n),
            None => Ok(default),
        };

        let search = SearchSettings {
            search_k: positive("FAQ_AGENT_SEARCH_K", self.search_k, DEFAULT_SEARCH_K)?,
            detailed_k: positive("FAQ_AGENT_DETAILED_K", self.detailed_k, DEFAULT_DETAILED_K)?,
            reformulate_k: positive("FAQ_AGENT_REFORMULATE_K", self.reformulate_k, DEFAULT_REFORMULATE_K)?,
            ..SearchSettings::default()
        };

        let tools = match &self.tools {
            Some(names) => ToolRegistry::from_names(names)?,
            None => ToolRegistry::all(),
        };
        if tools.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "FAQ_AGENT_TOOLS".to_string(),
                message: "at least one tool must be enabled".to_string(),
            });
        }

        let prompt_path = self.prompt_path.or_else(|| {
            dirs::config_dir()
                .map(|d| d.join(DEFAULT_PROMPT_FILE))
                .filter(|p| p.is_file())
        });

        Ok(AppConfig {
            model: ModelConfig {
                provider,
                api_key: self.api_key,
                base_url: self
                    .base_url
                    .or_else(|| provider.default_base_url().map(str::to_string)),
                model: self.model.unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                temperature: self.temperature.unwrap_or(0.0),
                max_tokens: self.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
                max_tool_iterations: positive(
                    "FAQ_AGENT_MAX_TOOL_ITERATIONS",
                    self.max_tool_iterations,
                    DEFAULT_MAX_TOOL_ITERATIONS,
                )?,
            },
            deployment: self.deployment,
            faq_path: self.faq_path.unwrap_or_else(|| PathBuf::from(DEFAULT_FAQ_PATH)),
            embedder: self
                .embedder
                .unwrap_or_else(|| default_embedder_name().to_string()),
            embedding_model: self
                .embedding_model
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            search,
            tools,
            prompt_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn build(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        AppConfig::builder()
            .prompt_path("/nonexistent/prompt.md")
            .from_lookup(lookup(vars))?
            .build()
    }

    #[test]
    fn test_defaults() {
        let config = build(&[]).unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.model.provider, ProviderKind::Groq);
        assert_eq!(config.model.model, DEFAULT_MODEL_ID);
        assert_eq!(config.model.base_url.as_deref(), Some(GROQ_BASE_URL));
        assert_eq!(config.model.max_tool_iterations, 10);
        assert_eq!(config.search, SearchSettings::default());
        assert_eq!(config.tools.len(), 3);
        assert_eq!(config.faq_path, PathBuf::from(DEFAULT_FAQ_PATH));
    }

    #[test]
    fn test_explicit_beats_env() {
        let config = AppConfig::builder()
            .model("llama-3.1-8b-instant")
            .from_lookup(lookup(&[("FAQ_AGENT_MODEL", "other"), ("GROQ_API_KEY", "gsk")]))
            .and_then(AppConfigBuilder::build)
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.model.model, "llama-3.1-8b-instant");
        assert_eq!(config.model.api_key.as_deref(), Some("gsk"));
    }

    #[test]
    fn test_openai_provider_keys() {
        let config = build(&[
            ("FAQ_AGENT_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "sk-test"),
            ("GROQ_API_KEY", "gsk-ignored"),
        ])
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.model.api_key.as_deref(), Some("sk-test"));
        assert!(config.model.base_url.is_none());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(build(&[("AWS_REGION", "Mars")]), Err(ConfigError::InvalidRegion { .. })));
        assert!(matches!(
            build(&[("FAQ_AGENT_SEARCH_K", "three")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            build(&[("FAQ_AGENT_DETAILED_K", "0")]),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            build(&[("FAQ_AGENT_TOOLS", "search_faq,web_search")]),
            Err(ConfigError::UnknownTool { .. })
        ));
        assert!(matches!(
            build(&[("FAQ_AGENT_PROVIDER", "bedrock")]),
            Err(ConfigError::UnsupportedProvider { .. })
        ));
    }

    #[test]
    fn test_region_validation() {
        for ok in ["us-east-1", "eu-central-2", "us-gov-west-1", "ap-southeast-4"] {
            assert!(validate_region(ok).is_ok(), "{ok}");
        }
        for bad in ["", "us-east", "US-EAST-1", "useast1", "us-east-1a"] {
            assert!(validate_region(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_target_local_requires_api_key() {
        let config = build(&[]).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(matches!(config.runtime_target(), Err(ConfigError::ApiKeyMissing { .. })));

        let config = build(&[("GROQ_API_KEY", "gsk")]).unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.runtime_target().ok(), Some(RuntimeTarget::Local));
    }

    #[test]
    fn test_target_endpoint_wins() {
        let config = build(&[
            ("FAQ_AGENT_ENDPOINT", "http://127.0.0.1:8080"),
            ("BEDROCK_AGENT_ID", "faq_agent-AbC123"),
        ])
        .unwrap_or_else(|e| unreachable!("{e}"));
        let target = config.runtime_target();
        assert!(matches!(target, Ok(RuntimeTarget::Remote { ref url, .. }) if url.path() == "/invocations"));
    }

    #[test]
    fn test_target_derived_arn() {
        let config = build(&[
            ("AWS_REGION", "us-west-2"),
            ("AWS_ACCOUNT_ID", "123456789012"),
            ("BEDROCK_AGENT_ID", "faq_agent-AbC123"),
            ("BEDROCK_AGENT_ALIAS_ID", "live"),
            ("AGENTCORE_BEARER_TOKEN", "tok"),
        ])
        .unwrap_or_else(|e| unreachable!("{e}"));
        let Ok(RuntimeTarget::Remote { url, bearer_token }) = config.runtime_target() else {
            unreachable!("expected remote target");
        };
        assert_eq!(url.host_str(), Some("bedrock-agentcore.us-west-2.amazonaws.com"));
        assert_eq!(url.query(), Some("qualifier=live"));
        assert_eq!(bearer_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_target_incomplete_and_missing_token() {
        let config = build(&[("BEDROCK_AGENT_ID", "faq_agent-AbC123")]).unwrap_or_else(|e| unreachable!("{e}"));
        assert!(matches!(
            config.runtime_target(),
            Err(ConfigError::IncompleteRemoteTarget { .. })
        ));

        let config = build(&[(
            "BEDROCK_AGENT_ARN",
            "arn:aws:bedrock-agentcore:us-east-1:123456789012:runtime/faq_agent-AbC123",
        )])
        .unwrap_or_else(|e| unreachable!("{e}"));
        assert!(matches!(
            config.runtime_target(),
            Err(ConfigError::MissingCredentials { .. })
        ));
    }

    #[test]
    fn test_manifest_fills_deployment() {
        let yaml = "agents:\n  faq:\n    aws:\n      region: eu-west-1\n      account: '210987654321'\n    bedrock_agentcore:\n      agent_id: faq-XyZ\n";
        let manifest = Manifest::parse(yaml, std::path::Path::new("m.yaml")).ok();
        let config = AppConfig::builder()
            .region("us-east-1")
            .manifest(manifest.as_ref())
            .build()
            .unwrap_or_else(|e| unreachable!("{e}"));
        assert_eq!(config.deployment.region.as_deref(), Some("us-east-1"));
        assert_eq!(config.deployment.account.as_deref(), Some("210987654321"));
        assert_eq!(config.deployment.agent_id.as_deref(), Some("faq-XyZ"));
    }
}
