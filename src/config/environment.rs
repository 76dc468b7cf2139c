//! API server configuration resolution.
//!
//! Each setting is resolved in the following order:
//! 1. Environment variable, if set
//! 2. String value from `~/.dnanexus_config/environment.json`
//! 3. Built-in default
//!
//! The process-wide configuration is resolved once, on first use, and never
//! re-read afterwards.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use log::{debug, warn};
use serde::Deserialize;

use crate::config::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_APISERVER_HOST, DEFAULT_APISERVER_PORT,
    DEFAULT_APISERVER_PROTOCOL, ENV_APISERVER_HOST, ENV_APISERVER_PORT, ENV_APISERVER_PROTOCOL,
    ENV_SECURITY_CONTEXT,
};
use crate::error_handling::RequestError;

static PROCESS_CONFIG: LazyLock<Arc<ApiServerConfig>> =
    LazyLock::new(|| Arc::new(ApiServerConfig::resolve()));

/// Credential pair used to build the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityContext {
    /// Token type, e.g. `Bearer`
    pub auth_token_type: String,
    /// The token itself
    pub auth_token: String,
}

impl SecurityContext {
    /// Parses a security context from its JSON representation.
    ///
    /// Returns `None` if the string is not a JSON object with non-empty string
    /// `auth_token_type` and `auth_token` fields. Authenticated requests made
    /// without a context fail later with an auth-specific error.
    pub fn parse(raw: &str) -> Option<Self> {
        match serde_json::from_str::<SecurityContext>(raw) {
            Ok(ctx) if !ctx.auth_token_type.is_empty() && !ctx.auth_token.is_empty() => Some(ctx),
            Ok(_) => {
                debug!("Security context has an empty token or token type, ignoring");
                None
            }
            Err(e) => {
                debug!("Security context could not be parsed ({e}), ignoring");
                None
            }
        }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.auth_token_type, self.auth_token)
    }
}

/// Location of the API server and the credentials used to talk to it.
///
/// Immutable once built. Use [`ApiServerConfig::global`] for the process-wide
/// instance, or [`ApiServerConfig::new`] to point a client somewhere explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiServerConfig {
    /// `http` or `https`
    pub protocol: String,
    /// API server hostname
    pub host: String,
    /// API server port
    pub port: String,
    /// Credentials, if any could be resolved
    pub security_context: Option<SecurityContext>,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_APISERVER_PROTOCOL,
            DEFAULT_APISERVER_HOST,
            DEFAULT_APISERVER_PORT,
        )
    }
}

impl ApiServerConfig {
    /// Creates a configuration with no security context.
    pub fn new(protocol: impl Into<String>, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            port: port.into(),
            security_context: None,
        }
    }

    /// Sets the security context.
    pub fn with_security_context(mut self, ctx: SecurityContext) -> Self {
        self.security_context = Some(ctx);
        self
    }

    /// Returns the process-wide configuration, resolving it on first call.
    ///
    /// Concurrent first calls are serialized by the lazy cell; every later
    /// call gets the same `Arc` without any locking.
    pub fn global() -> Arc<ApiServerConfig> {
        Arc::clone(&PROCESS_CONFIG)
    }

    /// Resolves the configuration from the process environment and the
    /// default config file in the user's home directory.
    pub fn resolve() -> Self {
        let config_file = default_config_path();
        Self::resolve_from(|name| std::env::var(name).ok(), config_file.as_deref())
    }

    /// Resolves the configuration from an arbitrary variable lookup and config file.
    ///
    /// # Arguments
    ///
    /// * `lookup` - Returns the value of an environment variable, if set
    /// * `config_file` - Path of the JSON config file; a missing or malformed
    ///   file contributes no values
    pub fn resolve_from<F>(lookup: F, config_file: Option<&Path>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_values = config_file.map(load_config_file).unwrap_or_default();

        let get = |name: &str, default: &str| -> String {
            lookup(name)
                .or_else(|| file_values.get(name).cloned())
                .unwrap_or_else(|| default.to_string())
        };

        let security_context = lookup(ENV_SECURITY_CONTEXT)
            .or_else(|| file_values.get(ENV_SECURITY_CONTEXT).cloned())
            .and_then(|raw| SecurityContext::parse(&raw));

        Self {
            protocol: get(ENV_APISERVER_PROTOCOL, DEFAULT_APISERVER_PROTOCOL),
            host: get(ENV_APISERVER_HOST, DEFAULT_APISERVER_HOST),
            port: get(ENV_APISERVER_PORT, DEFAULT_APISERVER_PORT),
            security_context,
        }
    }

    /// Base URL of the API server, `protocol://host:port`.
    ///
    /// # Errors
    ///
    /// Returns `RequestError::Configuration` if the protocol is neither `http` nor `https`.
    pub fn base_url(&self) -> Result<String, RequestError> {
        match self.protocol.as_str() {
            "http" | "https" => Ok(format!("{}://{}:{}", self.protocol, self.host, self.port)),
            other => Err(RequestError::Configuration(format!(
                "API server protocol should be either http or https, got '{other}'"
            ))),
        }
    }
}

/// Path of the user's config file, `$HOME/.dnanexus_config/environment.json`.
///
/// Returns `None` when `HOME` is unset or empty.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Reads the string-valued entries of a JSON config file.
///
/// A missing file is silently treated as empty. A file that exists but cannot
/// be read or parsed is logged as a warning and also treated as empty.
fn load_config_file(path: &Path) -> HashMap<String, String> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return HashMap::new(),
        Err(e) => {
            warn!("The file '{}' cannot be read ({e}), ignoring", path.display());
            return HashMap::new();
        }
    };

    match serde_json::from_str::<HashMap<String, serde_json::Value>>(&content) {
        Ok(values) => values
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect(),
        Err(e) => {
            warn!(
                "The contents of file '{}' cannot be parsed as a valid JSON object ({e}), ignoring",
                path.display()
            );
            HashMap::new()
        }
    }
}
