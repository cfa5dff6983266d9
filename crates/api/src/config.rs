//! Process configuration, read from the environment once at startup.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// One dev bearer token and the account it authenticates as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevToken {
    pub email: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// `CLAIMGATE_BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `CLAIMGATE_POLICY_FILE`; built-in policies when unset.
    pub policy_file: Option<PathBuf>,
    /// `CLAIMGATE_STRICT_POLICIES`; reject duplicate policy names.
    pub strict_policies: bool,
    /// `CLAIMGATE_DEV_TOKENS`, formatted `email=token,email=token`.
    pub dev_tokens: Vec<DevToken>,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ApiConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a closure over a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup("CLAIMGATE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e| ApiConfigError::Invalid {
            var: "CLAIMGATE_BIND_ADDR",
            reason: format!("'{bind_raw}': {e}"),
        })?;

        let policy_file = lookup("CLAIMGATE_POLICY_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let strict_policies = match lookup("CLAIMGATE_STRICT_POLICIES") {
            None => false,
            Some(v) => parse_bool(&v).ok_or_else(|| ApiConfigError::Invalid {
                var: "CLAIMGATE_STRICT_POLICIES",
                reason: format!("expected true/false, got '{v}'"),
            })?,
        };

        let dev_tokens = match lookup("CLAIMGATE_DEV_TOKENS") {
            Some(raw) => parse_dev_tokens(&raw)?,
            None => {
                tracing::warn!("CLAIMGATE_DEV_TOKENS not set; using insecure dev defaults");
                default_dev_tokens()
            }
        };

        Ok(Self {
            bind_addr,
            policy_file,
            strict_policies,
            dev_tokens,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_dev_tokens(raw: &str) -> Result<Vec<DevToken>, ApiConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (email, token) = entry
                .split_once('=')
                .map(|(e, t)| (e.trim(), t.trim()))
                .filter(|(e, t)| !e.is_empty() && !t.is_empty())
                .ok_or_else(|| ApiConfigError::Invalid {
                    var: "CLAIMGATE_DEV_TOKENS",
                    reason: format!("expected email=token, got '{entry}'"),
                })?;
            Ok(DevToken {
                email: email.to_string(),
                token: token.to_string(),
            })
        })
        .collect()
}

pub fn default_dev_tokens() -> Vec<DevToken> {
    vec![
        DevToken {
            email: "admin@localhost".to_string(),
            token: "dev-admin-token".to_string(),
        },
        DevToken {
            email: "employee@localhost".to_string(),
            token: "dev-employee-token".to_string(),
        },
    ]
}
