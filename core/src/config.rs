//! Client configuration.
//!
//! `Config` is a plain value the caller builds once (by hand or from JSON)
//! and hands to `Client::new`. Nothing here reads the process environment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// `v` parameter this version of the SDK is written against.
pub const DEFAULT_V_PARAM: &str = "20211028";

/// Account id that selects the account owning the API key.
pub const DEFAULT_ACCOUNT_ID: &str = "me";

/// The Yext environment hosting the account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    #[default]
    #[serde(rename = "PROD")]
    Prod,
    #[serde(rename = "SANDBOX")]
    Sandbox,
}

impl Environment {
    pub fn host(self) -> &'static str {
        match self {
            Environment::Prod => "api.yext.com",
            Environment::Sandbox => "api-sandbox.yext.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Prod => "PROD",
            Environment::Sandbox => "SANDBOX",
        }
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROD" => Ok(Environment::Prod),
            "SANDBOX" => Ok(Environment::Sandbox),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings shared by every call made through one `Client`.
///
/// Empty strings in the optional fields count as unset.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API key from the Yext Developer Console.
    pub api_key: String,

    /// Environment of the account; `PROD` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<Environment>,

    /// Account path segment; `me` when unset. Only partners usually need it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,

    /// Value for the `v` query parameter; `DEFAULT_V_PARAM` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_param: Option<String>,

    /// Host used instead of the environment's host. Internal use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_override: Option<String>,
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    pub fn with_env(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn with_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn with_v_param(mut self, v_param: impl Into<String>) -> Self {
        self.v_param = Some(v_param.into());
        self
    }

    pub fn with_host_override(mut self, host: impl Into<String>) -> Self {
        self.host_override = Some(host.into());
        self
    }

    /// Network host: the override when set, otherwise the environment's host.
    pub fn host(&self) -> &str {
        match non_empty(&self.host_override) {
            Some(host) => host,
            None => self.env.unwrap_or_default().host(),
        }
    }

    pub fn account_id(&self) -> &str {
        non_empty(&self.account_id).unwrap_or(DEFAULT_ACCOUNT_ID)
    }

    pub fn v_param(&self) -> &str {
        non_empty(&self.v_param).unwrap_or(DEFAULT_V_PARAM)
    }

    /// `https://{host}/v2/accounts/{accountId}/`. Not parsed here; a host
    /// that does not form a valid URL fails when a request is built.
    pub fn base_url(&self) -> String {
        format!("https://{}/v2/accounts/{}/", self.host(), self.account_id())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("env", &self.env)
            .field("account_id", &self.account_id)
            .field("v_param", &self.v_param)
            .field("host_override", &self.host_override)
            .finish()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
