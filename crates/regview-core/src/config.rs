use std::path::Path;
#[cfg(feature = "network")]
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RegviewError, Result};

/// Path of the register listing on the register API.
pub const REGISTERS_PATH: &str = "/all_registers";

/// Base URL used when the page is loaded in the browser.
pub const CLIENT_BASE_URL: &str = "http://localhost:8081";

/// Base URL used when the page is rendered on the server.
pub const SERVER_BASE_URL: &str = "http://127.0.0.1:8081";

pub const ENV_BASE_URL: &str = "REGVIEW_BASE_URL";
pub const ENV_VERBOSE: &str = "REGVIEW_VERBOSE";

/// Where the loader runs. Only changes the default base URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderContext {
    Client,
    #[default]
    Server,
}

impl RenderContext {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Client => CLIENT_BASE_URL,
            Self::Server => SERVER_BASE_URL,
        }
    }
}

impl FromStr for RenderContext {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" | "browser" => Ok(Self::Client),
            "server" | "ssr" => Ok(Self::Server),
            other => Err(format!("unknown render context {other:?} (expected client or server)")),
        }
    }
}

impl std::fmt::Display for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Client => write!(f, "client"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Everything the loader needs to know: where the register API lives and
/// whether successful payloads are logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    pub base_url: String,
    #[serde(default)]
    pub verbose: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self::for_context(RenderContext::default())
    }
}

impl LoaderConfig {
    pub fn for_context(context: RenderContext) -> Self {
        Self {
            base_url: context.default_base_url().to_string(),
            verbose: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Full URL of the register listing. A trailing slash on the base is dropped
    /// so the path is never doubled.
    pub fn endpoint(&self) -> String {
        format!("{}{REGISTERS_PATH}", self.base_url.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
            _ => Err(RegviewError::BaseUrl(self.base_url.clone())),
        }
    }

    /// Layer overrides on top of this config. Unset fields keep their value.
    pub fn apply(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(ref url) = overrides.base_url {
            self.base_url = url.clone();
        }
        if let Some(verbose) = overrides.verbose {
            self.verbose = verbose;
        }
        self
    }
}

/// A partial [`LoaderConfig`], as found in a config file, the environment or
/// on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub base_url: Option<String>,
    pub verbose: Option<bool>,
}

impl ConfigOverrides {
    /// Parse a TOML config document. `origin` names it in errors.
    pub fn parse(toml_str: &str, origin: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| RegviewError::Config {
            path: origin.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RegviewError::Io(format!("failed to read {}: {e}", path.display())))?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Read `REGVIEW_BASE_URL` and `REGVIEW_VERBOSE` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup(ENV_BASE_URL)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let verbose = lookup(ENV_VERBOSE).and_then(|raw| {
            let parsed = parse_flag(&raw);
            if parsed.is_none() {
                tracing::warn!(value = %raw, "ignoring unrecognised {ENV_VERBOSE}");
            }
            parsed
        });
        Self { base_url, verbose }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// `<config dir>/regview/config.toml`, if the platform has a config directory.
#[cfg(feature = "network")]
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("regview").join("config.toml"))
}
