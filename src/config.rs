//! Settings and credential resolution.
//!
//! Precedence, lowest to highest: built-in defaults, an optional `lingo.toml`
//! next to the working directory, environment variables for credentials, CLI
//! flags. Everything is validated before any I/O happens; a missing
//! credential or an unresolvable tag aborts the run up front.

use crate::error::SyncError;
use crate::remote::{DEFAULT_API_URL, DEFAULT_MAIN_TAG, DEFAULT_UPLOAD_THROTTLE_SECS};
use serde::{Deserialize, Serialize};
use std::process::Command;

pub const ENV_API_ID: &str = "POEDITOR_ID";
pub const ENV_API_TOKEN: &str = "POEDITOR_TOKEN";

/// Settings loadable from `lingo.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Service endpoint base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Fallback tag merged beneath the current tag
    #[serde(default = "default_main_tag")]
    pub main_tag: String,

    /// Seconds to wait between per-language uploads
    #[serde(default = "default_throttle_secs")]
    pub throttle_secs: u64,

    /// Project id (environment variable usually wins)
    #[serde(default)]
    pub api_id: Option<String>,

    /// API token (environment variable usually wins)
    #[serde(default)]
    pub api_token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_main_tag() -> String {
    DEFAULT_MAIN_TAG.to_string()
}

fn default_throttle_secs() -> u64 {
    DEFAULT_UPLOAD_THROTTLE_SECS
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            main_tag: default_main_tag(),
            throttle_secs: default_throttle_secs(),
            api_id: None,
            api_token: None,
        }
    }
}

/// Loads [`RemoteSettings`] from an optional `lingo.toml`.
pub struct SettingsLoader;

impl SettingsLoader {
    pub fn load() -> Result<RemoteSettings, SyncError> {
        Self::load_named("lingo")
    }

    fn load_named(name: &str) -> Result<RemoteSettings, SyncError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(name).required(false))
            .build()?;
        Ok(settings.try_deserialize().unwrap_or_default())
    }
}

/// API flags as given on the command line; all optional.
#[derive(Debug, Clone, Default)]
pub struct ApiOptions {
    pub api_token: Option<String>,
    pub api_id: Option<String>,
    pub api_url: Option<String>,
    pub tag: Option<String>,
    pub main_tag: Option<String>,
}

/// Fully resolved API context; every field is usable as-is.
#[derive(Debug, Clone)]
pub struct ResolvedApi {
    pub api_token: String,
    pub api_id: String,
    pub api_url: String,
    pub tag: String,
    pub main_tag: String,
}

/// Resolve API options against environment and settings. Fails fast on a
/// missing credential or a tag with no git fallback.
pub fn resolve_api(
    options: &ApiOptions,
    settings: &RemoteSettings,
) -> Result<ResolvedApi, SyncError> {
    let api_id = options
        .api_id
        .clone()
        .or_else(|| std::env::var(ENV_API_ID).ok())
        .or_else(|| settings.api_id.clone())
        .ok_or_else(|| {
            SyncError::Config(format!(
                "Set --api-id or the {ENV_API_ID} environment variable"
            ))
        })?;

    let api_token = options
        .api_token
        .clone()
        .or_else(|| std::env::var(ENV_API_TOKEN).ok())
        .or_else(|| settings.api_token.clone())
        .ok_or_else(|| {
            SyncError::Config(format!(
                "Set --api-token or the {ENV_API_TOKEN} environment variable"
            ))
        })?;

    let tag = match options.tag.clone().or_else(current_git_branch) {
        Some(tag) => tag,
        None => {
            return Err(SyncError::Config(
                "Set --tag or run from inside a git repository".to_string(),
            ))
        }
    };

    Ok(ResolvedApi {
        api_token,
        api_id,
        api_url: options
            .api_url
            .clone()
            .unwrap_or_else(|| settings.api_url.clone()),
        tag,
        main_tag: options
            .main_tag
            .clone()
            .unwrap_or_else(|| settings.main_tag.clone()),
    })
}

/// Current git branch name, if the working directory is a repository.
pub fn current_git_branch() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--abbrev-ref", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let branch = String::from_utf8(output.stdout).ok()?;
    let branch = branch.lines().next()?.trim();
    if branch.is_empty() {
        None
    } else {
        Some(branch.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_with_credentials() -> ApiOptions {
        ApiOptions {
            api_token: Some("token".to_string()),
            api_id: Some("42".to_string()),
            tag: Some("feature/x".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let settings = RemoteSettings::default();
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.main_tag, "master");
        assert_eq!(settings.throttle_secs, 30);
    }

    #[test]
    fn test_resolve_uses_flags_over_settings() {
        let settings = RemoteSettings::default();
        let mut options = options_with_credentials();
        options.api_url = Some("https://example.test/v2".to_string());
        options.main_tag = Some("main".to_string());
        let resolved = resolve_api(&options, &settings).unwrap();
        assert_eq!(resolved.api_url, "https://example.test/v2");
        assert_eq!(resolved.main_tag, "main");
        assert_eq!(resolved.tag, "feature/x");
    }

    #[test]
    fn test_resolve_falls_back_to_settings_credentials() {
        let settings = RemoteSettings {
            api_id: Some("99".to_string()),
            api_token: Some("settings-token".to_string()),
            ..Default::default()
        };
        let options = ApiOptions {
            tag: Some("master".to_string()),
            ..Default::default()
        };
        let resolved = resolve_api(&options, &settings).unwrap();
        assert_eq!(resolved.api_id, "99");
        assert_eq!(resolved.api_token, "settings-token");
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let settings = RemoteSettings {
            api_id: Some("99".to_string()),
            ..Default::default()
        };
        let options = ApiOptions {
            tag: Some("master".to_string()),
            ..Default::default()
        };
        // Only meaningful when the variable is not set in the environment.
        if std::env::var(ENV_API_TOKEN).is_err() {
            assert!(matches!(
                resolve_api(&options, &settings),
                Err(SyncError::Config(_))
            ));
        }
    }
}
