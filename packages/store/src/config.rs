//! # Client configuration — `app.toml`
//!
//! The frontend has no filesystem to read at runtime, so the configuration is
//! bundled into the binary from `src/app.toml` and parsed once on first use.
//!
//! ```toml
//! app_name = "AngularSpree"   # display name shown in page titles
//! # oauth_base = "https://login.example.com/oauth"  # external social login host
//! ```
//!
//! Missing keys fall back to [`AppConfig::default`], so an empty file is a
//! valid configuration. Social login is served outside this application; with
//! no `oauth_base` the buttons only record the attempt on the store.

use serde::{Deserialize, Serialize};

const BUNDLED: &str = include_str!("app.toml");

/// Application configuration read once by the UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Display name of the application.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Externally hosted social login entry point, provider is appended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oauth_base: Option<String>,
}

fn default_app_name() -> String {
    "AngularSpree".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            oauth_base: None,
        }
    }
}

impl AppConfig {
    /// Load the bundled configuration, falling back to defaults when it does
    /// not parse.
    pub fn load() -> Self {
        match Self::from_toml(BUNDLED) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Invalid bundled app.toml, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Builder method to set the display name.
    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Builder method to set the social login host.
    pub fn with_oauth_base(mut self, base: impl Into<String>) -> Self {
        self.oauth_base = Some(base.into());
        self
    }

    /// Entry point for a social login provider, if one is configured.
    pub fn oauth_url(&self, provider: &str) -> Option<String> {
        let base = self.oauth_base.as_deref()?.trim_end_matches('/');
        Some(format!("{}/{}", base, provider))
    }
}
