//! Command-line configuration for the `reactor-export` binary.
//!
//! Settings come from three places, highest precedence first: command-line
//! flags (and their environment variables), the JSON settings file, and
//! built-in defaults. The settings file is only ever read.

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use reactor_export::ExportOptions;
use reactor_source::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, ReactorConfig};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_SETTINGS_PATH: &str = "./.reactor-settings.json";

#[derive(Parser, Debug, Clone)]
#[command(name = "reactor-export")]
#[command(about = "Export a Reactor property to a local file tree")]
pub struct Args {
    /// Property to export
    #[arg(long, env = "REACTOR_PROPERTY_ID")]
    pub property_id: Option<String>,

    /// Reactor environment to talk to
    #[arg(long = "env", value_enum)]
    pub environment: Option<ReactorEnvironment>,

    /// Reactor API base URL, overriding --env
    #[arg(long)]
    pub reactor_url: Option<String>,

    /// Access token
    #[arg(long, env = "REACTOR_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// API key of the integration
    #[arg(long, env = "REACTOR_API_KEY")]
    pub api_key: Option<String>,

    /// IMS organization id
    #[arg(long, env = "REACTOR_ORG_ID")]
    pub org_id: Option<String>,

    /// Path to the JSON settings file
    #[arg(long, default_value = DEFAULT_SETTINGS_PATH)]
    pub settings_path: PathBuf,

    /// Directory to export into
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Entities requested per page (1-999)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE,
          value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64))]
    pub page_size: u32,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Known Reactor deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactorEnvironment {
    Production,
    Integration,
    Qe,
    Development,
}

impl ReactorEnvironment {
    /// API base URL of the deployment.
    pub fn reactor_url(self) -> &'static str {
        match self {
            ReactorEnvironment::Production => "https://reactor.adobe.io",
            ReactorEnvironment::Integration => "https://reactor-integration.adobe.io",
            ReactorEnvironment::Qe => "https://reactor-qe.adobe.io",
            ReactorEnvironment::Development => "https://reactor-dev.adobe.io",
        }
    }
}

impl fmt::Display for ReactorEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReactorEnvironment::Production => "production",
            ReactorEnvironment::Integration => "integration",
            ReactorEnvironment::Qe => "qe",
            ReactorEnvironment::Development => "development",
        };
        f.write_str(name)
    }
}

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsFile {
    pub property_id: Option<String>,
    pub environment: Option<EnvironmentSettings>,
    pub access_token: Option<String>,
    pub integration: Option<IntegrationSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EnvironmentSettings {
    pub name: Option<ReactorEnvironment>,
    pub reactor_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IntegrationSettings {
    /// Used as the API key.
    pub client_id: Option<String>,
    pub payload: Option<IntegrationPayload>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationPayload {
    /// Organization id of the integration.
    pub iss: Option<String>,
}

impl SettingsFile {
    /// Reads the settings file. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read settings file {}", path.display()));
            }
        };

        serde_json::from_str(&text)
            .with_context(|| format!("invalid settings file {}", path.display()))
    }

    fn reactor_url(&self) -> Option<String> {
        let environment = self.environment.as_ref()?;
        environment
            .reactor_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| environment.name.map(|name| name.reactor_url().to_string()))
    }

    fn api_key(&self) -> Option<String> {
        self.integration.as_ref()?.client_id.clone()
    }

    fn org_id(&self) -> Option<String> {
        self.integration.as_ref()?.payload.as_ref()?.iss.clone()
    }
}

/// Everything one export run needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub property_id: String,
    pub reactor: ReactorConfig,
    pub options: ExportOptions,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RunConfig {
    /// Merges flags over the settings file. Fails when the property id,
    /// access token or API key is missing from both.
    pub fn resolve(args: &Args, settings: &SettingsFile) -> Result<Self> {
        let Some(property_id) =
            non_blank(args.property_id.clone()).or_else(|| non_blank(settings.property_id.clone()))
        else {
            bail!("no property id: pass --property-id or set propertyId in the settings file");
        };

        let base_url = non_blank(args.reactor_url.clone())
            .or_else(|| args.environment.map(|env| env.reactor_url().to_string()))
            .or_else(|| settings.reactor_url())
            .unwrap_or_else(|| ReactorEnvironment::Production.reactor_url().to_string());

        let Some(access_token) = non_blank(args.access_token.clone())
            .or_else(|| non_blank(settings.access_token.clone()))
        else {
            bail!("no access token: pass --access-token or set accessToken in the settings file");
        };

        let Some(api_key) =
            non_blank(args.api_key.clone()).or_else(|| non_blank(settings.api_key()))
        else {
            bail!("no API key: pass --api-key or set integration.clientId in the settings file");
        };

        let org_id = non_blank(args.org_id.clone()).or_else(|| non_blank(settings.org_id()));

        Ok(Self {
            property_id: property_id.trim().to_string(),
            reactor: ReactorConfig {
                base_url,
                access_token,
                api_key,
                org_id,
                ..Default::default()
            },
            options: ExportOptions::new(&args.output).with_page_size(args.page_size),
        })
    }
}
