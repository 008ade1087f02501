use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use sqlx::postgres::{PgConnectOptions, PgSslMode};

use crate::domain::{ListCatalog, ListId, MailingList, ProviderId, ProviderIdentity};
use crate::integration::IntegrationOptions;
use crate::providers::{AweberClient, NewsletterProvider, StaticListProvider};

#[derive(Deserialize, Clone)]
pub struct Configuration {
    pub application: ApplicationSettings,
    pub store: StoreSettings,
    #[serde(default)]
    pub providers: Vec<ProviderSettings>,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub host_token: Secret<String>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreSettings {
    Memory,
    Postgres { database: DatabaseConfigs },
}

#[derive(Deserialize, Clone, Debug)]
pub struct DatabaseConfigs {
    pub username: String,
    pub password: Secret<String>,
    pub port: u16,
    pub host: String,
    pub database_name: String,
    #[serde(default)]
    pub require_ssl: bool,
}

impl DatabaseConfigs {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .database(&self.database_name)
            .ssl_mode(ssl_mode)
    }
}

/// One marketing provider to integrate with, tagged by `kind`.
#[derive(Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderSettings {
    Aweber {
        id: String,
        label: String,
        #[serde(default)]
        options: IntegrationOptions,
        aweber: AweberSettings,
    },
    Static {
        id: String,
        label: String,
        #[serde(default)]
        options: IntegrationOptions,
        #[serde(default)]
        lists: Vec<StaticListSettings>,
    },
}

#[derive(Deserialize, Clone)]
pub struct AweberSettings {
    #[serde(default = "default_aweber_base_url")]
    pub base_url: String,
    pub account_id: String,
    pub access_token: Secret<String>,
    #[serde(default = "default_timeout_milliseconds")]
    pub timeout_milliseconds: u64,
    #[serde(default = "default_true")]
    pub show_checkout_signup: bool,
}

#[derive(Deserialize, Clone)]
pub struct StaticListSettings {
    pub id: String,
    pub name: String,
}

fn default_aweber_base_url() -> String {
    "https://api.aweber.com/1.0/".to_string()
}

fn default_timeout_milliseconds() -> u64 {
    10_000
}

fn default_true() -> bool {
    true
}

impl ProviderSettings {
    pub fn options(&self) -> &IntegrationOptions {
        match self {
            ProviderSettings::Aweber { options, .. } | ProviderSettings::Static { options, .. } => {
                options
            }
        }
    }

    fn identity(&self) -> Result<ProviderIdentity, anyhow::Error> {
        let (id, label) = match self {
            ProviderSettings::Aweber { id, label, .. }
            | ProviderSettings::Static { id, label, .. } => (id, label),
        };
        let id = ProviderId::parse(id.clone()).map_err(anyhow::Error::msg)?;
        Ok(ProviderIdentity::new(id, label.clone()))
    }

    fn default_list_id(&self) -> Result<Option<ListId>, anyhow::Error> {
        self.options()
            .default_list_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .map(ListId::parse)
            .transpose()
            .map_err(anyhow::Error::msg)
    }

    /// Builds the configured provider adapter.
    pub fn provider(&self) -> Result<Arc<dyn NewsletterProvider>, anyhow::Error> {
        let identity = self.identity()?;
        let provider: Arc<dyn NewsletterProvider> = match self {
            ProviderSettings::Aweber { aweber, .. } => {
                let base_url = url::Url::parse(&aweber.base_url)
                    .with_context(|| format!("Invalid AWeber base url for `{}`", identity.id()))?;
                let client = AweberClient::new(
                    identity,
                    base_url,
                    aweber.account_id.clone(),
                    aweber.access_token.clone(),
                    self.default_list_id()?,
                    aweber.show_checkout_signup,
                    Duration::from_millis(aweber.timeout_milliseconds),
                )
                .context("Failed to build the AWeber client")?;
                Arc::new(client)
            }
            ProviderSettings::Static { lists, .. } => {
                let lists = lists
                    .iter()
                    .map(|list| -> Result<MailingList, anyhow::Error> {
                        Ok(MailingList {
                            list_id: ListId::parse(list.id.clone()).map_err(anyhow::Error::msg)?,
                            list_name: list.name.clone(),
                        })
                    })
                    .collect::<Result<ListCatalog, anyhow::Error>>()?;
                Arc::new(StaticListProvider::new(identity, lists))
            }
        };
        Ok(provider)
    }
}

#[derive(Debug)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

pub fn get_config() -> Result<Configuration, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let configs = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // e.g. `APP_APPLICATION__PORT=5001` sets `application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    configs.try_deserialize::<Configuration>()
}
