mod http;

pub use http::EDITOR_CAPABILITIES;

use std::sync::OnceLock;

use newsletter_bridge::configuration::{
    AweberSettings, DatabaseConfigs, ProviderSettings, StaticListSettings, StoreSettings,
    get_config,
};
use newsletter_bridge::integration::IntegrationOptions;
use newsletter_bridge::startup::Application;
use newsletter_bridge::telemetry;
use secrecy::Secret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use uuid::Uuid;
use wiremock::MockServer;

pub const HOST_TOKEN: &str = "test-host-token";
pub const AWEBER_ACCOUNT: &str = "1024";
pub const AWEBER_DEFAULT_LIST: &str = "9001";

pub struct TestApp {
    pub address: String,
    pub aweber_server: MockServer,
    pub api_client: reqwest::Client,
}

// Ensure that the `tracing` stack is only initialised once using `OnceLock`
static TRACING: OnceLock<()> = OnceLock::new();

pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        // Set TEST_LOG to see the logs of a test run
        if std::env::var("TEST_LOG").is_ok() {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
            telemetry::init_subscriber(subscriber);
        } else {
            let subscriber =
                telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            telemetry::init_subscriber(subscriber);
        };
    });
}

/// Starts the service on a random port with two providers: `aweber`, backed by a
/// mock AWeber API, and `house`, a static list provider.
pub async fn spawn_app() -> TestApp {
    spawn_app_with_store(StoreSettings::Memory).await
}

pub async fn spawn_app_with_store(store: StoreSettings) -> TestApp {
    init_tracing();

    let aweber_server = MockServer::start().await;

    let configuration = {
        let mut c = get_config().expect("Failed to read configuration.");
        c.application.port = 0;
        c.application.host_token = Secret::new(HOST_TOKEN.to_string());
        c.store = store;
        c.providers = vec![
            ProviderSettings::Aweber {
                id: "aweber".to_string(),
                label: "AWeber".to_string(),
                options: IntegrationOptions {
                    default_list_id: Some(AWEBER_DEFAULT_LIST.to_string()),
                    ..Default::default()
                },
                aweber: AweberSettings {
                    base_url: format!("{}/1.0/", aweber_server.uri()),
                    account_id: AWEBER_ACCOUNT.to_string(),
                    access_token: Secret::new("aweber-token".to_string()),
                    timeout_milliseconds: 1_000,
                    show_checkout_signup: true,
                },
            },
            ProviderSettings::Static {
                id: "house".to_string(),
                label: "House list".to_string(),
                options: IntegrationOptions {
                    default_checkbox_checked: true,
                    checkout_label: Some("Join the house list".to_string()),
                    default_list_id: None,
                },
                lists: vec![
                    StaticListSettings {
                        id: "weekly".to_string(),
                        name: "Weekly digest".to_string(),
                    },
                    StaticListSettings {
                        id: "launches".to_string(),
                        name: "Product launches".to_string(),
                    },
                ],
            },
        ];
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let port = application.port();
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address: format!("http://127.0.0.1:{port}"),
        aweber_server,
        api_client: reqwest::Client::new(),
    }
}

/// Settings for a fresh, uniquely named database on the local Postgres.
pub fn database_settings() -> DatabaseConfigs {
    DatabaseConfigs {
        username: "postgres".to_string(),
        password: Secret::new("password".to_string()),
        port: 5432,
        host: "localhost".to_string(),
        database_name: Uuid::new_v4().to_string(),
        require_ssl: false,
    }
}

/// Creates the database named in `config` and runs the migrations on it.
pub async fn configure_database(config: &DatabaseConfigs) -> PgPool {
    let maintenance_settings = DatabaseConfigs {
        database_name: "postgres".to_string(),
        ..config.clone()
    };

    let mut connection = PgConnection::connect_with(&maintenance_settings.connect_options())
        .await
        .expect("Failed to connect to Postgres");

    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.database_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect_with(config.connect_options())
        .await
        .expect("Failed to connect to Postgres.");

    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}
