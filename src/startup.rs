use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::middleware::from_fn;
use actix_web::{App, HttpServer, web};
use anyhow::Context;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_actix_web::TracingLogger;

use crate::authentication::{HostToken, reject_unknown_hosts};
use crate::configuration::{Configuration, DatabaseConfigs, StoreSettings};
use crate::integration::{IntegrationRegistry, NewsletterIntegration};
use crate::repository::{InMemoryStore, MetadataStore, PostgresStore};
use crate::routes::{admin_routes, health_check, integration_routes};

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(config: Configuration) -> Result<Self, anyhow::Error> {
        let store = build_store(&config.store).await?;
        let registry = build_registry(&config, store.clone())?;
        tracing::info!(
            providers = registry.len(),
            "Newsletter integrations configured"
        );

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(address)
            .with_context(|| "Failed to bind TCP listener for application")?;
        let port = listener
            .local_addr()
            .with_context(|| "Failed to read local address of TCP listener")?
            .port();

        let server = run(
            listener,
            store,
            registry,
            HostToken(config.application.host_token),
        )
        .context("Failed to run Actix web server")?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), anyhow::Error> {
        self.server.await.context("Server stopped with an error")
    }
}

pub fn get_connection_pool(config: &DatabaseConfigs) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(config.connect_options())
}

async fn build_store(settings: &StoreSettings) -> Result<Arc<dyn MetadataStore>, anyhow::Error> {
    let store: Arc<dyn MetadataStore> = match settings {
        StoreSettings::Memory => Arc::new(InMemoryStore::new()),
        StoreSettings::Postgres { database } => {
            let store = PostgresStore::new(get_connection_pool(database));
            store.migrate().await?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// One integration per configured provider, sharing the host store.
pub fn build_registry(
    config: &Configuration,
    store: Arc<dyn MetadataStore>,
) -> Result<IntegrationRegistry, anyhow::Error> {
    let integrations = config
        .providers
        .iter()
        .map(|settings| -> Result<NewsletterIntegration, anyhow::Error> {
            Ok(NewsletterIntegration::new(
                settings.provider()?,
                store.clone(),
                settings.options().clone(),
            ))
        })
        .collect::<Result<Vec<_>, anyhow::Error>>()?;

    IntegrationRegistry::new(integrations)
}

fn run(
    tcp_listener: TcpListener,
    store: Arc<dyn MetadataStore>,
    registry: IntegrationRegistry,
    host_token: HostToken,
) -> Result<Server, anyhow::Error> {
    let store: web::Data<dyn MetadataStore> = web::Data::from(store);
    let registry = web::Data::new(registry);
    let host_token = web::Data::new(host_token);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .configure(configure_routes)
            .app_data(store.clone())
            .app_data(registry.clone())
            .app_data(host_token.clone())
    })
    .listen(tcp_listener)
    .with_context(|| "Failed to bind Actix server to TCP listener")?
    .run();

    Ok(server)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health_check", web::get().to(health_check))
        .service(
            web::scope("/v1")
                .wrap(from_fn(reject_unknown_hosts))
                .configure(integration_routes)
                .configure(admin_routes),
        );
}
