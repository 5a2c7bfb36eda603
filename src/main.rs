use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudmigration::config::{self, Config};
use cloudmigration::gcom::{GcomClient, GcomService};
use cloudmigration::models::migration::MigrateDatasourcesRequest;
use cloudmigration::service::{provide_service, CloudMigrationService};
use cloudmigration::store::{MigrationStore, PgStore};
use cloudmigration::{api, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    // Export spans over OTLP only when an endpoint is configured.
    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "cloudmigration"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)
            .context("failed to install OpenTelemetry tracer")?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    let json_logs = std::env::var("CLOUDMIGRATION_LOG_FORMAT").is_ok_and(|f| f == "json");

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "cloudmigration=debug,tower_http=debug".into()),
        ))
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .with(telemetry_layer)
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::Token) => {
            let (service, _) = wire(&cfg)?;
            let resp = service.create_access_token().await?;
            println!("{}", resp.token);
            Ok(())
        }
        Some(cli::Commands::Migrate {
            to_pdc,
            credentials,
        }) => {
            let (service, _) = wire(&cfg)?;
            let resp = service
                .migrate_datasources(MigrateDatasourcesRequest {
                    migrate_to_pdc: to_pdc,
                    migrate_credentials: credentials,
                })
                .await?;
            println!("Datasources migrated: {}", resp.datasources_migrated);
            Ok(())
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Lets the feature gate pick the service. The store and GCOM client are
/// only built for an enabled instance; the store comes back for migrations.
/// Nothing here touches the network.
fn wire(cfg: &Config) -> anyhow::Result<(Arc<dyn CloudMigrationService>, Option<PgStore>)> {
    let mut pg_store = None;
    let service = provide_service(cfg, prometheus::default_registry(), || {
        let store = PgStore::connect_lazy(&cfg.database_url)?;
        let gcom = GcomClient::new(
            cfg.cloud_migration.gcom_api_url.clone(),
            cfg.cloud_migration.gcom_api_token.clone(),
        )?;
        pg_store = Some(store.clone());
        Ok((
            Arc::new(store) as Arc<dyn MigrationStore>,
            Arc::new(gcom) as Arc<dyn GcomService>,
        ))
    })?;
    Ok((service, pg_store))
}

async fn run_server(cfg: Config, port: u16) -> anyhow::Result<()> {
    let (service, store) = wire(&cfg)?;

    if let Some(store) = &store {
        tracing::info!("Running migrations...");
        store.migrate().await?;
    }

    let state = Arc::new(AppState {
        service,
        admin_key: cfg.admin_key.clone(),
    });

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("cloud migration service listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
