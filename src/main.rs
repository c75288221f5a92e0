use crate::auth::{MagicLinkConfig, MagicLinkService};
use crate::config::{AppConfig, DealBackend};
use crate::db::{init_db, Database, DealStore, JsonFileDealStore, SqliteDealStore};
use crate::domain::commission::CommissionCalculator;
use crate::router::{handle, App};
use astra::Server;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,crest_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // Sessions and magic links always live in SQLite, whichever deal store is picked.
    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    let deals: Box<dyn DealStore> = match config.deal_backend {
        DealBackend::Sqlite => Box::new(SqliteDealStore::new(db.clone())),
        DealBackend::JsonFile => Box::new(JsonFileDealStore::new(&config.json_store_path)),
    };

    let app = App {
        db,
        deals,
        calc: CommissionCalculator::new(config.brokerage_fee_rate),
        magic: MagicLinkService::new(MagicLinkConfig::default()),
        secure_cookies: config.secure_cookies,
        utc_offset: config.utc_offset,
    };

    tracing::info!(
        addr = %config.bind_addr,
        workers = config.workers,
        backend = ?config.deal_backend,
        fee_rate = config.brokerage_fee_rate,
        utc_offset = %config.utc_offset,
        "starting server"
    );

    let server = Server::bind(&config.bind_addr).max_workers(config.workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => responses::error_response(&err),
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down");
}
