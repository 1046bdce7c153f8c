use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::auth::gate::AdminGate;
use crate::config::StoreKind;
use crate::db::connection::{init_db, Database};
use crate::repo::memory::MemoryListings;
use crate::repo::{ListingRepository, SqliteListings};
use crate::router::{handle, App};

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod repo;
mod responses;
mod router;

#[cfg(test)]
mod tests;

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = config::AppConfig::load();

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        log::error!("Database initialization failed: {e}");
        std::process::exit(1);
    }

    let repo: Arc<dyn ListingRepository> = match config.store {
        StoreKind::Sqlite => {
            match db.with_conn(|conn| db::listings::seed_demo_listings(conn)) {
                Ok(0) => {}
                Ok(n) => log::info!("Seeded {n} demo listings"),
                Err(e) => {
                    log::error!("Seeding demo listings failed: {e}");
                    std::process::exit(1);
                }
            }
            Arc::new(SqliteListings::new(db.clone()))
        }
        StoreKind::Memory => Arc::new(MemoryListings::seeded(db::listings::demo_listings())),
    };

    let addr: SocketAddr = match config.addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            log::error!("Invalid listen address {:?}: {e}", config.addr);
            std::process::exit(1);
        }
    };

    let app = App {
        db,
        repo,
        gate: AdminGate::new(config.admin.clone()),
        config,
    };

    log::info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        log::error!("Server ended with error: {e}");
    }

    log::info!("Server shut down cleanly.");
}
