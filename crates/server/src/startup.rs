use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{clients::ClientStore, tasks::TaskStore};

use crate::routes;

fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the backup-mock bind address from configs or env vars, with
/// sensible fallbacks.
fn load_networker_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.networker;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("NETWORKER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("NETWORKER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8001);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Load the ticketing-mock bind address from configs or env vars.
fn load_snow_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.snow;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SNOW_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SNOW_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8002);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

async fn serve(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Public entry: build the backup-management mock and run it.
pub async fn run_networker() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let store = ClientStore::with_seed_data();
    let app = routes::build_networker_router(store, build_cors());

    let addr = load_networker_addr()?;
    info!(%addr, "starting networker mock");
    serve(app, addr).await
}

/// Public entry: build the ticketing mock and run it.
pub async fn run_snow() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let store = TaskStore::with_seed_data();
    let app = routes::build_snow_router(store, build_cors());

    let addr = load_snow_addr()?;
    info!(%addr, "starting snow mock");
    serve(app, addr).await
}
