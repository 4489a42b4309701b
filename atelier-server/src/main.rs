use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use atelier_store::HttpStore;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

mod error;
mod extractors;
mod handlers;
mod locks;
#[cfg(test)]
mod tests;

pub use error::Error;
pub use extractors::{AppState, Auth, DynStore, MaybeAuth, PreAuth};
pub use locks::ToggleLocks;

#[derive(structopt::StructOpt)]
struct Opt {
    /// Address to listen on
    #[structopt(short, long, default_value = "127.0.0.1:3000")]
    bind: SocketAddr,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/project-feed/:project", get(handlers::project_feed))
        .route("/api/submit-comment", post(handlers::submit_comment))
        .route("/api/toggle-reaction", post(handlers::toggle_reaction))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let store_url = std::env::var("STORE_URL").context("STORE_URL must be set")?;
    let store_token = std::env::var("STORE_TOKEN").ok();

    let state = AppState {
        store: Arc::new(HttpStore::new(&store_url, store_token)),
        locks: ToggleLocks::new(),
    };

    let app = app(state);
    tracing::info!("listening on {}", opt.bind);
    axum::Server::bind(&opt.bind)
        .serve(app.into_make_service())
        .await
        .context("serving axum webserver")
}
