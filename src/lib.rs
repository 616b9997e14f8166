#[macro_use]
extern crate tracing;

pub mod config;
pub mod error;
mod extractors;
mod handlers;
pub mod mail;
pub mod media;
mod middlewares;
pub mod security;
pub mod seed;
mod state;
mod utils;

use crate::{middlewares::middlewares, utils::SignalHandler};
pub use config::*;
use error::{Error, Result};
use extractors::*;
pub use state::*;
use tokio::net::TcpListener;

pub async fn run<S: StateTrait>(listener: TcpListener, state: S) -> anyhow::Result<()> {
    info!("listening on port {}", listener.local_addr()?.port());

    let app = middlewares(state, handlers::routes::<S>());

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(SignalHandler::new())
        .await?;

    Ok(())
}
