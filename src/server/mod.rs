mod handlers;
mod stream;

pub use stream::offer_ticks;

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;

use crate::api::{DynAPI, API};
use crate::config::Config;
use crate::error::{server_error, Error};
use crate::server::handlers::{health, offers, providers};

pub fn router(api: DynAPI, config: Config) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/providers", get(providers::list))
        .route("/offers", get(offers::search).post(offers::create))
        .route("/offers/stream", get(offers::stream))
        .layer(Extension(api))
        .layer(Extension(config))
        .layer(CorsLayer::permissive())
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, config: Config) -> Result<(), Error> {
    let api = Arc::new(api) as DynAPI;
    let addr = config.addr();

    let app = router(api, config);

    tracing::info!("listening on {}", addr);

    axum::Server::try_bind(&addr)
        .map_err(server_error)?
        .serve(app.into_make_service())
        .await
        .map_err(server_error)
}
