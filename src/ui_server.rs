//! Local HTTP server for the form page.
//!
//! The desktop window loads the page from here while developing; bundled
//! builds embed the same files and need no server.

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::error::Error;

const INDEX_HTML: &str = include_str!("../gui/ui/index.html");
const MAIN_JS: &str = include_str!("../gui/ui/main.js");
const STYLE_CSS: &str = include_str!("../gui/ui/style.css");

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/main.js", get(script))
        .route("/style.css", get(style))
}

async fn index() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], INDEX_HTML)
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/javascript; charset=utf-8")], MAIN_JS)
}

async fn style() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLE_CSS)
}

/// Binds the configured host and port.
pub async fn bind(config: &Config) -> Result<TcpListener, Error> {
    TcpListener::bind((config.host.as_str(), config.port))
        .await
        .map_err(|source| Error::Bind {
            addr: format!("{}:{}", config.host, config.port),
            source,
        })
}

/// Serves the page until the listener fails.
pub async fn serve(listener: TcpListener) -> Result<(), Error> {
    info!("serving UI on http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await?;
    Ok(())
}
