//! HTTP repository service over a local store.
//!
//! Serves the same directory the installer writes into, so a store can act
//! as the remote repository for other machines:
//!
//! | Method | Path | Action |
//! |---|---|---|
//! | `GET` | `/` | HTML listing |
//! | `GET` | `/packages` | JSON array of stored names |
//! | `POST` | `/packages` | upload one archive (`file` field) |
//! | `GET` | `/packages/{name}` | download a stored archive |
//! | `DELETE` | `/packages/{name}` | remove a stored name |
//! | `POST` | `/compile` | bundle archives (`files` field) into `compiled_package.tar.gz` |
//!
//! Failures are returned as `{"error": "..."}` with a 4xx or 5xx status.

mod error;
mod filename;
mod routes;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::manager::{LocalStore, TarCodec};

pub use error::{ApiError, INVALID_FORMAT_MESSAGE};
pub use filename::secure_filename;
pub use routes::COMPILED_PACKAGE;

/// Largest accepted request body (256 MiB).
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Shared state of the request handlers.
#[derive(Clone)]
pub struct AppState {
    store: Arc<LocalStore>,
    codec: TarCodec,
}

/// Build the service router over a store.
pub fn router(store: Arc<LocalStore>) -> Router {
    let state = AppState {
        store,
        codec: TarCodec::new(),
    };

    Router::new()
        .route("/", get(routes::index))
        .route(
            "/packages",
            get(routes::list_packages).post(routes::upload_package),
        )
        .route(
            "/packages/:name",
            get(routes::download_package).delete(routes::delete_package),
        )
        .route("/compile", axum::routing::post(routes::compile_package))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Serve the repository on an already bound listener until the task is dropped.
pub async fn serve(listener: TcpListener, store: Arc<LocalStore>) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(address = %addr, store = %store.root().display(), "Repository service listening");
    }
    axum::serve(listener, router(store)).await
}

/// Bind `addr` and serve the repository.
pub async fn run(addr: SocketAddr, store: Arc<LocalStore>) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, store).await
}
