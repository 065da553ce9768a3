//! Browser front end for Homepanel.
//!
//! A local warp server renders the dashboard page and the fragments the
//! page polls to stay current.

pub mod context;
pub mod error;
pub mod handlers;
pub mod panels;
pub mod render;
pub mod routes;

use std::future::Future;

pub use context::AppContext;
pub use error::UiError;
pub use routes::routes;

/// Serve the dashboard until `shutdown` resolves.
pub async fn serve(
    ctx: AppContext,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), UiError> {
    let server = &ctx.config().server;
    let listen = format!("{}:{}", server.host, server.port);
    let addr = tokio::net::lookup_host((server.host.as_str(), server.port))
        .await?
        .next()
        .ok_or_else(|| UiError::Address(listen.clone()))?;

    let (bound, running) =
        warp::serve(routes(ctx.clone())).try_bind_with_graceful_shutdown(addr, shutdown)?;

    tracing::info!("Dashboard listening on http://{}", bound);
    running.await;
    tracing::info!("Dashboard stopped");
    Ok(())
}
