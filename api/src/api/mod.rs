use std::sync::Arc;

use common::http::RouteError;
use common::make_response;
use hyper::server::conn::AddrIncoming;
use hyper::{Body, Request, Response, Server, StatusCode};
use routerify::{Router, RouterService};
use serde_json::json;
use tokio::net::TcpSocket;

use self::error::{ApiError, Result};
use crate::global::GlobalState;

mod auth;
mod error;
mod ext;
pub mod jwt;
mod middleware;
mod request_context;
pub mod v1;

async fn preflight(_: Request<Body>) -> Result<Response<Body>> {
    Ok(hyper::Response::builder()
        .status(StatusCode::NO_CONTENT)
        .body(Body::empty())
        .expect("failed to build response"))
}

async fn not_found(_: Request<Body>) -> Result<Response<Body>> {
    Ok(make_response!(
        StatusCode::NOT_FOUND,
        json!({
            "type": "not_found",
            "error": "route not found"
        })
    ))
}

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    let weak = Arc::downgrade(global);
    Router::builder()
        .data(weak)
        // The CORS middleware adds the CORS headers to the response
        .middleware(middleware::cors::cors_middleware(global))
        // The auth middleware checks the Authorization header, and if it's
        // valid, it adds the caller to the request context. This way, we can
        // access the caller in the handlers; it does not fail the request if
        // the header is not present.
        .middleware(middleware::auth::auth_middleware(global))
        .options("/*", preflight)
        .scope("/v1", v1::routes(global))
        .any(not_found)
        .err_handler_with_info(common::http::error_handler::<ApiError>)
        .build()
        .expect("failed to build router")
}

pub async fn run(global: Arc<GlobalState>) -> anyhow::Result<()> {
    let config = &global.config.api;

    tracing::info!("listening on {}", config.bind_address);

    let socket = if config.bind_address.is_ipv6() {
        TcpSocket::new_v6()?
    } else {
        TcpSocket::new_v4()?
    };

    socket.set_reuseaddr(true)?;
    socket.set_reuseport(true)?;
    socket.bind(config.bind_address)?;
    let listener = socket.listen(1024)?;

    // The router only holds a Weak reference to the global state, so open
    // keep-alive connections cannot keep the state (and with it the
    // shutdown) alive forever.
    let service = RouterService::new(routes(&global))
        .map_err(|err| anyhow::anyhow!("failed to build router service: {err}"))?;

    let ctx = global.ctx.clone();

    Server::builder(AddrIncoming::from_listener(listener)?)
        .serve(service)
        .with_graceful_shutdown(async move {
            ctx.done().await;
        })
        .await?;

    Ok(())
}
