use common::database::Ulid;
use common::http::ext::{OptionExt, ResultExt};
use common::http::RouteError;
use hyper::{Body, Request, StatusCode};
use routerify::prelude::RequestExt as _;
use serde::de::DeserializeOwned;

use super::auth::{AuthData, AuthError};
use super::error::ApiError;
use super::request_context::RequestContext;

pub trait RequestExt {
    fn request_context(&self) -> RequestContext;
}

impl RequestExt for Request<Body> {
    fn request_context(&self) -> RequestContext {
        self.context::<RequestContext>()
            .expect("missing request context")
    }
}

/// Returns the authenticated caller or fails the request with a 401.
pub async fn require_auth(req: &Request<Body>) -> Result<AuthData, RouteError<ApiError>> {
    req.request_context()
        .auth()
        .await
        .map_err_route(AuthError::NotLoggedIn)
}

pub fn param_ulid(req: &Request<Body>, name: &str) -> Result<Ulid, RouteError<ApiError>> {
    let raw = req
        .param(name)
        .map_err_route((StatusCode::BAD_REQUEST, "missing path parameter"))?;

    Ulid::from_string(raw).map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid id in path"))
}

pub fn param_string(req: &Request<Body>, name: &str) -> Result<String, RouteError<ApiError>> {
    Ok(req
        .param(name)
        .map_err_route((StatusCode::BAD_REQUEST, "missing path parameter"))?
        .clone())
}

pub async fn json_body<T: DeserializeOwned>(req: Request<Body>) -> Result<T, RouteError<ApiError>> {
    let body = hyper::body::to_bytes(req.into_body())
        .await
        .map_err_route((StatusCode::BAD_REQUEST, "failed to read request body"))?;

    serde_json::from_slice(&body)
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid request body"))
}
