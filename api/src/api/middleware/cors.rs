use std::sync::Arc;

use common::http::RouteError;
use hyper::header::{self, HeaderValue};
use hyper::Body;
use routerify::Middleware;

use crate::api::error::ApiError;
use crate::global::GlobalState;

pub fn cors_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::post(|mut res| async move {
        let headers = res.headers_mut();

        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PATCH, DELETE, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        );

        Ok(res)
    })
}
