use std::sync::Arc;

use common::http::ext::RequestGlobalExt;
use common::http::RouteError;
use hyper::http::header;
use hyper::Body;
use routerify::prelude::RequestExt as _;
use routerify::Middleware;

use crate::api::auth::{AuthData, AuthError};
use crate::api::error::ApiError;
use crate::api::jwt::{AuthJwtPayload, JwtState};
use crate::api::request_context::RequestContext;
use crate::global::GlobalState;

/// Checks the Authorization header, and if it carries a valid token, adds
/// the authenticated caller to the request context. A missing header does
/// not fail the request; handlers that need an actor reject anonymous
/// callers themselves.
pub fn auth_middleware(_: &Arc<GlobalState>) -> Middleware<Body, RouteError<ApiError>> {
    Middleware::pre(|req| async move {
        let context = RequestContext::default();
        req.set_context(context.clone());

        let Some(token) = req.headers().get(header::AUTHORIZATION) else {
            return Ok(req);
        };

        let global = req.get_global::<GlobalState>()?;

        let token = token
            .to_str()
            .map_err(|_| AuthError::HeaderToStr)?
            .strip_prefix("Bearer ")
            .ok_or(AuthError::NotBearerToken)?;

        let jwt =
            AuthJwtPayload::verify(&global.config.jwt, token).ok_or(AuthError::InvalidToken)?;

        let data = AuthData::from_jwt(&global, &jwt).await?;

        tracing::debug!(account = %data.username, "authenticated request");

        context.set_auth(data).await;

        Ok(req)
    })
}
