use std::sync::Arc;

use common::http::ext::{RequestGlobalExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::api::ext;
use crate::global::GlobalState;
use crate::service::identity;

async fn signup(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;

    let request: identity::SignupRequest = ext::json_body(req).await?;

    identity::signup(global.db.as_ref(), request)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::CREATED,
        json!({
            "message": "signup success",
            "data": null
        })
    ))
}

async fn login(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;

    let request: identity::LoginRequest = ext::json_body(req).await?;

    let token = identity::login(global.db.as_ref(), &global.config.jwt, request)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "login success",
            "data": {
                "token": token
            }
        })
    ))
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .post("/signup", signup)
        .post("/login", login)
        .build()
        .expect("failed to build auth router")
}
