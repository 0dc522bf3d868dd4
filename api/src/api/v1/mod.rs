use std::sync::Arc;

use common::http::ext::{RequestGlobalExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::{Body, Request, Response, StatusCode};
use routerify::Router;
use serde_json::json;

use super::error::{ApiError, Result};
use super::ext;
use crate::global::GlobalState;
use crate::service::post_interaction;

pub mod auth;
pub mod health;
pub mod post;
pub mod user;

async fn delete_comment(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let comment_id = ext::param_ulid(&req, "comment_id")?;

    post_interaction::delete_comment(global.db.as_ref(), comment_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success delete comment",
            "data": null
        })
    ))
}

pub fn routes(global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .scope("/health", health::routes(global))
        .scope("/auth", auth::routes(global))
        .scope("/user", user::routes(global))
        .scope("/post", post::routes(global))
        .delete("/comment/:comment_id", delete_comment)
        .build()
        .expect("failed to build v1 router")
}
