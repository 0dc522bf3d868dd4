use std::sync::Arc;

use common::database::Ulid;
use common::http::ext::{OptionExt, RequestGlobalExt, ResultExt};
use common::http::RouteError;
use common::make_response;
use hyper::http::header;
use hyper::{Body, Request, Response, StatusCode};
use multer::{Constraints, Multipart, SizeLimit};
use routerify::Router;
use serde_json::json;

use crate::api::error::{ApiError, Result};
use crate::api::ext;
use crate::global::GlobalState;
use crate::service::{feed, identity, social_graph};

#[derive(Debug, serde::Deserialize)]
struct FollowRequest {
    /// The account to (un)follow.
    user_id: Ulid,
}

async fn get_profile(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let profile = identity::get_profile(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user profile",
            "data": profile
        })
    ))
}

async fn update_profile(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .map_err_route((StatusCode::BAD_REQUEST, "missing content-type header"))?;
    let content_type = content_type
        .to_str()
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

    let boundary = multer::parse_boundary(content_type)
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid content-type header"))?;

    let constraints = Constraints::new()
        .allowed_fields(vec!["bio", "gender", "avatar"])
        .size_limit(
            SizeLimit::new()
                .for_field("bio", 30 * 1024)
                .for_field("gender", 64)
                .for_field("avatar", global.config.uploads.max_image_size as u64),
        );

    let mut multipart = Multipart::with_constraints(req.into_body(), boundary, constraints);

    let mut request = identity::UpdateProfileRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?
    {
        let name = field
            .name()
            .map(str::to_owned)
            .map_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;

        match name.as_str() {
            "bio" => {
                let bio = field
                    .text()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
                request.bio = Some(bio);
            }
            "gender" => {
                let gender = field
                    .text()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
                request.gender = Some(gender);
            }
            "avatar" => {
                let content_type = field
                    .content_type()
                    .map_err_route((
                        StatusCode::BAD_REQUEST,
                        "invalid multipart body, missing avatar content-type",
                    ))?
                    .to_string();

                let data = field
                    .bytes()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;

                request.avatar = Some((data, content_type));
            }
            _ => return Err((StatusCode::BAD_REQUEST, "invalid multipart body").into()),
        }
    }

    identity::update_profile(
        global.db.as_ref(),
        &global.file_store,
        auth.account_id,
        request,
    )
    .await
    .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success update user profile",
            "data": null
        })
    ))
}

async fn follow(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let request: FollowRequest = ext::json_body(req).await?;

    social_graph::follow(global.db.as_ref(), request.user_id, auth.account_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success follow user",
            "data": null
        })
    ))
}

async fn unfollow(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let request: FollowRequest = ext::json_body(req).await?;

    social_graph::unfollow(global.db.as_ref(), request.user_id, auth.account_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success unfollow user",
            "data": null
        })
    ))
}

async fn get_followers(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let followers = social_graph::list_followers(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user followers",
            "data": followers
        })
    ))
}

async fn get_following(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let following = social_graph::list_following(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user following",
            "data": following
        })
    ))
}

async fn get_uploaded_posts(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let posts = feed::get_uploaded_posts(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user uploaded posts",
            "data": posts
        })
    ))
}

async fn get_viewed_posts(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let posts = feed::get_viewed_posts(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user viewed posts",
            "data": posts
        })
    ))
}

async fn get_liked_posts(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let username = ext::param_string(&req, "username")?;

    let posts = feed::get_liked_posts(global.db.as_ref(), &username)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user liked posts",
            "data": posts
        })
    ))
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .patch("/", update_profile)
        .post("/follow", follow)
        .post("/unfollow", unfollow)
        .get("/:username/followers", get_followers)
        .get("/:username/following", get_following)
        .get("/:username/post/uploaded", get_uploaded_posts)
        .get("/:username/post/viewed", get_viewed_posts)
        .get("/:username/post/liked", get_liked_posts)
        .get("/:username", get_profile)
        .build()
        .expect("failed to build user router")
}
