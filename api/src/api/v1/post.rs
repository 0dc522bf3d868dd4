use std::sync::Arc;

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
use crate::service::{feed, post_interaction};

#[derive(Debug, serde::Deserialize)]
struct CommentRequest {
    comment: String,
}

async fn get_feed(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let posts = feed::get_feed(global.db.as_ref(), auth.account_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get user feed",
            "data": posts
        })
    ))
}

async fn create_post(req: Request<Body>) -> Result<Response<Body>> {
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
        .allowed_fields(vec!["caption", "image"])
        .size_limit(
            SizeLimit::new()
                .for_field("caption", 30 * 1024)
                .for_field("image", global.config.uploads.max_image_size as u64),
        );

    let mut multipart = Multipart::with_constraints(req.into_body(), boundary, constraints);

    let mut caption = String::new();
    let mut image = None;

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
            "caption" => {
                caption = field
                    .text()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;
            }
            "image" => {
                let content_type = field
                    .content_type()
                    .map_err_route((
                        StatusCode::BAD_REQUEST,
                        "invalid multipart body, missing image content-type",
                    ))?
                    .to_string();

                let data = field
                    .bytes()
                    .await
                    .map_ignore_err_route((StatusCode::BAD_REQUEST, "invalid multipart body"))?;

                image = Some((data, content_type));
            }
            _ => return Err((StatusCode::BAD_REQUEST, "invalid multipart body").into()),
        }
    }

    let (image, image_content_type) =
        image.map_err_route((StatusCode::BAD_REQUEST, "missing image field"))?;

    let post = post_interaction::create_post(
        global.db.as_ref(),
        &global.file_store,
        auth.account_id,
        &image,
        &image_content_type,
        caption,
    )
    .await
    .into_err_route()?;

    Ok(make_response!(
        StatusCode::CREATED,
        json!({
            "message": "success create post",
            "data": post
        })
    ))
}

async fn view_post(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    post_interaction::view_post(global.db.as_ref(), auth.account_id, post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success view post",
            "data": null
        })
    ))
}

async fn get_viewers(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    let viewers = post_interaction::get_viewers(global.db.as_ref(), post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get viewers on post",
            "data": viewers
        })
    ))
}

async fn like_post(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    post_interaction::like_post(global.db.as_ref(), auth.account_id, post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success like post",
            "data": null
        })
    ))
}

async fn unlike_post(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    post_interaction::unlike_post(global.db.as_ref(), auth.account_id, post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success unlike post",
            "data": null
        })
    ))
}

async fn get_likers(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    let likers = post_interaction::get_likers(global.db.as_ref(), post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get users who liked post",
            "data": likers
        })
    ))
}

async fn create_comment(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    let auth = ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    let request: CommentRequest = ext::json_body(req).await?;

    let comment = post_interaction::create_comment(
        global.db.as_ref(),
        post_id,
        auth.account_id,
        request.comment,
    )
    .await
    .into_err_route()?;

    Ok(make_response!(
        StatusCode::CREATED,
        json!({
            "message": "success comment on post",
            "data": comment
        })
    ))
}

async fn list_comments(req: Request<Body>) -> Result<Response<Body>> {
    let global = req.get_global::<GlobalState>()?;
    ext::require_auth(&req).await?;

    let post_id = ext::param_ulid(&req, "post_id")?;

    let comments = post_interaction::list_comments(global.db.as_ref(), post_id)
        .await
        .into_err_route()?;

    Ok(make_response!(
        StatusCode::OK,
        json!({
            "message": "success get post comments",
            "data": comments
        })
    ))
}

pub fn routes(_global: &Arc<GlobalState>) -> Router<Body, RouteError<ApiError>> {
    Router::builder()
        .get("/", get_feed)
        .post("/", create_post)
        .post("/:post_id/view", view_post)
        .get("/:post_id/viewers", get_viewers)
        .post("/:post_id/like", like_post)
        .post("/:post_id/unlike", unlike_post)
        .get("/:post_id/likes", get_likers)
        .post("/:post_id/comment", create_comment)
        .get("/:post_id/comments", list_comments)
        .build()
        .expect("failed to build post router")
}
