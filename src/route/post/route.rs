use axum::extract::State;
use macros::route;

use crate::{
	error::Errors,
	extract::{ApiKey, Created, Json, NoContent, Path, Query},
	openapi::tag,
	service::{self, PostService},
};

use super::model;

type Result<T, E = service::Error> = std::result::Result<T, E>;

/// List posts
/// Returns a paginated list of all posts, newest first.
#[route(tag = tag::POST)]
pub async fn list_posts(
	State(posts): State<PostService>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::PostResponse>>> {
	let posts = posts
		.list_posts(paginate.limit(), paginate.offset())
		.await?;

	Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// Get post
/// Returns a single post by its unique id, with its author.
#[route(
	tag = tag::POST,
	response(status = 404, shape = "Errors", description = "The post does not exist.")
)]
pub async fn get_post(
	State(posts): State<PostService>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::PostResponse>> {
	Ok(Json(posts.get_post(id).await?.into()))
}

/// Create post
/// Creates a new post written by the user named in the body.
#[route(
	tag = tag::POST,
	response(status = 400, shape = "Errors", description = "A field is invalid."),
	response(status = 404, shape = "Errors", description = "The author does not exist.")
)]
pub async fn create_post(
	State(posts): State<PostService>,
	_: ApiKey,
	Json(input): Json<model::CreatePostInput>,
) -> Result<Created<model::PostResponse>> {
	Ok(Created(posts.create_post(input).await?.into()))
}

/// Update post
/// Updates the title or content present in the body, leaving the rest unchanged.
#[route(
	tag = tag::POST,
	response(status = 400, shape = "Errors", description = "A field is invalid."),
	response(status = 404, shape = "Errors", description = "The post does not exist.")
)]
pub async fn update_post(
	State(posts): State<PostService>,
	_: ApiKey,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::UpdatePostInput>,
) -> Result<Json<model::PostResponse>> {
	Ok(Json(posts.update_post(id, input).await?.into()))
}

/// Delete post
/// Deletes a post by its unique id.
#[route(
	tag = tag::POST,
	response(status = 404, shape = "Errors", description = "The post does not exist.")
)]
pub async fn delete_post(
	State(posts): State<PostService>,
	_: ApiKey,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<NoContent> {
	posts.delete_post(id).await?;

	Ok(NoContent)
}
