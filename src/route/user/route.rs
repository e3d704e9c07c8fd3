use axum::extract::State;
use macros::route;

use crate::{
	error::Errors,
	extract::{ApiKey, Created, Json, NoContent, Path, Query},
	openapi::tag,
	route::post::model::PostResponse,
	service::{self, PostService, UserService},
};

use super::model;

type Result<T, E = service::Error> = std::result::Result<T, E>;

/// List users
/// Returns a paginated list of users in the order they joined, each with their posts.
#[route(tag = tag::USER)]
pub async fn list_users(
	State(users): State<UserService>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<model::UserResponse>>> {
	let users = users
		.list_users(paginate.limit(), paginate.offset())
		.await?;

	Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get user
/// Returns a single user by their unique id, with their posts.
#[route(
	tag = tag::USER,
	response(status = 404, shape = "Errors", description = "The user does not exist.")
)]
pub async fn get_user(
	State(users): State<UserService>,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<Json<model::UserResponse>> {
	Ok(Json(users.get_user(id).await?.into()))
}

/// Create user
/// Creates a new user. Usernames and emails must not be taken by another user.
#[route(
	tag = tag::USER,
	response(status = 400, shape = "Errors", description = "A field is invalid."),
	response(status = 409, shape = "Errors", description = "The username or email is taken.")
)]
pub async fn create_user(
	State(users): State<UserService>,
	_: ApiKey,
	Json(input): Json<model::CreateUserInput>,
) -> Result<Created<model::UserResponse>> {
	Ok(Created(users.create_user(input).await?.into()))
}

/// Update user
/// Updates the fields present in the body, leaving the rest unchanged.
#[route(
	tag = tag::USER,
	response(status = 400, shape = "Errors", description = "A field is invalid."),
	response(status = 404, shape = "Errors", description = "The user does not exist."),
	response(status = 409, shape = "Errors", description = "The username or email is taken.")
)]
pub async fn update_user(
	State(users): State<UserService>,
	_: ApiKey,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::UpdateUserInput>,
) -> Result<Json<model::UserResponse>> {
	Ok(Json(users.update_user(id, input).await?.into()))
}

/// Delete user
/// Deletes a user by their unique id, along with all of their posts.
#[route(
	tag = tag::USER,
	response(status = 404, shape = "Errors", description = "The user does not exist.")
)]
pub async fn delete_user(
	State(users): State<UserService>,
	_: ApiKey,
	Path(model::IdInput { id }): Path<model::IdInput>,
) -> Result<NoContent> {
	users.delete_user(id).await?;

	Ok(NoContent)
}

/// List user posts
/// Returns a paginated list of a user's posts, newest first.
#[route(
	tag = tag::USER,
	tag = tag::POST,
	response(status = 404, shape = "Errors", description = "The user does not exist.")
)]
pub async fn list_user_posts(
	State(posts): State<PostService>,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Query(paginate): Query<model::Paginate>,
) -> Result<Json<Vec<PostResponse>>> {
	let posts = posts
		.list_user_posts(id, paginate.limit(), paginate.offset())
		.await?;

	Ok(Json(posts.into_iter().map(Into::into).collect()))
}

/// Create user post
/// Creates a new post written by the user in the path.
#[route(
	tag = tag::USER,
	tag = tag::POST,
	response(status = 400, shape = "Errors", description = "A field is invalid."),
	response(status = 404, shape = "Errors", description = "The user does not exist.")
)]
pub async fn create_user_post(
	State(posts): State<PostService>,
	_: ApiKey,
	Path(model::IdInput { id }): Path<model::IdInput>,
	Json(input): Json<model::CreateUserPostInput>,
) -> Result<Created<PostResponse>> {
	Ok(Created(posts.create_post(input.with_author(id)).await?.into()))
}
