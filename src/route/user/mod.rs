use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_users, list_users_docs).post_with(create_user, create_user_docs),
		)
		.api_route(
			"/:id",
			get_with(get_user, get_user_docs)
				.patch_with(update_user, update_user_docs)
				.delete_with(delete_user, delete_user_docs),
		)
		.api_route(
			"/:id/posts",
			get_with(list_user_posts, list_user_posts_docs)
				.post_with(create_user_post, create_user_post_docs),
		)
}
