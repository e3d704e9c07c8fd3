use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

pub use crate::{
	route::model::{IdInput, Paginate},
	service::post::{CreatePostInput, UpdatePostInput},
};
use crate::model::{PostWithAuthor, User};

/// The author of a post.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserSummary {
	pub user_id: Uuid,
	pub username: String,
	pub email: String,
}

impl From<User> for UserSummary {
	fn from(user: User) -> Self {
		Self {
			user_id: user.id,
			username: user.username,
			email: user.email,
		}
	}
}

/// A single post, together with its author.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostResponse {
	/// The unique identifier of the post.
	pub post_id: Uuid,
	pub title: String,
	pub content: String,
	pub created_at: DateTime<Utc>,
	/// The last time the title or content changed.
	pub updated_at: DateTime<Utc>,
	pub author: UserSummary,
}

impl From<PostWithAuthor> for PostResponse {
	fn from(PostWithAuthor { post, author }: PostWithAuthor) -> Self {
		Self {
			post_id: post.id,
			title: post.title,
			content: post.content,
			created_at: post.created_at,
			updated_at: post.updated_at,
			author: author.into(),
		}
	}
}
