use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use uuid::Uuid;

pub use crate::{
	route::model::{IdInput, Paginate},
	service::{
		post::CreateUserPostInput,
		user::{CreateUserInput, UpdateUserInput},
	},
};
use crate::model::{Post, UserWithPosts};

/// A post as listed under its author.
#[derive(Debug, Serialize, JsonSchema)]
pub struct PostSummary {
	pub post_id: Uuid,
	pub title: String,
}

impl From<Post> for PostSummary {
	fn from(post: Post) -> Self {
		Self {
			post_id: post.id,
			title: post.title,
		}
	}
}

/// A user and the posts they have written, newest first.
#[derive(Debug, Serialize, JsonSchema)]
pub struct UserResponse {
	/// The unique identifier of the user.
	pub user_id: Uuid,
	pub username: String,
	pub email: String,
	/// When the user joined.
	pub joined_at: DateTime<Utc>,
	pub posts: Vec<PostSummary>,
}

impl From<UserWithPosts> for UserResponse {
	fn from(UserWithPosts { user, posts }: UserWithPosts) -> Self {
		Self {
			user_id: user.id,
			username: user.username,
			email: user.email,
			joined_at: user.created_at,
			posts: posts.into_iter().map(Into::into).collect(),
		}
	}
}
