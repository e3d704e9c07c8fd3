use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A record with an identifier assigned once at creation.
pub trait Record {
	fn id(&self) -> Uuid;
}

/// A single user.
///
/// Usernames and emails are unique across all users.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
	pub id: Uuid,
	pub username: String,
	pub email: String,
	pub created_at: DateTime<Utc>,
}

impl User {
	pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			id: Uuid::new_v4(),
			username: username.into(),
			email: email.into(),
			created_at: Utc::now(),
		}
	}
}

impl Record for User {
	fn id(&self) -> Uuid {
		self.id
	}
}

/// A single post, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Post {
	pub id: Uuid,
	pub user_id: Uuid,
	pub title: String,
	pub content: String,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Post {
	pub fn new(user_id: Uuid, title: impl Into<String>, content: impl Into<String>) -> Self {
		let now = Utc::now();

		Self {
			id: Uuid::new_v4(),
			user_id,
			title: title.into(),
			content: content.into(),
			created_at: now,
			updated_at: now,
		}
	}
}

impl Record for Post {
	fn id(&self) -> Uuid {
		self.id
	}
}

/// A user together with the posts they own, newest first.
#[derive(Debug, Clone)]
pub struct UserWithPosts {
	pub user: User,
	pub posts: Vec<Post>,
}

/// A post together with its author.
#[derive(Debug, Clone)]
pub struct PostWithAuthor {
	pub post: Post,
	pub author: User,
}
