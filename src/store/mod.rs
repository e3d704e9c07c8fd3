//! Persistence for users and posts.
//!
//! Both implementations enforce uniqueness of usernames and emails, the
//! post-to-user foreign key, and cascade deletion of a user's posts at write
//! time. Constraint violations are reported as their own variants so that the
//! service layer can tell them apart from other failures.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::model::{Post, User};

pub use memory::Memory;
pub use postgres::Postgres;

pub type Database = sqlx::Pool<sqlx::Postgres>;
pub type Result<T, E = Error> = std::result::Result<T, E>;

pub const USERNAME_CONSTRAINT: &str = "user_username_key";
pub const EMAIL_CONSTRAINT: &str = "user_email_key";
pub const POST_USER_CONSTRAINT: &str = "post_user_id_fkey";

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("unique constraint violated: {constraint:?}")]
	UniqueViolation { constraint: Option<String> },
	#[error("foreign key constraint violated: {constraint:?}")]
	ForeignKeyViolation { constraint: Option<String> },
	#[error("database error: {0}")]
	Database(sqlx::Error),
}

impl From<sqlx::Error> for Error {
	fn from(error: sqlx::Error) -> Self {
		if let sqlx::Error::Database(ref database) = error {
			let constraint = database.constraint().map(str::to_owned);

			match database.code().as_deref() {
				Some("23505") => return Self::UniqueViolation { constraint },
				Some("23503") => return Self::ForeignKeyViolation { constraint },
				_ => {}
			}
		}

		Self::Database(error)
	}
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Lists users in the order they joined.
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>>;

	async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

	async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>>;

	async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

	async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

	async fn create(&self, user: &User) -> Result<User>;

	/// Writes every field of `user` except its id and creation time.
	///
	/// Returns `None` if the user no longer exists.
	async fn update(&self, user: &User) -> Result<Option<User>>;

	/// Deletes the user and, through the foreign key, all of their posts.
	async fn delete(&self, user: &User) -> Result<()>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
	/// Lists posts, newest first.
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;

	async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>>;

	/// Lists a user's posts, newest first.
	async fn find_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>>;

	/// Lists the posts of every given user, newest first.
	async fn find_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<Post>>;

	async fn create(&self, post: &Post) -> Result<Post>;

	/// Returns `None` if the post no longer exists.
	async fn update(&self, post: &Post) -> Result<Option<Post>>;

	async fn delete(&self, post: &Post) -> Result<()>;
}

/// The pair of stores backing the services.
#[derive(Clone)]
pub struct Store {
	pub users: Arc<dyn UserStore>,
	pub posts: Arc<dyn PostStore>,
}

impl Store {
	pub fn postgres(database: Database) -> Self {
		let store = Arc::new(Postgres::new(database));

		Self {
			users: store.clone(),
			posts: store,
		}
	}

	pub fn memory() -> Self {
		let store = Arc::new(Memory::default());

		Self {
			users: store.clone(),
			posts: store,
		}
	}
}
