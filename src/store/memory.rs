use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
	Error, PostStore, Result, UserStore, EMAIL_CONSTRAINT, POST_USER_CONSTRAINT,
	USERNAME_CONSTRAINT,
};
use crate::model::{Post, User};

#[derive(Default)]
struct Tables {
	users: HashMap<Uuid, User>,
	posts: HashMap<Uuid, Post>,
}

impl Tables {
	/// Checks the unique constraints on `user` against every other user.
	fn check_user(&self, user: &User) -> Result<()> {
		let others = self.users.values().filter(|other| other.id != user.id);

		for other in others {
			if other.username == user.username {
				return Err(unique_violation(USERNAME_CONSTRAINT));
			}

			if other.email == user.email {
				return Err(unique_violation(EMAIL_CONSTRAINT));
			}
		}

		Ok(())
	}
}

fn unique_violation(constraint: &str) -> Error {
	Error::UniqueViolation {
		constraint: Some(constraint.to_owned()),
	}
}

/// Converts a page into a range usable with [`Iterator::skip`] and [`Iterator::take`].
fn window(limit: i64, offset: i64) -> (usize, usize) {
	let offset = usize::try_from(offset).unwrap_or(0);
	let limit = usize::try_from(limit).unwrap_or(0);

	(offset, limit)
}

fn newest_first(mut posts: Vec<Post>) -> Vec<Post> {
	posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
	posts
}

/// Keeps users and posts in process memory.
///
/// All tables sit behind one lock, so each write observes and enforces the
/// constraints atomically, the same way a single Postgres statement would.
#[derive(Default)]
pub struct Memory {
	tables: RwLock<Tables>,
}

#[async_trait]
impl UserStore for Memory {
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
		let tables = self.tables.read().await;
		let (skip, take) = window(limit, offset);

		let mut users = tables.users.values().cloned().collect::<Vec<_>>();
		users.sort_by(|a, b| a.created_at.cmp(&b.created_at));

		Ok(users.into_iter().skip(skip).take(take).collect())
	}

	async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
		Ok(self.tables.read().await.users.get(&id).cloned())
	}

	async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
		let tables = self.tables.read().await;

		Ok(ids
			.iter()
			.filter_map(|id| tables.users.get(id))
			.cloned()
			.collect())
	}

	async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables
			.users
			.values()
			.find(|user| user.username == username)
			.cloned())
	}

	async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
		let tables = self.tables.read().await;

		Ok(tables.users.values().find(|user| user.email == email).cloned())
	}

	async fn create(&self, user: &User) -> Result<User> {
		let mut tables = self.tables.write().await;

		if tables.users.contains_key(&user.id) {
			return Err(unique_violation("user_pkey"));
		}

		tables.check_user(user)?;
		tables.users.insert(user.id, user.clone());

		Ok(user.clone())
	}

	async fn update(&self, user: &User) -> Result<Option<User>> {
		let mut tables = self.tables.write().await;

		if !tables.users.contains_key(&user.id) {
			return Ok(None);
		}

		tables.check_user(user)?;

		let Some(existing) = tables.users.get_mut(&user.id) else {
			return Ok(None);
		};

		existing.username.clone_from(&user.username);
		existing.email.clone_from(&user.email);

		Ok(Some(existing.clone()))
	}

	async fn delete(&self, user: &User) -> Result<()> {
		let mut tables = self.tables.write().await;

		if tables.users.remove(&user.id).is_some() {
			tables.posts.retain(|_, post| post.user_id != user.id);
		}

		Ok(())
	}
}

#[async_trait]
impl PostStore for Memory {
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;
		let (skip, take) = window(limit, offset);
		let posts = newest_first(tables.posts.values().cloned().collect());

		Ok(posts.into_iter().skip(skip).take(take).collect())
	}

	async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
		Ok(self.tables.read().await.posts.get(&id).cloned())
	}

	async fn find_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;
		let (skip, take) = window(limit, offset);
		let posts = newest_first(
			tables
				.posts
				.values()
				.filter(|post| post.user_id == user_id)
				.cloned()
				.collect(),
		);

		Ok(posts.into_iter().skip(skip).take(take).collect())
	}

	async fn find_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<Post>> {
		let tables = self.tables.read().await;

		Ok(newest_first(
			tables
				.posts
				.values()
				.filter(|post| user_ids.contains(&post.user_id))
				.cloned()
				.collect(),
		))
	}

	async fn create(&self, post: &Post) -> Result<Post> {
		let mut tables = self.tables.write().await;

		if !tables.users.contains_key(&post.user_id) {
			return Err(Error::ForeignKeyViolation {
				constraint: Some(POST_USER_CONSTRAINT.to_owned()),
			});
		}

		if tables.posts.contains_key(&post.id) {
			return Err(unique_violation("post_pkey"));
		}

		tables.posts.insert(post.id, post.clone());

		Ok(post.clone())
	}

	async fn update(&self, post: &Post) -> Result<Option<Post>> {
		let mut tables = self.tables.write().await;

		let Some(existing) = tables.posts.get_mut(&post.id) else {
			return Ok(None);
		};

		existing.title.clone_from(&post.title);
		existing.content.clone_from(&post.content);
		existing.updated_at = post.updated_at;

		Ok(Some(existing.clone()))
	}

	async fn delete(&self, post: &Post) -> Result<()> {
		self.tables.write().await.posts.remove(&post.id);

		Ok(())
	}
}
