use std::{collections::HashMap, sync::Arc};

use macros::partial;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{check_unique, find_user, validate, Error, Result};
use crate::{
	model::{Post, User, UserWithPosts},
	store::{PostStore, Store, UserStore},
};

/// User fields supplied by the client.
#[partial]
#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct CreateUserInput {
	/// The username that is displayed to the public.
	///
	/// At least 3 characters, including at least 2 letters, and not a number.
	#[schemars(example = "example_username")]
	pub username: String,
	/// The user's email address.
	#[validate(email(message = "email must be a valid address"))]
	#[schemars(example = "example_email")]
	pub email: String,
}

fn example_username() -> &'static str {
	"mike"
}

fn example_email() -> &'static str {
	"mike@example.com"
}

/// Applies the present fields of `input` onto a copy of `user`.
///
/// Every present field is validated, including ones equal to the current
/// value. Absent fields are left untouched. Usernames are stored trimmed.
pub fn merge(user: &User, input: &UpdateUserInput) -> Result<User> {
	let mut merged = user.clone();

	if let Some(ref username) = input.username {
		validate::username(username)?;
		merged.username = username.trim().to_owned();
	}

	if let Some(ref email) = input.email {
		validate::email(email)?;
		merged.email.clone_from(email);
	}

	Ok(merged)
}

#[derive(Clone)]
pub struct UserService {
	users: Arc<dyn UserStore>,
	posts: Arc<dyn PostStore>,
}

impl UserService {
	pub fn new(store: &Store) -> Self {
		Self {
			users: store.users.clone(),
			posts: store.posts.clone(),
		}
	}

	async fn with_posts(&self, user: User) -> Result<UserWithPosts> {
		let posts = self
			.posts
			.find_by_users(&[user.id])
			.await
			.map_err(|e| Error::from_store("failed to load posts", e))?;

		Ok(UserWithPosts { user, posts })
	}

	/// Lists users in the order they joined, each with their posts.
	pub async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<UserWithPosts>> {
		let users = self
			.users
			.find_all(limit, offset)
			.await
			.map_err(|e| Error::from_store("failed to load users", e))?;

		let ids = users.iter().map(|user| user.id).collect::<Vec<_>>();
		let posts = self
			.posts
			.find_by_users(&ids)
			.await
			.map_err(|e| Error::from_store("failed to load posts", e))?;

		let mut by_user = HashMap::<Uuid, Vec<Post>>::new();

		for post in posts {
			by_user.entry(post.user_id).or_default().push(post);
		}

		Ok(users
			.into_iter()
			.map(|user| UserWithPosts {
				posts: by_user.remove(&user.id).unwrap_or_default(),
				user,
			})
			.collect())
	}

	pub async fn get_user(&self, id: Uuid) -> Result<UserWithPosts> {
		let user = find_user(self.users.as_ref(), id).await?;

		self.with_posts(user).await
	}

	#[tracing::instrument(skip(self, input), fields(username = %input.username))]
	pub async fn create_user(&self, input: CreateUserInput) -> Result<UserWithPosts> {
		validate::username(&input.username)?;
		validate::email(&input.email)?;

		// Checked and stored in the same form that was validated
		let username = input.username.trim();

		check_unique("username", None, self.users.find_by_username(username)).await?;
		check_unique("email", None, self.users.find_by_email(&input.email)).await?;

		// The store enforces uniqueness again, in case of a concurrent insert
		let user = self
			.users
			.create(&User::new(username, input.email))
			.await
			.map_err(|e| Error::from_store("failed to create user", e))?;

		tracing::debug!(id = %user.id, "created user");

		Ok(UserWithPosts {
			user,
			posts: Vec::new(),
		})
	}

	/// Updates the fields present in `input`, leaving the rest unchanged.
	///
	/// An unknown id fails before any field is looked at. An empty input
	/// persists the user as is.
	#[tracing::instrument(skip(self, input))]
	pub async fn update_user(&self, id: Uuid, input: UpdateUserInput) -> Result<UserWithPosts> {
		let user = find_user(self.users.as_ref(), id).await?;
		let merged = merge(&user, &input)?;

		if input.username.is_some() {
			check_unique(
				"username",
				Some(id),
				self.users.find_by_username(&merged.username),
			)
			.await?;
		}

		if input.email.is_some() {
			check_unique("email", Some(id), self.users.find_by_email(&merged.email)).await?;
		}

		if input.is_empty() {
			tracing::debug!("no fields present, persisting user unchanged");
		}

		let user = self
			.users
			.update(&merged)
			.await
			.map_err(|e| Error::from_store("failed to update user", e))?
			.ok_or(Error::not_found("user", id))?;

		self.with_posts(user).await
	}

	/// Deletes the user and all of their posts.
	#[tracing::instrument(skip(self))]
	pub async fn delete_user(&self, id: Uuid) -> Result<()> {
		let user = find_user(self.users.as_ref(), id).await?;

		self.users
			.delete(&user)
			.await
			.map_err(|source| Error::Internal {
				message: "failed to delete user",
				source,
			})?;

		tracing::debug!("deleted user");

		Ok(())
	}
}
