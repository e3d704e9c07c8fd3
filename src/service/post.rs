use std::{collections::HashMap, sync::Arc};

use chrono::Utc;
use macros::partial;
use schemars::JsonSchema;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{find_user, validate, Error, Result};
use crate::{
	model::{Post, PostWithAuthor},
	store::{self, PostStore, Store, UserStore},
};

/// Post fields supplied by the client.
#[partial]
#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct CreatePostInput {
	/// The user who writes the post.
	#[partial(skip)]
	pub author_id: Uuid,
	/// The title of the post, at least 3 characters and not a number.
	#[schemars(example = "example_title")]
	pub title: String,
	/// The content of the post.
	pub content: String,
}

/// A post written by the user named in the path.
#[derive(Debug, Clone, Deserialize, Validate, JsonSchema)]
pub struct CreateUserPostInput {
	/// The title of the post, at least 3 characters and not a number.
	#[schemars(example = "example_title")]
	pub title: String,
	/// The content of the post.
	pub content: String,
}

impl CreateUserPostInput {
	pub fn with_author(self, author_id: Uuid) -> CreatePostInput {
		CreatePostInput {
			author_id,
			title: self.title,
			content: self.content,
		}
	}
}

fn example_title() -> &'static str {
	"My First Post"
}

/// Applies the present fields of `input` onto a copy of `post`.
///
/// `updated_at` is left for the caller to refresh.
pub fn merge(post: &Post, input: &UpdatePostInput) -> Result<Post> {
	let mut merged = post.clone();

	if let Some(ref title) = input.title {
		validate::title(title)?;
		merged.title.clone_from(title);
	}

	if let Some(ref content) = input.content {
		validate::content(content)?;
		merged.content.clone_from(content);
	}

	Ok(merged)
}

#[derive(Clone)]
pub struct PostService {
	users: Arc<dyn UserStore>,
	posts: Arc<dyn PostStore>,
}

impl PostService {
	pub fn new(store: &Store) -> Self {
		Self {
			users: store.users.clone(),
			posts: store.posts.clone(),
		}
	}

	async fn find(&self, id: Uuid) -> Result<Post> {
		self.posts
			.find_by_id(id)
			.await
			.map_err(|e| Error::from_store("failed to load post", e))?
			.ok_or(Error::not_found("post", id))
	}

	/// Attaches authors to posts, dropping any post whose author has
	/// disappeared in the meantime.
	async fn with_authors(&self, posts: Vec<Post>) -> Result<Vec<PostWithAuthor>> {
		let mut ids = posts.iter().map(|post| post.user_id).collect::<Vec<_>>();
		ids.sort_unstable();
		ids.dedup();

		let authors = self
			.users
			.find_by_ids(&ids)
			.await
			.map_err(|e| Error::from_store("failed to load users", e))?
			.into_iter()
			.map(|user| (user.id, user))
			.collect::<HashMap<_, _>>();

		Ok(posts
			.into_iter()
			.filter_map(|post| {
				let Some(author) = authors.get(&post.user_id) else {
					tracing::warn!(id = %post.id, user_id = %post.user_id, "dropping post without author");
					return None;
				};

				Some(PostWithAuthor {
					post,
					author: author.clone(),
				})
			})
			.collect())
	}

	async fn with_author(&self, post: Post) -> Result<PostWithAuthor> {
		let id = post.id;
		let author = self
			.users
			.find_by_id(post.user_id)
			.await
			.map_err(|e| Error::from_store("failed to load user", e))?
			// The author was deleted along with the post
			.ok_or(Error::not_found("post", id))?;

		Ok(PostWithAuthor { post, author })
	}

	/// Lists posts, newest first.
	pub async fn list_posts(&self, limit: i64, offset: i64) -> Result<Vec<PostWithAuthor>> {
		let posts = self
			.posts
			.find_all(limit, offset)
			.await
			.map_err(|e| Error::from_store("failed to load posts", e))?;

		self.with_authors(posts).await
	}

	/// Lists a user's posts, newest first.
	pub async fn list_user_posts(
		&self,
		user_id: Uuid,
		limit: i64,
		offset: i64,
	) -> Result<Vec<PostWithAuthor>> {
		let author = find_user(self.users.as_ref(), user_id).await?;
		let posts = self
			.posts
			.find_by_user(user_id, limit, offset)
			.await
			.map_err(|e| Error::from_store("failed to load posts", e))?;

		Ok(posts
			.into_iter()
			.map(|post| PostWithAuthor {
				post,
				author: author.clone(),
			})
			.collect())
	}

	pub async fn get_post(&self, id: Uuid) -> Result<PostWithAuthor> {
		let post = self.find(id).await?;

		self.with_author(post).await
	}

	#[tracing::instrument(skip(self, input), fields(author_id = %input.author_id))]
	pub async fn create_post(&self, input: CreatePostInput) -> Result<PostWithAuthor> {
		validate::title(&input.title)?;
		validate::content(&input.content)?;

		let author = find_user(self.users.as_ref(), input.author_id).await?;
		let post = Post::new(author.id, input.title, input.content);

		// The author may be deleted between the lookup and the insert
		let post = self.posts.create(&post).await.map_err(|e| match e {
			store::Error::ForeignKeyViolation { .. } => Error::not_found("user", author.id),
			e => Error::from_store("failed to create post", e),
		})?;

		tracing::debug!(id = %post.id, "created post");

		Ok(PostWithAuthor { post, author })
	}

	/// Updates the fields present in `input`, leaving the rest unchanged.
	#[tracing::instrument(skip(self, input))]
	pub async fn update_post(&self, id: Uuid, input: UpdatePostInput) -> Result<PostWithAuthor> {
		let post = self.find(id).await?;
		let mut merged = merge(&post, &input)?;
		merged.updated_at = Utc::now();

		if input.is_empty() {
			tracing::debug!("no fields present, persisting post unchanged");
		}

		let post = self
			.posts
			.update(&merged)
			.await
			.map_err(|e| Error::from_store("failed to update post", e))?
			.ok_or(Error::not_found("post", id))?;

		self.with_author(post).await
	}

	#[tracing::instrument(skip(self))]
	pub async fn delete_post(&self, id: Uuid) -> Result<()> {
		let post = self.find(id).await?;

		self.posts
			.delete(&post)
			.await
			.map_err(|source| Error::Internal {
				message: "failed to delete post",
				source,
			})?;

		tracing::debug!("deleted post");

		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		model::User,
		store::{MockPostStore, MockUserStore},
	};

	fn service(users: MockUserStore, posts: MockPostStore) -> PostService {
		PostService::new(&Store {
			users: Arc::new(users),
			posts: Arc::new(posts),
		})
	}

	fn create_input(author_id: Uuid, title: &str, content: &str) -> CreatePostInput {
		CreatePostInput {
			author_id,
			title: title.into(),
			content: content.into(),
		}
	}

	#[test]
	fn test_merge() {
		let post = Post::new(Uuid::new_v4(), "Exploring the Cosmos", "Space.");
		let input = UpdatePostInput {
			content: Some("More space.".into()),
			..Default::default()
		};

		let merged = merge(&post, &input).unwrap();

		assert_eq!(merged.title, "Exploring the Cosmos");
		assert_eq!(merged.content, "More space.");

		let input = UpdatePostInput {
			title: Some("42".into()),
			..Default::default()
		};

		assert!(matches!(
			merge(&post, &input),
			Err(Error::InvalidInput(ref message)) if message == "title must not be a number"
		));
	}

	#[tokio::test]
	async fn test_create_post_unknown_author() {
		let author_id = Uuid::new_v4();
		let mut users = MockUserStore::new();
		users.expect_find_by_id().returning(|_| Ok(None));

		let mut posts = MockPostStore::new();
		posts.expect_create().never();

		let error = service(users, posts)
			.create_post(create_input(author_id, "Hello there", "General Kenobi"))
			.await
			.unwrap_err();

		assert!(matches!(error, Error::NotFound { resource: "user", id } if id == author_id));
	}

	#[tokio::test]
	async fn test_create_post_author_deleted_concurrently() {
		let author = User::new("alice", "alice@x.com");
		let author_id = author.id;
		let mut users = MockUserStore::new();
		users
			.expect_find_by_id()
			.returning(move |_| Ok(Some(author.clone())));

		let mut posts = MockPostStore::new();
		posts.expect_create().times(1).returning(|_| {
			Err(store::Error::ForeignKeyViolation {
				constraint: Some(store::POST_USER_CONSTRAINT.into()),
			})
		});

		let error = service(users, posts)
			.create_post(create_input(author_id, "Hello there", "General Kenobi"))
			.await
			.unwrap_err();

		assert!(matches!(error, Error::NotFound { resource: "user", id } if id == author_id));
	}

	#[tokio::test]
	async fn test_create_post_blank_content() {
		let error = service(MockUserStore::new(), MockPostStore::new())
			.create_post(create_input(Uuid::new_v4(), "Hello there", " "))
			.await
			.unwrap_err();

		assert_eq!(error.to_string(), "content must not be blank");
	}

	#[tokio::test]
	async fn test_list_posts_skips_posts_without_author() {
		let author = User::new("alice", "alice@x.com");
		let kept = Post::new(author.id, "Hello there", "General Kenobi");
		let orphan = Post::new(Uuid::new_v4(), "Exploring the Cosmos", "Space.");
		let listed = vec![kept.clone(), orphan];

		let mut posts = MockPostStore::new();
		posts
			.expect_find_all()
			.returning(move |_, _| Ok(listed.clone()));

		let mut users = MockUserStore::new();
		users
			.expect_find_by_ids()
			.times(1)
			.returning(move |_| Ok(vec![author.clone()]));

		let listed = service(users, posts).list_posts(10, 0).await.unwrap();

		assert_eq!(listed.len(), 1);
		assert_eq!(listed[0].post, kept);
	}

	#[tokio::test]
	async fn test_update_unknown_post() {
		let mut posts = MockPostStore::new();
		posts.expect_find_by_id().returning(|_| Ok(None));
		posts.expect_update().never();

		let id = Uuid::new_v4();
		let error = service(MockUserStore::new(), posts)
			.update_post(id, UpdatePostInput::default())
			.await
			.unwrap_err();

		assert_eq!(error.to_string(), format!("post with ID {id} not found"));
	}

	#[tokio::test]
	async fn test_delete_post_storage_failure_is_opaque() {
		let post = Post::new(Uuid::new_v4(), "Hello there", "General Kenobi");
		let id = post.id;
		let mut posts = MockPostStore::new();
		posts
			.expect_find_by_id()
			.returning(move |_| Ok(Some(post.clone())));
		posts
			.expect_delete()
			.returning(|_| Err(store::Error::Database(sqlx::Error::PoolTimedOut)));

		let error = service(MockUserStore::new(), posts)
			.delete_post(id)
			.await
			.unwrap_err();

		assert!(matches!(error, Error::Internal { .. }));
		assert_eq!(error.to_string(), "failed to delete post");
	}

	#[tokio::test]
	async fn test_update_refreshes_updated_at() {
		let store = Store::memory();
		let author = User::new("alice", "alice@example.com");
		store.users.create(&author).await.unwrap();

		let service = PostService::new(&store);
		let created = service
			.create_post(create_input(author.id, "Exploring the Cosmos", "Space."))
			.await
			.unwrap()
			.post;

		let updated = service
			.update_post(
				created.id,
				UpdatePostInput {
					title: Some("Exploring the Oceans".into()),
					..Default::default()
				},
			)
			.await
			.unwrap();

		assert_eq!(updated.post.title, "Exploring the Oceans");
		assert_eq!(updated.post.content, "Space.");
		assert_eq!(updated.post.created_at, created.created_at);
		assert!(updated.post.updated_at >= created.updated_at);
		assert_eq!(updated.author, author);
	}

	#[tokio::test]
	async fn test_list_user_posts_unknown_user() {
		let service = PostService::new(&Store::memory());
		let id = Uuid::new_v4();

		let error = service.list_user_posts(id, 10, 0).await.unwrap_err();

		assert!(matches!(error, Error::NotFound { resource: "user", .. }));
	}
}
