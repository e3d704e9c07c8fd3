use async_trait::async_trait;
use uuid::Uuid;

use super::{Database, PostStore, Result, UserStore};
use crate::model::{Post, User};

/// Stores users and posts in Postgres.
///
/// The schema lives in `migrations/`; constraint names there must stay in
/// sync with the constants in [`super`].
#[derive(Clone)]
pub struct Postgres {
	database: Database,
}

impl Postgres {
	pub fn new(database: Database) -> Self {
		Self { database }
	}
}

#[async_trait]
impl UserStore for Postgres {
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
		let users = sqlx::query_as::<_, User>(
			r#"
				SELECT * FROM "user"
				ORDER BY created_at ASC
				LIMIT $1 OFFSET $2
			"#,
		)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.database)
		.await?;

		Ok(users)
	}

	async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = $1"#)
			.bind(id)
			.fetch_optional(&self.database)
			.await?;

		Ok(user)
	}

	async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>> {
		let users = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE id = ANY($1)"#)
			.bind(ids)
			.fetch_all(&self.database)
			.await?;

		Ok(users)
	}

	async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE username = $1"#)
			.bind(username)
			.fetch_optional(&self.database)
			.await?;

		Ok(user)
	}

	async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(r#"SELECT * FROM "user" WHERE email = $1"#)
			.bind(email)
			.fetch_optional(&self.database)
			.await?;

		Ok(user)
	}

	async fn create(&self, user: &User) -> Result<User> {
		let user = sqlx::query_as::<_, User>(
			r#"
				INSERT INTO "user" (id, username, email, created_at)
				VALUES ($1, $2, $3, $4)
				RETURNING *
			"#,
		)
		.bind(user.id)
		.bind(&user.username)
		.bind(&user.email)
		.bind(user.created_at)
		.fetch_one(&self.database)
		.await?;

		Ok(user)
	}

	async fn update(&self, user: &User) -> Result<Option<User>> {
		let user = sqlx::query_as::<_, User>(
			r#"
				UPDATE "user"
				SET username = $2, email = $3
				WHERE id = $1
				RETURNING *
			"#,
		)
		.bind(user.id)
		.bind(&user.username)
		.bind(&user.email)
		.fetch_optional(&self.database)
		.await?;

		Ok(user)
	}

	async fn delete(&self, user: &User) -> Result<()> {
		sqlx::query(r#"DELETE FROM "user" WHERE id = $1"#)
			.bind(user.id)
			.execute(&self.database)
			.await?;

		Ok(())
	}
}

#[async_trait]
impl PostStore for Postgres {
	async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				ORDER BY created_at DESC
				LIMIT $1 OFFSET $2
			"#,
		)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.database)
		.await?;

		Ok(posts)
	}

	async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>> {
		let post = sqlx::query_as::<_, Post>("SELECT * FROM post WHERE id = $1")
			.bind(id)
			.fetch_optional(&self.database)
			.await?;

		Ok(post)
	}

	async fn find_by_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				WHERE user_id = $1
				ORDER BY created_at DESC
				LIMIT $2 OFFSET $3
			"#,
		)
		.bind(user_id)
		.bind(limit)
		.bind(offset)
		.fetch_all(&self.database)
		.await?;

		Ok(posts)
	}

	async fn find_by_users(&self, user_ids: &[Uuid]) -> Result<Vec<Post>> {
		let posts = sqlx::query_as::<_, Post>(
			r#"
				SELECT * FROM post
				WHERE user_id = ANY($1)
				ORDER BY created_at DESC
			"#,
		)
		.bind(user_ids)
		.fetch_all(&self.database)
		.await?;

		Ok(posts)
	}

	async fn create(&self, post: &Post) -> Result<Post> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				INSERT INTO post (id, user_id, title, content, created_at, updated_at)
				VALUES ($1, $2, $3, $4, $5, $6)
				RETURNING *
			"#,
		)
		.bind(post.id)
		.bind(post.user_id)
		.bind(&post.title)
		.bind(&post.content)
		.bind(post.created_at)
		.bind(post.updated_at)
		.fetch_one(&self.database)
		.await?;

		Ok(post)
	}

	async fn update(&self, post: &Post) -> Result<Option<Post>> {
		let post = sqlx::query_as::<_, Post>(
			r#"
				UPDATE post
				SET title = $2, content = $3, updated_at = $4
				WHERE id = $1
				RETURNING *
			"#,
		)
		.bind(post.id)
		.bind(&post.title)
		.bind(&post.content)
		.bind(post.updated_at)
		.fetch_optional(&self.database)
		.await?;

		Ok(post)
	}

	async fn delete(&self, post: &Post) -> Result<()> {
		sqlx::query("DELETE FROM post WHERE id = $1")
			.bind(post.id)
			.execute(&self.database)
			.await?;

		Ok(())
	}
}
