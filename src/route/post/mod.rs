use aide::axum::{routing::get_with, ApiRouter};

use crate::AppState;

pub mod model;
pub mod route;

pub fn routes() -> ApiRouter<AppState> {
	use route::*;

	ApiRouter::new()
		.api_route(
			"/",
			get_with(list_posts, list_posts_docs).post_with(create_post, create_post_docs),
		)
		.api_route(
			"/:id",
			get_with(get_post, get_post_docs)
				.patch_with(update_post, update_post_docs)
				.delete_with(delete_post, delete_post_docs),
		)
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;
	use serde_json::{json, Value};
	use uuid::Uuid;

	use crate::{
		seed,
		store::Store,
		test::{api_key, create_post, create_user, server, server_with},
	};

	#[tokio::test]
	async fn test_create_and_get_post() {
		let server = server();
		let user = create_user(&server, "alice").await;
		let user_id = user["user_id"].as_str().unwrap();
		let post = create_post(&server, user_id, "Exploring the Cosmos").await;

		assert_eq!(post["title"], "Exploring the Cosmos");
		assert_eq!(post["author"]["user_id"], user["user_id"]);
		assert_eq!(post["created_at"], post["updated_at"]);

		let id = post["post_id"].as_str().unwrap();
		let response = server.get(&format!("/api/v1/posts/{id}")).await;

		response.assert_status_ok();
		assert_eq!(response.json::<Value>(), post);
	}

	#[tokio::test]
	async fn test_create_post_unknown_author() {
		let server = server();
		let (name, value) = api_key();

		let response = server
			.post("/api/v1/posts")
			.add_header(name, value)
			.json(&json!({
				"author_id": Uuid::new_v4(),
				"title": "Exploring the Cosmos",
				"content": "Space.",
			}))
			.await;

		response.assert_status(StatusCode::NOT_FOUND);
	}

	#[tokio::test]
	async fn test_create_post_invalid_title() {
		let server = server();
		let user = create_user(&server, "alice").await;
		let (name, value) = api_key();

		let response = server
			.post("/api/v1/posts")
			.add_header(name, value)
			.json(&json!({
				"author_id": user["user_id"],
				"title": "2025",
				"content": "Space.",
			}))
			.await;

		response.assert_status(StatusCode::BAD_REQUEST);
		assert_eq!(
			response.json::<Value>()["errors"][0]["content"],
			"title must not be a number"
		);
	}

	#[tokio::test]
	async fn test_patch_post() {
		let server = server();
		let user = create_user(&server, "alice").await;
		let post = create_post(&server, user["user_id"].as_str().unwrap(), "Hello there").await;
		let id = post["post_id"].as_str().unwrap();
		let (name, value) = api_key();

		let response = server
			.patch(&format!("/api/v1/posts/{id}"))
			.add_header(name, value)
			.json(&json!({ "content": "General Kenobi" }))
			.await;

		response.assert_status_ok();

		let body = response.json::<Value>();
		assert_eq!(body["title"], "Hello there");
		assert_eq!(body["content"], "General Kenobi");
		assert_eq!(body["created_at"], post["created_at"]);
	}

	#[tokio::test]
	async fn test_delete_post() {
		let server = server();
		let user = create_user(&server, "alice").await;
		let post = create_post(&server, user["user_id"].as_str().unwrap(), "Hello there").await;
		let id = post["post_id"].as_str().unwrap();
		let (name, value) = api_key();

		server
			.delete(&format!("/api/v1/posts/{id}"))
			.add_header(name, value)
			.await
			.assert_status(StatusCode::NO_CONTENT);

		server
			.get(&format!("/api/v1/posts/{id}"))
			.await
			.assert_status(StatusCode::NOT_FOUND);

		let user_id = user["user_id"].as_str().unwrap();
		let user = server.get(&format!("/api/v1/users/{user_id}")).await.json::<Value>();
		assert_eq!(user["posts"], json!([]));
	}

	#[tokio::test]
	async fn test_list_seeded_posts_newest_first() {
		let store = Store::memory();
		seed::run(&store).await.unwrap();

		let server = server_with(&store, None);
		let posts = server
			.get("/api/v1/posts")
			.add_query_param("size", 2)
			.await
			.json::<Value>();

		assert_eq!(posts[0]["title"], "A Quiet Morning");
		assert_eq!(posts[1]["title"], "Tech Trends in 2025");
		assert_eq!(posts[0]["author"]["username"], "caren");
	}

	#[tokio::test]
	async fn test_health_and_docs() {
		let server = server();

		let health = server.get("/health").await;
		health.assert_status_ok();
		assert_eq!(health.json::<Value>(), json!({ "status": "ok" }));

		let docs = server.get("/docs/api.json").await.json::<Value>();
		assert!(docs["paths"]["/api/v1/posts/{id}"].is_object());
		assert!(docs["paths"]["/api/v1/users/{id}/posts"].is_object());
	}

	#[tokio::test]
	async fn test_request_id_is_propagated() {
		let server = server();
		let response = server.get("/health").await;

		assert!(response.headers().contains_key("x-request-id"));
	}
}
