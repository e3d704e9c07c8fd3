//! Helpers for driving the router in tests.

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::{extract::ApiKeys, route, store::Store, State};

pub const API_KEY: &str = "test-key";

/// A server backed by a fresh memory store that requires [`API_KEY`].
pub fn server() -> TestServer {
	server_with(&Store::memory(), Some(API_KEY))
}

pub fn server_with(store: &Store, api_key: Option<&str>) -> TestServer {
	let state = State::new(store, ApiKeys::new(api_key.map(str::to_owned)));

	TestServer::new(route::router(state)).expect("failed to build test server")
}

pub fn api_key() -> (HeaderName, HeaderValue) {
	(
		HeaderName::from_static(crate::extract::API_KEY_HEADER),
		HeaderValue::from_static(API_KEY),
	)
}

/// Creates a user through the API and returns the response body.
pub async fn create_user(server: &TestServer, username: &str) -> Value {
	let (name, value) = api_key();
	let response = server
		.post("/api/v1/users")
		.add_header(name, value)
		.json(&json!({ "username": username, "email": format!("{username}@example.com") }))
		.await;

	response.assert_status(axum::http::StatusCode::CREATED);
	response.json()
}

/// Creates a post through the API and returns the response body.
pub async fn create_post(server: &TestServer, author_id: &str, title: &str) -> Value {
	let (name, value) = api_key();
	let response = server
		.post("/api/v1/posts")
		.add_header(name, value)
		.json(&json!({ "author_id": author_id, "title": title, "content": "Some content." }))
		.await;

	response.assert_status(axum::http::StatusCode::CREATED);
	response.json()
}
