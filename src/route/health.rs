use aide::axum::{routing::get_with, ApiRouter};
use macros::route;
use schemars::JsonSchema;
use serde::Serialize;

use crate::{extract::Json, openapi::tag, AppState};

#[derive(Debug, Serialize, JsonSchema)]
pub struct Health {
	/// Always `ok` while the server is accepting requests.
	pub status: &'static str,
}

pub fn routes() -> ApiRouter<AppState> {
	ApiRouter::new().api_route("/", get_with(health, health_docs))
}

/// Health check
/// Reports that the server is up.
#[route(tag = tag::HEALTH)]
pub async fn health() -> Json<Health> {
	Json(Health { status: "ok" })
}
