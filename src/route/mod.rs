use std::sync::Arc;

use aide::{axum::ApiRouter, openapi::OpenApi};
use axum::{
	extract::Request,
	http::StatusCode,
	Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

use crate::{openapi, AppState};

pub mod docs;
pub mod health;
pub mod model;
pub mod post;
pub mod user;

/// Builds the application with every route, the `OpenAPI` document and the
/// per-request middleware. Rate limiting is applied by the caller, since it
/// needs the peer address of the connection.
pub fn router(state: AppState) -> Router {
	let mut api = OpenApi::default();

	ApiRouter::new()
		.nest("/api/v1/users", user::routes())
		.nest("/api/v1/posts", post::routes())
		.nest("/health", health::routes())
		.nest("/docs", docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.fallback(|| async { StatusCode::NOT_FOUND })
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
				.layer(
					TraceLayer::new_for_http().make_span_with(|request: &Request| {
						let request_id = request
							.headers()
							.get("x-request-id")
							.and_then(|value| value.to_str().ok())
							.unwrap_or_default();

						tracing::info_span!(
							"request",
							method = %request.method(),
							uri = %request.uri(),
							request_id,
						)
					}),
				)
				.layer(PropagateRequestIdLayer::x_request_id())
				.layer(CompressionLayer::new())
				.layer(CorsLayer::permissive()),
		)
		.with_state(state)
}
