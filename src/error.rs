use std::borrow::Cow;

use aide::OperationOutput;
use axum::{
	body::Body,
	extract::rejection::{JsonRejection, PathRejection, QueryRejection},
	http::{Response, StatusCode},
	response::IntoResponse,
	Json,
};
use schemars::JsonSchema;
use serde::Serialize;
use tower_governor::GovernorError;

use crate::service;

pub type Map = serde_json::Map<String, serde_json::Value>;

/// The documented shape of an error response.
pub type Errors = crate::extract::Json<ErrorResponse<'static>>;

/// A single error presented to the client.
#[derive(Debug, Serialize, JsonSchema)]
pub struct Message<'a> {
	/// A human-readable description of the error.
	pub content: Cow<'a, str>,
	/// The request field that caused the error, if any.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub field: Option<Cow<'a, str>>,
	/// Additional machine-readable details.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<Cow<'a, Map>>,
}

impl<'a> Message<'a> {
	pub fn new(content: impl Into<Cow<'a, str>>) -> Self {
		Self {
			content: content.into(),
			field: None,
			details: None,
		}
	}

	pub fn content(mut self, content: impl Into<Cow<'a, str>>) -> Self {
		self.content = content.into();
		self
	}

	pub fn field(mut self, field: impl Into<Cow<'a, str>>) -> Self {
		self.field = Some(field.into());
		self
	}

	pub fn detail(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
		self.details
			.get_or_insert_with(|| Cow::Owned(Map::new()))
			.to_mut()
			.insert(key.into(), value.into());
		self
	}

	pub fn into_vec(self) -> Vec<Self> {
		vec![self]
	}
}

/// The body of every error response.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorResponse<'a> {
	pub success: bool,
	pub errors: Vec<Message<'a>>,
}

/// Describes how an error is presented to the client.
pub trait ErrorShape: std::error::Error {
	fn status(&self) -> StatusCode;

	/// The messages sent to the client. These must not leak internals.
	fn into_errors(self) -> Vec<Message<'static>>;
}

fn into_response<E: ErrorShape>(error: E) -> Response<Body> {
	let status = error.status();

	if status.is_server_error() {
		tracing::error!(error = ?error, "request failed");
	}

	(
		status,
		Json(ErrorResponse {
			success: false,
			errors: error.into_errors(),
		}),
	)
		.into_response()
}

/// Errors raised by extractors and middleware, before a route runs.
///
/// The Display trait is not sent to the client, so it can show
/// sensitive information.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
	#[error("validation error: {0}")]
	Validation(#[from] validator::ValidationErrors),
	#[error("json error: {0}")]
	Json(#[from] JsonRejection),
	#[error("query error: {0}")]
	Query(#[from] QueryRejection),
	#[error("path error: {0}")]
	Path(#[from] PathRejection),
	#[error("missing or invalid api key")]
	InvalidApiKey,
	#[error("rate limit error: {0}")]
	RateLimit(#[from] GovernorError),
}

impl ErrorShape for AppError {
	fn status(&self) -> StatusCode {
		match self {
			Self::Validation(..) | Self::Query(..) | Self::Path(..) => StatusCode::BAD_REQUEST,
			Self::Json(rejection) => rejection.status(),
			Self::InvalidApiKey => StatusCode::UNAUTHORIZED,
			Self::RateLimit(GovernorError::TooManyRequests { .. }) => StatusCode::TOO_MANY_REQUESTS,
			Self::RateLimit(..) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		match self {
			Self::Validation(errors) => errors
				.field_errors()
				.into_iter()
				.flat_map(|(field, errors)| {
					errors.iter().map(move |error| {
						let content = error
							.message
							.clone()
							.unwrap_or_else(|| Cow::Owned(format!("invalid {field}")));

						Message::new(content)
							.field(field.to_string())
							.detail("code", error.code.to_string())
					})
				})
				.collect(),
			Self::Json(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Query(rejection) => Message::new(rejection.body_text()).into_vec(),
			Self::Path(..) => Message::new("ID must be a uuid").field("id").into_vec(),
			Self::InvalidApiKey => Message::new("invalid api key").into_vec(),
			Self::RateLimit(GovernorError::TooManyRequests { wait_time, .. }) => {
				Message::new("too many requests")
					.detail("wait_time", wait_time)
					.into_vec()
			}
			Self::RateLimit(..) => Message::new("internal server error").into_vec(),
		}
	}
}

impl ErrorShape for service::Error {
	fn status(&self) -> StatusCode {
		match self {
			Self::NotFound { .. } => StatusCode::NOT_FOUND,
			Self::Duplicate(..) => StatusCode::CONFLICT,
			Self::InvalidInput(..) => StatusCode::BAD_REQUEST,
			Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn into_errors(self) -> Vec<Message<'static>> {
		let message = Message::new(self.to_string());

		match self {
			Self::NotFound { resource, id } => message
				.detail("resource", resource)
				.detail("id", id.to_string())
				.into_vec(),
			Self::Duplicate(field) => message.field(field).into_vec(),
			Self::InvalidInput(..) => message.into_vec(),
			Self::Internal { .. } => message.content("internal server error").into_vec(),
		}
	}
}

macro_rules! impl_response {
	($($error:ty),*) => {
		$(
			impl IntoResponse for $error {
				fn into_response(self) -> Response<Body> {
					into_response(self)
				}
			}

			impl OperationOutput for $error {
				type Inner = Self;
			}
		)*
	};
}

impl_response!(AppError, service::Error);

#[cfg(test)]
mod test {
	use uuid::Uuid;

	use super::*;

	#[test]
	fn test_status_codes() {
		assert_eq!(
			service::Error::not_found("user", Uuid::nil()).status(),
			StatusCode::NOT_FOUND
		);
		assert_eq!(
			service::Error::Duplicate("username").status(),
			StatusCode::CONFLICT
		);
		assert_eq!(
			service::Error::invalid_input("nope").status(),
			StatusCode::BAD_REQUEST
		);
		assert_eq!(
			service::Error::Internal {
				message: "failed to delete user",
				source: crate::store::Error::Database(sqlx::Error::PoolClosed),
			}
			.status(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
	}

	#[test]
	fn test_internal_errors_hide_source() {
		let errors = service::Error::Internal {
			message: "failed to create user",
			source: crate::store::Error::UniqueViolation {
				constraint: Some("user_secret_key".into()),
			},
		}
		.into_errors();

		assert_eq!(errors.len(), 1);
		assert_eq!(errors[0].content, "internal server error");
		assert!(errors[0].details.is_none());
	}

	#[test]
	fn test_duplicate_names_field() {
		let errors = service::Error::Duplicate("email").into_errors();

		assert_eq!(errors[0].content, "email already exists");
		assert_eq!(errors[0].field.as_deref(), Some("email"));
	}

	#[test]
	fn test_message_details() {
		let message = Message::new("user with ID 1 not found")
			.detail("resource", "user")
			.detail("id", 1);

		let details = message.details.unwrap();

		assert_eq!(details["resource"], "user");
		assert_eq!(details["id"], 1);
	}
}
