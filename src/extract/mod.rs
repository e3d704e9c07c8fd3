mod api_key;

pub use api_key::{ApiKey, ApiKeys, API_KEY_HEADER};

use aide::{
	gen::GenContext,
	openapi::{self, Operation},
	OperationIo, OperationOutput,
};
use axum::{
	body::Body,
	extract::{FromRequest, FromRequestParts, Request},
	http::{request, Response, StatusCode},
	response::IntoResponse,
};
use schemars::JsonSchema;
use serde::{de, Serialize};

use crate::error::AppError;

/// Extractor that deserializes a JSON body and validates it.
///
/// T must implement [`serde::de::DeserializeOwned`] and [`validator::Validate`]
/// in order to be used in an extractor.
///
/// ```rust
/// async fn route(Json(user): Json<CreateUserInput>) {
///   // ...
/// }
/// ```
#[derive(OperationIo)]
#[aide(input_with = "axum::Json<T>", output_with = "axum::Json<T>", json_schema)]
pub struct Json<T>(pub T);

impl<T> IntoResponse for Json<T>
where
	T: Serialize,
{
	fn into_response(self) -> Response<Body> {
		axum::Json(self.0).into_response()
	}
}

#[axum::async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let result = axum::Json::<T>::from_request(req, state).await?.0;

		result.validate()?;
		Ok(Self(result))
	}
}

/// Extractor that deserializes a query string and validates it.
///
/// This is similar to [`Json<T>`], but does not consume the body.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Query<T>", json_schema)]
pub struct Query<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Query<T>
where
	T: de::DeserializeOwned + validator::Validate,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Query::<T>::from_request_parts(parts, state)
			.await?
			.0;

		result.validate()?;
		Ok(Self(result))
	}
}

/// Extractor that deserializes path parameters and validates them.
///
/// A malformed identifier is rejected with a 400 before the route runs.
#[derive(OperationIo)]
#[aide(input_with = "axum::extract::Path<T>", json_schema)]
pub struct Path<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for Path<T>
where
	T: de::DeserializeOwned + validator::Validate + Send,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let result = axum::extract::Path::<T>::from_request_parts(parts, state)
			.await?
			.0;

		result.validate()?;
		Ok(Self(result))
	}
}

/// A JSON body sent with `201 Created`.
pub struct Created<T>(pub T);

impl<T> IntoResponse for Created<T>
where
	T: Serialize,
{
	fn into_response(self) -> Response<Body> {
		(StatusCode::CREATED, axum::Json(self.0)).into_response()
	}
}

impl<T> OperationOutput for Created<T>
where
	T: JsonSchema,
{
	type Inner = T;

	fn operation_response(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Option<openapi::Response> {
		axum::Json::<T>::operation_response(ctx, operation)
	}

	fn inferred_responses(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Vec<(Option<u16>, openapi::Response)> {
		Self::operation_response(ctx, operation)
			.map(|response| vec![(Some(201), response)])
			.unwrap_or_default()
	}
}

/// An empty `204 No Content` response.
pub struct NoContent;

impl IntoResponse for NoContent {
	fn into_response(self) -> Response<Body> {
		StatusCode::NO_CONTENT.into_response()
	}
}

impl OperationOutput for NoContent {
	type Inner = ();

	fn operation_response(
		_ctx: &mut GenContext,
		_operation: &mut Operation,
	) -> Option<openapi::Response> {
		Some(openapi::Response {
			description: "No content".into(),
			..Default::default()
		})
	}

	fn inferred_responses(
		ctx: &mut GenContext,
		operation: &mut Operation,
	) -> Vec<(Option<u16>, openapi::Response)> {
		Self::operation_response(ctx, operation)
			.map(|response| vec![(Some(204), response)])
			.unwrap_or_default()
	}
}
