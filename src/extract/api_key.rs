use std::sync::Arc;

use aide::OperationInput;
use axum::{
	extract::{FromRef, FromRequestParts},
	http::request,
};

use crate::{error::AppError, openapi::SECURITY_SCHEME_API_KEY};

pub const API_KEY_HEADER: &str = "x-api-key";

/// The key that mutating requests must present, if any.
///
/// When no key is configured, every request is let through.
#[derive(Clone, Default)]
pub struct ApiKeys(Option<Arc<str>>);

impl ApiKeys {
	pub fn new(key: Option<String>) -> Self {
		Self(key.map(Into::into))
	}

	fn accepts(&self, presented: Option<&str>) -> bool {
		match self.0 {
			None => true,
			Some(ref expected) => presented == Some(expected.as_ref()),
		}
	}
}

/// Guards a route behind the `X-API-Key` header.
///
/// If the key is missing or wrong, an [`AppError::InvalidApiKey`] is returned.
///
/// ```rust
/// async fn route(_: ApiKey) {
///   // ...
/// }
/// ```
#[derive(Debug)]
pub struct ApiKey;

#[axum::async_trait]
impl<S> FromRequestParts<S> for ApiKey
where
	ApiKeys: FromRef<S>,
	S: Sync + Send,
{
	type Rejection = AppError;

	async fn from_request_parts(
		parts: &mut request::Parts,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let presented = parts
			.headers
			.get(API_KEY_HEADER)
			.and_then(|value| value.to_str().ok());

		if ApiKeys::from_ref(state).accepts(presented) {
			Ok(Self)
		} else {
			tracing::debug!(present = presented.is_some(), "rejected api key");
			Err(AppError::InvalidApiKey)
		}
	}
}

impl OperationInput for ApiKey {
	/// This adds an API key requirement to the `OpenAPI` operation.
	fn operation_input(_ctx: &mut aide::gen::GenContext, operation: &mut aide::openapi::Operation) {
		operation.security.push(
			[(SECURITY_SCHEME_API_KEY.to_string(), Vec::new())]
				.into_iter()
				.collect(),
		);
	}
}
