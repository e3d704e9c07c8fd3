use std::borrow::Cow;

use aide::{
	openapi::{ApiKeyLocation, SecurityScheme, Tag},
	transform::TransformOpenApi,
};

use crate::{
	error::{self, ErrorResponse},
	extract::{Json, API_KEY_HEADER},
};

pub const SECURITY_SCHEME_API_KEY: &str = "API Key";

pub mod tag {
	pub const USER: &str = "User";
	pub const POST: &str = "Post";
	pub const HEALTH: &str = "Health";
}

pub fn docs(api: TransformOpenApi) -> TransformOpenApi {
	api.title("Blog API")
		.summary("Users and the posts they write")
		.description(
			"A REST API for managing users and their posts. Usernames and emails are \
			 unique, and deleting a user deletes their posts.",
		)
		.tag(Tag {
			name: tag::USER.into(),
			description: Some("User management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::POST.into(),
			description: Some("Post management".into()),
			..Default::default()
		})
		.tag(Tag {
			name: tag::HEALTH.into(),
			description: Some("Service health".into()),
			..Default::default()
		})
		.security_scheme(
			SECURITY_SCHEME_API_KEY,
			SecurityScheme::ApiKey {
				location: ApiKeyLocation::Header,
				name: API_KEY_HEADER.into(),
				description: Some("Required on mutating routes when the server has a key".into()),
				extensions: Default::default(),
			},
		)
		.default_response_with::<Json<ErrorResponse<'static>>, _>(|res| {
			res.example(ErrorResponse {
				success: false,
				errors: vec![error::Message {
					content: "error message".into(),
					field: Some("optional field".into()),
					details: Some(Cow::Owned({
						let mut map = error::Map::new();
						map.insert("key".into(), serde_json::json!("value"));
						map
					})),
				}],
			})
		})
}
