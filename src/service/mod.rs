//! The domain core shared by the user and post routes.
//!
//! Every operation returns one of the three expected failure kinds
//! ([`Error::NotFound`], [`Error::Duplicate`], [`Error::InvalidInput`]) or an
//! opaque [`Error::Internal`] wrapping whatever the store reported.

pub mod post;
pub mod user;
pub mod validate;

use std::future::Future;

use uuid::Uuid;

use crate::{
	model::{Record, User},
	store::{self, UserStore},
};

pub use post::PostService;
pub use user::UserService;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{resource} with ID {id} not found")]
	NotFound { resource: &'static str, id: Uuid },
	#[error("{0} already exists")]
	Duplicate(&'static str),
	#[error("{0}")]
	InvalidInput(String),
	#[error("{message}")]
	Internal {
		message: &'static str,
		#[source]
		source: store::Error,
	},
}

impl Error {
	pub fn not_found(resource: &'static str, id: Uuid) -> Self {
		Self::NotFound { resource, id }
	}

	pub fn invalid_input(message: impl Into<String>) -> Self {
		Self::InvalidInput(message.into())
	}

	/// Wraps a store failure, translating unique constraint violations on
	/// known fields into [`Error::Duplicate`].
	///
	/// The constraint name never reaches the message.
	pub fn from_store(message: &'static str, source: store::Error) -> Self {
		if let store::Error::UniqueViolation {
			constraint: Some(ref constraint),
		} = source
		{
			if let Some(field) = unique_field(constraint) {
				return Self::Duplicate(field);
			}
		}

		Self::Internal { message, source }
	}
}

/// Maps a unique constraint name onto the field it guards.
fn unique_field(constraint: &str) -> Option<&'static str> {
	if constraint.contains("username") {
		Some("username")
	} else if constraint.contains("email") {
		Some("email")
	} else {
		None
	}
}

/// Looks up a user that must exist.
pub(crate) async fn find_user(users: &dyn UserStore, id: Uuid) -> Result<User> {
	users
		.find_by_id(id)
		.await
		.map_err(|e| Error::from_store("failed to load user", e))?
		.ok_or(Error::not_found("user", id))
}

/// Fails with [`Error::Duplicate`] if `lookup` finds a record other than `exclude`.
///
/// On creation, pass `None` so that any match conflicts. A failed lookup is
/// never treated as absence.
pub async fn check_unique<T, F>(field: &'static str, exclude: Option<Uuid>, lookup: F) -> Result<()>
where
	T: Record,
	F: Future<Output = store::Result<Option<T>>>,
{
	match lookup.await {
		Ok(Some(found)) if Some(found.id()) != exclude => Err(Error::Duplicate(field)),
		Ok(_) => Ok(()),
		Err(source) => Err(Error::Internal {
			message: "failed to check uniqueness",
			source,
		}),
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_messages() {
		let id = Uuid::nil();

		assert_eq!(
			Error::not_found("user", id).to_string(),
			"user with ID 00000000-0000-0000-0000-000000000000 not found"
		);
		assert_eq!(Error::Duplicate("email").to_string(), "email already exists");
		assert_eq!(
			Error::invalid_input("title must not be blank").to_string(),
			"title must not be blank"
		);
	}

	#[test]
	fn test_from_store_translates_known_constraints() {
		let error = Error::from_store(
			"failed to create user",
			store::Error::UniqueViolation {
				constraint: Some(store::USERNAME_CONSTRAINT.into()),
			},
		);
		assert!(matches!(error, Error::Duplicate("username")));

		let error = Error::from_store(
			"failed to create user",
			store::Error::UniqueViolation {
				constraint: Some(store::EMAIL_CONSTRAINT.into()),
			},
		);
		assert!(matches!(error, Error::Duplicate("email")));
	}

	#[test]
	fn test_from_store_keeps_unknown_failures_opaque() {
		let error = Error::from_store(
			"failed to create user",
			store::Error::UniqueViolation { constraint: None },
		);
		assert!(matches!(error, Error::Internal { .. }));

		let error = Error::from_store(
			"failed to create user",
			store::Error::Database(sqlx::Error::PoolTimedOut),
		);
		assert_eq!(error.to_string(), "failed to create user");
	}

	#[tokio::test]
	async fn test_check_unique() {
		let alice = User::new("alice", "alice@example.com");
		let id = alice.id;

		let found = |user: Option<User>| async move { Ok::<_, store::Error>(user) };

		assert!(check_unique("username", None, found(None)).await.is_ok());
		assert!(matches!(
			check_unique("username", None, found(Some(alice.clone()))).await,
			Err(Error::Duplicate("username"))
		));
		assert!(check_unique("username", Some(id), found(Some(alice.clone())))
			.await
			.is_ok());
		assert!(matches!(
			check_unique("username", Some(Uuid::new_v4()), found(Some(alice))).await,
			Err(Error::Duplicate("username"))
		));
	}

	#[tokio::test]
	async fn test_check_unique_propagates_lookup_failures() {
		let lookup = async {
			Err::<Option<User>, _>(store::Error::Database(sqlx::Error::PoolClosed))
		};

		assert!(matches!(
			check_unique("email", None, lookup).await,
			Err(Error::Internal { .. })
		));
	}
}
