//! Sample users and posts for an empty store.

use chrono::{Duration, Utc};
use uuid::{uuid, Uuid};

use crate::{
	model::{Post, User},
	store::{self, Store},
};

const USERS: [(Uuid, &str, &str); 4] = [
	(uuid!("c28b2d8e-9c4a-4d43-8263-73bb8852b7fa"), "alice", "alice@example.com"),
	(uuid!("1e7f9e3e-d8b2-431e-b29c-47cf1b5b6dcb"), "bob", "bob@example.com"),
	(uuid!("e1371f4f-2c2e-46f4-9cf4-bb8f2435c997"), "caren", "caren@example.com"),
	(uuid!("44d2fa2d-1b4f-4ee2-94c0-0e3e8b0a44f6"), "dave", "dave@example.com"),
];

/// (id, index of the author in [`USERS`], title, content)
const POSTS: [(Uuid, usize, &str, &str); 6] = [
	(
		uuid!("bafd83e8-4532-4c2a-9246-3bcf3f3527e2"),
		0,
		"Exploring the Cosmos",
		"Today, I pondered the vastness of space and the mysteries it holds beyond our imagination.",
	),
	(
		uuid!("b88970aa-998f-4067-90b9-7c9b08a8d3b6"),
		1,
		"Why Cats Rule the Internet",
		"From memes to videos, cats have conquered our hearts and the digital world alike.",
	),
	(
		uuid!("f780bf43-cf9a-4b9b-a7fa-efc8a64759c4"),
		2,
		"The Art of Making Pizza",
		"Nothing brings people together like the smell of a freshly baked pizza in the kitchen.",
	),
	(
		uuid!("965b87cf-1b93-4860-8f0e-1373d4bc8222"),
		0,
		"Running in the Rain",
		"Despite the gloomy weather, today's run was refreshing and oddly peaceful.",
	),
	(
		uuid!("c4f6e67d-49b2-456f-8aa2-76bb0b9b03b2"),
		1,
		"Tech Trends in 2025",
		"Artificial intelligence and quantum computing are shaping our future in surprising ways.",
	),
	(
		uuid!("be0e11ca-b1e8-4a17-98f7-3eac2b4b13e2"),
		2,
		"A Quiet Morning",
		"The world seems to pause at sunrise, offering a moment of calm before the day begins.",
	),
];

/// Inserts the sample data, unless the store already holds any user.
///
/// Returns whether anything was inserted.
pub async fn run(store: &Store) -> store::Result<bool> {
	if !store.users.find_all(1, 0).await?.is_empty() {
		tracing::debug!("store already has users, skipping seed");
		return Ok(false);
	}

	// Spread timestamps out so that ordering by creation time is stable
	let start = Utc::now() - Duration::minutes(60);
	let mut minute = 0;
	let mut at = || {
		minute += 1;
		start + Duration::minutes(minute)
	};

	for (id, username, email) in USERS {
		store
			.users
			.create(&User {
				id,
				username: username.into(),
				email: email.into(),
				created_at: at(),
			})
			.await?;
	}

	for (id, author, title, content) in POSTS {
		let created_at = at();

		store
			.posts
			.create(&Post {
				id,
				user_id: USERS[author].0,
				title: title.into(),
				content: content.into(),
				created_at,
				updated_at: created_at,
			})
			.await?;
	}

	tracing::info!(users = USERS.len(), posts = POSTS.len(), "seeded sample data");

	Ok(true)
}
