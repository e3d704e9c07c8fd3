#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod ratelimit;
mod route;
mod seed;
mod service;
mod store;
#[cfg(test)]
mod test;
mod trace;

use std::{net::SocketAddr, process::ExitCode};

use sqlx::postgres::PgPoolOptions;
use tower_governor::GovernorLayer;

use crate::{
	config::Config,
	extract::ApiKeys,
	service::{PostService, UserService},
	store::Store,
};

pub type AppState = State;

/// The shared application state.
///
/// Handlers extract only the part they need through [`axum::extract::FromRef`].
#[derive(Clone, axum::extract::FromRef)]
pub struct State {
	pub users: UserService,
	pub posts: PostService,
	pub api_keys: ApiKeys,
}

impl State {
	pub fn new(store: &Store, api_keys: ApiKeys) -> Self {
		Self {
			users: UserService::new(store),
			posts: PostService::new(store),
			api_keys,
		}
	}
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
	#[error("invalid configuration: {0}")]
	Config(#[from] config::Error),
	#[error("failed to connect to database: {0}")]
	Database(#[from] sqlx::Error),
	#[error("failed to run migrations: {0}")]
	Migrate(#[from] sqlx::migrate::MigrateError),
	#[error("failed to seed sample data: {0}")]
	Seed(#[from] store::Error),
	#[error("invalid rate limit quota")]
	RateLimit,
	#[error("server error: {0}")]
	Io(#[from] std::io::Error),
}

async fn connect(config: &Config) -> Result<Store, StartupError> {
	let Some(ref url) = config.database_url else {
		tracing::warn!("DATABASE_URL is not set, keeping data in memory");
		return Ok(Store::memory());
	};

	let database = PgPoolOptions::new()
		.max_connections(config.database_max_connections)
		.connect(url)
		.await?;

	sqlx::migrate!().run(&database).await?;
	tracing::info!("database migrations applied");

	Ok(Store::postgres(database))
}

async fn run(config: Result<Config, config::Error>) -> Result<(), StartupError> {
	let config = config?;
	let store = connect(&config).await?;

	if config.seed {
		seed::run(&store).await?;
	}

	if config.api_key.is_none() {
		tracing::warn!("API_KEY is not set, mutating routes are open");
	}

	let state = State::new(&store, ApiKeys::new(config.api_key));
	let mut app = route::router(state);

	if config.rate_limit {
		let governor = ratelimit::per_ip().ok_or(StartupError::RateLimit)?;

		ratelimit::cleanup_old_limits(&governor);
		app = app.layer(GovernorLayer { config: governor });
	}

	let listener = tokio::net::TcpListener::bind((config.host, config.port)).await?;

	tracing::info!("listening on {}", listener.local_addr()?);

	axum::serve(
		listener,
		app.into_make_service_with_connect_info::<SocketAddr>(),
	)
	.await?;

	Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
	// Read before the subscriber is installed so `.env` can set RUST_LOG
	let config = Config::from_env();

	trace::init();

	match run(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(error) => {
			tracing::error!(%error, "failed to start");
			ExitCode::FAILURE
		}
	}
}
