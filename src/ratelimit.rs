use std::{sync::Arc, time::Duration};

use axum::{
	body::Body,
	response::{IntoResponse, Response},
};
use governor::{
	clock::QuantaInstant,
	middleware::{RateLimitingMiddleware, StateInformationMiddleware},
};
use tower_governor::{
	governor::{GovernorConfig, GovernorConfigBuilder},
	key_extractor::{KeyExtractor, PeerIpKeyExtractor},
	GovernorError,
};

use crate::error::AppError;

pub type Config = GovernorConfig<PeerIpKeyExtractor, StateInformationMiddleware>;

const PER_SECOND: u64 = 10;
const BURST_SIZE: u32 = 50;
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Limits each peer address to a steady rate with some room for bursts.
///
/// Returns `None` if the quota is invalid.
pub fn per_ip() -> Option<Arc<Config>> {
	GovernorConfigBuilder::default()
		.per_second(PER_SECOND)
		.burst_size(BURST_SIZE)
		.use_headers()
		.error_handler(error_handler)
		.finish()
		.map(Arc::new)
}

fn error_handler(error: GovernorError) -> Response<Body> {
	AppError::from(error).into_response()
}

/// Periodically forgets peers that have not been seen recently, so the
/// limiter does not grow without bound.
pub fn cleanup_old_limits<T, M>(config: &Arc<GovernorConfig<T, M>>)
where
	T: KeyExtractor,
	<T as KeyExtractor>::Key: Send + Sync + 'static,
	M: RateLimitingMiddleware<QuantaInstant> + Send + Sync + 'static,
{
	let limiter = config.limiter().clone();

	tokio::spawn(async move {
		let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

		loop {
			interval.tick().await;

			tracing::debug!("rate limiting storage size: {}", limiter.len());
			limiter.retain_recent();
		}
	});
}
