//! Settings read from the process environment.

use std::{
	net::{IpAddr, Ipv4Addr},
	str::FromStr,
};

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{key} has an invalid value {value:?}: {reason}")]
	Invalid {
		key: &'static str,
		value: String,
		reason: String,
	},
}

#[derive(Debug, Clone)]
pub struct Config {
	pub host: IpAddr,
	pub port: u16,
	/// Postgres connection string. Without one, data is kept in memory.
	pub database_url: Option<String>,
	pub database_max_connections: u32,
	/// The key mutating requests must present in `X-API-Key`.
	pub api_key: Option<String>,
	/// Whether to insert sample data into an empty store.
	pub seed: bool,
	pub rate_limit: bool,
}

impl Config {
	/// Reads `.env` if present, then the process environment.
	pub fn from_env() -> Result<Self, Error> {
		dotenvy::dotenv().ok();

		Self::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
		let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

		Ok(Self {
			host: parse(&get, "HOST")?.unwrap_or(DEFAULT_HOST),
			port: parse(&get, "PORT")?.unwrap_or(DEFAULT_PORT),
			database_url: get("DATABASE_URL"),
			database_max_connections: parse(&get, "DATABASE_MAX_CONNECTIONS")?
				.unwrap_or(DEFAULT_MAX_CONNECTIONS),
			api_key: get("API_KEY"),
			seed: flag(&get, "SEED")?.unwrap_or(true),
			rate_limit: flag(&get, "RATE_LIMIT")?.unwrap_or(true),
		})
	}
}

fn parse<T>(get: impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, Error>
where
	T: FromStr,
	T::Err: std::fmt::Display,
{
	get(key)
		.map(|value| {
			value.trim().parse().map_err(|e: T::Err| Error::Invalid {
				key,
				reason: e.to_string(),
				value,
			})
		})
		.transpose()
}

fn flag(get: impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<bool>, Error> {
	get(key)
		.map(|value| match value.trim().to_ascii_lowercase().as_str() {
			"1" | "true" | "yes" | "on" => Ok(true),
			"0" | "false" | "no" | "off" => Ok(false),
			_ => Err(Error::Invalid {
				key,
				value,
				reason: "expected a boolean".into(),
			}),
		})
		.transpose()
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::*;

	fn config(vars: &[(&str, &str)]) -> Result<Config, Error> {
		let vars = vars
			.iter()
			.map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
			.collect::<HashMap<_, _>>();

		Config::from_lookup(|key| vars.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();

		assert_eq!(config.host.to_string(), "127.0.0.1");
		assert_eq!(config.port, DEFAULT_PORT);
		assert_eq!(config.database_url, None);
		assert_eq!(config.database_max_connections, DEFAULT_MAX_CONNECTIONS);
		assert_eq!(config.api_key, None);
		assert!(config.seed);
		assert!(config.rate_limit);
	}

	#[test]
	fn test_overrides() {
		let config = config(&[
			("HOST", "0.0.0.0"),
			("PORT", "8080"),
			("DATABASE_URL", "postgres://localhost/blog"),
			("API_KEY", "secret"),
			("SEED", "false"),
			("RATE_LIMIT", "0"),
		])
		.unwrap();

		assert_eq!(config.host.to_string(), "0.0.0.0");
		assert_eq!(config.port, 8080);
		assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/blog"));
		assert_eq!(config.api_key.as_deref(), Some("secret"));
		assert!(!config.seed);
		assert!(!config.rate_limit);
	}

	#[test]
	fn test_blank_values_are_unset() {
		let config = config(&[("API_KEY", "  "), ("PORT", "")]).unwrap();

		assert_eq!(config.api_key, None);
		assert_eq!(config.port, DEFAULT_PORT);
	}

	#[test]
	fn test_invalid_values_name_the_key() {
		let error = config(&[("PORT", "eighty")]).unwrap_err();
		assert!(error.to_string().starts_with("PORT has an invalid value \"eighty\""));

		let error = config(&[("SEED", "maybe")]).unwrap_err();
		assert!(matches!(error, Error::Invalid { key: "SEED", .. }));
	}
}
