//! Field rules that depend only on the value being checked.
//!
//! Within a single field, checks run from the most basic (length, blank) to
//! the most specific, and the first failure is reported.

use super::{Error, Result};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MIN_LETTERS: usize = 2;
pub const TITLE_MIN_LENGTH: usize = 3;

fn is_number(value: &str) -> bool {
	value.parse::<f64>().is_ok()
}

pub fn non_blank(value: &str, field: &str) -> Result<()> {
	if value.trim().is_empty() {
		return Err(Error::invalid_input(format!("{field} must not be blank")));
	}

	Ok(())
}

pub fn username(value: &str) -> Result<()> {
	let value = value.trim();

	if value.chars().count() < USERNAME_MIN_LENGTH {
		return Err(Error::invalid_input(format!(
			"username must have at least {USERNAME_MIN_LENGTH} characters"
		)));
	}

	if is_number(value) {
		return Err(Error::invalid_input("username must not be a number"));
	}

	if value.chars().filter(|c| c.is_alphabetic()).count() < USERNAME_MIN_LETTERS {
		return Err(Error::invalid_input(format!(
			"username must contain at least {USERNAME_MIN_LETTERS} letters"
		)));
	}

	Ok(())
}

/// Rejects blank emails for callers of the service.
///
/// Over HTTP the address format is checked first, when the request body is
/// extracted, so a blank email there is reported as an invalid address on the
/// `email` field instead. Both are a 400.
pub fn email(value: &str) -> Result<()> {
	non_blank(value, "email")
}

pub fn title(value: &str) -> Result<()> {
	non_blank(value, "title")?;

	let value = value.trim();

	if is_number(value) {
		return Err(Error::invalid_input("title must not be a number"));
	}

	if value.chars().count() < TITLE_MIN_LENGTH {
		return Err(Error::invalid_input(format!(
			"title must have at least {TITLE_MIN_LENGTH} characters"
		)));
	}

	Ok(())
}

pub fn content(value: &str) -> Result<()> {
	non_blank(value, "content")
}

#[cfg(test)]
mod test {
	use super::*;

	fn message(result: Result<()>) -> String {
		match result {
			Err(Error::InvalidInput(message)) => message,
			other => panic!("expected invalid input, got {other:?}"),
		}
	}

	#[test]
	fn test_username_too_short() {
		for value in ["", "  ", "ab", " ab ", "é"] {
			assert_eq!(
				message(username(value)),
				"username must have at least 3 characters",
				"{value:?}"
			);
		}
	}

	#[test]
	fn test_username_numeric() {
		for value in ["123", "1.5e3", " 4567 ", "-12"] {
			assert_eq!(
				message(username(value)),
				"username must not be a number",
				"{value:?}"
			);
		}
	}

	#[test]
	fn test_username_needs_letters() {
		for value in ["a12", "1-2-3", "_9_"] {
			assert_eq!(
				message(username(value)),
				"username must contain at least 2 letters",
				"{value:?}"
			);
		}
	}

	#[test]
	fn test_username_valid() {
		for value in ["testuser01", "alice", "ab1", "jöhn"] {
			assert!(username(value).is_ok(), "{value:?}");
		}
	}

	#[test]
	fn test_non_blank() {
		assert_eq!(message(non_blank(" \t\n", "content")), "content must not be blank");
		assert_eq!(message(email("")), "email must not be blank");
		assert!(non_blank(" x ", "content").is_ok());
	}

	#[test]
	fn test_title() {
		assert_eq!(message(title("   ")), "title must not be blank");
		assert_eq!(message(title("2025")), "title must not be a number");
		assert_eq!(message(title("Hi")), "title must have at least 3 characters");
		assert!(title("My First Post").is_ok());
	}
}
