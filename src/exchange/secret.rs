//! Redacted wrapper for session token material.

// self
use crate::_prelude::*;

/// Session token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSecret(String);
impl SessionSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for SessionSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for SessionSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("SessionSecret").field(&"<redacted>").finish()
	}
}
impl Display for SessionSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}
