//! Inbound callback parameters parsed from the provider redirect.

// self
use crate::{_prelude::*, error::CallbackParamError};

/// Query parameters read once from the incoming callback request.
///
/// Empty values are normalized to `None` so a bare `?error=` never masquerades
/// as a provider-reported failure. When a key repeats, the first occurrence
/// wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
	/// Opaque authorization code issued by the provider.
	pub code: Option<String>,
	/// Anti-forgery state echoed by the provider.
	pub state: Option<String>,
	/// Optional provider-reported error string.
	pub error: Option<String>,
}
impl CallbackParams {
	/// Builds params from explicit values, normalizing empty strings to `None`.
	pub fn new(
		code: Option<impl Into<String>>,
		state: Option<impl Into<String>>,
		error: Option<impl Into<String>>,
	) -> Self {
		Self {
			code: code.and_then(non_empty),
			state: state.and_then(non_empty),
			error: error.and_then(non_empty),
		}
	}

	/// Reads the `code`/`state`/`error` parameters from a full callback URL.
	pub fn from_url(url: &Url) -> Self {
		Self::from_pairs(url.query_pairs())
	}

	/// Reads the parameters from a raw query string (without the leading `?`).
	pub fn from_query(query: &str) -> Self {
		Self::from_pairs(url::form_urlencoded::parse(query.as_bytes()))
	}

	/// Returns the required `code`/`state` pair or the specific missing-param error.
	///
	/// `code` is checked before `state` so the error order is deterministic;
	/// the presentation layer collapses both to the same generic message.
	pub fn required(&self) -> Result<(&str, &str), CallbackParamError> {
		let code = self.code.as_deref().ok_or(CallbackParamError::MissingCode)?;
		let state = self.state.as_deref().ok_or(CallbackParamError::MissingState)?;

		Ok((code, state))
	}

	fn from_pairs<'p>(pairs: impl Iterator<Item = (Cow<'p, str>, Cow<'p, str>)>) -> Self {
		let mut params = Self::default();

		for (key, value) in pairs {
			let slot = match key.as_ref() {
				"code" => &mut params.code,
				"state" => &mut params.state,
				"error" => &mut params.error,
				_ => continue,
			};

			if slot.is_none() {
				*slot = non_empty(value.into_owned());
			}
		}

		params
	}
}

fn non_empty(value: impl Into<String>) -> Option<String> {
	let value = value.into();

	if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn parses_standard_callback_urls() {
		let url = Url::parse("https://app.nexora.dev/auth/callback?code=abc&state=xyz")
			.expect("Callback URL fixture should parse successfully.");
		let params = CallbackParams::from_url(&url);

		assert_eq!(params.code.as_deref(), Some("abc"));
		assert_eq!(params.state.as_deref(), Some("xyz"));
		assert_eq!(params.error, None);
		assert_eq!(
			params.required().expect("Both required parameters should be present."),
			("abc", "xyz"),
		);
	}

	#[test]
	fn empty_values_are_treated_as_absent() {
		let params = CallbackParams::from_query("code=&state=xyz&error=");

		assert_eq!(params.code, None);
		assert_eq!(params.error, None);
		assert_eq!(params.required(), Err(CallbackParamError::MissingCode));
	}

	#[test]
	fn first_occurrence_wins_for_repeated_keys() {
		let params = CallbackParams::from_query("code=first&code=second&state=s");

		assert_eq!(params.code.as_deref(), Some("first"));
	}

	#[test]
	fn missing_state_is_reported_after_code() {
		let params = CallbackParams::from_query("code=abc");

		assert_eq!(params.required(), Err(CallbackParamError::MissingState));

		let params = CallbackParams::from_query("state=xyz");

		assert_eq!(params.required(), Err(CallbackParamError::MissingCode));
	}

	#[test]
	fn percent_encoded_errors_are_decoded() {
		let params = CallbackParams::from_query("error=access%5Fdenied");

		assert_eq!(params.error.as_deref(), Some("access_denied"));
	}
}
