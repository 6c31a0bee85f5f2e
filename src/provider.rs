//! Identity providers supported by the NEXORA login surface.
//!
//! The module owns the provider labels used across the exchange contract and
//! observability fields, plus the authorization-start half of the round trip:
//! building the provider authorize URL with a fresh anti-forgery state.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{_prelude::*, error::ConfigError};

const STATE_LEN: usize = 32;

/// Third-party identity services NEXORA can sign users in with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
	#[default]
	/// GitHub OAuth (`user:email` scope).
	GitHub,
	/// Google OAuth (`openid email profile` scopes).
	Google,
}
impl ProviderKind {
	/// Returns the stable label used in endpoints, spans, and analytics props.
	pub const fn as_str(self) -> &'static str {
		match self {
			ProviderKind::GitHub => "github",
			ProviderKind::Google => "google",
		}
	}

	/// Authorization endpoint end-users are sent to.
	pub const fn authorization_endpoint(self) -> &'static str {
		match self {
			ProviderKind::GitHub => "https://github.com/login/oauth/authorize",
			ProviderKind::Google => "https://accounts.google.com/o/oauth2/v2/auth",
		}
	}

	/// Space-delimited scopes requested at authorization start.
	pub const fn default_scope(self) -> &'static str {
		match self {
			ProviderKind::GitHub => "user:email",
			ProviderKind::Google => "openid email profile",
		}
	}
}
impl Display for ProviderKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for ProviderKind {
	type Err = ProviderParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"github" => Ok(ProviderKind::GitHub),
			"google" => Ok(ProviderKind::Google),
			_ => Err(ProviderParseError { value: s.to_owned() }),
		}
	}
}

/// Error returned when a provider label is not recognized.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Unknown provider `{value}`.")]
pub struct ProviderParseError {
	/// The unrecognized label.
	pub value: String,
}

/// Authorization-start request that produces the provider authorize URL.
///
/// The `state` value is generated on construction and must be persisted by the
/// caller so the exchange collaborator can validate the echoed copy on
/// callback.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
	/// Provider being authorized against.
	pub provider: ProviderKind,
	/// OAuth client identifier registered with the provider.
	pub client_id: String,
	/// Redirect URI the provider sends the user back to.
	pub redirect_uri: Url,
	/// Anti-forgery state embedded in the authorize URL.
	pub state: String,
}
impl AuthorizationRequest {
	/// Creates a request with a fresh random state.
	pub fn new(provider: ProviderKind, client_id: impl Into<String>, redirect_uri: Url) -> Self {
		Self { provider, client_id: client_id.into(), redirect_uri, state: random_state() }
	}

	/// Overrides the generated state (mainly useful in tests).
	pub fn with_state(mut self, state: impl Into<String>) -> Self {
		self.state = state.into();

		self
	}

	/// Builds the fully-formed authorize URL end-users should be sent to.
	pub fn authorize_url(&self) -> Result<Url, ConfigError> {
		let mut url = Url::parse(self.provider.authorization_endpoint())
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		{
			let mut pairs = url.query_pairs_mut();

			pairs.append_pair("client_id", &self.client_id);
			pairs.append_pair("redirect_uri", self.redirect_uri.as_str());
			pairs.append_pair("scope", self.provider.default_scope());
			pairs.append_pair("state", &self.state);

			// Google requires the explicit response type and only issues refresh
			// tokens when offline access is requested with a consent prompt.
			if self.provider == ProviderKind::Google {
				pairs.append_pair("response_type", "code");
				pairs.append_pair("access_type", "offline");
				pairs.append_pair("prompt", "consent");
			}
		}

		Ok(url)
	}
}

fn random_state() -> String {
	rand::rng().sample_iter(Alphanumeric).take(STATE_LEN).map(char::from).collect()
}
