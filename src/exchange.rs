//! Delegated exchange port: trade the provider's `code`/`state` pair for an
//! authenticated NEXORA session.
//!
//! The flow performs at most one outbound call, and this module owns its
//! contract. [`ExchangeService`] is the injectable collaborator; the default
//! [`HttpExchangeService`] implementation (behind the `reqwest` feature) talks
//! to the NEXORA backend's `/api/auth/{provider}/callback` endpoint. The
//! collaborator, not the flow, is responsible for validating `state` against
//! the anti-forgery value issued at authorization start.

#[cfg(feature = "reqwest")] pub mod http;
pub mod secret;

#[cfg(feature = "reqwest")] pub use http::*;
pub use secret::*;

// self
use crate::{_prelude::*, error::ConfigError, provider::ProviderKind};

/// Boxed future alias keeping collaborator traits object-safe.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Collaborator that completes the OAuth round trip.
///
/// Implementations must validate the echoed `state`, establish a session on
/// success, and report denials with short, user-displayable reasons. `Err` is
/// reserved for transport/parse failures; a well-formed rejection is
/// [`ExchangeOutcome::Denied`].
pub trait ExchangeService
where
	Self: 'static + Send + Sync,
{
	/// Performs the exchange for the given callback parameters.
	fn exchange(&self, request: ExchangeRequest) -> BoxFuture<'_, Result<ExchangeOutcome>>;
}

/// Parameters forwarded to the exchange collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
	/// Provider the authorization code was issued by.
	pub provider: ProviderKind,
	/// Opaque authorization code from the callback.
	pub code: String,
	/// Anti-forgery state echoed by the provider.
	pub state: String,
}
impl ExchangeRequest {
	/// Creates a request for the given provider and callback values.
	pub fn new(provider: ProviderKind, code: impl Into<String>, state: impl Into<String>) -> Self {
		Self { provider, code: code.into(), state: state.into() }
	}
}

/// Settled result of a delegated exchange.
#[derive(Clone, Debug)]
pub enum ExchangeOutcome {
	/// Session established; the user is authenticated.
	Granted(SessionGrant),
	/// Collaborator rejected the exchange.
	Denied {
		/// Displayable reason, when the collaborator supplied one.
		reason: Option<String>,
	},
}

/// Session material returned by the backend on a successful exchange.
#[derive(Clone, Debug)]
pub struct SessionGrant {
	/// Short-lived access token.
	pub access_token: SessionSecret,
	/// Long-lived refresh token.
	pub refresh_token: SessionSecret,
	/// Access token lifetime reported by the backend.
	pub expires_in: Duration,
	/// Signed-in user as the backend sees them.
	pub user: UserSummary,
}
impl SessionGrant {
	/// Builds a grant, rejecting non-positive lifetimes.
	pub fn new(
		access_token: SessionSecret,
		refresh_token: SessionSecret,
		expires_in: Duration,
		user: UserSummary,
	) -> Result<Self, ConfigError> {
		if !expires_in.is_positive() {
			return Err(ConfigError::NonPositiveExpiresIn);
		}

		Ok(Self { access_token, refresh_token, expires_in, user })
	}

	/// Absolute expiry computed from `now`.
	pub fn expires_at(&self, now: OffsetDateTime) -> OffsetDateTime {
		now + self.expires_in
	}
}

/// Account summary embedded in the exchange response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
	/// Stable user identifier.
	pub id: String,
	/// Primary email address.
	pub email: String,
	/// Display name.
	pub name: String,
	/// Remaining NEXORA credits.
	#[serde(default)]
	pub credits: i64,
	/// Subscription tier label.
	#[serde(default = "default_tier")]
	pub subscription_tier: String,
}

fn default_tier() -> String {
	"free".into()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn user() -> UserSummary {
		UserSummary {
			id: "user-1".into(),
			email: "dev@nexora.dev".into(),
			name: "Dev".into(),
			credits: 25,
			subscription_tier: "free".into(),
		}
	}

	#[test]
	fn grants_reject_non_positive_lifetimes() {
		let err = SessionGrant::new(
			SessionSecret::new("a"),
			SessionSecret::new("r"),
			Duration::ZERO,
			user(),
		)
		.expect_err("Zero lifetimes should be rejected.");

		assert!(matches!(err, ConfigError::NonPositiveExpiresIn));
	}

	#[test]
	fn expiry_is_relative_to_now() {
		let grant = SessionGrant::new(
			SessionSecret::new("a"),
			SessionSecret::new("r"),
			Duration::hours(24),
			user(),
		)
		.expect("Grant fixture should build.");
		let now = OffsetDateTime::UNIX_EPOCH;

		assert_eq!(grant.expires_at(now), now + Duration::hours(24));
	}

	#[test]
	fn user_summary_fills_missing_tier_and_credits() {
		let parsed: UserSummary = serde_json::from_str(
			"{\"id\":\"u\",\"email\":\"e@x\",\"name\":\"n\"}",
		)
		.expect("Partial user payload should deserialize.");

		assert_eq!(parsed.credits, 0);
		assert_eq!(parsed.subscription_tier, "free");
	}
}
