//! Flow-level error types shared across the callback, exchange, and navigation layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical callback-flow error exposed by public APIs.
///
/// The taxonomy mirrors the three user-visible failure classes of the callback
/// page (provider-reported error, malformed callback, rejected exchange) plus
/// the transport/configuration failures that can surface beneath them. Every
/// variant renders to a short, displayable message via [`Error::user_message`].
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Callback request is missing a required parameter.
	#[error(transparent)]
	InvalidCallback(#[from] CallbackParamError),
	/// Temporary upstream failure; the user may retry from the login screen.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Identity provider reported an error on the redirect itself.
	#[error("Provider returned an error: {reason}.")]
	Provider {
		/// Error string echoed by the provider in the callback query.
		reason: String,
	},
	/// Exchange collaborator rejected the code/state pair.
	#[error("Exchange was rejected: {reason}.")]
	Exchange {
		/// Displayable reason reported by the exchange collaborator.
		reason: String,
	},
}
impl Error {
	/// Generic fallback shown when no specific reason is available.
	pub const GENERIC_FAILURE_MESSAGE: &'static str = "Authentication failed. Please try again.";
	/// Message shown when required callback parameters are absent.
	pub const INVALID_PARAMS_MESSAGE: &'static str = "Invalid callback parameters.";

	/// Renders the short, user-displayable message for this failure.
	///
	/// Provider errors keep the provider's text visible, exchange denials pass
	/// the collaborator's reason through verbatim, and everything else falls
	/// back to a generic retry prompt so internal details never reach the
	/// screen.
	pub fn user_message(&self) -> String {
		match self {
			Self::Provider { reason } => format!("Authentication failed: {reason}"),
			Self::InvalidCallback(_) => Self::INVALID_PARAMS_MESSAGE.into(),
			Self::Exchange { reason } => reason.clone(),
			Self::Config(_) | Self::Transient(_) | Self::Transport(_) =>
				Self::GENERIC_FAILURE_MESSAGE.into(),
		}
	}
}

/// Validation failures for the inbound callback query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum CallbackParamError {
	/// The `code` parameter is absent or empty.
	#[error("Callback is missing the authorization code.")]
	MissingCode,
	/// The `state` parameter is absent or empty.
	#[error("Callback is missing the anti-forgery state.")]
	MissingState,
}

/// Configuration and validation failures raised by the flow.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// An endpoint URL could not be parsed or joined.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Session grant carried a non-positive `expires_in`.
	#[error("The expires_in value must be positive.")]
	NonPositiveExpiresIn,
	/// Redirect route is not an absolute path.
	#[error("Route is invalid.")]
	InvalidRoute(#[from] crate::navigate::RouteError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Temporary failure variants (safe to retry from the login screen).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Exchange endpoint returned an unexpected but non-fatal response.
	#[error("Exchange endpoint returned an unexpected response: {message}.")]
	ExchangeEndpoint {
		/// Summary of the unexpected response.
		message: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Exchange endpoint responded with malformed JSON that could not be parsed.
	#[error("Exchange endpoint returned malformed JSON.")]
	ExchangeResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::error::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the exchange endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the exchange endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
