//! Reqwest-backed exchange collaborator targeting the NEXORA backend.

// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransientError, TransportError},
	exchange::{
		BoxFuture, ExchangeOutcome, ExchangeRequest, ExchangeService, SessionGrant, SessionSecret,
		UserSummary,
	},
	provider::ProviderKind,
};

/// Exchange collaborator that calls the backend callback endpoint over HTTP.
///
/// The backend exposes `GET /api/auth/{provider}/callback?code=&state=` and
/// answers either a session payload (2xx) or a problem document with a
/// displayable `detail` field (4xx). Server errors (5xx) are classified as
/// transient rather than denials. State validation and session persistence
/// happen server-side; this client only transports the result.
#[derive(Clone, Debug)]
pub struct HttpExchangeService {
	client: ReqwestClient,
	base_url: Url,
}
impl HttpExchangeService {
	/// Creates a service with a fresh reqwest client for the given backend base URL.
	///
	/// When `base_url` carries a path it must end with `/` for the callback
	/// endpoint to resolve beneath it.
	pub fn new(base_url: Url) -> Result<Self, ConfigError> {
		let client =
			ReqwestClient::builder().build().map_err(ConfigError::http_client_build)?;

		Ok(Self::with_client(client, base_url))
	}

	/// Wraps an existing reqwest client, e.g. one configured with timeouts.
	pub fn with_client(client: ReqwestClient, base_url: Url) -> Self {
		Self { client, base_url }
	}

	fn callback_endpoint(&self, provider: ProviderKind) -> Result<Url, ConfigError> {
		self.base_url
			.join(&format!("api/auth/{provider}/callback"))
			.map_err(|source| ConfigError::InvalidEndpoint { source })
	}
}
impl ExchangeService for HttpExchangeService {
	fn exchange(&self, request: ExchangeRequest) -> BoxFuture<'_, Result<ExchangeOutcome>> {
		Box::pin(async move {
			let url = self.callback_endpoint(request.provider)?;
			let response = self
				.client
				.get(url)
				.query(&[("code", request.code.as_str()), ("state", request.state.as_str())])
				.send()
				.await
				.map_err(TransportError::from)?;
			let status = response.status();
			let body = response.bytes().await.map_err(TransportError::from)?;

			if status.is_success() {
				let payload = parse_session_payload(&body, status.as_u16())?;

				Ok(ExchangeOutcome::Granted(payload.into_grant()?))
			} else if status.is_server_error() {
				// 5xx means the backend itself faltered, not that it rejected
				// the grant; surface it as transient rather than a denial.
				Err(TransientError::ExchangeEndpoint {
					message: format!("HTTP status {status}"),
					status: Some(status.as_u16()),
				}
				.into())
			} else {
				Ok(ExchangeOutcome::Denied { reason: parse_denial_reason(&body) })
			}
		})
	}
}

/// Success payload shape produced by the backend callback endpoint.
#[derive(Debug, Deserialize)]
struct SessionPayload {
	access_token: String,
	refresh_token: String,
	/// Lifetime in seconds.
	expires_in: i64,
	user: UserSummary,
}
impl SessionPayload {
	fn into_grant(self) -> Result<SessionGrant> {
		Ok(SessionGrant::new(
			SessionSecret::new(self.access_token),
			SessionSecret::new(self.refresh_token),
			Duration::seconds(self.expires_in),
			self.user,
		)?)
	}
}

/// Problem document returned on rejected exchanges.
#[derive(Debug, Deserialize)]
struct ProblemPayload {
	detail: Option<String>,
}

fn parse_session_payload(body: &[u8], status: u16) -> Result<SessionPayload, TransientError> {
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| TransientError::ExchangeResponseParse { source, status: Some(status) })
}

fn parse_denial_reason(body: &[u8]) -> Option<String> {
	let payload: ProblemPayload = serde_json::from_slice(body).ok()?;

	payload.detail.filter(|detail| !detail.is_empty())
}
