#![cfg(feature = "reqwest")]

// crates.io
use httpmock::prelude::*;
// self
use nexora_callback::{
	error::{Error, TransientError},
	exchange::{ExchangeOutcome, ExchangeRequest, ExchangeService, HttpExchangeService},
	provider::ProviderKind,
	time::Duration,
	url::Url,
};

const SESSION_BODY: &str = "{\
\"status\":\"success\",\
\"message\":\"GitHub authentication successful\",\
\"user\":{\"id\":\"user-1\",\"email\":\"dev@nexora.dev\",\"name\":\"Dev\",\"credits\":25,\"subscription_tier\":\"free\"},\
\"access_token\":\"access-it\",\
\"refresh_token\":\"refresh-it\",\
\"expires_in\":86400}";

fn build_service(server: &MockServer) -> HttpExchangeService {
	let base = Url::parse(&server.base_url()).expect("Mock server base URL should parse.");

	HttpExchangeService::new(base).expect("HTTP exchange service should build.")
}

fn request() -> ExchangeRequest {
	ExchangeRequest::new(ProviderKind::GitHub, "valid-code", "valid-state")
}

#[tokio::test]
async fn successful_exchange_yields_a_session_grant() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/auth/github/callback")
				.query_param("code", "valid-code")
				.query_param("state", "valid-state");
			then.status(200).header("content-type", "application/json").body(SESSION_BODY);
		})
		.await;
	let service = build_service(&server);
	let outcome =
		service.exchange(request()).await.expect("Exchange should settle successfully.");

	mock.assert_async().await;

	let ExchangeOutcome::Granted(grant) = outcome else {
		panic!("Successful exchanges must yield a grant.");
	};

	assert_eq!(grant.access_token.expose(), "access-it");
	assert_eq!(grant.refresh_token.expose(), "refresh-it");
	assert_eq!(grant.expires_in, Duration::seconds(86_400));
	assert_eq!(grant.user.email, "dev@nexora.dev");
	assert_eq!(grant.user.credits, 25);
}

#[tokio::test]
async fn rejected_exchange_surfaces_the_backend_detail() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/github/callback");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"detail\":\"Failed to authenticate with GitHub\"}");
		})
		.await;
	let service = build_service(&server);
	let outcome =
		service.exchange(request()).await.expect("Denials settle as outcomes, not errors.");

	mock.assert_async().await;

	assert!(matches!(
		outcome,
		ExchangeOutcome::Denied { reason: Some(ref reason) }
			if reason == "Failed to authenticate with GitHub",
	));
}

#[tokio::test]
async fn non_json_rejections_are_denials_without_a_reason() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/github/callback");
			then.status(400).body("Bad Request");
		})
		.await;
	let service = build_service(&server);
	let outcome =
		service.exchange(request()).await.expect("Denials settle as outcomes, not errors.");

	assert!(matches!(outcome, ExchangeOutcome::Denied { reason: None }));
}

#[tokio::test]
async fn server_errors_are_classified_as_transient() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/github/callback");
			then.status(503).body("Service Unavailable");
		})
		.await;
	let service = build_service(&server);
	let err = service
		.exchange(request())
		.await
		.expect_err("Server errors should surface as transient failures.");

	assert!(matches!(
		err,
		Error::Transient(TransientError::ExchangeEndpoint { status: Some(503), .. }),
	));
}

#[tokio::test]
async fn malformed_success_payloads_are_classified_as_transient() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/github/callback");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":42}");
		})
		.await;
	let service = build_service(&server);
	let err = service
		.exchange(request())
		.await
		.expect_err("Malformed payloads should surface as errors.");

	assert!(matches!(
		err,
		Error::Transient(TransientError::ExchangeResponseParse { status: Some(200), .. }),
	));
}

#[tokio::test]
async fn provider_label_selects_the_endpoint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/google/callback");
			then.status(200).header("content-type", "application/json").body(SESSION_BODY);
		})
		.await;
	let service = build_service(&server);
	let outcome = service
		.exchange(ExchangeRequest::new(ProviderKind::Google, "code", "state"))
		.await
		.expect("Exchange should settle successfully.");

	mock.assert_async().await;

	assert!(matches!(outcome, ExchangeOutcome::Granted(_)));
}
