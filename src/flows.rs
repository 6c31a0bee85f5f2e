//! The OAuth callback flow orchestrator.
//!
//! [`CallbackFlow`] completes a single redirect round trip: read the callback
//! parameters once, delegate the code/state exchange to the injected
//! collaborator, settle exactly one terminal presentation state, and schedule
//! exactly one deferred redirect. `run` consumes the flow, so a second
//! invocation (and with it a second network call) is impossible at the type
//! level.

// self
use crate::{
	_prelude::*,
	analytics::{AnalyticsSink, LOGIN_EVENT, NoopAnalytics, login_properties},
	callback::{CallbackParams, CallbackReport, CallbackStatus, StatusSlot},
	exchange::{ExchangeOutcome, ExchangeRequest, ExchangeService, SessionGrant},
	navigate::{Navigator, RedirectDelays, RedirectRoutes, RedirectScheduler},
	obs::{CallbackOutcome, CallbackSpan, record_callback_outcome},
	provider::ProviderKind,
};
#[cfg(all(feature = "reqwest", feature = "tokio"))]
use crate::{
	error::ConfigError, exchange::HttpExchangeService, navigate::TokioRedirectScheduler,
};

/// Coordinates one OAuth callback round trip against a single provider.
///
/// The flow owns references to its four ports (exchange, navigator, redirect
/// scheduler, analytics) plus the provider label, redirect routes, and delays.
/// The [`StatusSlot`] is cloneable; presenters grab a copy via
/// [`CallbackFlow::status`] before calling [`CallbackFlow::run`] and keep
/// observing it afterwards.
pub struct CallbackFlow<E>
where
	E: ?Sized + ExchangeService,
{
	/// Exchange collaborator invoked at most once per run.
	pub exchange: Arc<E>,
	/// Host navigation sink fired by the scheduled redirect.
	pub navigator: Arc<dyn Navigator>,
	/// Timer backend arming the deferred redirect.
	pub scheduler: Arc<dyn RedirectScheduler>,
	/// Best-effort analytics sink.
	pub analytics: Arc<dyn AnalyticsSink>,
	/// Provider the callback is expected from.
	pub provider: ProviderKind,
	/// Redirect destinations.
	pub routes: RedirectRoutes,
	/// Redirect delays.
	pub delays: RedirectDelays,
	status: StatusSlot,
}
impl<E> CallbackFlow<E>
where
	E: ?Sized + ExchangeService,
{
	/// Message rendered when the exchange succeeds.
	pub const SUCCESS_MESSAGE: &'static str = "Login successful! Redirecting to your dashboard…";

	/// Creates a flow over caller-provided ports with default provider,
	/// routes, and delays.
	pub fn with_ports(
		exchange: impl Into<Arc<E>>,
		navigator: Arc<dyn Navigator>,
		scheduler: Arc<dyn RedirectScheduler>,
	) -> Self {
		Self {
			exchange: exchange.into(),
			navigator,
			scheduler,
			analytics: Arc::new(NoopAnalytics),
			provider: ProviderKind::default(),
			routes: RedirectRoutes::default(),
			delays: RedirectDelays::default(),
			status: StatusSlot::new(),
		}
	}

	/// Sets the analytics sink (defaults to [`NoopAnalytics`]).
	pub fn with_analytics(mut self, analytics: Arc<dyn AnalyticsSink>) -> Self {
		self.analytics = analytics;

		self
	}

	/// Sets the provider (defaults to GitHub).
	pub fn with_provider(mut self, provider: ProviderKind) -> Self {
		self.provider = provider;

		self
	}

	/// Overrides the redirect destinations.
	pub fn with_routes(mut self, routes: RedirectRoutes) -> Self {
		self.routes = routes;

		self
	}

	/// Overrides the redirect delays.
	pub fn with_delays(mut self, delays: RedirectDelays) -> Self {
		self.delays = delays;

		self
	}

	/// Returns a clone of the status slot for the presentation layer.
	pub fn status(&self) -> StatusSlot {
		self.status.clone()
	}

	/// Runs the flow to its terminal state.
	///
	/// Consumes the flow: every path settles the status slot exactly once and
	/// schedules exactly one redirect, whose [`RedirectHandle`] rides on the
	/// returned report.
	///
	/// [`RedirectHandle`]: crate::navigate::RedirectHandle
	pub async fn run(self, params: CallbackParams) -> CallbackReport {
		record_callback_outcome(self.provider, CallbackOutcome::Attempt);

		let span = CallbackSpan::new(self.provider, "run");

		match span.instrument(self.evaluate(&params)).await {
			Ok(session) => self.succeed(session),
			Err(failure) => self.fail(failure),
		}
	}

	/// Applies the transition rules and performs the delegated exchange.
	///
	/// The provider-reported `error` wins over everything else, then missing
	/// parameters, then the exchange result. The single `.await` on the
	/// exchange call is the flow's sole suspension point.
	async fn evaluate(&self, params: &CallbackParams) -> Result<SessionGrant> {
		if let Some(reason) = &params.error {
			return Err(Error::Provider { reason: reason.clone() });
		}

		let (code, state) = params.required()?;
		let request = ExchangeRequest::new(self.provider, code, state);

		match self.exchange.exchange(request).await? {
			ExchangeOutcome::Granted(session) => Ok(session),
			ExchangeOutcome::Denied { reason } => Err(Error::Exchange {
				reason: reason.unwrap_or_else(|| Error::GENERIC_FAILURE_MESSAGE.into()),
			}),
		}
	}

	fn succeed(self, session: SessionGrant) -> CallbackReport {
		self.status.settle(CallbackStatus::Succeeded, Self::SUCCESS_MESSAGE);
		self.analytics.track(LOGIN_EVENT, login_properties(self.provider));
		record_callback_outcome(self.provider, CallbackOutcome::Success);

		let redirect = self.scheduler.schedule(
			self.navigator.clone(),
			self.routes.dashboard.clone(),
			self.delays.success,
		);

		CallbackReport {
			status: CallbackStatus::Succeeded,
			message: Self::SUCCESS_MESSAGE.into(),
			session: Some(session),
			failure: None,
			redirect,
		}
	}

	fn fail(self, failure: Error) -> CallbackReport {
		let message = failure.user_message();

		self.status.settle(CallbackStatus::Failed, message.clone());
		record_callback_outcome(self.provider, CallbackOutcome::Failure);

		let redirect = self.scheduler.schedule(
			self.navigator.clone(),
			self.routes.login.clone(),
			self.delays.failure,
		);

		CallbackReport {
			status: CallbackStatus::Failed,
			message,
			session: None,
			failure: Some(failure),
			redirect,
		}
	}
}
#[cfg(all(feature = "reqwest", feature = "tokio"))]
impl CallbackFlow<HttpExchangeService> {
	/// Creates a flow over the default HTTP exchange + tokio timer stack.
	///
	/// `base_url` points at the NEXORA backend; the flow provisions its own
	/// reqwest-backed exchange service so callers only supply the navigator.
	pub fn new(base_url: Url, navigator: Arc<dyn Navigator>) -> Result<Self, ConfigError> {
		Ok(Self::with_ports(
			HttpExchangeService::new(base_url)?,
			navigator,
			Arc::new(TokioRedirectScheduler),
		))
	}
}
impl<E> Debug for CallbackFlow<E>
where
	E: ?Sized + ExchangeService,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackFlow")
			.field("provider", &self.provider)
			.field("routes", &self.routes)
			.field("delays", &self.delays)
			.field("status", &self.status.snapshot())
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::*,
		error::{TransientError, TransportError},
	};

	#[tokio::test]
	async fn provider_error_fails_without_calling_the_exchange() {
		let (flow, harness) = build_test_flow(StaticExchange::denied(None));
		let slot = flow.status();
		let report =
			flow.run(CallbackParams::from_query("error=access_denied&code=abc&state=xyz")).await;

		assert_eq!(report.status, CallbackStatus::Failed);
		assert!(report.message.contains("access_denied"));
		assert_eq!(harness.exchange_calls(), 0, "Provider errors must short-circuit.");
		assert_eq!(report.redirect.route().as_str(), "/login");
		assert_eq!(report.redirect.delay(), RedirectDelays::DEFAULT_FAILURE);
		assert_eq!(slot.snapshot().status, CallbackStatus::Failed);
	}

	#[tokio::test]
	async fn missing_params_fail_with_the_generic_message() {
		for query in ["code=abc", "state=xyz", ""] {
			let (flow, harness) = build_test_flow(StaticExchange::denied(None));
			let report = flow.run(CallbackParams::from_query(query)).await;

			assert_eq!(report.status, CallbackStatus::Failed);
			assert_eq!(report.message, Error::INVALID_PARAMS_MESSAGE);
			assert_eq!(harness.exchange_calls(), 0);
			assert_eq!(report.redirect.route().as_str(), "/login");
		}
	}

	#[tokio::test]
	async fn granted_exchange_succeeds_and_emits_analytics() {
		let (flow, harness) = build_test_flow(StaticExchange::granted(session_grant_fixture()));
		let slot = flow.status();
		let report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(report.status, CallbackStatus::Succeeded);
		assert!(report.succeeded());
		assert!(report.session.is_some());
		assert!(report.failure.is_none());
		assert_eq!(report.redirect.route().as_str(), "/dashboard");
		assert_eq!(report.redirect.delay(), RedirectDelays::DEFAULT_SUCCESS);
		assert_eq!(slot.snapshot().message, CallbackFlow::<StaticExchange>::SUCCESS_MESSAGE);

		let requests = harness.exchange_requests();

		assert_eq!(requests.len(), 1);
		assert_eq!(requests[0].provider, ProviderKind::GitHub);
		assert_eq!(requests[0].code, "abc");
		assert_eq!(requests[0].state, "xyz");

		let events = harness.analytics_events();

		assert_eq!(events.len(), 1);
		assert_eq!(events[0].0, LOGIN_EVENT);
		assert_eq!(events[0].1, serde_json::json!({ "method": "github" }));
	}

	#[tokio::test]
	async fn denied_exchange_passes_the_reason_through() {
		let (flow, harness) =
			build_test_flow(StaticExchange::denied(Some("Failed to authenticate with GitHub")));
		let report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(report.status, CallbackStatus::Failed);
		assert_eq!(report.message, "Failed to authenticate with GitHub");
		assert!(harness.analytics_events().is_empty(), "Failures must not emit analytics.");
	}

	#[tokio::test]
	async fn denied_exchange_without_reason_falls_back() {
		let (flow, _harness) = build_test_flow(StaticExchange::denied(None));
		let report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(report.message, Error::GENERIC_FAILURE_MESSAGE);
	}

	#[tokio::test]
	async fn transport_failures_fall_back_to_the_generic_message() {
		let (flow, harness) = build_test_flow(StaticExchange::failing(
			TransportError::Io(std::io::Error::other("connection reset")).into(),
		));
		let report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(report.status, CallbackStatus::Failed);
		assert_eq!(report.message, Error::GENERIC_FAILURE_MESSAGE);
		assert!(matches!(report.failure, Some(Error::Transport(_))));
		assert_eq!(harness.exchange_calls(), 1);
	}

	#[tokio::test]
	async fn malformed_exchange_payloads_fall_back_to_the_generic_message() {
		let (flow, _harness) = build_test_flow(StaticExchange::failing(
			TransientError::ExchangeEndpoint { message: "html error page".into(), status: Some(502) }
				.into(),
		));
		let report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(report.message, Error::GENERIC_FAILURE_MESSAGE);
	}

	#[tokio::test]
	async fn every_run_schedules_exactly_one_redirect() {
		let (flow, harness) = build_test_flow(StaticExchange::granted(session_grant_fixture()));
		let _report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(harness.scheduled_redirects().len(), 1);
	}

	#[tokio::test]
	async fn custom_provider_label_reaches_the_exchange_and_analytics() {
		let (flow, harness) = build_test_flow(StaticExchange::granted(session_grant_fixture()));
		let flow = flow.with_provider(ProviderKind::Google);
		let _report = flow.run(CallbackParams::from_query("code=abc&state=xyz")).await;

		assert_eq!(harness.exchange_requests()[0].provider, ProviderKind::Google);
		assert_eq!(harness.analytics_events()[0].1, serde_json::json!({ "method": "google" }));
	}
}
