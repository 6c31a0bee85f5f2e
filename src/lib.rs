//! NEXORA's OAuth callback flow—parse the provider redirect once, delegate the
//! code exchange, settle exactly one terminal presentation state, and schedule
//! a single cancellable deferred navigation.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod analytics;
pub mod callback;
pub mod error;
pub mod exchange;
pub mod flows;
pub mod navigate;
pub mod obs;
pub mod provider;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! In-memory collaborator doubles and helpers for flow tests; enabled via
	//! `cfg(test)` or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		analytics::AnalyticsSink,
		exchange::{
			BoxFuture, ExchangeOutcome, ExchangeRequest, ExchangeService, SessionGrant,
			SessionSecret, UserSummary,
		},
		flows::CallbackFlow,
		navigate::{Navigator, RedirectHandle, RedirectScheduler, Route},
	};

	/// Exchange double that answers a single pre-canned outcome and records
	/// every request it receives.
	pub struct StaticExchange {
		outcome: Mutex<Option<Result<ExchangeOutcome>>>,
		requests: Mutex<Vec<ExchangeRequest>>,
	}
	impl StaticExchange {
		/// Double that grants the given session.
		pub fn granted(session: SessionGrant) -> Self {
			Self::with_outcome(Ok(ExchangeOutcome::Granted(session)))
		}

		/// Double that denies with an optional reason.
		pub fn denied(reason: Option<&str>) -> Self {
			Self::with_outcome(Ok(ExchangeOutcome::Denied { reason: reason.map(Into::into) }))
		}

		/// Double whose exchange call fails outright.
		pub fn failing(error: Error) -> Self {
			Self::with_outcome(Err(error))
		}

		/// Requests seen so far.
		pub fn requests(&self) -> Vec<ExchangeRequest> {
			self.requests.lock().clone()
		}

		fn with_outcome(outcome: Result<ExchangeOutcome>) -> Self {
			Self { outcome: Mutex::new(Some(outcome)), requests: Mutex::new(Vec::new()) }
		}
	}
	impl ExchangeService for StaticExchange {
		fn exchange(&self, request: ExchangeRequest) -> BoxFuture<'_, Result<ExchangeOutcome>> {
			self.requests.lock().push(request);

			let outcome = self.outcome.lock().take();

			Box::pin(async move { outcome.expect("StaticExchange outcome already consumed.") })
		}
	}

	/// Navigator double that records visited routes.
	#[derive(Default)]
	pub struct RecordingNavigator(Mutex<Vec<String>>);
	impl RecordingNavigator {
		/// Routes navigated to, in order.
		pub fn visited(&self) -> Vec<String> {
			self.0.lock().clone()
		}
	}
	impl Navigator for RecordingNavigator {
		fn navigate(&self, route: &Route) {
			self.0.lock().push(route.as_str().to_owned());
		}
	}

	/// Scheduler double that records armed redirects without ever firing them.
	#[derive(Default)]
	pub struct ManualScheduler(Mutex<Vec<(Route, Duration)>>);
	impl ManualScheduler {
		/// Redirects armed so far, as `(route, delay)` pairs.
		pub fn scheduled(&self) -> Vec<(Route, Duration)> {
			self.0.lock().clone()
		}
	}
	impl RedirectScheduler for ManualScheduler {
		fn schedule(
			&self,
			_navigator: Arc<dyn Navigator>,
			route: Route,
			delay: Duration,
		) -> RedirectHandle {
			self.0.lock().push((route.clone(), delay));

			RedirectHandle::already_armed(route, delay)
		}
	}

	/// Analytics double that captures emitted events.
	#[derive(Default)]
	pub struct CapturingAnalytics(Mutex<Vec<(String, serde_json::Value)>>);
	impl CapturingAnalytics {
		/// Events captured so far, as `(name, properties)` pairs.
		pub fn events(&self) -> Vec<(String, serde_json::Value)> {
			self.0.lock().clone()
		}
	}
	impl AnalyticsSink for CapturingAnalytics {
		fn track(&self, event: &str, properties: serde_json::Value) {
			self.0.lock().push((event.to_owned(), properties));
		}
	}

	/// Shared view of every collaborator double behind a test flow.
	pub struct TestHarness {
		/// The exchange double.
		pub exchange: Arc<StaticExchange>,
		/// The navigator double.
		pub navigator: Arc<RecordingNavigator>,
		/// The scheduler double.
		pub scheduler: Arc<ManualScheduler>,
		/// The analytics double.
		pub analytics: Arc<CapturingAnalytics>,
	}
	impl TestHarness {
		/// Number of exchange invocations so far.
		pub fn exchange_calls(&self) -> usize {
			self.exchange.requests().len()
		}

		/// Requests the exchange double has seen.
		pub fn exchange_requests(&self) -> Vec<ExchangeRequest> {
			self.exchange.requests()
		}

		/// Captured analytics events.
		pub fn analytics_events(&self) -> Vec<(String, serde_json::Value)> {
			self.analytics.events()
		}

		/// Redirects armed by the flow.
		pub fn scheduled_redirects(&self) -> Vec<(Route, Duration)> {
			self.scheduler.scheduled()
		}
	}

	/// Session grant used across flow tests.
	pub fn session_grant_fixture() -> SessionGrant {
		SessionGrant::new(
			SessionSecret::new("access-fixture"),
			SessionSecret::new("refresh-fixture"),
			Duration::hours(24),
			UserSummary {
				id: "user-fixture".into(),
				email: "dev@nexora.dev".into(),
				name: "Dev".into(),
				credits: 25,
				subscription_tier: "free".into(),
			},
		)
		.expect("Session grant fixture should build.")
	}

	/// Builds a flow wired to fresh collaborator doubles.
	pub fn build_test_flow(exchange: StaticExchange) -> (CallbackFlow<StaticExchange>, TestHarness)
	{
		let exchange = Arc::new(exchange);
		let navigator = Arc::new(RecordingNavigator::default());
		let scheduler = Arc::new(ManualScheduler::default());
		let analytics = Arc::new(CapturingAnalytics::default());
		let flow =
			CallbackFlow::with_ports(exchange.clone(), navigator.clone(), scheduler.clone())
				.with_analytics(analytics.clone());

		(flow, TestHarness { exchange, navigator, scheduler, analytics })
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::HashMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use time;
pub use url;
#[cfg(test)] use httpmock as _;
