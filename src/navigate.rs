//! Navigation targets and the deferred-redirect machinery.
//!
//! Redirects are modeled as fire-once, cancellable timers: every scheduled
//! navigation is owned by a [`RedirectHandle`] that cancels the pending timer
//! when dropped, so a torn-down callback page can never navigate after the
//! fact. Callers that want the historical fire-and-forget behavior call
//! [`RedirectHandle::detach`].

#[cfg(feature = "tokio")] pub mod timer;

#[cfg(feature = "tokio")] pub use timer::*;

// self
use crate::_prelude::*;

/// Validated absolute application path (`/login`, `/dashboard`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Route(String);
impl Route {
	/// Creates a route after validating it is a non-empty absolute path.
	pub fn new(path: impl Into<String>) -> Result<Self, RouteError> {
		let path = path.into();

		if !path.starts_with('/') {
			return Err(RouteError::NotAbsolute { path });
		}

		Ok(Self(path))
	}

	/// Returns the route as a path string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for Route {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl From<Route> for String {
	fn from(route: Route) -> Self {
		route.0
	}
}
impl TryFrom<String> for Route {
	type Error = RouteError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Error returned when route validation fails.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum RouteError {
	/// The route does not start with `/`.
	#[error("Route `{path}` is not an absolute path.")]
	NotAbsolute {
		/// The rejected value.
		path: String,
	},
}

/// Redirect destinations used by the callback flow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectRoutes {
	/// Destination after a successful exchange.
	pub dashboard: Route,
	/// Destination after any failure.
	pub login: Route,
}
impl Default for RedirectRoutes {
	fn default() -> Self {
		Self { dashboard: Route("/dashboard".into()), login: Route("/login".into()) }
	}
}

/// Redirect delays used by the callback flow.
///
/// Failure redirects wait longer than success redirects so the user can read
/// the error message before leaving the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RedirectDelays {
	/// Delay before navigating to the dashboard.
	pub success: Duration,
	/// Delay before navigating back to login.
	pub failure: Duration,
}
impl RedirectDelays {
	/// Default delay before the dashboard redirect.
	pub const DEFAULT_SUCCESS: Duration = Duration::milliseconds(1_500);
	/// Default delay before the login redirect.
	pub const DEFAULT_FAILURE: Duration = Duration::seconds(3);

	/// Overrides the success delay; negative values clamp to zero.
	pub fn with_success(mut self, delay: Duration) -> Self {
		self.success = clamp(delay);

		self
	}

	/// Overrides the failure delay; negative values clamp to zero.
	pub fn with_failure(mut self, delay: Duration) -> Self {
		self.failure = clamp(delay);

		self
	}
}
impl Default for RedirectDelays {
	fn default() -> Self {
		Self { success: Self::DEFAULT_SUCCESS, failure: Self::DEFAULT_FAILURE }
	}
}

/// Host-side navigation sink.
///
/// Implementations route the user to the given path; the call is
/// fire-and-forget and must tolerate being superseded by user-initiated
/// navigation.
pub trait Navigator
where
	Self: 'static + Send + Sync,
{
	/// Navigates the host to the route.
	fn navigate(&self, route: &Route);
}

/// Timer backend that arms deferred redirects.
pub trait RedirectScheduler
where
	Self: 'static + Send + Sync,
{
	/// Arms a single redirect to `route` after `delay`, firing `navigator` once.
	fn schedule(
		&self,
		navigator: Arc<dyn Navigator>,
		route: Route,
		delay: Duration,
	) -> RedirectHandle;
}

/// Owner of one pending redirect.
///
/// Dropping the handle cancels the redirect if it has not fired yet; the timer
/// backend supplies the canceller. A handle without a canceller (see
/// [`RedirectHandle::already_armed`]) represents a backend that cannot cancel,
/// which keeps the type usable for schedulers with no such notion.
pub struct RedirectHandle {
	route: Route,
	delay: Duration,
	canceller: Option<Box<dyn FnOnce() + Send>>,
	detached: bool,
}
impl RedirectHandle {
	/// Creates a handle whose canceller aborts the pending timer.
	pub fn new(route: Route, delay: Duration, canceller: impl 'static + FnOnce() + Send) -> Self {
		Self { route, delay, canceller: Some(Box::new(canceller)), detached: false }
	}

	/// Creates a handle for a backend that cannot cancel an armed redirect.
	pub fn already_armed(route: Route, delay: Duration) -> Self {
		Self { route, delay, canceller: None, detached: false }
	}

	/// Destination of the scheduled redirect.
	pub fn route(&self) -> &Route {
		&self.route
	}

	/// Delay the redirect was armed with.
	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Lets the redirect fire even after this handle goes out of scope.
	pub fn detach(mut self) {
		self.detached = true;
	}

	/// Cancels the pending redirect immediately.
	pub fn cancel(mut self) {
		self.fire_canceller();
	}

	fn fire_canceller(&mut self) {
		if let Some(cancel) = self.canceller.take() {
			cancel();
		}
	}
}
impl Drop for RedirectHandle {
	fn drop(&mut self) {
		if !self.detached {
			self.fire_canceller();
		}
	}
}
impl Debug for RedirectHandle {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RedirectHandle")
			.field("route", &self.route)
			.field("delay", &self.delay)
			.field("detached", &self.detached)
			.finish_non_exhaustive()
	}
}

fn clamp(delay: Duration) -> Duration {
	if delay.is_negative() { Duration::ZERO } else { delay }
}
