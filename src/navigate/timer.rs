//! Tokio-backed redirect timer.

// self
use crate::{
	_prelude::*,
	navigate::{Navigator, RedirectHandle, RedirectScheduler, Route},
};

/// Scheduler that arms redirects on the ambient tokio runtime.
///
/// Each redirect is a spawned task sleeping for the requested delay; the
/// returned [`RedirectHandle`] aborts the task on cancellation, so dropping
/// the handle before the delay elapses suppresses the navigation entirely.
/// Must be called from within a tokio runtime context.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioRedirectScheduler;
impl RedirectScheduler for TokioRedirectScheduler {
	fn schedule(
		&self,
		navigator: Arc<dyn Navigator>,
		route: Route,
		delay: Duration,
	) -> RedirectHandle {
		let sleep = std::time::Duration::from_millis(delay.whole_milliseconds().max(0) as u64);
		let target = route.clone();
		let task = tokio::spawn(async move {
			tokio::time::sleep(sleep).await;

			navigator.navigate(&target);
		});

		RedirectHandle::new(route, delay, move || task.abort())
	}
}
