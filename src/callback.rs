//! Callback page domain: inbound parameters, the presentation status slot, and
//! the report handed back once the flow settles.

pub mod params;
pub mod status;

pub use params::*;
pub use status::*;

// self
use crate::{_prelude::*, exchange::SessionGrant, navigate::RedirectHandle};

/// Outcome of a completed callback flow run.
///
/// The report always carries a terminal [`CallbackStatus`] and the live
/// [`RedirectHandle`] for the scheduled navigation. Dropping the report drops
/// the handle, which cancels a redirect that has not fired yet; call
/// [`RedirectHandle::detach`] first when the redirect should outlive the
/// caller's scope.
#[derive(Debug)]
pub struct CallbackReport {
	/// Terminal status reached by the flow.
	pub status: CallbackStatus,
	/// User-visible message matching the terminal status.
	pub message: String,
	/// Session granted by the exchange collaborator, on success.
	pub session: Option<SessionGrant>,
	/// Classified failure, when the flow did not succeed.
	pub failure: Option<Error>,
	/// Handle for the single scheduled redirect.
	pub redirect: RedirectHandle,
}
impl CallbackReport {
	/// Returns whether the flow reached [`CallbackStatus::Succeeded`].
	pub fn succeeded(&self) -> bool {
		self.status == CallbackStatus::Succeeded
	}
}
