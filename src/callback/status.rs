//! Presentation status shared between the flow and the rendering layer.

// self
use crate::_prelude::*;

/// Mutually exclusive visual states of the callback page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackStatus {
	#[default]
	/// Exchange has not settled yet.
	Pending,
	/// Exchange succeeded; a dashboard redirect is scheduled.
	Succeeded,
	/// Flow failed; a login redirect is scheduled.
	Failed,
}
impl CallbackStatus {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallbackStatus::Pending => "pending",
			CallbackStatus::Succeeded => "succeeded",
			CallbackStatus::Failed => "failed",
		}
	}

	/// Returns whether the status is terminal for the callback page.
	pub const fn is_terminal(self) -> bool {
		!matches!(self, CallbackStatus::Pending)
	}
}
impl Display for CallbackStatus {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Snapshot of the slot contents at one point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusView {
	/// Current page status.
	pub status: CallbackStatus,
	/// Message rendered alongside the status.
	pub message: String,
}

/// Cloneable, thread-safe holder for the page's status and message.
///
/// The slot starts at [`CallbackStatus::Pending`] and settles at most once:
/// the first terminal write wins and every later write is rejected. Clones
/// share the same underlying cell, so a presenter can keep observing the slot
/// after handing the flow its own copy.
#[derive(Clone, Debug, Default)]
pub struct StatusSlot(Arc<RwLock<StatusView>>);
impl StatusSlot {
	/// Message rendered while the exchange is in flight.
	pub const PENDING_MESSAGE: &'static str = "Completing sign-in…";

	/// Creates a fresh slot in the pending state.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of the current status and message.
	pub fn snapshot(&self) -> StatusView {
		self.0.read().clone()
	}

	/// Returns whether the slot has not settled yet.
	pub fn is_pending(&self) -> bool {
		self.0.read().status == CallbackStatus::Pending
	}

	/// Writes a terminal status + message, returning whether the write applied.
	///
	/// Rejects [`CallbackStatus::Pending`] as a target and any write after the
	/// slot has already settled.
	pub(crate) fn settle(&self, status: CallbackStatus, message: impl Into<String>) -> bool {
		if !status.is_terminal() {
			return false;
		}

		let mut view = self.0.write();

		if view.status.is_terminal() {
			return false;
		}

		*view = StatusView { status, message: message.into() };

		true
	}
}
impl Default for StatusView {
	fn default() -> Self {
		Self { status: CallbackStatus::Pending, message: StatusSlot::PENDING_MESSAGE.into() }
	}
}
