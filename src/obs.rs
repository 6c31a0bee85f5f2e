//! Optional observability helpers for the callback flow.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `nexora_callback.flow` with the `provider`
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `nexora_callback_flow_total` counter for every
//!   attempt/success/failure, labeled by `provider` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each callback attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallbackOutcome {
	/// Entry to the flow.
	Attempt,
	/// Terminal success.
	Success,
	/// Terminal failure.
	Failure,
}
impl CallbackOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallbackOutcome::Attempt => "attempt",
			CallbackOutcome::Success => "success",
			CallbackOutcome::Failure => "failure",
		}
	}
}
impl Display for CallbackOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
