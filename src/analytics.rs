//! Best-effort analytics port.
//!
//! The host's event emitter is injected instead of looked up as a global, so
//! the flow stays testable without any host environment present. Emission is
//! infallible by contract: implementations swallow delivery failures, and a
//! missing sink is simply [`NoopAnalytics`].

// self
use crate::{_prelude::*, provider::ProviderKind};

/// Event name emitted after a successful exchange.
pub const LOGIN_EVENT: &str = "Login";

/// Fire-and-forget analytics sink.
pub trait AnalyticsSink
where
	Self: 'static + Send + Sync,
{
	/// Emits one event. Implementations must not fail or block the flow.
	fn track(&self, event: &str, properties: serde_json::Value);
}

/// Sink used when the host provides no analytics.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAnalytics;
impl AnalyticsSink for NoopAnalytics {
	fn track(&self, _event: &str, _properties: serde_json::Value) {}
}

/// Properties attached to the [`LOGIN_EVENT`] emission.
pub(crate) fn login_properties(provider: ProviderKind) -> serde_json::Value {
	serde_json::json!({ "method": provider.as_str() })
}
