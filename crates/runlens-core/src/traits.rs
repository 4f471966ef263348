// Sink trait for pluggable event observers
//
// Sinks let the client fan events and snapshots out to code that is not
// subscribed through the hub:
// - In-memory implementations for examples and testing
// - Persistence implementations (session logs, replay files)
// - Bridges forwarding into a rendering layer

use async_trait::async_trait;

use runlens_contracts::AgUiEvent;

use crate::error::Result;
use crate::state::AgentState;

// ============================================================================
// EventSink - observers notified on every applied event
// ============================================================================

/// Trait for observing accepted events and the snapshots they produce
///
/// Both methods default to no-ops, so implementations override only the
/// side they care about. Sinks are best-effort observers: a returned
/// error is logged by the client and never blocks event application.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Called with every accepted event, before it is reduced.
    async fn on_event(&self, _event: &AgUiEvent) -> Result<()> {
        Ok(())
    }

    /// Called with the fresh snapshot after an event was applied.
    async fn on_snapshot(&self, _snapshot: &AgentState) -> Result<()> {
        Ok(())
    }
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {}
