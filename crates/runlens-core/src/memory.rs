// In-memory sinks for examples and testing
//
// These implementations keep everything in memory, making them perfect
// for standalone examples, unit tests, and quick prototyping.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use runlens_contracts::AgUiEvent;

use crate::error::{Result, StateError};
use crate::state::AgentState;
use crate::traits::EventSink;

// ============================================================================
// InMemoryEventSink - collects everything it sees
// ============================================================================

/// Sink that records every event and snapshot it is handed
///
/// Useful for asserting on the exact event flow in tests, or as a cheap
/// session log in examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventSink {
    events: Arc<RwLock<Vec<AgUiEvent>>>,
    snapshots: Arc<RwLock<Vec<AgentState>>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
            snapshots: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// All events seen so far, in arrival order.
    pub async fn events(&self) -> Vec<AgUiEvent> {
        self.events.read().await.clone()
    }

    /// All snapshots seen so far, oldest first.
    pub async fn snapshots(&self) -> Vec<AgentState> {
        self.snapshots.read().await.clone()
    }

    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Drop everything collected so far.
    pub async fn clear(&self) {
        self.events.write().await.clear();
        self.snapshots.write().await.clear();
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn on_event(&self, event: &AgUiEvent) -> Result<()> {
        self.events.write().await.push(event.clone());
        Ok(())
    }

    async fn on_snapshot(&self, snapshot: &AgentState) -> Result<()> {
        self.snapshots.write().await.push(snapshot.clone());
        Ok(())
    }
}

// ============================================================================
// FailingEventSink - always returns an error
// ============================================================================

/// Sink whose callbacks always fail
///
/// Useful for testing that sink failures never block event application.
#[derive(Debug, Clone)]
pub struct FailingEventSink {
    error_message: String,
}

impl FailingEventSink {
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
        }
    }
}

impl Default for FailingEventSink {
    fn default() -> Self {
        Self::new("Sink failure")
    }
}

#[async_trait]
impl EventSink for FailingEventSink {
    async fn on_event(&self, _event: &AgUiEvent) -> Result<()> {
        Err(StateError::Internal(anyhow::anyhow!(
            self.error_message.clone()
        )))
    }

    async fn on_snapshot(&self, _snapshot: &AgentState) -> Result<()> {
        Err(StateError::Internal(anyhow::anyhow!(
            self.error_message.clone()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_sink_records_events_and_snapshots() {
        let sink = InMemoryEventSink::new();

        sink.on_event(&AgUiEvent::run_started("thread-1", "run-1"))
            .await
            .unwrap();
        sink.on_snapshot(&AgentState::default()).await.unwrap();

        assert_eq!(sink.event_count().await, 1);
        assert_eq!(sink.events().await[0].event_type(), "RUN_STARTED");
        assert_eq!(sink.snapshots().await.len(), 1);
    }

    #[tokio::test]
    async fn clear_drops_collected_data() {
        let sink = InMemoryEventSink::new();
        sink.on_event(&AgUiEvent::step_started("plan")).await.unwrap();

        sink.clear().await;

        assert_eq!(sink.event_count().await, 0);
        assert!(sink.snapshots().await.is_empty());
    }

    #[tokio::test]
    async fn failing_sink_surfaces_its_message() {
        let sink = FailingEventSink::new("disk full");
        let err = sink
            .on_event(&AgUiEvent::step_started("plan"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("disk full"));
    }
}
