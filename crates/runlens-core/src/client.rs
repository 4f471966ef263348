// Client runtime facade: feed events in, observe state out
//
// Wires the reducer, the stream hub, and any registered sinks together.
// The client is the single writer; everything it hands out (snapshots,
// stream items) is an owned copy.

use std::sync::Arc;

use futures::Stream;
use serde_json::Value;
use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use runlens_contracts::{is_valid_event, AgUiEvent};

use crate::error::Result;
use crate::hub::{StateStreamHub, DEFAULT_EVENT_BUFFER};
use crate::reducer::StateReducer;
use crate::state::{AgentState, AgentStatus};
use crate::traits::EventSink;

/// Tuning knobs for [`AgentClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Broadcast buffer size for the raw event tap.
    pub event_buffer: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl ClientOptions {
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }
}

/// Client-side runtime for one agent session.
///
/// Events are fed in through [`handle_event`](Self::handle_event) (or the
/// JSON variants) in delivery order. Each accepted event is published to
/// the raw tap, handed to sinks, reduced into the aggregate state, and,
/// when reduction succeeds, followed by a fresh snapshot on the watch
/// channel. A failed STATE_DELTA surfaces as an error to the caller and
/// publishes no snapshot; the previous state stays current.
pub struct AgentClient {
    reducer: StateReducer,
    hub: StateStreamHub,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl AgentClient {
    pub fn new() -> Self {
        Self::with_options(ClientOptions::default())
    }

    pub fn with_options(options: ClientOptions) -> Self {
        Self {
            reducer: StateReducer::new(),
            hub: StateStreamHub::new(options.event_buffer),
            sinks: Vec::new(),
        }
    }

    /// Register a sink at construction time.
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    // ========================================================================
    // Event intake
    // ========================================================================

    /// Apply one event.
    ///
    /// The raw tap is published first, so subscribers see every accepted
    /// event including ones whose reduction later fails. Sink errors are
    /// logged and never block application.
    pub async fn handle_event(&mut self, event: AgUiEvent) -> Result<()> {
        self.hub.publish_event(event.clone());
        for sink in &self.sinks {
            if let Err(error) = sink.on_event(&event).await {
                warn!(%error, "Event sink failed; continuing");
            }
        }

        self.reducer.apply_event(&event)?;
        debug!(event_type = %event.event_type(), "Event applied");

        let snapshot = self.reducer.snapshot();
        self.hub.publish_snapshot(snapshot.clone());
        for sink in &self.sinks {
            if let Err(error) = sink.on_snapshot(&snapshot).await {
                warn!(%error, "Snapshot sink failed; continuing");
            }
        }
        Ok(())
    }

    /// Apply one event from its wire JSON.
    ///
    /// Unparseable text is an error; a parseable value without a string
    /// `type` tag is dropped with a warning and `Ok(())`, matching the
    /// tolerant trust-boundary contract.
    pub async fn handle_json(&mut self, json: &str) -> Result<()> {
        let value: Value = serde_json::from_str(json)?;
        self.handle_value(value).await
    }

    /// Apply one event from an already-parsed JSON value.
    pub async fn handle_value(&mut self, value: Value) -> Result<()> {
        if !is_valid_event(&value) {
            warn!("Dropping structurally invalid event (no string type tag)");
            return Ok(());
        }
        let event: AgUiEvent = serde_json::from_value(value)?;
        self.handle_event(event).await
    }

    /// Drain a stream of events into the client.
    ///
    /// Events whose application fails are logged and skipped; returns how
    /// many events were applied.
    pub async fn forward_events<S>(&mut self, mut stream: S) -> usize
    where
        S: Stream<Item = AgUiEvent> + Unpin,
    {
        let mut applied = 0;
        while let Some(event) = stream.next().await {
            let event_type = event.event_type().to_string();
            match self.handle_event(event).await {
                Ok(()) => applied += 1,
                Err(error) => warn!(%error, event_type, "Skipping event that failed to apply"),
            }
        }
        applied
    }

    // ========================================================================
    // Control
    // ========================================================================

    /// Reset to the idle default state and publish the reset snapshot.
    pub fn reset(&mut self) {
        self.reducer.reset();
        self.hub.publish_snapshot(self.reducer.snapshot());
    }

    /// Override the status outside the event protocol (used by transports
    /// for connection lifecycle) and publish the updated snapshot.
    pub fn set_status(&mut self, status: AgentStatus) {
        self.reducer.set_status(status);
        self.hub.publish_snapshot(self.reducer.snapshot());
    }

    // ========================================================================
    // Read side
    // ========================================================================

    pub fn state(&self) -> &AgentState {
        self.reducer.state()
    }

    pub fn snapshot(&self) -> AgentState {
        self.reducer.snapshot()
    }

    pub fn status(&self) -> AgentStatus {
        self.reducer.state().status
    }

    pub fn hub(&self) -> &StateStreamHub {
        &self.hub
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<AgUiEvent> {
        self.hub.subscribe_events()
    }

    pub fn event_stream(&self) -> BroadcastStream<AgUiEvent> {
        self.hub.event_stream()
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<AgentState> {
        self.hub.subscribe_snapshots()
    }

    pub fn snapshot_stream(&self) -> WatchStream<AgentState> {
        self.hub.snapshot_stream()
    }

    /// Filtered view of the raw tap carrying only one event type.
    pub fn events_of_type(&self, event_type: impl Into<String>) -> impl Stream<Item = AgUiEvent> {
        let event_type = event_type.into();
        self.hub
            .event_stream()
            .filter_map(move |item| item.ok().filter(|event| event.event_type() == event_type))
    }
}

impl Default for AgentClient {
    fn default() -> Self {
        Self::new()
    }
}
