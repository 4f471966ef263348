// Fan-out channels for events and state snapshots
//
// One hub per client session: a broadcast tap carrying every raw event in
// arrival order, and a watch channel holding the latest state snapshot.
// Publishing never blocks and never fails. Broadcast subscribers that fall
// behind lose the oldest events; watch subscribers always start from the
// current snapshot, so late subscribers need no catch-up protocol.

use tokio::sync::{broadcast, watch};
use tokio_stream::wrappers::{BroadcastStream, WatchStream};

use runlens_contracts::AgUiEvent;

use crate::state::AgentState;

/// Events buffered per broadcast subscriber before lagging sets in.
pub const DEFAULT_EVENT_BUFFER: usize = 256;

#[derive(Clone, Debug)]
pub struct StateStreamHub {
    events_tx: broadcast::Sender<AgUiEvent>,
    snapshot_tx: watch::Sender<AgentState>,
}

impl StateStreamHub {
    pub fn new(event_buffer: usize) -> Self {
        let (events_tx, _) = broadcast::channel(event_buffer);
        let (snapshot_tx, _) = watch::channel(AgentState::default());
        Self {
            events_tx,
            snapshot_tx,
        }
    }

    /// Publish one raw event to the tap. Dropped if nobody is listening.
    pub fn publish_event(&self, event: AgUiEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Replace the latest snapshot. Stored even with no receivers, so a
    /// later subscriber still sees it.
    pub fn publish_snapshot(&self, snapshot: AgentState) {
        self.snapshot_tx.send_replace(snapshot);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<AgUiEvent> {
        self.events_tx.subscribe()
    }

    /// Event tap as a `Stream`. Items are `Err(Lagged)` when a slow
    /// subscriber misses events.
    pub fn event_stream(&self) -> BroadcastStream<AgUiEvent> {
        BroadcastStream::new(self.events_tx.subscribe())
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<AgentState> {
        self.snapshot_tx.subscribe()
    }

    /// Snapshot feed as a `Stream`. Yields the snapshot current at
    /// subscription time first, then every replacement.
    pub fn snapshot_stream(&self) -> WatchStream<AgentState> {
        WatchStream::new(self.snapshot_tx.subscribe())
    }

    pub fn latest_snapshot(&self) -> AgentState {
        self.snapshot_tx.borrow().clone()
    }

    pub fn event_subscriber_count(&self) -> usize {
        self.events_tx.receiver_count()
    }
}

impl Default for StateStreamHub {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}
