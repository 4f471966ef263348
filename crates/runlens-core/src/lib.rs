// Client-Side Agent Runtime
//
// This crate provides the client half of the AG-UI protocol: a reducer
// that folds streamed events into an aggregate session state, plus the
// fan-out channels that let many readers follow one event feed.
//
// Key design decisions:
// - The reducer is synchronous and single-writer; readers get cloned snapshots
// - Raw events hit the tap before reduction, so observers see the full feed
//   even when an event fails to apply
// - STATE_DELTA application is atomic: any failing op discards the whole delta
// - Unknown event types are tolerated, logged, and surface on the tap unchanged
// - Sinks (EventSink) are best-effort observers and never block application

pub mod client;
pub mod delta;
pub mod error;
pub mod hub;
pub mod reducer;
pub mod state;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use client::{AgentClient, ClientOptions};
pub use delta::{apply_delta, resolve};
pub use error::{Result, StateError};
pub use hub::{StateStreamHub, DEFAULT_EVENT_BUFFER};
pub use memory::{FailingEventSink, InMemoryEventSink};
pub use reducer::StateReducer;
pub use state::{AgentState, AgentStatus, ErrorInfo, ToolCallRecord, ToolCallStatus};
pub use traits::{EventSink, NoopEventSink};

// Wire contract re-exports so downstream callers need only this crate
pub use runlens_contracts::{
    is_valid_event, AgUiEvent, JsonPatchOp, Message, MessageRole, UnknownEvent,
};
