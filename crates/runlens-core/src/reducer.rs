// Event reducer: folds AG-UI events into the aggregate client state
//
// Single writer. `apply_event` runs to completion with no await points,
// so callers can hold the reducer behind plain `&mut` and publish cloned
// snapshots to readers afterwards.

use tracing::warn;

use runlens_contracts::{
    AgUiEvent, Message, MessagesSnapshotEvent, RunErrorEvent, RunFinishedEvent, RunStartedEvent,
    StateDeltaEvent, StateSnapshotEvent, StepFinishedEvent, StepStartedEvent,
    TextMessageContentEvent, TextMessageStartEvent, ToolCallArgsEvent, ToolCallEndEvent,
    ToolCallResultEvent, ToolCallStartEvent,
};

use crate::delta::apply_delta;
use crate::error::Result;
use crate::state::{AgentState, AgentStatus, ErrorInfo, ToolCallRecord, ToolCallStatus};

/// Owns the mutable [`AgentState`] and applies events to it in arrival
/// order. Events referencing ids that were never started are silently
/// dropped; only STATE_DELTA application can fail, and a failed delta
/// leaves the state exactly as it was.
#[derive(Debug)]
pub struct StateReducer {
    state: AgentState,
}

impl StateReducer {
    pub fn new() -> Self {
        Self {
            state: AgentState::default(),
        }
    }

    /// Borrow the current state without copying.
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    /// Clone the current state for publication to readers.
    pub fn snapshot(&self) -> AgentState {
        self.state.clone()
    }

    /// Return to the idle default state. Always lands on the same
    /// snapshot no matter what was applied before.
    pub fn reset(&mut self) {
        self.state = AgentState::default();
    }

    /// Override the status outside the event protocol. Transports use
    /// this to reflect connection lifecycle (connecting, disconnected).
    pub fn set_status(&mut self, status: AgentStatus) {
        self.state.status = status;
    }

    /// Fold one event into the state.
    pub fn apply_event(&mut self, event: &AgUiEvent) -> Result<()> {
        match event {
            AgUiEvent::RunStarted(ev) => self.on_run_started(ev),
            AgUiEvent::RunFinished(ev) => self.on_run_finished(ev),
            AgUiEvent::RunError(ev) => self.on_run_error(ev),
            AgUiEvent::StepStarted(ev) => self.on_step_started(ev),
            AgUiEvent::StepFinished(ev) => self.on_step_finished(ev),
            AgUiEvent::TextMessageStart(ev) => self.on_text_message_start(ev),
            AgUiEvent::TextMessageContent(ev) => self.on_text_message_content(ev),
            // Terminal marker only; completion is derived by consumers,
            // not stored.
            AgUiEvent::TextMessageEnd(_) => {}
            AgUiEvent::ToolCallStart(ev) => self.on_tool_call_start(ev),
            AgUiEvent::ToolCallArgs(ev) => self.on_tool_call_args(ev),
            AgUiEvent::ToolCallResult(ev) => self.on_tool_call_result(ev),
            AgUiEvent::ToolCallEnd(ev) => self.on_tool_call_end(ev),
            AgUiEvent::StateSnapshot(ev) => self.on_state_snapshot(ev),
            AgUiEvent::StateDelta(ev) => self.on_state_delta(ev)?,
            AgUiEvent::MessagesSnapshot(ev) => self.on_messages_snapshot(ev),
            AgUiEvent::Unknown(ev) => {
                warn!(event_type = %ev.event_type, "Ignoring unrecognized event type");
            }
        }
        Ok(())
    }

    // Run lifecycle

    fn on_run_started(&mut self, ev: &RunStartedEvent) {
        self.state.thread_id = Some(ev.thread_id.clone());
        self.state.run_id = Some(ev.run_id.clone());
        self.state.status = AgentStatus::Running;
        self.state.error = None;
    }

    fn on_run_finished(&mut self, _ev: &RunFinishedEvent) {
        // Thread and run ids are retained for reference.
        self.state.status = AgentStatus::Connected;
    }

    fn on_run_error(&mut self, ev: &RunErrorEvent) {
        self.state.status = AgentStatus::Error;
        self.state.error = Some(ErrorInfo::new(ev.message.clone(), ev.code.clone()));
    }

    fn on_step_started(&mut self, ev: &StepStartedEvent) {
        self.state.current_step = Some(ev.step_name.clone());
    }

    fn on_step_finished(&mut self, _ev: &StepFinishedEvent) {
        // Cleared regardless of which step the event names.
        self.state.current_step = None;
    }

    // Text messages

    fn on_text_message_start(&mut self, ev: &TextMessageStartEvent) {
        // Appended verbatim: duplicate ids are the producer's problem.
        self.state.messages.push(Message {
            id: ev.message_id.clone(),
            role: ev.role,
            content: String::new(),
            timestamp: ev.timestamp,
            metadata: None,
        });
    }

    fn on_text_message_content(&mut self, ev: &TextMessageContentEvent) {
        // An id with no prior START is dropped; a message is never
        // created implicitly.
        if let Some(message) = self
            .state
            .messages
            .iter_mut()
            .find(|m| m.id == ev.message_id)
        {
            message.content.push_str(&ev.delta);
        }
    }

    // Tool calls

    fn on_tool_call_start(&mut self, ev: &ToolCallStartEvent) {
        let record = ToolCallRecord::new(
            ev.tool_call_id.clone(),
            ev.tool_call_name.clone(),
            ev.parent_message_id.clone(),
        );
        self.state
            .active_tool_calls
            .insert(ev.tool_call_id.clone(), record);
    }

    fn on_tool_call_args(&mut self, ev: &ToolCallArgsEvent) {
        if let Some(record) = self.state.active_tool_calls.get_mut(&ev.tool_call_id) {
            record.args.push_str(&ev.delta);
            record.status = ToolCallStatus::Running;
        }
    }

    fn on_tool_call_result(&mut self, ev: &ToolCallResultEvent) {
        if let Some(record) = self.state.active_tool_calls.get_mut(&ev.tool_call_id) {
            record.result = Some(ev.result.clone());
            record.status = ToolCallStatus::Completed;
        }
    }

    fn on_tool_call_end(&mut self, ev: &ToolCallEndEvent) {
        // Records stay in the map after END so finished calls remain
        // renderable. END without a prior RESULT means the call failed.
        if let Some(record) = self.state.active_tool_calls.get_mut(&ev.tool_call_id) {
            if record.status != ToolCallStatus::Completed {
                record.status = ToolCallStatus::Error;
            }
        }
    }

    // Shared state

    fn on_state_snapshot(&mut self, ev: &StateSnapshotEvent) {
        // Full replace, no merge.
        self.state.state = ev.snapshot.clone();
    }

    fn on_state_delta(&mut self, ev: &StateDeltaEvent) -> Result<()> {
        // Atomic: a failing op anywhere in the delta keeps the previous
        // state whole.
        self.state.state = apply_delta(&self.state.state, &ev.delta)?;
        Ok(())
    }

    fn on_messages_snapshot(&mut self, ev: &MessagesSnapshotEvent) {
        self.state.messages = ev.messages.clone();
    }
}

impl Default for StateReducer {
    fn default() -> Self {
        Self::new()
    }
}
