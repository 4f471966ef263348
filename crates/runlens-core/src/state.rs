// Aggregate client state owned by the reducer
//
// Consumers only ever see cloned snapshots of `AgentState`; the reducer
// keeps the single mutable copy.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use runlens_contracts::Message;

// ============================================================================
// Status and errors
// ============================================================================

/// Connection and run lifecycle of the agent session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    #[default]
    Idle,
    Connecting,
    Connected,
    Running,
    Error,
    Disconnected,
}

/// Last error surfaced to the UI. Overwritten whole on each new error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Unix millis, stamped when the error was recorded (not when it
    /// happened upstream).
    pub timestamp: i64,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            message: message.into(),
            code,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

// ============================================================================
// Tool calls
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCallStatus {
    Pending,
    Running,
    Completed,
    Error,
}

/// One streamed tool invocation, kept for the whole session so the UI can
/// render finished calls. Records are only removed by a full reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    /// Argument JSON accumulated from streamed fragments. May be a prefix
    /// of a document while the call is still running.
    pub args: String,
    pub status: ToolCallStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
}

impl ToolCallRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        parent_message_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args: String::new(),
            status: ToolCallStatus::Pending,
            result: None,
            parent_message_id,
        }
    }
}

// ============================================================================
// Aggregate state
// ============================================================================

/// Everything the client tracks about one agent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    pub status: AgentStatus,
    pub thread_id: Option<String>,
    pub run_id: Option<String>,
    /// Conversation in arrival order. Message ids are not deduplicated.
    pub messages: Vec<Message>,
    /// Domain state, opaque to the runtime apart from patch application.
    pub state: Value,
    pub active_tool_calls: HashMap<String, ToolCallRecord>,
    pub current_step: Option<String>,
    pub error: Option<ErrorInfo>,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            status: AgentStatus::Idle,
            thread_id: None,
            run_id: None,
            messages: Vec::new(),
            state: Value::Object(Map::new()),
            active_tool_calls: HashMap::new(),
            current_step: None,
            error: None,
        }
    }
}

impl AgentState {
    pub fn is_running(&self) -> bool {
        self.status == AgentStatus::Running
    }

    /// True while a session is live, whether between runs or mid-run.
    pub fn is_connected(&self) -> bool {
        matches!(self.status, AgentStatus::Connected | AgentStatus::Running)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn active_tool_call_count(&self) -> usize {
        self.active_tool_calls
            .values()
            .filter(|record| {
                matches!(
                    record.status,
                    ToolCallStatus::Pending | ToolCallStatus::Running
                )
            })
            .count()
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn tool_call(&self, id: &str) -> Option<&ToolCallRecord> {
        self.active_tool_calls.get(id)
    }
}
