// AG-UI protocol event types consumed by the client-side runtime
// Protocol reference: https://docs.ag-ui.com/concepts/events

use chrono::Utc;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::messages::{Message, MessageRole};

// Wire values of the `type` discriminator
pub const EVENT_RUN_STARTED: &str = "RUN_STARTED";
pub const EVENT_RUN_FINISHED: &str = "RUN_FINISHED";
pub const EVENT_RUN_ERROR: &str = "RUN_ERROR";
pub const EVENT_STEP_STARTED: &str = "STEP_STARTED";
pub const EVENT_STEP_FINISHED: &str = "STEP_FINISHED";
pub const EVENT_TEXT_MESSAGE_START: &str = "TEXT_MESSAGE_START";
pub const EVENT_TEXT_MESSAGE_CONTENT: &str = "TEXT_MESSAGE_CONTENT";
pub const EVENT_TEXT_MESSAGE_END: &str = "TEXT_MESSAGE_END";
pub const EVENT_TOOL_CALL_START: &str = "TOOL_CALL_START";
pub const EVENT_TOOL_CALL_ARGS: &str = "TOOL_CALL_ARGS";
pub const EVENT_TOOL_CALL_END: &str = "TOOL_CALL_END";
pub const EVENT_TOOL_CALL_RESULT: &str = "TOOL_CALL_RESULT";
pub const EVENT_STATE_SNAPSHOT: &str = "STATE_SNAPSHOT";
pub const EVENT_STATE_DELTA: &str = "STATE_DELTA";
pub const EVENT_MESSAGES_SNAPSHOT: &str = "MESSAGES_SNAPSHOT";

/// Validation gate applied to raw JSON before parsing.
///
/// An event is structurally valid when it is a JSON object carrying a
/// string `type` field. Anything else fails closed: null, arrays, scalars,
/// objects without `type`, and objects whose `type` is not a string.
/// Missing payload fields do not fail here; partial events fall through
/// to [`AgUiEvent::Unknown`] at parse time.
pub fn is_valid_event(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|obj| obj.get("type"))
        .map(Value::is_string)
        .unwrap_or(false)
}

/// AG-UI Protocol Events
///
/// The wire format is an internally tagged object: `{"type": "RUN_STARTED", ...}`
/// with SCREAMING_SNAKE tags and snake_case payload fields.
///
/// Forward-compatible: unknown `type` tags, and known tags whose payload
/// fails to parse, deserialize into [`AgUiEvent::Unknown`] instead of
/// failing. Serializing an `Unknown` event re-emits its original payload
/// with the original `type` tag, so unrecognized events pass through intact.
#[derive(Debug, Clone, PartialEq)]
pub enum AgUiEvent {
    // Lifecycle Events
    RunStarted(RunStartedEvent),
    RunFinished(RunFinishedEvent),
    RunError(RunErrorEvent),
    StepStarted(StepStartedEvent),
    StepFinished(StepFinishedEvent),

    // Text Message Events (Start-Content-End pattern)
    TextMessageStart(TextMessageStartEvent),
    TextMessageContent(TextMessageContentEvent),
    TextMessageEnd(TextMessageEndEvent),

    // Tool Call Events
    ToolCallStart(ToolCallStartEvent),
    ToolCallArgs(ToolCallArgsEvent),
    ToolCallEnd(ToolCallEndEvent),
    ToolCallResult(ToolCallResultEvent),

    // State Events
    StateSnapshot(StateSnapshotEvent),
    StateDelta(StateDeltaEvent),
    MessagesSnapshot(MessagesSnapshotEvent),

    // Forward-compatible catch-all, never a wire tag of its own
    Unknown(UnknownEvent),
}

// Lifecycle Events

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStartedEvent {
    pub thread_id: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunFinishedEvent {
    pub thread_id: String,
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunErrorEvent {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStartedEvent {
    pub step_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepFinishedEvent {
    pub step_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

// Text Message Events

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageStartEvent {
    pub message_id: String,
    pub role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageContentEvent {
    pub message_id: String,
    pub delta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextMessageEndEvent {
    pub message_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

// Tool Call Events

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallStartEvent {
    pub tool_call_id: String,
    pub tool_call_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallArgsEvent {
    pub tool_call_id: String,
    pub delta: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallEndEvent {
    pub tool_call_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResultEvent {
    pub tool_call_id: String,
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

// State Events

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshotEvent {
    pub snapshot: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDeltaEvent {
    pub delta: Vec<JsonPatchOp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

/// One RFC 6902 style operation carried by a STATE_DELTA event.
///
/// `op` stays a plain string on the wire; the delta engine validates the
/// kind at apply time so malformed ops surface as errors instead of
/// degrading the whole event to `Unknown` during parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonPatchOp {
    pub op: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl JsonPatchOp {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: "add".into(),
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: "remove".into(),
            path: path.into(),
            from: None,
            value: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: "replace".into(),
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }

    pub fn move_op(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            op: "move".into(),
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    pub fn copy_op(from: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            op: "copy".into(),
            path: path.into(),
            from: Some(from.into()),
            value: None,
        }
    }

    pub fn test(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: "test".into(),
            path: path.into(),
            from: None,
            value: Some(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesSnapshotEvent {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(rename = "rawEvent", skip_serializing_if = "Option::is_none")]
    pub raw_event: Option<Value>,
}

// Forward-compatible catch-all

/// An event whose `type` tag this build does not recognize, or whose
/// payload failed to parse against a known shape. `data` holds every
/// wire field except `type`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownEvent {
    pub event_type: String,
    pub data: Value,
}

/// Re-emits the original wire object: `type` first, then the retained fields.
impl Serialize for UnknownEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.data.as_object() {
            Some(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
                map.serialize_entry("type", &self.event_type)?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            None => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", &self.event_type)?;
                map.serialize_entry("data", &self.data)?;
                map.end()
            }
        }
    }
}

// Internal helper enum for the forward-compatible deserializer.
// Mirrors the known wire variants and derives Deserialize.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum AgUiEventKnown {
    RunStarted(RunStartedEvent),
    RunFinished(RunFinishedEvent),
    RunError(RunErrorEvent),
    StepStarted(StepStartedEvent),
    StepFinished(StepFinishedEvent),
    TextMessageStart(TextMessageStartEvent),
    TextMessageContent(TextMessageContentEvent),
    TextMessageEnd(TextMessageEndEvent),
    ToolCallStart(ToolCallStartEvent),
    ToolCallArgs(ToolCallArgsEvent),
    ToolCallEnd(ToolCallEndEvent),
    ToolCallResult(ToolCallResultEvent),
    StateSnapshot(StateSnapshotEvent),
    StateDelta(StateDeltaEvent),
    MessagesSnapshot(MessagesSnapshotEvent),
}

impl From<AgUiEventKnown> for AgUiEvent {
    fn from(known: AgUiEventKnown) -> Self {
        match known {
            AgUiEventKnown::RunStarted(ev) => Self::RunStarted(ev),
            AgUiEventKnown::RunFinished(ev) => Self::RunFinished(ev),
            AgUiEventKnown::RunError(ev) => Self::RunError(ev),
            AgUiEventKnown::StepStarted(ev) => Self::StepStarted(ev),
            AgUiEventKnown::StepFinished(ev) => Self::StepFinished(ev),
            AgUiEventKnown::TextMessageStart(ev) => Self::TextMessageStart(ev),
            AgUiEventKnown::TextMessageContent(ev) => Self::TextMessageContent(ev),
            AgUiEventKnown::TextMessageEnd(ev) => Self::TextMessageEnd(ev),
            AgUiEventKnown::ToolCallStart(ev) => Self::ToolCallStart(ev),
            AgUiEventKnown::ToolCallArgs(ev) => Self::ToolCallArgs(ev),
            AgUiEventKnown::ToolCallEnd(ev) => Self::ToolCallEnd(ev),
            AgUiEventKnown::ToolCallResult(ev) => Self::ToolCallResult(ev),
            AgUiEventKnown::StateSnapshot(ev) => Self::StateSnapshot(ev),
            AgUiEventKnown::StateDelta(ev) => Self::StateDelta(ev),
            AgUiEventKnown::MessagesSnapshot(ev) => Self::MessagesSnapshot(ev),
        }
    }
}

/// Forward-compatible deserializer: anything that does not parse as a
/// known variant becomes `Unknown` with the original fields retained.
impl<'de> Deserialize<'de> for AgUiEvent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Value::deserialize(deserializer)?;
        match serde_json::from_value::<AgUiEventKnown>(raw.clone()) {
            Ok(known) => Ok(known.into()),
            Err(_) => {
                let event_type = raw
                    .get("type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("UNKNOWN")
                    .to_string();
                let mut data = raw;
                if let Some(obj) = data.as_object_mut() {
                    obj.remove("type");
                }
                Ok(AgUiEvent::Unknown(UnknownEvent { event_type, data }))
            }
        }
    }
}

// Internal helper enum for serialization. Holds references so known
// variants serialize without cloning while Unknown bypasses the tag
// machinery to re-emit its original `type`.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
enum AgUiEventRef<'a> {
    RunStarted(&'a RunStartedEvent),
    RunFinished(&'a RunFinishedEvent),
    RunError(&'a RunErrorEvent),
    StepStarted(&'a StepStartedEvent),
    StepFinished(&'a StepFinishedEvent),
    TextMessageStart(&'a TextMessageStartEvent),
    TextMessageContent(&'a TextMessageContentEvent),
    TextMessageEnd(&'a TextMessageEndEvent),
    ToolCallStart(&'a ToolCallStartEvent),
    ToolCallArgs(&'a ToolCallArgsEvent),
    ToolCallEnd(&'a ToolCallEndEvent),
    ToolCallResult(&'a ToolCallResultEvent),
    StateSnapshot(&'a StateSnapshotEvent),
    StateDelta(&'a StateDeltaEvent),
    MessagesSnapshot(&'a MessagesSnapshotEvent),
}

impl Serialize for AgUiEvent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::RunStarted(ev) => AgUiEventRef::RunStarted(ev).serialize(serializer),
            Self::RunFinished(ev) => AgUiEventRef::RunFinished(ev).serialize(serializer),
            Self::RunError(ev) => AgUiEventRef::RunError(ev).serialize(serializer),
            Self::StepStarted(ev) => AgUiEventRef::StepStarted(ev).serialize(serializer),
            Self::StepFinished(ev) => AgUiEventRef::StepFinished(ev).serialize(serializer),
            Self::TextMessageStart(ev) => AgUiEventRef::TextMessageStart(ev).serialize(serializer),
            Self::TextMessageContent(ev) => {
                AgUiEventRef::TextMessageContent(ev).serialize(serializer)
            }
            Self::TextMessageEnd(ev) => AgUiEventRef::TextMessageEnd(ev).serialize(serializer),
            Self::ToolCallStart(ev) => AgUiEventRef::ToolCallStart(ev).serialize(serializer),
            Self::ToolCallArgs(ev) => AgUiEventRef::ToolCallArgs(ev).serialize(serializer),
            Self::ToolCallEnd(ev) => AgUiEventRef::ToolCallEnd(ev).serialize(serializer),
            Self::ToolCallResult(ev) => AgUiEventRef::ToolCallResult(ev).serialize(serializer),
            Self::StateSnapshot(ev) => AgUiEventRef::StateSnapshot(ev).serialize(serializer),
            Self::StateDelta(ev) => AgUiEventRef::StateDelta(ev).serialize(serializer),
            Self::MessagesSnapshot(ev) => AgUiEventRef::MessagesSnapshot(ev).serialize(serializer),
            Self::Unknown(ev) => ev.serialize(serializer),
        }
    }
}

// Helper functions to create events with current timestamp
impl AgUiEvent {
    pub fn run_started(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        AgUiEvent::RunStarted(RunStartedEvent {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn run_finished(thread_id: impl Into<String>, run_id: impl Into<String>) -> Self {
        AgUiEvent::RunFinished(RunFinishedEvent {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            result: None,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn run_finished_with_result(
        thread_id: impl Into<String>,
        run_id: impl Into<String>,
        result: Value,
    ) -> Self {
        AgUiEvent::RunFinished(RunFinishedEvent {
            thread_id: thread_id.into(),
            run_id: run_id.into(),
            result: Some(result),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn run_error(message: impl Into<String>) -> Self {
        AgUiEvent::RunError(RunErrorEvent {
            message: message.into(),
            code: None,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn run_error_with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        AgUiEvent::RunError(RunErrorEvent {
            message: message.into(),
            code: Some(code.into()),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn step_started(step_name: impl Into<String>) -> Self {
        AgUiEvent::StepStarted(StepStartedEvent {
            step_name: step_name.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn step_finished(step_name: impl Into<String>) -> Self {
        AgUiEvent::StepFinished(StepFinishedEvent {
            step_name: step_name.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn text_message_start(message_id: impl Into<String>, role: MessageRole) -> Self {
        AgUiEvent::TextMessageStart(TextMessageStartEvent {
            message_id: message_id.into(),
            role,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn text_message_content(message_id: impl Into<String>, delta: impl Into<String>) -> Self {
        AgUiEvent::TextMessageContent(TextMessageContentEvent {
            message_id: message_id.into(),
            delta: delta.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn text_message_end(message_id: impl Into<String>) -> Self {
        AgUiEvent::TextMessageEnd(TextMessageEndEvent {
            message_id: message_id.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn tool_call_start(
        tool_call_id: impl Into<String>,
        tool_call_name: impl Into<String>,
    ) -> Self {
        AgUiEvent::ToolCallStart(ToolCallStartEvent {
            tool_call_id: tool_call_id.into(),
            tool_call_name: tool_call_name.into(),
            parent_message_id: None,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn tool_call_args(tool_call_id: impl Into<String>, delta: impl Into<String>) -> Self {
        AgUiEvent::ToolCallArgs(ToolCallArgsEvent {
            tool_call_id: tool_call_id.into(),
            delta: delta.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn tool_call_end(tool_call_id: impl Into<String>) -> Self {
        AgUiEvent::ToolCallEnd(ToolCallEndEvent {
            tool_call_id: tool_call_id.into(),
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn tool_call_result(tool_call_id: impl Into<String>, result: Value) -> Self {
        AgUiEvent::ToolCallResult(ToolCallResultEvent {
            tool_call_id: tool_call_id.into(),
            result,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn state_snapshot(snapshot: Value) -> Self {
        AgUiEvent::StateSnapshot(StateSnapshotEvent {
            snapshot,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn state_delta(delta: Vec<JsonPatchOp>) -> Self {
        AgUiEvent::StateDelta(StateDeltaEvent {
            delta,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }

    pub fn messages_snapshot(messages: Vec<Message>) -> Self {
        AgUiEvent::MessagesSnapshot(MessagesSnapshotEvent {
            messages,
            timestamp: Some(Utc::now().timestamp_millis()),
            raw_event: None,
        })
    }
}

// Accessors over the common envelope fields
impl AgUiEvent {
    /// Wire value of the `type` discriminator.
    pub fn event_type(&self) -> &str {
        match self {
            Self::RunStarted(_) => EVENT_RUN_STARTED,
            Self::RunFinished(_) => EVENT_RUN_FINISHED,
            Self::RunError(_) => EVENT_RUN_ERROR,
            Self::StepStarted(_) => EVENT_STEP_STARTED,
            Self::StepFinished(_) => EVENT_STEP_FINISHED,
            Self::TextMessageStart(_) => EVENT_TEXT_MESSAGE_START,
            Self::TextMessageContent(_) => EVENT_TEXT_MESSAGE_CONTENT,
            Self::TextMessageEnd(_) => EVENT_TEXT_MESSAGE_END,
            Self::ToolCallStart(_) => EVENT_TOOL_CALL_START,
            Self::ToolCallArgs(_) => EVENT_TOOL_CALL_ARGS,
            Self::ToolCallEnd(_) => EVENT_TOOL_CALL_END,
            Self::ToolCallResult(_) => EVENT_TOOL_CALL_RESULT,
            Self::StateSnapshot(_) => EVENT_STATE_SNAPSHOT,
            Self::StateDelta(_) => EVENT_STATE_DELTA,
            Self::MessagesSnapshot(_) => EVENT_MESSAGES_SNAPSHOT,
            Self::Unknown(ev) => &ev.event_type,
        }
    }

    /// Event timestamp in milliseconds since epoch, when present.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            Self::RunStarted(ev) => ev.timestamp,
            Self::RunFinished(ev) => ev.timestamp,
            Self::RunError(ev) => ev.timestamp,
            Self::StepStarted(ev) => ev.timestamp,
            Self::StepFinished(ev) => ev.timestamp,
            Self::TextMessageStart(ev) => ev.timestamp,
            Self::TextMessageContent(ev) => ev.timestamp,
            Self::TextMessageEnd(ev) => ev.timestamp,
            Self::ToolCallStart(ev) => ev.timestamp,
            Self::ToolCallArgs(ev) => ev.timestamp,
            Self::ToolCallEnd(ev) => ev.timestamp,
            Self::ToolCallResult(ev) => ev.timestamp,
            Self::StateSnapshot(ev) => ev.timestamp,
            Self::StateDelta(ev) => ev.timestamp,
            Self::MessagesSnapshot(ev) => ev.timestamp,
            Self::Unknown(ev) => ev.data.get("timestamp").and_then(Value::as_i64),
        }
    }

    /// Replace the timestamp. No-op for `Unknown`, which keeps its wire
    /// payload untouched.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        match &mut self {
            Self::RunStarted(ev) => ev.timestamp = Some(timestamp),
            Self::RunFinished(ev) => ev.timestamp = Some(timestamp),
            Self::RunError(ev) => ev.timestamp = Some(timestamp),
            Self::StepStarted(ev) => ev.timestamp = Some(timestamp),
            Self::StepFinished(ev) => ev.timestamp = Some(timestamp),
            Self::TextMessageStart(ev) => ev.timestamp = Some(timestamp),
            Self::TextMessageContent(ev) => ev.timestamp = Some(timestamp),
            Self::TextMessageEnd(ev) => ev.timestamp = Some(timestamp),
            Self::ToolCallStart(ev) => ev.timestamp = Some(timestamp),
            Self::ToolCallArgs(ev) => ev.timestamp = Some(timestamp),
            Self::ToolCallEnd(ev) => ev.timestamp = Some(timestamp),
            Self::ToolCallResult(ev) => ev.timestamp = Some(timestamp),
            Self::StateSnapshot(ev) => ev.timestamp = Some(timestamp),
            Self::StateDelta(ev) => ev.timestamp = Some(timestamp),
            Self::MessagesSnapshot(ev) => ev.timestamp = Some(timestamp),
            Self::Unknown(_) => {}
        }
        self
    }

    /// Attach the upstream raw event. No-op for `Unknown`.
    pub fn with_raw_event(mut self, raw: Value) -> Self {
        match &mut self {
            Self::RunStarted(ev) => ev.raw_event = Some(raw),
            Self::RunFinished(ev) => ev.raw_event = Some(raw),
            Self::RunError(ev) => ev.raw_event = Some(raw),
            Self::StepStarted(ev) => ev.raw_event = Some(raw),
            Self::StepFinished(ev) => ev.raw_event = Some(raw),
            Self::TextMessageStart(ev) => ev.raw_event = Some(raw),
            Self::TextMessageContent(ev) => ev.raw_event = Some(raw),
            Self::TextMessageEnd(ev) => ev.raw_event = Some(raw),
            Self::ToolCallStart(ev) => ev.raw_event = Some(raw),
            Self::ToolCallArgs(ev) => ev.raw_event = Some(raw),
            Self::ToolCallEnd(ev) => ev.raw_event = Some(raw),
            Self::ToolCallResult(ev) => ev.raw_event = Some(raw),
            Self::StateSnapshot(ev) => ev.raw_event = Some(raw),
            Self::StateDelta(ev) => ev.raw_event = Some(raw),
            Self::MessagesSnapshot(ev) => ev.raw_event = Some(raw),
            Self::Unknown(_) => {}
        }
        self
    }
}
