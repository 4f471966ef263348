// Integration tests for the client runtime
//
// These tests drive the public API end to end: wire JSON in, reduced
// state and stream output out.

use std::sync::Arc;

use runlens_core::{
    AgUiEvent, AgentClient, AgentState, AgentStatus, InMemoryEventSink, JsonPatchOp, MessageRole,
    StateError, ToolCallStatus,
};
use serde_json::json;
use tokio_stream::StreamExt;

// =============================================================================
// Full-run scenarios over wire JSON
// =============================================================================

#[tokio::test]
async fn test_chat_run_from_wire_json() {
    let mut client = AgentClient::new();
    let feed = [
        r#"{"type": "RUN_STARTED", "thread_id": "thread-1", "run_id": "run-1"}"#,
        r#"{"type": "TEXT_MESSAGE_START", "message_id": "msg-1", "role": "assistant"}"#,
        r#"{"type": "TEXT_MESSAGE_CONTENT", "message_id": "msg-1", "delta": "Hi"}"#,
        r#"{"type": "TEXT_MESSAGE_CONTENT", "message_id": "msg-1", "delta": " there"}"#,
        r#"{"type": "TEXT_MESSAGE_END", "message_id": "msg-1"}"#,
        r#"{"type": "RUN_FINISHED", "thread_id": "thread-1", "run_id": "run-1"}"#,
    ];

    for line in feed {
        client.handle_json(line).await.unwrap();
    }

    let state = client.snapshot();
    assert_eq!(state.status, AgentStatus::Connected);
    assert_eq!(state.thread_id.as_deref(), Some("thread-1"));
    assert_eq!(state.run_id.as_deref(), Some("run-1"));
    assert_eq!(state.messages.len(), 1);
    assert_eq!(state.messages[0].id, "msg-1");
    assert_eq!(state.messages[0].role, MessageRole::Assistant);
    assert_eq!(state.messages[0].content, "Hi there");
}

#[tokio::test]
async fn test_tool_call_without_result_ends_in_error() {
    let mut client = AgentClient::new();
    let feed = [
        r#"{"type": "TOOL_CALL_START", "tool_call_id": "tool-1", "tool_call_name": "search"}"#,
        r#"{"type": "TOOL_CALL_ARGS", "tool_call_id": "tool-1", "delta": "{\"q\":"}"#,
        r#"{"type": "TOOL_CALL_ARGS", "tool_call_id": "tool-1", "delta": "1}"}"#,
        r#"{"type": "TOOL_CALL_END", "tool_call_id": "tool-1"}"#,
    ];

    for line in feed {
        client.handle_json(line).await.unwrap();
    }

    let state = client.snapshot();
    let record = state.tool_call("tool-1").unwrap();
    assert_eq!(record.name, "search");
    assert_eq!(record.args, "{\"q\":1}");
    assert_eq!(record.status, ToolCallStatus::Error);
    assert!(record.result.is_none());
}

#[tokio::test]
async fn test_interleaved_streams_stay_keyed() {
    let mut client = AgentClient::new();
    let feed = [
        AgUiEvent::text_message_start("msg-a", MessageRole::Assistant),
        AgUiEvent::tool_call_start("tool-x", "lookup"),
        AgUiEvent::text_message_start("msg-b", MessageRole::Assistant),
        AgUiEvent::text_message_content("msg-a", "first"),
        AgUiEvent::tool_call_args("tool-x", "{}"),
        AgUiEvent::text_message_content("msg-b", "second"),
        AgUiEvent::text_message_content("msg-a", " half"),
    ];

    for event in feed {
        client.handle_event(event).await.unwrap();
    }

    let state = client.snapshot();
    assert_eq!(state.message("msg-a").unwrap().content, "first half");
    assert_eq!(state.message("msg-b").unwrap().content, "second");
    assert_eq!(state.tool_call("tool-x").unwrap().args, "{}");
    assert_eq!(
        state.tool_call("tool-x").unwrap().status,
        ToolCallStatus::Running
    );
}

// =============================================================================
// Stream output
// =============================================================================

#[tokio::test]
async fn test_snapshot_stream_tracks_progression() {
    let mut client = AgentClient::new();
    let mut snapshots = client.snapshot_stream();

    // A watch stream yields the current snapshot first.
    assert_eq!(snapshots.next().await.unwrap().status, AgentStatus::Idle);

    client
        .handle_event(AgUiEvent::run_started("thread-1", "run-1"))
        .await
        .unwrap();
    assert_eq!(snapshots.next().await.unwrap().status, AgentStatus::Running);

    client
        .handle_event(AgUiEvent::run_finished("thread-1", "run-1"))
        .await
        .unwrap();
    assert_eq!(
        snapshots.next().await.unwrap().status,
        AgentStatus::Connected
    );
}

#[tokio::test]
async fn test_raw_tap_passes_unknown_events_through() {
    let mut client = AgentClient::new();
    let mut rx = client.subscribe_events();

    let wire = json!({"type": "EMOTION", "intensity": 3});
    client.handle_value(wire.clone()).await.unwrap();

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, AgUiEvent::Unknown(_)));
    assert_eq!(event.event_type(), "EMOTION");
    // Reserializing reproduces the original frame.
    assert_eq!(serde_json::to_value(&event).unwrap(), wire);
}

#[tokio::test]
async fn test_events_of_type_filters_content_deltas() {
    let mut client = AgentClient::new();
    let mut deltas = Box::pin(client.events_of_type("TEXT_MESSAGE_CONTENT"));

    let feed = [
        AgUiEvent::run_started("thread-1", "run-1"),
        AgUiEvent::text_message_start("msg-1", MessageRole::Assistant),
        AgUiEvent::text_message_content("msg-1", "Hi"),
        AgUiEvent::text_message_content("msg-1", " there"),
        AgUiEvent::run_finished("thread-1", "run-1"),
    ];
    for event in feed {
        client.handle_event(event).await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..2 {
        if let Some(AgUiEvent::TextMessageContent(ev)) = deltas.next().await {
            seen.push(ev.delta);
        }
    }
    assert_eq!(seen, vec!["Hi".to_string(), " there".to_string()]);
}

// =============================================================================
// Failure and recovery paths
// =============================================================================

#[tokio::test]
async fn test_failed_delta_keeps_prior_state_and_publishes_nothing() {
    let mut client = AgentClient::new();
    client
        .handle_event(AgUiEvent::state_snapshot(json!({"a": 2})))
        .await
        .unwrap();

    let rx = client.subscribe_snapshots();

    let err = client
        .handle_event(AgUiEvent::state_delta(vec![
            JsonPatchOp::test("/a", json!(1)),
            JsonPatchOp::add("/b", json!(2)),
        ]))
        .await
        .unwrap_err();

    assert!(matches!(err, StateError::PatchTestFailed { .. }));
    assert_eq!(client.state().state, json!({"a": 2}));
    // No snapshot was published for the rejected event.
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_sink_sees_the_whole_run() {
    let sink = InMemoryEventSink::new();
    let mut client = AgentClient::new().with_sink(Arc::new(sink.clone()));

    let feed = [
        r#"{"type": "RUN_STARTED", "thread_id": "thread-1", "run_id": "run-1"}"#,
        r#"{"type": "STEP_STARTED", "step_name": "answer"}"#,
        r#"{"type": "STEP_FINISHED", "step_name": "answer"}"#,
        r#"{"type": "RUN_FINISHED", "thread_id": "thread-1", "run_id": "run-1"}"#,
    ];
    for line in feed {
        client.handle_json(line).await.unwrap();
    }

    assert_eq!(sink.event_count().await, 4);
    let snapshots = sink.snapshots().await;
    assert_eq!(snapshots.len(), 4);
    assert_eq!(snapshots.last().unwrap().status, AgentStatus::Connected);
}

#[tokio::test]
async fn test_reset_after_activity_returns_to_baseline() {
    let mut client = AgentClient::new();
    let feed = [
        r#"{"type": "RUN_STARTED", "thread_id": "thread-1", "run_id": "run-1"}"#,
        r#"{"type": "TEXT_MESSAGE_START", "message_id": "msg-1", "role": "user"}"#,
        r#"{"type": "STATE_SNAPSHOT", "snapshot": {"x": 1}}"#,
        r#"{"type": "RUN_ERROR", "message": "boom", "code": "E1"}"#,
    ];
    for line in feed {
        client.handle_json(line).await.unwrap();
    }

    client.reset();
    assert_eq!(client.snapshot(), AgentState::default());

    // The client is immediately usable for a fresh run.
    client
        .handle_json(r#"{"type": "RUN_STARTED", "thread_id": "thread-2", "run_id": "run-2"}"#)
        .await
        .unwrap();
    assert_eq!(client.status(), AgentStatus::Running);
    assert_eq!(client.state().thread_id.as_deref(), Some("thread-2"));
}

#[tokio::test]
async fn test_envelope_fields_survive_intake() {
    let mut client = AgentClient::new();
    let mut rx = client.subscribe_events();

    client
        .handle_json(
            r#"{"type": "TEXT_MESSAGE_START", "message_id": "msg-1", "role": "assistant",
                "timestamp": 5, "rawEvent": {"source": "sse"}}"#,
        )
        .await
        .unwrap();

    let event = rx.recv().await.unwrap();
    assert_eq!(event.timestamp(), Some(5));
    let wire = serde_json::to_value(&event).unwrap();
    assert_eq!(wire["rawEvent"], json!({"source": "sse"}));

    // The message inherits the event timestamp.
    assert_eq!(client.state().messages[0].timestamp, Some(5));
}
