//! Replay Example - Drive the client from a canned event sequence
//!
//! Replays a complete agent run (streamed message, tool call, shared
//! state updates) through the client and prints how the aggregate state
//! evolves after each event.
//!
//! Run with: cargo run -p runlens-core --example replay

use std::sync::Arc;

use runlens_core::{AgUiEvent, AgentClient, InMemoryEventSink, JsonPatchOp, MessageRole};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== Replay (runlens-core) ===\n");

    // 1. Create a client with an in-memory sink acting as the session log
    let log = InMemoryEventSink::new();
    let mut client = AgentClient::new().with_sink(Arc::new(log.clone()));

    // 2. Script one complete run
    let feed = vec![
        AgUiEvent::run_started("thread-1", "run-1"),
        AgUiEvent::step_started("research"),
        AgUiEvent::text_message_start("msg-1", MessageRole::Assistant),
        AgUiEvent::text_message_content("msg-1", "Checking the"),
        AgUiEvent::text_message_content("msg-1", " latest docs."),
        AgUiEvent::text_message_end("msg-1"),
        AgUiEvent::tool_call_start("tool-1", "search_docs"),
        AgUiEvent::tool_call_args("tool-1", "{\"query\":"),
        AgUiEvent::tool_call_args("tool-1", "\"broadcast channel\"}"),
        AgUiEvent::tool_call_result("tool-1", json!({"hits": 2})),
        AgUiEvent::tool_call_end("tool-1"),
        AgUiEvent::state_snapshot(json!({"sources": {"found": 0}})),
        AgUiEvent::state_delta(vec![
            JsonPatchOp::replace("/sources/found", json!(2)),
            JsonPatchOp::add("/sources/reviewed", json!(true)),
        ]),
        AgUiEvent::step_finished("research"),
        AgUiEvent::run_finished("thread-1", "run-1"),
    ];

    // 3. Apply the events one at a time, narrating the state
    for event in feed {
        let label = event.event_type().to_string();
        client.handle_event(event).await?;

        let state = client.state();
        println!(
            "{label:<22} status={:?} step={:?} messages={} tool_calls={}",
            state.status,
            state.current_step,
            state.messages.len(),
            state.active_tool_calls.len()
        );
    }

    // 4. Inspect the final snapshot
    let state = client.snapshot();
    if let Some(message) = state.last_message() {
        println!("\nAssistant said: {:?}", message.content);
    }
    if let Some(tool) = state.tool_call("tool-1") {
        println!(
            "Tool {} finished {:?} with args {}",
            tool.name, tool.status, tool.args
        );
    }
    println!("Shared state: {}", serde_json::to_string_pretty(&state.state)?);

    // 5. The sink saw the whole feed
    println!("\n(session log captured {} events)", log.event_count().await);

    Ok(())
}
