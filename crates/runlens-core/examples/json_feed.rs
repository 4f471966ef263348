//! JSON Feed Example - Consume raw wire events at the trust boundary
//!
//! Feeds one JSON event per line, the way a transport hands them over,
//! and shows the tolerant intake path:
//! - unknown event types pass through with a warning
//! - frames without a string `type` tag are dropped
//! - a failed STATE_DELTA leaves the prior state intact
//!
//! Run with: cargo run -p runlens-core --example json_feed

use runlens_core::AgentClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("=== JSON Feed (runlens-core) ===\n");

    let feed = [
        r#"{"type": "RUN_STARTED", "thread_id": "thread-9", "run_id": "run-42"}"#,
        r#"{"type": "TEXT_MESSAGE_START", "message_id": "msg-1", "role": "assistant"}"#,
        r#"{"type": "TEXT_MESSAGE_CONTENT", "message_id": "msg-1", "delta": "Hello from the wire"}"#,
        r#"{"type": "TEXT_MESSAGE_END", "message_id": "msg-1"}"#,
        r#"{"type": "STATE_SNAPSHOT", "snapshot": {"progress": 0}}"#,
        // Passes the test precondition, so both ops apply
        r#"{"type": "STATE_DELTA", "delta": [{"op": "test", "path": "/progress", "value": 0}, {"op": "replace", "path": "/progress", "value": 1}]}"#,
        // Fails the test precondition, so the whole delta is discarded
        r#"{"type": "STATE_DELTA", "delta": [{"op": "test", "path": "/progress", "value": 99}, {"op": "replace", "path": "/progress", "value": 2}]}"#,
        // Unknown type: logged, kept on the tap, state untouched
        r#"{"type": "HEARTBEAT", "sequence": 7}"#,
        // No string type tag: dropped at the boundary
        r#"{"type": 7}"#,
        r#"{"type": "RUN_FINISHED", "thread_id": "thread-9", "run_id": "run-42"}"#,
    ];

    let mut client = AgentClient::new();

    for line in feed {
        match client.handle_json(line).await {
            Ok(()) => {}
            Err(error) => println!("  rejected: {error}"),
        }
    }

    let state = client.snapshot();
    println!("\nFinal status: {:?}", state.status);
    if let Some(message) = state.last_message() {
        println!("Assistant said: {:?}", message.content);
    }
    println!("Shared state: {}", state.state);

    Ok(())
}
