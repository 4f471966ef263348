// Public contracts for the Runlens client runtime
// This crate defines AG-UI wire event types, the chat message model,
// and the JSON Patch op DTO carried by STATE_DELTA events

pub mod events;
pub mod messages;

pub use events::*;
pub use messages::*;
