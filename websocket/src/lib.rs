//! Live traffic broadcast.
//!
//! Every successfully ingested contract call is pushed to all connected
//! WebSocket observers as a `new_call` event. The hub keeps one bounded
//! queue per observer so a slow client is dropped instead of stalling
//! ingestion.

pub mod events;
pub mod hub;
pub mod server;

pub use events::TrafficEvent;
pub use hub::{ObserverId, ObserverState, TrafficHub, DEFAULT_OBSERVER_BUFFER};
