//! Wire format for events pushed to traffic observers.

use serde::{Deserialize, Serialize};

use callscope_types::ContractCall;

/// An event broadcast to every connected traffic observer.
///
/// Serialized as a tagged envelope so clients can dispatch on the
/// `event` field: `{"event": "new_call", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum TrafficEvent {
    /// A contract call was just recorded. Emitted once per successful ingest.
    NewCall(ContractCall),
}

#[cfg(test)]
mod tests {
    use super::*;
    use callscope_types::{Address, CallId, Timestamp};

    #[test]
    fn new_call_serializes_as_tagged_envelope() {
        let event = TrafficEvent::NewCall(ContractCall {
            id: CallId::new(7),
            from: Address::from("0xabc"),
            to: Address::from("0xdef"),
            method: "transfer".to_string(),
            call_time: Timestamp::from_millis(1_000),
            confirmed_at: None,
        });

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&event).unwrap()).unwrap();
        assert_eq!(value["event"], "new_call");
        assert_eq!(value["data"]["id"], 7);
        assert_eq!(value["data"]["from"], "0xabc");
        assert_eq!(value["data"]["method"], "transfer");
        assert!(value["data"]["confirmed_at"].is_null());
    }
}
