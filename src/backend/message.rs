use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SET_DATASET: &str = "set_dataset";
pub const REFRESH: &str = "refresh";

/// Outbound `(type, payload)` pair for the application server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: IndexMap<String, Value>,
}

impl BackendMessage {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: IndexMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    pub fn set_dataset(name: &str) -> Self {
        Self::new(SET_DATASET).with("dataset_name", name)
    }

    pub fn refresh() -> Self {
        Self::new(REFRESH)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::BackendMessage;

    #[test]
    fn set_dataset_wire_shape() {
        let json = BackendMessage::set_dataset("quickstart")
            .to_json()
            .expect("serialize");
        assert_eq!(
            json,
            r#"{"type":"set_dataset","payload":{"dataset_name":"quickstart"}}"#
        );
    }

    #[test]
    fn refresh_has_empty_payload() {
        let json = BackendMessage::refresh().to_json().expect("serialize");
        assert_eq!(json, r#"{"type":"refresh","payload":{}}"#);
    }

    #[test]
    fn payload_keeps_insertion_order() {
        let message = BackendMessage::new("custom").with("z", 1).with("a", 2);
        let json = message.to_json().expect("serialize");
        assert_eq!(json, r#"{"type":"custom","payload":{"z":1,"a":2}}"#);
        let back: BackendMessage = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, message);
    }
}
