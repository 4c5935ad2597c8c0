use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(
        rename = "manufacturerCode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub manufacturer_code: Option<u16>,
}

/// Payload for `<device>/<endpoint>/set/read`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeRead {
    pub cluster: String,
    pub attributes: Vec<Value>,
    #[serde(default)]
    pub options: RequestOptions,
}

/// Payload for `<device>/<endpoint>/set/write`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeWrite {
    pub cluster: String,
    pub payload: Map<String, Value>,
    #[serde(default)]
    pub options: RequestOptions,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Z2mRequest {
    Read(AttributeRead),

    Write(AttributeWrite),

    /// Plain property update, e.g. `{"state": "ON"}`
    Untyped(Map<String, Value>),
}

impl Z2mRequest {
    /// Topic (relative to the z2m base topic) this request is published on
    #[must_use]
    pub fn topic(&self, device: &str, endpoint: u8) -> String {
        match self {
            Self::Read(_) => format!("{device}/{endpoint}/set/read"),
            Self::Write(_) => format!("{device}/{endpoint}/set/write"),
            Self::Untyped(_) => format!("{device}/{endpoint}/set"),
        }
    }
}
