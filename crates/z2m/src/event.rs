//! Attribute events in the shape zigbee-herdsman hands to converters

use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Z2mError, Z2mResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    AttributeReport,
    ReadResponse,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub cluster: String,
    pub endpoint: u8,
    pub data: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkquality: Option<u8>,
}

impl AttributeEvent {
    pub fn from_json(line: &str) -> Z2mResult<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Iterate over the data fields with their keys parsed
    pub fn attributes(&self) -> impl Iterator<Item = (Z2mResult<AttributeKey>, &Value)> {
        self.data.iter().map(|(key, value)| (key.parse(), value))
    }
}

/// Attribute identifier as found in herdsman payloads: either a numeric
/// attribute id ("65280") or a symbolic name ("switchActions").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKey {
    Id(u16),
    Name(String),
}

impl FromStr for AttributeKey {
    type Err = Z2mError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(Z2mError::EmptyAttributeKey);
        }

        if s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self::Id(s.parse()?))
        } else {
            Ok(Self::Name(s.to_string()))
        }
    }
}

impl Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Z2mError;
    use crate::event::{AttributeEvent, AttributeKey, EventType};

    #[test]
    fn parse_report() {
        let evt = AttributeEvent::from_json(
            r#"{"type":"attributeReport","cluster":"genOnOffSwitchCfg","endpoint":2,"data":{"65280":1,"switchActions":2},"linkquality":120}"#,
        )
        .unwrap();

        assert_eq!(evt.event_type, EventType::AttributeReport);
        assert_eq!(evt.endpoint, 2);
        assert_eq!(evt.linkquality, Some(120));

        let keys: Vec<_> = evt.attributes().map(|(k, _)| k.unwrap()).collect();
        assert_eq!(
            keys,
            vec![
                AttributeKey::Id(65280),
                AttributeKey::Name("switchActions".into())
            ]
        );
    }

    #[test]
    fn parse_other_event_type() {
        let evt = AttributeEvent::from_json(
            r#"{"type":"commandOn","cluster":"genOnOff","endpoint":2,"data":{}}"#,
        )
        .unwrap();
        assert_eq!(evt.event_type, EventType::Other);
    }

    #[test]
    fn attribute_keys() {
        assert_eq!("16".parse::<AttributeKey>().unwrap(), AttributeKey::Id(16));
        assert_eq!(
            "onOff".parse::<AttributeKey>().unwrap(),
            AttributeKey::Name("onOff".into())
        );
        assert!(matches!(
            "70000".parse::<AttributeKey>().unwrap_err(),
            Z2mError::ParseIntError(_)
        ));
        assert!(matches!(
            "".parse::<AttributeKey>().unwrap_err(),
            Z2mError::EmptyAttributeKey
        ));
        assert_eq!(AttributeKey::Id(65281).to_string(), "65281");
    }
}
