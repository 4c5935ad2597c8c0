use std::collections::BTreeMap;
use std::io::Cursor;

use packed_struct::PrimitiveEnum;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use z2m::event::{AttributeEvent, AttributeKey, EventType};
use zcl::attr::{ZclAttr, ZclCommand, ZclReadAttrResp, ZclReportAttr};
use zcl::cluster::{self, Cluster};
use zcl::frame::ZclFrame;

use crate::error::SwitchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    AttributeReport,
    ReadResponse,
}

/// Attribute values received from one endpoint of the device, keyed by
/// numeric attribute id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub endpoint: u8,
    pub cluster: Cluster,
    pub kind: MessageKind,
    pub data: BTreeMap<u16, i64>,
}

impl InboundMessage {
    #[must_use]
    pub const fn new(endpoint: u8, cluster: Cluster, kind: MessageKind) -> Self {
        Self {
            endpoint,
            cluster,
            kind,
            data: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, id: u16, raw: i64) -> Self {
        self.data.insert(id, raw);
        self
    }

    /// Build from a herdsman attribute event.
    ///
    /// Returns `None` for event types and clusters the switch codec does not
    /// consume. Attributes with unknown symbolic names or non-integer values
    /// are dropped.
    pub fn from_event(evt: &AttributeEvent) -> SwitchResult<Option<Self>> {
        let kind = match evt.event_type {
            EventType::AttributeReport => MessageKind::AttributeReport,
            EventType::ReadResponse => MessageKind::ReadResponse,
            EventType::Other => return Ok(None),
        };

        let Some(cluster) = Cluster::from_name(&evt.cluster) else {
            log::debug!("Ignoring event for cluster {}", evt.cluster);
            return Ok(None);
        };

        let mut msg = Self::new(evt.endpoint, cluster, kind);

        for (key, value) in evt.attributes() {
            let key = match key {
                Ok(key) => key,
                Err(err) => {
                    log::warn!("[{cluster}] Skipping malformed attribute key: {err}");
                    continue;
                }
            };

            let id = match key {
                AttributeKey::Id(id) => id,
                AttributeKey::Name(name) => {
                    let Some(id) = cluster.attribute_by_name(&name) else {
                        log::debug!("[{cluster}] Skipping unknown attribute {name:?}");
                        continue;
                    };
                    id
                }
            };

            let raw = match value {
                Value::Number(num) => num.as_i64(),
                Value::Bool(flag) => Some(i64::from(*flag)),
                _ => None,
            };

            match raw {
                Some(raw) => {
                    msg.data.insert(id, raw);
                }
                None => log::warn!("[{cluster}] Attribute {id:04x} has non-integer value {value}"),
            }
        }

        Ok(Some(msg))
    }

    /// Build from a raw zcl frame (header included) received on `endpoint`.
    ///
    /// Only read responses and attribute reports become messages.
    pub fn from_zcl(endpoint: u8, cluster_id: u16, data: &[u8]) -> SwitchResult<Option<Self>> {
        let Some(cluster) = Cluster::from_id(cluster_id) else {
            return Ok(None);
        };

        let mut cur = Cursor::new(data);
        let frame = ZclFrame::parse(&mut cur)?;
        let body = &data[cur.position() as usize..];

        if frame.is_cluster_specific() {
            return Ok(None);
        }

        let (kind, attrs) = match ZclCommand::from_primitive(frame.cmd) {
            Some(ZclCommand::ReadAttribResp) => (
                MessageKind::ReadResponse,
                ZclReadAttrResp::parse(body)?.attr,
            ),
            Some(ZclCommand::ReportAttrib) => {
                (MessageKind::AttributeReport, ZclReportAttr::parse(body)?.attr)
            }
            _ => return Ok(None),
        };

        let mut msg = Self::new(endpoint, cluster, kind);
        for ZclAttr { key, value } in attrs {
            match value.as_integer() {
                Some(raw) => {
                    msg.data.insert(key, raw);
                }
                None => log::debug!("[{cluster}] Skipping attribute {key:04x}: {value:?}"),
            }
        }

        Ok(Some(msg))
    }
}

fn u16_hex<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    u16::from_str_radix(s.trim_start_matches("0x"), 16).map_err(serde::de::Error::custom)
}

fn vec_hex<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    hex::decode(s).map_err(serde::de::Error::custom)
}

/// One captured zcl frame, as a json line:
/// `{"endpoint": 2, "cluster": "0007", "data": "18010a00ff3001"}`
#[derive(Debug, Clone, Deserialize)]
pub struct ZclRecord {
    pub endpoint: u8,

    #[serde(deserialize_with = "u16_hex")]
    pub cluster: u16,

    #[serde(deserialize_with = "vec_hex")]
    pub data: Vec<u8>,
}

impl ZclRecord {
    pub fn message(&self) -> SwitchResult<Option<InboundMessage>> {
        InboundMessage::from_zcl(self.endpoint, self.cluster, &self.data)
    }

    /// Human readable description of the frame, for diagnostics
    pub fn describe(&self) -> SwitchResult<Option<String>> {
        let mut cur = Cursor::new(&self.data);
        let frame = ZclFrame::parse(&mut cur)?;
        let body = &self.data[cur.position() as usize..];

        if !frame.is_cluster_specific() {
            return Ok(cluster::standard::describe(&frame, body)?);
        }

        match Cluster::from_id(self.cluster) {
            Some(Cluster::OnOff) => Ok(cluster::onoff::describe(&frame, body)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use z2m::event::AttributeEvent;
    use zcl::cluster::Cluster;

    use crate::codec::message::{InboundMessage, MessageKind, ZclRecord};

    fn event(value: serde_json::Value) -> AttributeEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn event_with_symbolic_and_numeric_keys() {
        let evt = event(json!({
            "type": "readResponse",
            "cluster": "genOnOffSwitchCfg",
            "endpoint": 2,
            "data": {"65280": 1, "switchActions": 2, "switchType": 0},
        }));

        let msg = InboundMessage::from_event(&evt).unwrap().unwrap();
        assert_eq!(
            msg,
            InboundMessage::new(2, Cluster::OnOffSwitchCfg, MessageKind::ReadResponse)
                .with(0xff00, 1)
                .with(0x0010, 2)
                .with(0x0000, 0)
        );
    }

    #[test]
    fn event_drops_bad_values() {
        let evt = event(json!({
            "type": "attributeReport",
            "cluster": "genOnOff",
            "endpoint": 2,
            "data": {"onOff": true, "mystery": 1, "16384": "x"},
        }));

        let msg = InboundMessage::from_event(&evt).unwrap().unwrap();
        assert_eq!(msg.data.len(), 1);
        assert_eq!(msg.data[&0x0000], 1);
    }

    #[test]
    fn event_skips_malformed_keys() {
        let evt = event(json!({
            "type": "attributeReport",
            "cluster": "genOnOffSwitchCfg",
            "endpoint": 2,
            "data": {"70000": 1, "": 4, "65281": 3},
        }));

        let msg = InboundMessage::from_event(&evt).unwrap().unwrap();
        assert_eq!(
            msg,
            InboundMessage::new(2, Cluster::OnOffSwitchCfg, MessageKind::AttributeReport)
                .with(0xff01, 3)
        );
    }

    #[test]
    fn event_ignored_kinds() {
        let evt = event(json!({
            "type": "commandToggle",
            "cluster": "genOnOff",
            "endpoint": 2,
            "data": {},
        }));
        assert_eq!(InboundMessage::from_event(&evt).unwrap(), None);

        let evt = event(json!({
            "type": "attributeReport",
            "cluster": "genLevelCtrl",
            "endpoint": 2,
            "data": {"currentLevel": 3},
        }));
        assert_eq!(InboundMessage::from_event(&evt).unwrap(), None);
    }

    #[test]
    fn zcl_report() {
        let rec: ZclRecord = serde_json::from_value(json!({
            "endpoint": 2,
            "cluster": "0007",
            "data": "18010a00ff300102ff21f401",
        }))
        .unwrap();

        let msg = rec.message().unwrap().unwrap();
        assert_eq!(msg.kind, MessageKind::AttributeReport);
        assert_eq!(msg.cluster, Cluster::OnOffSwitchCfg);
        assert_eq!(msg.data[&0xff00], 1);
        assert_eq!(msg.data[&0xff02], 500);
    }

    #[test]
    fn zcl_read_response_skips_failed_status() {
        let msg = InboundMessage::from_zcl(2, 0x0006, &hex::decode("180201000000100103ff86").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(msg.kind, MessageKind::ReadResponse);
        assert_eq!(msg.cluster, Cluster::OnOff);
        assert_eq!(msg.data.len(), 1);
        assert_eq!(msg.data[&0x0000], 1);
    }

    #[test]
    fn zcl_ignored_frames() {
        // write attribute response
        assert_eq!(
            InboundMessage::from_zcl(2, 0x0007, &hex::decode("18030400").unwrap()).unwrap(),
            None
        );
        // on/off toggle command
        assert_eq!(
            InboundMessage::from_zcl(2, 0x0006, &hex::decode("010402").unwrap()).unwrap(),
            None
        );
        // unknown cluster
        assert_eq!(
            InboundMessage::from_zcl(2, 0x0008, &hex::decode("18010a").unwrap()).unwrap(),
            None
        );
    }

    #[test]
    fn zcl_truncated_frame() {
        assert!(InboundMessage::from_zcl(2, 0x0007, &[0x18]).is_err());
    }

    #[test]
    fn describe_record() {
        let rec = ZclRecord {
            endpoint: 2,
            cluster: 0x0006,
            data: hex::decode("010402").unwrap(),
        };
        assert_eq!(rec.describe().unwrap().as_deref(), Some("Toggle"));
    }
}
