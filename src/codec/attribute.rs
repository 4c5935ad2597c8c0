//! Static attribute table for the switch configuration cluster.
//!
//! Every custom attribute the switch firmware exposes is listed here, along
//! with the single standard attribute (`switchActions`) it shares with the
//! public on/off switch configuration cluster. Decoder, encoder and the
//! expose metadata all read from [`ATTRIBUTES`].

use serde_json::Value;

use zcl::attr::ZclAttrValue;
use zcl::cluster::switchcfg;

use crate::error::{SwitchError, SwitchResult};

/// Manufacturer code of the NXP/Jennic proprietary attribute space
pub const JENNIC_VENDOR_ID: u16 = 0x1037;

pub const SWITCH_TYPE_VALUES: &[&str] = &["toggle", "momentary", "multifunction"];
pub const SWITCH_ACTION_VALUES: &[&str] = &["onOff", "offOn", "toggle"];
pub const RELAY_MODE_VALUES: &[&str] = &["unlinked", "front", "single", "double", "tripple", "long"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    UInt16,
    Enum8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireId {
    /// Attribute in the manufacturer specific range
    Manufacturer(u16),
    /// Attribute defined by the cluster library, known by name to herdsman
    Standard { id: u16, name: &'static str },
}

impl WireId {
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Manufacturer(id) | Self::Standard { id, .. } => id,
        }
    }

    /// Key used for this attribute in herdsman payloads
    #[must_use]
    pub fn key(self) -> String {
        match self {
            Self::Manufacturer(id) => id.to_string(),
            Self::Standard { name, .. } => name.to_string(),
        }
    }
}

#[derive(Debug)]
pub struct AttributeSpec {
    pub name: &'static str,
    pub wire_id: WireId,
    pub wire_type: WireType,
    pub domain: Option<&'static [&'static str]>,
    pub vendor_framing: bool,
    pub description: &'static str,
}

impl AttributeSpec {
    #[must_use]
    pub const fn manufacturer_code(&self) -> Option<u16> {
        if self.vendor_framing {
            Some(JENNIC_VENDOR_ID)
        } else {
            None
        }
    }

    /// Label at position `ordinal` of the value domain
    pub fn label(&self, ordinal: i64) -> SwitchResult<&'static str> {
        let labels = self.domain.unwrap_or_default();
        usize::try_from(ordinal)
            .ok()
            .and_then(|idx| labels.get(idx).copied())
            .ok_or(SwitchError::OrdinalOutOfRange {
                attr: self.name,
                ordinal,
            })
    }

    /// Position of `label` in the value domain
    pub fn ordinal(&self, label: &str) -> SwitchResult<u8> {
        let labels = self.domain.unwrap_or_default();
        labels
            .iter()
            .position(|lbl| *lbl == label)
            .and_then(|idx| u8::try_from(idx).ok())
            .ok_or_else(|| SwitchError::UnknownLabel {
                attr: self.name,
                label: label.to_string(),
                expected: labels.join(", "),
            })
    }

    /// Convert a requested value into its typed wire representation
    pub fn wire_value(&self, value: &Value) -> SwitchResult<ZclAttrValue> {
        let invalid = || SwitchError::InvalidValue {
            attr: self.name.to_string(),
            value: value.clone(),
        };

        match (self.domain, self.wire_type) {
            (Some(_), _) => {
                let label = value.as_str().ok_or_else(invalid)?;
                Ok(ZclAttrValue::E8(self.ordinal(label)?))
            }
            (None, WireType::UInt16) => {
                let num = match value {
                    Value::Number(num) => num.as_u64(),
                    Value::String(text) => text.trim().parse().ok(),
                    _ => None,
                };
                num.and_then(|n| u16::try_from(n).ok())
                    .map(ZclAttrValue::U16)
                    .ok_or_else(invalid)
            }
            (None, WireType::Enum8) => {
                let num = value.as_u64().and_then(|n| u8::try_from(n).ok());
                num.map(ZclAttrValue::E8).ok_or_else(invalid)
            }
        }
    }
}

pub static ATTRIBUTES: [AttributeSpec; 5] = [
    AttributeSpec {
        name: "switch_type",
        wire_id: WireId::Manufacturer(0xFF00),
        wire_type: WireType::Enum8,
        domain: Some(SWITCH_TYPE_VALUES),
        vendor_framing: true,
        description: "How the button is interpreted",
    },
    AttributeSpec {
        name: "switch_actions",
        wire_id: WireId::Standard {
            id: switchcfg::ATTR_SWITCH_ACTIONS,
            name: "switchActions",
        },
        wire_type: WireType::Enum8,
        domain: Some(SWITCH_ACTION_VALUES),
        vendor_framing: false,
        description: "Commands sent on button press and release",
    },
    AttributeSpec {
        name: "relay_mode",
        wire_id: WireId::Manufacturer(0xFF01),
        wire_type: WireType::Enum8,
        domain: Some(RELAY_MODE_VALUES),
        vendor_framing: true,
        description: "Which button event toggles the relay",
    },
    AttributeSpec {
        name: "max_pause",
        wire_id: WireId::Manufacturer(0xFF02),
        wire_type: WireType::UInt16,
        domain: None,
        vendor_framing: true,
        description: "Maximum pause between clicks of a multi-click",
    },
    AttributeSpec {
        name: "min_long_press",
        wire_id: WireId::Manufacturer(0xFF03),
        wire_type: WireType::UInt16,
        domain: None,
        vendor_framing: true,
        description: "Minimal duration of a long press",
    },
];

pub fn lookup(name: &str) -> SwitchResult<&'static AttributeSpec> {
    ATTRIBUTES
        .iter()
        .find(|spec| spec.name == name)
        .ok_or_else(|| SwitchError::UnknownAttribute(name.to_string()))
}

#[must_use]
pub fn lookup_wire(code: u16) -> Option<&'static AttributeSpec> {
    ATTRIBUTES.iter().find(|spec| spec.wire_id.code() == code)
}
