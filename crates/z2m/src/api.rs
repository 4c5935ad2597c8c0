use std::collections::HashMap;
use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RawMessage {
    pub topic: String,
    pub payload: Value,
}

/// Expose access bits, as used by zigbee-herdsman-converters
pub mod access {
    /// Property is published in device state
    pub const STATE: u8 = 1 << 0;
    /// Property can be set
    pub const SET: u8 = 1 << 1;
    /// Property can be read back from the device
    pub const GET: u8 = 1 << 2;

    pub const ALL: u8 = STATE | SET | GET;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceDefinition {
    pub model: String,
    pub vendor: String,
    pub description: String,
    pub exposes: Vec<Expose>,
    pub supports_ota: bool,
    #[serde(default)]
    pub options: Vec<Expose>,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expose {
    Binary(ExposeBinary),
    Enum(ExposeEnum),
    Numeric(ExposeNumeric),
    Switch(ExposeSwitch),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExposeCategory {
    Config,
    Diagnostic,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExposeBase {
    pub name: Option<String>,
    pub label: Option<String>,
    #[serde(default)]
    pub access: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub property: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Expose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExposeCategory>,
}

impl ExposeBase {
    /// Base for a named property, postfixed with the endpoint name when one is given
    #[must_use]
    pub fn named(name: &str, access: u8, endpoint: Option<&str>) -> Self {
        let property = endpoint.map_or_else(|| name.to_string(), |ep| format!("{name}_{ep}"));
        Self {
            name: Some(name.to_string()),
            label: Some(label_for(name)),
            access,
            endpoint: endpoint.map(ToString::to_string),
            property: Some(property),
            ..Self::default()
        }
    }
}

/// "min_long_press" -> "Min long press"
fn label_for(name: &str) -> String {
    let text = name.replace('_', " ");
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Expose {
    #[must_use]
    pub const fn base(&self) -> &ExposeBase {
        match self {
            Self::Binary(exp) => &exp.base,
            Self::Enum(exp) => &exp.base,
            Self::Numeric(exp) => &exp.base,
            Self::Switch(exp) => &exp.base,
        }
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.base().name.as_deref()
    }

    #[must_use]
    pub fn property(&self) -> Option<&str> {
        self.base().property.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposeBinary {
    #[serde(flatten)]
    pub base: ExposeBase,
    pub value_off: Value,
    pub value_on: Value,
    pub value_toggle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposeEnum {
    #[serde(flatten)]
    pub base: ExposeBase,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposeNumeric {
    #[serde(flatten)]
    pub base: ExposeBase,

    pub unit: Option<String>,
    pub value_max: Option<f64>,
    pub value_min: Option<f64>,
    pub value_step: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposeSwitch {
    #[serde(flatten)]
    pub base: ExposeBase,
}

impl ExposeSwitch {
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Expose> {
        self.base
            .features
            .iter()
            .find(|exp| exp.name() == Some(name))
    }
}

/// Endpoint name to endpoint id, as published by a multi-endpoint definition
pub type EndpointMap = HashMap<String, u8>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api::{access, Expose, ExposeBase, ExposeEnum, RawMessage};

    #[test]
    fn expose_base_postfix() {
        let base = ExposeBase::named("relay_mode", access::ALL, Some("button_1"));
        assert_eq!(base.property.as_deref(), Some("relay_mode_button_1"));
        assert_eq!(base.label.as_deref(), Some("Relay mode"));
        assert_eq!(base.access, 7);

        let base = ExposeBase::named("state", access::STATE, None);
        assert_eq!(base.property.as_deref(), Some("state"));
    }

    #[test]
    fn expose_enum_json() {
        let exp = Expose::Enum(ExposeEnum {
            base: ExposeBase::named("switch_type", access::ALL, Some("button_1")),
            values: vec![json!("toggle"), json!("momentary")],
        });

        let value = serde_json::to_value(&exp).unwrap();
        assert_eq!(value["type"], "enum");
        assert_eq!(value["property"], "switch_type_button_1");
        assert_eq!(value["endpoint"], "button_1");
        assert_eq!(value["values"], json!(["toggle", "momentary"]));

        let back: Expose = serde_json::from_value(value).unwrap();
        assert_eq!(back, exp);
    }

    #[test]
    fn raw_message_strict() {
        let res = serde_json::from_value::<RawMessage>(json!({
            "topic": "hello_switch",
            "payload": {},
            "extra": 1,
        }));
        assert!(res.is_err());
    }
}
