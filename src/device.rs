use serde_json::json;

use z2m::api::{
    access, DeviceDefinition, EndpointMap, Expose, ExposeBase, ExposeBinary, ExposeCategory,
    ExposeEnum, ExposeNumeric, ExposeSwitch,
};

use crate::codec::attribute::{AttributeSpec, ATTRIBUTES};
use crate::codec::endpoint::EndpointResolver;
use crate::codec::{SwitchCodec, STATE_FIELD};
use crate::config::DeviceConfig;
use crate::error::SwitchResult;

pub const ZIGBEE_MODEL: &str = "Hello Zigbee Switch";
pub const VENDOR: &str = "NXP";
pub const DESCRIPTION: &str = "Hello Zigbee Switch";

/// A registered switch: identity, endpoint layout and codec
#[derive(Debug, Clone)]
pub struct SwitchDevice {
    friendly_name: String,
    codec: SwitchCodec,
}

impl SwitchDevice {
    #[must_use]
    pub const fn new(friendly_name: String, endpoints: EndpointResolver) -> Self {
        Self {
            friendly_name,
            codec: SwitchCodec::new(endpoints),
        }
    }

    pub fn from_config(conf: &DeviceConfig) -> SwitchResult<Self> {
        let endpoints = EndpointResolver::sequential(conf.first_endpoint, conf.endpoints)?;
        Ok(Self::new(conf.friendly_name.clone(), endpoints))
    }

    #[must_use]
    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    #[must_use]
    pub const fn codec(&self) -> &SwitchCodec {
        &self.codec
    }

    #[must_use]
    pub fn endpoint_map(&self) -> EndpointMap {
        self.codec
            .endpoints()
            .bindings()
            .iter()
            .map(|bind| (bind.name.clone(), bind.id))
            .collect()
    }

    fn state_expose(endpoint: &str) -> Expose {
        let state = Expose::Binary(ExposeBinary {
            base: ExposeBase {
                description: Some("On/off state of the relay".to_string()),
                ..ExposeBase::named(STATE_FIELD, access::ALL, Some(endpoint))
            },
            value_off: json!("OFF"),
            value_on: json!("ON"),
            value_toggle: Some("TOGGLE".to_string()),
        });

        Expose::Switch(ExposeSwitch {
            base: ExposeBase {
                endpoint: Some(endpoint.to_string()),
                features: vec![state],
                ..ExposeBase::default()
            },
        })
    }

    fn attribute_expose(spec: &AttributeSpec, endpoint: &str) -> Expose {
        let base = ExposeBase {
            description: Some(spec.description.to_string()),
            category: Some(ExposeCategory::Config),
            ..ExposeBase::named(spec.name, access::ALL, Some(endpoint))
        };

        match spec.domain {
            Some(labels) => Expose::Enum(ExposeEnum {
                base,
                values: labels.iter().map(|label| json!(label)).collect(),
            }),
            None => Expose::Numeric(ExposeNumeric {
                base,
                unit: Some("ms".to_string()),
                value_max: Some(f64::from(u16::MAX)),
                value_min: Some(0.0),
                value_step: None,
            }),
        }
    }

    /// Exposed fields, one group per endpoint
    #[must_use]
    pub fn exposes(&self) -> Vec<Expose> {
        let mut res = vec![];
        for bind in self.codec.endpoints().bindings() {
            res.push(Self::state_expose(&bind.name));
            res.extend(
                ATTRIBUTES
                    .iter()
                    .map(|spec| Self::attribute_expose(spec, &bind.name)),
            );
        }
        res
    }

    #[must_use]
    pub fn definition(&self) -> DeviceDefinition {
        DeviceDefinition {
            model: ZIGBEE_MODEL.to_string(),
            vendor: VENDOR.to_string(),
            description: DESCRIPTION.to_string(),
            exposes: self.exposes(),
            supports_ota: false,
            options: vec![],
            icon: String::new(),
        }
    }
}
