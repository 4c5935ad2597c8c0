use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zcl::cluster::{onoff, Cluster};

use crate::codec::message::InboundMessage;
use crate::codec::{attribute, field_name, SwitchCodec, STATE_FIELD};
use crate::error::{SwitchError, SwitchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnOffState {
    On,
    Off,
}

impl OnOffState {
    /// Only a raw value of exactly 1 means "on"
    #[must_use]
    pub const fn from_raw(raw: i64) -> Self {
        if raw == 1 { Self::On } else { Self::Off }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DecodedValue {
    State(OnOffState),
    Label(&'static str),
    Raw(i64),
}

/// Endpoint-qualified fields decoded from one inbound message.
///
/// Fields that failed to decode are absent, and their errors are kept
/// alongside for the caller to inspect.
#[derive(Debug, Default, Serialize)]
pub struct DecodedState {
    #[serde(flatten)]
    fields: BTreeMap<String, DecodedValue>,
    #[serde(skip)]
    errors: Vec<SwitchError>,
}

impl DecodedState {
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&DecodedValue> {
        self.fields.get(field)
    }

    #[must_use]
    pub const fn fields(&self) -> &BTreeMap<String, DecodedValue> {
        &self.fields
    }

    #[must_use]
    pub fn errors(&self) -> &[SwitchError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl attribute::AttributeSpec {
    fn decode(&self, raw: i64) -> SwitchResult<DecodedValue> {
        if self.domain.is_some() {
            self.label(raw).map(DecodedValue::Label)
        } else {
            Ok(DecodedValue::Raw(raw))
        }
    }
}

impl SwitchCodec {
    #[must_use]
    pub fn decode(&self, msg: &InboundMessage) -> DecodedState {
        let mut state = DecodedState::default();

        let endpoint = match self.endpoints().to_semantic_name(msg.endpoint) {
            Ok(name) => name,
            Err(err) => {
                log::warn!("Cannot attribute {:?} from {}: {err}", msg.kind, msg.cluster);
                state.errors.push(err);
                return state;
            }
        };

        match msg.cluster {
            Cluster::OnOff => {
                if let Some(raw) = msg.data.get(&onoff::ATTR_ON_OFF) {
                    state.fields.insert(
                        field_name(STATE_FIELD, endpoint),
                        DecodedValue::State(OnOffState::from_raw(*raw)),
                    );
                }
            }

            Cluster::OnOffSwitchCfg => {
                for (code, raw) in &msg.data {
                    let Some(spec) = attribute::lookup_wire(*code) else {
                        log::trace!("[{endpoint}] Attribute {code:04x} not handled");
                        continue;
                    };

                    match spec.decode(*raw) {
                        Ok(value) => {
                            state.fields.insert(field_name(spec.name, endpoint), value);
                        }
                        Err(err) => {
                            log::warn!("[{endpoint}] Cannot decode {}: {err}", spec.name);
                            state.errors.push(err);
                        }
                    }
                }
            }
        }

        log::debug!("[{endpoint}] Decoded {:?}: {:?}", msg.kind, state.fields);

        state
    }
}
