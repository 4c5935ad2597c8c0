use packed_struct::PrimitiveEnum;
use serde_json::{json, Map, Value};

use z2m::request::{AttributeRead, AttributeWrite, RequestOptions, Z2mRequest};
use zcl::attr::{ZclAttr, ZclAttrValue, ZclCommand, ZclReadAttr, ZclWriteAttr};
use zcl::cluster::onoff::OnOffCommand;
use zcl::cluster::Cluster;
use zcl::frame::ZclFrame;

use crate::codec::attribute::WireId;
use crate::error::SwitchResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireWrite {
    pub id: WireId,
    pub value: ZclAttrValue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireAction {
    Read(Vec<WireId>),
    Write(Vec<WireWrite>),
    Command(OnOffCommand),
}

/// Outbound command for one endpoint of the device, ready for a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireCommand {
    pub endpoint: u8,
    pub cluster: Cluster,
    pub action: WireAction,
    pub manufacturer_code: Option<u16>,
}

impl WireCommand {
    #[must_use]
    pub fn read(endpoint: u8, cluster: Cluster, id: WireId, manufacturer_code: Option<u16>) -> Self {
        Self {
            endpoint,
            cluster,
            action: WireAction::Read(vec![id]),
            manufacturer_code,
        }
    }

    #[must_use]
    pub fn write(
        endpoint: u8,
        cluster: Cluster,
        id: WireId,
        value: ZclAttrValue,
        manufacturer_code: Option<u16>,
    ) -> Self {
        Self {
            endpoint,
            cluster,
            action: WireAction::Write(vec![WireWrite { id, value }]),
            manufacturer_code,
        }
    }

    #[must_use]
    pub const fn command(endpoint: u8, cmd: OnOffCommand) -> Self {
        Self {
            endpoint,
            cluster: Cluster::OnOff,
            action: WireAction::Command(cmd),
            manufacturer_code: None,
        }
    }

    /// Encode as a complete zcl frame (header and payload)
    pub fn to_zcl(&self, seqnr: u8) -> SwitchResult<Vec<u8>> {
        let mfcode = self.manufacturer_code;
        let mut data = vec![];

        match &self.action {
            WireAction::Read(ids) => {
                ZclFrame::profile_wide(ZclCommand::ReadAttrib.to_primitive(), seqnr, mfcode)
                    .write_to(&mut data)?;
                let req = ZclReadAttr {
                    attr: ids.iter().map(|id| id.code()).collect(),
                };
                data.extend(req.to_bytes());
            }
            WireAction::Write(writes) => {
                ZclFrame::profile_wide(ZclCommand::WriteAttrib.to_primitive(), seqnr, mfcode)
                    .write_to(&mut data)?;
                let req = ZclWriteAttr {
                    attr: writes
                        .iter()
                        .map(|wr| ZclAttr::new(wr.id.code(), wr.value.clone()))
                        .collect(),
                };
                data.extend(req.to_bytes()?);
            }
            WireAction::Command(cmd) => {
                ZclFrame::cluster_specific(cmd.to_primitive(), seqnr, mfcode).write_to(&mut data)?;
            }
        }

        Ok(data)
    }

    /// Translate into the zigbee2mqtt request performing the same operation
    #[must_use]
    pub fn to_z2m(&self) -> Z2mRequest {
        let options = RequestOptions {
            manufacturer_code: self.manufacturer_code,
        };

        match &self.action {
            WireAction::Read(ids) => Z2mRequest::Read(AttributeRead {
                cluster: self.cluster.name().to_string(),
                attributes: ids
                    .iter()
                    .map(|id| match id {
                        WireId::Manufacturer(code) => json!(code),
                        WireId::Standard { name, .. } => json!(name),
                    })
                    .collect(),
                options,
            }),

            WireAction::Write(writes) => {
                let payload = writes
                    .iter()
                    .map(|wr| {
                        let value = wr.value.as_integer().map_or(Value::Null, Value::from);
                        let entry = match (wr.id, wr.value.data_type()) {
                            // custom attributes must carry their data type
                            (WireId::Manufacturer(_), Some(dtype)) => json!({
                                "value": value,
                                "type": dtype.to_primitive(),
                            }),
                            _ => value,
                        };
                        (wr.id.key(), entry)
                    })
                    .collect::<Map<_, _>>();

                Z2mRequest::Write(AttributeWrite {
                    cluster: self.cluster.name().to_string(),
                    payload,
                    options,
                })
            }

            WireAction::Command(cmd) => {
                let state = match cmd {
                    OnOffCommand::Off => "OFF",
                    OnOffCommand::On => "ON",
                    OnOffCommand::Toggle => "TOGGLE",
                };
                let mut payload = Map::new();
                payload.insert("state".to_string(), json!(state));
                Z2mRequest::Untyped(payload)
            }
        }
    }
}
