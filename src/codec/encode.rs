use serde::Serialize;
use serde_json::{Map, Value};

use zcl::cluster::onoff::{self, OnOffCommand};
use zcl::cluster::Cluster;

use crate::backend::Transport;
use crate::codec::attribute::{self, WireId};
use crate::codec::command::WireCommand;
use crate::codec::{SwitchCodec, STATE_FIELD};
use crate::error::{SwitchError, SwitchResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Set,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeRequest {
    pub name: String,
    pub value: Value,
    pub endpoint: String,
    pub operation: Operation,
}

impl EncodeRequest {
    pub fn get(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::Null,
            endpoint: endpoint.into(),
            operation: Operation::Get,
        }
    }

    pub fn set(name: impl Into<String>, value: Value, endpoint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            endpoint: endpoint.into(),
            operation: Operation::Set,
        }
    }
}

/// State reported back after a successful set, before the device confirms it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StateEcho(pub Map<String, Value>);

impl StateEcho {
    #[must_use]
    pub fn single(name: &str, value: Value) -> Self {
        let mut map = Map::new();
        map.insert(name.to_string(), value);
        Self(map)
    }
}

fn on_off_command(value: &Value) -> SwitchResult<OnOffCommand> {
    let cmd = match value.as_str().map(str::to_ascii_uppercase).as_deref() {
        Some("ON") => OnOffCommand::On,
        Some("OFF") => OnOffCommand::Off,
        Some("TOGGLE") => OnOffCommand::Toggle,
        _ => {
            return Err(SwitchError::InvalidValue {
                attr: STATE_FIELD.to_string(),
                value: value.clone(),
            });
        }
    };
    Ok(cmd)
}

impl SwitchCodec {
    /// Translate a request into the command addressing the device, without
    /// sending anything.
    pub fn build_command(&self, req: &EncodeRequest) -> SwitchResult<WireCommand> {
        if req.name == STATE_FIELD {
            let endpoint = self.endpoints().to_physical_id(&req.endpoint)?;
            return match req.operation {
                Operation::Get => Ok(WireCommand::read(
                    endpoint,
                    Cluster::OnOff,
                    WireId::Standard {
                        id: onoff::ATTR_ON_OFF,
                        name: "onOff",
                    },
                    None,
                )),
                Operation::Set => Ok(WireCommand::command(endpoint, on_off_command(&req.value)?)),
            };
        }

        let spec = attribute::lookup(&req.name)?;
        let endpoint = self.endpoints().to_physical_id(&req.endpoint)?;
        let mfcode = spec.manufacturer_code();

        match req.operation {
            Operation::Get => Ok(WireCommand::read(
                endpoint,
                Cluster::OnOffSwitchCfg,
                spec.wire_id,
                mfcode,
            )),
            Operation::Set => {
                let value = spec.wire_value(&req.value)?;
                Ok(WireCommand::write(
                    endpoint,
                    Cluster::OnOffSwitchCfg,
                    spec.wire_id,
                    value,
                    mfcode,
                ))
            }
        }
    }

    /// Encode `req` and hand the resulting command to `transport`.
    ///
    /// Returns the optimistic state for a set, and `None` for a get (the
    /// value arrives later as a read response).
    pub async fn encode<T: Transport + ?Sized>(
        &self,
        transport: &T,
        req: &EncodeRequest,
    ) -> SwitchResult<Option<StateEcho>> {
        let cmd = self.build_command(req)?;
        log::debug!(
            "[{}] Encoded {:?} {}: {:?}",
            req.endpoint,
            req.operation,
            req.name,
            cmd.action
        );

        transport.send(&cmd).await?;

        match req.operation {
            Operation::Get => Ok(None),
            Operation::Set => Ok(Some(StateEcho::single(&req.name, req.value.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use zcl::attr::ZclAttrValue;
    use zcl::cluster::onoff::OnOffCommand;
    use zcl::cluster::Cluster;

    use crate::backend::Transport;
    use crate::codec::attribute::{WireId, JENNIC_VENDOR_ID};
    use crate::codec::command::{WireAction, WireCommand, WireWrite};
    use crate::codec::encode::{EncodeRequest, StateEcho};
    use crate::codec::endpoint::EndpointResolver;
    use crate::codec::message::{InboundMessage, MessageKind};
    use crate::codec::SwitchCodec;
    use crate::error::{SwitchError, SwitchResult};

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<WireCommand>>,
    }

    impl Recorder {
        fn sent(&self) -> Vec<WireCommand> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for Recorder {
        async fn send(&self, cmd: &WireCommand) -> SwitchResult<()> {
            self.sent.lock().unwrap().push(cmd.clone());
            Ok(())
        }
    }

    struct Broken;

    #[async_trait]
    impl Transport for Broken {
        async fn send(&self, _cmd: &WireCommand) -> SwitchResult<()> {
            Err(SwitchError::UnexpectedZ2mEof)
        }
    }

    fn codec() -> SwitchCodec {
        SwitchCodec::new(EndpointResolver::sequential(2, 1).unwrap())
    }

    #[tokio::test]
    async fn set_relay_mode() {
        let tx = Recorder::default();
        let req = EncodeRequest::set("relay_mode", json!("double"), "button_1");
        let echo = codec().encode(&tx, &req).await.unwrap();

        assert_eq!(
            echo,
            Some(StateEcho::single("relay_mode", json!("double")))
        );
        assert_eq!(
            tx.sent(),
            [WireCommand {
                endpoint: 2,
                cluster: Cluster::OnOffSwitchCfg,
                action: WireAction::Write(vec![WireWrite {
                    id: WireId::Manufacturer(65281),
                    value: ZclAttrValue::E8(3),
                }]),
                manufacturer_code: Some(JENNIC_VENDOR_ID),
            }]
        );
    }

    #[tokio::test]
    async fn set_switch_actions_is_standard() {
        let tx = Recorder::default();
        let req = EncodeRequest::set("switch_actions", json!("offOn"), "button_1");
        codec().encode(&tx, &req).await.unwrap();

        let sent = tx.sent();
        assert_eq!(sent[0].manufacturer_code, None);
        assert_eq!(
            serde_json::to_value(sent[0].to_z2m()).unwrap()["payload"],
            json!({"switchActions": 1})
        );
    }

    #[tokio::test]
    async fn set_raw_value() {
        let tx = Recorder::default();
        let req = EncodeRequest::set("min_long_press", json!(1200), "button_1");
        codec().encode(&tx, &req).await.unwrap();

        assert_eq!(
            tx.sent()[0].action,
            WireAction::Write(vec![WireWrite {
                id: WireId::Manufacturer(65283),
                value: ZclAttrValue::U16(1200),
            }])
        );
    }

    #[tokio::test]
    async fn get_reads() {
        let tx = Recorder::default();
        let codec = codec();

        let echo = codec
            .encode(&tx, &EncodeRequest::get("max_pause", "button_1"))
            .await
            .unwrap();
        assert_eq!(echo, None);

        codec
            .encode(&tx, &EncodeRequest::get("switch_actions", "button_1"))
            .await
            .unwrap();

        let sent = tx.sent();
        assert_eq!(
            sent[0],
            WireCommand::read(
                2,
                Cluster::OnOffSwitchCfg,
                WireId::Manufacturer(0xff02),
                Some(0x1037)
            )
        );
        assert_eq!(sent[1].manufacturer_code, None);
        assert_eq!(sent[1].action, WireAction::Read(vec![WireId::Standard {
            id: 0x0010,
            name: "switchActions",
        }]));
    }

    #[tokio::test]
    async fn state_commands() {
        let tx = Recorder::default();
        let codec = codec();

        for (value, cmd) in [
            ("ON", OnOffCommand::On),
            ("off", OnOffCommand::Off),
            ("Toggle", OnOffCommand::Toggle),
        ] {
            let req = EncodeRequest::set("state", json!(value), "button_1");
            codec.encode(&tx, &req).await.unwrap();
            assert_eq!(tx.sent().last(), Some(&WireCommand::command(2, cmd)));
        }

        codec
            .encode(&tx, &EncodeRequest::get("state", "button_1"))
            .await
            .unwrap();
        assert_eq!(tx.sent().last().map(|cmd| cmd.cluster), Some(Cluster::OnOff));
    }

    #[tokio::test]
    async fn failures_send_nothing() {
        let tx = Recorder::default();
        let codec = codec();

        let err = codec
            .encode(&tx, &EncodeRequest::set("relay_mode", json!("triple"), "button_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::UnknownLabel { attr: "relay_mode", .. }));

        let err = codec
            .encode(&tx, &EncodeRequest::set("max_pause", json!(70000), "button_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::InvalidValue { .. }));

        let err = codec
            .encode(&tx, &EncodeRequest::get("long_press", "button_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::UnknownAttribute(_)));

        let err = codec
            .encode(&tx, &EncodeRequest::set("bogus", json!(1), "button_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::UnknownAttribute(_)));

        let err = codec
            .encode(&tx, &EncodeRequest::set("relay_mode", json!("front"), "button_2"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::UnknownEndpointName(_)));

        let err = codec
            .encode(&tx, &EncodeRequest::set("state", json!("DIM"), "button_1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SwitchError::InvalidValue { .. }));

        assert!(tx.sent().is_empty());
    }

    #[tokio::test]
    async fn transport_errors_propagate() {
        let req = EncodeRequest::set("switch_type", json!("toggle"), "button_1");
        let err = codec().encode(&Broken, &req).await.unwrap_err();
        assert!(matches!(err, SwitchError::UnexpectedZ2mEof));
    }

    #[tokio::test]
    async fn set_then_decode_round_trip() {
        let tx = Recorder::default();
        let codec = codec();

        for (name, value) in [
            ("switch_type", json!("multifunction")),
            ("switch_actions", json!("toggle")),
            ("relay_mode", json!("long")),
            ("max_pause", json!(250)),
        ] {
            codec
                .encode(&tx, &EncodeRequest::set(name, value.clone(), "button_1"))
                .await
                .unwrap();

            let cmd = tx.sent().pop().unwrap();
            let WireAction::Write(writes) = &cmd.action else {
                panic!("expected write, got {:?}", cmd.action);
            };

            let mut msg = InboundMessage::new(cmd.endpoint, cmd.cluster, MessageKind::ReadResponse);
            for wr in writes {
                msg = msg.with(wr.id.code(), wr.value.as_integer().unwrap());
            }

            let state = codec.decode(&msg);
            let decoded = state.get(&format!("{name}_button_1")).unwrap();
            assert_eq!(serde_json::to_value(decoded).unwrap(), value);
        }
    }
}
