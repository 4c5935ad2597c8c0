use packed_struct::prelude::*;

use crate::frame::{ZclFrame, ZclFrameDirection};

pub const CLUSTER_ID: u16 = 0x0006;

pub const ATTR_ON_OFF: u16 = 0x0000;

pub const ATTRIBUTES: &[(u16, &str)] = &[(ATTR_ON_OFF, "onOff")];

#[derive(PrimitiveEnum_u8, Debug, Clone, Copy, Eq, PartialEq)]
pub enum OnOffCommand {
    Off = 0x00,
    On = 0x01,
    Toggle = 0x02,
}

pub fn describe(frame: &ZclFrame, _data: &[u8]) -> Option<String> {
    if frame.manufacturer_specific() {
        return None;
    }

    if frame.flags.direction != ZclFrameDirection::ClientToServer {
        return None;
    }

    OnOffCommand::from_primitive(frame.cmd).map(|cmd| format!("{cmd:?}"))
}

#[cfg(test)]
mod tests {
    use crate::cluster::onoff::describe;
    use crate::frame::ZclFrame;

    #[test]
    fn describe_commands() {
        let frame = ZclFrame::cluster_specific(0x02, 0x01, None);
        assert_eq!(describe(&frame, &[]).as_deref(), Some("Toggle"));

        let frame = ZclFrame::cluster_specific(0x40, 0x01, None);
        assert_eq!(describe(&frame, &[]), None);
    }
}
