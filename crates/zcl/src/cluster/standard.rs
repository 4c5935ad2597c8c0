use packed_struct::PrimitiveEnum;

use crate::attr::{
    ZclCommand, ZclDefaultResp, ZclReadAttr, ZclReadAttrResp, ZclReportAttr, ZclWriteAttr,
    ZclWriteAttrResp,
};
use crate::error::ZclResult;
use crate::frame::ZclFrame;

pub fn describe(frame: &ZclFrame, data: &[u8]) -> ZclResult<Option<String>> {
    let desc = match ZclCommand::from_primitive(frame.cmd) {
        Some(ZclCommand::ReadAttrib) => {
            Some(format!("read {:04x?}", ZclReadAttr::parse(data)?.attr))
        }
        Some(ZclCommand::ReadAttribResp) => {
            Some(format!("read response {:?}", ZclReadAttrResp::parse(data)?.attr))
        }
        Some(ZclCommand::WriteAttrib) => {
            Some(format!("write {:?}", ZclWriteAttr::parse(data)?.attr))
        }
        Some(ZclCommand::WriteAttribResp) => {
            let rsp = ZclWriteAttrResp::parse(data)?;
            let result = if rsp.is_success() { "ok" } else { "failed" };
            Some(format!("write response {result} {:02x?}", rsp.records))
        }
        Some(ZclCommand::ReportAttrib) => {
            Some(format!("report {:?}", ZclReportAttr::parse(data)?.attr))
        }
        Some(ZclCommand::DefaultResp) => {
            let rsp = ZclDefaultResp::parse(data)?;
            Some(format!("default response cmd:{:02x} status:{:02x}", rsp.cmd, rsp.stat))
        }
        _ => None,
    };

    Ok(desc)
}
