use std::fmt::Debug;
use std::io::{Cursor, Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use packed_struct::prelude::*;

use crate::error::{ZclError, ZclResult};

/// Profile-wide (general) commands, shared by every cluster
#[derive(PrimitiveEnum_u8, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ZclCommand {
    ReadAttrib = 0x00,
    ReadAttribResp = 0x01,
    WriteAttrib = 0x02,
    WriteAttribUndiv = 0x03,
    WriteAttribResp = 0x04,
    WriteAttribNoResp = 0x05,
    ConfigReport = 0x06,
    ConfigReportResp = 0x07,
    ReadReportCfg = 0x08,
    ReadReportCfgResp = 0x09,
    ReportAttrib = 0x0a,
    DefaultResp = 0x0b,
}

#[derive(PrimitiveEnum_u8, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ZclDataType {
    /** Null data type */
    Null = 0x00,

    /** Boolean data type */
    ZclBool = 0x10,

    /** 8-bit bitmap data type */
    Zcl8bitmap = 0x18,

    /** 16-bit bitmap data type */
    Zcl16bitmap = 0x19,

    /** Unsigned 8-bit value data type */
    ZclU8 = 0x20,

    /** Unsigned 16-bit value data type */
    ZclU16 = 0x21,

    /** Unsigned 32-bit value data type */
    ZclU32 = 0x23,

    /** Signed 16-bit value data type */
    ZclI16 = 0x29,

    /** 8-bit enumeration data type */
    ZclE8 = 0x30,

    /** Charactery string (array) data type */
    ZclCharstring = 0x42,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZclReadAttr {
    pub attr: Vec<u16>,
}

impl ZclReadAttr {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        if data.len() % 2 != 0 {
            return Err(ZclError::InvalidLength(data.len()));
        }

        let attr = data
            .chunks(2)
            .map(|v| u16::from_le_bytes([v[0], v[1]]))
            .collect();

        Ok(Self { attr })
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.attr.iter().flat_map(|id| id.to_le_bytes()).collect()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ZclAttrValue {
    Null,
    Bool(bool),
    B8(u8),
    B16(u16),
    U8(u8),
    U16(u16),
    U32(u32),
    I16(i16),
    E8(u8),
    String(String),
    Unsupported,
}

impl ZclAttrValue {
    /// Wire data type of this value, if it has a wire representation
    #[must_use]
    pub const fn data_type(&self) -> Option<ZclDataType> {
        match self {
            Self::Null => Some(ZclDataType::Null),
            Self::Bool(_) => Some(ZclDataType::ZclBool),
            Self::B8(_) => Some(ZclDataType::Zcl8bitmap),
            Self::B16(_) => Some(ZclDataType::Zcl16bitmap),
            Self::U8(_) => Some(ZclDataType::ZclU8),
            Self::U16(_) => Some(ZclDataType::ZclU16),
            Self::U32(_) => Some(ZclDataType::ZclU32),
            Self::I16(_) => Some(ZclDataType::ZclI16),
            Self::E8(_) => Some(ZclDataType::ZclE8),
            Self::String(_) => Some(ZclDataType::ZclCharstring),
            Self::Unsupported => None,
        }
    }

    /// Integer view of the value. Booleans map to 0/1.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Bool(val) => Some(i64::from(*val)),
            Self::B8(val) | Self::U8(val) | Self::E8(val) => Some(i64::from(*val)),
            Self::B16(val) | Self::U16(val) => Some(i64::from(*val)),
            Self::U32(val) => Some(i64::from(*val)),
            Self::I16(val) => Some(i64::from(*val)),
            Self::Null | Self::String(_) | Self::Unsupported => None,
        }
    }

    fn read_typed(rdr: &mut impl Read, dtype: ZclDataType) -> ZclResult<Self> {
        let value = match dtype {
            ZclDataType::Null => Self::Null,
            ZclDataType::ZclBool => Self::Bool(rdr.read_u8()? != 0),
            ZclDataType::Zcl8bitmap => Self::B8(rdr.read_u8()?),
            ZclDataType::Zcl16bitmap => Self::B16(rdr.read_u16::<LE>()?),
            ZclDataType::ZclU8 => Self::U8(rdr.read_u8()?),
            ZclDataType::ZclU16 => Self::U16(rdr.read_u16::<LE>()?),
            ZclDataType::ZclU32 => Self::U32(rdr.read_u32::<LE>()?),
            ZclDataType::ZclI16 => Self::I16(rdr.read_i16::<LE>()?),
            ZclDataType::ZclE8 => Self::E8(rdr.read_u8()?),
            ZclDataType::ZclCharstring => {
                let len = rdr.read_u8()?;
                let mut buf = vec![0; len as usize];
                rdr.read_exact(&mut buf)?;
                Self::String(String::from_utf8(buf)?)
            }
        };

        Ok(value)
    }

    fn write_typed(&self, wtr: &mut impl Write) -> ZclResult<()> {
        match self {
            Self::Null => {}
            Self::Bool(val) => wtr.write_u8(u8::from(*val))?,
            Self::B8(val) | Self::U8(val) | Self::E8(val) => wtr.write_u8(*val)?,
            Self::B16(val) | Self::U16(val) => wtr.write_u16::<LE>(*val)?,
            Self::U32(val) => wtr.write_u32::<LE>(*val)?,
            Self::I16(val) => wtr.write_i16::<LE>(*val)?,
            Self::String(val) => {
                let len = u8::try_from(val.len())
                    .map_err(|_| ZclError::UnencodableValue(format!("{self:?}")))?;
                wtr.write_u8(len)?;
                wtr.write_all(val.as_bytes())?;
            }
            Self::Unsupported => return Err(ZclError::UnencodableValue(format!("{self:?}"))),
        }
        Ok(())
    }
}

impl Debug for ZclAttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Bool(val) => write!(f, "bool:{val}"),
            Self::B8(val) => write!(f, "b8:{val:02X}"),
            Self::B16(val) => write!(f, "b16:{val:04X}"),
            Self::U8(val) => write!(f, "u8:{val:02X}"),
            Self::U16(val) => write!(f, "u16:{val:04X}"),
            Self::U32(val) => write!(f, "u32:{val:08X}"),
            Self::I16(val) => write!(f, "i16:{val:04X}"),
            Self::E8(val) => write!(f, "e8:{val:02X}"),
            Self::String(val) => write!(f, "str:{}", &val),
            Self::Unsupported => write!(f, "Unsupported"),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ZclAttr {
    pub key: u16,
    pub value: ZclAttrValue,
}

impl Debug for ZclAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x}:{:?}", self.key, self.value)
    }
}

impl ZclAttr {
    #[must_use]
    pub const fn new(key: u16, value: ZclAttrValue) -> Self {
        Self { key, value }
    }

    fn from_reader(rdr: &mut impl Read, check_status: bool) -> ZclResult<Self> {
        let key = rdr.read_u16::<LE>()?;

        if check_status {
            let status = rdr.read_u8()?;
            if status != 0 {
                return Ok(Self {
                    key,
                    value: ZclAttrValue::Unsupported,
                });
            }
        }

        let raw = rdr.read_u8()?;
        let dtype = ZclDataType::from_primitive(raw).ok_or(ZclError::UnsupportedDataType(raw))?;

        let value = ZclAttrValue::read_typed(rdr, dtype)?;

        Ok(Self { key, value })
    }

    pub fn readattr_from_reader(rdr: &mut impl Read) -> ZclResult<Self> {
        Self::from_reader(rdr, true)
    }

    pub fn writeattr_from_reader(rdr: &mut impl Read) -> ZclResult<Self> {
        Self::from_reader(rdr, false)
    }

    /// Write as a write/report record: attribute id, data type, value
    pub fn write_to(&self, wtr: &mut impl Write) -> ZclResult<()> {
        let dtype = self
            .value
            .data_type()
            .ok_or_else(|| ZclError::UnencodableValue(format!("{self:?}")))?;

        wtr.write_u16::<LE>(self.key)?;
        wtr.write_u8(dtype.to_primitive())?;
        self.value.write_typed(wtr)
    }
}

fn parse_records(
    data: &[u8],
    read: impl Fn(&mut Cursor<&[u8]>) -> ZclResult<ZclAttr>,
) -> ZclResult<Vec<ZclAttr>> {
    let mut attr = vec![];

    let mut cur = Cursor::new(data);
    while (cur.position() as usize) < data.len() {
        attr.push(read(&mut cur)?);
    }

    Ok(attr)
}

#[derive(Debug, Clone)]
pub struct ZclReadAttrResp {
    pub attr: Vec<ZclAttr>,
}

impl ZclReadAttrResp {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        let attr = parse_records(data, |cur| ZclAttr::readattr_from_reader(cur))?;
        Ok(Self { attr })
    }
}

#[derive(Debug, Clone)]
pub struct ZclWriteAttr {
    pub attr: Vec<ZclAttr>,
}

impl ZclWriteAttr {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        let attr = parse_records(data, |cur| ZclAttr::writeattr_from_reader(cur))?;
        Ok(Self { attr })
    }

    pub fn to_bytes(&self) -> ZclResult<Vec<u8>> {
        let mut res = vec![];
        for attr in &self.attr {
            attr.write_to(&mut res)?;
        }
        Ok(res)
    }
}

#[derive(Debug, Clone)]
pub struct ZclReportAttr {
    pub attr: Vec<ZclAttr>,
}

impl ZclReportAttr {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        let attr = parse_records(data, |cur| ZclAttr::writeattr_from_reader(cur))?;
        Ok(Self { attr })
    }
}

#[derive(Debug, Clone)]
pub struct ZclDefaultResp {
    pub cmd: u8,
    pub stat: u8,
}

impl ZclDefaultResp {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        let mut cur = Cursor::new(data);
        Ok(Self {
            cmd: cur.read_u8()?,
            stat: cur.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZclWriteAttrStatus {
    pub status: u8,
    pub key: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct ZclWriteAttrResp {
    pub records: Vec<ZclWriteAttrStatus>,
}

impl ZclWriteAttrResp {
    pub fn parse(data: &[u8]) -> ZclResult<Self> {
        // a single success byte means every attribute was written
        if matches!(data, [0x00]) {
            return Ok(Self {
                records: vec![ZclWriteAttrStatus {
                    status: 0,
                    key: None,
                }],
            });
        }

        let mut records = vec![];
        let mut cur = Cursor::new(data);
        while (cur.position() as usize) < data.len() {
            let status = cur.read_u8()?;
            let key = Some(cur.read_u16::<LE>()?);
            records.push(ZclWriteAttrStatus { status, key });
        }

        Ok(Self { records })
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.records.iter().all(|rec| rec.status == 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::attr::{
        ZclAttr, ZclAttrValue, ZclReadAttr, ZclReadAttrResp, ZclReportAttr, ZclWriteAttr,
        ZclWriteAttrResp,
    };
    use crate::error::ZclError;

    #[test]
    fn read_attr_list() {
        let req = ZclReadAttr::parse(&hex::decode("00ff1000").unwrap()).unwrap();
        assert_eq!(req.attr, vec![0xff00, 0x0010]);
        assert_eq!(hex::encode(req.to_bytes()), "00ff1000");
    }

    #[test]
    fn read_attr_odd_length() {
        let err = ZclReadAttr::parse(&[0x00, 0xff, 0x10]).unwrap_err();
        assert!(matches!(err, ZclError::InvalidLength(3)));
    }

    #[test]
    fn report_enum_and_u16() {
        let rep = ZclReportAttr::parse(&hex::decode("00ff300102ff21f401").unwrap()).unwrap();
        assert_eq!(
            rep.attr,
            vec![
                ZclAttr::new(0xff00, ZclAttrValue::E8(1)),
                ZclAttr::new(0xff02, ZclAttrValue::U16(500)),
            ]
        );
    }

    #[test]
    fn read_response_with_failed_status() {
        let rsp = ZclReadAttrResp::parse(&hex::decode("1000003002000086").unwrap()).unwrap();
        assert_eq!(rsp.attr.len(), 2);
        assert_eq!(rsp.attr[0], ZclAttr::new(0x0010, ZclAttrValue::E8(2)));
        assert_eq!(rsp.attr[1], ZclAttr::new(0x0000, ZclAttrValue::Unsupported));
    }

    #[test]
    fn unknown_data_type() {
        let err = ZclReportAttr::parse(&hex::decode("00ffe001").unwrap()).unwrap_err();
        assert!(matches!(err, ZclError::UnsupportedDataType(0xe0)));
    }

    #[test]
    fn write_records() {
        let req = ZclWriteAttr {
            attr: vec![
                ZclAttr::new(0xff01, ZclAttrValue::E8(3)),
                ZclAttr::new(0xff03, ZclAttrValue::U16(0x025a)),
            ],
        };
        let data = req.to_bytes().unwrap();
        assert_eq!(hex::encode(&data), "01ff300303ff215a02");

        let parsed = ZclWriteAttr::parse(&data).unwrap();
        assert_eq!(parsed.attr, req.attr);
    }

    #[test]
    fn write_unsupported_value() {
        let req = ZclWriteAttr {
            attr: vec![ZclAttr::new(0xff01, ZclAttrValue::Unsupported)],
        };
        assert!(matches!(
            req.to_bytes().unwrap_err(),
            ZclError::UnencodableValue(_)
        ));
    }

    #[test]
    fn write_response() {
        assert!(ZclWriteAttrResp::parse(&[0x00]).unwrap().is_success());

        let rsp = ZclWriteAttrResp::parse(&hex::decode("8701ff").unwrap()).unwrap();
        assert!(!rsp.is_success());
        assert_eq!(rsp.records[0].key, Some(0xff01));
    }

    #[test]
    fn integer_view() {
        assert_eq!(ZclAttrValue::Bool(true).as_integer(), Some(1));
        assert_eq!(ZclAttrValue::E8(5).as_integer(), Some(5));
        assert_eq!(ZclAttrValue::U16(65535).as_integer(), Some(65535));
        assert_eq!(ZclAttrValue::String("x".into()).as_integer(), None);
    }
}
