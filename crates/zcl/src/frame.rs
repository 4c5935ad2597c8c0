use std::fmt::Debug;
use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use packed_struct::prelude::*;

use crate::error::ZclResult;

#[derive(PrimitiveEnum_u8, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ZclFrameType {
    ProfileWide = 0x00,
    ClusterSpecific = 0x01,
}

#[derive(PrimitiveEnum_u8, Debug, Clone, Copy, Eq, PartialEq)]
pub enum ZclFrameDirection {
    ClientToServer = 0x00,
    ServerToClient = 0x01,
}

#[derive(PackedStruct, Clone, Copy, PartialEq, Eq)]
#[packed_struct(size_bytes = "1", bit_numbering = "lsb0")]
pub struct ZclFrameFlags {
    #[packed_field(bits = "0..2", ty = "enum")]
    pub frame_type: ZclFrameType,

    #[packed_field(bits = "2")]
    pub manufacturer_specific: bool,

    #[packed_field(bits = "3", ty = "enum")]
    pub direction: ZclFrameDirection,

    #[packed_field(bits = "4")]
    pub disable_default_response: bool,
}

impl Debug for ZclFrameFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.frame_type == ZclFrameType::ClusterSpecific { "cs" } else { "pw" };
        let dir = if self.direction == ZclFrameDirection::ServerToClient { "<-" } else { "->" };
        let mfr = if self.manufacturer_specific { " mfr" } else { "" };
        let ddr = if self.disable_default_response { " ddr" } else { "" };
        write!(f, "<{kind} {dir}{mfr}{ddr}>")
    }
}

/// ZCL frame header. The manufacturer code is present on the wire only when
/// the frame is manufacturer specific.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZclFrame {
    pub flags: ZclFrameFlags,
    pub mfcode: Option<u16>,
    pub seqnr: u8,
    pub cmd: u8,
}

impl ZclFrame {
    fn outgoing(frame_type: ZclFrameType, mfcode: Option<u16>, seqnr: u8, cmd: u8) -> Self {
        Self {
            flags: ZclFrameFlags {
                frame_type,
                manufacturer_specific: mfcode.is_some(),
                direction: ZclFrameDirection::ClientToServer,
                disable_default_response: frame_type == ZclFrameType::ProfileWide,
            },
            mfcode,
            seqnr,
            cmd,
        }
    }

    /// Header for a profile-wide command (read/write attributes, ..)
    #[must_use]
    pub fn profile_wide(cmd: u8, seqnr: u8, mfcode: Option<u16>) -> Self {
        Self::outgoing(ZclFrameType::ProfileWide, mfcode, seqnr, cmd)
    }

    /// Header for a cluster specific command (on/off, ..)
    #[must_use]
    pub fn cluster_specific(cmd: u8, seqnr: u8, mfcode: Option<u16>) -> Self {
        Self::outgoing(ZclFrameType::ClusterSpecific, mfcode, seqnr, cmd)
    }

    pub fn parse(data: &mut impl Read) -> ZclResult<Self> {
        let flags = ZclFrameFlags::unpack(&[data.read_u8()?])?;

        let mfcode = if flags.manufacturer_specific {
            Some(data.read_u16::<LE>()?)
        } else {
            None
        };

        let seqnr = data.read_u8()?;
        let cmd = data.read_u8()?;

        Ok(Self {
            flags,
            mfcode,
            seqnr,
            cmd,
        })
    }

    pub fn write_to(&self, wtr: &mut impl Write) -> ZclResult<()> {
        wtr.write_all(&self.flags.pack()?)?;
        if let Some(mfcode) = self.mfcode {
            wtr.write_u16::<LE>(mfcode)?;
        }
        wtr.write_u8(self.seqnr)?;
        wtr.write_u8(self.cmd)?;
        Ok(())
    }

    #[must_use]
    pub fn is_cluster_specific(&self) -> bool {
        self.flags.frame_type == ZclFrameType::ClusterSpecific
    }

    #[must_use]
    pub const fn manufacturer_specific(&self) -> bool {
        self.flags.manufacturer_specific
    }
}
