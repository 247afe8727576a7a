//! Packet tag byte and body length encoding.
//!
//! Grounded on the pack's `CTB`/`CTBOld`/`CTBNew`/`PacketLengthType`
//! split and `BodyLength`'s `parse_new_format`/`parse_old_format`
//! state machines.

use crate::packet::Tag;
use crate::{Error, Result};

/// The length form a header encodes, independent of its numeric
/// value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketLengthType {
    /// A single length octet, old format only.
    OneOctet,
    /// Two length octets, old format only.
    TwoOctets,
    /// Four length octets, old format only.
    FourOctets,
    /// Old-format only: consume to the end of the stream.
    Indeterminate,
}

/// The decoded body length of a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyLength {
    /// A complete, fixed-length chunk.
    Full(u32),
    /// A partial chunk of the given power-of-two length; more chunks
    /// follow.
    Partial(u32),
    /// Old format only: the chunk runs to the end of the stream.
    Indeterminate,
}

/// New-format (bit 6 set) cipher type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CTBNew {
    tag: Tag,
}

impl CTBNew {
    /// Creates a new-format CTB for `tag`.
    pub fn new(tag: Tag) -> Self {
        CTBNew { tag }
    }

    /// The packet tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Encodes the CTB octet: `1 1 tttttt`.
    pub fn to_octet(&self) -> u8 {
        0b1100_0000 | (u8::from(self.tag) & 0x3F)
    }
}

/// Old-format (bit 6 clear) cipher type byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CTBOld {
    tag: Tag,
    length_type: PacketLengthType,
}

impl CTBOld {
    /// Creates an old-format CTB for `tag`, picking the most compact
    /// `PacketLengthType` that can represent `length`.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if `tag`'s numeric id exceeds 15 (old
    /// format only has 4 tag bits), or if `length` is
    /// [`BodyLength::Partial`] (old format cannot express partial
    /// lengths).
    pub fn new(tag: Tag, length: BodyLength) -> Result<Self> {
        if u8::from(tag) > 15 {
            return Err(Error::InvalidArgument(format!(
                "old-format CTB cannot represent tag {}",
                u8::from(tag)
            )));
        }
        let length_type = match length {
            BodyLength::Indeterminate => PacketLengthType::Indeterminate,
            BodyLength::Partial(_) => {
                return Err(Error::InvalidArgument(
                    "old-format CTB cannot represent a partial length".into(),
                ))
            }
            BodyLength::Full(l) if l < 256 => PacketLengthType::OneOctet,
            BodyLength::Full(l) if l < 65536 => PacketLengthType::TwoOctets,
            BodyLength::Full(_) => PacketLengthType::FourOctets,
        };
        Ok(CTBOld { tag, length_type })
    }

    /// The packet tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The length form this CTB declares.
    pub fn length_type(&self) -> PacketLengthType {
        self.length_type
    }

    /// Encodes the CTB octet: `1 0 tttt ll`.
    pub fn to_octet(&self) -> u8 {
        let ll = match self.length_type {
            PacketLengthType::OneOctet => 0,
            PacketLengthType::TwoOctets => 1,
            PacketLengthType::FourOctets => 2,
            PacketLengthType::Indeterminate => 3,
        };
        0b1000_0000 | ((u8::from(self.tag) & 0x0F) << 2) | ll
    }
}

/// A packet's cipher type byte, either format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CTB {
    /// New format.
    New(CTBNew),
    /// Old format.
    Old(CTBOld),
}

impl CTB {
    /// The packet tag, regardless of format.
    pub fn tag(&self) -> Tag {
        match self {
            CTB::New(c) => c.tag(),
            CTB::Old(c) => c.tag(),
        }
    }

    /// Decodes a single CTB octet.
    ///
    /// # Errors
    ///
    /// `Error::Malformed` if bit 7 is not set.
    pub fn decode(octet: u8) -> Result<CTB> {
        if octet & 0x80 == 0 {
            return Err(Error::Malformed(
                "packet tag byte: bit 7 must be set".into(),
            ));
        }
        if octet & 0x40 != 0 {
            let tag = Tag::from(octet & 0x3F);
            Ok(CTB::New(CTBNew { tag }))
        } else {
            let tag = Tag::from((octet >> 2) & 0x0F);
            let length_type = match octet & 0x03 {
                0 => PacketLengthType::OneOctet,
                1 => PacketLengthType::TwoOctets,
                2 => PacketLengthType::FourOctets,
                3 => PacketLengthType::Indeterminate,
                _ => unreachable!(),
            };
            Ok(CTB::Old(CTBOld { tag, length_type }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_format_roundtrip() {
        let ctb = CTBNew::new(Tag::PublicKeyEncryptedSessionKey);
        let octet = ctb.to_octet();
        assert_eq!(octet & 0xC0, 0xC0);
        let decoded = CTB::decode(octet).unwrap();
        assert_eq!(decoded.tag(), Tag::PublicKeyEncryptedSessionKey);
        assert!(matches!(decoded, CTB::New(_)));
    }

    #[test]
    fn old_format_roundtrip_picks_smallest_form() {
        let ctb = CTBOld::new(Tag::LiteralData, BodyLength::Full(10)).unwrap();
        assert_eq!(ctb.length_type(), PacketLengthType::OneOctet);
        let decoded = CTB::decode(ctb.to_octet()).unwrap();
        assert_eq!(decoded.tag(), Tag::LiteralData);

        let ctb = CTBOld::new(Tag::LiteralData, BodyLength::Full(70000)).unwrap();
        assert_eq!(ctb.length_type(), PacketLengthType::FourOctets);
    }

    #[test]
    fn old_format_rejects_high_tag() {
        assert!(CTBOld::new(Tag::Unknown(31), BodyLength::Full(1)).is_err());
    }

    #[test]
    fn old_format_rejects_partial() {
        assert!(CTBOld::new(Tag::LiteralData, BodyLength::Partial(16)).is_err());
    }

    #[test]
    fn bit7_clear_is_malformed() {
        assert!(matches!(CTB::decode(0x00), Err(Error::Malformed(_))));
    }
}
