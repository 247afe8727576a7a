//! Packet tag registry and the top-level `Packet`/`PacketKind` data
//! model.

pub mod header;
pub mod ipdp;
pub mod key;
pub mod literal;
pub mod mdc;
pub mod pkesk;

use std::fmt;

pub use header::{BodyLength, CTBNew, CTBOld, PacketLengthType, CTB};
pub use ipdp::IPDP;
pub use key::{PublicKeyPacket, SecretKeyPacket};
pub use literal::LiteralDataPacket;
pub use mdc::MDC;
pub use pkesk::PKESK;

/// A packet tag number (RFC 4880 §4.3), closed over the registry with
/// `Unknown`/`Private` catch-alls.
///
/// Ambient bookkeeping for packet-kind dispatch: the registry is closed by
/// the RFC, but this crate only implements decode/encode for a subset
/// of tags (see [`PacketKind`]); every other recognized tag still
/// decodes to a named `Tag` variant, it simply surfaces as
/// [`PacketKind::Unknown`] once handed to [`crate::parse::decode_body`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Tag {
    /// Reserved, a packet with this tag is always malformed.
    Reserved,
    /// Public-Key Encrypted Session Key Packet.
    PublicKeyEncryptedSessionKey,
    /// Signature Packet.
    Signature,
    /// Symmetric-Key Encrypted Session Key Packet.
    SymmetricKeyEncryptedSessionKey,
    /// One-Pass Signature Packet.
    OnePassSignature,
    /// Secret-Key Packet.
    SecretKey,
    /// Public-Key Packet.
    PublicKey,
    /// Secret-Subkey Packet.
    SecretSubkey,
    /// Compressed Data Packet.
    CompressedData,
    /// Symmetrically Encrypted Data Packet.
    SymmetricallyEncryptedData,
    /// Marker Packet.
    Marker,
    /// Literal Data Packet.
    LiteralData,
    /// Trust Packet.
    Trust,
    /// User ID Packet.
    UserID,
    /// Public-Subkey Packet.
    PublicSubkey,
    /// User Attribute Packet.
    UserAttribute,
    /// Symmetrically Encrypted and Integrity Protected Data Packet.
    SEIP,
    /// Modification Detection Code Packet.
    MDC,
    /// Private or experimental tag.
    Private(u8),
    /// A tag not covered by the registry as of RFC 4880.
    Unknown(u8),
}

impl From<u8> for Tag {
    fn from(u: u8) -> Self {
        use Tag::*;
        match u {
            0 => Reserved,
            1 => PublicKeyEncryptedSessionKey,
            2 => Signature,
            3 => SymmetricKeyEncryptedSessionKey,
            4 => OnePassSignature,
            5 => SecretKey,
            6 => PublicKey,
            7 => SecretSubkey,
            8 => CompressedData,
            9 => SymmetricallyEncryptedData,
            10 => Marker,
            11 => LiteralData,
            12 => Trust,
            13 => UserID,
            14 => PublicSubkey,
            17 => UserAttribute,
            18 => SEIP,
            19 => MDC,
            60..=63 => Private(u),
            _ => Unknown(u),
        }
    }
}

impl From<Tag> for u8 {
    fn from(t: Tag) -> u8 {
        use Tag::*;
        match t {
            Reserved => 0,
            PublicKeyEncryptedSessionKey => 1,
            Signature => 2,
            SymmetricKeyEncryptedSessionKey => 3,
            OnePassSignature => 4,
            SecretKey => 5,
            PublicKey => 6,
            SecretSubkey => 7,
            CompressedData => 8,
            SymmetricallyEncryptedData => 9,
            Marker => 10,
            LiteralData => 11,
            Trust => 12,
            UserID => 13,
            PublicSubkey => 14,
            UserAttribute => 17,
            SEIP => 18,
            MDC => 19,
            Private(u) | Unknown(u) => u,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} ({})", self, u8::from(*self))
    }
}

/// A fully framed packet: a tag plus its assembled, still-undecoded
/// body bytes, produced by the packet reader and consumed by `decode_body`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// The packet's tag.
    pub tag: Tag,
    /// The concatenation of every [`BodyLength`] chunk's data.
    pub body: Vec<u8>,
}

/// A typed, decoded packet.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PacketKind {
    /// A version-4 public-key packet.
    PublicKey(PublicKeyPacket),
    /// A version-4 secret-key packet.
    SecretKey(SecretKeyPacket),
    /// A version-3 Public-Key Encrypted Session Key packet.
    PKESK(PKESK),
    /// A version-1 Integrity-Protected Data Packet.
    IPDP(IPDP),
    /// A Modification Detection Code packet.
    MDC(MDC),
    /// A literal data packet.
    LiteralData(LiteralDataPacket),
    /// A packet whose tag this crate does not interpret; its raw
    /// bytes are retained for byte-faithful re-emission.
    Unknown(Packet),
}

impl PacketKind {
    /// The tag this decoded packet was produced from.
    pub fn tag(&self) -> Tag {
        match self {
            PacketKind::PublicKey(_) => Tag::PublicKey,
            PacketKind::SecretKey(_) => Tag::SecretKey,
            PacketKind::PKESK(_) => Tag::PublicKeyEncryptedSessionKey,
            PacketKind::IPDP(_) => Tag::SEIP,
            PacketKind::MDC(_) => Tag::MDC,
            PacketKind::LiteralData(_) => Tag::LiteralData,
            PacketKind::Unknown(p) => p.tag,
        }
    }
}
