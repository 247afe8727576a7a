//! Packet stream reader and packet-kind dispatch.
//!
//! The reader is built on `buffered_reader`, a sister crate for
//! buffered, cookie-carrying readers over byte streams.

use buffered_reader::BufferedReader;

use crate::packet::{
    IPDP, LiteralDataPacket, Packet, PacketKind, PublicKeyPacket, SecretKeyPacket, Tag, MDC, PKESK,
};
use crate::{Error, Result};

/// The decoded length of a single header, minus the already-consumed
/// tag octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkLength {
    Full(u32),
    Partial(u32),
    Indeterminate,
}

fn io_err(context: &'static str) -> impl FnOnce(std::io::Error) -> Error {
    move |e| Error::Malformed(format!("{}: {}", context, e))
}

fn read_new_format_length<T, C>(bio: &mut T) -> Result<ChunkLength>
where
    T: BufferedReader<C>,
    C: std::fmt::Debug + Send + Sync,
{
    let octet1 = bio.data_consume_hard(1).map_err(io_err("packet framing"))?[0];
    match octet1 {
        0..=191 => Ok(ChunkLength::Full(octet1 as u32)),
        192..=223 => {
            let octet2 = bio.data_consume_hard(1).map_err(io_err("packet framing"))?[0];
            Ok(ChunkLength::Full(((octet1 as u32 - 192) << 8) + octet2 as u32 + 192))
        }
        224..=254 => Ok(ChunkLength::Partial(1 << (octet1 & 0x1F))),
        255 => Ok(ChunkLength::Full(bio.read_be_u32().map_err(io_err("packet framing"))?)),
    }
}

fn read_old_format_length<T, C>(
    bio: &mut T,
    length_type: crate::packet::PacketLengthType,
) -> Result<ChunkLength>
where
    T: BufferedReader<C>,
    C: std::fmt::Debug + Send + Sync,
{
    use crate::packet::PacketLengthType::*;
    match length_type {
        OneOctet => Ok(ChunkLength::Full(
            bio.data_consume_hard(1).map_err(io_err("packet framing"))?[0] as u32,
        )),
        TwoOctets => Ok(ChunkLength::Full(
            bio.read_be_u16().map_err(io_err("packet framing"))? as u32,
        )),
        FourOctets => Ok(ChunkLength::Full(
            bio.read_be_u32().map_err(io_err("packet framing"))?,
        )),
        Indeterminate => Ok(ChunkLength::Indeterminate),
    }
}

/// Reads a single framed packet (tag plus fully assembled body,
/// partial-length chunks concatenated) from `bio`.
///
/// Returns `Ok(None)` on a clean end of stream (no bytes remain
/// before the tag octet). Any other truncation (mid-length,
/// mid-body, or an indeterminate/partial-length protocol violation)
/// is `Err`.
pub fn read_packet<T, C>(bio: &mut T) -> Result<Option<Packet>>
where
    T: BufferedReader<C>,
    C: std::fmt::Debug + Send + Sync,
{
    if bio.data(1).map_err(io_err("packet framing"))?.is_empty() {
        return Ok(None);
    }

    let tag_octet = bio.data_consume_hard(1).map_err(io_err("packet framing"))?[0];
    let ctb = crate::packet::CTB::decode(tag_octet)?;
    let tag = ctb.tag();

    let mut body = Vec::new();
    let mut first_chunk = true;
    loop {
        let length = match &ctb {
            crate::packet::CTB::New(_) => read_new_format_length(bio)?,
            crate::packet::CTB::Old(old) => {
                if !first_chunk {
                    // Old-format bodies are never chunked; this can
                    // only be reached if the loop is structured
                    // incorrectly.
                    unreachable!("old-format packets are always single-chunk");
                }
                read_old_format_length(bio, old.length_type())?
            }
        };
        first_chunk = false;

        match length {
            ChunkLength::Full(len) => {
                let chunk = bio
                    .data_consume_hard(len as usize)
                    .map_err(io_err("packet framing: truncated body"))?;
                body.extend_from_slice(chunk);
                break;
            }
            ChunkLength::Partial(len) => {
                let chunk = bio
                    .data_consume_hard(len as usize)
                    .map_err(io_err("packet framing: truncated partial chunk"))?;
                body.extend_from_slice(chunk);
                // Loop back to read the next chunk's length; only
                // legal after a new-format CTB (partial lengths are
                // never used with the old format, enforced by
                // `read_old_format_length` never returning Partial).
                continue;
            }
            ChunkLength::Indeterminate => {
                let rest = bio.data_eof().map_err(io_err("packet framing"))?;
                let rest = rest.to_vec();
                bio.consume(rest.len());
                body.extend_from_slice(&rest);
                break;
            }
        }
    }

    Ok(Some(Packet { tag, body }))
}

/// Reads every packet in `bytes`, in order.
pub fn parse_packets(bytes: &[u8]) -> Result<Vec<Packet>> {
    let mut bio = buffered_reader::Memory::new(bytes);
    let mut packets = Vec::new();
    while let Some(packet) = read_packet(&mut bio)? {
        packets.push(packet);
    }
    Ok(packets)
}

/// Interprets a framed [`Packet`]'s body according to its tag,
/// producing a typed [`PacketKind`]. This is a free function
/// dispatcher rather than a method on an open trait, since the
/// packet-tag registry is closed.
///
/// A tag this crate does not implement a decoder for yields
/// `PacketKind::Unknown` rather than an error: unknown tags produce a
/// raw packet without error, and interpretation is deferred.
pub fn decode_body(packet: Packet) -> Result<PacketKind> {
    match packet.tag {
        Tag::PublicKey => Ok(PacketKind::PublicKey(PublicKeyPacket::decode(&packet.body)?)),
        Tag::SecretKey => Ok(PacketKind::SecretKey(SecretKeyPacket::decode(&packet.body)?)),
        Tag::PublicKeyEncryptedSessionKey => Ok(PacketKind::PKESK(PKESK::decode(&packet.body)?)),
        Tag::SEIP => Ok(PacketKind::IPDP(IPDP::decode(&packet.body)?)),
        Tag::MDC => Ok(PacketKind::MDC(MDC::decode(&packet.body)?)),
        Tag::LiteralData => {
            Ok(PacketKind::LiteralData(LiteralDataPacket::decode(&packet.body)?))
        }
        _ => Ok(PacketKind::Unknown(packet)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_format_one_octet_length() {
        // Tag 11 (LiteralData), new format, one-octet length 2, body "hi".
        let bytes = [0b1100_1011, 0x02, b'h', b'i'];
        let packets = parse_packets(&bytes).unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].tag, Tag::LiteralData);
        assert_eq!(packets[0].body, b"hi");
    }

    #[test]
    fn old_format_one_octet_length() {
        // Tag 11, old format, one-octet length selector (ll=0), len 2.
        let ctb = 0b1000_0000 | (11 << 2);
        let bytes = [ctb, 0x02, b'h', b'i'];
        let packets = parse_packets(&bytes).unwrap();
        assert_eq!(packets[0].tag, Tag::LiteralData);
        assert_eq!(packets[0].body, b"hi");
    }

    #[test]
    fn partial_length_chunks_concatenate() {
        // New format tag 11, first chunk partial len 1 (2^0), second
        // chunk terminal len 1.
        let bytes = [0b1100_1011, 0xE0, b'h', 0x01, b'i'];
        let packets = parse_packets(&bytes).unwrap();
        assert_eq!(packets[0].body, b"hi");
    }

    #[test]
    fn unknown_tag_becomes_unknown_packet_kind() {
        // Tag 2 (Signature), new format, length 0.
        let bytes = [0b1100_0010, 0x00];
        let packets = parse_packets(&bytes).unwrap();
        let kind = decode_body(packets.into_iter().next().unwrap()).unwrap();
        assert!(matches!(kind, PacketKind::Unknown(_)));
    }

    #[test]
    fn truncated_length_is_fatal() {
        // New format, two-octet length selector but stream ends.
        let bytes = [0b1100_1011, 0xC5];
        assert!(parse_packets(&bytes).is_err());
    }

    #[test]
    fn truncated_body_is_fatal() {
        let bytes = [0b1100_1011, 0x05, b'h', b'i']; // declares 5, only 2 present
        assert!(parse_packets(&bytes).is_err());
    }

    #[test]
    fn two_packets_back_to_back() {
        let mut bytes = vec![0b1100_1011, 0x02, b'h', b'i'];
        bytes.extend_from_slice(&[0b1100_1011, 0x01, b'x']);
        let packets = parse_packets(&bytes).unwrap();
        assert_eq!(packets.len(), 2);
        assert_eq!(packets[1].body, b"x");
    }
}
