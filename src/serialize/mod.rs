//! Packet emission: framing a decoded packet back into bytes.

use crate::packet::{CTBNew, CTBOld, PacketKind, Tag};
use crate::{Error, Result};

/// Chooses new-format length octets for `len` (one-octet below 192,
/// two-octet below 8384, otherwise four-octet).
fn encode_new_format_length(len: u32, out: &mut Vec<u8>) {
    if len < 192 {
        out.push(len as u8);
    } else if len < 8384 {
        let len = len - 192;
        out.push(((len >> 8) + 192) as u8);
        out.push((len & 0xFF) as u8);
    } else {
        out.push(255);
        out.extend_from_slice(&len.to_be_bytes());
    }
}

/// Serializes a decoded packet's body back to bytes (the inverse of
/// [`crate::parse::decode_body`] for every variant except
/// [`PacketKind::Unknown`], which re-emits its retained raw bytes
/// byte-faithfully).
pub fn encode_body(kind: &PacketKind) -> Result<Vec<u8>> {
    match kind {
        PacketKind::PublicKey(p) => p.encode(),
        PacketKind::SecretKey(p) => p.encode(),
        PacketKind::PKESK(p) => p.encode(),
        PacketKind::IPDP(p) => Ok(p.encode()),
        PacketKind::MDC(p) => Ok(p.encode()),
        PacketKind::LiteralData(p) => p.encode(),
        PacketKind::Unknown(p) => Ok(p.body.clone()),
    }
}

/// Frames `body` under `tag` using a new-format header, writing the
/// complete packet (header plus body) into `out`.
///
/// Partial-length emission is not performed here: this crate only
/// produces fully buffered bodies, since the integrity-check pipeline
/// requires the full buffered payload regardless.
pub fn frame_new_format(tag: Tag, body: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let ctb = CTBNew::new(tag);
    out.push(ctb.to_octet());
    encode_new_format_length(body.len() as u32, out);
    out.extend_from_slice(body);
    Ok(())
}

/// Frames `body` under `tag` using the most compact legal old-format
/// header.
///
/// # Errors
///
/// `Error::InvalidArgument` if `tag`'s numeric id exceeds 15 (old
/// format has only 4 tag bits).
pub fn frame_old_format(tag: Tag, body: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let length = crate::packet::BodyLength::Full(body.len() as u32);
    let ctb = CTBOld::new(tag, length)?;
    out.push(ctb.to_octet());
    match ctb.length_type() {
        crate::packet::PacketLengthType::OneOctet => out.push(body.len() as u8),
        crate::packet::PacketLengthType::TwoOctets => {
            out.extend_from_slice(&(body.len() as u16).to_be_bytes())
        }
        crate::packet::PacketLengthType::FourOctets => {
            out.extend_from_slice(&(body.len() as u32).to_be_bytes())
        }
        crate::packet::PacketLengthType::Indeterminate => {
            return Err(Error::InvalidArgument(
                "frame_old_format: cannot emit an indeterminate length".into(),
            ))
        }
    }
    out.extend_from_slice(body);
    Ok(())
}

/// Encodes `kind` and frames it under a new-format header, appending
/// the complete packet to `out`. The common path used by callers that
/// don't need old-format byte-for-byte fidelity.
pub fn emit(kind: &PacketKind, out: &mut Vec<u8>) -> Result<()> {
    let body = encode_body(kind)?;
    frame_new_format(kind.tag(), &body, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::literal::{LiteralDataFormat, LiteralDataPacket};
    use crate::parse;

    #[test]
    fn roundtrip_literal_data_through_emit_and_parse() {
        let literal = LiteralDataPacket {
            format: LiteralDataFormat::Binary,
            file_name: vec![],
            mtime: 0,
            data: b"hi".to_vec(),
        };
        let kind = PacketKind::LiteralData(literal);
        let mut out = Vec::new();
        emit(&kind, &mut out).unwrap();

        let packets = parse::parse_packets(&out).unwrap();
        assert_eq!(packets.len(), 1);
        let decoded = parse::decode_body(packets.into_iter().next().unwrap()).unwrap();
        assert_eq!(decoded, kind);
    }

    #[test]
    fn new_format_length_boundaries() {
        let mut out = Vec::new();
        encode_new_format_length(191, &mut out);
        assert_eq!(out, vec![191]);

        let mut out = Vec::new();
        encode_new_format_length(192, &mut out);
        assert_eq!(out.len(), 2);

        let mut out = Vec::new();
        encode_new_format_length(8383, &mut out);
        assert_eq!(out.len(), 2);

        let mut out = Vec::new();
        encode_new_format_length(8384, &mut out);
        assert_eq!(out.len(), 5);
        assert_eq!(out[0], 255);
    }

    #[test]
    fn old_format_rejects_high_tag() {
        let mut out = Vec::new();
        assert!(frame_old_format(crate::packet::Tag::Unknown(40), b"x", &mut out).is_err());
    }
}
