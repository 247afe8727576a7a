//! Literal Data Packet (tag 11).

use crate::{Error, Result};

/// The content-type octet of a [`LiteralDataPacket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralDataFormat {
    /// Binary data (`b`).
    Binary,
    /// Text data, local line endings (`t`).
    Text,
    /// UTF-8 text (`u`).
    Utf8,
    /// A format octet this crate does not interpret further.
    Unknown(u8),
}

impl From<u8> for LiteralDataFormat {
    fn from(b: u8) -> Self {
        match b {
            b'b' => LiteralDataFormat::Binary,
            b't' => LiteralDataFormat::Text,
            b'u' => LiteralDataFormat::Utf8,
            other => LiteralDataFormat::Unknown(other),
        }
    }
}

impl From<LiteralDataFormat> for u8 {
    fn from(f: LiteralDataFormat) -> u8 {
        match f {
            LiteralDataFormat::Binary => b'b',
            LiteralDataFormat::Text => b't',
            LiteralDataFormat::Utf8 => b'u',
            LiteralDataFormat::Unknown(b) => b,
        }
    }
}

/// A literal data packet: `format || name_len || name || mtime || data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralDataPacket {
    /// The content format.
    pub format: LiteralDataFormat,
    /// The original file name, at most 255 octets.
    pub file_name: Vec<u8>,
    /// Modification time, seconds since the Unix epoch.
    pub mtime: u32,
    /// The literal payload.
    pub data: Vec<u8>,
}

impl LiteralDataPacket {
    /// Decodes a literal-data packet body.
    pub fn decode(body: &[u8]) -> Result<LiteralDataPacket> {
        let (&format_octet, rest) = body
            .split_first()
            .ok_or_else(|| Error::Malformed("literal data: empty body".into()))?;
        let (&name_len, rest) = rest
            .split_first()
            .ok_or_else(|| Error::Malformed("literal data: missing name length".into()))?;
        let name_len = name_len as usize;
        if rest.len() < name_len + 4 {
            return Err(Error::Malformed(
                "literal data: truncated before mtime/data".into(),
            ));
        }
        let (file_name, rest) = rest.split_at(name_len);
        let mtime = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
        let data = rest[4..].to_vec();
        Ok(LiteralDataPacket {
            format: LiteralDataFormat::from(format_octet),
            file_name: file_name.to_vec(),
            mtime,
            data,
        })
    }

    /// Encodes the packet body.
    ///
    /// # Errors
    ///
    /// `Error::InvalidArgument` if `file_name` exceeds 255 octets.
    pub fn encode(&self) -> Result<Vec<u8>> {
        if self.file_name.len() > 255 {
            return Err(Error::InvalidArgument(
                "literal data: file name exceeds 255 octets".into(),
            ));
        }
        let mut out = Vec::with_capacity(6 + self.file_name.len() + self.data.len());
        out.push(self.format.into());
        out.push(self.file_name.len() as u8);
        out.extend_from_slice(&self.file_name);
        out.extend_from_slice(&self.mtime.to_be_bytes());
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_roundtrip_example() {
        // tag 11, body 0x62 0x00 0x00000000 "hi".
        let body = [0x62, 0x00, 0x00, 0x00, 0x00, 0x00, b'h', b'i'];
        let decoded = LiteralDataPacket::decode(&body).unwrap();
        assert_eq!(decoded.format, LiteralDataFormat::Binary);
        assert!(decoded.file_name.is_empty());
        assert_eq!(decoded.mtime, 0);
        assert_eq!(decoded.data, b"hi");
        assert_eq!(decoded.encode().unwrap(), body);
    }

    #[test]
    fn file_name_over_255_is_invalid() {
        let packet = LiteralDataPacket {
            format: LiteralDataFormat::Binary,
            file_name: vec![0u8; 256],
            mtime: 0,
            data: vec![],
        };
        assert!(matches!(packet.encode(), Err(Error::InvalidArgument(_))));
    }
}
