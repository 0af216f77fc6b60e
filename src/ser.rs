//! Serialization primitives: the `ByteFormat` trait that every wire-format entity implements,
//! and `VarInt`, Bitcoin's "compact size" variable-length integer encoding.

use std::io::{Read, Write};

use crate::error::{TxError, TxResult};

/// A type with a canonical, length-prefixed-or-fixed wire representation.
///
/// Implementors provide `read_from`/`write_to` over arbitrary `Read`/`Write` types; the hex
/// convenience methods and `serialized_length` follow from those two.
pub trait ByteFormat: Sized {
    /// The length in bytes of this value's canonical serialization.
    fn serialized_length(&self) -> usize;

    /// Read an instance from a byte stream.
    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self>;

    /// Write this instance's canonical serialization to a byte stream.
    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize>;

    /// Serialize to an owned byte vector.
    fn serialize(&self) -> TxResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.serialized_length());
        self.write_to(&mut buf)?;
        Ok(buf)
    }

    /// Serialize to a lowercase hex string.
    fn serialize_hex(&self) -> TxResult<String> {
        Ok(hex::encode(self.serialize()?))
    }

    /// Parse an instance from a lowercase hex string.
    fn deserialize_hex(s: &str) -> TxResult<Self> {
        let bytes = hex::decode(s).map_err(|_| TxError::MalformedVarInt(s.to_owned()))?;
        let mut cursor = bytes.as_slice();
        Self::read_from(&mut cursor)
    }

    /// Read a little-endian `u32`.
    fn read_u32_le<R: Read>(reader: &mut R) -> TxResult<u32> {
        let mut buf = [0u8; 4];
        reader.read_exact(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Write a little-endian `u32`.
    fn write_u32_le<W: Write>(writer: &mut W, n: u32) -> TxResult<usize> {
        writer.write_all(&n.to_le_bytes())?;
        Ok(4)
    }

    /// Read a little-endian `u64`.
    fn read_u64_le<R: Read>(reader: &mut R) -> TxResult<u64> {
        let mut buf = [0u8; 8];
        reader.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Write a little-endian `u64`.
    fn write_u64_le<W: Write>(writer: &mut W, n: u64) -> TxResult<usize> {
        writer.write_all(&n.to_le_bytes())?;
        Ok(8)
    }
}

/// Bitcoin's "compact size" variable-length non-negative integer encoding.
///
/// `n < 0xfd` encodes as a single byte. Larger values are prefixed with a marker byte
/// (`0xfd`/`0xfe`/`0xff`) followed by the value in 2/4/8 little-endian bytes, choosing the
/// smallest form that fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarInt(u64);

impl VarInt {
    /// Wrap a value. Every `u64` is a valid VarInt; there is no out-of-range `u64` to reject
    /// (the Python source's "VarInt cannot be less than 0"/"cannot be greater than (2**64)-1"
    /// checks exist only because Python integers are unbounded — `u64` already enforces both
    /// bounds at the type level).
    pub fn new(n: u64) -> Self {
        VarInt(n)
    }

    /// The wrapped value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Encode using the smallest prefix form that fits `self`.
    pub fn to_vec(&self) -> Vec<u8> {
        let n = self.0;
        if n < 0xfd {
            vec![n as u8]
        } else if n <= 0xffff {
            let mut v = vec![0xfd];
            v.extend_from_slice(&(n as u16).to_le_bytes());
            v
        } else if n <= 0xffff_ffff {
            let mut v = vec![0xfe];
            v.extend_from_slice(&(n as u32).to_le_bytes());
            v
        } else {
            let mut v = vec![0xff];
            v.extend_from_slice(&n.to_le_bytes());
            v
        }
    }

    /// The number of bytes `self` occupies on the wire.
    pub fn byte_len(&self) -> usize {
        let n = self.0;
        if n < 0xfd {
            1
        } else if n <= 0xffff {
            3
        } else if n <= 0xffff_ffff {
            5
        } else {
            9
        }
    }

    /// Parse a VarInt from the front of `buf`. Fails if the prefix byte declares a width wider
    /// than the bytes actually available.
    pub fn from_bytes(buf: &[u8]) -> TxResult<Self> {
        let mut cursor = buf;
        Self::read_from(&mut cursor)
    }

    /// Parse a VarInt whose prefix byte has already been consumed from `reader` by the caller
    /// (used by `Tx::read_from` to disambiguate a SegWit marker byte from an ordinary VarInt
    /// prefix without requiring a seekable/peekable reader).
    pub(crate) fn read_from_first_byte<R: Read>(first: u8, reader: &mut R) -> TxResult<Self> {
        let (width, marker) = match first {
            0xfd => (2, 0xfdu8),
            0xfe => (4, 0xfeu8),
            0xff => (8, 0xffu8),
            n => return Ok(VarInt::new(n as u64)),
        };

        let mut rest = vec![0u8; width];
        reader
            .read_exact(&mut rest)
            .map_err(|_| TxError::MalformedVarInt(hex::encode([marker])))?;

        let mut padded = [0u8; 8];
        padded[..width].copy_from_slice(&rest);
        Ok(VarInt::new(u64::from_le_bytes(padded)))
    }
}

impl From<u64> for VarInt {
    fn from(n: u64) -> Self {
        VarInt::new(n)
    }
}

impl From<VarInt> for u64 {
    fn from(v: VarInt) -> Self {
        v.0
    }
}

impl ByteFormat for VarInt {
    fn serialized_length(&self) -> usize {
        self.byte_len()
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let mut prefix = [0u8; 1];
        reader
            .read_exact(&mut prefix)
            .map_err(|_| TxError::MalformedVarInt(hex::encode(prefix)))?;

        let (width, marker) = match prefix[0] {
            0xfd => (2, Some(0xfdu8)),
            0xfe => (4, Some(0xfeu8)),
            0xff => (8, Some(0xffu8)),
            n => return Ok(VarInt::new(n as u64)),
        };

        let mut rest = vec![0u8; width];
        reader
            .read_exact(&mut rest)
            .map_err(|_| TxError::MalformedVarInt(hex::encode([marker.unwrap()])))?;

        let mut padded = [0u8; 8];
        padded[..width].copy_from_slice(&rest);
        Ok(VarInt::new(u64::from_le_bytes(padded)))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        let bytes = self.to_vec();
        writer.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

/// Read a length-prefixed byte vector: `VarInt(len) ‖ bytes`.
pub fn read_prefix_vec<R: Read>(reader: &mut R) -> TxResult<Vec<u8>> {
    let len = VarInt::read_from(reader)?.value() as usize;
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Write a length-prefixed byte vector: `VarInt(len) ‖ bytes`.
pub fn write_prefix_vec<W: Write>(writer: &mut W, data: &[u8]) -> TxResult<usize> {
    let prefix = VarInt::new(data.len() as u64);
    let n = prefix.write_to(writer)?;
    writer.write_all(data)?;
    Ok(n + data.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_one_byte() {
        assert_eq!(VarInt::new(0xfb).to_vec(), vec![0xfb]);
    }

    #[test]
    fn encodes_one_byte_boundary() {
        assert_eq!(VarInt::new(0xff).to_vec(), vec![0xfd, 0xff, 0x00]);
    }

    #[test]
    fn encodes_two_bytes() {
        assert_eq!(VarInt::new(0xffff).to_vec(), vec![0xfd, 0xff, 0xff]);
    }

    #[test]
    fn encodes_four_bytes() {
        assert_eq!(
            VarInt::new(0xffff_ffff).to_vec(),
            vec![0xfe, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn encodes_eight_bytes() {
        assert_eq!(
            VarInt::new(0x0123_4567_89ab_cdef).to_vec(),
            vec![0xff, 0xef, 0xcd, 0xab, 0x89, 0x67, 0x45, 0x23, 0x01]
        );
    }

    #[test]
    fn round_trips_at_every_boundary() {
        for n in [0u64, 0xfc, 0xfd, 0xffff, 0x1_0000, 0xffff_ffff, 0x1_0000_0000, u64::MAX] {
            let v = VarInt::new(n);
            let bytes = v.to_vec();
            let parsed = VarInt::from_bytes(&bytes).unwrap();
            assert_eq!(parsed, v);
            assert_eq!(parsed.to_vec(), bytes);
        }
    }

    #[test]
    fn fails_on_truncated_prefix() {
        let err = VarInt::from_bytes(&[0xfe]).unwrap_err();
        assert!(err.to_string().contains("Malformed VarInt. Got:"));
    }
}
