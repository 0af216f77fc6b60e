//! Hash and endian helpers consumed by the transaction model.
//!
//! `sha256`/`hash160` stand in for the spec's external hash collaborators; because this is a
//! compiled crate rather than a scripting-language host, there is no natural external boundary
//! for them (no caller-supplied hash backend to plug in), so they are implemented directly here
//! with the teacher's own hashing crates (`sha2`, `ripemd`) rather than accepted as parameters.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// `sha256(x)`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// `sha256(sha256(x))`, the digest signed by every legacy sighash.
pub fn hash256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// `hash160(x)` = `RIPEMD160(SHA256(x))`, used to derive pubkey/script hashes for P2PKH/P2SH.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = sha256(data);
    let mut hasher = Ripemd160::new();
    hasher.update(sha);
    hasher.finalize().into()
}

/// Encode `n` as `width` little-endian bytes. Mirrors the source's `i2le_padded`.
pub fn i2le_padded(n: u64, width: usize) -> Vec<u8> {
    let full = n.to_le_bytes();
    let mut out = vec![0u8; width];
    let take = width.min(8);
    out[..take].copy_from_slice(&full[..take]);
    out
}

/// Decode a little-endian byte slice as an unsigned integer. Mirrors the source's `le2i`.
pub fn le2i(buf: &[u8]) -> u64 {
    let mut padded = [0u8; 8];
    let take = buf.len().min(8);
    padded[..take].copy_from_slice(&buf[..take]);
    u64::from_le_bytes(padded)
}
