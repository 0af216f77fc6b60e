//! `TxOut`: a transaction output, an 8-byte satoshi value plus a locking script.

use std::io::{Read, Write};

use crate::error::{TxError, TxResult};
use crate::ser::ByteFormat;
use crate::types::script::ScriptPubkey;

/// A transaction output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxOut {
    value: u64,
    script_pubkey: ScriptPubkey,
}

impl TxOut {
    /// Build a `TxOut`, rejecting values at or below `dust_limit`.
    pub fn new(value: u64, script_pubkey: Vec<u8>, dust_limit: u64) -> TxResult<Self> {
        if value <= dust_limit {
            return Err(TxError::BelowDustLimit {
                limit: dust_limit,
                value,
            });
        }
        Ok(Self {
            value,
            script_pubkey: ScriptPubkey::new(script_pubkey),
        })
    }

    /// Build a `TxOut` using the Bitcoin standard 546-satoshi dust limit.
    pub fn new_standard(value: u64, script_pubkey: Vec<u8>) -> TxResult<Self> {
        Self::new(value, script_pubkey, crate::nets::MAINNET.dust_limit)
    }

    /// A "null" output used by `sighash_single` for every position below the signed index:
    /// value `0xffffffffffffffff`, empty script. Bypasses the dust check — this output never
    /// appears on the wire outside of a sighash preimage.
    pub fn null() -> Self {
        Self {
            value: u64::MAX,
            script_pubkey: ScriptPubkey::default(),
        }
    }

    /// The output's value, in satoshis.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The output's locking script.
    pub fn script_pubkey(&self) -> &ScriptPubkey {
        &self.script_pubkey
    }
}

impl ByteFormat for TxOut {
    fn serialized_length(&self) -> usize {
        8 + self.script_pubkey.serialized_length()
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let value = Self::read_u64_le(reader)?;
        let script_pubkey = ScriptPubkey::read_from(reader)?;
        Ok(Self {
            value,
            script_pubkey,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        let mut n = Self::write_u64_le(writer, self.value)?;
        n += self.script_pubkey.write_to(writer)?;
        Ok(n)
    }
}
