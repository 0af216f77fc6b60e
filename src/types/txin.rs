//! `Outpoint` and `TxIn`: a previous-output reference and a transaction input built from it.

use std::io::{Read, Write};

use crate::error::{TxError, TxResult};
use crate::ser::ByteFormat;
use crate::types::script::{push_opcode_for, ScriptSig};

/// A reference to a specific output of a previous transaction: `tx_id` (wire byte order, i.e.
/// the reverse of the commonly displayed hex) concatenated with the little-endian output index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Outpoint {
    tx_id: [u8; 32],
    index: u32,
}

impl Outpoint {
    /// Build an outpoint from a 32-byte wire-order txid and an output index.
    pub fn new(tx_id: [u8; 32], index: u32) -> Self {
        Self { tx_id, index }
    }

    /// Build an outpoint, validating the length of a caller-supplied `tx_id` slice. This is the
    /// fallible counterpart to `new`, useful when the txid arrives as a runtime-sized buffer
    /// (e.g. parsed from hex) rather than a fixed-size array.
    pub fn from_slice(tx_id: &[u8], index: u32) -> TxResult<Self> {
        let arr: [u8; 32] = tx_id
            .try_into()
            .map_err(|_| TxError::BadTxidLength(tx_id.len()))?;
        Ok(Self::new(arr, index))
    }

    /// Build an outpoint from two runtime-sized buffers, validating both lengths. Useful when
    /// both the txid and the index arrive as buffers of unverified length (e.g. parsed from hex
    /// or split off a larger byte string) rather than a `u32` already known to be exactly 4
    /// bytes.
    pub fn from_byte_slices(tx_id: &[u8], index: &[u8]) -> TxResult<Self> {
        let tx_id: [u8; 32] = tx_id
            .try_into()
            .map_err(|_| TxError::BadTxidLength(tx_id.len()))?;
        let index: [u8; 4] = index
            .try_into()
            .map_err(|_| TxError::BadOutpointIndexLength(index.len()))?;
        Ok(Self::new(tx_id, u32::from_le_bytes(index)))
    }

    /// The all-zero, max-index outpoint used by coinbase inputs.
    pub fn null() -> Self {
        Self {
            tx_id: [0u8; 32],
            index: u32::MAX,
        }
    }

    /// The 32-byte wire-order txid.
    pub fn tx_id(&self) -> &[u8; 32] {
        &self.tx_id
    }

    /// The previous output's index within its transaction.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl ByteFormat for Outpoint {
    fn serialized_length(&self) -> usize {
        36
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let mut tx_id = [0u8; 32];
        reader.read_exact(&mut tx_id)?;
        let index = Self::read_u32_le(reader)?;
        Ok(Self { tx_id, index })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        writer.write_all(&self.tx_id)?;
        Self::write_u32_le(writer, self.index)?;
        Ok(36)
    }
}

/// A transaction input: the outpoint it spends, the script_sig authorizing the spend (built
/// from `stack_script` plus an optional P2SH `redeem_script`), and the sequence number.
///
/// Equality is defined over the wire-relevant fields (`outpoint`, `script_sig`, `sequence`)
/// rather than the constructor arguments `stack_script`/`redeem_script`: a `TxIn` parsed back
/// off the wire cannot generally recover which prefix of `script_sig` was the stack script and
/// which was a pushed redeem script (that split is construction metadata, not part of the
/// serialized form), so two inputs with identical wire bytes always compare equal.
#[derive(Clone, Debug)]
pub struct TxIn {
    outpoint: Outpoint,
    stack_script: Vec<u8>,
    redeem_script: Vec<u8>,
    script_sig: ScriptSig,
    sequence: u32,
}

/// The consensus-adjacent relay limit on an input's assembled `script_sig`.
pub const MAX_SCRIPT_SIG_LEN: usize = 1650;

impl TxIn {
    /// Build a `TxIn`. `script_sig` is assembled as `stack_script ‖ push(redeem_script)` when
    /// `redeem_script` is non-empty (the P2SH case), or just `stack_script` otherwise (including
    /// witness inputs, whose caller passes a single `0x00` placeholder stack_script).
    pub fn new(
        outpoint: Outpoint,
        stack_script: Vec<u8>,
        redeem_script: Vec<u8>,
        sequence: u32,
    ) -> TxResult<Self> {
        let mut script_sig = stack_script.clone();
        if !redeem_script.is_empty() {
            script_sig.extend(push_opcode_for(redeem_script.len()));
            script_sig.extend_from_slice(&redeem_script);
        }

        if script_sig.len() > MAX_SCRIPT_SIG_LEN {
            return Err(TxError::ScriptSigTooLong(script_sig.len()));
        }

        Ok(Self {
            outpoint,
            stack_script,
            redeem_script,
            script_sig: ScriptSig::new(script_sig),
            sequence,
        })
    }

    /// An unsigned input: empty stack_script/redeem_script, sequence `0xffffffff`.
    pub fn unsigned(outpoint: Outpoint) -> Self {
        Self {
            outpoint,
            stack_script: vec![],
            redeem_script: vec![],
            script_sig: ScriptSig::default(),
            sequence: u32::MAX,
        }
    }

    /// The previous output this input spends.
    pub fn outpoint(&self) -> &Outpoint {
        &self.outpoint
    }

    /// The portion of `script_sig` that seeds the script-execution stack.
    pub fn stack_script(&self) -> &[u8] {
        &self.stack_script
    }

    /// For P2SH spends, the script whose hash appears in the previous output; empty otherwise.
    pub fn redeem_script(&self) -> &[u8] {
        &self.redeem_script
    }

    /// The fully assembled unlocking script.
    pub fn script_sig(&self) -> &ScriptSig {
        &self.script_sig
    }

    /// The input's sequence number.
    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    /// Build a copy with a new `sequence`, leaving every other field unchanged.
    pub fn with_sequence(&self, sequence: u32) -> Self {
        Self {
            sequence,
            ..self.clone()
        }
    }

    /// Build a copy whose `script_sig` (and the `stack_script`/`redeem_script` it was built
    /// from) is cleared, as the legacy sighash algorithm requires for every non-signed input.
    pub fn with_cleared_script_sig(&self) -> Self {
        Self {
            stack_script: vec![],
            redeem_script: vec![],
            script_sig: ScriptSig::default(),
            ..self.clone()
        }
    }

    /// Build a copy whose `stack_script` is replaced by `prevout_script` and whose
    /// `redeem_script` is cleared, as the legacy sighash algorithm requires for the signed
    /// input.
    pub fn with_sighash_script_sig(&self, prevout_script: &[u8]) -> Self {
        Self {
            stack_script: prevout_script.to_vec(),
            redeem_script: vec![],
            script_sig: ScriptSig::new(prevout_script.to_vec()),
            ..self.clone()
        }
    }
}

impl PartialEq for TxIn {
    fn eq(&self, other: &Self) -> bool {
        self.outpoint == other.outpoint
            && self.script_sig == other.script_sig
            && self.sequence == other.sequence
    }
}

impl Eq for TxIn {}

impl ByteFormat for TxIn {
    fn serialized_length(&self) -> usize {
        self.outpoint.serialized_length() + self.script_sig.serialized_length() + 4
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let outpoint = Outpoint::read_from(reader)?;
        let script_sig = ScriptSig::read_from(reader)?;
        let sequence = Self::read_u32_le(reader)?;
        Ok(Self {
            outpoint,
            stack_script: script_sig.as_ref().to_vec(),
            redeem_script: vec![],
            script_sig,
            sequence,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        let mut n = self.outpoint.write_to(writer)?;
        n += self.script_sig.write_to(writer)?;
        n += Self::write_u32_le(writer, self.sequence)?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_outpoint() -> Outpoint {
        let mut tx_id = [0xabu8; 32];
        tx_id[0] = 0x11;
        Outpoint::new(tx_id, 7)
    }

    #[test]
    fn outpoint_serializes_as_txid_then_le_index() {
        let outpoint = sample_outpoint();
        let bytes = outpoint.serialize().unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(&bytes[..32], &outpoint.tx_id()[..]);
        assert_eq!(&bytes[32..], &7u32.to_le_bytes());
    }

    #[test]
    fn outpoint_from_slice_rejects_wrong_length() {
        let err = Outpoint::from_slice(&[0xffu8; 4], 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected byte-like object with length 32. Got 4 bytes."
        );
    }

    #[test]
    fn outpoint_from_byte_slices_parses_le_index() {
        let outpoint = Outpoint::from_byte_slices(&[0x11u8; 32], &[7, 0, 0, 0]).unwrap();
        assert_eq!(outpoint.tx_id(), &[0x11u8; 32]);
        assert_eq!(outpoint.index(), 7);
    }

    #[test]
    fn outpoint_from_byte_slices_rejects_wrong_index_length() {
        let err = Outpoint::from_byte_slices(&[0x11u8; 32], &[0u8; 3]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected byte-like object with length 4. Got 3 bytes."
        );
    }

    #[test]
    fn txin_rejects_oversized_script_sig() {
        let err = TxIn::new(sample_outpoint(), vec![0u8; 1000], vec![0u8; 1000], 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Input script_sig is too long. Expected <= 1650 bytes. Got 2003 bytes."
        );
    }

    #[test]
    fn txin_assembles_p2sh_script_sig_with_push() {
        let redeem = vec![0xaa; 80];
        let input = TxIn::new(sample_outpoint(), vec![0x51], redeem.clone(), 0).unwrap();
        let sig = input.script_sig().as_ref();
        assert_eq!(sig[0], 0x51);
        assert_eq!(&sig[1..3], &[0x4c, 80]);
        assert_eq!(&sig[3..], &redeem[..]);
    }
}
