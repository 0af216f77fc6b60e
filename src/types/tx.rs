//! `Tx`: whole-transaction assembly, serialization, copy-with-modifications, and the four legacy
//! sighash algorithms.

use std::io::{Read, Write};

use crate::error::{TxError, TxResult};
use crate::hashes::hash256;
use crate::ser::{ByteFormat, VarInt};
use crate::types::txin::TxIn;
use crate::types::txout::TxOut;
use crate::types::witness::InputWitness;

/// The only SegWit marker/flag pair this crate recognizes.
pub const SEGWIT_FLAG: [u8; 2] = [0x00, 0x01];

/// The maximum number of inputs or outputs a `Tx` may carry.
pub const MAX_IO_COUNT: usize = 255;

/// The maximum serialized size, in bytes, a `Tx` may occupy.
pub const MAX_TX_SIZE: usize = 100_000;

/// A complete Bitcoin transaction, legacy or SegWit.
///
/// Every field is private; the only way to obtain an instance is the validating constructor
/// `new` (or `read_from`, which delegates to it), and the only way to obtain a modified instance
/// is one of the `with_*` methods below, each of which builds and validates a brand new `Tx`.
/// There is no setter and no runtime "frozen" flag: ownership already gives the freeze
/// discipline SPEC_FULL.md §9 asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tx {
    version: u32,
    flag: Option<[u8; 2]>,
    tx_ins: Vec<TxIn>,
    tx_outs: Vec<TxOut>,
    tx_witnesses: Option<Vec<InputWitness>>,
    lock_time: u32,
}

impl Tx {
    /// Build and fully validate a transaction.
    pub fn new(
        version: u32,
        flag: Option<[u8; 2]>,
        tx_ins: Vec<TxIn>,
        tx_outs: Vec<TxOut>,
        tx_witnesses: Option<Vec<InputWitness>>,
        lock_time: u32,
    ) -> TxResult<Self> {
        if let Some(f) = flag {
            if f != SEGWIT_FLAG {
                return Err(TxError::BadSegwitFlag {
                    expected: SEGWIT_FLAG,
                    got: f,
                });
            }
        }

        match (flag, &tx_witnesses) {
            (Some(_), None) => return Err(TxError::FlagWithoutWitnesses),
            (Some(_), Some(w)) if w.is_empty() => return Err(TxError::FlagWithoutWitnesses),
            (None, Some(_)) => return Err(TxError::WitnessesWithoutFlag),
            _ => {}
        }

        if let Some(w) = &tx_witnesses {
            if w.len() != tx_ins.len() {
                return Err(TxError::WitnessCountMismatch);
            }
        }

        if tx_ins.is_empty() || tx_outs.is_empty() {
            return Err(TxError::TooFewIO);
        }
        if tx_ins.len() > MAX_IO_COUNT || tx_outs.len() > MAX_IO_COUNT {
            return Err(TxError::TooManyIO);
        }

        let tx = Self {
            version,
            flag,
            tx_ins,
            tx_outs,
            tx_witnesses,
            lock_time,
        };

        let len = tx.serialized_length();
        if len > MAX_TX_SIZE {
            return Err(TxError::TxTooLarge(len));
        }

        Ok(tx)
    }

    /// The transaction version.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The SegWit marker/flag, if this is a witness transaction.
    pub fn flag(&self) -> Option<[u8; 2]> {
        self.flag
    }

    /// The transaction's inputs.
    pub fn tx_ins(&self) -> &[TxIn] {
        &self.tx_ins
    }

    /// The transaction's outputs.
    pub fn tx_outs(&self) -> &[TxOut] {
        &self.tx_outs
    }

    /// The transaction's witnesses, one per input, if this is a witness transaction.
    pub fn tx_witnesses(&self) -> Option<&[InputWitness]> {
        self.tx_witnesses.as_deref()
    }

    /// The transaction's locktime.
    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    /// `sum(prev_values) - sum(output values)`. The caller supplies the spent outputs' values,
    /// in the same order as `tx_ins`; this crate never fetches them.
    pub fn calc_fee(&self, prev_values: &[u64]) -> u64 {
        let total_in: u64 = prev_values.iter().sum();
        let total_out: u64 = self.tx_outs.iter().map(TxOut::value).sum();
        total_in - total_out
    }

    /// A copy whose `tx_ins` is `self.tx_ins` followed by `new_ins`.
    pub fn with_new_inputs(&self, new_ins: Vec<TxIn>) -> TxResult<Self> {
        let mut tx_ins = self.tx_ins.clone();
        tx_ins.extend(new_ins);
        Self::new(
            self.version,
            self.flag,
            tx_ins,
            self.tx_outs.clone(),
            self.tx_witnesses.clone(),
            self.lock_time,
        )
    }

    /// A copy whose `tx_outs` is `self.tx_outs` followed by `new_outs`.
    pub fn with_new_outputs(&self, new_outs: Vec<TxOut>) -> TxResult<Self> {
        let mut tx_outs = self.tx_outs.clone();
        tx_outs.extend(new_outs);
        Self::new(
            self.version,
            self.flag,
            self.tx_ins.clone(),
            tx_outs,
            self.tx_witnesses.clone(),
            self.lock_time,
        )
    }

    /// A copy with new inputs and their matching witnesses appended in lockstep.
    pub fn with_new_inputs_and_witnesses(&self, new: Vec<(TxIn, InputWitness)>) -> TxResult<Self> {
        let mut tx_ins = self.tx_ins.clone();
        let mut tx_witnesses = self.tx_witnesses.clone().unwrap_or_default();
        for (input, witness) in new {
            tx_ins.push(input);
            tx_witnesses.push(witness);
        }
        Self::new(
            self.version,
            self.flag,
            tx_ins,
            self.tx_outs.clone(),
            Some(tx_witnesses),
            self.lock_time,
        )
    }

    fn sighash_preimage_inputs(
        &self,
        index: usize,
        prevout_script: &[u8],
        zero_other_sequences: bool,
        anyone_can_pay: bool,
    ) -> TxResult<Vec<TxIn>> {
        if index >= self.tx_ins.len() {
            return Err(TxError::SighashIndexOutOfBounds {
                index,
                len: self.tx_ins.len(),
                kind: "inputs",
            });
        }

        let mut ins: Vec<TxIn> = self
            .tx_ins
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let mut new_input = if i == index {
                    input.with_sighash_script_sig(prevout_script)
                } else {
                    input.with_cleared_script_sig()
                };
                if zero_other_sequences && i != index {
                    new_input = new_input.with_sequence(0);
                }
                new_input
            })
            .collect();

        if anyone_can_pay {
            ins = vec![ins[index].clone()];
        }

        Ok(ins)
    }

    /// The SIGHASH_ALL digest for the input at `index`, signing every input and every output.
    /// With `anyone_can_pay`, the preimage is truncated to only the signed input
    /// (SIGHASH_ALL|ANYONECANPAY).
    pub fn sighash_all(
        &self,
        index: usize,
        prevout_script: &[u8],
        anyone_can_pay: bool,
    ) -> TxResult<[u8; 32]> {
        let ins = self.sighash_preimage_inputs(index, prevout_script, false, anyone_can_pay)?;
        let copy = Self::new(
            self.version,
            None,
            ins,
            self.tx_outs.clone(),
            None,
            self.lock_time,
        )?;
        let mut buf = copy.serialize()?;
        let sighash_type: u32 = if anyone_can_pay { 0x81 } else { 0x01 };
        buf.extend_from_slice(&sighash_type.to_le_bytes());
        Ok(hash256(&buf))
    }

    /// The SIGHASH_SINGLE digest for the input at `index`, signing every input but only the
    /// output at the same index. With `anyone_can_pay`, the preimage is also truncated to only
    /// the signed input (SIGHASH_SINGLE|ANYONECANPAY).
    pub fn sighash_single(
        &self,
        index: usize,
        prevout_script: &[u8],
        anyone_can_pay: bool,
    ) -> TxResult<[u8; 32]> {
        if index >= self.tx_outs.len() {
            return Err(TxError::SighashIndexOutOfBounds {
                index,
                len: self.tx_outs.len(),
                kind: "outputs",
            });
        }

        let ins = self.sighash_preimage_inputs(index, prevout_script, true, anyone_can_pay)?;

        let mut outs = Vec::with_capacity(index + 1);
        for _ in 0..index {
            outs.push(TxOut::null());
        }
        outs.push(self.tx_outs[index].clone());

        let copy = Self::new(self.version, None, ins, outs, None, self.lock_time)?;
        let mut buf = copy.serialize()?;
        let sighash_type: u32 = if anyone_can_pay { 0x83 } else { 0x03 };
        buf.extend_from_slice(&sighash_type.to_le_bytes());
        Ok(hash256(&buf))
    }

    /// SIGHASH_NONE is intentionally unimplemented — always fails.
    pub fn sighash_none(&self) -> TxResult<[u8; 32]> {
        Err(TxError::SighashNoneUnsupported)
    }
}

impl ByteFormat for Tx {
    fn serialized_length(&self) -> usize {
        let mut len = 4;
        if self.flag.is_some() {
            len += 2;
        }
        len += VarInt::new(self.tx_ins.len() as u64).byte_len();
        len += self
            .tx_ins
            .iter()
            .map(ByteFormat::serialized_length)
            .sum::<usize>();
        len += VarInt::new(self.tx_outs.len() as u64).byte_len();
        len += self
            .tx_outs
            .iter()
            .map(ByteFormat::serialized_length)
            .sum::<usize>();
        if let Some(witnesses) = &self.tx_witnesses {
            len += witnesses
                .iter()
                .map(ByteFormat::serialized_length)
                .sum::<usize>();
        }
        len += 4;
        len
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let version = Self::read_u32_le(reader)?;
        let mut first = [0u8; 1];
        reader.read_exact(&mut first)?;

        if first[0] == 0x00 {
            let mut flag_byte = [0u8; 1];
            reader.read_exact(&mut flag_byte)?;
            if flag_byte[0] != 0x01 {
                return Err(TxError::BadSegwitFlag {
                    expected: SEGWIT_FLAG,
                    got: [0x00, flag_byte[0]],
                });
            }

            let n_in = VarInt::read_from(reader)?.value();
            let tx_ins = (0..n_in)
                .map(|_| TxIn::read_from(reader))
                .collect::<TxResult<Vec<_>>>()?;
            let n_out = VarInt::read_from(reader)?.value();
            let tx_outs = (0..n_out)
                .map(|_| TxOut::read_from(reader))
                .collect::<TxResult<Vec<_>>>()?;
            let tx_witnesses = (0..n_in)
                .map(|_| InputWitness::read_from(reader))
                .collect::<TxResult<Vec<_>>>()?;
            let lock_time = Self::read_u32_le(reader)?;

            Self::new(version, Some(SEGWIT_FLAG), tx_ins, tx_outs, Some(tx_witnesses), lock_time)
        } else {
            let n_in = VarInt::read_from_first_byte(first[0], reader)?.value();
            let tx_ins = (0..n_in)
                .map(|_| TxIn::read_from(reader))
                .collect::<TxResult<Vec<_>>>()?;
            let n_out = VarInt::read_from(reader)?.value();
            let tx_outs = (0..n_out)
                .map(|_| TxOut::read_from(reader))
                .collect::<TxResult<Vec<_>>>()?;
            let lock_time = Self::read_u32_le(reader)?;

            Self::new(version, None, tx_ins, tx_outs, None, lock_time)
        }
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        let mut n = Self::write_u32_le(writer, self.version)?;
        if let Some(flag) = self.flag {
            writer.write_all(&flag)?;
            n += 2;
        }
        n += VarInt::new(self.tx_ins.len() as u64).write_to(writer)?;
        for input in &self.tx_ins {
            n += input.write_to(writer)?;
        }
        n += VarInt::new(self.tx_outs.len() as u64).write_to(writer)?;
        for output in &self.tx_outs {
            n += output.write_to(writer)?;
        }
        if let Some(witnesses) = &self.tx_witnesses {
            for witness in witnesses {
                n += witness.write_to(writer)?;
            }
        }
        n += Self::write_u32_le(writer, self.lock_time)?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::txin::Outpoint;

    fn sample_outpoint() -> Outpoint {
        // Wire-order (reversed) form of the display txid
        // 10399b3f20cbdd4b5ac3f823afdba28b9f70e21437a59b312a1b62c42c5cd101.
        let tx_id: [u8; 32] = hex::decode(
            "01d15c2cc4621b2a319ba53714e2709f8ba2dbaf23f8c35a4bddcb203f9b3910",
        )
        .unwrap()[..32]
            .try_into()
            .unwrap();
        Outpoint::new(tx_id, 0)
    }

    fn on_chain_script() -> Vec<u8> {
        hex::decode(
            "473044022000e02ea97289a35181a9bfabd324f12439410db11c4e94978cdade6a665bf18402\
             20458b87c34d8bb5e4d70d01041c7c2d714ea8bfaca2c2d2b1f9e5749c3ee17e3d012102ed0851f0\
             b4c4458f80e0310e57d20e12a84642b8e097fe82be229edbd7dbd53920f6665740b1f950eb58d646\
             b1fae9be28cef842da5e51dc78459ad2b092e7fd6e514c5163a914bb408296de2420403aa79eb614\
             26bb588a08691f8876a91431b31321831520e346b069feebe6e9cf3dd7239c670400925e5ab17576\
             a9140d22433293fe9652ea00d21c5061697aef5ddb296888ac",
        )
        .unwrap()
    }

    fn on_chain_tx() -> Tx {
        let outpoint = sample_outpoint();
        let input = TxIn::new(outpoint, on_chain_script(), vec![], 0).unwrap();
        let output = TxOut::new_standard(
            2000,
            hex::decode("76a914f2539f42058da784a9d54615ad074436cf3eb85188ac").unwrap(),
        )
        .unwrap();
        Tx::new(1, None, vec![input], vec![output], None, 0).unwrap()
    }

    #[test]
    fn serializes_to_the_known_on_chain_transaction() {
        let tx = on_chain_tx();
        let bytes = tx.serialize().unwrap();

        let expected = "010000000101d15c2cc4621b2a319ba53714e2709f8ba2dbaf23f8c35a4bddcb203f9\
            b391000000000df473044022000e02ea97289a35181a9bfabd324f12439410db11c4e94978cdade6a6\
            65bf1840220458b87c34d8bb5e4d70d01041c7c2d714ea8bfaca2c2d2b1f9e5749c3ee17e3d012102ed\
            0851f0b4c4458f80e0310e57d20e12a84642b8e097fe82be229edbd7dbd53920f6665740b1f950eb58d\
            646b1fae9be28cef842da5e51dc78459ad2b092e7fd6e514c5163a914bb408296de2420403aa79eb614\
            26bb588a08691f8876a91431b31321831520e346b069feebe6e9cf3dd7239c670400925e5ab17576a91\
            40d22433293fe9652ea00d21c5061697aef5ddb296888ac0000000001d0070000000000001976a914f2\
            539f42058da784a9d54615ad074436cf3eb85188ac00000000";
        assert_eq!(hex::encode(&bytes), expected);

        // This transaction's double-SHA256 (reversed to display order) is the real on-chain
        // txid 0739d0c7b7b7ff5f991e8e3f72a6f5eb56563880df982c4ab813cd71bc7a6a03.
        let mut digest = crate::hashes::hash256(&bytes);
        digest.reverse();
        assert_eq!(
            hex::encode(digest),
            "0739d0c7b7b7ff5f991e8e3f72a6f5eb56563880df982c4ab813cd71bc7a6a03"
        );

        let parsed = Tx::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, tx);
        assert_eq!(parsed.version(), 1);
        assert_eq!(parsed.tx_ins().len(), 1);
        assert_eq!(parsed.tx_outs().len(), 1);
        assert_eq!(parsed.tx_outs()[0].value(), 2000);
    }

    #[test]
    fn calc_fee_is_total_in_minus_total_out() {
        let tx = on_chain_tx();
        assert_eq!(tx.tx_outs()[0].value(), 2000);
        assert_eq!(tx.calc_fee(&[57_536_406]), 57_534_406);
    }

    #[test]
    fn rejects_mismatched_segwit_flag() {
        let input = TxIn::new(sample_outpoint(), vec![0x51], vec![], 0).unwrap();
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let err = Tx::new(1, Some([0x00, 0x00]), vec![input], vec![output], None, 0).unwrap_err();
        assert!(err.to_string().starts_with("Invald segwit flag. Expected None or"));
    }

    #[test]
    fn rejects_flag_without_witnesses() {
        let input = TxIn::new(sample_outpoint(), vec![0x51], vec![], 0).unwrap();
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let err = Tx::new(1, Some(SEGWIT_FLAG), vec![input], vec![output], None, 0).unwrap_err();
        assert_eq!(err.to_string(), "Got segwit flag but no witnesses.");
    }

    #[test]
    fn rejects_witnesses_without_flag() {
        let input = TxIn::new(sample_outpoint(), vec![0x51], vec![], 0).unwrap();
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let witness = InputWitness::new(vec![]);
        let err = Tx::new(1, None, vec![input], vec![output], Some(vec![witness]), 0).unwrap_err();
        assert_eq!(err.to_string(), "Got witnesses but no segwit flag.");
    }

    #[test]
    fn rejects_witness_count_mismatch() {
        let input = TxIn::new(sample_outpoint(), vec![0x51], vec![], 0).unwrap();
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let w1 = InputWitness::new(vec![]);
        let w2 = InputWitness::new(vec![]);
        let err = Tx::new(
            1,
            Some(SEGWIT_FLAG),
            vec![input],
            vec![output],
            Some(vec![w1, w2]),
            0,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Witness and TxIn lists must be same length.");
    }

    #[test]
    fn rejects_too_few_inputs() {
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let err = Tx::new(1, None, vec![], vec![output], None, 0).unwrap_err();
        assert_eq!(err.to_string(), "Too few inputs or outputs. Stop that.");
    }

    #[test]
    fn rejects_too_many_inputs() {
        let input = TxIn::new(sample_outpoint(), vec![0x51], vec![], 0).unwrap();
        let output = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let err = Tx::new(1, None, vec![input; 257], vec![output], None, 0).unwrap_err();
        assert_eq!(err.to_string(), "Too many inputs or outputs. Stop that.");
    }

    #[test]
    fn sighash_none_is_rejected() {
        let tx = on_chain_tx();
        let err = tx.sighash_none().unwrap_err();
        assert_eq!(err.to_string(), "SIGHASH_NONE is a bad idea.");
    }

    fn two_input_tx() -> Tx {
        let in0 = TxIn::new(sample_outpoint(), vec![0x51], vec![], u32::MAX).unwrap();
        let mut other_txid = [0x22u8; 32];
        other_txid[0] = 0x01;
        let in1 = TxIn::new(Outpoint::new(other_txid, 1), vec![0x52], vec![], u32::MAX).unwrap();
        let out0 = TxOut::new_standard(2000, vec![0xaa]).unwrap();
        let out1 = TxOut::new_standard(3000, vec![0xbb]).unwrap();
        Tx::new(1, None, vec![in0, in1], vec![out0, out1], None, 0).unwrap()
    }

    #[test]
    fn sighash_all_is_deterministic_and_index_sensitive() {
        let tx = two_input_tx();
        let prevout_script = hex::decode("76a914f2539f42058da784a9d54615ad074436cf3eb85188ac")
            .unwrap();

        let first = tx.sighash_all(0, &prevout_script, false).unwrap();
        let again = tx.sighash_all(0, &prevout_script, false).unwrap();
        assert_eq!(first, again);

        let other_index = tx.sighash_all(1, &prevout_script, false).unwrap();
        assert_ne!(first, other_index);

        let anyone_can_pay = tx.sighash_all(0, &prevout_script, true).unwrap();
        assert_ne!(first, anyone_can_pay);
    }

    #[test]
    fn sighash_all_rejects_out_of_bounds_index() {
        let tx = two_input_tx();
        let err = tx.sighash_all(5, &[0xaa], false).unwrap_err();
        assert_eq!(err.to_string(), "Sighash index out of bounds: 5 for 2 inputs.");
    }

    #[test]
    fn sighash_single_differs_from_sighash_all() {
        let tx = two_input_tx();
        let prevout_script = vec![0xaa];
        let all = tx.sighash_all(0, &prevout_script, false).unwrap();
        let single = tx.sighash_single(0, &prevout_script, false).unwrap();
        assert_ne!(all, single);
    }

    #[test]
    fn sighash_single_rejects_output_index_beyond_tx_outs() {
        let tx = two_input_tx();
        let err = tx.sighash_single(2, &[0xaa], false).unwrap_err();
        assert_eq!(err.to_string(), "Sighash index out of bounds: 2 for 2 outputs.");
    }

    #[test]
    fn copy_with_new_inputs_appends() {
        let tx = on_chain_tx();
        let extra = tx.tx_ins()[0].clone();
        let extended = tx.with_new_inputs(vec![extra.clone()]).unwrap();
        assert_eq!(extended.tx_ins().len(), 2);
        assert_eq!(extended.tx_ins()[1], extra);
    }

    #[test]
    fn segwit_round_trip_and_size_delta() {
        let legacy = on_chain_tx();
        let witness = InputWitness::new(vec![crate::types::script::WitnessStackItem::new(
            vec![0x01, 0x02],
        )]);
        let witness_tx = Tx::new(
            legacy.version(),
            Some(SEGWIT_FLAG),
            legacy.tx_ins().to_vec(),
            legacy.tx_outs().to_vec(),
            Some(vec![witness.clone()]),
            legacy.lock_time(),
        )
        .unwrap();

        let bytes = witness_tx.serialize().unwrap();
        let parsed = Tx::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, witness_tx);

        let delta = witness_tx.serialized_length() - legacy.serialized_length();
        assert_eq!(delta, 2 + witness.serialized_length());
    }
}
