//! Helpers for assembling the common script and transaction shapes: P2PKH/P2SH/P2WPKH/P2WSH
//! locking scripts, outpoints, script_sigs, and whole transactions from their parts.
//!
//! Unlike the teacher's `LegacyBuilder`/`WitnessBuilder` pair (a stateful, address-encoder-
//! generic `TxBuilder` impl), this module is a set of free functions mirroring the original
//! Python `tx_builder` module one-for-one: this crate has a single concrete chain and no
//! address-string encoding layer, so there is nothing for a generic builder type to be generic
//! over.

use crate::error::{TxError, TxResult};
use crate::hashes::{hash160, sha256};
use crate::nets::Network;
use crate::types::script::push_opcode_for;
use crate::types::script::WitnessStackItem;
use crate::types::txin::{Outpoint, TxIn};
use crate::types::txout::TxOut;
use crate::types::tx::{Tx, SEGWIT_FLAG};
use crate::types::witness::InputWitness;

/// Build a P2PKH locking script from a pubkey: `OP_DUP OP_HASH160 PUSH20 <hash160(pubkey)>
/// OP_EQUALVERIFY OP_CHECKSIG`.
pub fn make_p2pkh_output_script(pubkey: &[u8]) -> Vec<u8> {
    let mut script = vec![0x76, 0xa9, 0x14];
    script.extend_from_slice(&hash160(pubkey));
    script.extend_from_slice(&[0x88, 0xac]);
    script
}

/// Build a P2SH locking script from a serialized redeem script: `OP_HASH160 PUSH20
/// <hash160(script)> OP_EQUAL`.
pub fn make_p2sh_output_script(script: &[u8]) -> Vec<u8> {
    let mut out = vec![0xa9, 0x14];
    out.extend_from_slice(&hash160(script));
    out.push(0x87);
    out
}

/// Build a P2WPKH locking script (`OP_0 PUSH20 <hash160(pubkey)>`). Fails if `network` does not
/// support SegWit.
pub fn make_p2wpkh_output_script(pubkey: &[u8], network: &Network) -> TxResult<Vec<u8>> {
    if !network.segwit {
        return Err(TxError::SegwitNotSupported(network.name));
    }
    let mut script = network.p2wpkh_prefix.to_vec();
    script.extend_from_slice(&hash160(pubkey));
    Ok(script)
}

/// Build a P2WSH locking script (`OP_0 PUSH32 <sha256(script)>`). Fails if `network` does not
/// support SegWit.
pub fn make_p2wsh_output_script(script: &[u8], network: &Network) -> TxResult<Vec<u8>> {
    if !network.segwit {
        return Err(TxError::SegwitNotSupported(network.name));
    }
    let mut out = network.p2wsh_prefix.to_vec();
    out.extend_from_slice(&sha256(script));
    Ok(out)
}

/// Build an outpoint from a little-endian (wire-order) txid and output index.
pub fn make_outpoint(tx_id_le: [u8; 32], index: u32) -> Outpoint {
    Outpoint::new(tx_id_le, index)
}

/// Wrap a single witness stack entry.
pub fn make_witness_stack_item(item: Vec<u8>) -> WitnessStackItem {
    WitnessStackItem::new(item)
}

/// Build a witness from its stack items, in push order.
pub fn make_witness(items: Vec<Vec<u8>>) -> InputWitness {
    InputWitness::new(items.into_iter().map(WitnessStackItem::new).collect())
}

/// Build a legacy input with no witness.
pub fn make_legacy_input(
    outpoint: Outpoint,
    stack_script: Vec<u8>,
    redeem_script: Vec<u8>,
    sequence: u32,
) -> TxResult<TxIn> {
    TxIn::new(outpoint, stack_script, redeem_script, sequence)
}

/// Build a legacy input paired with an empty witness, for use in a transaction that is already
/// witness-bearing but this particular input spends a legacy output.
pub fn make_legacy_input_and_empty_witness(
    outpoint: Outpoint,
    stack_script: Vec<u8>,
    redeem_script: Vec<u8>,
    sequence: u32,
) -> TxResult<(TxIn, InputWitness)> {
    let input = TxIn::new(outpoint, stack_script, redeem_script, sequence)?;
    Ok((input, InputWitness::new(vec![])))
}

/// Build a witness input: the script_sig carries only the redeem script push (if any); the
/// actual unlocking data lives in the paired witness, supplied separately via `make_witness`.
pub fn make_witness_input(
    outpoint: Outpoint,
    redeem_script: Vec<u8>,
    sequence: u32,
) -> TxResult<TxIn> {
    TxIn::new(outpoint, vec![], redeem_script, sequence)
}

/// Build a witness input and its witness together.
pub fn make_witness_input_and_witness(
    outpoint: Outpoint,
    redeem_script: Vec<u8>,
    sequence: u32,
    witness: InputWitness,
) -> TxResult<(TxIn, InputWitness)> {
    let input = make_witness_input(outpoint, redeem_script, sequence)?;
    Ok((input, witness))
}

/// Assemble a script_sig from a stack script and an optional P2SH redeem script, using the same
/// push-opcode rules `TxIn::new` applies internally. Useful for callers who want the assembled
/// bytes without constructing a full `TxIn`.
pub fn make_script_sig(stack_script: &[u8], redeem_script: &[u8]) -> Vec<u8> {
    let mut script_sig = stack_script.to_vec();
    if !redeem_script.is_empty() {
        script_sig.extend(push_opcode_for(redeem_script.len()));
        script_sig.extend_from_slice(redeem_script);
    }
    script_sig
}

/// Assemble a transaction. Sets the SegWit marker/flag iff `tx_witnesses` is `Some`, matching
/// the source builder's behavior (a `None` witness list produces a legacy transaction; an empty
/// `Some(vec![])` is rejected downstream by `Tx::new`, which requires a witness count matching
/// `tx_ins`).
pub fn make_tx(
    version: u32,
    tx_ins: Vec<TxIn>,
    tx_outs: Vec<TxOut>,
    lock_time: u32,
    tx_witnesses: Option<Vec<InputWitness>>,
) -> TxResult<Tx> {
    let flag = tx_witnesses.as_ref().map(|_| SEGWIT_FLAG);
    Tx::new(version, flag, tx_ins, tx_outs, tx_witnesses, lock_time)
}
