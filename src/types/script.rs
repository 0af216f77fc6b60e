//! Opaque byte-vector wrappers for the script-shaped fields that flow through `TxIn`/`TxOut`.
//!
//! None of these types parse or execute Bitcoin Script — that parser is an external
//! collaborator this crate never sees (§6.2 of SPEC_FULL.md). They exist purely so a `TxIn`'s
//! assembled `script_sig` and a `TxOut`'s `output_script` carry their own `VarInt`-prefixed wire
//! form, and so call sites don't confuse one flavor of script bytes for another.

use crate::macros::wrap_prefixed_byte_vector;

wrap_prefixed_byte_vector!(
    /// A legacy input's fully assembled unlocking script (`script_sig`): `stack_script` with an
    /// optional P2SH `redeem_script` push appended.
    ScriptSig
);

wrap_prefixed_byte_vector!(
    /// A `TxOut`'s locking script (`script_pubkey` / `output_script`).
    ScriptPubkey
);

wrap_prefixed_byte_vector!(
    /// A single entry on a witness stack.
    WitnessStackItem
);

/// The standard push-opcode encoding rules for appending a redeem script to a stack script:
/// a direct-length byte for short pushes, `OP_PUSHDATA1/2/4` for longer ones.
pub(crate) fn push_opcode_for(len: usize) -> Vec<u8> {
    if len <= 75 {
        vec![len as u8]
    } else if len <= 0xff {
        vec![0x4c, len as u8]
    } else if len <= 0xffff {
        let mut v = vec![0x4d];
        v.extend_from_slice(&(len as u16).to_le_bytes());
        v
    } else {
        let mut v = vec![0x4e];
        v.extend_from_slice(&(len as u32).to_le_bytes());
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_opcode_picks_direct_push_for_short_scripts() {
        assert_eq!(push_opcode_for(10), vec![10]);
        assert_eq!(push_opcode_for(75), vec![75]);
    }

    #[test]
    fn push_opcode_picks_pushdata1_above_75() {
        assert_eq!(push_opcode_for(76), vec![0x4c, 76]);
        assert_eq!(push_opcode_for(255), vec![0x4c, 0xff]);
    }

    #[test]
    fn push_opcode_picks_pushdata2_above_255() {
        assert_eq!(push_opcode_for(256), vec![0x4d, 0x00, 0x01]);
    }

    #[test]
    fn push_opcode_picks_pushdata4_above_65535() {
        assert_eq!(push_opcode_for(0x1_0000), vec![0x4e, 0x00, 0x00, 0x01, 0x00]);
    }
}
