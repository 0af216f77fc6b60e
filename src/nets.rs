//! Process-wide network parameters: the dust limit, SegWit opt-in, and the witness
//! `script_pubkey` prefixes. Unlike the teacher's generic `Network<'a>` trait (which also
//! parameterizes address encoding and a transaction builder across several chains), this crate
//! has only one concrete chain and no address-string layer, so `Network` is a plain struct of
//! associated constants, passed explicitly to the handful of builder functions that are
//! SegWit-aware (see `§9` of SPEC_FULL.md).

/// A network's transaction-construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Network {
    /// Human-readable name, used in the `SegwitNotSupported` error message.
    pub name: &'static str,
    /// Whether this network accepts SegWit transactions.
    pub segwit: bool,
    /// The 2-byte marker/flag pair inserted after `version` in a witness-bearing transaction.
    pub segwit_tx_flag: [u8; 2],
    /// `script_pubkey` prefix for a P2WPKH output (`OP_0 PUSH20`).
    pub p2wpkh_prefix: [u8; 2],
    /// `script_pubkey` prefix for a P2WSH output (`OP_0 PUSH32`).
    pub p2wsh_prefix: [u8; 2],
    /// Minimum satoshi value for a non-dust output.
    pub dust_limit: u64,
}

/// Bitcoin mainnet.
pub const MAINNET: Network = Network {
    name: "Bitcoin Mainnet",
    segwit: true,
    segwit_tx_flag: [0x00, 0x01],
    p2wpkh_prefix: [0x00, 0x14],
    p2wsh_prefix: [0x00, 0x20],
    dust_limit: 546,
};

/// Bitcoin testnet.
pub const TESTNET: Network = Network {
    name: "Bitcoin Testnet",
    ..MAINNET
};

/// Bitcoin signet.
pub const SIGNET: Network = Network {
    name: "Bitcoin Signet",
    ..MAINNET
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_is_segwit_enabled() {
        assert!(MAINNET.segwit);
        assert_eq!(MAINNET.segwit_tx_flag, [0x00, 0x01]);
        assert_eq!(MAINNET.dust_limit, 546);
    }
}
