//! The single error type returned by every fallible operation in this crate.
//!
//! Every construction, copy, or parse failure in the transaction model is an invalid-argument
//! or invariant violation. There is no recoverable-vs-fatal distinction: callers decide whether
//! to surface or log a failure.

use std::io;

/// Invalid-argument and invariant-violation errors produced while building, copying, or parsing
/// transaction entities.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// Underlying I/O failure while reading or writing a wire-format entity.
    #[error(transparent)]
    IoError(#[from] io::Error),

    /// A VarInt prefix byte declared a width, but fewer bytes than that width followed it.
    #[error("Malformed VarInt. Got: {0}")]
    MalformedVarInt(String),

    /// `Outpoint::new` received a `tx_id` that was not exactly 32 bytes.
    #[error("Expected byte-like object with length 32. Got {0} bytes.")]
    BadTxidLength(usize),

    /// `Outpoint::new` received an `index` that was not exactly 4 bytes.
    #[error("Expected byte-like object with length 4. Got {0} bytes.")]
    BadOutpointIndexLength(usize),

    /// A script_sig assembled from `stack_script` and `redeem_script` exceeded the consensus
    /// relay limit.
    #[error("Input script_sig is too long. Expected <= 1650 bytes. Got {0} bytes.")]
    ScriptSigTooLong(usize),

    /// A `TxOut` value was at or below the dust limit.
    #[error("Transaction value below dust limit. Expected more than {limit} sat. Got: {value} sat.")]
    BelowDustLimit {
        /// The configured dust limit, in satoshis.
        limit: u64,
        /// The value that was rejected, in satoshis.
        value: u64,
    },

    /// A segwit flag was present but was not the single recognized value `0x0001`.
    #[error("Invald segwit flag. Expected None or {expected:?}. Got {got:?}")]
    BadSegwitFlag {
        /// The only flag value this crate accepts.
        expected: [u8; 2],
        /// The flag value that was rejected.
        got: [u8; 2],
    },

    /// A segwit flag was supplied, but no witnesses accompanied it.
    #[error("Got segwit flag but no witnesses.")]
    FlagWithoutWitnesses,

    /// Witnesses were supplied, but no segwit flag accompanied them.
    #[error("Got witnesses but no segwit flag.")]
    WitnessesWithoutFlag,

    /// `tx_witnesses.len() != tx_ins.len()`.
    #[error("Witness and TxIn lists must be same length.")]
    WitnessCountMismatch,

    /// More than 255 inputs or outputs were supplied.
    #[error("Too many inputs or outputs. Stop that.")]
    TooManyIO,

    /// Zero inputs or zero outputs were supplied.
    #[error("Too few inputs or outputs. Stop that.")]
    TooFewIO,

    /// The fully assembled transaction exceeded the 100kB consensus-adjacent size cap this
    /// crate enforces.
    #[error("Tx is too large. Expect less than 100kB. Got: {0} bytes")]
    TxTooLarge(usize),

    /// `sighash_none` was called; it is intentionally unimplemented.
    #[error("SIGHASH_NONE is a bad idea.")]
    SighashNoneUnsupported,

    /// A sighash call was asked to sign an input or output index beyond the transaction's
    /// corresponding list.
    #[error("Sighash index out of bounds: {index} for {len} {kind}.")]
    SighashIndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The number of items actually present.
        len: usize,
        /// `"inputs"` or `"outputs"`, naming which list `len` counts.
        kind: &'static str,
    },

    /// A witness-only builder helper was invoked against a network that does not enable SegWit.
    #[error("Network {0} does not support witness scripts.")]
    SegwitNotSupported(&'static str),
}

/// Convenience alias used throughout the crate.
pub type TxResult<T> = Result<T, TxError>;
