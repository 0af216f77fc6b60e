//! Construction, serialization, and legacy sighash computation for Bitcoin transactions.
//!
//! This crate builds and parses the wire form of a transaction (`types::Tx` and its
//! constituents) and computes the pre-SegWit (`BIP-143`-less) sighash digests `SIGHASH_ALL`,
//! `SIGHASH_ALL|ANYONECANPAY`, `SIGHASH_SINGLE`, and `SIGHASH_SINGLE|ANYONECANPAY`. It does not
//! sign, verify, broadcast, or otherwise reach outside the bytes of the transaction itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod builder;
pub mod error;
pub mod hashes;
pub mod macros;
pub mod nets;
pub mod ser;
pub mod types;

pub use builder::*;
pub use error::{TxError, TxResult};
pub use hashes::*;
pub use nets::*;
pub use ser::{ByteFormat, VarInt};
pub use types::*;
