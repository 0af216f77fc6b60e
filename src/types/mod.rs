//! The transaction data model: scripts, outpoints, inputs, outputs, witnesses, and the
//! transaction that assembles them.

pub mod script;
pub mod tx;
pub mod txin;
pub mod txout;
pub mod witness;

pub use script::{ScriptPubkey, ScriptSig, WitnessStackItem};
pub use tx::{Tx, MAX_IO_COUNT, MAX_TX_SIZE, SEGWIT_FLAG};
pub use txin::{Outpoint, TxIn, MAX_SCRIPT_SIG_LEN};
pub use txout::TxOut;
pub use witness::InputWitness;
