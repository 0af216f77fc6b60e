//! `InputWitness`: the witness stack carried by one SegWit input.

use std::io::{Read, Write};

use crate::error::TxResult;
use crate::ser::{ByteFormat, VarInt};
use crate::types::script::WitnessStackItem;

/// The witness stack for a single input: `VarInt(stack_len) ‖ items...`, each item itself
/// length-prefixed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputWitness {
    stack: Vec<WitnessStackItem>,
}

impl InputWitness {
    /// Build a witness from its stack items.
    pub fn new(stack: Vec<WitnessStackItem>) -> Self {
        Self { stack }
    }

    /// The witness stack, in push order.
    pub fn stack(&self) -> &[WitnessStackItem] {
        &self.stack
    }
}

impl ByteFormat for InputWitness {
    fn serialized_length(&self) -> usize {
        VarInt::new(self.stack.len() as u64).byte_len()
            + self
                .stack
                .iter()
                .map(ByteFormat::serialized_length)
                .sum::<usize>()
    }

    fn read_from<R: Read>(reader: &mut R) -> TxResult<Self> {
        let count = VarInt::read_from(reader)?.value();
        let mut stack = Vec::with_capacity(count as usize);
        for _ in 0..count {
            stack.push(WitnessStackItem::read_from(reader)?);
        }
        Ok(Self { stack })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> TxResult<usize> {
        let mut n = VarInt::new(self.stack.len() as u64).write_to(writer)?;
        for item in &self.stack {
            n += item.write_to(writer)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_two_item_stack() {
        let witness = InputWitness::new(vec![
            WitnessStackItem::new(vec![0x88; 18]),
            WitnessStackItem::new(vec![0x99; 18]),
        ]);
        let bytes = witness.serialize().unwrap();
        let parsed = InputWitness::read_from(&mut bytes.as_slice()).unwrap();
        assert_eq!(parsed, witness);
        assert_eq!(bytes[0], 2);
    }
}
