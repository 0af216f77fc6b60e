//! Macros that generate the boilerplate shared by every opaque, length-prefixed byte-vector
//! wrapper (`Script`, `ScriptSig`, `ScriptPubkey`, `WitnessStackItem`). Grounded on
//! `coins-core::macros::wrap_prefixed_byte_vector!`.

/// Define a newtype over `Vec<u8>` whose wire form is `VarInt(len) ‖ bytes`, with `ByteFormat`,
/// `AsRef<[u8]>`, `From` conversions, and hex-string serde support.
macro_rules! wrap_prefixed_byte_vector {
    ($(#[$outer:meta])* $name:ident) => {
        $(#[$outer])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name(Vec<u8>);

        impl $name {
            /// Wrap a byte vector.
            pub fn new(v: Vec<u8>) -> Self {
                Self(v)
            }

            /// The number of bytes carried, not counting the VarInt length prefix.
            pub fn len(&self) -> usize {
                self.0.len()
            }

            /// `true` if there are no bytes.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }

            /// Consume `self`, returning the inner byte vector.
            pub fn into_vec(self) -> Vec<u8> {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<Vec<u8>> for $name {
            fn from(v: Vec<u8>) -> Self {
                Self(v)
            }
        }

        impl From<&[u8]> for $name {
            fn from(v: &[u8]) -> Self {
                Self(v.to_vec())
            }
        }

        impl crate::ser::ByteFormat for $name {
            fn serialized_length(&self) -> usize {
                crate::ser::VarInt::new(self.0.len() as u64).byte_len() + self.0.len()
            }

            fn read_from<R: std::io::Read>(reader: &mut R) -> crate::error::TxResult<Self> {
                Ok(Self(crate::ser::read_prefix_vec(reader)?))
            }

            fn write_to<W: std::io::Write>(&self, writer: &mut W) -> crate::error::TxResult<usize> {
                crate::ser::write_prefix_vec(writer, &self.0)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&hex::encode(&self.0))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                let bytes = hex::decode(&s).map_err(serde::de::Error::custom)?;
                Ok(Self(bytes))
            }
        }
    };
}

pub(crate) use wrap_prefixed_byte_vector;
