use alloc::{boxed::Box, string::String};
use core::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};

use crate::error::{fixed_width, Error};
use crate::tools::hashing::keccak256;

/// The size of an account address.
pub const ADDRESS_BYTES: usize = 20;

/// An Ethereum-style account address: the low 20 bytes of a Keccak-256 hash.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    /// Takes the low [`ADDRESS_BYTES`] bytes of a 32-byte hash.
    pub(crate) fn from_hash(hash: &[u8; 32]) -> Self {
        let (_, low) = hash.split_at(hash.len() - ADDRESS_BYTES);
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(low);
        Self(bytes)
    }

    /// Creates an address from exactly [`ADDRESS_BYTES`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        fixed_width::<ADDRESS_BYTES>(bytes).map(|bytes| Self(*bytes))
    }

    /// Returns the raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    /// The `0x`-prefixed mixed-case checksum encoding (EIP-55).
    pub fn to_checksum_string(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = keccak256(lower.as_bytes());

        let mut result = String::with_capacity(2 + 2 * ADDRESS_BYTES);
        result.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash.get(i / 2).copied().unwrap_or_default();
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
        }
        result
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = Error;
    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Box<[u8]> = SliceLike::<Hex>::deserialize(deserializer)?;
        Self::try_from(&*bytes).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_assert::{Deserializer, Serializer, Token};

    use super::Address;
    use crate::error::Error;

    #[test]
    fn checksum_encoding() {
        // Test vectors from EIP-55.
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let bytes = hex::decode(&expected[2..]).unwrap();
            let address = Address::from_bytes(&bytes).unwrap();
            assert_eq!(address.to_string(), expected);
        }
    }

    #[test]
    fn from_hash_takes_low_bytes() {
        let mut hash = [0u8; 32];
        for (i, byte) in hash.iter_mut().enumerate() {
            *byte = i as u8;
        }
        let address = Address::from_hash(&hash);
        assert_eq!(address.as_bytes()[0], 12);
        assert_eq!(address.as_bytes()[19], 31);
    }

    #[test]
    fn serialize_as_hex_or_bytes() {
        let bytes = hex::decode("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        let address = Address::from_bytes(&bytes).unwrap();

        let serializer = Serializer::builder().build();
        let tokens = address.serialize(&serializer).unwrap();
        match tokens.clone().into_iter().next() {
            Some(Token::Str(text)) => {
                assert!(text.to_lowercase().ends_with("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"))
            }
            other => panic!("expected a string, got {other:?}"),
        }
        let mut deserializer = Deserializer::builder(tokens).build();
        assert_eq!(Address::deserialize(&mut deserializer).unwrap(), address);

        let serializer = Serializer::builder().is_human_readable(false).build();
        let tokens = address.serialize(&serializer).unwrap();
        assert_eq!(tokens, [Token::Bytes(bytes.clone())]);
        let mut deserializer = Deserializer::builder(tokens).is_human_readable(false).build();
        assert_eq!(Address::deserialize(&mut deserializer).unwrap(), address);
    }

    #[test]
    fn length_is_checked() {
        assert_eq!(
            Address::from_bytes(&[0u8; 19]),
            Err(Error::InvalidLength {
                expected: 20,
                actual: 19
            })
        );
    }
}
