use alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
};
use core::fmt;
use core::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::address::Address;
use crate::curve::{Point, Scalar, COMPRESSED_POINT_BYTES};
use crate::error::{fixed_width, Error, Result};
use crate::tools::hashing::keccak256;

/// The size of a serialized public key.
pub const COMPRESSED_PUBLIC_KEY_BYTES: usize = COMPRESSED_POINT_BYTES;

/// A public key stored as the compressed encoding of a point
/// (see [`Point::to_compressed_bytes`]).
///
/// The bytes are only checked for length on construction;
/// whether they decode to a curve point is checked when the point is needed.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; COMPRESSED_PUBLIC_KEY_BYTES]);

impl Default for PublicKey {
    fn default() -> Self {
        Self([0u8; COMPRESSED_PUBLIC_KEY_BYTES])
    }
}

impl PublicKey {
    /// Creates a public key from exactly [`COMPRESSED_PUBLIC_KEY_BYTES`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        fixed_width::<COMPRESSED_PUBLIC_KEY_BYTES>(bytes).map(|bytes| Self(*bytes))
    }

    /// Parses the `0x`-prefixed hex form produced by [`Display`](fmt::Display).
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").ok_or(Error::MissingHexPrefix)?;
        let bytes = hex::decode(digits)?;
        Self::from_bytes(&bytes)
    }

    /// Compresses a point into a public key. Fails for the identity.
    pub fn from_point(point: &Point) -> Result<Self> {
        point.to_compressed_bytes().map(Self)
    }

    /// The public key corresponding to a private scalar.
    pub fn from_scalar(secret: &Scalar) -> Result<Self> {
        Self::from_point(&secret.mul_by_generator())
    }

    /// Decompresses the stored bytes.
    pub fn to_point(&self) -> Result<Point> {
        Point::from_compressed_bytes(&self.0)
    }

    /// Keccak-256 of the long encoding of the point.
    pub fn hash(&self) -> Result<[u8; 32]> {
        let point = self.to_point()?;
        Ok(keccak256(&point.to_long_bytes()))
    }

    /// The account address: the low 20 bytes of [`PublicKey::hash`].
    pub fn address(&self) -> Result<Address> {
        self.hash().map(|hash| Address::from_hash(&hash))
    }

    /// The long encoding of the point as plain (unprefixed) hex.
    pub fn uncompressed_hex(&self) -> Result<String> {
        let point = self.to_point()?;
        Ok(hex::encode(point.to_long_bytes()))
    }

    /// Returns `true` if all bytes are zero, as for [`PublicKey::default`].
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|byte| *byte == 0)
    }

    /// Returns the stored bytes.
    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_BYTES] {
        &self.0
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<'a> TryFrom<&'a [u8]> for PublicKey {
    type Error = Error;
    fn try_from(bytes: &'a [u8]) -> Result<Self> {
        Self::from_bytes(bytes)
    }
}

impl FromStr for PublicKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s).map_err(|err| Error::PublicKey {
            text: s.to_string(),
            source: Box::new(err),
        })
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({self})")
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_string())
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

struct PublicKeyVisitor;

impl de::Visitor<'_> for PublicKeyVisitor {
    type Value = PublicKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a 0x-prefixed hex string or {COMPRESSED_PUBLIC_KEY_BYTES} bytes of a compressed public key"
        )
    }

    fn visit_str<E: de::Error>(self, v: &str) -> core::result::Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> core::result::Result<Self::Value, E> {
        PublicKey::from_bytes(v).map_err(|err| E::custom(format!("while reading public key bytes: {err}")))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(PublicKeyVisitor)
        } else {
            deserializer.deserialize_bytes(PublicKeyVisitor)
        }
    }
}
