use alloc::boxed::Box;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use crypto_bigint::U256;
use elliptic_curve::{
    bigint::U256 as BackendUint, // Note that this type is different from `crypto_bigint::U256`
    ops::Reduce,
    subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption},
    PrimeField,
};
use k256::FieldBytes;
use rand_core::CryptoRngCore;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};
use zeroize::DefaultIsZeroes;

use super::point::Point;
use crate::error::{fixed_width, Error};

/// The size of a scalar's fixed-width encoding.
pub const SCALAR_BYTES: usize = 32;

/// The order `n` of the secp256k1 group.
pub const GROUP_ORDER: U256 = U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141");

pub(crate) type BackendScalar = k256::Scalar;

/// An integer modulo the group order, used as a private key or a multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, PartialOrd, Ord)]
pub struct Scalar(BackendScalar);

impl Scalar {
    /// The additive identity.
    pub const ZERO: Self = Self(BackendScalar::ZERO);
    /// The multiplicative identity.
    pub const ONE: Self = Self(BackendScalar::ONE);

    /// Samples a uniformly distributed scalar.
    ///
    /// Draws 32 bytes at a time from `rng` and rejects values not below the group order.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = FieldBytes::default();
        loop {
            rng.fill_bytes(&mut bytes);
            let candidate: Option<BackendScalar> = BackendScalar::from_repr(bytes).into();
            if let Some(scalar) = candidate {
                return Self(scalar);
            }
        }
    }

    /// Creates a scalar from a signed integer, reducing negative values modulo the group order.
    pub fn from_i64(value: i64) -> Self {
        let abs = Self::from(value.unsigned_abs());
        if value < 0 {
            -abs
        } else {
            abs
        }
    }

    /// Returns `self * G`, where `G` is the base point.
    pub fn mul_by_generator(&self) -> Point {
        Point::GENERATOR * self
    }

    /// Invert the [`Scalar`]. Returns [`None`] if the scalar is zero.
    pub fn invert(&self) -> CtOption<Self> {
        self.0.invert().map(Self)
    }

    /// Returns the multiplicative inverse of `self`.
    ///
    /// # Panics
    ///
    /// The caller must never pass the zero scalar. Use [`Scalar::invert`] when zero is possible.
    pub fn inv(&self) -> Self {
        match Option::<Self>::from(self.invert()) {
            Some(inverse) => inverse,
            None => panic!("Attempted to invert the zero scalar"),
        }
    }

    /// Rejects any request to treat this type as variable-time.
    ///
    /// Passing `false` is a no-op. Passing `true` panics: secp256k1 scalars are only
    /// to be used in constant-time mode. Note that this documents an intention rather
    /// than changing the arithmetic, whose timing is whatever `k256` provides.
    ///
    /// # Panics
    ///
    /// If `allowed` is `true`.
    pub fn allow_var_time(&self, allowed: bool) {
        if allowed {
            panic!("secp256k1 scalars cannot be switched to variable-time mode");
        }
    }

    /// Decodes a big-endian 32-byte integer, reducing it modulo the group order.
    pub fn from_be_bytes_reduced(bytes: &[u8; SCALAR_BYTES]) -> Self {
        let arr = FieldBytes::from(*bytes);
        Self(<BackendScalar as Reduce<BackendUint>>::reduce_bytes(&arr))
    }

    /// The canonical value as a big-endian, left-zero-padded 32-byte array.
    pub fn to_be_bytes(&self) -> [u8; SCALAR_BYTES] {
        let mut bytes = [0u8; SCALAR_BYTES];
        bytes.copy_from_slice(&self.0.to_bytes());
        bytes
    }

    /// Returns the canonical integer in `[0, n)`.
    pub fn to_uint(&self) -> U256 {
        U256::from_be_slice(&self.to_be_bytes())
    }

    pub(crate) fn to_backend(self) -> BackendScalar {
        self.0
    }
}

impl<'a> TryFrom<&'a [u8]> for Scalar {
    type Error = Error;

    /// Decodes a 32-byte big-endian integer; values not below the group order are reduced.
    fn try_from(val: &'a [u8]) -> Result<Self, Self::Error> {
        fixed_width::<SCALAR_BYTES>(val).map(Self::from_be_bytes_reduced)
    }
}

impl From<u64> for Scalar {
    fn from(val: u64) -> Self {
        Self(BackendScalar::from(val))
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self(BackendScalar::conditional_select(&a.0, &b.0, choice))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.to_be_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SliceLike::<Hex>::serialize(&self.to_be_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Box<[u8]> = SliceLike::<Hex>::deserialize(deserializer)?;
        Self::try_from(&*bytes).map_err(de::Error::custom)
    }
}

impl DefaultIsZeroes for Scalar {}

impl Neg for Scalar {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Self::Output {
        -*self
    }
}

impl Add<Scalar> for Scalar {
    type Output = Scalar;

    fn add(self, other: Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Add<&Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, other: &Scalar) -> Scalar {
        Scalar(self.0.add(&other.0))
    }
}

impl Sub<Scalar> for Scalar {
    type Output = Scalar;

    fn sub(self, other: Scalar) -> Scalar {
        Scalar(self.0.sub(&(other.0)))
    }
}

impl Sub<&Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, other: &Scalar) -> Scalar {
        Scalar(self.0.sub(&(other.0)))
    }
}

impl Mul<Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: Scalar) -> Scalar {
        Scalar(self.0.mul(&(other.0)))
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(self.0.mul(&(other.0)))
    }
}

impl Mul<&Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, other: &Scalar) -> Scalar {
        Scalar(self.0.mul(&(other.0)))
    }
}

/// `a / b = a * b^{-1}`.
///
/// Panics if the divisor is zero.
impl Div<Scalar> for Scalar {
    type Output = Scalar;

    fn div(self, other: Scalar) -> Scalar {
        self * other.inv()
    }
}

impl Div<&Scalar> for &Scalar {
    type Output = Scalar;

    fn div(self, other: &Scalar) -> Scalar {
        self * &other.inv()
    }
}

impl core::iter::Sum for Scalar {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(Add::add).unwrap_or(Self::ZERO)
    }
}

impl<'a> core::iter::Sum<&'a Self> for Scalar {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.cloned().sum()
    }
}

impl core::iter::Product for Scalar {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(Mul::mul).unwrap_or(Self::ONE)
    }
}

#[cfg(test)]
mod tests {
    use crypto_bigint::{Encoding, U256};
    use rand_core::OsRng;
    use serde::{Deserialize, Serialize};
    use serde_assert::{Deserializer, Serializer, Token};

    use super::{Scalar, GROUP_ORDER};
    use crate::error::Error;

    #[test]
    fn bytes_round_trip() {
        for _ in 0..32 {
            let s = Scalar::random(&mut OsRng);
            assert_eq!(Scalar::try_from(&s.to_be_bytes()[..]).unwrap(), s);
        }
    }

    #[test]
    fn decoding_reduces_modulo_order() {
        let order_bytes = GROUP_ORDER.to_be_bytes();
        assert_eq!(Scalar::from_be_bytes_reduced(&order_bytes), Scalar::ZERO);

        let order_plus_two = GROUP_ORDER.wrapping_add(&U256::from_u8(2)).to_be_bytes();
        assert_eq!(Scalar::from_be_bytes_reduced(&order_plus_two), Scalar::from(2u64));
    }

    #[test]
    fn decoding_checks_length() {
        assert_eq!(
            Scalar::try_from(&[1u8; 33][..]),
            Err(Error::InvalidLength {
                expected: 32,
                actual: 33
            })
        );
    }

    #[test]
    fn division_inverts_multiplication() {
        for _ in 0..16 {
            let a = Scalar::random(&mut OsRng);
            let b = Scalar::random(&mut OsRng);
            assert_eq!((a / b) * b, a);
            assert_eq!(&(&a / &b) * &b, a);
        }
        let b = Scalar::random(&mut OsRng);
        assert_eq!(b * b.inv(), Scalar::ONE);
        assert!(bool::from(Scalar::ZERO.invert().is_none()));
    }

    #[test]
    #[should_panic(expected = "Attempted to invert the zero scalar")]
    fn inverting_zero_panics() {
        let _ = Scalar::ZERO.inv();
    }

    #[test]
    #[should_panic(expected = "Attempted to invert the zero scalar")]
    fn dividing_by_zero_panics() {
        let _ = Scalar::ONE / Scalar::ZERO;
    }

    #[test]
    fn signed_construction() {
        assert_eq!(Scalar::from_i64(-1), -Scalar::ONE);
        assert_eq!(Scalar::from_i64(-7) + Scalar::from(7u64), Scalar::ZERO);
        assert_eq!(Scalar::from_i64(42), Scalar::from(42u64));
        assert_eq!(
            Scalar::from_i64(-1).to_uint(),
            GROUP_ORDER.wrapping_sub(&U256::ONE)
        );
    }

    #[test]
    fn constant_time_only() {
        Scalar::ONE.allow_var_time(false);
    }

    #[test]
    #[should_panic(expected = "cannot be switched to variable-time mode")]
    fn variable_time_is_rejected() {
        Scalar::ONE.allow_var_time(true);
    }

    #[test]
    fn sums_and_products() {
        let scalars = [2u64, 3, 5].map(Scalar::from);
        assert_eq!(scalars.iter().sum::<Scalar>(), Scalar::from(10u64));
        assert_eq!(scalars.into_iter().product::<Scalar>(), Scalar::from(30u64));
        assert_eq!(core::iter::empty::<Scalar>().sum::<Scalar>(), Scalar::ZERO);
    }

    #[test]
    fn serialize_as_hex_or_bytes() {
        let scalar = Scalar::random(&mut OsRng);

        let serializer = Serializer::builder().build();
        let tokens = scalar.serialize(&serializer).unwrap();
        match tokens.clone().into_iter().next() {
            Some(Token::Str(text)) => {
                assert!(text.to_lowercase().ends_with(&hex::encode(scalar.to_be_bytes())))
            }
            other => panic!("expected a string, got {other:?}"),
        }
        let mut deserializer = Deserializer::builder(tokens).build();
        assert_eq!(Scalar::deserialize(&mut deserializer).unwrap(), scalar);

        let serializer = Serializer::builder().is_human_readable(false).build();
        let tokens = scalar.serialize(&serializer).unwrap();
        assert_eq!(tokens, [Token::Bytes(scalar.to_be_bytes().to_vec())]);
        let mut deserializer = Deserializer::builder(tokens).is_human_readable(false).build();
        assert_eq!(Scalar::deserialize(&mut deserializer).unwrap(), scalar);
    }

    #[test]
    fn deserializing_wrong_length_fails() {
        let mut deserializer = Deserializer::builder([Token::Bytes([1u8; 31].to_vec())])
            .is_human_readable(false)
            .build();
        assert!(Scalar::deserialize(&mut deserializer).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(
            Scalar::from(16u64).to_string(),
            "0x0000000000000000000000000000000000000000000000000000000000000010"
        );
    }
}
