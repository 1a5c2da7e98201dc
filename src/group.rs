use core::fmt::Debug;
use core::ops::{Add, Mul, Neg, Sub};

use rand_core::CryptoRngCore;
use serde::{de::DeserializeOwned, Serialize};

use crate::curve::{Point, Scalar, COMPRESSED_POINT_BYTES, EMBED_LEN, SCALAR_BYTES};

/// A prime-order group with its scalar field, as consumed by higher-level protocols.
pub trait Group: 'static + Debug + Clone + Send + Sync {
    /// An integer modulo the group order.
    type Scalar: 'static
        + Debug
        + Copy
        + Eq
        + Default
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + Add<Output = Self::Scalar>
        + Sub<Output = Self::Scalar>
        + Mul<Output = Self::Scalar>
        + Neg<Output = Self::Scalar>;

    /// A group element.
    type Point: 'static
        + Debug
        + Copy
        + Eq
        + Default
        + Send
        + Sync
        + Serialize
        + DeserializeOwned
        + Add<Output = Self::Point>
        + Sub<Output = Self::Point>
        + Neg<Output = Self::Point>
        + Mul<Self::Scalar, Output = Self::Point>;

    /// The name of the group.
    const NAME: &'static str;
    /// The length of a scalar's fixed-width encoding.
    const SCALAR_LEN: usize;
    /// The length of a point's fixed-width encoding.
    const POINT_LEN: usize;
    /// How many payload bytes can be embedded in a point.
    const EMBED_LEN: usize;

    /// The additive identity of the scalars.
    fn scalar_zero() -> Self::Scalar;

    /// The multiplicative identity of the scalars.
    fn scalar_one() -> Self::Scalar;

    /// The identity element of the group.
    fn point_identity() -> Self::Point;

    /// The canonical generator.
    fn generator() -> Self::Point;

    /// Samples a uniformly random scalar.
    fn random_scalar(rng: &mut impl CryptoRngCore) -> Self::Scalar;

    /// Samples a random group element.
    fn random_point(rng: &mut impl CryptoRngCore) -> Self::Point;

    /// Embeds `data` into a group element, see [`Point::embed`].
    fn embed(data: &[u8], rng: &mut impl CryptoRngCore) -> Self::Point;
}

/// The secp256k1 curve group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Secp256k1;

impl Group for Secp256k1 {
    type Scalar = Scalar;
    type Point = Point;

    const NAME: &'static str = "Secp256k1";
    const SCALAR_LEN: usize = SCALAR_BYTES;
    const POINT_LEN: usize = COMPRESSED_POINT_BYTES;
    const EMBED_LEN: usize = EMBED_LEN;

    fn scalar_zero() -> Scalar {
        Scalar::ZERO
    }

    fn scalar_one() -> Scalar {
        Scalar::ONE
    }

    fn point_identity() -> Point {
        Point::IDENTITY
    }

    fn generator() -> Point {
        Point::GENERATOR
    }

    fn random_scalar(rng: &mut impl CryptoRngCore) -> Scalar {
        Scalar::random(rng)
    }

    fn random_point(rng: &mut impl CryptoRngCore) -> Point {
        Point::random(rng)
    }

    fn embed(data: &[u8], rng: &mut impl CryptoRngCore) -> Point {
        Point::embed(data, rng)
    }
}

impl core::fmt::Display for Secp256k1 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(Self::NAME)
    }
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;

    use super::{Group, Secp256k1};

    fn exercise<G: Group>() {
        let a = G::random_scalar(&mut OsRng);
        let b = G::random_scalar(&mut OsRng);
        let g = G::generator();

        assert_eq!(g * a + g * b, g * (a + b));
        assert_eq!(g * G::scalar_zero(), G::point_identity());
        assert_eq!(g * G::scalar_one(), g);
        assert_eq!(g - g, G::point_identity());
        assert_eq!(-(-a), a);
        let _ = G::random_point(&mut OsRng);
    }

    #[test]
    fn secp256k1_satisfies_group_laws() {
        exercise::<Secp256k1>();
    }

    #[test]
    fn constants() {
        assert_eq!(Secp256k1::NAME, "Secp256k1");
        assert_eq!(Secp256k1::SCALAR_LEN, 32);
        assert_eq!(Secp256k1::POINT_LEN, 33);
        assert_eq!(Secp256k1::EMBED_LEN, 29);
        assert_eq!(Secp256k1.to_string(), "Secp256k1");
    }
}
