use alloc::{boxed::Box, vec::Vec};
use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, ProjectivePoint};
use rand_core::CryptoRngCore;
use serde::{de, ser, Deserialize, Deserializer, Serialize, Serializer};
use serde_encoded_bytes::{Hex, SliceLike};

use super::field::{curve_rhs, FieldElement, FIELD_BYTES};
use super::scalar::Scalar;
use crate::address::Address;
use crate::error::{fixed_width, Error, Result};
use crate::tools::hashing::keccak256;

/// The size of the compressed encoding: the x-coordinate followed by a parity byte.
pub const COMPRESSED_POINT_BYTES: usize = FIELD_BYTES + 1;

/// The size of the long encoding: both coordinates, no prefix.
pub const LONG_POINT_BYTES: usize = 2 * FIELD_BYTES;

/// The number of payload bytes [`Point::embed`] can store in a point.
///
/// One byte of the x-coordinate holds the payload length, and at least one byte
/// is left to randomize until a curve point is found.
pub const EMBED_LEN: usize = (255 - 8 - 8) / 8;

/// How many random x-coordinates [`Point::embed`] tries before giving up.
pub const MAX_EMBED_ATTEMPTS: usize = 10_000;

static_assertions::const_assert!(EMBED_LEN + 2 <= FIELD_BYTES);

pub(crate) type BackendPoint = ProjectivePoint;

/// A point on secp256k1, or the group identity.
///
/// The identity reports the coordinates `(0, 0)`, which do not satisfy the curve equation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(BackendPoint);

/// Returns `true` if `(x, y)` lies on secp256k1, that is `y = ±sqrt(x^3 + 7)`.
///
/// The identity placeholder `(0, 0)` is never valid.
pub fn is_valid_public_key(x: &FieldElement, y: &FieldElement) -> bool {
    match curve_rhs(x).sqrt() {
        Some(root) => *y == root || *y == -root,
        None => false,
    }
}

impl Point {
    /// The base point of secp256k1.
    pub const GENERATOR: Self = Self(BackendPoint::GENERATOR);

    /// The group identity.
    pub const IDENTITY: Self = Self(BackendPoint::IDENTITY);

    /// Returns the affine coordinates of the point; `(0, 0)` for the identity.
    pub fn coordinates(&self) -> (FieldElement, FieldElement) {
        let encoded = self.0.to_affine().to_encoded_point(false);
        match (encoded.x(), encoded.y()) {
            (Some(x), Some(y)) => (field_from_backend(x), field_from_backend(y)),
            _ => (FieldElement::ZERO, FieldElement::ZERO),
        }
    }

    /// Creates a point from affine coordinates, checking that they satisfy the curve equation.
    pub fn from_coordinates(x: &FieldElement, y: &FieldElement) -> Result<Self> {
        if !is_valid_public_key(x, y) {
            return Err(Error::NotOnCurve);
        }
        Self::from_backend_coordinates(x, y).ok_or(Error::NotOnCurve)
    }

    fn from_backend_coordinates(x: &FieldElement, y: &FieldElement) -> Option<Self> {
        let encoded = EncodedPoint::from_affine_coordinates(&x.to_be_bytes().into(), &y.to_be_bytes().into(), false);
        let affine: Option<AffinePoint> = AffinePoint::from_encoded_point(&encoded).into();
        affine.map(|point| Self(point.into()))
    }

    /// Returns `true` if the point's own coordinates pass [`is_valid_public_key`].
    pub fn is_valid_public_key(&self) -> bool {
        let (x, y) = self.coordinates();
        is_valid_public_key(&x, &y)
    }

    /// Returns `true` if this is the group identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Multiplies `point` by `scalar`, or the base point if `point` is `None`.
    pub fn scalar_mul(scalar: &Scalar, point: Option<&Point>) -> Self {
        match point {
            Some(point) => point * scalar,
            None => Self::GENERATOR * scalar,
        }
    }

    /// Samples a random point, as an embedding of an empty payload.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        Self::embed(&[], rng)
    }

    /// Encodes up to [`EMBED_LEN`] bytes of `data` into the x-coordinate of a curve point.
    ///
    /// The x-coordinate is the payload length, then the payload, then bytes drawn from `rng`.
    /// The random tail is redrawn until `x^3 + 7` is a square, which succeeds for about
    /// half of all candidates. Use [`Point::data`] to recover the payload.
    ///
    /// # Panics
    ///
    /// If `data` is longer than [`EMBED_LEN`], or if no candidate succeeds
    /// within [`MAX_EMBED_ATTEMPTS`] (which indicates a broken random stream).
    #[allow(clippy::indexing_slicing)]
    pub fn embed(data: &[u8], rng: &mut impl CryptoRngCore) -> Self {
        assert!(
            data.len() <= EMBED_LEN,
            "Too much data to embed in a point: {} bytes, at most {EMBED_LEN}",
            data.len()
        );

        let mut x_bytes = [0u8; FIELD_BYTES];
        x_bytes[0] = data.len() as u8;
        x_bytes[1..=data.len()].copy_from_slice(data);
        let random_start = 1 + data.len();

        for attempt in 1..=MAX_EMBED_ATTEMPTS {
            rng.fill_bytes(&mut x_bytes[random_start..]);

            // The length byte keeps the candidate below 2^253, so no reduction happens here.
            let x = FieldElement::from_be_bytes(&x_bytes);
            let point = curve_rhs(&x)
                .sqrt()
                .and_then(|y| Self::from_backend_coordinates(&x, &y));
            if let Some(point) = point {
                tracing::trace!("Embedded {} bytes after {attempt} attempt(s)", data.len());
                return point;
            }
        }

        tracing::debug!("No curve point found after {MAX_EMBED_ATTEMPTS} attempts");
        panic!("Failed to find a point satisfying all constraints");
    }

    /// Recovers the payload stored by [`Point::embed`].
    pub fn data(&self) -> Result<Vec<u8>> {
        let [length, payload @ ..] = self.coordinates().0.to_be_bytes();
        let length = usize::from(length);
        if length > EMBED_LEN {
            return Err(Error::EmbeddedDataTooLong { length, max: EMBED_LEN });
        }
        Ok(payload.get(..length).map(<[u8]>::to_vec).unwrap_or_default())
    }

    /// Encodes the point as its x-coordinate followed by the parity of y (0 for even, 1 for odd).
    ///
    /// Fails for points whose y is not a square root of `x^3 + 7`, including the identity.
    pub fn to_compressed_bytes(&self) -> Result<[u8; COMPRESSED_POINT_BYTES]> {
        let (x, y) = self.coordinates();
        let root = curve_rhs(&x).sqrt().ok_or(Error::NotOnCurve)?;
        if y != root && y != -root {
            return Err(Error::NotOnCurve);
        }

        let mut bytes = [0u8; COMPRESSED_POINT_BYTES];
        let (x_part, sign) = bytes.split_at_mut(FIELD_BYTES);
        x_part.copy_from_slice(&x.to_be_bytes());
        sign.fill(u8::from(!y.is_even()));
        Ok(bytes)
    }

    /// Decodes the output of [`Point::to_compressed_bytes`].
    ///
    /// The x-coordinate is reduced modulo `p`; the square root of `x^3 + 7` is negated
    /// if its parity does not match the sign byte.
    pub fn from_compressed_bytes(bytes: &[u8]) -> Result<Self> {
        let [x_part @ .., sign] = fixed_width::<COMPRESSED_POINT_BYTES>(bytes)?;
        let sign = *sign;
        if sign > 1 {
            return Err(Error::InvalidSignByte(sign));
        }

        let x = FieldElement::from_be_bytes(x_part);
        let Some(root) = curve_rhs(&x).sqrt() else {
            tracing::trace!("Rejected compressed point: {x} is not an x-coordinate on the curve");
            return Err(Error::NotOnCurve);
        };
        let y = if root.is_even() == (sign == 0) { root } else { -root };
        Self::from_coordinates(&x, &y)
    }

    /// Encodes the point as both coordinates, x first, with no prefix byte.
    pub fn to_long_bytes(&self) -> [u8; LONG_POINT_BYTES] {
        let (x, y) = self.coordinates();
        let mut bytes = [0u8; LONG_POINT_BYTES];
        let (x_part, y_part) = bytes.split_at_mut(FIELD_BYTES);
        x_part.copy_from_slice(&x.to_be_bytes());
        y_part.copy_from_slice(&y.to_be_bytes());
        bytes
    }

    /// Decodes the output of [`Point::to_long_bytes`], checking the curve equation.
    pub fn from_long_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = fixed_width::<LONG_POINT_BYTES>(bytes)?;
        let (x_part, y_part) = bytes.split_at(FIELD_BYTES);
        let x = FieldElement::try_from(x_part)?;
        let y = FieldElement::try_from(y_part)?;
        Self::from_coordinates(&x, &y)
    }

    /// The Ethereum-style address of the point: the low 20 bytes of
    /// Keccak-256 over the long encoding.
    pub fn ethereum_address(&self) -> Address {
        Address::from_hash(&keccak256(&self.to_long_bytes()))
    }
}

fn field_from_backend(bytes: &k256::FieldBytes) -> FieldElement {
    let mut array = [0u8; FIELD_BYTES];
    array.copy_from_slice(bytes);
    FieldElement::from_be_bytes(&array)
}

impl Default for Point {
    fn default() -> Self {
        Point::IDENTITY
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.coordinates();
        write!(f, "Secp256k1{{X: {x}, Y: {y}}}")
    }
}

impl<'a> TryFrom<&'a [u8]> for Point {
    type Error = Error;
    fn try_from(val: &'a [u8]) -> Result<Self> {
        Self::from_compressed_bytes(val)
    }
}

impl Serialize for Point {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let bytes = self.to_compressed_bytes().map_err(ser::Error::custom)?;
        SliceLike::<Hex>::serialize(&bytes, serializer)
    }
}

impl<'de> Deserialize<'de> for Point {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> core::result::Result<Self, D::Error> {
        let bytes: Box<[u8]> = SliceLike::<Hex>::deserialize(deserializer)?;
        Self::try_from(&*bytes).map_err(de::Error::custom)
    }
}

impl Neg for Point {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Add<Point> for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point(self.0.add(&(other.0)))
    }
}

impl Add<&Point> for &Point {
    type Output = Point;

    fn add(self, other: &Point) -> Point {
        Point(self.0.add(&(other.0)))
    }
}

impl Sub<Point> for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point(self.0.sub(&(other.0)))
    }
}

impl Sub<&Point> for &Point {
    type Output = Point;

    fn sub(self, other: &Point) -> Point {
        Point(self.0.sub(&(other.0)))
    }
}

impl Mul<Scalar> for Point {
    type Output = Point;

    fn mul(self, other: Scalar) -> Point {
        Point(self.0.mul(&other.to_backend()))
    }
}

impl Mul<&Scalar> for Point {
    type Output = Point;

    fn mul(self, other: &Scalar) -> Point {
        Point(self.0.mul(&other.to_backend()))
    }
}

impl Mul<&Scalar> for &Point {
    type Output = Point;

    fn mul(self, other: &Scalar) -> Point {
        Point(self.0.mul(&other.to_backend()))
    }
}

impl core::iter::Sum for Point {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.reduce(Add::add).unwrap_or(Self::IDENTITY)
    }
}

impl<'a> core::iter::Sum<&'a Self> for Point {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.cloned().sum()
    }
}
