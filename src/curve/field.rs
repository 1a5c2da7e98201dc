use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use crypto_bigint::{
    impl_modulus,
    modular::ConstMontyForm,
    subtle::{Choice, ConstantTimeEq},
    Encoding, U256,
};
use rand_core::CryptoRngCore;

use crate::error::{fixed_width, Error};

/// The size of a field element's fixed-width encoding.
pub const FIELD_BYTES: usize = 32;

/// The prime `p = 2^256 - 2^32 - 977` of the secp256k1 coordinate field.
pub const FIELD_MODULUS: U256 = U256::from_be_hex("FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F");

/// `(p + 1) / 4`. Since `p = 3 mod 4`, `a^((p + 1) / 4)` is a square root of `a` whenever one exists.
pub const SQRT_EXPONENT: U256 = U256::from_be_hex("3FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFBFFFFF0C");

/// The x-coordinate of the secp256k1 base point.
pub const GENERATOR_X: U256 = U256::from_be_hex("79BE667EF9DCBBAC55A06295CE870B07029BFCDB2DCE28D959F2815B16F81798");

/// The y-coordinate of the secp256k1 base point.
pub const GENERATOR_Y: U256 = U256::from_be_hex("483ADA7726A3C4655DA4FBFC0E1108A8FD17B448A68554199C47D08FFB10D4B8");

impl_modulus!(
    FieldModulus,
    U256,
    "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEFFFFFC2F"
);

type Residue = ConstMontyForm<FieldModulus, { U256::LIMBS }>;

/// An element of the secp256k1 coordinate field, always kept reduced modulo [`FIELD_MODULUS`].
///
/// The default value is zero. Code that needs to represent a missing coordinate
/// should use `Option<FieldElement>` rather than a sentinel.
#[derive(Clone, Copy)]
pub struct FieldElement(Residue);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: Self = Self(Residue::ZERO);
    /// The multiplicative identity.
    pub const ONE: Self = Self(Residue::ONE);

    const SEVEN: Self = Self(Residue::new(&U256::from_u8(7)));

    /// Reduces `value` modulo `p`.
    pub const fn from_uint(value: &U256) -> Self {
        Self(Residue::new(value))
    }

    /// Returns the canonical integer in `[0, p)`.
    pub const fn to_uint(&self) -> U256 {
        self.0.retrieve()
    }

    /// Creates a field element from an unsigned integer.
    pub const fn from_u64(value: u64) -> Self {
        Self::from_uint(&U256::from_u64(value))
    }

    /// Creates a field element from a signed integer; negative values map to `p - |value|`.
    pub fn from_i64(value: i64) -> Self {
        let abs = Self::from_u64(value.unsigned_abs());
        if value < 0 {
            -abs
        } else {
            abs
        }
    }

    /// Decodes a big-endian 32-byte integer, reducing it modulo `p`.
    pub fn from_be_bytes(bytes: &[u8; FIELD_BYTES]) -> Self {
        Self::from_uint(&U256::from_be_bytes(*bytes))
    }

    /// The canonical value as a big-endian, left-zero-padded 32-byte array.
    pub fn to_be_bytes(&self) -> [u8; FIELD_BYTES] {
        self.to_uint().to_be_bytes()
    }

    /// Samples a uniformly distributed field element.
    ///
    /// Draws 32 bytes at a time from `rng` and rejects values not below `p`.
    pub fn random(rng: &mut impl CryptoRngCore) -> Self {
        let mut bytes = [0u8; FIELD_BYTES];
        loop {
            rng.fill_bytes(&mut bytes);
            let candidate = U256::from_be_bytes(bytes);
            if candidate < FIELD_MODULUS {
                return Self::from_uint(&candidate);
            }
        }
    }

    /// Returns `true` if the canonical integer is even.
    pub fn is_even(&self) -> bool {
        self.to_be_bytes().last().map_or(true, |byte| byte & 1 == 0)
    }

    /// Returns `true` if this is the zero element.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Returns `self * self`.
    pub fn square(&self) -> Self {
        Self(self.0.square())
    }

    /// Raises `self` to the power `exponent`.
    pub fn pow(&self, exponent: &U256) -> Self {
        Self(self.0.pow(exponent))
    }

    /// Returns a square root of `self`, or `None` if `self` is not a quadratic residue.
    ///
    /// Either root may be returned; callers select the one they need by parity.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow(&SQRT_EXPONENT);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

/// The right-hand side of the curve equation, `x^3 + 7`.
pub(crate) fn curve_rhs(x: &FieldElement) -> FieldElement {
    x.square() * *x + FieldElement::SEVEN
}

impl Default for FieldElement {
    fn default() -> Self {
        Self::ZERO
    }
}

impl ConstantTimeEq for FieldElement {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for FieldElement {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement {}

impl<'a> TryFrom<&'a [u8]> for FieldElement {
    type Error = Error;
    fn try_from(bytes: &'a [u8]) -> Result<Self, Self::Error> {
        fixed_width::<FIELD_BYTES>(bytes).map(Self::from_be_bytes)
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in self.to_be_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({self})")
    }
}

impl Neg for FieldElement {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;
    fn neg(self) -> Self::Output {
        -*self
    }
}

impl Add<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn add(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0 + other.0)
    }
}

impl Add<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn add(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0 + other.0)
    }
}

impl Sub<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn sub(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0 - other.0)
    }
}

impl Sub<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn sub(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0 - other.0)
    }
}

impl Mul<FieldElement> for FieldElement {
    type Output = FieldElement;

    fn mul(self, other: FieldElement) -> FieldElement {
        FieldElement(self.0 * other.0)
    }
}

impl Mul<&FieldElement> for &FieldElement {
    type Output = FieldElement;

    fn mul(self, other: &FieldElement) -> FieldElement {
        FieldElement(self.0 * other.0)
    }
}
