//! The cryptographic suite: the secp256k1 group bundled with a hash function,
//! an extendable-output function and a source of randomness.

use digest::XofReader;
use rand_core::{CryptoRng, CryptoRngCore, RngCore};
use sha3::{Keccak256, Shake256Reader};

#[cfg(feature = "getrandom")]
use rand_core::OsRng;

use crate::curve::{Point, Scalar};
use crate::group::{Group, Secp256k1};
use crate::tools::hashing::{Chain, XofHasher};

const XOF_DST: &[u8] = b"kyber-secp256k1 XOF";

/// A suite drawing randomness from the operating system.
#[cfg(feature = "getrandom")]
pub type DefaultSuite = Suite<OsRng>;

/// The secp256k1 group together with Keccak-256, a keyed SHAKE256 XOF,
/// and the random stream `R`.
///
/// The suite holds no state besides the random stream.
#[derive(Debug, Clone)]
pub struct Suite<R> {
    rng: R,
}

#[cfg(feature = "getrandom")]
impl Suite<OsRng> {
    /// Creates a suite using the process-wide OS random stream.
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

#[cfg(feature = "getrandom")]
impl Default for Suite<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CryptoRngCore> Suite<R> {
    /// Creates a suite using a caller-supplied random stream.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// The random stream used by [`Suite::random_scalar`] and [`Suite::random_point`].
    pub fn random_stream(&mut self) -> &mut R {
        &mut self.rng
    }

    /// A fresh instance of the suite's hash function.
    pub fn hash(&self) -> Keccak256 {
        Keccak256::default()
    }

    /// An extendable-output function keyed with `key`.
    pub fn xof(&self, key: &[u8]) -> Xof {
        Xof::new(key)
    }

    /// Samples a scalar from the suite's random stream.
    pub fn random_scalar(&mut self) -> Scalar {
        Scalar::random(&mut self.rng)
    }

    /// Samples a point from the suite's random stream.
    pub fn random_point(&mut self) -> Point {
        Point::random(&mut self.rng)
    }

    /// Embeds `data` into a point, using the suite's random stream for padding.
    pub fn embed(&mut self, data: &[u8]) -> Point {
        Point::embed(data, &mut self.rng)
    }
}

impl<R> Group for Suite<R>
where
    R: 'static + core::fmt::Debug + Clone + Send + Sync,
{
    type Scalar = <Secp256k1 as Group>::Scalar;
    type Point = <Secp256k1 as Group>::Point;

    const NAME: &'static str = Secp256k1::NAME;
    const SCALAR_LEN: usize = Secp256k1::SCALAR_LEN;
    const POINT_LEN: usize = Secp256k1::POINT_LEN;
    const EMBED_LEN: usize = Secp256k1::EMBED_LEN;

    fn scalar_zero() -> Scalar {
        Secp256k1::scalar_zero()
    }

    fn scalar_one() -> Scalar {
        Secp256k1::scalar_one()
    }

    fn point_identity() -> Point {
        Secp256k1::point_identity()
    }

    fn generator() -> Point {
        Secp256k1::generator()
    }

    fn random_scalar(rng: &mut impl CryptoRngCore) -> Scalar {
        Secp256k1::random_scalar(rng)
    }

    fn random_point(rng: &mut impl CryptoRngCore) -> Point {
        Secp256k1::random_point(rng)
    }

    fn embed(data: &[u8], rng: &mut impl CryptoRngCore) -> Point {
        Secp256k1::embed(data, rng)
    }
}

/// A keyed extendable-output function (SHAKE256 with a domain-separated key).
#[derive(Clone)]
pub struct Xof(XofHasher);

impl Xof {
    /// Creates an XOF keyed with `key`. Different keys give independent output streams.
    pub fn new(key: &[u8]) -> Self {
        Self(XofHasher::new_with_dst(XOF_DST).chain_bytes(key))
    }

    /// Absorbs more input.
    pub fn update(self, data: &[u8]) -> Self {
        Self(self.0.chain_raw_bytes(data))
    }

    /// Finalizes the input and returns the output stream.
    pub fn into_stream(self) -> XofStream {
        XofStream(self.0.finalize_to_reader())
    }
}

impl core::fmt::Debug for Xof {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Xof(...)")
    }
}

/// The output of an [`Xof`], usable as a deterministic random stream.
pub struct XofStream(Shake256Reader);

impl XofStream {
    /// Fills `buffer` with the next output bytes.
    pub fn read(&mut self, buffer: &mut [u8]) {
        self.0.read(buffer);
    }
}

impl core::fmt::Debug for XofStream {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("XofStream(...)")
    }
}

impl RngCore for XofStream {
    fn next_u32(&mut self) -> u32 {
        rand_core::impls::next_u32_via_fill(self)
    }
    fn next_u64(&mut self) -> u64 {
        rand_core::impls::next_u64_via_fill(self)
    }
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.read(dest)
    }
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.read(dest);
        Ok(())
    }
}

impl CryptoRng for XofStream {}

#[cfg(test)]
mod tests {
    use digest::Digest;
    use rand_chacha::ChaCha20Rng;
    use rand_core::SeedableRng;

    use super::{Suite, Xof};
    use crate::group::Group;

    #[test]
    fn xof_is_deterministic_and_keyed() {
        let mut out1 = [0u8; 64];
        let mut out2 = [0u8; 64];
        let mut out3 = [0u8; 64];

        Xof::new(b"key").update(b"data").into_stream().read(&mut out1);
        Xof::new(b"key").update(b"data").into_stream().read(&mut out2);
        Xof::new(b"other key").update(b"data").into_stream().read(&mut out3);

        assert_eq!(out1, out2);
        assert_ne!(out1, out3);
    }

    #[test]
    fn xof_stream_drives_embedding() {
        let data = b"hello";
        let p1 = Suite::with_rng(Xof::new(b"seed").into_stream()).embed(data);
        let p2 = Suite::with_rng(Xof::new(b"seed").into_stream()).embed(data);
        assert_eq!(p1, p2);
        assert_eq!(p1.data().unwrap(), data);
    }

    #[test]
    fn custom_random_stream() {
        let mut suite1 = Suite::with_rng(ChaCha20Rng::seed_from_u64(7));
        let mut suite2 = Suite::with_rng(ChaCha20Rng::seed_from_u64(7));
        assert_eq!(suite1.random_scalar(), suite2.random_scalar());
        assert_eq!(suite1.random_point(), suite2.random_point());
        assert_eq!(
            <Suite<ChaCha20Rng> as Group>::NAME,
            "Secp256k1"
        );
    }

    #[test]
    fn hash_is_keccak256() {
        let suite = Suite::with_rng(ChaCha20Rng::seed_from_u64(0));
        let digest = suite.hash().chain_update(b"").finalize();
        assert_eq!(
            hex::encode(digest),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[cfg(feature = "getrandom")]
    #[test]
    fn default_suite_draws_distinct_scalars() {
        let mut suite = Suite::new();
        assert_ne!(suite.random_scalar(), suite.random_scalar());
    }
}
