use digest::{Digest, ExtendableOutput, Update};
use sha3::{Keccak256, Shake256, Shake256Reader};

/// A digest object that takes byte slices.
pub(crate) trait Chain: Sized {
    /// Hash raw bytes.
    ///
    /// Note: only for fixed-size encodings, or where the hash must match an external convention.
    fn chain_raw_bytes(self, bytes: &[u8]) -> Self;

    /// Hash raw bytes in a collision-resistant way.
    fn chain_bytes(self, bytes: &(impl AsRef<[u8]> + ?Sized)) -> Self {
        // Hash the length too to prevent hash conflicts. (e.g. H(AB|CD) == H(ABC|D)).
        let len = (bytes.as_ref().len() as u64).to_be_bytes();
        self.chain_raw_bytes(&len).chain_raw_bytes(bytes.as_ref())
    }
}

/// Wraps Keccak-256, the content hash used for addresses and public keys.
#[derive(Clone, Default)]
pub(crate) struct Hash(Keccak256);

impl Chain for Hash {
    fn chain_raw_bytes(self, bytes: &[u8]) -> Self {
        Self(Digest::chain_update(self.0, bytes))
    }
}

impl Hash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finalize(self) -> [u8; 32] {
        self.0.finalize().into()
    }
}

/// Wraps an extendable output hash, and standardizes the use of DST.
#[derive(Clone, Default)]
pub(crate) struct XofHasher(Shake256);

impl Chain for XofHasher {
    fn chain_raw_bytes(self, bytes: &[u8]) -> Self {
        let mut digest = self.0;
        Update::update(&mut digest, bytes);
        Self(digest)
    }
}

impl XofHasher {
    pub fn new_with_dst(dst: &[u8]) -> Self {
        Self::default().chain_bytes(dst)
    }

    pub fn finalize_to_reader(self) -> Shake256Reader {
        self.0.finalize_xof()
    }
}

/// Keccak-256 of `bytes`, with no length prefix.
pub(crate) fn keccak256(bytes: &[u8]) -> [u8; 32] {
    Hash::new().chain_raw_bytes(bytes).finalize()
}
