#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]
#![cfg_attr(not(test), warn(clippy::unwrap_used, clippy::indexing_slicing))]

/*!
## Features

`getrandom` (default): enables [`DefaultSuite`], which draws its random stream from the
operating system via [`rand_core::OsRng`].
*/

extern crate alloc;

mod address;
mod curve;
mod error;
mod group;
mod public_key;
mod suite;
mod tools;

// Some re-exports to avoid the need for version-matching
pub use k256;
pub use rand_core;

pub use address::{Address, ADDRESS_BYTES};
pub use curve::{
    is_valid_public_key, FieldElement, Point, Scalar, COMPRESSED_POINT_BYTES, EMBED_LEN, FIELD_BYTES,
    FIELD_MODULUS, GENERATOR_X, GENERATOR_Y, GROUP_ORDER, LONG_POINT_BYTES, MAX_EMBED_ATTEMPTS, SCALAR_BYTES,
    SQRT_EXPONENT,
};
pub use error::{Error, Result};
pub use group::{Group, Secp256k1};
pub use public_key::{PublicKey, COMPRESSED_PUBLIC_KEY_BYTES};
pub use suite::{Suite, Xof, XofStream};

#[cfg(feature = "getrandom")]
pub use suite::DefaultSuite;
