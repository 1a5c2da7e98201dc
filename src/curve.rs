//! This module is an adapter to the ECC backend.
//! `k256` does the heavy point arithmetic; the encodings, the validity test
//! and the data embedding are ours, and are expressed over [`FieldElement`].

mod field;
mod point;
mod scalar;

pub use field::{FieldElement, FIELD_BYTES, FIELD_MODULUS, GENERATOR_X, GENERATOR_Y, SQRT_EXPONENT};
pub use point::{is_valid_public_key, Point, COMPRESSED_POINT_BYTES, EMBED_LEN, LONG_POINT_BYTES, MAX_EMBED_ATTEMPTS};
pub use scalar::{Scalar, GROUP_ORDER, SCALAR_BYTES};

