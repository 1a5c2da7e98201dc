use alloc::{boxed::Box, string::String};

/// Recoverable failures of decoding and validation.
///
/// Violated preconditions (inverting the zero scalar, oversized embeddings and the like)
/// are not represented here: they panic.
#[derive(displaydoc::Display, Debug, Clone, PartialEq)]
pub enum Error {
    /// wrong length for a fixed-width encoding: expected {expected} bytes, got {actual}
    InvalidLength {
        /// The length the encoding requires.
        expected: usize,
        /// The length that was supplied.
        actual: usize,
    },
    /// bad sign byte {0:#04x} of a compressed point, expected 0 or 1
    InvalidSignByte(u8),
    /// the coordinates do not correspond to a point on secp256k1
    NotOnCurve,
    /// point specifies {length} bytes of embedded data, at most {max} can be embedded
    EmbeddedDataTooLong {
        /// The length prefix stored in the point.
        length: usize,
        /// The embedding capacity of a point.
        max: usize,
    },
    /// hex string is missing the `0x` prefix
    MissingHexPrefix,
    /// invalid hex encoding: {0}
    Hex(hex::FromHexError),
    /// while parsing {text} as public key: {source}
    PublicKey {
        /// The text that failed to parse.
        text: String,
        /// The underlying failure.
        source: Box<Error>,
    },
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::PublicKey { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<hex::FromHexError> for Error {
    fn from(source: hex::FromHexError) -> Self {
        Self::Hex(source)
    }
}

/// A result with the crate's [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// Checks that `bytes` has exactly `N` elements.
pub(crate) fn fixed_width<const N: usize>(bytes: &[u8]) -> Result<&[u8; N]> {
    bytes.try_into().map_err(|_| Error::InvalidLength {
        expected: N,
        actual: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use alloc::{boxed::Box, string::ToString};

    use super::{fixed_width, Error};

    #[test]
    fn messages() {
        let err = Error::InvalidLength {
            expected: 33,
            actual: 32,
        };
        assert_eq!(
            err.to_string(),
            "wrong length for a fixed-width encoding: expected 33 bytes, got 32"
        );

        let wrapped = Error::PublicKey {
            text: "0x00".into(),
            source: Box::new(err),
        };
        assert!(wrapped.to_string().starts_with("while parsing 0x00 as public key: wrong length"));

        assert_eq!(
            Error::InvalidSignByte(2).to_string(),
            "bad sign byte 0x02 of a compressed point, expected 0 or 1"
        );
    }

    #[test]
    fn fixed_width_checks_length() {
        assert!(fixed_width::<4>(&[1, 2, 3, 4]).is_ok());
        assert_eq!(
            fixed_width::<4>(&[1, 2, 3]),
            Err(Error::InvalidLength {
                expected: 4,
                actual: 3
            })
        );
    }
}
