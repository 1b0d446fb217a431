//! Error types for turning SSH artifacts into circuit inputs.

use thiserror::Error;

/// Errors raised while parsing keys and signatures or encoding them for the circuit.
#[derive(Error, Debug)]
pub enum InputError {
    /// Malformed or truncated SSH wire data.
    #[error("Format error at offset {offset}: {reason}")]
    Format {
        /// Cursor position when the read failed.
        offset: usize,
        /// What went wrong.
        reason: String,
    },

    /// Key line is not `ssh-rsa <base64> [comment]`.
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// The encoded key record names an algorithm other than `ssh-rsa`.
    #[error("Unsupported key type: {0}")]
    UnsupportedKeyType(String),

    /// RSA modulus size differs from the size the circuit is built for.
    #[error("Key size mismatch: circuit expects {expected}-bit moduli, got {actual} bits")]
    KeySizeMismatch {
        /// Configured modulus size.
        expected: usize,
        /// Bit length of the parsed modulus.
        actual: usize,
    },

    /// Base64 payload could not be decoded.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Signature blob does not start with `SSHSIG`.
    #[error("Invalid signature magic: expected SSHSIG, got {0:02x?}")]
    InvalidMagic(Vec<u8>),

    /// Signature envelope version other than 1.
    #[error("Unsupported signature version: {0}")]
    UnsupportedVersion(u32),

    /// Digest algorithm without a known DigestInfo prefix.
    #[error("Unsupported digest algorithm: {0}")]
    UnsupportedDigest(String),

    /// PKCS#1 v1.5 padding cannot be built for this modulus size.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Value does not fit into the requested limb layout.
    #[error("Value of {bits} bits overflows {n_limbs} limbs of {limb_width} bits")]
    Overflow {
        /// Significant bits of the value.
        bits: u32,
        /// Limb width in bits.
        limb_width: usize,
        /// Number of limbs.
        n_limbs: usize,
    },

    /// Negative integers have no limb encoding.
    #[error("Negative value cannot be split into limbs")]
    NegativeValue,

    /// More keys than the circuit has slots for.
    #[error("Too many keys: max {max}, got {actual}")]
    TooManyKeys {
        /// Circuit capacity.
        max: usize,
        /// Number of parsed RSA keys.
        actual: usize,
    },

    /// No RSA key in the roster could be parsed.
    #[error("Anonymity set is empty: no usable RSA key in the roster")]
    EmptyGroup,

    /// The signing key is not one of the group's keys.
    #[error("Signer key is not a member of the anonymity set")]
    SignerNotInGroup,

    /// Merkle proof requested for a leaf that does not exist.
    #[error("Leaf index {index} out of range for {leaves} leaves")]
    LeafOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of leaves.
        leaves: usize,
    },

    /// Circuit parameters that cannot hold the values in use.
    #[error("Invalid circuit parameters: {0}")]
    InvalidParams(String),

    /// Roster document could not be decoded.
    #[error("Roster error: {0}")]
    Roster(#[from] serde_json::Error),
}

impl InputError {
    pub(crate) fn format(offset: usize, reason: impl Into<String>) -> Self {
        InputError::Format {
            offset,
            reason: reason.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, InputError>;
