//! Implementations related to hash
use rug::Integer;
use sha2::{Digest, Sha256, Sha512};

use crate::convert::os2ip;
use crate::error::{InputError, Result};

/// DER prefix of DigestInfo for SHA-256 (RFC 8017 section 9.2, note 1)
const IDENTIFIER_FOR_SHA256: [u8; 19] = [
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01, 0x05,
    0x00, 0x04, 0x20,
];
/// DER prefix of DigestInfo for SHA-512
const IDENTIFIER_FOR_SHA512: [u8; 19] = [
    0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03, 0x05,
    0x00, 0x04, 0x40,
];

#[derive(Clone, Debug, PartialEq, Eq)]
/// Params for describing a digest algorithm
pub struct DigestAlgorithm {
    /// Name of the digest as it appears in SSHSIG (`sha256` / `sha512`)
    pub name: String,
    /// DigestInfo DER prefix
    pub identifier: Vec<u8>,
}

impl DigestAlgorithm {
    /// Define a new DigestAlgorithm instance based on the name of the digest algorithm
    pub fn new(name: &str) -> Result<Self> {
        let identifier: Vec<u8> = match name {
            "sha256" => IDENTIFIER_FOR_SHA256.to_vec(),
            "sha512" => IDENTIFIER_FOR_SHA512.to_vec(),
            _ => return Err(InputError::UnsupportedDigest(name.to_string())),
        };
        Ok(Self {
            name: name.to_string(),
            identifier,
        })
    }

    /// Output length in bytes
    pub fn output_len(&self) -> usize {
        match self.name.as_str() {
            "sha256" => 32,
            _ => 64,
        }
    }

    /// Hash `message` with this algorithm
    pub fn digest(&self, message: &[u8]) -> Vec<u8> {
        match self.name.as_str() {
            "sha256" => Sha256::digest(message).to_vec(),
            _ => Sha512::digest(message).to_vec(),
        }
    }

    /// DigestInfo = DER prefix || H(message)
    pub fn digest_info(&self, message: &[u8]) -> Vec<u8> {
        let mut out: Vec<u8> = self.identifier.clone();
        out.extend(self.digest(message));
        out
    }

    /// Input a message and output its sha512 digest as an Integer
    pub fn sha512(message: &[u8]) -> Integer {
        os2ip(&Sha512::digest(message))
    }
}
