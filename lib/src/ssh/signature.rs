//! This module includes implementations related to SSHSIG detached signatures
//!
//! Layout (PROTOCOL.sshsig):
//! `"SSHSIG" || uint32 version || string publickey || string namespace ||
//! string reserved || string hash_algorithm || string signature`
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rug::Integer;

use crate::error::{InputError, Result};
use crate::rsa::rsa::{RSAPublicKey, RSASignature};
use crate::ssh::wire::WireReader;

/// Six-byte preamble of every SSHSIG blob
pub const SSHSIG_MAGIC: &[u8; 6] = b"SSHSIG";
/// The only envelope version in use
pub const SSHSIG_VERSION: u32 = 1;

const BEGIN_ARMOR: &str = "-----BEGIN SSH SIGNATURE-----";
const END_ARMOR: &str = "-----END SSH SIGNATURE-----";

/// Decoded SSHSIG envelope
#[derive(Clone, Debug)]
pub struct SignatureEnvelope {
    /// Envelope version (always 1 once parsed)
    pub version: u32,
    /// Signature value
    pub signature: RSASignature,
    /// Key embedded by the signer
    pub public_key: RSAPublicKey,
}

/// Drop the armor lines and all whitespace, leaving the bare base64 payload
pub fn strip_armor(armored: &str) -> String {
    armored
        .replace(BEGIN_ARMOR, "")
        .replace(END_ARMOR, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

impl SignatureEnvelope {
    /// Parse an armored or bare base64 SSHSIG blob
    pub fn from_armored(armored: &str) -> Result<Self> {
        let payload: String = strip_armor(armored);
        let bytes: Vec<u8> = STANDARD.decode(payload.as_bytes())?;
        Self::from_bytes(&bytes)
    }

    /// Parse a raw SSHSIG blob
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = WireReader::new(bytes);
        let magic: &[u8] = reader
            .read_bytes(SSHSIG_MAGIC.len())
            .map_err(|_| InputError::InvalidMagic(bytes.to_vec()))?;
        if magic != SSHSIG_MAGIC {
            return Err(InputError::InvalidMagic(magic.to_vec()));
        }
        let version: u32 = reader.read_u32_be()?;
        if version != SSHSIG_VERSION {
            return Err(InputError::UnsupportedVersion(version));
        }
        let publickey_blob: &[u8] = reader.read_length_prefixed_bytes()?;
        // namespace, reserved, hash_algorithm: required but not interpreted here
        reader.skip_length_prefixed()?;
        reader.skip_length_prefixed()?;
        reader.skip_length_prefixed()?;
        let signature_blob: &[u8] = reader.read_length_prefixed_bytes()?;

        let public_key: RSAPublicKey = Self::parse_public_key(publickey_blob)?;
        let signature: Integer = Self::parse_signature(signature_blob)?;
        Ok(SignatureEnvelope {
            version,
            signature: RSASignature { signature },
            public_key,
        })
    }

    /// The embedded key record: algorithm name, exponent, modulus
    fn parse_public_key(blob: &[u8]) -> Result<RSAPublicKey> {
        let mut reader = WireReader::new(blob);
        reader.skip_length_prefixed()?;
        let exp: Integer = reader.read_mpint()?;
        let modulus: Integer = reader.read_mpint()?;
        Ok(RSAPublicKey { modulus, exp })
    }

    /// The signature record: algorithm name (e.g. `rsa-sha2-512`), signature bytes
    fn parse_signature(blob: &[u8]) -> Result<Integer> {
        let mut reader = WireReader::new(blob);
        reader.skip_length_prefixed()?;
        reader.read_mpint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh::wire::encode_ssh_string;

    fn envelope(magic: &[u8], version: u32, sig: &[u8]) -> Vec<u8> {
        let mut key: Vec<u8> = encode_ssh_string(b"ssh-rsa");
        key.extend(encode_ssh_string(&[1, 0, 1]));
        key.extend(encode_ssh_string(&[0x00, 0xbb, 0xcc]));
        let mut sig_blob: Vec<u8> = encode_ssh_string(b"rsa-sha2-512");
        sig_blob.extend(encode_ssh_string(sig));

        let mut out: Vec<u8> = magic.to_vec();
        out.extend(version.to_be_bytes());
        out.extend(encode_ssh_string(&key));
        out.extend(encode_ssh_string(b"file"));
        out.extend(encode_ssh_string(b""));
        out.extend(encode_ssh_string(b"sha512"));
        out.extend(encode_ssh_string(&sig_blob));
        out
    }

    #[test]
    fn parses_synthetic_envelope() {
        let parsed = SignatureEnvelope::from_bytes(&envelope(b"SSHSIG", 1, &[0x12, 0x34])).unwrap();
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.signature.signature, Integer::from(0x1234));
        assert_eq!(parsed.public_key.modulus, Integer::from(0xbbcc));
        assert_eq!(parsed.public_key.exp, Integer::from(65537));
    }

    #[test]
    fn armor_and_line_breaks_are_ignored() {
        let b64: String = STANDARD.encode(envelope(b"SSHSIG", 1, &[0x42]));
        let (head, tail) = b64.split_at(10);
        let armored = format!("{}\n{}\n  {}\r\n{}\n", BEGIN_ARMOR, head, tail, END_ARMOR);
        let parsed = SignatureEnvelope::from_armored(&armored).unwrap();
        assert_eq!(parsed.signature.signature, Integer::from(0x42));
    }

    #[test]
    fn rejects_bad_magic() {
        let err = SignatureEnvelope::from_bytes(&envelope(b"SSHSIH", 1, &[1])).err().unwrap();
        assert!(matches!(err, InputError::InvalidMagic(_)));
        let err = SignatureEnvelope::from_bytes(b"SSH").err().unwrap();
        assert!(matches!(err, InputError::InvalidMagic(_)));
    }

    #[test]
    fn rejects_other_versions() {
        for version in [0u32, 2, u32::MAX] {
            let err = SignatureEnvelope::from_bytes(&envelope(b"SSHSIG", version, &[1])).err().unwrap();
            assert!(matches!(err, InputError::UnsupportedVersion(v) if v == version));
        }
    }

    #[test]
    fn every_truncation_fails_cleanly() {
        let full: Vec<u8> = envelope(b"SSHSIG", 1, &[0x12, 0x34]);
        for len in SSHSIG_MAGIC.len()..full.len() {
            let err = SignatureEnvelope::from_bytes(&full[..len]).err().unwrap();
            assert!(matches!(err, InputError::Format { .. }), "length {}", len);
        }
    }
}
