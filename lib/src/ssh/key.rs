//! This module includes implementations related to OpenSSH public key lines
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rug::Integer;
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::rsa::rsa::RSAPublicKey;
use crate::ssh::wire::WireReader;

/// Algorithm name of RSA keys, both on the key line and inside the encoded record
pub const SSH_RSA: &str = "ssh-rsa";

/// Key type label as carried by the roster
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum KeyType {
    /// `ssh-rsa`
    Rsa,
    /// `ssh-ed25519`
    Ed25519,
    /// `ecdsa-sha2-nistp256`
    Ecdsa,
    /// `ssh-dss`
    Dsa,
    /// Anything else
    Unknown,
}

impl KeyType {
    /// Classify a key line by its prefix
    pub fn classify(key_line: &str) -> KeyType {
        if key_line.starts_with(SSH_RSA) {
            KeyType::Rsa
        } else if key_line.starts_with("ssh-ed25519") {
            KeyType::Ed25519
        } else if key_line.starts_with("ecdsa-sha2-nistp256") {
            KeyType::Ecdsa
        } else if key_line.starts_with("ssh-dss") {
            KeyType::Dsa
        } else {
            KeyType::Unknown
        }
    }

    /// Parse a roster `type` label, case-insensitively; `None` for labels outside the set
    pub fn from_label(label: &str) -> Option<KeyType> {
        match label.trim().to_ascii_uppercase().as_str() {
            "RSA" => Some(KeyType::Rsa),
            "ED25519" => Some(KeyType::Ed25519),
            "ECDSA" => Some(KeyType::Ecdsa),
            "DSA" => Some(KeyType::Dsa),
            "UNKNOWN" => Some(KeyType::Unknown),
            _ => None,
        }
    }
}

/// Keep only the key lines of the given type
pub fn filter_keys<'a, I>(key_lines: I, key_type: KeyType) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    key_lines
        .into_iter()
        .filter(|line| KeyType::classify(line) == key_type)
        .collect()
}

/// Parse an `ssh-rsa <base64> [comment]` line into its public key
pub fn parse_rsa_public_key(key_line: &str) -> Result<RSAPublicKey> {
    let parts: Vec<&str> = key_line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(InputError::InvalidKeyFormat(
            "expected `ssh-rsa <base64> [comment]`".to_string(),
        ));
    }
    if parts[0] != SSH_RSA {
        return Err(InputError::InvalidKeyFormat(format!(
            "expected key type {}, got {}",
            SSH_RSA, parts[0]
        )));
    }
    let blob: Vec<u8> = STANDARD.decode(parts[1])?;
    parse_rsa_key_blob(&blob)
}

/// Parse the binary `ssh-rsa` record: string name, mpint e, mpint n
pub fn parse_rsa_key_blob(blob: &[u8]) -> Result<RSAPublicKey> {
    let mut reader = WireReader::new(blob);
    let name: &[u8] = reader.read_length_prefixed_bytes()?;
    if name != SSH_RSA.as_bytes() {
        return Err(InputError::UnsupportedKeyType(
            String::from_utf8_lossy(name).into_owned(),
        ));
    }
    let exp: Integer = reader.read_mpint()?;
    let modulus: Integer = reader.read_mpint()?;
    Ok(RSAPublicKey { modulus, exp })
}
