//! Circuit parameters shared by every stage of input generation
use serde::{Deserialize, Serialize};

use crate::error::{InputError, Result};
use crate::rsa::encoded_message::MessageEncoder;

/// Bits of a SHA-512 digest
const DIGEST_BITS: usize = 512;
/// Largest RSA modulus accepted
pub const MAX_MODULUS_BITS: usize = 16384;
/// Largest anonymity set accepted
pub const MAX_SET_SIZE: usize = 1 << 16;

/// How the user's message enters the circuit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageEncoding {
    /// SHA-512 of the message over `message_limbs` limbs
    Digest,
    /// PKCS#1 encoded message over the modulus limb count
    EncodedMessage,
}

/// Shape of the proving circuit
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitParams {
    /// Bits per limb
    pub limb_width: usize,
    /// Limbs used for a message digest
    pub message_limbs: usize,
    /// RSA modulus size the circuit is compiled for
    pub modulus_bits: usize,
    /// Slots in the anonymity set
    pub max_keys: usize,
    /// SSHSIG namespace the signature was made under
    pub namespace: String,
    /// SSHSIG hash algorithm
    pub hash_algorithm: String,
    /// Fixed application string whose signature acts as the credential
    pub double_blind_message: String,
    /// Encoding of the user's message
    pub message_encoding: MessageEncoding,
}

impl Default for CircuitParams {
    fn default() -> Self {
        CircuitParams {
            limb_width: 120,
            message_limbs: 5,
            modulus_bits: 4096,
            max_keys: 300,
            namespace: "file".to_string(),
            hash_algorithm: "sha512".to_string(),
            double_blind_message: "0xPARC".to_string(),
            message_encoding: MessageEncoding::Digest,
        }
    }
}

impl CircuitParams {
    /// Byte length `k` of the modulus
    pub fn modulus_bytes(&self) -> usize {
        self.modulus_bits.div_ceil(8)
    }

    /// Limbs needed to hold a modulus-sized value
    pub fn modulus_limbs(&self) -> usize {
        self.modulus_bits.div_ceil(self.limb_width)
    }

    /// Encoder for the PKCS#1 encoded message
    pub fn message_encoder(&self) -> Result<MessageEncoder> {
        MessageEncoder::new(&self.namespace, &self.hash_algorithm, self.modulus_bytes())
    }

    /// Reject parameters whose limb layout cannot hold the values in use
    pub fn validate(&self) -> Result<()> {
        if self.limb_width == 0 || self.limb_width > 128 {
            return Err(InputError::InvalidParams(format!(
                "limb width {} is outside 1..=128",
                self.limb_width
            )));
        }
        let digest_capacity: Option<usize> = self.message_limbs.checked_mul(self.limb_width);
        if digest_capacity.map_or(true, |bits| bits < DIGEST_BITS) {
            return Err(InputError::InvalidParams(format!(
                "{} limbs of {} bits cannot hold a {}-bit digest",
                self.message_limbs, self.limb_width, DIGEST_BITS
            )));
        }
        if self.modulus_bits == 0 || self.modulus_bits > MAX_MODULUS_BITS {
            return Err(InputError::InvalidParams(format!(
                "modulus size {} is outside 1..={}",
                self.modulus_bits, MAX_MODULUS_BITS
            )));
        }
        if self.max_keys == 0 || self.max_keys > MAX_SET_SIZE {
            return Err(InputError::InvalidParams(format!(
                "max_keys {} is outside 1..={}",
                self.max_keys, MAX_SET_SIZE
            )));
        }
        self.message_encoder().map(|_| ())
    }
}
