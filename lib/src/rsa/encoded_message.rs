//! EMSA-PKCS1-v1_5 encoding of SSHSIG signed data
//!
//! An `ssh-keygen -Y sign` RSA signature is the PKCS#1 v1.5 signature (with
//! `rsa-sha2-512`) of the wrapper
//! `"SSHSIG" || string(namespace) || string("") || string(hash_alg) || string(H(message))`.
//! Rebuilding the encoded message lets `s^e mod n == EM` be checked without the
//! private key.
use rug::Integer;
use tracing::debug;

use crate::convert::os2ip;
use crate::error::{InputError, Result};
use crate::hash::hash::DigestAlgorithm;
use crate::params::MAX_MODULUS_BITS;
use crate::ssh::signature::SSHSIG_MAGIC;
use crate::ssh::wire::encode_ssh_string;

/// PKCS#1 v1.5 requires at least eight 0xff padding bytes
const MIN_PADDING: usize = 8;

/// Digest used by the `rsa-sha2-512` signature algorithm over the wrapper
const SIGNATURE_DIGEST: &str = "sha512";

/// Fixed protocol constants of the encoding
#[derive(Clone, Debug)]
pub struct MessageEncoder {
    /// SSHSIG namespace (`file` for `ssh-keygen -Y sign -n file`)
    pub namespace: String,
    /// Digest applied to the message before wrapping
    pub message_digest: DigestAlgorithm,
    /// Byte length `k` of the modulus
    pub modulus_bytes: usize,
}

impl MessageEncoder {
    /// Create an encoder; fails for unknown hash algorithms
    pub fn new(namespace: &str, hash_algorithm: &str, modulus_bytes: usize) -> Result<Self> {
        if modulus_bytes > MAX_MODULUS_BITS / 8 {
            return Err(InputError::Encoding(format!(
                "modulus of {} bytes exceeds {} bits",
                modulus_bytes, MAX_MODULUS_BITS
            )));
        }
        Ok(MessageEncoder {
            namespace: namespace.to_string(),
            message_digest: DigestAlgorithm::new(hash_algorithm)?,
            modulus_bytes,
        })
    }

    /// The blob an SSHSIG signer actually signs
    pub fn signed_data(&self, message: &[u8]) -> Vec<u8> {
        let mut wrapper: Vec<u8> = SSHSIG_MAGIC.to_vec();
        wrapper.extend(encode_ssh_string(self.namespace.as_bytes()));
        wrapper.extend(encode_ssh_string(b""));
        wrapper.extend(encode_ssh_string(self.message_digest.name.as_bytes()));
        wrapper.extend(encode_ssh_string(&self.message_digest.digest(message)));
        wrapper
    }

    /// EM = 0x00 || 0x01 || 0xff * padLen || 0x00 || DigestInfo, exactly `k` bytes
    pub fn encode_bytes(&self, message: &[u8]) -> Result<Vec<u8>> {
        let outer: DigestAlgorithm = DigestAlgorithm::new(SIGNATURE_DIGEST)?;
        let digest_info: Vec<u8> = outer.digest_info(&self.signed_data(message));
        let pad_len: usize = self
            .modulus_bytes
            .checked_sub(3 + digest_info.len())
            .filter(|pad_len| *pad_len >= MIN_PADDING)
            .ok_or_else(|| {
                InputError::Encoding(format!(
                    "modulus of {} bytes is too short for a {}-byte DigestInfo",
                    self.modulus_bytes,
                    digest_info.len()
                ))
            })?;

        let mut em: Vec<u8> = Vec::with_capacity(self.modulus_bytes);
        em.push(0x00);
        em.push(0x01);
        em.extend(std::iter::repeat(0xff).take(pad_len));
        em.push(0x00);
        em.extend(digest_info);
        if em.len() != self.modulus_bytes {
            return Err(InputError::Encoding(format!(
                "encoded message has {} bytes, expected {}",
                em.len(),
                self.modulus_bytes
            )));
        }
        debug!(k = self.modulus_bytes, pad_len, "built PKCS#1 v1.5 encoded message");
        Ok(em)
    }

    /// The encoded message as a big-endian integer
    pub fn encode(&self, message: &str) -> Result<Integer> {
        Ok(os2ip(&self.encode_bytes(message.as_bytes())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sha2::{Digest, Sha512};

    fn encoder(k: usize) -> MessageEncoder {
        MessageEncoder::new("file", "sha512", k).unwrap()
    }

    proptest! {
        #[test]
        fn layout_is_pkcs1_v15(message in any::<String>(), k in 94usize..=1024) {
            let enc = encoder(k);
            let em: Vec<u8> = enc.encode_bytes(message.as_bytes()).unwrap();
            let pad_len: usize = k - 3 - 83;
            prop_assert_eq!(em.len(), k);
            prop_assert_eq!(&em[..2], &[0x00, 0x01]);
            prop_assert!(em[2..2 + pad_len].iter().all(|b| *b == 0xff));
            prop_assert_eq!(em[2 + pad_len], 0x00);
            prop_assert_eq!(
                hex::encode(&em[3 + pad_len..3 + pad_len + 19]),
                "3051300d060960864801650304020305000440"
            );
            let digest = Sha512::digest(enc.signed_data(message.as_bytes()));
            prop_assert_eq!(&em[3 + pad_len + 19..], &digest[..]);
        }
    }

    #[test]
    fn wrapper_matches_sshsig_layout() {
        let data: Vec<u8> = encoder(512).signed_data(b"hello");
        assert_eq!(&data[..6], b"SSHSIG");
        assert_eq!(&data[6..14], &[0, 0, 0, 4, b'f', b'i', b'l', b'e']);
        assert_eq!(&data[14..18], &[0, 0, 0, 0]);
        assert_eq!(&data[18..28], &[0, 0, 0, 6, b's', b'h', b'a', b'5', b'1', b'2']);
        assert_eq!(&data[28..32], &[0, 0, 0, 64]);
        assert_eq!(data.len(), 32 + 64);
    }

    #[test]
    fn integer_form_drops_only_the_leading_zero() {
        let em: Integer = encoder(256).encode("hello").unwrap();
        // 0x0001ff.. has 2048 - 15 significant bits
        assert_eq!(em.significant_bits(), 2048 - 15);
    }

    #[test]
    fn small_modulus_is_an_encoding_error() {
        // 3 + 83 + 7 bytes leaves only seven bytes of padding
        assert!(matches!(encoder(93).encode("hello"), Err(InputError::Encoding(_))));
        assert!(encoder(94).encode("hello").is_ok());
        assert!(matches!(encoder(10).encode("hello"), Err(InputError::Encoding(_))));
    }

    #[test]
    fn oversized_modulus_is_refused_before_allocating() {
        assert!(MessageEncoder::new("file", "sha512", MAX_MODULUS_BITS / 8).is_ok());
        assert!(matches!(
            MessageEncoder::new("file", "sha512", usize::MAX),
            Err(InputError::Encoding(_))
        ));
    }

    #[test]
    fn encoding_is_deterministic_and_message_bound() {
        let enc = encoder(512);
        assert_eq!(enc.encode("hello").unwrap(), enc.encode("hello").unwrap());
        assert_ne!(enc.encode("hello").unwrap(), enc.encode("hellp").unwrap());
    }
}
