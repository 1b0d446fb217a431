//! Implementations related to rsa signature verification
use rug::Integer;
use tracing::debug;

use crate::bignat::bignat::LimbSequence;
use crate::error::{InputError, Result};

/// RSA public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RSAPublicKey {
    /// Modulus
    pub modulus: Integer,
    /// Exponent (usually 65537); parsed but not fed to the circuit
    pub exp: Integer,
}

impl RSAPublicKey {
    /// Apply the RSAVP1 verification primitive: https://www.rfc-editor.org/rfc/rfc8017#section-5.2.2
    pub fn rsavp1(&self, signature: &Integer) -> Result<Integer> {
        if *signature < 0 || *signature >= self.modulus {
            return Err(InputError::Encoding(
                "signature representative out of range".to_string(),
            ));
        }
        signature
            .clone()
            .pow_mod(&self.exp, &self.modulus)
            .map_err(|_| InputError::Encoding("modular exponentiation failed".to_string()))
    }

    /// Check `signature^e mod n == encoded_message`, the relation the circuit proves
    pub fn verify_encoded_message(&self, signature: &RSASignature, encoded_message: &Integer) -> bool {
        match self.rsavp1(&signature.signature) {
            Ok(m) => {
                let ok: bool = m == *encoded_message;
                debug!(ok, "checked signature against encoded message");
                ok
            }
            Err(_) => false,
        }
    }

    /// Bit length of the modulus
    pub fn modulus_bits(&self) -> u32 {
        self.modulus.significant_bits()
    }

    /// Fail unless the modulus is exactly `expected_bits` long
    pub fn check_size(&self, expected_bits: usize) -> Result<()> {
        let actual: usize = self.modulus_bits() as usize;
        if actual != expected_bits {
            return Err(InputError::KeySizeMismatch {
                expected: expected_bits,
                actual,
            });
        }
        Ok(())
    }

    /// Split the modulus into circuit limbs
    pub fn modulus_limbs(&self, limb_width: usize, n_limbs: usize) -> Result<LimbSequence> {
        LimbSequence::new(&self.modulus, limb_width, n_limbs)
    }
}

/// RSA signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RSASignature {
    /// signature
    pub signature: Integer,
}

impl RSASignature {
    /// Split the signature into circuit limbs
    pub fn limbs(&self, limb_width: usize, n_limbs: usize) -> Result<LimbSequence> {
        LimbSequence::new(&self.signature, limb_width, n_limbs)
    }
}
