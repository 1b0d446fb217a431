//! Fixed-size anonymity set over the group's RSA moduli
use serde::Serialize;
use tracing::{info, warn};

use crate::anonymity::roster::Roster;
use crate::bignat::bignat::LimbSequence;
use crate::error::{InputError, Result};
use crate::params::{CircuitParams, MAX_SET_SIZE};
use crate::ssh::key::{parse_rsa_public_key, KeyType};

/// A roster key that could not be used
#[derive(Clone, Debug, Serialize)]
pub struct SkippedKey {
    /// Member the key belongs to
    pub member: String,
    /// Position of the key in the member's list
    pub key_index: usize,
    /// Why it was skipped
    pub reason: String,
}

/// The circuit's key array: exactly `max_keys` limb sequences
#[derive(Clone, Debug)]
pub struct AnonymitySet {
    /// Real members first, then copies of the first member
    pub keys: Vec<LimbSequence>,
    /// Number of entries that come from the roster
    pub real_members: usize,
    /// Roster keys that failed to parse or encode
    pub skipped: Vec<SkippedKey>,
}

impl AnonymitySet {
    /// Build the set from the RSA keys of `roster`.
    ///
    /// Keys that fail to parse are logged and skipped. More usable keys than
    /// `params.max_keys` is fatal, as is a roster with none.
    pub fn build(roster: &Roster, params: &CircuitParams) -> Result<Self> {
        let n_limbs: usize = params.modulus_limbs();
        let mut keys: Vec<LimbSequence> = Vec::new();
        let mut skipped: Vec<SkippedKey> = Vec::new();

        for (member, key_index, key) in roster.keys_of_type(KeyType::Rsa) {
            let limbs = parse_rsa_public_key(&key.key).and_then(|public_key| {
                public_key.check_size(params.modulus_bits)?;
                public_key.modulus_limbs(params.limb_width, n_limbs)
            });
            match limbs {
                Ok(limbs) => keys.push(limbs),
                Err(err) => {
                    warn!(member, key_index, error = %err, "skipping roster key");
                    skipped.push(SkippedKey {
                        member: member.to_string(),
                        key_index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Self::from_limbs(keys, skipped, params.max_keys)
    }

    /// Pad already-encoded keys to `max_keys` by repeating the first one
    pub fn from_limbs(keys: Vec<LimbSequence>, skipped: Vec<SkippedKey>, max_keys: usize) -> Result<Self> {
        if max_keys > MAX_SET_SIZE {
            return Err(InputError::InvalidParams(format!(
                "max_keys {} exceeds {}",
                max_keys, MAX_SET_SIZE
            )));
        }
        if keys.len() > max_keys {
            return Err(InputError::TooManyKeys {
                max: max_keys,
                actual: keys.len(),
            });
        }
        let first: LimbSequence = keys.first().cloned().ok_or(InputError::EmptyGroup)?;
        let real_members: usize = keys.len();
        let mut keys: Vec<LimbSequence> = keys;
        keys.resize(max_keys, first);
        info!(
            real_members,
            padding = max_keys - real_members,
            skipped = skipped.len(),
            "built anonymity set"
        );
        Ok(AnonymitySet {
            keys,
            real_members,
            skipped,
        })
    }

    /// Number of slots (always `max_keys`)
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set has no slots
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Index of `key` among the real members
    pub fn position_of(&self, key: &LimbSequence) -> Option<usize> {
        self.keys[..self.real_members].iter().position(|k| k == key)
    }

    /// Every slot as decimal strings
    pub fn to_decimal(&self) -> Vec<Vec<String>> {
        self.keys.iter().map(LimbSequence::to_decimal).collect()
    }
}
