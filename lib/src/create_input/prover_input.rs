//! Prover input: the named bundle of limb sequences handed to the proving engine
use pasta_curves::Fp;
use rug::Integer;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::anonymity::builder::{AnonymitySet, SkippedKey};
use crate::anonymity::merkle::{LimbHasher, MerkleProof, MerkleTree};
use crate::anonymity::roster::Roster;
use crate::bignat::bignat::LimbSequence;
use crate::create_input::verifier_input::public_signals;
use crate::error::{InputError, Result};
use crate::hash::hash::DigestAlgorithm;
use crate::params::{CircuitParams, MessageEncoding};
use crate::ssh::signature::SignatureEnvelope;

/// Inputs of the proving circuit, named as the circuit names them
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProverInput {
    /// The user's message
    pub message: LimbSequence,
    /// Encoded message of the fixed double-blind string
    pub double_blind_message: LimbSequence,
    /// The padded anonymity set
    pub public_keys: Vec<LimbSequence>,
    /// The signer's signature over the double-blind string
    pub signature: LimbSequence,
    /// The signer's own modulus
    pub correct_key: LimbSequence,
}

impl ProverInput {
    /// Public signals in the order the verifier checks them
    pub fn public_signals(&self) -> Vec<String> {
        public_signals(&self.message, &self.double_blind_message, &self.public_keys)
    }
}

/// Prover input plus the bookkeeping around it
pub struct PreparedInput {
    /// Bundle for the proving engine
    pub inputs: ProverInput,
    /// Index of the signer's key among the real members
    pub signer_index: usize,
    /// Number of real members in the set
    pub real_members: usize,
    /// Roster keys left out of the set
    pub skipped: Vec<SkippedKey>,
    /// Poseidon root over the padded set
    pub merkle_root: Fp,
    /// Inclusion proof of the signer's key
    pub merkle_proof: MerkleProof,
    /// Parsed signature envelope
    pub envelope: SignatureEnvelope,
    /// Encoded message the signature must reproduce
    pub double_blind_encoded: Integer,
}

impl PreparedInput {
    /// `signature^e mod n == EM(double-blind message)`; the proof cannot succeed otherwise
    pub fn signature_matches(&self) -> bool {
        self.envelope
            .public_key
            .verify_encoded_message(&self.envelope.signature, &self.double_blind_encoded)
    }
}

/// Limbs of the user's message under the configured encoding
pub fn message_limbs(message: &str, params: &CircuitParams) -> Result<LimbSequence> {
    match params.message_encoding {
        MessageEncoding::Digest => {
            let digest: Integer = DigestAlgorithm::sha512(message.as_bytes());
            LimbSequence::new(&digest, params.limb_width, params.message_limbs)
        }
        MessageEncoding::EncodedMessage => {
            let em: Integer = params.message_encoder()?.encode(message)?;
            LimbSequence::new(&em, params.limb_width, params.modulus_limbs())
        }
    }
}

/// Encoded message of the double-blind string and its limbs
pub fn double_blind_limbs(params: &CircuitParams) -> Result<(Integer, LimbSequence)> {
    let em: Integer = params.message_encoder()?.encode(&params.double_blind_message)?;
    let limbs: LimbSequence = LimbSequence::new(&em, params.limb_width, params.modulus_limbs())?;
    debug!(limbs = limbs.len(), "encoded double-blind message");
    Ok((em, limbs))
}

/// Build the full proving bundle. Any failure here is fatal: there is no partial proof.
pub fn create_prover_input(
    message: &str,
    armored_signature: &str,
    roster: &Roster,
    params: &CircuitParams,
) -> Result<PreparedInput> {
    params.validate()?;
    let n_limbs: usize = params.modulus_limbs();

    let message_input: LimbSequence =
        info_span!("encode message").in_scope(|| message_limbs(message, params))?;
    let (double_blind_encoded, double_blind_message) =
        info_span!("encode double-blind message").in_scope(|| double_blind_limbs(params))?;

    let envelope: SignatureEnvelope = info_span!("parse signature")
        .in_scope(|| SignatureEnvelope::from_armored(armored_signature))?;
    envelope.public_key.check_size(params.modulus_bits)?;
    let signature: LimbSequence = envelope.signature.limbs(params.limb_width, n_limbs)?;
    let correct_key: LimbSequence = envelope.public_key.modulus_limbs(params.limb_width, n_limbs)?;

    let set: AnonymitySet =
        info_span!("build anonymity set").in_scope(|| AnonymitySet::build(roster, params))?;
    let signer_index: usize = set
        .position_of(&correct_key)
        .ok_or(InputError::SignerNotInGroup)?;

    let (merkle_root, merkle_proof) = info_span!("merkle commitment").in_scope(|| {
        let hasher = LimbHasher::new();
        let tree: MerkleTree = MerkleTree::from_keys(&hasher, &set.keys)?;
        let proof: MerkleProof = tree.proof(signer_index)?;
        Ok::<_, InputError>((tree.root(), proof))
    })?;

    Ok(PreparedInput {
        inputs: ProverInput {
            message: message_input,
            double_blind_message,
            public_keys: set.keys,
            signature,
            correct_key,
        },
        signer_index,
        real_members: set.real_members,
        skipped: set.skipped,
        merkle_root,
        merkle_proof,
        envelope,
        double_blind_encoded,
    })
}
