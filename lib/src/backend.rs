//! Seam to the zero-knowledge proving engine.
//!
//! Circuit compilation, witness generation and Groth16 live outside this crate;
//! an engine only has to accept the named input bundle and check proofs against
//! the public signals.
use serde::Serialize;

use crate::create_input::ProverInput;
use crate::error::Result;

/// Proof returned by an engine together with the signals it commits to
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofWithSignals<P> {
    /// Engine-specific proof object
    pub proof: P,
    /// Public signals as decimal strings
    pub public_signals: Vec<String>,
}

/// A proving system that consumes [`ProverInput`]
pub trait ProvingBackend {
    /// Engine-specific proof type
    type Proof;

    /// Generate a proof for `inputs`
    fn prove(&self, inputs: &ProverInput) -> Result<ProofWithSignals<Self::Proof>>;

    /// Check `proof` against `public_signals`
    fn verify(&self, public_signals: &[String], proof: &Self::Proof) -> Result<bool>;
}
