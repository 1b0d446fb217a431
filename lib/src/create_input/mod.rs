//! Create prover inputs and verifier inputs

/// File to create prover input
pub mod prover_input;
/// File to create verifier input
pub mod verifier_input;

pub use prover_input::{create_prover_input, PreparedInput, ProverInput};
pub use verifier_input::{create_verifier_input, public_signals};
