//! Verifier input: the public signals a proof is checked against
use tracing::info_span;

use crate::anonymity::builder::AnonymitySet;
use crate::anonymity::roster::Roster;
use crate::bignat::bignat::LimbSequence;
use crate::create_input::prover_input::{double_blind_limbs, message_limbs};
use crate::error::Result;
use crate::params::CircuitParams;

/// `[...message, ...doubleBlindMessage, ...publicKeys.flat()]` as decimal strings
pub fn public_signals(
    message: &LimbSequence,
    double_blind_message: &LimbSequence,
    public_keys: &[LimbSequence],
) -> Vec<String> {
    let mut signals: Vec<String> = message.to_decimal();
    signals.extend(double_blind_message.to_decimal());
    for key in public_keys {
        signals.extend(key.to_decimal());
    }
    signals
}

/// Recompute the public signals from the message and roster alone.
///
/// The verifier never sees the signature, so this must agree with
/// [`crate::create_input::prover_input::ProverInput::public_signals`].
pub fn create_verifier_input(message: &str, roster: &Roster, params: &CircuitParams) -> Result<Vec<String>> {
    params.validate()?;
    let message: LimbSequence = message_limbs(message, params)?;
    let (_, double_blind_message) = double_blind_limbs(params)?;
    let set: AnonymitySet =
        info_span!("build anonymity set").in_scope(|| AnonymitySet::build(roster, params))?;
    Ok(public_signals(&message, &double_blind_message, &set.keys))
}
