//! # groupsig
//!
//! Input preparation for proving membership of an SSH-signing group without
//! revealing which member signed.
//!
//! The crate turns an SSHSIG RSA signature, the signed message and a roster of
//! member keys into the limb-encoded bundle a proving circuit consumes, together
//! with the public signals a verifier recomputes on its own.

#![warn(missing_docs)]
#![allow(clippy::module_inception)]

pub mod error;
pub mod ssh;
pub mod rsa;
pub mod hash;
pub mod bignat;
pub mod convert;
pub mod params;
pub mod anonymity;
pub mod create_input;
pub mod backend;

pub use error::{InputError, Result};
pub use params::CircuitParams;
