//! Message digests

pub mod hash;
