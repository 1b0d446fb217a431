//! OpenSSH wire format: public key lines and SSHSIG envelopes

pub mod wire;
pub mod key;
pub mod signature;
