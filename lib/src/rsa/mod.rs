//! RSA signature verification

pub mod rsa;
pub mod encoded_message;
