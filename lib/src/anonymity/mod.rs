//! Anonymity set: the roster, the padded key list and its commitment

pub mod roster;
pub mod builder;
pub mod merkle;
