//! Big natural numbers as fixed-width limbs

pub mod bignat;
