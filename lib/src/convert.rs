//! This module includes methods that convert variables from one type to another type
use pasta_curves::group::ff::PrimeField;
use pasta_curves::Fp;
use rug::integer::Order;
use rug::Integer;

use crate::error::{InputError, Result};

/// Converts an octet string to a nonnegative integer. https://www.rfc-editor.org/rfc/rfc8017#section-4.2
pub fn os2ip(bytes: &[u8]) -> Integer {
    Integer::from_digits(bytes, Order::Msf)
}

/// Converts a nonnegative integer to an octet string of length `len`. https://www.rfc-editor.org/rfc/rfc8017#section-4.1
pub fn i2osp(value: &Integer, len: usize) -> Result<Vec<u8>> {
    if *value < 0 {
        return Err(InputError::NegativeValue);
    }
    let digits: Vec<u8> = value.to_digits::<u8>(Order::Msf);
    if digits.len() > len {
        return Err(InputError::Encoding(format!(
            "integer too large: {} bytes do not fit in {}",
            digits.len(),
            len
        )));
    }
    let mut out: Vec<u8> = vec![0; len - digits.len()];
    out.extend(digits);
    Ok(out)
}

/// Converts a limb (at most 128 bits) to a Pallas base-field element
pub fn integer_to_fp(value: &Integer) -> Result<Fp> {
    let small: u128 = value.to_u128().ok_or(InputError::Overflow {
        bits: value.significant_bits(),
        limb_width: 128,
        n_limbs: 1,
    })?;
    Ok(Fp::from_u128(small))
}

/// Converts a Pallas base-field element to its canonical integer
pub fn fp_to_integer(value: &Fp) -> Integer {
    let repr = value.to_repr();
    Integer::from_digits::<u8>(&repr[..], Order::Lsf)
}

/// Converts integers to their decimal strings, the encoding the prover reads
pub fn integers_to_decimal(values: &[Integer]) -> Vec<String> {
    values.iter().map(|v| v.to_string_radix(10)).collect()
}
