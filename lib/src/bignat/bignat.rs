//! This module includes the structures for very big natural numbers split into limbs
use rug::Integer;
use serde::ser::{Serialize, Serializer};

use crate::convert::integers_to_decimal;
use crate::error::{InputError, Result};

/// Split a very large integer `value` into #n_limbs limbs where each limb has `limb_width` bits.
///
/// Limb 0 is the least significant. Fails rather than truncating when `value`
/// needs more than `limb_width * n_limbs` bits.
pub fn create_limb_values(value: &Integer, limb_width: usize, n_limbs: usize) -> Result<Vec<Integer>> {
    if *value < 0 {
        return Err(InputError::NegativeValue);
    }
    let bits: u32 = value.significant_bits();
    if bits as usize > limb_width * n_limbs {
        return Err(InputError::Overflow {
            bits,
            limb_width,
            n_limbs,
        });
    }
    let mask: Integer = BigNatParams::new(limb_width, n_limbs).max_word;
    let limb_values: Vec<Integer> = (0..n_limbs)
        .map(|i| (value.clone() >> (i * limb_width) as u32) & &mask)
        .collect();
    Ok(limb_values)
}

/// Reassemble limbs produced by [`create_limb_values`]: `sum(limb[i] << (i * limb_width))`
pub fn join_limb_values(limbs: &[Integer], limb_width: usize) -> Integer {
    limbs
        .iter()
        .enumerate()
        .fold(Integer::new(), |acc, (i, limb)| {
            acc + (limb.clone() << (i * limb_width) as u32)
        })
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Params for describing a very large natural number
pub struct BigNatParams {
    /// Number of limbs
    pub n_limbs: usize,
    /// Maximum value of each limb
    pub max_word: Integer,
    /// Limbwidth of each limb
    pub limb_width: usize,
}

impl BigNatParams {
    /// Create a new BigNatParams instance
    pub fn new(limb_width: usize, n_limbs: usize) -> Self {
        let mut max_word = Integer::from(1) << limb_width as u32;
        max_word -= 1;
        BigNatParams {
            max_word,
            n_limbs,
            limb_width,
        }
    }

    /// Total number of bits the limbs can hold
    pub fn capacity_bits(&self) -> usize {
        self.limb_width * self.n_limbs
    }
}

/// A natural number as an ordered, little-endian sequence of fixed-width limbs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LimbSequence {
    /// The limb values, least significant first
    pub limb_values: Vec<Integer>,
    /// Parameters
    pub params: BigNatParams,
}

impl LimbSequence {
    /// Split `value` into `n_limbs` limbs of `limb_width` bits
    pub fn new(value: &Integer, limb_width: usize, n_limbs: usize) -> Result<Self> {
        let limb_values: Vec<Integer> = create_limb_values(value, limb_width, n_limbs)?;
        Ok(LimbSequence {
            limb_values,
            params: BigNatParams::new(limb_width, n_limbs),
        })
    }

    /// Recover the integer the limbs encode
    pub fn value(&self) -> Integer {
        join_limb_values(&self.limb_values, self.params.limb_width)
    }

    /// Number of limbs
    pub fn len(&self) -> usize {
        self.limb_values.len()
    }

    /// Whether the sequence has no limbs
    pub fn is_empty(&self) -> bool {
        self.limb_values.is_empty()
    }

    /// Limbs as decimal strings
    pub fn to_decimal(&self) -> Vec<String> {
        integers_to_decimal(&self.limb_values)
    }
}

/// Serialized as an array of decimal strings, the form the proving engine accepts
impl Serialize for LimbSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.limb_values.iter().map(|limb| limb.to_string_radix(10)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn splits_little_endian() {
        let value: Integer = (Integer::from(3) << 240u32) + (Integer::from(2) << 120u32) + 1u32;
        let limbs = LimbSequence::new(&value, 120, 4).unwrap();
        assert_eq!(
            limbs.limb_values,
            vec![Integer::from(1), Integer::from(2), Integer::from(3), Integer::from(0)]
        );
        assert_eq!(limbs.value(), value);
    }

    #[test]
    fn zero_is_all_zero_limbs() {
        let limbs = create_limb_values(&Integer::new(), 120, 5).unwrap();
        assert_eq!(limbs, vec![Integer::new(); 5]);
    }

    #[test]
    fn exact_capacity_fits_one_more_bit_overflows() {
        let max: Integer = (Integer::from(1) << 600u32) - 1u32;
        let limbs = create_limb_values(&max, 120, 5).unwrap();
        assert!(limbs.iter().all(|l| l.significant_bits() == 120));

        let too_big: Integer = Integer::from(1) << 600u32;
        assert!(matches!(
            create_limb_values(&too_big, 120, 5),
            Err(InputError::Overflow { bits: 601, limb_width: 120, n_limbs: 5 })
        ));
    }

    #[test]
    fn negative_values_are_rejected() {
        assert!(matches!(
            create_limb_values(&Integer::from(-5), 120, 2),
            Err(InputError::NegativeValue)
        ));
    }

    #[test]
    fn serializes_as_decimal_strings() {
        let value: Integer = (Integer::from(7) << 120u32) + 9u32;
        let limbs = LimbSequence::new(&value, 120, 3).unwrap();
        assert_eq!(serde_json::to_string(&limbs).unwrap(), r#"["9","7","0"]"#);
    }

    proptest! {
        #[test]
        fn join_inverts_split(bytes in proptest::collection::vec(any::<u8>(), 0..75), n_limbs in 5usize..8) {
            let value: Integer = crate::convert::os2ip(&bytes);
            let limbs = create_limb_values(&value, 120, n_limbs).unwrap();
            prop_assert_eq!(limbs.len(), n_limbs);
            prop_assert!(limbs.iter().all(|l| l.significant_bits() <= 120));
            prop_assert_eq!(join_limb_values(&limbs, 120), value);
        }

        #[test]
        fn join_inverts_split_for_narrow_limbs(value in any::<u128>(), limb_width in 1usize..64) {
            let value = Integer::from(value);
            let n_limbs = 128 / limb_width + 1;
            let limbs = create_limb_values(&value, limb_width, n_limbs).unwrap();
            prop_assert_eq!(join_limb_values(&limbs, limb_width), value);
        }
    }
}
