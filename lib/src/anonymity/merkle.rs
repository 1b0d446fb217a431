//! Poseidon Merkle commitment over the anonymity set
//!
//! Leaves hash a key's limbs, nodes hash pairs of children. A level with an
//! odd number of nodes duplicates its last node.
use neptune::poseidon::{Poseidon, PoseidonConstants};
use pasta_curves::group::ff::Field;
use pasta_curves::Fp;
use serde::Serialize;
use typenum::{U2, U8};

use crate::bignat::bignat::LimbSequence;
use crate::convert::{fp_to_integer, integer_to_fp};
use crate::error::{InputError, Result};

/// Limbs absorbed per leaf-hash step; the eighth input carries the running state
const LIMBS_PER_STEP: usize = 7;

/// Poseidon hasher with constants for both arities
pub struct LimbHasher {
    leaf_constants: PoseidonConstants<Fp, U8>,
    node_constants: PoseidonConstants<Fp, U2>,
}

impl Default for LimbHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl LimbHasher {
    /// Generate the round constants
    pub fn new() -> Self {
        LimbHasher {
            leaf_constants: PoseidonConstants::new_with_strength(neptune::Strength::Standard),
            node_constants: PoseidonConstants::new_with_strength(neptune::Strength::Standard),
        }
    }

    /// Hash a key's limbs: `state = H8(state, limb[7i..7i+7])`, starting from zero
    pub fn hash_limbs(&self, limbs: &LimbSequence) -> Result<Fp> {
        let elements: Vec<Fp> = limbs
            .limb_values
            .iter()
            .map(integer_to_fp)
            .collect::<Result<Vec<Fp>>>()?;
        let mut state: Fp = Fp::ZERO;
        for chunk in elements.chunks(LIMBS_PER_STEP) {
            let mut preimage: [Fp; LIMBS_PER_STEP + 1] = [Fp::ZERO; LIMBS_PER_STEP + 1];
            preimage[0] = state;
            preimage[1..=chunk.len()].copy_from_slice(chunk);
            state = Poseidon::<Fp, U8>::new_with_preimage(&preimage, &self.leaf_constants).hash();
        }
        Ok(state)
    }

    /// Hash two sibling nodes
    pub fn hash_node(&self, left: &Fp, right: &Fp) -> Fp {
        Poseidon::<Fp, U2>::new_with_preimage(&[*left, *right], &self.node_constants).hash()
    }
}

/// Inclusion proof for one leaf
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerkleProof {
    /// Index of the proven leaf
    pub leaf_index: usize,
    /// Sibling at each level, leaf level first
    pub siblings: Vec<Fp>,
    /// `true` when the path node at that level is a right child
    pub directions: Vec<bool>,
}

/// Proof in the decimal-string form the prover consumes
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProofJson {
    /// Index of the proven leaf
    pub leaf_index: usize,
    /// Siblings as decimal strings
    pub siblings: Vec<String>,
    /// Directions as `"0"` / `"1"`
    pub directions: Vec<String>,
}

impl MerkleProof {
    /// Decimal-string form
    pub fn to_json(&self) -> MerkleProofJson {
        MerkleProofJson {
            leaf_index: self.leaf_index,
            siblings: self.siblings.iter().map(|s| fp_to_integer(s).to_string_radix(10)).collect(),
            directions: self
                .directions
                .iter()
                .map(|d| if *d { "1" } else { "0" }.to_string())
                .collect(),
        }
    }
}

/// All levels of the tree, leaves first, root last
pub struct MerkleTree {
    levels: Vec<Vec<Fp>>,
}

impl MerkleTree {
    /// Build the tree over already-hashed leaves
    pub fn from_leaves(hasher: &LimbHasher, leaves: Vec<Fp>) -> Result<Self> {
        if leaves.is_empty() {
            return Err(InputError::EmptyGroup);
        }
        let mut levels: Vec<Vec<Fp>> = vec![leaves];
        while levels[levels.len() - 1].len() > 1 {
            let current: &Vec<Fp> = &levels[levels.len() - 1];
            let next: Vec<Fp> = current
                .chunks(2)
                .map(|pair| {
                    let right: &Fp = pair.get(1).unwrap_or(&pair[0]);
                    hasher.hash_node(&pair[0], right)
                })
                .collect();
            levels.push(next);
        }
        Ok(MerkleTree { levels })
    }

    /// Hash every key of the set and build the tree
    pub fn from_keys(hasher: &LimbHasher, keys: &[LimbSequence]) -> Result<Self> {
        let leaves: Vec<Fp> = keys
            .iter()
            .map(|key| hasher.hash_limbs(key))
            .collect::<Result<Vec<Fp>>>()?;
        Self::from_leaves(hasher, leaves)
    }

    /// Root of the tree
    pub fn root(&self) -> Fp {
        self.levels[self.levels.len() - 1][0]
    }

    /// Leaf hashes in set order
    pub fn leaves(&self) -> &[Fp] {
        &self.levels[0]
    }

    /// Number of levels above the leaves
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Sibling path and direction bits for leaf `index`
    pub fn proof(&self, index: usize) -> Result<MerkleProof> {
        let n_leaves: usize = self.levels[0].len();
        if index >= n_leaves {
            return Err(InputError::LeafOutOfRange {
                index,
                leaves: n_leaves,
            });
        }
        let mut siblings: Vec<Fp> = Vec::with_capacity(self.depth());
        let mut directions: Vec<bool> = Vec::with_capacity(self.depth());
        let mut position: usize = index;
        for level in &self.levels[..self.depth()] {
            let is_right: bool = position % 2 == 1;
            let sibling: Fp = if is_right {
                level[position - 1]
            } else {
                // an unpaired last node is its own sibling
                *level.get(position + 1).unwrap_or(&level[position])
            };
            siblings.push(sibling);
            directions.push(is_right);
            position /= 2;
        }
        Ok(MerkleProof {
            leaf_index: index,
            siblings,
            directions,
        })
    }
}

/// Recompute the root from `leaf` and `proof`
pub fn verify_proof(hasher: &LimbHasher, root: &Fp, leaf: &Fp, proof: &MerkleProof) -> bool {
    if proof.siblings.len() != proof.directions.len() {
        return false;
    }
    let computed: Fp = proof
        .siblings
        .iter()
        .zip(&proof.directions)
        .fold(*leaf, |node, (sibling, is_right)| {
            if *is_right {
                hasher.hash_node(sibling, &node)
            } else {
                hasher.hash_node(&node, sibling)
            }
        });
    computed == *root
}
