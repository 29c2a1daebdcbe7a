/// PHash newtype and hash algorithm selection
///
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of bits in every perceptual hash
pub const HASH_BITS: usize = 64;

/// Side length of the square grid the hash bits are read from
pub const HASH_GRID: usize = 8;

/// A 64-bit perceptual hash.
///
/// Bit `i` belongs to the `i`-th value of an 8x8 grid flattened in row-major
/// order, so the value is portable between implementations only as long as that
/// order is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PHash(pub u64);

impl PHash {
    /// Get the underlying 64-bit hash value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Whether bit `index` (row-major position in the 8x8 grid) is set
    pub fn bit(&self, index: usize) -> bool {
        index < HASH_BITS && (self.0 >> index) & 1 == 1
    }
}

impl fmt::Display for PHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PHash {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(PHash)
    }
}

impl From<u64> for PHash {
    fn from(value: u64) -> Self {
        PHash(value)
    }
}

/// The two hash algorithms offered by the library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// Frequency-domain hash over a 32x32 DCT
    Dct,
    /// Spatial hash over an 8x8 thumbnail
    Average,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Dct
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Dct => write!(f, "dct"),
            HashAlgorithm::Average => write!(f, "average"),
        }
    }
}

/// Set bit `i` of the result iff `values[i] > threshold`.
///
/// Only the first 64 values are considered.
pub fn pack_bits(values: &[f64], threshold: f64) -> PHash {
    let mut hash: u64 = 0;

    for (bit_pos, &value) in values.iter().take(HASH_BITS).enumerate() {
        if value > threshold {
            hash |= 1u64 << bit_pos;
        }
    }

    PHash(hash)
}
