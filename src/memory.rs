use std::collections::BTreeSet;
use std::fmt;

/// Sparse bit memory addressed by variable index.
///
/// Only the indices holding a 1 are stored; everything else reads as 0, so
/// the addressable range is unbounded. Serialization (`Display`) writes bits
/// `0..=highest set index` as `'0'`/`'1'` characters, which is the same as
/// writing every touched index and stripping trailing zeros.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    ones: BTreeSet<usize>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed memory from a bit string: `'1'` at position k sets bit k, any
    /// other character leaves it clear.
    pub fn from_bits(seed: &str) -> Self {
        let ones = seed
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == '1')
            .map(|(i, _)| i)
            .collect();
        Self { ones }
    }

    pub fn get(&self, variable: usize) -> bool {
        self.ones.contains(&variable)
    }

    pub fn set(&mut self, variable: usize, bit: bool) {
        if bit {
            self.ones.insert(variable);
        } else {
            self.ones.remove(&variable);
        }
    }

    /// Toggle a bit and return its new value.
    pub fn flip(&mut self, variable: usize) -> bool {
        if self.ones.remove(&variable) {
            false
        } else {
            self.ones.insert(variable);
            true
        }
    }

    pub fn count_ones(&self) -> usize {
        self.ones.len()
    }

    pub fn highest_set(&self) -> Option<usize> {
        self.ones.last().copied()
    }

    pub fn is_zero(&self) -> bool {
        self.ones.is_empty()
    }
}

impl From<&str> for Memory {
    fn from(seed: &str) -> Self {
        Self::from_bits(seed)
    }
}

impl fmt::Display for Memory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(high) = self.highest_set() else {
            return Ok(());
        };
        let mut out = String::with_capacity(high + 1);
        for i in 0..=high {
            out.push(if self.get(i) { '1' } else { '0' });
        }
        f.write_str(&out)
    }
}
