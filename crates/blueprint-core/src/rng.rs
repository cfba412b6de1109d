//! Deterministic PRNG used by randomized verification.
//!
//! One generator is created per verification run and shared across all of
//! its trials, so trial `n` sees the state left behind by trial `n - 1`.
//! Two runs with the same seed replay the same inputs bit for bit.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// Seed used when a verification run does not pick its own
pub const DEFAULT_VERIFIER_SEED: u64 = 0xDEAD_BEEF;

/// PCG32 generator with a fixed, portable output stream.
#[derive(Debug, Clone)]
pub struct VerifierRng {
    inner: Pcg32,
}

impl Default for VerifierRng {
    fn default() -> Self {
        Self::with_seed(DEFAULT_VERIFIER_SEED)
    }
}

impl VerifierRng {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Uniform integer in `min..=max`
    pub fn int(&mut self, min: i64, max: i64) -> i64 {
        self.gen_range(min..=max)
    }

    /// Uniform length in `min..=max`
    pub fn len(&mut self, min: usize, max: usize) -> usize {
        self.gen_range(min..=max)
    }

    /// `true` with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.gen_bool(p)
    }

    /// Vector of `len` integers, each in `min..=max`
    pub fn ints(&mut self, len: usize, min: i64, max: i64) -> Vec<i64> {
        (0..len).map(|_| self.int(min, max)).collect()
    }

    /// Lowercase word over a small alphabet so collisions are common
    pub fn word(&mut self, min_len: usize, max_len: usize) -> String {
        self.word_from("abcde", min_len, max_len)
    }

    pub fn word_from(&mut self, alphabet: &str, min_len: usize, max_len: usize) -> String {
        let letters: Vec<char> = alphabet.chars().collect();
        let len = self.len(min_len, max_len);
        (0..len)
            .map(|_| letters[self.gen_range(0..letters.len())])
            .collect()
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(self);
    }
}

impl RngCore for VerifierRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = VerifierRng::with_seed(7);
        let mut b = VerifierRng::with_seed(7);
        let xs: Vec<i64> = (0..64).map(|_| a.int(-100, 100)).collect();
        let ys: Vec<i64> = (0..64).map(|_| b.int(-100, 100)).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_different_seed_different_stream() {
        let mut a = VerifierRng::with_seed(1);
        let mut b = VerifierRng::with_seed(2);
        let xs: Vec<u32> = (0..16).map(|_| a.next_u32()).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.next_u32()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn test_stream_matches_pcg32() {
        let mut ours = VerifierRng::with_seed(DEFAULT_VERIFIER_SEED);
        let mut reference = Pcg32::seed_from_u64(DEFAULT_VERIFIER_SEED);
        for _ in 0..32 {
            assert_eq!(ours.next_u32(), reference.next_u32());
        }
        let mut clone = ours.clone();
        assert_eq!(ours.next_u64(), clone.next_u64());
    }

    #[test]
    fn test_int_bounds() {
        let mut rng = VerifierRng::default();
        for _ in 0..500 {
            let v = rng.int(-3, 3);
            assert!((-3..=3).contains(&v));
        }
    }

    #[test]
    fn test_word_alphabet() {
        let mut rng = VerifierRng::default();
        for _ in 0..50 {
            let w = rng.word(0, 6);
            assert!(w.len() <= 6);
            assert!(w.chars().all(|c| "abcde".contains(c)));
        }
    }
}
