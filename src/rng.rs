use std::collections::HashMap;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic RNG split into named streams so that adding a consumer
/// never perturbs the draws seen by an existing one.
pub struct RngManager {
    master_seed: u64,
    streams: HashMap<String, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_seed: seed,
            streams: HashMap::new(),
        }
    }

    /// Borrow the stream for `name`, creating it on first use. Stream seeds
    /// mix the master seed with the name, so creation order is irrelevant.
    pub fn stream(&mut self, name: &str) -> StreamRng<'_> {
        let seed = derive_seed(self.master_seed, name);
        let entry = self
            .streams
            .entry(name.to_string())
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(seed));
        StreamRng { inner: entry }
    }
}

fn derive_seed(master: u64, name: &str) -> u64 {
    let mut seed = master;
    for byte in name.bytes() {
        seed ^= byte as u64;
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
    }
    seed
}

pub struct StreamRng<'a> {
    inner: &'a mut ChaCha8Rng,
}

impl RngCore for StreamRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_draws() {
        let mut a = RngManager::new(7);
        let mut b = RngManager::new(7);
        let xa: f64 = a.stream("pipes").gen_range(50.0..450.0);
        let xb: f64 = b.stream("pipes").gen_range(50.0..450.0);
        assert_eq!(xa, xb);
    }

    #[test]
    fn streams_are_independent() {
        let mut a = RngManager::new(7);
        let first: u64 = a.stream("pipes").gen();

        // Touching another stream first must not shift the pipes stream.
        let mut b = RngManager::new(7);
        let _: u64 = b.stream("other").gen();
        let second: u64 = b.stream("pipes").gen();
        assert_eq!(first, second);
    }

    #[test]
    fn stream_state_persists() {
        let mut a = RngManager::new(7);
        let x: u64 = a.stream("pipes").gen();
        let y: u64 = a.stream("pipes").gen();
        assert_ne!(x, y);
    }
}
