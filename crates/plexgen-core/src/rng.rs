//! Seeded randomness for generation calls.
//!
//! Every generator takes an explicit [`RngHandle`]. Work that must not depend on how much
//! randomness its siblings consumed, such as the layers of a multiplex network, runs on a
//! substream whose seed is SipHash-1-3 (zero keys) of the master value and the substream index.

use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use siphasher::sip::SipHasher13;

const SUBSTREAM_DOMAIN: &[u8] = b"plexgen.substream";

/// Random source threaded through every generation call.
#[derive(Debug, Clone)]
pub struct RngHandle {
    seed: u64,
    rng: StdRng,
}

impl RngHandle {
    /// Creates a handle seeded from `seed`.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the handle of `substream` under `master_seed`.
    pub fn substream(master_seed: u64, substream: u64) -> Self {
        Self::from_seed(derive_substream_seed(master_seed, substream))
    }

    /// Returns the seed the handle was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngCore for RngHandle {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}

/// Derives the seed of `substream` under `master_seed`.
pub fn derive_substream_seed(master_seed: u64, substream: u64) -> u64 {
    let mut hasher = SipHasher13::new_with_keys(0, 0);
    hasher.write(SUBSTREAM_DOMAIN);
    hasher.write_u64(master_seed);
    hasher.write_u64(substream);
    hasher.finish()
}
