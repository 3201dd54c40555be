//! Fixed-width digests shared by fingerprinting, evidence tracking, and
//! the on-disk index.
//!
//! Every digest in this crate is a 128-bit BLAKE3 output, keyed with a
//! domain-separation constant so a grammar or algorithm version bump
//! invalidates old digests instead of silently colliding with them
//! (§4.4's determinism requirement — no host-dependent or pointer-derived
//! bits ever enter a digest).

use serde::{Deserialize, Serialize};

/// Bumped whenever the fingerprinting algorithm or a grammar binding
/// changes in a way that should invalidate previously stored digests.
pub const DIGEST_DOMAIN: &[u8; 32] = b"astrograph-fingerprint-v1------";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 16]);

impl Digest {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let full = blake3::keyed_hash(DIGEST_DOMAIN, bytes);
        let mut out = [0u8; 16];
        out.copy_from_slice(&full.as_bytes()[..16]);
        Digest(out)
    }

    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(32);
        for byte in self.0 {
            s.push_str(&format!("{byte:02x}"));
        }
        s
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Incrementally accumulates bytes into a single domain-separated digest.
/// Used by the bottom-up Merkle hash: each node mixes its label and its
/// already-computed children digests, in order, into one hasher.
pub struct DigestHasher(blake3::Hasher);

impl DigestHasher {
    pub fn new() -> Self {
        DigestHasher(blake3::Hasher::new_keyed(DIGEST_DOMAIN))
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        self.0.update(bytes);
        self
    }

    pub fn finalize(&self) -> Digest {
        let full = self.0.finalize();
        let mut out = [0u8; 16];
        out.copy_from_slice(&full.as_bytes()[..16]);
        Digest(out)
    }
}

impl Default for DigestHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_bytes_same_digest() {
        assert_eq!(Digest::of_bytes(b"hello"), Digest::of_bytes(b"hello"));
    }

    #[test]
    fn different_bytes_different_digest() {
        assert_ne!(Digest::of_bytes(b"hello"), Digest::of_bytes(b"world"));
    }

    #[test]
    fn hasher_matches_incremental_composition() {
        let mut a = DigestHasher::new();
        a.update(b"hello").update(b"world");
        let direct = a.finalize();

        let mut combined = Vec::new();
        combined.extend_from_slice(b"hello");
        combined.extend_from_slice(b"world");

        let mut b = DigestHasher::new();
        b.update(&combined);
        assert_eq!(direct, b.finalize());
    }
}
