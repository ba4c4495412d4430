//! The external hash collaborator, `H(curve, input) -> output`.
//!
//! `Naxos.c` treats hashing as a black box: SHA3-224/256/384 key the
//! session for P-224/256/384, and P-521 uses the identical
//! rate-576/capacity-1024/suffix-0x06 sponge (i.e. SHA3-512's construction)
//! for both its session key (standard 64-byte squeeze) and its
//! hash-to-scalar step (a 66-byte/528-bit squeeze — still within the
//! 72-byte rate, so it costs no second permutation call). `tiny_keccak`'s
//! `Sha3` exposes exactly this: `Hasher::finalize` squeezes into whatever
//! buffer the caller hands it, rather than a type-fixed digest length.

use tiny_keccak::{Hasher as TkHasher, Sha3};

use crate::catalog::CurveId;
use crate::errors::Error;

/// Abstracts the hash primitive so the protocol layer can be tested
/// against a fake collaborator and so a caller could swap in another
/// SHA-3 implementation without touching `naxos.rs`.
pub trait Hasher {
    /// Writes `out.len()` bytes of `H(curve, input)` into `out`.
    fn digest(&self, curve: CurveId, input: &[u8], out: &mut [u8]) -> Result<(), Error>;
}

/// Production [`Hasher`] backed by `tiny_keccak`'s SHA-3 sponge.
#[derive(Default, Clone, Copy)]
pub struct Sha3Hasher;

impl Hasher for Sha3Hasher {
    fn digest(&self, curve: CurveId, input: &[u8], out: &mut [u8]) -> Result<(), Error> {
        let mut hasher = match curve {
            CurveId::P192 => return Err(Error::UnsupportedCurve),
            CurveId::P224 => Sha3::v224(),
            CurveId::P256 => Sha3::v256(),
            CurveId::P384 => Sha3::v384(),
            CurveId::P521 => Sha3::v512(),
        };
        hasher.update(input);
        hasher.finalize(out);
        Ok(())
    }
}
