//! L4: the NAXOS authenticated key exchange protocol.
//!
//! Ported from `Naxos.c`'s `publicKey`/`calculateXY`/`calculateKa`/
//! `calculateKb`. Each party holds a static keypair; for every exchange it
//! additionally draws fresh randomness, binds it to its static secret with
//! a hash (`h = H(raw, sk)`), and publishes `h * G` as its ephemeral
//! public key. The session key folds together three co-computed points so
//! that recovering it requires either party's static secret *and* the
//! matching ephemeral randomness — the core NAXOS security argument.
//!
//! P-192 is fully wired up through [`crate::field`]/[`crate::point`]/
//! [`crate::catalog`], but rejected here with [`Error::UnsupportedCurve`]:
//! the upstream driver (`Example_Naxos.c`) never exercises it at the
//! protocol layer, and its 96-bit security margin is below what this
//! layer is willing to hand out a session key for.

use zeroize::Zeroize;

use crate::catalog::{self, Curve, CurveId};
use crate::errors::Error;
use crate::field::{self, Coord};
use crate::hash::{Hasher, Sha3Hasher};
use crate::point::{self, AffinePoint};

const MAX_EPHEMERAL_RETRIES: usize = 8;

/// The OS-entropy collaborator, wrapped so every draw maps a short or
/// failed read to [`Error::EntropyFailure`] rather than ever falling back
/// to a weaker source.
pub mod entropy {
    use crate::errors::Error;

    /// Fill `buf` with OS-provided random bytes.
    pub fn fill_random(buf: &mut [u8]) -> Result<(), Error> {
        getrandom::getrandom(buf).map_err(|_| Error::EntropyFailure)
    }
}

/// A party's long-term keypair. Zeroized on drop.
pub struct StaticKeyPair {
    pub sk: Coord,
    pub pk: AffinePoint,
}

impl Drop for StaticKeyPair {
    fn drop(&mut self) {
        self.sk.zeroize();
    }
}

/// A party's one-time ephemeral secret (`h`) and the point derived from
/// it (`point = h * G`, the value actually transmitted to the peer). `h`
/// is zeroized on drop; `point` is public and left untouched.
pub struct EphemeralState {
    pub h: Coord,
    pub point: AffinePoint,
}

impl Drop for EphemeralState {
    fn drop(&mut self) {
        self.h.zeroize();
    }
}

fn random_scalar(curve: &Curve) -> Result<Coord, Error> {
    let mut bytes = vec![0u8; curve.byte_len];
    entropy::fill_random(&mut bytes)?;
    let mut raw = field::zero();
    catalog::bytes_to_coord(&mut raw, &bytes);
    bytes.zeroize();
    let reduced = field::reduce_once(&raw, &curve.p, curve.wsize);
    raw.zeroize();
    Ok(reduced)
}

fn hash_mod(curve: &Curve, hasher: &dyn Hasher, input: &[u8]) -> Result<Coord, Error> {
    let mut buf = vec![0u8; curve.byte_len];
    hasher.digest(curve.id, input, &mut buf)?;
    if matches!(curve.id, CurveId::P521) {
        // 528 raw sponge bits truncated to the 521-bit field: mask the
        // top byte (the high-order byte of the little-endian buffer) down
        // to its low bit.
        if let Some(top) = buf.last_mut() {
            *top &= 1;
        }
    }
    let mut raw = field::zero();
    catalog::bytes_to_coord(&mut raw, &buf);
    buf.zeroize();
    let reduced = field::reduce_once(&raw, &curve.p, curve.wsize);
    raw.zeroize();
    Ok(reduced)
}

/// Derive this party's ephemeral exponent `h = H(raw, sk) mod p` and its
/// public point `h * G`, redrawing `raw` if the hash happens to reduce to
/// zero. Returns an [`EphemeralState`]; the raw randomness itself is never
/// returned — once it has been folded into `h` it serves no further
/// purpose and is zeroized immediately.
pub fn compute_ephemeral(curve: &Curve, hasher: &dyn Hasher, sk: &Coord) -> Result<EphemeralState, Error> {
    let mut sk_bytes = vec![0u8; curve.byte_len];
    catalog::coord_to_bytes(&mut sk_bytes, sk, curve.byte_len);

    for _ in 0..MAX_EPHEMERAL_RETRIES {
        let mut raw = random_scalar(curve)?;
        let mut raw_bytes = vec![0u8; curve.byte_len];
        catalog::coord_to_bytes(&mut raw_bytes, &raw, curve.byte_len);
        raw.zeroize();

        let mut input = Vec::with_capacity(2 * curve.byte_len);
        input.extend_from_slice(&raw_bytes);
        input.extend_from_slice(&sk_bytes);
        raw_bytes.zeroize();

        let h = hash_mod(curve, hasher, &input)?;
        input.zeroize();

        if field::is_zero(&h, curve.wsize) {
            continue;
        }
        let point = point::scalar_mult(&curve.g, &h, curve);
        sk_bytes.zeroize();
        return Ok(EphemeralState { h, point });
    }
    sk_bytes.zeroize();
    Err(Error::ZeroHashRetryExhausted)
}

/// Pad `id` with trailing zero bytes out to `curve.byte_len`, the fixed
/// width `Naxos.c`'s `keyC idA`/`idB` buffers are read at. Rejects an
/// identifier longer than that width, since it could no longer be framed
/// unambiguously once concatenated.
fn pad_identifier(id: &[u8], byte_len: usize) -> Result<Vec<u8>, Error> {
    if id.len() > byte_len {
        return Err(Error::IdentifierTooLong);
    }
    let mut padded = vec![0u8; byte_len];
    padded[..id.len()].copy_from_slice(id);
    Ok(padded)
}

fn session_key_from_triple(
    curve: &Curve,
    hasher: &dyn Hasher,
    t1: &AffinePoint,
    t2: &AffinePoint,
    t3: &AffinePoint,
    id_a: &[u8],
    id_b: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    for t in [t1, t2, t3] {
        if !point::on_curve(t, curve) {
            tracing::warn!(curve = ?curve.id, "derived session-key point is off curve");
            return Err(Error::InternalFault);
        }
    }

    let id_a = pad_identifier(id_a, curve.byte_len)?;
    let id_b = pad_identifier(id_b, curve.byte_len)?;

    let mut msg = Vec::with_capacity(5 * curve.byte_len);
    for t in [t1, t2, t3] {
        let mut xb = vec![0u8; curve.byte_len];
        catalog::coord_to_bytes(&mut xb, &t.x, curve.byte_len);
        msg.extend_from_slice(&xb);
        xb.zeroize();
    }
    msg.extend_from_slice(&id_a);
    msg.extend_from_slice(&id_b);
    let result = hasher.digest(curve.id, &msg, out);
    msg.zeroize();
    result
}

/// Initiator side: `K_A = H( Y^skA, pkB^hA, Y^hA, idA, idB )`.
#[allow(clippy::too_many_arguments)]
pub fn derive_session_key_initiator(
    curve: &Curve,
    hasher: &dyn Hasher,
    sk_a: &Coord,
    pk_b: &AffinePoint,
    h_a: &Coord,
    y: &AffinePoint,
    id_a: &[u8],
    id_b: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    let t1 = point::scalar_mult(y, sk_a, curve);
    let t2 = point::scalar_mult(pk_b, h_a, curve);
    let t3 = point::scalar_mult(y, h_a, curve);
    session_key_from_triple(curve, hasher, &t1, &t2, &t3, id_a, id_b, out)
}

/// Responder side: `K_B = H( pkA^hB, X^skB, X^hB, idA, idB )`.
#[allow(clippy::too_many_arguments)]
pub fn derive_session_key_responder(
    curve: &Curve,
    hasher: &dyn Hasher,
    sk_b: &Coord,
    pk_a: &AffinePoint,
    h_b: &Coord,
    x: &AffinePoint,
    id_a: &[u8],
    id_b: &[u8],
    out: &mut [u8],
) -> Result<(), Error> {
    let t1 = point::scalar_mult(pk_a, h_b, curve);
    let t2 = point::scalar_mult(x, sk_b, curve);
    let t3 = point::scalar_mult(x, h_b, curve);
    session_key_from_triple(curve, hasher, &t1, &t2, &t3, id_a, id_b, out)
}

/// A configured NAXOS endpoint for one curve. This is the crate's sole
/// configuration surface: pick a curve, optionally swap in a [`Hasher`],
/// and drive the rest of the exchange through its methods so that peer
/// validation (reduced mod p, on the curve) can never accidentally be
/// skipped by a caller.
pub struct Session<H: Hasher = Sha3Hasher> {
    curve: Curve,
    hasher: H,
}

impl Session<Sha3Hasher> {
    pub fn new(curve_id: CurveId) -> Result<Self, Error> {
        Self::with_hasher(curve_id, Sha3Hasher)
    }
}

impl<H: Hasher> Session<H> {
    pub fn with_hasher(curve_id: CurveId, hasher: H) -> Result<Self, Error> {
        if matches!(curve_id, CurveId::P192) {
            return Err(Error::UnsupportedCurve);
        }
        tracing::debug!(curve = ?curve_id, "naxos session configured");
        Ok(Self { curve: curve_id.curve(), hasher })
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    pub fn generate_static_keypair(&self) -> Result<StaticKeyPair, Error> {
        let sk = random_scalar(&self.curve)?;
        let pk = point::scalar_mult(&self.curve.g, &sk, &self.curve);
        Ok(StaticKeyPair { sk, pk })
    }

    pub fn compute_ephemeral(&self, sk: &Coord) -> Result<EphemeralState, Error> {
        compute_ephemeral(&self.curve, &self.hasher, sk)
    }

    fn decode_peer_point(&self, x: &[u8], y: &[u8], not_reduced: Error, off_curve: Error) -> Result<AffinePoint, Error> {
        let point = catalog::bytes_to_point(&self.curve, x, y).ok_or(not_reduced)?;
        if !point::on_curve(&point, &self.curve) {
            tracing::warn!(curve = ?self.curve.id, "rejected peer point not on curve");
            return Err(off_curve);
        }
        Ok(point)
    }

    /// Validate a peer's long-term public key: coordinates reduced mod
    /// `p`, and the resulting point actually on the curve.
    pub fn decode_peer_static(&self, x: &[u8], y: &[u8]) -> Result<AffinePoint, Error> {
        self.decode_peer_point(x, y, Error::PeerStaticKeyNotReduced, Error::PeerStaticKeyOffCurve)
    }

    /// Validate a peer's per-session ephemeral public key.
    pub fn decode_peer_ephemeral(&self, x: &[u8], y: &[u8]) -> Result<AffinePoint, Error> {
        self.decode_peer_point(x, y, Error::PeerEphemeralNotReduced, Error::PeerEphemeralOffCurve)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn derive_initiator(
        &self,
        sk_a: &Coord,
        pk_b: &AffinePoint,
        h_a: &Coord,
        y: &AffinePoint,
        id_a: &[u8],
        id_b: &[u8],
        out: &mut [u8],
    ) -> Result<(), Error> {
        derive_session_key_initiator(&self.curve, &self.hasher, sk_a, pk_b, h_a, y, id_a, id_b, out)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn derive_responder(
        &self,
        sk_b: &Coord,
        pk_a: &AffinePoint,
        h_b: &Coord,
        x: &AffinePoint,
        id_a: &[u8],
        id_b: &[u8],
        out: &mut [u8],
    ) -> Result<(), Error> {
        derive_session_key_responder(&self.curve, &self.hasher, sk_b, pk_a, h_b, x, id_a, id_b, out)
    }
}

/// Deterministic, explicitly non-production helpers for tests and demos.
///
/// Mirrors `Naxos.c`'s `generateRand`: upstream seeds a libc `rand()` off
/// party identifiers so `Example_Naxos.c` runs reproducibly, which is fine
/// for a demo driver and a real vulnerability in anything else. This path
/// is compiled only for tests or when a caller opts in explicitly.
#[cfg(any(test, feature = "insecure-demo"))]
pub mod demo {
    use super::*;

    /// A small xorshift64 PRNG reduced mod `p`. Not cryptographically
    /// secure; exists only so example code and tests can produce
    /// reproducible ephemeral/static scalars without touching the OS
    /// entropy source.
    pub fn weak_random_mod_p(curve: &Curve, seed: u64) -> Coord {
        let mut state = seed | 1;
        let mut bytes = vec![0u8; curve.byte_len];
        for b in bytes.iter_mut() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            *b = (state & 0xFF) as u8;
        }
        let mut raw = field::zero();
        catalog::bytes_to_coord(&mut raw, &bytes);
        bytes.zeroize();
        let reduced = field::reduce_once(&raw, &curve.p, curve.wsize);
        raw.zeroize();
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demo::weak_random_mod_p;

    fn keypair_from_seed(curve: &Curve, seed: u64) -> StaticKeyPair {
        let sk = weak_random_mod_p(curve, seed);
        let pk = point::scalar_mult(&curve.g, &sk, curve);
        StaticKeyPair { sk, pk }
    }

    fn ephemeral_from_seed(
        curve: &Curve,
        hasher: &dyn Hasher,
        sk: &Coord,
        seed: u64,
    ) -> EphemeralState {
        let raw = weak_random_mod_p(curve, seed);
        let mut raw_bytes = vec![0u8; curve.byte_len];
        catalog::coord_to_bytes(&mut raw_bytes, &raw, curve.byte_len);
        let mut sk_bytes = vec![0u8; curve.byte_len];
        catalog::coord_to_bytes(&mut sk_bytes, sk, curve.byte_len);
        let mut input = raw_bytes.clone();
        input.extend_from_slice(&sk_bytes);
        let h = hash_mod(curve, hasher, &input).unwrap();
        let point = point::scalar_mult(&curve.g, &h, curve);
        EphemeralState { h, point }
    }

    fn run_full_handshake(curve_id: CurveId, key_len: usize) {
        let session = Session::new(curve_id).unwrap();
        let curve = session.curve();

        let a = keypair_from_seed(curve, 0xA11CE);
        let b = keypair_from_seed(curve, 0xB0B0B);

        let ephemeral_a = ephemeral_from_seed(curve, &session.hasher, &a.sk, 0xE1);
        let ephemeral_b = ephemeral_from_seed(curve, &session.hasher, &b.sk, 0xE2);

        let id_a = b"alice";
        let id_b = b"bob";

        let pk_b = session.decode_peer_static(
            &{
                let mut v = vec![0u8; curve.byte_len];
                catalog::coord_to_bytes(&mut v, &b.pk.x, curve.byte_len);
                v
            },
            &{
                let mut v = vec![0u8; curve.byte_len];
                catalog::coord_to_bytes(&mut v, &b.pk.y, curve.byte_len);
                v
            },
        ).unwrap();
        assert_eq!(pk_b, b.pk);

        let mut k_a = vec![0u8; key_len];
        session
            .derive_initiator(&a.sk, &b.pk, &ephemeral_a.h, &ephemeral_b.point, id_a, id_b, &mut k_a)
            .unwrap();

        let mut k_b = vec![0u8; key_len];
        session
            .derive_responder(&b.sk, &a.pk, &ephemeral_b.h, &ephemeral_a.point, id_a, id_b, &mut k_b)
            .unwrap();

        assert_eq!(k_a, k_b, "{curve_id:?} initiator/responder session keys disagree");
    }

    #[test]
    fn p224_handshake_agrees() {
        run_full_handshake(CurveId::P224, 28);
    }

    #[test]
    fn p256_handshake_agrees() {
        run_full_handshake(CurveId::P256, 32);
    }

    #[test]
    fn p384_handshake_agrees() {
        run_full_handshake(CurveId::P384, 48);
    }

    #[test]
    fn p521_handshake_agrees() {
        run_full_handshake(CurveId::P521, 64);
    }

    #[test]
    fn p192_is_rejected_at_session_layer() {
        assert_eq!(Session::new(CurveId::P192).unwrap_err(), Error::UnsupportedCurve);
    }

    #[test]
    fn peer_static_key_not_reduced_is_rejected() {
        let session = Session::new(CurveId::P256).unwrap();
        let curve = session.curve();
        let over_p = vec![0xFFu8; curve.byte_len];
        let err = session.decode_peer_static(&over_p, &over_p).unwrap_err();
        assert_eq!(err, Error::PeerStaticKeyNotReduced);
    }

    #[test]
    fn peer_static_key_off_curve_is_rejected() {
        let session = Session::new(CurveId::P256).unwrap();
        let curve = session.curve();
        let mut xb = vec![0u8; curve.byte_len];
        let mut yb = vec![0u8; curve.byte_len];
        catalog::coord_to_bytes(&mut xb, &curve.g.x, curve.byte_len);
        // Off the curve: reuse X with a Y that is not X's matching root.
        catalog::coord_to_bytes(&mut yb, &curve.g.x, curve.byte_len);
        let err = session.decode_peer_static(&xb, &yb).unwrap_err();
        assert_eq!(err, Error::PeerStaticKeyOffCurve);
    }

    #[test]
    fn tampering_with_ephemeral_breaks_agreement() {
        let session = Session::new(CurveId::P256).unwrap();
        let curve = session.curve();
        let a = keypair_from_seed(curve, 1);
        let b = keypair_from_seed(curve, 2);
        let ephemeral_a = ephemeral_from_seed(curve, &session.hasher, &a.sk, 3);
        let ephemeral_b = ephemeral_from_seed(curve, &session.hasher, &b.sk, 4);
        // A tampered ephemeral point that is still validly on the curve.
        let bogus_y = point::scalar_mult(&curve.g, &weak_random_mod_p(curve, 999), curve);
        assert_ne!(bogus_y, ephemeral_b.point);

        let mut k_a = vec![0u8; 32];
        session
            .derive_initiator(&a.sk, &b.pk, &ephemeral_a.h, &bogus_y, b"a", b"b", &mut k_a)
            .unwrap();

        let mut k_b = vec![0u8; 32];
        session
            .derive_responder(&b.sk, &a.pk, &ephemeral_b.h, &ephemeral_a.point, b"a", b"b", &mut k_b)
            .unwrap();

        assert_ne!(k_a, k_b);
    }

    #[test]
    fn off_curve_triple_point_is_rejected() {
        let session = Session::new(CurveId::P256).unwrap();
        let curve = session.curve();
        let mut off = curve.g;
        off.y = field::zero(); // (Gx, 0) is not a point on P-256
        let mut out = vec![0u8; 32];
        let err = session_key_from_triple(curve, &session.hasher, &off, &curve.g, &curve.g, b"a", b"b", &mut out)
            .unwrap_err();
        assert_eq!(err, Error::InternalFault);
    }

    #[test]
    fn identifier_longer_than_byte_len_is_rejected() {
        let session = Session::new(CurveId::P256).unwrap();
        let curve = session.curve();
        let a = keypair_from_seed(curve, 5);
        let b = keypair_from_seed(curve, 6);
        let ephemeral_a = ephemeral_from_seed(curve, &session.hasher, &a.sk, 7);
        let ephemeral_b = ephemeral_from_seed(curve, &session.hasher, &b.sk, 8);
        let too_long = vec![0u8; curve.byte_len + 1];

        let mut k_a = vec![0u8; 32];
        let err = session
            .derive_initiator(&a.sk, &b.pk, &ephemeral_a.h, &ephemeral_b.point, &too_long, b"b", &mut k_a)
            .unwrap_err();
        assert_eq!(err, Error::IdentifierTooLong);
    }
}
