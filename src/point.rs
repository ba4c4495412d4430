//! L2: co-Z elliptic curve point arithmetic over short Weierstrass curves
//! `y^2 = x^3 - a*x + b mod p`.
//!
//! Ported from `Naxos.c`'s `doubleU`/`zAddC`/`zAddU`/`scalarMult`, the
//! Goundar-Joye-Miyaji-Rivain co-Z ladder: every rung of the Montgomery
//! ladder carries two points that share a projective `Z`, so the ladder
//! never needs an explicit point-doubling formula beyond the initial
//! `dblu`, and every step costs the same handful of field multiplications
//! regardless of the processed bit.

use crate::catalog::Curve;
use crate::field::{self, Coord};
use zeroize::Zeroize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AffinePoint {
    pub x: Coord,
    pub y: Coord,
}

#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

/// `y^2 == x^3 - a*x + b mod p`.
pub fn on_curve(point: &AffinePoint, curve: &Curve) -> bool {
    let n = curve.wsize;
    let p = &curve.p;

    let x2 = field::mul_mod(&point.x, &point.x, p, n);
    let x3 = field::mul_mod(&x2, &point.x, p, n);
    let ax = field::mul_mod(&curve.a, &point.x, p, n);
    let rhs = field::sub_mod(&x3, &ax, p, n);
    let rhs = field::add_mod(&rhs, &curve.b, p, n);

    let lhs = field::mul_mod(&point.y, &point.y, p, n);

    field::cmp(&lhs, &rhs, n) == 0
}

/// Initial co-Z doubling: given `P` (implicit `Z = 1`), returns `(2P, P')`
/// where `P'` is `P` re-expressed with the same `Z` as `2P`. Both outputs
/// share that `Z`, which is what lets the ladder's later `zaddc`/`zaddu`
/// steps avoid re-normalizing at every rung.
pub fn dblu(p: &AffinePoint, curve: &Curve) -> (ProjectivePoint, ProjectivePoint) {
    let n = curve.wsize;
    let cp = &curve.p;
    let ca = &curve.a;

    let t1 = p.x;
    let t2 = p.y;

    let t3 = field::mul_mod(&t1, &t1, cp, n); // t3 = B = X1^2
    let t4 = field::double_mod(&t3, cp, n);
    let t4 = field::add_mod(&t4, &t3, cp, n); // t4 = 3B
    let t4 = field::sub_mod(&t4, ca, cp, n); // t4 = M = 3B - a
    let t5 = field::mul_mod(&t2, &t2, cp, n); // t5 = E = Y1^2
    let t6 = field::mul_mod(&t5, &t5, cp, n); // t6 = L = E^2
    let t7 = field::add_mod(&t1, &t5, cp, n); // t7 = X1 + E
    let t7 = field::mul_mod(&t7, &t7, cp, n); // t7 = (X1+E)^2
    let t7 = field::sub_mod(&t7, &t3, cp, n);
    let t7 = field::sub_mod(&t7, &t6, cp, n);
    let t7 = field::double_mod(&t7, cp, n); // t7 = S
    let t3 = field::mul_mod(&t4, &t4, cp, n); // t3 = M^2
    let t8 = field::double_mod(&t7, cp, n); // t8 = 2S
    let t3 = field::sub_mod(&t3, &t8, cp, n); // t3 = X(2P)
    let t8 = field::sub_mod(&t7, &t3, cp, n); // t8 = S - X(2P)
    let t8 = field::mul_mod(&t4, &t8, cp, n); // t8 = M*(S-X(2P))
    let t4 = field::double_mod(&t6, cp, n);
    let t4 = field::double_mod(&t4, cp, n);
    let t4 = field::double_mod(&t4, cp, n); // t4 = 8L
    let t8 = field::sub_mod(&t8, &t4, cp, n); // t8 = Y(2P)
    let t6 = field::double_mod(&t2, cp, n); // t6 = Z(2P) = Z(P') = 2Y1
    let t1 = field::double_mod(&t1, cp, n);
    let t1 = field::double_mod(&t1, cp, n); // t1 = 4X1
    let t1 = field::mul_mod(&t1, &t5, cp, n); // t1 = X(P') = 4X1*E

    let q = ProjectivePoint { x: t3, y: t8, z: t6 };
    let r = ProjectivePoint { x: t1, y: t4, z: t6 };
    let mut t5 = t5;
    let mut t7 = t7;
    t5.zeroize();
    t7.zeroize();
    (q, r)
}

/// Conjugate co-Z addition: given `P`, `Q` sharing a `Z`, returns
/// `(P + Q, P - Q)`, both re-expressed with a new shared `Z`.
pub fn zaddc(p: &ProjectivePoint, q: &ProjectivePoint, curve: &Curve) -> (ProjectivePoint, ProjectivePoint) {
    let n = curve.wsize;
    let cp = &curve.p;

    let t1 = p.x;
    let t2 = p.y;
    let t3 = p.z;
    let t4 = q.x;
    let t5 = q.y;

    let t6 = field::sub_mod(&t1, &t4, cp, n);
    let t3 = field::mul_mod(&t3, &t6, cp, n);
    let t6 = field::mul_mod(&t6, &t6, cp, n);
    let t7 = field::mul_mod(&t1, &t6, cp, n);
    let t6 = field::mul_mod(&t6, &t4, cp, n);
    let t1 = field::add_mod(&t2, &t5, cp, n);
    let t4 = field::mul_mod(&t1, &t1, cp, n);
    let t4 = field::sub_mod(&t4, &t7, cp, n);
    let t4 = field::sub_mod(&t4, &t6, cp, n);
    let t1 = field::sub_mod(&t2, &t5, cp, n);
    let t1 = field::mul_mod(&t1, &t1, cp, n);
    let t1 = field::sub_mod(&t1, &t7, cp, n);
    let t1 = field::sub_mod(&t1, &t6, cp, n);
    let t6 = field::sub_mod(&t6, &t7, cp, n);
    let t6 = field::mul_mod(&t6, &t2, cp, n);
    let t2 = field::sub_mod(&t2, &t5, cp, n);
    let t5 = field::double_mod(&t5, cp, n);
    let t5 = field::add_mod(&t2, &t5, cp, n);
    let t7 = field::sub_mod(&t7, &t4, cp, n);
    let t5 = field::mul_mod(&t5, &t7, cp, n);
    let t5 = field::add_mod(&t5, &t6, cp, n);
    let t7 = field::add_mod(&t4, &t7, cp, n);
    let t7 = field::sub_mod(&t7, &t1, cp, n);
    let t2 = field::mul_mod(&t2, &t7, cp, n);
    let t2 = field::add_mod(&t2, &t6, cp, n);

    let r = ProjectivePoint { x: t1, y: t2, z: t3 };
    let s = ProjectivePoint { x: t4, y: t5, z: t3 };
    let mut t6 = t6;
    let mut t7 = t7;
    t6.zeroize();
    t7.zeroize();
    (r, s)
}

/// Co-Z addition with update: given `P`, `Q` sharing a `Z`, returns
/// `(P + Q, P')` where `P'` is `P` re-expressed with the new shared `Z`.
pub fn zaddu(p: &ProjectivePoint, q: &ProjectivePoint, curve: &Curve) -> (ProjectivePoint, ProjectivePoint) {
    let n = curve.wsize;
    let cp = &curve.p;

    let t1 = p.x;
    let t2 = p.y;
    let t3 = p.z;
    let t4 = q.x;
    let t5 = q.y;

    let t6 = field::sub_mod(&t1, &t4, cp, n);
    let t3 = field::mul_mod(&t3, &t6, cp, n);
    let t6 = field::mul_mod(&t6, &t6, cp, n);
    let t1 = field::mul_mod(&t1, &t6, cp, n);
    let t6 = field::mul_mod(&t6, &t4, cp, n);
    let t5 = field::sub_mod(&t2, &t5, cp, n);
    let t4 = field::mul_mod(&t5, &t5, cp, n);
    let t4 = field::sub_mod(&t4, &t1, cp, n);
    let t4 = field::sub_mod(&t4, &t6, cp, n);
    let t6 = field::sub_mod(&t1, &t6, cp, n);
    let t2 = field::mul_mod(&t2, &t6, cp, n);
    let t6 = field::sub_mod(&t1, &t4, cp, n);
    let t5 = field::mul_mod(&t5, &t6, cp, n);
    let t5 = field::sub_mod(&t5, &t2, cp, n);

    let r = ProjectivePoint { x: t4, y: t5, z: t3 };
    let p2 = ProjectivePoint { x: t1, y: t2, z: t3 };
    let mut t6 = t6;
    t6.zeroize();
    (r, p2)
}

fn proj_to_affine(p: &ProjectivePoint, curve: &Curve) -> AffinePoint {
    let n = curve.wsize;
    let cp = &curve.p;
    let mut d = field::inv_mod(&p.z, cp, n);
    let d2 = field::mul_mod(&d, &d, cp, n);
    let x = field::mul_mod(&d2, &p.x, cp, n);
    let mut d3 = field::mul_mod(&d2, &d, cp, n);
    let y = field::mul_mod(&d3, &p.y, cp, n);
    d.zeroize();
    d3.zeroize();
    AffinePoint { x, y }
}

/// Montgomery-ladder scalar multiplication `k * P`.
///
/// The loop always runs `bitlen(p) - 1` rungs: below the scalar's own bit
/// length (`n`) it advances the real ladder state, above it a same-shape
/// dummy ladder runs over scratch points so the instruction count depends
/// only on the curve, never on `k`'s magnitude — the property `scalar_mult`
/// is required to preserve for any secret `k`.
pub fn scalar_mult(point: &AffinePoint, k: &Coord, curve: &Curve) -> AffinePoint {
    let n_words = curve.wsize;
    let order = field::bitlen(&curve.p, n_words);
    let n = field::bitlen(k, n_words);

    let (mut r1, mut r0) = dblu(point, curve);
    let mut s1 = r1;
    let mut s0 = r0;

    if order >= 2 {
        for i in (0..=order - 2).rev() {
            let b = field::bit(k, i);
            if i < n.saturating_sub(1) {
                if b == 0 {
                    let (sum, diff) = zaddc(&r0, &r1, curve);
                    r1 = sum;
                    r0 = diff;
                    let (s, p2) = zaddu(&r1, &r0, curve);
                    r0 = s;
                    r1 = p2;
                } else {
                    let (sum, diff) = zaddc(&r1, &r0, curve);
                    r0 = sum;
                    r1 = diff;
                    let (s, p2) = zaddu(&r0, &r1, curve);
                    r1 = s;
                    r0 = p2;
                }
            } else if b == 0 {
                let (sum, diff) = zaddc(&s0, &s1, curve);
                s1 = sum;
                s0 = diff;
                let (s, p2) = zaddu(&s1, &s0, curve);
                s0 = s;
                s1 = p2;
            } else {
                let (sum, diff) = zaddc(&s1, &s0, curve);
                s0 = sum;
                s1 = diff;
                let (s, p2) = zaddu(&s0, &s1, curve);
                s1 = s;
                s0 = p2;
            }
        }
    }

    let result = proj_to_affine(&r0, curve);
    r0.x.zeroize();
    r0.y.zeroize();
    r0.z.zeroize();
    r1.x.zeroize();
    r1.y.zeroize();
    r1.z.zeroize();
    s0.x.zeroize();
    s0.y.zeroize();
    s0.z.zeroize();
    s1.x.zeroize();
    s1.y.zeroize();
    s1.z.zeroize();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CurveId;

    #[test]
    fn generator_is_on_curve_for_every_catalog_entry() {
        for id in [CurveId::P192, CurveId::P224, CurveId::P256, CurveId::P384, CurveId::P521] {
            let curve = id.curve();
            assert!(on_curve(&curve.g, &curve), "{id:?} generator off curve");
        }
    }

    #[test]
    fn scalar_mult_by_one_is_identity() {
        for id in [CurveId::P192, CurveId::P224, CurveId::P256, CurveId::P384, CurveId::P521] {
            let curve = id.curve();
            let mut one = field::zero();
            one[0] = 1;
            let g2 = scalar_mult(&curve.g, &one, &curve);
            assert_eq!(g2, curve.g, "{id:?} 1*G != G");
        }
    }

    #[test]
    fn scalar_mult_result_is_on_curve() {
        for id in [CurveId::P192, CurveId::P224, CurveId::P256, CurveId::P384, CurveId::P521] {
            let curve = id.curve();
            let mut k = field::zero();
            k[0] = 12345;
            let p = scalar_mult(&curve.g, &k, &curve);
            assert!(on_curve(&p, &curve), "{id:?} k*G not on curve");
        }
    }

    #[test]
    fn doubling_matches_scalar_mult_by_two() {
        for id in [CurveId::P256, CurveId::P384] {
            let curve = id.curve();
            let mut two = field::zero();
            two[0] = 2;
            let via_scalar = scalar_mult(&curve.g, &two, &curve);
            let (doubled, _) = dblu(&curve.g, &curve);
            let doubled_affine = proj_to_affine(&doubled, &curve);
            assert_eq!(via_scalar, doubled_affine, "{id:?} 2*G mismatch");
        }
    }
}
