//! L1: fixed-capacity limb arithmetic mod a curve's prime `p`.
//!
//! A [`Coord`] is a limb array sized for the largest curve in the catalog
//! (P-521); every routine here additionally takes `nwords`, the active limb
//! count for whatever curve is in play, exactly as `Naxos.c`'s `coord*`
//! family does. Limb 0 holds the least-significant 64 bits.
//!
//! Every routine that touches secret-dependent values (anything but `p`
//! itself) computes both branches of a conditional and selects between them
//! with `subtle`'s `ConditionallySelectable`, rather than branching on the
//! data. This replaces the upstream C source's "always touch a dummy
//! buffer" in-place pattern with the idiomatic Rust equivalent: functions
//! that return a fresh [`Coord`] by value (so there is never an output
//! binding that also aliases an input one) and select branchlessly between
//! two freshly computed values.

use subtle::{Choice, ConditionallySelectable};
use zeroize::Zeroize;

/// Limbs needed to hold a P-521 field element (⌈521/64⌉ = 9).
pub const MAX_LIMBS: usize = 9;

/// A fixed-capacity little-endian limb array. Limbs beyond a curve's
/// `wsize` are always zero.
pub type Coord = [u64; MAX_LIMBS];

pub const fn zero() -> Coord {
    [0u64; MAX_LIMBS]
}

fn mask_from(cond: bool) -> Choice {
    Choice::from(cond as u8)
}

/// `a` if `choice` is true, `b` if false, limb by limb, via `subtle`'s
/// `ConditionallySelectable` rather than a hand-rolled mask.
fn select(choice: Choice, a: &Coord, b: &Coord, nwords: usize) -> Coord {
    let mut out = zero();
    for i in 0..nwords {
        out[i] = u64::conditional_select(&b[i], &a[i], choice);
    }
    out
}

/// `(a + b, carry)` over `nwords` limbs, no reduction.
fn raw_add(a: &Coord, b: &Coord, nwords: usize) -> (Coord, u64) {
    let mut r = zero();
    let mut carry = 0u64;
    for i in 0..nwords {
        let (s1, o1) = a[i].overflowing_add(b[i]);
        let (s2, o2) = s1.overflowing_add(carry);
        r[i] = s2;
        carry = (o1 as u64) | (o2 as u64);
    }
    (r, carry)
}

/// `(a - b, borrow)` over `nwords` limbs, `borrow == 1` iff `a < b`.
fn raw_sub(a: &Coord, b: &Coord, nwords: usize) -> (Coord, u64) {
    let mut r = zero();
    let mut borrow = 0u64;
    for i in 0..nwords {
        let (s1, o1) = a[i].overflowing_sub(b[i]);
        let (s2, o2) = s1.overflowing_sub(borrow);
        r[i] = s2;
        borrow = (o1 as u64) | (o2 as u64);
    }
    (r, borrow)
}

/// Three-way compare, constant in the number of operations for a given
/// `nwords` regardless of `a`/`b`. Returns -1, 0, or 1.
pub fn cmp(a: &Coord, b: &Coord, nwords: usize) -> i32 {
    let mut still_eq: u64 = 1;
    let mut gt: u64 = 0;
    let mut lt: u64 = 0;
    for i in (0..nwords).rev() {
        still_eq &= (a[i] == b[i]) as u64;
        let undecided = (still_eq == 0) as u64;
        gt |= undecided & ((a[i] > b[i]) as u64) & ((lt == 0) as u64);
        lt |= undecided & ((a[i] < b[i]) as u64) & ((gt == 0) as u64);
    }
    gt as i32 - lt as i32
}

pub fn is_zero(a: &Coord, nwords: usize) -> bool {
    let mut acc = 0u64;
    for i in 0..nwords {
        acc |= a[i];
    }
    acc == 0
}

/// Bit `j` (0 = least significant) of `a`.
pub fn bit(a: &Coord, j: usize) -> u64 {
    (a[j / 64] >> (j % 64)) & 1
}

/// 1 + the index of the highest set bit, or 0 if `a` is all zero.
pub fn bitlen(a: &Coord, nwords: usize) -> usize {
    let mut n: u64 = 0;
    for i in (0..nwords).rev() {
        for j in (0..64).rev() {
            let b = (a[i] >> j) & 1;
            let is_first = b & ((n == 0) as u64);
            let pos = (i as u64) * 64 + j as u64 + 1;
            n |= is_first.wrapping_mul(pos);
        }
    }
    n as usize
}

/// `a >> 1` across `nwords` limbs (no modular reduction — callers only
/// ever halve values already known to be `< p`).
pub fn half(a: &Coord, nwords: usize) -> Coord {
    let mut out = zero();
    for i in 0..nwords - 1 {
        out[i] = (a[i] >> 1) | (a[i + 1] << 63);
    }
    out[nwords - 1] = a[nwords - 1] >> 1;
    out
}

/// `(a + b) / 2 mod p`, used by point-halving steps that are known never
/// to need a further reduction (`a, b < p` implies `a + b < 2p`).
pub fn add_then_half(a: &Coord, b: &Coord, nwords: usize) -> Coord {
    let mut d = zero();
    let mut carry = 0u64;
    for i in 0..nwords {
        let (s1, o1) = a[i].overflowing_add(b[i]);
        let (s2, o2) = s1.overflowing_add(carry);
        d[i] = s2;
        carry = (o1 as u64) | (o2 as u64);
    }
    let mut out = zero();
    for i in 0..nwords - 1 {
        out[i] = (d[i] >> 1) | (d[i + 1] << 63);
    }
    out[nwords - 1] = (d[nwords - 1] >> 1) | (carry << 63);
    out
}

/// `a - p` if `a >= p`, else `a`. Used for values known to sit in `[0,
/// 2p)` — notably a hash digest reinterpreted as an integer — where a
/// single conditional subtraction suffices to land in `[0, p)`, mirroring
/// `Naxos.c`'s `hashAndMod`.
pub fn reduce_once(a: &Coord, p: &Coord, nwords: usize) -> Coord {
    let (diff, borrow) = raw_sub(a, p, nwords);
    select(mask_from(borrow == 0), &diff, a, nwords)
}

pub fn add_mod(a: &Coord, b: &Coord, p: &Coord, nwords: usize) -> Coord {
    let (sum, carry) = raw_add(a, b, nwords);
    let (diff, borrow) = raw_sub(&sum, p, nwords);
    let need_sub = (carry != 0) as u64 | (1 - borrow);
    select(mask_from(need_sub != 0), &diff, &sum, nwords)
}

pub fn sub_mod(a: &Coord, b: &Coord, p: &Coord, nwords: usize) -> Coord {
    let (diff, borrow) = raw_sub(a, b, nwords);
    let (sum, _carry) = raw_add(&diff, p, nwords);
    select(mask_from(borrow != 0), &sum, &diff, nwords)
}

pub fn double_mod(a: &Coord, p: &Coord, nwords: usize) -> Coord {
    let topbit = a[nwords - 1] >> 63;
    let mut shifted = zero();
    for i in (1..nwords).rev() {
        shifted[i] = (a[i] << 1) | (a[i - 1] >> 63);
    }
    shifted[0] = a[0] << 1;
    let (diff, borrow) = raw_sub(&shifted, p, nwords);
    let need_sub = (topbit != 0) as u64 | (1 - borrow);
    select(mask_from(need_sub != 0), &diff, &shifted, nwords)
}

/// Schoolbook bit-at-a-time modular multiplication: scans `b` from its
/// least-significant bit, conditionally accumulating a running doubling of
/// `a` into the result. The accumulate step runs on every iteration
/// regardless of the bit's value; only the branchless select decides
/// whether its output is kept, so the instruction trace does not depend on
/// `b`.
pub fn mul_mod(a: &Coord, b: &Coord, p: &Coord, nwords: usize) -> Coord {
    let mut acc = zero();
    let mut cur = *a;
    for i in 0..nwords {
        for j in 0..64 {
            let bitval = (b[i] >> j) & 1;
            let sum = add_mod(&acc, &cur, p, nwords);
            acc = select(mask_from(bitval != 0), &sum, &acc, nwords);
            cur = double_mod(&cur, p, nwords);
        }
    }
    cur.zeroize();
    acc
}

/// Modular inverse via Fermat's little theorem (`a^(p-2) mod p`), computed
/// with a Montgomery-ladder exponentiation so every bit of the exponent
/// costs one multiply-and-square pair. `p - 2` is curve metadata (public
/// for a given `CurveId`), not secret, so branching on its bits does not
/// leak anything about `a`; we still run a same-shape dummy ladder on the
/// high bits above the exponent's own bit length, mirroring the upstream
/// `coordInvML` scratch registers (there left uninitialized; here seeded
/// from `a` so the dummy chain never reads undefined memory).
pub fn inv_mod(a: &Coord, p: &Coord, nwords: usize) -> Coord {
    let order = bitlen(p, nwords);
    let mut two = zero();
    two[0] = 2;
    let (k, _borrow) = raw_sub(p, &two, nwords);
    let n = bitlen(&k, nwords);

    let mut one = zero();
    one[0] = 1;
    let mut r0 = one;
    let mut r1 = *a;
    let mut f0 = one;
    let mut f1 = *a;

    for i in (0..order).rev() {
        let b = bit(&k, i);
        if i < n {
            if b == 0 {
                let t0 = mul_mod(&r0, &r1, p, nwords);
                let t1 = mul_mod(&r0, &r0, p, nwords);
                r1 = t0;
                r0 = t1;
            } else {
                let t0 = mul_mod(&r0, &r1, p, nwords);
                let t1 = mul_mod(&r1, &r1, p, nwords);
                r0 = t0;
                r1 = t1;
            }
        } else if b == 0 {
            let t0 = mul_mod(&f0, &f1, p, nwords);
            let t1 = mul_mod(&f0, &f0, p, nwords);
            f1 = t0;
            f0 = t1;
        } else {
            let t0 = mul_mod(&f0, &f1, p, nwords);
            let t1 = mul_mod(&f1, &f1, p, nwords);
            f0 = t0;
            f1 = t1;
        }
    }
    r1.zeroize();
    f0.zeroize();
    f1.zeroize();
    r0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_p() -> (Coord, usize) {
        // p = 97 (fits in one limb, small enough to brute-force check)
        let mut p = zero();
        p[0] = 97;
        (p, 1)
    }

    fn c(v: u64) -> Coord {
        let mut x = zero();
        x[0] = v;
        x
    }

    #[test]
    fn add_mod_wraps() {
        let (p, n) = small_p();
        let out = add_mod(&c(90), &c(10), &p, n);
        assert_eq!(out[0], 3); // 100 mod 97
    }

    #[test]
    fn sub_mod_wraps() {
        let (p, n) = small_p();
        let out = sub_mod(&c(5), &c(10), &p, n);
        assert_eq!(out[0], 92); // 5 - 10 + 97
    }

    #[test]
    fn double_mod_matches_add() {
        let (p, n) = small_p();
        let viaadd = add_mod(&c(61), &c(61), &p, n);
        let viadbl = double_mod(&c(61), &p, n);
        assert_eq!(viaadd, viadbl);
    }

    #[test]
    fn mul_mod_small() {
        let (p, n) = small_p();
        let out = mul_mod(&c(13), &c(11), &p, n);
        assert_eq!(out[0], (13 * 11) % 97);
    }

    #[test]
    fn inv_mod_round_trips() {
        let (p, n) = small_p();
        for v in 1u64..97 {
            let inv = inv_mod(&c(v), &p, n);
            let prod = mul_mod(&c(v), &inv, &p, n);
            assert_eq!(prod[0], 1, "{v} * inv({v}) != 1 mod 97");
        }
    }

    #[test]
    fn cmp_orders_correctly() {
        assert_eq!(cmp(&c(5), &c(10), 1), -1);
        assert_eq!(cmp(&c(10), &c(5), 1), 1);
        assert_eq!(cmp(&c(7), &c(7), 1), 0);
    }

    #[test]
    fn bitlen_and_bit() {
        let x = c(0b1011);
        assert_eq!(bitlen(&x, 1), 4);
        assert_eq!(bit(&x, 0), 1);
        assert_eq!(bit(&x, 1), 1);
        assert_eq!(bit(&x, 2), 0);
        assert_eq!(bit(&x, 3), 1);
    }

    #[test]
    fn add_then_half_matches_manual() {
        let out = add_then_half(&c(10), &c(20), 1);
        assert_eq!(out[0], 15);
    }

    #[test]
    fn reduce_once_subtracts_when_needed() {
        let (p, n) = small_p();
        assert_eq!(reduce_once(&c(120), &p, n)[0], 23);
        assert_eq!(reduce_once(&c(50), &p, n)[0], 50);
    }
}
