//! L3: the catalog of supported NIST prime-field curves, and the
//! byte <-> limb conversions used at every crate boundary.
//!
//! Constants are transcribed from `Naxos.c`'s `selectCurve`, which stores
//! each curve's parameters most-significant-word-first and reverses them
//! into the working representation at selection time. We store them
//! already reversed: limb 0 is the least-significant word, matching
//! [`crate::field::Coord`].

use crate::field::{self, Coord, MAX_LIMBS};
use crate::point::AffinePoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveId {
    P192,
    P224,
    P256,
    P384,
    P521,
}

impl CurveId {
    /// Bit size of the field prime, i.e. the `NIST_Pxxx` constant upstream.
    pub const fn bsize(self) -> usize {
        match self {
            CurveId::P192 => 192,
            CurveId::P224 => 224,
            CurveId::P256 => 256,
            CurveId::P384 => 384,
            CurveId::P521 => 521,
        }
    }

    /// `⌈bsize / 8⌉`, the fixed wire length of a coordinate or scalar.
    pub const fn byte_len(self) -> usize {
        (self.bsize() + 7) / 8
    }

    /// `⌈bsize / 64⌉`, the active limb count within a [`Coord`].
    pub const fn wsize(self) -> usize {
        (self.bsize() + 63) / 64
    }

    /// Select a curve by its field-prime bit size (192/224/256/384/521).
    /// `None` for any other value.
    pub const fn from_bits(bits: u16) -> Option<CurveId> {
        match bits {
            192 => Some(CurveId::P192),
            224 => Some(CurveId::P224),
            256 => Some(CurveId::P256),
            384 => Some(CurveId::P384),
            521 => Some(CurveId::P521),
            _ => None,
        }
    }

    pub fn curve(self) -> Curve {
        let (p, a, b, gx, gy) = match self {
            CurveId::P192 => (P192_P, P192_A, P192_B, P192_GX, P192_GY),
            CurveId::P224 => (P224_P, P224_A, P224_B, P224_GX, P224_GY),
            CurveId::P256 => (P256_P, P256_A, P256_B, P256_GX, P256_GY),
            CurveId::P384 => (P384_P, P384_A, P384_B, P384_GX, P384_GY),
            CurveId::P521 => (P521_P, P521_A, P521_B, P521_GX, P521_GY),
        };
        Curve {
            id: self,
            bsize: self.bsize(),
            wsize: self.wsize(),
            byte_len: self.byte_len(),
            p,
            a,
            b,
            g: AffinePoint { x: gx, y: gy },
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Curve {
    pub id: CurveId,
    pub bsize: usize,
    pub wsize: usize,
    pub byte_len: usize,
    pub p: Coord,
    pub a: Coord,
    pub b: Coord,
    pub g: AffinePoint,
}

const fn limbs(words: &[u64]) -> Coord {
    let mut out = [0u64; MAX_LIMBS];
    let mut i = 0;
    while i < words.len() {
        out[i] = words[i];
        i += 1;
    }
    out
}

// --- P-192 ---
const P192_P: Coord = limbs(&[0xFFFFFFFFFFFFFFFF, 0xFFFFFFFFFFFFFFFE, 0xFFFFFFFFFFFFFFFF]);
const P192_A: Coord = limbs(&[3, 0, 0]);
const P192_B: Coord = limbs(&[0xfeb8deecc146b9b1, 0x0fa7e9ab72243049, 0x64210519e59c80e7]);
const P192_GX: Coord = limbs(&[0xf4ff0afd82ff1012, 0x7cbf20eb43a18800, 0x188da80eb03090f6]);
const P192_GY: Coord = limbs(&[0x73f977a11e794811, 0x631011ed6b24cdd5, 0x07192b95ffc8da78]);

// --- P-224 ---
const P224_P: Coord = limbs(&[0x0000000000000001, 0xFFFFFFFF00000000, 0xFFFFFFFFFFFFFFFF, 0x00000000FFFFFFFF]);
const P224_A: Coord = limbs(&[3, 0, 0, 0]);
const P224_B: Coord = limbs(&[0x270b39432355ffb4, 0x5044b0b7d7bfd8ba, 0x0c04b3abf5413256, 0x00000000b4050a85]);
const P224_GX: Coord = limbs(&[0x343280d6115c1d21, 0x4a03c1d356c21122, 0x6bb4bf7f321390b9, 0x00000000b70e0cbd]);
const P224_GY: Coord = limbs(&[0x44d5819985007e34, 0xcd4375a05a074764, 0xb5f723fb4c22dfe6, 0x00000000bd376388]);

// --- P-256 ---
const P256_P: Coord = limbs(&[0xFFFFFFFFFFFFFFFF, 0x00000000FFFFFFFF, 0x0000000000000000, 0xFFFFFFFF00000001]);
const P256_A: Coord = limbs(&[3, 0, 0, 0]);
const P256_B: Coord = limbs(&[0x3bce3c3e27d2604b, 0x651d06b0cc53b0f6, 0xb3ebbd55769886bc, 0x5ac635d8aa3a93e7]);
const P256_GX: Coord = limbs(&[0xf4a13945d898c296, 0x77037d812deb33a0, 0xf8bce6e563a440f2, 0x6b17d1f2e12c4247]);
const P256_GY: Coord = limbs(&[0xcbb6406837bf51f5, 0x2bce33576b315ece, 0x8ee7eb4a7c0f9e16, 0x4fe342e2fe1a7f9b]);

// --- P-384 ---
const P384_P: Coord = limbs(&[
    0x00000000FFFFFFFF,
    0xFFFFFFFF00000000,
    0xFFFFFFFFFFFFFFFE,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
]);
const P384_A: Coord = limbs(&[3, 0, 0, 0, 0, 0]);
const P384_B: Coord = limbs(&[
    0x2a85c8edd3ec2aef,
    0xc656398d8a2ed19d,
    0x0314088f5013875a,
    0x181d9c6efe814112,
    0x988e056be3f82d19,
    0xb3312fa7e23ee7e4,
]);
const P384_GX: Coord = limbs(&[
    0x3a545e3872760ab7,
    0x5502f25dbf55296c,
    0x59f741e082542a38,
    0x6e1d3b628ba79b98,
    0x8eb1c71ef320ad74,
    0xaa87ca22be8b0537,
]);
const P384_GY: Coord = limbs(&[
    0x7a431d7c90ea0e5f,
    0x0a60b1ce1d7e819d,
    0xe9da3113b5f0b8c0,
    0xf8f41dbd289a147c,
    0x5d9e98bf9292dc29,
    0x3617de4a96262c6f,
]);

// --- P-521 ---
const P521_P: Coord = limbs(&[
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0xFFFFFFFFFFFFFFFF,
    0x00000000000001FF,
]);
const P521_A: Coord = limbs(&[3, 0, 0, 0, 0, 0, 0, 0, 0]);
const P521_B: Coord = limbs(&[
    0xef451fd46b503f00,
    0x3573df883d2c34f1,
    0x1652c0bd3bb1bf07,
    0x56193951ec7e937b,
    0xb8b489918ef109e1,
    0xa2da725b99b315f3,
    0x929a21a0b68540ee,
    0x953eb9618e1c9a1f,
    0x0000000000000051,
]);
const P521_GX: Coord = limbs(&[
    0xf97e7e31c2e5bd66,
    0x3348b3c1856a429b,
    0xfe1dc127a2ffa8de,
    0xa14b5e77efe75928,
    0xf828af606b4d3dba,
    0x9c648139053fb521,
    0x9e3ecb662395b442,
    0x858e06b70404e9cd,
    0x00000000000000c6,
]);
const P521_GY: Coord = limbs(&[
    0x88be94769fd16650,
    0x353c7086a272c240,
    0xc550b9013fad0761,
    0x97ee72995ef42640,
    0x17afbd17273e662c,
    0x98f54449579b4468,
    0x5c8a5fb42c7d1bd9,
    0x39296a789a3bc004,
    0x0000000000000118,
]);

/// Unpack a little-endian byte slice into a [`Coord`]; limbs beyond the
/// supplied bytes stay zero. Mirrors `Naxos.c`'s `byteToWord`.
pub fn bytes_to_coord(coord: &mut Coord, bytes: &[u8]) {
    *coord = field::zero();
    for (i, &byte) in bytes.iter().enumerate() {
        let limb = i / 8;
        let shift = (i % 8) * 8;
        coord[limb] |= (byte as u64) << shift;
    }
}

/// Pack the low `len` bytes of `coord` into `out`, little-endian. Mirrors
/// `Naxos.c`'s `wordToByte`.
pub fn coord_to_bytes(out: &mut [u8], coord: &Coord, len: usize) {
    for (i, slot) in out.iter_mut().enumerate().take(len) {
        let limb = coord[i / 8];
        let shift = (i % 8) * 8;
        *slot = ((limb >> shift) & 0xFF) as u8;
    }
}

/// Decode an affine point from fixed-length coordinate byte strings,
/// rejecting anything not already reduced mod `p` (callers distinguish
/// "not reduced" from "not on curve" with a further [`crate::point::on_curve`]
/// check). Mirrors `Naxos.c`'s `convBytesToPoint`.
pub fn bytes_to_point(curve: &Curve, x_bytes: &[u8], y_bytes: &[u8]) -> Option<AffinePoint> {
    let mut x = field::zero();
    bytes_to_coord(&mut x, x_bytes);
    let mut y = field::zero();
    bytes_to_coord(&mut y, y_bytes);
    if field::cmp(&x, &curve.p, curve.wsize) != -1 || field::cmp(&y, &curve.p, curve.wsize) != -1 {
        return None;
    }
    Some(AffinePoint { x, y })
}
