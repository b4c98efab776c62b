// Curve-agnostic group / point / scalar layer backing the EC-J-PAKE core.
//
// Where the teacher crate's `crypto::ecpoint` module reaches for a single
// generic `ECPoint<C: Curve + CurveArithmetic>` and then fights the trait
// bounds needed to get a `BigInt` on and off of it, this module picks the
// two concrete curves the spec actually names (`P256`, `Secp256k1`) and
// dispatches between them with a plain enum. Half as flexible, all of it
// actually works.

use elliptic_curve::group::ff::{Field, PrimeField};
use elliptic_curve::group::{Curve as _, Group as _};
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use num_bigint_dig::{BigInt, Sign};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

use crate::common::int::ModInt;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("invalid SEC1 point encoding")]
    InvalidEncoding,
    #[error("operands belong to different groups")]
    MismatchedGroup,
}

/// The elliptic curve group a session is pinned to at construction time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    P256,
    Secp256k1,
}

impl Group {
    /// The group order `q`, as a big-endian arbitrary-precision integer.
    ///
    /// Both curves this crate supports are cofactor-1, prime-order curves,
    /// so `q` is also the number of points on the curve.
    pub fn order(&self) -> BigInt {
        let hex = match self {
            Group::P256 => "FFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551",
            Group::Secp256k1 => "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141",
        };
        BigInt::parse_bytes(hex.as_bytes(), 16).expect("hardcoded curve order is valid hex")
    }

    fn mod_int(&self) -> ModInt {
        ModInt::new(self.order())
    }

    /// Reduces an arbitrary-precision integer mod `q`, producing a `Scalar`.
    ///
    /// Used both for the low-entropy password (`BN_bin2bn` + `BN_nnmod` in the
    /// original) and for ZKP challenge hashes, which are computed as plain
    /// SHA-256 digests and then folded into `[0, q-1]`.
    pub fn scalar_from_bigint_mod_q(&self, value: &BigInt) -> Scalar {
        let reduced = self.mod_int().reduce(value);
        Scalar::from_bigint_unchecked(*self, &reduced)
    }

    /// Draws a scalar uniformly from `[1, q-1]`.
    pub fn random_nonzero_scalar<R: CryptoRng + RngCore>(&self, rng: &mut R) -> Scalar {
        loop {
            let candidate = match self {
                Group::P256 => Scalar::P256(p256::Scalar::random(&mut *rng)),
                Group::Secp256k1 => Scalar::K256(k256::Scalar::random(&mut *rng)),
            };
            if !candidate.is_zero() {
                return candidate;
            }
        }
    }

    /// The group generator `G₀`.
    pub fn generator(&self) -> Point {
        match self {
            Group::P256 => Point::P256(p256::ProjectivePoint::GENERATOR),
            Group::Secp256k1 => Point::K256(k256::ProjectivePoint::GENERATOR),
        }
    }

    /// `G₀ · k`.
    pub fn scalar_base_mult(&self, k: &Scalar) -> Point {
        self.generator()
            .mul(k)
            .expect("generator and scalar are both constructed from `self`, so their groups match")
    }
}

/// An element of `Z_q`, tied to a specific `Group`.
///
/// `Debug` deliberately does not print the value: witnesses (`x1`, `x2`,
/// the shared password scalar) live in here, and this type is what
/// `Session` zeroizes on drop.
#[derive(Clone, Copy)]
pub enum Scalar {
    P256(p256::Scalar),
    K256(k256::Scalar),
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Scalar(..)")
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => a == b,
            (Scalar::K256(a), Scalar::K256(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Scalar {}

impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        match self {
            Scalar::P256(s) => {
                let mut bytes = s.to_repr();
                bytes.zeroize();
                *s = p256::Scalar::ZERO;
            }
            Scalar::K256(s) => {
                let mut bytes = s.to_repr();
                bytes.zeroize();
                *s = k256::Scalar::ZERO;
            }
        }
    }
}

impl Scalar {
    pub fn group(&self) -> Group {
        match self {
            Scalar::P256(_) => Group::P256,
            Scalar::K256(_) => Group::Secp256k1,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::P256(s) => bool::from(s.is_zero()),
            Scalar::K256(s) => bool::from(s.is_zero()),
        }
    }

    /// Builds a `Scalar` from a `BigInt` already known to be `< q`.
    fn from_bigint_unchecked(group: Group, value: &BigInt) -> Scalar {
        let mut buf = [0u8; 32];
        let (sign, bytes) = value.to_bytes_be();
        debug_assert_ne!(sign, Sign::Minus, "reduced value must be non-negative");
        let start = 32usize.saturating_sub(bytes.len());
        buf[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(32)..]);
        match group {
            Group::P256 => {
                let repr: p256::FieldBytes = buf.into();
                Scalar::P256(p256::Scalar::from_repr(repr).expect("value reduced mod q is canonical"))
            }
            Group::Secp256k1 => {
                let repr: k256::FieldBytes = buf.into();
                Scalar::K256(k256::Scalar::from_repr(repr).expect("value reduced mod q is canonical"))
            }
        }
    }

    /// The big-endian, fixed-width (32-byte) canonical encoding of this scalar.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        match self {
            Scalar::P256(s) => out.copy_from_slice(&s.to_repr()),
            Scalar::K256(s) => out.copy_from_slice(&s.to_repr()),
        }
        out
    }

    /// Fails with [`GroupError::MismatchedGroup`] rather than panicking when
    /// `other` belongs to a different curve — callers on the peer-data path
    /// (e.g. a received ZKP's `b`) must not be able to crash the process by
    /// supplying a scalar from the wrong group.
    pub fn add(&self, other: &Scalar) -> Result<Scalar, GroupError> {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Ok(Scalar::P256(*a + *b)),
            (Scalar::K256(a), Scalar::K256(b)) => Ok(Scalar::K256(*a + *b)),
            _ => Err(GroupError::MismatchedGroup),
        }
    }

    pub fn sub(&self, other: &Scalar) -> Result<Scalar, GroupError> {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Ok(Scalar::P256(*a - *b)),
            (Scalar::K256(a), Scalar::K256(b)) => Ok(Scalar::K256(*a - *b)),
            _ => Err(GroupError::MismatchedGroup),
        }
    }

    pub fn mul(&self, other: &Scalar) -> Result<Scalar, GroupError> {
        match (self, other) {
            (Scalar::P256(a), Scalar::P256(b)) => Ok(Scalar::P256(*a * *b)),
            (Scalar::K256(a), Scalar::K256(b)) => Ok(Scalar::K256(*a * *b)),
            _ => Err(GroupError::MismatchedGroup),
        }
    }
}

/// A point in the group, guaranteed on-curve by construction (every
/// constructor either comes from curve arithmetic or SEC1 decoding, both of
/// which reject off-curve inputs at the type level).
#[derive(Clone, Copy)]
pub enum Point {
    P256(p256::ProjectivePoint),
    K256(k256::ProjectivePoint),
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Point(")?;
        for byte in self.to_sec1_bytes(true) {
            write!(f, "{:02x}", byte)?;
        }
        f.write_str(")")
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Point::P256(a), Point::P256(b)) => a == b,
            (Point::K256(a), Point::K256(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Point {}

impl Point {
    pub fn group(&self) -> Group {
        match self {
            Point::P256(_) => Group::P256,
            Point::K256(_) => Group::Secp256k1,
        }
    }

    /// A point is "legal" for this protocol iff it is not the identity
    /// element. On-curve-ness is already an invariant of `Point` itself;
    /// both supported curves have cofactor 1, so no separate order check
    /// is needed (see spec §4.1).
    pub fn is_legal(&self) -> bool {
        !self.is_identity()
    }

    pub fn is_identity(&self) -> bool {
        match self {
            Point::P256(p) => bool::from(p.is_identity()),
            Point::K256(p) => bool::from(p.is_identity()),
        }
    }

    /// Fails with [`GroupError::MismatchedGroup`] rather than panicking when
    /// `other` belongs to a different curve. A peer-supplied `Point` (e.g.
    /// `Gx3`/`Gx4`/`A`) can claim any `Group` variant regardless of which
    /// session it's handed to, so this must return `Err`, not crash, when
    /// that claim doesn't match.
    pub fn add(&self, other: &Point) -> Result<Point, GroupError> {
        match (self, other) {
            (Point::P256(a), Point::P256(b)) => Ok(Point::P256(*a + *b)),
            (Point::K256(a), Point::K256(b)) => Ok(Point::K256(*a + *b)),
            _ => Err(GroupError::MismatchedGroup),
        }
    }

    pub fn neg(&self) -> Point {
        match self {
            Point::P256(p) => Point::P256(-*p),
            Point::K256(p) => Point::K256(-*p),
        }
    }

    pub fn sub(&self, other: &Point) -> Result<Point, GroupError> {
        self.add(&other.neg())
    }

    pub fn mul(&self, scalar: &Scalar) -> Result<Point, GroupError> {
        match (self, scalar) {
            (Point::P256(p), Scalar::P256(s)) => Ok(Point::P256(*p * *s)),
            (Point::K256(p), Scalar::K256(s)) => Ok(Point::K256(*p * *s)),
            _ => Err(GroupError::MismatchedGroup),
        }
    }

    /// Fixed-width big-endian affine `(x, y)`, or `None` for the identity
    /// point (which has no affine representation).
    pub fn affine_xy(&self) -> Option<([u8; 32], [u8; 32])> {
        match self {
            Point::P256(p) => {
                let encoded = p.to_affine().to_encoded_point(false);
                let x = encoded.x()?;
                let y = encoded.y()?;
                let mut xb = [0u8; 32];
                let mut yb = [0u8; 32];
                xb.copy_from_slice(x);
                yb.copy_from_slice(y);
                Some((xb, yb))
            }
            Point::K256(p) => {
                let encoded = p.to_affine().to_encoded_point(false);
                let x = encoded.x()?;
                let y = encoded.y()?;
                let mut xb = [0u8; 32];
                let mut yb = [0u8; 32];
                xb.copy_from_slice(x);
                yb.copy_from_slice(y);
                Some((xb, yb))
            }
        }
    }

    /// SEC1 encoding (compressed or uncompressed) for wire transport by the
    /// caller. This crate does not define a framed message format; this is
    /// just the byte-on/byte-off helper the spec's §6 promises.
    pub fn to_sec1_bytes(&self, compress: bool) -> Vec<u8> {
        match self {
            Point::P256(p) => p.to_affine().to_encoded_point(compress).as_bytes().to_vec(),
            Point::K256(p) => p.to_affine().to_encoded_point(compress).as_bytes().to_vec(),
        }
    }

    pub fn from_sec1_bytes(group: Group, bytes: &[u8]) -> Result<Point, GroupError> {
        match group {
            Group::P256 => {
                let encoded = p256::EncodedPoint::from_bytes(bytes).map_err(|_| GroupError::InvalidEncoding)?;
                let affine = p256::AffinePoint::from_encoded_point(&encoded);
                if affine.is_none().into() {
                    return Err(GroupError::InvalidEncoding);
                }
                Ok(Point::P256(affine.unwrap().into()))
            }
            Group::Secp256k1 => {
                let encoded = k256::EncodedPoint::from_bytes(bytes).map_err(|_| GroupError::InvalidEncoding)?;
                let affine = k256::AffinePoint::from_encoded_point(&encoded);
                if affine.is_none().into() {
                    return Err(GroupError::InvalidEncoding);
                }
                Ok(Point::K256(affine.unwrap().into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    #[test]
    fn generator_is_legal_and_identity_is_not() {
        for group in [Group::P256, Group::Secp256k1] {
            assert!(group.generator().is_legal());
            let neg_g = group
                .generator()
                .mul(&group.scalar_from_bigint_mod_q(&(group.order() - BigInt::one())))
                .unwrap();
            let identity = group.generator().add(&neg_g).unwrap();
            assert!(identity.is_identity());
            assert!(!identity.is_legal());
        }
    }

    #[test]
    fn mismatched_group_arithmetic_errors_instead_of_panicking() {
        let p256_point = Group::P256.generator();
        let k256_point = Group::Secp256k1.generator();
        assert_eq!(p256_point.add(&k256_point), Err(GroupError::MismatchedGroup));
        assert_eq!(p256_point.sub(&k256_point), Err(GroupError::MismatchedGroup));

        let mut rng = thread_rng();
        let p256_scalar = Group::P256.random_nonzero_scalar(&mut rng);
        let k256_scalar = Group::Secp256k1.random_nonzero_scalar(&mut rng);
        assert_eq!(p256_point.mul(&k256_scalar), Err(GroupError::MismatchedGroup));
        assert_eq!(p256_scalar.add(&k256_scalar), Err(GroupError::MismatchedGroup));
        assert_eq!(p256_scalar.sub(&k256_scalar), Err(GroupError::MismatchedGroup));
        assert_eq!(p256_scalar.mul(&k256_scalar), Err(GroupError::MismatchedGroup));
    }

    #[test]
    fn random_scalars_are_nonzero_and_differ() {
        let mut rng = thread_rng();
        for group in [Group::P256, Group::Secp256k1] {
            let a = group.random_nonzero_scalar(&mut rng);
            let b = group.random_nonzero_scalar(&mut rng);
            assert!(!a.is_zero());
            assert!(!b.is_zero());
            assert_ne!(a, b);
        }
    }

    #[test]
    fn password_reduction_is_deterministic() {
        let group = Group::P256;
        let a = group.scalar_from_bigint_mod_q(&BigInt::from_bytes_be(Sign::Plus, b"hunter2"));
        let b = group.scalar_from_bigint_mod_q(&BigInt::from_bytes_be(Sign::Plus, b"hunter2"));
        assert_eq!(a, b);
        let c = group.scalar_from_bigint_mod_q(&BigInt::from_bytes_be(Sign::Plus, b"hunter3"));
        assert_ne!(a, c);
    }

    #[test]
    fn sec1_roundtrip() {
        let mut rng = thread_rng();
        for group in [Group::P256, Group::Secp256k1] {
            let x = group.random_nonzero_scalar(&mut rng);
            let p = group.scalar_base_mult(&x);
            let bytes = p.to_sec1_bytes(true);
            let p2 = Point::from_sec1_bytes(group, &bytes).unwrap();
            assert_eq!(p, p2);
        }
    }

    #[test]
    fn scalar_arithmetic_matches_point_arithmetic() {
        let mut rng = thread_rng();
        let group = Group::Secp256k1;
        let a = group.random_nonzero_scalar(&mut rng);
        let b = group.random_nonzero_scalar(&mut rng);
        let sum = a.add(&b).unwrap();
        let lhs = group.scalar_base_mult(&sum);
        let rhs = group.scalar_base_mult(&a).add(&group.scalar_base_mult(&b)).unwrap();
        assert_eq!(lhs, rhs);
    }
}
