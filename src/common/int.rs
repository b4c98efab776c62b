// Modular-arithmetic helper used to reduce the shared password and ZKP
// challenge hashes mod the group order `q`. Shaped after the teacher
// crate's `common::int::ModInt` (itself a translation of
// tss-lib-go/common/int.go), adapted here for a two-party EC-J-PAKE
// handshake rather than multi-party threshold signing.

use num_bigint_dig::{BigInt, Sign};
use num_traits::{Zero, One, Signed};

/// Represents a modulus for modular arithmetic operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModInt {
    modulus: BigInt,
}

impl ModInt {
    /// Creates a new `ModInt` with the given modulus.
    pub fn new(modulus: BigInt) -> Self {
        // Ensure modulus is positive
        assert!(modulus.sign() == Sign::Plus, "Modulus must be positive");
        ModInt { modulus }
    }

    /// Returns the underlying modulus as a BigInt.
    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    /// Reduces `x` into `[0, modulus)`, matching `BN_nnmod`'s always-non-negative result.
    pub fn reduce(&self, x: &BigInt) -> BigInt {
        x.modpow(&BigInt::one(), &self.modulus)
    }

    /// Performs modular addition: (x + y) % mod.
    pub fn add(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x + y).modpow(&BigInt::one(), &self.modulus)
    }

    /// Performs modular subtraction: (x - y) % mod.
    pub fn sub(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x - y).modpow(&BigInt::one(), &self.modulus)
    }

    /// Performs modular multiplication: (x * y) % mod.
    pub fn mul(&self, x: &BigInt, y: &BigInt) -> BigInt {
        (x * y).modpow(&BigInt::one(), &self.modulus)
    }

    /// Performs modular exponentiation: (base ^ exponent) % mod.
    pub fn exp(&self, base: &BigInt, exponent: &BigInt) -> BigInt {
        base.modpow(exponent, &self.modulus)
    }

    /// Calculates the modular multiplicative inverse: (g ^ -1) % mod.
    /// Returns None if the inverse does not exist (i.e., gcd(g, mod) != 1).
    pub fn mod_inverse(&self, g: &BigInt) -> Option<BigInt> {
        // Ensure g is positive for standard mod_inverse, handle negative g if necessary
        let g_mod = g.modpow(&BigInt::one(), &self.modulus);
        g_mod.modinv(&self.modulus)
    }

    /// Performs modular division using modular inverse: (x * y^-1) % mod.
    /// Returns None if the inverse of y does not exist.
    /// Note: This implements standard modular division, unlike the Go version's Div which was (x / y) % m.
    pub fn div(&self, x: &BigInt, y: &BigInt) -> Option<BigInt> {
        self.mod_inverse(y).map(|y_inv| self.mul(x, &y_inv))
    }
}

/// Checks if a BigInt `b` is within the interval [0, bound).
/// Equivalent to 0 <= b < bound.
pub fn is_in_interval(b: &BigInt, bound: &BigInt) -> bool {
    !b.is_negative() && b < bound
}

/// Appends the byte representation of a BigInt to an existing byte slice.
/// The BigInt is appended in big-endian byte order.
pub fn append_bigint_to_bytes_slice(initial_bytes: &[u8], appended: &BigInt) -> Vec<u8> {
    let mut result_bytes = Vec::with_capacity(initial_bytes.len() + appended.to_bytes_be().1.len());
    result_bytes.extend_from_slice(initial_bytes);
    result_bytes.extend_from_slice(&appended.to_bytes_be().1);
    result_bytes
}
