// Schnorr-style, Fiat-Shamir zero-knowledge proof of knowledge of a discrete
// logarithm, generalized over the generator it's proved against — the group
// generator for round 1, a derived round-2 generator for round 2. Grounded
// on the teacher crate's `crypto::schnorr::schnorr_proof` (same generate/
// verify/validate_basic shape, `rand::CryptoRng` bound, `thiserror` error
// type) but rewritten against this crate's concrete `Point`/`Scalar` rather
// than chasing generic `ECPoint<C>` trait bounds.

use log::error;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::group::{Group, Point, Scalar};
use crate::point_hash::{hash_length_prefixed_bytes, hash_point};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZkpError {
    #[error("zero-knowledge proof verification failed")]
    VerifyFailed,
}

/// A non-interactive Schnorr proof `(v, b)` of knowledge of `x` such that
/// `big_x = generator · x`, bound to a prover identity via the challenge hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zkp {
    pub v: Point,
    pub b: Scalar,
}

impl Zkp {
    /// §4.3 generation:
    /// 1. `r ∈ [1, q-1]`
    /// 2. `v = generator · r`
    /// 3. `h = SHA256(generator ∥ v ∥ big_x ∥ len(prover_id) ∥ prover_id) mod q`
    /// 4. `b = r - x·h mod q`
    pub fn generate<R: CryptoRng + RngCore>(
        rng: &mut R,
        group: Group,
        generator: &Point,
        x: &Scalar,
        big_x: &Point,
        prover_id: &[u8],
    ) -> Zkp {
        let r = group.random_nonzero_scalar(rng);
        let v = generator
            .mul(&r)
            .expect("generator and the freshly drawn nonce both belong to `group` by construction");
        let h = challenge(group, generator, &v, big_x, prover_id);
        let xh = x
            .mul(&h)
            .expect("witness and challenge both belong to `group` by construction");
        let b = r
            .sub(&xh)
            .expect("nonce and witness*challenge both belong to `group` by construction");
        Zkp { v, b }
    }

    /// §4.3 verification:
    /// 1. `big_x`, `v`, and `b` must belong to `group` — a peer-supplied
    ///    proof can claim any curve regardless of which session it's handed
    ///    to, so this is checked before any arithmetic touches them.
    /// 2. `big_x` and `v` must be legal (on-curve, non-identity).
    /// 3. Recompute `h`.
    /// 4. Accept iff `v == generator·b + big_x·h`.
    pub fn verify(
        &self,
        group: Group,
        generator: &Point,
        big_x: &Point,
        prover_id: &[u8],
    ) -> Result<(), ZkpError> {
        if big_x.group() != group || self.v.group() != group || self.b.group() != group {
            error!("Zkp::verify: public, commitment, or response scalar belongs to a different group");
            return Err(ZkpError::VerifyFailed);
        }
        if !big_x.is_legal() || !self.v.is_legal() {
            error!("Zkp::verify: public or commitment point is not a legal group element");
            return Err(ZkpError::VerifyFailed);
        }
        let h = challenge(group, generator, &self.v, big_x, prover_id);
        let rhs = generator
            .mul(&self.b)
            .and_then(|g_b| big_x.mul(&h).and_then(|big_x_h| g_b.add(&big_x_h)))
            .map_err(|_| {
                error!("Zkp::verify: generator*b + big_x*h could not be computed: mismatched groups");
                ZkpError::VerifyFailed
            })?;
        if self.v == rhs {
            Ok(())
        } else {
            error!("Zkp::verify: commitment does not match generator*b + big_x*h");
            Err(ZkpError::VerifyFailed)
        }
    }
}

fn challenge(group: Group, generator: &Point, v: &Point, big_x: &Point, prover_id: &[u8]) -> Scalar {
    let mut hasher = Sha256::new();
    hash_point(&mut hasher, generator);
    hash_point(&mut hasher, v);
    hash_point(&mut hasher, big_x);
    hash_length_prefixed_bytes(&mut hasher, prover_id);
    let digest = hasher.finalize();
    let h_bigint = num_bigint_dig::BigInt::from_bytes_be(num_bigint_dig::Sign::Plus, &digest);
    group.scalar_from_bigint_mod_q(&h_bigint)
}
