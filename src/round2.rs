// Round 2: each party derives a per-handshake generator from the three
// round-1 publics it can see, proves knowledge of a witness over that
// generator, and — on processing the peer's round 2 message — derives the
// shared key (§4.6).

use log::error;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::EcJpakeError;
use crate::point_hash::hash_point;
use crate::session::{Phase, Session};
use crate::step::Step2;
use crate::zkp::Zkp;

impl Session {
    /// §4.5 generate (requires `phase == S1Received`). Forms
    /// `g_a = g_x1 + g_x3 + g_x4`, the witness `t = x2·secret mod q`, and
    /// `a = g_a·t`, then proves knowledge of `t` over `g_a`.
    pub fn step2_generate<R: CryptoRng + RngCore>(&mut self, rng: &mut R) -> Result<Step2, EcJpakeError> {
        self.require_not_failed()?;
        if self.phase != Phase::S1Received {
            return Err(EcJpakeError::WrongPhase);
        }

        let g_x1 = self.state.g_x1.expect("g_x1 set once phase >= S1Received");
        let g_x3 = self.state.g_x3.expect("g_x3 set once phase >= S1Received");
        let g_x4 = self.state.g_x4.expect("g_x4 set once phase >= S1Received");
        let x2 = self.state.x2.expect("x2 set once phase >= S1Received");

        // g_x3/g_x4 are only ever stored by `step1_process` after their ZKP
        // verified against `self.group` (see `Zkp::verify`'s own group
        // check), so every point read out of `self.state` here is
        // guaranteed to share `g_x1`'s group.
        let g_a = g_x1
            .add(&g_x3)
            .and_then(|sum| sum.add(&g_x4))
            .expect("g_x1, g_x3, g_x4 all belong to the session's group");
        if !g_a.is_legal() {
            error!("step2_generate: derived generator G_A is the identity");
            return Err(self.fail(EcJpakeError::GIsNotLegal));
        }

        let t = x2
            .mul(&self.secret)
            .expect("x2 and secret both belong to the session's group");
        if t.is_zero() {
            error!("step2_generate: round-2 witness x2*secret reduced to zero");
            return Err(self.fail(EcJpakeError::ComputeKey));
        }
        let a_mine = g_a
            .mul(&t)
            .expect("g_a and t both belong to the session's group");

        let zkp = Zkp::generate(rng, self.group, &g_a, &t, &a_mine, &self.local_id);

        self.state.g_a = Some(g_a);
        self.phase = Phase::S2Sent;
        Ok(Step2 { gx: a_mine, zkp })
    }

    /// §4.5 process + §4.6 key derivation (requires `phase == S1Received` or
    /// `S2Sent` — this side's own `step2_generate` need not have run first;
    /// only `step1_generate`+`step1_process` are prerequisites, since this
    /// method only reads `x2`/`secret`, not anything `step2_generate` wrote).
    pub fn step2_process(&mut self, peer: &Step2) -> Result<(), EcJpakeError> {
        self.require_not_failed()?;
        if !matches!(self.phase, Phase::S1Received | Phase::S2Sent) {
            return Err(EcJpakeError::WrongPhase);
        }

        let g_x1 = self.state.g_x1.expect("g_x1 set once phase >= S1Received");
        let g_x2 = self.state.g_x2.expect("g_x2 set once phase >= S1Received");
        let g_x3 = self.state.g_x3.expect("g_x3 set once phase >= S1Received");
        let g_x4 = self.state.g_x4.expect("g_x4 set once phase >= S1Received");
        let x2 = self.state.x2.expect("x2 set once phase >= S1Received");

        let g_b = g_x3
            .add(&g_x1)
            .and_then(|sum| sum.add(&g_x2))
            .expect("g_x1, g_x2, g_x3 all belong to the session's group");
        if !g_b.is_legal() {
            error!("step2_process: reconstructed peer generator G_B is the identity");
            return Err(self.fail(EcJpakeError::GIsNotLegal));
        }
        if !peer.gx.is_legal() {
            error!("step2_process: peer's round-2 public is not a legal group element");
            return Err(self.fail(EcJpakeError::GIsNotLegal));
        }

        // `Zkp::verify` rejects `peer.gx` (passed as `big_x`) outright if it
        // belongs to a different group than `self.group`, so every use of
        // `peer.gx` below is guaranteed to share it.
        if peer.zkp.verify(self.group, &g_b, &peer.gx, &self.peer_id).is_err() {
            error!("step2_process: ZKP verification for peer's round-2 witness failed");
            return Err(self.fail(EcJpakeError::VerifyX4sFailed));
        }

        // K = (A_peer - Gx4·(x2·secret))·x2 = G·((x1+x3)·x2·x4·secret)
        let x2_secret = x2
            .mul(&self.secret)
            .expect("x2 and secret both belong to the session's group");
        let k_point = peer
            .gx
            .sub(&g_x4.mul(&x2_secret).expect("g_x4 and x2*secret both belong to the session's group"))
            .and_then(|diff| diff.mul(&x2))
            .expect("peer's verified round-2 public and g_x4/x2 all belong to the session's group");
        if k_point.is_identity() {
            error!("step2_process: derived shared point K is the identity");
            return Err(self.fail(EcJpakeError::ComputeKey));
        }

        let mut hasher = Sha256::new();
        hash_point(&mut hasher, &k_point);
        let digest = hasher.finalize();
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);

        self.state.g_b = Some(g_b);
        self.state.a_peer = Some(peer.gx);
        self.key = Some(key);
        self.phase = Phase::KeyReady;
        Ok(())
    }
}
