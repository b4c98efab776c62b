// Round 1: each party proves knowledge of two freshly drawn secrets `x1`,
// `x2` and exchanges the corresponding publics.

use log::error;
use rand::{CryptoRng, RngCore};

use crate::error::EcJpakeError;
use crate::session::{Phase, Session};
use crate::step::{Step1, StepPart};
use crate::zkp::Zkp;

impl Session {
    /// §4.4 generate. Always starts a fresh handshake on this session: draws
    /// new `x1`, `x2`, clears any round-2/key state from a previous
    /// handshake, and sets the phase to `S1Sent` regardless of where the
    /// session currently is. See DESIGN.md for why `step1_generate` is the
    /// renegotiation entry point rather than a one-shot call.
    pub fn step1_generate<R: CryptoRng + RngCore>(&mut self, rng: &mut R) -> Result<Step1, EcJpakeError> {
        let group = self.group;
        let x1 = group.random_nonzero_scalar(rng);
        let x2 = group.random_nonzero_scalar(rng);
        let g_x1 = group.scalar_base_mult(&x1);
        let g_x2 = group.scalar_base_mult(&x2);

        let generator = group.generator();
        let zkp1 = Zkp::generate(rng, group, &generator, &x1, &g_x1, &self.local_id);
        let zkp2 = Zkp::generate(rng, group, &generator, &x2, &g_x2, &self.local_id);

        self.state.x1 = Some(x1);
        self.state.x2 = Some(x2);
        self.state.g_x1 = Some(g_x1.clone());
        self.state.g_x2 = Some(g_x2.clone());
        self.state.g_x3 = None;
        self.state.g_x4 = None;
        self.state.g_a = None;
        self.state.g_b = None;
        self.state.a_peer = None;
        self.key = None;
        self.phase = Phase::S1Sent;

        Ok(Step1 {
            p1: StepPart { gx: g_x1, zkp: zkp1 },
            p2: StepPart { gx: g_x2, zkp: zkp2 },
        })
    }

    /// §4.4 process. Requires `step1_generate` to have already run this
    /// handshake (`phase == S1Sent`); validates both peer publics are legal
    /// group elements and both ZKPs verify against `G₀` with `peer_id`.
    pub fn step1_process(&mut self, peer: &Step1) -> Result<(), EcJpakeError> {
        self.require_not_failed()?;
        if self.phase != Phase::S1Sent {
            return Err(EcJpakeError::WrongPhase);
        }

        if !peer.p1.gx.is_legal() {
            error!("step1_process: peer's Gx3 is not a legal group element");
            return Err(self.fail(EcJpakeError::GToTheX3IsNotLegal));
        }
        if !peer.p2.gx.is_legal() {
            error!("step1_process: peer's Gx4 is not a legal group element");
            return Err(self.fail(EcJpakeError::GToTheX4IsNotLegal));
        }

        let group = self.group;
        let generator = group.generator();

        if peer.p1.zkp.verify(group, &generator, &peer.p1.gx, &self.peer_id).is_err() {
            error!("step1_process: ZKP verification for x3 failed");
            return Err(self.fail(EcJpakeError::VerifyX3Failed));
        }
        if peer.p2.zkp.verify(group, &generator, &peer.p2.gx, &self.peer_id).is_err() {
            error!("step1_process: ZKP verification for x4 failed");
            return Err(self.fail(EcJpakeError::VerifyX4Failed));
        }

        self.state.g_x3 = Some(peer.p1.gx.clone());
        self.state.g_x4 = Some(peer.p2.gx.clone());
        self.phase = Phase::S1Received;
        Ok(())
    }
}
