// The per-handshake context. Owns every point and scalar the protocol
// accumulates, enforces the phase state machine, and zeroizes secret
// material on drop — the idiomatic-Rust replacement for the C header's
// explicit `ECJPAKE_CTX_new`/`_free` pair (see DESIGN.md).

use log::error;
use num_bigint_dig::{BigInt, Sign};
use zeroize::Zeroize;

use crate::error::EcJpakeError;
use crate::group::{Group, Point, Scalar};

/// Where a `Session` is in the handshake. Variants only ever move forward
/// along the documented paths in round1.rs/round2.rs/confirm.rs, except that
/// `step1_generate` can restart a session from any phase (including
/// `Failed`) back to `S1Sent` — see DESIGN.md's resolution of the
/// renegotiation open question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Fresh,
    S1Sent,
    S1Received,
    S2Sent,
    /// Never actually produced: `step2_process` derives the shared key and
    /// jumps straight to `KeyReady` in the same call, matching the header's
    /// own inline `compute_key`. Kept in the enum because §3 of the spec
    /// names it as part of the data model.
    S2Received,
    KeyReady,
    /// Never actually produced either: `step3a_generate` only reads the key
    /// (it takes `&self`), matching spec §4.7's phrasing that only `process`
    /// advances the phase. Kept for the same reason as `S2Received`.
    S3aSent,
    S3aOk,
    Confirmed,
    Failed,
}

pub(crate) struct PartyState {
    pub x1: Option<Scalar>,
    pub x2: Option<Scalar>,
    pub g_x1: Option<Point>,
    pub g_x2: Option<Point>,
    pub g_x3: Option<Point>,
    pub g_x4: Option<Point>,
    pub g_a: Option<Point>,
    pub g_b: Option<Point>,
    pub a_peer: Option<Point>,
}

impl PartyState {
    fn empty() -> Self {
        PartyState {
            x1: None,
            x2: None,
            g_x1: None,
            g_x2: None,
            g_x3: None,
            g_x4: None,
            g_a: None,
            g_b: None,
            a_peer: None,
        }
    }
}

impl Drop for PartyState {
    fn drop(&mut self) {
        if let Some(x1) = self.x1.as_mut() {
            x1.zeroize();
        }
        if let Some(x2) = self.x2.as_mut() {
            x2.zeroize();
        }
    }
}

pub struct Session {
    pub(crate) group: Group,
    pub(crate) phase: Phase,
    pub(crate) secret: Scalar,
    pub(crate) local_id: Vec<u8>,
    pub(crate) peer_id: Vec<u8>,
    pub(crate) state: PartyState,
    pub(crate) key: Option<[u8; 32]>,
}

impl Drop for Session {
    fn drop(&mut self) {
        self.secret.zeroize();
        if let Some(key) = self.key.as_mut() {
            key.zeroize();
        }
    }
}

impl Session {
    /// Opens a new handshake context. Reduces `secret` mod `q` (treating it
    /// as a big-endian arbitrary-precision integer, matching the original's
    /// `BN_bin2bn` + `BN_nnmod`) and rejects a zero result; rejects
    /// `local_id == peer_id`.
    pub fn open(group: Group, secret: &[u8], local_id: &[u8], peer_id: &[u8]) -> Result<Session, EcJpakeError> {
        if local_id == peer_id {
            error!("Session::open: local_id and peer_id must differ");
            return Err(EcJpakeError::CtxNew("local_id must differ from peer_id"));
        }
        let secret_bigint = BigInt::from_bytes_be(Sign::Plus, secret);
        let secret_scalar = group.scalar_from_bigint_mod_q(&secret_bigint);
        if secret_scalar.is_zero() {
            error!("Session::open: secret reduced to zero modulo the group order");
            return Err(EcJpakeError::CtxNew("secret is zero modulo the group order"));
        }
        Ok(Session {
            group,
            phase: Phase::Fresh,
            secret: secret_scalar,
            local_id: local_id.to_vec(),
            peer_id: peer_id.to_vec(),
            state: PartyState::empty(),
            key: None,
        })
    }

    pub fn group(&self) -> Group {
        self.group
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn local_id(&self) -> &[u8] {
        &self.local_id
    }

    pub fn peer_id(&self) -> &[u8] {
        &self.peer_id
    }

    /// The derived shared key, once available. `None` before `step2_process`
    /// has succeeded, or after a fresh `step1_generate` has started a new
    /// handshake on this session.
    pub fn key(&self) -> Option<&[u8; 32]> {
        self.key.as_ref()
    }

    pub(crate) fn require_not_failed(&self) -> Result<(), EcJpakeError> {
        if self.phase == Phase::Failed {
            Err(EcJpakeError::Failed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn fail(&mut self, err: EcJpakeError) -> EcJpakeError {
        error!("session {:?} -> {:?} failed: {}", self.local_id, self.phase, err);
        self.phase = Phase::Failed;
        err
    }
}
