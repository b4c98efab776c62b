// §4.7 key confirmation: the optional Step 3A/3B handshake. Either side may
// run 3A or 3B first, or skip the pair entirely — nothing else in the
// protocol depends on reaching `S3aOk`/`Confirmed`.

use log::error;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::EcJpakeError;
use crate::session::{Phase, Session};
use crate::step::{Step3a, Step3b};

fn hk(key: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([0x03]);
    hasher.update(key);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

fn hhk(hk: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update([0x04]);
    hasher.update(hk);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

impl Session {
    fn require_key(&self) -> Result<&[u8; 32], EcJpakeError> {
        self.require_not_failed()?;
        self.key.as_ref().ok_or(EcJpakeError::WrongPhase)
    }

    /// Emits `HHk = SHA256(0x04 ∥ SHA256(0x03 ∥ key))`.
    pub fn step3a_generate(&self) -> Result<Step3a, EcJpakeError> {
        let key = self.require_key()?;
        Ok(Step3a { hhk: hhk(&hk(key)) })
    }

    /// Compares the peer's `HHk` against the locally computed value in
    /// constant time over the full 32 bytes.
    pub fn step3a_process(&mut self, peer: &Step3a) -> Result<(), EcJpakeError> {
        let key = *self.require_key()?;
        let local_hhk = hhk(&hk(&key));
        if local_hhk.ct_eq(&peer.hhk).unwrap_u8() != 1 {
            error!("step3a_process: HHk mismatch, peers derived different keys");
            return Err(self.fail(EcJpakeError::HashOfHashOfKeyMismatch));
        }
        self.phase = Phase::S3aOk;
        Ok(())
    }

    /// Emits `Hk = SHA256(0x03 ∥ key)`.
    pub fn step3b_generate(&self) -> Result<Step3b, EcJpakeError> {
        let key = self.require_key()?;
        Ok(Step3b { hk: hk(key) })
    }

    /// Compares the peer's `Hk` against the locally computed value in
    /// constant time over the full 32 bytes.
    pub fn step3b_process(&mut self, peer: &Step3b) -> Result<(), EcJpakeError> {
        let key = *self.require_key()?;
        let local_hk = hk(&key);
        if local_hk.ct_eq(&peer.hk).unwrap_u8() != 1 {
            error!("step3b_process: Hk mismatch, peers derived different keys");
            return Err(self.fail(EcJpakeError::HashOfKeyMismatch));
        }
        self.phase = Phase::Confirmed;
        Ok(())
    }
}
