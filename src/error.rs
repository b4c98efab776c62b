// Translation & adaptation of the EC-J-PAKE C header's (function, reason) error-code table.

use thiserror::Error;

/// The single error type returned by every fallible operation in this crate.
///
/// The original C header pairs a function-site constant with a reason constant
/// (e.g. `ECJPAKE_STEP1_PROCESS` + `VERIFY_X3_FAILED`). Rust's stricter type system
/// and `Result` plumbing already tell the caller which method failed, so the
/// function-site half collapses away and only the reason survives as a variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcJpakeError {
    #[error("peer's public element is not a legal group element")]
    GIsNotLegal,

    #[error("peer's Gx3 is not a legal group element")]
    GToTheX3IsNotLegal,

    #[error("peer's Gx4 is not a legal group element")]
    GToTheX4IsNotLegal,

    #[error("verification of peer's ZKP for x3 failed")]
    VerifyX3Failed,

    #[error("verification of peer's ZKP for x4 failed")]
    VerifyX4Failed,

    #[error("verification of peer's round 2 ZKP failed")]
    VerifyX4sFailed,

    #[error("key confirmation failed: Hk mismatch")]
    HashOfKeyMismatch,

    #[error("key confirmation failed: HHk mismatch")]
    HashOfHashOfKeyMismatch,

    #[error("shared key computation yielded the identity point")]
    ComputeKey,

    #[error("session construction failed: {0}")]
    CtxNew(&'static str),

    #[error("operation invalid for current session phase")]
    WrongPhase,

    #[error("session has already failed a prior operation")]
    Failed,
}
