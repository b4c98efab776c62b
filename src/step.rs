// Step payloads: plain owned values produced by `*_generate` and consumed by
// `*_process`. The C header's `STEP*_init`/`release` buffer-reuse pair has
// no counterpart here — see DESIGN.md for why that's a deliberate departure
// rather than an oversight.

use crate::group::Point;
use crate::zkp::Zkp;

/// One half of a `Step1` message: a public point plus the ZKP of its discrete log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepPart {
    pub gx: Point,
    pub zkp: Zkp,
}

/// Round 1 payload: proves knowledge of both `x1` and `x2`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step1 {
    pub p1: StepPart,
    pub p2: StepPart,
}

/// Round 2 payload. The wire shape is identical to a lone `StepPart`; kept
/// as its own name rather than a bare type alias so call sites read as
/// "a Step2", not "a StepPart that happens to be used for round 2".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step2 {
    pub gx: Point,
    pub zkp: Zkp,
}

/// Step 3A: the initiator's confirmation tag, `HHk = SHA256(0x04 ∥ Hk)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step3a {
    pub hhk: [u8; 32],
}

/// Step 3B: the responder's confirmation tag, `Hk = SHA256(0x03 ∥ key)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step3b {
    pub hk: [u8; 32],
}
