//! EC-J-PAKE: elliptic-curve password-authenticated key exchange by
//! juggling. Two parties sharing a low-entropy secret run this exchange
//! over an untrusted channel and derive a high-entropy 256-bit shared key
//! without ever revealing the secret, not even to each other.
//!
//! The happy path:
//!
//! ```
//! use ecjpake::{Group, Session};
//! use rand::thread_rng;
//!
//! let mut rng = thread_rng();
//! let mut alice = Session::open(Group::P256, b"hunter2", b"alice", b"bob").unwrap();
//! let mut bob = Session::open(Group::P256, b"hunter2", b"bob", b"alice").unwrap();
//!
//! let alice_step1 = alice.step1_generate(&mut rng).unwrap();
//! let bob_step1 = bob.step1_generate(&mut rng).unwrap();
//! alice.step1_process(&bob_step1).unwrap();
//! bob.step1_process(&alice_step1).unwrap();
//!
//! let alice_step2 = alice.step2_generate(&mut rng).unwrap();
//! let bob_step2 = bob.step2_generate(&mut rng).unwrap();
//! alice.step2_process(&bob_step2).unwrap();
//! bob.step2_process(&alice_step2).unwrap();
//!
//! assert_eq!(alice.key(), bob.key());
//! ```

pub mod common;
pub mod confirm;
pub mod error;
pub mod group;
pub mod point_hash;
pub mod round1;
pub mod round2;
pub mod session;
pub mod step;
pub mod zkp;

pub use error::EcJpakeError;
pub use group::{Group, GroupError, Point, Scalar};
pub use point_hash::{clear_hash_point_override, default_hash_point, hash_point, set_hash_point, HashPointFn};
pub use session::{Phase, Session};
pub use step::{Step1, Step2, Step3a, Step3b, StepPart};
pub use zkp::{Zkp, ZkpError};
