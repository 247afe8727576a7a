//! Cryptographic primitives and pipelines.
//!
//! Split between data types (`mpi`), process-wide algorithm oracles
//! (`backend`), and the higher-level pipelines built on top of them
//! (`s2k`, `elgamal`, `seip`).

pub mod backend;
pub mod checksum;
pub mod elgamal;
pub mod mem;
pub mod mpi;
pub mod pkcs1;
pub mod s2k;
pub mod seip;

pub use backend::{Backend, DefaultBackend};
pub use mem::{Protected, SessionKey};
