//! Hashing primitives for the Vota governance core.
//!
//! - **Blake2b-256** for general hashing
//! - Content-derived proposal ids over a canonical field encoding

pub mod hash;

pub use hash::{blake2b_256, proposal_id};
