//! Constant-time NAXOS authenticated key exchange over NIST prime-field
//! curves.
//!
//! This crate implements the LaMacchia-Lauter-Mironov NAXOS protocol on
//! top of hand-rolled, branchless big-integer and co-Z elliptic-curve
//! arithmetic (no data-dependent branching on secret limbs, scalars, or
//! coordinates), ported from a reference C implementation. It is laid out
//! in four layers:
//!
//! - [`field`] — L1: fixed-capacity limb arithmetic mod a curve prime.
//! - [`point`] — L2: co-Z point arithmetic and the Montgomery-ladder
//!   scalar multiplication built from it.
//! - [`catalog`] — L3: the NIST P-192/224/256/384/521 parameter tables
//!   and wire encoding.
//! - [`naxos`] — L4: the protocol itself, exposed through [`naxos::Session`].
//!
//! # Example
//!
//! ```
//! use naxos::{CurveId, Session};
//!
//! let session = Session::new(CurveId::P256)?;
//! let alice = session.generate_static_keypair()?;
//! let bob = session.generate_static_keypair()?;
//!
//! let ephemeral_a = session.compute_ephemeral(&alice.sk)?;
//! let ephemeral_b = session.compute_ephemeral(&bob.sk)?;
//!
//! let mut k_a = [0u8; 32];
//! session.derive_initiator(&alice.sk, &bob.pk, &ephemeral_a.h, &ephemeral_b.point, b"alice", b"bob", &mut k_a)?;
//!
//! let mut k_b = [0u8; 32];
//! session.derive_responder(&bob.sk, &alice.pk, &ephemeral_b.h, &ephemeral_a.point, b"alice", b"bob", &mut k_b)?;
//!
//! assert_eq!(k_a, k_b);
//! # Ok::<(), naxos::Error>(())
//! ```
//!
//! # Non-goals
//!
//! This crate performs no network I/O and assumes the caller already
//! authenticated which byte string belongs to which party identifier; it
//! also does not implement a wire framing format, leaving message layout
//! to the caller.

pub mod catalog;
pub mod errors;
pub mod field;
pub mod hash;
pub mod naxos;
pub mod point;

pub use catalog::CurveId;
pub use errors::Error;
pub use naxos::Session;
