//! Incremental parser, encoder, and client state machine for the IMAP4rev1 wire protocol.
//!
//! This crate builds on the pure grammar data model in `imap-wire-types` and adds the three
//! stateful subsystems that drive an actual connection: [`buffer`] (accumulating inbound bytes),
//! [`parse`] (turning those bytes into typed response events), [`encode`] (turning typed commands
//! into wire bytes), and [`client`]/[`pipeline`] (sequencing the two across a real session).

#![deny(missing_debug_implementations)]

pub mod buffer;
pub mod client;
pub mod encode;
pub mod error;
pub mod parse;
pub mod pipeline;
pub mod testing;
pub mod utils;

pub use imap_wire_types;
pub use imap_wire_types as types;
