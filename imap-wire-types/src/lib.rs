//! Data structures for the IMAP4rev1 wire protocol and its extensions.
//!
//! This crate is pure data: validating constructors and accessors, no parsing or encoding logic
//! and no I/O. See the `imap-wire` crate for the incremental parser, encoder, and client state
//! machine built on top of these types.

#![deny(missing_debug_implementations)]

pub mod auth;
pub mod body;
pub mod command;
pub mod core;
pub mod datetime;
pub mod envelope;
pub mod error;
pub mod extensions;
pub mod fetch;
pub mod flag;
pub mod mailbox;
pub mod response;
pub mod search;
pub mod secret;
pub mod sequence;
pub mod state;
pub mod status;
mod utf7;
pub mod utils;
