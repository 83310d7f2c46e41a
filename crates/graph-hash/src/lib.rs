//! Commit identity for the gitgraph lane-layout engine.
//!
//! This crate provides the 20-byte `CommitId` value type and the hex
//! encoding/decoding used to construct and display it. Every id comparison
//! in the workspace is a value comparison of the raw bytes; `CommitId` is
//! `Copy` and a valid hash-map key.

mod commit_id;
mod error;
pub mod hex;

pub use commit_id::CommitId;
pub use error::HashError;
