//! Wire and configuration types for Jupyter kernel gateway APIs.
//!
//! This crate contains the serde-serializable shapes exchanged with a kernel
//! gateway over its REST API, plus the connection metadata the picker carries
//! while negotiating access.
//!
//! Types in this crate are:
//! - **Pure data**: no I/O, no behavior beyond (de)serialization and
//!   deterministic URL/header assembly
//! - **1:1 with the gateway**: REST shapes match the gateway's JSON payloads
//!
//! Higher-level flows (discovery, negotiation, session resolution) live in
//! the `kgw` crate.

pub mod kernelspec;
pub mod options;
pub mod session;

pub use kernelspec::*;
pub use options::*;
pub use session::*;
