//! Remote kernel gateway picker.
//!
//! `kgw` discovers kernels on remote Jupyter-style gateways and resolves
//! exactly one live session bound to one kernel process, negotiating
//! credentials interactively when a gateway rejects anonymous access.
//!
//! The crate is a pure orchestration layer. Selection UI, free-text
//! prompting, failure toasts, gateway configuration, the active document,
//! and the HTTP/WebSocket transport are all consumed through traits (see
//! [`ui`] and [`client`]), so embedders decide what those look like.
//! `kgw-client` ships the reference transport.
//!
//! # Flow
//!
//! [`KernelPicker::toggle`] walks gateway selection, spec discovery,
//! session listing and kernel selection to a live connection, with one
//! bounded round of credential negotiation when discovery fails
//! ambiguously (see [`gateway::discover`]).

pub mod client;
pub mod error;
pub mod gateway;
pub mod negotiate;
pub mod picker;
pub mod session;
pub mod ui;

pub use client::*;
pub use error::*;
pub use gateway::*;
pub use negotiate::*;
pub use picker::*;
pub use session::*;
pub use ui::*;
