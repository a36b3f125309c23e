//! Reference gateway transport for the `kgw` picker.
//!
//! [`HttpGateway`] implements the picker's `GatewayClient` trait over the
//! kernel gateway REST API (reqwest) and the kernel channels websocket
//! (tokio-tungstenite). This is the only place transport failures are turned
//! into the picker's `FailureKind` classification; everything above works
//! with classified errors only.
//!
//! Kernel message framing over the channel is out of scope: the session
//! handle holds the raw socket open and closes it on drop.

mod http;
mod session;

pub use http::{DEFAULT_TIMEOUT, HttpGateway};
pub use session::HttpSession;
