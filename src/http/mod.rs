//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, base path)
//!     → router.rs (axum matching, argument extraction)
//!     → RouteHandler (plain handler or render delegation)
//!     → response.rs (handler failures → 500)
//!     → Send to client
//! ```

pub mod response;
pub mod router;
pub mod server;

pub use router::AxumRouter;
pub use server::PluginServer;
