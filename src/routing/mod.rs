//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Translation (at setup):
//!     RouteDescriptor[]
//!     → descriptor.rs (classify: handler | react | relay)
//!     → translator.rs (build one registration per route, input order)
//!     → registration.rs (RouterRegistration[])
//!     → RouterHandle::add (single batch)
//!
//! At request time (owned by the router):
//!     matched request + args → RouteHandler → RenderAdapter
//! ```
//!
//! # Design Decisions
//! - Whole list translated before the router sees anything (no partial registration)
//! - Registration order equals input order
//! - Pattern matching belongs to the router, not to this subsystem

pub mod descriptor;
pub mod registration;
pub mod translator;

pub use descriptor::{AppRoute, ConfigurationError, RouteDescriptor, RouteKind};
pub use registration::{
    handler_fn, HandlerError, RegistrationKind, RouteArgs, RouteArgsMap, RouteHandler,
    RouteOptions, RouterError, RouterHandle, RouterRegistration,
};
pub use translator::translate;
