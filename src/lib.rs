//! React plugin for isotropy-style hosts.
//!
//! Wires declarative route descriptors (plain handlers, components, and
//! data-fetching containers) into a router's dispatch table and delegates
//! rendering to an injected [`render::RenderAdapter`].
//!
//! ```text
//! PartialPluginConfig ──get_defaults──▶ PluginConfig
//!                                          │
//!                                        setup
//!                                          ▼
//!     RouteDescriptor[] ─classify─▶ AppRoute[] ─translate─▶ RouterRegistration[]
//!                                                              │
//!                                                   RouterHandle::add (one batch)
//! ```

pub mod config;
pub mod http;
pub mod observability;
pub mod plugin;
pub mod render;
pub mod routing;

pub use config::{get_defaults, PartialPluginConfig, PluginConfig};
pub use http::{AxumRouter, PluginServer};
pub use plugin::{setup, Plugin, PluginError, ReactPlugin, RendererContext, PLUGIN_NAME};
pub use render::{ComponentRef, RenderAdapter, RenderOptions, ToHtml};
pub use routing::{RouteDescriptor, RouterHandle, RouterRegistration};
