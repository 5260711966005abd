//! Configuration schema definitions.
//!
//! `PartialPluginConfig` is what callers (and settings files) provide;
//! `PluginConfig` is the fully-populated record produced by
//! [`PluginConfig::merge`] / [`get_defaults`].

use serde::{Deserialize, Serialize};

use crate::render::{RenderOptions, ToHtml};
use crate::routing::RouteDescriptor;

pub const DEFAULT_TYPE: &str = "react";
pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_ELEMENT_SELECTOR: &str = "#isotropy-container";

/// Caller-supplied configuration; any field may be omitted.
///
/// Only the scalar settings can come from a settings file. Routes and the
/// output transform are code and are always supplied programmatically.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPluginConfig {
    #[serde(rename = "type")]
    pub kind: Option<String>,

    #[serde(skip)]
    pub routes: Option<Vec<RouteDescriptor>>,

    pub path: Option<String>,

    pub render_to_static_markup: Option<bool>,

    #[serde(skip)]
    pub to_html: Option<ToHtml>,

    pub element_selector: Option<String>,
}

impl PartialPluginConfig {
    pub fn with_routes(mut self, routes: Vec<RouteDescriptor>) -> Self {
        self.routes = Some(routes);
        self
    }

    pub fn with_to_html(mut self, to_html: ToHtml) -> Self {
        self.to_html = Some(to_html);
        self
    }
}

/// Normalized plugin configuration, owned by one setup call.
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Plugin type name.
    pub kind: String,

    /// Routes to register, in precedence order.
    pub routes: Vec<RouteDescriptor>,

    /// Mount path of the plugin's routes.
    pub path: String,

    /// Render static html without hydration markers.
    pub render_to_static_markup: bool,

    /// Transform applied to rendered markup.
    pub to_html: ToHtml,

    /// DOM selector of the client-side mount point.
    pub element_selector: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            kind: DEFAULT_TYPE.to_string(),
            routes: Vec::new(),
            path: DEFAULT_PATH.to_string(),
            render_to_static_markup: false,
            to_html: ToHtml::identity(),
            element_selector: DEFAULT_ELEMENT_SELECTOR.to_string(),
        }
    }
}

impl PluginConfig {
    /// Merge a partial configuration over a defaults record.
    ///
    /// Each field of `partial` that is present replaces the corresponding
    /// field of `defaults`:
    /// - `kind`, `path`, `element_selector`: taken as given (empty strings included)
    /// - `routes`: taken as given, never inspected here
    /// - `render_to_static_markup`: an explicit `false` is kept
    /// - `to_html`: replaces the defaults' transform
    pub fn merge(partial: PartialPluginConfig, defaults: PluginConfig) -> PluginConfig {
        PluginConfig {
            kind: partial.kind.unwrap_or(defaults.kind),
            routes: partial.routes.unwrap_or(defaults.routes),
            path: partial.path.unwrap_or(defaults.path),
            render_to_static_markup: partial
                .render_to_static_markup
                .unwrap_or(defaults.render_to_static_markup),
            to_html: partial.to_html.unwrap_or(defaults.to_html),
            element_selector: partial.element_selector.unwrap_or(defaults.element_selector),
        }
    }

    /// Render options shared by every component and relay route.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            render_to_static_markup: self.render_to_static_markup,
            to_html: self.to_html.clone(),
            element_selector: self.element_selector.clone(),
        }
    }

    /// Serializable summary of the scalar settings.
    pub fn settings(&self) -> PluginSettings {
        PluginSettings {
            kind: self.kind.clone(),
            path: self.path.clone(),
            render_to_static_markup: self.render_to_static_markup,
            element_selector: self.element_selector.clone(),
            route_count: self.routes.len(),
        }
    }
}

/// Complete a partial configuration with the documented defaults.
pub fn get_defaults(input: PartialPluginConfig) -> PluginConfig {
    PluginConfig::merge(input, PluginConfig::default())
}

/// Scalar view of a [`PluginConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub render_to_static_markup: bool,
    pub element_selector: String,
    pub route_count: usize,
}
