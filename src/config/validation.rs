//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic checks on settings loaded from disk (serde handles syntax)
//! - Report every problem found, not just the first
//!
//! Programmatic configuration passed to `get_defaults` is not validated;
//! route descriptors are checked later, during setup.

use thiserror::Error;

use crate::config::schema::PartialPluginConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("type must not be empty")]
    EmptyType,

    #[error("path {0:?} must start with '/'")]
    RelativePath(String),

    #[error("element_selector must not be empty")]
    EmptyElementSelector,
}

pub fn validate_settings(settings: &PartialPluginConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if matches!(settings.kind.as_deref(), Some(kind) if kind.trim().is_empty()) {
        errors.push(ValidationError::EmptyType);
    }
    if let Some(path) = &settings.path {
        if !path.starts_with('/') {
            errors.push(ValidationError::RelativePath(path.clone()));
        }
    }
    if matches!(settings.element_selector.as_deref(), Some(s) if s.trim().is_empty()) {
        errors.push(ValidationError::EmptyElementSelector);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
