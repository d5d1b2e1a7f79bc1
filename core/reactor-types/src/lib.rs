//! Core type definitions for reactor-export.
//!
//! This crate defines the records exchanged with the Reactor API:
//! - Entities (properties, environments, data elements, extensions, rules,
//!   rule components) in their JSON:API shape
//! - Extension packages and the delegate descriptors they declare
//! - Transform rules describing how embedded settings code is extracted
//!
//! Entity settings are double-encoded: the response body is JSON, and the
//! `settings` attribute inside it is a JSON *string*. The first stage is plain
//! deserialization of [`Entity`]; the second is [`Entity::decode_settings`],
//! which reports failures through [`SettingsError`].

mod entity;
mod package;
mod transform;

pub use entity::{Entity, ResourceRef};
pub use package::{
    DelegateDescriptor, DescriptorKind, ExtensionConfiguration, ExtensionPackage, PackageAttributes,
};
pub use transform::{TransformKind, TransformRule};

/// Errors raised while decoding the `settings` attribute of an entity.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("settings must be a JSON-encoded string, found {0}")]
    NotText(&'static str),
}
