//! Export engine for Reactor properties.
//!
//! Downloads a property and its collections from a [`RemoteSource`] and
//! writes them to a local file tree that is easy to browse and diff:
//!
//! ```text
//! <output>/
//!   _<property name> -> <propertyId>
//!   <propertyId>/
//!     data.json
//!     environments/ data_elements/ extensions/ rules/ rule_components/
//!       <id>/data.json
//!       <id>/settings.json
//!       <id>/settings.<propertyPath>.js
//!       _<name> -> <id>
//!     rules/<ruleId>/rule_components/<id> -> ../../../rule_components/<id>
//! ```
//!
//! # Example
//!
//! ```no_run
//! use reactor_export::{ExportOptions, export_property};
//! use reactor_source::{ReactorClient, ReactorConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReactorClient::new(ReactorConfig {
//!     access_token: "token".to_string(),
//!     api_key: "key".to_string(),
//!     ..Default::default()
//! })?;
//! let summary = export_property(&client, "PR123", ExportOptions::new("./export")).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```
//!
//! The engine runs inside the caller's task and never spawns. Entities of a
//! collection, and the five collections themselves, are processed
//! concurrently through joined futures.

pub mod error;
pub mod exporters;
pub mod layout;
pub mod packages;
pub mod property;
pub mod transform;

pub use error::{ExportError, ExportResult};
pub use exporters::{Collection, CollectionReport, ExportContext};
pub use layout::ExportNode;
pub use packages::PackageCache;
pub use property::{ExportOptions, ExportSummary, PropertyExporter, export_property};

pub use reactor_source::RemoteSource;
