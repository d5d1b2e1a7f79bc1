//! Entity exporters, one per collection of a property.
//!
//! Every exporter follows the same pipeline for each entity of its
//! collection:
//!
//! 1. Resolve the node directory and alias ([`layout::resolve`])
//! 2. Write `data.json` with the raw entity
//! 3. Decode `settings` and write `settings.json`
//! 4. Fetch the entity's extension package and extract transformed settings
//!
//! Entities are processed concurrently within the caller's task. A failure on
//! one entity is logged and counted as a partial export; only a failure to
//! list the collection aborts the exporter.

pub mod data_elements;
pub mod environments;
pub mod extensions;
pub mod rule_components;
pub mod rules;

use crate::error::{ExportError, ExportResult};
use crate::layout::{self, DATA_FILE, SETTINGS_FILE};
use crate::packages::PackageCache;
use crate::transform;
use reactor_source::RemoteSource;
use reactor_types::{DescriptorKind, Entity, ExtensionPackage, TransformRule};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The collections exported below a property directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Environments,
    DataElements,
    Extensions,
    Rules,
    RuleComponents,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Environments,
        Collection::DataElements,
        Collection::Extensions,
        Collection::Rules,
        Collection::RuleComponents,
    ];

    /// Directory name below the property directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Environments => "environments",
            Collection::DataElements => "data_elements",
            Collection::Extensions => "extensions",
            Collection::Rules => "rules",
            Collection::RuleComponents => "rule_components",
        }
    }

    /// Human-readable label for logs.
    pub fn label(self) -> &'static str {
        match self {
            Collection::Environments => "Environments",
            Collection::DataElements => "Data Elements",
            Collection::Extensions => "Extensions",
            Collection::Rules => "Rules",
            Collection::RuleComponents => "Rule Components",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared state of one export run.
pub struct ExportContext<'a> {
    pub source: &'a dyn RemoteSource,
    pub property_id: String,
    pub property_dir: PathBuf,
    pub page_size: u32,
    pub packages: PackageCache,
}

impl<'a> ExportContext<'a> {
    pub fn new(
        source: &'a dyn RemoteSource,
        property_id: impl Into<String>,
        property_dir: impl Into<PathBuf>,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            property_id: property_id.into(),
            property_dir: property_dir.into(),
            page_size,
            packages: PackageCache::new(),
        }
    }

    /// Directory of a collection below the property directory.
    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.property_dir.join(collection.dir_name())
    }

    /// Creates the collection directory and announces the download.
    pub(crate) async fn prepare(&self, collection: Collection) -> ExportResult<PathBuf> {
        info!("Downloading {}", collection);
        let dir = self.collection_dir(collection);
        layout::ensure_directory(&dir).await?;
        Ok(dir)
    }
}

/// What one entity's export produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntityOutcome {
    /// Files written by the transform extractor.
    pub extracted: usize,
    /// Cross-links created (rule components only).
    pub links: usize,
}

/// Per-collection result of an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub collection: Collection,
    /// Entities returned by the remote listing.
    pub listed: usize,
    /// Entities exported without error.
    pub exported: usize,
    /// Entities whose export failed part way.
    pub partial: usize,
    /// Transform files written.
    pub extracted: usize,
    /// Cross-links created.
    pub links: usize,
}

impl CollectionReport {
    pub fn new(collection: Collection, listed: usize) -> Self {
        Self {
            collection,
            listed,
            exported: 0,
            partial: 0,
            extracted: 0,
            links: 0,
        }
    }

    /// Counts one entity's result, logging it if it failed.
    pub(crate) fn record(&mut self, entity: &Entity, result: ExportResult<EntityOutcome>) {
        match result {
            Ok(outcome) => {
                self.exported += 1;
                self.extracted += outcome.extracted;
                self.links += outcome.links;
            }
            Err(e) => {
                self.partial += 1;
                warn!(
                    collection = self.collection.dir_name(),
                    entity_id = %entity.id,
                    "Export incomplete: {}",
                    e
                );
            }
        }
    }

    /// Counts the results of `entities`, which must be in the same order.
    pub(crate) fn tally(
        collection: Collection,
        entities: &[Entity],
        results: Vec<ExportResult<EntityOutcome>>,
    ) -> Self {
        let mut report = Self::new(collection, entities.len());
        for (entity, result) in entities.iter().zip(results) {
            report.record(entity, result);
        }
        info!(
            "{}: {} exported, {} incomplete",
            collection, report.exported, report.partial
        );
        report
    }
}

impl fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} exported",
            self.collection, self.exported, self.listed
        )?;
        if self.partial > 0 {
            write!(f, ", {} incomplete", self.partial)?;
        }
        if self.extracted > 0 {
            write!(f, ", {} files extracted", self.extracted)?;
        }
        if self.links > 0 {
            write!(f, ", {} links", self.links)?;
        }
        Ok(())
    }
}

/// Finds the transforms an extension package declares for an entity.
pub(crate) type TransformLookup =
    for<'p> fn(&'p ExtensionPackage, &Entity) -> ExportResult<Option<&'p [TransformRule]>>;

/// How an exporter reaches the transforms of its entities.
#[derive(Clone, Copy)]
pub(crate) struct Extraction {
    /// Relationship naming the extension package.
    pub relationship: &'static str,
    pub lookup: TransformLookup,
}

/// Looks up the entity's delegate descriptor in the `kind` bucket.
pub(crate) fn descriptor_transforms<'p>(
    package: &'p ExtensionPackage,
    entity: &Entity,
    kind: Option<DescriptorKind>,
) -> ExportResult<Option<&'p [TransformRule]>> {
    let descriptor_id = entity.delegate_descriptor_id().unwrap_or_default();
    let descriptor = kind.and_then(|kind| package.find_descriptor(kind, descriptor_id));

    match descriptor {
        Some(descriptor) => Ok(descriptor.transforms.as_deref()),
        None => Err(ExportError::MissingDescriptor {
            entity_id: entity.id.clone(),
            package_id: package.id.clone(),
            descriptor_id: descriptor_id.to_string(),
        }),
    }
}

/// Runs the export pipeline for one entity into `dir`.
pub(crate) async fn export_entity(
    ctx: &ExportContext<'_>,
    dir: &Path,
    entity: &Entity,
    extraction: Option<Extraction>,
) -> ExportResult<EntityOutcome> {
    let node = layout::resolve(dir, entity).await?;
    layout::write_json(&node.node_path.join(DATA_FILE), entity).await?;

    let settings = entity
        .decode_settings()
        .map_err(|source| ExportError::Settings {
            entity_id: entity.id.clone(),
            source,
        })?;
    let Some(settings) = settings else {
        return Ok(EntityOutcome::default());
    };
    layout::write_json(&node.node_path.join(SETTINGS_FILE), &settings).await?;

    let Some(extraction) = extraction else {
        return Ok(EntityOutcome::default());
    };
    let Some(package_ref) = entity.relationship(extraction.relationship) else {
        return Ok(EntityOutcome::default());
    };

    let package = ctx.packages.get(ctx.source, &package_ref.id).await?;
    let extracted = match (extraction.lookup)(&package, entity)? {
        Some(transforms) => transform::apply(transforms, &settings, &node.node_path).await?,
        None => 0,
    };

    Ok(EntityOutcome {
        extracted,
        links: 0,
    })
}
