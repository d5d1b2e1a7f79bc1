//! Property export orchestration.

use crate::error::{ExportError, ExportResult};
use crate::exporters::{
    CollectionReport, ExportContext, data_elements, environments, extensions, rule_components,
    rules,
};
use crate::layout::{self, DATA_FILE};
use reactor_source::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, RemoteSource};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options of an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportOptions {
    /// Directory the property tree is written below.
    pub output_dir: PathBuf,
    /// Entities requested per page, capped at the API maximum.
    pub page_size: u32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ExportOptions {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Result of a successful property export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub property_id: String,
    pub property_dir: PathBuf,
    pub collections: Vec<CollectionReport>,
    /// Distinct extension packages fetched during the run.
    pub packages_fetched: usize,
}

impl ExportSummary {
    /// Entities exported without error, across all collections.
    pub fn exported(&self) -> usize {
        self.collections.iter().map(|c| c.exported).sum()
    }

    /// Entities whose export failed part way, across all collections.
    pub fn partial(&self) -> usize {
        self.collections.iter().map(|c| c.partial).sum()
    }

    pub fn extracted(&self) -> usize {
        self.collections.iter().map(|c| c.extracted).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.partial() == 0
    }
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Exported property {} to {}",
            self.property_id,
            self.property_dir.display()
        )?;
        for report in &self.collections {
            writeln!(f, "  {report}")?;
        }
        write!(
            f,
            "{} entities exported, {} incomplete, {} files extracted",
            self.exported(),
            self.partial(),
            self.extracted()
        )
    }
}

/// Exports one property and everything below it.
pub struct PropertyExporter<'a> {
    source: &'a dyn RemoteSource,
    options: ExportOptions,
}

impl<'a> PropertyExporter<'a> {
    pub fn new(source: &'a dyn RemoteSource, options: ExportOptions) -> Self {
        Self { source, options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Writes `<output>/<propertyId>/` with its five collections, plus the
    /// alias `<output>/_<name>`.
    ///
    /// A blank property id is rejected before anything is read or written.
    /// A failure to list any collection fails the export; failures on single
    /// entities are reported in the summary instead.
    pub async fn export(&self, property_id: &str) -> ExportResult<ExportSummary> {
        let property_id = property_id.trim();
        if property_id.is_empty() {
            return Err(ExportError::Config("property id is required".to_string()));
        }
        layout::validate_id(property_id)?;

        let output_dir = self.options.output_dir.as_path();
        let property_dir = output_dir.join(property_id);
        layout::ensure_directory(output_dir).await?;
        layout::ensure_node_directory(&property_dir).await?;

        info!(
            source = self.source.source_name(),
            "Downloading property {}", property_id
        );
        let property = self.source.get_property(property_id).await?;

        let alias = output_dir.join(layout::alias_name(&property));
        layout::ensure_link(Path::new(property_id), &alias).await?;
        layout::write_json(&property_dir.join(DATA_FILE), &property).await?;

        let ctx = ExportContext::new(
            self.source,
            property_id,
            &property_dir,
            self.options.effective_page_size(),
        );

        let reports = futures::try_join!(
            environments::export(&ctx),
            data_elements::export(&ctx),
            extensions::export(&ctx),
            rules::export(&ctx),
            rule_components::export(&ctx),
        )?;

        let (environments, data_elements, extensions, rules, rule_components) = reports;
        let summary = ExportSummary {
            property_id: property_id.to_string(),
            property_dir,
            collections: vec![environments, data_elements, extensions, rules, rule_components],
            packages_fetched: ctx.packages.len(),
        };
        info!(
            "Property {} exported: {} entities, {} incomplete",
            summary.property_id,
            summary.exported(),
            summary.partial()
        );
        Ok(summary)
    }
}

/// Exports `property_id` from `source` with `options`.
pub async fn export_property(
    source: &dyn RemoteSource,
    property_id: &str,
    options: ExportOptions,
) -> ExportResult<ExportSummary> {
    PropertyExporter::new(source, options).export(property_id).await
}
