//! Extensions exporter.

use super::{Collection, CollectionReport, ExportContext, Extraction, export_entity};
use crate::error::ExportResult;
use futures::future::join_all;
use reactor_source::collect_all;
use reactor_types::{Entity, ExtensionPackage, TransformRule};

const EXTRACTION: Extraction = Extraction {
    relationship: "extension_package",
    lookup: configuration_transforms,
};

// Extension settings are described by the package's top-level configuration.
fn configuration_transforms<'p>(
    package: &'p ExtensionPackage,
    _entity: &Entity,
) -> ExportResult<Option<&'p [TransformRule]>> {
    Ok(package.configuration_transforms())
}

/// Exports every installed extension of the property.
pub async fn export(ctx: &ExportContext<'_>) -> ExportResult<CollectionReport> {
    let collection = Collection::Extensions;
    let dir = ctx.prepare(collection).await?;

    let extensions = collect_all(ctx.page_size, move |page| {
        ctx.source.list_extensions(&ctx.property_id, page)
    })
    .await?;

    let results = join_all(
        extensions
            .iter()
            .map(|extension| export_entity(ctx, &dir, extension, Some(EXTRACTION))),
    )
    .await;

    Ok(CollectionReport::tally(collection, &extensions, results))
}
