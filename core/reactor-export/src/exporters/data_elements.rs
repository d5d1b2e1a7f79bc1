//! Data elements exporter.

use super::{
    Collection, CollectionReport, ExportContext, Extraction, descriptor_transforms, export_entity,
};
use crate::error::ExportResult;
use futures::future::join_all;
use reactor_source::collect_all;
use reactor_types::{DescriptorKind, Entity, ExtensionPackage, TransformRule};

const EXTRACTION: Extraction = Extraction {
    relationship: "updated_with_extension_package",
    lookup: data_element_transforms,
};

fn data_element_transforms<'p>(
    package: &'p ExtensionPackage,
    entity: &Entity,
) -> ExportResult<Option<&'p [TransformRule]>> {
    descriptor_transforms(package, entity, Some(DescriptorKind::DataElement))
}

/// Exports every data element of the property, extracting code fields
/// declared by the `data_elements` descriptors of its extension package.
pub async fn export(ctx: &ExportContext<'_>) -> ExportResult<CollectionReport> {
    let collection = Collection::DataElements;
    let dir = ctx.prepare(collection).await?;

    let data_elements = collect_all(ctx.page_size, move |page| {
        ctx.source.list_data_elements(&ctx.property_id, page)
    })
    .await?;

    let results = join_all(
        data_elements
            .iter()
            .map(|element| export_entity(ctx, &dir, element, Some(EXTRACTION))),
    )
    .await;

    Ok(CollectionReport::tally(collection, &data_elements, results))
}
