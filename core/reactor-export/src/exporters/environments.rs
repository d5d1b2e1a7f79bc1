//! Environments exporter.

use super::{Collection, CollectionReport, ExportContext, export_entity};
use crate::error::ExportResult;
use futures::future::join_all;
use reactor_source::collect_all;

/// Exports every environment of the property. Environments carry no
/// extension package, so nothing is extracted.
pub async fn export(ctx: &ExportContext<'_>) -> ExportResult<CollectionReport> {
    let collection = Collection::Environments;
    let dir = ctx.prepare(collection).await?;

    let environments = collect_all(ctx.page_size, move |page| {
        ctx.source.list_environments(&ctx.property_id, page)
    })
    .await?;

    let results = join_all(
        environments
            .iter()
            .map(|environment| export_entity(ctx, &dir, environment, None)),
    )
    .await;

    Ok(CollectionReport::tally(collection, &environments, results))
}
