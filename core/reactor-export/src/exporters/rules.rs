//! Rules exporter.

use super::{Collection, CollectionReport, ExportContext, export_entity};
use crate::error::ExportResult;
use futures::future::join_all;
use reactor_source::collect_all;

/// Exports every rule of the property into `rules/`.
///
/// Rule components are linked into `rules/<id>/rule_components/` by the
/// rule components exporter, which may run before this one finishes.
pub async fn export(ctx: &ExportContext<'_>) -> ExportResult<CollectionReport> {
    let collection = Collection::Rules;
    let dir = ctx.prepare(collection).await?;

    let rules = collect_all(ctx.page_size, move |page| {
        ctx.source.list_rules(&ctx.property_id, page)
    })
    .await?;

    let results = join_all(rules.iter().map(|rule| export_entity(ctx, &dir, rule, None))).await;

    Ok(CollectionReport::tally(collection, &rules, results))
}
