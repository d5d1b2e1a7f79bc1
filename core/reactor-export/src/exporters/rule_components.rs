//! Rule components exporter and cross-linker.
//!
//! Rule components are listed through the rules of the property, since the
//! API exposes them per rule. A component shared by several rules is
//! exported once into `rule_components/<id>` and linked into each rule as
//! `rules/<ruleId>/rule_components/<id>` plus its alias.

use super::{
    Collection, CollectionReport, EntityOutcome, ExportContext, Extraction,
    descriptor_transforms, export_entity,
};
use crate::error::ExportResult;
use crate::layout;
use futures::future::{join_all, try_join_all};
use reactor_source::collect_all;
use reactor_types::{DescriptorKind, Entity, ExtensionPackage, TransformRule};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

const EXTRACTION: Extraction = Extraction {
    relationship: "updated_with_extension_package",
    lookup: rule_component_transforms,
};

fn rule_component_transforms<'p>(
    package: &'p ExtensionPackage,
    entity: &Entity,
) -> ExportResult<Option<&'p [TransformRule]>> {
    let kind = entity
        .delegate_descriptor_id()
        .and_then(DescriptorKind::from_delegate_descriptor_id);
    descriptor_transforms(package, entity, kind)
}

/// Relative target of a cross-link, seen from
/// `rules/<ruleId>/rule_components/`.
pub fn link_target(component_id: &str) -> PathBuf {
    Path::new("../../..")
        .join(Collection::RuleComponents.dir_name())
        .join(component_id)
}

/// Exports every rule component reachable from the property's rules.
pub async fn export(ctx: &ExportContext<'_>) -> ExportResult<CollectionReport> {
    let collection = Collection::RuleComponents;
    let dir = ctx.prepare(collection).await?;

    let components = list_components(ctx).await?;

    let results = join_all(
        components
            .iter()
            .map(|component| export_component(ctx, &dir, component)),
    )
    .await;

    Ok(CollectionReport::tally(collection, &components, results))
}

/// Lists the components of every rule, keeping the first occurrence of each id.
async fn list_components(ctx: &ExportContext<'_>) -> ExportResult<Vec<Entity>> {
    let rules = collect_all(ctx.page_size, move |page| {
        ctx.source.list_rules(&ctx.property_id, page)
    })
    .await?;

    let per_rule = try_join_all(rules.iter().map(|rule| {
        let rule_id = rule.id.as_str();
        collect_all(ctx.page_size, move |page| {
            ctx.source.list_rule_components_for_rule(rule_id, page)
        })
    }))
    .await?;

    let mut seen = HashSet::new();
    let components: Vec<Entity> = per_rule
        .into_iter()
        .flatten()
        .filter(|component| seen.insert(component.id.clone()))
        .collect();

    debug!(
        rules = rules.len(),
        components = components.len(),
        "Listed rule components"
    );
    Ok(components)
}

async fn export_component(
    ctx: &ExportContext<'_>,
    dir: &Path,
    component: &Entity,
) -> ExportResult<EntityOutcome> {
    let (exported, linked) = futures::join!(
        export_entity(ctx, dir, component, Some(EXTRACTION)),
        cross_link(ctx, component),
    );

    let mut outcome = exported?;
    outcome.links = linked?;
    Ok(outcome)
}

/// Links `component` into every rule that references it. Returns the number
/// of links created; existing entries are left alone.
pub async fn cross_link(ctx: &ExportContext<'_>, component: &Entity) -> ExportResult<usize> {
    layout::validate_id(&component.id)?;

    let component_id = component.id.as_str();
    let rules = collect_all(ctx.page_size, move |page| {
        ctx.source.list_rules_for_rule_component(component_id, page)
    })
    .await?;

    let target = link_target(component_id);
    let alias = layout::alias_name(component);
    let rules_dir = ctx.collection_dir(Collection::Rules);

    let mut created = 0;
    for rule in &rules {
        layout::validate_id(&rule.id)?;
        let rule_dir = rules_dir.join(&rule.id);
        layout::ensure_node_directory(&rule_dir).await?;
        let links_dir = rule_dir.join(Collection::RuleComponents.dir_name());
        layout::ensure_directory(&links_dir).await?;

        for name in [component_id, alias.as_str()] {
            if layout::ensure_link(&target, &links_dir.join(name)).await? {
                created += 1;
            }
        }
    }

    Ok(created)
}
