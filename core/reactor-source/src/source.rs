//! Remote data source abstraction.
//!
//! Defines the capability the exporter needs from the Reactor API, plus the
//! paging driver that turns paged list operations into complete collections.

use crate::error::SourceResult;
use async_trait::async_trait;
use reactor_types::{Entity, ExtensionPackage};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

/// Largest page the Reactor API accepts.
pub const MAX_PAGE_SIZE: u32 = 999;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Hard stop for runaway paging (a server that always reports a next page).
const MAX_PAGES: u32 = 10_000;

/// A request for one page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub number: u32,
    /// Requested page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub size: u32,
}

impl PageRequest {
    /// The first page with the given size.
    pub fn first(size: u32) -> Self {
        Self {
            number: 1,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// The page following this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self {
            number: self.number + 1,
            ..self
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Pagination block of a list response (`meta.pagination`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub prev_page: Option<u32>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

/// `meta` block of a list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// One page of a list response: `{ "data": [...], "meta": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// A page without pagination metadata.
    pub fn new(data: Vec<T>) -> Self {
        Self { data, meta: None }
    }

    /// Decides which page to request after `request`, if any.
    ///
    /// Pagination metadata wins when present. Without it, a full page is
    /// taken to mean more data may follow.
    pub fn next_request(&self, request: PageRequest) -> Option<PageRequest> {
        match self.meta.as_ref().and_then(|m| m.pagination.as_ref()) {
            Some(pagination) => pagination.next_page.map(|number| PageRequest {
                number,
                size: request.size,
            }),
            None if self.data.len() as u32 >= request.size && !self.data.is_empty() => {
                Some(request.next())
            }
            None => None,
        }
    }
}

/// A single resource response: `{ "data": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// Read-only view of the Reactor API used by the exporter.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Returns a short name of the source for diagnostics.
    fn source_name(&self) -> &'static str;

    /// Fetches a property.
    async fn get_property(&self, property_id: &str) -> SourceResult<Entity>;

    /// Lists one page of a property's environments.
    async fn list_environments(&self, property_id: &str, page: PageRequest)
    -> SourceResult<Page<Entity>>;

    /// Lists one page of a property's data elements.
    async fn list_data_elements(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>>;

    /// Lists one page of a property's extensions.
    async fn list_extensions(&self, property_id: &str, page: PageRequest)
    -> SourceResult<Page<Entity>>;

    /// Lists one page of a property's rules.
    async fn list_rules(&self, property_id: &str, page: PageRequest) -> SourceResult<Page<Entity>>;

    /// Lists one page of the rule components of a rule.
    async fn list_rule_components_for_rule(
        &self,
        rule_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>>;

    /// Lists one page of the rules that reference a rule component.
    async fn list_rules_for_rule_component(
        &self,
        rule_component_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>>;

    /// Fetches an extension package.
    async fn get_extension_package(&self, package_id: &str) -> SourceResult<ExtensionPackage>;
}

/// Drives a paged list operation until the last page.
///
/// ```ignore
/// let rules = collect_all(page_size, |page| source.list_rules(property_id, page)).await?;
/// ```
pub async fn collect_all<T, F, Fut>(page_size: u32, mut fetch: F) -> SourceResult<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = SourceResult<Page<T>>>,
{
    let mut request = PageRequest::first(page_size);
    let mut items = Vec::new();

    for _ in 0..MAX_PAGES {
        let page = fetch(request).await?;
        let next = page.next_request(request);
        debug!(
            page = request.number,
            received = page.data.len(),
            "Fetched page"
        );
        items.extend(page.data);

        match next {
            Some(next) if next.number > request.number => request = next,
            _ => break,
        }
    }

    Ok(items)
}
