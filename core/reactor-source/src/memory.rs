//! In-memory remote source.
//!
//! Serves a fixed set of entities with the same paging behaviour as the
//! Reactor API. Used for offline fixtures and tests.

use crate::error::{SourceError, SourceResult};
use crate::source::{Page, PageMeta, PageRequest, Pagination, RemoteSource};
use async_trait::async_trait;
use reactor_types::{Entity, ExtensionPackage};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Operations of [`RemoteSource`], used to inject failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetProperty,
    ListEnvironments,
    ListDataElements,
    ListExtensions,
    ListRules,
    ListRuleComponentsForRule,
    ListRulesForRuleComponent,
    GetExtensionPackage,
}

#[derive(Debug, Default)]
struct PropertyFixture {
    property: Option<Entity>,
    environments: Vec<Entity>,
    data_elements: Vec<Entity>,
    extensions: Vec<Entity>,
    rules: Vec<Entity>,
}

/// In-memory implementation of [`RemoteSource`].
#[derive(Debug, Default)]
pub struct MemorySource {
    properties: BTreeMap<String, PropertyFixture>,
    /// Rule components keyed by the id of the rule that uses them.
    rule_components: HashMap<String, Vec<Entity>>,
    packages: HashMap<String, ExtensionPackage>,
    failing: HashSet<Operation>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    fn fixture(&mut self, property_id: &str) -> &mut PropertyFixture {
        self.properties.entry(property_id.to_string()).or_default()
    }

    /// Adds a property.
    #[must_use]
    pub fn with_property(mut self, property: Entity) -> Self {
        let id = property.id.clone();
        self.fixture(&id).property = Some(property);
        self
    }

    /// Adds an environment to a property.
    #[must_use]
    pub fn with_environment(mut self, property_id: &str, environment: Entity) -> Self {
        self.fixture(property_id).environments.push(environment);
        self
    }

    /// Adds a data element to a property.
    #[must_use]
    pub fn with_data_element(mut self, property_id: &str, data_element: Entity) -> Self {
        self.fixture(property_id).data_elements.push(data_element);
        self
    }

    /// Adds an extension to a property.
    #[must_use]
    pub fn with_extension(mut self, property_id: &str, extension: Entity) -> Self {
        self.fixture(property_id).extensions.push(extension);
        self
    }

    /// Adds a rule to a property.
    #[must_use]
    pub fn with_rule(mut self, property_id: &str, rule: Entity) -> Self {
        self.fixture(property_id).rules.push(rule);
        self
    }

    /// Attaches a rule component to a rule. Attaching one component to
    /// several rules models a shared component.
    #[must_use]
    pub fn with_rule_component(mut self, rule_id: &str, component: Entity) -> Self {
        self.rule_components
            .entry(rule_id.to_string())
            .or_default()
            .push(component);
        self
    }

    /// Adds an extension package.
    #[must_use]
    pub fn with_extension_package(mut self, package: ExtensionPackage) -> Self {
        self.packages.insert(package.id.clone(), package);
        self
    }

    /// Makes every call of `operation` fail with a server error.
    #[must_use]
    pub fn failing(mut self, operation: Operation) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Number of times `operation` has been called.
    pub fn calls(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .map(|calls| calls.get(&operation).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn enter(&self, operation: Operation) -> SourceResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(operation).or_insert(0) += 1;
        }
        if self.failing.contains(&operation) {
            return Err(SourceError::Api {
                status: 500,
                body: format!("{operation:?} unavailable"),
            });
        }
        Ok(())
    }

    fn property_fixture(&self, property_id: &str) -> SourceResult<&PropertyFixture> {
        self.properties
            .get(property_id)
            .ok_or_else(|| SourceError::NotFound(format!("/properties/{property_id}")))
    }
}

fn paginate(items: &[Entity], request: PageRequest) -> Page<Entity> {
    let size = request.size.max(1) as usize;
    let total_pages = items.len().div_ceil(size).max(1) as u32;
    let start = (request.number.saturating_sub(1) as usize).saturating_mul(size);
    let data = items.iter().skip(start).take(size).cloned().collect();

    Page {
        data,
        meta: Some(PageMeta {
            pagination: Some(Pagination {
                current_page: Some(request.number),
                next_page: (request.number < total_pages).then_some(request.number + 1),
                prev_page: (request.number > 1).then_some(request.number - 1),
                total_pages: Some(total_pages),
                total_count: Some(items.len() as u64),
            }),
        }),
    }
}

#[async_trait]
impl RemoteSource for MemorySource {
    fn source_name(&self) -> &'static str {
        "memory"
    }

    async fn get_property(&self, property_id: &str) -> SourceResult<Entity> {
        self.enter(Operation::GetProperty)?;
        self.property_fixture(property_id)?
            .property
            .clone()
            .ok_or_else(|| SourceError::NotFound(format!("/properties/{property_id}")))
    }

    async fn list_environments(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListEnvironments)?;
        Ok(paginate(&self.property_fixture(property_id)?.environments, page))
    }

    async fn list_data_elements(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListDataElements)?;
        Ok(paginate(&self.property_fixture(property_id)?.data_elements, page))
    }

    async fn list_extensions(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListExtensions)?;
        Ok(paginate(&self.property_fixture(property_id)?.extensions, page))
    }

    async fn list_rules(&self, property_id: &str, page: PageRequest) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListRules)?;
        Ok(paginate(&self.property_fixture(property_id)?.rules, page))
    }

    async fn list_rule_components_for_rule(
        &self,
        rule_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListRuleComponentsForRule)?;
        let components = self
            .rule_components
            .get(rule_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(paginate(components, page))
    }

    async fn list_rules_for_rule_component(
        &self,
        rule_component_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.enter(Operation::ListRulesForRuleComponent)?;
        let rules: Vec<Entity> = self
            .properties
            .values()
            .flat_map(|fixture| fixture.rules.iter())
            .filter(|rule| {
                self.rule_components
                    .get(&rule.id)
                    .is_some_and(|components| components.iter().any(|c| c.id == rule_component_id))
            })
            .cloned()
            .collect();
        Ok(paginate(&rules, page))
    }

    async fn get_extension_package(&self, package_id: &str) -> SourceResult<ExtensionPackage> {
        self.enter(Operation::GetExtensionPackage)?;
        self.packages
            .get(package_id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(format!("/extension_packages/{package_id}")))
    }
}
