#![allow(dead_code)]

use reactor_export::{ExportOptions, ExportSummary, export_property};
use reactor_source::MemorySource;
use reactor_types::{Entity, ExtensionPackage, ResourceRef};
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROPERTY_ID: &str = "PR1";
pub const CORE_PACKAGE_ID: &str = "EPcore";

pub fn property(name: &str) -> Entity {
    Entity::new(PROPERTY_ID, "properties").with_attribute("name", name)
}

pub fn named(id: &str, entity_type: &str, name: &str) -> Entity {
    Entity::new(id, entity_type).with_attribute("name", name)
}

fn core_ref() -> ResourceRef {
    ResourceRef {
        id: CORE_PACKAGE_ID.to_string(),
        resource_type: "extension_packages".to_string(),
    }
}

/// A data element backed by the core custom code type.
pub fn code_data_element(id: &str, name: &str, settings: &str) -> Entity {
    named(id, "data_elements", name)
        .with_attribute("delegate_descriptor_id", "core::dataElements::custom-code")
        .with_attribute("settings", settings)
        .with_relationship("updated_with_extension_package", core_ref())
}

/// A rule component backed by the core custom code action.
pub fn code_action(id: &str, name: &str, source: &str) -> Entity {
    let settings = json!({ "source": source, "language": "javascript" }).to_string();
    named(id, "rule_components", name)
        .with_attribute("delegate_descriptor_id", "core::actions::custom-code")
        .with_attribute("settings", settings)
        .with_relationship("updated_with_extension_package", core_ref())
}

pub fn core_extension(id: &str) -> Entity {
    let settings = json!({ "libraryCode": { "source": "window.loaded = true;" } }).to_string();
    named(id, "extensions", "Core")
        .with_attribute("settings", settings)
        .with_relationship("extension_package", core_ref())
}

pub fn core_package() -> ExtensionPackage {
    serde_json::from_value(json!({
        "id": CORE_PACKAGE_ID,
        "attributes": {
            "name": "core",
            "actions": [
                {"id": "core::actions::custom-code",
                 "transforms": [{"type": "customCode", "propertyPath": "source"}]}
            ],
            "events": [
                {"id": "core::events::click"}
            ],
            "data_elements": [
                {"id": "core::dataElements::custom-code",
                 "transforms": [{"type": "function", "propertyPath": "source",
                                 "parameters": ["event"]}]}
            ],
            "configuration": {
                "transforms": [{"type": "file", "propertyPath": "libraryCode.source"}]
            }
        }
    }))
    .unwrap()
}

/// One entity of every collection, with a rule component shared by two rules.
pub fn site_source() -> MemorySource {
    MemorySource::new()
        .with_property(property("My Site"))
        .with_environment(PROPERTY_ID, named("EN1", "environments", "Prod 1!"))
        .with_data_element(
            PROPERTY_ID,
            code_data_element("DE1", "Page Name", r#"{"source":"return document.title;"}"#),
        )
        .with_extension(PROPERTY_ID, core_extension("EX1"))
        .with_rule(PROPERTY_ID, named("RL1", "rules", "Page Load"))
        .with_rule(PROPERTY_ID, named("RL2", "rules", "Click"))
        .with_rule_component("RL1", code_action("RC1", "Send Beacon", "track();"))
        .with_rule_component("RL2", code_action("RC1", "Send Beacon", "track();"))
        .with_rule_component("RL2", named("RC2", "rule_components", "Click Event"))
        .with_extension_package(core_package())
}

pub async fn export(source: &MemorySource, out: &Path) -> ExportSummary {
    export_property(source, PROPERTY_ID, ExportOptions::new(out))
        .await
        .unwrap()
}

pub fn property_dir(temp: &TempDir) -> PathBuf {
    temp.path().join(PROPERTY_ID)
}

pub fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("{}: {e}", path.display()))
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&read(path)).unwrap()
}

/// Whether `alias` is a symlink resolving to the same directory as `node`.
pub fn resolves_to(alias: &Path, node: &Path) -> bool {
    std::fs::symlink_metadata(alias).is_ok_and(|m| m.file_type().is_symlink())
        && std::fs::canonicalize(alias).ok() == std::fs::canonicalize(node).ok()
        && std::fs::canonicalize(node).is_ok()
}

pub fn entry_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
