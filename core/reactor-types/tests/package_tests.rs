use reactor_types::{DescriptorKind, ExtensionPackage, TransformKind};
use serde_json::json;

fn core_package() -> ExtensionPackage {
    serde_json::from_value(json!({
        "id": "EPcore",
        "type": "extension_packages",
        "attributes": {
            "name": "core",
            "actions": [
                {"id": "core::actions::custom-code", "name": "custom-code",
                 "transforms": [{"type": "customCode", "propertyPath": "source"}]}
            ],
            "events": [
                {"id": "core::events::custom-event", "name": "custom-event"}
            ],
            "conditions": null,
            "data_elements": [
                {"id": "core::dataElements::custom-code",
                 "transforms": [{"type": "function", "propertyPath": "source"}]}
            ],
            "configuration": {
                "transforms": [{"type": "file", "propertyPath": "libraryCode.source"}]
            }
        }
    }))
    .unwrap()
}

// ── DescriptorKind ──────────────────────────────────────────────

#[test]
fn kind_from_delegate_descriptor_id() {
    assert_eq!(
        DescriptorKind::from_delegate_descriptor_id("core::actions::custom-code"),
        Some(DescriptorKind::Action)
    );
    assert_eq!(
        DescriptorKind::from_delegate_descriptor_id("core::events::click"),
        Some(DescriptorKind::Event)
    );
    assert_eq!(
        DescriptorKind::from_delegate_descriptor_id("core::conditions::path"),
        Some(DescriptorKind::Condition)
    );
    assert_eq!(
        DescriptorKind::from_delegate_descriptor_id("core::dataElements::cookie"),
        None
    );
}

#[test]
fn kind_bucket_names() {
    assert_eq!(DescriptorKind::Action.bucket_name(), "actions");
    assert_eq!(DescriptorKind::Event.bucket_name(), "events");
    assert_eq!(DescriptorKind::Condition.bucket_name(), "conditions");
    assert_eq!(DescriptorKind::DataElement.bucket_name(), "data_elements");
}

// ── Lookup ──────────────────────────────────────────────────────

#[test]
fn find_descriptor_in_matching_bucket() {
    let package = core_package();
    let descriptor = package
        .find_descriptor(DescriptorKind::Action, "core::actions::custom-code")
        .unwrap();
    let transforms = descriptor.transforms.as_ref().unwrap();
    assert_eq!(transforms[0].kind, TransformKind::CustomCode);
    assert_eq!(transforms[0].property_path, "source");
}

#[test]
fn find_descriptor_ignores_other_buckets() {
    let package = core_package();
    assert!(
        package
            .find_descriptor(DescriptorKind::Event, "core::actions::custom-code")
            .is_none()
    );
}

#[test]
fn descriptor_without_transforms() {
    let package = core_package();
    let descriptor = package
        .find_descriptor(DescriptorKind::Event, "core::events::custom-event")
        .unwrap();
    assert!(descriptor.transforms.is_none());
}

#[test]
fn null_bucket_is_empty() {
    let package = core_package();
    assert!(package.descriptors(DescriptorKind::Condition).is_empty());
}

#[test]
fn configuration_transforms() {
    let package = core_package();
    let transforms = package.configuration_transforms().unwrap();
    assert_eq!(transforms.len(), 1);
    assert_eq!(transforms[0].kind, TransformKind::File);
}

#[test]
fn package_without_attributes() {
    let package: ExtensionPackage = serde_json::from_value(json!({"id": "EP0"})).unwrap();
    assert!(package.configuration_transforms().is_none());
    assert!(package.descriptors(DescriptorKind::DataElement).is_empty());
}
