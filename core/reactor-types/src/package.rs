//! Extension packages and their delegate descriptors.

use crate::TransformRule;
use serde::{Deserialize, Serialize};

/// An extension package as returned by `GET /extension_packages/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionPackage {
    pub id: String,
    #[serde(default)]
    pub attributes: PackageAttributes,
}

/// The subset of extension package attributes the exporter reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub actions: Option<Vec<DelegateDescriptor>>,
    #[serde(default)]
    pub events: Option<Vec<DelegateDescriptor>>,
    #[serde(default)]
    pub conditions: Option<Vec<DelegateDescriptor>>,
    #[serde(default)]
    pub data_elements: Option<Vec<DelegateDescriptor>>,
    #[serde(default)]
    pub configuration: Option<ExtensionConfiguration>,
}

/// A single action, event, condition or data element type declared by a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DelegateDescriptor {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub transforms: Option<Vec<TransformRule>>,
}

/// Extension-level configuration view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionConfiguration {
    #[serde(default)]
    pub transforms: Option<Vec<TransformRule>>,
}

/// The descriptor bucket an entity's settings schema lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Action,
    Event,
    Condition,
    DataElement,
}

impl DescriptorKind {
    /// Derives the rule component bucket from a delegate descriptor id such as
    /// `core::actions::custom-code`. Markers are checked in the order
    /// actions, events, conditions.
    pub fn from_delegate_descriptor_id(id: &str) -> Option<Self> {
        if id.contains("::actions::") {
            Some(Self::Action)
        } else if id.contains("::events::") {
            Some(Self::Event)
        } else if id.contains("::conditions::") {
            Some(Self::Condition)
        } else {
            None
        }
    }

    /// The extension package attribute holding this bucket.
    pub fn bucket_name(self) -> &'static str {
        match self {
            Self::Action => "actions",
            Self::Event => "events",
            Self::Condition => "conditions",
            Self::DataElement => "data_elements",
        }
    }
}

impl ExtensionPackage {
    /// All descriptors of one kind; empty when the package declares none.
    pub fn descriptors(&self, kind: DescriptorKind) -> &[DelegateDescriptor] {
        let bucket = match kind {
            DescriptorKind::Action => &self.attributes.actions,
            DescriptorKind::Event => &self.attributes.events,
            DescriptorKind::Condition => &self.attributes.conditions,
            DescriptorKind::DataElement => &self.attributes.data_elements,
        };
        bucket.as_deref().unwrap_or_default()
    }

    /// Finds the descriptor with the given id in the bucket for `kind`.
    pub fn find_descriptor(&self, kind: DescriptorKind, id: &str) -> Option<&DelegateDescriptor> {
        self.descriptors(kind).iter().find(|d| d.id == id)
    }

    /// Transforms declared for the extension's own configuration settings.
    pub fn configuration_transforms(&self) -> Option<&[TransformRule]> {
        self.attributes
            .configuration
            .as_ref()
            .and_then(|c| c.transforms.as_deref())
    }
}
