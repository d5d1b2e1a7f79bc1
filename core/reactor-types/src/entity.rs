use crate::SettingsError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A record returned by the Reactor API.
///
/// Attributes and relationships are kept as raw JSON so that the exported
/// `data.json` reproduces the entity as the API returned it. Members other
/// than `id`, `type`, `attributes` and `relationships` (`links`, `meta`, ...)
/// are carried in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub relationships: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A typed reference to another entity (`{ "id": ..., "type": ... }`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceRef {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl Entity {
    /// Creates an entity with empty attributes and relationships.
    pub fn new(id: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            entity_type: entity_type.into(),
            attributes: Map::new(),
            relationships: Map::new(),
            extra: Map::new(),
        }
    }

    /// Sets an attribute, returning the entity.
    #[must_use]
    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Sets a to-one relationship in JSON:API form, returning the entity.
    #[must_use]
    pub fn with_relationship(mut self, key: &str, target: ResourceRef) -> Self {
        let data = serde_json::json!({ "data": { "id": target.id, "type": target.resource_type } });
        self.relationships.insert(key.to_string(), data);
        self
    }

    /// The `name` attribute, if it is a string.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(Value::as_str)
    }

    /// The `delegate_descriptor_id` attribute, if it is a string.
    pub fn delegate_descriptor_id(&self) -> Option<&str> {
        self.attributes
            .get("delegate_descriptor_id")
            .and_then(Value::as_str)
    }

    /// Resolves a to-one relationship. Returns `None` when the relationship is
    /// absent, its `data` is `null`, or it does not look like a reference.
    pub fn relationship(&self, key: &str) -> Option<ResourceRef> {
        let data = self.relationships.get(key)?.get("data")?;
        ResourceRef::deserialize(data).ok()
    }

    /// Decodes the JSON-encoded `settings` attribute.
    ///
    /// Returns `Ok(None)` when the attribute is absent, `null`, or encodes
    /// `null`.
    pub fn decode_settings(&self) -> Result<Option<Value>, SettingsError> {
        match self.attributes.get("settings") {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => {
                let settings: Value = serde_json::from_str(text)?;
                Ok((!settings.is_null()).then_some(settings))
            }
            Some(other) => Err(SettingsError::NotText(json_kind(other))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
