//! Settings transform extractor.
//!
//! Extension packages declare, per delegate descriptor, which settings fields
//! hold source code. Each such field is written next to `settings.json` as
//! `settings.<propertyPath>.js`. Function bodies are wrapped in a signature
//! bounded by fixed marker comments so the injected region stays greppable.

use crate::error::ExportResult;
use crate::layout;
use reactor_types::{TransformKind, TransformRule};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Opens a generated region.
pub const START_MARKER: &str = "//==== START TRANSFORM CODE - DO NOT REMOVE ====";

/// Closes a generated region.
pub const END_MARKER: &str = "//==== END TRANSFORM CODE ====";

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Walks a dotted path through `settings`. Returns `None` as soon as a
/// segment is missing or falsy. Numeric segments index into arrays.
pub fn resolve_path<'a>(settings: &'a Value, property_path: &str) -> Option<&'a Value> {
    let mut current = settings;
    for segment in property_path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }?;
        if !is_truthy(next) {
            return None;
        }
        current = next;
    }
    Some(current)
}

/// Wraps `body` in a function signature between marker comments.
pub fn render_function(parameters: &[String], body: &str) -> String {
    format!(
        "{START_MARKER}\nfunction ({}) {{\n{END_MARKER}\n{body}\n{START_MARKER}\n}}\n{END_MARKER}",
        parameters.join(", ")
    )
}

fn is_safe_property_path(property_path: &str) -> bool {
    property_path
        .split('.')
        .all(|segment| !segment.is_empty() && !segment.contains(|c: char| c == '/' || c == '\\'))
}

/// Applies `transforms` to `settings`, writing extracted files into
/// `output_dir`. Returns the number of files written.
///
/// Missing or falsy values, non-text values, unsafe paths and unknown
/// transform kinds are skipped; only filesystem failures are errors.
pub async fn apply(
    transforms: &[TransformRule],
    settings: &Value,
    output_dir: &Path,
) -> ExportResult<usize> {
    let mut written = 0;

    for transform in transforms {
        let path = &transform.property_path;

        if !is_safe_property_path(path) {
            warn!("Skipping transform with unusable property path {:?}", path);
            continue;
        }

        let Some(value) = resolve_path(settings, path) else {
            debug!("No value at {}, skipping transform", path);
            continue;
        };

        let Some(text) = value.as_str() else {
            warn!("Value at {} is not text, skipping {} transform", path, transform.kind);
            continue;
        };

        let contents = match &transform.kind {
            TransformKind::Function => {
                render_function(transform.parameters.as_deref().unwrap_or_default(), text)
            }
            TransformKind::File | TransformKind::CustomCode => text.to_string(),
            TransformKind::Unknown(tag) => {
                warn!(
                    kind = %tag,
                    property_path = %path,
                    "Unrecognized transform, skipping"
                );
                continue;
            }
        };

        let file = output_dir.join(transform.file_name());
        layout::write_text(&file, &contents).await?;
        debug!("Extracted {}", file.display());
        written += 1;
    }

    Ok(written)
}
