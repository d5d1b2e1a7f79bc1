//! On-disk layout: id-named node directories and human-readable aliases.
//!
//! Every entity is written to `<parent>/<id>/`, and a relative symlink
//! `<parent>/_<sanitized name>` points at it. Directory and link creation
//! are check-then-create and therefore not atomic; they assume a single
//! writer per target tree. Losing a creation race to a sibling task counts
//! as "already exists", so the first writer of an alias wins. An alias that
//! lands on another entity's node path fails that entity instead of letting
//! its files be written through the link.

use crate::error::{ExportError, ExportResult};
use reactor_types::Entity;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Raw entity file written into every node directory.
pub const DATA_FILE: &str = "data.json";

/// Decoded settings file.
pub const SETTINGS_FILE: &str = "settings.json";

/// Upper bound for the sanitized part of an alias, in bytes.
const MAX_ALIAS_BYTES: usize = 200;

/// Paths of one exported entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNode {
    /// `<parent>/<id>`
    pub node_path: PathBuf,
    /// `<parent>/_<alias>`
    pub alias_path: PathBuf,
}

/// Replaces every character that is not alphanumeric, `-`, `_` or `.` with
/// `_`, and truncates the result on a char boundary.
pub fn sanitize(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
            c
        } else {
            '_'
        };
        if sanitized.len() + c.len_utf8() > MAX_ALIAS_BYTES {
            break;
        }
        sanitized.push(c);
    }
    sanitized
}

/// The alias entry name for an entity: `_` followed by its sanitized name,
/// or by its sanitized id when the name is missing or sanitizes to nothing.
///
/// The leading underscore keeps aliases from ever being `.` or `..`.
pub fn alias_name(entity: &Entity) -> String {
    let readable = entity.name().map(sanitize).unwrap_or_default();
    let readable = if readable.is_empty() {
        sanitize(&entity.id)
    } else {
        readable
    };

    let mut alias = format!("_{readable}");
    if alias == entity.id {
        alias.insert(0, '_');
    }
    alias
}

/// Checks that an entity id can be used as a single path component.
pub fn validate_id(id: &str) -> ExportResult<()> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
        && Path::new(id).components().count() == 1;

    if valid {
        Ok(())
    } else {
        Err(ExportError::InvalidEntityId(id.to_string()))
    }
}

/// Creates `<parent>/<id>` and the alias `<parent>/_<name>` pointing at it.
/// Safe to call repeatedly.
pub async fn resolve(parent: &Path, entity: &Entity) -> ExportResult<ExportNode> {
    validate_id(&entity.id)?;

    let node = ExportNode {
        node_path: parent.join(&entity.id),
        alias_path: parent.join(alias_name(entity)),
    };

    ensure_node_directory(&node.node_path).await?;
    ensure_link(Path::new(&entity.id), &node.alias_path).await?;

    Ok(node)
}

/// Creates `path` and any missing parents. Returns `true` if it was created.
/// Links are followed, so `path` may be a symlink to a directory.
pub async fn ensure_directory(path: &Path) -> ExportResult<bool> {
    match fs::metadata(path).await {
        Ok(metadata) if metadata.is_dir() => return Ok(false),
        Ok(_) => {
            return Err(ExportError::io(
                path,
                std::io::Error::new(ErrorKind::AlreadyExists, "not a directory"),
            ));
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(ExportError::io(path, e)),
    }

    fs::create_dir_all(path)
        .await
        .map_err(|e| ExportError::io(path, e))?;
    debug!("Created directory {}", path.display());
    Ok(true)
}

/// Like [`ensure_directory`], for an id-named node directory. A symlink at
/// `path`, such as a sibling's alias whose name equals this id, is a
/// [`ExportError::LinkCollision`] and nothing is created through it.
pub async fn ensure_node_directory(path: &Path) -> ExportResult<bool> {
    reject_link(path).await?;
    let created = ensure_directory(path).await?;
    // A sibling alias may have taken the path while it was being created.
    reject_link(path).await?;
    Ok(created)
}

async fn reject_link(path: &Path) -> ExportResult<()> {
    match fs::symlink_metadata(path).await {
        Ok(metadata) if metadata.file_type().is_symlink() => Err(ExportError::LinkCollision {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExportError::io(path, e)),
    }
}

/// Creates `link` as a directory symlink to the relative `target`, unless an
/// entry (including a dangling link) already occupies `link`. Returns `true`
/// if the link was created.
pub async fn ensure_link(target: &Path, link: &Path) -> ExportResult<bool> {
    match fs::symlink_metadata(link).await {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(ExportError::io(link, e)),
    }

    match symlink_dir(target, link).await {
        Ok(()) => {
            debug!("Linked {} -> {}", link.display(), target.display());
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(ExportError::io(link, e)),
    }
}

#[cfg(unix)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::symlink_dir(target, link).await
}

/// Writes `value` as pretty-printed JSON, replacing any existing file.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ExportResult<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_text(path, &json).await
}

/// Writes `text` verbatim, replacing any existing file.
pub async fn write_text(path: &Path, text: &str) -> ExportResult<()> {
    fs::write(path, text)
        .await
        .map_err(|e| ExportError::io(path, e))
}
