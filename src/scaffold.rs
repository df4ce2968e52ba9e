//! Registry Scaffolding
//!
//! Generates source stubs for new template registries.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CacheError, Result};

const REGISTRY_STUB: &str = r#"use has_cache::keys::{Template, TemplateRegistry, Templates};
use has_cache::Result;

/// Cache key templates for __NAME__.
pub struct __NAME__CacheKeys {
    templates: Templates,
}

impl __NAME__CacheKeys {
    pub fn new() -> Result<Self> {
        let templates = Templates::new().with(
            "__SNAKE__",
            Template::new("__SNAKE__:{id}", 3600).after_hours(7200),
        )?;
        Ok(Self { templates })
    }
}

impl TemplateRegistry for __NAME__CacheKeys {
    fn templates(&self) -> &Templates {
        &self.templates
    }
}
"#;

const STRIPPED_SUFFIXES: [&str; 2] = ["CacheKeyManager", "CacheKeys"];

/// Normalizes a registry name: trims it and strips a `CacheKeys` or
/// `CacheKeyManager` suffix.
pub fn registry_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let base = STRIPPED_SUFFIXES
        .iter()
        .find_map(|suffix| trimmed.strip_suffix(suffix))
        .unwrap_or(trimmed);

    let mut chars = base.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric());
    if !valid {
        return Err(CacheError::InvalidName(format!(
            "'{}' is not a valid registry name",
            raw
        )));
    }

    Ok(base.to_string())
}

/// Converts `BlogPost` to `blog_post`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Renders the registry stub for `name`.
pub fn render_registry_stub(name: &str) -> Result<String> {
    let name = registry_name(name)?;
    Ok(REGISTRY_STUB
        .replace("__NAME__", &name)
        .replace("__SNAKE__", &snake_case(&name)))
}

/// Writes `<snake>_cache_keys.rs` into `dir`, creating the directory if needed.
///
/// Never overwrites an existing file.
pub fn write_registry_stub(dir: &Path, name: &str) -> Result<PathBuf> {
    let content = render_registry_stub(name)?;
    let file_name = format!("{}_cache_keys.rs", snake_case(&registry_name(name)?));
    let path = dir.join(file_name);

    fs::create_dir_all(dir)?;
    let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            return Err(CacheError::AlreadyExists(path));
        }
        Err(e) => return Err(e.into()),
    };
    file.write_all(content.as_bytes())?;

    info!("Registry stub written to {}", path.display());
    Ok(path)
}
