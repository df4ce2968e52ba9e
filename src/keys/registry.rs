//! Template Registry Module
//!
//! Maps symbolic template names to key templates.

use std::collections::HashMap;

use crate::error::{CacheError, Result};
use crate::keys::Template;

// == Template Registry ==
/// Anything that provides a fixed template mapping.
///
/// Implementors only supply [`templates`](TemplateRegistry::templates); lookup
/// by name is provided.
///
/// ```ignore
/// struct UserCacheKeys {
///     templates: Templates,
/// }
///
/// impl TemplateRegistry for UserCacheKeys {
///     fn templates(&self) -> &Templates {
///         &self.templates
///     }
/// }
/// ```
pub trait TemplateRegistry: Send + Sync {
    fn templates(&self) -> &Templates;

    /// Looks up a template by name.
    fn template(&self, name: &str) -> Result<&Template> {
        self.templates()
            .get(name)
            .ok_or_else(|| CacheError::TemplateNotFound(name.to_string()))
    }
}

// == Templates ==
/// Validated name → template mapping.
#[derive(Debug, Clone, Default)]
pub struct Templates {
    entries: HashMap<String, Template>,
}

impl Templates {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, validating its pattern first.
    ///
    /// A template registered under an existing name replaces it.
    pub fn insert(&mut self, name: impl Into<String>, template: Template) -> Result<()> {
        template.validate()?;
        self.entries.insert(name.into(), template);
        Ok(())
    }

    /// Builder form of [`insert`](Templates::insert).
    pub fn with(mut self, name: impl Into<String>, template: Template) -> Result<Self> {
        self.insert(name, template)?;
        Ok(self)
    }

    /// Loads a mapping from a JSON object of `name -> template`.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, Template> = serde_json::from_str(json)?;
        let mut templates = Self::new();
        for (name, template) in raw {
            templates.insert(name, template)?;
        }
        Ok(templates)
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TemplateRegistry for Templates {
    fn templates(&self) -> &Templates {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::Ttl;

    struct PostCacheKeys {
        templates: Templates,
    }

    impl TemplateRegistry for PostCacheKeys {
        fn templates(&self) -> &Templates {
            &self.templates
        }
    }

    fn post_keys() -> PostCacheKeys {
        let templates = Templates::new()
            .with("post", Template::new("post:{id}", 3600).after_hours(7200))
            .unwrap()
            .with("post_count", Template::new("posts:count", 60))
            .unwrap();
        PostCacheKeys { templates }
    }

    #[test]
    fn test_get_template() {
        let registry = post_keys();
        let template = registry.template("post").unwrap();
        assert_eq!(template.pattern, "post:{id}");
        assert_eq!(template.after_window_ttl, Some(Ttl::Seconds(7200)));
    }

    #[test]
    fn test_missing_after_hours_ttl_is_none() {
        let registry = post_keys();
        let template = registry.template("post_count").unwrap();
        assert!(template.after_window_ttl.is_none());
    }

    #[test]
    fn test_unknown_template() {
        let registry = post_keys();
        let result = registry.template("nope");
        assert!(matches!(result, Err(CacheError::TemplateNotFound(name)) if name == "nope"));
    }

    #[test]
    fn test_insert_rejects_invalid_template() {
        let mut templates = Templates::new();
        let result = templates.insert("bad", Template::new("", 60));
        assert!(matches!(result, Err(CacheError::InvalidTemplate(_))));
        assert!(templates.is_empty());
    }

    #[test]
    fn test_templates_is_a_registry() {
        let templates = Templates::new()
            .with("a", Template::new("a:{x}", 1))
            .unwrap();
        assert!(templates.template("a").is_ok());
        assert_eq!(templates.len(), 1);
        assert_eq!(templates.names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "user_profile": {"pattern": "user:{id}:profile", "in_window_ttl": 3600, "after_window_ttl": 7200},
            "settings": {"pattern": "site:settings", "in_working_hours_ttl": 60}
        }"#;
        let templates = Templates::from_json_str(json).unwrap();
        assert_eq!(templates.len(), 2);
        assert!(templates.contains("user_profile"));
        assert!(templates.contains("settings"));
    }

    #[test]
    fn test_from_json_str_validates() {
        let json = r#"{"dup": {"pattern": "{a}:{a}", "in_window_ttl": 1}}"#;
        assert!(matches!(
            Templates::from_json_str(json),
            Err(CacheError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_from_json_str_malformed() {
        assert!(matches!(
            Templates::from_json_str("not json"),
            Err(CacheError::Serialization(_))
        ));
    }
}
