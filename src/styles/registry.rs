use std::collections::HashMap;

use crate::{
    error::{Result, StyleError},
    styles::{GhibliStyle, Style},
};

/// Registry for managing available styles
///
/// Styles are registered by name and instantiated on demand.
pub struct StyleRegistry {
    styles: HashMap<String, Box<dyn Fn() -> Box<dyn Style> + Send + Sync>>,
}

impl StyleRegistry {
    /// Create a new style registry with all built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            styles: HashMap::new(),
        };

        registry.register_builtin_styles();
        registry
    }

    fn register_builtin_styles(&mut self) {
        self.styles.insert(
            "ghibli".to_string(),
            Box::new(|| Box::new(GhibliStyle::new()) as Box<dyn Style>),
        );
    }

    /// Register a custom style
    ///
    /// # Arguments
    ///
    /// * `name` - Unique name for the style
    /// * `factory` - Function that creates new instances of the style
    pub fn register<F>(&mut self, name: String, factory: F)
    where
        F: Fn() -> Box<dyn Style> + Send + Sync + 'static,
    {
        self.styles.insert(name, Box::new(factory));
    }

    /// Get a style by name
    ///
    /// Returns a new instance of the requested style, or None if the style
    /// is not registered.
    pub fn get_style(&self, name: &str) -> Option<Box<dyn Style>> {
        self.styles.get(name).map(|factory| factory())
    }

    /// Like [`get_style`](Self::get_style), but unknown names are an error
    pub fn resolve(&self, name: &str) -> Result<Box<dyn Style>> {
        self.get_style(name).ok_or_else(|| {
            StyleError::NotFound {
                name: name.to_string(),
                available: self.available_styles(),
            }
            .into()
        })
    }

    /// Get all available style names, sorted
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check if a style is available
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_styles_available() {
        let registry = StyleRegistry::new();
        assert!(registry.has_style("ghibli"));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.available_styles(), vec!["ghibli".to_string()]);
    }

    #[test]
    fn test_get_style() {
        let registry = StyleRegistry::new();

        let style = registry.get_style("ghibli");
        assert!(style.is_some());
        assert_eq!(style.unwrap().name(), "ghibli");

        assert!(registry.get_style("unknown").is_none());
        assert!(registry.resolve("unknown").is_err());
    }

    #[test]
    fn test_custom_style_registration() {
        let mut registry = StyleRegistry::new();

        registry.register("soft".to_string(), || Box::new(GhibliStyle::new()));

        assert!(registry.has_style("soft"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_style_lists_registered_names() {
        let mut registry = StyleRegistry::new();
        registry.register("soft".to_string(), || Box::new(GhibliStyle::new()));

        let err = registry.resolve("vaporwave").err().unwrap();
        assert_eq!(
            err.user_message(),
            "Style 'vaporwave' not found. Available styles: ghibli, soft"
        );
    }
}
