//! Category name to display color mapping.

use std::collections::BTreeMap;

use astralis_protocol::constants::DEFAULT_CATEGORIES;
use astralis_protocol::Rgb;

/// Registered log categories and their colors.
///
/// The first registration of a name wins; later registrations of the same
/// name are ignored.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    colors: BTreeMap<String, Rgb>,
}

impl CategoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the built-in game categories.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (name, color) in DEFAULT_CATEGORIES {
            registry.register(name, *color);
        }
        registry
    }

    /// Register `name` with `color` unless it is already present.
    ///
    /// Returns `true` when the category was inserted.
    pub fn register(&mut self, name: &str, color: Rgb) -> bool {
        if self.colors.contains_key(name) {
            return false;
        }
        self.colors.insert(name.to_owned(), color);
        true
    }

    /// The color for `name`, or [`Rgb::WHITE`] if it was never registered.
    pub fn color_of(&self, name: &str) -> Rgb {
        self.colors.get(name).copied().unwrap_or(Rgb::WHITE)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    /// All registered names, sorted.
    pub fn all_categories(&self) -> Vec<String> {
        self.colors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Render `message` prefixed by the category tag in color markup:
    /// `<color=#RRGGBB>[Category]</color> message`.
    pub fn decorate(&self, category: &str, message: &str) -> String {
        let hex = self.color_of(category).to_hex();
        format!("<color=#{hex}>[{category}]</color> {message}")
    }
}
