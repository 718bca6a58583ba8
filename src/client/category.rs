//! The user's list of category names, kept on the client only.

use crate::client::ClientError;

/// The categories offered before the user adds any.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Oficina",
    "Transporte",
    "Entretenimiento",
    "Salud",
    "Casa",
    "Alimentos",
];

/// An ordered list of unique category names.
///
/// Names are compared case-insensitively, so "salud" and "Salud" are the same
/// category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryList {
    names: Vec<String>,
}

impl Default for CategoryList {
    fn default() -> Self {
        Self {
            names: DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect(),
        }
    }
}

impl CategoryList {
    /// Build a list from saved names, falling back to [DEFAULT_CATEGORIES] if
    /// there are none. Blank names and duplicates are dropped.
    pub fn from_saved(names: Vec<String>) -> Self {
        let mut list = Self { names: Vec::new() };

        for name in names {
            // Invalid entries in an old cache file are not worth failing over.
            let _ = list.add(&name);
        }

        if list.names.is_empty() {
            Self::default()
        } else {
            list
        }
    }

    /// The category names in the order they were added.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether a category with this name exists, ignoring case.
    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.names.iter().any(|existing| existing.to_lowercase() == name)
    }

    /// Add a category named `name` with surrounding whitespace removed.
    ///
    /// # Errors
    /// Returns [ClientError::EmptyCategoryName] if the name is blank or
    /// [ClientError::DuplicateCategory] if it already exists.
    pub fn add(&mut self, name: &str) -> Result<(), ClientError> {
        let name = name.trim();

        if name.is_empty() {
            return Err(ClientError::EmptyCategoryName);
        }

        if self.contains(name) {
            return Err(ClientError::DuplicateCategory(name.to_owned()));
        }

        self.names.push(name.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CategoryList, DEFAULT_CATEGORIES};
    use crate::client::ClientError;

    #[test]
    fn starts_with_default_categories() {
        let list = CategoryList::default();

        assert_eq!(list.names(), DEFAULT_CATEGORIES);
    }

    #[test]
    fn add_trims_name() {
        let mut list = CategoryList::default();

        list.add("  Mascotas ").unwrap();

        assert_eq!(list.names().last().map(String::as_str), Some("Mascotas"));
    }

    #[test]
    fn add_rejects_blank_name() {
        let mut list = CategoryList::default();

        assert!(matches!(list.add("   "), Err(ClientError::EmptyCategoryName)));
        assert_eq!(list.names().len(), DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn add_rejects_duplicate_ignoring_case() {
        let mut list = CategoryList::default();

        let result = list.add("sALUD");

        assert!(matches!(result, Err(ClientError::DuplicateCategory(name)) if name == "sALUD"));
    }

    #[test]
    fn from_saved_keeps_saved_names() {
        let list = CategoryList::from_saved(vec![
            "Casa".to_owned(),
            "casa".to_owned(),
            String::new(),
            "Viajes".to_owned(),
        ]);

        assert_eq!(list.names(), ["Casa", "Viajes"]);
    }

    #[test]
    fn from_saved_falls_back_to_defaults() {
        assert_eq!(CategoryList::from_saved(Vec::new()), CategoryList::default());
    }
}
