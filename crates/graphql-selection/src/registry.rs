use std::{fmt, sync::Arc};

use indexmap::{IndexMap, IndexSet};

use crate::{error::EmptyRegistry, SelectionSet};

/// Instantiates a fresh, default-populated child node for a complex field.
///
/// The argument is the field name under which the child is attached to its
/// parent; it becomes the child's entity name.
pub type ChildFactory = Arc<dyn Fn(&str) -> SelectionSet + Send + Sync>;

/// The immutable description of the fields an entity type supports.
///
/// A registry is built once per entity type and shared behind an [`Arc`] by
/// every selection node of that type. It is read-only after construction and
/// safe to share across threads.
pub struct FieldRegistry {
    simple: IndexSet<String>,
    complex: IndexMap<String, ChildFactory>,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            simple: IndexSet::new(),
            complex: IndexMap::new(),
        }
    }

    /// The names of the registered simple fields, in registration order.
    pub fn simple_fields(&self) -> impl Iterator<Item = &str> {
        self.simple.iter().map(String::as_str)
    }

    /// The names of the registered complex fields, in registration order.
    pub fn complex_fields(&self) -> impl Iterator<Item = &str> {
        self.complex.keys().map(String::as_str)
    }

    pub(crate) fn is_simple(&self, name: &str) -> bool {
        self.simple.contains(name)
    }

    pub(crate) fn is_complex(&self, name: &str) -> bool {
        self.complex.contains_key(name)
    }

    /// Invokes the factory for `name`, producing a detached child node with
    /// its own default selection.
    pub(crate) fn instantiate(&self, name: &str) -> Option<SelectionSet> {
        self.complex.get(name).map(|factory| factory(name))
    }

    pub(crate) fn simple(&self) -> &IndexSet<String> {
        &self.simple
    }

    pub(crate) fn complex(&self) -> &IndexMap<String, ChildFactory> {
        &self.complex
    }
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("simple", &self.simple)
            .field("complex", &self.complex.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`FieldRegistry`].
#[must_use]
pub struct FieldRegistryBuilder {
    simple: IndexSet<String>,
    complex: IndexMap<String, ChildFactory>,
}

impl FieldRegistryBuilder {
    /// Register simple leaf fields. Accepts any iterator of names, e.g. an
    /// explicit list or the value set of a name-to-string mapping. Duplicates
    /// collapse, keeping the first insertion's position.
    pub fn simple_fields<I>(mut self, names: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.simple.extend(names.into_iter().map(Into::into));
        self
    }

    /// Register a single simple leaf field.
    pub fn simple_field(self, name: impl Into<String>) -> Self {
        self.simple_fields([name.into()])
    }

    /// Register a complex field. The factory receives the field name and must
    /// return a fresh child node carrying its own default selection.
    ///
    /// Registering a name as complex always wins over a simple registration of
    /// the same name.
    pub fn complex_field<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&str) -> SelectionSet + Send + Sync + 'static,
    {
        self.complex.insert(name.into(), Arc::new(factory));
        self
    }

    /// Finalize the registry. Fails when no field at all was registered.
    pub fn build(mut self) -> Result<Arc<FieldRegistry>, EmptyRegistry> {
        // Complex registration takes precedence over a simple field of the
        // same name.
        for name in self.complex.keys() {
            self.simple.shift_remove(name);
        }

        if self.simple.is_empty() && self.complex.is_empty() {
            return Err(EmptyRegistry);
        }

        Ok(Arc::new(FieldRegistry {
            simple: self.simple,
            complex: self.complex,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_is_rejected() {
        let err = FieldRegistry::builder().build().unwrap_err();
        assert_eq!(err.to_string(), "schema has no fields");
    }

    #[test]
    fn complex_registration_removes_the_simple_field() {
        let registry = FieldRegistry::builder()
            .simple_fields(["title", "publisher"])
            .complex_field("publisher", |name| {
                let child = FieldRegistry::builder().simple_field("name").build().unwrap();
                SelectionSet::new(child, name)
            })
            .build()
            .unwrap();

        assert_eq!(registry.simple_fields().collect::<Vec<_>>(), ["title"]);
        assert_eq!(registry.complex_fields().collect::<Vec<_>>(), ["publisher"]);
    }

    #[test]
    fn duplicate_simple_fields_keep_the_first_position() {
        let registry = FieldRegistry::builder()
            .simple_fields(["id", "name", "id"])
            .build()
            .unwrap();

        assert_eq!(registry.simple_fields().collect::<Vec<_>>(), ["id", "name"]);
    }
}
