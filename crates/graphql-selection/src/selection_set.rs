use std::{fmt, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{error::UnknownFields, registry::FieldRegistry};

/// One entity's chosen subset of fields.
///
/// A node starts out with the default selection (every simple field, no
/// complex fields) and is reshaped in place with [`add()`](Self::add),
/// [`remove()`](Self::remove), [`set()`](Self::set) and friends, all of which
/// return `&mut Self` for chaining. Rendering never mutates the node.
///
/// Nested selections are snapshots: attaching a child captures its rendered
/// string, so mutating the child afterwards does not affect the parent until
/// it is attached again.
#[derive(Debug, Clone)]
pub struct SelectionSet {
    registry: Arc<FieldRegistry>,
    name: String,
    selected_simple: IndexSet<String>,
    selected_complex: IndexMap<String, String>,
}

impl SelectionSet {
    /// A node with the default selection: every simple field, no complex
    /// fields.
    pub fn new(registry: Arc<FieldRegistry>, name: impl Into<String>) -> Self {
        let mut node = Self {
            registry,
            name: name.into(),
            selected_simple: IndexSet::new(),
            selected_complex: IndexMap::new(),
        };
        node.use_simple_only(false);
        node
    }

    /// A node populated from an explicit field list, routed through
    /// [`add()`](Self::add). An empty list falls back to the default
    /// selection.
    pub fn with_fields<I>(registry: Arc<FieldRegistry>, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut node = Self {
            registry,
            name: name.into(),
            selected_simple: IndexSet::new(),
            selected_complex: IndexMap::new(),
        };

        let mut fields = fields.into_iter().peekable();
        if fields.peek().is_none() {
            node.use_simple_only(false);
        } else {
            node.add(fields);
        }

        node
    }

    /// The entity's field name as known to its parent. Empty for an anonymous
    /// root node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Select fields. Each name is classified against the registry:
    ///
    /// - a complex field that is already selected is skipped, keeping the
    ///   existing nested selection,
    /// - a complex field not yet selected is attached with its default
    ///   selection,
    /// - a simple field is selected,
    /// - anything else is dropped silently (see
    ///   [`add_strict()`](Self::add_strict) for early detection).
    pub fn add<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for field in fields {
            let field = field.as_ref();

            if self.selected_complex.contains_key(field) {
                continue;
            }

            if let Some(child) = self.registry.instantiate(field) {
                self.selected_complex.insert(field.to_owned(), child.render());
            } else if self.registry.is_simple(field) {
                self.selected_simple.insert(field.to_owned());
            } else {
                tracing::debug!(field, "ignoring field that is not part of the registry");
            }
        }

        self
    }

    /// Like [`add()`](Self::add), but fails without touching the selection
    /// when any of the requested names is unknown to the registry.
    pub fn add_strict<I>(&mut self, fields: I) -> Result<&mut Self, UnknownFields>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|field| field.as_ref().to_owned()).collect();
        self.ensure_known(&fields)?;
        Ok(self.add(fields))
    }

    /// Deselect a field, simple or complex. Unselected names are ignored.
    pub fn remove(&mut self, field: &str) -> &mut Self {
        self.selected_simple.shift_remove(field);
        self.selected_complex.shift_remove(field);
        self
    }

    /// Deselect everything.
    pub fn clear(&mut self) -> &mut Self {
        self.selected_simple.clear();
        self.selected_complex.clear();
        self
    }

    /// Replace the selection: [`clear()`](Self::clear) followed by
    /// [`add()`](Self::add).
    pub fn set<I>(&mut self, fields: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.clear().add(fields)
    }

    /// Strict variant of [`set()`](Self::set); the selection is left untouched
    /// when any of the requested names is unknown.
    pub fn set_strict<I>(&mut self, fields: I) -> Result<&mut Self, UnknownFields>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let fields: Vec<String> = fields.into_iter().map(|field| field.as_ref().to_owned()).collect();
        self.ensure_known(&fields)?;
        Ok(self.clear().add(fields))
    }

    /// Attach a snapshot of `child` under its field name, replacing any prior
    /// selection of that field. A child whose name is not a registered complex
    /// field is ignored.
    ///
    /// The child's rendered string is captured here; mutating `child`
    /// afterwards has no effect on this node.
    pub fn add_complex(&mut self, child: &SelectionSet) -> &mut Self {
        if self.registry.is_complex(&child.name) {
            self.selected_complex.insert(child.name.clone(), child.render());
        } else {
            tracing::debug!(
                field = child.name.as_str(),
                "ignoring node that is not a registered complex field"
            );
        }
        self
    }

    /// A fresh, detached child node for `field` with its default selection, or
    /// `None` when `field` is not a registered complex field.
    ///
    /// The returned node is not attached to this one; customize it and pass it
    /// to [`add_complex()`](Self::add_complex) to take effect.
    pub fn get_complex(&self, field: &str) -> Option<SelectionSet> {
        self.registry.instantiate(field)
    }

    /// Reset to every simple field. With `complex_with_simple`, every
    /// registered complex field is attached as well, each carrying its own
    /// default selection; without it, no complex field is selected.
    pub fn use_simple_only(&mut self, complex_with_simple: bool) -> &mut Self {
        self.selected_simple = self.registry.simple().clone();
        self.selected_complex.clear();

        if complex_with_simple {
            for (name, factory) in self.registry.complex() {
                self.selected_complex.insert(name.clone(), factory(name).render());
            }
        }

        self
    }

    /// Serialize with the entity name prefix: `"name {field1 field2 ...}"`.
    ///
    /// Simple fields come first in selection order, then the nested selections
    /// in attachment order. The braces are omitted entirely when nothing is
    /// selected. A node with an empty name keeps the stray leading space.
    pub fn render(&self) -> String {
        self.render_inner(true)
    }

    /// Serialize without the name prefix: `"{field1 field2 ...}"`.
    pub fn render_fields(&self) -> String {
        self.render_inner(false)
    }

    fn render_inner(&self, include_name: bool) -> String {
        let prefix = if include_name {
            format!("{} ", self.name)
        } else {
            String::new()
        };

        if self.selected_simple.is_empty() && self.selected_complex.is_empty() {
            return prefix;
        }

        let tokens = self
            .selected_simple
            .iter()
            .map(String::as_str)
            .chain(self.selected_complex.values().map(String::as_str))
            .join(" ");

        format!("{prefix}{{{tokens}}}")
    }

    fn ensure_known(&self, fields: &[String]) -> Result<(), UnknownFields> {
        let unknown: Vec<String> = fields
            .iter()
            .filter(|field| {
                let field = field.as_str();
                !self.registry.is_simple(field) && !self.registry.is_complex(field)
            })
            .cloned()
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(UnknownFields { fields: unknown })
        }
    }
}

impl fmt::Display for SelectionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
