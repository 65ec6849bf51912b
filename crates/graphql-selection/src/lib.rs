//! Composable field selections for hierarchical GraphQL schemas.
//!
//! A [`FieldRegistry`] describes which fields an entity type supports: simple
//! fields render as bare leaves, complex fields are nested entities with a
//! selection of their own. A [`SelectionSet`] is one entity's mutable, chosen
//! subset of those fields and renders to a GraphQL selection string.
//! [`render_operation()`] wraps a selection into a full `query`/`mutation`
//! document with variable declarations.
//!
//! ```
//! use graphql_selection::{FieldRegistry, SelectionSet};
//!
//! let publisher = FieldRegistry::builder()
//!     .simple_fields(["name", "address"])
//!     .build()
//!     .unwrap();
//!
//! let selection = SelectionSet::new(publisher, "publisher");
//! assert_eq!(selection.render(), "publisher {name address}");
//! ```

// `insta` is only used by the integration tests in `tests/`, but the
// `unused-crate-dependencies` lint also runs on the lib test target.
#[cfg(test)]
use insta as _;

mod error;
mod operation;
mod registry;
mod selection_set;

pub use error::{EmptyRegistry, UnknownFields};
pub use operation::{operation_name, render_operation, OperationKind, ResultSchema};
pub use registry::{ChildFactory, FieldRegistry, FieldRegistryBuilder};
pub use selection_set::SelectionSet;
