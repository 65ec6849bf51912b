/// The single fatal error in this crate: a [`crate::FieldRegistry`] must
/// declare at least one field, simple or complex.
#[derive(Debug, thiserror::Error)]
#[error("schema has no fields")]
pub struct EmptyRegistry;

/// Returned by the strict mutation variants when one or more of the requested
/// field names are not part of the registry.
///
/// The permissive operations ([`crate::SelectionSet::add()`] and friends) drop
/// such names silently instead.
#[derive(Debug, thiserror::Error)]
#[error("unknown fields: {}", .fields.join(", "))]
pub struct UnknownFields {
    /// The requested names that the registry does not know about, in request
    /// order.
    pub fields: Vec<String>,
}
