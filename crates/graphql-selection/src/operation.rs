use std::fmt;

use itertools::Itertools;

use crate::SelectionSet;

/// The kind of an operation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Query => f.write_str("query"),
            OperationKind::Mutation => f.write_str("mutation"),
        }
    }
}

/// The result shape of an operation: either a literal selection string used
/// verbatim, or a selection node rendered at assembly time.
#[derive(Debug, Clone, Copy)]
pub enum ResultSchema<'a> {
    Literal(&'a str),
    Selection(&'a SelectionSet),
}

impl<'a> From<&'a str> for ResultSchema<'a> {
    fn from(text: &'a str) -> Self {
        ResultSchema::Literal(text)
    }
}

impl<'a> From<&'a SelectionSet> for ResultSchema<'a> {
    fn from(node: &'a SelectionSet) -> Self {
        ResultSchema::Selection(node)
    }
}

/// Upper snake case name for an operation: `getAuthor` becomes `GET_AUTHOR`.
pub fn operation_name(field_name: &str) -> String {
    let mut out = String::with_capacity(field_name.len() + 4);

    for c in field_name.chars() {
        if c.is_uppercase() && !out.is_empty() {
            out.push('_');
        }
        out.extend(c.to_uppercase());
    }

    out
}

/// Assemble a full operation document around the root field `field_name`.
///
/// `variables` is an ordered list of `(name, GraphQL type)` pairs; an empty
/// type string defaults to `String!`. Each variable is declared on the
/// operation and passed to the root field as `name: $name`. Both
/// parentheticals are omitted when `variables` is empty.
pub fn render_operation(
    kind: OperationKind,
    field_name: &str,
    result: Option<ResultSchema<'_>>,
    variables: &[(&str, &str)],
) -> String {
    let name = operation_name(field_name);

    let declarations = if variables.is_empty() {
        String::new()
    } else {
        format!(
            "({})",
            variables.iter().format_with(", ", |&(var, ty), f| {
                let ty = if ty.is_empty() { "String!" } else { ty };
                f(&format_args!("${var}: {ty}"))
            })
        )
    };

    let arguments = if variables.is_empty() {
        String::new()
    } else {
        format!(
            "({})",
            variables
                .iter()
                .format_with(", ", |&(var, _), f| f(&format_args!("{var}: ${var}")))
        )
    };

    let result = match result {
        Some(ResultSchema::Literal(text)) => text.to_owned(),
        Some(ResultSchema::Selection(node)) => node.render(),
        None => String::new(),
    };

    format!("{kind} {name} {declarations} {{ {field_name} {arguments} {result} }}")
}
