//! Errors raised while building types.

use thiserror::Error;

use crate::Idx;

/// Type construction failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TypeError {
    /// The index does not name a struct declaration.
    #[error("{0:?} is not a struct declaration")]
    NotAStruct(Idx),

    /// A struct may be defined only once.
    #[error("struct `{name}` is already defined")]
    AlreadyDefined { name: String },

    /// A field's type has no layout yet (e.g. a struct declared but not
    /// defined). Self-reference must go through a pointer.
    #[error("field `{field}` of struct `{name}` has unsized type {ty:?}")]
    UnsizedField { name: String, field: String, ty: Idx },

    /// Two fields of one struct share a name.
    #[error("struct `{name}` has duplicate field `{field}`")]
    DuplicateField { name: String, field: String },
}
