//! Field-type classification.
//!
//! Node references (plain, optional, or sequences of them) point into
//! the arena, so they are ownership-carrying. Tokens and primitives are
//! stored by value and are not.
//!
//! Classification is local to the field type. It never looks at what the
//! referenced node itself contains.

use crate::schema::{FieldType, Node};

impl FieldType {
    #[inline]
    pub fn is_ownership_carrying(&self) -> bool {
        match self {
            FieldType::Token => false,
            FieldType::OptionalToken => false,
            FieldType::Primitive(_) => false,
            FieldType::Node(_) => true,
            FieldType::OptionalNode(_) => true,
            FieldType::Sequence(_) => true,
        }
    }
}

impl Node {
    /// Whether the record needs the arena lifetime `'a`.
    ///
    /// The union variant and the constructor `impl` follow the same answer.
    #[inline]
    pub fn needs_lifetime(&self) -> bool {
        self.fields.iter().any(|field| field.ty.is_ownership_carrying())
    }
}
