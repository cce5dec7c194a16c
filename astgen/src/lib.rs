//! Schema-driven generator for arena-allocated AST nodes.
//!
//! Input is a [`Schema`]: an ordered list of categories (`Stmt`, `Expr`),
//! each an ordered list of node kinds with typed fields and a rendering
//! program.
//!
//! For every category this emits one source unit containing:
//! - collaborator imports (token, string atom, arena, arena sequence,
//!   sibling categories)
//! - the category union, with one variant per node kind
//! - a `Display` dispatcher for the union
//! - per node kind:
//!   - the record
//!   - `new`, which allocates the record in the arena and wraps it in
//!     the union
//!   - `record`, which builds the bare record, and `into_<module>`, which
//!     wraps one in the union later
//!   - a `Display` impl producing the s-expression form
//!
//! A record carries the arena lifetime `'a` iff one of its fields is an
//! ownership-carrying type (see [`classify`]).
//!
//! Writing units to disk and running `rustfmt` lives in [`output`].

pub mod classify;
pub mod emit;
pub mod error;
pub mod output;
pub mod schema;
pub mod template;

mod join;

pub use emit::{Unit, generate};
pub use error::{Error, Result, SchemaError};
pub use schema::{
    Category, Collaborators, Field, FieldType, Node, Primitive, Render, RenderOp, Schema,
};
