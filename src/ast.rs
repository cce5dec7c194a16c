//! Syntax tree.
//!
//! Both modules are generated from `ast/nodes.json` by the build script.
//! Nodes are allocated in a [`bumpalo::Bump`] and render as s-expressions
//! through `Display`.

pub mod expr {
    include!(concat!(env!("OUT_DIR"), "/ast/expr.rs"));
}

pub mod stmt {
    include!(concat!(env!("OUT_DIR"), "/ast/stmt.rs"));
}

pub use expr::Expr;
pub use stmt::Stmt;
