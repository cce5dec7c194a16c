use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid schema")]
    Schema(#[from] SchemaError),

    #[error("failed to read schema {}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema")]
    Parse(#[from] serde_json::Error),

    #[error("failed to parse schema {}", .path.display())]
    ParseFile {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to emit source")]
    Emission(#[from] std::fmt::Error),

    #[error("failed to write {}", .path.display())]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to run formatter `{program}`")]
    FormatterUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("formatter rejected {}:\n{diagnostic}", .path.display())]
    PostProcess { path: PathBuf, diagnostic: String },
}

/// Errors found by [`Schema::validate`](crate::Schema::validate).
///
/// These are all detected before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("category `{category}` has no nodes")]
    EmptyCategory { category: String },

    #[error("duplicate module `{module}`")]
    DuplicateModule { module: String },

    #[error("duplicate type name `{name}`")]
    DuplicateName { name: String },

    #[error("duplicate tag `{tag}` in category `{category}`")]
    DuplicateTag { category: String, tag: String },

    #[error("duplicate field `{field}` in `{node}`")]
    DuplicateField { node: String, field: String },

    #[error("`{name}` is not a valid {expected} identifier")]
    InvalidName { name: String, expected: &'static str },

    #[error("`{name}` is reserved")]
    ReservedName { name: String },

    #[error("field `{node}.{field}` refers to unknown type `{target}`")]
    UnknownTarget {
        node: String,
        field: String,
        target: String,
    },

    #[error(
        "field `{node}.{field}` refers to `{target}` from category `{category}`, \
         which is declared later"
    )]
    ForwardReference {
        node: String,
        field: String,
        target: String,
        category: String,
    },

    #[error(
        "field `{node}.{field}` embeds `{target}`, \
         which has no node fields and cannot be embedded"
    )]
    PlainRecordTarget {
        node: String,
        field: String,
        target: String,
    },

    #[error("`{node}` contains itself by value through `{path}`")]
    RecordCycle { node: String, path: String },

    #[error("`{node}` renders unknown field `{field}`")]
    UnknownField { node: String, field: String },

    #[error("invalid template for `{node}`: {message}")]
    InvalidTemplate { node: String, message: String },

    #[error("template for `{node}` has {placeholders} placeholders but {args} arguments")]
    TemplateArity {
        node: String,
        placeholders: usize,
        args: usize,
    },

    #[error("field `{node}.{field}` cannot be rendered directly, use a custom renderer")]
    NotTemplatable { node: String, field: String },

    #[error("`for_each` over `{node}.{field}`, which is not a sequence")]
    NotSequence { node: String, field: String },

    #[error("`if_present` over `{node}.{field}`, which is not optional")]
    NotOptional { node: String, field: String },

    #[error("`item` used outside of `for_each` or `if_present` in `{node}`")]
    UnboundItem { node: String },
}
