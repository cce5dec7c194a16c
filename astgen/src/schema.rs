//! Schema data model.
//!
//! A schema is plain configuration. It is either built in code:
//!
//! ```
//! use astgen::{Category, FieldType, Node, Schema};
//!
//! let schema = Schema::new().category(
//!     Category::new("Expr")
//!         .node(Node::new("NumberExpr", "Number").field("token", FieldType::Token).template("{}", ["token"]))
//!         .node(
//!             Node::new("GroupExpr", "Group")
//!                 .field("inner", FieldType::node("Expr"))
//!                 .template("({})", ["inner"]),
//!         ),
//! );
//! assert!(schema.validate().is_ok());
//! ```
//!
//! or loaded from JSON with [`Schema::from_json`] / [`Schema::load`]:
//!
//! ```json
//! {
//!   "collaborators": { "token": "crate::token::Token" },
//!   "categories": [
//!     {
//!       "name": "Expr",
//!       "nodes": [
//!         {
//!           "name": "GroupExpr",
//!           "tag": "Group",
//!           "fields": [{ "name": "inner", "type": { "node": "Expr" } }],
//!           "render": { "template": { "format": "({})", "args": ["inner"] } }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use heck::ToSnakeCase as _;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub(crate) mod validate;

pub use validate::{Index, Target};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub collaborators: Collaborators,
    pub categories: Vec<Category>,
}

/// Paths of the types the generated code depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Collaborators {
    /// Token type, stored by value.
    pub token: String,
    /// Method on the token type returning its source text as `&str`.
    pub lexeme: String,
    /// Interned string type, stored by value.
    pub atom: String,
    /// Arena type, must have `fn alloc<T>(&self, value: T) -> &mut T`.
    pub arena: String,
    /// Arena-backed sequence type, used as `Vec<'a, T>`.
    pub sequence: String,
    /// Path under which the other units' modules live.
    pub sibling_prefix: String,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            token: "crate::token::Token".into(),
            lexeme: "lexeme".into(),
            atom: "crate::intern::StringAtom".into(),
            arena: "bumpalo::Bump".into(),
            sequence: "bumpalo::collections::Vec".into(),
            sibling_prefix: "super".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Name of the union type.
    pub name: String,
    /// Module the unit is emitted as, defaults to `name` in snake_case.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Name of the record type.
    pub name: String,
    /// Name of the union variant.
    pub tag: String,
    #[serde(default)]
    pub fields: Vec<Field>,
    pub render: Render,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Token,
    OptionalToken,
    Primitive(Primitive),
    /// A category union or a record, by name.
    Node(String),
    OptionalNode(String),
    Sequence(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    F64,
    I64,
    Bool,
    Atom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Render {
    /// `format` uses `{}` as placeholders, `{{` and `}}` as escapes.
    /// `args` are field names in placeholder order.
    Template { format: String, args: Vec<String> },
    Custom(Vec<RenderOp>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderOp {
    Literal(String),
    Field(String),
    /// The element or value bound by the innermost `ForEach`/`IfPresent`.
    Item,
    ForEach {
        field: String,
        body: Vec<RenderOp>,
        #[serde(default)]
        separator: String,
    },
    IfPresent {
        field: String,
        then: Vec<RenderOp>,
    },
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|source| Error::Load {
            path: path.to_owned(),
            source,
        })?;
        serde_json::from_str(&s).map_err(|source| Error::ParseFile {
            path: path.to_owned(),
            source,
        })
    }

    pub fn collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            nodes: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn node(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn module_name(&self) -> String {
        match &self.module {
            Some(module) => module.clone(),
            None => self.name.to_snake_case(),
        }
    }
}

impl Node {
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: tag.into(),
            fields: Vec::new(),
            render: Render::Template {
                format: String::new(),
                args: Vec::new(),
            },
        }
    }

    pub fn field(mut self, name: impl Into<String>, ty: FieldType) -> Self {
        self.fields.push(Field {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn template<I>(mut self, format: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.render = Render::Template {
            format: format.into(),
            args: args.into_iter().map(Into::into).collect(),
        };
        self
    }

    pub fn custom(mut self, ops: impl IntoIterator<Item = RenderOp>) -> Self {
        self.render = Render::Custom(ops.into_iter().collect());
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl FieldType {
    pub fn node(target: impl Into<String>) -> Self {
        Self::Node(target.into())
    }

    pub fn optional_node(target: impl Into<String>) -> Self {
        Self::OptionalNode(target.into())
    }

    pub fn sequence(target: impl Into<String>) -> Self {
        Self::Sequence(target.into())
    }

    /// The node type this field refers to, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            FieldType::Node(target)
            | FieldType::OptionalNode(target)
            | FieldType::Sequence(target) => Some(target),
            FieldType::Token | FieldType::OptionalToken | FieldType::Primitive(_) => None,
        }
    }
}

impl RenderOp {
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    pub fn for_each(
        field: impl Into<String>,
        body: impl IntoIterator<Item = RenderOp>,
        separator: impl Into<String>,
    ) -> Self {
        Self::ForEach {
            field: field.into(),
            body: body.into_iter().collect(),
            separator: separator.into(),
        }
    }

    pub fn if_present(field: impl Into<String>, then: impl IntoIterator<Item = RenderOp>) -> Self {
        Self::IfPresent {
            field: field.into(),
            then: then.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests;
