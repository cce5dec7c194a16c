//! Source emission.
//!
//! Each category becomes one [`Unit`], laid out as:
//! - header and imports
//! - union + `Display` dispatcher
//! - for each node, in schema order: record, constructor, renderer
//!
//! Output depends only on the schema, so two runs over the same schema
//! produce identical text.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

use tracing::debug;

use crate::error::Result;
use crate::join::JoinIter as _;
use crate::schema::validate::simple_name;
use crate::schema::{Category, Collaborators, FieldType, Index, Node, Primitive, Schema};

macro_rules! ln {
    ($f:ident, $($tt:tt)*) => (writeln!($f, $($tt)*)?);
    ($f:ident) => (writeln!($f)?);
}

macro_rules! ml {
    ($f:ident, $($tt:tt)*) => (indoc::writedoc!($f, $($tt)*)?);
}

mod record;
mod render;
mod union;

/// Generated source for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub category: String,
    pub module: String,
    pub source: String,
}

impl Unit {
    pub fn file_name(&self) -> String {
        format!("{}.rs", self.module)
    }
}

/// Validates `schema` and emits one unit per category, in declaration order.
pub fn generate(schema: &Schema) -> Result<Vec<Unit>> {
    let index = schema.validate()?;

    let mut units = Vec::with_capacity(schema.categories.len());
    for (c, category) in schema.categories.iter().enumerate() {
        let cx = Context {
            index: &index,
            category: c,
        };
        let mut source = String::new();
        emit_unit(&cx, &mut source)?;

        debug!(
            category = %category.name,
            nodes = category.nodes.len(),
            bytes = source.len(),
            "emitted unit"
        );
        units.push(Unit {
            category: category.name.clone(),
            module: category.module_name(),
            source,
        });
    }

    Ok(units)
}

struct Context<'i, 's> {
    index: &'i Index<'s>,
    category: usize,
}

impl<'i, 's> Context<'i, 's> {
    fn schema(&self) -> &'s Schema {
        self.index.schema()
    }

    fn category(&self) -> &'s Category {
        &self.schema().categories[self.category]
    }

    fn union(&self) -> &'s str {
        &self.category().name
    }

    fn collaborators(&self) -> &'s Collaborators {
        &self.schema().collaborators
    }

    fn ty<'t>(&self, ty: &'t FieldType) -> Ty<'t>
    where
        's: 't,
    {
        Ty {
            collaborators: self.collaborators(),
            ty,
        }
    }

    fn fields(&self) -> impl Iterator<Item = &'s FieldType> {
        self.category()
            .nodes
            .iter()
            .flat_map(|node| node.fields.iter().map(|field| &field.ty))
    }
}

/// `<'a>` if the record carries the arena lifetime.
fn lifetime(node: &Node) -> &'static str {
    if node.needs_lifetime() { "<'a>" } else { "" }
}

/// Rust type of a field, as written in the generated unit.
struct Ty<'t> {
    collaborators: &'t Collaborators,
    ty: &'t FieldType,
}

impl fmt::Display for Ty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = simple_name(&self.collaborators.token);
        match self.ty {
            FieldType::Token => write!(f, "{token}"),
            FieldType::OptionalToken => write!(f, "Option<{token}>"),
            FieldType::Primitive(Primitive::F64) => write!(f, "f64"),
            FieldType::Primitive(Primitive::I64) => write!(f, "i64"),
            FieldType::Primitive(Primitive::Bool) => write!(f, "bool"),
            FieldType::Primitive(Primitive::Atom) => {
                write!(f, "{}", simple_name(&self.collaborators.atom))
            }
            FieldType::Node(target) => write!(f, "{target}<'a>"),
            FieldType::OptionalNode(target) => write!(f, "Option<{target}<'a>>"),
            FieldType::Sequence(target) => {
                let sequence = simple_name(&self.collaborators.sequence);
                write!(f, "{sequence}<'a, {target}<'a>>")
            }
        }
    }
}

fn emit_unit(cx: &Context<'_, '_>, out: &mut String) -> fmt::Result {
    emit_header(cx, out)?;
    emit_uses(cx, out)?;

    union::emit_union(cx, out)?;
    union::emit_dispatch(cx, out)?;

    for node in &cx.category().nodes {
        debug!(node = %node.name, lifetime = node.needs_lifetime(), "emitting node");
        record::emit_record(cx, node, out)?;
        record::emit_constructor(cx, node, out)?;
        render::emit_renderer(cx, node, out)?;
    }

    Ok(())
}

fn emit_header(cx: &Context<'_, '_>, out: &mut String) -> fmt::Result {
    ln!(
        out,
        "// `{}` nodes, generated by astgen. Do not edit by hand.",
        cx.union()
    );
    ln!(out);
    Ok(())
}

fn emit_uses(cx: &Context<'_, '_>, out: &mut String) -> fmt::Result {
    let collaborators = cx.collaborators();

    ln!(out, "use std::fmt;");
    ln!(out);
    ln!(out, "use {};", collaborators.arena);

    if cx
        .fields()
        .any(|ty| matches!(ty, FieldType::Token | FieldType::OptionalToken))
    {
        ln!(out, "use {};", collaborators.token);
    }
    if cx
        .fields()
        .any(|ty| matches!(ty, FieldType::Primitive(Primitive::Atom)))
    {
        ln!(out, "use {};", collaborators.atom);
    }
    if cx.fields().any(|ty| matches!(ty, FieldType::Sequence(_))) {
        ln!(out, "use {};", collaborators.sequence);
    }

    // only what this category actually refers to, so a category never
    // imports one that does not refer back
    let mut siblings: BTreeMap<usize, BTreeSet<&str>> = BTreeMap::new();
    for ty in cx.fields() {
        let Some(name) = ty.target() else {
            continue;
        };
        let Some(target) = cx.index.resolve(name) else {
            continue;
        };
        if target.category() != cx.category {
            siblings.entry(target.category()).or_default().insert(name);
        }
    }
    for (c, names) in siblings {
        let prefix = &collaborators.sibling_prefix;
        let module = cx.schema().categories[c].module_name();
        if names.len() == 1 {
            ln!(out, "use {prefix}::{module}::{};", names.iter().join(", "));
        } else {
            ln!(out, "use {prefix}::{module}::{{{}}};", names.iter().join(", "));
        }
    }

    ln!(out);
    Ok(())
}
